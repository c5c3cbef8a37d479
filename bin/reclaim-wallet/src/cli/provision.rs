// This file is part of Reclaim Wallet.
//
// Reclaim Wallet is free software: you can redistribute it and/or modify it under the
// terms of the GNU Lesser General Public License as published by the Free Software
// Foundation, either version 3 of the License, or (at your option) any later version.
//
// Reclaim Wallet is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.
// See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with Reclaim Wallet.
// If not, see https://www.gnu.org/licenses/.

use std::{path::PathBuf, time::Duration};

use alloy_primitives::Address;
use anyhow::Context;
use clap::Args;
use reclaim_wallet_provider::{
    new_alloy_signing_provider, AddressResolver, AlloyEntryPoint, AlloyEvmProvider,
    AlloyReclaimVerifier, EntryPoint, EvmProvider, SubmissionReceipt,
};
use reclaim_wallet_provisioner::{ProvisionRequest, Provisioner, ProvisioningState, Settings};
use reclaim_wallet_types::{chain::ChainSpec, ProofPlacement};
use reclaim_wallet_utils::eth::{format_native, parse_native};
use serde_json::{json, Value};

use super::{CommonArgs, SignerArgs, UserOpArgs};

/// CLI options for the provision subcommand
#[derive(Debug, Args)]
pub struct ProvisionCliArgs {
    /// Platform handle the account is derived from
    #[arg(long = "handle", name = "handle")]
    handle: String,

    /// Owner of the new account
    #[arg(long = "owner", name = "owner")]
    owner: Address,

    /// Path to a proof in the Reclaim SDK JSON shape
    #[arg(long = "proof", name = "proof")]
    proof: PathBuf,

    /// Where the factory expects the proof
    #[arg(long = "placement", name = "placement", default_value_t)]
    placement: ProofPlacement,

    /// Deposit added for the account before submission, in native currency
    #[arg(
        long = "prefund",
        name = "prefund",
        default_value = "0.0035",
        conflicts_with = "no_prefund"
    )]
    prefund: String,

    /// Submit without adding to the account's deposit
    #[arg(long = "no_prefund", name = "no_prefund")]
    no_prefund: bool,

    /// Bound on waiting for the operation to be included, e.g. `90s`
    #[arg(long = "deadline", name = "deadline", value_parser = humantime::parse_duration)]
    deadline: Option<Duration>,

    /// Fee recipient, the signer if omitted
    #[arg(long = "beneficiary", name = "beneficiary")]
    beneficiary: Option<Address>,

    /// Check the proof against the network's verifier before funding
    #[arg(long = "precheck", name = "precheck")]
    precheck: bool,
}

/// CLI options for the status subcommand
#[derive(Debug, Args)]
pub struct StatusCliArgs {
    /// Platform handle the account is derived from
    #[arg(long = "handle", name = "handle")]
    handle: String,

    /// Wait up to this long for the account to be deployed, e.g. `2m`
    #[arg(long = "wait", name = "wait", value_parser = humantime::parse_duration)]
    wait: Option<Duration>,

    /// Polling interval while waiting
    #[arg(
        long = "interval",
        name = "interval",
        default_value = "2s",
        value_parser = humantime::parse_duration
    )]
    interval: Duration,
}

pub async fn run(
    args: ProvisionCliArgs,
    common: &CommonArgs,
    user_op: &UserOpArgs,
    signer: &SignerArgs,
    cs: ChainSpec,
) -> anyhow::Result<()> {
    if cs.factory_address.is_zero() {
        anyhow::bail!("chain spec has no factory_address");
    }
    let proof = super::read_proof(&args.proof)?;
    let prefund = if args.no_prefund {
        None
    } else {
        Some(parse_native(&args.prefund)?)
    };

    let (signer_address, wallet) = signer.wallet()?;
    let provider = new_alloy_signing_provider(
        common.node_http()?,
        common.provider_client_timeout_seconds,
        wallet,
    )?;

    let evm = AlloyEvmProvider::new(provider.clone());
    let chain_id = evm.get_chain_id().await?;
    if chain_id != cs.id {
        anyhow::bail!(
            "node is on chain {chain_id}, chain spec {} expects {}",
            cs.name,
            cs.id
        );
    }
    let balance = evm.get_balance(signer_address).await?;
    tracing::info!(signer = %signer_address, balance = %format_native(balance), "funding signer");

    let resolver = super::address_resolver(&cs, Some(provider.clone()))?;
    let settings = user_op.settings(args.beneficiary.unwrap_or(signer_address));
    let entry_point = AlloyEntryPoint::new(cs.entry_point_address, provider.clone());
    let mut provisioner = Provisioner::new(cs.clone(), settings, entry_point, evm, resolver);
    if args.precheck {
        if !cs.has_reclaim_verifier() {
            anyhow::bail!("--precheck needs a reclaim_address in the chain spec");
        }
        provisioner =
            provisioner.with_verifier(AlloyReclaimVerifier::new(cs.reclaim_address, provider));
    }

    let mut request =
        ProvisionRequest::new(args.handle, args.owner, proof).with_placement(args.placement);
    if let Some(prefund) = prefund {
        request = request.with_prefund(prefund);
    }
    if let Some(deadline) = args.deadline {
        request = request.with_deadline(deadline);
    }

    let report = match provisioner.provision(request).await {
        Ok(report) => report,
        Err(err) => {
            if err.is_recoverable() {
                tracing::warn!("outcome unknown, check later with the status subcommand");
            }
            return Err(err.into());
        }
    };

    let out = json!({
        "handle": report.handle,
        "state": ProvisioningState::Confirmed.to_string(),
        "sender": report.sender,
        "nonce": report.nonce,
        "userOpHash": report.user_op_hash,
        "deposit": receipt_json(report.deposit.as_ref()),
        "receipt": receipt_json(report.receipt.as_ref()),
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

pub async fn run_status(
    args: StatusCliArgs,
    common: &CommonArgs,
    cs: ChainSpec,
) -> anyhow::Result<()> {
    let provider = common.provider()?;
    let resolver = super::address_resolver(&cs, Some(provider.clone()))?;
    let sender = resolver.resolve(&args.handle).await?;

    let entry_point = AlloyEntryPoint::new(cs.entry_point_address, provider.clone());
    let deposit = entry_point
        .balance_of(sender)
        .await
        .context("failed to read entry point deposit")?;
    let provisioner = Provisioner::new(
        cs,
        Settings::default(),
        entry_point,
        AlloyEvmProvider::new(provider),
        resolver,
    );

    let deployed = match args.wait {
        Some(wait) => {
            provisioner
                .poll_confirmation(sender, wait, args.interval)
                .await?;
            true
        }
        None => provisioner.is_provisioned(sender).await?,
    };

    let out = json!({
        "handle": args.handle,
        "sender": sender,
        "deployed": deployed,
        "deposit": format_native(deposit),
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

fn receipt_json(receipt: Option<&SubmissionReceipt>) -> Value {
    match receipt {
        Some(r) => json!({
            "txHash": r.tx_hash,
            "blockNumber": r.block_number,
            "gasUsed": r.gas_used,
        }),
        None => Value::Null,
    }
}
