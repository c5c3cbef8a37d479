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

use std::path::PathBuf;

use alloy_primitives::{Address, U256};
use clap::Args;
use reclaim_wallet_provider::{AlloyEntryPoint, EntryPoint};
use reclaim_wallet_provisioner::ProvisionRequest;
use reclaim_wallet_types::{
    chain::ChainSpec, encode_authorization, proof::encode_proof, ProofPlacement,
};
use serde_json::json;

use super::{CommonArgs, UserOpArgs};

/// CLI options for the encode-proof subcommand
#[derive(Debug, Args)]
pub struct EncodeProofCliArgs {
    /// Path to a proof in the Reclaim SDK JSON shape
    #[arg(long = "proof", name = "proof")]
    proof: PathBuf,
}

/// CLI options for the encode-op subcommand
#[derive(Debug, Args)]
pub struct EncodeOpCliArgs {
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

    /// Nonce to build with, read from the entry point if omitted and a node is configured
    #[arg(long = "nonce", name = "nonce")]
    nonce: Option<U256>,
}

pub fn run_encode_proof(args: EncodeProofCliArgs) -> anyhow::Result<()> {
    let proof = super::read_proof(&args.proof)?;
    let out = json!({
        "proof": encode_proof(&proof),
        "authorization": encode_authorization(&proof),
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

pub async fn run_encode_op(
    args: EncodeOpCliArgs,
    common: &CommonArgs,
    user_op: &UserOpArgs,
    cs: ChainSpec,
) -> anyhow::Result<()> {
    let proof = super::read_proof(&args.proof)?;
    let provider = common.try_provider()?;
    let resolver = super::address_resolver(&cs, provider.clone())?;
    let sender = resolver.resolve(&args.handle).await?;

    let settings = user_op.settings(Address::ZERO);
    let entry_point = provider.map(|p| AlloyEntryPoint::new(cs.entry_point_address, p));
    let nonce = match (args.nonce, &entry_point) {
        (Some(nonce), _) => nonce,
        (None, Some(ep)) => ep.get_nonce(sender, settings.nonce_key).await?,
        (None, None) => U256::ZERO,
    };

    let request =
        ProvisionRequest::new(args.handle, args.owner, proof).with_placement(args.placement);
    let sealed = settings
        .build_operation(cs.factory_address, &request, sender, nonce)?
        .seal(cs.entry_point_address, cs.id);

    let remote_hash = match &entry_point {
        Some(ep) => Some(ep.get_user_op_hash(sealed.op().pack()).await?),
        None => None,
    };
    if remote_hash.is_some_and(|h| h != sealed.hash()) {
        tracing::warn!(
            local = %sealed.hash(),
            remote = ?remote_hash,
            "entry point disagrees with the local operation hash"
        );
    }

    let out = json!({
        "sender": sender,
        "nonce": nonce,
        "userOperation": sealed.op().abi_encode(),
        "userOpHash": sealed.hash(),
        "entryPointHash": remote_hash,
        "entryPoint": cs.entry_point_address,
        "chainId": cs.id,
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}
