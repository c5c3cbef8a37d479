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

use std::path::Path;

use alloy_network::EthereumWallet;
use alloy_primitives::{aliases::U192, Address, U256};
use alloy_signer_local::PrivateKeySigner;
use anyhow::Context;
use clap::{builder::PossibleValuesParser, Args, Parser, Subcommand};
use reclaim_wallet_provider::{
    new_alloy_provider, AddressResolver, AlloyAccountFactory, DynProvider, FactoryAddressResolver,
};
use reclaim_wallet_provisioner::Settings;
use reclaim_wallet_types::{chain::ChainSpec, Proof};
use secrecy::{ExposeSecret, SecretString};

mod address;
mod chain_spec;
mod encode;
mod provision;
mod tracing;

use address::AddressCliArgs;
use encode::{EncodeOpCliArgs, EncodeProofCliArgs};
use provision::{ProvisionCliArgs, StatusCliArgs};

/// Main entry point for the CLI
///
/// Parses the CLI arguments, resolves the chain spec and runs the subcommand.
pub async fn run() -> anyhow::Result<()> {
    let opt = Cli::parse();
    let _guard = tracing::configure_logging(&opt.logs)?;
    tracing::debug!("Parsed CLI options: {:#?}", opt);

    let cs = chain_spec::resolve_chain_spec(&opt.common.network, &opt.common.chain_spec)?;
    tracing::info!("Chain spec: {:#?}", cs);

    match opt.command {
        Command::Address(args) => address::run(args, &opt.common, cs).await,
        Command::EncodeProof(args) => encode::run_encode_proof(args),
        Command::EncodeOp(args) => encode::run_encode_op(args, &opt.common, &opt.user_op, cs).await,
        Command::Provision(args) => {
            provision::run(args, &opt.common, &opt.user_op, &opt.signer, cs).await
        }
        Command::Status(args) => provision::run_status(args, &opt.common, cs).await,
    }
}

/// CLI commands
#[derive(Debug, Subcommand)]
enum Command {
    /// Print the counterfactual address of a handle
    #[command(name = "address")]
    Address(AddressCliArgs),

    /// Print the canonical encoding and the authorization payload of a proof
    #[command(name = "encode-proof")]
    EncodeProof(EncodeProofCliArgs),

    /// Build the creation operation for a handle and print its encoding and hash
    #[command(name = "encode-op")]
    EncodeOp(EncodeOpCliArgs),

    /// Provision the account of a handle end to end
    #[command(name = "provision")]
    Provision(ProvisionCliArgs),

    /// Report whether the account of a handle is deployed
    #[command(name = "status")]
    Status(StatusCliArgs),
}

/// CLI options common to all subcommands
#[derive(Debug, Args)]
#[command(next_help_heading = "Common")]
pub struct CommonArgs {
    /// Network flag
    #[arg(
        long = "network",
        name = "network",
        env = "NETWORK",
        value_parser = PossibleValuesParser::new(chain_spec::HARDCODED_CHAIN_SPECS),
        global = true
    )]
    network: Option<String>,

    /// Chain spec file path
    #[arg(
        long = "chain_spec",
        name = "chain_spec",
        env = "CHAIN_SPEC",
        global = true
    )]
    chain_spec: Option<String>,

    /// ETH Node HTTP URL to connect to
    #[arg(
        long = "node_http",
        name = "node_http",
        env = "NODE_HTTP",
        global = true
    )]
    node_http: Option<String>,

    /// Timeout of a single request to the node, in seconds
    #[arg(
        long = "provider_client_timeout_seconds",
        name = "provider_client_timeout_seconds",
        env = "PROVIDER_CLIENT_TIMEOUT_SECONDS",
        default_value = "10",
        global = true
    )]
    provider_client_timeout_seconds: u64,
}

impl CommonArgs {
    fn node_http(&self) -> anyhow::Result<&str> {
        self.node_http
            .as_deref()
            .context("must provide node_http for this command")
    }

    /// Read-only provider, if a node is configured
    fn try_provider(&self) -> anyhow::Result<Option<DynProvider>> {
        self.node_http
            .as_deref()
            .map(|url| new_alloy_provider(url, self.provider_client_timeout_seconds))
            .transpose()
    }

    /// Read-only provider, failing if no node is configured
    fn provider(&self) -> anyhow::Result<DynProvider> {
        new_alloy_provider(self.node_http()?, self.provider_client_timeout_seconds)
    }
}

/// CLI options for the operations that are built
#[derive(Debug, Args)]
#[command(next_help_heading = "User operation")]
pub struct UserOpArgs {
    #[arg(
        long = "user_op.verification_gas_limit",
        name = "user_op.verification_gas_limit",
        env = "USER_OP_VERIFICATION_GAS_LIMIT",
        default_value = "750000",
        global = true
    )]
    verification_gas_limit: U256,

    #[arg(
        long = "user_op.call_gas_limit",
        name = "user_op.call_gas_limit",
        env = "USER_OP_CALL_GAS_LIMIT",
        default_value = "750000",
        global = true
    )]
    call_gas_limit: U256,

    #[arg(
        long = "user_op.pre_verification_gas",
        name = "user_op.pre_verification_gas",
        env = "USER_OP_PRE_VERIFICATION_GAS",
        default_value = "55000",
        global = true
    )]
    pre_verification_gas: U256,

    #[arg(
        long = "user_op.max_priority_fee_per_gas",
        name = "user_op.max_priority_fee_per_gas",
        env = "USER_OP_MAX_PRIORITY_FEE_PER_GAS",
        default_value = "1000664",
        global = true
    )]
    max_priority_fee_per_gas: U256,

    #[arg(
        long = "user_op.max_fee_per_gas",
        name = "user_op.max_fee_per_gas",
        env = "USER_OP_MAX_FEE_PER_GAS",
        default_value = "1000",
        global = true
    )]
    max_fee_per_gas: U256,

    /// Nonce key the operation is built under
    #[arg(
        long = "user_op.nonce_key",
        name = "user_op.nonce_key",
        env = "USER_OP_NONCE_KEY",
        default_value = "0",
        global = true
    )]
    nonce_key: U192,

    /// Skip comparing the local operation hash with the entry point's
    #[arg(
        long = "user_op.skip_hash_check",
        name = "user_op.skip_hash_check",
        env = "USER_OP_SKIP_HASH_CHECK",
        global = true
    )]
    skip_hash_check: bool,
}

impl UserOpArgs {
    fn settings(&self, beneficiary: Address) -> Settings {
        Settings {
            verification_gas_limit: self.verification_gas_limit,
            call_gas_limit: self.call_gas_limit,
            pre_verification_gas: self.pre_verification_gas,
            max_priority_fee_per_gas: self.max_priority_fee_per_gas,
            max_fee_per_gas: self.max_fee_per_gas,
            nonce_key: self.nonce_key,
            beneficiary,
            verify_hash_with_entry_point: !self.skip_hash_check,
        }
    }
}

/// CLI options for the funding signer
#[derive(Debug, Args)]
#[command(next_help_heading = "Signer")]
pub struct SignerArgs {
    /// Private key of the account that funds and submits
    #[arg(
        long = "signer.private_key",
        name = "signer.private_key",
        env = "SIGNER_PRIVATE_KEY",
        value_parser = parse_secret,
        global = true
    )]
    private_key: Option<SecretString>,
}

impl SignerArgs {
    fn signer(&self) -> anyhow::Result<PrivateKeySigner> {
        self.private_key
            .as_ref()
            .context("must provide signer.private_key for this command")?
            .expose_secret()
            .parse::<PrivateKeySigner>()
            .context("invalid signer private key")
    }

    /// Address and wallet of the funding signer
    fn wallet(&self) -> anyhow::Result<(Address, EthereumWallet)> {
        let signer = self.signer()?;
        Ok((signer.address(), EthereumWallet::from(signer)))
    }
}

/// CLI options for logging
#[derive(Debug, Args)]
#[command(next_help_heading = "Logging")]
pub struct LogsArgs {
    /// Log file
    ///
    /// If not provided, logs will be written to stdout
    #[arg(
        long = "log.file",
        name = "log.file",
        env = "LOG_FILE",
        default_value = None,
        global = true
    )]
    file: Option<String>,

    /// Log JSON
    ///
    /// If set, logs will be written in JSON format
    #[arg(
        long = "log.json",
        name = "log.json",
        env = "LOG_JSON",
        required = false,
        num_args = 0,
        global = true
    )]
    json: bool,
}

/// CLI options
#[derive(Debug, Parser)]
#[command(name = "reclaim-wallet", version, about)]
pub struct Cli {
    #[clap(subcommand)]
    command: Command,

    #[clap(flatten)]
    common: CommonArgs,

    #[clap(flatten)]
    user_op: UserOpArgs,

    #[clap(flatten)]
    signer: SignerArgs,

    #[clap(flatten)]
    logs: LogsArgs,
}

/// Converts a &str into a SecretString
pub(crate) fn parse_secret(s: &str) -> Result<SecretString, String> {
    Ok(SecretString::from(s.to_string()))
}

/// Read and check a proof in the Reclaim SDK JSON shape
fn read_proof(path: &Path) -> anyhow::Result<Proof> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read proof file {}", path.display()))?;
    let proof = Proof::from_json(&json)?;
    proof.validate()?;
    Ok(proof)
}

/// Offline resolution when the chain spec knows the account init code hash,
/// the factory otherwise
fn address_resolver(
    cs: &ChainSpec,
    provider: Option<DynProvider>,
) -> anyhow::Result<Box<dyn AddressResolver>> {
    if cs.factory_address.is_zero() {
        anyhow::bail!("chain spec has no factory_address");
    }
    if !cs.account_init_code_hash.is_zero() {
        return Ok(Box::new(cs.create2_resolver()));
    }
    let provider = provider.context(
        "chain spec has no account_init_code_hash, node_http is needed to ask the factory",
    )?;
    tracing::info!("resolving addresses through factory {}", cs.factory_address);
    Ok(Box::new(FactoryAddressResolver::new(
        AlloyAccountFactory::new(cs.factory_address, provider),
    )))
}
