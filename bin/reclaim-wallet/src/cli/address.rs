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

use clap::Args;
use reclaim_wallet_provider::{AccountFactory, AddressResolver, AlloyAccountFactory};
use reclaim_wallet_types::chain::ChainSpec;

use super::CommonArgs;

/// CLI options for the address subcommand
#[derive(Debug, Args)]
pub struct AddressCliArgs {
    /// Platform handle the account is derived from
    #[arg(long = "handle", name = "handle")]
    handle: String,

    /// Also ask the factory and fail if it disagrees with the offline derivation
    #[arg(long = "verify", name = "verify")]
    verify: bool,
}

pub async fn run(args: AddressCliArgs, common: &CommonArgs, cs: ChainSpec) -> anyhow::Result<()> {
    let provider = common.try_provider()?;
    let resolver = super::address_resolver(&cs, provider.clone())?;
    let sender = resolver.resolve(&args.handle).await?;

    if args.verify {
        let provider = match provider {
            Some(provider) => provider,
            None => anyhow::bail!("must provide node_http to verify against the factory"),
        };
        let factory = AlloyAccountFactory::new(cs.factory_address, provider);
        let remote = factory.get_address(&args.handle).await?;
        if remote != sender {
            anyhow::bail!(
                "factory {} resolves {} to {remote}, expected {sender}",
                factory.address(),
                args.handle
            );
        }
        tracing::info!(handle = %args.handle, %sender, "factory agrees with offline derivation");
    }

    println!("{sender}");
    Ok(())
}
