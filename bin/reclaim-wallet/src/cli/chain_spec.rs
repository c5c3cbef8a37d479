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

use anyhow::{bail, Context};
use config::{Config, Environment, File, FileFormat};
use paste::paste;
use reclaim_wallet_types::chain::ChainSpec;

/// Resolve the chain spec.
///
/// Later sources override earlier ones:
/// - defaults
/// - network flag
/// - chain spec file
/// - `CHAIN_*` environment variables
pub fn resolve_chain_spec(
    network: &Option<String>,
    file: &Option<String>,
) -> anyhow::Result<ChainSpec> {
    let default = serde_json::to_string(&ChainSpec::default())?;
    let mut builder =
        Config::builder().add_source(File::from_str(default.as_str(), FileFormat::Json));

    if let Some(network) = network {
        builder = builder.add_source(File::from_str(
            get_hardcoded_chain_spec(network.to_lowercase().as_str())?,
            FileFormat::Toml,
        ));
    }
    if let Some(file) = file {
        builder = builder.add_source(File::with_name(file.as_str()));
    }

    let spec: ChainSpec = builder
        .add_source(Environment::with_prefix("CHAIN"))
        .build()
        .context("failed to load chain spec")?
        .try_deserialize()
        .context("invalid chain spec")?;

    if spec.id == 0 {
        bail!("chain id must be defined and non-zero, pass --network, --chain_spec or CHAIN_ID");
    }
    Ok(spec)
}

macro_rules! define_hardcoded_chain_specs {
    ($($network:ident),+) => {
        paste! {
            $(
                const [< $network:upper _SPEC >]: &str = include_str!(concat!("../../chain_specs/", stringify!($network), ".toml"));
            )+

            fn get_hardcoded_chain_spec(network: &str) -> anyhow::Result<&'static str> {
                match network {
                    $(
                        stringify!($network) => Ok([< $network:upper _SPEC >]),
                    )+
                    _ => bail!("unknown hardcoded network: {}", network),
                }
            }

            pub const HARDCODED_CHAIN_SPECS: &[&'static str] = &[$(stringify!($network),)+];
        }
    };
}

define_hardcoded_chain_specs!(local, base_sepolia);

#[cfg(test)]
mod tests {
    use alloy_primitives::address;
    use reclaim_wallet_types::chain::ENTRY_POINT_ADDRESS_V0_7;

    use super::*;

    #[test]
    fn test_base_sepolia() {
        let spec = resolve_chain_spec(&Some("base_sepolia".to_string()), &None).unwrap();
        assert_eq!(spec.id, 84532);
        assert_eq!(spec.entry_point_address, ENTRY_POINT_ADDRESS_V0_7);
        assert_eq!(
            spec.reclaim_address,
            address!("F90085f5Fd1a3bEb8678623409b3811eCeC5f6A5")
        );
        assert!(spec.has_reclaim_verifier());
    }

    #[test]
    fn test_local() {
        let spec = resolve_chain_spec(&Some("LOCAL".to_string()), &None).unwrap();
        assert_eq!(spec.id, 31337);
        assert!(!spec.has_reclaim_verifier());
    }

    #[test]
    fn test_unknown_network() {
        assert!(get_hardcoded_chain_spec("mainnet").is_err());
        assert_eq!(HARDCODED_CHAIN_SPECS, &["local", "base_sepolia"]);
    }
}
