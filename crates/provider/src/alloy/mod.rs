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

use std::time::Duration;

use alloy_network::EthereumWallet;
use alloy_provider::{DynProvider, Provider as AlloyProvider, ProviderBuilder};
use alloy_rpc_client::{ClientBuilder, RpcClient};
use alloy_transport::layers::RetryBackoffLayer;
use anyhow::Context;
use request_timeout::RequestTimeoutLayer;
use url::Url;

pub(crate) mod entry_point;
pub(crate) mod evm;
pub(crate) mod factory;
mod request_timeout;
pub(crate) mod verifier;

/// Create a new read-only alloy provider from a given RPC URL
pub fn new_alloy_provider(
    rpc_url: &str,
    provider_client_timeout_seconds: u64,
) -> anyhow::Result<DynProvider> {
    let client = new_rpc_client(rpc_url, provider_client_timeout_seconds)?;
    Ok(ProviderBuilder::new().connect_client(client).erased())
}

/// Create a new alloy provider that signs and sends transactions with `wallet`.
///
/// Nonce, gas and chain id are filled by the provider.
pub fn new_alloy_signing_provider(
    rpc_url: &str,
    provider_client_timeout_seconds: u64,
    wallet: EthereumWallet,
) -> anyhow::Result<DynProvider> {
    let client = new_rpc_client(rpc_url, provider_client_timeout_seconds)?;
    Ok(ProviderBuilder::new()
        .wallet(wallet)
        .connect_client(client)
        .erased())
}

fn new_rpc_client(
    rpc_url: &str,
    provider_client_timeout_seconds: u64,
) -> anyhow::Result<RpcClient> {
    let url = Url::parse(rpc_url).context("invalid rpc url")?;
    // these retries are if the server returns a 429
    let retry_layer = RetryBackoffLayer::new(10, 500, 1_000_000);
    let timeout_layer =
        RequestTimeoutLayer::new(Duration::from_secs(provider_client_timeout_seconds));
    Ok(ClientBuilder::default()
        .layer(retry_layer)
        .layer(timeout_layer)
        .http(url))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_url() {
        assert!(new_alloy_provider("not a url", 10).is_err());
    }
}
