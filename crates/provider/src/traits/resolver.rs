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

use alloy_primitives::Address;
#[cfg(feature = "test-utils")]
use mockall::automock;
use reclaim_wallet_types::Create2Resolver;

use super::{error::ProviderResult, factory::AccountFactory};

/// Maps an account handle to its counterfactual address
#[cfg_attr(feature = "test-utils", automock)]
#[async_trait::async_trait]
pub trait AddressResolver: Send + Sync {
    /// The address the account for `handle` has, or will have once deployed
    async fn resolve(&self, handle: &str) -> ProviderResult<Address>;
}

#[async_trait::async_trait]
impl AddressResolver for Create2Resolver {
    async fn resolve(&self, handle: &str) -> ProviderResult<Address> {
        Ok(Create2Resolver::resolve(self, handle))
    }
}

/// Resolver that asks the factory contract
#[async_trait::async_trait]
impl AddressResolver for Box<dyn AddressResolver> {
    async fn resolve(&self, handle: &str) -> ProviderResult<Address> {
        (**self).resolve(handle).await
    }
}

#[derive(Clone, Debug)]
pub struct FactoryAddressResolver<F> {
    factory: F,
}

impl<F> FactoryAddressResolver<F> {
    /// Create a resolver backed by `factory`
    pub fn new(factory: F) -> Self {
        Self { factory }
    }
}

#[async_trait::async_trait]
impl<F: AccountFactory> AddressResolver for FactoryAddressResolver<F> {
    async fn resolve(&self, handle: &str) -> ProviderResult<Address> {
        self.factory.get_address(handle).await
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::{address, keccak256};

    use super::*;
    use crate::MockAccountFactory;

    #[tokio::test]
    async fn test_create2_resolver() {
        let resolver = Create2Resolver::new(
            address!("5FbDB2315678afecb367f032d93F642f64180aa3"),
            keccak256([0xde, 0xad, 0xbe, 0xef]),
        );
        let resolved = AddressResolver::resolve(&resolver, "osmannear").await.unwrap();
        assert_eq!(resolved, address!("362ed235b2b6fecfb66d573ac5b562df09f39f21"));
    }

    #[tokio::test]
    async fn test_boxed_resolver() {
        let resolver: Box<dyn AddressResolver> = Box::new(Create2Resolver::new(
            address!("5FbDB2315678afecb367f032d93F642f64180aa3"),
            keccak256([0xde, 0xad, 0xbe, 0xef]),
        ));
        assert_eq!(
            AddressResolver::resolve(&resolver, "osmannear").await.unwrap(),
            address!("362ed235b2b6fecfb66d573ac5b562df09f39f21")
        );
    }

    #[tokio::test]
    async fn test_factory_resolver() {
        let mut factory = MockAccountFactory::new();
        factory
            .expect_get_address()
            .withf(|handle| handle == "osmannear")
            .times(1)
            .returning(|_| Ok(address!("362ed235b2b6fecfb66d573ac5b562df09f39f21")));

        let resolver = FactoryAddressResolver::new(factory);
        assert_eq!(
            resolver.resolve("osmannear").await.unwrap(),
            address!("362ed235b2b6fecfb66d573ac5b562df09f39f21")
        );
    }
}
