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
use alloy_provider::Provider as AlloyProvider;
use reclaim_wallet_contracts::factory::IDiscordAccountFactory::IDiscordAccountFactoryInstance;
use tracing::instrument;

use crate::{AccountFactory, ProviderResult};

/// Account factory reads through an alloy provider
#[derive(Clone)]
pub struct AlloyAccountFactory<AP> {
    factory: IDiscordAccountFactoryInstance<AP>,
}

impl<AP> AlloyAccountFactory<AP>
where
    AP: AlloyProvider,
{
    /// Create a new `AlloyAccountFactory` for the contract at `address`
    pub fn new(address: Address, provider: AP) -> Self {
        Self {
            factory: IDiscordAccountFactoryInstance::new(address, provider),
        }
    }
}

#[async_trait::async_trait]
impl<AP> AccountFactory for AlloyAccountFactory<AP>
where
    AP: AlloyProvider,
{
    fn address(&self) -> Address {
        *self.factory.address()
    }

    #[instrument(skip(self))]
    async fn get_address(&self, handle: &str) -> ProviderResult<Address> {
        Ok(self.factory.getAddress(handle.to_string()).call().await?)
    }
}
