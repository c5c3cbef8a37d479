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

use super::error::ProviderResult;

/// Read access to the account factory
#[cfg_attr(feature = "test-utils", automock)]
#[async_trait::async_trait]
pub trait AccountFactory: Send + Sync {
    /// Address of the factory contract
    fn address(&self) -> Address;

    /// The address the factory assigns to `handle`
    async fn get_address(&self, handle: &str) -> ProviderResult<Address>;
}
