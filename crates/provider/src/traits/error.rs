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

use alloy_primitives::B256;
use alloy_provider::PendingTransactionError;
use alloy_transport::TransportError;

/// Result of a provider method call
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Error enumeration for the provider traits
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// RPC error
    #[error(transparent)]
    RPC(#[from] TransportError),
    /// Contract error that is not a revert
    #[error("Contract Error: {0}")]
    ContractError(String),
    /// A mined transaction reverted
    #[error("transaction {0} reverted")]
    TransactionReverted(B256),
    /// Waiting for a pending transaction failed
    #[error(transparent)]
    PendingTransaction(#[from] PendingTransactionError),
    /// Internal errors
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<alloy_contract::Error> for ProviderError {
    fn from(err: alloy_contract::Error) -> Self {
        match err {
            alloy_contract::Error::TransportError(e) => ProviderError::RPC(e),
            alloy_contract::Error::PendingTransactionError(e) => {
                ProviderError::PendingTransaction(e)
            }
            _ => ProviderError::ContractError(err.to_string()),
        }
    }
}
