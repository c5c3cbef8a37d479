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

use alloy_primitives::{aliases::U192, Address, Bytes, B256, U256};
#[cfg(feature = "test-utils")]
use mockall::automock;
use reclaim_wallet_contracts::v0_7::PackedUserOperation;

use super::error::ProviderResult;

/// Inclusion details of a mined transaction
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SubmissionReceipt {
    /// Transaction hash
    pub tx_hash: B256,
    /// Block the transaction was included in
    pub block_number: Option<u64>,
    /// Gas used by the transaction
    pub gas_used: u64,
}

/// Result of an entry point handle ops call
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HandleOpsOut {
    /// Transaction was mined and succeeded
    Success(SubmissionReceipt),
    /// Call failed due to a failed operation at index `usize` with reason `String`,
    /// the raw revert data last
    FailedOp(usize, String, Bytes),
    /// Call failed due to a signature validation failure for the aggregator,
    /// the raw revert data last
    SignatureValidationFailed(Address, Bytes),
    /// Call reverted with data that is not an entry point error
    Revert(Bytes),
    /// Transaction was mined but reverted
    TransactionReverted(B256),
}

impl HandleOpsOut {
    /// True if the batch was included successfully
    pub fn is_success(&self) -> bool {
        matches!(self, HandleOpsOut::Success(_))
    }
}

/// Trait for interacting with an entry point contract.
///
/// Implemented for the v0.7 version of the entry point contract.
/// [Contracts can be found here](https://github.com/eth-infinitism/account-abstraction/tree/releases/v0.7).
#[cfg_attr(feature = "test-utils", automock)]
#[async_trait::async_trait]
pub trait EntryPoint: Send + Sync {
    /// Get the address of the entry point contract
    fn address(&self) -> Address;

    /// Submit a batch of operations through `handleOps` and wait for inclusion
    async fn handle_ops(
        &self,
        ops: Vec<PackedUserOperation>,
        beneficiary: Address,
    ) -> ProviderResult<HandleOpsOut>;

    /// The entry point's own hash of an operation
    async fn get_user_op_hash(&self, op: PackedUserOperation) -> ProviderResult<B256>;

    /// Next nonce of `sender` for `key`
    async fn get_nonce(&self, sender: Address, key: U192) -> ProviderResult<U256>;

    /// Add to the prepaid deposit of `account` and wait for inclusion
    async fn deposit_to(&self, account: Address, amount: U256)
        -> ProviderResult<SubmissionReceipt>;

    /// Prepaid deposit of `account`
    async fn balance_of(&self, account: Address) -> ProviderResult<U256>;
}
