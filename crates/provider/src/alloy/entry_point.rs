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
use alloy_provider::Provider as AlloyProvider;
use alloy_rpc_types_eth::TransactionReceipt;
use alloy_sol_types::SolInterface;
use reclaim_wallet_contracts::v0_7::{
    IEntryPoint::{FailedOp, FailedOpWithRevert, IEntryPointErrors, IEntryPointInstance},
    PackedUserOperation,
};
use tracing::instrument;

use crate::{EntryPoint, HandleOpsOut, ProviderError, ProviderResult, SubmissionReceipt};

/// Entry point provider for v0.7
#[derive(Clone)]
pub struct AlloyEntryPoint<AP> {
    i_entry_point: IEntryPointInstance<AP>,
}

impl<AP> AlloyEntryPoint<AP>
where
    AP: AlloyProvider,
{
    /// Create a new `AlloyEntryPoint` for the contract at `address`
    pub fn new(address: Address, provider: AP) -> Self {
        Self {
            i_entry_point: IEntryPointInstance::new(address, provider),
        }
    }
}

#[async_trait::async_trait]
impl<AP> EntryPoint for AlloyEntryPoint<AP>
where
    AP: AlloyProvider,
{
    fn address(&self) -> Address {
        *self.i_entry_point.address()
    }

    #[instrument(skip_all, fields(ops = ops.len()))]
    async fn handle_ops(
        &self,
        ops: Vec<PackedUserOperation>,
        beneficiary: Address,
    ) -> ProviderResult<HandleOpsOut> {
        let pending = match self.i_entry_point.handleOps(ops, beneficiary).send().await {
            Ok(pending) => pending,
            Err(err) => {
                // a revert during gas estimation is an entry point rejection
                return match err.as_revert_data() {
                    Some(revert_data) => Ok(decode_handle_ops_revert(&revert_data)),
                    None => Err(err.into()),
                };
            }
        };

        tracing::debug!("handle ops sent: {:?}", pending.tx_hash());
        let receipt = pending.get_receipt().await?;
        if receipt.status() {
            Ok(HandleOpsOut::Success(submission_receipt(&receipt)))
        } else {
            Ok(HandleOpsOut::TransactionReverted(receipt.transaction_hash))
        }
    }

    #[instrument(skip_all)]
    async fn get_user_op_hash(&self, op: PackedUserOperation) -> ProviderResult<B256> {
        Ok(self.i_entry_point.getUserOpHash(op).call().await?)
    }

    #[instrument(skip_all)]
    async fn get_nonce(&self, sender: Address, key: U192) -> ProviderResult<U256> {
        Ok(self.i_entry_point.getNonce(sender, key).call().await?)
    }

    #[instrument(skip_all)]
    async fn deposit_to(
        &self,
        account: Address,
        amount: U256,
    ) -> ProviderResult<SubmissionReceipt> {
        let receipt = self
            .i_entry_point
            .depositTo(account)
            .value(amount)
            .send()
            .await?
            .get_receipt()
            .await?;

        if !receipt.status() {
            return Err(ProviderError::TransactionReverted(receipt.transaction_hash));
        }
        Ok(submission_receipt(&receipt))
    }

    #[instrument(skip_all)]
    async fn balance_of(&self, account: Address) -> ProviderResult<U256> {
        Ok(self.i_entry_point.balanceOf(account).call().await?)
    }
}

fn submission_receipt(receipt: &TransactionReceipt) -> SubmissionReceipt {
    SubmissionReceipt {
        tx_hash: receipt.transaction_hash,
        block_number: receipt.block_number,
        gas_used: receipt.gas_used,
    }
}

/// Decode the revert data of a failed `handleOps` call
pub fn decode_handle_ops_revert(revert_data: &Bytes) -> HandleOpsOut {
    match IEntryPointErrors::abi_decode(revert_data) {
        Ok(IEntryPointErrors::FailedOp(FailedOp { opIndex, reason })) => {
            HandleOpsOut::FailedOp(
                opIndex.try_into().unwrap_or(usize::MAX),
                reason,
                revert_data.clone(),
            )
        }
        Ok(IEntryPointErrors::FailedOpWithRevert(FailedOpWithRevert {
            opIndex,
            reason,
            inner,
        })) => HandleOpsOut::FailedOp(
            opIndex.try_into().unwrap_or(usize::MAX),
            format!("{}:{}", reason, inner),
            revert_data.clone(),
        ),
        Ok(IEntryPointErrors::SignatureValidationFailed(failure)) => {
            HandleOpsOut::SignatureValidationFailed(failure.aggregator, revert_data.clone())
        }
        Err(_) => HandleOpsOut::Revert(revert_data.clone()),
    }
}
