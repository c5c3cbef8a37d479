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

use alloy_primitives::{Address, Bytes, B256, U256};
use parse_display::Display;
use reclaim_wallet_provider::SubmissionReceipt;
use reclaim_wallet_types::{Proof, ProofPlacement};

/// Stages of a provisioning attempt, in order
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq)]
#[display(style = "snake_case")]
pub enum ProvisioningState {
    /// Counterfactual address known
    Resolved,
    /// Prepaid deposit added for the sender
    Funded,
    /// Operation assembled and authorized
    Built,
    /// Operation hash computed
    Hashed,
    /// Handed to the entry point
    Submitted,
    /// Code present at the sender
    Confirmed,
    /// Terminal failure
    Failed,
}

/// Everything needed to provision one account
#[derive(Clone, Debug)]
pub struct ProvisionRequest {
    /// Platform handle seeding the account address
    pub handle: String,
    /// Owner passed to the factory
    pub owner: Address,
    /// Reclaim proof authorizing the creation
    pub proof: Proof,
    /// Where the factory expects the proof
    pub placement: ProofPlacement,
    /// Deposit added for the sender before submission, skipped if `None` or zero
    pub prefund: Option<U256>,
    /// Call executed by the new account, usually empty
    pub call_data: Bytes,
    /// Fee recipient, the provisioner's default if `None`
    pub beneficiary: Option<Address>,
    /// Bound on waiting for the submission to be included
    pub deadline: Option<Duration>,
}

impl ProvisionRequest {
    /// Request with default placement, no prefund, no call and no deadline
    pub fn new(handle: impl Into<String>, owner: Address, proof: Proof) -> Self {
        Self {
            handle: handle.into(),
            owner,
            proof,
            placement: ProofPlacement::default(),
            prefund: None,
            call_data: Bytes::new(),
            beneficiary: None,
            deadline: None,
        }
    }

    /// Set the prefund amount
    pub fn with_prefund(mut self, prefund: U256) -> Self {
        self.prefund = Some(prefund);
        self
    }

    /// Set the proof placement
    pub fn with_placement(mut self, placement: ProofPlacement) -> Self {
        self.placement = placement;
        self
    }

    /// Set the confirmation deadline
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Set the fee recipient
    pub fn with_beneficiary(mut self, beneficiary: Address) -> Self {
        self.beneficiary = Some(beneficiary);
        self
    }
}

/// Outcome of a confirmed provisioning attempt
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProvisionReport {
    /// Handle that was provisioned
    pub handle: String,
    /// Address of the deployed account
    pub sender: Address,
    /// Nonce the operation was built with
    pub nonce: U256,
    /// Hash of the submitted operation
    pub user_op_hash: B256,
    /// Inclusion of the prefund deposit, if any
    pub deposit: Option<SubmissionReceipt>,
    /// Inclusion of the operation. `None` when the call reported an error but
    /// the account was deployed anyway.
    pub receipt: Option<SubmissionReceipt>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_display() {
        assert_eq!(ProvisioningState::Resolved.to_string(), "resolved");
        assert_eq!(ProvisioningState::Submitted.to_string(), "submitted");
    }
}
