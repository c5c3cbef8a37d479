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

use alloy_primitives::{Address, Bytes};
use reclaim_wallet_provider::ProviderError;
use reclaim_wallet_types::EncodingError;

/// Result of a provisioning step
pub type ProvisioningResult<T> = Result<T, ProvisioningError>;

/// Terminal failure of a provisioning attempt
#[derive(Debug, thiserror::Error)]
pub enum ProvisioningError {
    /// A value could not be encoded, nothing was sent
    #[error(transparent)]
    Encoding(#[from] EncodingError),
    /// The counterfactual address already holds code
    #[error("account {0} is already provisioned")]
    AlreadyProvisioned(Address),
    /// The entry point, or the proof verifier, refused the operation
    #[error("submission for {sender} rejected: {reason}")]
    SubmissionRejected {
        /// Sender of the rejected operation
        sender: Address,
        /// Reason as reported by the execution environment
        reason: String,
        /// Raw revert data, when the rejection carried some
        revert_data: Option<Bytes>,
    },
    /// The deadline elapsed before the submission was confirmed
    #[error("no confirmation for {sender} within {deadline:?}")]
    ConfirmationTimeout {
        /// Sender being provisioned
        sender: Address,
        /// The deadline that elapsed
        deadline: Duration,
    },
    /// Ledger access failed
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

impl ProvisioningError {
    pub(crate) fn rejected(sender: Address, reason: impl Into<String>) -> Self {
        Self::SubmissionRejected {
            sender,
            reason: reason.into(),
            revert_data: None,
        }
    }

    /// Structural errors that retrying cannot fix
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Encoding(_))
    }

    /// The attempt may still confirm, poll code presence again later
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::ConfirmationTimeout { .. })
    }

    /// Short label for metrics
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Encoding(EncodingError::ValueOutOfRange { .. }) => "value_out_of_range",
            Self::Encoding(EncodingError::EncodingMismatch(_)) => "encoding_mismatch",
            Self::AlreadyProvisioned(_) => "already_provisioned",
            Self::SubmissionRejected { .. } => "submission_rejected",
            Self::ConfirmationTimeout { .. } => "confirmation_timeout",
            Self::Provider(_) => "provider",
        }
    }
}
