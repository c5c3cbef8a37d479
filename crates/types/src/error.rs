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

use alloy_primitives::U256;

/// Errors raised while building or encoding values for the entry point.
///
/// These are detected locally and are never sent to the ledger.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum EncodingError {
    /// A numeric field does not fit in its bit-width budget
    #[error("{field} value {value} exceeds {bits} bits")]
    ValueOutOfRange {
        /// Name of the offending field
        field: &'static str,
        /// The rejected value
        value: U256,
        /// Width of the field in bits
        bits: u32,
    },
    /// A structured value does not match the tuple schema the entry point expects
    #[error("encoding mismatch: {0}")]
    EncodingMismatch(String),
}

impl EncodingError {
    pub(crate) fn mismatch(msg: impl Into<String>) -> Self {
        Self::EncodingMismatch(msg.into())
    }
}
