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

use alloy_primitives::{B256, U256};

use crate::EncodingError;

/// Two 128-bit gas quantities packed into a single 256-bit word.
///
/// Used for both `accountGasLimits` (`verificationGasLimit || callGasLimit`)
/// and `gasFees` (`maxPriorityFeePerGas || maxFeePerGas`). The `high` value
/// occupies the upper 16 bytes, both halves big-endian.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct GasPair {
    high: u128,
    low: u128,
}

impl GasPair {
    /// Create a pair from values already known to fit in 128 bits
    pub const fn new(high: u128, low: u128) -> Self {
        Self { high, low }
    }

    /// Create a pair from arbitrary 256-bit values.
    ///
    /// Fails with [`EncodingError::ValueOutOfRange`] if either exceeds `2^128 - 1`.
    pub fn try_new(high: U256, low: U256) -> Result<Self, EncodingError> {
        Ok(Self {
            high: to_u128("high", high)?,
            low: to_u128("low", low)?,
        })
    }

    /// `accountGasLimits` layout
    pub const fn account_gas_limits(verification_gas_limit: u128, call_gas_limit: u128) -> Self {
        Self::new(verification_gas_limit, call_gas_limit)
    }

    /// `gasFees` layout
    pub const fn gas_fees(max_priority_fee_per_gas: u128, max_fee_per_gas: u128) -> Self {
        Self::new(max_priority_fee_per_gas, max_fee_per_gas)
    }

    /// The value stored in the upper 16 bytes
    pub const fn high(&self) -> u128 {
        self.high
    }

    /// The value stored in the lower 16 bytes
    pub const fn low(&self) -> u128 {
        self.low
    }

    /// Sum of both halves, widened so it cannot overflow
    pub fn total(&self) -> U256 {
        U256::from(self.high) + U256::from(self.low)
    }

    /// Pack into a 32-byte word
    pub fn pack(&self) -> B256 {
        let mut word = [0_u8; 32];
        word[..16].copy_from_slice(&self.high.to_be_bytes());
        word[16..].copy_from_slice(&self.low.to_be_bytes());
        B256::from(word)
    }

    /// Split a 32-byte word at byte 16. Every word is a valid pair.
    pub fn unpack(word: B256) -> Self {
        let mut high = [0_u8; 16];
        let mut low = [0_u8; 16];
        high.copy_from_slice(&word[..16]);
        low.copy_from_slice(&word[16..]);
        Self {
            high: u128::from_be_bytes(high),
            low: u128::from_be_bytes(low),
        }
    }
}

impl From<GasPair> for B256 {
    fn from(pair: GasPair) -> Self {
        pair.pack()
    }
}

impl From<B256> for GasPair {
    fn from(word: B256) -> Self {
        Self::unpack(word)
    }
}

fn to_u128(field: &'static str, value: U256) -> Result<u128, EncodingError> {
    u128::try_from(value).map_err(|_| EncodingError::ValueOutOfRange {
        field,
        value,
        bits: 128,
    })
}
