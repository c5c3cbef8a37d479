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

use alloy_primitives::{Address, Bytes, U256};

use super::{init_code, UserOperation};
use crate::{Authorization, EncodingError, GasPair};

/// Fields every user operation must set
#[derive(Debug, Clone, Default)]
pub struct UserOperationRequiredFields {
    /// sender
    pub sender: Address,
    /// nonce
    pub nonce: U256,
    /// call data
    pub call_data: Bytes,
    /// `verificationGasLimit || callGasLimit`
    pub account_gas_limits: GasPair,
    /// pre verification gas
    pub pre_verification_gas: U256,
    /// `maxPriorityFeePerGas || maxFeePerGas`
    pub gas_fees: GasPair,
    /// authorization payload
    pub signature: Bytes,
}

/// Builder for [`UserOperation`]
#[derive(Debug, Clone)]
pub struct UserOperationBuilder {
    required: UserOperationRequiredFields,
    init_code: Bytes,
    paymaster_and_data: Bytes,
}

impl UserOperationBuilder {
    /// Start from the required fields
    pub fn new(required: UserOperationRequiredFields) -> Self {
        Self {
            required,
            init_code: Bytes::new(),
            paymaster_and_data: Bytes::new(),
        }
    }

    /// Deploy the sender through `factory` with `creation_call_data`
    pub fn factory(mut self, factory: Address, creation_call_data: &[u8]) -> Self {
        self.init_code = init_code(factory, creation_call_data);
        self
    }

    /// Raw init code
    pub fn init_code(mut self, init_code: Bytes) -> Self {
        self.init_code = init_code;
        self
    }

    /// Raw paymaster and data
    pub fn paymaster_and_data(mut self, paymaster_and_data: Bytes) -> Self {
        self.paymaster_and_data = paymaster_and_data;
        self
    }

    /// Replace the signature with an encoded authorization
    pub fn authorization(mut self, authorization: &Authorization) -> Self {
        self.required.signature = authorization.encode();
        self
    }

    /// Set both gas limits from unchecked values
    pub fn try_account_gas_limits(
        mut self,
        verification_gas_limit: U256,
        call_gas_limit: U256,
    ) -> Result<Self, EncodingError> {
        self.required.account_gas_limits = GasPair::try_new(verification_gas_limit, call_gas_limit)
            .map_err(|e| rename_field(e, "verification_gas_limit", "call_gas_limit"))?;
        Ok(self)
    }

    /// Set both fee fields from unchecked values
    pub fn try_gas_fees(
        mut self,
        max_priority_fee_per_gas: U256,
        max_fee_per_gas: U256,
    ) -> Result<Self, EncodingError> {
        self.required.gas_fees = GasPair::try_new(max_priority_fee_per_gas, max_fee_per_gas)
            .map_err(|e| rename_field(e, "max_priority_fee_per_gas", "max_fee_per_gas"))?;
        Ok(self)
    }

    /// Build the operation
    pub fn build(self) -> UserOperation {
        let UserOperationRequiredFields {
            sender,
            nonce,
            call_data,
            account_gas_limits,
            pre_verification_gas,
            gas_fees,
            signature,
        } = self.required;

        UserOperation {
            sender,
            nonce,
            init_code: self.init_code,
            call_data,
            account_gas_limits,
            pre_verification_gas,
            gas_fees,
            paymaster_and_data: self.paymaster_and_data,
            signature,
        }
    }
}

fn rename_field(err: EncodingError, high: &'static str, low: &'static str) -> EncodingError {
    match err {
        EncodingError::ValueOutOfRange { field, value, bits } => EncodingError::ValueOutOfRange {
            field: if field == "high" { high } else { low },
            value,
            bits,
        },
        other => other,
    }
}
