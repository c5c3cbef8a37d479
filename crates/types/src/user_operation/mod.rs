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

use alloy_primitives::{keccak256, Address, Bytes, B256, U256};
use alloy_sol_types::SolValue;
use reclaim_wallet_contracts::v0_7::PackedUserOperation;

mod builder;
pub use builder::{UserOperationBuilder, UserOperationRequiredFields};

mod factory;
pub use factory::{creation_call_data, init_code, ProofPlacement};

use crate::GasPair;

/// Unique identifier for a user operation from a given sender
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct UserOperationId {
    /// sender of user operation
    pub sender: Address,
    /// nonce of user operation
    pub nonce: U256,
}

/// User Operation for Entry Point v0.7
///
/// Gas fields are kept as [`GasPair`] so they can only be constructed in range.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct UserOperation {
    /// Account the operation is executed for
    pub sender: Address,
    /// Anti-replay nonce, `key || sequence`
    pub nonce: U256,
    /// `factory || creation calldata`, empty once the account exists
    pub init_code: Bytes,
    /// Call executed by the account
    pub call_data: Bytes,
    /// `verificationGasLimit || callGasLimit`
    pub account_gas_limits: GasPair,
    /// Gas paid to the bundler for overhead not metered by the entry point
    pub pre_verification_gas: U256,
    /// `maxPriorityFeePerGas || maxFeePerGas`
    pub gas_fees: GasPair,
    /// `paymaster || gas limits || data`, empty when self sponsored
    pub paymaster_and_data: Bytes,
    /// Authorization payload
    pub signature: Bytes,
}

impl UserOperation {
    /// Get the user operation id
    pub fn id(&self) -> UserOperationId {
        UserOperationId {
            sender: self.sender,
            nonce: self.nonce,
        }
    }

    /// Factory named by the init code, if any
    pub fn factory(&self) -> Option<Address> {
        (self.init_code.len() >= 20).then(|| Address::from_slice(&self.init_code[..20]))
    }

    /// Returns the verification gas limit
    pub fn verification_gas_limit(&self) -> u128 {
        self.account_gas_limits.high()
    }

    /// Returns the call gas limit
    pub fn call_gas_limit(&self) -> u128 {
        self.account_gas_limits.low()
    }

    /// Returns the max priority fee per gas
    pub fn max_priority_fee_per_gas(&self) -> u128 {
        self.gas_fees.high()
    }

    /// Returns the max fee per gas
    pub fn max_fee_per_gas(&self) -> u128 {
        self.gas_fees.low()
    }

    /// Returns the maximum cost, in wei, of this user operation, excluding paymaster gas
    pub fn max_gas_cost(&self) -> U256 {
        U256::from(self.max_fee_per_gas())
            * (self.pre_verification_gas + self.account_gas_limits.total())
    }

    /// Convert to the on-chain representation
    pub fn pack(&self) -> PackedUserOperation {
        PackedUserOperation {
            sender: self.sender,
            nonce: self.nonce,
            initCode: self.init_code.clone(),
            callData: self.call_data.clone(),
            accountGasLimits: self.account_gas_limits.pack(),
            preVerificationGas: self.pre_verification_gas,
            gasFees: self.gas_fees.pack(),
            paymasterAndData: self.paymaster_and_data.clone(),
            signature: self.signature.clone(),
        }
    }

    /// Convert from the on-chain representation
    pub fn from_packed(packed: PackedUserOperation) -> Self {
        Self {
            sender: packed.sender,
            nonce: packed.nonce,
            init_code: packed.initCode,
            call_data: packed.callData,
            account_gas_limits: GasPair::unpack(packed.accountGasLimits),
            pre_verification_gas: packed.preVerificationGas,
            gas_fees: GasPair::unpack(packed.gasFees),
            paymaster_and_data: packed.paymasterAndData,
            signature: packed.signature,
        }
    }

    /// Hash a user operation with the given entry point and chain ID.
    ///
    /// The hash is used to uniquely identify a user operation in the entry point.
    /// It does not include the signature field.
    pub fn hash(&self, entry_point: Address, chain_id: u64) -> B256 {
        let inner = (
            self.sender,
            self.nonce,
            keccak256(&self.init_code),
            keccak256(&self.call_data),
            self.account_gas_limits.pack(),
            self.pre_verification_gas,
            self.gas_fees.pack(),
            keccak256(&self.paymaster_and_data),
        )
            .abi_encode();

        keccak256((keccak256(inner), entry_point, U256::from(chain_id)).abi_encode())
    }

    /// ABI encoding of the packed operation as a single tuple
    pub fn abi_encode(&self) -> Bytes {
        SolValue::abi_encode(&self.pack()).into()
    }

    /// Freeze the operation, binding its hash to an entry point and chain
    pub fn seal(self, entry_point: Address, chain_id: u64) -> SealedUserOperation {
        let hash = self.hash(entry_point, chain_id);
        SealedUserOperation {
            op: self,
            hash,
            entry_point,
            chain_id,
        }
    }
}

impl From<PackedUserOperation> for UserOperation {
    fn from(packed: PackedUserOperation) -> Self {
        Self::from_packed(packed)
    }
}

/// A hashed user operation.
///
/// Immutable: the hash always matches the contents.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct SealedUserOperation {
    op: UserOperation,
    hash: B256,
    entry_point: Address,
    chain_id: u64,
}

impl SealedUserOperation {
    /// The operation
    pub fn op(&self) -> &UserOperation {
        &self.op
    }

    /// Hash under [`Self::entry_point`] and [`Self::chain_id`]
    pub fn hash(&self) -> B256 {
        self.hash
    }

    /// Entry point the hash is bound to
    pub fn entry_point(&self) -> Address {
        self.entry_point
    }

    /// Chain the hash is bound to
    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// Give up the seal
    pub fn into_inner(self) -> UserOperation {
        self.op
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::{address, b256, bytes};

    use super::*;
    use crate::chain::ENTRY_POINT_ADDRESS_V0_7;

    fn base_op() -> UserOperation {
        UserOperation {
            sender: address!("1306b01bc3e4ad202612d3843387e94737673f53"),
            nonce: U256::ZERO,
            init_code: Bytes::new(),
            call_data: Bytes::new(),
            account_gas_limits: GasPair::account_gas_limits(750_000, 750_000),
            pre_verification_gas: U256::from(55_000),
            gas_fees: GasPair::gas_fees(1_000_664, 1_000),
            paymaster_and_data: Bytes::new(),
            signature: Bytes::new(),
        }
    }

    #[test]
    fn test_hash_zeroed_fields() {
        let op = base_op();
        assert_eq!(
            op.hash(ENTRY_POINT_ADDRESS_V0_7, 1337),
            b256!("8499bf6039fc807e2f3ec9b9e71b02339aa34ef872725014d193c42803dcaaf0")
        );
    }

    #[test]
    fn test_hash() {
        let op = UserOperation {
            init_code: bytes!("6942069420694206942069420694206942069420"),
            call_data: bytes!("0000000000000000000000000000000000000000080085"),
            ..base_op()
        };
        assert_eq!(
            op.hash(ENTRY_POINT_ADDRESS_V0_7, 84532),
            b256!("fac396e08199ca0c583d7cbc5da7d17a39d332fc84a99f000bf6195d013079e6")
        );
    }

    #[test]
    fn test_hash_ignores_signature() {
        let op = base_op();
        let signed = UserOperation {
            signature: bytes!("03aabb"),
            ..op.clone()
        };
        assert_eq!(
            op.hash(ENTRY_POINT_ADDRESS_V0_7, 1337),
            signed.hash(ENTRY_POINT_ADDRESS_V0_7, 1337)
        );
    }

    #[test]
    fn test_hash_sensitivity() {
        let op = base_op();
        let ep = ENTRY_POINT_ADDRESS_V0_7;
        let hash = op.hash(ep, 1337);
        assert_eq!(hash, op.hash(ep, 1337));

        let variants = [
            UserOperation {
                nonce: U256::from(1),
                ..op.clone()
            },
            UserOperation {
                call_data: bytes!("00"),
                ..op.clone()
            },
            UserOperation {
                account_gas_limits: GasPair::account_gas_limits(750_000, 750_001),
                ..op.clone()
            },
            UserOperation {
                pre_verification_gas: U256::from(55_001),
                ..op.clone()
            },
            UserOperation {
                gas_fees: GasPair::gas_fees(1_000, 1_000_664),
                ..op.clone()
            },
            UserOperation {
                paymaster_and_data: bytes!("01"),
                ..op.clone()
            },
        ];
        for variant in variants {
            assert_ne!(variant.hash(ep, 1337), hash);
        }
        assert_ne!(op.hash(ep, 1), hash);
        assert_ne!(op.hash(Address::ZERO, 1337), hash);
    }

    #[test]
    fn test_pack_unpack() {
        let op = UserOperation {
            init_code: bytes!("6942069420694206942069420694206942069420"),
            signature: bytes!("03"),
            ..base_op()
        };
        let packed = op.pack();
        assert_eq!(
            packed.accountGasLimits,
            b256!("000000000000000000000000000b71b0000000000000000000000000000b71b0")
        );
        assert_eq!(UserOperation::from(packed), op);
    }

    #[test]
    fn test_factory_and_gas_getters() {
        let op = UserOperation {
            init_code: bytes!("6942069420694206942069420694206942069420aabb"),
            ..base_op()
        };
        assert_eq!(
            op.factory(),
            Some(address!("6942069420694206942069420694206942069420"))
        );
        assert_eq!(base_op().factory(), None);
        assert_eq!(op.max_priority_fee_per_gas(), 1_000_664);
        assert_eq!(op.max_fee_per_gas(), 1_000);
        assert_eq!(
            op.max_gas_cost(),
            U256::from(1_000) * U256::from(55_000 + 750_000 + 750_000)
        );
    }

    #[test]
    fn test_abi_encode_layout() {
        let encoded = base_op().abi_encode();
        // outer offset, then nine head words, then four empty dynamic fields
        assert_eq!(encoded.len(), 32 + 9 * 32 + 4 * 32);
        assert_eq!(U256::from_be_slice(&encoded[..32]), U256::from(32));
        assert_eq!(
            &encoded[32 + 12..64],
            address!("1306b01bc3e4ad202612d3843387e94737673f53").as_slice()
        );
    }

    #[test]
    fn test_seal() {
        let op = base_op();
        let sealed = op.clone().seal(ENTRY_POINT_ADDRESS_V0_7, 1337);
        assert_eq!(sealed.hash(), op.hash(ENTRY_POINT_ADDRESS_V0_7, 1337));
        assert_eq!(sealed.chain_id(), 1337);
        assert_eq!(sealed.entry_point(), ENTRY_POINT_ADDRESS_V0_7);
        assert_eq!(sealed.op().id(), op.id());
        assert_eq!(sealed.into_inner(), op);
    }
}
