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

//! Network identity and contract addresses

use alloy_primitives::{address, Address, B256};
use serde::{Deserialize, Serialize};

use crate::Create2Resolver;

/// Canonical v0.7 entry point, deployed at the same address on every network
pub const ENTRY_POINT_ADDRESS_V0_7: Address = address!("0000000071727De22E5E9d8BAf0edAc6f37da032");

/// Network identity and the contract addresses the provisioning flow talks to
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ChainSpec {
    /// name for logging purposes, e.g. "Base Sepolia", no logic is performed on this
    pub name: String,
    /// chain id
    pub id: u64,
    /// entry point address
    pub entry_point_address: Address,
    /// Reclaim proof verifier, zero when the network has none
    pub reclaim_address: Address,
    /// account factory
    pub factory_address: Address,
    /// keccak256 of the account proxy creation code, used for offline address resolution
    pub account_init_code_hash: B256,
}

impl ChainSpec {
    /// Offline resolver for this network's factory
    pub fn create2_resolver(&self) -> Create2Resolver {
        Create2Resolver::new(self.factory_address, self.account_init_code_hash)
    }

    /// True if a proof verifier is known on this network
    pub fn has_reclaim_verifier(&self) -> bool {
        !self.reclaim_address.is_zero()
    }
}

impl Default for ChainSpec {
    fn default() -> Self {
        Self {
            name: "Unknown".to_string(),
            id: 0,
            entry_point_address: ENTRY_POINT_ADDRESS_V0_7,
            reclaim_address: Address::ZERO,
            factory_address: Address::ZERO,
            account_init_code_hash: B256::ZERO,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_deserialize() {
        let spec: ChainSpec = serde_json::from_str(r#"{"name":"Local","id":31337}"#).unwrap();
        assert_eq!(spec.id, 31337);
        assert_eq!(spec.entry_point_address, ENTRY_POINT_ADDRESS_V0_7);
        assert!(!spec.has_reclaim_verifier());
    }
}
