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

use alloy_primitives::{keccak256, Address, B256};

/// Offline counterfactual address derivation.
///
/// Mirrors the factory's CREATE2 deployment: the salt is `keccak256(handle)`
/// and the init code hash is that of the account proxy creation code. The
/// result depends only on the factory, the handle and the init code hash.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Create2Resolver {
    factory: Address,
    init_code_hash: B256,
}

impl Create2Resolver {
    /// Create a resolver for `factory`
    pub const fn new(factory: Address, init_code_hash: B256) -> Self {
        Self {
            factory,
            init_code_hash,
        }
    }

    /// The factory this resolver derives addresses for
    pub const fn factory(&self) -> Address {
        self.factory
    }

    /// CREATE2 salt for a handle
    pub fn salt(handle: &str) -> B256 {
        keccak256(handle.as_bytes())
    }

    /// The address the factory deploys the account for `handle` at
    pub fn resolve(&self, handle: &str) -> Address {
        self.factory.create2(Self::salt(handle), self.init_code_hash)
    }
}
