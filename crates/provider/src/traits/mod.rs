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

//! Traits for the ledger boundary

mod error;
pub use error::{ProviderError, ProviderResult};

mod entry_point;
#[cfg(feature = "test-utils")]
pub use entry_point::MockEntryPoint;
pub use entry_point::{EntryPoint, HandleOpsOut, SubmissionReceipt};

mod evm;
#[cfg(feature = "test-utils")]
pub use evm::MockEvmProvider;
pub use evm::EvmProvider;

mod factory;
#[cfg(feature = "test-utils")]
pub use factory::MockAccountFactory;
pub use factory::AccountFactory;

mod resolver;
#[cfg(feature = "test-utils")]
pub use resolver::MockAddressResolver;
pub use resolver::{AddressResolver, FactoryAddressResolver};

mod verifier;
#[cfg(feature = "test-utils")]
pub use verifier::MockProofVerifier;
pub use verifier::{ProofVerification, ProofVerifier};
