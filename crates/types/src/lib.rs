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

#![warn(missing_docs, unreachable_pub)]
#![deny(unused_must_use, rust_2018_idioms)]
#![doc(test(
    no_crate_inject,
    attr(deny(warnings, rust_2018_idioms), allow(dead_code, unused_variables))
))]

//! Reclaim Wallet common types
//!
//! Pure encoders for the account-abstraction provisioning flow: packed gas
//! fields, the Reclaim proof codec, the authorization tag, user operations and
//! counterfactual addresses. Nothing in this crate performs network calls.

mod address;
pub use address::Create2Resolver;

pub mod authorization;
pub use authorization::{encode_authorization, Authorization, AuthorizationKind};

pub mod chain;

mod error;
pub use error::EncodingError;

mod gas;
pub use gas::GasPair;

pub mod proof;
pub use proof::Proof;

mod user_operation;
pub use user_operation::{
    creation_call_data, init_code, ProofPlacement, SealedUserOperation, UserOperation,
    UserOperationBuilder, UserOperationId, UserOperationRequiredFields,
};
