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

//! Provisioning of proof-gated smart accounts.
//!
//! A [`Provisioner`] takes a handle, an owner and a Reclaim proof through
//! resolution, optional prefunding, construction, hashing and submission to
//! the entry point, and reports whether the account ended up deployed.

mod error;
pub use error::{ProvisioningError, ProvisioningResult};

mod provisioner;
pub use provisioner::{Provisioner, Settings, DEFAULT_PREFUND};

mod request;
pub use request::{ProvisionReport, ProvisionRequest, ProvisioningState};
