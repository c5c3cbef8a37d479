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

#![warn(unreachable_pub)]
#![deny(unused_must_use, rust_2018_idioms)]

//! Generated contract interfaces
//!
//! Only the subsets of the on-chain ABIs that the provisioning flow touches are
//! declared here. Field order in every struct is part of the wire format.

#![allow(non_snake_case)]
#![allow(clippy::all)]
#![allow(missing_docs)]

pub mod factory;
pub mod reclaim;
pub mod v0_7;
