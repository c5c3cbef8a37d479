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

//! Logging of errors where they are propagated

use std::fmt::{Debug, Display};

/// Logs the error of a result on its way up, leaving the result untouched
pub trait LogOnError: Sized {
    /// Log at error level with `context` as the message
    fn log_on_error<C: Display>(self, context: C) -> Self;
}

impl<T, E: Debug> LogOnError for Result<T, E> {
    fn log_on_error<C: Display>(self, context: C) -> Self {
        self.inspect_err(|error| tracing::error!(?error, "{context}"))
    }
}
