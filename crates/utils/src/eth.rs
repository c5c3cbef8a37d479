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

//! Helpers for revert data and native currency amounts.

use alloy_primitives::{
    utils::{format_ether, parse_ether},
    Bytes, U256,
};
use alloy_sol_types::{Panic, Revert, SolError};
use anyhow::Context;

/// Parses the message of a plain `revert("message")`
pub fn parse_revert_message(revert_data: &[u8]) -> Option<String> {
    Revert::abi_decode(revert_data).ok().map(|err| err.reason)
}

/// Human readable description of raw revert data.
///
/// Falls back to hex when the data is neither a revert message nor a panic.
pub fn describe_revert(revert_data: &Bytes) -> String {
    if let Some(message) = parse_revert_message(revert_data) {
        return message;
    }
    if let Ok(panic) = Panic::abi_decode(revert_data) {
        return panic.to_string();
    }
    if revert_data.is_empty() {
        return "empty revert data".to_string();
    }
    revert_data.to_string()
}

/// Parse a decimal amount of native currency into wei, e.g. `0.0035`
pub fn parse_native(amount: &str) -> anyhow::Result<U256> {
    parse_ether(amount.trim()).with_context(|| format!("invalid native amount {amount}"))
}

/// Format wei as a decimal amount of native currency
pub fn format_native(wei: U256) -> String {
    format_ether(wei)
}

#[cfg(test)]
mod tests {
    use alloy_primitives::bytes;

    use super::*;

    #[test]
    fn test_parse_revert_message() {
        let data: Bytes = Revert::from("AA10 sender already constructed")
            .abi_encode()
            .into();
        assert_eq!(
            parse_revert_message(&data).as_deref(),
            Some("AA10 sender already constructed")
        );
        assert_eq!(describe_revert(&data), "AA10 sender already constructed");
        assert_eq!(parse_revert_message(&[0xde, 0xad]), None);
    }

    #[test]
    fn test_describe_unknown() {
        assert_eq!(describe_revert(&bytes!("deadbeef")), "0xdeadbeef");
        assert_eq!(describe_revert(&Bytes::new()), "empty revert data");
    }

    #[test]
    fn test_native_amounts() {
        let wei = parse_native("0.0035").unwrap();
        assert_eq!(wei, U256::from(3_500_000_000_000_000_u64));
        assert_eq!(format_native(wei), "0.003500000000000000");
        assert!(parse_native("lots").is_err());
    }
}
