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

// The factory exposes `createAccount` as an overload pair. Each overload is
// declared in its own interface so the generated call types stay unambiguous.

use alloy_sol_macro::sol;

sol!(
    /// Factory entry points used when the proof is verified at creation time.
    #[allow(missing_docs)]
    #[sol(rpc)]
    interface IDiscordAccountFactory {
        function createAccount(
            address owner,
            string calldata username,
            bytes calldata proof
        ) external returns (address account);

        function getAddress(string calldata username) external view returns (address);
    }

    /// Factory entry point used when proof verification is deferred to the
    /// operation's signature field.
    #[allow(missing_docs)]
    #[sol(rpc)]
    interface IDiscordAccountFactoryDeferred {
        function createAccount(
            address owner,
            string calldata username
        ) external returns (address account);
    }
);
