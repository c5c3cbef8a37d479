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

use alloy_primitives::{Address, Bytes};
use alloy_sol_types::SolCall;
use parse_display::{Display, FromStr};
use reclaim_wallet_contracts::factory::{IDiscordAccountFactory, IDiscordAccountFactoryDeferred};
use serde::{Deserialize, Serialize};

use crate::{proof::encode_proof, Proof};

/// Where the proof is checked during account creation.
///
/// The signature always carries the tagged proof. With
/// [`ProofPlacement::CreationAndSignature`] the factory also receives it and
/// verifies it before deploying.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Display, FromStr, Serialize, Deserialize,
)]
#[display(style = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ProofPlacement {
    /// `createAccount(owner, handle, proof)`, proof also in the signature
    #[default]
    CreationAndSignature,
    /// `createAccount(owner, handle)`, proof only in the signature
    SignatureOnly,
}

impl ProofPlacement {
    /// Creation calldata for this placement
    pub fn creation_call_data(&self, owner: Address, handle: &str, proof: &Proof) -> Bytes {
        match self {
            Self::CreationAndSignature => creation_call_data(owner, handle, Some(proof)),
            Self::SignatureOnly => creation_call_data(owner, handle, None),
        }
    }
}

/// `factory || creation_call_data`
pub fn init_code(factory: Address, creation_call_data: &[u8]) -> Bytes {
    let mut out = Vec::with_capacity(20 + creation_call_data.len());
    out.extend_from_slice(factory.as_slice());
    out.extend_from_slice(creation_call_data);
    out.into()
}

/// Calldata for the factory's `createAccount`.
///
/// With a proof the three argument overload is used and the proof is passed
/// as its canonical encoding, untagged.
pub fn creation_call_data(owner: Address, handle: &str, proof: Option<&Proof>) -> Bytes {
    match proof {
        Some(proof) => IDiscordAccountFactory::createAccountCall {
            owner,
            username: handle.to_string(),
            proof: encode_proof(proof),
        }
        .abi_encode()
        .into(),
        None => IDiscordAccountFactoryDeferred::createAccountCall {
            owner,
            username: handle.to_string(),
        }
        .abi_encode()
        .into(),
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::address;

    use super::*;
    use crate::proof::{decode_proof, test_utils::mock_proof};

    #[test]
    fn test_init_code() {
        let factory = address!("5FbDB2315678afecb367f032d93F642f64180aa3");
        let code = init_code(factory, &[1, 2, 3]);
        assert_eq!(&code[..20], factory.as_slice());
        assert_eq!(&code[20..], &[1, 2, 3]);
    }

    #[test]
    fn test_creation_with_proof() {
        let owner = address!("38040bf589011639ee17e7abed20551099a0687a");
        let proof = mock_proof();
        let data = creation_call_data(owner, "osmannear", Some(&proof));
        assert_eq!(&data[..4], &IDiscordAccountFactory::createAccountCall::SELECTOR);

        let call = IDiscordAccountFactory::createAccountCall::abi_decode(&data).unwrap();
        assert_eq!(call.owner, owner);
        assert_eq!(call.username, "osmannear");
        assert_eq!(decode_proof(&call.proof).unwrap(), proof);
    }

    #[test]
    fn test_creation_deferred() {
        let owner = address!("38040bf589011639ee17e7abed20551099a0687a");
        let data =
            ProofPlacement::SignatureOnly.creation_call_data(owner, "osmannear", &mock_proof());
        assert_eq!(
            &data[..4],
            &IDiscordAccountFactoryDeferred::createAccountCall::SELECTOR
        );
        assert_ne!(
            IDiscordAccountFactoryDeferred::createAccountCall::SELECTOR,
            IDiscordAccountFactory::createAccountCall::SELECTOR
        );

        let call = IDiscordAccountFactoryDeferred::createAccountCall::abi_decode(&data).unwrap();
        assert_eq!(call.username, "osmannear");
    }

    #[test]
    fn test_placement_parse() {
        for placement in [
            ProofPlacement::CreationAndSignature,
            ProofPlacement::SignatureOnly,
        ] {
            assert_eq!(placement.to_string().parse::<ProofPlacement>().unwrap(), placement);
        }
        assert_eq!(ProofPlacement::SignatureOnly.to_string(), "signature_only");
        assert!("nowhere".parse::<ProofPlacement>().is_err());
    }
}
