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

//! Reclaim proof values and their canonical tuple encoding.
//!
//! The verifier parses the proof by position, so the encoding is fixed to
//! `((provider, parameters, context), ((identifier, owner, timestampS, epoch), signatures[]))`.
//! The serde shape mirrors the JSON produced by the Reclaim SDK.

use alloy_primitives::{Address, Bytes, B256};
use alloy_sol_types::SolValue;
use reclaim_wallet_contracts::reclaim;
use serde::{Deserialize, Serialize};

use crate::EncodingError;

/// What was verified and how
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimInfo {
    /// Provider descriptor, e.g. `http`
    pub provider: String,
    /// Provider parameters, a JSON document
    pub parameters: String,
    /// Extraction context, a JSON document
    pub context: String,
}

/// The attested claim
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claim {
    /// Hash identifying the claim
    pub identifier: B256,
    /// Address the claim is bound to
    pub owner: Address,
    /// Issue time, seconds since the unix epoch
    pub timestamp_s: u32,
    /// Attestor epoch
    pub epoch: u32,
}

/// A claim together with its attestor signatures
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedClaim {
    /// The claim
    pub claim: Claim,
    /// Attestor signatures, in order
    pub signatures: Vec<Bytes>,
}

/// A complete Reclaim attestation.
///
/// Immutable once issued. Encoders only ever borrow it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Proof {
    /// What was verified
    pub claim_info: ClaimInfo,
    /// The signed claim
    pub signed_claim: SignedClaim,
}

impl Proof {
    /// Parse a proof from the Reclaim SDK JSON shape
    pub fn from_json(json: &str) -> Result<Self, EncodingError> {
        serde_json::from_str(json)
            .map_err(|e| EncodingError::mismatch(format!("invalid proof json: {e}")))
    }

    /// Structural checks the verifier would otherwise fail on without a useful reason.
    ///
    /// `parameters` and `context` must be JSON documents (an empty context is
    /// allowed) and at least one signature must be present.
    pub fn validate(&self) -> Result<(), EncodingError> {
        check_json("parameters", &self.claim_info.parameters, false)?;
        check_json("context", &self.claim_info.context, true)?;
        if self.signed_claim.signatures.is_empty() {
            return Err(EncodingError::mismatch("proof has no signatures"));
        }
        if self.signed_claim.signatures.iter().any(|s| s.is_empty()) {
            return Err(EncodingError::mismatch("proof has an empty signature"));
        }
        Ok(())
    }

    /// Canonical binary encoding of the proof
    pub fn abi_encode(&self) -> Bytes {
        encode_proof(self)
    }
}

fn check_json(field: &str, value: &str, allow_empty: bool) -> Result<(), EncodingError> {
    if allow_empty && value.is_empty() {
        return Ok(());
    }
    serde_json::from_str::<serde_json::Value>(value)
        .map(|_| ())
        .map_err(|e| EncodingError::mismatch(format!("claim {field} is not valid json: {e}")))
}

/// Encode a proof as a single ABI tuple.
///
/// The output starts with the head offset of the dynamic tuple, matching what
/// the verifier receives as a `bytes` argument.
pub fn encode_proof(proof: &Proof) -> Bytes {
    let sol: reclaim::Proof = proof.clone().into();
    SolValue::abi_encode(&sol).into()
}

/// Decode the output of [`encode_proof`].
pub fn decode_proof(data: &[u8]) -> Result<Proof, EncodingError> {
    <reclaim::Proof as SolValue>::abi_decode(data)
        .map(Proof::from)
        .map_err(|e| EncodingError::mismatch(format!("proof does not match tuple schema: {e}")))
}

impl From<Proof> for reclaim::Proof {
    fn from(value: Proof) -> Self {
        let Proof {
            claim_info,
            signed_claim,
        } = value;
        reclaim::Proof {
            claimInfo: reclaim::ClaimInfo {
                provider: claim_info.provider,
                parameters: claim_info.parameters,
                context: claim_info.context,
            },
            signedClaim: reclaim::SignedClaim {
                claim: reclaim::CompleteClaimData {
                    identifier: signed_claim.claim.identifier,
                    owner: signed_claim.claim.owner,
                    timestampS: signed_claim.claim.timestamp_s,
                    epoch: signed_claim.claim.epoch,
                },
                signatures: signed_claim.signatures,
            },
        }
    }
}

impl From<reclaim::Proof> for Proof {
    fn from(value: reclaim::Proof) -> Self {
        let reclaim::Proof {
            claimInfo,
            signedClaim,
        } = value;
        Proof {
            claim_info: ClaimInfo {
                provider: claimInfo.provider,
                parameters: claimInfo.parameters,
                context: claimInfo.context,
            },
            signed_claim: SignedClaim {
                claim: Claim {
                    identifier: signedClaim.claim.identifier,
                    owner: signedClaim.claim.owner,
                    timestamp_s: signedClaim.claim.timestampS,
                    epoch: signedClaim.claim.epoch,
                },
                signatures: signedClaim.signatures,
            },
        }
    }
}

/// Fixtures shared with downstream crates' tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils {
    use alloy_primitives::{address, b256, bytes};

    use super::*;

    /// The attestation used by the end to end flow against a local node
    pub fn mock_proof() -> Proof {
        Proof {
            claim_info: ClaimInfo {
                provider: "http".to_string(),
                parameters: r#"{"body":"","method":"GET","responseMatches":[{"type":"regex","value":"\"content\":\"(?<confirmation>[^\"]+)\""}],"url":"https://discord.com/api/v9/channels/1/messages?limit=1"}"#.to_string(),
                context: r#"{"extractedParameters":{"confirmation":"osmannear"},"providerHash":"0x1"}"#.to_string(),
            },
            signed_claim: SignedClaim {
                claim: Claim {
                    identifier: b256!(
                        "3dbb4fd3ab6806bc3b4510fe44d0a28a09b03072e0970987c7e0bdf7ab4a161a"
                    ),
                    owner: address!("38040bf589011639ee17e7abed20551099a0687a"),
                    timestamp_s: 1_734_879_670,
                    epoch: 1,
                },
                signatures: vec![bytes!(
                    "3bf1624553f086dbce89f086cee3dc4a1bf114e7d56dd51d332e49141fc1232b44a836648394cb2ae5a0530edb4c610d27c3da8d8be6c9659da009437fae85c81c"
                )],
            },
        }
    }
}
