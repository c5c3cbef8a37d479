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

//! Authorization payloads carried in a user operation's `signature` field.
//!
//! The first byte selects the verification scheme the account runs, the
//! remainder is scheme specific.

use alloy_primitives::Bytes;
use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::{
    proof::{decode_proof, encode_proof},
    EncodingError, Proof,
};

/// One-byte authorization scheme discriminator.
///
/// The numbering is shared with the on-chain account and must match it.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Ord, PartialOrd, TryFromPrimitive, IntoPrimitive,
)]
#[repr(u8)]
pub enum AuthorizationKind {
    /// Plain ECDSA signature by the account owner
    Ecdsa = 1,
    /// Reclaim proof
    ReclaimProof = 3,
}

/// A decoded authorization payload
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Authorization {
    /// Raw 65-byte owner signature
    Ecdsa(Bytes),
    /// Reclaim attestation
    ReclaimProof(Proof),
}

impl Authorization {
    /// The scheme of this payload
    pub fn kind(&self) -> AuthorizationKind {
        match self {
            Self::Ecdsa(_) => AuthorizationKind::Ecdsa,
            Self::ReclaimProof(_) => AuthorizationKind::ReclaimProof,
        }
    }

    /// `tag || body`
    pub fn encode(&self) -> Bytes {
        let body = match self {
            Self::Ecdsa(sig) => sig.clone(),
            Self::ReclaimProof(proof) => encode_proof(proof),
        };
        tagged(self.kind(), &body)
    }

    /// Parse a `signature` field
    pub fn decode(data: &[u8]) -> Result<Self, EncodingError> {
        let (tag, body) = data
            .split_first()
            .ok_or_else(|| EncodingError::mismatch("empty authorization payload"))?;
        let kind = AuthorizationKind::try_from(*tag)
            .map_err(|_| EncodingError::mismatch(format!("unknown authorization kind {tag}")))?;
        match kind {
            AuthorizationKind::Ecdsa => Ok(Self::Ecdsa(Bytes::copy_from_slice(body))),
            AuthorizationKind::ReclaimProof => decode_proof(body).map(Self::ReclaimProof),
        }
    }
}

/// Tag a proof as a Reclaim authorization payload
pub fn encode_authorization(proof: &Proof) -> Bytes {
    tagged(AuthorizationKind::ReclaimProof, &encode_proof(proof))
}

fn tagged(kind: AuthorizationKind, body: &[u8]) -> Bytes {
    let mut out = Vec::with_capacity(body.len() + 1);
    out.push(kind.into());
    out.extend_from_slice(body);
    out.into()
}

#[cfg(test)]
mod tests {
    use alloy_primitives::bytes;

    use super::*;
    use crate::proof::test_utils::mock_proof;

    #[test]
    fn test_reclaim_tag() {
        let proof = mock_proof();
        let encoded = encode_authorization(&proof);
        assert_eq!(encoded[0], 0x03);
        assert_eq!(&encoded[1..], encode_proof(&proof).as_ref());
        assert_eq!(
            Authorization::ReclaimProof(proof.clone()).encode(),
            encoded
        );

        assert_eq!(
            Authorization::decode(&encoded).unwrap(),
            Authorization::ReclaimProof(proof)
        );
    }

    #[test]
    fn test_ecdsa() {
        let auth = Authorization::Ecdsa(bytes!("aabbcc"));
        let encoded = auth.encode();
        assert_eq!(encoded, bytes!("01aabbcc"));
        assert_eq!(Authorization::decode(&encoded).unwrap(), auth);
        assert_eq!(auth.kind(), AuthorizationKind::Ecdsa);
    }

    #[test]
    fn test_decode_errors() {
        assert!(matches!(
            Authorization::decode(&[]),
            Err(EncodingError::EncodingMismatch(_))
        ));
        assert!(matches!(
            Authorization::decode(&[0x02, 0x00]),
            Err(EncodingError::EncodingMismatch(_))
        ));
        // proof tag with a body that is not a proof tuple
        assert!(Authorization::decode(&[0x03, 0x00]).is_err());
    }

    #[test]
    fn test_kind_numbering() {
        assert_eq!(u8::from(AuthorizationKind::ReclaimProof), 3);
        assert_eq!(
            AuthorizationKind::try_from(3_u8).unwrap(),
            AuthorizationKind::ReclaimProof
        );
        assert!(AuthorizationKind::try_from(0_u8).is_err());
    }
}
