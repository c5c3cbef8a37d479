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

#[cfg(feature = "test-utils")]
use mockall::automock;
use reclaim_wallet_types::Proof;

use super::error::ProviderResult;

/// Outcome of a read-only proof verification
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProofVerification {
    /// The verifier accepted the proof
    Valid,
    /// The verifier reverted, with the decoded reason
    Rejected(String),
}

/// Read-only access to a Reclaim proof verifier
#[cfg_attr(feature = "test-utils", automock)]
#[async_trait::async_trait]
pub trait ProofVerifier: Send + Sync {
    /// Ask the verifier whether it accepts `proof`
    async fn verify_proof(&self, proof: &Proof) -> ProviderResult<ProofVerification>;
}
