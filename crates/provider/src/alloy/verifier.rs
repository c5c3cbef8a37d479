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

use alloy_primitives::Address;
use alloy_provider::Provider as AlloyProvider;
use reclaim_wallet_contracts::reclaim::IReclaim::IReclaimInstance;
use reclaim_wallet_types::Proof;
use reclaim_wallet_utils::eth::describe_revert;
use tracing::instrument;

use crate::{ProofVerification, ProofVerifier, ProviderResult};

/// Reclaim verifier reads through an alloy provider
#[derive(Clone)]
pub struct AlloyReclaimVerifier<AP> {
    i_reclaim: IReclaimInstance<AP>,
}

impl<AP> AlloyReclaimVerifier<AP>
where
    AP: AlloyProvider,
{
    /// Create a new `AlloyReclaimVerifier` for the contract at `address`
    pub fn new(address: Address, provider: AP) -> Self {
        Self {
            i_reclaim: IReclaimInstance::new(address, provider),
        }
    }
}

#[async_trait::async_trait]
impl<AP> ProofVerifier for AlloyReclaimVerifier<AP>
where
    AP: AlloyProvider,
{
    #[instrument(skip_all)]
    async fn verify_proof(&self, proof: &Proof) -> ProviderResult<ProofVerification> {
        match self.i_reclaim.verifyProof(proof.clone().into()).call().await {
            Ok(_) => Ok(ProofVerification::Valid),
            Err(err) => match err.as_revert_data() {
                Some(revert_data) => Ok(ProofVerification::Rejected(describe_revert(&revert_data))),
                None => Err(err.into()),
            },
        }
    }
}
