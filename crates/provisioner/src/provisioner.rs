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

use std::time::{Duration, Instant};

use alloy_primitives::{aliases::U192, Address, U256};
use metrics::{Counter, Histogram};
use metrics_derive::Metrics;
use reclaim_wallet_provider::{
    AddressResolver, EntryPoint, EvmProvider, HandleOpsOut, ProofVerification, ProofVerifier,
    ProviderResult, SubmissionReceipt,
};
use reclaim_wallet_types::{
    chain::ChainSpec, Authorization, EncodingError, Proof, SealedUserOperation, UserOperation,
    UserOperationBuilder, UserOperationRequiredFields,
};
use reclaim_wallet_utils::{eth::describe_revert, log::LogOnError};
use tracing::{info, instrument, warn};

use crate::{
    ProvisionReport, ProvisionRequest, ProvisioningError, ProvisioningResult, ProvisioningState,
};

/// Prefund used when none is given, 0.0035 native units
pub const DEFAULT_PREFUND: U256 = U256::from_limbs([3_500_000_000_000_000, 0, 0, 0]);

/// Gas profile and behavior of a [`Provisioner`]
#[derive(Clone, Debug)]
pub struct Settings {
    /// Verification gas limit of built operations
    pub verification_gas_limit: U256,
    /// Call gas limit of built operations
    pub call_gas_limit: U256,
    /// Pre-verification gas of built operations
    pub pre_verification_gas: U256,
    /// Max priority fee per gas of built operations
    pub max_priority_fee_per_gas: U256,
    /// Max fee per gas of built operations
    pub max_fee_per_gas: U256,
    /// Nonce key operations are built under
    pub nonce_key: U192,
    /// Fee recipient when the request names none
    pub beneficiary: Address,
    /// Compare the local hash against the entry point's before submitting
    pub verify_hash_with_entry_point: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            verification_gas_limit: U256::from(750_000),
            call_gas_limit: U256::from(750_000),
            pre_verification_gas: U256::from(55_000),
            max_priority_fee_per_gas: U256::from(1_000_664),
            max_fee_per_gas: U256::from(1_000),
            nonce_key: U192::ZERO,
            beneficiary: Address::ZERO,
            verify_hash_with_entry_point: true,
        }
    }
}

impl Settings {
    /// Assemble the operation creating `sender` through `factory`.
    ///
    /// The signature carries the tagged proof whatever the placement.
    pub fn build_operation(
        &self,
        factory: Address,
        request: &ProvisionRequest,
        sender: Address,
        nonce: U256,
    ) -> Result<UserOperation, EncodingError> {
        request.proof.validate()?;
        let creation_call_data =
            request
                .placement
                .creation_call_data(request.owner, &request.handle, &request.proof);

        Ok(UserOperationBuilder::new(UserOperationRequiredFields {
            sender,
            nonce,
            call_data: request.call_data.clone(),
            pre_verification_gas: self.pre_verification_gas,
            ..Default::default()
        })
        .try_account_gas_limits(self.verification_gas_limit, self.call_gas_limit)?
        .try_gas_fees(self.max_priority_fee_per_gas, self.max_fee_per_gas)?
        .factory(factory, &creation_call_data)
        .authorization(&Authorization::ReclaimProof(request.proof.clone()))
        .build())
    }
}

/// Drives provisioning attempts against one entry point and factory.
///
/// Attempts share no mutable state and may run concurrently for different
/// handles.
pub struct Provisioner<E, P, R> {
    chain_spec: ChainSpec,
    settings: Settings,
    entry_point: E,
    evm: P,
    resolver: R,
    verifier: Option<Box<dyn ProofVerifier>>,
    metrics: ProvisionerMetrics,
}

impl<E, P, R> Provisioner<E, P, R>
where
    E: EntryPoint,
    P: EvmProvider,
    R: AddressResolver,
{
    /// Create a new provisioner
    pub fn new(
        chain_spec: ChainSpec,
        settings: Settings,
        entry_point: E,
        evm: P,
        resolver: R,
    ) -> Self {
        Self {
            chain_spec,
            settings,
            entry_point,
            evm,
            resolver,
            verifier: None,
            metrics: ProvisionerMetrics::default(),
        }
    }

    /// Check proofs with `verifier` before funding anything
    pub fn with_verifier(mut self, verifier: impl ProofVerifier + 'static) -> Self {
        self.verifier = Some(Box::new(verifier));
        self
    }

    /// The settings in use
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Counterfactual address of `handle`
    pub async fn resolve(&self, handle: &str) -> ProvisioningResult<Address> {
        Ok(self.resolver.resolve(handle).await?)
    }

    /// True if code is deployed at `sender`
    pub async fn is_provisioned(&self, sender: Address) -> ProvisioningResult<bool> {
        Ok(!self.evm.get_code(sender).await?.is_empty())
    }

    /// Assemble the creation operation for `request`. Makes no network calls.
    pub fn build_operation(
        &self,
        request: &ProvisionRequest,
        sender: Address,
        nonce: U256,
    ) -> Result<UserOperation, EncodingError> {
        self.settings
            .build_operation(self.chain_spec.factory_address, request, sender, nonce)
    }

    /// Bind `op` to this provisioner's entry point and chain
    pub fn seal(&self, op: UserOperation) -> SealedUserOperation {
        op.seal(self.entry_point.address(), self.chain_spec.id)
    }

    /// Run a full provisioning attempt.
    ///
    /// Returns once the account is deployed, or with the error that ended the
    /// attempt. Nothing is retried.
    #[instrument(skip_all, fields(handle = %request.handle))]
    pub async fn provision(
        &self,
        request: ProvisionRequest,
    ) -> ProvisioningResult<ProvisionReport> {
        self.metrics.attempts.increment(1);
        let ret = self.provision_inner(&request).await;
        match &ret {
            Ok(report) => {
                self.metrics.confirmed.increment(1);
                info!(
                    sender = %report.sender,
                    user_op_hash = %report.user_op_hash,
                    state = %ProvisioningState::Confirmed,
                    "account provisioned"
                );
            }
            Err(err) => {
                metrics::counter!("provisioner_failed", "kind" => err.kind()).increment(1);
                warn!(state = %ProvisioningState::Failed, "provisioning failed: {err}");
            }
        }
        ret
    }

    async fn provision_inner(
        &self,
        request: &ProvisionRequest,
    ) -> ProvisioningResult<ProvisionReport> {
        let handle = request.handle.as_str();

        // dry run, nothing is sent if the operation cannot be encoded
        self.build_operation(request, Address::ZERO, U256::ZERO)?;

        let sender = self.resolve(handle).await?;
        info!(%sender, state = %ProvisioningState::Resolved, "resolved counterfactual address");

        if self.is_provisioned(sender).await? {
            return Err(ProvisioningError::AlreadyProvisioned(sender));
        }
        self.precheck_proof(sender, &request.proof).await?;

        let deposit = match request.prefund {
            Some(amount) if !amount.is_zero() => {
                let receipt = self
                    .entry_point
                    .deposit_to(sender, amount)
                    .await
                    .log_on_error("failed to prefund sender")?;
                info!(
                    %sender,
                    %amount,
                    tx_hash = %receipt.tx_hash,
                    state = %ProvisioningState::Funded,
                    "prefunded sender"
                );
                Some(receipt)
            }
            _ => None,
        };

        let nonce = self
            .entry_point
            .get_nonce(sender, self.settings.nonce_key)
            .await?;
        let op = self.build_operation(request, sender, nonce)?;
        info!(%sender, %nonce, state = %ProvisioningState::Built, "built user operation");

        let sealed = self.seal(op);
        if self.settings.verify_hash_with_entry_point {
            self.check_hash(&sealed).await?;
        }
        info!(
            %sender,
            user_op_hash = %sealed.hash(),
            state = %ProvisioningState::Hashed,
            "hashed user operation"
        );

        let beneficiary = request.beneficiary.unwrap_or(self.settings.beneficiary);
        let receipt = self
            .submit_inner(&sealed, beneficiary, request.deadline, false)
            .await?;

        Ok(ProvisionReport {
            handle: request.handle.clone(),
            sender,
            nonce,
            user_op_hash: sealed.hash(),
            deposit,
            receipt,
        })
    }

    /// Submit an already built operation and wait for the outcome.
    ///
    /// Code appearing at the sender is what counts as success. The receipt is
    /// `None` if the entry point call failed but the account was deployed
    /// regardless.
    #[instrument(skip_all, fields(sender = %sealed.op().sender))]
    pub async fn submit(
        &self,
        sealed: &SealedUserOperation,
        beneficiary: Address,
        deadline: Option<Duration>,
    ) -> ProvisioningResult<Option<SubmissionReceipt>> {
        let deployed_before = self.is_provisioned(sealed.op().sender).await?;
        self.submit_inner(sealed, beneficiary, deadline, deployed_before)
            .await
    }

    async fn submit_inner(
        &self,
        sealed: &SealedUserOperation,
        beneficiary: Address,
        deadline: Option<Duration>,
        deployed_before: bool,
    ) -> ProvisioningResult<Option<SubmissionReceipt>> {
        let sender = sealed.op().sender;
        info!(
            %sender,
            user_op_hash = %sealed.hash(),
            %beneficiary,
            state = %ProvisioningState::Submitted,
            "submitting user operation"
        );

        let start = Instant::now();
        let handle_ops = self
            .entry_point
            .handle_ops(vec![sealed.op().pack()], beneficiary);
        let outcome = match deadline {
            // ledger side state is left unresolved on expiry
            Some(deadline) => tokio::time::timeout(deadline, handle_ops)
                .await
                .map_err(|_| ProvisioningError::ConfirmationTimeout { sender, deadline })?,
            None => handle_ops.await,
        };

        let deployed = match self
            .is_provisioned(sender)
            .await
            .log_on_error("failed to re-read code at sender")
        {
            Ok(deployed) => deployed,
            // a successful call cannot be confirmed without the read
            Err(err) if outcome.as_ref().is_ok_and(HandleOpsOut::is_success) => return Err(err),
            // keep the submission's own error
            Err(_) => false,
        };
        let ret = settle(sender, outcome, deployed, deployed_before);
        if ret.is_ok() {
            self.metrics
                .confirmation_latency_ms
                .record(start.elapsed().as_millis() as f64);
        }
        ret
    }

    /// Re-read code presence at `sender` every `interval` until it appears or
    /// `deadline` elapses
    #[instrument(skip(self))]
    pub async fn poll_confirmation(
        &self,
        sender: Address,
        deadline: Duration,
        interval: Duration,
    ) -> ProvisioningResult<()> {
        tokio::time::timeout(deadline, self.wait_for_code(sender, interval))
            .await
            .map_err(|_| ProvisioningError::ConfirmationTimeout { sender, deadline })?
    }

    async fn wait_for_code(&self, sender: Address, interval: Duration) -> ProvisioningResult<()> {
        loop {
            if self.is_provisioned(sender).await? {
                info!(%sender, state = %ProvisioningState::Confirmed, "code present at sender");
                return Ok(());
            }
            tokio::time::sleep(interval).await;
        }
    }

    async fn check_hash(&self, sealed: &SealedUserOperation) -> ProvisioningResult<()> {
        let remote = self.entry_point.get_user_op_hash(sealed.op().pack()).await?;
        if remote != sealed.hash() {
            return Err(EncodingError::EncodingMismatch(format!(
                "entry point hash {remote} does not match local hash {}",
                sealed.hash()
            ))
            .into());
        }
        Ok(())
    }

    async fn precheck_proof(&self, sender: Address, proof: &Proof) -> ProvisioningResult<()> {
        let Some(verifier) = &self.verifier else {
            return Ok(());
        };
        match verifier.verify_proof(proof).await? {
            ProofVerification::Valid => Ok(()),
            ProofVerification::Rejected(reason) => Err(ProvisioningError::rejected(sender, reason)),
        }
    }
}

fn settle(
    sender: Address,
    outcome: ProviderResult<HandleOpsOut>,
    deployed: bool,
    deployed_before: bool,
) -> ProvisioningResult<Option<SubmissionReceipt>> {
    match outcome {
        Ok(HandleOpsOut::Success(receipt)) if deployed => Ok(Some(receipt)),
        Ok(out) if deployed && !deployed_before => {
            warn!(%sender, "entry point reported {out:?} but the account is deployed");
            Ok(None)
        }
        Err(err) if deployed && !deployed_before => {
            warn!(%sender, "entry point call failed but the account is deployed: {err}");
            Ok(None)
        }
        Ok(out) => Err(rejection(sender, out)),
        Err(err) => Err(err.into()),
    }
}

fn rejection(sender: Address, out: HandleOpsOut) -> ProvisioningError {
    match out {
        HandleOpsOut::FailedOp(_, reason, revert_data) => ProvisioningError::SubmissionRejected {
            sender,
            reason,
            revert_data: Some(revert_data),
        },
        HandleOpsOut::SignatureValidationFailed(aggregator, revert_data) => {
            ProvisioningError::SubmissionRejected {
                sender,
                reason: format!("signature validation failed for aggregator {aggregator}"),
                revert_data: Some(revert_data),
            }
        }
        HandleOpsOut::Revert(revert_data) => ProvisioningError::SubmissionRejected {
            sender,
            reason: describe_revert(&revert_data),
            revert_data: Some(revert_data),
        },
        HandleOpsOut::TransactionReverted(tx_hash) => {
            ProvisioningError::rejected(sender, format!("transaction {tx_hash} reverted"))
        }
        HandleOpsOut::Success(receipt) => ProvisioningError::rejected(
            sender,
            format!(
                "transaction {} was included but no code is deployed at the sender",
                receipt.tx_hash
            ),
        ),
    }
}

#[derive(Metrics)]
#[metrics(scope = "provisioner")]
struct ProvisionerMetrics {
    #[metric(describe = "the count of provisioning attempts.")]
    attempts: Counter,
    #[metric(describe = "the count of provisioning attempts that ended with code at the sender.")]
    confirmed: Counter,
    #[metric(describe = "the time from submission to confirmation in ms.")]
    confirmation_latency_ms: Histogram,
}

#[cfg(test)]
mod tests {
    use std::{
        collections::HashSet,
        sync::{Arc, Mutex},
    };

    use alloy_primitives::{address, bytes, keccak256, Bytes, B256};
    use alloy_sol_types::{Revert, SolError};
    use mockall::Sequence;
    use reclaim_wallet_contracts::v0_7::PackedUserOperation;
    use reclaim_wallet_provider::{
        MockAddressResolver, MockEntryPoint, MockEvmProvider, MockProofVerifier, ProviderError,
    };
    use reclaim_wallet_types::{
        chain::ENTRY_POINT_ADDRESS_V0_7, encode_authorization, proof::test_utils::mock_proof,
        ProofPlacement,
    };
    use reclaim_wallet_utils::eth::parse_native;

    use super::*;

    const EP: Address = ENTRY_POINT_ADDRESS_V0_7;
    const FACTORY: Address = address!("5FbDB2315678afecb367f032d93F642f64180aa3");
    const SENDER: Address = address!("362ed235b2b6fecfb66d573ac5b562df09f39f21");
    const OWNER: Address = address!("38040bf589011639ee17e7abed20551099a0687a");
    const BENEFICIARY: Address = address!("f39fd6e51aad88f6f4ce6ab8827279cfffb92266");
    const CHAIN_ID: u64 = 84532;

    fn chain_spec() -> ChainSpec {
        ChainSpec {
            name: "Test".to_string(),
            id: CHAIN_ID,
            factory_address: FACTORY,
            ..Default::default()
        }
    }

    fn settings() -> Settings {
        Settings {
            beneficiary: BENEFICIARY,
            ..Default::default()
        }
    }

    fn request() -> ProvisionRequest {
        ProvisionRequest::new("osmannear", OWNER, mock_proof())
    }

    fn receipt(n: u8) -> SubmissionReceipt {
        SubmissionReceipt {
            tx_hash: B256::repeat_byte(n),
            block_number: Some(n as u64),
            gas_used: 21_000,
        }
    }

    fn resolver() -> MockAddressResolver {
        let mut resolver = MockAddressResolver::new();
        resolver
            .expect_resolve()
            .withf(|handle| handle == "osmannear")
            .returning(|_| Ok(SENDER));
        resolver
    }

    fn entry_point(hash_matches: bool) -> MockEntryPoint {
        let mut entry_point = MockEntryPoint::new();
        entry_point.expect_address().return_const(EP);
        entry_point
            .expect_get_nonce()
            .returning(|_, _| Ok(U256::ZERO));
        entry_point
            .expect_get_user_op_hash()
            .returning(move |op: PackedUserOperation| {
                if hash_matches {
                    Ok(UserOperation::from(op).hash(EP, CHAIN_ID))
                } else {
                    Ok(B256::ZERO)
                }
            });
        entry_point
    }

    fn code_sequence(evm: &mut MockEvmProvider, present: &[bool]) {
        let mut seq = Sequence::new();
        for &present in present {
            evm.expect_get_code()
                .times(1)
                .in_sequence(&mut seq)
                .returning(move |_| {
                    Ok(if present {
                        bytes!("6080604052")
                    } else {
                        Bytes::new()
                    })
                });
        }
    }

    #[test]
    fn test_default_prefund() {
        assert_eq!(DEFAULT_PREFUND, parse_native("0.0035").unwrap());
    }

    #[test]
    fn test_build_operation() {
        let settings = settings();
        let op = settings
            .build_operation(FACTORY, &request(), SENDER, U256::from(7))
            .unwrap();
        assert_eq!(op.sender, SENDER);
        assert_eq!(op.nonce, U256::from(7));
        assert_eq!(op.factory(), Some(FACTORY));
        assert_eq!(op.verification_gas_limit(), 750_000);
        assert_eq!(op.call_gas_limit(), 750_000);
        assert_eq!(op.max_priority_fee_per_gas(), 1_000_664);
        assert_eq!(op.max_fee_per_gas(), 1_000);
        assert_eq!(op.signature, encode_authorization(&mock_proof()));

        let deferred = settings
            .build_operation(
                FACTORY,
                &request().with_placement(ProofPlacement::SignatureOnly),
                SENDER,
                U256::from(7),
            )
            .unwrap();
        assert!(deferred.init_code.len() < op.init_code.len());
        assert_eq!(deferred.signature, op.signature);
    }

    #[tokio::test]
    async fn test_provision_happy_path() {
        let mut evm = MockEvmProvider::new();
        code_sequence(&mut evm, &[false, true]);

        let mut entry_point = entry_point(true);
        entry_point
            .expect_deposit_to()
            .withf(|account, amount| *account == SENDER && *amount == DEFAULT_PREFUND)
            .times(1)
            .returning(|_, _| Ok(receipt(1)));
        entry_point
            .expect_handle_ops()
            .withf(|ops, beneficiary| {
                ops.len() == 1
                    && ops[0].sender == SENDER
                    && ops[0].initCode.starts_with(FACTORY.as_slice())
                    && ops[0].signature[0] == 0x03
                    && *beneficiary == BENEFICIARY
            })
            .times(1)
            .returning(|_, _| Ok(HandleOpsOut::Success(receipt(2))));

        let provisioner = Provisioner::new(chain_spec(), settings(), entry_point, evm, resolver());
        let report = provisioner
            .provision(request().with_prefund(DEFAULT_PREFUND))
            .await
            .unwrap();

        let expected = provisioner
            .build_operation(&request(), SENDER, U256::ZERO)
            .unwrap();
        assert_eq!(report.sender, SENDER);
        assert_eq!(report.nonce, U256::ZERO);
        assert_eq!(report.user_op_hash, expected.hash(EP, CHAIN_ID));
        assert_eq!(report.deposit, Some(receipt(1)));
        assert_eq!(report.receipt, Some(receipt(2)));
    }

    #[tokio::test]
    async fn test_provision_without_prefund() {
        let mut evm = MockEvmProvider::new();
        code_sequence(&mut evm, &[false, true]);

        let mut entry_point = entry_point(true);
        entry_point.expect_deposit_to().never();
        entry_point
            .expect_handle_ops()
            .times(1)
            .returning(|_, _| Ok(HandleOpsOut::Success(receipt(2))));

        let provisioner = Provisioner::new(chain_spec(), settings(), entry_point, evm, resolver());
        let report = provisioner
            .provision(request().with_prefund(U256::ZERO))
            .await
            .unwrap();
        assert_eq!(report.deposit, None);
    }

    #[tokio::test]
    async fn test_already_provisioned() {
        let mut evm = MockEvmProvider::new();
        code_sequence(&mut evm, &[true]);

        let mut entry_point = entry_point(true);
        entry_point.expect_deposit_to().never();
        entry_point.expect_handle_ops().never();

        let provisioner = Provisioner::new(chain_spec(), settings(), entry_point, evm, resolver());
        let err = provisioner
            .provision(request().with_prefund(DEFAULT_PREFUND))
            .await
            .unwrap_err();
        assert!(matches!(err, ProvisioningError::AlreadyProvisioned(sender) if sender == SENDER));
    }

    #[tokio::test]
    async fn test_gas_out_of_range_before_network() {
        let settings = Settings {
            call_gas_limit: U256::from(1) << 128,
            ..settings()
        };
        // no expectations, any ledger call fails the test
        let provisioner = Provisioner::new(
            chain_spec(),
            settings,
            MockEntryPoint::new(),
            MockEvmProvider::new(),
            MockAddressResolver::new(),
        );

        let err = provisioner.provision(request()).await.unwrap_err();
        assert!(err.is_fatal());
        assert!(matches!(
            err,
            ProvisioningError::Encoding(EncodingError::ValueOutOfRange {
                field: "call_gas_limit",
                bits: 128,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_invalid_proof_before_network() {
        let provisioner = Provisioner::new(
            chain_spec(),
            settings(),
            MockEntryPoint::new(),
            MockEvmProvider::new(),
            MockAddressResolver::new(),
        );
        let mut proof = mock_proof();
        proof.signed_claim.signatures.clear();

        let err = provisioner
            .provision(ProvisionRequest::new("osmannear", OWNER, proof))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ProvisioningError::Encoding(EncodingError::EncodingMismatch(_))
        ));
    }

    #[tokio::test]
    async fn test_hash_mismatch() {
        let mut evm = MockEvmProvider::new();
        code_sequence(&mut evm, &[false]);

        let mut entry_point = entry_point(false);
        entry_point.expect_handle_ops().never();

        let provisioner = Provisioner::new(chain_spec(), settings(), entry_point, evm, resolver());
        let err = provisioner.provision(request()).await.unwrap_err();
        assert!(matches!(
            err,
            ProvisioningError::Encoding(EncodingError::EncodingMismatch(_))
        ));
    }

    #[tokio::test]
    async fn test_proof_precheck_rejects_before_funding() {
        let mut evm = MockEvmProvider::new();
        code_sequence(&mut evm, &[false]);

        let mut entry_point = entry_point(true);
        entry_point.expect_deposit_to().never();
        entry_point.expect_handle_ops().never();

        let mut verifier = MockProofVerifier::new();
        verifier
            .expect_verify_proof()
            .times(1)
            .returning(|_| Ok(ProofVerification::Rejected("Signature mismatch".to_string())));

        let provisioner = Provisioner::new(chain_spec(), settings(), entry_point, evm, resolver())
            .with_verifier(verifier);
        let err = provisioner
            .provision(request().with_prefund(DEFAULT_PREFUND))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ProvisioningError::SubmissionRejected { reason, .. } if reason == "Signature mismatch"
        ));
    }

    #[tokio::test]
    async fn test_replay_rejected() {
        let mut evm = MockEvmProvider::new();
        code_sequence(&mut evm, &[true, true]);

        let mut entry_point = entry_point(true);
        entry_point
            .expect_handle_ops()
            .times(1)
            .returning(|_, _| {
                Ok(HandleOpsOut::FailedOp(
                    0,
                    "AA25 invalid account nonce".to_string(),
                    bytes!("220266b6"),
                ))
            });

        let provisioner = Provisioner::new(chain_spec(), settings(), entry_point, evm, resolver());
        let op = provisioner
            .build_operation(&request(), SENDER, U256::ZERO)
            .unwrap();
        let sealed = provisioner.seal(op);

        let err = provisioner
            .submit(&sealed, BENEFICIARY, None)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ProvisioningError::SubmissionRejected { sender, reason, revert_data: Some(data) }
                if sender == SENDER
                    && reason == "AA25 invalid account nonce"
                    && data == bytes!("220266b6")
        ));
    }

    #[tokio::test]
    async fn test_revert_reason_preserved() {
        let mut evm = MockEvmProvider::new();
        code_sequence(&mut evm, &[false, false]);

        let revert_data: Bytes = Revert::from("proof already used").abi_encode().into();
        let returned = revert_data.clone();
        let mut entry_point = entry_point(true);
        entry_point
            .expect_handle_ops()
            .times(1)
            .returning(move |_, _| Ok(HandleOpsOut::Revert(returned.clone())));

        let provisioner = Provisioner::new(chain_spec(), settings(), entry_point, evm, resolver());
        let err = provisioner.provision(request()).await.unwrap_err();
        match err {
            ProvisioningError::SubmissionRejected {
                reason,
                revert_data: Some(data),
                ..
            } => {
                assert_eq!(reason, "proof already used");
                assert_eq!(data, revert_data);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_rejection_kept_when_code_read_fails() {
        let mut evm = MockEvmProvider::new();
        let mut seq = Sequence::new();
        evm.expect_get_code()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(Bytes::new()));
        evm.expect_get_code()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Err(ProviderError::ContractError("node unavailable".to_string())));

        let mut entry_point = entry_point(true);
        entry_point.expect_handle_ops().times(1).returning(|_, _| {
            Ok(HandleOpsOut::FailedOp(
                0,
                "AA24 signature error".to_string(),
                bytes!("220266b6"),
            ))
        });

        let provisioner = Provisioner::new(chain_spec(), settings(), entry_point, evm, resolver());
        let err = provisioner.provision(request()).await.unwrap_err();
        assert!(matches!(
            err,
            ProvisioningError::SubmissionRejected { sender, reason, .. }
                if sender == SENDER && reason == "AA24 signature error"
        ));
    }

    #[tokio::test]
    async fn test_success_without_code_read_is_provider_error() {
        let mut evm = MockEvmProvider::new();
        let mut seq = Sequence::new();
        evm.expect_get_code()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(Bytes::new()));
        evm.expect_get_code()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Err(ProviderError::ContractError("node unavailable".to_string())));

        let mut entry_point = entry_point(true);
        entry_point
            .expect_handle_ops()
            .times(1)
            .returning(|_, _| Ok(HandleOpsOut::Success(receipt(2))));

        let provisioner = Provisioner::new(chain_spec(), settings(), entry_point, evm, resolver());
        let err = provisioner.provision(request()).await.unwrap_err();
        assert!(matches!(err, ProvisioningError::Provider(_)));
    }

    #[tokio::test]
    async fn test_included_without_code_is_rejected() {
        let mut evm = MockEvmProvider::new();
        code_sequence(&mut evm, &[false, false]);

        let mut entry_point = entry_point(true);
        entry_point
            .expect_handle_ops()
            .times(1)
            .returning(|_, _| Ok(HandleOpsOut::Success(receipt(2))));

        let provisioner = Provisioner::new(chain_spec(), settings(), entry_point, evm, resolver());
        let err = provisioner.provision(request()).await.unwrap_err();
        assert!(matches!(err, ProvisioningError::SubmissionRejected { .. }));
    }

    #[tokio::test]
    async fn test_code_presence_overrides_call_error() {
        let mut evm = MockEvmProvider::new();
        code_sequence(&mut evm, &[false, true]);

        let mut entry_point = entry_point(true);
        entry_point.expect_handle_ops().times(1).returning(|_, _| {
            Err(ProviderError::ContractError(
                "connection closed before receipt".to_string(),
            ))
        });

        let provisioner = Provisioner::new(chain_spec(), settings(), entry_point, evm, resolver());
        let report = provisioner.provision(request()).await.unwrap();
        assert_eq!(report.sender, SENDER);
        assert_eq!(report.receipt, None);
    }

    #[tokio::test]
    async fn test_call_error_without_code() {
        let mut evm = MockEvmProvider::new();
        code_sequence(&mut evm, &[false, false]);

        let mut entry_point = entry_point(true);
        entry_point.expect_handle_ops().times(1).returning(|_, _| {
            Err(ProviderError::ContractError(
                "connection closed before receipt".to_string(),
            ))
        });

        let provisioner = Provisioner::new(chain_spec(), settings(), entry_point, evm, resolver());
        let err = provisioner.provision(request()).await.unwrap_err();
        assert!(matches!(err, ProvisioningError::Provider(_)));
    }

    struct SlowEntryPoint {
        inner: MockEntryPoint,
        delay: Duration,
    }

    #[async_trait::async_trait]
    impl EntryPoint for SlowEntryPoint {
        fn address(&self) -> Address {
            self.inner.address()
        }

        async fn handle_ops(
            &self,
            ops: Vec<PackedUserOperation>,
            beneficiary: Address,
        ) -> ProviderResult<HandleOpsOut> {
            tokio::time::sleep(self.delay).await;
            self.inner.handle_ops(ops, beneficiary).await
        }

        async fn get_user_op_hash(&self, op: PackedUserOperation) -> ProviderResult<B256> {
            self.inner.get_user_op_hash(op).await
        }

        async fn get_nonce(&self, sender: Address, key: U192) -> ProviderResult<U256> {
            self.inner.get_nonce(sender, key).await
        }

        async fn deposit_to(
            &self,
            account: Address,
            amount: U256,
        ) -> ProviderResult<SubmissionReceipt> {
            self.inner.deposit_to(account, amount).await
        }

        async fn balance_of(&self, account: Address) -> ProviderResult<U256> {
            self.inner.balance_of(account).await
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_confirmation_timeout() {
        let mut evm = MockEvmProvider::new();
        // code is not re-read once the deadline expires
        code_sequence(&mut evm, &[false]);

        let entry_point = SlowEntryPoint {
            inner: entry_point(true),
            delay: Duration::from_secs(120),
        };

        let provisioner = Provisioner::new(chain_spec(), settings(), entry_point, evm, resolver());
        let err = provisioner
            .provision(request().with_deadline(Duration::from_secs(30)))
            .await
            .unwrap_err();
        assert!(err.is_recoverable());
        assert!(matches!(
            err,
            ProvisioningError::ConfirmationTimeout { sender, deadline }
                if sender == SENDER && deadline == Duration::from_secs(30)
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_confirmation() {
        let mut evm = MockEvmProvider::new();
        code_sequence(&mut evm, &[false, false, true]);

        let provisioner = Provisioner::new(
            chain_spec(),
            settings(),
            MockEntryPoint::new(),
            evm,
            MockAddressResolver::new(),
        );
        provisioner
            .poll_confirmation(SENDER, Duration::from_secs(60), Duration::from_secs(2))
            .await
            .unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_confirmation_timeout() {
        let mut evm = MockEvmProvider::new();
        evm.expect_get_code().returning(|_| Ok(Bytes::new()));

        let provisioner = Provisioner::new(
            chain_spec(),
            settings(),
            MockEntryPoint::new(),
            evm,
            MockAddressResolver::new(),
        );
        let err = provisioner
            .poll_confirmation(SENDER, Duration::from_secs(10), Duration::from_secs(2))
            .await
            .unwrap_err();
        assert!(matches!(err, ProvisioningError::ConfirmationTimeout { .. }));
    }

    #[tokio::test]
    async fn test_concurrent_attempts() {
        let deployed = Arc::new(Mutex::new(HashSet::new()));

        let mut resolver = MockAddressResolver::new();
        resolver
            .expect_resolve()
            .returning(|handle| Ok(Address::from_slice(&keccak256(handle)[12..])));

        let mut evm = MockEvmProvider::new();
        let code = Arc::clone(&deployed);
        evm.expect_get_code().returning(move |address| {
            Ok(if code.lock().unwrap().contains(&address) {
                bytes!("6080604052")
            } else {
                Bytes::new()
            })
        });

        let mut entry_point = entry_point(true);
        let ledger = Arc::clone(&deployed);
        entry_point
            .expect_handle_ops()
            .times(2)
            .returning(move |ops, _| {
                ledger.lock().unwrap().insert(ops[0].sender);
                Ok(HandleOpsOut::Success(receipt(2)))
            });

        let provisioner = Provisioner::new(chain_spec(), settings(), entry_point, evm, resolver);
        let (alice, bob) = tokio::join!(
            provisioner.provision(ProvisionRequest::new("alice", OWNER, mock_proof())),
            provisioner.provision(ProvisionRequest::new("bob", OWNER, mock_proof())),
        );
        let (alice, bob) = (alice.unwrap(), bob.unwrap());
        assert_ne!(alice.sender, bob.sender);
        assert_ne!(alice.user_op_hash, bob.user_op_hash);
        assert_eq!(deployed.lock().unwrap().len(), 2);
    }
}
