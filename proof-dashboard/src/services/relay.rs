//! Proof Relay
//!
//! Forwards proof requests to the proof canister and keeps the returned blobs
//! in the local store, keyed by an id derived from the blob itself, so a
//! sharing link can be verified later.

use std::sync::Arc;

use thiserror::Error;
use tracing::{error, info, instrument, warn};

use crate::ledger::Principal;
use crate::notify::{Notification, Notifier};
use crate::remote::{Caller, ProofService, RemoteError};
use crate::store::{KeyValueStore, StoreError};
use crate::types::{OwnershipInput, ProofResponse};

/// Store key prefix for proof blobs
pub const PROOF_KEY_PREFIX: &str = "proof_";

/// Number of leading proof bytes that make up a proof id
const PROOF_ID_BYTES: usize = 8;

#[derive(Error, Debug)]
pub enum RelayError {
    #[error("Proof generation requires an authenticated principal, got {0}")]
    AnonymousOwner(Principal),
    #[error("Proof not found: {0}")]
    ProofNotFound(String),
    #[error(transparent)]
    Remote(#[from] RemoteError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("Stored proof {0} is corrupt")]
    CorruptProof(String),
}

/// Lowercase hex of the first 8 bytes (fewer if the blob is shorter)
pub fn proof_id_for(proof: &[u8]) -> String {
    hex::encode(&proof[..proof.len().min(PROOF_ID_BYTES)])
}

pub fn proof_key(proof_id: &str) -> String {
    format!("{PROOF_KEY_PREFIX}{proof_id}")
}

#[derive(Clone)]
pub struct ProofRelay {
    prover: Arc<dyn ProofService>,
    store: Arc<dyn KeyValueStore>,
    notifier: Arc<dyn Notifier>,
    /// Origin the shareable link points at, e.g. `https://dashboard.example`
    public_origin: String,
    ledger_canister_id: String,
}

impl ProofRelay {
    pub fn new(
        prover: Arc<dyn ProofService>,
        store: Arc<dyn KeyValueStore>,
        notifier: Arc<dyn Notifier>,
        public_origin: impl Into<String>,
        ledger_canister_id: impl Into<String>,
    ) -> Self {
        Self {
            prover,
            store,
            notifier,
            public_origin: public_origin.into().trim_end_matches('/').to_string(),
            ledger_canister_id: ledger_canister_id.into(),
        }
    }

    pub fn store(&self) -> &Arc<dyn KeyValueStore> {
        &self.store
    }

    pub fn share_link(&self, proof_id: &str) -> String {
        format!("{}/verify?proofId={proof_id}", self.public_origin)
    }

    /// Request a proof that `owner` holds `balance_e8s` of `token`, and cache
    /// the blob.
    ///
    /// Failures are reported to the user and returned; there is no fallback
    /// since the sharing flow depends on a real proof. The anonymous principal
    /// is refused before any remote call.
    #[instrument(skip(self, owner), fields(principal = %owner))]
    pub async fn generate(
        &self,
        owner: &Principal,
        token: &str,
        balance_e8s: u64,
    ) -> Result<ProofResponse, RelayError> {
        let result = self.generate_inner(owner, token, balance_e8s).await;

        match &result {
            Ok(response) => info!(
                proof_id = %response.proof_id,
                proof_link = %response.proof_link,
                "ZK proof generated"
            ),
            Err(e) => {
                error!(error = %e, "ZK proof generation failed");
                self.notifier.notify(Notification::destructive(
                    "Failed to generate ZK proof",
                    "An error occurred while generating the ZK proof",
                ));
            }
        }

        result
    }

    async fn generate_inner(
        &self,
        owner: &Principal,
        token: &str,
        balance_e8s: u64,
    ) -> Result<ProofResponse, RelayError> {
        if owner.is_anonymous() {
            return Err(RelayError::AnonymousOwner(owner.clone()));
        }

        let caller = Caller::authenticated(owner.clone());
        let input =
            OwnershipInput::new(token, owner, &self.ledger_canister_id).with_balance(balance_e8s);

        let proof = self.prover.prove_ownership(&caller, token, &input).await?;
        if proof.is_empty() {
            return Err(RemoteError::Rejected("proof canister returned an empty proof".into()).into());
        }

        let proof_id = proof_id_for(&proof);
        self.store.set(&proof_key(&proof_id), hex::encode(&proof)).await?;

        Ok(ProofResponse {
            proof_link: self.share_link(&proof_id),
            proof_id,
            token: token.to_string(),
            timestamp: chrono::Utc::now().timestamp_millis(),
        })
    }

    /// Verify a previously generated proof by id.
    ///
    /// Always resolves to a definite answer: an unknown id, a corrupt entry or
    /// a failed remote call all yield `false`. An unknown id never reaches the
    /// proof canister.
    #[instrument(skip(self, caller), fields(certified = caller.certified()))]
    pub async fn verify(&self, caller: &Caller, proof_id: &str) -> bool {
        let proof = match self.load_proof(proof_id).await {
            Ok(proof) => proof,
            Err(e @ RelayError::ProofNotFound(_)) => {
                // unknown to this store, distinct from a remote rejection
                warn!(error = %e, "Proof not in local store");
                return false;
            }
            Err(e) => {
                error!(error = %e, "Failed to load stored proof");
                self.notify_verify_failure();
                return false;
            }
        };

        match self.prover.verify_proof(caller, &proof).await {
            Ok(valid) => {
                info!(valid, "ZK proof verification result");
                valid
            }
            Err(RemoteError::Rejected(reason)) => {
                warn!(%reason, "Proof canister rejected verification");
                false
            }
            Err(e) => {
                error!(error = %e, "ZK proof verification failed");
                self.notify_verify_failure();
                false
            }
        }
    }

    /// Drop a stored proof. Returns whether it existed.
    pub async fn forget(&self, proof_id: &str) -> Result<bool, RelayError> {
        let removed = self.store.remove(&proof_key(proof_id)).await?;
        info!(proof_id, removed, "Forgot stored proof");
        Ok(removed)
    }

    async fn load_proof(&self, proof_id: &str) -> Result<Vec<u8>, RelayError> {
        let stored = self
            .store
            .get(&proof_key(proof_id))
            .await?
            .ok_or_else(|| RelayError::ProofNotFound(proof_id.to_string()))?;

        hex::decode(stored).map_err(|_| RelayError::CorruptProof(proof_id.to_string()))
    }

    fn notify_verify_failure(&self) {
        self.notifier.notify(Notification::destructive(
            "Failed to verify ZK proof",
            "An error occurred while verifying the ZK proof",
        ));
    }
}
