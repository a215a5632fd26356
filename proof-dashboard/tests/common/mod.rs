//! In-process fakes of the remote canisters shared by the integration tests

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use proof_dashboard::ledger::AccountIdentifier;
use proof_dashboard::notify::MemoryNotifier;
use proof_dashboard::remote::{Caller, LedgerQuery, ProofService, RemoteError};
use proof_dashboard::state::{AppState, StateParts};
use proof_dashboard::store::{KeyValueStore, MemoryStore};
use proof_dashboard::types::OwnershipInput;
use proof_dashboard::ProofRelay;

/// Fixed proof bytes `B` the fake prover hands out
pub const PROOF_BYTES: [u8; 12] = [0xde, 0xad, 0xbe, 0xef, 0x00, 0x01, 0x02, 0x0a, 0x10, 0x20, 0x30, 0x40];
pub const PROOF_ID: &str = "deadbeef0001020a";
pub const PUBLIC_ORIGIN: &str = "https://proofs.example";

pub struct FakeLedger {
    pub reply: Result<u64, RemoteError>,
}

#[async_trait]
impl LedgerQuery for FakeLedger {
    async fn account_balance(&self, _account: &AccountIdentifier) -> Result<u64, RemoteError> {
        self.reply.clone()
    }
}

/// `prove` returns [`PROOF_BYTES`]; `verify` is true exactly for those bytes
#[derive(Default)]
pub struct FakeProver {
    pub fail_prove: bool,
    pub fail_verify: bool,
    pub prove_calls: AtomicUsize,
    pub verify_calls: AtomicUsize,
    pub last_input: Mutex<Option<(String, OwnershipInput)>>,
    pub callers: Mutex<Vec<Caller>>,
}

#[async_trait]
impl ProofService for FakeProver {
    async fn prove_ownership(
        &self,
        caller: &Caller,
        token: &str,
        input: &OwnershipInput,
    ) -> Result<Vec<u8>, RemoteError> {
        self.prove_calls.fetch_add(1, Ordering::SeqCst);
        self.callers.lock().unwrap().push(caller.clone());
        *self.last_input.lock().unwrap() = Some((token.to_string(), input.clone()));

        if self.fail_prove {
            return Err(RemoteError::Unavailable("connection refused".to_string()));
        }
        Ok(PROOF_BYTES.to_vec())
    }

    async fn verify_proof(&self, caller: &Caller, proof: &[u8]) -> Result<bool, RemoteError> {
        self.verify_calls.fetch_add(1, Ordering::SeqCst);
        self.callers.lock().unwrap().push(caller.clone());

        if self.fail_verify {
            return Err(RemoteError::Unavailable("connection reset".to_string()));
        }
        Ok(proof == PROOF_BYTES)
    }
}

pub struct Harness {
    pub prover: Arc<FakeProver>,
    pub store: Arc<MemoryStore>,
    pub notifier: Arc<MemoryNotifier>,
    pub relay: ProofRelay,
}

pub fn harness(prover: FakeProver) -> Harness {
    let prover = Arc::new(prover);
    let store = Arc::new(MemoryStore::new());
    let notifier = Arc::new(MemoryNotifier::new(16));
    let relay = ProofRelay::new(
        prover.clone(),
        store.clone(),
        notifier.clone(),
        PUBLIC_ORIGIN,
        "ryjl3-tyaaa-aaaaa-aaaba-cai",
    );

    Harness {
        prover,
        store,
        notifier,
        relay,
    }
}

pub fn app_state(ledger_reply: Result<u64, RemoteError>, prover: FakeProver) -> (AppState, Arc<FakeProver>) {
    let prover = Arc::new(prover);
    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());

    let state = AppState::new(StateParts {
        ledger: Arc::new(FakeLedger { reply: ledger_reply }),
        prover: prover.clone(),
        store,
        notifier: Arc::new(MemoryNotifier::new(16)),
        public_origin: PUBLIC_ORIGIN.to_string(),
        ledger_canister_id: "ryjl3-tyaaa-aaaaa-aaaba-cai".to_string(),
        proof_canister_id: "hi7bu-myaaa-aaaad-aaloa-cai".to_string(),
    });

    (state, prover)
}
