//! Application State
//!
//! Shared state for the dashboard server, accessible from all route handlers.
//! Collaborators are injected explicitly; nothing here is a global.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use crate::notify::MemoryNotifier;
use crate::remote::{LedgerQuery, ProofService};
use crate::services::{BalanceClient, ProofRelay, SelfTest};
use crate::store::KeyValueStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    balances: BalanceClient,
    relay: ProofRelay,
    selftest: SelfTest,
    notifier: Arc<MemoryNotifier>,
    ledger_canister_id: String,
    proof_canister_id: String,
    /// Total proofs generated
    total_proofs: AtomicU64,
    /// Total verification requests served
    total_verifications: AtomicU64,
    /// Server start time
    start_time: Instant,
}

/// Collaborators the state is assembled from
pub struct StateParts {
    pub ledger: Arc<dyn LedgerQuery>,
    pub prover: Arc<dyn ProofService>,
    pub store: Arc<dyn KeyValueStore>,
    pub notifier: Arc<MemoryNotifier>,
    pub public_origin: String,
    pub ledger_canister_id: String,
    pub proof_canister_id: String,
}

impl AppState {
    /// Create a new application state
    pub fn new(parts: StateParts) -> Self {
        let balances = BalanceClient::new(parts.ledger, parts.notifier.clone());
        let relay = ProofRelay::new(
            parts.prover,
            parts.store,
            parts.notifier.clone(),
            parts.public_origin,
            parts.ledger_canister_id.clone(),
        );
        let selftest = SelfTest::new(relay.clone());

        Self {
            inner: Arc::new(AppStateInner {
                balances,
                relay,
                selftest,
                notifier: parts.notifier,
                ledger_canister_id: parts.ledger_canister_id,
                proof_canister_id: parts.proof_canister_id,
                total_proofs: AtomicU64::new(0),
                total_verifications: AtomicU64::new(0),
                start_time: Instant::now(),
            }),
        }
    }

    pub fn balances(&self) -> &BalanceClient {
        &self.inner.balances
    }

    pub fn relay(&self) -> &ProofRelay {
        &self.inner.relay
    }

    pub fn selftest(&self) -> &SelfTest {
        &self.inner.selftest
    }

    pub fn notifier(&self) -> &MemoryNotifier {
        &self.inner.notifier
    }

    pub fn ledger_canister_id(&self) -> &str {
        &self.inner.ledger_canister_id
    }

    pub fn proof_canister_id(&self) -> &str {
        &self.inner.proof_canister_id
    }

    /// Get total proofs generated
    pub fn total_proofs_generated(&self) -> u64 {
        self.inner.total_proofs.load(Ordering::Relaxed)
    }

    /// Increment proof counter
    pub fn increment_proofs(&self) {
        self.inner.total_proofs.fetch_add(1, Ordering::Relaxed);
    }

    pub fn total_verifications(&self) -> u64 {
        self.inner.total_verifications.load(Ordering::Relaxed)
    }

    pub fn increment_verifications(&self) {
        self.inner.total_verifications.fetch_add(1, Ordering::Relaxed);
    }

    /// Get server uptime in seconds
    pub fn uptime_secs(&self) -> u64 {
        self.inner.start_time.elapsed().as_secs()
    }
}
