//! End-to-end self-test of the proof flow.
//!
//! Generates a proof, verifies it as the owner, then verifies it again as an
//! anonymous caller the way a sharing link would. The last run is cached in
//! the local store.

use std::sync::Arc;

use tracing::{info, instrument};

use super::relay::ProofRelay;
use crate::ledger::Principal;
use crate::remote::Caller;
use crate::store::{KeyValueStore, StoreError};
use crate::types::{TestResult, TestSuiteResults};

/// Store key for the cached results of the last run
pub const TEST_RESULTS_KEY: &str = "zkproof_test_results";

/// Balance attested by the self-test proof
pub const SELFTEST_BALANCE_E8S: u64 = 10;

fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

impl TestResult {
    fn passed(name: &str, message: String) -> Self {
        Self {
            name: name.to_string(),
            success: true,
            message,
            timestamp: now_ms(),
            error: None,
        }
    }

    fn failed(name: &str, message: String, error: Option<String>) -> Self {
        Self {
            name: name.to_string(),
            success: false,
            message,
            timestamp: now_ms(),
            error,
        }
    }
}

#[derive(Clone)]
pub struct SelfTest {
    relay: ProofRelay,
}

impl SelfTest {
    pub fn new(relay: ProofRelay) -> Self {
        Self { relay }
    }

    fn store(&self) -> &Arc<dyn KeyValueStore> {
        self.relay.store()
    }

    #[instrument(skip(self, owner), fields(principal = %owner))]
    pub async fn run(&self, owner: &Principal, token: &str) -> TestSuiteResults {
        let start_time = now_ms();
        let mut results = Vec::new();

        match self.relay.generate(owner, token, SELFTEST_BALANCE_E8S).await {
            Ok(response) => {
                let proof_id = response.proof_id;
                results.push(TestResult::passed(
                    "Generate ZK Proof",
                    format!("Successfully generated proof with ID: {proof_id}"),
                ));

                let owner_caller = Caller::authenticated(owner.clone());
                results.push(if self.relay.verify(&owner_caller, &proof_id).await {
                    TestResult::passed(
                        "Verify ZK Proof",
                        format!("Successfully verified proof with ID: {proof_id}"),
                    )
                } else {
                    TestResult::failed(
                        "Verify ZK Proof",
                        format!("Failed to verify proof with ID: {proof_id}"),
                        None,
                    )
                });

                results.push(if self.relay.verify(&Caller::Anonymous, &proof_id).await {
                    TestResult::passed(
                        "Anonymous Verification",
                        "Successfully verified proof with anonymous caller".to_string(),
                    )
                } else {
                    TestResult::failed(
                        "Anonymous Verification",
                        "Failed to verify proof with anonymous caller".to_string(),
                        None,
                    )
                });
            }
            Err(e) => results.push(TestResult::failed(
                "Generate ZK Proof",
                "Error generating proof".to_string(),
                Some(e.to_string()),
            )),
        }

        let end_time = now_ms();
        let suite = TestSuiteResults {
            all_passed: results.iter().all(|r| r.success),
            results,
            start_time,
            end_time,
            duration: end_time - start_time,
        };

        info!(
            all_passed = suite.all_passed,
            steps = suite.results.len(),
            duration_ms = suite.duration,
            "Self-test finished"
        );
        suite
    }

    pub async fn save_results(&self, results: &TestSuiteResults) -> Result<(), StoreError> {
        let json = serde_json::to_string(results)?;
        self.store().set(TEST_RESULTS_KEY, json).await
    }

    /// Last saved run. An unreadable entry counts as no results.
    pub async fn load_results(&self) -> Result<Option<TestSuiteResults>, StoreError> {
        let stored = self.store().get(TEST_RESULTS_KEY).await?;
        Ok(stored.and_then(|json| serde_json::from_str(&json).ok()))
    }

    pub async fn clear_results(&self) -> Result<(), StoreError> {
        self.store().remove(TEST_RESULTS_KEY).await.map(|_| ())
    }
}

/// Pretty JSON for download
pub fn export_results(results: &TestSuiteResults) -> String {
    serde_json::to_string_pretty(results).unwrap_or_default()
}
