//! Proof relay and self-test behaviour against fake canisters

mod common;

use std::sync::atomic::Ordering;

use common::{harness, FakeProver, PROOF_BYTES, PROOF_ID, PUBLIC_ORIGIN};
use proof_dashboard::ledger::Principal;
use proof_dashboard::remote::{Caller, RemoteError};
use proof_dashboard::services::relay::proof_key;
use proof_dashboard::services::selftest::TEST_RESULTS_KEY;
use proof_dashboard::services::{RelayError, SelfTest};
use proof_dashboard::store::KeyValueStore;
use proof_dashboard::types::TokenStandard;

fn owner() -> Principal {
    Principal::from_slice(&[1, 2, 3]).unwrap()
}

#[tokio::test]
async fn generate_then_verify_round_trip() {
    let h = harness(FakeProver::default());

    let response = h.relay.generate(&owner(), "ICP", 10).await.unwrap();
    assert_eq!(response.proof_id, PROOF_ID);
    assert_eq!(response.token, "ICP");
    assert_eq!(
        response.proof_link,
        format!("{PUBLIC_ORIGIN}/verify?proofId={PROOF_ID}")
    );

    // blob cached under proof_<id>
    let stored = h.store.get(&proof_key(PROOF_ID)).await.unwrap().unwrap();
    assert_eq!(hex::decode(stored).unwrap(), PROOF_BYTES.to_vec());

    assert!(h.relay.verify(&Caller::authenticated(owner()), PROOF_ID).await);
    assert!(h.relay.verify(&Caller::Anonymous, PROOF_ID).await);
    assert!(h.notifier.recent().is_empty());
}

#[tokio::test]
async fn generate_passes_owner_fields_through() {
    let h = harness(FakeProver::default());
    h.relay.generate(&owner(), "ICP", 10).await.unwrap();

    let (token, input) = h.prover.last_input.lock().unwrap().clone().unwrap();
    assert_eq!(token, "ICP");
    assert_eq!(input.balance, vec![0, 0, 0, 0, 0, 0, 0, 10]);
    assert_eq!(input.owner_hash, owner().to_text().into_bytes());
    assert_eq!(input.token_metadata.token_standard, TokenStandard::ICP);
    assert_eq!(input.token_metadata.canister_id, "ryjl3-tyaaa-aaaaa-aaaba-cai");

    let callers = h.prover.callers.lock().unwrap();
    assert_eq!(callers[0], Caller::authenticated(owner()));
}

#[tokio::test]
async fn anonymous_owner_cannot_generate() {
    let h = harness(FakeProver::default());

    let err = h
        .relay
        .generate(&Principal::anonymous(), "ICP", 10)
        .await
        .unwrap_err();
    assert!(matches!(err, RelayError::AnonymousOwner(_)));
    assert_eq!(h.prover.prove_calls.load(Ordering::SeqCst), 0);
    assert!(h.store.keys().await.unwrap().is_empty());
    assert_eq!(h.notifier.recent()[0].title, "Failed to generate ZK proof");
}

#[tokio::test]
async fn unknown_proof_id_is_false_without_remote_call() {
    let h = harness(FakeProver::default());

    assert!(!h.relay.verify(&Caller::Anonymous, "0000000000000000").await);
    assert_eq!(h.prover.verify_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn failed_generation_notifies_and_rejects() {
    let h = harness(FakeProver {
        fail_prove: true,
        ..FakeProver::default()
    });

    let err = h.relay.generate(&owner(), "ICP", 10).await.unwrap_err();
    assert!(matches!(err, RelayError::Remote(RemoteError::Unavailable(_))));
    assert!(h.store.keys().await.unwrap().is_empty());

    let notes = h.notifier.recent();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].title, "Failed to generate ZK proof");
}

#[tokio::test]
async fn failed_remote_verify_degrades_to_false() {
    let h = harness(FakeProver {
        fail_verify: true,
        ..FakeProver::default()
    });

    h.relay.generate(&owner(), "ICP", 10).await.unwrap();
    assert!(!h.relay.verify(&Caller::Anonymous, PROOF_ID).await);
    assert_eq!(h.prover.verify_calls.load(Ordering::SeqCst), 1);
    assert_eq!(h.notifier.recent()[0].title, "Failed to verify ZK proof");
}

#[tokio::test]
async fn corrupt_stored_proof_is_false() {
    let h = harness(FakeProver::default());
    h.store
        .set(&proof_key(PROOF_ID), "not hex".to_string())
        .await
        .unwrap();

    assert!(!h.relay.verify(&Caller::Anonymous, PROOF_ID).await);
    assert_eq!(h.prover.verify_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn forget_removes_proof() {
    let h = harness(FakeProver::default());
    h.relay.generate(&owner(), "ICP", 10).await.unwrap();

    assert!(h.relay.forget(PROOF_ID).await.unwrap());
    assert!(!h.relay.forget(PROOF_ID).await.unwrap());
    assert!(!h.relay.verify(&Caller::Anonymous, PROOF_ID).await);
}

#[tokio::test]
async fn selftest_passes_and_caches_results() {
    let h = harness(FakeProver::default());
    let selftest = SelfTest::new(h.relay.clone());

    let results = selftest.run(&owner(), "ICP").await;
    assert!(results.all_passed);
    let names: Vec<_> = results.results.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["Generate ZK Proof", "Verify ZK Proof", "Anonymous Verification"]
    );
    assert!(results.end_time >= results.start_time);

    // third call is the anonymous one
    assert_eq!(h.prover.callers.lock().unwrap()[2], Caller::Anonymous);

    selftest.save_results(&results).await.unwrap();
    assert!(h.store.get(TEST_RESULTS_KEY).await.unwrap().is_some());
    assert_eq!(selftest.load_results().await.unwrap(), Some(results));

    selftest.clear_results().await.unwrap();
    assert_eq!(selftest.load_results().await.unwrap(), None);
}

#[tokio::test]
async fn selftest_stops_after_failed_generation() {
    let h = harness(FakeProver {
        fail_prove: true,
        ..FakeProver::default()
    });
    let selftest = SelfTest::new(h.relay.clone());

    let results = selftest.run(&owner(), "ICP").await;
    assert!(!results.all_passed);
    assert_eq!(results.results.len(), 1);
    assert!(results.results[0].error.is_some());
    assert_eq!(h.prover.verify_calls.load(Ordering::SeqCst), 0);
}
