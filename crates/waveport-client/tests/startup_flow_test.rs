//! End-to-end startup tests.
//!
//! Exercises the full sequencing: session check, explicit connect,
//! hydration from the history snapshot, and the transition into live
//! updates.

use std::sync::Arc;

use waveport_client::{ConnectError, Coordinator};
use waveport_core::{
    entry::Entry,
    error::{ReadError, SessionError, WriteError},
};
use waveport_harness::{SimLedger, SimProvider};

#[tokio::test]
async fn no_provider_stays_in_connect_state() {
    let ledger = Arc::new(SimLedger::new("0xABC"));
    let coordinator = Coordinator::new(Arc::new(SimProvider::unavailable()), Arc::clone(&ledger));

    assert_eq!(coordinator.resume().await, Ok(None));
    assert_eq!(coordinator.session(), None);
    assert!(coordinator.view().is_empty());
    assert_eq!(ledger.read_calls(), 0, "no session, no history fetch");
}

#[tokio::test]
async fn locked_wallet_waits_for_explicit_connect() {
    let provider = Arc::new(SimProvider::locked("0xABC"));
    let ledger = Arc::new(SimLedger::new("0xABC"));
    ledger.seed(Entry::new("0xDEF", 0_u64, "hi"));

    let coordinator = Coordinator::new(Arc::clone(&provider), Arc::clone(&ledger));

    // Silent check finds nothing; the UI stays in its "connect" state.
    assert_eq!(coordinator.resume().await, Ok(None));
    assert_eq!(provider.prompts(), 0);
    assert!(coordinator.view().is_empty());

    // Explicit connect prompts, hydrates, and goes live.
    let session = coordinator.connect().await.expect("session");
    assert_eq!(session.account().as_str(), "0xABC");
    assert_eq!(provider.prompts(), 1);

    let snapshot = coordinator.view().snapshot();
    assert_eq!(snapshot, vec![Entry::new("0xDEF", 0_u64, "hi")]);
}

#[tokio::test]
async fn preauthorized_session_resumes_without_prompting() {
    let provider = Arc::new(SimProvider::authorized("0xABC"));
    let ledger = Arc::new(SimLedger::new("0xABC"));
    ledger.seed(Entry::new("0xDEF", 0_u64, "hi"));

    let coordinator = Coordinator::new(Arc::clone(&provider), ledger);
    let session = coordinator.resume().await.expect("resume").expect("session");

    assert_eq!(session.account().as_str(), "0xABC");
    assert_eq!(provider.prompts(), 0, "resume must never prompt");
    assert_eq!(coordinator.view().len(), 1);
}

#[tokio::test]
async fn live_entries_append_after_hydration() {
    let ledger = Arc::new(SimLedger::new("0xABC"));
    ledger.seed(Entry::new("0xDEF", 0_u64, "hi"));

    let coordinator = Coordinator::new(Arc::new(SimProvider::authorized("0xABC")), Arc::clone(&ledger));
    coordinator.resume().await.expect("resume").expect("session");

    let live = ledger.emit_external("0xDEF", "yo");
    tokio::task::yield_now().await;

    let snapshot = coordinator.view().snapshot();
    assert_eq!(snapshot.len(), 2, "hydrated entry first, then the live one");
    assert_eq!(snapshot[0].message, "hi");
    assert_eq!(snapshot[1], live);
}

#[tokio::test]
async fn rejected_connect_keeps_submit_failing() {
    let ledger = Arc::new(SimLedger::new("0xABC"));
    let coordinator = Coordinator::new(Arc::new(SimProvider::rejecting()), Arc::clone(&ledger));

    let err = coordinator.connect().await.expect_err("user declined");
    assert_eq!(err, ConnectError::Session(SessionError::UserRejected));
    assert_eq!(coordinator.session(), None);

    let err = coordinator.submit_wave("hello").await.expect_err("still sessionless");
    assert_eq!(err, WriteError::NoSession);
    assert_eq!(ledger.submit_calls(), 0);
}

#[tokio::test]
async fn failed_hydration_is_recoverable_by_explicit_retry() {
    let provider = Arc::new(SimProvider::authorized("0xABC"));
    let ledger = Arc::new(SimLedger::new("0xABC"));
    ledger.seed(Entry::new("0xDEF", 0_u64, "hi"));
    ledger.set_unreachable(true);

    let coordinator = Coordinator::new(provider, Arc::clone(&ledger));
    assert_eq!(coordinator.resume().await, Err(ReadError::Unreachable));
    assert!(coordinator.view().is_empty());
    assert_eq!(ledger.live_channels(), 0, "no subscription without hydration");

    // The session survived; a caller-initiated retry completes startup.
    ledger.set_unreachable(false);
    coordinator.resume().await.expect("retry").expect("session");
    assert_eq!(coordinator.view().len(), 1);
    assert_eq!(ledger.live_channels(), 1);
}

#[tokio::test]
async fn total_waves_tracks_the_remote_count() {
    let ledger = Arc::new(SimLedger::new("0xABC"));
    ledger.seed(Entry::new("0xDEF", 0_u64, "hi"));

    let coordinator = Coordinator::new(Arc::new(SimProvider::authorized("0xABC")), Arc::clone(&ledger));
    coordinator.resume().await.expect("resume").expect("session");

    assert_eq!(coordinator.total_waves().await, Ok(1));
    ledger.emit_external("0xFEE", "more");
    assert_eq!(coordinator.total_waves().await, Ok(2));
}
