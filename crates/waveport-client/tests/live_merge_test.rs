//! Live-channel merge tests.
//!
//! Verifies that the view store is the single reconciliation point for the
//! two independent entry sources: at-least-once live delivery and the
//! write-confirmation path.

use std::sync::Arc;

use waveport_client::Coordinator;
use waveport_core::entry::Entry;
use waveport_harness::{SimLedger, SimProvider};

async fn connected() -> (Arc<SimLedger>, Coordinator<SimProvider, SimLedger>) {
    let ledger = Arc::new(SimLedger::new("0xABC"));
    let coordinator = Coordinator::new(Arc::new(SimProvider::authorized("0xABC")), Arc::clone(&ledger));
    coordinator.resume().await.expect("resume").expect("session");
    (ledger, coordinator)
}

#[tokio::test]
async fn duplicate_live_delivery_is_absorbed() {
    let (ledger, coordinator) = connected().await;

    let entry = ledger.emit_external("0xDEF", "hi");
    tokio::task::yield_now().await;
    assert_eq!(coordinator.view().len(), 1);

    // The service redelivers the same tuple (at-least-once channel).
    ledger.rebroadcast(&entry);
    tokio::task::yield_now().await;
    assert_eq!(coordinator.view().len(), 1, "redelivery must not duplicate");
}

#[tokio::test]
async fn confirmed_write_after_live_delivery_is_a_no_op() {
    let (ledger, coordinator) = connected().await;

    let entry = ledger.emit_external("0xDEF", "hi");
    tokio::task::yield_now().await;
    assert_eq!(coordinator.view().len(), 1);

    // A later merge of the identical tuple (the confirmation path) is
    // silently ignored.
    assert!(!coordinator.view().append(entry));
    assert_eq!(coordinator.view().len(), 1);
}

#[tokio::test]
async fn near_duplicates_remain_distinct_waves() {
    let (ledger, coordinator) = connected().await;

    ledger.emit_external("0xDEF", "hi");
    ledger.emit_external("0xDEF", "hi");
    tokio::task::yield_now().await;

    // Same author and text, different acceptance times: two waves.
    assert_eq!(coordinator.view().len(), 2);
}

#[tokio::test]
async fn shutdown_stops_live_updates() {
    let (ledger, coordinator) = connected().await;
    assert_eq!(ledger.live_channels(), 1);

    coordinator.shutdown().await;
    assert_eq!(ledger.live_channels(), 0, "release frees the remote channel");

    ledger.emit_external("0xDEF", "hi");
    tokio::task::yield_now().await;
    assert!(coordinator.view().is_empty(), "no appends after release");

    // Idempotent on teardown paths that run twice.
    coordinator.shutdown().await;
}

#[tokio::test]
async fn reconnect_replaces_the_live_channel() {
    let (ledger, coordinator) = connected().await;
    ledger.seed(Entry::new("0xDEF", 0_u64, "hi"));

    // A second startup pass rehydrates and swaps the subscription instead
    // of stacking a second one.
    coordinator.resume().await.expect("resume").expect("session");
    tokio::task::yield_now().await;
    assert_eq!(ledger.live_channels(), 1);

    ledger.emit_external("0xDEF", "yo");
    tokio::task::yield_now().await;
    assert_eq!(coordinator.view().len(), 2, "one hydrated entry plus one live entry");
}
