//! Live new-entry subscription with scoped teardown.
//!
//! [`subscribe`] opens the service's notification channel and spawns a
//! forwarder task that invokes the callback once per delivered entry, in
//! channel order. The returned handle owns the forwarder: [`release`]
//! stops it deterministically and waits for it, and dropping the handle
//! aborts it as a backstop. Every exit path, including an error during
//! setup elsewhere in startup, tears the channel down and frees the
//! remote resource.
//!
//! Entries delivered here may duplicate what a concurrent history fetch
//! already returned; de-duplication is the view store's responsibility.
//!
//! [`release`]: SubscriptionHandle::release

use tokio::task::JoinHandle;
use tracing::debug;
use waveport_core::{entry::Entry, error::ReadError, service::LedgerService};

/// Owning handle for a live subscription.
#[derive(Debug)]
pub struct SubscriptionHandle {
    forwarder: JoinHandle<()>,
}

impl SubscriptionHandle {
    /// Tear the subscription down and wait until the forwarder has
    /// stopped.
    ///
    /// After this returns, the callback is guaranteed not to run again and
    /// the channel receiver has been dropped.
    pub async fn release(mut self) {
        self.forwarder.abort();
        // The join error here is the cancellation itself.
        let _ = (&mut self.forwarder).await;
        debug!("live subscription released");
    }

    /// Whether the forwarder is still running.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.forwarder.is_finished()
    }
}

impl Drop for SubscriptionHandle {
    fn drop(&mut self) {
        self.forwarder.abort();
    }
}

/// Open the live channel and forward each delivered entry to `on_entry`.
///
/// The callback is invoked once per delivered entry, in the order the
/// channel emits them, and never before this call returns.
pub async fn subscribe<S, F>(service: &S, on_entry: F) -> Result<SubscriptionHandle, ReadError>
where
    S: LedgerService,
    F: FnMut(Entry) + Send + 'static,
{
    let mut notifications = service.subscribe().await?;
    let forwarder = tokio::spawn(async move {
        let mut on_entry = on_entry;
        while let Some(entry) = notifications.recv().await {
            on_entry(entry);
        }
    });
    debug!("live subscription opened");
    Ok(SubscriptionHandle { forwarder })
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use waveport_core::error::ServiceError;
    use waveport_harness::SimLedger;

    use super::*;

    fn collector() -> (Arc<Mutex<Vec<Entry>>>, impl FnMut(Entry) + Send + 'static) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        (seen, move |entry| sink.lock().unwrap().push(entry))
    }

    #[tokio::test]
    async fn forwards_entries_in_channel_order() {
        let ledger = SimLedger::new("0xABC");
        let (seen, on_entry) = collector();
        let handle = subscribe(&ledger, on_entry).await.expect("subscribed");

        ledger.emit_external("0xDEF", "first");
        ledger.emit_external("0xFEE", "second");
        tokio::task::yield_now().await;

        let messages: Vec<String> =
            seen.lock().unwrap().iter().map(|e| e.message.clone()).collect();
        assert_eq!(messages, ["first", "second"]);
        handle.release().await;
    }

    #[tokio::test]
    async fn no_callbacks_after_release() {
        let ledger = SimLedger::new("0xABC");
        let (seen, on_entry) = collector();
        let handle = subscribe(&ledger, on_entry).await.expect("subscribed");

        ledger.emit_external("0xDEF", "before");
        tokio::task::yield_now().await;
        handle.release().await;

        ledger.emit_external("0xDEF", "after");
        tokio::task::yield_now().await;

        let messages: Vec<String> =
            seen.lock().unwrap().iter().map(|e| e.message.clone()).collect();
        assert_eq!(messages, ["before"], "released subscriptions must go quiet");
    }

    #[tokio::test]
    async fn subscribe_fails_when_service_unreachable() {
        let ledger = SimLedger::new("0xABC");
        ledger.set_unreachable(true);
        let (_seen, on_entry) = collector();

        let err = subscribe(&ledger, on_entry).await.map(|_| ()).expect_err("unreachable");
        assert_eq!(err, ReadError::from(ServiceError::Unreachable));
    }

    #[tokio::test]
    async fn drop_aborts_the_forwarder() {
        let ledger = SimLedger::new("0xABC");
        let (_seen, on_entry) = collector();
        let handle = subscribe(&ledger, on_entry).await.expect("subscribed");

        drop(handle);
        tokio::task::yield_now().await;
        assert_eq!(ledger.live_channels(), 0, "dropping the handle frees the channel");
    }
}
