//! Remote ledger service capability.
//!
//! The ledger is an external, authoritative, append-only store of waves.
//! This core consumes its protocol as an opaque black box: no wire format,
//! signing, or fee handling is modeled here.
//!
//! The live channel is an owned receiver rather than an add/remove listener
//! pair: dropping the receiver is the deregistration, so teardown composes
//! with scoped ownership instead of requiring a matching `off` call.

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::{entry::Entry, error::ServiceError};

/// Session-bound handle to the remote append-only wave ledger.
#[async_trait]
pub trait LedgerService: Send + Sync + 'static {
    /// Opaque handle for an accepted-but-unconfirmed write.
    type Operation: Send + 'static;

    /// Full history in the service's canonical order, oldest first.
    ///
    /// Idempotent; every call returns the current complete snapshot.
    async fn read_all(&self) -> Result<Vec<Entry>, ServiceError>;

    /// Total number of accepted waves.
    async fn total_entries(&self) -> Result<u64, ServiceError>;

    /// Submit a wave for acceptance.
    ///
    /// Resolves once the service has accepted the request, returning a
    /// handle for the still-unconfirmed operation.
    async fn submit(&self, message: &str) -> Result<Self::Operation, ServiceError>;

    /// Suspend until the service finalizes the operation.
    ///
    /// The returned entry is the service's accepted view, authoritative for
    /// the acceptance timestamp.
    async fn await_operation(&self, operation: Self::Operation) -> Result<Entry, ServiceError>;

    /// Open the new-entry notification channel.
    ///
    /// Each accepted wave is delivered at most once per channel, in
    /// per-channel order; ordering across concurrent writers is not
    /// guaranteed beyond that. Delivery may overlap what a concurrent
    /// [`read_all`](Self::read_all) already returned. The channel is
    /// unbounded: delivery rate is the remote side's concern and the
    /// client must not drop notifications.
    async fn subscribe(&self) -> Result<mpsc::UnboundedReceiver<Entry>, ServiceError>;
}
