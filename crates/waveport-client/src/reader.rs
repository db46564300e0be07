//! Ledger history reads.

use std::sync::Arc;

use tracing::debug;
use waveport_core::{
    entry::Entry, error::ReadError, provider::SessionProvider, service::LedgerService,
};

use crate::gate::SessionGate;

/// Fetches the ordered wave history from the remote service on demand.
pub struct LedgerReader<P, S> {
    gate: Arc<SessionGate<P>>,
    service: Arc<S>,
}

impl<P: SessionProvider, S: LedgerService> LedgerReader<P, S> {
    /// Read through the given session gate and service handle.
    pub fn new(gate: Arc<SessionGate<P>>, service: Arc<S>) -> Self {
        Self { gate, service }
    }

    /// Retrieve the complete history in canonical order, oldest first.
    ///
    /// Idempotent; every call returns the current full snapshot, never an
    /// increment. Requires an active session.
    pub async fn fetch_all(&self) -> Result<Vec<Entry>, ReadError> {
        if self.gate.current().is_none() {
            return Err(ReadError::NoSession);
        }
        let entries = self.service.read_all().await?;
        debug!(count = entries.len(), "history snapshot fetched");
        Ok(entries)
    }

    /// Total number of waves accepted by the remote service.
    pub async fn total(&self) -> Result<u64, ReadError> {
        if self.gate.current().is_none() {
            return Err(ReadError::NoSession);
        }
        Ok(self.service.total_entries().await?)
    }
}
