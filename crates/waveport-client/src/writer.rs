//! Write submission and confirmation lifecycle.
//!
//! Drives the pure [`PendingWrite`] machine across the remote submit and
//! confirm calls. The latest submission's status is published through a
//! watch channel so the presentation layer can show a busy state while a
//! confirmation is pending.

use std::{sync::Arc, time::SystemTime};

use tokio::sync::watch;
use tracing::{debug, info, warn};
use waveport_core::{
    entry::Entry,
    error::WriteError,
    provider::SessionProvider,
    service::LedgerService,
    write::{PendingWrite, WriteStatus},
};

use crate::gate::SessionGate;

/// An accepted submission waiting for finality.
///
/// Bundles the lifecycle record with the service's opaque operation handle.
#[derive(Debug)]
pub struct Submission<Op> {
    record: PendingWrite,
    operation: Op,
}

impl<Op> Submission<Op> {
    /// Current lifecycle status.
    #[must_use]
    pub fn status(&self) -> WriteStatus {
        self.record.status()
    }

    /// The lifecycle record for this submission.
    #[must_use]
    pub fn record(&self) -> &PendingWrite {
        &self.record
    }
}

/// Submits new waves and tracks their confirmation lifecycle.
///
/// Failures are never retried here: a lost or rejected write stays failed
/// until the caller resubmits explicitly.
pub struct LedgerWriter<P, S: LedgerService> {
    gate: Arc<SessionGate<P>>,
    service: Arc<S>,
    status: watch::Sender<Option<WriteStatus>>,
}

impl<P: SessionProvider, S: LedgerService> LedgerWriter<P, S> {
    /// Write through the given session gate and service handle.
    pub fn new(gate: Arc<SessionGate<P>>, service: Arc<S>) -> Self {
        let (status, _) = watch::channel(None);
        Self { gate, service, status }
    }

    /// Observe the most recent submission's status.
    ///
    /// `None` until the first submission; a terminal status stays visible
    /// until the next submission replaces it.
    pub fn status(&self) -> watch::Receiver<Option<WriteStatus>> {
        self.status.subscribe()
    }

    /// Validate and submit a wave.
    ///
    /// Fails with [`WriteError::EmptyMessage`] on an empty draft and
    /// [`WriteError::NoSession`] without an active session, in both cases
    /// before any remote call. On acceptance the returned submission is in
    /// AwaitingConfirmation.
    pub async fn submit(&self, message: &str) -> Result<Submission<S::Operation>, WriteError> {
        if message.is_empty() {
            return Err(WriteError::EmptyMessage);
        }
        if self.gate.current().is_none() {
            return Err(WriteError::NoSession);
        }

        let mut record = PendingWrite::new(message, SystemTime::now());
        record.begin_submit();
        self.status.send_replace(Some(record.status()));
        debug!("submitting wave");

        match self.service.submit(message).await {
            Ok(operation) => {
                record.accepted();
                self.status.send_replace(Some(record.status()));
                debug!("write accepted, awaiting confirmation");
                Ok(Submission { record, operation })
            },
            Err(err) => {
                record.failed();
                self.status.send_replace(Some(record.status()));
                warn!(%err, "wave submission failed");
                Err(err.into())
            },
        }
    }

    /// Suspend until the remote service finalizes the submission.
    ///
    /// On success the returned entry is the service's accepted view: the
    /// remote side is authoritative for the acceptance timestamp, never the
    /// local draft. The caller is responsible for merging the entry into
    /// the view store.
    pub async fn await_confirmation(
        &self,
        submission: Submission<S::Operation>,
    ) -> Result<Entry, WriteError> {
        let Submission { mut record, operation } = submission;
        match self.service.await_operation(operation).await {
            Ok(entry) => {
                record.confirmed();
                self.status.send_replace(Some(record.status()));
                info!(author = %entry.author, at = %entry.submitted_at, "wave confirmed");
                Ok(entry)
            },
            Err(err) => {
                record.failed();
                self.status.send_replace(Some(record.status()));
                warn!(%err, "wave confirmation failed");
                Err(err.into())
            },
        }
    }
}
