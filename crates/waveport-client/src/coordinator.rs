//! Top-level coordinator.
//!
//! Sequences the startup path (session, then hydrate, then live
//! subscription) and mediates the write path (submit, confirm, merge into
//! the view). Hydration always precedes the first live append because the
//! subscription is opened only after the snapshot has landed; the ordering
//! guarantee comes from sequencing, not locking.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::{Mutex, watch};
use tracing::{debug, info};
use waveport_core::{
    entry::Entry,
    error::{ReadError, SessionError, WriteError},
    provider::SessionProvider,
    service::LedgerService,
    session::Session,
    write::WriteStatus,
};

use crate::{
    gate::SessionGate,
    reader::LedgerReader,
    store::ViewStore,
    subscription::{self, SubscriptionHandle},
    writer::LedgerWriter,
};

/// Failures on the connect-then-start path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectError {
    /// Establishing the session failed.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// The session exists but hydrating or subscribing failed.
    #[error(transparent)]
    Read(#[from] ReadError),
}

/// Orchestrates the session gate, reader, writer, live subscription, and
/// view store behind one handle for the presentation layer.
pub struct Coordinator<P: SessionProvider, S: LedgerService> {
    gate: Arc<SessionGate<P>>,
    reader: LedgerReader<P, S>,
    writer: LedgerWriter<P, S>,
    service: Arc<S>,
    view: ViewStore,
    subscription: Mutex<Option<SubscriptionHandle>>,
}

impl<P: SessionProvider, S: LedgerService> Coordinator<P, S> {
    /// Wire a coordinator from the two injected capabilities.
    pub fn new(provider: Arc<P>, service: Arc<S>) -> Self {
        let gate = Arc::new(SessionGate::new(provider));
        Self {
            reader: LedgerReader::new(Arc::clone(&gate), Arc::clone(&service)),
            writer: LedgerWriter::new(Arc::clone(&gate), Arc::clone(&service)),
            gate,
            service,
            view: ViewStore::new(),
            subscription: Mutex::new(None),
        }
    }

    /// Resume a pre-authorized session without prompting.
    ///
    /// `Ok(None)` is the steady "connect" state: no session exists and
    /// nothing happens until the user explicitly triggers
    /// [`connect`](Self::connect).
    pub async fn resume(&self) -> Result<Option<Session>, ReadError> {
        let Some(session) = self.gate.check_existing().await else {
            debug!("no pre-authorized session; waiting for explicit connect");
            return Ok(None);
        };
        self.start().await?;
        Ok(Some(session))
    }

    /// Establish a session via the provider prompt, then hydrate and go
    /// live.
    pub async fn connect(&self) -> Result<Session, ConnectError> {
        let session = self.gate.request().await?;
        self.start().await?;
        Ok(session)
    }

    /// Submit a wave and merge the confirmed entry into the view.
    ///
    /// If the live channel already delivered the identical tuple, the
    /// merge is a no-op and the view is unchanged.
    pub async fn submit_wave(&self, message: &str) -> Result<Entry, WriteError> {
        let submission = self.writer.submit(message).await?;
        let entry = self.writer.await_confirmation(submission).await?;
        if !self.view.append(entry.clone()) {
            debug!("confirmed wave already delivered by the live channel");
        }
        Ok(entry)
    }

    /// Total number of waves accepted by the remote ledger.
    pub async fn total_waves(&self) -> Result<u64, ReadError> {
        self.reader.total().await
    }

    /// The authoritative local view of the log.
    #[must_use]
    pub fn view(&self) -> &ViewStore {
        &self.view
    }

    /// The active session, if any.
    #[must_use]
    pub fn session(&self) -> Option<Session> {
        self.gate.current()
    }

    /// Observe the most recent submission's lifecycle status.
    pub fn write_status(&self) -> watch::Receiver<Option<WriteStatus>> {
        self.writer.status()
    }

    /// Release the live subscription. Idempotent; safe on teardown paths
    /// that never went live.
    pub async fn shutdown(&self) {
        let handle = self.subscription.lock().await.take();
        if let Some(handle) = handle {
            handle.release().await;
        }
    }

    /// Hydrate the view from the full history, then open the live channel.
    async fn start(&self) -> Result<(), ReadError> {
        let history = self.reader.fetch_all().await?;
        self.view.hydrate(history);

        let view = self.view.clone();
        let handle = subscription::subscribe(self.service.as_ref(), move |entry| {
            view.append(entry);
        })
        .await?;

        let previous = self.subscription.lock().await.replace(handle);
        if let Some(previous) = previous {
            previous.release().await;
        }
        info!(waves = self.view.len(), "hydrated and subscribed");
        Ok(())
    }
}
