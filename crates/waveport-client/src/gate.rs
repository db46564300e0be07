//! Session gate: the singleton wallet session.
//!
//! Holds the injected provider capability plus the one active session
//! slot. A flight guard serializes concurrent handshakes, so a second
//! caller observes the first's result instead of racing a second prompt.

use std::sync::{Arc, PoisonError, RwLock};

use tokio::sync::Mutex;
use tracing::{debug, info};
use waveport_core::{
    entry::AccountId,
    error::{ProviderError, SessionError},
    provider::SessionProvider,
    session::Session,
};

/// Establishes and holds the single active identity session.
pub struct SessionGate<P> {
    provider: Arc<P>,
    flight: Mutex<()>,
    session: RwLock<Option<Session>>,
}

impl<P: SessionProvider> SessionGate<P> {
    /// Gate the given provider capability.
    pub fn new(provider: Arc<P>) -> Self {
        Self {
            provider,
            flight: Mutex::new(()),
            session: RwLock::new(None),
        }
    }

    /// The active session, if any. Never suspends on provider I/O.
    #[must_use]
    pub fn current(&self) -> Option<Session> {
        self.session.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Query for an already-authorized account without prompting.
    ///
    /// Provider absence and provider-side failures degrade to `None`:
    /// having no session is a steady state the caller can act on, not an
    /// error.
    pub async fn check_existing(&self) -> Option<Session> {
        if let Some(session) = self.current() {
            return Some(session);
        }
        let _flight = self.flight.lock().await;
        if let Some(session) = self.current() {
            return Some(session);
        }
        match self.provider.accounts().await {
            Ok(accounts) => accounts.into_iter().next().map(|account| self.install(account)),
            Err(err) => {
                debug!(%err, "no pre-authorized account");
                None
            },
        }
    }

    /// Actively request authorization, prompting the user if needed.
    ///
    /// Returns the existing session when one is already established; the
    /// session is a process-wide singleton.
    pub async fn request(&self) -> Result<Session, SessionError> {
        if let Some(session) = self.current() {
            return Ok(session);
        }
        let _flight = self.flight.lock().await;
        if let Some(session) = self.current() {
            return Ok(session);
        }
        let accounts = self.provider.request_accounts().await.map_err(|err| match err {
            ProviderError::Unavailable => SessionError::ProviderUnavailable,
            ProviderError::Rejected => SessionError::UserRejected,
        })?;
        // An accepted prompt that authorizes nothing is a decline.
        let account = accounts.into_iter().next().ok_or(SessionError::UserRejected)?;
        Ok(self.install(account))
    }

    fn install(&self, account: AccountId) -> Session {
        let session = Session::new(account);
        info!(account = %session.account(), "session established");
        *self.session.write().unwrap_or_else(PoisonError::into_inner) = Some(session.clone());
        session
    }
}
