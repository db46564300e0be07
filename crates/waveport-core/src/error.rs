//! Error taxonomy for the wave client.
//!
//! Two tiers: boundary errors reported by the external collaborators
//! ([`ProviderError`], [`ServiceError`]) and the errors surfaced to the
//! caller of each client operation ([`SessionError`], [`ReadError`],
//! [`WriteError`]).
//!
//! Every failure here is a locally recoverable state, never fatal to the
//! process. The core performs no automatic retries: a failed read or write
//! stays failed until the caller explicitly tries again.

use thiserror::Error;

/// Failures reported by the identity provider boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// No provider is present in the environment.
    #[error("identity provider unavailable")]
    Unavailable,

    /// The user declined the authorization prompt.
    #[error("authorization request rejected")]
    Rejected,
}

/// Failures reported by the remote ledger boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    /// The service could not be reached.
    #[error("ledger service unreachable")]
    Unreachable,

    /// The service refused the request.
    #[error("ledger service rejected the request: {reason}")]
    Rejected {
        /// Reason reported by the service.
        reason: String,
    },

    /// The service failed while handling the request.
    #[error("ledger service fault: {reason}")]
    Fault {
        /// Reason reported by the service.
        reason: String,
    },
}

/// Failures establishing a session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// No identity provider is reachable.
    #[error("no identity provider available")]
    ProviderUnavailable,

    /// The user declined the session request.
    #[error("session request rejected by the user")]
    UserRejected,
}

/// Failures reading the ledger history.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReadError {
    /// No active session; the caller must connect first.
    #[error("no active session")]
    NoSession,

    /// The session or service is unavailable.
    #[error("ledger unreachable")]
    Unreachable,

    /// The remote side failed while serving the read.
    #[error("remote fault: {reason}")]
    RemoteFault {
        /// Reason reported by the service.
        reason: String,
    },
}

impl From<ServiceError> for ReadError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Unreachable => Self::Unreachable,
            ServiceError::Rejected { reason } | ServiceError::Fault { reason } => {
                Self::RemoteFault { reason }
            },
        }
    }
}

/// Failures submitting a wave.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WriteError {
    /// The draft message was empty; nothing was sent.
    #[error("message is empty")]
    EmptyMessage,

    /// No active session; the caller must connect first.
    #[error("no active session")]
    NoSession,

    /// The remote service rejected or failed the operation.
    #[error("write rejected: {reason}")]
    RemoteRejected {
        /// Reason reported by the service.
        reason: String,
    },

    /// Connectivity was lost while the operation was in flight. The write is
    /// not retried; the caller must resubmit explicitly.
    #[error("ledger unreachable")]
    Unreachable,
}

impl From<ServiceError> for WriteError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Unreachable => Self::Unreachable,
            ServiceError::Rejected { reason } | ServiceError::Fault { reason } => {
                Self::RemoteRejected { reason }
            },
        }
    }
}
