//! Domain records for the wave ledger.
//!
//! The remote service is the sole source of truth for every field here: the
//! core never invents an author, a timestamp, or a message tuple on its own.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque account identifier, externally assigned by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AccountId(String);

impl AccountId {
    /// Wrap an externally assigned identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AccountId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for AccountId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Acceptance timestamp assigned by the remote service, in seconds.
///
/// Opaque to the core: compared for equality and displayed, never
/// interpreted as wall-clock time.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
pub struct Timestamp(u64);

impl Timestamp {
    /// Wrap a service-assigned timestamp.
    #[must_use]
    pub const fn new(secs: u64) -> Self {
        Self(secs)
    }

    /// The raw seconds value.
    #[must_use]
    pub const fn secs(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for Timestamp {
    fn from(secs: u64) -> Self {
        Self(secs)
    }
}

/// One accepted wave as recorded by the remote ledger.
///
/// Two entries describe the same logical event exactly when the full
/// `(author, submitted_at, message)` tuple matches; equality and hashing
/// cover all three fields.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Entry {
    /// Account that submitted the wave.
    pub author: AccountId,
    /// Acceptance time assigned by the remote service.
    pub submitted_at: Timestamp,
    /// User-supplied message text, immutable once accepted.
    pub message: String,
}

impl Entry {
    /// Build an entry from the remote service's accepted view.
    pub fn new(
        author: impl Into<AccountId>,
        submitted_at: impl Into<Timestamp>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            author: author.into(),
            submitted_at: submitted_at.into(),
            message: message.into(),
        }
    }
}
