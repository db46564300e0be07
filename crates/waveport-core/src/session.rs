//! The authorized-account session record.

use crate::entry::AccountId;

/// The state of having an authorized account bound to this client.
///
/// Created by the session gate on a successful handshake, never mutated
/// afterwards, only replaced wholesale on reconnect. At most one session is
/// active per process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    account: AccountId,
}

impl Session {
    /// Bind a session to the account the provider authorized.
    pub fn new(account: impl Into<AccountId>) -> Self {
        Self { account: account.into() }
    }

    /// The authorized account.
    #[must_use]
    pub fn account(&self) -> &AccountId {
        &self.account
    }
}
