//! Identity provider capability.
//!
//! Host environments tend to expose the wallet as an ambient global; here
//! it is an injected capability so a test double can stand in. Absence of
//! the provider is a detectable condition ([`ProviderError::Unavailable`]),
//! never a crash.

use async_trait::async_trait;

use crate::{entry::AccountId, error::ProviderError};

/// External identity provider that can authorize accounts for this client.
#[async_trait]
pub trait SessionProvider: Send + Sync + 'static {
    /// Accounts already authorized for this client, without prompting.
    ///
    /// Returns an empty list when the provider is present but no account is
    /// pre-authorized.
    async fn accounts(&self) -> Result<Vec<AccountId>, ProviderError>;

    /// Ask the provider to authorize an account.
    ///
    /// May surface a user-facing prompt outside this core's control.
    async fn request_accounts(&self) -> Result<Vec<AccountId>, ProviderError>;
}
