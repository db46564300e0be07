//! Scripted identity-provider double.

use std::sync::{
    Mutex, MutexGuard, PoisonError,
    atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;
use waveport_core::{entry::AccountId, error::ProviderError, provider::SessionProvider};

/// Behavior script for [`SimProvider`].
#[derive(Debug, Clone)]
enum Script {
    /// No provider present in the environment.
    Unavailable,
    /// An account is already authorized; no prompt needed.
    Authorized(AccountId),
    /// The account authorizes only after an explicit prompt.
    Locked {
        account: AccountId,
        unlocked: bool,
    },
    /// The user declines every prompt.
    Rejecting,
}

/// Deterministic wallet-provider double.
///
/// Counts every silent query and every prompt so tests can assert
/// "never prompted" and "prompted exactly once" properties.
#[derive(Debug)]
pub struct SimProvider {
    script: Mutex<Script>,
    account_queries: AtomicUsize,
    prompts: AtomicUsize,
}

impl SimProvider {
    fn with_script(script: Script) -> Self {
        Self {
            script: Mutex::new(script),
            account_queries: AtomicUsize::new(0),
            prompts: AtomicUsize::new(0),
        }
    }

    /// No provider present in the environment.
    #[must_use]
    pub fn unavailable() -> Self {
        Self::with_script(Script::Unavailable)
    }

    /// Provider with a pre-authorized account.
    pub fn authorized(account: impl Into<AccountId>) -> Self {
        Self::with_script(Script::Authorized(account.into()))
    }

    /// Provider that authorizes the account only after an explicit prompt.
    pub fn locked(account: impl Into<AccountId>) -> Self {
        Self::with_script(Script::Locked { account: account.into(), unlocked: false })
    }

    /// Provider whose user declines every prompt.
    #[must_use]
    pub fn rejecting() -> Self {
        Self::with_script(Script::Rejecting)
    }

    /// Number of silent account queries served.
    pub fn account_queries(&self) -> usize {
        self.account_queries.load(Ordering::SeqCst)
    }

    /// Number of authorization prompts shown.
    pub fn prompts(&self) -> usize {
        self.prompts.load(Ordering::SeqCst)
    }

    fn lock(&self) -> MutexGuard<'_, Script> {
        self.script.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl SessionProvider for SimProvider {
    async fn accounts(&self) -> Result<Vec<AccountId>, ProviderError> {
        self.account_queries.fetch_add(1, Ordering::SeqCst);
        let script = self.lock().clone();
        match script {
            Script::Unavailable => Err(ProviderError::Unavailable),
            Script::Authorized(account) | Script::Locked { account, unlocked: true } => {
                Ok(vec![account])
            },
            Script::Locked { unlocked: false, .. } | Script::Rejecting => Ok(Vec::new()),
        }
    }

    async fn request_accounts(&self) -> Result<Vec<AccountId>, ProviderError> {
        self.prompts.fetch_add(1, Ordering::SeqCst);
        let mut script = self.lock();
        match &mut *script {
            Script::Unavailable => Err(ProviderError::Unavailable),
            Script::Authorized(account) => Ok(vec![account.clone()]),
            Script::Locked { account, unlocked } => {
                *unlocked = true;
                Ok(vec![account.clone()])
            },
            Script::Rejecting => Err(ProviderError::Rejected),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn locked_provider_unlocks_on_prompt() {
        let provider = SimProvider::locked("0xABC");

        assert_eq!(provider.accounts().await, Ok(Vec::new()));
        let authorized = provider.request_accounts().await.expect("prompt accepted");
        assert_eq!(authorized.len(), 1);

        // Once authorized, silent queries see the account too
        assert_eq!(provider.accounts().await.expect("query").len(), 1);
        assert_eq!(provider.account_queries(), 2);
        assert_eq!(provider.prompts(), 1);
    }

    #[tokio::test]
    async fn rejecting_provider_counts_prompts() {
        let provider = SimProvider::rejecting();
        assert_eq!(provider.request_accounts().await, Err(ProviderError::Rejected));
        assert_eq!(provider.request_accounts().await, Err(ProviderError::Rejected));
        assert_eq!(provider.prompts(), 2);
    }
}
