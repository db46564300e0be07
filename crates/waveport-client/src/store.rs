//! Shared view store.
//!
//! Wraps the pure [`ViewState`] behind a mutex so `append` is an atomic
//! existence-check-then-insert across the two independent event sources
//! (live channel and write confirmation). The lock is never held across an
//! await.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::warn;
use waveport_core::{entry::Entry, view::ViewState};

/// Cloneable, thread-safe owner of the authoritative wave view.
///
/// The presentation layer receives read-only snapshots; all mutation goes
/// through [`hydrate`](Self::hydrate) and [`append`](Self::append).
#[derive(Debug, Clone, Default)]
pub struct ViewStore {
    inner: Arc<Mutex<ViewState>>,
}

impl ViewStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the contents with a history snapshot.
    ///
    /// Startup-only: running it against a populated view is a caller error
    /// and is logged, but still replaces wholesale.
    pub fn hydrate(&self, entries: Vec<Entry>) {
        let mut state = self.lock();
        if !state.is_empty() {
            warn!("rehydrating a populated view; hydrate is a startup-only operation");
        }
        state.hydrate(entries);
    }

    /// Append unless an equal entry is already present.
    ///
    /// Returns whether an insertion occurred; `false` means duplicate,
    /// silently ignored. This is the sole de-duplication point in the
    /// system, and concurrent callers are serialized by the lock.
    pub fn append(&self, entry: Entry) -> bool {
        self.lock().append(entry)
    }

    /// Read-only snapshot, oldest first. Safe to call at any time.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Entry> {
        self.lock().entries().to_vec()
    }

    /// Number of entries currently in the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether the view holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, ViewState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
