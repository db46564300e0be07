//! Ordered wave collection with duplicate suppression.
//!
//! This is the single merge point for the two independent entry sources the
//! client observes: the full history snapshot and the live push channel.
//! `append` is an existence-check-then-insert against the full entry tuple,
//! so at-least-once delivery and confirmed local writes collapse into one
//! element regardless of which source lands first.

use std::collections::HashSet;

use crate::entry::Entry;

/// Ordered collection of accepted waves; insertion order is display order.
///
/// Invariants: no two elements are equal under [`Entry`] equality, and once
/// hydrated, entries are only appended, never reordered or removed.
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    entries: Vec<Entry>,
    seen: HashSet<Entry>,
}

impl ViewState {
    /// Create an empty view.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the contents wholesale with a history snapshot.
    ///
    /// Startup-only: meant to run once, before any live append. Duplicates
    /// inside the snapshot itself are collapsed to their first occurrence.
    pub fn hydrate(&mut self, entries: Vec<Entry>) {
        self.entries.clear();
        self.seen.clear();
        for entry in entries {
            self.append(entry);
        }
    }

    /// Insert at the end unless an equal entry is already present.
    ///
    /// Returns whether an insertion occurred; a duplicate is a silent no-op
    /// by contract, not an error.
    pub fn append(&mut self, entry: Entry) -> bool {
        if self.seen.contains(&entry) {
            return false;
        }
        self.seen.insert(entry.clone());
        self.entries.push(entry);
        true
    }

    /// Current entries, oldest first.
    #[must_use]
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Number of entries in the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the view holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
