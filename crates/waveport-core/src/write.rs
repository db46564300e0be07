//! Write-lifecycle state machine.
//!
//! One [`PendingWrite`] tracks one submission from draft to terminal state.
//! The machine is pure: time is supplied by the caller and the driver code
//! (the ledger writer) executes the remote calls between transitions.
//!
//! # State Machine
//!
//! ```text
//! ┌──────────┐ begin_submit ┌────────────┐ accepted ┌──────────────────────┐
//! │ Drafting │─────────────>│ Submitting │─────────>│ AwaitingConfirmation │
//! └──────────┘              └────────────┘          └──────────────────────┘
//!                                 │ failed              │ confirmed │ failed
//!                                 ↓                     ↓           ↓
//!                            ┌────────┐          ┌───────────┐ ┌────────┐
//!                            │ Failed │          │ Confirmed │ │ Failed │
//!                            └────────┘          └───────────┘ └────────┘
//! ```
//!
//! Confirmed and Failed are terminal; the record is discarded once a
//! terminal state has been reflected to the caller. Transitions are
//! monotone: an illegal move is refused and reported through the `bool`
//! return, mirroring the view's duplicate-append contract.

use std::time::SystemTime;

/// Lifecycle states of one submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteStatus {
    /// Draft exists locally; nothing sent yet.
    Drafting,
    /// The write request is on its way to the remote service.
    Submitting,
    /// The service accepted the request; finality is pending.
    AwaitingConfirmation,
    /// The service finalized the write. Terminal.
    Confirmed,
    /// The write was rejected or lost. Terminal.
    Failed,
}

impl WriteStatus {
    /// Whether this status admits no further transitions.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Confirmed | Self::Failed)
    }
}

/// Transient record of one in-flight submission.
///
/// The request timestamp comes from the local clock and is advisory only;
/// the authoritative acceptance time arrives with the confirmed entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingWrite {
    draft_message: String,
    requested_at: SystemTime,
    status: WriteStatus,
}

impl PendingWrite {
    /// Create a record in Drafting state.
    ///
    /// # Arguments
    /// * `draft_message` - The user's message text
    /// * `requested_at` - Local time of the request (advisory)
    pub fn new(draft_message: impl Into<String>, requested_at: SystemTime) -> Self {
        Self {
            draft_message: draft_message.into(),
            requested_at,
            status: WriteStatus::Drafting,
        }
    }

    /// Current lifecycle status.
    #[must_use]
    pub const fn status(&self) -> WriteStatus {
        self.status
    }

    /// The draft text this record tracks.
    #[must_use]
    pub fn draft_message(&self) -> &str {
        &self.draft_message
    }

    /// Local request time (advisory).
    #[must_use]
    pub const fn requested_at(&self) -> SystemTime {
        self.requested_at
    }

    /// Transition Drafting → Submitting. Returns whether it applied.
    pub fn begin_submit(&mut self) -> bool {
        self.advance(WriteStatus::Drafting, WriteStatus::Submitting)
    }

    /// Transition Submitting → AwaitingConfirmation. Returns whether it
    /// applied.
    pub fn accepted(&mut self) -> bool {
        self.advance(WriteStatus::Submitting, WriteStatus::AwaitingConfirmation)
    }

    /// Transition AwaitingConfirmation → Confirmed. Returns whether it
    /// applied.
    pub fn confirmed(&mut self) -> bool {
        self.advance(WriteStatus::AwaitingConfirmation, WriteStatus::Confirmed)
    }

    /// Transition Submitting or AwaitingConfirmation → Failed. Returns
    /// whether it applied.
    pub fn failed(&mut self) -> bool {
        match self.status {
            WriteStatus::Submitting | WriteStatus::AwaitingConfirmation => {
                self.status = WriteStatus::Failed;
                true
            },
            _ => false,
        }
    }

    fn advance(&mut self, from: WriteStatus, to: WriteStatus) -> bool {
        if self.status == from {
            self.status = to;
            true
        } else {
            false
        }
    }
}
