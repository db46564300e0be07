//! In-memory ledger double with failure injection.
//!
//! Controllable stand-in for the remote wave ledger: an append-only log,
//! deterministic acceptance timestamps, a live broadcast channel, held
//! confirmations for driving the write lifecycle step by step, and
//! injectable faults, with request counting for "no remote call"
//! assertions.

use std::{
    collections::VecDeque,
    sync::{
        Mutex, MutexGuard, PoisonError,
        atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering},
    },
};

use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};
use tracing::debug;
use waveport_core::{
    entry::{AccountId, Entry, Timestamp},
    error::ServiceError,
    service::LedgerService,
};

/// Opaque pending-operation handle handed out by [`SimLedger`].
#[derive(Debug)]
pub struct SimOperation {
    outcome: oneshot::Receiver<Result<Entry, ServiceError>>,
}

/// A write accepted while confirmations are held.
struct HeldWrite {
    message: String,
    outcome: oneshot::Sender<Result<Entry, ServiceError>>,
}

/// Deterministic in-memory wave ledger.
///
/// Accepted writes are stamped with the configured author (the connected
/// account) and a monotonically increasing acceptance timestamp. Every
/// accepted write is appended to the log and broadcast on every open live
/// channel, including the submitting client's own channel. That is exactly
/// the duplicate-delivery race the view store has to absorb.
pub struct SimLedger {
    author: AccountId,
    log: Mutex<Vec<Entry>>,
    clock: AtomicU64,
    subscribers: Mutex<Vec<mpsc::UnboundedSender<Entry>>>,
    held: Mutex<VecDeque<HeldWrite>>,
    hold_confirmations: AtomicBool,
    unreachable: AtomicBool,
    reject_submits: AtomicBool,
    read_fault: Mutex<Option<String>>,
    read_calls: AtomicUsize,
    submit_calls: AtomicUsize,
}

impl SimLedger {
    /// Ledger whose accepted writes are authored by `author`.
    pub fn new(author: impl Into<AccountId>) -> Self {
        Self {
            author: author.into(),
            log: Mutex::new(Vec::new()),
            clock: AtomicU64::new(0),
            subscribers: Mutex::new(Vec::new()),
            held: Mutex::new(VecDeque::new()),
            hold_confirmations: AtomicBool::new(false),
            unreachable: AtomicBool::new(false),
            reject_submits: AtomicBool::new(false),
            read_fault: Mutex::new(None),
            read_calls: AtomicUsize::new(0),
            submit_calls: AtomicUsize::new(0),
        }
    }

    /// Seed a historical entry without notifying subscribers.
    pub fn seed(&self, entry: Entry) {
        self.lock(&self.log).push(entry);
    }

    /// The full log as the service sees it.
    pub fn snapshot(&self) -> Vec<Entry> {
        self.lock(&self.log).clone()
    }

    /// Make every remote call fail with `Unreachable`.
    pub fn set_unreachable(&self, unreachable: bool) {
        self.unreachable.store(unreachable, Ordering::SeqCst);
    }

    /// Make the service refuse new submissions.
    pub fn set_reject_submits(&self, reject: bool) {
        self.reject_submits.store(reject, Ordering::SeqCst);
    }

    /// Inject (or clear) a remote-side fault for reads.
    pub fn set_fault(&self, reason: Option<&str>) {
        *self.lock(&self.read_fault) = reason.map(str::to_owned);
    }

    /// Hold confirmations: accepted writes stay pending until
    /// [`confirm_next`](Self::confirm_next), [`fail_next`](Self::fail_next)
    /// or [`drop_held`](Self::drop_held).
    pub fn hold_confirmations(&self) {
        self.hold_confirmations.store(true, Ordering::SeqCst);
    }

    /// Finalize the oldest held write: append, broadcast, and resolve its
    /// confirmation. Returns the accepted entry, or `None` when nothing is
    /// held.
    pub fn confirm_next(&self) -> Option<Entry> {
        let held = self.lock(&self.held).pop_front()?;
        let entry = self.accept(self.author.clone(), held.message);
        // The submitter may have given up waiting; the log keeps the entry
        // either way.
        let _ = held.outcome.send(Ok(entry.clone()));
        Some(entry)
    }

    /// Reject the oldest held write. Returns whether one was held.
    pub fn fail_next(&self, reason: &str) -> bool {
        let Some(held) = self.lock(&self.held).pop_front() else {
            return false;
        };
        let _ = held.outcome.send(Err(ServiceError::Rejected { reason: reason.to_owned() }));
        true
    }

    /// Drop every held write, severing their in-flight confirmations as a
    /// lost connection would.
    pub fn drop_held(&self) {
        self.lock(&self.held).clear();
    }

    /// Number of writes currently held awaiting confirmation.
    pub fn held_writes(&self) -> usize {
        self.lock(&self.held).len()
    }

    /// Accept a wave from another writer: append to the log and broadcast
    /// on the live channels.
    pub fn emit_external(&self, author: impl Into<AccountId>, message: impl Into<String>) -> Entry {
        self.accept(author.into(), message.into())
    }

    /// Redeliver an already-accepted entry on the live channels,
    /// simulating at-least-once delivery.
    pub fn rebroadcast(&self, entry: &Entry) {
        self.broadcast(entry);
    }

    /// Number of history reads served.
    pub fn read_calls(&self) -> usize {
        self.read_calls.load(Ordering::SeqCst)
    }

    /// Number of submissions that reached the service.
    pub fn submit_calls(&self) -> usize {
        self.submit_calls.load(Ordering::SeqCst)
    }

    /// Number of live channels with a listening receiver.
    pub fn live_channels(&self) -> usize {
        self.lock(&self.subscribers).iter().filter(|tx| !tx.is_closed()).count()
    }

    fn accept(&self, author: AccountId, message: String) -> Entry {
        let entry = Entry::new(author, self.next_timestamp(), message);
        self.lock(&self.log).push(entry.clone());
        self.broadcast(&entry);
        debug!(author = %entry.author, at = %entry.submitted_at, "wave accepted");
        entry
    }

    fn broadcast(&self, entry: &Entry) {
        self.lock(&self.subscribers).retain(|tx| tx.send(entry.clone()).is_ok());
    }

    fn next_timestamp(&self) -> Timestamp {
        Timestamp::new(1 + self.clock.fetch_add(1, Ordering::SeqCst))
    }

    fn lock<'a, T>(&'a self, mutex: &'a Mutex<T>) -> MutexGuard<'a, T> {
        mutex.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl LedgerService for SimLedger {
    type Operation = SimOperation;

    async fn read_all(&self) -> Result<Vec<Entry>, ServiceError> {
        self.read_calls.fetch_add(1, Ordering::SeqCst);
        if self.unreachable.load(Ordering::SeqCst) {
            return Err(ServiceError::Unreachable);
        }
        if let Some(reason) = self.lock(&self.read_fault).clone() {
            return Err(ServiceError::Fault { reason });
        }
        Ok(self.snapshot())
    }

    async fn total_entries(&self) -> Result<u64, ServiceError> {
        if self.unreachable.load(Ordering::SeqCst) {
            return Err(ServiceError::Unreachable);
        }
        if let Some(reason) = self.lock(&self.read_fault).clone() {
            return Err(ServiceError::Fault { reason });
        }
        Ok(self.lock(&self.log).len() as u64)
    }

    async fn submit(&self, message: &str) -> Result<Self::Operation, ServiceError> {
        self.submit_calls.fetch_add(1, Ordering::SeqCst);
        if self.unreachable.load(Ordering::SeqCst) {
            return Err(ServiceError::Unreachable);
        }
        if self.reject_submits.load(Ordering::SeqCst) {
            return Err(ServiceError::Rejected { reason: "submission refused".to_owned() });
        }

        let (tx, rx) = oneshot::channel();
        if self.hold_confirmations.load(Ordering::SeqCst) {
            self.lock(&self.held).push_back(HeldWrite { message: message.to_owned(), outcome: tx });
        } else {
            let entry = self.accept(self.author.clone(), message.to_owned());
            // Receiver is alive: it is handed out below.
            let _ = tx.send(Ok(entry));
        }
        Ok(SimOperation { outcome: rx })
    }

    async fn await_operation(&self, operation: Self::Operation) -> Result<Entry, ServiceError> {
        match operation.outcome.await {
            Ok(outcome) => outcome,
            // Sender dropped: connectivity lost while awaiting finality.
            Err(_) => Err(ServiceError::Unreachable),
        }
    }

    async fn subscribe(&self) -> Result<mpsc::UnboundedReceiver<Entry>, ServiceError> {
        if self.unreachable.load(Ordering::SeqCst) {
            return Err(ServiceError::Unreachable);
        }
        let (tx, rx) = mpsc::unbounded_channel();
        self.lock(&self.subscribers).push(tx);
        Ok(rx)
    }
}
