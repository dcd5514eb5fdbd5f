//! Acquisition tracking
//!
//! Every entry moves `NotAcquired → Acquiring → Acquired`, and `Acquired` is
//! terminal. Starting an acquisition schedules a completion task keyed by the
//! entry id. The task only signals; the tracker applies the transition when
//! it receives the signal, so tracker state is written by exactly two paths:
//! [`AcquisitionTracker::initiate_acquire`] and the completion handler.
//!
//! Outstanding tasks are aborted by [`AcquisitionTracker::cancel_all`] and
//! when the tracker is dropped.

use serde::Serialize;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, trace};

use crate::catalog::EntryId;

/// Per-entry acquisition state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AcquisitionState {
    NotAcquired,
    Acquiring,
    Acquired,
}

impl AcquisitionState {
    pub fn label(&self) -> &'static str {
        match self {
            AcquisitionState::NotAcquired => "available",
            AcquisitionState::Acquiring => "acquiring...",
            AcquisitionState::Acquired => "acquired",
        }
    }
}

/// What an acquire request did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcquireOutcome {
    /// A completion task was scheduled
    Started,
    /// Already in flight, nothing scheduled
    AlreadyAcquiring,
    /// Already acquired, nothing scheduled
    AlreadyAcquired,
    /// The id is not part of the ready catalog
    ///
    /// Returned by [`Engine::initiate_acquire`](crate::Engine::initiate_acquire)
    /// only; the tracker does not know the catalog.
    UnknownEntry,
}

impl AcquireOutcome {
    pub fn is_started(&self) -> bool {
        matches!(self, AcquireOutcome::Started)
    }
}

/// Completion signal: entry id plus the ticket of the task that sent it
type Signal = (EntryId, u64);

#[derive(Debug)]
struct PendingAcquire {
    ticket: u64,
    task: JoinHandle<()>,
}

/// Owns the acquired set and the in-progress set
#[derive(Debug)]
pub struct AcquisitionTracker {
    delay: Duration,
    acquired: HashSet<EntryId>,
    acquired_order: Vec<EntryId>,
    pending: HashMap<EntryId, PendingAcquire>,
    next_ticket: u64,
    signal_tx: mpsc::UnboundedSender<Signal>,
    signal_rx: mpsc::UnboundedReceiver<Signal>,
}

impl AcquisitionTracker {
    pub fn new(delay: Duration) -> Self {
        let (signal_tx, signal_rx) = mpsc::unbounded_channel();
        Self {
            delay,
            acquired: HashSet::new(),
            acquired_order: Vec::new(),
            pending: HashMap::new(),
            next_ticket: 0,
            signal_tx,
            signal_rx,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Start acquiring `id` unless it is already acquired or in flight
    ///
    /// Returns immediately; the transition to `Acquired` is applied by
    /// [`next_completion`](Self::next_completion) or
    /// [`drain_completions`](Self::drain_completions) once the delay has
    /// elapsed.
    ///
    /// # Panics
    ///
    /// Must be called from within a Tokio runtime.
    pub fn initiate_acquire(&mut self, id: EntryId) -> AcquireOutcome {
        if self.acquired.contains(&id) {
            trace!(entry_id = id, "Acquire ignored, already acquired");
            return AcquireOutcome::AlreadyAcquired;
        }
        if self.pending.contains_key(&id) {
            trace!(entry_id = id, "Acquire ignored, already in flight");
            return AcquireOutcome::AlreadyAcquiring;
        }

        let ticket = self.next_ticket;
        self.next_ticket += 1;

        let delay = self.delay;
        let signal_tx = self.signal_tx.clone();
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // The receiver lives as long as the tracker; a send error means
            // the tracker is gone and there is nothing left to update.
            let _ = signal_tx.send((id, ticket));
        });

        self.pending.insert(id, PendingAcquire { ticket, task });
        debug!(entry_id = id, delay_ms = delay.as_millis() as u64, "Acquire started");
        AcquireOutcome::Started
    }

    /// Wait for the next acquisition to complete and apply it
    ///
    /// Returns `None` straight away when nothing is in flight.
    pub async fn next_completion(&mut self) -> Option<EntryId> {
        while !self.pending.is_empty() {
            let (id, ticket) = self.signal_rx.recv().await?;
            if self.complete(id, ticket) {
                return Some(id);
            }
        }
        None
    }

    /// Apply every completion that has already fired, without waiting
    pub fn drain_completions(&mut self) -> Vec<EntryId> {
        let mut completed = Vec::new();
        while let Ok((id, ticket)) = self.signal_rx.try_recv() {
            if self.complete(id, ticket) {
                completed.push(id);
            }
        }
        completed
    }

    /// Abort every outstanding completion task
    ///
    /// Canceled entries return to `NotAcquired`. Signals they may already
    /// have sent are ignored.
    pub fn cancel_all(&mut self) -> usize {
        let canceled = self.pending.len();
        for (id, pending) in self.pending.drain() {
            pending.task.abort();
            trace!(entry_id = id, "Acquire canceled");
        }
        if canceled > 0 {
            debug!(canceled, "Canceled outstanding acquisitions");
        }
        canceled
    }

    fn complete(&mut self, id: EntryId, ticket: u64) -> bool {
        match self.pending.get(&id) {
            Some(pending) if pending.ticket == ticket => {
                self.pending.remove(&id);
            }
            _ => {
                trace!(entry_id = id, ticket, "Stale completion ignored");
                return false;
            }
        }

        if self.acquired.insert(id) {
            self.acquired_order.push(id);
        }
        debug!(entry_id = id, "Acquire completed");
        true
    }

    pub fn state(&self, id: EntryId) -> AcquisitionState {
        if self.acquired.contains(&id) {
            AcquisitionState::Acquired
        } else if self.pending.contains_key(&id) {
            AcquisitionState::Acquiring
        } else {
            AcquisitionState::NotAcquired
        }
    }

    pub fn is_acquired(&self, id: EntryId) -> bool {
        self.acquired.contains(&id)
    }

    pub fn is_in_progress(&self, id: EntryId) -> bool {
        self.pending.contains_key(&id)
    }

    pub fn acquired(&self) -> BTreeSet<EntryId> {
        self.acquired.iter().copied().collect()
    }

    /// Acquired ids in the order their acquisitions completed
    pub fn acquired_in_order(&self) -> &[EntryId] {
        &self.acquired_order
    }

    pub fn in_progress(&self) -> BTreeSet<EntryId> {
        self.pending.keys().copied().collect()
    }

    pub fn acquired_count(&self) -> usize {
        self.acquired.len()
    }
}

impl Drop for AcquisitionTracker {
    fn drop(&mut self) {
        self.cancel_all();
    }
}
