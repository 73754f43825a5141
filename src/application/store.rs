//! Single-slot signal store.
//!
//! Holds at most one pending [`Signal`]. Publishing replaces whatever is
//! pending; there is no queue. Every operation takes the slot lock once, so
//! a reader never sees an id from one signal next to fields from another.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tracing::warn;

use crate::domain::{Signal, SignalId};

/// Read-only summary of the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreStatus {
    pub has_pending: bool,
    /// When the most recent signal was published. Survives acknowledgment.
    pub last_timestamp: Option<DateTime<Utc>>,
}

#[derive(Debug, Default)]
struct Slot {
    pending: Option<Signal>,
    last_timestamp: Option<DateTime<Utc>>,
}

/// Mailbox for the one signal awaiting the consumer.
#[derive(Debug, Default)]
pub struct SignalStore {
    slot: Mutex<Slot>,
}

impl SignalStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `signal`, discarding any unacknowledged predecessor.
    pub fn publish(&self, signal: Signal) -> SignalId {
        let id = signal.id().clone();
        let replaced = {
            let mut slot = self.slot.lock();
            slot.last_timestamp = Some(signal.received_at());
            slot.pending.replace(signal)
        };

        if let Some(previous) = replaced {
            warn!(
                discarded = %previous.id(),
                replacement = %id,
                "Replaced unacknowledged signal"
            );
        }
        id
    }

    /// Current pending signal, left in place.
    #[must_use]
    pub fn peek(&self) -> Option<Signal> {
        self.slot.lock().pending.clone()
    }

    /// Clear the slot if `id` matches the pending signal.
    ///
    /// Returns `false` and leaves the slot untouched otherwise.
    pub fn acknowledge(&self, id: &str) -> bool {
        let mut slot = self.slot.lock();
        match &slot.pending {
            Some(signal) if signal.id().as_str() == id => {
                slot.pending = None;
                true
            }
            _ => false,
        }
    }

    #[must_use]
    pub fn status(&self) -> StoreStatus {
        let slot = self.slot.lock();
        StoreStatus {
            has_pending: slot.pending.is_some(),
            last_timestamp: slot.last_timestamp,
        }
    }

    /// Pending signal and last timestamp read under one lock.
    #[must_use]
    pub fn snapshot(&self) -> (Option<Signal>, Option<DateTime<Utc>>) {
        let slot = self.slot.lock();
        (slot.pending.clone(), slot.last_timestamp)
    }

    /// Replace the slot wholesale. Used when reloading persisted state.
    pub fn restore(&self, pending: Option<Signal>, last_timestamp: Option<DateTime<Utc>>) {
        let mut slot = self.slot.lock();
        slot.pending = pending;
        slot.last_timestamp = last_timestamp;
    }
}
