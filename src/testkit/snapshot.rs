//! In-memory snapshot sinks.

use parking_lot::Mutex;

use crate::error::{Error, Result};
use crate::port::{Snapshot, SnapshotSink};

/// Keeps every saved snapshot in memory.
#[derive(Debug, Default)]
pub struct RecordingSnapshot {
    saved: Mutex<Vec<Snapshot>>,
    initial: Option<Snapshot>,
}

impl RecordingSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sink whose `load` returns `snapshot`.
    pub fn with_initial(snapshot: Snapshot) -> Self {
        Self {
            saved: Mutex::new(Vec::new()),
            initial: Some(snapshot),
        }
    }

    /// Number of saves so far.
    pub fn save_count(&self) -> usize {
        self.saved.lock().len()
    }

    /// Most recent save.
    pub fn last(&self) -> Option<Snapshot> {
        self.saved.lock().last().cloned()
    }
}

impl SnapshotSink for RecordingSnapshot {
    fn save(&self, snapshot: &Snapshot) -> Result<()> {
        self.saved.lock().push(snapshot.clone());
        Ok(())
    }

    fn load(&self) -> Result<Option<Snapshot>> {
        Ok(self.initial.clone())
    }
}

/// Fails every save and load.
#[derive(Debug, Default)]
pub struct FailingSnapshot;

impl SnapshotSink for FailingSnapshot {
    fn save(&self, _snapshot: &Snapshot) -> Result<()> {
        Err(Error::Snapshot("disk full".into()))
    }

    fn load(&self) -> Result<Option<Snapshot>> {
        Err(Error::Snapshot("unreadable".into()))
    }
}
