//! Snapshot port for best-effort persistence.
//!
//! The relay hands a [`Snapshot`] to a [`SnapshotSink`] after every
//! state-mutating transition and asks for one back at startup. The snapshot
//! is not authoritative: the in-memory state is.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{timestamp, Signal, SignalId};
use crate::error::Result;

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: &str = "1";

/// Persisted relay state.
///
/// Every field defaults so files without a version or custom mappings
/// still load.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Schema version for forward compatibility.
    #[serde(default)]
    pub version: Option<String>,
    /// The pending signal, if any.
    #[serde(default)]
    pub last_signal: Option<Signal>,
    /// Id of the pending signal. Must match `last_signal`.
    #[serde(default)]
    pub signal_id: Option<SignalId>,
    /// When the last signal was published.
    #[serde(default, deserialize_with = "timestamp::deserialize_option")]
    pub timestamp: Option<DateTime<Utc>>,
    /// Mappings added at runtime (alias -> canonical).
    #[serde(default)]
    pub custom_mappings: BTreeMap<String, String>,
}

impl Snapshot {
    /// Pending signal if the slot is consistent.
    ///
    /// Returns `None` when `signal_id` is present and disagrees with the
    /// signal's own id.
    #[must_use]
    pub fn consistent_signal(&self) -> Option<&Signal> {
        let signal = self.last_signal.as_ref()?;
        match &self.signal_id {
            Some(id) if id != signal.id() => None,
            _ => Some(signal),
        }
    }
}

/// Storage for relay snapshots.
///
/// # Implementation Notes
///
/// - Implementations must be thread-safe (`Send + Sync`)
/// - `load` returns `Ok(None)` when nothing has been saved yet
/// - Callers log failures and carry on; errors never reach relay clients
pub trait SnapshotSink: Send + Sync {
    /// Persist a snapshot, replacing any previous one.
    fn save(&self, snapshot: &Snapshot) -> Result<()>;

    /// Load the last saved snapshot.
    fn load(&self) -> Result<Option<Snapshot>>;
}
