//! JSON snapshot file.
//!
//! Keeps the pending signal and runtime symbol mappings on disk so a
//! restarted relay can pick up where it left off.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::port::{Snapshot, SnapshotSink};

/// [`SnapshotSink`] backed by a single JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileSnapshot {
    path: PathBuf,
}

impl JsonFileSnapshot {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SnapshotSink for JsonFileSnapshot {
    /// Write the snapshot atomically.
    ///
    /// Uses write-to-temp-then-rename. Creates the parent directory if it
    /// doesn't exist.
    fn save(&self, snapshot: &Snapshot) -> Result<()> {
        let json = serde_json::to_string_pretty(snapshot)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let temp_path = self.path.with_extension("tmp");
        let mut file = fs::File::create(&temp_path)?;

        let cleanup_and_err = |e| {
            let _ = fs::remove_file(&temp_path);
            e
        };

        file.write_all(json.as_bytes()).map_err(cleanup_and_err)?;
        file.sync_all().map_err(cleanup_and_err)?;
        fs::rename(&temp_path, &self.path).map_err(cleanup_and_err)?;

        Ok(())
    }

    fn load(&self) -> Result<Option<Snapshot>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        Ok(Some(serde_json::from_str(&content)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Action, Levels, Signal, SignalId};
    use chrono::Utc;
    use tempfile::TempDir;

    fn snapshot() -> Snapshot {
        let signal = Signal::new(
            Action::Sell,
            "spx",
            "US500",
            Levels {
                stop_loss: 5100.0,
                take_profit: 4900.0,
                risk: 1.0,
            },
            SignalId::from("feedbeef"),
            Utc::now(),
        )
        .unwrap();

        Snapshot {
            version: Some("1".to_string()),
            signal_id: Some(signal.id().clone()),
            timestamp: Some(signal.received_at()),
            last_signal: Some(signal),
            custom_mappings: [("NQ".to_string(), "NAS100.cash".to_string())]
                .into_iter()
                .collect(),
        }
    }

    #[test]
    fn test_load_missing_file_is_none() {
        let dir = TempDir::new().unwrap();
        let sink = JsonFileSnapshot::new(dir.path().join("last_signal.json"));
        assert!(sink.load().unwrap().is_none());
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("last_signal.json");
        let sink = JsonFileSnapshot::new(&path);
        let original = snapshot();
        assert_eq!(sink.path(), path);

        sink.save(&original).unwrap();
        let loaded = sink.load().unwrap().unwrap();

        assert_eq!(loaded.signal_id, original.signal_id);
        assert_eq!(loaded.custom_mappings, original.custom_mappings);
        assert_eq!(
            loaded.last_signal.as_ref().map(Signal::symbol),
            Some("US500")
        );
        assert!(!dir.path().join("last_signal.tmp").exists());
    }

    #[test]
    fn test_save_creates_parent_directory() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/state/last_signal.json");
        let sink = JsonFileSnapshot::new(&path);

        sink.save(&Snapshot::default()).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_save_writes_consumer_keys() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("last_signal.json");
        JsonFileSnapshot::new(&path).save(&snapshot()).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("\"signal_id\": \"feedbeef\""));
        assert!(content.contains("\"sl\": 5100.0"));
        assert!(content.contains("\"NQ\": \"NAS100.cash\""));
    }

    #[test]
    fn test_load_corrupt_file_is_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("last_signal.json");
        fs::write(&path, "{ not json").unwrap();

        assert!(JsonFileSnapshot::new(&path).load().is_err());
    }
}
