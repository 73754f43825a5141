//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! ```text
//!     ┌──────────────┐        ┌─────────────┐        ┌──────────────┐
//!     │ HTTP adapter │ ─────▶ │    Relay    │ ─────▶ │ SnapshotSink │
//!     └──────────────┘        └─────────────┘        └──────────────┘
//! ```
//!
//! # Available Ports
//!
//! - [`SnapshotSink`] - Best-effort persistence of the pending signal and
//!   runtime symbol mappings

pub mod snapshot;

pub use snapshot::{Snapshot, SnapshotSink, SNAPSHOT_VERSION};
