//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`domain`] - Builders for alerts, mapping requests and relays.
//! - [`snapshot`] - In-memory [`SnapshotSink`](crate::port::SnapshotSink)
//!   implementations: `RecordingSnapshot`, `FailingSnapshot`.

pub mod domain;
pub mod snapshot;
