//! Outbound adapters.

pub mod snapshot;

pub use snapshot::JsonFileSnapshot;
