//! Domain types for the signal hand-off.

pub mod error;
pub mod id;
pub mod signal;
pub mod timestamp;

pub use error::DomainError;
pub use id::SignalId;
pub use signal::{Action, Levels, Signal};
