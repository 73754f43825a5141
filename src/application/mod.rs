//! Application services: the signal store, the symbol normalizer and the
//! relay protocol that sequences them.

pub mod relay;
pub mod store;
pub mod symbol;

pub use relay::{Alert, Fetch, MappingAdded, MappingRequest, Number, Relay, Submission};
pub use store::{SignalStore, StoreStatus};
pub use symbol::SymbolNormalizer;
