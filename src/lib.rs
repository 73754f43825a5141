//! tvbridge - relay TradingView alerts to a polling MetaTrader expert advisor.
//!
//! Alerts arrive on a webhook, are validated and have their symbol mapped to
//! the broker's name, then wait in a single slot until the expert advisor
//! fetches and confirms them.
//!
//! # Architecture
//!
//! - **`application::store`** - Single-slot mailbox; a new signal replaces
//!   an unacknowledged one
//! - **`application::symbol`** - Runtime-extendable alias table
//! - **`application::relay`** - Submit / fetch / confirm sequencing
//!
//! # Modules
//!
//! - [`domain`] - Signal, action and id types
//! - [`port`] - Snapshot persistence trait
//! - [`application`] - Store, normalizer and relay
//! - [`adapter`] - axum HTTP routes, CLI and the JSON snapshot file
//! - [`config`] - TOML + environment configuration
//! - [`error`] - Error types for the crate
//!
//! # Example
//!
//! ```
//! use tvbridge::application::{Alert, Fetch, Relay, SignalStore, SymbolNormalizer};
//!
//! let relay = Relay::new(SignalStore::new(), SymbolNormalizer::new(), "secret");
//! let submission = relay
//!     .submit(&Alert {
//!         action: Some("buy".into()),
//!         symbol: Some("gold".into()),
//!         pass: Some("secret".into()),
//!         ..Alert::default()
//!     })
//!     .unwrap();
//! assert_eq!(submission.symbol, "XAUUSD");
//!
//! relay.confirm(submission.id.as_str()).unwrap();
//! assert_eq!(relay.fetch(), Fetch::NoSignal);
//! ```

pub mod adapter;
pub mod app;
pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
