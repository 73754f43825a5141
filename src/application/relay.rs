//! Relay protocol: the sequencing of store and normalizer.
//!
//! Each operation is one atomic transition on the in-memory state. When a
//! [`SnapshotSink`] is attached, state-mutating transitions are followed by
//! a best-effort snapshot write whose failure is logged and swallowed.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::store::{SignalStore, StoreStatus};
use super::symbol::SymbolNormalizer;
use crate::domain::signal::DEFAULT_RISK;
use crate::domain::{Action, DomainError, Levels, Signal, SignalId};
use crate::error::RelayError;
use crate::port::{Snapshot, SnapshotSink, SNAPSHOT_VERSION};

/// A numeric alert field, sent either as a JSON number or as text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Number {
    Value(f64),
    Text(String),
}

impl Number {
    /// Parse the value. Blank text counts as absent.
    fn parse(&self, field: &'static str) -> Result<Option<f64>, DomainError> {
        match self {
            Self::Value(v) => Ok(Some(*v)),
            Self::Text(raw) if raw.trim().is_empty() => Ok(None),
            Self::Text(raw) => raw
                .trim()
                .parse::<f64>()
                .map(Some)
                .map_err(|_| DomainError::InvalidNumber {
                    field,
                    raw: raw.clone(),
                }),
        }
    }
}

impl From<f64> for Number {
    fn from(v: f64) -> Self {
        Self::Value(v)
    }
}

impl From<&str> for Number {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

/// Inbound alert as posted by TradingView.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(alias = "stop_loss", skip_serializing_if = "Option::is_none")]
    pub sl: Option<Number>,
    #[serde(alias = "take_profit", skip_serializing_if = "Option::is_none")]
    pub tp: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk: Option<Number>,
    #[serde(alias = "password", skip_serializing_if = "Option::is_none")]
    pub pass: Option<String>,
}

/// Request to add a symbol alias.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MappingRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub canonical: Option<String>,
    #[serde(alias = "password", skip_serializing_if = "Option::is_none")]
    pub pass: Option<String>,
}

/// Result of a successful submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub id: SignalId,
    pub original_symbol: String,
    pub symbol: String,
}

/// Result of a fetch.
#[derive(Debug, Clone, PartialEq)]
pub enum Fetch {
    NoSignal,
    Available(Signal),
}

/// Result of a successful mapping insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingAdded {
    pub alias: String,
    pub canonical: String,
    pub count: usize,
}

fn required<'a>(value: &'a Option<String>, field: &'static str) -> Result<&'a str, RelayError> {
    value
        .as_deref()
        .ok_or(RelayError::MissingField { field })
}

fn optional_number(value: &Option<Number>, field: &'static str) -> Result<Option<f64>, RelayError> {
    match value {
        Some(number) => Ok(number.parse(field)?),
        None => Ok(None),
    }
}

/// The signal relay.
///
/// Owns its store and normalizer; build as many independent instances as
/// needed.
pub struct Relay {
    store: SignalStore,
    symbols: SymbolNormalizer,
    secret: String,
    default_risk: f64,
    snapshot: Option<Arc<dyn SnapshotSink>>,
    /// Serializes snapshot capture and write so files land in transition order.
    persist: Mutex<()>,
}

impl Relay {
    /// Create a relay guarded by the shared `secret`.
    pub fn new(store: SignalStore, symbols: SymbolNormalizer, secret: impl Into<String>) -> Self {
        Self {
            store,
            symbols,
            secret: secret.into(),
            default_risk: DEFAULT_RISK,
            snapshot: None,
            persist: Mutex::new(()),
        }
    }

    /// Attach a snapshot sink.
    #[must_use]
    pub fn with_snapshot(mut self, sink: Arc<dyn SnapshotSink>) -> Self {
        self.snapshot = Some(sink);
        self
    }

    /// Risk used when an alert omits it.
    #[must_use]
    pub fn with_default_risk(mut self, risk: f64) -> Self {
        self.default_risk = risk;
        self
    }

    /// Validate, normalize and publish an alert.
    pub fn submit(&self, alert: &Alert) -> Result<Submission, RelayError> {
        let result = self.try_submit(alert);
        if let Err(err) = &result {
            warn!(error = %err, symbol = ?alert.symbol, "Rejected alert");
        }
        result
    }

    fn try_submit(&self, alert: &Alert) -> Result<Submission, RelayError> {
        let raw_action = required(&alert.action, "action")?;
        let original_symbol = required(&alert.symbol, "symbol")?;
        let credential = required(&alert.pass, "pass")?;

        if credential != self.secret {
            return Err(RelayError::Unauthorized);
        }

        let action: Action = raw_action.parse()?;
        let levels = Levels {
            stop_loss: optional_number(&alert.sl, "sl")?.unwrap_or(0.0),
            take_profit: optional_number(&alert.tp, "tp")?.unwrap_or(0.0),
            risk: optional_number(&alert.risk, "risk")?.unwrap_or(self.default_risk),
        };
        if original_symbol.trim().is_empty() {
            return Err(DomainError::EmptySymbol.into());
        }

        let symbol = self.symbols.normalize(original_symbol);
        let signal = Signal::new(
            action,
            original_symbol,
            symbol.clone(),
            levels,
            SignalId::generate(),
            Utc::now(),
        )?;

        let id = self.store.publish(signal);
        info!(
            signal_id = %id,
            action = %action,
            original_symbol,
            symbol = %symbol,
            sl = levels.stop_loss,
            tp = levels.take_profit,
            risk = levels.risk,
            "Signal published"
        );
        self.persist();

        Ok(Submission {
            id,
            original_symbol: original_symbol.to_string(),
            symbol,
        })
    }

    /// Pending signal, if any. Never consumes it.
    #[must_use]
    pub fn fetch(&self) -> Fetch {
        match self.store.peek() {
            Some(signal) => {
                debug!(
                    signal_id = %signal.id(),
                    action = %signal.action(),
                    symbol = signal.symbol(),
                    "Signal handed to consumer"
                );
                Fetch::Available(signal)
            }
            None => Fetch::NoSignal,
        }
    }

    /// Retire the pending signal if `id` matches it.
    pub fn confirm(&self, id: &str) -> Result<(), RelayError> {
        if !self.store.acknowledge(id) {
            warn!(signal_id = id, "Confirmation for unknown or stale signal");
            return Err(RelayError::NotFound { id: id.to_string() });
        }

        info!(signal_id = id, "Signal confirmed as executed");
        self.persist();
        Ok(())
    }

    /// Add a symbol alias at runtime.
    pub fn add_mapping(&self, request: &MappingRequest) -> Result<MappingAdded, RelayError> {
        let alias = required(&request.alias, "alias")?;
        let canonical = required(&request.canonical, "canonical")?;
        let credential = required(&request.pass, "pass")?;

        if credential != self.secret {
            warn!(alias, "Rejected mapping: unauthorized");
            return Err(RelayError::Unauthorized);
        }

        let count = self.symbols.add_mapping(alias, canonical)?;
        self.persist();

        Ok(MappingAdded {
            alias: alias.trim().to_uppercase(),
            canonical: canonical.trim().to_string(),
            count,
        })
    }

    /// Full mapping table, sorted by alias.
    #[must_use]
    pub fn mappings(&self) -> BTreeMap<String, String> {
        self.symbols.list_mappings()
    }

    #[must_use]
    pub fn status(&self) -> StoreStatus {
        self.store.status()
    }

    #[must_use]
    pub fn symbols(&self) -> &SymbolNormalizer {
        &self.symbols
    }

    /// Current state in persisted form.
    #[must_use]
    pub fn capture(&self) -> Snapshot {
        let (pending, timestamp) = self.store.snapshot();
        Snapshot {
            version: Some(SNAPSHOT_VERSION.to_string()),
            signal_id: pending.as_ref().map(|s| s.id().clone()),
            last_signal: pending,
            timestamp,
            custom_mappings: self.symbols.custom_mappings(),
        }
    }

    /// Reload state from the attached sink.
    ///
    /// Any failure leaves the relay empty. Returns whether a snapshot was
    /// applied.
    pub fn restore(&self) -> bool {
        let Some(sink) = &self.snapshot else {
            return false;
        };

        let snapshot = match sink.load() {
            Ok(Some(snapshot)) => snapshot,
            Ok(None) => return false,
            Err(e) => {
                warn!(error = %e, "Ignoring unreadable snapshot");
                return false;
            }
        };

        let pending = snapshot.consistent_signal().cloned();
        if pending.is_none() && snapshot.last_signal.is_some() {
            warn!("Snapshot signal id does not match its signal, dropping it");
        }
        let restored = self.symbols.restore_custom(&snapshot.custom_mappings);
        self.store.restore(pending.clone(), snapshot.timestamp);

        info!(
            pending = ?pending.as_ref().map(Signal::id),
            custom_mappings = restored,
            "Previous state loaded"
        );
        true
    }

    fn persist(&self) {
        let Some(sink) = &self.snapshot else {
            return;
        };

        let _guard = self.persist.lock();
        let snapshot = self.capture();
        if let Err(e) = sink.save(&snapshot) {
            warn!(error = %e, "Failed to write snapshot");
        }
    }
}
