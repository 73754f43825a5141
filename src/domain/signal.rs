//! The signal handed from the webhook producer to the polling consumer.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::DomainError;
use super::id::SignalId;

/// Risk parameter used when an alert omits it.
pub const DEFAULT_RISK: f64 = 2.0;

/// Trade instruction carried by a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Buy,
    Sell,
    Close,
    CloseAll,
}

impl Action {
    /// Wire name of the action.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Buy => "buy",
            Self::Sell => "sell",
            Self::Close => "close",
            Self::CloseAll => "close_all",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = DomainError;

    /// Parses an action verb, ignoring case and surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "buy" => Ok(Self::Buy),
            "sell" => Ok(Self::Sell),
            "close" => Ok(Self::Close),
            "close_all" => Ok(Self::CloseAll),
            _ => Err(DomainError::UnknownAction {
                action: s.to_string(),
            }),
        }
    }
}

/// Price levels and risk attached to a signal.
///
/// A stop loss or take profit of `0` means unset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Levels {
    pub stop_loss: f64,
    pub take_profit: f64,
    pub risk: f64,
}

impl Levels {
    /// Check that prices are finite and non-negative and risk is finite.
    ///
    /// Risk carries no sign rule; the consumer interprets it.
    pub fn validate(&self) -> Result<(), DomainError> {
        for (field, value) in [("sl", self.stop_loss), ("tp", self.take_profit)] {
            if !value.is_finite() || value < 0.0 {
                return Err(DomainError::InvalidPrice { field, value });
            }
        }
        if !self.risk.is_finite() {
            return Err(DomainError::InvalidPrice {
                field: "risk",
                value: self.risk,
            });
        }
        Ok(())
    }
}

impl Default for Levels {
    fn default() -> Self {
        Self {
            stop_loss: 0.0,
            take_profit: 0.0,
            risk: DEFAULT_RISK,
        }
    }
}

/// A published trade signal.
///
/// Fields are private: a signal never changes after it is built, and any
/// correction goes out as a new signal with a new id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    action: Action,
    symbol: String,
    #[serde(default)]
    original_symbol: String,
    #[serde(rename = "sl", default)]
    stop_loss: f64,
    #[serde(rename = "tp", default)]
    take_profit: f64,
    #[serde(default = "default_risk")]
    risk: f64,
    #[serde(rename = "signal_id")]
    id: SignalId,
    #[serde(deserialize_with = "super::timestamp::deserialize")]
    received_at: DateTime<Utc>,
}

fn default_risk() -> f64 {
    DEFAULT_RISK
}

impl Signal {
    /// Build a signal from validated parts.
    ///
    /// `symbol` is the canonical (normalized) symbol and must be non-empty;
    /// `original_symbol` is kept as submitted.
    pub fn new(
        action: Action,
        original_symbol: impl Into<String>,
        symbol: impl Into<String>,
        levels: Levels,
        id: SignalId,
        received_at: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        let symbol = symbol.into();
        if symbol.trim().is_empty() {
            return Err(DomainError::EmptySymbol);
        }
        levels.validate()?;

        Ok(Self {
            action,
            symbol,
            original_symbol: original_symbol.into(),
            stop_loss: levels.stop_loss,
            take_profit: levels.take_profit,
            risk: levels.risk,
            id,
            received_at,
        })
    }

    #[must_use]
    pub const fn action(&self) -> Action {
        self.action
    }

    /// Canonical symbol the consumer should trade.
    #[must_use]
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Symbol as it arrived in the alert.
    ///
    /// Snapshots written before this field existed fall back to the
    /// canonical symbol.
    #[must_use]
    pub fn original_symbol(&self) -> &str {
        if self.original_symbol.is_empty() {
            &self.symbol
        } else {
            &self.original_symbol
        }
    }

    #[must_use]
    pub const fn stop_loss(&self) -> f64 {
        self.stop_loss
    }

    #[must_use]
    pub const fn take_profit(&self) -> f64 {
        self.take_profit
    }

    #[must_use]
    pub const fn risk(&self) -> f64 {
        self.risk
    }

    #[must_use]
    pub fn id(&self) -> &SignalId {
        &self.id
    }

    #[must_use]
    pub const fn received_at(&self) -> DateTime<Utc> {
        self.received_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn levels(stop_loss: f64, take_profit: f64, risk: f64) -> Levels {
        Levels {
            stop_loss,
            take_profit,
            risk,
        }
    }

    #[test]
    fn test_action_parse_ignores_case_and_whitespace() {
        assert_eq!("BUY".parse::<Action>(), Ok(Action::Buy));
        assert_eq!(" Sell ".parse::<Action>(), Ok(Action::Sell));
        assert_eq!("close".parse::<Action>(), Ok(Action::Close));
        assert_eq!("Close_All".parse::<Action>(), Ok(Action::CloseAll));
    }

    #[test]
    fn test_action_parse_rejects_unknown_verb() {
        let err = "hold".parse::<Action>().unwrap_err();
        assert_eq!(
            err,
            DomainError::UnknownAction {
                action: "hold".to_string()
            }
        );
    }

    #[test]
    fn test_action_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&Action::CloseAll).unwrap(),
            "\"close_all\""
        );
        assert_eq!(Action::CloseAll.to_string(), "close_all");
    }

    #[test]
    fn test_levels_reject_negative_and_non_finite() {
        assert!(levels(0.0, 0.0, 2.0).validate().is_ok());
        assert!(matches!(
            levels(-1.0, 0.0, 2.0).validate(),
            Err(DomainError::InvalidPrice { field: "sl", .. })
        ));
        assert!(matches!(
            levels(0.0, f64::INFINITY, 2.0).validate(),
            Err(DomainError::InvalidPrice { field: "tp", .. })
        ));
        assert!(matches!(
            levels(0.0, 0.0, f64::NAN).validate(),
            Err(DomainError::InvalidPrice { field: "risk", .. })
        ));
    }

    #[test]
    fn test_levels_allow_negative_risk() {
        assert!(levels(1900.0, 2000.0, -1.5).validate().is_ok());
    }

    #[test]
    fn test_signal_rejects_empty_symbol() {
        let result = Signal::new(
            Action::Buy,
            "gold",
            "  ",
            Levels::default(),
            SignalId::generate(),
            Utc::now(),
        );
        assert_eq!(result.unwrap_err(), DomainError::EmptySymbol);
    }

    #[test]
    fn test_signal_serializes_consumer_keys() {
        let signal = Signal::new(
            Action::Buy,
            "gold",
            "XAUUSD",
            levels(1900.0, 2000.0, 1.0),
            SignalId::from("abc"),
            Utc::now(),
        )
        .unwrap();

        let json = serde_json::to_value(&signal).unwrap();
        assert_eq!(json["action"], "buy");
        assert_eq!(json["symbol"], "XAUUSD");
        assert_eq!(json["original_symbol"], "gold");
        assert_eq!(json["sl"], 1900.0);
        assert_eq!(json["tp"], 2000.0);
        assert_eq!(json["risk"], 1.0);
        assert_eq!(json["signal_id"], "abc");
        assert!(json["received_at"].is_string());
    }

    #[test]
    fn test_signal_without_original_symbol_falls_back() {
        let json = r#"{
            "action": "sell",
            "symbol": "EURUSD",
            "sl": 1.085,
            "tp": 1.095,
            "risk": 2.0,
            "signal_id": "0123456789abcdef",
            "received_at": "2024-01-15T10:30:00Z"
        }"#;

        let signal: Signal = serde_json::from_str(json).unwrap();
        assert_eq!(signal.action(), Action::Sell);
        assert_eq!(signal.original_symbol(), "EURUSD");
        assert_eq!(signal.id().as_str(), "0123456789abcdef");
    }
}
