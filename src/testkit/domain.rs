//! Builders for relay inputs used across tests.

use crate::application::{Alert, MappingRequest, Number, Relay, SignalStore, SymbolNormalizer};

/// Shared secret used by [`relay`] and the builders below.
pub const TEST_SECRET: &str = "secret";

/// Relay with default mappings guarded by [`TEST_SECRET`].
pub fn relay() -> Relay {
    Relay::new(SignalStore::new(), SymbolNormalizer::new(), TEST_SECRET)
}

/// Alert with the given action and symbol and the correct credential.
pub fn alert(action: &str, symbol: &str) -> Alert {
    Alert {
        action: Some(action.to_string()),
        symbol: Some(symbol.to_string()),
        pass: Some(TEST_SECRET.to_string()),
        ..Alert::default()
    }
}

/// Alert with stop loss, take profit and risk set.
pub fn alert_with_levels(action: &str, symbol: &str, sl: f64, tp: f64, risk: f64) -> Alert {
    Alert {
        sl: Some(Number::Value(sl)),
        tp: Some(Number::Value(tp)),
        risk: Some(Number::Value(risk)),
        ..alert(action, symbol)
    }
}

/// Mapping request with the correct credential.
pub fn mapping(alias: &str, canonical: &str) -> MappingRequest {
    MappingRequest {
        alias: Some(alias.to_string()),
        canonical: Some(canonical.to_string()),
        pass: Some(TEST_SECRET.to_string()),
    }
}
