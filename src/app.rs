//! App wiring.
//!
//! Builds a [`Relay`] from configuration, reloads any snapshot and serves
//! it over HTTP.

use std::future::Future;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;

use crate::adapter::inbound::http;
use crate::adapter::outbound::JsonFileSnapshot;
use crate::application::{Relay, SignalStore, SymbolNormalizer};
use crate::config::Config;
use crate::error::Result;

/// Build a relay from configuration and reload its snapshot.
#[must_use]
pub fn build_relay(config: &Config) -> Relay {
    let symbols = SymbolNormalizer::with_defaults(
        config
            .symbols
            .iter()
            .map(|(alias, canonical)| (alias.as_str(), canonical.clone())),
    );

    let mut relay = Relay::new(SignalStore::new(), symbols, config.secret())
        .with_default_risk(config.relay.default_risk);

    if let Some(path) = config.relay.snapshot_path() {
        let sink = Arc::new(JsonFileSnapshot::new(path));
        relay = relay.with_snapshot(sink.clone());
        if !relay.restore() {
            info!(path = %sink.path().display(), "No previous state loaded");
        }
    }

    relay
}

/// Main application.
pub struct App;

impl App {
    /// Bind the configured address and serve until `shutdown` resolves.
    pub async fn run<F>(config: Config, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let relay = Arc::new(build_relay(&config));
        info!(
            mappings = relay.symbols().len(),
            pending = relay.status().has_pending,
            "Relay ready"
        );

        let listener = TcpListener::bind(config.bind_addr()).await?;
        http::serve(listener, relay, shutdown).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::{Alert, Fetch};
    use tempfile::TempDir;

    fn config(dir: &TempDir, toml: &str) -> Config {
        let mut config = Config::from_toml(toml, |key| {
            (key == "BRIDGE_PASSWORD").then(|| "pw".to_string())
        })
        .unwrap();
        config.relay.snapshot_file = dir.path().join("last_signal.json");
        config
    }

    #[test]
    fn test_build_relay_applies_config_symbols() {
        let dir = TempDir::new().unwrap();
        let relay = build_relay(&config(&dir, "[symbols]\nnq = \"NAS100.cash\"\n"));
        assert_eq!(relay.symbols().normalize("NQ"), "NAS100.cash");
        assert!(relay.symbols().custom_mappings().is_empty());
    }

    #[test]
    fn test_build_relay_reloads_previous_signal() {
        let dir = TempDir::new().unwrap();
        let alert = Alert {
            action: Some("buy".into()),
            symbol: Some("gold".into()),
            pass: Some("pw".into()),
            ..Alert::default()
        };

        let first = build_relay(&config(&dir, ""));
        let submission = first.submit(&alert).unwrap();
        drop(first);

        let second = build_relay(&config(&dir, ""));
        match second.fetch() {
            Fetch::Available(signal) => assert_eq!(signal.id(), &submission.id),
            Fetch::NoSignal => panic!("expected the persisted signal"),
        }
    }

    #[test]
    fn test_build_relay_loads_legacy_snapshot() {
        let dir = TempDir::new().unwrap();
        let legacy = r#"{
  "last_signal": {
    "action": "sell",
    "symbol": "US500",
    "sl": 5100.0,
    "tp": 4900.0,
    "risk": 2.0,
    "signal_id": "9b1c0d2e3f405162",
    "received_at": "2024-01-15T10:30:00.123456"
  },
  "signal_id": "9b1c0d2e3f405162",
  "timestamp": "2024-01-15T10:30:00.123789"
}"#;
        std::fs::write(dir.path().join("last_signal.json"), legacy).unwrap();

        let relay = build_relay(&config(&dir, ""));
        match relay.fetch() {
            Fetch::Available(signal) => {
                assert_eq!(signal.id().as_str(), "9b1c0d2e3f405162");
                assert_eq!(signal.symbol(), "US500");
                assert_eq!(signal.stop_loss(), 5100.0);
            }
            Fetch::NoSignal => panic!("expected the legacy signal"),
        }
        assert!(relay.status().last_timestamp.is_some());

        relay.confirm("9b1c0d2e3f405162").unwrap();
        assert_eq!(relay.fetch(), Fetch::NoSignal);
    }

    #[test]
    fn test_build_relay_tolerates_corrupt_snapshot() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("last_signal.json"), "garbage").unwrap();

        let relay = build_relay(&config(&dir, ""));
        assert_eq!(relay.fetch(), Fetch::NoSignal);
    }
}
