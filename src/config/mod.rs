//! Application configuration loading and validation.
//!
//! Configuration is loaded from a TOML file with environment variable
//! overrides. The shared secret is only ever read from `BRIDGE_PASSWORD`,
//! never from the file.
//!
//! # Example
//!
//! ```no_run
//! use tvbridge::config::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load_or_default("config.toml")?;
//!     config.init_logging();
//!     Ok(())
//! }
//! ```

mod logging;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{ConfigError, Result};

pub use logging::{LoggingConfig, LOG_FORMATS};

/// Environment variable holding the shared secret.
pub const SECRET_ENV: &str = "BRIDGE_PASSWORD";
/// Environment variable overriding the listen port.
pub const PORT_ENV: &str = "PORT";

/// HTTP listener settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".into()
}

const fn default_port() -> u16 {
    5000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Relay behaviour settings.
#[derive(Debug, Clone, Deserialize)]
pub struct RelayConfig {
    /// Write a snapshot after each state change and reload it on start.
    #[serde(default = "default_true")]
    pub persist: bool,
    /// Snapshot location.
    #[serde(default = "default_snapshot_file")]
    pub snapshot_file: PathBuf,
    /// Risk used when an alert omits it.
    #[serde(default = "default_risk")]
    pub default_risk: f64,
}

const fn default_true() -> bool {
    true
}

fn default_snapshot_file() -> PathBuf {
    PathBuf::from("last_signal.json")
}

const fn default_risk() -> f64 {
    crate::domain::signal::DEFAULT_RISK
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            persist: true,
            snapshot_file: default_snapshot_file(),
            default_risk: default_risk(),
        }
    }
}

impl RelayConfig {
    /// Snapshot path when persistence is enabled.
    #[must_use]
    pub fn snapshot_path(&self) -> Option<&Path> {
        self.persist.then_some(self.snapshot_file.as_path())
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub relay: RelayConfig,
    /// Extra built-in symbol aliases (alias -> canonical).
    #[serde(default)]
    pub symbols: BTreeMap<String, String>,
    /// Shared secret, loaded from `BRIDGE_PASSWORD` at runtime.
    #[serde(skip)]
    pub secret: Option<String>,
}

impl Config {
    /// Load and validate a config file, applying environment overrides.
    #[allow(clippy::result_large_err)]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::from_toml(&content, |key| std::env::var(key).ok())
    }

    /// Like [`Config::load`], but a missing file means all defaults.
    #[allow(clippy::result_large_err)]
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Self::from_toml("", |key| std::env::var(key).ok())
        }
    }

    /// Parse `content` and apply overrides looked up through `env`.
    #[allow(clippy::result_large_err)]
    pub fn from_toml<F>(content: &str, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;

        config.secret = env(SECRET_ENV);
        if let Some(port) = env(PORT_ENV) {
            config.server.port = port.trim().parse().map_err(|_| ConfigError::InvalidValue {
                field: "PORT",
                reason: format!("'{port}' is not a valid port"),
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    #[allow(clippy::result_large_err)]
    fn validate(&self) -> Result<()> {
        match &self.secret {
            Some(secret) if !secret.trim().is_empty() => {}
            _ => return Err(ConfigError::MissingField { field: SECRET_ENV }.into()),
        }
        if self.server.host.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "server.host",
            }
            .into());
        }
        if self.server.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.port",
                reason: "port must be non-zero".into(),
            }
            .into());
        }
        if !self.relay.default_risk.is_finite() || self.relay.default_risk < 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "relay.default_risk",
                reason: format!("{} is not a non-negative number", self.relay.default_risk),
            }
            .into());
        }
        if self.relay.persist && self.relay.snapshot_file.as_os_str().is_empty() {
            return Err(ConfigError::MissingField {
                field: "relay.snapshot_file",
            }
            .into());
        }
        for (alias, canonical) in &self.symbols {
            if alias.trim().is_empty() || canonical.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "symbols",
                    reason: format!("blank mapping '{alias}' = '{canonical}'"),
                }
                .into());
            }
        }
        self.logging.validate()?;
        Ok(())
    }

    /// Address to bind, as `host:port`.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Shared secret. Empty only if validation was bypassed.
    #[must_use]
    pub fn secret(&self) -> &str {
        self.secret.as_deref().unwrap_or_default()
    }

    /// Initialize logging with the configured settings.
    pub fn init_logging(&self) {
        self.logging.init();
    }
}
