use thiserror::Error;

use crate::domain::error::DomainError;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Category of a rejected relay operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing or malformed input.
    Validation,
    /// Credential mismatch.
    Authorization,
    /// Confirmation for a signal that is no longer pending.
    NotFound,
}

/// Errors reported to callers of the relay operations.
///
/// None of these change relay state.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RelayError {
    #[error("missing field: {field}")]
    MissingField { field: &'static str },

    #[error("malformed request: {0}")]
    Malformed(String),

    #[error(transparent)]
    Invalid(#[from] DomainError),

    #[error("unauthorized")]
    Unauthorized,

    #[error("signal id not found: {id}")]
    NotFound { id: String },
}

impl RelayError {
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingField { .. } | Self::Malformed(_) | Self::Invalid(_) => {
                ErrorKind::Validation
            }
            Self::Unauthorized => ErrorKind::Authorization,
            Self::NotFound { .. } => ErrorKind::NotFound,
        }
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("snapshot error: {0}")]
    Snapshot(String),
}

pub type Result<T> = std::result::Result<T, Error>;
