//! Domain validation errors.
//!
//! Returned when an inbound value cannot become part of a [`Signal`] or a
//! symbol mapping.
//!
//! # Examples
//!
//! ```
//! use tvbridge::domain::error::DomainError;
//! use tvbridge::domain::signal::Action;
//!
//! let result: Result<Action, _> = "hold".parse();
//! assert!(matches!(result, Err(DomainError::UnknownAction { .. })));
//! ```
//!
//! [`Signal`]: crate::domain::signal::Signal

use thiserror::Error;

/// Errors that occur when domain invariants are violated.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    /// The action verb is not one of buy, sell, close, close_all.
    #[error("invalid action '{action}': expected buy, sell, close or close_all")]
    UnknownAction {
        /// The verb as submitted.
        action: String,
    },

    /// The instrument symbol is blank after trimming.
    #[error("symbol cannot be empty")]
    EmptySymbol,

    /// A price is negative or not finite, or risk is not finite.
    #[error("invalid value for {field}: {value}")]
    InvalidPrice {
        /// Name of the offending field.
        field: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// A numeric field could not be parsed.
    #[error("invalid number for {field}: '{raw}'")]
    InvalidNumber {
        /// Name of the offending field.
        field: &'static str,
        /// The raw text that failed to parse.
        raw: String,
    },

    /// A mapping alias or canonical symbol is blank after trimming.
    #[error("{field} cannot be empty")]
    EmptyMappingField {
        /// Either `alias` or `canonical`.
        field: &'static str,
    },
}
