//! Error types for the child care fee estimator.
//!
//! This module provides strongly-typed errors using the `thiserror` crate.
//! Estimates that have no meaningful answer (nothing booked, no fee, an empty
//! session) are reported through [`NotApplicable`] rather than an empty value,
//! so callers can tell the reasons apart.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why an estimate could not be produced for otherwise well-formed input.
///
/// # Example
///
/// ```
/// use childcare_fee_estimator::error::NotApplicable;
///
/// assert_eq!(NotApplicable::NoBookedDays.to_string(), "no day in the schedule is booked");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotApplicable {
    /// The session ends at or before it starts.
    #[error("session has no positive hours")]
    NoSessionHours,
    /// The session fee is zero or negative.
    #[error("session has no fee")]
    NoFee,
    /// No session in the schedule (or week) is booked with a positive fee.
    #[error("no day in the schedule is booked")]
    NoBookedDays,
}

/// The main error type for the estimator.
///
/// # Example
///
/// ```
/// use childcare_fee_estimator::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/ccs.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/ccs.yaml");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// The inputs were valid but describe nothing that can be estimated.
    #[error("Estimate not applicable: {reason}")]
    NotApplicable {
        /// Why no estimate was produced.
        reason: NotApplicable,
    },

    /// An input value was rejected at the request boundary.
    #[error("Invalid input '{field}': {message}")]
    InvalidInput {
        /// The offending field.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },
}

impl From<NotApplicable> for EngineError {
    fn from(reason: NotApplicable) -> Self {
        EngineError::NotApplicable { reason }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
