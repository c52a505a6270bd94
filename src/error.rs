//! Error types for the Kirchhoff analysis engine.
//!
//! This module provides a unified error type [`KirchhoffError`] that covers
//! parameter validation, circuit solving, law verification, and experiment
//! history persistence.

use thiserror::Error;

/// Result type alias using [`KirchhoffError`].
pub type Result<T> = std::result::Result<T, KirchhoffError>;

/// Reason reported when the mesh equations have no unique solution.
pub const SINGULAR_SYSTEM: &str = "singular system";

/// Unified error type for all Kirchhoff Lab operations.
#[derive(Error, Debug)]
pub enum KirchhoffError {
    // ============ Input Errors ============
    /// A required parameter is missing, non-finite, or out of range
    #[error("Invalid parameter '{param}': {message}")]
    InvalidParameter { param: String, message: String },

    /// Parameter text could not be parsed
    #[error("Cannot parse parameters '{input}': {message}")]
    ParameterParse { input: String, message: String },

    /// Unknown topology name
    #[error("Unknown topology '{name}' (expected series, parallel or complex)")]
    UnknownTopology { name: String },

    // ============ Solver Errors ============
    /// The mesh system has no unique solution
    #[error("Unsolvable circuit: {reason}")]
    UnsolvableSystem { reason: String },

    /// A derived quantity came out NaN or infinite
    #[error("Numerical overflow computing '{quantity}' (value: {value:.2e})")]
    NumericalOverflow { quantity: String, value: f64 },

    // ============ Verification Errors ============
    /// A result set lacks a quantity the law checks need
    #[error("Result set has no quantity '{quantity}'")]
    MissingQuantity { quantity: String },

    // ============ History Errors ============
    /// Error reading the experiment log
    #[error("Failed to read experiment history '{path}': {source}")]
    HistoryRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Error writing the experiment log
    #[error("Failed to write experiment history '{path}': {source}")]
    HistoryWrite {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// JSON encoding or decoding failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Another thread panicked while holding the history lock
    #[error("Experiment history lock poisoned")]
    HistoryPoisoned,
}

impl KirchhoffError {
    /// Create an invalid parameter error
    pub fn invalid_parameter(param: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            param: param.into(),
            message: message.into(),
        }
    }

    /// Create a parameter parse error
    pub fn parameter_parse(input: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ParameterParse {
            input: input.into(),
            message: message.into(),
        }
    }

    /// Create the singular-system error
    pub fn singular() -> Self {
        Self::UnsolvableSystem {
            reason: SINGULAR_SYSTEM.to_string(),
        }
    }

    /// Create a missing quantity error
    pub fn missing_quantity(quantity: impl Into<String>) -> Self {
        Self::MissingQuantity {
            quantity: quantity.into(),
        }
    }

    /// True for the terminal "no unique solution" outcome.
    pub fn is_unsolvable(&self) -> bool {
        matches!(self, Self::UnsolvableSystem { .. })
    }
}
