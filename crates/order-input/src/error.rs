//! Validation Error Types

use thiserror::Error;

/// Errors raised while collecting and checking order input
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Value out of allowed range
    #[error("{field} value {value} is out of range [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    /// Value does not sit on the field's step grid
    #[error("{field} value {value} is not a multiple of {step}")]
    OffStep {
        field: &'static str,
        value: f64,
        step: f64,
    },

    /// Selection is not one of the field's options
    #[error("{field} '{value}' is not one of: {options}")]
    UnknownOption {
        field: &'static str,
        value: String,
        options: String,
    },

    /// State is not listed in any region
    #[error("State '{0}' is not assigned to any region")]
    UnlistedState(String),

    /// Invalid data format
    #[error("Invalid {field}: {reason}")]
    InvalidFormat { field: &'static str, reason: String },

    /// Missing required field
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
}
