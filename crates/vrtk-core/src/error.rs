//! # Error Types — Structured Error Hierarchy
//!
//! Defines the error types shared across the training kit. All errors use
//! `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! ## Design
//!
//! - Configuration errors name the offending field and value.
//! - Runtime anomalies inside the fastener state machine (bad angle
//!   readings, events arriving in the wrong state) are NOT errors. They are
//!   logged and absorbed by the machine, so nothing here models them.

use thiserror::Error;

/// Top-level error type for the training kit.
#[derive(Error, Debug)]
pub enum VrtkError {
    /// A fastener profile failed validation.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error while validating a fastener profile.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// The axis name is not one of the cardinal axes.
    ///
    /// Profile validation recovers from this by falling back to the default
    /// axis; it only surfaces from a direct parse.
    #[error("unknown rotation axis {0:?}; expected one of x, y, z")]
    UnknownAxis(String),

    /// A numeric field is NaN or infinite.
    #[error("{field} must be a finite number, got {value}")]
    NonFinite {
        /// The offending field.
        field: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// A field that must be strictly positive is zero or negative.
    #[error("{field} must be greater than zero, got {value}")]
    NotPositive {
        /// The offending field.
        field: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// A field that must not be negative is negative.
    #[error("{field} must not be negative, got {value}")]
    Negative {
        /// The offending field.
        field: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// An explicit socket allow-list was configured but left empty, which
    /// would make the fastener impossible to place.
    #[error("socket allow-list is empty; use `any` to accept every socket")]
    EmptyAllowList,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_messages_name_the_field() {
        let err = ConfigError::NotPositive {
            field: "tighten_threshold_degrees",
            value: -5.0,
        };
        assert_eq!(
            err.to_string(),
            "tighten_threshold_degrees must be greater than zero, got -5"
        );
    }

    #[test]
    fn test_config_error_converts_into_top_level() {
        let err: VrtkError = ConfigError::EmptyAllowList.into();
        assert!(err.to_string().starts_with("configuration error:"));
    }
}
