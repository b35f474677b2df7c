//! # Error Types
//!
//! Structured error types for geo_core. Every failure carries enough context
//! to tell which input, depth or table entry caused it, so callers (the CLI,
//! or anything consuming the JSON form) can report it without re-deriving.
//!
//! ## Taxonomy
//!
//! - `InvalidInput` / `MissingField` - construction-time validation
//! - `OutOfRange` - a depth query outside the profile or the pile
//! - `PrecheckFailed` - soil layers missing properties a capacity method needs
//! - `LookupFailed` - a key not present in an empirical table
//!
//! ## Example
//!
//! ```rust
//! use geo_core::errors::{CalcError, CalcResult};
//!
//! fn validate_height(height: f64) -> CalcResult<()> {
//!     if height <= 0.0 {
//!         return Err(CalcError::invalid_input(
//!             "height",
//!             height.to_string(),
//!             "Layer height must be positive",
//!         ));
//!     }
//!     Ok(())
//! }
//!
//! assert!(validate_height(-1.0).is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for geo_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// A single soil property missing from a layer, reported by a capacity pre-check.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MissingProperty {
    /// 1-based layer number, counted from the top of the profile
    pub layer: usize,
    /// Soil type of the layer ("cohesive" / "cohesionless")
    pub soil_type: String,
    /// Names of the missing properties (e.g. "tuw", "corr_n", "su")
    pub properties: Vec<String>,
}

impl std::fmt::Display for MissingProperty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Layer {} ({}) is missing these properties: {}",
            self.layer,
            self.soil_type,
            self.properties.join(", ")
        )
    }
}

fn describe_missing(missing: &[MissingProperty]) -> String {
    missing
        .iter()
        .map(|m| m.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Structured error type for geotechnical calculations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// An input value is invalid (negative, inconsistent, wrong shape, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A required field is missing
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// A depth (or depth span) lies outside the valid domain of a query
    #[error("Out of range: {quantity} = {value} - {reason}")]
    OutOfRange {
        quantity: String,
        value: String,
        reason: String,
    },

    /// One or more layers lack properties required by a capacity method
    #[error("{method} analysis pre-check failed: {}", describe_missing(.missing))]
    PrecheckFailed {
        method: String,
        missing: Vec<MissingProperty>,
    },

    /// Key not found in an empirical lookup table
    #[error("Lookup failed: '{key}' not found in {table}")]
    LookupFailed { table: String, key: String },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Generic internal error (should be rare)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl CalcError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a MissingField error
    pub fn missing_field(field: impl Into<String>) -> Self {
        CalcError::MissingField {
            field: field.into(),
        }
    }

    /// Create an OutOfRange error
    pub fn out_of_range(quantity: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::OutOfRange {
            quantity: quantity.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a PrecheckFailed error
    pub fn precheck_failed(method: impl Into<String>, missing: Vec<MissingProperty>) -> Self {
        CalcError::PrecheckFailed {
            method: method.into(),
            missing,
        }
    }

    /// Create a LookupFailed error
    pub fn lookup_failed(table: impl Into<String>, key: impl Into<String>) -> Self {
        CalcError::LookupFailed {
            table: table.into(),
            key: key.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// True for errors raised while validating inputs at construction time
    pub fn is_validation(&self) -> bool {
        matches!(self, CalcError::InvalidInput { .. } | CalcError::MissingField { .. })
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::InvalidInput { .. } => "INVALID_INPUT",
            CalcError::MissingField { .. } => "MISSING_FIELD",
            CalcError::OutOfRange { .. } => "OUT_OF_RANGE",
            CalcError::PrecheckFailed { .. } => "PRECHECK_FAILED",
            CalcError::LookupFailed { .. } => "LOOKUP_FAILED",
            CalcError::FileError { .. } => "FILE_ERROR",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
            CalcError::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}

impl From<serde_json::Error> for CalcError {
    fn from(err: serde_json::Error) -> Self {
        CalcError::SerializationError {
            reason: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = CalcError::out_of_range("z", "20", "Beyond profile depth of 16");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"type\":\"OutOfRange\""));
        let roundtrip: CalcError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(CalcError::missing_field("length").error_code(), "MISSING_FIELD");
        assert_eq!(CalcError::lookup_failed("H-pile sections", "HP9X9").error_code(), "LOOKUP_FAILED");
        assert!(CalcError::invalid_input("height", "0", "must be positive").is_validation());
        assert!(!CalcError::out_of_range("z", "-1", "above grade").is_validation());
    }

    #[test]
    fn test_precheck_message_lists_every_layer() {
        let error = CalcError::precheck_failed(
            "Revised API",
            vec![
                MissingProperty {
                    layer: 1,
                    soil_type: "cohesionless".to_string(),
                    properties: vec!["tuw".to_string(), "corr_n".to_string()],
                },
                MissingProperty {
                    layer: 3,
                    soil_type: "cohesive".to_string(),
                    properties: vec!["su".to_string()],
                },
            ],
        );
        let msg = error.to_string();
        assert!(msg.starts_with("Revised API analysis pre-check failed"));
        assert!(msg.contains("Layer 1 (cohesionless) is missing these properties: tuw, corr_n"));
        assert!(msg.contains("Layer 3 (cohesive) is missing these properties: su"));
    }
}
