//! # Error Types
//!
//! Structured error types for mead_core. The calculation engine itself is
//! infallible: degenerate inputs (zero volume, zero sugar) have defined
//! results. Errors come from the layers around it: input validation in the
//! service facade, catalog lookups, configuration and recipe files.
//!
//! ## Example
//!
//! ```rust
//! use mead_core::errors::{CalcError, CalcResult};
//!
//! fn validate_batch(batch_size_gallons: f64) -> CalcResult<()> {
//!     if batch_size_gallons <= 0.0 {
//!         return Err(CalcError::InvalidInput {
//!             field: "batch_size_gallons".to_string(),
//!             value: batch_size_gallons.to_string(),
//!             reason: "Batch size must be greater than 0".to_string(),
//!         });
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for mead_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Structured error type for calculator operations.
///
/// Serializes with a `type` tag so API consumers can branch on the variant
/// without parsing the message.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// An input value is invalid (out of range, empty list, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// Ingredient id not present in the catalog
    #[error("Ingredient not found: {id}")]
    IngredientNotFound { id: u32 },

    /// A string did not name any variant of an enumerated input
    #[error("Unknown {kind}: '{value}'")]
    UnknownVariant { kind: String, value: String },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// JSON/TOML serialization or deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Engine configuration could not be used
    #[error("Configuration error: {reason}")]
    ConfigError { reason: String },

    /// Schema version mismatch
    #[error("Version mismatch: file version {file_version}, expected {expected_version}")]
    VersionMismatch {
        file_version: String,
        expected_version: String,
    },
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

    /// Create an IngredientNotFound error
    pub fn ingredient_not_found(id: u32) -> Self {
        CalcError::IngredientNotFound { id }
    }

    /// Create an UnknownVariant error
    pub fn unknown_variant(kind: impl Into<String>, value: impl Into<String>) -> Self {
        CalcError::UnknownVariant {
            kind: kind.into(),
            value: value.into(),
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

    /// Create a SerializationError
    pub fn serialization(reason: impl Into<String>) -> Self {
        CalcError::SerializationError {
            reason: reason.into(),
        }
    }

    /// Create a ConfigError
    pub fn config(reason: impl Into<String>) -> Self {
        CalcError::ConfigError {
            reason: reason.into(),
        }
    }

    /// True when the caller can fix the request and try again
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            CalcError::InvalidInput { .. }
                | CalcError::IngredientNotFound { .. }
                | CalcError::UnknownVariant { .. }
        )
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::InvalidInput { .. } => "INVALID_INPUT",
            CalcError::IngredientNotFound { .. } => "INGREDIENT_NOT_FOUND",
            CalcError::UnknownVariant { .. } => "UNKNOWN_VARIANT",
            CalcError::FileError { .. } => "FILE_ERROR",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
            CalcError::ConfigError { .. } => "CONFIG_ERROR",
            CalcError::VersionMismatch { .. } => "VERSION_MISMATCH",
        }
    }
}
