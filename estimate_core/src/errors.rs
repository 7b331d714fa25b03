//! # Error Types
//!
//! Structured error types for estimate_core. Every variant carries enough
//! context (field name, offending value, entity id) for the boundary layer
//! to render a human-readable message without re-inspecting state.
//!
//! ## Example
//!
//! ```rust
//! use estimate_core::errors::{EstimateError, EstimateResult};
//! use rust_decimal::Decimal;
//!
//! fn validate_length(length: Decimal) -> EstimateResult<()> {
//!     if length < Decimal::ZERO {
//!         return Err(EstimateError::validation(
//!             "length",
//!             length.to_string(),
//!             "dimension must be non-negative",
//!         ));
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for estimate_core operations
pub type EstimateResult<T> = Result<T, EstimateError>;

/// Structured error type for estimation operations.
///
/// All errors are local and synchronous. A failed operation leaves the
/// estimate unchanged; the caller decides whether to retry with corrected
/// input. None of these are fatal to the process.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum EstimateError {
    /// A numeric or text input is invalid (negative dimension, bad parse, etc.)
    #[error("Invalid value for '{field}': {value} - {reason}")]
    Validation {
        field: String,
        value: String,
        reason: String,
    },

    /// An entity (part, line, rate code) does not exist
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Part name collision (compared case-insensitively)
    #[error("A part named '{name}' already exists")]
    DuplicateName { name: String },

    /// The operation is not allowed in the current state
    /// (e.g., editing the derived quantity of a linked abstract line)
    #[error("Invalid operation: {reason}")]
    InvalidOperation { reason: String },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// Estimate file is locked by another user/process
    #[error("File locked: '{path}' is locked by {locked_by} since {locked_at}")]
    FileLocked {
        path: String,
        locked_by: String,
        locked_at: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Schema version mismatch
    #[error("Version mismatch: file version {file_version}, expected {expected_version}")]
    VersionMismatch {
        file_version: String,
        expected_version: String,
    },
}

impl EstimateError {
    /// Create a Validation error
    pub fn validation(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        EstimateError::Validation {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a NotFound error
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        EstimateError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Create a DuplicateName error
    pub fn duplicate_name(name: impl Into<String>) -> Self {
        EstimateError::DuplicateName { name: name.into() }
    }

    /// Create an InvalidOperation error
    pub fn invalid_operation(reason: impl Into<String>) -> Self {
        EstimateError::InvalidOperation {
            reason: reason.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(
        operation: impl Into<String>,
        path: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        EstimateError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileLocked error
    pub fn file_locked(
        path: impl Into<String>,
        locked_by: impl Into<String>,
        locked_at: impl Into<String>,
    ) -> Self {
        EstimateError::FileLocked {
            path: path.into(),
            locked_by: locked_by.into(),
            locked_at: locked_at.into(),
        }
    }

    /// Check if this is a recoverable error (e.g., can retry later)
    pub fn is_recoverable(&self) -> bool {
        matches!(self, EstimateError::FileLocked { .. })
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            EstimateError::Validation { .. } => "VALIDATION",
            EstimateError::NotFound { .. } => "NOT_FOUND",
            EstimateError::DuplicateName { .. } => "DUPLICATE_NAME",
            EstimateError::InvalidOperation { .. } => "INVALID_OPERATION",
            EstimateError::FileError { .. } => "FILE_ERROR",
            EstimateError::FileLocked { .. } => "FILE_LOCKED",
            EstimateError::SerializationError { .. } => "SERIALIZATION_ERROR",
            EstimateError::VersionMismatch { .. } => "VERSION_MISMATCH",
        }
    }
}
