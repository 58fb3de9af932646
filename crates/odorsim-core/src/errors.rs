//! Error types for odorsim.
//!
//! Every failure is surfaced to the caller as-is. Nothing in the distance or
//! figure layers substitutes a default value for a rejected input.

use thiserror::Error;

/// Unified error type for distance computation and figure assembly.
#[derive(Error, Debug)]
pub enum OdorsimError {
    /// Wrong tensor rank or mismatched dimensions
    #[error("Invalid shape: {0}")]
    InvalidShape(String),

    /// Non-finite values or vectors a metric cannot be evaluated on
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Unrecognized mode, metric or grouping name
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Requested key absent from a keyed collection
    #[error("Missing key '{key}' in {collection}")]
    MissingKey { key: String, collection: String },

    /// Serialization/deserialization errors for configuration records
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// I/O errors while reading configuration files
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl OdorsimError {
    /// Creates a shape error.
    pub fn shape(message: impl Into<String>) -> Self {
        OdorsimError::InvalidShape(message.into())
    }

    /// Creates an input validation error.
    pub fn input(message: impl Into<String>) -> Self {
        OdorsimError::InvalidInput(message.into())
    }

    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        OdorsimError::InvalidConfiguration(message.into())
    }

    /// Creates a missing-key error.
    pub fn missing_key(key: impl Into<String>, collection: impl Into<String>) -> Self {
        OdorsimError::MissingKey {
            key: key.into(),
            collection: collection.into(),
        }
    }

    /// Short machine-readable kind.
    pub fn kind(&self) -> &'static str {
        match self {
            OdorsimError::InvalidShape(_) => "invalid-shape",
            OdorsimError::InvalidInput(_) => "invalid-input",
            OdorsimError::InvalidConfiguration(_) => "invalid-configuration",
            OdorsimError::MissingKey { .. } => "missing-key",
            OdorsimError::SerializationError(_) => "serialization",
            OdorsimError::IoError(_) => "io",
        }
    }
}

/// Result alias used across the library crates.
pub type Result<T> = std::result::Result<T, OdorsimError>;
