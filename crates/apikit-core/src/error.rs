// Rust guideline compliant 2026-08-17

//! Error types for the apikit core library.

use thiserror::Error;

/// Result type alias for apikit operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for apikit operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid or incomplete configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// An argument failed validation at the call site.
    #[error("Validation error: {0}")]
    Validation(String),

    /// An array mixed indexed and named keys.
    #[error("Mixed array keys: {0}")]
    MixedKeys(String),

    /// No conversion mapping matched an object payload.
    #[error("No conversion mapping for type: {0}")]
    UnmappedType(String),

    /// A conversion handler was given an object without the capability it needs.
    #[error("Handler '{handler}' cannot convert type '{tag}'")]
    TypeMismatch {
        /// Name of the handler that rejected the object.
        handler: &'static str,
        /// Type tag of the rejected object.
        tag: String,
    },

    /// IO error occurred.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
