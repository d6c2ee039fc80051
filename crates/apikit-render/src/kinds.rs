// Rust guideline compliant 2026-08-21

//! Renderable error kinds.
//!
//! These are the error types the built-in handler table knows how to map.
//! Anything else reaching the renderer is treated as an uncaught error.
//! Constructors capture their call site so debug blocks can point at the
//! place the error was raised.

use http::StatusCode;
use std::collections::BTreeMap;
use std::panic::Location;
use thiserror::Error;

/// HTTP-kind error carrying its own status code.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct HttpError {
    /// Status the error was raised with.
    pub status: StatusCode,
    /// Message shown to the caller; may be empty, in which case the renderer
    /// falls back to a per-status template.
    pub message: String,
    location: &'static Location<'static>,
}

impl HttpError {
    /// Type tag used in debug blocks.
    pub const TAG: &'static str = "http_error";

    /// Creates an HTTP error with the given status and message.
    #[track_caller]
    #[must_use]
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            location: Location::caller(),
        }
    }

    /// Creates a 404 error with no message.
    #[track_caller]
    #[must_use]
    pub fn not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, "")
    }

    /// Creates a 503 error with no message.
    #[track_caller]
    #[must_use]
    pub fn service_unavailable() -> Self {
        Self::new(StatusCode::SERVICE_UNAVAILABLE, "")
    }

    /// Returns where the error was created.
    #[must_use]
    pub fn location(&self) -> &'static Location<'static> {
        self.location
    }
}

/// Input validation failure with per-field messages.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ValidationFailure {
    /// Summary message; may be empty.
    pub message: String,
    /// Field name to list of violation messages.
    pub errors: BTreeMap<String, Vec<String>>,
    location: &'static Location<'static>,
}

impl ValidationFailure {
    /// Type tag used in debug blocks.
    pub const TAG: &'static str = "validation_failure";

    /// Creates a validation failure from per-field messages.
    #[track_caller]
    #[must_use]
    pub fn new(errors: BTreeMap<String, Vec<String>>) -> Self {
        Self {
            message: String::new(),
            errors,
            location: Location::caller(),
        }
    }

    /// Sets the summary message.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Returns where the error was created.
    #[must_use]
    pub fn location(&self) -> &'static Location<'static> {
        self.location
    }
}

/// Authentication failure.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct Unauthenticated {
    /// Message shown to the caller; may be empty.
    pub message: String,
    location: &'static Location<'static>,
}

impl Unauthenticated {
    /// Type tag used in debug blocks.
    pub const TAG: &'static str = "unauthenticated";

    /// Creates an authentication failure.
    #[track_caller]
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            location: Location::caller(),
        }
    }

    /// Returns where the error was created.
    #[must_use]
    pub fn location(&self) -> &'static Location<'static> {
        self.location
    }
}
