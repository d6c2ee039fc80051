// Rust guideline compliant 2026-08-21

//! Error handler table entries and built-in handlers.
//!
//! A handler maps one kind of error to an API-code / HTTP-code pair. It may
//! return [`Disposition::NoMatch`] to signal "not mine"; the renderer then
//! falls back to the mandatory default entry. Misconfiguration (a handler fed
//! the wrong config shape) fails loudly instead.

use crate::kinds::HttpError;
use apikit_core::{Error, Result};
use http::StatusCode;
use std::collections::BTreeMap;

/// Per-entry handler configuration.
#[derive(Debug, Clone)]
pub struct HandlerConfig {
    /// API code for responses produced through this entry.
    pub api_code: i32,
    /// HTTP status override, when the error carries none of its own.
    pub http_code: Option<StatusCode>,
    /// Message key used when the error message is empty or forced.
    pub msg_key: Option<String>,
    /// Forces the message key over the error's own message.
    pub msg_force: bool,
}

impl HandlerConfig {
    /// Creates a config carrying only an API code.
    #[must_use]
    pub fn new(api_code: i32) -> Self {
        Self {
            api_code,
            http_code: None,
            msg_key: None,
            msg_force: false,
        }
    }

    /// Sets the HTTP status override.
    #[must_use]
    pub fn http_code(mut self, status: StatusCode) -> Self {
        self.http_code = Some(status);
        self
    }

    /// Sets the message key.
    #[must_use]
    pub fn msg_key(mut self, key: impl Into<String>) -> Self {
        self.msg_key = Some(key.into());
        self
    }

    /// Forces the message key over the error's own message.
    #[must_use]
    pub fn msg_force(mut self) -> Self {
        self.msg_force = true;
        self
    }
}

/// Configuration of the HTTP-error handler: per-status entries plus a
/// mandatory default.
#[derive(Debug, Clone)]
pub struct HttpHandlerConfig {
    /// Entries keyed by HTTP status code.
    pub per_status: BTreeMap<u16, HandlerConfig>,
    /// Entry used when no per-status entry matches. Must carry an HTTP code.
    pub default: HandlerConfig,
}

/// Handler configuration, simple or HTTP-status-keyed.
#[derive(Debug, Clone)]
pub enum EntryConfig {
    /// Flat configuration.
    Simple(HandlerConfig),
    /// HTTP-status-keyed configuration.
    Http(HttpHandlerConfig),
}

/// Outcome a handler resolved an error to.
#[derive(Debug, Clone)]
pub struct Resolution {
    /// API code for the envelope.
    pub api_code: i32,
    /// HTTP status, when the handler determined one.
    pub http_code: Option<StatusCode>,
    /// Message key for fallback resolution.
    pub msg_key: Option<String>,
    /// Forces the message key over the error's own message.
    pub msg_force: bool,
}

/// Result of asking a handler about an error.
///
/// Explicit sum type instead of a null sentinel: `NoMatch` means "try the
/// default entry", it is not an error.
#[derive(Debug)]
pub enum Disposition {
    /// The handler does not recognize this error.
    NoMatch,
    /// The handler mapped the error.
    Handled(Resolution),
}

/// Strategy mapping one kind of error to envelope codes.
pub trait ErrorHandler: Send + Sync {
    /// Handler name used in diagnostics.
    fn name(&self) -> &'static str;

    /// Attempts to map `error` using `config`.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` when `config` has the wrong shape for this
    /// handler.
    fn handle(
        &self,
        config: &EntryConfig,
        error: &(dyn std::error::Error + 'static),
    ) -> Result<Disposition>;
}

/// Predicate over a dynamic error value.
pub type Predicate = fn(&(dyn std::error::Error + 'static)) -> bool;

/// Table matcher deciding whether an entry applies to an error.
///
/// `Exact` entries are checked before `Category` entries, mirroring
/// exact-class-then-ancestor dispatch.
#[derive(Clone, Copy)]
pub enum ErrorMatcher {
    /// Matches one concrete error type.
    Exact(Predicate),
    /// Matches a family of errors by predicate.
    Category(Predicate),
}

impl ErrorMatcher {
    /// Matcher for the concrete type `T`.
    #[must_use]
    pub fn exact<T: std::error::Error + 'static>() -> Self {
        ErrorMatcher::Exact(|error: &(dyn std::error::Error + 'static)| {
            error.downcast_ref::<T>().is_some()
        })
    }

    /// Matcher for a family of errors.
    #[must_use]
    pub fn category(predicate: Predicate) -> Self {
        ErrorMatcher::Category(predicate)
    }

    /// Checks whether the matcher applies to `error`.
    #[must_use]
    pub fn matches(&self, error: &(dyn std::error::Error + 'static)) -> bool {
        match self {
            ErrorMatcher::Exact(p) | ErrorMatcher::Category(p) => p(error),
        }
    }

    /// True for `Exact` matchers.
    #[must_use]
    pub fn is_exact(&self) -> bool {
        matches!(self, ErrorMatcher::Exact(_))
    }
}

impl std::fmt::Debug for ErrorMatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorMatcher::Exact(_) => f.write_str("Exact"),
            ErrorMatcher::Category(_) => f.write_str("Category"),
        }
    }
}

/// One entry of the handler table.
pub struct HandlerEntry {
    /// Predicate selecting applicable errors.
    pub matcher: ErrorMatcher,
    /// Handler to run.
    pub handler: Box<dyn ErrorHandler>,
    /// Configuration passed to the handler.
    pub config: EntryConfig,
    /// Higher priority wins; ties keep registration order.
    pub priority: i32,
}

impl std::fmt::Debug for HandlerEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerEntry")
            .field("matcher", &self.matcher)
            .field("handler", &self.handler.name())
            .field("priority", &self.priority)
            .finish_non_exhaustive()
    }
}

/// Maps any error straight from its simple config. Never declines.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultHandler;

impl ErrorHandler for DefaultHandler {
    fn name(&self) -> &'static str {
        "default"
    }

    fn handle(
        &self,
        config: &EntryConfig,
        _error: &(dyn std::error::Error + 'static),
    ) -> Result<Disposition> {
        let EntryConfig::Simple(config) = config else {
            return Err(Error::Config(
                "default handler requires a simple config".to_string(),
            ));
        };
        Ok(Disposition::Handled(Resolution {
            api_code: config.api_code,
            http_code: config.http_code,
            msg_key: config.msg_key.clone(),
            msg_force: config.msg_force,
        }))
    }
}

/// Maps [`HttpError`] values through a per-status config table.
///
/// Declines anything that is not an [`HttpError`].
#[derive(Debug, Clone, Copy, Default)]
pub struct HttpErrorHandler;

impl ErrorHandler for HttpErrorHandler {
    fn name(&self) -> &'static str {
        "http"
    }

    fn handle(
        &self,
        config: &EntryConfig,
        error: &(dyn std::error::Error + 'static),
    ) -> Result<Disposition> {
        let EntryConfig::Http(config) = config else {
            return Err(Error::Config(
                "HTTP handler requires a status-keyed config".to_string(),
            ));
        };
        let Some(http) = error.downcast_ref::<HttpError>() else {
            return Ok(Disposition::NoMatch);
        };

        let sub = config
            .per_status
            .get(&http.status.as_u16())
            .unwrap_or(&config.default);

        // The error's own status wins as long as it is an error status;
        // otherwise the configured one applies.
        let http_code = if http.status.as_u16() >= 400 {
            Some(http.status)
        } else {
            sub.http_code
        };

        Ok(Disposition::Handled(Resolution {
            api_code: sub.api_code,
            http_code,
            msg_key: sub.msg_key.clone(),
            msg_force: sub.msg_force,
        }))
    }
}
