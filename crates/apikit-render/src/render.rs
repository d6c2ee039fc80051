// Rust guideline compliant 2026-08-21

//! Error-to-response rendering pipeline.
//!
//! [`Renderer`] owns the merged handler table and turns any error value into
//! a normalized envelope via the core [`Builder`]. Handler dispatch is
//! exact-type match first, then priority order; a handler declining an error
//! falls back to the mandatory default entry. The fallback loop is bounded at
//! two iterations because the default handler never declines.

use crate::handlers::{
    DefaultHandler, Disposition, EntryConfig, ErrorHandler, ErrorMatcher, HandlerConfig,
    HandlerEntry, HttpErrorHandler, HttpHandlerConfig, Resolution,
};
use crate::kinds::{HttpError, Unauthenticated, ValidationFailure};
use apikit_core::{ApiResponse, Builder, BuiltinCode, Context, Error, Result};
use http::StatusCode;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Renders errors into normalized API responses.
pub struct Renderer<'a> {
    ctx: &'a Context,
    entries: Vec<HandlerEntry>,
    default_handler: Box<dyn ErrorHandler>,
    default_config: EntryConfig,
}

impl std::fmt::Debug for Renderer<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Renderer")
            .field("entries", &self.entries)
            .finish_non_exhaustive()
    }
}

impl<'a> Renderer<'a> {
    /// Creates a renderer with the built-in handler table only.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` when the table fails validation.
    pub fn new(ctx: &'a Context) -> Result<Self> {
        Self::builder(ctx).build()
    }

    /// Starts a builder seeded with the built-in handler table.
    #[must_use]
    pub fn builder(ctx: &'a Context) -> RendererBuilder<'a> {
        RendererBuilder::new(ctx)
    }

    /// Renders any error into a normalized response.
    ///
    /// Error-shaped inputs never make this fail; every returned `Err` is a
    /// configuration defect.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` for handler table defects discovered at
    /// dispatch time.
    pub fn render(&self, error: &(dyn std::error::Error + 'static)) -> Result<ApiResponse> {
        let resolution = self.resolve(error)?;
        self.respond(error, resolution)
    }

    /// Renders an authentication failure through the HTTP handler's 401
    /// sub-config, bypassing general dispatch.
    ///
    /// This exists so the host framework's dedicated unauthenticated hook can
    /// target a known configuration directly.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` when no HTTP handler entry is configured.
    pub fn unauthenticated(
        &self,
        error: &(dyn std::error::Error + 'static),
    ) -> Result<ApiResponse> {
        let http = self
            .entries
            .iter()
            .find_map(|e| match &e.config {
                EntryConfig::Http(config) => Some(config),
                EntryConfig::Simple(_) => None,
            })
            .ok_or_else(|| {
                Error::Config("no HTTP error handler entry configured".to_string())
            })?;

        let sub = http
            .per_status
            .get(&StatusCode::UNAUTHORIZED.as_u16())
            .unwrap_or(&http.default);

        let resolution = Resolution {
            api_code: sub.api_code,
            http_code: Some(sub.http_code.unwrap_or(StatusCode::UNAUTHORIZED)),
            msg_key: sub.msg_key.clone(),
            msg_force: sub.msg_force,
        };
        self.respond(error, resolution)
    }

    /// Finds and runs the handler for `error`, falling back to the default
    /// entry on `NoMatch`.
    fn resolve(&self, error: &(dyn std::error::Error + 'static)) -> Result<Resolution> {
        let entry = self
            .entries
            .iter()
            .find(|e| e.matcher.is_exact() && e.matcher.matches(error))
            .or_else(|| self.entries.iter().find(|e| e.matcher.matches(error)));

        let Some(entry) = entry else {
            return self.resolve_default(error);
        };

        match entry.handler.handle(&entry.config, error)? {
            Disposition::Handled(resolution) => {
                tracing::debug!(handler = entry.handler.name(), "error handler selected");
                Ok(resolution)
            }
            Disposition::NoMatch => {
                tracing::warn!(
                    handler = entry.handler.name(),
                    "handler declined error, falling back to default"
                );
                self.resolve_default(error)
            }
        }
    }

    fn resolve_default(&self, error: &(dyn std::error::Error + 'static)) -> Result<Resolution> {
        match self.default_handler.handle(&self.default_config, error)? {
            Disposition::Handled(resolution) => Ok(resolution),
            Disposition::NoMatch => Err(Error::Config(
                "default error handler must not decline".to_string(),
            )),
        }
    }

    /// Builds the final response from a handler resolution.
    fn respond(
        &self,
        error: &(dyn std::error::Error + 'static),
        resolution: Resolution,
    ) -> Result<ApiResponse> {
        let config = self.ctx.config();

        let own_status = error.downcast_ref::<HttpError>().map(|e| e.status);
        let floor = StatusCode::from_u16(config.default_error_http_code).map_err(|_| {
            Error::Config(format!(
                "default_error_http_code {} is not a valid status",
                config.default_error_http_code
            ))
        })?;
        let mut status = resolution.http_code.or(own_status).unwrap_or(floor);
        if !(400..=599).contains(&status.as_u16()) {
            status = floor;
        }

        let ex_msg = error.to_string().trim().to_string();
        let message = if resolution.msg_force || ex_msg.is_empty() {
            self.fallback_message(error, &resolution, status, &ex_msg)
        } else {
            ex_msg
        };

        let mut builder = Builder::error(self.ctx, resolution.api_code)
            .http_code(status)
            .message(message);

        if let Some(validation) = error.downcast_ref::<ValidationFailure>() {
            let mut data = Map::new();
            data.insert(
                "messages".to_string(),
                serde_json::to_value(&validation.errors)?,
            );
            builder = builder.data_object(data);
        }

        if config.debug.enabled {
            builder = builder.debug(debug_block(error));
        }

        builder.build()
    }

    /// Computes the message when the error's own message is empty or forced
    /// out: configured key first, then per-status templates for HTTP-kind
    /// errors, then the generic uncaught-error template.
    fn fallback_message(
        &self,
        error: &(dyn std::error::Error + 'static),
        resolution: &Resolution,
        status: StatusCode,
        ex_msg: &str,
    ) -> String {
        let resolver = self.ctx.resolver();
        let mut placeholders = BTreeMap::new();
        placeholders.insert("api_code".to_string(), resolution.api_code.to_string());
        placeholders.insert("message".to_string(), ex_msg.to_string());

        if let Some(key) = &resolution.msg_key {
            if let Some(message) = resolver.translate(key, &placeholders) {
                return message;
            }
        }

        if error.downcast_ref::<HttpError>().is_some() {
            let per_status = format!("apikit.http_{}", status.as_u16());
            if let Some(message) = resolver.translate(&per_status, &placeholders) {
                return message;
            }
            if let Some(message) =
                resolver.translate(BuiltinCode::HttpError.message_key(), &placeholders)
            {
                return message;
            }
        }

        resolver
            .translate(BuiltinCode::UncaughtError.message_key(), &placeholders)
            .unwrap_or_else(|| resolver.resolve(false, resolution.api_code, &placeholders))
    }
}

/// Builds the debug block for an error: kind tag plus the call site for the
/// known kinds.
fn debug_block(error: &(dyn std::error::Error + 'static)) -> Value {
    let (tag, location) = if let Some(e) = error.downcast_ref::<HttpError>() {
        (HttpError::TAG, Some(e.location()))
    } else if let Some(e) = error.downcast_ref::<ValidationFailure>() {
        (ValidationFailure::TAG, Some(e.location()))
    } else if let Some(e) = error.downcast_ref::<Unauthenticated>() {
        (Unauthenticated::TAG, Some(e.location()))
    } else {
        ("error", None)
    };

    let mut map = Map::new();
    map.insert("type".to_string(), Value::String(tag.to_string()));
    if let Some(location) = location {
        map.insert(
            "file".to_string(),
            Value::String(location.file().to_string()),
        );
        map.insert("line".to_string(), Value::from(location.line()));
    }
    Value::Object(map)
}

/// Builder assembling the immutable handler table.
pub struct RendererBuilder<'a> {
    ctx: &'a Context,
    entries: Vec<HandlerEntry>,
    default_handler: Box<dyn ErrorHandler>,
    default_config: EntryConfig,
}

impl std::fmt::Debug for RendererBuilder<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RendererBuilder")
            .field("entries", &self.entries)
            .finish_non_exhaustive()
    }
}

impl<'a> RendererBuilder<'a> {
    fn new(ctx: &'a Context) -> Self {
        let mut per_status = BTreeMap::new();
        per_status.insert(
            401u16,
            HandlerConfig::new(BuiltinCode::Unauthenticated.code())
                .msg_key(BuiltinCode::Unauthenticated.message_key()),
        );
        per_status.insert(
            404u16,
            HandlerConfig::new(BuiltinCode::HttpNotFound.code())
                .msg_key(BuiltinCode::HttpNotFound.message_key()),
        );
        per_status.insert(
            503u16,
            HandlerConfig::new(BuiltinCode::HttpServiceUnavailable.code())
                .msg_key(BuiltinCode::HttpServiceUnavailable.message_key()),
        );

        let entries = vec![
            HandlerEntry {
                matcher: ErrorMatcher::exact::<HttpError>(),
                handler: Box::new(HttpErrorHandler),
                config: EntryConfig::Http(HttpHandlerConfig {
                    per_status,
                    default: HandlerConfig::new(BuiltinCode::HttpError.code())
                        .http_code(StatusCode::BAD_REQUEST),
                }),
                priority: -100,
            },
            HandlerEntry {
                matcher: ErrorMatcher::exact::<ValidationFailure>(),
                handler: Box::new(DefaultHandler),
                config: EntryConfig::Simple(
                    HandlerConfig::new(BuiltinCode::ValidationFailed.code())
                        .http_code(StatusCode::UNPROCESSABLE_ENTITY)
                        .msg_key(BuiltinCode::ValidationFailed.message_key()),
                ),
                priority: -100,
            },
            HandlerEntry {
                matcher: ErrorMatcher::exact::<Unauthenticated>(),
                handler: Box::new(DefaultHandler),
                config: EntryConfig::Simple(
                    HandlerConfig::new(BuiltinCode::Unauthenticated.code())
                        .http_code(StatusCode::UNAUTHORIZED)
                        .msg_key(BuiltinCode::Unauthenticated.message_key()),
                ),
                priority: -100,
            },
        ];

        Self {
            ctx,
            entries,
            default_handler: Box::new(DefaultHandler),
            default_config: EntryConfig::Simple(
                HandlerConfig::new(BuiltinCode::UncaughtError.code())
                    .http_code(StatusCode::INTERNAL_SERVER_ERROR)
                    .msg_key(BuiltinCode::UncaughtError.message_key()),
            ),
        }
    }

    /// Registers a handler entry. User entries default to priority 0, so they
    /// outrank the built-ins at -100.
    #[must_use]
    pub fn entry(mut self, entry: HandlerEntry) -> Self {
        self.entries.push(entry);
        self
    }

    /// Replaces the mandatory default entry.
    #[must_use]
    pub fn default_entry(mut self, handler: Box<dyn ErrorHandler>, config: EntryConfig) -> Self {
        self.default_handler = handler;
        self.default_config = config;
        self
    }

    /// Finalizes the renderer.
    ///
    /// The table is stable-sorted by priority descending, so equal priorities
    /// keep their registration order.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if:
    /// - the default entry does not carry both an API code and an HTTP code
    /// - an HTTP handler config's default sub-entry carries no HTTP code
    /// - any configured message key is empty
    pub fn build(self) -> Result<Renderer<'a>> {
        validate_entry_config(&self.default_config)?;
        match &self.default_config {
            EntryConfig::Simple(config) if config.http_code.is_none() => {
                return Err(Error::Config(
                    "the default entry must carry an HTTP code".to_string(),
                ));
            }
            _ => {}
        }
        for entry in &self.entries {
            validate_entry_config(&entry.config)?;
        }

        let mut entries = self.entries;
        entries.sort_by_key(|e| std::cmp::Reverse(e.priority));

        Ok(Renderer {
            ctx: self.ctx,
            entries,
            default_handler: self.default_handler,
            default_config: self.default_config,
        })
    }
}

fn validate_entry_config(config: &EntryConfig) -> Result<()> {
    match config {
        EntryConfig::Simple(config) => validate_handler_config(config),
        EntryConfig::Http(config) => {
            if config.default.http_code.is_none() {
                return Err(Error::Config(
                    "HTTP handler default sub-entry must carry an HTTP code".to_string(),
                ));
            }
            validate_handler_config(&config.default)?;
            for sub in config.per_status.values() {
                validate_handler_config(sub)?;
            }
            Ok(())
        }
    }
}

fn validate_handler_config(config: &HandlerConfig) -> Result<()> {
    if let Some(key) = &config.msg_key {
        if key.is_empty() {
            return Err(Error::Config(
                "handler message key must not be empty".to_string(),
            ));
        }
    }
    Ok(())
}
