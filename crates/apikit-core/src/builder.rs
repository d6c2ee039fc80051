// Rust guideline compliant 2026-08-19

//! Fluent response builder and the immutable context it runs against.

use crate::codes::{BuiltinCode, CodeRegistry};
use crate::config::Config;
use crate::convert::{Converter, Payload};
use crate::envelope::{ApiResponse, Envelope};
use crate::lang::{Lang, MessageResolver, Translations};
use crate::{Error, Result};
use http::StatusCode;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Immutable bundle of configuration-derived state.
///
/// Built once at startup and passed by reference into builders and renderers.
/// Nothing here mutates after construction, so a context can be shared freely
/// between threads.
pub struct Context {
    config: Config,
    registry: CodeRegistry,
    converter: Converter,
    lang: Box<dyn Lang>,
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("config", &self.config)
            .field("registry", &self.registry)
            .field("converter", &self.converter)
            .finish_non_exhaustive()
    }
}

impl Context {
    /// Builds a context from configuration alone.
    ///
    /// Uses the built-in translations (with `messages` overrides merged for
    /// the configured locale) and a converter with only the built-in
    /// capability mappings.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` when the configuration is invalid.
    pub fn new(config: Config) -> Result<Self> {
        let converter = Converter::builder()
            .primitives(config.primitives.clone())
            .build()?;
        Self::with_converter(config, converter)
    }

    /// Builds a context with a custom converter.
    ///
    /// The converter keeps whatever primitive keys it was built with.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` when the configuration is invalid.
    pub fn with_converter(config: Config, converter: Converter) -> Result<Self> {
        let mut translations = Translations::builtin();
        translations.merge(&config.locale, &config.messages);
        Self::with_parts(config, converter, Box::new(translations))
    }

    /// Builds a context with a custom converter and localization service.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` when the configuration is invalid.
    pub fn with_parts(config: Config, converter: Converter, lang: Box<dyn Lang>) -> Result<Self> {
        config.validate()?;
        let registry = CodeRegistry::new(config.min_code, config.max_code, &config.code_map()?)?;
        Ok(Self {
            config,
            registry,
            converter,
            lang,
        })
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the code registry.
    #[must_use]
    pub fn registry(&self) -> &CodeRegistry {
        &self.registry
    }

    /// Returns the payload converter.
    #[must_use]
    pub fn converter(&self) -> &Converter {
        &self.converter
    }

    /// Returns a message resolver bound to this context.
    #[must_use]
    pub fn resolver(&self) -> MessageResolver<'_> {
        MessageResolver::new(&self.registry, self.lang.as_ref(), &self.config.locale)
    }
}

/// Payload attached to a builder: raw (goes through the converter) or an
/// already-converted object.
#[derive(Debug)]
enum DataSource {
    Raw(Payload),
    Converted(Map<String, Value>),
}

/// Fluent builder assembling one response envelope.
#[derive(Debug)]
pub struct Builder<'a> {
    ctx: &'a Context,
    success: bool,
    api_code: i32,
    http_code: Option<StatusCode>,
    data: Option<DataSource>,
    message: Option<String>,
    placeholders: BTreeMap<String, String>,
    debug: Option<Value>,
}

impl<'a> Builder<'a> {
    /// Starts a success response carrying the `Ok` code.
    #[must_use]
    pub fn success(ctx: &'a Context) -> Self {
        Self::new(ctx, true, BuiltinCode::Ok.code())
    }

    /// Starts an error response carrying `api_code`.
    #[must_use]
    pub fn error(ctx: &'a Context, api_code: i32) -> Self {
        Self::new(ctx, false, api_code)
    }

    fn new(ctx: &'a Context, success: bool, api_code: i32) -> Self {
        Self {
            ctx,
            success,
            api_code,
            http_code: None,
            data: None,
            message: None,
            placeholders: BTreeMap::new(),
            debug: None,
        }
    }

    /// Attaches a payload, converted at build time.
    #[must_use]
    pub fn data(mut self, payload: Payload) -> Self {
        self.data = Some(DataSource::Raw(payload));
        self
    }

    /// Attaches an already-converted data object, bypassing the converter.
    #[must_use]
    pub fn data_object(mut self, data: Map<String, Value>) -> Self {
        self.data = Some(DataSource::Converted(data));
        self
    }

    /// Overrides the HTTP status code.
    #[must_use]
    pub fn http_code(mut self, status: StatusCode) -> Self {
        self.http_code = Some(status);
        self
    }

    /// Overrides the resolved message.
    #[must_use]
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Adds a placeholder for message resolution.
    #[must_use]
    pub fn placeholder(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.placeholders.insert(name.into(), value.into());
        self
    }

    /// Replaces all placeholders for message resolution.
    #[must_use]
    pub fn placeholders(mut self, placeholders: BTreeMap<String, String>) -> Self {
        self.placeholders = placeholders;
        self
    }

    /// Attaches a debug block.
    #[must_use]
    pub fn debug(mut self, debug: Value) -> Self {
        self.debug = Some(debug);
        self
    }

    /// Builds the response.
    ///
    /// Defaults: HTTP 200 for success responses, the configured default error
    /// status otherwise; message resolved from the API code when no override
    /// was given.
    ///
    /// # Errors
    ///
    /// Returns `Error::Validation` if:
    /// - the API code is outside both valid ranges
    /// - an error response carries the `Ok` code
    /// - a success response carries a non-2xx status
    /// - an error response carries a status outside `400..=599`
    ///
    /// Conversion errors from the attached payload propagate unchanged.
    pub fn build(self) -> Result<ApiResponse> {
        if !self.ctx.registry.is_valid(self.api_code) {
            return Err(Error::Validation(format!(
                "API code {} is outside both valid ranges",
                self.api_code
            )));
        }
        if !self.success && self.api_code == BuiltinCode::Ok.code() {
            return Err(Error::Validation(
                "error responses must not use the OK code".to_string(),
            ));
        }

        let status = self.resolve_status()?;

        let data = match self.data {
            None => None,
            Some(DataSource::Raw(payload)) => self
                .ctx
                .converter
                .convert(Some(&payload))?
                .map(Value::Object),
            Some(DataSource::Converted(map)) => Some(Value::Object(map)),
        };

        let message = match self.message {
            Some(message) => message,
            None => self
                .ctx
                .resolver()
                .resolve(self.success, self.api_code, &self.placeholders),
        };

        let envelope = Envelope {
            success: self.success,
            code: self.api_code,
            locale: self.ctx.config.locale.clone(),
            message,
            data,
            debug: self.debug,
        };

        Ok(ApiResponse {
            status,
            body: envelope.to_json(&self.ctx.config.keys),
        })
    }

    fn resolve_status(&self) -> Result<StatusCode> {
        match self.http_code {
            Some(status) => {
                if self.success && !status.is_success() {
                    return Err(Error::Validation(format!(
                        "success responses require a 2xx status, got {}",
                        status
                    )));
                }
                if !self.success && !(400..=599).contains(&status.as_u16()) {
                    return Err(Error::Validation(format!(
                        "error responses require a 400-599 status, got {}",
                        status
                    )));
                }
                Ok(status)
            }
            None => {
                if self.success {
                    Ok(StatusCode::OK)
                } else {
                    StatusCode::from_u16(self.ctx.config.default_error_http_code)
                        .map_err(|_| {
                            Error::Config(format!(
                                "default_error_http_code {} is not a valid status",
                                self.ctx.config.default_error_http_code
                            ))
                        })
                }
            }
        }
    }
}
