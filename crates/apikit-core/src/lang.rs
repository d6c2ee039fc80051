// Rust guideline compliant 2026-08-17

//! Message resolution and localization lookup.
//!
//! The envelope builder never emits raw message keys. Every API code resolves
//! through a [`Lang`] lookup, falling back to the generic "OK" / "no error
//! message" entries when a code has no dedicated mapping.

use crate::codes::{BuiltinCode, CodeRegistry};
use std::collections::BTreeMap;

/// Result of a localization lookup.
///
/// Lookup services may return several strings for one key. That shape is
/// documented but unwanted here, so callers concatenate `Many` into one
/// message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Text {
    /// A single resolved string.
    One(String),
    /// Multiple resolved strings for one key.
    Many(Vec<String>),
}

/// Localization lookup service.
///
/// Implementations substitute `:name` placeholders into the stored template.
/// Returning `None` means the key is unknown for the locale.
pub trait Lang: Send + Sync {
    /// Resolves `key` for `locale`, substituting placeholders.
    fn get(&self, locale: &str, key: &str, placeholders: &BTreeMap<String, String>)
        -> Option<Text>;
}

/// Built-in translation tables with user overrides merged on top.
#[derive(Debug, Clone)]
pub struct Translations {
    tables: BTreeMap<String, BTreeMap<String, String>>,
}

/// Built-in English templates for every reserved message key.
const BUILTIN_EN: &[(&str, &str)] = &[
    ("apikit.ok", "OK"),
    ("apikit.no_error_message", "Error #:api_code"),
    ("apikit.uncaught_error", "Uncaught error: :message"),
    ("apikit.http_error", "HTTP error: :message"),
    ("apikit.unauthenticated", "Unauthenticated"),
    ("apikit.validation_failed", "Validation failed"),
    ("apikit.http_400", "Bad Request"),
    ("apikit.http_401", "Unauthenticated"),
    ("apikit.http_403", "Forbidden"),
    ("apikit.http_404", "Not Found"),
    ("apikit.http_405", "Method Not Allowed"),
    ("apikit.http_422", "Unprocessable Entity"),
    ("apikit.http_429", "Too Many Requests"),
    ("apikit.http_500", "Internal Server Error"),
    ("apikit.http_503", "Service Unavailable"),
];

impl Translations {
    /// Creates the built-in tables (currently English only).
    #[must_use]
    pub fn builtin() -> Self {
        let en: BTreeMap<String, String> = BUILTIN_EN
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        let mut tables = BTreeMap::new();
        tables.insert("en".to_string(), en);
        Self { tables }
    }

    /// Merges user templates into the table for `locale`, creating it if needed.
    pub fn merge(&mut self, locale: &str, overrides: &BTreeMap<String, String>) {
        let table = self.tables.entry(locale.to_string()).or_default();
        for (key, template) in overrides {
            table.insert(key.clone(), template.clone());
        }
    }

    /// Substitutes `:name` placeholders into `template`.
    ///
    /// Longer names are replaced first so `:api_code` is never clobbered by a
    /// placeholder named `api`.
    fn substitute(template: &str, placeholders: &BTreeMap<String, String>) -> String {
        let mut names: Vec<&String> = placeholders.keys().collect();
        names.sort_by_key(|n| std::cmp::Reverse(n.len()));

        let mut out = template.to_string();
        for name in names {
            let marker = format!(":{}", name);
            if out.contains(&marker) {
                out = out.replace(&marker, &placeholders[name]);
            }
        }
        out
    }

    fn lookup(&self, locale: &str, key: &str) -> Option<&str> {
        self.tables
            .get(locale)
            .and_then(|t| t.get(key))
            .or_else(|| self.tables.get("en").and_then(|t| t.get(key)))
            .map(String::as_str)
    }
}

impl Lang for Translations {
    fn get(
        &self,
        locale: &str,
        key: &str,
        placeholders: &BTreeMap<String, String>,
    ) -> Option<Text> {
        self.lookup(locale, key)
            .map(|template| Text::One(Self::substitute(template, placeholders)))
    }
}

/// Resolves API codes to human-readable messages.
#[derive(Clone, Copy)]
pub struct MessageResolver<'a> {
    registry: &'a CodeRegistry,
    lang: &'a dyn Lang,
    locale: &'a str,
}

impl std::fmt::Debug for MessageResolver<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageResolver")
            .field("locale", &self.locale)
            .finish_non_exhaustive()
    }
}

impl<'a> MessageResolver<'a> {
    /// Creates a resolver bound to a registry, lookup service and locale.
    #[must_use]
    pub fn new(registry: &'a CodeRegistry, lang: &'a dyn Lang, locale: &'a str) -> Self {
        Self {
            registry,
            lang,
            locale,
        }
    }

    /// Resolves the message for `api_code`.
    ///
    /// Codes without a mapping fall back to [`BuiltinCode::Ok`] for success
    /// responses and [`BuiltinCode::NoErrorMessage`] otherwise. An implicit
    /// `api_code` placeholder is injected unless the caller already provided
    /// one. Multi-value lookup results are concatenated.
    #[must_use]
    pub fn resolve(
        &self,
        success: bool,
        api_code: i32,
        placeholders: &BTreeMap<String, String>,
    ) -> String {
        let fallback = if success {
            BuiltinCode::Ok
        } else {
            BuiltinCode::NoErrorMessage
        };
        let key = match self.registry.message_key(api_code) {
            Ok(Some(key)) => key.to_string(),
            _ => fallback.message_key().to_string(),
        };

        let mut merged = placeholders.clone();
        merged
            .entry("api_code".to_string())
            .or_insert_with(|| api_code.to_string());

        match self.lang.get(self.locale, &key, &merged) {
            Some(Text::One(message)) => message,
            Some(Text::Many(parts)) => parts.join(" "),
            None => match self.lang.get(self.locale, fallback.message_key(), &merged) {
                Some(Text::One(message)) => message,
                Some(Text::Many(parts)) => parts.join(" "),
                None => key,
            },
        }
    }

    /// Resolves a message key directly, without code fallback.
    ///
    /// Returns `None` when the key is unknown to the lookup service.
    #[must_use]
    pub fn translate(
        &self,
        key: &str,
        placeholders: &BTreeMap<String, String>,
    ) -> Option<String> {
        match self.lang.get(self.locale, key, placeholders)? {
            Text::One(message) => Some(message),
            Text::Many(parts) => Some(parts.join(" ")),
        }
    }
}
