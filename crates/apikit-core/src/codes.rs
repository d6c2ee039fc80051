// Rust guideline compliant 2026-08-17

//! API code registry.
//!
//! API codes are plain integers identifying the business-level outcome of a
//! request, distinct from HTTP status codes. Two disjoint ranges exist:
//!
//! - the reserved range `0..=19`, owned by built-in library behavior,
//! - the application range `min_code..=max_code`, configured by the user and
//!   required to sit entirely above the reserved range.

use crate::{Error, Result};
use std::collections::BTreeMap;

/// Lowest code of the reserved range.
pub const RESERVED_MIN_CODE: i32 = 0;

/// Highest code of the reserved range.
pub const RESERVED_MAX_CODE: i32 = 19;

/// Built-in API codes occupying the reserved range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinCode {
    /// Successful response.
    Ok,
    /// Error response without a dedicated message mapping.
    NoErrorMessage,
    /// HTTP 404 raised through the error renderer.
    HttpNotFound,
    /// HTTP 503 raised through the error renderer.
    HttpServiceUnavailable,
    /// Generic HTTP-kind error.
    HttpError,
    /// Error not recognized by any handler.
    UncaughtError,
    /// Authentication failure.
    Unauthenticated,
    /// Input validation failure.
    ValidationFailed,
}

impl BuiltinCode {
    /// All built-in codes, in code order.
    pub const ALL: [BuiltinCode; 8] = [
        BuiltinCode::Ok,
        BuiltinCode::NoErrorMessage,
        BuiltinCode::HttpNotFound,
        BuiltinCode::HttpServiceUnavailable,
        BuiltinCode::HttpError,
        BuiltinCode::UncaughtError,
        BuiltinCode::Unauthenticated,
        BuiltinCode::ValidationFailed,
    ];

    /// Returns the integer API code.
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            BuiltinCode::Ok => 0,
            BuiltinCode::NoErrorMessage => 1,
            BuiltinCode::HttpNotFound => 10,
            BuiltinCode::HttpServiceUnavailable => 11,
            BuiltinCode::HttpError => 12,
            BuiltinCode::UncaughtError => 13,
            BuiltinCode::Unauthenticated => 14,
            BuiltinCode::ValidationFailed => 15,
        }
    }

    /// Returns the message-lookup key for the code.
    #[must_use]
    pub const fn message_key(self) -> &'static str {
        match self {
            BuiltinCode::Ok => "apikit.ok",
            BuiltinCode::NoErrorMessage => "apikit.no_error_message",
            BuiltinCode::HttpNotFound => "apikit.http_404",
            BuiltinCode::HttpServiceUnavailable => "apikit.http_503",
            BuiltinCode::HttpError => "apikit.http_error",
            BuiltinCode::UncaughtError => "apikit.uncaught_error",
            BuiltinCode::Unauthenticated => "apikit.unauthenticated",
            BuiltinCode::ValidationFailed => "apikit.validation_failed",
        }
    }
}

/// Returns true if `code` lies in the reserved range.
#[must_use]
pub const fn is_reserved(code: i32) -> bool {
    code >= RESERVED_MIN_CODE && code <= RESERVED_MAX_CODE
}

/// Immutable registry mapping API codes to message-lookup keys.
///
/// Built once from configuration and read-only afterwards. The merged map
/// starts from the built-in base table; user overrides win on collision.
#[derive(Debug, Clone)]
pub struct CodeRegistry {
    min_code: i32,
    max_code: i32,
    map: BTreeMap<i32, String>,
}

impl CodeRegistry {
    /// Builds a registry for the given application range and user overrides.
    ///
    /// Override keys are accepted for both ranges, so built-in message keys
    /// can be replaced as well.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if:
    /// - `min_code` does not lie above the reserved range
    /// - `min_code` is not strictly below `max_code`
    /// - an override key falls outside both ranges
    pub fn new(min_code: i32, max_code: i32, overrides: &BTreeMap<i32, String>) -> Result<Self> {
        if min_code <= RESERVED_MAX_CODE {
            return Err(Error::Config(format!(
                "min_code must be greater than {}, got {}",
                RESERVED_MAX_CODE, min_code
            )));
        }
        if min_code >= max_code {
            return Err(Error::Config(format!(
                "min_code ({}) must be less than max_code ({})",
                min_code, max_code
            )));
        }

        let mut map: BTreeMap<i32, String> = BuiltinCode::ALL
            .iter()
            .map(|c| (c.code(), c.message_key().to_string()))
            .collect();

        for (&code, key) in overrides {
            if !is_reserved(code) && !(code >= min_code && code <= max_code) {
                return Err(Error::Config(format!(
                    "mapped code {} is outside both the reserved range and {}..={}",
                    code, min_code, max_code
                )));
            }
            map.insert(code, key.clone());
        }

        Ok(Self {
            min_code,
            max_code,
            map,
        })
    }

    /// Lowest application code.
    #[must_use]
    pub fn min_code(&self) -> i32 {
        self.min_code
    }

    /// Highest application code.
    #[must_use]
    pub fn max_code(&self) -> i32 {
        self.max_code
    }

    /// Checks whether `code` lies in the reserved range or the application range.
    #[must_use]
    pub fn is_valid(&self, code: i32) -> bool {
        is_reserved(code) || (code >= self.min_code && code <= self.max_code)
    }

    /// Looks up the message key for a code in the merged map.
    ///
    /// Returns `None` for codes that are valid but have no mapping.
    ///
    /// # Errors
    ///
    /// Returns `Error::Validation` if the code is outside both ranges.
    pub fn message_key(&self, code: i32) -> Result<Option<&str>> {
        if !self.is_valid(code) {
            return Err(Error::Validation(format!(
                "API code {} is outside the reserved range and {}..={}",
                code, self.min_code, self.max_code
            )));
        }
        Ok(self.map.get(&code).map(String::as_str))
    }

    /// Looks up a message key against the reserved range only.
    ///
    /// # Errors
    ///
    /// Returns `Error::Validation` if the code is outside the reserved range.
    pub fn reserved_message_key(&self, code: i32) -> Result<Option<&str>> {
        if !is_reserved(code) {
            return Err(Error::Validation(format!(
                "API code {} is outside the reserved range {}..={}",
                code, RESERVED_MIN_CODE, RESERVED_MAX_CODE
            )));
        }
        Ok(self.map.get(&code).map(String::as_str))
    }

    /// Translates an application-relative offset into an absolute API code.
    ///
    /// Offset 0 maps to `min_code`.
    ///
    /// # Errors
    ///
    /// Returns `Error::Validation` if the resulting code would leave the
    /// application range.
    pub fn app_code(&self, offset: i32) -> Result<i32> {
        let code = self.min_code.checked_add(offset).ok_or_else(|| {
            Error::Validation(format!("code offset {} overflows", offset))
        })?;
        if code < self.min_code || code > self.max_code {
            return Err(Error::Validation(format!(
                "code offset {} falls outside {}..={}",
                offset, self.min_code, self.max_code
            )));
        }
        Ok(code)
    }
}
