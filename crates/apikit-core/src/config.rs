// Rust guideline compliant 2026-08-19

//! Configuration management for apikit.

use crate::codes::RESERVED_MAX_CODE;
use crate::envelope::KeyLabels;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Wrapping keys for top-level primitive payloads, per primitive type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PrimitiveKeys {
    /// Key for a bare boolean payload.
    #[serde(default = "default_value_key")]
    pub boolean: String,
    /// Key for a bare integer payload.
    #[serde(default = "default_value_key")]
    pub integer: String,
    /// Key for a bare float payload.
    #[serde(default = "default_value_key")]
    pub double: String,
    /// Key for a bare string payload.
    #[serde(default = "default_value_key")]
    pub string: String,
    /// Key for a top-level sequential array payload.
    #[serde(default = "default_values_key")]
    pub array: String,
}

fn default_value_key() -> String {
    "value".to_string()
}

fn default_values_key() -> String {
    "values".to_string()
}

impl Default for PrimitiveKeys {
    fn default() -> Self {
        Self {
            boolean: default_value_key(),
            integer: default_value_key(),
            double: default_value_key(),
            string: default_value_key(),
            array: default_values_key(),
        }
    }
}

impl PrimitiveKeys {
    /// Validates that every wrapping key is non-empty.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` otherwise.
    pub fn validate(&self) -> Result<()> {
        let keys = [
            ("boolean", &self.boolean),
            ("integer", &self.integer),
            ("double", &self.double),
            ("string", &self.string),
            ("array", &self.array),
        ];
        for (name, key) in keys {
            if key.is_empty() {
                return Err(Error::Config(format!(
                    "primitive key for '{}' must not be empty",
                    name
                )));
            }
        }
        Ok(())
    }
}

/// Debug-block settings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct DebugConfig {
    /// Whether error responses carry a debug block.
    #[serde(default)]
    pub enabled: bool,
}

/// Configuration for apikit behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Lowest application API code.
    #[serde(default = "default_min_code")]
    pub min_code: i32,

    /// Highest application API code.
    #[serde(default = "default_max_code")]
    pub max_code: i32,

    /// Code-to-message-key overrides, keyed by the code's decimal string.
    #[serde(default)]
    pub map: BTreeMap<String, String>,

    /// Message-key-to-template overrides for the configured locale.
    #[serde(default)]
    pub messages: BTreeMap<String, String>,

    /// Locale messages are resolved for.
    #[serde(default = "default_locale")]
    pub locale: String,

    /// Envelope field labels.
    #[serde(default)]
    pub keys: KeyLabels,

    /// Primitive wrapping keys.
    #[serde(default)]
    pub primitives: PrimitiveKeys,

    /// Debug-block settings.
    #[serde(default)]
    pub debug: DebugConfig,

    /// HTTP status used for error responses when nothing better is known.
    #[serde(default = "default_error_http_code")]
    pub default_error_http_code: u16,
}

/// Default lowest application code.
fn default_min_code() -> i32 {
    100
}

/// Default highest application code.
fn default_max_code() -> i32 {
    1024
}

/// Default locale.
fn default_locale() -> String {
    "en".to_string()
}

/// Default error HTTP status.
fn default_error_http_code() -> u16 {
    400
}

impl Default for Config {
    fn default() -> Self {
        Self {
            min_code: default_min_code(),
            max_code: default_max_code(),
            map: BTreeMap::new(),
            messages: BTreeMap::new(),
            locale: default_locale(),
            keys: KeyLabels::default(),
            primitives: PrimitiveKeys::default(),
            debug: DebugConfig::default(),
            default_error_http_code: default_error_http_code(),
        }
    }
}

impl Config {
    /// Loads configuration from file and environment variables.
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values
    /// 2. Configuration file at `<dir>/apikit.toml`
    /// 3. Environment variables with `APIKIT_` prefix
    ///
    /// # Arguments
    ///
    /// * `dir` - Directory the config file is looked up in
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The configuration file exists but cannot be read
    /// - The configuration file contains invalid TOML
    /// - Configuration values fail validation
    pub fn load(dir: &Path) -> Result<Self> {
        let mut config = Self::default();

        let config_path = dir.join("apikit.toml");
        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let file_config: Config = toml::from_str(&content)
                .map_err(|e| Error::Config(format!("Invalid config file: {}", e)))?;
            config = file_config;
        }

        config.apply_env_overrides()?;
        config.validate()?;

        Ok(config)
    }

    /// Applies environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `APIKIT_MIN_CODE` - Lowest application code
    /// - `APIKIT_MAX_CODE` - Highest application code
    /// - `APIKIT_LOCALE` - Message locale
    /// - `APIKIT_DEBUG` - Debug block on error responses (true/false)
    /// - `APIKIT_DEFAULT_ERROR_HTTP_CODE` - Fallback error HTTP status
    ///
    /// # Errors
    ///
    /// Returns an error if environment variable values are invalid.
    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(val) = std::env::var("APIKIT_MIN_CODE") {
            self.min_code = val
                .parse()
                .map_err(|_| Error::Config("APIKIT_MIN_CODE must be an integer".to_string()))?;
        }

        if let Ok(val) = std::env::var("APIKIT_MAX_CODE") {
            self.max_code = val
                .parse()
                .map_err(|_| Error::Config("APIKIT_MAX_CODE must be an integer".to_string()))?;
        }

        if let Ok(val) = std::env::var("APIKIT_LOCALE") {
            self.locale = val;
        }

        if let Ok(val) = std::env::var("APIKIT_DEBUG") {
            self.debug.enabled = val
                .parse()
                .map_err(|_| Error::Config("APIKIT_DEBUG must be true or false".to_string()))?;
        }

        if let Ok(val) = std::env::var("APIKIT_DEFAULT_ERROR_HTTP_CODE") {
            self.default_error_http_code = val.parse().map_err(|_| {
                Error::Config("APIKIT_DEFAULT_ERROR_HTTP_CODE must be a status code".to_string())
            })?;
        }

        Ok(())
    }

    /// Validates the configuration values.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The application code range is empty or overlaps the reserved range
    /// - A `map` key is not a decimal integer
    /// - The locale is empty
    /// - Envelope labels collide or primitive keys are empty
    /// - The fallback error HTTP status is outside `400..=599`
    pub fn validate(&self) -> Result<()> {
        if self.min_code <= RESERVED_MAX_CODE {
            return Err(Error::Config(format!(
                "min_code must be greater than {}, got {}",
                RESERVED_MAX_CODE, self.min_code
            )));
        }

        if self.min_code >= self.max_code {
            return Err(Error::Config(format!(
                "min_code ({}) must be less than max_code ({})",
                self.min_code, self.max_code
            )));
        }

        for key in self.map.keys() {
            if key.parse::<i32>().is_err() {
                return Err(Error::Config(format!(
                    "map key '{}' is not an integer API code",
                    key
                )));
            }
        }

        if self.locale.is_empty() {
            return Err(Error::Config("locale must not be empty".to_string()));
        }

        self.keys.validate()?;
        self.primitives.validate()?;

        if !(400..=599).contains(&self.default_error_http_code) {
            return Err(Error::Config(format!(
                "default_error_http_code must be 400-599, got {}",
                self.default_error_http_code
            )));
        }

        Ok(())
    }

    /// Returns the code map with keys parsed into integers.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` for non-integer keys.
    pub fn code_map(&self) -> Result<BTreeMap<i32, String>> {
        let mut map = BTreeMap::new();
        for (key, value) in &self.map {
            let code: i32 = key.parse().map_err(|_| {
                Error::Config(format!("map key '{}' is not an integer API code", key))
            })?;
            map.insert(code, value.clone());
        }
        Ok(map)
    }
}
