// Rust guideline compliant 2026-08-19

//! Response envelope and configurable field labels.

use crate::{Error, Result};
use http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// JSON labels for the envelope fields.
///
/// Labels are renameable but their semantics are fixed, and all six must be
/// pairwise distinct.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct KeyLabels {
    /// Label of the success flag.
    #[serde(default = "default_success")]
    pub success: String,
    /// Label of the API code.
    #[serde(default = "default_code")]
    pub code: String,
    /// Label of the locale.
    #[serde(default = "default_locale_key")]
    pub locale: String,
    /// Label of the message.
    #[serde(default = "default_message")]
    pub message: String,
    /// Label of the data object.
    #[serde(default = "default_data")]
    pub data: String,
    /// Label of the optional debug block.
    #[serde(default = "default_debug")]
    pub debug: String,
}

fn default_success() -> String {
    "success".to_string()
}

fn default_code() -> String {
    "code".to_string()
}

fn default_locale_key() -> String {
    "locale".to_string()
}

fn default_message() -> String {
    "message".to_string()
}

fn default_data() -> String {
    "data".to_string()
}

fn default_debug() -> String {
    "debug".to_string()
}

impl Default for KeyLabels {
    fn default() -> Self {
        Self {
            success: default_success(),
            code: default_code(),
            locale: default_locale_key(),
            message: default_message(),
            data: default_data(),
            debug: default_debug(),
        }
    }
}

impl KeyLabels {
    /// Validates that all labels are non-empty and pairwise distinct.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` otherwise.
    pub fn validate(&self) -> Result<()> {
        let labels = [
            &self.success,
            &self.code,
            &self.locale,
            &self.message,
            &self.data,
            &self.debug,
        ];
        for label in labels {
            if label.is_empty() {
                return Err(Error::Config("envelope labels must not be empty".to_string()));
            }
        }
        for (i, a) in labels.iter().enumerate() {
            for b in labels.iter().skip(i + 1) {
                if a == b {
                    return Err(Error::Config(format!(
                        "envelope label '{}' is used twice",
                        a
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Fixed-shape response envelope.
///
/// `data` is always `None` or a JSON object; the converter wraps arrays and
/// primitives before they get here. Created fresh per response and never
/// mutated afterwards.
#[derive(Debug, Clone)]
pub struct Envelope {
    /// Business-level outcome flag.
    pub success: bool,
    /// API code, valid per the code registry.
    pub code: i32,
    /// Locale the message was resolved for.
    pub locale: String,
    /// Resolved human-readable message.
    pub message: String,
    /// Converted payload, always an object when present.
    pub data: Option<Value>,
    /// Optional debug block.
    pub debug: Option<Value>,
}

impl Envelope {
    /// Serializes the envelope under the configured labels.
    ///
    /// The debug entry is emitted only when a debug block was attached.
    #[must_use]
    pub fn to_json(&self, keys: &KeyLabels) -> Value {
        let mut map = Map::new();
        map.insert(keys.success.clone(), Value::Bool(self.success));
        map.insert(keys.code.clone(), Value::from(self.code));
        map.insert(keys.locale.clone(), Value::String(self.locale.clone()));
        map.insert(keys.message.clone(), Value::String(self.message.clone()));
        map.insert(keys.data.clone(), self.data.clone().unwrap_or(Value::Null));
        if let Some(debug) = &self.debug {
            map.insert(keys.debug.clone(), debug.clone());
        }
        Value::Object(map)
    }
}

/// Final product of the builder: status code plus serialized envelope.
///
/// Transport is the host framework's job; this is everything it needs.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    /// HTTP status code for the response.
    pub status: StatusCode,
    /// Envelope body, ready for serialization.
    pub body: Value,
}
