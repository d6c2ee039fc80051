// Rust guideline compliant 2026-08-19

//! Apikit Core Library
//!
//! This crate provides the building blocks for normalized API JSON responses:
//! - API code registry (reserved and application ranges)
//! - Message resolution with localization lookup and fallbacks
//! - Payload conversion into JSON-safe structures via a handler registry
//! - Response envelope with configurable field labels
//! - Fluent builder assembling the final status + body pair
//! - Configuration loading and validation

pub mod builder;
pub mod codes;
pub mod config;
pub mod convert;
pub mod envelope;
pub mod error;
pub mod lang;

pub use builder::{Builder, Context};
pub use codes::{BuiltinCode, CodeRegistry, RESERVED_MAX_CODE, RESERVED_MIN_CODE};
pub use config::{Config, DebugConfig, PrimitiveKeys};
pub use convert::{
    ArrayKey, ClassMapping, ConversionHandler, Converter, FieldsHandler, JsonHandler, Matcher,
    Payload, Source,
};
pub use envelope::{ApiResponse, Envelope, KeyLabels};
pub use error::{Error, Result};
pub use lang::{Lang, MessageResolver, Text, Translations};
