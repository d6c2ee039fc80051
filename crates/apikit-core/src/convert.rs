// Rust guideline compliant 2026-08-19

//! Payload conversion into JSON-safe structures.
//!
//! This module turns arbitrary payload trees (primitives, arrays, objects)
//! into `serde_json` values via a priority-ordered registry of conversion
//! handlers. Objects expose capabilities through the [`Source`] trait instead
//! of runtime reflection; the registry matches them by exact type tag or by
//! capability, highest priority first.

use crate::config::PrimitiveKeys;
use crate::{Error, Result};
use serde_json::{Map, Value};

/// Key of one array entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArrayKey {
    /// Positional key of a sequential array.
    Index(u64),
    /// Named key of an associative array.
    Name(String),
}

/// Payload tree accepted by the converter.
///
/// Arrays carry explicit per-entry keys so the converter can enforce the
/// "no mixed keys" rule: an array is either fully sequential (indices
/// counting up from zero) or fully associative, never both.
#[derive(Debug)]
pub enum Payload {
    /// Boolean scalar.
    Bool(bool),
    /// Integer scalar.
    Int(i64),
    /// Floating point scalar.
    Float(f64),
    /// String scalar.
    Str(String),
    /// Keyed array of nested payloads.
    Array(Vec<(ArrayKey, Payload)>),
    /// Object with registered conversion capabilities.
    Object(Box<dyn Source>),
}

impl Payload {
    /// Builds a sequential array payload with indices counting from zero.
    #[must_use]
    pub fn seq(items: Vec<Payload>) -> Self {
        Payload::Array(
            items
                .into_iter()
                .enumerate()
                .map(|(i, p)| (ArrayKey::Index(i as u64), p))
                .collect(),
        )
    }

    /// Builds an associative array payload from named entries.
    #[must_use]
    pub fn map(entries: Vec<(&str, Payload)>) -> Self {
        Payload::Array(
            entries
                .into_iter()
                .map(|(name, p)| (ArrayKey::Name(name.to_string()), p))
                .collect(),
        )
    }

    /// Wraps an object source.
    #[must_use]
    pub fn object(source: impl Source + 'static) -> Self {
        Payload::Object(Box::new(source))
    }
}

impl From<bool> for Payload {
    fn from(value: bool) -> Self {
        Payload::Bool(value)
    }
}

impl From<i64> for Payload {
    fn from(value: i64) -> Self {
        Payload::Int(value)
    }
}

impl From<f64> for Payload {
    fn from(value: f64) -> Self {
        Payload::Float(value)
    }
}

impl From<&str> for Payload {
    fn from(value: &str) -> Self {
        Payload::Str(value.to_string())
    }
}

impl From<String> for Payload {
    fn from(value: String) -> Self {
        Payload::Str(value)
    }
}

/// Object payload with declared conversion capabilities.
///
/// `type_tag` identifies the concrete type for exact registry matches. The
/// capability views return `None` when the type does not support them; a
/// handler invoked on an object without its capability raises
/// [`Error::TypeMismatch`].
pub trait Source: std::fmt::Debug {
    /// Stable tag identifying the concrete type.
    fn type_tag(&self) -> &'static str;

    /// Field-map view of the object, if it supports one.
    fn as_fields(&self) -> Option<Map<String, Value>> {
        None
    }

    /// Self-serialized JSON view of the object, if it supports one.
    fn as_json(&self) -> Option<Value> {
        None
    }
}

/// Registry matcher deciding whether a mapping applies to an object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Matcher {
    /// Matches the exact type tag.
    Type(&'static str),
    /// Matches any object with a field-map view.
    Fields,
    /// Matches any object with a JSON view.
    Json,
}

impl Matcher {
    fn matches(&self, obj: &dyn Source) -> bool {
        match self {
            Matcher::Type(tag) => *tag == obj.type_tag(),
            Matcher::Fields => obj.as_fields().is_some(),
            Matcher::Json => obj.as_json().is_some(),
        }
    }
}

/// Conversion strategy applied to a matched object.
pub trait ConversionHandler: Send + Sync {
    /// Handler name used in diagnostics.
    fn name(&self) -> &'static str;

    /// Converts `obj` into a field map.
    ///
    /// # Errors
    ///
    /// Returns `Error::TypeMismatch` when the object lacks the capability the
    /// handler relies on.
    fn convert(&self, obj: &dyn Source, mapping: &ClassMapping) -> Result<Map<String, Value>>;
}

/// One entry of the class-mapping table.
pub struct ClassMapping {
    /// Predicate selecting applicable objects.
    pub matcher: Matcher,
    /// Conversion strategy to run.
    pub handler: Box<dyn ConversionHandler>,
    /// Key the converted map is nested under when the object is the whole
    /// payload. `None` merges the fields directly into the `data` object.
    pub key: Option<String>,
    /// Higher priority wins when several entries match; ties keep
    /// registration order.
    pub priority: i32,
}

impl std::fmt::Debug for ClassMapping {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClassMapping")
            .field("matcher", &self.matcher)
            .field("handler", &self.handler.name())
            .field("key", &self.key)
            .field("priority", &self.priority)
            .finish()
    }
}

/// Converts objects through their field-map view.
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldsHandler;

impl ConversionHandler for FieldsHandler {
    fn name(&self) -> &'static str {
        "fields"
    }

    fn convert(&self, obj: &dyn Source, _mapping: &ClassMapping) -> Result<Map<String, Value>> {
        obj.as_fields().ok_or_else(|| Error::TypeMismatch {
            handler: self.name(),
            tag: obj.type_tag().to_string(),
        })
    }
}

/// Converts objects through their JSON view.
///
/// Non-object JSON values are wrapped under a `"val"` key so the result is
/// always a field map.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonHandler;

impl ConversionHandler for JsonHandler {
    fn name(&self) -> &'static str {
        "json"
    }

    fn convert(&self, obj: &dyn Source, _mapping: &ClassMapping) -> Result<Map<String, Value>> {
        let value = obj.as_json().ok_or_else(|| Error::TypeMismatch {
            handler: self.name(),
            tag: obj.type_tag().to_string(),
        })?;
        match value {
            Value::Object(map) => Ok(map),
            other => {
                let mut map = Map::new();
                map.insert("val".to_string(), other);
                Ok(map)
            }
        }
    }
}

/// Converts a float payload into JSON.
///
/// JSON has no representation for NaN or infinities; `serde_json` would turn
/// them into `null`, so they are rejected up front.
fn float_value(v: f64) -> Result<Value> {
    if !v.is_finite() {
        return Err(Error::Validation(format!(
            "float payload {} has no JSON representation",
            v
        )));
    }
    Ok(Value::from(v))
}

/// Key style of one array, decided before any element is converted.
enum KeyStyle {
    Sequential,
    Associative,
}

/// Pure payload-to-JSON converter over immutable mapping tables.
#[derive(Debug)]
pub struct Converter {
    classes: Vec<ClassMapping>,
    primitives: PrimitiveKeys,
}

impl Converter {
    /// Starts a builder seeded with the built-in capability mappings.
    #[must_use]
    pub fn builder() -> ConverterBuilder {
        ConverterBuilder::new()
    }

    /// Converts an optional payload into the envelope `data` object.
    ///
    /// `None` stays `None` (the `data: null` case). Everything else becomes a
    /// JSON object: bare primitives and sequential arrays are wrapped under
    /// their configured primitive key, associative arrays and objects become
    /// the object itself.
    ///
    /// # Errors
    ///
    /// Returns conversion errors for mixed-key arrays, objects without a
    /// matching mapping, and handler capability mismatches.
    pub fn convert(&self, payload: Option<&Payload>) -> Result<Option<Map<String, Value>>> {
        match payload {
            None => Ok(None),
            Some(payload) => self.convert_root(payload).map(Some),
        }
    }

    fn convert_root(&self, payload: &Payload) -> Result<Map<String, Value>> {
        match payload {
            Payload::Object(obj) => {
                let mapping = self.find_mapping(obj.as_ref())?;
                let fields = mapping.handler.convert(obj.as_ref(), mapping)?;
                match &mapping.key {
                    Some(key) => {
                        let mut map = Map::new();
                        map.insert(key.clone(), Value::Object(fields));
                        Ok(map)
                    }
                    None => Ok(fields),
                }
            }
            Payload::Array(entries) => match self.convert_array(entries)? {
                Value::Object(map) => Ok(map),
                value => {
                    // Sequential arrays wrap exactly like bare primitives so
                    // `data` stays an object.
                    let mut map = Map::new();
                    map.insert(self.primitives.array.clone(), value);
                    Ok(map)
                }
            },
            Payload::Bool(v) => self.wrap_primitive(&self.primitives.boolean, Value::Bool(*v)),
            Payload::Int(v) => self.wrap_primitive(&self.primitives.integer, Value::from(*v)),
            Payload::Float(v) => self.wrap_primitive(&self.primitives.double, float_value(*v)?),
            Payload::Str(v) => {
                self.wrap_primitive(&self.primitives.string, Value::String(v.clone()))
            }
        }
    }

    fn wrap_primitive(&self, key: &str, value: Value) -> Result<Map<String, Value>> {
        if key.is_empty() {
            return Err(Error::Config(
                "primitive mapping key must not be empty".to_string(),
            ));
        }
        let mut map = Map::new();
        map.insert(key.to_string(), value);
        Ok(map)
    }

    /// Converts a nested payload in place, without primitive wrapping.
    fn convert_nested(&self, payload: &Payload) -> Result<Value> {
        match payload {
            Payload::Bool(v) => Ok(Value::Bool(*v)),
            Payload::Int(v) => Ok(Value::from(*v)),
            Payload::Float(v) => float_value(*v),
            Payload::Str(v) => Ok(Value::String(v.clone())),
            Payload::Array(entries) => self.convert_array(entries),
            Payload::Object(obj) => {
                let mapping = self.find_mapping(obj.as_ref())?;
                let fields = mapping.handler.convert(obj.as_ref(), mapping)?;
                Ok(Value::Object(fields))
            }
        }
    }

    /// Converts one array level, enforcing the mixed-key rule for that level.
    fn convert_array(&self, entries: &[(ArrayKey, Payload)]) -> Result<Value> {
        match Self::classify_keys(entries)? {
            KeyStyle::Sequential => {
                let mut items = Vec::with_capacity(entries.len());
                for (_, payload) in entries {
                    items.push(self.convert_nested(payload)?);
                }
                Ok(Value::Array(items))
            }
            KeyStyle::Associative => {
                let mut map = Map::new();
                for (key, payload) in entries {
                    let ArrayKey::Name(name) = key else {
                        unreachable!("classify_keys rejects index keys here");
                    };
                    map.insert(name.clone(), self.convert_nested(payload)?);
                }
                Ok(Value::Object(map))
            }
        }
    }

    /// Decides the key style of one array.
    ///
    /// The check runs independently at every array met during recursion:
    /// either all keys are indices counting up from zero, or all keys are
    /// names.
    fn classify_keys(entries: &[(ArrayKey, Payload)]) -> Result<KeyStyle> {
        let mut saw_index = false;
        let mut saw_name = false;
        let mut next_index = 0u64;

        for (key, _) in entries {
            match key {
                ArrayKey::Index(i) => {
                    saw_index = true;
                    if *i != next_index {
                        return Err(Error::MixedKeys(format!(
                            "index {} breaks the 0-based sequence (expected {})",
                            i, next_index
                        )));
                    }
                    next_index += 1;
                }
                ArrayKey::Name(name) => {
                    saw_name = true;
                    if name.is_empty() {
                        return Err(Error::Validation(
                            "array entry has an empty name".to_string(),
                        ));
                    }
                }
            }
            if saw_index && saw_name {
                return Err(Error::MixedKeys(
                    "array mixes indexed and named keys".to_string(),
                ));
            }
        }

        if saw_name {
            Ok(KeyStyle::Associative)
        } else {
            // Empty arrays count as sequential.
            Ok(KeyStyle::Sequential)
        }
    }

    /// Finds the mapping for an object: exact type-tag match first, then the
    /// highest-priority capability match.
    fn find_mapping(&self, obj: &dyn Source) -> Result<&ClassMapping> {
        let exact = self
            .classes
            .iter()
            .find(|m| matches!(m.matcher, Matcher::Type(tag) if tag == obj.type_tag()));
        if let Some(mapping) = exact {
            return Ok(mapping);
        }

        self.classes
            .iter()
            .find(|m| m.matcher.matches(obj))
            .ok_or_else(|| Error::UnmappedType(obj.type_tag().to_string()))
    }
}

/// Builder assembling the immutable class-mapping table.
#[derive(Debug)]
pub struct ConverterBuilder {
    classes: Vec<ClassMapping>,
    primitives: PrimitiveKeys,
}

impl ConverterBuilder {
    fn new() -> Self {
        Self {
            classes: vec![
                ClassMapping {
                    matcher: Matcher::Fields,
                    handler: Box::new(FieldsHandler),
                    key: None,
                    priority: -10,
                },
                ClassMapping {
                    matcher: Matcher::Json,
                    handler: Box::new(JsonHandler),
                    key: None,
                    priority: -20,
                },
            ],
            primitives: PrimitiveKeys::default(),
        }
    }

    /// Registers a class mapping.
    #[must_use]
    pub fn class(mut self, mapping: ClassMapping) -> Self {
        self.classes.push(mapping);
        self
    }

    /// Replaces the primitive wrapping keys.
    #[must_use]
    pub fn primitives(mut self, primitives: PrimitiveKeys) -> Self {
        self.primitives = primitives;
        self
    }

    /// Finalizes the converter.
    ///
    /// The table is stable-sorted by priority descending, so equal priorities
    /// keep their registration order.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` for empty nesting keys or empty primitive keys.
    pub fn build(self) -> Result<Converter> {
        for mapping in &self.classes {
            if let Some(key) = &mapping.key {
                if key.is_empty() {
                    return Err(Error::Config(format!(
                        "class mapping for {:?} has an empty nesting key",
                        mapping.matcher
                    )));
                }
            }
        }
        self.primitives.validate()?;

        let mut classes = self.classes;
        classes.sort_by_key(|m| std::cmp::Reverse(m.priority));

        Ok(Converter {
            classes,
            primitives: self.primitives,
        })
    }
}
