//! Raw, un-normalized schema input
//!
//! [`SchemaData`] is a JSON-like tree that may also carry shorthand type
//! tokens ([`Shorthand`]) and callable hooks ([`Hook`]). It is consumed by the
//! schema normalizer and never kept around afterwards.
//!
//! Copyright (c) 2025 Common Schema Team
//! Licensed under the Apache-2.0 license

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};

use crate::error::{Result, SchemaError};
use crate::types::FieldContext;
use crate::value::Value;

/// Primitive type tokens usable in place of a full subschema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shorthand {
    String,
    Number,
    Date,
    Binary,
    Boolean,
    Mixed,
}

impl Shorthand {
    pub fn as_str(&self) -> &'static str {
        match self {
            Shorthand::String => "string",
            Shorthand::Number => "number",
            Shorthand::Date => "date",
            Shorthand::Binary => "binary",
            Shorthand::Boolean => "boolean",
            Shorthand::Mixed => "mixed",
        }
    }
}

impl fmt::Display for Shorthand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Produces a default value on demand
pub type DefaultFn = Arc<dyn Fn() -> Value + Send + Sync>;
/// Custom normalization step run before the type plugin
pub type NormalizeFn = Arc<dyn Fn(Value, &FieldContext<'_>) -> Result<Value> + Send + Sync>;
/// Custom validation step run after the type plugin
pub type ValidateFn = Arc<dyn Fn(&Value, &FieldContext<'_>) -> Result<()> + Send + Sync>;

/// A callable schema attribute
#[derive(Clone)]
pub enum Hook {
    Default(DefaultFn),
    Normalize(NormalizeFn),
    Validate(ValidateFn),
}

impl Hook {
    pub fn default_value<F>(f: F) -> Self
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        Hook::Default(Arc::new(f))
    }

    pub fn normalizer<F>(f: F) -> Self
    where
        F: Fn(Value, &FieldContext<'_>) -> Result<Value> + Send + Sync + 'static,
    {
        Hook::Normalize(Arc::new(f))
    }

    pub fn validator<F>(f: F) -> Self
    where
        F: Fn(&Value, &FieldContext<'_>) -> Result<()> + Send + Sync + 'static,
    {
        Hook::Validate(Arc::new(f))
    }
}

impl fmt::Debug for Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Hook::Default(_) => f.write_str("Hook::Default(..)"),
            Hook::Normalize(_) => f.write_str("Hook::Normalize(..)"),
            Hook::Validate(_) => f.write_str("Hook::Validate(..)"),
        }
    }
}

impl PartialEq for Hook {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Hook::Default(a), Hook::Default(b)) => Arc::ptr_eq(a, b),
            (Hook::Normalize(a), Hook::Normalize(b)) => Arc::ptr_eq(a, b),
            (Hook::Validate(a), Hook::Validate(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// Un-normalized schema tree
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SchemaData {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<SchemaData>),
    Object(IndexMap<String, SchemaData>),
    /// A document value used verbatim (dates, binary data)
    Literal(Value),
    Shorthand(Shorthand),
    Hook(Hook),
}

impl SchemaData {
    /// Build an object node from key/value pairs
    pub fn object<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<SchemaData>,
    {
        SchemaData::Object(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Build an array node
    pub fn array<I, V>(items: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<SchemaData>,
    {
        SchemaData::Array(items.into_iter().map(Into::into).collect())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, SchemaData::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            SchemaData::String(s) => Some(s),
            _ => None,
        }
    }

    /// Convert into a plain document value.
    ///
    /// Fails when the tree still contains shorthand tokens or hooks.
    pub fn into_value(self) -> std::result::Result<Value, SchemaError> {
        Ok(match self {
            SchemaData::Null => Value::Null,
            SchemaData::Bool(b) => Value::Bool(b),
            SchemaData::Number(n) => Value::Number(n),
            SchemaData::String(s) => Value::String(s),
            SchemaData::Array(items) => Value::Array(
                items
                    .into_iter()
                    .map(SchemaData::into_value)
                    .collect::<std::result::Result<_, _>>()?,
            ),
            SchemaData::Object(map) => Value::Object(
                map.into_iter()
                    .map(|(k, v)| v.into_value().map(|v| (k, v)))
                    .collect::<std::result::Result<_, _>>()?,
            ),
            SchemaData::Literal(value) => value,
            SchemaData::Shorthand(token) => {
                return Err(SchemaError::new(format!(
                    "Unexpected type token `{}` in a literal attribute",
                    token
                )))
            }
            SchemaData::Hook(_) => {
                return Err(SchemaError::new("Unexpected hook in a literal attribute"))
            }
        })
    }

    /// Parse a JSON schema definition
    pub fn from_json_str(source: &str) -> Result<Self> {
        let json: serde_json::Value = serde_json::from_str(source)?;
        Ok(json.into())
    }

    /// Parse a YAML schema definition
    pub fn from_yaml_str(source: &str) -> Result<Self> {
        let json: serde_json::Value = serde_yaml::from_str(source)?;
        Ok(json.into())
    }
}

impl<'de> Deserialize<'de> for SchemaData {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        serde_json::Value::deserialize(deserializer).map(SchemaData::from)
    }
}

impl From<serde_json::Value> for SchemaData {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => SchemaData::Null,
            serde_json::Value::Bool(b) => SchemaData::Bool(b),
            serde_json::Value::Number(n) => SchemaData::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => SchemaData::String(s),
            serde_json::Value::Array(items) => {
                SchemaData::Array(items.into_iter().map(SchemaData::from).collect())
            }
            serde_json::Value::Object(map) => SchemaData::Object(
                map.into_iter().map(|(k, v)| (k, SchemaData::from(v))).collect(),
            ),
        }
    }
}

impl From<Value> for SchemaData {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => SchemaData::Null,
            Value::Bool(b) => SchemaData::Bool(b),
            Value::Number(n) => SchemaData::Number(n),
            Value::String(s) => SchemaData::String(s),
            Value::Array(items) => SchemaData::Array(items.into_iter().map(SchemaData::from).collect()),
            Value::Object(map) => SchemaData::Object(
                map.into_iter().map(|(k, v)| (k, SchemaData::from(v))).collect(),
            ),
            other => SchemaData::Literal(other),
        }
    }
}

impl From<Shorthand> for SchemaData {
    fn from(token: Shorthand) -> Self {
        SchemaData::Shorthand(token)
    }
}

impl From<Hook> for SchemaData {
    fn from(hook: Hook) -> Self {
        SchemaData::Hook(hook)
    }
}

impl From<&str> for SchemaData {
    fn from(s: &str) -> Self {
        SchemaData::String(s.to_string())
    }
}

impl From<String> for SchemaData {
    fn from(s: String) -> Self {
        SchemaData::String(s)
    }
}

impl From<bool> for SchemaData {
    fn from(b: bool) -> Self {
        SchemaData::Bool(b)
    }
}

impl From<f64> for SchemaData {
    fn from(n: f64) -> Self {
        SchemaData::Number(n)
    }
}

impl From<i64> for SchemaData {
    fn from(n: i64) -> Self {
        SchemaData::Number(n as f64)
    }
}

impl From<i32> for SchemaData {
    fn from(n: i32) -> Self {
        SchemaData::Number(f64::from(n))
    }
}

impl From<DateTime<Utc>> for SchemaData {
    fn from(d: DateTime<Utc>) -> Self {
        SchemaData::Literal(Value::Date(d))
    }
}

impl From<Vec<SchemaData>> for SchemaData {
    fn from(items: Vec<SchemaData>) -> Self {
        SchemaData::Array(items)
    }
}

impl From<IndexMap<String, SchemaData>> for SchemaData {
    fn from(map: IndexMap<String, SchemaData>) -> Self {
        SchemaData::Object(map)
    }
}
