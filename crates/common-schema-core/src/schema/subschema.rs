//! Canonical subschema nodes
//!
//! A [`Subschema`] is one node of a normalized schema tree: the name of its
//! type plugin plus an ordered set of [`Attribute`]s. Child subschemas are
//! owned by their parent, so a tree is freely cloneable and never shared.
//!
//! Copyright (c) 2025 Common Schema Team
//! Licensed under the Apache-2.0 license

use indexmap::IndexMap;
use regex::Regex;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

use crate::error::SchemaError;
use crate::schema::data::{Hook, NormalizeFn, SchemaData, ValidateFn};
use crate::value::Value;

/// One attribute of a canonical subschema
#[derive(Debug, Clone)]
pub enum Attribute {
    /// A literal attribute (`required`, `enum`, `min`, `description`, ...)
    Value(Value),
    /// A compiled regular expression (`match`)
    Pattern(Regex),
    /// A single child subschema (`elements`, `values`)
    Subschema(Box<Subschema>),
    /// Named child subschemas (`properties`)
    Properties(IndexMap<String, Subschema>),
    /// Ordered child subschemas (`alternatives`)
    Alternatives(Vec<Subschema>),
    Hook(Hook),
}

impl PartialEq for Attribute {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Attribute::Value(a), Attribute::Value(b)) => a == b,
            (Attribute::Pattern(a), Attribute::Pattern(b)) => a.as_str() == b.as_str(),
            (Attribute::Subschema(a), Attribute::Subschema(b)) => a == b,
            (Attribute::Properties(a), Attribute::Properties(b)) => a == b,
            (Attribute::Alternatives(a), Attribute::Alternatives(b)) => a == b,
            (Attribute::Hook(a), Attribute::Hook(b)) => a == b,
            _ => false,
        }
    }
}

impl From<Value> for Attribute {
    fn from(value: Value) -> Self {
        Attribute::Value(value)
    }
}

impl From<Subschema> for Attribute {
    fn from(subschema: Subschema) -> Self {
        Attribute::Subschema(Box::new(subschema))
    }
}

impl Serialize for Attribute {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Attribute::Value(value) => value.serialize(serializer),
            Attribute::Pattern(regex) => serializer.serialize_str(regex.as_str()),
            Attribute::Subschema(child) => child.serialize(serializer),
            Attribute::Properties(properties) => {
                let mut map = serializer.serialize_map(Some(properties.len()))?;
                for (key, child) in properties {
                    map.serialize_entry(key, child)?;
                }
                map.end()
            }
            Attribute::Alternatives(alternatives) => {
                let mut seq = serializer.serialize_seq(Some(alternatives.len()))?;
                for child in alternatives {
                    seq.serialize_element(child)?;
                }
                seq.end()
            }
            Attribute::Hook(_) => serializer.serialize_unit(),
        }
    }
}

/// A canonical schema node
#[derive(Debug, Clone, PartialEq)]
pub struct Subschema {
    type_name: String,
    attributes: IndexMap<String, Attribute>,
}

impl Subschema {
    pub fn new<T: Into<String>>(type_name: T) -> Self {
        Self {
            type_name: type_name.into(),
            attributes: IndexMap::new(),
        }
    }

    /// Builder-style attribute insertion
    pub fn with_attribute<K, A>(mut self, key: K, attribute: A) -> Self
    where
        K: Into<String>,
        A: Into<Attribute>,
    {
        self.attributes.insert(key.into(), attribute.into());
        self
    }

    /// Convert the remaining raw attributes literally.
    ///
    /// Hooks are kept as hooks, the `type` key is dropped and everything else
    /// must be a plain value.
    pub fn from_raw<T: Into<String>>(type_name: T, raw: RawSubschema) -> Result<Self, SchemaError> {
        let mut subschema = Subschema::new(type_name);
        for (key, data) in raw.fields {
            if key == "type" {
                continue;
            }
            let attribute = match data {
                SchemaData::Hook(hook) => Attribute::Hook(hook),
                other => Attribute::Value(other.into_value().map_err(|e| e.at(&key))?),
            };
            subschema.attributes.insert(key, attribute);
        }
        Ok(subschema)
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn set_type_name<T: Into<String>>(&mut self, type_name: T) {
        self.type_name = type_name.into();
    }

    pub fn attributes(&self) -> &IndexMap<String, Attribute> {
        &self.attributes
    }

    pub fn attribute(&self, key: &str) -> Option<&Attribute> {
        self.attributes.get(key)
    }

    pub fn insert<K: Into<String>>(&mut self, key: K, attribute: Attribute) -> Option<Attribute> {
        self.attributes.insert(key.into(), attribute)
    }

    pub fn remove(&mut self, key: &str) -> Option<Attribute> {
        self.attributes.shift_remove(key)
    }

    /// A literal attribute
    pub fn value(&self, key: &str) -> Option<&Value> {
        match self.attributes.get(key) {
            Some(Attribute::Value(value)) => Some(value),
            _ => None,
        }
    }

    /// A literal attribute that is `true`
    pub fn flag(&self, key: &str) -> bool {
        matches!(self.value(key), Some(Value::Bool(true)))
    }

    pub fn number(&self, key: &str) -> Option<f64> {
        self.value(key).and_then(Value::as_f64)
    }

    pub fn string(&self, key: &str) -> Option<&str> {
        self.value(key).and_then(Value::as_str)
    }

    pub fn pattern(&self, key: &str) -> Option<&Regex> {
        match self.attributes.get(key) {
            Some(Attribute::Pattern(regex)) => Some(regex),
            _ => None,
        }
    }

    pub fn child(&self, key: &str) -> Option<&Subschema> {
        match self.attributes.get(key) {
            Some(Attribute::Subschema(child)) => Some(child),
            _ => None,
        }
    }

    pub fn properties(&self) -> Option<&IndexMap<String, Subschema>> {
        match self.attributes.get("properties") {
            Some(Attribute::Properties(properties)) => Some(properties),
            _ => None,
        }
    }

    pub fn alternatives(&self) -> Option<&[Subschema]> {
        match self.attributes.get("alternatives") {
            Some(Attribute::Alternatives(alternatives)) => Some(alternatives),
            _ => None,
        }
    }

    pub fn hook(&self, key: &str) -> Option<&Hook> {
        match self.attributes.get(key) {
            Some(Attribute::Hook(hook)) => Some(hook),
            _ => None,
        }
    }

    pub fn is_required(&self) -> bool {
        self.flag("required")
    }

    /// The default for a missing value, invoking a producer hook if needed
    pub fn default_value(&self) -> Option<Value> {
        match self.attributes.get("default") {
            Some(Attribute::Value(Value::Null)) | None => None,
            Some(Attribute::Value(value)) => Some(value.clone()),
            Some(Attribute::Hook(Hook::Default(produce))) => Some(produce()).filter(|v| !v.is_null()),
            Some(_) => None,
        }
    }

    pub fn enum_values(&self) -> Option<&[Value]> {
        self.value("enum").and_then(Value::as_array).map(Vec::as_slice)
    }

    pub fn normalize_hook(&self) -> Option<&NormalizeFn> {
        match self.attributes.get("normalize") {
            Some(Attribute::Hook(Hook::Normalize(f))) => Some(f),
            _ => None,
        }
    }

    pub fn validate_hook(&self) -> Option<&ValidateFn> {
        match self.attributes.get("validate") {
            Some(Attribute::Hook(Hook::Validate(f))) => Some(f),
            _ => None,
        }
    }

    /// A custom error message attribute, or the fallback
    pub fn message(&self, key: &str, fallback: &str) -> String {
        self.string(key).unwrap_or(fallback).to_string()
    }

    /// Convert to JSON, dropping hooks
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }

    /// Structural filter over this subtree.
    ///
    /// `Some(true)` keeps the whole node, `Some(false)` drops it and `None`
    /// keeps the node while deciding each child separately. A node whose
    /// single child is dropped is dropped as well, as is a node left without
    /// any alternatives.
    pub fn filter<F>(&self, predicate: &mut F) -> Option<Subschema>
    where
        F: FnMut(&Subschema) -> Option<bool>,
    {
        match predicate(self) {
            Some(true) => Some(self.clone()),
            Some(false) => None,
            None => self.filter_children(predicate),
        }
    }

    fn filter_children<F>(&self, predicate: &mut F) -> Option<Subschema>
    where
        F: FnMut(&Subschema) -> Option<bool>,
    {
        let mut attributes = IndexMap::with_capacity(self.attributes.len());
        for (key, attribute) in &self.attributes {
            let filtered = match attribute {
                Attribute::Subschema(child) => Attribute::Subschema(Box::new(child.filter(&mut *predicate)?)),
                Attribute::Properties(properties) => Attribute::Properties(
                    properties
                        .iter()
                        .filter_map(|(name, child)| {
                            child.filter(&mut *predicate).map(|c| (name.clone(), c))
                        })
                        .collect(),
                ),
                Attribute::Alternatives(alternatives) => {
                    let kept: Vec<_> = alternatives
                        .iter()
                        .filter_map(|child| child.filter(&mut *predicate))
                        .collect();
                    if kept.is_empty() {
                        return None;
                    }
                    Attribute::Alternatives(kept)
                }
                other => other.clone(),
            };
            attributes.insert(key.clone(), filtered);
        }
        Some(Subschema {
            type_name: self.type_name.clone(),
            attributes,
        })
    }
}

impl Serialize for Subschema {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let hooks = self
            .attributes
            .values()
            .filter(|a| matches!(a, Attribute::Hook(_)))
            .count();
        let mut map = serializer.serialize_map(Some(1 + self.attributes.len() - hooks))?;
        map.serialize_entry("type", &self.type_name)?;
        for (key, attribute) in &self.attributes {
            if !matches!(attribute, Attribute::Hook(_)) {
                map.serialize_entry(key, attribute)?;
            }
        }
        map.end()
    }
}

/// A subschema on its way through normalization
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawSubschema {
    fields: IndexMap<String, SchemaData>,
}

impl RawSubschema {
    pub fn from_map(fields: IndexMap<String, SchemaData>) -> Self {
        Self { fields }
    }

    /// Wrap shorthand data as `{ type: data }`
    pub fn wrap(type_data: SchemaData) -> Self {
        let mut fields = IndexMap::new();
        fields.insert("type".to_string(), type_data);
        Self { fields }
    }

    pub fn type_data(&self) -> Option<&SchemaData> {
        self.fields.get("type")
    }

    pub fn get(&self, key: &str) -> Option<&SchemaData> {
        self.fields.get(key)
    }

    pub fn take(&mut self, key: &str) -> Option<SchemaData> {
        self.fields.shift_remove(key)
    }

    pub fn insert<K: Into<String>>(&mut self, key: K, data: SchemaData) {
        self.fields.insert(key.into(), data);
    }

    pub fn into_fields(self) -> IndexMap<String, SchemaData> {
        self.fields
    }
}
