//! JSON Schema export
//!
//! Every plugin describes its own nodes; the context adds the generic
//! `description` and `enum` keywords and collects shared definitions, which
//! are emitted once under `definitions` at the root.
//!
//! Copyright (c) 2025 Common Schema Team
//! Licensed under the Apache-2.0 license

use serde_json::{json, Map};

use crate::error::Result;
use crate::registry::SchemaRegistry;
use crate::schema::subschema::Subschema;

/// JSON number for a schema bound, integral values without a fraction
pub(crate) fn json_number(n: f64) -> serde_json::Value {
    if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
        json!(n as i64)
    } else {
        json!(n)
    }
}

pub struct JsonSchemaContext<'a> {
    registry: &'a SchemaRegistry,
    definitions: Map<String, serde_json::Value>,
}

impl<'a> JsonSchemaContext<'a> {
    pub fn new(registry: &'a SchemaRegistry) -> Self {
        Self {
            registry,
            definitions: Map::new(),
        }
    }

    pub fn registry(&self) -> &'a SchemaRegistry {
        self.registry
    }

    /// Register a shared definition, referenced as `#/definitions/{name}`
    pub fn add_definition(&mut self, name: &str, definition: serde_json::Value) {
        self.definitions.insert(name.to_string(), definition);
    }

    /// Describe one node and everything below it
    pub fn subschema_to_json_schema(&mut self, subschema: &Subschema) -> Result<serde_json::Value> {
        let registry = self.registry;
        let mut out = registry.type_for(subschema)?.to_json_schema(subschema, self)?;
        if let Some(object) = out.as_object_mut() {
            if let Some(description) = subschema.string("description") {
                object
                    .entry("description")
                    .or_insert_with(|| json!(description));
            }
            if let Some(values) = subschema.enum_values() {
                object.insert(
                    "enum".to_string(),
                    values.iter().map(|value| value.to_json()).collect(),
                );
            }
        }
        Ok(out)
    }

    /// Describe a root node, attaching collected definitions
    pub fn export(mut self, root: &Subschema) -> Result<serde_json::Value> {
        let mut out = self.subschema_to_json_schema(root)?;
        if !self.definitions.is_empty() {
            if let Some(object) = out.as_object_mut() {
                object.insert("definitions".to_string(), serde_json::Value::Object(self.definitions));
            }
        }
        Ok(out)
    }
}
