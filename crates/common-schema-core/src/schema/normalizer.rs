//! Raw schema to canonical tree
//!
//! The normalizer consumes [`SchemaData`] and produces a fresh [`Subschema`]
//! tree. Shorthand forms are recognised by asking each registered plugin in
//! turn; the first to claim a shorthand wins.
//!
//! Copyright (c) 2025 Common Schema Team
//! Licensed under the Apache-2.0 license

use std::sync::Arc;

use crate::error::SchemaError;
use crate::registry::SchemaRegistry;
use crate::schema::data::SchemaData;
use crate::schema::subschema::{RawSubschema, Subschema};
use crate::types::SchemaType;

/// Recursive schema normalizer bound to a registry
#[derive(Debug, Clone, Copy)]
pub struct SchemaNormalizer<'a> {
    registry: &'a SchemaRegistry,
}

impl<'a> SchemaNormalizer<'a> {
    pub fn new(registry: &'a SchemaRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &'a SchemaRegistry {
        self.registry
    }

    /// Normalize one raw subschema. `Null` normalizes to nothing.
    pub fn normalize(&self, data: SchemaData) -> Result<Option<Subschema>, SchemaError> {
        let raw = match data {
            SchemaData::Null => return Ok(None),
            SchemaData::Object(fields) if fields.get("type").is_some_and(|t| !t.is_null()) => {
                RawSubschema::from_map(fields)
            }
            shorthand => RawSubschema::wrap(shorthand),
        };
        self.normalize_raw(raw).map(Some)
    }

    /// Normalize a subschema that must be present
    pub fn normalize_required(&self, data: Option<SchemaData>, what: &str) -> Result<Subschema, SchemaError> {
        data.map(|data| self.normalize(data))
            .transpose()?
            .flatten()
            .ok_or_else(|| SchemaError::new(format!("{} must not be empty", what)))
    }

    fn normalize_raw(&self, raw: RawSubschema) -> Result<Subschema, SchemaError> {
        let (schema_type, is_shorthand) = match raw.type_data() {
            Some(SchemaData::String(name)) => {
                let schema_type = self
                    .registry
                    .schema_type(name)
                    .ok_or_else(|| SchemaError::new(format!("Unknown schema type: {}", name)))?;
                (Arc::clone(schema_type), false)
            }
            Some(type_data) => (self.shorthand_type(type_data)?, true),
            None => return Err(SchemaError::new("Subschema must have a type")),
        };

        if !is_shorthand {
            return schema_type.normalize_schema(raw, self);
        }
        let raw = schema_type.normalize_shorthand_schema(raw)?;
        let mut subschema = schema_type.normalize_schema(raw, self)?;
        subschema.set_type_name(schema_type.name());
        Ok(subschema)
    }

    fn shorthand_type(&self, type_data: &SchemaData) -> Result<Arc<dyn SchemaType>, SchemaError> {
        if let Some(schema_type) = self.registry.match_shorthand(type_data) {
            return Ok(Arc::clone(schema_type));
        }
        match type_data {
            SchemaData::Array(_) => Err(SchemaError::new("Shorthand arrays must contain exactly 1 element")),
            _ => Err(SchemaError::new("Unrecognized shorthand type")),
        }
    }
}
