//! `mixed` type: any value
//!
//! With `serializeMixed`, a mixed field travels as a JSON string: serialized
//! output carries the encoded string and string input is decoded.
//!
//! Copyright (c) 2025 Common Schema Team
//! Licensed under the Apache-2.0 license

use crate::error::{FieldError, Result};
use crate::registry::SchemaRegistry;
use crate::schema::data::{SchemaData, Shorthand};
use crate::schema::json_schema::JsonSchemaContext;
use crate::schema::subschema::Subschema;
use crate::types::{FieldContext, SchemaType, TypeMatch};
use crate::value::Value;

#[derive(Debug, Clone)]
pub struct MixedType {
    name: String,
    /// Node returned for any path below a mixed field
    any: Subschema,
}

impl MixedType {
    pub fn new() -> Self {
        Self::named("mixed")
    }

    pub fn named<N: Into<String>>(name: N) -> Self {
        let name = name.into();
        Self {
            any: Subschema::new(name.clone()),
            name,
        }
    }
}

impl Default for MixedType {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaType for MixedType {
    fn name(&self) -> &str {
        &self.name
    }

    fn match_shorthand_type(&self, data: &SchemaData) -> bool {
        matches!(data, SchemaData::Shorthand(Shorthand::Mixed))
    }

    fn get_field_subschema<'s>(
        &'s self,
        _subschema: &'s Subschema,
        _component: &str,
        _registry: &'s SchemaRegistry,
    ) -> Option<&'s Subschema> {
        Some(&self.any)
    }

    fn normalize(&self, value: Value, ctx: &FieldContext<'_>) -> Result<Value> {
        if !ctx.subschema.flag("serializeMixed") {
            return Ok(value);
        }
        if ctx.options.serialize {
            if value.as_str().is_some() {
                return Err(FieldError::invalid_type(ctx.message("typeError", "Mixed value must not be a string")).into());
            }
            return Ok(Value::String(serde_json::to_string(&value)?));
        }
        match value {
            Value::String(text) => serde_json::from_str::<serde_json::Value>(&text)
                .map(Value::from)
                .map_err(|_| FieldError::invalid_format(format!("Could not parse mixed value: {}", text)).into()),
            other => Ok(other),
        }
    }

    fn check_type_match(&self, _value: &Value, _subschema: &Subschema, _registry: &SchemaRegistry) -> TypeMatch {
        TypeMatch::NoMatch
    }

    fn to_json_schema(&self, _subschema: &Subschema, _ctx: &mut JsonSchemaContext<'_>) -> Result<serde_json::Value> {
        Ok(serde_json::json!({}))
    }
}
