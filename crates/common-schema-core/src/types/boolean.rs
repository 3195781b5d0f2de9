//! `boolean` type
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

const TRUE_WORDS: [&str; 7] = ["true", "t", "y", "yes", "1", "on", "totallydude"];
const FALSE_WORDS: [&str; 7] = ["false", "f", "n", "no", "0", "off", "definitelynot"];

fn coerce_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) if *n == 1.0 => Some(true),
        Value::Number(n) if *n == 0.0 => Some(false),
        Value::String(s) => {
            let word = s.trim().to_ascii_lowercase();
            if TRUE_WORDS.contains(&word.as_str()) {
                Some(true)
            } else if FALSE_WORDS.contains(&word.as_str()) {
                Some(false)
            } else {
                None
            }
        }
        _ => None,
    }
}

#[derive(Debug, Clone)]
pub struct BooleanType {
    name: String,
}

impl BooleanType {
    pub fn new() -> Self {
        Self::named("boolean")
    }

    pub fn named<N: Into<String>>(name: N) -> Self {
        Self { name: name.into() }
    }
}

impl Default for BooleanType {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaType for BooleanType {
    fn name(&self) -> &str {
        &self.name
    }

    fn match_shorthand_type(&self, data: &SchemaData) -> bool {
        matches!(data, SchemaData::Shorthand(Shorthand::Boolean))
    }

    fn validate(&self, value: &Value, ctx: &FieldContext<'_>) -> Result<()> {
        match value {
            Value::Bool(_) => Ok(()),
            _ => Err(FieldError::invalid_type(ctx.message("typeError", "Must be a boolean")).into()),
        }
    }

    fn normalize(&self, value: Value, ctx: &FieldContext<'_>) -> Result<Value> {
        coerce_bool(&value)
            .map(Value::Bool)
            .ok_or_else(|| FieldError::invalid_type(ctx.message("typeError", "Must be boolean")).into())
    }

    fn check_type_match(&self, value: &Value, _subschema: &Subschema, _registry: &SchemaRegistry) -> TypeMatch {
        match value {
            Value::Bool(_) => TypeMatch::Exact,
            other if coerce_bool(other).is_some() => TypeMatch::Coercible,
            _ => TypeMatch::NoMatch,
        }
    }

    fn to_json_schema(&self, _subschema: &Subschema, _ctx: &mut JsonSchemaContext<'_>) -> Result<serde_json::Value> {
        Ok(serde_json::json!({"type": "boolean"}))
    }
}
