//! `string` type
//!
//! Scalars (numbers, booleans and dates) coerce to their textual form.
//! Supports `minLength`, `maxLength` and a `match` regular expression.
//!
//! Copyright (c) 2025 Common Schema Team
//! Licensed under the Apache-2.0 license

use regex::Regex;

use crate::error::{FieldError, FieldErrorCode, Result, SchemaError};
use crate::registry::SchemaRegistry;
use crate::schema::data::{SchemaData, Shorthand};
use crate::schema::json_schema::JsonSchemaContext;
use crate::schema::normalizer::SchemaNormalizer;
use crate::schema::subschema::{Attribute, RawSubschema, Subschema};
use crate::types::{FieldContext, SchemaType, TypeMatch};
use crate::value::{format_date, format_number, Value};

#[derive(Debug, Clone)]
pub struct StringType {
    name: String,
}

impl StringType {
    pub fn new() -> Self {
        Self::named("string")
    }

    pub fn named<N: Into<String>>(name: N) -> Self {
        Self { name: name.into() }
    }

    fn check_constraints(&self, value: &str, ctx: &FieldContext<'_>) -> Result<()> {
        let subschema = ctx.subschema;
        let length = value.chars().count() as f64;
        if subschema.number("maxLength").is_some_and(|max| length > max) {
            return Err(FieldError::new(FieldErrorCode::TooLong, ctx.message("maxLengthError", "String is too long")).into());
        }
        if subschema.number("minLength").is_some_and(|min| length < min) {
            return Err(FieldError::new(FieldErrorCode::TooShort, ctx.message("minLengthError", "String is too short")).into());
        }
        if let Some(pattern) = subschema.pattern("match") {
            if !pattern.is_match(value) {
                return Err(FieldError::invalid_format(ctx.message("matchError", "String does not match"))
                    .with_details(Value::from(serde_json::json!({ "regex": pattern.as_str() })))
                    .into());
            }
        }
        Ok(())
    }
}

impl Default for StringType {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaType for StringType {
    fn name(&self) -> &str {
        &self.name
    }

    fn match_shorthand_type(&self, data: &SchemaData) -> bool {
        matches!(data, SchemaData::Shorthand(Shorthand::String))
    }

    fn normalize_schema(
        &self,
        mut raw: RawSubschema,
        _normalizer: &SchemaNormalizer<'_>,
    ) -> std::result::Result<Subschema, SchemaError> {
        let pattern = match raw.take("match") {
            None | Some(SchemaData::Null) => None,
            Some(SchemaData::String(source)) => Some(
                Regex::new(&source).map_err(|e| SchemaError::new(format!("Invalid match pattern: {}", e)))?,
            ),
            Some(_) => return Err(SchemaError::new("String match must be a regular expression")),
        };
        let mut subschema = Subschema::from_raw(self.name(), raw)?;
        if let Some(pattern) = pattern {
            subschema.insert("match", Attribute::Pattern(pattern));
        }
        Ok(subschema)
    }

    fn validate(&self, value: &Value, ctx: &FieldContext<'_>) -> Result<()> {
        match value {
            Value::String(s) => self.check_constraints(s, ctx),
            _ => Err(FieldError::invalid_type(ctx.message("typeError", "Must be a string")).into()),
        }
    }

    fn normalize(&self, value: Value, ctx: &FieldContext<'_>) -> Result<Value> {
        let text = match value {
            Value::String(s) => s,
            Value::Number(n) => format_number(n),
            Value::Bool(b) => b.to_string(),
            Value::Date(d) => format_date(&d),
            _ => return Err(FieldError::invalid_type(ctx.message("typeError", "Must be a string")).into()),
        };
        self.check_constraints(&text, ctx)?;
        Ok(Value::String(text))
    }

    fn check_type_match(&self, value: &Value, _subschema: &Subschema, _registry: &SchemaRegistry) -> TypeMatch {
        match value {
            Value::String(_) => TypeMatch::Exact,
            Value::Number(_) | Value::Bool(_) | Value::Date(_) => TypeMatch::Coercible,
            _ => TypeMatch::NoMatch,
        }
    }

    fn to_json_schema(&self, subschema: &Subschema, _ctx: &mut JsonSchemaContext<'_>) -> Result<serde_json::Value> {
        let mut out = serde_json::json!({"type": "string"});
        if let Some(max) = subschema.number("maxLength") {
            out["maxLength"] = serde_json::json!(max as u64);
        }
        if let Some(min) = subschema.number("minLength") {
            out["minLength"] = serde_json::json!(min as u64);
        }
        if let Some(pattern) = subschema.pattern("match") {
            out["pattern"] = serde_json::json!(pattern.as_str());
        }
        Ok(out)
    }
}
