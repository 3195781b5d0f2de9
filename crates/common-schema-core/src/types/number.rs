//! `number` type
//!
//! Numeric strings and dates (as epoch milliseconds) coerce to numbers.
//! Supports `min` and `max`.
//!
//! Copyright (c) 2025 Common Schema Team
//! Licensed under the Apache-2.0 license

use crate::error::{FieldError, FieldErrorCode, Result};
use crate::registry::SchemaRegistry;
use crate::schema::data::{SchemaData, Shorthand};
use crate::schema::json_schema::{json_number, JsonSchemaContext};
use crate::schema::subschema::Subschema;
use crate::types::{FieldContext, SchemaType, TypeMatch};
use crate::value::Value;

/// Parse a trimmed numeric string
pub(crate) fn parse_number(text: &str) -> Option<f64> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    text.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Numeric reading of a value, without constraints
pub(crate) fn coerce_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) if n.is_finite() => Some(*n),
        Value::String(s) => parse_number(s),
        Value::Date(d) => Some(d.timestamp_millis() as f64),
        _ => None,
    }
}

/// `min`/`max` check shared with the geo plugins
pub(crate) fn check_range(n: f64, subschema: &Subschema) -> Result<()> {
    if subschema.number("max").is_some_and(|max| n > max) {
        return Err(FieldError::new(FieldErrorCode::TooLarge, subschema.message("maxError", "Too large")).into());
    }
    if subschema.number("min").is_some_and(|min| n < min) {
        return Err(FieldError::new(FieldErrorCode::TooSmall, subschema.message("minError", "Too small")).into());
    }
    Ok(())
}

#[derive(Debug, Clone)]
pub struct NumberType {
    name: String,
}

impl NumberType {
    pub fn new() -> Self {
        Self::named("number")
    }

    pub fn named<N: Into<String>>(name: N) -> Self {
        Self { name: name.into() }
    }
}

impl Default for NumberType {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaType for NumberType {
    fn name(&self) -> &str {
        &self.name
    }

    fn match_shorthand_type(&self, data: &SchemaData) -> bool {
        matches!(data, SchemaData::Shorthand(Shorthand::Number))
    }

    fn validate(&self, value: &Value, ctx: &FieldContext<'_>) -> Result<()> {
        match value {
            Value::Number(n) if n.is_finite() => check_range(*n, ctx.subschema),
            _ => Err(FieldError::invalid_type(ctx.message("typeError", "Must be a number")).into()),
        }
    }

    fn normalize(&self, value: Value, ctx: &FieldContext<'_>) -> Result<Value> {
        let n = coerce_number(&value)
            .ok_or_else(|| FieldError::invalid_type(ctx.message("typeError", "Must be a number")))?;
        check_range(n, ctx.subschema)?;
        Ok(Value::Number(n))
    }

    fn check_type_match(&self, value: &Value, _subschema: &Subschema, _registry: &SchemaRegistry) -> TypeMatch {
        match value {
            Value::Number(n) if n.is_finite() => TypeMatch::Exact,
            Value::String(s) if parse_number(s).is_some() => TypeMatch::Coercible,
            _ => TypeMatch::NoMatch,
        }
    }

    fn to_json_schema(&self, subschema: &Subschema, _ctx: &mut JsonSchemaContext<'_>) -> Result<serde_json::Value> {
        let mut out = serde_json::json!({"type": "number"});
        if let Some(min) = subschema.number("min") {
            out["minimum"] = json_number(min);
        }
        if let Some(max) = subschema.number("max") {
            out["maximum"] = json_number(max);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::NormalizeOptions;
    use serde_json::json;

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number(" 12.5 "), Some(12.5));
        assert_eq!(parse_number("-3"), Some(-3.0));
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("abc"), None);
        assert_eq!(parse_number("NaN"), None);
        assert_eq!(parse_number("inf"), None);
    }

    #[test]
    fn test_range_messages() {
        let registry = SchemaRegistry::new();
        let subschema = registry
            .normalize_subschema(json!({"type": "number", "min": 0, "max": 10, "maxError": "Way too big"}).into())
            .unwrap()
            .unwrap();
        let options = NormalizeOptions::default();
        let ctx = FieldContext::new("n", &subschema, &options, &registry);
        let number = NumberType::new();

        assert_eq!(number.normalize(Value::from("7"), &ctx).unwrap(), Value::from(7));
        let err = number.normalize(Value::from(11), &ctx).unwrap_err();
        let err = err.as_field_error().unwrap();
        assert_eq!((err.code.clone(), err.message.as_str()), (FieldErrorCode::TooLarge, "Way too big"));
        let err = number.normalize(Value::from(-1), &ctx).unwrap_err();
        assert_eq!(err.as_field_error().unwrap().message, "Too small");
        assert!(number.validate(&Value::from("7"), &ctx).is_err());
    }
}
