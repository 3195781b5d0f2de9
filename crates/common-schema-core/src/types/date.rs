//! `date` type
//!
//! Accepts native dates, RFC 3339 or `YYYY-MM-DD` strings and epoch
//! milliseconds. With `serialize` the normalized value is an RFC 3339 string.
//!
//! Copyright (c) 2025 Common Schema Team
//! Licensed under the Apache-2.0 license

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

use crate::error::{FieldError, FieldErrorCode, Result, SchemaError};
use crate::registry::SchemaRegistry;
use crate::schema::data::{SchemaData, Shorthand};
use crate::schema::json_schema::JsonSchemaContext;
use crate::schema::normalizer::SchemaNormalizer;
use crate::schema::subschema::{Attribute, RawSubschema, Subschema};
use crate::types::{FieldContext, SchemaType, TypeMatch};
use crate::value::{format_date, Value};

/// Read a value as a point in time
pub fn to_date(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Date(d) => Some(*d),
        Value::String(s) => parse_date(s.trim()),
        Value::Number(n) if n.is_finite() => Utc.timestamp_millis_opt(*n as i64).single(),
        _ => None,
    }
}

fn parse_date(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(d) = DateTime::parse_from_rfc3339(text) {
        return Some(d.with_timezone(&Utc));
    }
    if let Ok(d) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(d.and_utc());
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|d| d.and_utc())
}

#[derive(Debug, Clone)]
pub struct DateType {
    name: String,
}

impl DateType {
    pub fn new() -> Self {
        Self::named("date")
    }

    pub fn named<N: Into<String>>(name: N) -> Self {
        Self { name: name.into() }
    }

    fn check_range(&self, date: &DateTime<Utc>, ctx: &FieldContext<'_>) -> Result<()> {
        let subschema = ctx.subschema;
        if subschema.value("max").and_then(Value::as_date).is_some_and(|max| date > max) {
            return Err(FieldError::new(FieldErrorCode::TooLarge, ctx.message("maxError", "Date is too late")).into());
        }
        if subschema.value("min").and_then(Value::as_date).is_some_and(|min| date < min) {
            return Err(FieldError::new(FieldErrorCode::TooSmall, ctx.message("minError", "Date is too early")).into());
        }
        Ok(())
    }
}

impl Default for DateType {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaType for DateType {
    fn name(&self) -> &str {
        &self.name
    }

    fn match_shorthand_type(&self, data: &SchemaData) -> bool {
        matches!(data, SchemaData::Shorthand(Shorthand::Date))
    }

    fn normalize_schema(
        &self,
        mut raw: RawSubschema,
        _normalizer: &SchemaNormalizer<'_>,
    ) -> std::result::Result<Subschema, SchemaError> {
        let mut bounds = Vec::new();
        for key in ["min", "max"] {
            if let Some(data) = raw.take(key).filter(|data| !data.is_null()) {
                let date = to_date(&data.into_value()?)
                    .ok_or_else(|| SchemaError::new(format!("Date {} must be valid date", key)))?;
                bounds.push((key, date));
            }
        }
        let mut subschema = Subschema::from_raw(self.name(), raw)?;
        for (key, date) in bounds {
            subschema.insert(key, Attribute::Value(Value::Date(date)));
        }
        Ok(subschema)
    }

    fn validate(&self, value: &Value, ctx: &FieldContext<'_>) -> Result<()> {
        match value {
            Value::Date(d) => self.check_range(d, ctx),
            _ => Err(FieldError::invalid_type(ctx.message("typeError", "Must be a date")).into()),
        }
    }

    fn normalize(&self, value: Value, ctx: &FieldContext<'_>) -> Result<Value> {
        let date = to_date(&value)
            .ok_or_else(|| FieldError::invalid_type(ctx.message("typeError", "Must be a date")))?;
        self.check_range(&date, ctx)?;
        if ctx.options.serialize {
            Ok(Value::String(format_date(&date)))
        } else {
            Ok(Value::Date(date))
        }
    }

    fn check_enum(&self, value: &Value, allowed: &[Value]) -> bool {
        let Some(date) = to_date(value) else {
            return false;
        };
        allowed.iter().any(|candidate| to_date(candidate) == Some(date))
    }

    fn check_type_match(&self, value: &Value, _subschema: &Subschema, _registry: &SchemaRegistry) -> TypeMatch {
        match value {
            Value::Date(_) => TypeMatch::Exact,
            _ if to_date(value).is_some() => TypeMatch::Coercible,
            _ => TypeMatch::NoMatch,
        }
    }

    fn to_json_schema(&self, _subschema: &Subschema, _ctx: &mut JsonSchemaContext<'_>) -> Result<serde_json::Value> {
        Ok(serde_json::json!({
            "type": "string",
            "format": "date-time",
        }))
    }
}
