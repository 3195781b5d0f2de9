//! Normalization handlers
//!
//! [`Normalizer`] plugs into the transform engine. For each declared field it
//! injects defaults, checks `required`, runs the custom normalize hook and the
//! type plugin's coercion, then the custom validate hook and the `enum` check.
//! Field errors are collected and raised together once the walk is over.
//!
//! Copyright (c) 2025 Common Schema Team
//! Licensed under the Apache-2.0 license

use tracing::debug;

use crate::engine::transform::{TransformHandlers, Transformed};
use crate::error::{Error, FieldError, FieldErrorCode, FieldErrors, Result};
use crate::options::NormalizeOptions;
use crate::registry::SchemaRegistry;
use crate::schema::subschema::Subschema;
use crate::types::{FieldContext, SchemaType};
use crate::value::{Map, Value};

/// Transform handlers implementing document normalization
pub struct Normalizer<'a> {
    registry: &'a SchemaRegistry,
    options: &'a NormalizeOptions,
    errors: FieldErrors,
}

impl<'a> Normalizer<'a> {
    pub fn new(registry: &'a SchemaRegistry, options: &'a NormalizeOptions) -> Self {
        Self {
            registry,
            options,
            errors: FieldErrors::new(),
        }
    }

    /// Raise the collected field errors, if any
    pub fn into_result(self) -> Result<()> {
        if !self.errors.is_empty() {
            debug!(errors = self.errors.len(), "normalization failed");
        }
        self.errors.into_result()
    }

    fn record(&mut self, error: FieldError, field: &str) {
        self.errors.add(error.with_field(field));
    }

    fn coerce(&self, value: Value, ctx: &FieldContext<'_>, schema_type: &dyn SchemaType) -> Result<Value> {
        let value = match ctx.subschema.normalize_hook() {
            Some(hook) => hook(value, ctx)?,
            None => value,
        };
        schema_type.normalize(value, ctx)
    }
}

/// `required` check shared by the normalizer and the validator
pub(crate) fn required_error(subschema: &Subschema, options: &NormalizeOptions) -> Option<FieldError> {
    (subschema.is_required() && !options.allow_missing_fields).then(|| {
        FieldError::new(
            FieldErrorCode::Required,
            subschema.message("requiredError", "Field is required"),
        )
    })
}

/// `enum` check shared by the normalizer and the validator
pub(crate) fn enum_error(value: &Value, subschema: &Subschema, schema_type: &dyn SchemaType) -> Option<FieldError> {
    let allowed = subschema.enum_values()?;
    if schema_type.check_enum(value, allowed) {
        return None;
    }
    let mut details = Map::new();
    details.insert("value".to_string(), value.clone());
    details.insert("enum".to_string(), Value::Array(allowed.to_vec()));
    Some(
        FieldError::new(
            FieldErrorCode::Unrecognized,
            subschema.message("enumError", "Unrecognized value"),
        )
        .with_details(Value::Object(details)),
    )
}

impl TransformHandlers for Normalizer<'_> {
    fn on_field(
        &mut self,
        field: &str,
        value: Option<Value>,
        subschema: &Subschema,
        schema_type: &dyn SchemaType,
    ) -> Result<Transformed> {
        let value = match value {
            Some(value) if !value.is_null() => value,
            missing => match subschema.default_value() {
                Some(default) => default,
                None => {
                    if let Some(error) = required_error(subschema, self.options) {
                        self.record(error, field);
                    }
                    return Ok(missing.into());
                }
            },
        };

        let ctx = FieldContext::new(field, subschema, self.options, self.registry);
        // the output document is discarded once any field error is recorded
        let value = match self.coerce(value, &ctx, schema_type) {
            Ok(value) => value,
            Err(Error::Field(error)) => {
                self.record(error, field);
                return Ok(Transformed::Remove);
            }
            Err(other) => return Err(other),
        };

        if let Some(hook) = subschema.validate_hook() {
            match hook(&value, &ctx) {
                Ok(()) => {}
                Err(Error::Field(error)) => {
                    self.record(error, field);
                    return Ok(Transformed::Keep(value));
                }
                Err(other) => return Err(other),
            }
        }

        if let Some(error) = enum_error(&value, subschema, schema_type) {
            self.record(error, field);
        }
        Ok(Transformed::Keep(value))
    }

    fn on_unknown_field(&mut self, field: &str, value: Value) -> Result<Transformed> {
        if self.options.remove_unknown_fields {
            return Ok(Transformed::Remove);
        }
        if !self.options.allow_unknown_fields {
            self.record(
                FieldError::new(FieldErrorCode::UnknownField, "Unknown field"),
                field,
            );
        }
        Ok(Transformed::Keep(value))
    }
}
