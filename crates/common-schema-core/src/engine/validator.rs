//! Validation handlers
//!
//! [`Validator`] plugs into the traversal engine and performs strict checks
//! without coercion. A field that fails its type check is not descended into.
//!
//! Copyright (c) 2025 Common Schema Team
//! Licensed under the Apache-2.0 license

use tracing::debug;

use crate::engine::normalizer::{enum_error, required_error};
use crate::engine::traverse::TraverseHandlers;
use crate::error::{Error, FieldError, FieldErrorCode, FieldErrors, Result};
use crate::options::ValidateOptions;
use crate::registry::SchemaRegistry;
use crate::schema::subschema::Subschema;
use crate::types::{FieldContext, SchemaType};
use crate::value::Value;

/// Traverse handlers implementing strict validation
pub struct Validator<'a> {
    registry: &'a SchemaRegistry,
    options: &'a ValidateOptions,
    errors: FieldErrors,
}

impl<'a> Validator<'a> {
    pub fn new(registry: &'a SchemaRegistry, options: &'a ValidateOptions) -> Self {
        Self {
            registry,
            options,
            errors: FieldErrors::new(),
        }
    }

    pub fn into_result(self) -> Result<()> {
        if !self.errors.is_empty() {
            debug!(errors = self.errors.len(), "validation failed");
        }
        self.errors.into_result()
    }

    fn record(&mut self, error: FieldError, field: &str) {
        self.errors.add(error.with_field(field));
    }
}

impl TraverseHandlers for Validator<'_> {
    fn on_field(
        &mut self,
        field: &str,
        value: Option<&Value>,
        subschema: &Subschema,
        schema_type: &dyn SchemaType,
    ) -> Result<bool> {
        let default: Value;
        let value = match value {
            Some(value) if !value.is_null() => value,
            _ => match subschema.default_value() {
                Some(produced) => {
                    default = produced;
                    &default
                }
                None => {
                    if let Some(error) = required_error(subschema, self.options) {
                        self.record(error, field);
                    }
                    return Ok(true);
                }
            },
        };

        if let Some(error) = enum_error(value, subschema, schema_type) {
            self.record(error, field);
            return Ok(true);
        }

        let ctx = FieldContext::new(field, subschema, self.options, self.registry);
        let checked = schema_type.validate(value, &ctx).and_then(|()| match subschema.validate_hook() {
            Some(hook) => hook(value, &ctx),
            None => Ok(()),
        });
        match checked {
            Ok(()) => Ok(true),
            Err(Error::Field(error)) => {
                self.record(error, field);
                Ok(false)
            }
            Err(other) => Err(other),
        }
    }

    fn on_unknown_field(&mut self, field: &str, _value: &Value) -> Result<()> {
        if !self.options.allow_unknown_fields && !self.options.remove_unknown_fields {
            self.record(
                FieldError::new(FieldErrorCode::UnknownField, "Unknown field"),
                field,
            );
        }
        Ok(())
    }
}
