//! `binary` type
//!
//! Accepts raw bytes, base64 strings and arrays of byte values. With
//! `serialize` the normalized value is a base64 string.
//!
//! Copyright (c) 2025 Common Schema Team
//! Licensed under the Apache-2.0 license

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig, STANDARD as BASE64};
use base64::engine::DecodePaddingMode;
use base64::Engine as _;

use crate::error::{FieldError, FieldErrorCode, Result};
use crate::registry::SchemaRegistry;
use crate::schema::data::{SchemaData, Shorthand};
use crate::schema::json_schema::JsonSchemaContext;
use crate::schema::subschema::Subschema;
use crate::types::{FieldContext, SchemaType, TypeMatch};
use crate::value::Value;

/// Standard alphabet, padding optional on input
const BASE64_LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

fn decode_base64(text: &str) -> Option<Vec<u8>> {
    BASE64_LENIENT.decode(text.as_bytes()).ok()
}

fn byte_of(value: &Value) -> Option<u8> {
    match value {
        Value::Number(n) if n.fract() == 0.0 && (0.0..=255.0).contains(n) => Some(*n as u8),
        _ => None,
    }
}

#[derive(Debug, Clone)]
pub struct BinaryType {
    name: String,
}

impl BinaryType {
    pub fn new() -> Self {
        Self::named("binary")
    }

    pub fn named<N: Into<String>>(name: N) -> Self {
        Self { name: name.into() }
    }

    fn to_bytes(&self, value: Value, ctx: &FieldContext<'_>) -> Result<Vec<u8>> {
        match value {
            Value::Binary(bytes) => Ok(bytes),
            Value::String(text) => {
                decode_base64(&text)
                    .ok_or_else(|| FieldError::invalid_type(ctx.message("typeError", "Must be base64 data")).into())
            }
            Value::Array(items) => items
                .iter()
                .map(byte_of)
                .collect::<Option<Vec<u8>>>()
                .ok_or_else(|| FieldError::invalid_type(ctx.message("typeError", "Must be binary data")).into()),
            _ => Err(FieldError::invalid_type(ctx.message("typeError", "Must be binary data")).into()),
        }
    }

    fn check_length(&self, bytes: &[u8], ctx: &FieldContext<'_>) -> Result<()> {
        let length = bytes.len() as f64;
        if ctx.subschema.number("maxLength").is_some_and(|max| length > max) {
            return Err(FieldError::new(FieldErrorCode::TooLong, ctx.message("maxLengthError", "Data is too long")).into());
        }
        if ctx.subschema.number("minLength").is_some_and(|min| length < min) {
            return Err(FieldError::new(FieldErrorCode::TooShort, ctx.message("minLengthError", "Data is too short")).into());
        }
        Ok(())
    }
}

impl Default for BinaryType {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaType for BinaryType {
    fn name(&self) -> &str {
        &self.name
    }

    fn match_shorthand_type(&self, data: &SchemaData) -> bool {
        matches!(data, SchemaData::Shorthand(Shorthand::Binary))
    }

    fn validate(&self, value: &Value, ctx: &FieldContext<'_>) -> Result<()> {
        match value {
            Value::Binary(bytes) => self.check_length(bytes, ctx),
            _ => Err(FieldError::invalid_type(ctx.message("typeError", "Must be a buffer")).into()),
        }
    }

    fn normalize(&self, value: Value, ctx: &FieldContext<'_>) -> Result<Value> {
        let bytes = self.to_bytes(value, ctx)?;
        self.check_length(&bytes, ctx)?;
        if ctx.options.serialize {
            Ok(Value::String(BASE64.encode(&bytes)))
        } else {
            Ok(Value::Binary(bytes))
        }
    }

    fn check_type_match(&self, value: &Value, _subschema: &Subschema, _registry: &SchemaRegistry) -> TypeMatch {
        match value {
            Value::Binary(_) => TypeMatch::Exact,
            Value::String(text) if decode_base64(text).is_some() => TypeMatch::Coercible,
            Value::Array(items) if items.iter().all(|item| byte_of(item).is_some()) => TypeMatch::Coercible,
            _ => TypeMatch::NoMatch,
        }
    }

    fn to_json_schema(&self, _subschema: &Subschema, _ctx: &mut JsonSchemaContext<'_>) -> Result<serde_json::Value> {
        Ok(serde_json::json!({
            "type": "string",
            "contentEncoding": "base64",
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::NormalizeOptions;
    use serde_json::json;

    #[test]
    fn test_binary_forms() {
        let registry = SchemaRegistry::new();
        let subschema = registry
            .normalize_subschema(json!({"type": "binary", "maxLength": 4}).into())
            .unwrap()
            .unwrap();
        let options = NormalizeOptions::default();
        let ctx = FieldContext::new("b", &subschema, &options, &registry);
        let binary = BinaryType::new();

        assert_eq!(binary.normalize(Value::from("YXNkZg=="), &ctx).unwrap(), Value::Binary(b"asdf".to_vec()));
        assert_eq!(
            binary.normalize(Value::from(json!([1, 2, 3])), &ctx).unwrap(),
            Value::Binary(vec![1, 2, 3])
        );
        let err = binary.normalize(Value::from("not base64!"), &ctx).unwrap_err();
        assert_eq!(err.as_field_error().unwrap().message, "Must be base64 data");
        let err = binary.normalize(Value::from(json!([1, 2, 3, 4, 5])), &ctx).unwrap_err();
        assert_eq!(err.as_field_error().unwrap().message, "Data is too long");
        assert!(binary.validate(&Value::from("YXNkZg=="), &ctx).is_err());
    }

    #[test]
    fn test_unpadded_base64() {
        let registry = SchemaRegistry::new();
        let subschema = Subschema::new("binary");
        let options = NormalizeOptions::default();
        let ctx = FieldContext::new("b", &subschema, &options, &registry);
        let binary = BinaryType::new();

        for text in ["AQIDBA", "AQIDBA=="] {
            assert_eq!(binary.normalize(Value::from(text), &ctx).unwrap(), Value::Binary(vec![1, 2, 3, 4]));
            assert_eq!(
                binary.check_type_match(&Value::from(text), &subschema, &registry),
                TypeMatch::Coercible
            );
        }

        let err = binary.normalize(Value::from("AQ=ID"), &ctx).unwrap_err();
        assert_eq!(err.as_field_error().unwrap().code, FieldErrorCode::InvalidType);
        assert_eq!(
            binary.check_type_match(&Value::from("AQ=ID"), &subschema, &registry),
            TypeMatch::NoMatch
        );
    }

    #[test]
    fn test_serialize_to_base64() {
        let registry = SchemaRegistry::new();
        let subschema = Subschema::new("binary");
        let options = NormalizeOptions::default().with_serialize();
        let ctx = FieldContext::new("b", &subschema, &options, &registry);
        assert_eq!(
            BinaryType::new().normalize(Value::Binary(b"asdf".to_vec()), &ctx).unwrap(),
            Value::from("YXNkZg==")
        );
    }
}
