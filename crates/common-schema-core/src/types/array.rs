//! `array` type: a list of uniform elements
//!
//! Copyright (c) 2025 Common Schema Team
//! Licensed under the Apache-2.0 license

use async_trait::async_trait;

use crate::engine::schema_traverse::SchemaTraversal;
use crate::engine::transform::{AsyncTransformer, Transformed, Transformer};
use crate::engine::traverse::{AsyncTraversal, Traversal};
use crate::error::{FieldError, Result, SchemaError};
use crate::registry::SchemaRegistry;
use crate::schema::data::SchemaData;
use crate::schema::json_schema::JsonSchemaContext;
use crate::schema::normalizer::SchemaNormalizer;
use crate::schema::subschema::{RawSubschema, Subschema};
use crate::types::{join_path, FieldContext, SchemaType, TypeMatch};
use crate::value::Value;

/// Path components that address "any element"
const ELEMENT_WILDCARDS: [&str; 4] = ["$", "#", "_", "*"];

#[derive(Debug, Clone)]
pub struct ArrayType {
    name: String,
}

impl ArrayType {
    pub fn new() -> Self {
        Self::named("array")
    }

    pub fn named<N: Into<String>>(name: N) -> Self {
        Self { name: name.into() }
    }
}

impl Default for ArrayType {
    fn default() -> Self {
        Self::new()
    }
}

fn elements(subschema: &Subschema) -> Option<&Subschema> {
    subschema.child("elements")
}

#[async_trait]
impl SchemaType for ArrayType {
    fn name(&self) -> &str {
        &self.name
    }

    fn match_shorthand_type(&self, data: &SchemaData) -> bool {
        matches!(data, SchemaData::Array(items) if items.len() == 1)
    }

    fn normalize_shorthand_schema(&self, mut raw: RawSubschema) -> std::result::Result<RawSubschema, SchemaError> {
        if let Some(SchemaData::Array(mut items)) = raw.take("type") {
            if let Some(element) = items.pop() {
                raw.insert("elements", element);
            }
        }
        Ok(raw)
    }

    fn normalize_schema(
        &self,
        mut raw: RawSubschema,
        normalizer: &SchemaNormalizer<'_>,
    ) -> std::result::Result<Subschema, SchemaError> {
        let element = raw
            .take("elements")
            .filter(|data| !data.is_null())
            .ok_or_else(|| SchemaError::new("Array schema must have elements field"))?;
        let element = normalizer.normalize_required(Some(element), "Array elements")?;
        Ok(Subschema::from_raw(self.name(), raw)?.with_attribute("elements", element))
    }

    fn traverse_schema(
        &self,
        subschema: &Subschema,
        path: &str,
        raw_path: &str,
        walker: &mut SchemaTraversal<'_>,
    ) -> Result<()> {
        match elements(subschema) {
            Some(element) => {
                let path = walker.element_path(path);
                walker.traverse_subschema(element, &path, &join_path(raw_path, "elements"))
            }
            None => Ok(()),
        }
    }

    fn get_field_subschema<'s>(
        &'s self,
        subschema: &'s Subschema,
        component: &str,
        _registry: &'s SchemaRegistry,
    ) -> Option<&'s Subschema> {
        let is_index = !component.is_empty() && component.bytes().all(|b| b.is_ascii_digit());
        if is_index || ELEMENT_WILDCARDS.contains(&component) {
            elements(subschema)
        } else {
            None
        }
    }

    fn is_array_like(&self) -> bool {
        true
    }

    fn traverse(&self, value: &Value, subschema: &Subschema, field: &str, engine: &mut Traversal<'_>) -> Result<()> {
        let (Value::Array(items), Some(element)) = (value, elements(subschema)) else {
            return Ok(());
        };
        for (index, item) in items.iter().enumerate() {
            engine.traverse_value(Some(item), Some(element), &join_path(field, &index.to_string()))?;
        }
        Ok(())
    }

    async fn traverse_async(
        &self,
        value: &Value,
        subschema: &Subschema,
        field: &str,
        engine: &mut AsyncTraversal<'_>,
    ) -> Result<()> {
        let (Value::Array(items), Some(element)) = (value, elements(subschema)) else {
            return Ok(());
        };
        for (index, item) in items.iter().enumerate() {
            let path = join_path(field, &index.to_string());
            engine.traverse_value(Some(item), Some(element), &path).await?;
        }
        Ok(())
    }

    fn transform(
        &self,
        value: Value,
        subschema: &Subschema,
        field: &str,
        engine: &mut Transformer<'_>,
    ) -> Result<Transformed> {
        let Some(element) = elements(subschema) else {
            return Ok(Transformed::Keep(value));
        };
        let items = match value {
            Value::Array(items) => items,
            other => return Ok(Transformed::Keep(other)),
        };
        let mut out = Vec::with_capacity(items.len());
        for (index, item) in items.into_iter().enumerate() {
            let path = join_path(field, &index.to_string());
            if let Transformed::Keep(item) = engine.transform_value(Some(item), Some(element), &path)? {
                out.push(item);
            }
        }
        Ok(Transformed::Keep(Value::Array(out)))
    }

    async fn transform_async(
        &self,
        value: Value,
        subschema: &Subschema,
        field: &str,
        engine: &mut AsyncTransformer<'_>,
    ) -> Result<Transformed> {
        let Some(element) = elements(subschema) else {
            return Ok(Transformed::Keep(value));
        };
        let items = match value {
            Value::Array(items) => items,
            other => return Ok(Transformed::Keep(other)),
        };
        let mut out = Vec::with_capacity(items.len());
        for (index, item) in items.into_iter().enumerate() {
            let path = join_path(field, &index.to_string());
            if let Transformed::Keep(item) = engine.transform_value(Some(item), Some(element), &path).await? {
                out.push(item);
            }
        }
        Ok(Transformed::Keep(Value::Array(out)))
    }

    fn validate(&self, value: &Value, ctx: &FieldContext<'_>) -> Result<()> {
        match value {
            Value::Array(_) => Ok(()),
            _ => Err(FieldError::invalid_type(ctx.message("typeError", "Must be an array")).into()),
        }
    }

    fn normalize(&self, value: Value, ctx: &FieldContext<'_>) -> Result<Value> {
        self.validate(&value, ctx)?;
        Ok(value)
    }

    fn check_type_match(&self, value: &Value, _subschema: &Subschema, _registry: &SchemaRegistry) -> TypeMatch {
        match value {
            Value::Array(_) => TypeMatch::Complex,
            _ => TypeMatch::NoMatch,
        }
    }

    fn to_json_schema(&self, subschema: &Subschema, ctx: &mut JsonSchemaContext<'_>) -> Result<serde_json::Value> {
        let mut out = serde_json::json!({"type": "array"});
        if let Some(element) = elements(subschema) {
            out["items"] = ctx.subschema_to_json_schema(element)?;
        }
        Ok(out)
    }
}
