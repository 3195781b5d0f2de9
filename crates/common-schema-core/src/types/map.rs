//! `map` type: an object with arbitrary keys and uniform values
//!
//! Copyright (c) 2025 Common Schema Team
//! Licensed under the Apache-2.0 license

use async_trait::async_trait;

use crate::engine::schema_traverse::SchemaTraversal;
use crate::engine::transform::{AsyncTransformer, Transformed, Transformer};
use crate::engine::traverse::{AsyncTraversal, Traversal};
use crate::error::{FieldError, Result, SchemaError};
use crate::registry::SchemaRegistry;
use crate::schema::json_schema::JsonSchemaContext;
use crate::schema::normalizer::SchemaNormalizer;
use crate::schema::subschema::{RawSubschema, Subschema};
use crate::types::{join_path, FieldContext, SchemaType, TypeMatch};
use crate::value::{Map, Value};

#[derive(Debug, Clone)]
pub struct MapType {
    name: String,
}

impl MapType {
    pub fn new() -> Self {
        Self::named("map")
    }

    pub fn named<N: Into<String>>(name: N) -> Self {
        Self { name: name.into() }
    }
}

impl Default for MapType {
    fn default() -> Self {
        Self::new()
    }
}

fn values(subschema: &Subschema) -> Option<&Subschema> {
    subschema.child("values")
}

#[async_trait]
impl SchemaType for MapType {
    fn name(&self) -> &str {
        &self.name
    }

    fn normalize_schema(
        &self,
        mut raw: RawSubschema,
        normalizer: &SchemaNormalizer<'_>,
    ) -> std::result::Result<Subschema, SchemaError> {
        let values = raw
            .take("values")
            .filter(|data| !data.is_null())
            .ok_or_else(|| SchemaError::new("Map schema must have values field"))?;
        let values = normalizer.normalize_required(Some(values), "Map values")?;
        Ok(Subschema::from_raw(self.name(), raw)?.with_attribute("values", values))
    }

    fn traverse_schema(
        &self,
        subschema: &Subschema,
        path: &str,
        raw_path: &str,
        walker: &mut SchemaTraversal<'_>,
    ) -> Result<()> {
        match values(subschema) {
            Some(child) => {
                let path = walker.element_path(path);
                walker.traverse_subschema(child, &path, &join_path(raw_path, "values"))
            }
            None => Ok(()),
        }
    }

    /// Any key addresses the value subschema
    fn get_field_subschema<'s>(
        &'s self,
        subschema: &'s Subschema,
        _component: &str,
        _registry: &'s SchemaRegistry,
    ) -> Option<&'s Subschema> {
        values(subschema)
    }

    fn is_array_like(&self) -> bool {
        true
    }

    fn traverse(&self, value: &Value, subschema: &Subschema, field: &str, engine: &mut Traversal<'_>) -> Result<()> {
        let (Value::Object(map), Some(child)) = (value, values(subschema)) else {
            return Ok(());
        };
        for (key, entry) in map {
            engine.traverse_value(Some(entry), Some(child), &join_path(field, key))?;
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
        let (Value::Object(map), Some(child)) = (value, values(subschema)) else {
            return Ok(());
        };
        for (key, entry) in map {
            let path = join_path(field, key);
            engine.traverse_value(Some(entry), Some(child), &path).await?;
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
        let Some(child) = values(subschema) else {
            return Ok(Transformed::Keep(value));
        };
        let map = match value {
            Value::Object(map) => map,
            other => return Ok(Transformed::Keep(other)),
        };
        let mut out = Map::with_capacity(map.len());
        for (key, entry) in map {
            let path = join_path(field, &key);
            if let Transformed::Keep(entry) = engine.transform_value(Some(entry), Some(child), &path)? {
                out.insert(key, entry);
            }
        }
        Ok(Transformed::Keep(Value::Object(out)))
    }

    async fn transform_async(
        &self,
        value: Value,
        subschema: &Subschema,
        field: &str,
        engine: &mut AsyncTransformer<'_>,
    ) -> Result<Transformed> {
        let Some(child) = values(subschema) else {
            return Ok(Transformed::Keep(value));
        };
        let map = match value {
            Value::Object(map) => map,
            other => return Ok(Transformed::Keep(other)),
        };
        let mut out = Map::with_capacity(map.len());
        for (key, entry) in map {
            let path = join_path(field, &key);
            if let Transformed::Keep(entry) = engine.transform_value(Some(entry), Some(child), &path).await? {
                out.insert(key, entry);
            }
        }
        Ok(Transformed::Keep(Value::Object(out)))
    }

    fn validate(&self, value: &Value, ctx: &FieldContext<'_>) -> Result<()> {
        match value {
            Value::Object(_) => Ok(()),
            _ => Err(FieldError::invalid_type(ctx.message("typeError", "Must be an object")).into()),
        }
    }

    fn normalize(&self, value: Value, ctx: &FieldContext<'_>) -> Result<Value> {
        self.validate(&value, ctx)?;
        Ok(value)
    }

    fn check_type_match(&self, value: &Value, _subschema: &Subschema, _registry: &SchemaRegistry) -> TypeMatch {
        match value {
            Value::Object(_) => TypeMatch::Complex,
            _ => TypeMatch::NoMatch,
        }
    }

    fn to_json_schema(&self, subschema: &Subschema, ctx: &mut JsonSchemaContext<'_>) -> Result<serde_json::Value> {
        let mut out = serde_json::json!({"type": "object"});
        if let Some(child) = values(subschema) {
            out["additionalProperties"] = ctx.subschema_to_json_schema(child)?;
        }
        Ok(out)
    }
}
