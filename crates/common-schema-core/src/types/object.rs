//! `object` type: a fixed set of named properties
//!
//! Copyright (c) 2025 Common Schema Team
//! Licensed under the Apache-2.0 license

use async_trait::async_trait;
use indexmap::IndexMap;

use crate::engine::schema_traverse::SchemaTraversal;
use crate::engine::transform::{AsyncTransformer, Transformed, Transformer};
use crate::engine::traverse::{AsyncTraversal, Traversal};
use crate::error::{FieldError, Result, SchemaError};
use crate::registry::SchemaRegistry;
use crate::schema::data::SchemaData;
use crate::schema::json_schema::JsonSchemaContext;
use crate::schema::normalizer::SchemaNormalizer;
use crate::schema::subschema::{Attribute, RawSubschema, Subschema};
use crate::types::{join_path, FieldContext, SchemaType, TypeMatch};
use crate::value::{Map, Value};

#[derive(Debug, Clone)]
pub struct ObjectType {
    name: String,
}

impl ObjectType {
    pub fn new() -> Self {
        Self::named("object")
    }

    pub fn named<N: Into<String>>(name: N) -> Self {
        Self { name: name.into() }
    }
}

impl Default for ObjectType {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SchemaType for ObjectType {
    fn name(&self) -> &str {
        &self.name
    }

    fn match_shorthand_type(&self, data: &SchemaData) -> bool {
        matches!(data, SchemaData::Object(_))
    }

    fn normalize_shorthand_schema(&self, mut raw: RawSubschema) -> std::result::Result<RawSubschema, SchemaError> {
        if let Some(properties) = raw.take("type") {
            raw.insert("properties", properties);
        }
        Ok(raw)
    }

    fn normalize_schema(
        &self,
        mut raw: RawSubschema,
        normalizer: &SchemaNormalizer<'_>,
    ) -> std::result::Result<Subschema, SchemaError> {
        let Some(SchemaData::Object(properties)) = raw.take("properties") else {
            return Err(SchemaError::new("Object in schema must have properties field"));
        };
        let mut normalized = IndexMap::with_capacity(properties.len());
        for (key, data) in properties {
            if let Some(child) = normalizer.normalize(data).map_err(|e| e.at(&key))? {
                normalized.insert(key, child);
            }
        }
        let mut subschema = Subschema::from_raw(self.name(), raw)?;
        subschema.insert("properties", Attribute::Properties(normalized));
        Ok(subschema)
    }

    fn traverse_schema(
        &self,
        subschema: &Subschema,
        path: &str,
        raw_path: &str,
        walker: &mut SchemaTraversal<'_>,
    ) -> Result<()> {
        for (key, child) in subschema.properties().into_iter().flatten() {
            walker.traverse_subschema(
                child,
                &join_path(path, key),
                &join_path(raw_path, &format!("properties.{}", key)),
            )?;
        }
        Ok(())
    }

    fn get_field_subschema<'s>(
        &'s self,
        subschema: &'s Subschema,
        component: &str,
        _registry: &'s SchemaRegistry,
    ) -> Option<&'s Subschema> {
        subschema.properties()?.get(component)
    }

    fn traverse(&self, value: &Value, subschema: &Subschema, field: &str, engine: &mut Traversal<'_>) -> Result<()> {
        let Value::Object(map) = value else {
            return Ok(());
        };
        let properties = subschema.properties();
        for (key, child) in properties.into_iter().flatten() {
            engine.traverse_value(map.get(key), Some(child), &join_path(field, key))?;
        }
        for (key, entry) in map {
            if !properties.is_some_and(|p| p.contains_key(key)) {
                engine.traverse_value(Some(entry), None, &join_path(field, key))?;
            }
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
        let Value::Object(map) = value else {
            return Ok(());
        };
        let properties = subschema.properties();
        for (key, child) in properties.into_iter().flatten() {
            let path = join_path(field, key);
            engine.traverse_value(map.get(key), Some(child), &path).await?;
        }
        for (key, entry) in map {
            if !properties.is_some_and(|p| p.contains_key(key)) {
                let path = join_path(field, key);
                engine.traverse_value(Some(entry), None, &path).await?;
            }
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
        let mut map = match value {
            Value::Object(map) => map,
            other => return Ok(Transformed::Keep(other)),
        };
        let mut out = Map::with_capacity(map.len());
        for (key, child) in subschema.properties().into_iter().flatten() {
            let entry = map.shift_remove(key);
            if let Transformed::Keep(entry) = engine.transform_value(entry, Some(child), &join_path(field, key))? {
                out.insert(key.clone(), entry);
            }
        }
        for (key, entry) in map {
            if let Transformed::Keep(entry) = engine.transform_value(Some(entry), None, &join_path(field, &key))? {
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
        let mut map = match value {
            Value::Object(map) => map,
            other => return Ok(Transformed::Keep(other)),
        };
        let mut out = Map::with_capacity(map.len());
        for (key, child) in subschema.properties().into_iter().flatten() {
            let entry = map.shift_remove(key);
            let path = join_path(field, key);
            if let Transformed::Keep(entry) = engine.transform_value(entry, Some(child), &path).await? {
                out.insert(key.clone(), entry);
            }
        }
        for (key, entry) in map {
            let path = join_path(field, &key);
            if let Transformed::Keep(entry) = engine.transform_value(Some(entry), None, &path).await? {
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
        let mut properties = serde_json::Map::new();
        let mut required = Vec::new();
        for (key, child) in subschema.properties().into_iter().flatten() {
            if child.is_required() {
                required.push(serde_json::Value::String(key.clone()));
            }
            properties.insert(key.clone(), ctx.subschema_to_json_schema(child)?);
        }
        let mut out = serde_json::json!({
            "type": "object",
            "properties": properties,
        });
        if !required.is_empty() {
            out["required"] = serde_json::Value::Array(required);
        }
        Ok(out)
    }
}
