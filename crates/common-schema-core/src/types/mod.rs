//! Schema type plugins
//!
//! Every subschema node names a type plugin. The engines never branch on type
//! names; all type-specific behaviour (shorthand recognition, schema
//! normalization, container traversal, coercion and validation) lives behind
//! the [`SchemaType`] trait and is dispatched through the
//! [`SchemaRegistry`](crate::registry::SchemaRegistry).
//!
//! # Module Organization
//!
//! - [`object`], [`array`], [`map`] - container types
//! - [`or`] - alternation and the alternative resolver
//! - [`string`], [`number`], [`date`], [`binary`], [`boolean`], [`mixed`] - primitives
//! - [`geo`] - `geopoint` and `geojson`
//!
//! Copyright (c) 2025 Common Schema Team
//! Licensed under the Apache-2.0 license

use std::sync::Arc;

use async_trait::async_trait;

use crate::engine::schema_traverse::SchemaTraversal;
use crate::engine::transform::{AsyncTransformer, Transformed, Transformer};
use crate::engine::traverse::{AsyncTraversal, Traversal};
use crate::error::{Result, SchemaError};
use crate::options::NormalizeOptions;
use crate::registry::SchemaRegistry;
use crate::schema::data::SchemaData;
use crate::schema::json_schema::JsonSchemaContext;
use crate::schema::normalizer::SchemaNormalizer;
use crate::schema::subschema::{RawSubschema, Subschema};
use crate::value::Value;

pub mod array;
pub mod binary;
pub mod boolean;
pub mod date;
pub mod geo;
pub mod map;
pub mod mixed;
pub mod number;
pub mod object;
pub mod or;
pub mod string;

pub use array::ArrayType;
pub use binary::BinaryType;
pub use boolean::BooleanType;
pub use date::DateType;
pub use geo::{GeoJsonType, GeoPointType};
pub use map::MapType;
pub use mixed::MixedType;
pub use number::NumberType;
pub use object::ObjectType;
pub use or::{resolve_alternative, OrType};
pub use string::StringType;

/// How well a value fits a type, used to pick among `or` alternatives
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TypeMatch {
    NoMatch = 0,
    /// The value is a container of the right shape; its contents are unchecked
    Complex = 1,
    /// The value can be coerced into the type
    Coercible = 2,
    /// The value already is of the type
    Exact = 3,
}

/// Everything a plugin or hook knows about the field being processed
#[derive(Clone, Copy)]
pub struct FieldContext<'a> {
    pub field: &'a str,
    pub subschema: &'a Subschema,
    pub options: &'a NormalizeOptions,
    pub registry: &'a SchemaRegistry,
}

impl<'a> FieldContext<'a> {
    pub fn new(
        field: &'a str,
        subschema: &'a Subschema,
        options: &'a NormalizeOptions,
        registry: &'a SchemaRegistry,
    ) -> Self {
        Self {
            field,
            subschema,
            options,
            registry,
        }
    }

    /// Custom message attribute of the current subschema, or the fallback
    pub fn message(&self, key: &str, fallback: &str) -> String {
        self.subschema.message(key, fallback)
    }
}

/// A schema type plugin
#[async_trait]
pub trait SchemaType: Send + Sync {
    /// Name stored in `Subschema::type_name` for nodes of this type
    fn name(&self) -> &str;

    /// Whether raw shorthand data (a non-string `type`) denotes this type
    fn match_shorthand_type(&self, _data: &SchemaData) -> bool {
        false
    }

    /// Rewrite a shorthand raw subschema into its expanded raw form
    fn normalize_shorthand_schema(&self, raw: RawSubschema) -> std::result::Result<RawSubschema, SchemaError> {
        Ok(raw)
    }

    /// Build the canonical node, normalizing any child subschemas
    fn normalize_schema(
        &self,
        raw: RawSubschema,
        _normalizer: &SchemaNormalizer<'_>,
    ) -> std::result::Result<Subschema, SchemaError> {
        Subschema::from_raw(self.name(), raw)
    }

    /// Visit child subschemas
    fn traverse_schema(
        &self,
        _subschema: &Subschema,
        _path: &str,
        _raw_path: &str,
        _walker: &mut SchemaTraversal<'_>,
    ) -> Result<()> {
        Ok(())
    }

    /// Resolve one path component below `subschema`
    fn get_field_subschema<'s>(
        &'s self,
        _subschema: &'s Subschema,
        _component: &str,
        _registry: &'s SchemaRegistry,
    ) -> Option<&'s Subschema> {
        None
    }

    /// Array-like types hold a uniform element subschema
    fn is_array_like(&self) -> bool {
        false
    }

    fn traverse(&self, _value: &Value, _subschema: &Subschema, _field: &str, _engine: &mut Traversal<'_>) -> Result<()> {
        Ok(())
    }

    async fn traverse_async(
        &self,
        _value: &Value,
        _subschema: &Subschema,
        _field: &str,
        _engine: &mut AsyncTraversal<'_>,
    ) -> Result<()> {
        Ok(())
    }

    fn transform(
        &self,
        value: Value,
        _subschema: &Subschema,
        _field: &str,
        _engine: &mut Transformer<'_>,
    ) -> Result<Transformed> {
        Ok(Transformed::Keep(value))
    }

    async fn transform_async(
        &self,
        value: Value,
        _subschema: &Subschema,
        _field: &str,
        _engine: &mut AsyncTransformer<'_>,
    ) -> Result<Transformed> {
        Ok(Transformed::Keep(value))
    }

    /// Strict check of an already-normalized value; does not recurse
    fn validate(&self, _value: &Value, _ctx: &FieldContext<'_>) -> Result<()> {
        Ok(())
    }

    /// Coerce a value into this type and check its constraints
    fn normalize(&self, value: Value, _ctx: &FieldContext<'_>) -> Result<Value> {
        Ok(value)
    }

    fn check_enum(&self, value: &Value, allowed: &[Value]) -> bool {
        allowed.contains(value)
    }

    /// Score how well `value` fits this type
    fn check_type_match(&self, value: &Value, subschema: &Subschema, registry: &SchemaRegistry) -> TypeMatch {
        let options = NormalizeOptions::default();
        let ctx = FieldContext::new("", subschema, &options, registry);
        if self.validate(value, &ctx).is_ok() {
            TypeMatch::Exact
        } else if self.normalize(value.clone(), &ctx).is_ok() {
            TypeMatch::Coercible
        } else {
            TypeMatch::NoMatch
        }
    }

    /// JSON Schema descriptor of a node of this type
    fn to_json_schema(&self, _subschema: &Subschema, _ctx: &mut JsonSchemaContext<'_>) -> Result<serde_json::Value> {
        Ok(serde_json::json!({}))
    }
}

/// The core plugins in registration order
pub fn core_types() -> Vec<Arc<dyn SchemaType>> {
    vec![
        Arc::new(ObjectType::new()),
        Arc::new(ArrayType::new()),
        Arc::new(MapType::new()),
        Arc::new(OrType::new()),
        Arc::new(StringType::new()),
        Arc::new(NumberType::new()),
        Arc::new(DateType::new()),
        Arc::new(BinaryType::new()),
        Arc::new(BooleanType::new()),
        Arc::new(MixedType::new()),
    ]
}

/// Append a dot-separated path component
pub(crate) fn join_path(prefix: &str, component: &str) -> String {
    if prefix.is_empty() {
        component.to_string()
    } else {
        format!("{}.{}", prefix, component)
    }
}
