//! Schemas: raw data, canonical trees and the [`Schema`] handle
//!
//! # Module Organization
//!
//! - [`data`] - raw schema definitions ([`SchemaData`], shorthand tokens, hooks)
//! - [`subschema`] - canonical nodes
//! - [`normalizer`] - raw data to canonical tree
//! - [`json_schema`] - JSON Schema export
//! - [`builders`] - `or` and `map` helpers
//!
//! Copyright (c) 2025 Common Schema Team
//! Licensed under the Apache-2.0 license

pub mod builders;
pub mod data;
pub mod json_schema;
pub mod normalizer;
pub mod subschema;

pub use data::{Hook, SchemaData, Shorthand};
pub use subschema::{Attribute, RawSubschema, Subschema};

use std::sync::Arc;

use crate::engine::{
    normalize_subschema, validate_subschema, AsyncTransformHandlers, AsyncTransformer, AsyncTraversal,
    AsyncTraverseHandlers, SchemaTraversal, TransformHandlers, Transformed, Transformer, Traversal,
    TraverseHandlers, TraverseSchemaHandlers,
};
use crate::error::{Error, Result, SchemaError};
use crate::options::{ListFieldsOptions, NormalizeOptions, TraverseSchemaOptions, ValidateOptions};
use crate::registry::SchemaRegistry;
use crate::types::SchemaType;
use crate::value::Value;
use json_schema::JsonSchemaContext;

/// A normalized schema bound to the registry that produced it
#[derive(Debug, Clone)]
pub struct Schema {
    root: Subschema,
    registry: Arc<SchemaRegistry>,
}

impl Schema {
    pub(crate) fn new(root: Subschema, registry: Arc<SchemaRegistry>) -> Self {
        Self { root, registry }
    }

    /// The canonical root node
    pub fn data(&self) -> &Subschema {
        &self.root
    }

    pub fn registry(&self) -> &Arc<SchemaRegistry> {
        &self.registry
    }

    pub fn get_schema_type(&self, subschema: &Subschema) -> Result<&Arc<dyn SchemaType>> {
        self.registry.type_for(subschema)
    }

    /// Strictly check a document; nothing is coerced
    pub fn validate(&self, value: &Value, options: &ValidateOptions) -> Result<()> {
        validate_subschema(&self.registry, &self.root, value, options)
    }

    /// Validation with default options, reduced to a boolean
    pub fn is_valid(&self, value: &Value) -> bool {
        self.validate(value, &ValidateOptions::default()).is_ok()
    }

    /// Coerce a document into the schema's shape
    pub fn normalize(&self, value: Value, options: &NormalizeOptions) -> Result<Value> {
        normalize_subschema(&self.registry, &self.root, value, options)
    }

    pub fn traverse(&self, value: &Value, handlers: &mut dyn TraverseHandlers) -> Result<()> {
        Traversal::new(&self.registry, handlers).traverse_value(Some(value), Some(&self.root), "")
    }

    pub async fn traverse_async(&self, value: &Value, handlers: &mut dyn AsyncTraverseHandlers) -> Result<()> {
        AsyncTraversal::new(&self.registry, handlers)
            .traverse_value(Some(value), Some(&self.root), "")
            .await
    }

    pub fn transform(&self, value: Value, handlers: &mut dyn TransformHandlers) -> Result<Transformed> {
        Transformer::new(&self.registry, handlers).transform_value(Some(value), Some(&self.root), "")
    }

    pub async fn transform_async(
        &self,
        value: Value,
        handlers: &mut dyn AsyncTransformHandlers,
    ) -> Result<Transformed> {
        AsyncTransformer::new(&self.registry, handlers)
            .transform_value(Some(value), Some(&self.root), "")
            .await
    }

    /// Visit every subschema of the tree, parents first
    pub fn traverse_schema(
        &self,
        handlers: &mut dyn TraverseSchemaHandlers,
        options: &TraverseSchemaOptions,
    ) -> Result<()> {
        SchemaTraversal::new(&self.registry, handlers, options).traverse_subschema(&self.root, "", "")
    }

    /// The node governing a document path; `""` is the root
    pub fn get_subschema_data(&self, path: &str) -> Option<&Subschema> {
        if path.is_empty() {
            return Some(&self.root);
        }
        path.split('.').try_fold(&self.root, |current, component| {
            self.registry
                .schema_type(current.type_name())?
                .get_field_subschema(current, component, &self.registry)
        })
    }

    /// Whether a node of `type_name` lies on the way to `path`.
    ///
    /// Element levels of array-like nodes are crossed implicitly, so
    /// `foo.bar` reaches `bar` inside an array `foo`. The root is not
    /// considered; with `skip_last_field` neither is the node at `path`.
    pub fn has_parent_type(&self, path: &str, type_name: &str, skip_last_field: bool) -> Result<bool> {
        let not_found = || Error::from(SchemaError::new("Did not find field in schema"));
        let components: Vec<&str> = path.split('.').filter(|c| !c.is_empty()).collect();
        let mut current = &self.root;
        let mut found = false;
        for (index, component) in components.iter().enumerate() {
            let mut next = None;
            loop {
                let schema_type = self.registry.type_for(current)?;
                if let Some(child) = schema_type.get_field_subschema(current, component, &self.registry) {
                    next = Some(child);
                    break;
                }
                if !schema_type.is_array_like() {
                    break;
                }
                current = schema_type
                    .get_field_subschema(current, "$", &self.registry)
                    .ok_or_else(not_found)?;
                found |= current.type_name() == type_name;
            }
            current = next.ok_or_else(not_found)?;
            let is_last = index + 1 == components.len();
            if !(is_last && skip_last_field) {
                found |= current.type_name() == type_name;
            }
        }
        Ok(found)
    }

    /// Document paths of all declared fields
    pub fn list_fields(&self, options: &ListFieldsOptions) -> Result<Vec<String>> {
        let registry = &self.registry;
        let mut fields: Vec<String> = Vec::new();
        let mut collect = |subschema: &Subschema, path: &str, _raw_path: &str| -> Result<bool> {
            if path.is_empty() {
                return Ok(true);
            }
            if options.max_depth.is_some_and(|max| path.split('.').count() > max) {
                return Ok(false);
            }
            if !fields.iter().any(|field| field == path) {
                fields.push(path.to_string());
            }
            Ok(!(options.stop_at_arrays && registry.type_for(subschema)?.is_array_like()))
        };
        let traverse_options = TraverseSchemaOptions {
            include_path_arrays: options.include_path_arrays,
        };
        self.traverse_schema(&mut collect, &traverse_options)?;

        if options.only_leaves {
            let leaves: Vec<String> = fields
                .iter()
                .filter(|field| {
                    let prefix = format!("{}.", field);
                    !fields.iter().any(|other| other.starts_with(&prefix))
                })
                .cloned()
                .collect();
            return Ok(leaves);
        }
        Ok(fields)
    }

    /// Structural subset of this schema, see [`Subschema::filter`]
    pub fn filter_schema<F>(&self, mut predicate: F) -> Result<Schema>
    where
        F: FnMut(&Subschema) -> Option<bool>,
    {
        let root = self
            .root
            .filter(&mut predicate)
            .ok_or_else(|| SchemaError::new("Filter removed the schema root"))?;
        Ok(Schema::new(root, Arc::clone(&self.registry)))
    }

    /// JSON Schema rendition of the whole tree
    pub fn to_json_schema(&self) -> Result<serde_json::Value> {
        JsonSchemaContext::new(&self.registry).export(&self.root)
    }
}
