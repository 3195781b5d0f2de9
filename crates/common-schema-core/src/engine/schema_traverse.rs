//! Walk over the subschemas of a schema tree
//!
//! Each node is reported with two paths: the document path it governs
//! (`foo.bar`, or `foo.$.bar` with `include_path_arrays`) and its raw path
//! inside the canonical tree (`properties.foo.elements.properties.bar`).
//!
//! Copyright (c) 2025 Common Schema Team
//! Licensed under the Apache-2.0 license

use crate::error::Result;
use crate::options::TraverseSchemaOptions;
use crate::registry::SchemaRegistry;
use crate::schema::subschema::Subschema;
use crate::types::join_path;

/// Callback of a schema walk
pub trait TraverseSchemaHandlers {
    /// Returning `false` skips the node's children
    fn on_subschema(&mut self, subschema: &Subschema, path: &str, raw_path: &str) -> Result<bool>;
}

impl<F> TraverseSchemaHandlers for F
where
    F: FnMut(&Subschema, &str, &str) -> Result<bool>,
{
    fn on_subschema(&mut self, subschema: &Subschema, path: &str, raw_path: &str) -> Result<bool> {
        self(subschema, path, raw_path)
    }
}

/// Schema walk engine
pub struct SchemaTraversal<'a> {
    registry: &'a SchemaRegistry,
    handlers: &'a mut dyn TraverseSchemaHandlers,
    options: &'a TraverseSchemaOptions,
}

impl<'a> SchemaTraversal<'a> {
    pub fn new(
        registry: &'a SchemaRegistry,
        handlers: &'a mut dyn TraverseSchemaHandlers,
        options: &'a TraverseSchemaOptions,
    ) -> Self {
        Self {
            registry,
            handlers,
            options,
        }
    }

    pub fn options(&self) -> &'a TraverseSchemaOptions {
        self.options
    }

    pub fn traverse_subschema(&mut self, subschema: &Subschema, path: &str, raw_path: &str) -> Result<()> {
        if !self.handlers.on_subschema(subschema, path, raw_path)? {
            return Ok(());
        }
        let registry = self.registry;
        registry
            .type_for(subschema)?
            .traverse_schema(subschema, path, raw_path, self)
    }

    /// Document path of the element level below an array-like node
    pub fn element_path(&self, path: &str) -> String {
        if self.options.include_path_arrays {
            join_path(path, "$")
        } else {
            path.to_string()
        }
    }
}
