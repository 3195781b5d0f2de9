//! Read-only document traversal
//!
//! The traversal walks a document alongside its schema. Declared fields reach
//! [`TraverseHandlers::on_field`], undeclared object keys reach
//! [`TraverseHandlers::on_unknown_field`]. Container plugins call back into
//! the engine for each child, so the engine itself never inspects type names.
//!
//! Copyright (c) 2025 Common Schema Team
//! Licensed under the Apache-2.0 license

use async_trait::async_trait;
use futures_util::future::BoxFuture;

use crate::error::Result;
use crate::registry::SchemaRegistry;
use crate::schema::subschema::Subschema;
use crate::types::SchemaType;
use crate::value::Value;

/// Callbacks of a synchronous traversal
pub trait TraverseHandlers {
    /// Called for every declared field, present or not.
    ///
    /// Returning `false` skips the field's children.
    fn on_field(
        &mut self,
        _field: &str,
        _value: Option<&Value>,
        _subschema: &Subschema,
        _schema_type: &dyn SchemaType,
    ) -> Result<bool> {
        Ok(true)
    }

    /// Called for object keys that the schema does not declare
    fn on_unknown_field(&mut self, _field: &str, _value: &Value) -> Result<()> {
        Ok(())
    }
}

/// Synchronous traversal engine
pub struct Traversal<'a> {
    registry: &'a SchemaRegistry,
    handlers: &'a mut dyn TraverseHandlers,
}

impl<'a> Traversal<'a> {
    pub fn new(registry: &'a SchemaRegistry, handlers: &'a mut dyn TraverseHandlers) -> Self {
        Self { registry, handlers }
    }

    pub fn registry(&self) -> &'a SchemaRegistry {
        self.registry
    }

    /// Visit one value. A missing subschema marks an unknown field.
    pub fn traverse_value(&mut self, value: Option<&Value>, subschema: Option<&Subschema>, field: &str) -> Result<()> {
        let Some(subschema) = subschema else {
            if let Some(value) = value {
                self.handlers.on_unknown_field(field, value)?;
            }
            return Ok(());
        };

        let registry = self.registry;
        let schema_type = registry.type_for(subschema)?;
        let descend = self
            .handlers
            .on_field(field, value, subschema, schema_type.as_ref())?;
        match value {
            Some(value) if descend && !value.is_null() => schema_type.traverse(value, subschema, field, self),
            _ => Ok(()),
        }
    }
}

/// Callbacks of an asynchronous traversal
#[async_trait]
pub trait AsyncTraverseHandlers: Send {
    async fn on_field(
        &mut self,
        _field: &str,
        _value: Option<&Value>,
        _subschema: &Subschema,
        _schema_type: &dyn SchemaType,
    ) -> Result<bool> {
        Ok(true)
    }

    async fn on_unknown_field(&mut self, _field: &str, _value: &Value) -> Result<()> {
        Ok(())
    }
}

/// Asynchronous traversal engine.
///
/// Children are visited one at a time in document order; each handler call is
/// awaited before the next one starts.
pub struct AsyncTraversal<'a> {
    registry: &'a SchemaRegistry,
    handlers: &'a mut dyn AsyncTraverseHandlers,
}

impl<'a> AsyncTraversal<'a> {
    pub fn new(registry: &'a SchemaRegistry, handlers: &'a mut dyn AsyncTraverseHandlers) -> Self {
        Self { registry, handlers }
    }

    pub fn registry(&self) -> &'a SchemaRegistry {
        self.registry
    }

    pub fn traverse_value<'s>(
        &'s mut self,
        value: Option<&'s Value>,
        subschema: Option<&'s Subschema>,
        field: &'s str,
    ) -> BoxFuture<'s, Result<()>> {
        Box::pin(async move {
            let Some(subschema) = subschema else {
                if let Some(value) = value {
                    self.handlers.on_unknown_field(field, value).await?;
                }
                return Ok(());
            };

            let registry = self.registry;
            let schema_type = registry.type_for(subschema)?;
            let descend = self
                .handlers
                .on_field(field, value, subschema, schema_type.as_ref())
                .await?;
            match value {
                Some(value) if descend && !value.is_null() => {
                    schema_type.traverse_async(value, subschema, field, self).await
                }
                _ => Ok(()),
            }
        })
    }
}
