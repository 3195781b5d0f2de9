//! Document transformation
//!
//! A transform walks a document like a traversal but owns the values and
//! rebuilds every container from the results of its children. A handler can
//! replace any value or drop it with [`Transformed::Remove`]; containers omit
//! dropped children and arrays are compacted.
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

/// Result of transforming one value
#[derive(Debug, Clone, PartialEq)]
pub enum Transformed {
    Keep(Value),
    Remove,
}

impl Transformed {
    pub fn into_option(self) -> Option<Value> {
        match self {
            Transformed::Keep(value) => Some(value),
            Transformed::Remove => None,
        }
    }

    pub fn value(&self) -> Option<&Value> {
        match self {
            Transformed::Keep(value) => Some(value),
            Transformed::Remove => None,
        }
    }

    pub fn is_remove(&self) -> bool {
        matches!(self, Transformed::Remove)
    }
}

impl From<Option<Value>> for Transformed {
    fn from(value: Option<Value>) -> Self {
        match value {
            Some(value) => Transformed::Keep(value),
            None => Transformed::Remove,
        }
    }
}

impl From<Value> for Transformed {
    fn from(value: Value) -> Self {
        Transformed::Keep(value)
    }
}

/// Callbacks of a synchronous transform
pub trait TransformHandlers {
    /// Called for every declared field before its children are transformed
    fn on_field(
        &mut self,
        _field: &str,
        value: Option<Value>,
        _subschema: &Subschema,
        _schema_type: &dyn SchemaType,
    ) -> Result<Transformed> {
        Ok(value.into())
    }

    /// Called for object keys that the schema does not declare
    fn on_unknown_field(&mut self, _field: &str, value: Value) -> Result<Transformed> {
        Ok(Transformed::Keep(value))
    }

    /// Called for every declared field after its container was rebuilt
    fn post_field(
        &mut self,
        _field: &str,
        value: Value,
        _subschema: &Subschema,
        _schema_type: &dyn SchemaType,
    ) -> Result<Transformed> {
        Ok(Transformed::Keep(value))
    }
}

/// Synchronous transform engine
pub struct Transformer<'a> {
    registry: &'a SchemaRegistry,
    handlers: &'a mut dyn TransformHandlers,
}

impl<'a> Transformer<'a> {
    pub fn new(registry: &'a SchemaRegistry, handlers: &'a mut dyn TransformHandlers) -> Self {
        Self { registry, handlers }
    }

    pub fn registry(&self) -> &'a SchemaRegistry {
        self.registry
    }

    /// Transform one value. `None` means the field is absent.
    pub fn transform_value(
        &mut self,
        value: Option<Value>,
        subschema: Option<&Subschema>,
        field: &str,
    ) -> Result<Transformed> {
        let Some(subschema) = subschema else {
            return match value {
                Some(value) => self.handlers.on_unknown_field(field, value),
                None => Ok(Transformed::Remove),
            };
        };

        let registry = self.registry;
        let schema_type = registry.type_for(subschema)?;
        let value = match self
            .handlers
            .on_field(field, value, subschema, schema_type.as_ref())?
        {
            Transformed::Keep(value) => value,
            Transformed::Remove => return Ok(Transformed::Remove),
        };

        let value = if value.is_null() {
            value
        } else {
            match schema_type.transform(value, subschema, field, self)? {
                Transformed::Keep(value) => value,
                Transformed::Remove => return Ok(Transformed::Remove),
            }
        };

        self.handlers
            .post_field(field, value, subschema, schema_type.as_ref())
    }
}

/// Callbacks of an asynchronous transform
#[async_trait]
pub trait AsyncTransformHandlers: Send {
    async fn on_field(
        &mut self,
        _field: &str,
        value: Option<Value>,
        _subschema: &Subschema,
        _schema_type: &dyn SchemaType,
    ) -> Result<Transformed> {
        Ok(value.into())
    }

    async fn on_unknown_field(&mut self, _field: &str, value: Value) -> Result<Transformed> {
        Ok(Transformed::Keep(value))
    }

    async fn post_field(
        &mut self,
        _field: &str,
        value: Value,
        _subschema: &Subschema,
        _schema_type: &dyn SchemaType,
    ) -> Result<Transformed> {
        Ok(Transformed::Keep(value))
    }
}

/// Asynchronous transform engine; siblings are processed strictly in sequence
pub struct AsyncTransformer<'a> {
    registry: &'a SchemaRegistry,
    handlers: &'a mut dyn AsyncTransformHandlers,
}

impl<'a> AsyncTransformer<'a> {
    pub fn new(registry: &'a SchemaRegistry, handlers: &'a mut dyn AsyncTransformHandlers) -> Self {
        Self { registry, handlers }
    }

    pub fn registry(&self) -> &'a SchemaRegistry {
        self.registry
    }

    pub fn transform_value<'s>(
        &'s mut self,
        value: Option<Value>,
        subschema: Option<&'s Subschema>,
        field: &'s str,
    ) -> BoxFuture<'s, Result<Transformed>> {
        Box::pin(async move {
            let Some(subschema) = subschema else {
                return match value {
                    Some(value) => self.handlers.on_unknown_field(field, value).await,
                    None => Ok(Transformed::Remove),
                };
            };

            let registry = self.registry;
            let schema_type = registry.type_for(subschema)?;
            let value = match self
                .handlers
                .on_field(field, value, subschema, schema_type.as_ref())
                .await?
            {
                Transformed::Keep(value) => value,
                Transformed::Remove => return Ok(Transformed::Remove),
            };

            let value = if value.is_null() {
                value
            } else {
                match schema_type.transform_async(value, subschema, field, self).await? {
                    Transformed::Keep(value) => value,
                    Transformed::Remove => return Ok(Transformed::Remove),
                }
            };

            self.handlers
                .post_field(field, value, subschema, schema_type.as_ref())
                .await
        })
    }
}
