//! Document and schema walking engines
//!
//! - [`traverse`] - read-only document walks (sync and async)
//! - [`transform`] - rebuilding document walks (sync and async)
//! - [`schema_traverse`] - walks over the schema tree itself
//! - [`normalizer`], [`validator`] - the handlers behind `normalize` and `validate`
//!
//! Copyright (c) 2025 Common Schema Team
//! Licensed under the Apache-2.0 license

pub mod normalizer;
pub mod schema_traverse;
pub mod transform;
pub mod traverse;
pub mod validator;

pub use normalizer::Normalizer;
pub use schema_traverse::{SchemaTraversal, TraverseSchemaHandlers};
pub use transform::{AsyncTransformHandlers, AsyncTransformer, TransformHandlers, Transformed, Transformer};
pub use traverse::{AsyncTraversal, AsyncTraverseHandlers, Traversal, TraverseHandlers};
pub use validator::Validator;

use crate::error::Result;
use crate::options::{NormalizeOptions, ValidateOptions};
use crate::registry::SchemaRegistry;
use crate::schema::subschema::Subschema;
use crate::value::Value;

/// Strictly validate `value` against one subschema
pub fn validate_subschema(
    registry: &SchemaRegistry,
    subschema: &Subschema,
    value: &Value,
    options: &ValidateOptions,
) -> Result<()> {
    let mut validator = Validator::new(registry, options);
    Traversal::new(registry, &mut validator).traverse_value(Some(value), Some(subschema), "")?;
    validator.into_result()
}

/// Normalize `value` against one subschema
pub fn normalize_subschema(
    registry: &SchemaRegistry,
    subschema: &Subschema,
    value: Value,
    options: &NormalizeOptions,
) -> Result<Value> {
    let mut normalizer = Normalizer::new(registry, options);
    let result = Transformer::new(registry, &mut normalizer).transform_value(Some(value), Some(subschema), "")?;
    normalizer.into_result()?;
    Ok(result.into_option().unwrap_or_default())
}
