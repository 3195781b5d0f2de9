//! Common Schema Core - recursive schema normalization, validation and transforms
//!
//! A schema is written in a compact, shorthand-friendly notation, normalized
//! once into a canonical tree of typed nodes, and then used to validate,
//! coerce, traverse and rebuild documents. Every type (including `object`,
//! `array`, `map` and `or`) is a plugin registered in a
//! [`SchemaRegistry`]; the engines only ever talk to the plugin trait.
//!
//! # Main Components
//!
//! - **Schema data**: raw definitions with shorthand tokens and hooks ([`SchemaData`])
//! - **Normalizer**: raw data to canonical [`Subschema`] trees
//! - **Type plugins**: [`SchemaType`] and the built-in core and geo types
//! - **Engines**: document traversal and transformation, sync and async
//! - **Schema API**: validate, normalize, path lookup, field listing,
//!   filtering and JSON Schema export on [`Schema`]
//!
//! # Example
//!
//! ```
//! use common_schema_core::{create_schema, NormalizeOptions, Result, Value};
//! use serde_json::json;
//!
//! fn example() -> Result<()> {
//!     let schema = create_schema(json!({
//!         "name": {"type": "string", "required": true},
//!         "tags": ["string"]
//!     }))?;
//!     let doc = schema.normalize(Value::from(json!({"name": "x", "tags": [1, 2]})), &NormalizeOptions::default())?;
//!     assert_eq!(doc, Value::from(json!({"name": "x", "tags": ["1", "2"]})));
//!     Ok(())
//! }
//! # example().unwrap();
//! ```
//!
//! Copyright (c) 2025 Common Schema Team
//! Licensed under the Apache-2.0 license

pub mod engine;
pub mod error;
pub mod loader;
pub mod options;
pub mod registry;
pub mod schema;
pub mod types;
pub mod value;

pub use engine::{
    AsyncTransformHandlers, AsyncTraverseHandlers, TransformHandlers, Transformed, TraverseHandlers,
    TraverseSchemaHandlers,
};
pub use error::{Error, FieldError, FieldErrorCode, FieldErrors, Result, SchemaError, ValidationError};
pub use loader::{load_schema, load_schema_file, SchemaFormat};
pub use options::{ListFieldsOptions, NormalizeOptions, TraverseSchemaOptions, ValidateOptions};
pub use registry::{create_schema, default_registry, SchemaRegistry};
pub use schema::builders::{map, map_of, or, or_of};
pub use schema::{Attribute, Hook, Schema, SchemaData, Shorthand, Subschema};
pub use types::{FieldContext, SchemaType, TypeMatch};
pub use value::Value;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
