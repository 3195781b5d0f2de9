//! Type plugin registry
//!
//! A [`SchemaRegistry`] maps type names to plugins and keeps registration
//! order, which decides which plugin claims an ambiguous shorthand. Registries
//! are immutable once shared behind an `Arc`.
//!
//! Copyright (c) 2025 Common Schema Team
//! Licensed under the Apache-2.0 license

use std::fmt;
use std::sync::{Arc, OnceLock};

use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::error::{Result, SchemaError};
use crate::schema::data::SchemaData;
use crate::schema::normalizer::SchemaNormalizer;
use crate::schema::subschema::Subschema;
use crate::schema::Schema;
use crate::types::{self, SchemaType};

/// Registry of schema type plugins
#[derive(Clone)]
pub struct SchemaRegistry {
    types: IndexMap<String, Arc<dyn SchemaType>>,
}

impl SchemaRegistry {
    /// Registry with the core and geo plugins
    pub fn new() -> Self {
        let mut registry = Self::empty();
        for schema_type in types::core_types().into_iter().chain(types::geo::geo_types()) {
            registry.register_type(schema_type);
        }
        registry
    }

    /// Registry without any plugins
    pub fn empty() -> Self {
        Self {
            types: IndexMap::new(),
        }
    }

    /// Register a plugin under its name.
    ///
    /// Replacing an existing plugin keeps its original registration slot.
    pub fn register_type(&mut self, schema_type: Arc<dyn SchemaType>) -> &mut Self {
        let name = schema_type.name().to_string();
        if self.types.insert(name.clone(), schema_type).is_some() {
            warn!(type_name = %name, "schema type registration replaced an existing plugin");
        }
        self
    }

    /// Builder-style registration
    pub fn with_type(mut self, schema_type: Arc<dyn SchemaType>) -> Self {
        self.register_type(schema_type);
        self
    }

    pub fn schema_type(&self, name: &str) -> Option<&Arc<dyn SchemaType>> {
        self.types.get(name)
    }

    /// The plugin of a canonical node
    pub fn type_for(&self, subschema: &Subschema) -> Result<&Arc<dyn SchemaType>> {
        self.schema_type(subschema.type_name()).ok_or_else(|| {
            SchemaError::new(format!("Unknown schema type: {}", subschema.type_name())).into()
        })
    }

    /// First plugin, in registration order, claiming the shorthand
    pub fn match_shorthand(&self, data: &SchemaData) -> Option<&Arc<dyn SchemaType>> {
        self.types.values().find(|t| t.match_shorthand_type(data))
    }

    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }

    /// Normalize raw schema data against this registry
    pub fn normalize_subschema(&self, data: SchemaData) -> std::result::Result<Option<Subschema>, SchemaError> {
        SchemaNormalizer::new(self).normalize(data)
    }

    /// Normalize raw schema data into a [`Schema`] bound to this registry
    pub fn create_schema(self: &Arc<Self>, data: impl Into<SchemaData>) -> Result<Schema> {
        let root = SchemaNormalizer::new(self)
            .normalize(data.into())?
            .ok_or_else(|| SchemaError::new("Schema data must not be empty"))?;
        debug!(type_name = root.type_name(), "created schema");
        Ok(Schema::new(root, Arc::clone(self)))
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SchemaRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaRegistry")
            .field("types", &self.types.keys().collect::<Vec<_>>())
            .finish()
    }
}

static DEFAULT_REGISTRY: OnceLock<Arc<SchemaRegistry>> = OnceLock::new();

/// Process-wide registry with the built-in plugins
pub fn default_registry() -> &'static Arc<SchemaRegistry> {
    DEFAULT_REGISTRY.get_or_init(|| Arc::new(SchemaRegistry::new()))
}

/// Create a schema against the default registry
pub fn create_schema(data: impl Into<SchemaData>) -> Result<Schema> {
    default_registry().create_schema(data)
}
