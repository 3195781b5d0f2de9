//! Loading schema definitions from JSON and YAML files
//!
//! Copyright (c) 2025 Common Schema Team
//! Licensed under the Apache-2.0 license

use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use crate::error::{Result, SchemaError};
use crate::registry::SchemaRegistry;
use crate::schema::data::SchemaData;
use crate::schema::Schema;

/// File formats a schema definition can be written in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaFormat {
    /// `.yaml`, `.yml`
    Yaml,
    /// `.json`
    Json,
}

impl SchemaFormat {
    /// Detect the format from the file extension
    pub fn from_path(path: &Path) -> Result<Self> {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_lowercase)
            .as_deref()
        {
            Some("yaml" | "yml") => Ok(SchemaFormat::Yaml),
            Some("json") => Ok(SchemaFormat::Json),
            _ => Err(SchemaError::new(format!("Unsupported schema file format: {}", path.display())).into()),
        }
    }

    pub fn parse(&self, content: &str) -> Result<SchemaData> {
        match self {
            SchemaFormat::Yaml => SchemaData::from_yaml_str(content),
            SchemaFormat::Json => SchemaData::from_json_str(content),
        }
    }
}

/// Read raw schema data from a file
pub fn load_schema_file<P: AsRef<Path>>(path: P) -> Result<SchemaData> {
    let path = path.as_ref();
    let format = SchemaFormat::from_path(path)?;
    let content = std::fs::read_to_string(path)?;
    debug!(path = %path.display(), ?format, "loading schema definition");
    format.parse(&content)
}

/// Read and normalize a schema file against `registry`
pub fn load_schema<P: AsRef<Path>>(registry: &Arc<SchemaRegistry>, path: P) -> Result<Schema> {
    registry.create_schema(load_schema_file(path)?)
}
