//! Options accepted by the document and schema walks
//!
//! Copyright (c) 2025 Common Schema Team
//! Licensed under the Apache-2.0 license

use serde::{Deserialize, Serialize};

/// Options for [`Schema::normalize`](crate::Schema::normalize) and
/// [`Schema::validate`](crate::Schema::validate)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NormalizeOptions {
    /// Keep undeclared keys without reporting them
    pub allow_unknown_fields: bool,
    /// Skip the required-field check
    pub allow_missing_fields: bool,
    /// Drop undeclared keys from the output
    pub remove_unknown_fields: bool,
    /// Emit wire-friendly primitives (dates as strings, binary as base64)
    pub serialize: bool,
}

/// Validation shares the normalize options; `serialize` has no effect there
pub type ValidateOptions = NormalizeOptions;

impl NormalizeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_allow_unknown_fields(mut self) -> Self {
        self.allow_unknown_fields = true;
        self
    }

    pub fn with_allow_missing_fields(mut self) -> Self {
        self.allow_missing_fields = true;
        self
    }

    pub fn with_remove_unknown_fields(mut self) -> Self {
        self.remove_unknown_fields = true;
        self
    }

    pub fn with_serialize(mut self) -> Self {
        self.serialize = true;
        self
    }
}

/// Options for [`Schema::list_fields`](crate::Schema::list_fields)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ListFieldsOptions {
    /// Do not descend below array and map fields
    pub stop_at_arrays: bool,
    /// Include `$` components for array and map element levels
    pub include_path_arrays: bool,
    /// Maximum number of path components listed
    pub max_depth: Option<usize>,
    /// Only list fields that have no listed children
    pub only_leaves: bool,
}

impl Default for ListFieldsOptions {
    fn default() -> Self {
        Self {
            stop_at_arrays: true,
            include_path_arrays: false,
            max_depth: None,
            only_leaves: false,
        }
    }
}

impl ListFieldsOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_stop_at_arrays(mut self, stop: bool) -> Self {
        self.stop_at_arrays = stop;
        self
    }

    pub fn with_include_path_arrays(mut self) -> Self {
        self.include_path_arrays = true;
        self
    }

    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    pub fn with_only_leaves(mut self) -> Self {
        self.only_leaves = true;
        self
    }
}

/// Options for [`Schema::traverse_schema`](crate::Schema::traverse_schema)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TraverseSchemaOptions {
    pub include_path_arrays: bool,
}
