//! Helpers for writing `or` and `map` subschemas
//!
//! Copyright (c) 2025 Common Schema Team
//! Licensed under the Apache-2.0 license

use indexmap::IndexMap;

use crate::schema::data::SchemaData;

/// An `or` subschema
///
/// An object `options` holds attributes of the `or` node itself
/// (`required`, `description`, ...). Anything else is taken as the first
/// alternative.
///
/// ```
/// use common_schema_core::schema::builders::or;
/// use common_schema_core::schema::data::{SchemaData, Shorthand};
///
/// let data = or(
///     SchemaData::object([("required", true)]),
///     vec![Shorthand::String.into(), Shorthand::Number.into()],
/// );
/// match data {
///     SchemaData::Object(fields) => assert_eq!(fields.get("type"), Some(&SchemaData::from("or"))),
///     _ => unreachable!(),
/// }
/// ```
pub fn or<O: Into<SchemaData>>(options: O, alternatives: Vec<SchemaData>) -> SchemaData {
    let (mut fields, alternatives) = match options.into() {
        SchemaData::Object(fields) => (fields, alternatives),
        first => {
            let mut all = Vec::with_capacity(alternatives.len() + 1);
            all.push(first);
            all.extend(alternatives);
            (IndexMap::new(), all)
        }
    };
    fields.insert("type".to_string(), SchemaData::from("or"));
    fields.insert("alternatives".to_string(), SchemaData::Array(alternatives));
    SchemaData::Object(fields)
}

/// An `or` subschema without attributes
pub fn or_of(alternatives: Vec<SchemaData>) -> SchemaData {
    or(SchemaData::Object(IndexMap::new()), alternatives)
}

/// A `map` subschema with the given attributes
pub fn map<O: Into<SchemaData>, V: Into<SchemaData>>(options: O, values: V) -> SchemaData {
    let mut fields = match options.into() {
        SchemaData::Object(fields) => fields,
        _ => IndexMap::new(),
    };
    fields.insert("type".to_string(), SchemaData::from("map"));
    fields.insert("values".to_string(), values.into());
    SchemaData::Object(fields)
}

/// A `map` subschema without attributes
pub fn map_of<V: Into<SchemaData>>(values: V) -> SchemaData {
    map(SchemaData::Object(IndexMap::new()), values)
}
