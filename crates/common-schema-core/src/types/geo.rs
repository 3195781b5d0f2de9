//! Geographic types
//!
//! - `geopoint`: a `[long, lat]` pair, also accepted as a `"long,lat"` string
//! - `geojson`: a GeoJSON geometry, checked against an internal schema per
//!   geometry type
//!
//! Copyright (c) 2025 Common Schema Team
//! Licensed under the Apache-2.0 license

use std::sync::Arc;

use serde_json::json;

use crate::engine::{normalize_subschema, validate_subschema};
use crate::error::{Error, FieldError, Result};
use crate::options::NormalizeOptions;
use crate::schema::json_schema::JsonSchemaContext;
use crate::schema::subschema::Subschema;
use crate::types::number::{check_range, coerce_number};
use crate::types::{FieldContext, SchemaType};
use crate::value::Value;

const POSITION_FORM: &str = "Must be array in form [ long, lat ]";

/// The geo plugins in registration order
pub fn geo_types() -> Vec<Arc<dyn SchemaType>> {
    vec![Arc::new(GeoPointType::new()), Arc::new(GeoJsonType::new())]
}

fn validate_position(value: &Value) -> Result<()> {
    let (long, lat) = match value.as_array().map(Vec::as_slice) {
        Some([Value::Number(long), Value::Number(lat)]) => (*long, *lat),
        _ => return Err(FieldError::invalid_type(POSITION_FORM).into()),
    };
    if !(-180.0..=180.0).contains(&long) {
        return Err(FieldError::invalid_format("Longitude must be between -180 and 180").into());
    }
    if !(-90.0..=90.0).contains(&lat) {
        return Err(FieldError::invalid_format("Latitude must be between -90 and 90").into());
    }
    Ok(())
}

fn normalize_coordinate(value: &Value, min: f64, max: f64) -> Result<Value> {
    let n = coerce_number(value).ok_or_else(|| FieldError::invalid_type("Must be a number"))?;
    let bounds = Subschema::new("number")
        .with_attribute("min", Value::Number(min))
        .with_attribute("max", Value::Number(max));
    check_range(n, &bounds)?;
    Ok(Value::Number(n))
}

fn normalize_position(value: Value) -> Result<Value> {
    let items = match value {
        Value::String(text) => text.split(',').map(|part| Value::from(part.trim())).collect(),
        Value::Array(items) => items,
        _ => return Err(FieldError::invalid_type(POSITION_FORM).into()),
    };
    let [long, lat] = items.as_slice() else {
        return Err(FieldError::invalid_type(POSITION_FORM).into());
    };
    let position = Value::Array(vec![
        normalize_coordinate(long, -180.0, 180.0)?,
        normalize_coordinate(lat, -90.0, 90.0)?,
    ]);
    validate_position(&position)?;
    Ok(position)
}

#[derive(Debug, Clone)]
pub struct GeoPointType {
    name: String,
}

impl GeoPointType {
    pub fn new() -> Self {
        Self::named("geopoint")
    }

    pub fn named<N: Into<String>>(name: N) -> Self {
        Self { name: name.into() }
    }
}

impl Default for GeoPointType {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaType for GeoPointType {
    fn name(&self) -> &str {
        &self.name
    }

    fn validate(&self, value: &Value, _ctx: &FieldContext<'_>) -> Result<()> {
        validate_position(value)
    }

    fn normalize(&self, value: Value, _ctx: &FieldContext<'_>) -> Result<Value> {
        normalize_position(value)
    }

    fn to_json_schema(&self, subschema: &Subschema, _ctx: &mut JsonSchemaContext<'_>) -> Result<serde_json::Value> {
        Ok(json!({
            "type": "array",
            "items": {"type": "number"},
            "minItems": 2,
            "maxItems": 2,
            "description": subschema.string("description").unwrap_or("Longitude, Latitude"),
        }))
    }
}

/// Geometry types understood by the `geojson` plugin
pub const GEOJSON_TYPES: [&str; 7] = [
    "Point",
    "LineString",
    "Polygon",
    "MultiPoint",
    "MultiLineString",
    "MultiPolygon",
    "GeometryCollection",
];

fn geometry_schema_data(geometry_type: &str) -> Option<serde_json::Value> {
    let coordinates = match geometry_type {
        "Point" => json!("geopoint"),
        "LineString" | "MultiPoint" => json!(["geopoint"]),
        "Polygon" | "MultiLineString" => json!([["geopoint"]]),
        "MultiPolygon" => json!([[["geopoint"]]]),
        "GeometryCollection" => {
            return Some(json!({
                "type": "object",
                "properties": {"type": "string", "geometries": ["geojson"]}
            }))
        }
        _ => return None,
    };
    Some(json!({
        "type": "object",
        "properties": {"type": "string", "coordinates": coordinates}
    }))
}

#[derive(Debug, Clone)]
pub struct GeoJsonType {
    name: String,
}

impl GeoJsonType {
    pub fn new() -> Self {
        Self::named("geojson")
    }

    pub fn named<N: Into<String>>(name: N) -> Self {
        Self { name: name.into() }
    }

    /// Check the envelope and build the internal schema for the geometry type
    fn geometry_schema(&self, value: &Value, ctx: &FieldContext<'_>) -> Result<Subschema> {
        let Value::Object(map) = value else {
            return Err(FieldError::invalid_type("GeoJSON object must be object").into());
        };
        let Some(geometry_type) = map.get("type").and_then(Value::as_str) else {
            return Err(FieldError::invalid_type("GeoJSON object must have a \"type\" property").into());
        };
        if let Some(allowed) = ctx.subschema.value("allowedTypes").and_then(Value::as_array) {
            if !allowed.iter().any(|t| t.as_str() == Some(geometry_type)) {
                let names: Vec<&str> = allowed.iter().filter_map(Value::as_str).collect();
                return Err(FieldError::invalid_type(format!("GeoJSON object must have type {}", names.join(", "))).into());
            }
        }
        let data = geometry_schema_data(geometry_type).ok_or_else(|| {
            FieldError::invalid_type(format!("Unrecognized GeoJSON type: {}", geometry_type))
        })?;
        ctx.registry
            .normalize_subschema(data.into())?
            .ok_or_else(|| Error::internal("empty GeoJSON geometry schema"))
    }
}

impl Default for GeoJsonType {
    fn default() -> Self {
        Self::new()
    }
}

/// Surface a nested validation failure as a format error of this field
fn as_format_error<T>(result: Result<T>) -> Result<T> {
    result.map_err(|err| match err {
        Error::Validation(inner) => FieldError::invalid_format(inner.message).into(),
        other => other,
    })
}

impl SchemaType for GeoJsonType {
    fn name(&self) -> &str {
        &self.name
    }

    fn validate(&self, value: &Value, ctx: &FieldContext<'_>) -> Result<()> {
        let geometry = self.geometry_schema(value, ctx)?;
        as_format_error(validate_subschema(ctx.registry, &geometry, value, &NormalizeOptions::default()))
    }

    fn normalize(&self, value: Value, ctx: &FieldContext<'_>) -> Result<Value> {
        let geometry = self.geometry_schema(&value, ctx)?;
        as_format_error(normalize_subschema(ctx.registry, &geometry, value, &NormalizeOptions::default()))
    }

    fn to_json_schema(&self, subschema: &Subschema, ctx: &mut JsonSchemaContext<'_>) -> Result<serde_json::Value> {
        ctx.add_definition(
            "geojsonPosition",
            json!({
                "type": "array",
                "items": {"type": "number"},
                "minItems": 2,
                "maxItems": 2
            }),
        );
        ctx.add_definition(
            "geojsonGeometry",
            json!({
                "type": "object",
                "required": ["type"],
                "properties": {
                    "type": {"enum": GEOJSON_TYPES},
                    "coordinates": {"type": "array"},
                    "geometries": {
                        "type": "array",
                        "items": {"$ref": "#/definitions/geojsonGeometry"}
                    }
                }
            }),
        );
        let mut out = json!({"$ref": "#/definitions/geojsonGeometry"});
        if let Some(description) = subschema.string("description") {
            out["description"] = json!(description);
        }
        Ok(out)
    }
}
