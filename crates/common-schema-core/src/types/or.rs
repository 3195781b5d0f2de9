//! `or` type: a value matching one of several alternatives
//!
//! The alternative used for a value is picked by [`resolve_alternative`]:
//! every alternative scores the value with its plugin's
//! [`check_type_match`](SchemaType::check_type_match). The single best scorer
//! wins; ties are broken by trial validation, then trial normalization, then
//! listing order.
//!
//! Copyright (c) 2025 Common Schema Team
//! Licensed under the Apache-2.0 license

use async_trait::async_trait;
use tracing::trace;

use crate::engine::schema_traverse::SchemaTraversal;
use crate::engine::transform::{AsyncTransformer, Transformed, Transformer};
use crate::engine::traverse::{AsyncTraversal, Traversal};
use crate::engine::{normalize_subschema, validate_subschema};
use crate::error::{Error, Result, SchemaError};
use crate::options::NormalizeOptions;
use crate::registry::SchemaRegistry;
use crate::schema::data::SchemaData;
use crate::schema::json_schema::JsonSchemaContext;
use crate::schema::normalizer::SchemaNormalizer;
use crate::schema::subschema::{Attribute, RawSubschema, Subschema};
use crate::types::{join_path, SchemaType, TypeMatch};
use crate::value::Value;

#[derive(Debug, Clone)]
pub struct OrType {
    name: String,
}

impl OrType {
    pub fn new() -> Self {
        Self::named("or")
    }

    pub fn named<N: Into<String>>(name: N) -> Self {
        Self { name: name.into() }
    }
}

impl Default for OrType {
    fn default() -> Self {
        Self::new()
    }
}

fn alternatives(subschema: &Subschema) -> Result<&[Subschema]> {
    subschema
        .alternatives()
        .ok_or_else(|| SchemaError::new("Or schema must have alternatives field").into())
}

/// Trial outcome; only a batched validation failure counts as "does not fit"
fn fits(trial: Result<()>) -> Result<bool> {
    match trial {
        Ok(()) => Ok(true),
        Err(Error::Validation(_)) => Ok(false),
        Err(other) => Err(other),
    }
}

/// Pick the alternative of an `or` subschema that best fits `value`
pub fn resolve_alternative<'s>(
    value: &Value,
    subschema: &'s Subschema,
    registry: &SchemaRegistry,
) -> Result<&'s Subschema> {
    let alternatives = alternatives(subschema)?;
    let mut tiers: [Vec<&'s Subschema>; 4] = Default::default();
    for alternative in alternatives {
        let score = registry
            .type_for(alternative)?
            .check_type_match(value, alternative, registry);
        tiers[score as usize].push(alternative);
    }

    let mut candidates: &[&'s Subschema] = &[];
    for tier in [TypeMatch::Exact, TypeMatch::Coercible, TypeMatch::Complex] {
        match tiers[tier as usize].as_slice() {
            [] => continue,
            [only] => {
                trace!(type_name = only.type_name(), ?tier, "or resolved by type match");
                return Ok(*only);
            }
            many => {
                candidates = many;
                break;
            }
        }
    }
    let Some(first) = candidates.first().copied() else {
        trace!("no alternative matches, using the first one");
        return Ok(&alternatives[0]);
    };

    let strict = NormalizeOptions::default();
    for &candidate in candidates {
        if fits(validate_subschema(registry, candidate, value, &strict))? {
            trace!(type_name = candidate.type_name(), "or resolved by validation");
            return Ok(candidate);
        }
    }
    for &candidate in candidates {
        if fits(normalize_subschema(registry, candidate, value.clone(), &strict).map(drop))? {
            trace!(type_name = candidate.type_name(), "or resolved by normalization");
            return Ok(candidate);
        }
    }
    let relaxed = NormalizeOptions::default().with_allow_unknown_fields();
    for &candidate in candidates {
        if fits(normalize_subschema(registry, candidate, value.clone(), &relaxed).map(drop))? {
            trace!(type_name = candidate.type_name(), "or resolved by relaxed normalization");
            return Ok(candidate);
        }
    }
    Ok(first)
}

#[async_trait]
impl SchemaType for OrType {
    fn name(&self) -> &str {
        &self.name
    }

    fn normalize_schema(
        &self,
        mut raw: RawSubschema,
        normalizer: &SchemaNormalizer<'_>,
    ) -> std::result::Result<Subschema, SchemaError> {
        let Some(SchemaData::Array(items)) = raw.take("alternatives") else {
            return Err(SchemaError::new("Or schema must have alternatives field"));
        };
        if items.len() < 2 {
            return Err(SchemaError::new("Or schema must have at least 2 options"));
        }
        let normalized = items
            .into_iter()
            .enumerate()
            .map(|(index, item)| normalizer.normalize_required(Some(item), &format!("Or alternative {}", index)))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        let mut subschema = Subschema::from_raw(self.name(), raw)?;
        subschema.insert("alternatives", Attribute::Alternatives(normalized));
        Ok(subschema)
    }

    fn traverse_schema(
        &self,
        subschema: &Subschema,
        path: &str,
        raw_path: &str,
        walker: &mut SchemaTraversal<'_>,
    ) -> Result<()> {
        for (index, alternative) in subschema.alternatives().unwrap_or_default().iter().enumerate() {
            let raw = join_path(raw_path, &format!("alternatives.{}", index));
            walker.traverse_subschema(alternative, path, &raw)?;
        }
        Ok(())
    }

    /// The first alternative that has the component
    fn get_field_subschema<'s>(
        &'s self,
        subschema: &'s Subschema,
        component: &str,
        registry: &'s SchemaRegistry,
    ) -> Option<&'s Subschema> {
        subschema.alternatives()?.iter().find_map(|alternative| {
            registry
                .type_for(alternative)
                .ok()?
                .get_field_subschema(alternative, component, registry)
        })
    }

    fn traverse(&self, value: &Value, subschema: &Subschema, field: &str, engine: &mut Traversal<'_>) -> Result<()> {
        let alternative = resolve_alternative(value, subschema, engine.registry())?;
        engine.traverse_value(Some(value), Some(alternative), field)
    }

    async fn traverse_async(
        &self,
        value: &Value,
        subschema: &Subschema,
        field: &str,
        engine: &mut AsyncTraversal<'_>,
    ) -> Result<()> {
        let alternative = resolve_alternative(value, subschema, engine.registry())?;
        engine.traverse_value(Some(value), Some(alternative), field).await
    }

    fn transform(
        &self,
        value: Value,
        subschema: &Subschema,
        field: &str,
        engine: &mut Transformer<'_>,
    ) -> Result<Transformed> {
        let alternative = resolve_alternative(&value, subschema, engine.registry())?;
        engine.transform_value(Some(value), Some(alternative), field)
    }

    async fn transform_async(
        &self,
        value: Value,
        subschema: &Subschema,
        field: &str,
        engine: &mut AsyncTransformer<'_>,
    ) -> Result<Transformed> {
        let alternative = resolve_alternative(&value, subschema, engine.registry())?;
        engine.transform_value(Some(value), Some(alternative), field).await
    }

    fn check_type_match(&self, value: &Value, subschema: &Subschema, registry: &SchemaRegistry) -> TypeMatch {
        subschema
            .alternatives()
            .unwrap_or_default()
            .iter()
            .filter_map(|alternative| {
                registry
                    .type_for(alternative)
                    .ok()
                    .map(|t| t.check_type_match(value, alternative, registry))
            })
            .max()
            .unwrap_or(TypeMatch::NoMatch)
    }

    fn to_json_schema(&self, subschema: &Subschema, ctx: &mut JsonSchemaContext<'_>) -> Result<serde_json::Value> {
        let any_of = subschema
            .alternatives()
            .unwrap_or_default()
            .iter()
            .map(|alternative| ctx.subschema_to_json_schema(alternative))
            .collect::<Result<Vec<_>>>()?;
        Ok(serde_json::json!({ "anyOf": any_of }))
    }
}
