//! Asynchronous traversal and transform engines

mod common;

use std::time::Duration;

use async_trait::async_trait;
use common::{doc, init_tracing};
use common_schema_core::{
    create_schema, map_of, or_of, AsyncTransformHandlers, AsyncTraverseHandlers, NormalizeOptions, Result,
    SchemaData, SchemaType, Shorthand, Subschema, Transformed, Value,
};
use pretty_assertions::assert_eq;
use serde_json::json;

async fn tick() {
    tokio::time::sleep(Duration::from_millis(1)).await;
}

fn mark(value: Value, key: &str) -> Value {
    match value {
        Value::Object(mut map) => {
            map.insert(key.to_string(), Value::Bool(true));
            Value::Object(map)
        }
        other => other,
    }
}

struct AddThing;

#[async_trait]
impl AsyncTransformHandlers for AddThing {
    async fn on_field(
        &mut self,
        _field: &str,
        value: Option<Value>,
        _subschema: &Subschema,
        _schema_type: &dyn SchemaType,
    ) -> Result<Transformed> {
        tick().await;
        Ok(value.map(|v| mark(v, "addedThing")).into())
    }
}

#[tokio::test]
async fn test_on_field_sees_values_before_children() {
    init_tracing();
    let schema = create_schema(SchemaData::array([SchemaData::object([("foo", Shorthand::String)])])).unwrap();
    let result = schema
        .transform_async(doc(json!([{}, {"a": true}])), &mut AddThing)
        .await
        .unwrap();
    assert_eq!(
        result,
        Transformed::Keep(doc(json!([{"addedThing": true}, {"addedThing": true, "a": true}])))
    );
}

/// Prefixes strings and bumps numbers differently per callback
struct Decorate;

#[async_trait]
impl AsyncTransformHandlers for Decorate {
    async fn on_field(
        &mut self,
        _field: &str,
        value: Option<Value>,
        _subschema: &Subschema,
        _schema_type: &dyn SchemaType,
    ) -> Result<Transformed> {
        tick().await;
        Ok(value
            .map(|v| match v {
                Value::String(s) => Value::String(format!("a{s}")),
                Value::Number(n) => Value::Number(n + 1.0),
                other => mark(other, "addedThing"),
            })
            .into())
    }

    async fn on_unknown_field(&mut self, _field: &str, value: Value) -> Result<Transformed> {
        tick().await;
        Ok(Transformed::Keep(match value {
            Value::String(s) => Value::String(format!("b{s}")),
            Value::Number(n) => Value::Number(n + 2.0),
            other => mark(other, "addedThing2"),
        }))
    }

    async fn post_field(
        &mut self,
        _field: &str,
        value: Value,
        _subschema: &Subschema,
        _schema_type: &dyn SchemaType,
    ) -> Result<Transformed> {
        tick().await;
        Ok(Transformed::Keep(match value {
            Value::String(s) => Value::String(format!("c{s}")),
            Value::Number(n) => Value::Number(n + 4.0),
            other => mark(other, "addedThing3"),
        }))
    }
}

#[tokio::test]
async fn test_all_callbacks_in_order() {
    let schema = create_schema(SchemaData::object([
        ("foo", json!({"bar": "string", "baz": "number"}).into()),
        ("miss", SchemaData::from(Shorthand::Date)),
        ("map", map_of(Shorthand::Number)),
        ("boo", SchemaData::from(Shorthand::Boolean)),
        ("mix", SchemaData::from(Shorthand::Mixed)),
        (
            "o",
            or_of(vec![
                Shorthand::Number.into(),
                Shorthand::String.into(),
                json!({"qux": {"type": "number", "required": true}, "bam": "string"}).into(),
            ]),
        ),
    ]))
    .unwrap();

    let normalized = schema
        .normalize(
            doc(json!({
                "foo": {"bar": 8, "baz": "8"},
                "map": {"foo": 2, "bar": "4"},
                "boo": "yes",
                "mix": {"a": [1]},
                "o": {"qux": "4", "bam": "7"},
                "extraField": "foo"
            })),
            &NormalizeOptions::default().with_allow_unknown_fields(),
        )
        .unwrap();

    let result = schema.transform_async(normalized, &mut Decorate).await.unwrap();
    assert_eq!(
        result,
        Transformed::Keep(doc(json!({
            "foo": {"bar": "ca8", "baz": 13, "addedThing": true, "addedThing3": true},
            "map": {"foo": 7, "bar": 9, "addedThing": true, "addedThing3": true},
            "boo": true,
            "mix": {"a": [1], "addedThing": true, "addedThing3": true},
            "o": {"qux": 9, "bam": "ca7", "addedThing": true, "addedThing3": true},
            "extraField": "bfoo",
            "addedThing": true,
            "addedThing3": true
        })))
    );
}

#[derive(Default)]
struct Collect {
    seen: Vec<String>,
}

#[async_trait]
impl AsyncTraverseHandlers for Collect {
    async fn on_field(
        &mut self,
        field: &str,
        value: Option<&Value>,
        _subschema: &Subschema,
        _schema_type: &dyn SchemaType,
    ) -> Result<bool> {
        tick().await;
        if value.is_some() {
            self.seen.push(field.to_string());
        }
        Ok(true)
    }

    async fn on_unknown_field(&mut self, field: &str, _value: &Value) -> Result<()> {
        self.seen.push(format!("?{field}"));
        Ok(())
    }
}

#[tokio::test]
async fn test_traverse_async_is_sequential_depth_first() {
    let schema = create_schema(json!({"a": {"b": ["number"]}, "c": "string"})).unwrap();
    let mut collect = Collect::default();
    schema
        .traverse_async(&doc(json!({"a": {"b": [1, 2]}, "c": "x", "d": 0})), &mut collect)
        .await
        .unwrap();
    assert_eq!(collect.seen, vec!["", "a", "a.b", "a.b.0", "a.b.1", "c", "?d"]);
}
