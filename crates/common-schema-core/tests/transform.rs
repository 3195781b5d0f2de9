//! Synchronous traversal and transform engines

mod common;

use common::{doc, init_tracing};
use common_schema_core::{
    create_schema, Result, SchemaType, Subschema, TransformHandlers, Transformed, TraverseHandlers, Value,
};
use pretty_assertions::assert_eq;
use serde_json::json;

#[derive(Default)]
struct Recorder {
    fields: Vec<(String, String)>,
    unknown: Vec<String>,
}

impl TraverseHandlers for Recorder {
    fn on_field(
        &mut self,
        field: &str,
        value: Option<&Value>,
        subschema: &Subschema,
        _schema_type: &dyn SchemaType,
    ) -> Result<bool> {
        self.fields.push((field.to_string(), subschema.type_name().to_string()));
        Ok(value.and_then(Value::as_str) != Some("stop"))
    }

    fn on_unknown_field(&mut self, field: &str, _value: &Value) -> Result<()> {
        self.unknown.push(field.to_string());
        Ok(())
    }
}

#[test]
fn test_traverse_visits_declared_and_unknown_fields() {
    init_tracing();
    let schema = create_schema(json!({
        "foo": {"bar": "number"},
        "list": ["string"],
        "absent": "string"
    }))
    .unwrap();
    let mut recorder = Recorder::default();
    schema
        .traverse(&doc(json!({"foo": {"bar": 1, "x": 2}, "list": ["a", "b"], "y": null})), &mut recorder)
        .unwrap();

    let visited: Vec<(&str, &str)> = recorder.fields.iter().map(|(f, t)| (f.as_str(), t.as_str())).collect();
    assert_eq!(
        visited,
        vec![
            ("", "object"),
            ("foo", "object"),
            ("foo.bar", "number"),
            ("list", "array"),
            ("list.0", "string"),
            ("list.1", "string"),
            ("absent", "string"),
        ]
    );
    assert_eq!(recorder.unknown, vec!["foo.x", "y"]);
}

/// Drops odd numbers, bumps the rest, counts post-field calls
#[derive(Default)]
struct DropOdd {
    post_calls: usize,
}

impl TransformHandlers for DropOdd {
    fn on_field(
        &mut self,
        _field: &str,
        value: Option<Value>,
        _subschema: &Subschema,
        _schema_type: &dyn SchemaType,
    ) -> Result<Transformed> {
        Ok(match value {
            Some(Value::Number(n)) if n % 2.0 != 0.0 => Transformed::Remove,
            Some(Value::Number(n)) => Transformed::Keep(Value::Number(n + 100.0)),
            other => other.into(),
        })
    }

    fn on_unknown_field(&mut self, _field: &str, _value: Value) -> Result<Transformed> {
        Ok(Transformed::Remove)
    }

    fn post_field(
        &mut self,
        _field: &str,
        value: Value,
        _subschema: &Subschema,
        _schema_type: &dyn SchemaType,
    ) -> Result<Transformed> {
        self.post_calls += 1;
        Ok(Transformed::Keep(value))
    }
}

#[test]
fn test_transform_compacts_arrays() {
    let schema = create_schema(json!({"nums": ["number"], "m": {"type": "map", "values": "number"}})).unwrap();
    let mut handlers = DropOdd::default();
    let result = schema
        .transform(
            doc(json!({"nums": [1, 2, 3, 4], "m": {"a": 1, "b": 2}, "junk": true})),
            &mut handlers,
        )
        .unwrap();
    assert_eq!(
        result,
        Transformed::Keep(doc(json!({"nums": [102, 104], "m": {"b": 102}})))
    );
    // root, nums, two kept elements, m, one kept entry
    assert_eq!(handlers.post_calls, 6);
}

#[test]
fn test_transform_can_remove_root() {
    struct RemoveAll;
    impl TransformHandlers for RemoveAll {
        fn on_field(
            &mut self,
            _field: &str,
            _value: Option<Value>,
            _subschema: &Subschema,
            _schema_type: &dyn SchemaType,
        ) -> Result<Transformed> {
            Ok(Transformed::Remove)
        }
    }

    let schema = create_schema(json!({"a": "string"})).unwrap();
    let result = schema.transform(doc(json!({"a": "x"})), &mut RemoveAll).unwrap();
    assert!(result.is_remove());
}

#[test]
fn test_or_nodes_report_the_field_twice() {
    let schema = create_schema(common_schema_core::or_of(vec![
        "number".into(),
        json!({"x": "string"}).into(),
    ]))
    .unwrap();
    let mut recorder = Recorder::default();
    schema.traverse(&doc(json!({"x": "a"})), &mut recorder).unwrap();
    let visited: Vec<(&str, &str)> = recorder.fields.iter().map(|(f, t)| (f.as_str(), t.as_str())).collect();
    assert_eq!(visited, vec![("", "or"), ("", "object"), ("x", "string")]);
}
