//! End-to-end normalization behaviour

mod common;

use chrono::{TimeZone, Utc};
use common::{doc, init_tracing};
use common_schema_core::{
    create_schema, map_of, or, or_of, Error, FieldContext, FieldError, FieldErrorCode, Hook, NormalizeOptions,
    SchemaData, Shorthand, Value,
};
use pretty_assertions::assert_eq;
use serde_json::json;

fn normalize(schema: &common_schema_core::Schema, value: Value) -> common_schema_core::Result<Value> {
    schema.normalize(value, &NormalizeOptions::default())
}

fn validation_message(err: Error) -> String {
    match err {
        Error::Validation(e) => e.message,
        other => panic!("expected a validation error, got {other:?}"),
    }
}

#[test]
fn test_raw_and_shorthand_string() {
    init_tracing();
    for schema in [
        create_schema(json!({"type": "string"})).unwrap(),
        create_schema(Shorthand::String).unwrap(),
    ] {
        assert_eq!(normalize(&schema, doc(json!("foo"))).unwrap(), doc(json!("foo")));
        assert_eq!(normalize(&schema, doc(json!(3))).unwrap(), doc(json!("3")));
        assert_eq!(normalize(&schema, doc(json!(false))).unwrap(), doc(json!("false")));
    }
}

#[test]
fn test_object_and_shorthand_object_agree() {
    let expanded = create_schema(json!({
        "type": "object",
        "properties": {"foo": {"type": "string"}, "bar": {"type": "string"}}
    }))
    .unwrap();
    let shorthand = create_schema(SchemaData::object([
        ("foo", Shorthand::String),
        ("bar", Shorthand::String),
    ]))
    .unwrap();
    assert_eq!(expanded.data(), shorthand.data());

    for schema in [&expanded, &shorthand] {
        assert_eq!(normalize(schema, doc(json!({"foo": 3}))).unwrap(), doc(json!({"foo": "3"})));
        assert_eq!(
            normalize(schema, doc(json!({"foo": 3, "bar": 3}))).unwrap(),
            doc(json!({"foo": "3", "bar": "3"}))
        );
        assert!(matches!(normalize(schema, doc(json!(3))), Err(Error::Validation(_))));
    }
}

#[test]
fn test_shorthand_type_values() {
    let schema = create_schema(SchemaData::object([(
        "type",
        SchemaData::object([("foo", Shorthand::Number)]),
    )]))
    .unwrap();
    assert_eq!(normalize(&schema, doc(json!({"foo": "3"}))).unwrap(), doc(json!({"foo": 3})));

    let schema = create_schema(SchemaData::object([("type", SchemaData::array([Shorthand::Number]))])).unwrap();
    assert_eq!(normalize(&schema, doc(json!(["3"]))).unwrap(), doc(json!([3])));
}

#[test]
fn test_string_constraints() {
    let schema = create_schema(json!({
        "type": "string",
        "minLength": 4,
        "maxLength": 8,
        "match": "foo"
    }))
    .unwrap();
    assert_eq!(normalize(&schema, doc(json!("fooa"))).unwrap(), doc(json!("fooa")));
    assert_eq!(normalize(&schema, doc(json!("fooasdfg"))).unwrap(), doc(json!("fooasdfg")));
    assert_eq!(validation_message(normalize(&schema, doc(json!("foo"))).unwrap_err()), "String is too short");
    assert_eq!(
        validation_message(normalize(&schema, doc(json!("fooasdfgh"))).unwrap_err()),
        "String is too long"
    );
    assert_eq!(validation_message(normalize(&schema, doc(json!("bara"))).unwrap_err()), "String does not match");
}

#[test]
fn test_required_and_unknown_field_policies() {
    let schema = create_schema(json!({"foo": {"type": "string", "required": true}})).unwrap();

    assert_eq!(normalize(&schema, doc(json!({"foo": 3}))).unwrap(), doc(json!({"foo": "3"})));

    let err = normalize(&schema, doc(json!({}))).unwrap_err();
    let err = err.as_validation_error().unwrap();
    assert_eq!(err.field_errors[0].code, FieldErrorCode::Required);
    assert_eq!(err.field_errors[0].field.as_deref(), Some("foo"));

    let err = normalize(&schema, doc(json!({"foo": 3, "bar": 3}))).unwrap_err();
    assert_eq!(
        err.as_validation_error().unwrap().field_errors[0].code,
        FieldErrorCode::UnknownField
    );

    let allow_unknown = NormalizeOptions::default().with_allow_unknown_fields();
    assert_eq!(
        schema.normalize(doc(json!({"foo": 3, "bar": 3})), &allow_unknown).unwrap(),
        doc(json!({"foo": "3", "bar": 3}))
    );

    let allow_missing = NormalizeOptions::default().with_allow_missing_fields();
    assert_eq!(schema.normalize(doc(json!({})), &allow_missing).unwrap(), doc(json!({})));

    let remove_unknown = NormalizeOptions::default().with_remove_unknown_fields();
    assert_eq!(
        schema.normalize(doc(json!({"foo": 3, "bar": 3})), &remove_unknown).unwrap(),
        doc(json!({"foo": "3"}))
    );
}

#[test]
fn test_array_of_strings() {
    let schema = create_schema(json!({"type": "array", "elements": {"type": "string"}})).unwrap();
    assert_eq!(normalize(&schema, doc(json!([2, 3]))).unwrap(), doc(json!(["2", "3"])));
    assert!(schema.validate(&doc(json!([2, 3])), &Default::default()).is_err());
    assert!(matches!(normalize(&schema, doc(json!({}))), Err(Error::Validation(_))));

    let schema = create_schema(SchemaData::array([Shorthand::String])).unwrap();
    assert_eq!(normalize(&schema, doc(json!([]))).unwrap(), doc(json!([])));
    assert_eq!(normalize(&schema, doc(json!([3]))).unwrap(), doc(json!(["3"])));
}

#[test]
fn test_nested_shorthand_array() {
    let schema = create_schema(json!({"foo": [{"bar": "string"}]})).unwrap();
    assert_eq!(
        normalize(&schema, doc(json!({"foo": [{"bar": 3}, {"bar": 4}]}))).unwrap(),
        doc(json!({"foo": [{"bar": "3"}, {"bar": "4"}]}))
    );
}

#[test]
fn test_map_values() {
    let schema = create_schema(map_of(Shorthand::String)).unwrap();
    assert_eq!(
        normalize(&schema, doc(json!({"foo": 5, "bar": 6, "baz": 7}))).unwrap(),
        doc(json!({"foo": "5", "bar": "6", "baz": "7"}))
    );
}

#[test]
fn test_enum() {
    let schema = create_schema(json!({"type": "string", "enum": ["foo", "bar", "1"]})).unwrap();
    assert_eq!(normalize(&schema, doc(json!("foo"))).unwrap(), doc(json!("foo")));
    assert_eq!(normalize(&schema, doc(json!(1))).unwrap(), doc(json!("1")));
    let err = normalize(&schema, doc(json!("baz"))).unwrap_err();
    let err = err.as_validation_error().unwrap();
    assert_eq!(err.field_errors[0].code, FieldErrorCode::Unrecognized);
    assert_eq!(
        err.field_errors[0].details,
        Some(doc(json!({"value": "baz", "enum": ["foo", "bar", "1"]})))
    );
}

#[test]
fn test_or_string_number() {
    let schema = create_schema(or_of(vec![Shorthand::String.into(), Shorthand::Number.into()])).unwrap();
    assert_eq!(normalize(&schema, doc(json!("abc"))).unwrap(), doc(json!("abc")));
    assert_eq!(normalize(&schema, doc(json!(123))).unwrap(), doc(json!(123)));
    assert_eq!(normalize(&schema, doc(json!("123"))).unwrap(), doc(json!("123")));
    assert_eq!(normalize(&schema, doc(json!(true))).unwrap(), doc(json!("true")));

    let schema = create_schema(or(Shorthand::String, vec![Shorthand::Number.into()])).unwrap();
    assert_eq!(normalize(&schema, doc(json!(123))).unwrap(), doc(json!(123)));
}

#[test]
fn test_or_boolean_number() {
    let schema = create_schema(or_of(vec![Shorthand::Boolean.into(), Shorthand::Number.into()])).unwrap();
    assert_eq!(normalize(&schema, doc(json!(1))).unwrap(), doc(json!(1)));
    assert_eq!(normalize(&schema, doc(json!("1"))).unwrap(), doc(json!(true)));
    assert_eq!(normalize(&schema, doc(json!("2"))).unwrap(), doc(json!(2)));
    assert_eq!(normalize(&schema, doc(json!("true"))).unwrap(), doc(json!(true)));
    assert!(normalize(&schema, doc(json!("foo"))).is_err());
}

#[test]
fn test_or_boolean_number_string() {
    let schema = create_schema(or_of(vec![
        Shorthand::Boolean.into(),
        Shorthand::Number.into(),
        Shorthand::String.into(),
    ]))
    .unwrap();
    assert_eq!(normalize(&schema, doc(json!(1))).unwrap(), doc(json!(1)));
    assert_eq!(normalize(&schema, doc(json!("1"))).unwrap(), doc(json!("1")));
    assert_eq!(normalize(&schema, doc(json!("true"))).unwrap(), doc(json!("true")));
    assert_eq!(normalize(&schema, doc(json!(true))).unwrap(), doc(json!(true)));
    assert_eq!(normalize(&schema, doc(json!("foo"))).unwrap(), doc(json!("foo")));
}

#[test]
fn test_or_string_object() {
    let schema = create_schema(or_of(vec![
        Shorthand::String.into(),
        json!({"foo": {"type": "number", "required": true}, "bar": "number"}).into(),
    ]))
    .unwrap();
    assert_eq!(normalize(&schema, doc(json!({"foo": 123}))).unwrap(), doc(json!({"foo": 123})));
    assert_eq!(
        normalize(&schema, doc(json!({"foo": 1, "bar": "123"}))).unwrap(),
        doc(json!({"foo": 1, "bar": 123}))
    );
    assert_eq!(normalize(&schema, doc(json!(12))).unwrap(), doc(json!("12")));
    assert!(normalize(&schema, doc(json!({"bar": 123}))).is_err());
}

#[test]
fn test_or_object_object() {
    let schema = create_schema(or_of(vec![
        json!({"foo": {"bar": {"type": "string", "required": true}}}).into(),
        json!({"baz": {"qux": {"type": "string", "required": true}}}).into(),
    ]))
    .unwrap();
    assert_eq!(
        normalize(&schema, doc(json!({"foo": {"bar": "bar"}}))).unwrap(),
        doc(json!({"foo": {"bar": "bar"}}))
    );
    assert_eq!(
        normalize(&schema, doc(json!({"baz": {"qux": "qux"}}))).unwrap(),
        doc(json!({"baz": {"qux": "qux"}}))
    );
    assert!(normalize(&schema, doc(json!({"foo": {}}))).is_err());
}

#[test]
fn test_or_enums() {
    let schema = create_schema(or_of(vec![
        json!({"type": "string", "enum": ["foo"]}).into(),
        json!({"type": "string", "enum": ["bar"]}).into(),
    ]))
    .unwrap();
    assert_eq!(normalize(&schema, doc(json!("foo"))).unwrap(), doc(json!("foo")));
    assert_eq!(normalize(&schema, doc(json!("bar"))).unwrap(), doc(json!("bar")));
    assert!(normalize(&schema, doc(json!("qux"))).is_err());
}

#[test]
fn test_literal_default() {
    let schema = create_schema(json!({"foo": {"type": "string", "default": 5}})).unwrap();
    assert_eq!(normalize(&schema, doc(json!({}))).unwrap(), doc(json!({"foo": "5"})));
}

#[test]
fn test_number_bounds_and_custom_message() {
    let schema = create_schema(json!({"type": "number", "min": 5, "max": 10, "minError": "foobar"})).unwrap();
    assert_eq!(normalize(&schema, doc(json!(5))).unwrap(), doc(json!(5)));
    assert_eq!(normalize(&schema, doc(json!(10))).unwrap(), doc(json!(10)));
    assert_eq!(normalize(&schema, doc(json!("6.5"))).unwrap(), doc(json!(6.5)));
    assert!(normalize(&schema, doc(json!(""))).is_err());
    assert!(normalize(&schema, doc(json!("123a"))).is_err());
    assert_eq!(validation_message(normalize(&schema, doc(json!(11))).unwrap_err()), "Too large");
    assert_eq!(validation_message(normalize(&schema, doc(json!(4))).unwrap_err()), "foobar");
}

#[test]
fn test_date_bounds_and_default_producer() {
    let expected = Utc.with_ymd_and_hms(2014, 1, 1, 0, 0, 0).unwrap();
    let schema = create_schema(SchemaData::object([
        ("type", SchemaData::from(Shorthand::Date)),
        ("min", SchemaData::from(Utc.with_ymd_and_hms(2010, 1, 1, 0, 0, 0).unwrap())),
        ("max", SchemaData::from("2016-01-01T00:00:00Z")),
        ("default", Hook::default_value(move || Value::Date(expected)).into()),
    ]))
    .unwrap();

    assert_eq!(normalize(&schema, Value::Date(expected)).unwrap(), Value::Date(expected));
    assert_eq!(normalize(&schema, doc(json!(1388534400000i64))).unwrap(), Value::Date(expected));
    assert_eq!(normalize(&schema, doc(json!("2014-01-01T00:00:00Z"))).unwrap(), Value::Date(expected));
    assert_eq!(normalize(&schema, Value::Null).unwrap(), Value::Date(expected));
    assert!(normalize(&schema, doc(json!("2009-01-01T00:00:00Z"))).is_err());
    assert!(normalize(&schema, doc(json!("2017-01-01T00:00:00Z"))).is_err());
}

#[test]
fn test_binary_boolean_mixed() {
    let schema = create_schema(Shorthand::Binary).unwrap();
    let bytes = Value::Binary(vec![1, 2, 3, 4, 5]);
    assert_eq!(normalize(&schema, doc(json!("AQIDBAU="))).unwrap(), bytes);
    assert_eq!(normalize(&schema, doc(json!([1, 2, 3, 4, 5]))).unwrap(), bytes);
    assert_eq!(normalize(&schema, bytes.clone()).unwrap(), bytes);

    let schema = create_schema(Shorthand::Boolean).unwrap();
    assert_eq!(normalize(&schema, doc(json!(true))).unwrap(), doc(json!(true)));
    assert_eq!(normalize(&schema, doc(json!("false"))).unwrap(), doc(json!(false)));
    assert_eq!(normalize(&schema, doc(json!(0))).unwrap(), doc(json!(false)));
    assert!(normalize(&schema, doc(json!("zip"))).is_err());

    let schema = create_schema(Shorthand::Mixed).unwrap();
    let obj = doc(json!({"foo": 12, "bar": {"baz": "abc"}}));
    assert_eq!(normalize(&schema, obj.clone()).unwrap(), obj);
}

#[test]
fn test_or_date_string_takes_epoch_millis_as_date() {
    let schema = create_schema(or_of(vec![Shorthand::Date.into(), Shorthand::String.into()])).unwrap();
    let expected = Value::Date(Utc.with_ymd_and_hms(2014, 1, 1, 0, 0, 0).unwrap());
    assert_eq!(normalize(&schema, doc(json!(1388534400000i64))).unwrap(), expected);
    assert_eq!(normalize(&schema, doc(json!("abc"))).unwrap(), doc(json!("abc")));
}

#[test]
fn test_or_binary_number_accepts_unpadded_base64() {
    let schema = create_schema(or_of(vec![Shorthand::Binary.into(), Shorthand::Number.into()])).unwrap();
    assert_eq!(normalize(&schema, doc(json!("AQIDBA"))).unwrap(), Value::Binary(vec![1, 2, 3, 4]));
    assert_eq!(normalize(&schema, doc(json!(12))).unwrap(), doc(json!(12)));
}

#[test]
fn test_declared_property_order_is_kept() {
    let schema = create_schema(json!({"zeta": "string", "alpha": "string"})).unwrap();
    let declared: Vec<&str> = schema.data().properties().unwrap().keys().map(String::as_str).collect();
    assert_eq!(declared, vec!["zeta", "alpha"]);

    let normalized = normalize(&schema, doc(json!({"alpha": 2, "zeta": 1}))).unwrap();
    let keys: Vec<&str> = normalized.as_object().unwrap().keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["zeta", "alpha"]);
}

#[test]
fn test_serialize_mixed() {
    let schema = create_schema(json!({
        "foo": "number",
        "bar": {"type": "mixed", "serializeMixed": true}
    }))
    .unwrap();
    let normalized = schema
        .normalize(
            doc(json!({"foo": 12, "bar": {"baz": "abc"}})),
            &NormalizeOptions::default().with_serialize(),
        )
        .unwrap();
    assert_eq!(normalized, doc(json!({"foo": 12, "bar": "{\"baz\":\"abc\"}"})));
}

#[test]
fn test_geopoint_and_geojson() {
    let schema = create_schema("geopoint").unwrap();
    assert_eq!(normalize(&schema, doc(json!([-102, 78]))).unwrap(), doc(json!([-102, 78])));
    assert_eq!(normalize(&schema, doc(json!(["-102", "78"]))).unwrap(), doc(json!([-102, 78])));
    assert_eq!(normalize(&schema, doc(json!("-102,78"))).unwrap(), doc(json!([-102, 78])));
    assert!(normalize(&schema, doc(json!([-181, 78]))).is_err());
    assert!(normalize(&schema, doc(json!(true))).is_err());

    let schema = create_schema("geojson").unwrap();
    assert_eq!(
        normalize(&schema, doc(json!({"type": "Point", "coordinates": ["12", "12"]}))).unwrap(),
        doc(json!({"type": "Point", "coordinates": [12, 12]}))
    );
    assert_eq!(
        normalize(
            &schema,
            doc(json!({
                "type": "GeometryCollection",
                "geometries": [{
                    "type": "Polygon",
                    "coordinates": [[[12, 12], "13,13", [13, 12], [12, 12]]]
                }]
            }))
        )
        .unwrap(),
        doc(json!({
            "type": "GeometryCollection",
            "geometries": [{
                "type": "Polygon",
                "coordinates": [[[12, 12], [13, 13], [13, 12], [12, 12]]]
            }]
        }))
    );
}

#[test]
fn test_custom_normalize_and_validate_hooks() {
    let schema = create_schema(SchemaData::object([
        ("type", SchemaData::from(Shorthand::String)),
        (
            "normalize",
            Hook::normalizer(|value: Value, _ctx: &FieldContext<'_>| {
                Ok(Value::String(format!("{}x", value.as_str().unwrap_or_default())))
            })
            .into(),
        ),
        (
            "validate",
            Hook::validator(|value: &Value, _ctx: &FieldContext<'_>| {
                if value.as_str().is_some_and(|s| s.starts_with('a')) {
                    Ok(())
                } else {
                    Err(FieldError::new(FieldErrorCode::Invalid, "Test validator").into())
                }
            })
            .into(),
        ),
    ]))
    .unwrap();
    assert_eq!(normalize(&schema, doc(json!("afoo"))).unwrap(), doc(json!("afoox")));
    assert_eq!(validation_message(normalize(&schema, doc(json!("foo"))).unwrap_err()), "Test validator");
}

#[test]
fn test_normalize_hook_runs_before_match() {
    let schema = create_schema(SchemaData::object([(
        "foo",
        SchemaData::object([
            ("type", SchemaData::from(Shorthand::String)),
            ("match", SchemaData::from("^[a-z]{2}$")),
            (
                "normalize",
                Hook::normalizer(|value: Value, _ctx: &FieldContext<'_>| match value {
                    Value::String(s) => Ok(Value::String(s.to_lowercase())),
                    _ => Err(Error::handler("Not a string")),
                })
                .into(),
            ),
        ]),
    )]))
    .unwrap();
    assert_eq!(normalize(&schema, doc(json!({"foo": "US"}))).unwrap(), doc(json!({"foo": "us"})));
    // handler failures are not field errors and abort the run
    assert!(matches!(normalize(&schema, doc(json!({"foo": 5}))), Err(Error::Handler { .. })));
}
