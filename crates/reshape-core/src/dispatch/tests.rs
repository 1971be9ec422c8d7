//! Tests for the type-dispatch mapper
//!
//! Copyright (c) 2025 Reshape Team
//! Licensed under the Apache-2.0 license

use super::*;
use crate::diagnostics::DiagnosticCode;
use crate::kind::DataKind;
use crate::value::{Function, Instance, Map};
use chrono::{Datelike, TimeZone, Utc};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::{Arc, Mutex};

fn v(json: serde_json::Value) -> Value {
    Value::from(json)
}

fn doubling() -> Mapping {
    Mapping::new().on(DataKind::Number, |n, _| Value::from(n.to_number() * 2.0))
}

#[test]
fn test_mapper_without_rules_is_identity() {
    let date = Utc.with_ymd_and_hms(1995, 12, 17, 3, 24, 0).unwrap();
    let func = Function::new(|_| Value::Null);
    let values = vec![
        v(json!(0)),
        v(json!(1)),
        v(json!(-1)),
        Value::from(f64::INFINITY),
        Value::from(f64::NEG_INFINITY),
        Value::Null,
        Value::Undefined,
        v(json!("")),
        v(json!("string")),
        Value::from(date),
        Value::Function(func),
        v(json!({})),
        v(json!({"foo": "bar"})),
        v(json!({"bar": {"baz": "foo"}, "foo": "baz"})),
    ];

    let mapping = Mapping::new();
    for value in values {
        assert_eq!(map(value.clone(), &mapping), value);
    }
}

#[test]
fn test_number_mapper() {
    let cases = vec![
        (json!({}), json!({})),
        (json!({"foo": "bar"}), json!({"foo": "bar"})),
        (json!({"foo": 0}), json!({"foo": 0})),
        (json!({"foo": 1}), json!({"foo": 2})),
        (json!({"foo": -1}), json!({"foo": -2})),
        (json!({"foo": {"bar": 22}}), json!({"foo": {"bar": 44}})),
    ];

    let mapping = doubling();
    for (input, expected) in cases {
        assert_eq!(mapping.map(v(input)).to_json(), expected);
    }

    let infinite = Value::Object(Map::from([("foo".to_string(), Value::from(f64::INFINITY))]));
    assert_eq!(mapping.map(infinite.clone()), infinite);
}

#[test]
fn test_string_mapper() {
    let mapping = Mapping::new().on(DataKind::String, |s, _| {
        Value::from(format!("prefixed {}", s.as_str().unwrap_or_default()))
    });

    assert_eq!(mapping.map(v(json!({"foo": 0}))).to_json(), json!({"foo": 0}));
    assert_eq!(
        mapping.map(v(json!({"foo": "bar"}))).to_json(),
        json!({"foo": "prefixed bar"})
    );
    assert_eq!(
        mapping.map(v(json!({"foo": {"bar": "foo"}}))).to_json(),
        json!({"foo": {"bar": "prefixed foo"}})
    );
}

#[test]
fn test_array_mapping() {
    let output = doubling().map(v(json!([0, 1, 2, 3])));
    assert_eq!(output.to_json(), json!([0, 2, 4, 6]));
}

#[test]
fn test_date_mapper() {
    let mapping = Mapping::new().on(DataKind::Date, |date, _| match date {
        Value::Date(d) => d.with_year(2000).map_or(Value::Date(d), Value::Date),
        other => other,
    });

    let before = Utc.with_ymd_and_hms(1995, 12, 17, 3, 24, 0).unwrap();
    let after = Utc.with_ymd_and_hms(2000, 12, 17, 3, 24, 0).unwrap();

    let input = Value::Object(Map::from([("foo".to_string(), Value::from(before))]));
    let expected = Value::Object(Map::from([("foo".to_string(), Value::from(after))]));
    assert_eq!(mapping.map(input), expected);
    assert_eq!(mapping.map(v(json!({"foo": 0}))).to_json(), json!({"foo": 0}));
}

#[test]
fn test_custom_rules_fold_in_order() {
    let mapping = Mapping::new()
        .custom(
            |_, kind, _| kind == DataKind::Number,
            |n, _, _| Value::from(n.to_number() * 2.0),
        )
        .custom(
            |_, _, visit| visit.key == Some("foo"),
            |n, _, _| Value::from(n.to_number() / 2.0),
        )
        .custom(
            |_, _, visit| visit.path == Some("bar.baz"),
            |n, _, _| Value::from(n.to_number() * 4.0),
        );

    let cases = vec![
        (json!({}), json!({})),
        (json!(1), json!(2)),
        (json!({"foo": 2}), json!({"foo": 2})),
        (json!({"foo": 1, "bar": 1}), json!({"foo": 1, "bar": 2})),
        (json!({"bar": {"baz": 1, "bat": 1}}), json!({"bar": {"baz": 8, "bat": 2}})),
    ];

    for (input, expected) in cases {
        assert_eq!(mapping.map(v(input)).to_json(), expected);
    }
}

#[test]
fn test_custom_rules_take_precedence_over_kind_rules() {
    let mapping = Mapping::new()
        .on(DataKind::String, |_, _| Value::from("kind"))
        .custom(|v, _, _| v.as_str() == Some("special"), |_, _, _| Value::from("custom"));

    assert_eq!(
        mapping.map(v(json!(["special", "plain"]))).to_json(),
        json!(["custom", "kind"])
    );
}

#[test]
fn test_date_parsing_custom_rule() {
    let mapping = Mapping::new().custom(
        |value, kind, _| {
            kind == DataKind::String
                && value
                    .as_str()
                    .is_some_and(|s| chrono::DateTime::parse_from_rfc3339(s).is_ok())
        },
        |value, _, _| {
            value
                .as_str()
                .and_then(|s| chrono::DateTime::parse_from_rfc3339(s).ok())
                .map_or(value.clone(), |d| Value::Date(d.with_timezone(&Utc)))
        },
    );

    let expected = Utc.with_ymd_and_hms(1995, 12, 17, 3, 24, 0).unwrap();
    assert_eq!(mapping.map(Value::from("1995-12-17T03:24:00Z")), Value::from(expected));
    assert_eq!(mapping.map(Value::from("plain string")), Value::from("plain string"));
}

#[test]
fn test_mapping_key() {
    let mapping = Mapping::new()
        .on(DataKind::String, |s, visit| match visit.key {
            Some(key) => Value::from(format!("{}: {}", key, s.as_str().unwrap_or_default())),
            None => s,
        })
        .custom(
            |_, _, visit| visit.key == Some("$key"),
            |s, _, _| Value::from(format!("KEY:{}", s.as_str().unwrap_or_default())),
        );

    assert_eq!(mapping.map(Value::from("raw")), Value::from("raw"));
    assert_eq!(mapping.map(v(json!({"str": "raw"}))).to_json(), json!({"str": "str: raw"}));
    assert_eq!(mapping.map(v(json!({"$key": "foo"}))).to_json(), json!({"$key": "KEY:foo"}));
}

#[test]
fn test_object_rule_returning_input_still_recurses() {
    let mapping = Mapping::new()
        .on(DataKind::Object, |obj, visit| {
            if visit.key == Some("foo") {
                Value::from("baz")
            } else {
                obj
            }
        })
        .on(DataKind::String, |_, _| Value::from("replaced"));

    let output = mapping.map(v(json!({"baz": "", "foo": {}, "bar": {"foo": {}}})));
    assert_eq!(
        output.to_json(),
        json!({"baz": "replaced", "foo": "baz", "bar": {"foo": "baz"}})
    );
}

#[test]
fn test_custom_rule_returning_object_input_still_recurses() {
    // the rule matches every object but hands it back untouched
    let mapping = Mapping::new()
        .custom(|_, kind, _| kind == DataKind::Object, |obj, _, _| obj)
        .on(DataKind::Number, |n, _| Value::from(n.to_number() + 1.0));

    assert_eq!(
        mapping.map(v(json!({"a": {"b": 1}}))).to_json(),
        json!({"a": {"b": 2}})
    );
}

#[test]
fn test_unchanged_object_with_nan_still_recurses() {
    let mapping = Mapping::new()
        .on(DataKind::Object, |obj, _| obj)
        .on(DataKind::Number, |n, _| Value::from(n.to_number() * 2.0));

    let input: Value = vec![
        ("a".to_string(), Value::from(f64::NAN)),
        ("b".to_string(), Value::from(1)),
    ]
    .into_iter()
    .collect();

    let output = mapping.map(input);
    assert!(output.get("a").and_then(Value::as_f64).is_some_and(f64::is_nan));
    assert_eq!(output.get("b"), Some(&Value::from(2)));
}

#[test]
fn test_key_rule_over_object_with_nan_still_recurses() {
    let mapping = Mapping::new()
        .custom(|_, _, visit| visit.key == Some("inner"), |obj, _, _| obj)
        .on(DataKind::Number, |n, _| Value::from(n.to_number() * 2.0));

    let inner: Value = vec![
        ("nan".to_string(), Value::from(f64::NAN)),
        ("x".to_string(), Value::from(21)),
    ]
    .into_iter()
    .collect();
    let input: Value = vec![("inner".to_string(), inner)].into_iter().collect();

    let output = mapping.map(input);
    assert_eq!(output.get("inner").and_then(|i| i.get("x")), Some(&Value::from(42)));
}

#[test]
fn test_custom_rule_replacing_object_stops_recursion() {
    let mapping = Mapping::new()
        .custom(
            |_, kind, visit| kind == DataKind::Object && visit.key == Some("a"),
            |_, _, _| v(json!({"b": 10})),
        )
        .on(DataKind::Number, |n, _| Value::from(n.to_number() + 1.0));

    assert_eq!(
        mapping.map(v(json!({"a": {"b": 1}, "c": 1}))).to_json(),
        json!({"a": {"b": 10}, "c": 2})
    );
}

#[test]
fn test_array_rule_returning_input_does_not_recurse() {
    let mapping = Mapping::new()
        .on(DataKind::Array, |arr, _| arr)
        .on(DataKind::Number, |n, _| Value::from(n.to_number() * 2.0));

    assert_eq!(mapping.map(v(json!([1, 2]))).to_json(), json!([1, 2]));
}

#[test]
fn test_contextual_keys() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);

    let mapping = Mapping::new().on(DataKind::String, move |s, visit| {
        sink.lock().unwrap().push(visit.path.unwrap_or_default().to_string());
        s
    });

    mapping.map(v(json!({
        "baz": "",
        "foo": "",
        "bar": {"foo": ""},
        "bao": {
            "boo": [
                {"baz": ""},
                {"baz": "", "joo": [{"pls": ""}]}
            ]
        }
    })));

    // fields are visited in key order
    assert_eq!(
        *seen.lock().unwrap(),
        vec![
            "bao.boo[0].baz",
            "bao.boo[1].baz",
            "bao.boo[1].joo[0].pls",
            "bar.foo",
            "baz",
            "foo",
        ]
    );
}

#[test]
fn test_array_elements_have_no_key() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);

    let mapping = Mapping::new().on(DataKind::Number, move |n, visit| {
        sink.lock()
            .unwrap()
            .push((visit.key.map(str::to_string), visit.path.map(str::to_string)));
        n
    });

    mapping.map(v(json!({"list": [1]})));
    mapping.map(v(json!([2])));

    assert_eq!(
        *seen.lock().unwrap(),
        vec![
            (None, Some("list[0]".to_string())),
            (None, Some("[0]".to_string())),
        ]
    );
}

#[test]
fn test_root_visit() {
    let mapping = Mapping::new().on(DataKind::Number, |n, visit| {
        assert!(visit.is_root());
        n
    });
    assert_eq!(mapping.map(Value::from(3)), Value::from(3));
}

#[test]
fn test_class_instances_are_flattened_with_diagnostics() {
    let mapping = Mapping::new();

    let report = mapping.map_with_report(Value::from(Instance::new("Testing").with_field("x", 1)));
    assert_eq!(report.value.to_json(), json!({"x": 1}));
    assert!(matches!(report.value, Value::Object(_)));
    assert_eq!(report.diagnostics.len(), 1);
    assert_eq!(report.diagnostics[0].code, DiagnosticCode::InstanceFlattened);
    assert_eq!(
        report.diagnostics[0].message,
        "Iterating over a Testing, which will lose your class instance type"
    );

    for class in ["Map", "Set"] {
        let report = mapping.map_with_report(Value::from(Instance::new(class)));
        assert_eq!(report.value, Value::Object(Map::new()));
        assert_eq!(
            report.diagnostics[0].message,
            format!("Iterating over a {}, which will lose your class instance type", class)
        );
    }
}

#[test]
fn test_nested_instance_diagnostic_path() {
    let input = Value::Object(Map::from([(
        "items".to_string(),
        Value::Array(vec![Value::from(Instance::new("Point").with_field("x", 1))]),
    )]));

    let report = doubling().map_with_report(input);
    assert_eq!(report.value.to_json(), json!({"items": [{"x": 2}]}));
    assert_eq!(report.diagnostics[0].path, "items[0]");
    assert!(!report.is_lossless());
}

#[test]
fn test_boxed_scalars_are_not_iterated() {
    let report = Mapping::new().map_with_report(Value::from(Instance::boxed("text")));
    assert!(report.is_lossless());
    assert_eq!(report.value, Value::from(Instance::boxed("text")));
}

#[test]
fn test_mapping_is_reusable_and_shareable() {
    let mapping = doubling();
    let shared = mapping.clone();

    let handle = std::thread::spawn(move || shared.map(Value::from(2)));
    assert_eq!(handle.join().unwrap(), Value::from(4));
    assert_eq!(mapping.map(Value::from(3)), Value::from(6));
    assert!(mapping.handles(DataKind::Number));
    assert!(!mapping.handles(DataKind::String));
    assert!(Mapping::new().is_empty());
}
