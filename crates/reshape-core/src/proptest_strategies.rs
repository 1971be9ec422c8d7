//! Property-based testing strategies for generating test data
//!
//! This module provides proptest strategies for generating random value
//! trees and descriptors for property testing.
//!
//! Copyright (c) 2025 Reshape Team
//! Licensed under the Apache-2.0 license

#![cfg(test)]

use crate::extract::Extraction;
use crate::kind::DataKind;
use crate::value::{Instance, Map, Value};
use chrono::{TimeZone, Utc};
use proptest::collection::{btree_map, vec};
use proptest::prelude::*;

/// Strategy for generating object keys
pub fn field_name_strategy() -> impl Strategy<Value = String> {
    "[a-z_][a-z0-9_]{0,8}"
}

/// Strategy for generating numbers, NaN and the infinities included
pub fn number_strategy() -> impl Strategy<Value = f64> {
    prop_oneof![
        4 => any::<i32>().prop_map(f64::from),
        4 => -1.0e9f64..1.0e9,
        1 => Just(f64::NAN),
        1 => Just(f64::INFINITY),
        1 => Just(f64::NEG_INFINITY),
    ]
}

/// Strategy for generating scalar values, dates included
pub fn scalar_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        Just(Value::Undefined),
        any::<bool>().prop_map(Value::Bool),
        number_strategy().prop_map(Value::Number),
        "[a-zA-Z0-9 ]{0,20}".prop_map(Value::String),
        (0i64..4_000_000_000).prop_map(|secs| Value::Date(Utc.timestamp_opt(secs, 0).unwrap())),
    ]
}

/// Strategy for generating boxed scalars together with the scalar they wrap
pub fn boxed_scalar_strategy() -> impl Strategy<Value = (Value, Value)> {
    prop_oneof![
        any::<bool>().prop_map(Value::Bool),
        number_strategy().prop_map(Value::Number),
        "[a-zA-Z0-9 ]{0,20}".prop_map(Value::String),
    ]
    .prop_map(|scalar| (Value::from(Instance::boxed(scalar.clone())), scalar))
}

/// Strategy for generating value trees of plain objects and arrays
pub fn plain_value_strategy() -> impl Strategy<Value = Value> {
    scalar_strategy().prop_recursive(
        3,  // max depth
        24, // max size
        5,  // items per collection
        |inner| {
            prop_oneof![
                vec(inner.clone(), 0..5).prop_map(Value::Array),
                btree_map(field_name_strategy(), inner, 0..5).prop_map(Value::Object),
            ]
        },
    )
}

/// Strategy for generating value trees that may contain class instances
pub fn value_strategy() -> impl Strategy<Value = Value> {
    scalar_strategy().prop_recursive(3, 24, 5, |inner| {
        prop_oneof![
            vec(inner.clone(), 0..5).prop_map(Value::Array),
            btree_map(field_name_strategy(), inner.clone(), 0..5).prop_map(Value::Object),
            ("[A-Z][a-z]{2,8}", btree_map(field_name_strategy(), inner, 0..4)).prop_map(
                |(class, fields): (String, Map)| {
                    let instance = fields
                        .into_iter()
                        .fold(Instance::new(class), |instance, (k, v)| instance.with_field(k, v));
                    Value::Instance(instance)
                }
            ),
        ]
    })
}

/// Strategy for generating data kinds
pub fn data_kind_strategy() -> impl Strategy<Value = DataKind> {
    proptest::sample::select(DataKind::ALL.to_vec())
}

/// Strategy for generating shallow extraction descriptors
pub fn extraction_strategy() -> impl Strategy<Value = Extraction> {
    let leaf = prop_oneof![
        any::<bool>().prop_map(Extraction::Keep),
        vec(field_name_strategy(), 0..3).prop_map(Extraction::Fields),
        field_name_strategy().prop_map(Extraction::Rename),
    ];

    leaf.prop_recursive(2, 12, 4, |inner| {
        prop_oneof![
            inner.clone().prop_map(Extraction::each),
            vec((field_name_strategy(), inner), 0..4).prop_map(Extraction::Nested),
        ]
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::Mapping;
    use crate::extract::extract;
    use crate::kind::classify;
    use crate::structured::{structured_map, Shape};

    proptest! {
        #[test]
        fn test_boxed_scalars_classify_as_their_primitive((boxed, scalar) in boxed_scalar_strategy()) {
            prop_assert_eq!(classify(&boxed), classify(&scalar));
        }

        #[test]
        fn test_every_value_has_one_kind(value in value_strategy()) {
            prop_assert!(DataKind::ALL.contains(&classify(&value)));
        }

        #[test]
        fn test_empty_mapping_is_identity(value in plain_value_strategy()) {
            prop_assert!(Mapping::new().map(value.clone()).same_value(&value));
        }

        #[test]
        fn test_unhandled_kind_is_untouched(value in plain_value_strategy(), kind in data_kind_strategy()) {
            let mapping = Mapping::new().on(kind, |_, _| Value::Symbol("hit".to_string()));
            if !plain_contains_kind(&value, kind) {
                prop_assert!(mapping.map(value.clone()).same_value(&value));
            }
        }

        #[test]
        fn test_keep_true_structured_is_identity(value in plain_value_strategy()) {
            let output = structured_map(value.clone(), &Shape::Keep(true)).unwrap();
            prop_assert!(output.same_value(&value));
        }

        #[test]
        fn test_keep_true_extraction_is_identity(value in value_strategy()) {
            let output = extract(value.clone(), &Extraction::Keep(true)).unwrap();
            prop_assert!(output.same_value(&value));
        }

        #[test]
        fn test_extraction_never_panics(value in plain_value_strategy(), extraction in extraction_strategy()) {
            let _ = extract(value, &extraction);
        }

        #[test]
        fn test_identity_object_rule_still_reaches_every_number(value in plain_value_strategy()) {
            let mapping = Mapping::new()
                .on(DataKind::Object, |obj, _| obj)
                .on(DataKind::Number, |_, _| Value::Symbol("seen".to_string()));

            let output = mapping.map(value.clone());
            prop_assert_eq!(count_kind(&output, DataKind::Number), 0);
            prop_assert_eq!(
                count_kind(&output, DataKind::Unknown),
                count_kind(&value, DataKind::Number)
            );
        }

        #[test]
        fn test_json_form_is_serializable(value in value_strategy()) {
            prop_assert!(serde_json::to_string(&value).is_ok());
        }
    }

    fn count_kind(value: &Value, kind: DataKind) -> usize {
        let own = usize::from(classify(value) == kind);
        own + match value {
            Value::Array(items) => items.iter().map(|item| count_kind(item, kind)).sum(),
            Value::Object(fields) => fields.values().map(|field| count_kind(field, kind)).sum(),
            _ => 0,
        }
    }

    fn plain_contains_kind(value: &Value, kind: DataKind) -> bool {
        if classify(value) == kind {
            return true;
        }
        match value {
            Value::Array(items) => items.iter().any(|item| plain_contains_kind(item, kind)),
            Value::Object(fields) => fields.values().any(|field| plain_contains_kind(field, kind)),
            _ => false,
        }
    }
}
