//! Runtime type classification
//!
//! Copyright (c) 2025 Reshape Team
//! Licensed under the Apache-2.0 license

use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Semantic kind of a [`Value`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DataKind {
    String,
    Number,
    Boolean,
    Function,
    Null,
    Undefined,
    Date,
    Array,
    Object,
    Unknown,
}

impl DataKind {
    /// Every kind, in declaration order
    pub const ALL: [DataKind; 10] = [
        DataKind::String,
        DataKind::Number,
        DataKind::Boolean,
        DataKind::Function,
        DataKind::Null,
        DataKind::Undefined,
        DataKind::Date,
        DataKind::Array,
        DataKind::Object,
        DataKind::Unknown,
    ];

    /// Kinds the dispatch mapper recurses into
    pub fn is_container(self) -> bool {
        matches!(self, DataKind::Array | DataKind::Object)
    }
}

impl fmt::Display for DataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DataKind::String => "String",
            DataKind::Number => "Number",
            DataKind::Boolean => "Boolean",
            DataKind::Function => "Function",
            DataKind::Null => "Null",
            DataKind::Undefined => "Undefined",
            DataKind::Date => "Date",
            DataKind::Array => "Array",
            DataKind::Object => "Object",
            DataKind::Unknown => "Unknown",
        };
        write!(f, "{}", name)
    }
}

/// Classify a value.
///
/// The order of the checks decides ambiguous cases and must not change:
/// boxed booleans and strings are caught before the numeric-coercion test,
/// so only genuinely numeric instances land on [`DataKind::Number`].
pub fn classify(value: &Value) -> DataKind {
    if value.is_null() {
        return DataKind::Null;
    }

    if value.is_undefined() {
        return DataKind::Undefined;
    }

    if matches!(primitive(value), Value::Bool(_)) {
        return DataKind::Boolean;
    }

    if matches!(value, Value::Array(_)) {
        return DataKind::Array;
    }

    if matches!(value, Value::Date(_)) {
        return DataKind::Date;
    }

    if matches!(primitive(value), Value::String(_)) {
        return DataKind::String;
    }

    if matches!(primitive(value), Value::Number(_)) || coerces_to_number(value) {
        return DataKind::Number;
    }

    if matches!(value, Value::Function(_)) {
        return DataKind::Function;
    }

    if matches!(value, Value::Object(_) | Value::Instance(_)) {
        return DataKind::Object;
    }

    DataKind::Unknown
}

/// The value itself, or the scalar a boxing instance wraps
fn primitive(value: &Value) -> &Value {
    match value {
        Value::Instance(instance) => match instance.primitive() {
            Some(inner @ (Value::Bool(_) | Value::String(_) | Value::Number(_))) => inner,
            _ => value,
        },
        _ => value,
    }
}

// only instances with a primitive coercion can get here with a numeric value;
// plain objects, functions and symbols coerce to NaN
fn coerces_to_number(value: &Value) -> bool {
    match value {
        Value::Instance(instance) => instance.primitive().is_some() && !value.to_number().is_nan(),
        _ => false,
    }
}
