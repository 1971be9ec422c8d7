//! Dynamically-typed value tree
//!
//! [`Value`] is the sealed variant every engine in this crate walks. Callers
//! build it before entering the engine, usually from `serde_json::Value`, and
//! add the variants JSON cannot express themselves: dates, callables, class
//! instances and opaque symbols.
//!
//! Copyright (c) 2025 Reshape Team
//! Licensed under the Apache-2.0 license

use crate::kind::{classify, DataKind};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Field storage for objects and instances
pub type Map = BTreeMap<String, Value>;

/// A JSON-like value with dates, callables and class instances
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// Absent value
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Date(DateTime<Utc>),
    Array(Vec<Value>),
    /// Plain object
    Object(Map),
    /// Instance of a named class, iterated as a plain object by the mappers
    Instance(Instance),
    Function(Function),
    /// Opaque token with no coercion; classifies as [`DataKind::Unknown`]
    Symbol(String),
}

/// An object that belongs to a class other than the plain object type.
///
/// `primitive` is what the instance coerces to (`valueOf`): boxed scalars
/// carry their wrapped value, and classes with a numeric coercion carry a
/// number. Instances without one classify as objects.
#[derive(Debug, Clone, PartialEq)]
pub struct Instance {
    class: String,
    fields: Map,
    primitive: Option<Box<Value>>,
}

impl Instance {
    /// Create an empty instance of `class`
    pub fn new(class: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            fields: Map::new(),
            primitive: None,
        }
    }

    /// Box a scalar, the way `new String("x")` or `new Number(1)` would
    pub fn boxed(value: impl Into<Value>) -> Self {
        let value = value.into();
        let class = match value {
            Value::Bool(_) => "Boolean",
            Value::Number(_) => "Number",
            Value::String(_) => "String",
            _ => "Object",
        };
        Self::new(class).with_primitive(value)
    }

    /// Add an own field
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Set the value this instance coerces to
    pub fn with_primitive(mut self, value: impl Into<Value>) -> Self {
        self.primitive = Some(Box::new(value.into()));
        self
    }

    pub fn class(&self) -> &str {
        &self.class
    }

    pub fn fields(&self) -> &Map {
        &self.fields
    }

    pub fn into_fields(self) -> Map {
        self.fields
    }

    pub fn primitive(&self) -> Option<&Value> {
        self.primitive.as_deref()
    }
}

type Callable = dyn Fn(&[Value]) -> Value + Send + Sync;

/// A shared callable value. Two functions are equal only if they are the
/// same allocation.
#[derive(Clone)]
pub struct Function {
    name: Option<String>,
    inner: Arc<Callable>,
}

impl Function {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&[Value]) -> Value + Send + Sync + 'static,
    {
        Self {
            name: None,
            inner: Arc::new(f),
        }
    }

    pub fn named<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&[Value]) -> Value + Send + Sync + 'static,
    {
        Self {
            name: Some(name.into()),
            inner: Arc::new(f),
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn call(&self, args: &[Value]) -> Value {
        (self.inner)(args)
    }
}

impl PartialEq for Function {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "[Function: {}]", name),
            None => write!(f, "[Function (anonymous)]"),
        }
    }
}

impl Value {
    /// Semantic kind of this value, see [`classify`]
    pub fn kind(&self) -> DataKind {
        classify(self)
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Vec<Value>> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Fields of a plain object
    pub fn as_object(&self) -> Option<&Map> {
        match self {
            Value::Object(fields) => Some(fields),
            _ => None,
        }
    }

    /// Own fields of any object-typed value (plain object or instance)
    pub fn fields(&self) -> Option<&Map> {
        match self {
            Value::Object(fields) => Some(fields),
            Value::Instance(instance) => Some(instance.fields()),
            _ => None,
        }
    }

    /// Owned variant of [`Value::fields`]
    pub fn into_fields(self) -> Option<Map> {
        match self {
            Value::Object(fields) => Some(fields),
            Value::Instance(instance) => Some(instance.into_fields()),
            _ => None,
        }
    }

    /// Look up a property. Arrays answer to numeric keys.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Array(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
            other => other.fields().and_then(|fields| fields.get(key)),
        }
    }

    /// Numeric coercion. Values without one coerce to NaN.
    pub fn to_number(&self) -> f64 {
        match self {
            Value::Null => 0.0,
            Value::Bool(b) => f64::from(u8::from(*b)),
            Value::Number(n) => *n,
            Value::String(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    0.0
                } else {
                    trimmed.parse::<f64>().unwrap_or(f64::NAN)
                }
            }
            Value::Date(date) => date.timestamp_millis() as f64,
            Value::Instance(instance) => instance.primitive().map_or(f64::NAN, Value::to_number),
            _ => f64::NAN,
        }
    }

    /// Structural equality where NaN equals NaN.
    ///
    /// The derived `PartialEq` follows IEEE comparison, so a tree holding NaN
    /// is never equal to itself.
    pub fn same_value(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => a == b || (a.is_nan() && b.is_nan()),
            (Value::Array(a), Value::Array(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.same_value(y))
            }
            (Value::Object(a), Value::Object(b)) => same_fields(a, b),
            (Value::Instance(a), Value::Instance(b)) => {
                a.class == b.class
                    && same_fields(&a.fields, &b.fields)
                    && match (&a.primitive, &b.primitive) {
                        (Some(x), Some(y)) => x.same_value(y),
                        (None, None) => true,
                        _ => false,
                    }
            }
            (a, b) => a == b,
        }
    }

    /// Convert to `serde_json::Value`.
    ///
    /// Undefined values, functions and symbols are left out of objects and
    /// written as `null` inside arrays or at the root. Dates become RFC 3339
    /// strings, non-finite numbers become `null`.
    pub fn to_json(&self) -> serde_json::Value {
        self.to_json_opt().unwrap_or(serde_json::Value::Null)
    }

    fn to_json_opt(&self) -> Option<serde_json::Value> {
        use serde_json::Value as Json;

        match self {
            Value::Undefined | Value::Function(_) | Value::Symbol(_) => None,
            Value::Null => Some(Json::Null),
            Value::Bool(b) => Some(Json::Bool(*b)),
            Value::Number(n) => Some(number_to_json(*n)),
            Value::String(s) => Some(Json::String(s.clone())),
            Value::Date(date) => Some(Json::String(date.to_rfc3339_opts(SecondsFormat::Millis, true))),
            Value::Array(items) => Some(Json::Array(items.iter().map(Value::to_json).collect())),
            Value::Object(fields) => Some(fields_to_json(fields)),
            Value::Instance(instance) => match instance.primitive() {
                Some(primitive) => primitive.to_json_opt(),
                None => Some(fields_to_json(instance.fields())),
            },
        }
    }
}

fn same_fields(a: &Map, b: &Map) -> bool {
    a.len() == b.len()
        && a.iter()
            .zip(b)
            .all(|((ka, va), (kb, vb))| ka == kb && va.same_value(vb))
}

fn number_to_json(n: f64) -> serde_json::Value {
    // integral values stay integers so they compare equal to `json!` literals
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 9_007_199_254_740_992.0 {
        return serde_json::Value::from(n as i64);
    }
    serde_json::Number::from_f64(n).map_or(serde_json::Value::Null, serde_json::Value::Number)
}

fn fields_to_json(fields: &Map) -> serde_json::Value {
    let object = fields
        .iter()
        .filter_map(|(key, value)| value.to_json_opt().map(|json| (key.clone(), json)))
        .collect();
    serde_json::Value::Object(object)
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => write!(f, "undefined"),
            Value::Function(func) => write!(f, "{:?}", func),
            Value::Symbol(name) => write!(f, "Symbol({})", name),
            Value::Number(n) if n.is_nan() => write!(f, "NaN"),
            Value::Number(n) if n.is_infinite() => {
                write!(f, "{}Infinity", if *n < 0.0 { "-" } else { "" })
            }
            other => write!(f, "{}", other.to_json()),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        use serde_json::Value as Json;

        match json {
            Json::Null => Value::Null,
            Json::Bool(b) => Value::Bool(b),
            Json::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            Json::String(s) => Value::String(s),
            Json::Array(items) => Value::Array(items.into_iter().map(Value::from).collect()),
            Json::Object(fields) => {
                Value::Object(fields.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

macro_rules! impl_from_number {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(n: $ty) -> Self {
                    Value::Number(n as f64)
                }
            }
        )*
    };
}

impl_from_number!(f64, f32, i8, i16, i32, i64, u8, u16, u32, u64, usize, isize);

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(date: DateTime<Utc>) -> Self {
        Value::Date(date)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl From<Map> for Value {
    fn from(fields: Map) -> Self {
        Value::Object(fields)
    }
}

impl From<Instance> for Value {
    fn from(instance: Instance) -> Self {
        Value::Instance(instance)
    }
}

impl From<Function> for Value {
    fn from(func: Function) -> Self {
        Value::Function(func)
    }
}

impl FromIterator<(String, Value)> for Value {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Value::Object(iter.into_iter().collect())
    }
}
