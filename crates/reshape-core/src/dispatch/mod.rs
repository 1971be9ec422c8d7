//! Type-dispatch mapper
//!
//! Walks an arbitrary value tree and rewrites it according to a [`Mapping`]:
//! custom predicate/transform rules first, then a per-kind transform, then
//! structural recursion into arrays and objects. Mapping never fails; every
//! kind without a rule is returned as is.
//!
//! # Module Organization
//!
//! - [`types`] - visit context and rule types
//! - [`mapping`] - the rule table and its builder
//!
//! # Examples
//!
//! ```
//! use reshape_core::{map, DataKind, Mapping, Value};
//! use serde_json::json;
//!
//! let double = Mapping::new().on(DataKind::Number, |n, _| Value::from(n.to_number() * 2.0));
//!
//! let output = map(Value::from(json!({"foo": {"bar": 22}})), &double);
//! assert_eq!(output.to_json(), json!({"foo": {"bar": 44}}));
//! ```
//!
//! Custom rules see the field key and the contextual key of every node:
//!
//! ```
//! use reshape_core::{Mapping, Value};
//! use serde_json::json;
//!
//! let mapping = Mapping::new().custom(
//!     |_, _, visit| visit.path == Some("bar.baz"),
//!     |v, _, _| Value::from(v.to_number() * 4.0),
//! );
//!
//! let output = mapping.map(Value::from(json!({"bar": {"baz": 1, "bat": 1}})));
//! assert_eq!(output.to_json(), json!({"bar": {"baz": 4, "bat": 1}}));
//! ```
//!
//! Copyright (c) 2025 Reshape Team
//! Licensed under the Apache-2.0 license

pub mod mapping;
pub mod types;

mod walker;

#[cfg(test)]
mod tests;

pub use mapping::Mapping;
pub use types::{CustomRule, KindTransform, RulePredicate, RuleTransform, Visit};

use crate::value::Value;

/// Rewrite `value` according to `mapping`. See [`Mapping::map`].
pub fn map(value: Value, mapping: &Mapping) -> Value {
    mapping.map(value)
}
