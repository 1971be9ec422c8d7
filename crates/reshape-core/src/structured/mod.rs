//! Structured mapper
//!
//! Maps a value through a [`Shape`] that mirrors the desired output. Unlike
//! the type-dispatch mapper, structured mapping fails on input that does not
//! fit the shape: a required field that is missing, a scalar where an object
//! or array is expected, or a malformed array shorthand.
//!
//! # Module Organization
//!
//! - [`shape`] - shape descriptors and leaf modifiers
//! - `path` - terminal enumeration and output placement
//! - `mapper` - the evaluation engine
//! - `parse` - JSON descriptor loading ([`Shape::from_json`])
//!
//! # Examples
//!
//! ```
//! use reshape_core::{structured_map, Leaf, Shape, Structure, Value};
//! use serde_json::json;
//!
//! let shape = Structure::new()
//!     .field("id", true)
//!     .field("password", false)
//!     .field("name", Leaf::identity().rename("displayName"))
//!     .field("tags", Shape::each(Leaf::new(|v, _| {
//!         Value::from(v.as_str().unwrap_or_default().to_uppercase())
//!     })));
//!
//! let input = Value::from(json!({
//!     "id": 7,
//!     "password": "hunter2",
//!     "name": "Ada",
//!     "tags": ["a", "b"]
//! }));
//!
//! let output = structured_map(input, &shape.into()).unwrap();
//! assert_eq!(
//!     output.to_json(),
//!     json!({"id": 7, "displayName": "Ada", "tags": ["A", "B"]})
//! );
//! ```
//!
//! Copyright (c) 2025 Reshape Team
//! Licensed under the Apache-2.0 license

pub mod shape;

mod mapper;
mod parse;
mod path;


pub use shape::{Leaf, LeafFn, Shape, Structure};

use crate::error::Result;
use crate::value::Value;
use serde::de::DeserializeOwned;

/// Map `value` through `shape`.
///
/// A top-level `Keep(false)` or a missing optional leaf produce
/// [`Value::Undefined`].
pub fn structured_map(value: Value, shape: &Shape) -> Result<Value> {
    Ok(mapper::evaluate(value, shape, "")?.unwrap_or_default())
}

/// Map `value` through `shape` and deserialize the JSON form of the output
pub fn structured_map_into<T: DeserializeOwned>(value: Value, shape: &Shape) -> Result<T> {
    let output = structured_map(value, shape)?;
    Ok(serde_json::from_value(output.to_json())?)
}
