//! Reshape Core - Declarative transformation of dynamically-typed value trees
//!
//! This crate rewrites [`Value`] trees according to caller-supplied
//! descriptors instead of hand-written traversal code.
//!
//! # Main Components
//!
//! - **Classification**: [`classify`] assigns every value one [`DataKind`]
//! - **Type-dispatch mapping**: [`map`] rewrites every node of a given kind,
//!   or every node matching a custom predicate, anywhere in the tree
//! - **Structured mapping**: [`structured_map`] follows a [`Shape`] that
//!   mirrors the desired output and fails on input that does not fit
//! - **Extraction**: [`extract`] whitelists fields, optionally renaming or
//!   transforming them
//! - **Error Handling**: one error type built with `thiserror`
//!
//! # Example
//!
//! ```
//! use reshape_core::{map, structured_map, DataKind, Mapping, Result, Structure, Value};
//! use serde_json::json;
//!
//! fn example() -> Result<()> {
//!     let input = Value::from(json!({"id": 1, "score": 21, "secret": "x"}));
//!
//!     let doubled = map(
//!         input,
//!         &Mapping::new().on(DataKind::Number, |n, _| Value::from(n.to_number() * 2.0)),
//!     );
//!
//!     let shape = Structure::new().field("id", true).field("score", true);
//!     let output = structured_map(doubled, &shape.into())?;
//!
//!     assert_eq!(output.to_json(), json!({"id": 2, "score": 42}));
//!     Ok(())
//! }
//! # example().unwrap();
//! ```
//!
//! Copyright (c) 2025 Reshape Team
//! Licensed under the Apache-2.0 license

pub mod diagnostics;
pub mod dispatch;
pub mod error;
pub mod extract;
pub mod kind;
pub mod structured;
pub mod value;

#[cfg(test)]
mod proptest_strategies;

// Re-export main types for convenience
pub use diagnostics::{Diagnostic, DiagnosticCode, MapReport};
pub use dispatch::{map, CustomRule, Mapping, Visit};
pub use error::{Error, Result};
pub use extract::{extract, rename, transform, ExtractFn, Extraction};
pub use kind::{classify, DataKind};
pub use structured::{structured_map, structured_map_into, Leaf, Shape, Structure};
pub use value::{Function, Instance, Map, Value};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
