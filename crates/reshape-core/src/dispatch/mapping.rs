//! Rule table for the type-dispatch mapper
//!
//! A [`Mapping`] is built once with a fluent, consuming builder and reused
//! across any number of calls. Rules live behind `Arc`, so cloning a mapping
//! is cheap and a mapping can be shared between threads.
//!
//! Copyright (c) 2025 Reshape Team
//! Licensed under the Apache-2.0 license

use super::types::{CustomRule, KindTransform, Visit};
use super::walker::Walker;
use crate::diagnostics::MapReport;
use crate::kind::DataKind;
use crate::value::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Per-kind transforms plus ordered custom rules
#[derive(Clone, Default)]
pub struct Mapping {
    by_kind: HashMap<DataKind, KindTransform>,
    custom: Vec<CustomRule>,
}

impl Mapping {
    /// Create an empty mapping. Mapping with it returns the input unchanged.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the transform for `kind`, replacing any previous one
    pub fn on<F>(mut self, kind: DataKind, transform: F) -> Self
    where
        F: Fn(Value, &Visit<'_>) -> Value + Send + Sync + 'static,
    {
        self.by_kind.insert(kind, Arc::new(transform));
        self
    }

    /// Append a custom rule. Every rule whose predicate matches a node is
    /// applied, in the order they were added.
    pub fn custom<P, F>(mut self, predicate: P, transform: F) -> Self
    where
        P: Fn(&Value, DataKind, &Visit<'_>) -> bool + Send + Sync + 'static,
        F: Fn(Value, DataKind, &Visit<'_>) -> Value + Send + Sync + 'static,
    {
        self.custom.push(CustomRule::new(predicate, transform));
        self
    }

    /// Append an already-built custom rule
    pub fn rule(mut self, rule: CustomRule) -> Self {
        self.custom.push(rule);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.by_kind.is_empty() && self.custom.is_empty()
    }

    pub fn handles(&self, kind: DataKind) -> bool {
        self.by_kind.contains_key(&kind)
    }

    /// Rewrite `value` according to this mapping
    pub fn map(&self, value: Value) -> Value {
        Walker::new(self).walk(value, Visit::root())
    }

    /// Rewrite `value` and return the diagnostics observed during the walk
    pub fn map_with_report(&self, value: Value) -> MapReport {
        let mut walker = Walker::new(self);
        let value = walker.walk(value, Visit::root());
        MapReport {
            value,
            diagnostics: walker.into_diagnostics(),
        }
    }

    pub(crate) fn kind_transform(&self, kind: DataKind) -> Option<&KindTransform> {
        self.by_kind.get(&kind)
    }

    pub(crate) fn custom_rules(&self) -> &[CustomRule] {
        &self.custom
    }
}

impl fmt::Debug for Mapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut kinds: Vec<_> = self.by_kind.keys().collect();
        kinds.sort();
        f.debug_struct("Mapping")
            .field("kinds", &kinds)
            .field("custom_rules", &self.custom.len())
            .finish()
    }
}
