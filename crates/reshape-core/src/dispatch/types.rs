//! Core types for the type-dispatch mapper
//!
//! Copyright (c) 2025 Reshape Team
//! Licensed under the Apache-2.0 license

use crate::kind::DataKind;
use crate::value::Value;
use std::fmt;
use std::sync::Arc;

/// Where the walker is while visiting a node
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Visit<'a> {
    /// Field name the value was reached under. `None` at the root and for
    /// array elements.
    pub key: Option<&'a str>,
    /// Contextual key from the root, e.g. `a.b[2].c`. `None` at the root.
    pub path: Option<&'a str>,
}

impl<'a> Visit<'a> {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn is_root(&self) -> bool {
        self.path.is_none()
    }
}

/// Transform registered for a single kind
pub type KindTransform = Arc<dyn Fn(Value, &Visit<'_>) -> Value + Send + Sync>;

/// Decides whether a custom rule applies to a node
pub type RulePredicate = Arc<dyn Fn(&Value, DataKind, &Visit<'_>) -> bool + Send + Sync>;

/// Transform of a custom rule
pub type RuleTransform = Arc<dyn Fn(Value, DataKind, &Visit<'_>) -> Value + Send + Sync>;

/// A predicate/transform pair tried before any per-kind transform
#[derive(Clone)]
pub struct CustomRule {
    predicate: RulePredicate,
    transform: RuleTransform,
}

impl CustomRule {
    pub fn new<P, F>(predicate: P, transform: F) -> Self
    where
        P: Fn(&Value, DataKind, &Visit<'_>) -> bool + Send + Sync + 'static,
        F: Fn(Value, DataKind, &Visit<'_>) -> Value + Send + Sync + 'static,
    {
        Self {
            predicate: Arc::new(predicate),
            transform: Arc::new(transform),
        }
    }

    pub fn matches(&self, value: &Value, kind: DataKind, visit: &Visit<'_>) -> bool {
        (self.predicate)(value, kind, visit)
    }

    pub fn apply(&self, value: Value, kind: DataKind, visit: &Visit<'_>) -> Value {
        (self.transform)(value, kind, visit)
    }
}

impl fmt::Debug for CustomRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomRule").finish_non_exhaustive()
    }
}
