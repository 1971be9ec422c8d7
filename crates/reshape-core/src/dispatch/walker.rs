//! Depth-first traversal for the type-dispatch mapper
//!
//! Copyright (c) 2025 Reshape Team
//! Licensed under the Apache-2.0 license

use super::mapping::Mapping;
use super::types::Visit;
use crate::diagnostics::Diagnostic;
use crate::kind::{classify, DataKind};
use crate::value::{Instance, Map, Value};

/// Result of running the rules on one node
enum Outcome {
    /// A rule produced the final value for this node
    Done(Value),
    /// Keep going with structural recursion
    Descend(Value),
}

impl Outcome {
    /// A rule that hands back its (object) input unchanged does not stop
    /// recursion; this is what lets key-based rules act on some fields while
    /// siblings are still walked.
    fn settle(result: Value, original: Option<Value>) -> Self {
        match original {
            Some(original)
                if result.same_value(&original) && classify(&result) == DataKind::Object =>
            {
                Outcome::Descend(result)
            }
            _ => Outcome::Done(result),
        }
    }
}

pub(crate) struct Walker<'m> {
    mapping: &'m Mapping,
    diagnostics: Vec<Diagnostic>,
}

impl<'m> Walker<'m> {
    pub(crate) fn new(mapping: &'m Mapping) -> Self {
        Self {
            mapping,
            diagnostics: Vec::new(),
        }
    }

    pub(crate) fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    pub(crate) fn walk(&mut self, value: Value, visit: Visit<'_>) -> Value {
        let kind = classify(&value);

        match self.apply_rules(value, kind, &visit) {
            Outcome::Done(value) => value,
            Outcome::Descend(value) => self.descend(value, kind, visit.path),
        }
    }

    fn apply_rules(&self, value: Value, kind: DataKind, visit: &Visit<'_>) -> Outcome {
        let matching: Vec<_> = self
            .mapping
            .custom_rules()
            .iter()
            .filter(|rule| rule.matches(&value, kind, visit))
            .collect();

        // only an object can come back equal to itself and still be an object
        let keep_original = |value: &Value| (kind == DataKind::Object).then(|| value.clone());

        if !matching.is_empty() {
            let original = keep_original(&value);
            let result = matching
                .into_iter()
                .fold(value, |acc, rule| rule.apply(acc, kind, visit));
            return Outcome::settle(result, original);
        }

        if let Some(transform) = self.mapping.kind_transform(kind) {
            let original = keep_original(&value);
            let result = transform(value, visit);
            return Outcome::settle(result, original);
        }

        Outcome::Descend(value)
    }

    fn descend(&mut self, value: Value, kind: DataKind, path: Option<&str>) -> Value {
        match (kind, value) {
            (DataKind::Array, Value::Array(items)) => Value::Array(
                items
                    .into_iter()
                    .enumerate()
                    .map(|(i, item)| {
                        let child = match path {
                            Some(ctx) => format!("{}[{}]", ctx, i),
                            None => format!("[{}]", i),
                        };
                        self.walk(item, Visit { key: None, path: Some(&child) })
                    })
                    .collect(),
            ),
            (DataKind::Object, Value::Object(fields)) => Value::Object(self.walk_fields(fields, path)),
            (DataKind::Object, Value::Instance(instance)) => {
                self.report_instance(&instance, path);
                Value::Object(self.walk_fields(instance.into_fields(), path))
            }
            (_, value) => value,
        }
    }

    fn walk_fields(&mut self, fields: Map, path: Option<&str>) -> Map {
        fields
            .into_iter()
            .map(|(key, value)| {
                let child = match path {
                    Some(ctx) => format!("{}.{}", ctx, key),
                    None => key.clone(),
                };
                let mapped = self.walk(
                    value,
                    Visit {
                        key: Some(&key),
                        path: Some(&child),
                    },
                );
                (key, mapped)
            })
            .collect()
    }

    fn report_instance(&mut self, instance: &Instance, path: Option<&str>) {
        let diagnostic = Diagnostic::instance_flattened(instance.class(), path.unwrap_or_default());
        log::warn!("{}", diagnostic.message);
        self.diagnostics.push(diagnostic);
    }
}
