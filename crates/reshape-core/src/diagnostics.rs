//! Non-fatal events observed while mapping
//!
//! The dispatch mapper never fails, but some of what it does loses
//! information: iterating a class instance produces a plain object. Those
//! events are logged and collected per call into a [`MapReport`].
//!
//! Copyright (c) 2025 Reshape Team
//! Licensed under the Apache-2.0 license

use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::fmt;

/// What kind of loss a diagnostic records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiagnosticCode {
    /// A class instance was rebuilt as a plain object
    InstanceFlattened,
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticCode::InstanceFlattened => write!(f, "InstanceFlattened"),
        }
    }
}

/// A single observed event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub code: DiagnosticCode,
    /// Contextual key of the node, empty at the root
    pub path: String,
    pub message: String,
}

impl Diagnostic {
    pub fn instance_flattened(class: &str, path: &str) -> Self {
        Self {
            code: DiagnosticCode::InstanceFlattened,
            path: path.to_string(),
            message: format!(
                "Iterating over a {}, which will lose your class instance type",
                class
            ),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "[{}] {}", self.code, self.message)
        } else {
            write!(f, "[{}] {} (at {})", self.code, self.message, self.path)
        }
    }
}

/// Output of a dispatch mapping together with what was observed on the way
#[derive(Debug, Clone, PartialEq)]
pub struct MapReport {
    pub value: Value,
    pub diagnostics: Vec<Diagnostic>,
}

impl MapReport {
    /// True when nothing was lost during the walk
    pub fn is_lossless(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn into_value(self) -> Value {
        self.value
    }
}
