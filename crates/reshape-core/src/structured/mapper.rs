//! Evaluation of shapes against input values
//!
//! Copyright (c) 2025 Reshape Team
//! Licensed under the Apache-2.0 license

use super::path::{resolve, terminals};
use super::shape::{Leaf, Shape, Structure};
use crate::error::{Error, Result};
use crate::kind::DataKind;
use crate::value::{Map, Value};

/// Evaluate `shape` against `value`.
///
/// `Ok(None)` means the node produces no output at all, which the parent
/// turns into an absent field. `path` locates the node for error messages.
pub(crate) fn evaluate(value: Value, shape: &Shape, path: &str) -> Result<Option<Value>> {
    match shape {
        Shape::Keep(false) => Ok(None),
        Shape::Keep(true) => Ok(Some(value)),
        Shape::Leaf(leaf) => evaluate_leaf(value, leaf, path),
        Shape::Flatten(inner) => evaluate(value, inner, path),
        Shape::Array(shapes) => {
            let [inner] = shapes.as_slice() else {
                return Err(Error::MalformedArrayShorthand { len: shapes.len() });
            };
            evaluate_elements(value, path, |element, element_path| {
                Ok(evaluate(element, inner, element_path)?.unwrap_or_default())
            })
        }
        Shape::Structure(structure) => evaluate_structure(value, structure, path).map(Some),
    }
}

fn evaluate_leaf(value: Value, leaf: &Leaf, path: &str) -> Result<Option<Value>> {
    if value.is_undefined() && leaf.optional {
        return Ok(None);
    }

    if value.is_null() && leaf.nullable {
        return Ok(Some(leaf.fallback.clone().unwrap_or(Value::Null)));
    }

    if leaf.array {
        return evaluate_elements(value, path, |element, _| Ok(leaf.apply(element)));
    }

    Ok(Some(leaf.apply(value)))
}

fn evaluate_elements<F>(value: Value, path: &str, mut f: F) -> Result<Option<Value>>
where
    F: FnMut(Value, &str) -> Result<Value>,
{
    let items = match value {
        Value::Array(items) => items,
        other => {
            return Err(Error::NotAnArray {
                path: display_path(path),
                found: other.kind(),
            })
        }
    };

    items
        .into_iter()
        .enumerate()
        .map(|(i, element)| f(element, &format!("{}[{}]", path, i)))
        .collect::<Result<Vec<_>>>()
        .map(|items| Some(Value::Array(items)))
}

fn evaluate_structure(value: Value, structure: &Structure, path: &str) -> Result<Value> {
    let kind = value.kind();
    let source = match value {
        Value::Undefined => return Err(Error::UndefinedInput),
        Value::Object(fields) => fields,
        Value::Instance(instance) if kind == DataKind::Object => instance.into_fields(),
        other => {
            return Err(Error::NotAnObject {
                found: kind,
                value: other.to_string(),
            })
        }
    };

    let mut output = if structure.additional_properties {
        source.clone()
    } else {
        Map::new()
    };
    let source = Value::Object(source);

    for terminal in terminals(structure) {
        let keys = terminal.input_keys();
        let field_path = join_path(path, &keys.join("."));
        let destination = terminal.destination();

        let Some(input) = resolve(&source, &keys) else {
            if !terminal.shape.tolerates_missing() {
                return Err(Error::MissingField { path: field_path });
            }
            if let Some(fallback) = terminal.shape.as_leaf().and_then(|leaf| leaf.fallback.clone()) {
                log::debug!("optional field '{}' is missing, using its fallback", field_path);
                destination.place(&mut output, fallback);
            } else {
                log::debug!("optional field '{}' is missing, skipping", field_path);
            }
            continue;
        };

        match evaluate(input.clone(), terminal.shape, &field_path)? {
            Some(mapped) => destination.place(&mut output, mapped),
            None => destination.clear(&mut output),
        }
    }

    Ok(Value::Object(output))
}

fn join_path(parent: &str, child: &str) -> String {
    match (parent.is_empty(), child.is_empty()) {
        (true, _) => child.to_string(),
        (_, true) => parent.to_string(),
        _ => format!("{}.{}", parent, child),
    }
}

fn display_path(path: &str) -> String {
    if path.is_empty() {
        "$".to_string()
    } else {
        path.to_string()
    }
}
