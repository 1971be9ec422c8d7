//! Loading shapes from JSON documents
//!
//! JSON cannot carry functions, so a JSON leaf is always an identity leaf
//! written as `{"map": true, ...modifiers}`.
//!
//! Copyright (c) 2025 Reshape Team
//! Licensed under the Apache-2.0 license

use super::shape::{Leaf, Shape, Structure};
use crate::error::{Error, Result};
use crate::value::Value;
use serde_json::{Map as JsonMap, Value as Json};

const LEAF_MODIFIERS: [&str; 5] = ["rename", "array", "optional", "nullable", "fallback"];

impl Shape {
    /// Build a shape from a JSON descriptor document
    pub fn from_json(doc: &Json) -> Result<Shape> {
        parse_shape(doc, "")
    }

    /// Parse a JSON descriptor from text
    pub fn from_json_str(text: &str) -> Result<Shape> {
        let doc: Json = serde_json::from_str(text)?;
        Shape::from_json(&doc)
    }
}

fn parse_shape(doc: &Json, path: &str) -> Result<Shape> {
    match doc {
        Json::Bool(keep) => Ok(Shape::Keep(*keep)),
        Json::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, item)| parse_shape(item, &format!("{}[{}]", path, i)))
            .collect::<Result<Vec<_>>>()
            .map(Shape::Array),
        Json::Object(obj) if obj.contains_key("flatten") => {
            if obj.len() != 1 {
                return Err(Error::invalid_descriptor(
                    path,
                    "`flatten` cannot be combined with other keys",
                ));
            }
            let inner = parse_shape(&obj["flatten"], &child_path(path, "flatten"))?;
            Ok(Shape::Flatten(Box::new(inner)))
        }
        Json::Object(obj) if obj.contains_key("map") => parse_leaf(obj, path).map(Shape::Leaf),
        Json::Object(obj) => parse_structure(obj, path).map(Shape::Structure),
        other => Err(Error::invalid_descriptor(
            path,
            format!("expected a boolean, array or object, found {}", other),
        )),
    }
}

fn parse_leaf(obj: &JsonMap<String, Json>, path: &str) -> Result<Leaf> {
    if obj.get("map") != Some(&Json::Bool(true)) {
        return Err(Error::invalid_descriptor(
            path,
            "`map` must be `true` in a JSON leaf descriptor",
        ));
    }

    let mut leaf = Leaf::identity();
    for (key, value) in obj {
        let at = child_path(path, key);
        leaf = match key.as_str() {
            "map" => leaf,
            "rename" => match value.as_str() {
                Some(to) => leaf.rename(to),
                None => return Err(Error::invalid_descriptor(&at, "expected a string")),
            },
            "array" => flag(leaf, value, &at, Leaf::array)?,
            "optional" => flag(leaf, value, &at, Leaf::optional)?,
            "nullable" => flag(leaf, value, &at, Leaf::nullable)?,
            "fallback" => leaf.fallback(Value::from(value.clone())),
            _ => {
                return Err(Error::invalid_descriptor(
                    &at,
                    "unknown leaf modifier next to `map`",
                ))
            }
        };
    }
    Ok(leaf)
}

fn flag(leaf: Leaf, value: &Json, path: &str, set: fn(Leaf) -> Leaf) -> Result<Leaf> {
    match value {
        Json::Bool(true) => Ok(set(leaf)),
        Json::Bool(false) => Ok(leaf),
        _ => Err(Error::invalid_descriptor(path, "expected a boolean")),
    }
}

fn parse_structure(obj: &JsonMap<String, Json>, path: &str) -> Result<Structure> {
    let mut structure = Structure::new();
    for (key, value) in obj {
        let at = child_path(path, key);
        if key == "additionalProperties" {
            match value {
                Json::Bool(enabled) => structure = structure.additional_properties(*enabled),
                _ => return Err(Error::invalid_descriptor(&at, "expected a boolean")),
            }
        } else if LEAF_MODIFIERS.contains(&key.as_str()) {
            return Err(Error::invalid_descriptor(
                &at,
                format!("`{}` is only valid next to `map`", key),
            ));
        } else {
            structure = structure.field(key.clone(), parse_shape(value, &at)?);
        }
    }
    Ok(structure)
}

fn child_path(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", parent, key)
    }
}
