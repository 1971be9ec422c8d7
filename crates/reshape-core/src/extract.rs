//! Extraction engine
//!
//! Whitelist projection of a value tree. An [`Extraction`] names the fields to
//! keep; everything else is dropped. Unlike structured mapping, a field that
//! is missing or has the wrong type is silently left out of the output.
//!
//! ```
//! use reshape_core::{extract, rename, Extraction, Value};
//! use serde_json::json;
//!
//! let extraction = Extraction::default()
//!     .field("firstName", true)
//!     .field("password", false)
//!     .field("email", rename("contact"))
//!     .field("permissions", Extraction::each(Extraction::default().field("role", true)));
//!
//! let input = Value::from(json!({
//!     "firstName": "Bob",
//!     "password": "secure!",
//!     "email": "bob@example.com",
//!     "permissions": [{"role": "admin", "at": 1}, {"role": "user"}]
//! }));
//!
//! let output = extract(input, &extraction).unwrap();
//! assert_eq!(
//!     output.to_json(),
//!     json!({
//!         "firstName": "Bob",
//!         "contact": "bob@example.com",
//!         "permissions": [{"role": "admin"}, {"role": "user"}]
//!     })
//! );
//! ```
//!
//! Copyright (c) 2025 Reshape Team
//! Licensed under the Apache-2.0 license

use crate::error::{Error, Result};
use crate::kind::{classify, DataKind};
use crate::value::{Map, Value};
use serde_json::Value as Json;
use std::fmt;
use std::sync::Arc;

/// Transform applied by [`Extraction::Transform`]
pub type ExtractFn = Arc<dyn Fn(Value) -> Value + Send + Sync>;

/// Selection descriptor for [`extract`]
#[derive(Clone)]
pub enum Extraction {
    /// `true` copies the value, `false` drops it
    Keep(bool),
    /// Copy only these immediate sub-fields of an object
    Fields(Vec<String>),
    /// `[descriptor]` shorthand: extract every element of an array.
    /// More than one descriptor is an error at use time.
    Each(Vec<Extraction>),
    /// Copy the raw value under another key
    Rename(String),
    /// Store the transformed value under the original key
    Transform(ExtractFn),
    /// Recurse by field name
    Nested(Vec<(String, Extraction)>),
}

impl Default for Extraction {
    /// An empty [`Extraction::Nested`]
    fn default() -> Self {
        Extraction::Nested(Vec::new())
    }
}

impl Extraction {
    /// Add a field to a nested extraction, replacing an earlier descriptor for
    /// the same name. Any other variant is discarded and becomes a nested
    /// extraction holding only this field.
    pub fn field(mut self, name: impl Into<String>, extraction: impl Into<Extraction>) -> Self {
        let name = name.into();
        let extraction = extraction.into();
        match &mut self {
            Extraction::Nested(fields) => {
                match fields.iter_mut().find(|(existing, _)| *existing == name) {
                    Some((_, slot)) => *slot = extraction,
                    None => fields.push((name, extraction)),
                }
                self
            }
            _ => Extraction::Nested(vec![(name, extraction)]),
        }
    }

    /// `['a', 'b']` shorthand
    pub fn fields<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Extraction::Fields(names.into_iter().map(Into::into).collect())
    }

    /// `[inner]` shorthand
    pub fn each(inner: impl Into<Extraction>) -> Self {
        Extraction::Each(vec![inner.into()])
    }

    /// Build an extraction from a JSON descriptor document.
    ///
    /// `true`/`false`/`null` keep or drop, an array of strings lists fields,
    /// any other array is the element shorthand, `{"$rename": "to"}` renames
    /// and any other object recurses.
    pub fn from_json(doc: &Json) -> Result<Extraction> {
        parse(doc, "")
    }

    /// Parse a JSON descriptor from text
    pub fn from_json_str(text: &str) -> Result<Extraction> {
        let doc: Json = serde_json::from_str(text)?;
        Extraction::from_json(&doc)
    }
}

impl From<bool> for Extraction {
    fn from(keep: bool) -> Self {
        Extraction::Keep(keep)
    }
}

impl fmt::Debug for Extraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Extraction::Keep(keep) => f.debug_tuple("Keep").field(keep).finish(),
            Extraction::Fields(names) => f.debug_tuple("Fields").field(names).finish(),
            Extraction::Each(items) => f.debug_tuple("Each").field(items).finish(),
            Extraction::Rename(to) => f.debug_tuple("Rename").field(to).finish(),
            Extraction::Transform(_) => f.write_str("Transform(<fn>)"),
            Extraction::Nested(fields) => f.debug_tuple("Nested").field(fields).finish(),
        }
    }
}

/// Copy a field under the key `to`
pub fn rename(to: impl Into<String>) -> Extraction {
    Extraction::Rename(to.into())
}

/// Store `f(field)` under the field's own key
pub fn transform<F>(f: F) -> Extraction
where
    F: Fn(Value) -> Value + Send + Sync + 'static,
{
    Extraction::Transform(Arc::new(f))
}

/// Project `value` through `extraction`.
///
/// Anything that does not classify as an array or object (scalars, boxed
/// scalars, dates, callables, null and undefined) is returned unchanged
/// whatever the descriptor. Fails only on an element shorthand holding more
/// than one descriptor.
pub fn extract(value: Value, extraction: &Extraction) -> Result<Value> {
    let is_array = matches!(value, Value::Array(_));
    if !is_array && object_fields(&value).is_none() {
        return Ok(value);
    }

    match extraction {
        Extraction::Keep(false) => Ok(Value::Undefined),
        Extraction::Keep(true) => Ok(value),
        Extraction::Fields(names) if names.is_empty() => Ok(Value::Undefined),
        Extraction::Each(items) => match (each_target(items)?, value) {
            (None, _) => Ok(Value::Undefined),
            (Some(inner), Value::Array(elements)) => extract_elements(elements, inner),
            (Some(_), other) => Ok(other),
        },
        _ if is_array => Ok(value),
        Extraction::Fields(names) => {
            let source = value.into_fields().unwrap_or_default();
            Ok(Value::Object(pick(&source, names)))
        }
        Extraction::Nested(fields) => {
            let source = value.into_fields().unwrap_or_default();
            project(&source, fields).map(Value::Object)
        }
        _ => Ok(Value::Object(Map::new())),
    }
}

/// Fields of a value that classifies as an object. Boxed scalars have an
/// (empty) field map but are not objects.
fn object_fields(value: &Value) -> Option<&Map> {
    match classify(value) {
        DataKind::Object => value.fields(),
        _ => None,
    }
}

/// Copy the listed keys that exist in `source`
fn pick(source: &Map, names: &[String]) -> Map {
    names
        .iter()
        .filter_map(|key| source.get(key).map(|v| (key.clone(), v.clone())))
        .collect()
}

/// Element descriptor of an `Each`, or `None` when the shorthand drops
/// everything (`[]` or `[false]`)
fn each_target(items: &[Extraction]) -> Result<Option<&Extraction>> {
    match items {
        [] | [Extraction::Keep(false)] => Ok(None),
        [inner] => Ok(Some(inner)),
        _ => Err(Error::MalformedExtraction { len: items.len() }),
    }
}

fn extract_elements(elements: Vec<Value>, inner: &Extraction) -> Result<Value> {
    elements
        .into_iter()
        .map(|element| extract(element, inner))
        .collect::<Result<Vec<_>>>()
        .map(Value::Array)
}

fn project(source: &Map, fields: &[(String, Extraction)]) -> Result<Map> {
    let mut output = Map::new();

    for (name, descriptor) in fields {
        let field = source.get(name);

        match descriptor {
            Extraction::Keep(false) => {}
            Extraction::Keep(true) => {
                if let Some(value) = field {
                    output.insert(name.clone(), value.clone());
                }
            }
            Extraction::Fields(names) if names.is_empty() => {}
            Extraction::Fields(names) => match field.and_then(object_fields) {
                Some(inner) => {
                    output.insert(name.clone(), Value::Object(pick(inner, names)));
                }
                None => log::debug!("field '{}' is not an object, omitting it", name),
            },
            Extraction::Each(items) => match (each_target(items)?, field) {
                (Some(inner), Some(Value::Array(elements))) => {
                    output.insert(name.clone(), extract_elements(elements.clone(), inner)?);
                }
                (Some(_), Some(_)) => log::debug!("field '{}' is not an array, omitting it", name),
                _ => {}
            },
            Extraction::Rename(to) => {
                if let Some(value) = field {
                    output.insert(to.clone(), value.clone());
                }
            }
            Extraction::Transform(f) => {
                output.insert(name.clone(), f(field.cloned().unwrap_or_default()));
            }
            Extraction::Nested(_) => {
                if let Some(value) = field {
                    output.insert(name.clone(), extract(value.clone(), descriptor)?);
                }
            }
        }
    }

    Ok(output)
}

fn parse(doc: &Json, path: &str) -> Result<Extraction> {
    match doc {
        Json::Bool(keep) => Ok(Extraction::Keep(*keep)),
        Json::Null => Ok(Extraction::Keep(false)),
        Json::Array(items) => {
            let names: Option<Vec<String>> = items
                .iter()
                .map(|item| item.as_str().map(str::to_string))
                .collect();
            match names {
                Some(names) => Ok(Extraction::Fields(names)),
                None => items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| parse(item, &format!("{}[{}]", path, i)))
                    .collect::<Result<Vec<_>>>()
                    .map(Extraction::Each),
            }
        }
        Json::Object(obj) if obj.contains_key("$rename") => match (obj.len(), &obj["$rename"]) {
            (1, Json::String(to)) => Ok(Extraction::Rename(to.clone())),
            (1, _) => Err(Error::invalid_descriptor(
                &child_path(path, "$rename"),
                "expected a string",
            )),
            _ => Err(Error::invalid_descriptor(
                path,
                "`$rename` cannot be combined with other keys",
            )),
        },
        Json::Object(obj) => obj
            .iter()
            .map(|(key, value)| Ok((key.clone(), parse(value, &child_path(path, key))?)))
            .collect::<Result<Vec<_>>>()
            .map(Extraction::Nested),
        other => Err(Error::invalid_descriptor(
            path,
            format!("expected a boolean, array, object or null, found {}", other),
        )),
    }
}

fn child_path(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", parent, key)
    }
}
