//! Field paths used while evaluating a structure
//!
//! A structure is evaluated by first enumerating its terminal descriptors as
//! paths from the structure root. Flatten nodes leave a marker segment in the
//! path: it is skipped when reading the input and folds the previous segment
//! away when writing the output.
//!
//! Copyright (c) 2025 Reshape Team
//! Licensed under the Apache-2.0 license

use super::shape::{Shape, Structure};
use crate::value::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Segment<'s> {
    Field(&'s str),
    Flatten,
}

/// A shape that terminates path enumeration, with the path leading to it
#[derive(Debug)]
pub(crate) struct Terminal<'s> {
    pub(crate) segments: Vec<Segment<'s>>,
    pub(crate) shape: &'s Shape,
}

impl<'s> Terminal<'s> {
    /// Keys to read from the input
    pub(crate) fn input_keys(&self) -> Vec<&'s str> {
        self.segments
            .iter()
            .filter_map(|segment| match segment {
                Segment::Field(name) => Some(*name),
                Segment::Flatten => None,
            })
            .collect()
    }

    /// Where the output goes, after renaming and flattening
    pub(crate) fn destination(&self) -> Destination {
        let rename = self.shape.as_leaf().and_then(|leaf| leaf.renamed_to());

        let mut segments = self.segments.clone();
        if let (Some(to), Some(last)) = (rename, segments.last_mut()) {
            *last = Segment::Field(to);
        }

        let merge = matches!(segments.last(), Some(Segment::Flatten));
        let keys = segments.iter().fold(Vec::new(), |mut keys, segment| {
            match segment {
                Segment::Field(name) => keys.push(name.to_string()),
                Segment::Flatten => {
                    keys.pop();
                }
            }
            keys
        });

        Destination { keys, merge }
    }
}

/// Enumerate the terminals of `structure` depth-first, in declaration order.
///
/// Nested structures are walked into, except empty ones and ones copying
/// additional properties: those are evaluated as a whole.
pub(crate) fn terminals(structure: &Structure) -> Vec<Terminal<'_>> {
    let mut out = Vec::new();
    let mut prefix = Vec::new();
    collect_structure(structure, &mut prefix, &mut out);
    out
}

fn collect_structure<'s>(
    structure: &'s Structure,
    prefix: &mut Vec<Segment<'s>>,
    out: &mut Vec<Terminal<'s>>,
) {
    for (name, shape) in structure.fields() {
        prefix.push(Segment::Field(name));
        collect_shape(shape, prefix, out);
        prefix.pop();
    }
}

fn collect_shape<'s>(shape: &'s Shape, prefix: &mut Vec<Segment<'s>>, out: &mut Vec<Terminal<'s>>) {
    match shape {
        Shape::Structure(inner) if !inner.is_empty() && !inner.has_additional_properties() => {
            collect_structure(inner, prefix, out)
        }
        Shape::Flatten(inner) => {
            prefix.push(Segment::Flatten);
            collect_shape(inner, prefix, out);
            prefix.pop();
        }
        _ => out.push(Terminal {
            segments: prefix.clone(),
            shape,
        }),
    }
}

/// Walk `keys` into `root`. A step fails when the current value has no such
/// property or the property is undefined.
pub(crate) fn resolve<'v>(root: &'v Value, keys: &[&str]) -> Option<&'v Value> {
    keys.iter().try_fold(root, |current, key| {
        current.get(key).filter(|value| !value.is_undefined())
    })
}

/// Output location of a terminal
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Destination {
    pub(crate) keys: Vec<String>,
    /// The terminal itself was flattened: merge its fields instead of
    /// storing it under a key
    pub(crate) merge: bool,
}

impl Destination {
    /// Store `value`, creating intermediate objects as needed
    pub(crate) fn place(&self, output: &mut Map, value: Value) {
        let Some((last, parents)) = self.keys.split_last() else {
            merge_into(output, value);
            return;
        };

        let target = parents.iter().fold(output, |map, key| object_entry(map, key));

        if self.merge {
            merge_into(object_entry(target, last), value);
        } else {
            target.insert(last.clone(), value);
        }
    }

    /// Remove whatever is stored at this location
    pub(crate) fn clear(&self, output: &mut Map) {
        if self.merge {
            return;
        }
        let Some((last, parents)) = self.keys.split_last() else {
            return;
        };

        let mut target = output;
        for key in parents {
            match target.get_mut(key) {
                Some(Value::Object(inner)) => target = inner,
                _ => return,
            }
        }
        target.remove(last);
    }
}

fn object_entry<'m>(map: &'m mut Map, key: &str) -> &'m mut Map {
    let slot = map
        .entry(key.to_string())
        .or_insert_with(|| Value::Object(Map::new()));
    if !matches!(slot, Value::Object(_)) {
        *slot = Value::Object(Map::new());
    }
    match slot {
        Value::Object(inner) => inner,
        _ => unreachable!("slot was just replaced with an object"),
    }
}

fn merge_into(target: &mut Map, value: Value) {
    match value.into_fields() {
        Some(fields) => target.extend(fields),
        None => log::debug!("flattened value is not an object, nothing to merge"),
    }
}
