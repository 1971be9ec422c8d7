//! Shape descriptors for the structured mapper
//!
//! A [`Shape`] mirrors the output the caller wants. Leaves carry the transform
//! and its modifiers, structures recurse by field name, flatten nodes merge a
//! nested shape into their parent and the array shorthand maps a shape over
//! every element.
//!
//! Copyright (c) 2025 Reshape Team
//! Licensed under the Apache-2.0 license

use crate::kind::DataKind;
use crate::value::Value;
use std::fmt;
use std::sync::Arc;

/// Transform applied by a leaf, receiving the input and its kind
pub type LeafFn = Arc<dyn Fn(Value, DataKind) -> Value + Send + Sync>;

/// A node of a structured mapping
#[derive(Clone, Debug)]
pub enum Shape {
    /// `true` passes the input through, `false` drops the field
    Keep(bool),
    /// Direct transform with modifiers
    Leaf(Leaf),
    /// Merge the nested shape's output into the parent instead of nesting it
    Flatten(Box<Shape>),
    /// Recurse by field name
    Structure(Structure),
    /// `[shape]` shorthand: map `shape` over every element of an array.
    /// Holding anything but exactly one shape is an error at use time.
    Array(Vec<Shape>),
}

impl Shape {
    /// Bare function shorthand, equivalent to `Leaf::new(f)`
    pub fn map<F>(f: F) -> Self
    where
        F: Fn(Value, DataKind) -> Value + Send + Sync + 'static,
    {
        Shape::Leaf(Leaf::new(f))
    }

    /// `[inner]` shorthand
    pub fn each(inner: impl Into<Shape>) -> Self {
        Shape::Array(vec![inner.into()])
    }

    pub fn flatten(inner: impl Into<Shape>) -> Self {
        Shape::Flatten(Box::new(inner.into()))
    }

    pub fn as_leaf(&self) -> Option<&Leaf> {
        match self {
            Shape::Leaf(leaf) => Some(leaf),
            _ => None,
        }
    }

    /// Whether a missing input for this node may be skipped
    pub(crate) fn tolerates_missing(&self) -> bool {
        match self {
            Shape::Keep(false) => true,
            Shape::Leaf(leaf) => leaf.optional,
            _ => false,
        }
    }
}

impl From<bool> for Shape {
    fn from(keep: bool) -> Self {
        Shape::Keep(keep)
    }
}

impl From<Leaf> for Shape {
    fn from(leaf: Leaf) -> Self {
        Shape::Leaf(leaf)
    }
}

impl From<Structure> for Shape {
    fn from(structure: Structure) -> Self {
        Shape::Structure(structure)
    }
}

/// Leaf descriptor: `{map, rename?, array?, optional?, nullable?, fallback?}`
#[derive(Clone)]
pub struct Leaf {
    map: LeafFn,
    pub(crate) rename: Option<String>,
    pub(crate) array: bool,
    pub(crate) optional: bool,
    pub(crate) nullable: bool,
    pub(crate) fallback: Option<Value>,
}

impl Leaf {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(Value, DataKind) -> Value + Send + Sync + 'static,
    {
        Self {
            map: Arc::new(f),
            rename: None,
            array: false,
            optional: false,
            nullable: false,
            fallback: None,
        }
    }

    /// Leaf that passes its input through
    pub fn identity() -> Self {
        Self::new(|value, _| value)
    }

    /// Place the output under `to` instead of the field's own name
    pub fn rename(mut self, to: impl Into<String>) -> Self {
        self.rename = Some(to.into());
        self
    }

    /// Apply the transform to every element of an array input
    pub fn array(mut self) -> Self {
        self.array = true;
        self
    }

    /// Allow the input to be missing
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Allow the input to be null
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Output used for a missing optional input or a null nullable input
    pub fn fallback(mut self, value: impl Into<Value>) -> Self {
        self.fallback = Some(value.into());
        self
    }

    pub fn renamed_to(&self) -> Option<&str> {
        self.rename.as_deref()
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    pub fn is_array(&self) -> bool {
        self.array
    }

    pub(crate) fn apply(&self, value: Value) -> Value {
        let kind = value.kind();
        (self.map)(value, kind)
    }
}

impl fmt::Debug for Leaf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Leaf")
            .field("rename", &self.rename)
            .field("array", &self.array)
            .field("optional", &self.optional)
            .field("nullable", &self.nullable)
            .field("fallback", &self.fallback)
            .finish_non_exhaustive()
    }
}

/// Structure node: ordered field shapes plus the additional-properties flag
#[derive(Clone, Debug, Default)]
pub struct Structure {
    fields: Vec<(String, Shape)>,
    pub(crate) additional_properties: bool,
}

impl Structure {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field, replacing an earlier shape for the same name in place
    pub fn field(mut self, name: impl Into<String>, shape: impl Into<Shape>) -> Self {
        let name = name.into();
        let shape = shape.into();
        match self.fields.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = shape,
            None => self.fields.push((name, shape)),
        }
        self
    }

    /// Copy every field of the input before applying the explicit ones
    pub fn additional_properties(mut self, enabled: bool) -> Self {
        self.additional_properties = enabled;
        self
    }

    pub fn fields(&self) -> &[(String, Shape)] {
        &self.fields
    }

    pub fn has_additional_properties(&self) -> bool {
        self.additional_properties
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
