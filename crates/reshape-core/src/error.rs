//! Error types for the Reshape core library
//!
//! The type-dispatch mapper is total and never produces these. Structured
//! mapping and extraction are fail-fast: any violation aborts the whole call
//! and surfaces as one of the variants below.
//!
//! Copyright (c) 2025 Reshape Team
//! Licensed under the Apache-2.0 license

use crate::kind::DataKind;
use thiserror::Error;

/// Main error type for Reshape operations
#[derive(Error, Debug)]
pub enum Error {
    /// A required field of a structured mapping was not present in the input
    #[error("could not access property '{path}'")]
    MissingField { path: String },

    /// An array mapping was applied to input that is not an array
    #[error("received an array mapping at '{path}', but input data was {found}")]
    NotAnArray { path: String, found: DataKind },

    /// A structure shape was applied to an undefined value
    #[error("cannot do a structured map on undefined")]
    UndefinedInput,

    /// A structure shape was applied to a value that is not an object
    #[error("cannot do a structured map on a non-object ({found}: {value})")]
    NotAnObject { found: DataKind, value: String },

    /// `[shape]` shorthand with a length other than one
    #[error("array mapping shorthand should be [bool | {{}} | v => v] syntax, got {len} elements")]
    MalformedArrayShorthand { len: usize },

    /// `[descriptor]` extraction shorthand with more than one element
    #[error("it is invalid to pass an array with length {len} as an extraction (expected 1)")]
    MalformedExtraction { len: usize },

    /// A descriptor document could not be interpreted
    #[error("invalid descriptor at '{path}': {message}")]
    InvalidDescriptor { message: String, path: String },

    /// JSON parsing and serialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Convenience type alias for Results using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn invalid_descriptor(path: &str, message: impl Into<String>) -> Self {
        Error::InvalidDescriptor {
            message: message.into(),
            path: if path.is_empty() { "$".to_string() } else { path.to_string() },
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json {
            message: err.to_string(),
            source: err,
        }
    }
}
