use alloc::string::String;

use thiserror::Error;

// -----------------------------------------------------------------------------
// SerializeError

/// Errors produced while turning a domain object into a JSON structure.
///
/// A broken flattened chain, an absent bound object and unknown `only`/`except`
/// names are not errors; they resolve to `null`, an empty result and no effect
/// respectively.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SerializeError {
    /// A related object had to be embedded as an object, but no schema is
    /// registered for its type.
    #[error("no schema registered for type `{type_name}`")]
    SchemaNotFound { type_name: &'static str },

    /// A typed resolver was invoked on an object of another type.
    ///
    /// This happens when a schema extended from another type's schema
    /// keeps a custom resolver written for the parent type.
    #[error("resolver declared for `{expected}` was given a `{found}`")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    /// A field value could not be converted into a JSON value.
    #[error("failed to serialize field `{field}`: {source}")]
    Value {
        field: String,
        source: serde_json::Error,
    },
}

impl SerializeError {
    #[cold]
    pub(crate) fn value(field: &str, source: serde_json::Error) -> Self {
        Self::Value {
            field: field.into(),
            source,
        }
    }
}

// -----------------------------------------------------------------------------
// Tests
