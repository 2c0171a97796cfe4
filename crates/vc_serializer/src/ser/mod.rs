//! Serialization of bound objects into JSON documents.
//!
//! ## Menu
//!
//! - [`Serializer`]: one object, one schema.
//! - [`ArraySerializer`]: a sequence of objects, one serializer per member.
//! - [`NestedSerializer`]: the serializer selected for a relation value.
//! - [`SerializeOptions`]: per-call options (scope, root, meta, filter ...).
//! - [`JsonDocument`]: composition of the final document.
//!
//! ## Embedding
//!
//! Each included association contributes in exactly one way, see
//! [`EmbedMode`](crate::schema::EmbedMode). Associations embedded in root are
//! left out of [`Serializer::serializable_object`] and are gathered, depth
//! first, by [`Serializer::embedded_in_root_associations`]. Entries meeting
//! under one root key are deduplicated by structural equality.

// -----------------------------------------------------------------------------
// Modules

mod array_serializer;
mod document;
mod nested;
mod options;
mod root;
mod serializer;

// -----------------------------------------------------------------------------
// Exports

pub use array_serializer::ArraySerializer;
pub use document::JsonDocument;
pub use nested::NestedSerializer;
pub use options::SerializeOptions;
pub use serializer::Serializer;
