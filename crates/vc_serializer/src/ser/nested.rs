use alloc::string::String;

use crate::registry::SchemaRegistry;
use crate::ser::{ArraySerializer, SerializeOptions, Serializer};
use crate::{Map, Relation, SerializeError, Value};

// -----------------------------------------------------------------------------
// NestedSerializer

/// The serializer selected for the value of a relation.
///
/// A sequence selects an [`ArraySerializer`]. A single object uses the
/// explicit schema of the options, else the schema registered for its type.
#[derive(Debug)]
pub enum NestedSerializer<'a> {
    /// Nothing is related.
    Absent { wrap_in_array: bool },
    One(Serializer<'a>),
    Many(ArraySerializer<'a>),
}

impl<'a> NestedSerializer<'a> {
    /// Selects the serializer for `relation`.
    ///
    /// # Errors
    ///
    /// [`SerializeError::SchemaNotFound`] if a single object has neither an
    /// explicit nor a registered schema.
    pub fn build(
        registry: &'a SchemaRegistry,
        relation: Relation<'a>,
        options: SerializeOptions<'a>,
    ) -> Result<Self, SerializeError> {
        Ok(match relation {
            Relation::Absent => Self::Absent {
                wrap_in_array: options.wrap_in_array,
            },
            Relation::One(object) => {
                let schema = match options.serializer {
                    Some(schema) => schema,
                    None => registry.schema_for(object)?,
                };
                Self::One(Serializer::new(registry, schema, Some(object), options))
            }
            Relation::Many(objects) => Self::Many(ArraySerializer::new(registry, objects, options)),
        })
    }

    /// See [`Serializer::serializable_object`] and [`ArraySerializer::serializable_array`].
    pub fn serializable_object(&self) -> Result<Value, SerializeError> {
        match self {
            Self::Absent { wrap_in_array: true } => Ok(Value::Array(alloc::vec![])),
            Self::Absent { wrap_in_array: false } => Ok(Value::Null),
            Self::One(serializer) => serializer.serializable_object(),
            Self::Many(serializer) => serializer.serializable_array(),
        }
    }

    /// Root-flattened associations of the related object(s).
    pub fn embedded_in_root_associations(&self) -> Result<Map<String, Value>, SerializeError> {
        match self {
            Self::Absent { .. } => Ok(Map::new()),
            Self::One(serializer) => serializer.embedded_in_root_associations(),
            Self::Many(serializer) => serializer.embedded_in_root_associations(),
        }
    }
}

// -----------------------------------------------------------------------------
// Tests
