use alloc::borrow::Cow;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;

use serde_core::ser::Error as _;

use crate::filter::FieldFilter;
use crate::registry::SchemaRegistry;
use crate::schema::{RootName, Schema};
use crate::ser::{JsonDocument, SerializeOptions, Serializer, root};
use crate::{Map, Scope, Serializable, SerializeError, Value};

// -----------------------------------------------------------------------------
// ArraySerializer

/// Serializes a sequence of objects, each with its own serializer.
///
/// Members use the explicit `each_serializer` schema if one was given, else
/// the schema registered for their type. The `only`/`except` restriction and
/// the scope are handed to every member.
///
/// Root-flattened associations of all members are folded into one mapping,
/// so a related object reached from several members appears once.
pub struct ArraySerializer<'a> {
    registry: &'a SchemaRegistry,
    objects: Vec<&'a dyn Serializable>,
    each_serializer: Option<&'a Schema>,
    scope: Scope<'a>,
    root: Option<RootName>,
    meta_key: Cow<'static, str>,
    meta: Option<Value>,
    filter: FieldFilter,
}

impl<'a> ArraySerializer<'a> {
    /// Binds `objects`; `options.serializer` becomes the `each_serializer`.
    pub fn new(
        registry: &'a SchemaRegistry,
        objects: Vec<&'a dyn Serializable>,
        options: SerializeOptions<'a>,
    ) -> Self {
        let meta_key = options.meta_key_or_default();
        let SerializeOptions {
            scope,
            root,
            meta,
            filter,
            serializer,
            ..
        } = options;
        Self {
            registry,
            objects,
            each_serializer: serializer,
            scope,
            root,
            meta_key,
            meta,
            filter,
        }
    }

    #[inline]
    pub fn objects(&self) -> &[&'a dyn Serializable] {
        &self.objects
    }

    #[inline]
    pub fn scope(&self) -> Scope<'a> {
        self.scope
    }

    /// Document wrapper key; only an explicitly named root gives one.
    pub fn json_key(&self) -> Option<String> {
        match &self.root {
            Some(RootName::Named(name)) => Some(name.to_string()),
            _ => None,
        }
    }

    /// The serializer of one member.
    pub fn serializer_for(&self, object: &'a dyn Serializable) -> Result<Serializer<'a>, SerializeError> {
        let schema = match self.each_serializer {
            Some(schema) => schema,
            None => self.registry.schema_for(object)?,
        };
        let options = SerializeOptions {
            scope: self.scope,
            filter: self.filter.clone(),
            ..SerializeOptions::new()
        };
        Ok(Serializer::new(self.registry, schema, Some(object), options))
    }

    /// The member structures in order.
    pub fn serializable_array(&self) -> Result<Value, SerializeError> {
        let members = self
            .objects
            .iter()
            .map(|object| self.serializer_for(*object)?.serializable_object())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Value::Array(members))
    }

    /// Root-flattened associations of every member, folded in member order.
    pub fn embedded_in_root_associations(&self) -> Result<Map<String, Value>, SerializeError> {
        let mut embedded = Map::new();
        for object in &self.objects {
            let member = self.serializer_for(*object)?;
            root::merge_all(&mut embedded, member.embedded_in_root_associations()?);
        }
        Ok(embedded)
    }

    /// The full document, see [`JsonDocument::as_json`].
    #[inline]
    pub fn as_json(&self) -> Result<Value, SerializeError> {
        JsonDocument::as_json(self)
    }
}

impl JsonDocument for ArraySerializer<'_> {
    #[inline]
    fn json_key(&self) -> Option<String> {
        ArraySerializer::json_key(self)
    }

    #[inline]
    fn serializable_object(&self) -> Result<Value, SerializeError> {
        self.serializable_array()
    }

    #[inline]
    fn embedded_in_root_associations(&self) -> Result<Map<String, Value>, SerializeError> {
        ArraySerializer::embedded_in_root_associations(self)
    }

    #[inline]
    fn meta_key(&self) -> &str {
        &self.meta_key
    }

    #[inline]
    fn meta(&self) -> Option<&Value> {
        self.meta.as_ref()
    }
}

impl serde_core::Serialize for ArraySerializer<'_> {
    fn serialize<S: serde_core::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let document = self.as_json().map_err(S::Error::custom)?;
        serde_core::Serialize::serialize(&document, serializer)
    }
}

impl fmt::Debug for ArraySerializer<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArraySerializer")
            .field("objects", &self.objects)
            .field("each_serializer", &self.each_serializer.map(Schema::name))
            .field("root", &self.root)
            .field("filter", &self.filter)
            .finish_non_exhaustive()
    }
}

// -----------------------------------------------------------------------------
// Tests
