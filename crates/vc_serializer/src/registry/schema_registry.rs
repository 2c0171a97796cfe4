use alloc::sync::Arc;
use core::any::{Any, TypeId};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use foldhash::fast::FixedState;
use hashbrown::hash_map::Entry;
use hashbrown::{HashMap, HashSet};

use crate::inflect::demodulize;
use crate::schema::Schema;
use crate::ser::{ArraySerializer, NestedSerializer, SerializeOptions, Serializer};
use crate::{Relation, Serializable, SerializeError};

// -----------------------------------------------------------------------------
// SchemaRegistry

/// A registry of [`Schema`]s keyed by the domain type they serialize.
///
/// Nested serialization asks the registry for the schema of each related
/// object's concrete type; a miss is a [`SerializeError::SchemaNotFound`].
///
/// Schemas are registered once during setup. Afterwards the registry is
/// only read, so serialization calls never contend on it.
///
/// # Example
///
/// ```
/// use vc_serializer::registry::SchemaRegistry;
/// use vc_serializer::schema::SchemaBuilder;
/// use vc_serializer::ser::SerializeOptions;
/// use vc_serializer::Serializable;
///
/// struct Tag { label: String }
///
/// impl Serializable for Tag {
///     fn read_attribute_for_serialization(&self, name: &str) -> Option<&dyn erased_serde::Serialize> {
///         match name {
///             "label" => Some(&self.label),
///             _ => None,
///         }
///     }
/// }
///
/// let mut registry = SchemaRegistry::new();
/// registry.register::<Tag>(SchemaBuilder::<Tag>::new().attributes(["label"]).build());
///
/// let tag = Tag { label: "rust".into() };
/// let serializer = registry.serializer(&tag, SerializeOptions::new()).unwrap();
///
/// assert_eq!(
///     serializer.as_json().unwrap(),
///     serde_json::json!({ "tag": { "label": "rust" } }),
/// );
/// ```
#[derive(Default)]
pub struct SchemaRegistry {
    schemas: HashMap<TypeId, Arc<Schema>, FixedState>,
    type_name_to_id: HashMap<&'static str, TypeId, FixedState>,
    ambiguous_names: HashSet<&'static str, FixedState>,
}

impl SchemaRegistry {
    /// Creates an empty registry.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    // # Validity
    // The type must **not** already exist.
    fn add_type_name(&mut self, type_id: TypeId, type_name: &'static str) {
        if self.ambiguous_names.contains(type_name) {
            return;
        }
        match self.type_name_to_id.entry(type_name) {
            Entry::Occupied(entry) => {
                entry.remove();
                self.ambiguous_names.insert(type_name);
            }
            Entry::Vacant(entry) => {
                entry.insert(type_id);
            }
        }
    }

    /// Registers `schema` for `T`, returning the schema it replaces.
    pub fn register<T: Serializable>(&mut self, schema: impl Into<Arc<Schema>>) -> Option<Arc<Schema>> {
        let type_id = TypeId::of::<T>();
        let previous = self.schemas.insert(type_id, schema.into());
        match &previous {
            Some(_) => log::warn!(
                "schema for `{}` replaced by a new registration",
                core::any::type_name::<T>()
            ),
            None => self.add_type_name(type_id, demodulize(core::any::type_name::<T>())),
        }
        previous
    }

    /// Registers `schema` for `T` unless `T` already has one.
    ///
    /// Returns `true` if the schema was inserted. `schema` is only called on insertion.
    pub fn try_register<T: Serializable>(&mut self, schema: impl FnOnce() -> Schema) -> bool {
        let type_id = TypeId::of::<T>();
        if self.schemas.contains_key(&type_id) {
            return false;
        }
        self.schemas.insert(type_id, Arc::new(schema()));
        self.add_type_name(type_id, demodulize(core::any::type_name::<T>()));
        true
    }

    /// Whether a schema is registered for the type with the given [`TypeId`].
    #[inline]
    pub fn contains(&self, type_id: TypeId) -> bool {
        self.schemas.contains_key(&type_id)
    }

    /// Returns the schema registered for the type with the given [`TypeId`].
    #[inline]
    pub fn get(&self, type_id: TypeId) -> Option<&Arc<Schema>> {
        self.schemas.get(&type_id)
    }

    /// Returns the schema registered for `T`.
    #[inline]
    pub fn get_of<T: Serializable>(&self) -> Option<&Arc<Schema>> {
        self.get(TypeId::of::<T>())
    }

    /// Returns the schema registered for the type with the short name `type_name`
    /// (`Post` for `blog::model::Post`).
    ///
    /// Returns `None` if the name is ambiguous or unknown.
    pub fn get_with_type_name(&self, type_name: &str) -> Option<&Arc<Schema>> {
        match self.type_name_to_id.get(type_name) {
            Some(id) => self.get(*id),
            None => None,
        }
    }

    /// Returns `true` if several registered types share the short name `type_name`.
    #[inline]
    pub fn is_ambiguous(&self, type_name: &str) -> bool {
        self.ambiguous_names.contains(type_name)
    }

    /// Returns the number of registered schemas.
    #[inline]
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    /// Returns an iterator over the registered schemas.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (TypeId, &Arc<Schema>)> {
        self.schemas.iter().map(|(id, schema)| (*id, schema))
    }

    /// Returns the schema for the concrete type of `object`.
    pub fn schema_for(&self, object: &dyn Serializable) -> Result<&Schema, SerializeError> {
        let any: &dyn Any = object;
        match self.get(any.type_id()) {
            Some(schema) => Ok(schema.as_ref()),
            None => {
                log::debug!("no schema registered for `{}`", object.type_name());
                Err(SerializeError::SchemaNotFound {
                    type_name: object.type_name(),
                })
            }
        }
    }

    /// Binds a [`Serializer`] to `object`.
    ///
    /// The schema is `options.serializer` if given, else the one registered
    /// for the type of `object`.
    pub fn serializer<'a>(
        &'a self,
        object: &'a dyn Serializable,
        options: SerializeOptions<'a>,
    ) -> Result<Serializer<'a>, SerializeError> {
        let schema = match options.serializer {
            Some(schema) => schema,
            None => self.schema_for(object)?,
        };
        Ok(Serializer::new(self, schema, Some(object), options))
    }

    /// Selects the serializer for a relation value, see [`NestedSerializer::build`].
    #[inline]
    pub fn serializer_for<'a>(
        &'a self,
        related: Relation<'a>,
        options: SerializeOptions<'a>,
    ) -> Result<NestedSerializer<'a>, SerializeError> {
        NestedSerializer::build(self, related, options)
    }

    /// Binds an [`ArraySerializer`] to `objects`; each member uses the schema
    /// of its own type.
    pub fn array_serializer<'a>(
        &'a self,
        objects: impl IntoIterator<Item = &'a dyn Serializable>,
        options: SerializeOptions<'a>,
    ) -> ArraySerializer<'a> {
        ArraySerializer::new(self, objects.into_iter().collect(), options)
    }

    /// Registers every schema submitted with [`auto_register_schema!`](crate::auto_register_schema).
    ///
    /// Types that already have a schema keep it. Returns the number of
    /// schemas inserted; always `0` without the `auto_register` feature.
    #[cfg_attr(not(feature = "auto_register"), inline(always))]
    pub fn auto_register(&mut self) -> usize {
        #[cfg(feature = "auto_register")]
        {
            super::auto_register::register_submitted(self)
        }
        #[cfg(not(feature = "auto_register"))]
        {
            0
        }
    }
}

impl core::fmt::Debug for SchemaRegistry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_set()
            .entries(self.schemas.values().map(|schema| schema.name()))
            .finish()
    }
}

// -----------------------------------------------------------------------------
// SchemaRegistryArc

/// A shared, lockable [`SchemaRegistry`].
#[derive(Clone, Default)]
pub struct SchemaRegistryArc {
    /// The wrapped [`SchemaRegistry`].
    pub internal: Arc<RwLock<SchemaRegistry>>,
}

impl SchemaRegistryArc {
    /// Takes a read lock on the underlying [`SchemaRegistry`].
    pub fn read(&self) -> RwLockReadGuard<'_, SchemaRegistry> {
        self.internal.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Takes a write lock on the underlying [`SchemaRegistry`].
    pub fn write(&self) -> RwLockWriteGuard<'_, SchemaRegistry> {
        self.internal
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl From<SchemaRegistry> for SchemaRegistryArc {
    #[inline]
    fn from(registry: SchemaRegistry) -> Self {
        Self {
            internal: Arc::new(RwLock::new(registry)),
        }
    }
}

impl core::fmt::Debug for SchemaRegistryArc {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Debug::fmt(&*self.read(), f)
    }
}

// -----------------------------------------------------------------------------
// Tests
