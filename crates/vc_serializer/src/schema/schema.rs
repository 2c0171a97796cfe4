use alloc::borrow::Cow;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use foldhash::fast::FixedState;
use hashbrown::HashMap;

use crate::inflect::{demodulize, underscore};
use crate::schema::resolver::{AttributeResolver, RelationResolver};
use crate::schema::{AssociationDescriptor, SchemaBuilder};
use crate::{Relation, Scope, Serializable, SerializeError, Value};

pub(crate) type FieldMap<V> = HashMap<Cow<'static, str>, V, FixedState>;

// -----------------------------------------------------------------------------
// RootName

/// The document wrapper key of a schema or of one serialization call.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum RootName {
    /// Derived from the schema name, see [`Schema::root_name`].
    #[default]
    Default,
    /// No wrapper key.
    Disabled,
    /// An explicit wrapper key.
    Named(Cow<'static, str>),
}

impl RootName {
    /// Shorthand for [`RootName::Named`].
    #[inline]
    pub fn named(name: impl Into<Cow<'static, str>>) -> Self {
        Self::Named(name.into())
    }
}

impl From<bool> for RootName {
    /// `true` is [`RootName::Default`], `false` is [`RootName::Disabled`].
    #[inline]
    fn from(value: bool) -> Self {
        if value { Self::Default } else { Self::Disabled }
    }
}

impl From<&'static str> for RootName {
    #[inline]
    fn from(value: &'static str) -> Self {
        Self::Named(Cow::Borrowed(value))
    }
}

impl From<String> for RootName {
    #[inline]
    fn from(value: String) -> Self {
        Self::Named(Cow::Owned(value))
    }
}

// -----------------------------------------------------------------------------
// Schema

/// The declared output shape of one type.
///
/// A `Schema` is immutable once built; declarations go through
/// [`SchemaBuilder`]. Deriving a schema from another one copies its
/// attributes, flattened attributes, associations and resolvers, so the
/// parent's declarations come first and the parent is never affected.
///
/// # Examples
///
/// ```
/// use vc_serializer::Serializable;
/// use vc_serializer::schema::SchemaBuilder;
///
/// struct Profile { name: String }
///
/// impl Serializable for Profile {
///     fn read_attribute_for_serialization(&self, name: &str) -> Option<&dyn erased_serde::Serialize> {
///         match name {
///             "name" => Some(&self.name),
///             _ => None,
///         }
///     }
/// }
///
/// let profile = SchemaBuilder::<Profile>::new()
///     .attributes(["name", "description"])
///     .build();
///
/// let extended = SchemaBuilder::<Profile>::extend(&profile)
///     .attributes(["comments"])
///     .build();
///
/// assert!(profile.attributes().eq(["name", "description"]));
/// assert!(extended.attributes().eq(["name", "description", "comments"]));
/// assert_eq!(profile.root_name().as_deref(), Some("profile"));
/// ```
#[derive(Clone)]
pub struct Schema {
    pub(crate) name: Option<Cow<'static, str>>,
    pub(crate) root: Option<RootName>,
    pub(crate) attributes: Vec<Cow<'static, str>>,
    pub(crate) flattened_attributes: FieldMap<Vec<Cow<'static, str>>>,
    pub(crate) associations: Vec<AssociationDescriptor>,
    pub(crate) attribute_resolvers: FieldMap<AttributeResolver>,
    pub(crate) relation_resolvers: FieldMap<RelationResolver>,
}

impl Schema {
    pub(crate) fn empty(name: Option<Cow<'static, str>>) -> Self {
        Self {
            name,
            root: None,
            attributes: Vec::new(),
            flattened_attributes: FieldMap::default(),
            associations: Vec::new(),
            attribute_resolvers: FieldMap::default(),
            relation_resolvers: FieldMap::default(),
        }
    }

    /// Starts declaring a schema for `T`, see [`SchemaBuilder::new`].
    #[inline]
    pub fn builder<T: Serializable>() -> SchemaBuilder<T> {
        SchemaBuilder::new()
    }

    /// The schema's own name, `None` for anonymous schemas.
    #[inline]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The declared wrapper key, if any.
    #[inline]
    pub fn root(&self) -> Option<&RootName> {
        self.root.as_ref()
    }

    /// Derives the default wrapper key from the schema name.
    ///
    /// The module path is stripped, the name is converted to snake case
    /// and a trailing `_serializer` is removed: `app::AdminSerializer`
    /// becomes `admin`. Anonymous schemas have no default name.
    pub fn root_name(&self) -> Option<String> {
        let name = self.name.as_deref()?;
        let mut root = underscore(demodulize(name));
        if let Some(len) = root.strip_suffix("_serializer").map(str::len) {
            root.truncate(len);
        }
        Some(root)
    }

    /// Declared attributes in output order.
    #[inline]
    pub fn attributes(&self) -> impl ExactSizeIterator<Item = &str> + Clone {
        self.attributes.iter().map(|name| name.as_ref())
    }

    /// The hop chain of a flattened attribute.
    #[inline]
    pub fn flattened_attribute(&self, name: &str) -> Option<&[Cow<'static, str>]> {
        self.flattened_attributes.get(name).map(Vec::as_slice)
    }

    /// Declared associations in declaration order.
    #[inline]
    pub fn associations(&self) -> &[AssociationDescriptor] {
        &self.associations
    }

    /// The association declared as `name`.
    pub fn association(&self, name: &str) -> Option<&AssociationDescriptor> {
        self.associations.iter().find(|assoc| assoc.name() == name)
    }

    /// Which fields are read to produce each attribute.
    ///
    /// A plain attribute maps to itself, a flattened one to its hop chain.
    /// Attributes with a custom resolver also map to themselves.
    ///
    /// ```text
    /// [("name", ["name"]), ("profile_name", ["profile", "name"])]
    /// ```
    pub fn attribute_method_mapping(&self) -> Vec<(&str, Vec<&str>)> {
        self.attributes
            .iter()
            .map(|name| {
                let chain = match self.flattened_attributes.get(name) {
                    Some(chain) => chain.iter().map(|hop| hop.as_ref()).collect(),
                    None => alloc::vec![name.as_ref()],
                };
                (name.as_ref(), chain)
            })
            .collect()
    }

    /// Resolves the attribute `name` on `object`.
    ///
    /// Undeclared names resolve to `null`.
    pub fn resolve_attribute(
        &self,
        name: &str,
        object: &dyn Serializable,
        scope: Scope<'_>,
    ) -> Result<Value, SerializeError> {
        match self.attribute_resolvers.get(name) {
            Some(resolver) => resolver.resolve(object, scope),
            None => Ok(Value::Null),
        }
    }

    /// Reads the object(s) related to `object` through the association `name`.
    pub fn resolve_relation<'o>(
        &self,
        name: &str,
        object: &'o dyn Serializable,
        scope: Scope<'_>,
    ) -> Result<Relation<'o>, SerializeError> {
        match self.relation_resolvers.get(name) {
            Some(resolver) => resolver.resolve(object, scope),
            None => Ok(object.relation(name)),
        }
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("name", &self.name)
            .field("root", &self.root)
            .field("attributes", &self.attributes)
            .field("associations", &self.associations)
            .finish_non_exhaustive()
    }
}

// -----------------------------------------------------------------------------
// Tests
