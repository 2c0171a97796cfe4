use alloc::vec::Vec;
use core::any::Any;
use core::fmt;

// -----------------------------------------------------------------------------
// Scope

/// Opaque caller context handed to every resolver.
///
/// The engine never inspects it; it is passed unchanged to nested serializers
/// so that custom resolvers deep in the object graph see the same context
/// (for example the current user) as the top-level call.
pub type Scope<'a> = Option<&'a (dyn Any + Send + Sync)>;

// -----------------------------------------------------------------------------
// Serializable

/// The lookup convention a domain type exposes to the serialization engine.
///
/// - [`read_attribute_for_serialization`] reads a scalar field by name.
///   Returning `None` makes the field serialize as `null`.
/// - [`relation`] follows a relation by name. It is used by default
///   association resolvers and by every hop of a flattened attribute.
///
/// Identifiers used by `embed: ids` associations are read through
/// [`read_attribute_for_serialization`] as well, with the association's
/// `embed_key` (`"id"` unless configured).
///
/// # Examples
///
/// ```
/// use vc_serializer::{Relation, Serializable};
///
/// struct Author { id: u32, name: String }
///
/// struct Post { title: String, author: Option<Author> }
///
/// impl Serializable for Author {
///     fn read_attribute_for_serialization(&self, name: &str) -> Option<&dyn erased_serde::Serialize> {
///         match name {
///             "id" => Some(&self.id),
///             "name" => Some(&self.name),
///             _ => None,
///         }
///     }
/// }
///
/// impl Serializable for Post {
///     fn read_attribute_for_serialization(&self, name: &str) -> Option<&dyn erased_serde::Serialize> {
///         match name {
///             "title" => Some(&self.title),
///             _ => None,
///         }
///     }
///
///     fn relation(&self, name: &str) -> Relation<'_> {
///         match name {
///             "author" => Relation::one(self.author.as_ref()),
///             _ => Relation::Absent,
///         }
///     }
/// }
///
/// let post = Post { title: "Hi".into(), author: None };
/// assert!(post.relation("author").is_absent());
/// ```
///
/// [`read_attribute_for_serialization`]: Serializable::read_attribute_for_serialization
/// [`relation`]: Serializable::relation
pub trait Serializable: Any + 'static {
    /// Reads the field `name` for serialization.
    fn read_attribute_for_serialization(&self, name: &str) -> Option<&dyn erased_serde::Serialize>;

    /// Returns the object(s) related through `name`.
    #[inline]
    fn relation(&self, name: &str) -> Relation<'_> {
        let _ = name;
        Relation::Absent
    }

    /// Returns the concrete type name, used in error messages.
    #[inline]
    fn type_name(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

impl fmt::Debug for dyn Serializable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("dyn Serializable")
            .field(&self.type_name())
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Relation

/// The value of a relation read off a domain object.
#[derive(Debug, Default)]
pub enum Relation<'a> {
    /// No related object.
    #[default]
    Absent,
    /// A single related object.
    One(&'a dyn Serializable),
    /// A sequence of related objects, possibly empty.
    Many(Vec<&'a dyn Serializable>),
}

impl<'a> Relation<'a> {
    /// Builds a single-valued relation, `Absent` for `None`.
    #[inline]
    pub fn one<T: Serializable>(value: Option<&'a T>) -> Self {
        match value {
            Some(value) => Self::One(value),
            None => Self::Absent,
        }
    }

    /// Builds a multi-valued relation.
    pub fn many<T: Serializable>(values: impl IntoIterator<Item = &'a T>) -> Self {
        Self::Many(
            values
                .into_iter()
                .map(|value| value as &'a dyn Serializable)
                .collect(),
        )
    }

    /// Returns `true` for [`Relation::Absent`].
    #[inline]
    pub const fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// Returns `true` if the relation behaves as a sequence.
    #[inline]
    pub const fn is_many(&self) -> bool {
        matches!(self, Self::Many(_))
    }
}

// -----------------------------------------------------------------------------
// Tests
