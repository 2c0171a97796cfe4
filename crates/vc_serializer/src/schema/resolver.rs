use alloc::borrow::Cow;
use alloc::sync::Arc;
use core::any::Any;
use core::fmt;

use serde_json::Value;

use crate::{Relation, Scope, Serializable, SerializeError};

// -----------------------------------------------------------------------------
// Resolver functions

pub(crate) type AttributeFn =
    dyn Fn(&dyn Serializable, Scope<'_>) -> Result<Value, SerializeError> + Send + Sync;

pub(crate) type RelationFn = dyn for<'o> Fn(&'o dyn Serializable, Scope<'_>) -> Result<Relation<'o>, SerializeError>
    + Send
    + Sync;

/// Pins the closure signature so the higher-ranked lifetimes are inferred.
#[inline]
pub(crate) fn attribute_fn<F>(f: F) -> Arc<AttributeFn>
where
    F: Fn(&dyn Serializable, Scope<'_>) -> Result<Value, SerializeError> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Pins the closure signature so the higher-ranked lifetimes are inferred.
#[inline]
pub(crate) fn relation_fn<F>(f: F) -> Arc<RelationFn>
where
    F: for<'o> Fn(&'o dyn Serializable, Scope<'_>) -> Result<Relation<'o>, SerializeError>
        + Send
        + Sync
        + 'static,
{
    Arc::new(f)
}

/// Recovers the concrete type a typed resolver was declared for.
pub(crate) fn downcast<T: Serializable>(object: &dyn Serializable) -> Result<&T, SerializeError> {
    let any: &dyn Any = object;
    any.downcast_ref::<T>()
        .ok_or_else(|| SerializeError::TypeMismatch {
            expected: core::any::type_name::<T>(),
            found: object.type_name(),
        })
}

// -----------------------------------------------------------------------------
// Field reads

/// Reads `field` off `object`; a missing field is `null`.
pub(crate) fn read_field(object: &dyn Serializable, field: &str) -> Result<Value, SerializeError> {
    match object.read_attribute_for_serialization(field) {
        Some(value) => serde_json::to_value(value).map_err(|e| SerializeError::value(field, e)),
        None => Ok(Value::Null),
    }
}

/// Walks every hop but the last, then reads the last segment as a field.
///
/// Any absent (or multi-valued) intermediate hop makes the result `null`.
pub(crate) fn read_chain(
    object: &dyn Serializable,
    chain: &[Cow<'static, str>],
) -> Result<Value, SerializeError> {
    let Some((field, hops)) = chain.split_last() else {
        return Ok(Value::Null);
    };
    let mut current = object;
    for hop in hops {
        match current.relation(hop) {
            Relation::One(next) => current = next,
            Relation::Absent | Relation::Many(_) => return Ok(Value::Null),
        }
    }
    read_field(current, field)
}

// -----------------------------------------------------------------------------
// AttributeResolver

/// Computes one exposed scalar value.
#[derive(Clone)]
pub(crate) enum AttributeResolver {
    /// Reads the field of the same name.
    Field(Cow<'static, str>),
    /// Walks a hop chain, see [`read_chain`].
    Chain(Arc<[Cow<'static, str>]>),
    /// User-provided function.
    Custom(Arc<AttributeFn>),
}

impl AttributeResolver {
    #[inline]
    pub(crate) fn resolve(
        &self,
        object: &dyn Serializable,
        scope: Scope<'_>,
    ) -> Result<Value, SerializeError> {
        match self {
            Self::Field(field) => read_field(object, field),
            Self::Chain(chain) => read_chain(object, chain),
            Self::Custom(f) => f(object, scope),
        }
    }
}

impl fmt::Debug for AttributeResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field(field) => f.debug_tuple("Field").field(field).finish(),
            Self::Chain(chain) => f.debug_tuple("Chain").field(chain).finish(),
            Self::Custom(_) => f.write_str("Custom"),
        }
    }
}

// -----------------------------------------------------------------------------
// RelationResolver

/// Reads the related object(s) of one association.
#[derive(Clone)]
pub(crate) enum RelationResolver {
    /// Follows [`Serializable::relation`] with the association name.
    Field(Cow<'static, str>),
    /// User-provided function.
    Custom(Arc<RelationFn>),
}

impl RelationResolver {
    #[inline]
    pub(crate) fn resolve<'o>(
        &self,
        object: &'o dyn Serializable,
        scope: Scope<'_>,
    ) -> Result<Relation<'o>, SerializeError> {
        match self {
            Self::Field(name) => Ok(object.relation(name)),
            Self::Custom(f) => f(object, scope),
        }
    }
}

impl fmt::Debug for RelationResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field(name) => f.debug_tuple("Field").field(name).finish(),
            Self::Custom(_) => f.write_str("Custom"),
        }
    }
}

// -----------------------------------------------------------------------------
// Tests
