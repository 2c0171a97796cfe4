use alloc::borrow::Cow;
use alloc::string::String;
use core::any::Any;

use crate::filter::FieldFilter;
use crate::schema::{RootName, Schema};
use crate::{Scope, Value};

// -----------------------------------------------------------------------------
// SerializeOptions

/// Per-call options of a [`Serializer`](super::Serializer) or
/// [`ArraySerializer`](super::ArraySerializer).
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use vc_serializer::schema::RootName;
/// use vc_serializer::ser::SerializeOptions;
///
/// let options = SerializeOptions::new()
///     .root("item")
///     .meta(json!({ "total": 10 }))
///     .except(["secret"]);
///
/// assert_eq!(options.root, Some(RootName::named("item")));
/// assert!(!options.filter.includes("secret"));
/// ```
#[derive(Clone, Debug, Default)]
pub struct SerializeOptions<'a> {
    /// Caller context handed to resolvers and nested serializers.
    pub scope: Scope<'a>,
    /// Overrides the schema's root.
    pub root: Option<RootName>,
    /// Document key of [`meta`](Self::meta), `"meta"` when unset.
    pub meta_key: Option<Cow<'static, str>>,
    pub meta: Option<Value>,
    /// Wraps the serialized object in a one-element sequence; an absent
    /// object then serializes as `[]` instead of `null`.
    pub wrap_in_array: bool,
    /// The `only`/`except` restriction.
    pub filter: FieldFilter,
    /// Schema used instead of the registry lookup. Applies to each member
    /// of an [`ArraySerializer`](super::ArraySerializer).
    pub serializer: Option<&'a Schema>,
}

impl<'a> SerializeOptions<'a> {
    /// Options with every field unset.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn scope(mut self, scope: &'a (dyn Any + Send + Sync)) -> Self {
        self.scope = Some(scope);
        self
    }

    #[inline]
    pub fn root(mut self, root: impl Into<RootName>) -> Self {
        self.root = Some(root.into());
        self
    }

    #[inline]
    pub fn meta_key(mut self, meta_key: impl Into<Cow<'static, str>>) -> Self {
        self.meta_key = Some(meta_key.into());
        self
    }

    #[inline]
    pub fn meta(mut self, meta: Value) -> Self {
        self.meta = Some(meta);
        self
    }

    #[inline]
    pub fn wrap_in_array(mut self, wrap_in_array: bool) -> Self {
        self.wrap_in_array = wrap_in_array;
        self
    }

    /// Keeps only the named attributes and associations.
    #[inline]
    pub fn only<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.filter = FieldFilter::only(names);
        self
    }

    /// Drops the named attributes and associations.
    ///
    /// Ignored if [`only`](Self::only) was given, in either call order.
    pub fn except<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        if !matches!(self.filter, FieldFilter::Only(_)) {
            self.filter = FieldFilter::except(names);
        }
        self
    }

    #[inline]
    pub fn serializer(mut self, schema: &'a Schema) -> Self {
        self.serializer = Some(schema);
        self
    }

    /// Same as [`serializer`](Self::serializer).
    #[inline]
    pub fn each_serializer(self, schema: &'a Schema) -> Self {
        self.serializer(schema)
    }

    pub(crate) fn meta_key_or_default(&self) -> Cow<'static, str> {
        self.meta_key.clone().unwrap_or(Cow::Borrowed("meta"))
    }
}

// -----------------------------------------------------------------------------
// Tests
