use alloc::borrow::Cow;
use alloc::format;
use alloc::sync::Arc;

use crate::config::{Config, EmbedStrategy};
use crate::inflect::{pluralize, singularize};
use crate::schema::Schema;

// -----------------------------------------------------------------------------
// Cardinality

/// Whether a relation holds one object or a sequence of objects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Cardinality {
    One,
    Many,
}

// -----------------------------------------------------------------------------
// EmbedMode

/// What one association contributes to a serialization call.
///
/// Exactly one mode applies per association:
///
/// | `embed`   | `embed_in_root` | mode     |
/// |-----------|-----------------|----------|
/// | `none`    | any             | `Skip`   |
/// | `ids`     | any             | `Ids`    |
/// | `objects` | `false`         | `Inline` |
/// | `objects` | `true`          | `Root`   |
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EmbedMode {
    /// Nothing is emitted.
    Skip,
    /// Identifier(s) under [`AssociationDescriptor::key`].
    Ids,
    /// Nested structure(s) under [`AssociationDescriptor::embedded_key`].
    Inline,
    /// Lifted to the document root under [`AssociationDescriptor::root_key`].
    Root,
}

// -----------------------------------------------------------------------------
// AssociationOptions

/// Per-association options given at declaration.
///
/// Unset `embed` and `embed_in_root` fall back to the schema builder's
/// defaults, which come from [`config::current`](crate::config::current).
///
/// # Examples
///
/// ```
/// use vc_serializer::config::EmbedStrategy;
/// use vc_serializer::schema::AssociationOptions;
///
/// let options = AssociationOptions::new()
///     .embed(EmbedStrategy::Ids)
///     .key("writer_id")
///     .embed_key("uuid");
/// # let _ = options;
/// ```
#[derive(Clone, Debug, Default)]
pub struct AssociationOptions {
    embed: Option<EmbedStrategy>,
    embed_in_root: Option<bool>,
    embed_key: Option<Cow<'static, str>>,
    key: Option<Cow<'static, str>>,
    embedded_key: Option<Cow<'static, str>>,
    root_key: Option<Cow<'static, str>>,
    serializer: Option<Arc<Schema>>,
}

impl AssociationOptions {
    /// Options with every field unset.
    #[inline]
    pub const fn new() -> Self {
        Self {
            embed: None,
            embed_in_root: None,
            embed_key: None,
            key: None,
            embedded_key: None,
            root_key: None,
            serializer: None,
        }
    }

    #[inline]
    pub fn embed(mut self, embed: EmbedStrategy) -> Self {
        self.embed = Some(embed);
        self
    }

    #[inline]
    pub fn embed_in_root(mut self, embed_in_root: bool) -> Self {
        self.embed_in_root = Some(embed_in_root);
        self
    }

    /// Field read off each related object when embedding ids. Defaults to `"id"`.
    #[inline]
    pub fn embed_key(mut self, embed_key: impl Into<Cow<'static, str>>) -> Self {
        self.embed_key = Some(embed_key.into());
        self
    }

    /// Output key for embedded ids.
    #[inline]
    pub fn key(mut self, key: impl Into<Cow<'static, str>>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Output key for inline objects.
    #[inline]
    pub fn embedded_key(mut self, embedded_key: impl Into<Cow<'static, str>>) -> Self {
        self.embedded_key = Some(embedded_key.into());
        self
    }

    /// Output key for objects flattened to the document root.
    #[inline]
    pub fn root_key(mut self, root_key: impl Into<Cow<'static, str>>) -> Self {
        self.root_key = Some(root_key.into());
        self
    }

    /// Serializes the related object with `schema` instead of the registered one.
    #[inline]
    pub fn serializer(mut self, schema: impl Into<Arc<Schema>>) -> Self {
        self.serializer = Some(schema.into());
        self
    }

    /// Serializes each member of a multi-valued relation with `schema`.
    ///
    /// Same as [`serializer`](Self::serializer); reads better on `has_many`.
    #[inline]
    pub fn each_serializer(self, schema: impl Into<Arc<Schema>>) -> Self {
        self.serializer(schema)
    }
}

// -----------------------------------------------------------------------------
// AssociationDescriptor

/// A declared relation with every option resolved.
///
/// Derived keys, for relation `name`:
///
/// | key            | has_one               | has_many                   |
/// |----------------|-----------------------|----------------------------|
/// | `key`          | `{name}_id`           | `{singular(name)}_ids`     |
/// | `embedded_key` | `name`                | `name`                     |
/// | `root_key`     | `plural(embedded_key)`| `embedded_key`             |
#[derive(Clone, Debug)]
pub struct AssociationDescriptor {
    name: Cow<'static, str>,
    cardinality: Cardinality,
    embed: EmbedStrategy,
    embed_in_root: bool,
    embed_key: Cow<'static, str>,
    key: Cow<'static, str>,
    embedded_key: Cow<'static, str>,
    root_key: Cow<'static, str>,
    serializer: Option<Arc<Schema>>,
}

impl AssociationDescriptor {
    /// Resolves `options` against `defaults`.
    pub fn new(
        name: Cow<'static, str>,
        cardinality: Cardinality,
        options: AssociationOptions,
        defaults: Config,
    ) -> Self {
        let AssociationOptions {
            embed,
            embed_in_root,
            embed_key,
            key,
            embedded_key,
            root_key,
            serializer,
        } = options;

        let embedded_key = embedded_key.unwrap_or_else(|| name.clone());
        let key = key.unwrap_or_else(|| match cardinality {
            Cardinality::One => format!("{name}_id").into(),
            Cardinality::Many => format!("{}_ids", singularize(&name)).into(),
        });
        let root_key = root_key.unwrap_or_else(|| match cardinality {
            Cardinality::One => pluralize(&embedded_key).into(),
            Cardinality::Many => embedded_key.clone(),
        });

        Self {
            name,
            cardinality,
            embed: embed.unwrap_or(defaults.embed),
            embed_in_root: embed_in_root.unwrap_or(defaults.embed_in_root),
            embed_key: embed_key.unwrap_or(Cow::Borrowed("id")),
            key,
            embedded_key,
            root_key,
            serializer,
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub const fn cardinality(&self) -> Cardinality {
        self.cardinality
    }

    #[inline]
    pub const fn embed(&self) -> EmbedStrategy {
        self.embed
    }

    #[inline]
    pub const fn embed_in_root(&self) -> bool {
        self.embed_in_root
    }

    #[inline]
    pub fn embed_key(&self) -> &str {
        &self.embed_key
    }

    #[inline]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[inline]
    pub fn embedded_key(&self) -> &str {
        &self.embedded_key
    }

    #[inline]
    pub fn root_key(&self) -> &str {
        &self.root_key
    }

    /// The explicit schema for the related object(s), if any.
    #[inline]
    pub fn serializer(&self) -> Option<&Schema> {
        self.serializer.as_deref()
    }

    /// See [`EmbedMode`].
    pub const fn mode(&self) -> EmbedMode {
        match (self.embed, self.embed_in_root) {
            (EmbedStrategy::None, _) => EmbedMode::Skip,
            (EmbedStrategy::Ids, _) => EmbedMode::Ids,
            (EmbedStrategy::Objects, false) => EmbedMode::Inline,
            (EmbedStrategy::Objects, true) => EmbedMode::Root,
        }
    }
}

// -----------------------------------------------------------------------------
// Tests
