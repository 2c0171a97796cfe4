use alloc::borrow::Cow;
use alloc::format;
use alloc::vec::Vec;
use core::marker::PhantomData;

use hashbrown::hash_map::Entry;
use serde_core::Serialize;

use crate::config::{self, Config};
use crate::inflect::demodulize;
use crate::schema::resolver::{AttributeResolver, RelationResolver};
use crate::schema::resolver::{attribute_fn, downcast, relation_fn};
use crate::schema::{AssociationDescriptor, AssociationOptions, Cardinality, RootName, Schema};
use crate::{Relation, Scope, Serializable, SerializeError};

// -----------------------------------------------------------------------------
// SchemaBuilder

/// Declares the [`Schema`] of the domain type `T`.
///
/// Declarations are applied in call order:
///
/// - [`attributes`](Self::attributes) appends names and installs a field
///   read for every name that has no resolver yet.
/// - [`flattened_attributes`](Self::flattened_attributes) records hop chains,
///   installs chain resolvers the same way, and appends the output names.
/// - [`attribute_with`](Self::attribute_with) installs a custom resolver,
///   replacing whatever was installed for that name.
/// - [`has_one`](Self::has_one) / [`has_many`](Self::has_many) store
///   association descriptors and install relation reads the same way.
///
/// Re-declaring a name never replaces an installed resolver.
///
/// # Examples
///
/// ```
/// use vc_serializer::config::EmbedStrategy;
/// use vc_serializer::schema::{AssociationOptions, SchemaBuilder};
/// # use vc_serializer::{Relation, Serializable};
/// # struct Post;
/// # impl Serializable for Post {
/// #     fn read_attribute_for_serialization(&self, _: &str) -> Option<&dyn erased_serde::Serialize> { None }
/// # }
///
/// let schema = SchemaBuilder::<Post>::new()
///     .attributes(["title", "body"])
///     .flattened_attributes([("author_name", ["author", "name"])])
///     .attribute_with("title", |_post: &Post, _scope| "Custom")
///     .has_many(["comments"], AssociationOptions::new().embed(EmbedStrategy::Ids))
///     .has_one(["author"], AssociationOptions::new())
///     .build();
///
/// assert!(schema.attributes().eq(["title", "body", "author_name"]));
/// assert_eq!(schema.association("comments").unwrap().key(), "comment_ids");
/// ```
#[must_use]
pub struct SchemaBuilder<T: Serializable> {
    schema: Schema,
    defaults: Config,
    _marker: PhantomData<fn(&T)>,
}

impl<T: Serializable> SchemaBuilder<T> {
    /// An empty schema named `{T}Serializer`.
    pub fn new() -> Self {
        let name = format!("{}Serializer", demodulize(core::any::type_name::<T>()));
        Self::from_schema(Schema::empty(Some(name.into())))
    }

    /// An empty schema with an explicit name.
    pub fn named(name: impl Into<Cow<'static, str>>) -> Self {
        Self::from_schema(Schema::empty(Some(name.into())))
    }

    /// An empty schema without a name, hence without a default root name.
    pub fn anonymous() -> Self {
        Self::from_schema(Schema::empty(None))
    }

    /// Starts from a copy of `parent`.
    ///
    /// Attributes, flattened attributes, associations, resolvers and the
    /// declared root are copied; the name is `{T}Serializer`. The copy is
    /// independent, so nothing declared here affects `parent`.
    pub fn extend(parent: &Schema) -> Self {
        let mut builder = Self::new();
        let name = builder.schema.name.take();
        builder.schema = Schema {
            name,
            ..parent.clone()
        };
        builder
    }

    fn from_schema(schema: Schema) -> Self {
        Self {
            schema,
            defaults: config::current(),
            _marker: PhantomData,
        }
    }

    /// Renames the schema; `None` makes it anonymous.
    pub fn rename(mut self, name: Option<Cow<'static, str>>) -> Self {
        self.schema.name = name;
        self
    }

    /// Replaces the embedding defaults used by later association declarations.
    ///
    /// The builder starts with [`config::current`].
    pub fn defaults(mut self, defaults: Config) -> Self {
        self.defaults = defaults;
        self
    }

    /// Declares the document wrapper key.
    pub fn root(mut self, root: impl Into<RootName>) -> Self {
        self.schema.root = Some(root.into());
        self
    }

    fn push_attribute(&mut self, name: Cow<'static, str>) {
        if !self.schema.attributes.contains(&name) {
            self.schema.attributes.push(name);
        }
    }

    /// Declares attributes read directly off the object.
    pub fn attributes<N>(mut self, names: impl IntoIterator<Item = N>) -> Self
    where
        N: Into<Cow<'static, str>>,
    {
        for name in names {
            let name = name.into();
            if let Entry::Vacant(entry) = self.schema.attribute_resolvers.entry(name.clone()) {
                entry.insert(AttributeResolver::Field(name.clone()));
            }
            self.push_attribute(name);
        }
        self
    }

    /// Declares attributes read at the end of a chain of relations.
    ///
    /// `("profile_name", ["profile", "name"])` follows the `profile` relation
    /// and reads its `name` field. An absent hop yields `null`.
    pub fn flattened_attributes<N, C, S>(mut self, entries: impl IntoIterator<Item = (N, C)>) -> Self
    where
        N: Into<Cow<'static, str>>,
        C: IntoIterator<Item = S>,
        S: Into<Cow<'static, str>>,
    {
        for (name, chain) in entries {
            let name = name.into();
            let chain: Vec<Cow<'static, str>> = chain.into_iter().map(Into::into).collect();
            if let Entry::Vacant(entry) = self.schema.attribute_resolvers.entry(name.clone()) {
                entry.insert(AttributeResolver::Chain(chain.as_slice().into()));
            }
            self.schema.flattened_attributes.insert(name.clone(), chain);
            self.push_attribute(name);
        }
        self
    }

    /// Installs a custom resolver for the attribute `name`.
    ///
    /// The name is not declared by this call; pair it with
    /// [`attributes`](Self::attributes) (in either order).
    pub fn attribute_with<V, F>(mut self, name: impl Into<Cow<'static, str>>, f: F) -> Self
    where
        V: Serialize,
        F: Fn(&T, Scope<'_>) -> V + Send + Sync + 'static,
    {
        let name = name.into();
        let field = name.clone();
        let resolver = attribute_fn(move |object, scope| {
            let value = f(downcast::<T>(object)?, scope);
            serde_json::to_value(value).map_err(|e| SerializeError::value(&field, e))
        });
        self.schema
            .attribute_resolvers
            .insert(name, AttributeResolver::Custom(resolver));
        self
    }

    fn associate<N>(
        mut self,
        cardinality: Cardinality,
        names: impl IntoIterator<Item = N>,
        options: AssociationOptions,
    ) -> Self
    where
        N: Into<Cow<'static, str>>,
    {
        for name in names {
            let name = name.into();
            if let Entry::Vacant(entry) = self.schema.relation_resolvers.entry(name.clone()) {
                entry.insert(RelationResolver::Field(name.clone()));
            }
            let descriptor =
                AssociationDescriptor::new(name, cardinality, options.clone(), self.defaults);
            let associations = &mut self.schema.associations;
            match associations.iter_mut().find(|a| a.name() == descriptor.name()) {
                Some(slot) => *slot = descriptor,
                None => associations.push(descriptor),
            }
        }
        self
    }

    /// Declares single-valued associations.
    #[inline]
    pub fn has_one<N>(self, names: impl IntoIterator<Item = N>, options: AssociationOptions) -> Self
    where
        N: Into<Cow<'static, str>>,
    {
        self.associate(Cardinality::One, names, options)
    }

    /// Declares multi-valued associations.
    #[inline]
    pub fn has_many<N>(self, names: impl IntoIterator<Item = N>, options: AssociationOptions) -> Self
    where
        N: Into<Cow<'static, str>>,
    {
        self.associate(Cardinality::Many, names, options)
    }

    /// Installs a custom relation read for the association `name`.
    pub fn association_with<F>(mut self, name: impl Into<Cow<'static, str>>, f: F) -> Self
    where
        F: for<'o> Fn(&'o T, Scope<'_>) -> Relation<'o> + Send + Sync + 'static,
    {
        let resolver = relation_fn(move |object, scope| Ok(f(downcast::<T>(object)?, scope)));
        self.schema
            .relation_resolvers
            .insert(name.into(), RelationResolver::Custom(resolver));
        self
    }

    /// Finishes the declaration.
    #[inline]
    pub fn build(self) -> Schema {
        self.schema
    }
}

impl<T: Serializable> Default for SchemaBuilder<T> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

// -----------------------------------------------------------------------------
// Tests
