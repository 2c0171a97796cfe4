use alloc::borrow::Cow;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;

use serde_core::ser::Error as _;

use crate::filter::FieldFilter;
use crate::registry::SchemaRegistry;
use crate::schema::resolver::read_field;
use crate::schema::{AssociationDescriptor, Cardinality, EmbedMode, RootName, Schema};
use crate::ser::{JsonDocument, NestedSerializer, SerializeOptions, root};
use crate::{Map, Relation, Scope, Serializable, SerializeError, Value};

// -----------------------------------------------------------------------------
// Serializer

/// Serializes one (possibly absent) object according to a [`Schema`].
///
/// A serializer is created per call, usually through
/// [`SchemaRegistry::serializer`], and is never mutated afterwards.
///
/// - [`serializable_object`](Self::serializable_object) produces the object
///   structure: attributes followed by ids and inline associations.
/// - [`embedded_in_root_associations`](Self::embedded_in_root_associations)
///   collects the associations flattened to the document root.
/// - [`as_json`](Self::as_json) composes both with the json key and meta,
///   see [`JsonDocument`].
pub struct Serializer<'a> {
    registry: &'a SchemaRegistry,
    schema: &'a Schema,
    object: Option<&'a dyn Serializable>,
    scope: Scope<'a>,
    root: Option<RootName>,
    meta_key: Cow<'static, str>,
    meta: Option<Value>,
    wrap_in_array: bool,
    filter: FieldFilter,
}

impl<'a> Serializer<'a> {
    /// Binds `schema` to `object`.
    ///
    /// Related objects are serialized with the schemas of `registry`.
    /// `options.serializer` is ignored here; it is only consulted when the
    /// serializer is selected.
    pub fn new(
        registry: &'a SchemaRegistry,
        schema: &'a Schema,
        object: Option<&'a dyn Serializable>,
        options: SerializeOptions<'a>,
    ) -> Self {
        let meta_key = options.meta_key_or_default();
        let SerializeOptions {
            scope,
            root,
            meta,
            wrap_in_array,
            filter,
            ..
        } = options;
        Self {
            registry,
            schema,
            object,
            scope,
            root: root.or_else(|| schema.root().cloned()),
            meta_key,
            meta,
            wrap_in_array,
            filter,
        }
    }

    #[inline]
    pub fn schema(&self) -> &'a Schema {
        self.schema
    }

    #[inline]
    pub fn object(&self) -> Option<&'a dyn Serializable> {
        self.object
    }

    #[inline]
    pub fn scope(&self) -> Scope<'a> {
        self.scope
    }

    /// The effective root: the call's, else the schema's.
    #[inline]
    pub fn root(&self) -> Option<&RootName> {
        self.root.as_ref()
    }

    /// Document wrapper key.
    ///
    /// A missing or [`RootName::Default`] root falls back to
    /// [`Schema::root_name`].
    pub fn json_key(&self) -> Option<String> {
        match &self.root {
            None | Some(RootName::Default) => self.schema.root_name(),
            Some(RootName::Disabled) => None,
            Some(RootName::Named(name)) => Some(name.to_string()),
        }
    }

    /// Filtered attributes in declaration order.
    pub fn attributes(&self) -> Result<Map<String, Value>, SerializeError> {
        let mut attributes = Map::new();
        let Some(object) = self.object else {
            return Ok(attributes);
        };
        for name in self.filter.effective_keys(self.schema.attributes()) {
            let value = self.schema.resolve_attribute(name, object, self.scope)?;
            attributes.insert(name.into(), value);
        }
        Ok(attributes)
    }

    /// Filtered associations declared with [`EmbedMode::Ids`] or [`EmbedMode::Inline`].
    ///
    /// Root-flattened and skipped associations contribute nothing.
    pub fn associations(&self) -> Result<Map<String, Value>, SerializeError> {
        let mut associations = Map::new();
        for association in self.included_associations() {
            match association.mode() {
                EmbedMode::Ids => {
                    if let Some(ids) = self.serialize_ids(association)? {
                        associations.insert(association.key().into(), ids);
                    }
                }
                EmbedMode::Inline => {
                    let nested = self.build_serializer(association)?;
                    associations.insert(
                        association.embedded_key().into(),
                        nested.serializable_object()?,
                    );
                }
                EmbedMode::Skip | EmbedMode::Root => {}
            }
        }
        Ok(associations)
    }

    /// The object structure.
    ///
    /// An absent object is `[]` when wrapped in an array and `null` otherwise.
    pub fn serializable_object(&self) -> Result<Value, SerializeError> {
        if self.object.is_none() {
            return Ok(if self.wrap_in_array {
                Value::Array(Vec::new())
            } else {
                Value::Null
            });
        }
        let mut object = self.attributes()?;
        object.extend(self.associations()?);
        Ok(if self.wrap_in_array {
            Value::Array(alloc::vec![Value::Object(object)])
        } else {
            Value::Object(object)
        })
    }

    /// Associations flattened to the document root, by root key.
    ///
    /// Each association first contributes what its own nested serializer
    /// flattens, then its own structure. Sequences meeting under one key
    /// are concatenated, keeping the first of structurally equal entries.
    pub fn embedded_in_root_associations(&self) -> Result<Map<String, Value>, SerializeError> {
        let mut embedded = Map::new();
        for association in self.included_associations() {
            if association.mode() != EmbedMode::Root {
                continue;
            }
            let nested = self.build_serializer(association)?;
            root::merge_all(&mut embedded, nested.embedded_in_root_associations()?);
            root::merge(
                &mut embedded,
                association.root_key(),
                nested.serializable_object()?,
            );
        }
        Ok(embedded)
    }

    /// The full document, see [`JsonDocument::as_json`].
    #[inline]
    pub fn as_json(&self) -> Result<Value, SerializeError> {
        JsonDocument::as_json(self)
    }

    fn included_associations(&self) -> impl Iterator<Item = &'a AssociationDescriptor> + '_ {
        let associations: &'a [AssociationDescriptor] = self.schema.associations();
        associations
            .iter()
            .filter(|association| self.filter.includes(association.name()))
    }

    fn related(&self, association: &AssociationDescriptor) -> Result<Relation<'a>, SerializeError> {
        match self.object {
            Some(object) => self
                .schema
                .resolve_relation(association.name(), object, self.scope),
            None => Ok(Relation::Absent),
        }
    }

    /// The id(s) of the related object(s); `None` for an absent single object.
    fn serialize_ids(
        &self,
        association: &AssociationDescriptor,
    ) -> Result<Option<Value>, SerializeError> {
        let embed_key = association.embed_key();
        match self.related(association)? {
            Relation::One(related) => read_field(related, embed_key).map(Some),
            Relation::Many(related) => related
                .into_iter()
                .map(|object| read_field(object, embed_key))
                .collect::<Result<Vec<_>, _>>()
                .map(|ids| Some(Value::Array(ids))),
            Relation::Absent => Ok(match association.cardinality() {
                Cardinality::One => None,
                Cardinality::Many => Some(Value::Array(Vec::new())),
            }),
        }
    }

    /// The nested serializer of one association, sharing this call's scope.
    ///
    /// Single objects flattened to the root are wrapped in an array so that
    /// root sequences always concatenate.
    fn build_serializer(
        &self,
        association: &'a AssociationDescriptor,
    ) -> Result<NestedSerializer<'a>, SerializeError> {
        let mut related = self.related(association)?;
        if related.is_absent() && association.cardinality() == Cardinality::Many {
            related = Relation::Many(Vec::new());
        }

        let options = SerializeOptions {
            scope: self.scope,
            wrap_in_array: association.mode() == EmbedMode::Root
                && association.cardinality() == Cardinality::One,
            serializer: association.serializer(),
            ..SerializeOptions::new()
        };

        NestedSerializer::build(self.registry, related, options)
    }
}

impl JsonDocument for Serializer<'_> {
    #[inline]
    fn json_key(&self) -> Option<String> {
        Serializer::json_key(self)
    }

    #[inline]
    fn serializable_object(&self) -> Result<Value, SerializeError> {
        Serializer::serializable_object(self)
    }

    #[inline]
    fn embedded_in_root_associations(&self) -> Result<Map<String, Value>, SerializeError> {
        Serializer::embedded_in_root_associations(self)
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

impl serde_core::Serialize for Serializer<'_> {
    fn serialize<S: serde_core::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let document = self.as_json().map_err(S::Error::custom)?;
        serde_core::Serialize::serialize(&document, serializer)
    }
}

impl fmt::Debug for Serializer<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Serializer")
            .field("schema", &self.schema.name())
            .field("object", &self.object)
            .field("root", &self.root)
            .field("wrap_in_array", &self.wrap_in_array)
            .field("filter", &self.filter)
            .finish_non_exhaustive()
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::Serializer;
    use crate::SerializeError;
    use crate::config::EmbedStrategy;
    use crate::fixtures::{self, Admin, Author, Comment, Post, Profile, User};
    use crate::registry::SchemaRegistry;
    use crate::schema::{AssociationOptions, Schema, SchemaBuilder};
    use crate::ser::SerializeOptions;

    fn registry() -> SchemaRegistry {
        let mut registry = SchemaRegistry::new();
        registry.register::<Profile>(fixtures::profile_schema());
        registry.register::<Author>(fixtures::author_schema());
        registry.register::<Comment>(fixtures::comment_schema());
        registry
    }

    fn keys(value: &Value) -> Vec<&str> {
        match value.as_object() {
            Some(map) => map.keys().map(String::as_str).collect(),
            None => Vec::new(),
        }
    }

    fn ids() -> AssociationOptions {
        AssociationOptions::new().embed(EmbedStrategy::Ids)
    }

    fn objects() -> AssociationOptions {
        AssociationOptions::new()
            .embed(EmbedStrategy::Objects)
            .embed_in_root(false)
    }

    fn in_root() -> AssociationOptions {
        AssociationOptions::new()
            .embed(EmbedStrategy::Objects)
            .embed_in_root(true)
    }

    #[test]
    fn attributes_serialization() {
        let registry = registry();
        let profile = Profile::sample();
        let serializer = registry.serializer(&profile, SerializeOptions::new()).unwrap();

        let object = serializer.serializable_object().unwrap();
        assert_eq!(object, json!({ "name": "Name 1", "description": "Description 1" }));
        assert_eq!(keys(&object), ["name", "description"]);
        assert!(serializer.associations().unwrap().is_empty());
    }

    #[test]
    fn as_json_uses_root_name() {
        let registry = registry();
        let profile = Profile::sample();
        let serializer = registry.serializer(&profile, SerializeOptions::new()).unwrap();

        assert_eq!(serializer.json_key().as_deref(), Some("profile"));
        assert_eq!(
            serializer.as_json().unwrap(),
            json!({ "profile": { "name": "Name 1", "description": "Description 1" } })
        );
        assert_eq!(
            serde_json::to_value(&serializer).unwrap(),
            serializer.as_json().unwrap()
        );
    }

    #[test]
    fn root_resolution() {
        let registry = registry();
        let post = Post::sample();
        let schema = SchemaBuilder::<Post>::new()
            .root("article")
            .attributes(["title"])
            .build();
        let bind = |options| Serializer::new(&registry, &schema, Some(&post), options);

        assert_eq!(bind(SerializeOptions::new()).json_key().as_deref(), Some("article"));
        assert_eq!(
            bind(SerializeOptions::new().root("item")).json_key().as_deref(),
            Some("item")
        );
        assert_eq!(
            bind(SerializeOptions::new().root(true)).json_key().as_deref(),
            Some("post")
        );
        assert_eq!(
            bind(SerializeOptions::new().root(false)).as_json().unwrap(),
            json!({ "title": "New post" })
        );
    }

    #[test]
    fn meta() {
        let registry = registry();
        let profile = Profile::sample();

        let options = SerializeOptions::new()
            .meta(json!({ "total": 1 }))
            .meta_key("info")
            .only(["name"]);
        let serializer = registry.serializer(&profile, options).unwrap();
        assert_eq!(
            serializer.as_json().unwrap(),
            json!({ "profile": { "name": "Name 1" }, "info": { "total": 1 } })
        );

        // no document, no meta
        let options = SerializeOptions::new().meta(json!(1)).root(false).only(["name"]);
        let serializer = registry.serializer(&profile, options).unwrap();
        assert_eq!(serializer.as_json().unwrap(), json!({ "name": "Name 1" }));
    }

    #[test]
    fn only_and_except() {
        let registry = registry();
        let profile = Profile::sample();
        let serialize = |options| {
            registry
                .serializer(&profile, options)
                .and_then(|s| s.serializable_object())
                .unwrap()
        };

        let expected = json!({ "name": "Name 1" });
        assert_eq!(serialize(SerializeOptions::new().only(["name"])), expected);
        assert_eq!(serialize(SerializeOptions::new().except(["description"])), expected);
        assert_eq!(
            serialize(SerializeOptions::new().only(["name"]).except(["name"])),
            expected
        );
        assert_eq!(
            serialize(SerializeOptions::new().except(["unknown"])),
            json!({ "name": "Name 1", "description": "Description 1" })
        );
    }

    #[test]
    fn filter_applies_to_associations() {
        let registry = registry();
        let post = Post::sample();
        let schema = SchemaBuilder::<Post>::new()
            .attributes(["title"])
            .has_one(["author"], ids())
            .has_many(["comments"], ids())
            .build();

        let options = SerializeOptions::new().except(["comments"]);
        let serializer = Serializer::new(&registry, &schema, Some(&post), options);
        assert_eq!(
            serializer.serializable_object().unwrap(),
            json!({ "title": "New post", "author_id": 1 })
        );
    }

    #[test]
    fn wrap_in_array() {
        let registry = registry();
        let schema = fixtures::profile_schema();
        let profile = Profile::sample();

        let absent = Serializer::new(&registry, &schema, None, SerializeOptions::new());
        assert_eq!(absent.serializable_object().unwrap(), Value::Null);

        let wrapped = SerializeOptions::new().wrap_in_array(true);
        let absent = Serializer::new(&registry, &schema, None, wrapped.clone());
        assert_eq!(absent.serializable_object().unwrap(), json!([]));

        let present = Serializer::new(&registry, &schema, Some(&profile), wrapped);
        assert_eq!(
            present.serializable_object().unwrap(),
            json!([{ "name": "Name 1", "description": "Description 1" }])
        );
    }

    #[test]
    fn flattened_attributes() {
        let registry = registry();
        let schema = fixtures::admin_schema();
        let mut admin = Admin::sample();
        let serializer = Serializer::new(&registry, &schema, Some(&admin), SerializeOptions::new());

        let object = serializer.serializable_object().unwrap();
        assert_eq!(object, json!({ "name": "Root", "language": "en", "profile_name": "Name 1" }));
        assert_eq!(keys(&object), ["name", "language", "profile_name"]);

        admin.profile = None;
        let serializer = Serializer::new(&registry, &schema, Some(&admin), SerializeOptions::new());
        assert_eq!(serializer.serializable_object().unwrap()["profile_name"], Value::Null);
    }

    #[test]
    fn embed_ids() {
        let registry = registry();
        let schema = SchemaBuilder::<Post>::new()
            .attributes(["title"])
            .has_one(["author"], ids())
            .has_many(["comments"], ids())
            .has_one(["category"], ids().embed_key("name"))
            .build();

        let post = Post::sample();
        let serializer = Serializer::new(&registry, &schema, Some(&post), SerializeOptions::new());
        let object = serializer.serializable_object().unwrap();
        assert_eq!(
            object,
            json!({ "title": "New post", "author_id": 1, "comment_ids": [1, 2], "category_id": "News" })
        );
        assert_eq!(keys(&object), ["title", "author_id", "comment_ids", "category_id"]);
    }

    #[test]
    fn embed_ids_of_empty_relations() {
        let registry = registry();
        let schema = SchemaBuilder::<Post>::new()
            .attributes(["title"])
            .has_one(["author"], ids())
            .has_many(["comments"], ids())
            .build();

        let mut post = Post::sample();
        post.author = None;
        post.comments.clear();
        let serializer = Serializer::new(&registry, &schema, Some(&post), SerializeOptions::new());
        let object = serializer.serializable_object().unwrap();

        assert_eq!(object, json!({ "title": "New post", "comment_ids": [] }));
        assert!(object.get("author_id").is_none());
    }

    #[test]
    fn embed_objects_inline() {
        let registry = registry();
        let schema = SchemaBuilder::<Post>::new()
            .attributes(["title"])
            .has_one(["author"], objects())
            .has_many(["comments"], objects())
            .has_one(["category"], AssociationOptions::new().embed(EmbedStrategy::None))
            .build();

        let mut post = Post::sample();
        let serializer = Serializer::new(&registry, &schema, Some(&post), SerializeOptions::new());
        assert_eq!(
            serializer.serializable_object().unwrap(),
            json!({
                "title": "New post",
                "author": { "id": 1, "name": "Jane" },
                "comments": [
                    { "id": 1, "content": "First!" },
                    { "id": 2, "content": "Second" },
                ],
            })
        );
        assert!(serializer.embedded_in_root_associations().unwrap().is_empty());

        post.author = None;
        post.comments.clear();
        let serializer = Serializer::new(&registry, &schema, Some(&post), SerializeOptions::new());
        assert_eq!(
            serializer.serializable_object().unwrap(),
            json!({ "title": "New post", "author": null, "comments": [] })
        );
    }

    #[test]
    fn explicit_association_serializers() {
        let registry = SchemaRegistry::new();
        let schema = SchemaBuilder::<Post>::new()
            .has_one(
                ["author"],
                objects().serializer(SchemaBuilder::<Author>::anonymous().attributes(["name"]).build()),
            )
            .has_many(
                ["comments"],
                objects().each_serializer(SchemaBuilder::<Comment>::anonymous().attributes(["content"]).build()),
            )
            .build();

        let post = Post::sample();
        let serializer = Serializer::new(&registry, &schema, Some(&post), SerializeOptions::new());
        assert_eq!(
            serializer.serializable_object().unwrap(),
            json!({
                "author": { "name": "Jane" },
                "comments": [{ "content": "First!" }, { "content": "Second" }],
            })
        );
    }

    #[test]
    fn missing_schema_is_an_error() {
        let registry = SchemaRegistry::new();
        let schema = SchemaBuilder::<Post>::new()
            .has_one(["author"], objects())
            .build();

        let post = Post::sample();
        let serializer = Serializer::new(&registry, &schema, Some(&post), SerializeOptions::new());
        assert!(matches!(
            serializer.as_json(),
            Err(SerializeError::SchemaNotFound { type_name }) if type_name.ends_with("Author")
        ));
    }

    #[test]
    fn embed_in_root() {
        let registry = registry();
        let schema = SchemaBuilder::<Post>::new()
            .attributes(["title"])
            .has_one(["author"], in_root())
            .has_many(["comments"], in_root())
            .build();

        let post = Post::sample();
        let serializer = Serializer::new(&registry, &schema, Some(&post), SerializeOptions::new());
        let document = serializer.as_json().unwrap();
        assert_eq!(
            document,
            json!({
                "post": { "title": "New post" },
                "authors": [{ "id": 1, "name": "Jane" }],
                "comments": [
                    { "id": 1, "content": "First!" },
                    { "id": 2, "content": "Second" },
                ],
            })
        );
        assert_eq!(keys(&document), ["post", "authors", "comments"]);

        let mut post = Post::sample();
        post.author = None;
        let serializer = Serializer::new(&registry, &schema, Some(&post), SerializeOptions::new());
        assert_eq!(serializer.embedded_in_root_associations().unwrap()["authors"], json!([]));
    }

    #[test]
    fn root_entries_are_deduplicated() {
        let registry = registry();
        let schema = SchemaBuilder::<Post>::new()
            .has_one(["author"], in_root())
            .association_with("reviewer", |post: &Post, _| crate::Relation::one(post.author.as_ref()))
            .has_one(["reviewer"], in_root().root_key("authors"))
            .build();

        let post = Post::sample();
        let serializer = Serializer::new(&registry, &schema, Some(&post), SerializeOptions::new());
        assert_eq!(
            serializer.embedded_in_root_associations().unwrap()["authors"],
            json!([{ "id": 1, "name": "Jane" }])
        );
    }

    #[test]
    fn nested_root_associations_come_first() {
        let mut registry = registry();
        registry.register::<Comment>(
            SchemaBuilder::<Comment>::new()
                .attributes(["id"])
                .has_one(["author"], in_root())
                .build(),
        );
        let schema = SchemaBuilder::<Post>::new()
            .attributes(["title"])
            .has_many(["comments"], in_root())
            .has_one(["author"], in_root())
            .build();

        let mut post = Post::sample();
        for comment in &mut post.comments {
            comment.author = Some(Author::jane());
        }
        let serializer = Serializer::new(&registry, &schema, Some(&post), SerializeOptions::new());
        let document = serializer.as_json().unwrap();

        assert_eq!(
            document,
            json!({
                "post": { "title": "New post" },
                "authors": [{ "id": 1, "name": "Jane" }],
                "comments": [{ "id": 1 }, { "id": 2 }],
            })
        );
        assert_eq!(keys(&document), ["post", "authors", "comments"]);
    }

    #[test]
    fn scope_reaches_nested_serializers() {
        let mut registry = registry();
        registry.register::<Comment>(
            SchemaBuilder::<Comment>::new()
                .attributes(["id", "viewer"])
                .attribute_with("viewer", |_: &Comment, scope| {
                    scope
                        .and_then(|s| s.downcast_ref::<User>())
                        .map(|user| user.name.clone())
                })
                .build(),
        );
        let schema = SchemaBuilder::<Post>::new()
            .has_many(["comments"], objects())
            .build();

        let post = Post::sample();
        let user = User::sample();
        let options = SerializeOptions::new().scope(&user).root(false);
        let serializer = Serializer::new(&registry, &schema, Some(&post), options);
        assert_eq!(
            serializer.as_json().unwrap(),
            json!({ "comments": [{ "id": 1, "viewer": "Ada" }, { "id": 2, "viewer": "Ada" }] })
        );
    }

    #[test]
    fn structured_field_values() {
        let mut registry = SchemaRegistry::new();
        registry.register::<User>(
            SchemaBuilder::<User>::new()
                .attributes(["id", "name", "settings"])
                .build(),
        );

        let user = User::sample();
        let serializer = registry.serializer(&user, SerializeOptions::new()).unwrap();
        assert_eq!(
            serializer.as_json().unwrap(),
            json!({
                "user": {
                    "id": 42,
                    "name": "Ada",
                    "settings": { "theme": "dark", "notifications": false },
                }
            })
        );
    }

    #[test]
    fn inherited_resolver_on_another_type() {
        let registry = registry();
        let parent: Schema = SchemaBuilder::<Profile>::new()
            .attribute_with("name", |profile: &Profile, _| profile.name.clone())
            .attributes(["name"])
            .build();
        let child = SchemaBuilder::<Admin>::extend(&parent).build();

        let admin = Admin::sample();
        let serializer = Serializer::new(&registry, &child, Some(&admin), SerializeOptions::new());
        assert!(matches!(
            serializer.serializable_object(),
            Err(SerializeError::TypeMismatch { .. })
        ));
    }
}
