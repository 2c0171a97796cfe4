//! Domain types shared by the unit tests.

use serde::Serialize;

use crate::schema::{Schema, SchemaBuilder};
use crate::{Relation, Serializable};

// -----------------------------------------------------------------------------
// Types

#[derive(Clone, Debug)]
pub struct Profile {
    pub name: String,
    pub description: String,
    pub comments: String,
}

#[derive(Clone, Debug)]
pub struct Author {
    pub id: u32,
    pub name: String,
    pub profile: Option<Profile>,
}

#[derive(Clone, Debug)]
pub struct Comment {
    pub id: u32,
    pub content: String,
    pub author: Option<Author>,
}

#[derive(Clone, Debug)]
pub struct Category {
    pub id: u32,
    pub name: String,
}

#[derive(Clone, Debug)]
pub struct Post {
    pub title: String,
    pub body: String,
    pub author: Option<Author>,
    pub comments: Vec<Comment>,
    pub category: Option<Category>,
}

#[derive(Clone, Debug)]
pub struct Admin {
    pub name: String,
    pub language: String,
    pub profile: Option<Profile>,
}

#[derive(Clone, Debug, Serialize)]
pub struct Settings {
    pub theme: String,
    pub notifications: bool,
}

#[derive(Clone, Debug)]
pub struct User {
    pub id: u32,
    pub name: String,
    pub settings: Settings,
}

impl Profile {
    pub fn sample() -> Self {
        Self {
            name: "Name 1".into(),
            description: "Description 1".into(),
            comments: "Comments 1".into(),
        }
    }
}

impl Author {
    pub fn jane() -> Self {
        Self {
            id: 1,
            name: "Jane".into(),
            profile: Some(Profile::sample()),
        }
    }
}

impl Comment {
    pub fn new(id: u32, content: &str) -> Self {
        Self {
            id,
            content: content.into(),
            author: None,
        }
    }
}

impl Post {
    /// Written by Jane, with two comments and a category.
    pub fn sample() -> Self {
        Self {
            title: "New post".into(),
            body: "A body!!!".into(),
            author: Some(Author::jane()),
            comments: vec![Comment::new(1, "First!"), Comment::new(2, "Second")],
            category: Some(Category {
                id: 7,
                name: "News".into(),
            }),
        }
    }
}

impl Admin {
    pub fn sample() -> Self {
        Self {
            name: "Root".into(),
            language: "en".into(),
            profile: Some(Profile::sample()),
        }
    }
}

impl User {
    pub fn sample() -> Self {
        Self {
            id: 42,
            name: "Ada".into(),
            settings: Settings {
                theme: "dark".into(),
                notifications: false,
            },
        }
    }
}

// -----------------------------------------------------------------------------
// Serializable

impl Serializable for Profile {
    fn read_attribute_for_serialization(&self, name: &str) -> Option<&dyn erased_serde::Serialize> {
        match name {
            "name" => Some(&self.name),
            "description" => Some(&self.description),
            "comments" => Some(&self.comments),
            _ => None,
        }
    }
}

impl Serializable for Author {
    fn read_attribute_for_serialization(&self, name: &str) -> Option<&dyn erased_serde::Serialize> {
        match name {
            "id" => Some(&self.id),
            "name" => Some(&self.name),
            _ => None,
        }
    }

    fn relation(&self, name: &str) -> Relation<'_> {
        match name {
            "profile" => Relation::one(self.profile.as_ref()),
            _ => Relation::Absent,
        }
    }
}

impl Serializable for Comment {
    fn read_attribute_for_serialization(&self, name: &str) -> Option<&dyn erased_serde::Serialize> {
        match name {
            "id" => Some(&self.id),
            "content" => Some(&self.content),
            _ => None,
        }
    }

    fn relation(&self, name: &str) -> Relation<'_> {
        match name {
            "author" => Relation::one(self.author.as_ref()),
            _ => Relation::Absent,
        }
    }
}

impl Serializable for Category {
    fn read_attribute_for_serialization(&self, name: &str) -> Option<&dyn erased_serde::Serialize> {
        match name {
            "id" => Some(&self.id),
            "name" => Some(&self.name),
            _ => None,
        }
    }
}

impl Serializable for Post {
    fn read_attribute_for_serialization(&self, name: &str) -> Option<&dyn erased_serde::Serialize> {
        match name {
            "title" => Some(&self.title),
            "body" => Some(&self.body),
            _ => None,
        }
    }

    fn relation(&self, name: &str) -> Relation<'_> {
        match name {
            "author" => Relation::one(self.author.as_ref()),
            "comments" => Relation::many(&self.comments),
            "category" => Relation::one(self.category.as_ref()),
            _ => Relation::Absent,
        }
    }
}

impl Serializable for Admin {
    fn read_attribute_for_serialization(&self, name: &str) -> Option<&dyn erased_serde::Serialize> {
        match name {
            "name" => Some(&self.name),
            "language" => Some(&self.language),
            _ => None,
        }
    }

    fn relation(&self, name: &str) -> Relation<'_> {
        match name {
            "profile" => Relation::one(self.profile.as_ref()),
            _ => Relation::Absent,
        }
    }
}

impl Serializable for User {
    fn read_attribute_for_serialization(&self, name: &str) -> Option<&dyn erased_serde::Serialize> {
        match name {
            "id" => Some(&self.id),
            "name" => Some(&self.name),
            "settings" => Some(&self.settings),
            _ => None,
        }
    }
}

// -----------------------------------------------------------------------------
// Schemas

pub fn profile_schema() -> Schema {
    SchemaBuilder::<Profile>::new()
        .attributes(["name", "description"])
        .build()
}

pub fn author_schema() -> Schema {
    SchemaBuilder::<Author>::new()
        .attributes(["id", "name"])
        .build()
}

pub fn comment_schema() -> Schema {
    SchemaBuilder::<Comment>::new()
        .attributes(["id", "content"])
        .build()
}

pub fn category_schema() -> Schema {
    SchemaBuilder::<Category>::new()
        .attributes(["id", "name"])
        .build()
}

pub fn admin_schema() -> Schema {
    SchemaBuilder::<Admin>::new()
        .attributes(["name", "language"])
        .flattened_attributes([("profile_name", ["profile", "name"])])
        .build()
}
