//! Per-type declarative output schemas.
//!
//! ## Menu
//!
//! - [`Schema`]: the immutable declaration of one output type: attributes,
//!   flattened attributes, associations and the resolver table.
//! - [`SchemaBuilder`]: declares a schema, optionally starting from a parent.
//! - [`AssociationOptions`]: options of one `has_one`/`has_many` declaration.
//! - [`AssociationDescriptor`]: a declared relation with derived keys.
//! - [`EmbedMode`]: what an association contributes to one call.
//! - [`RootName`]: document wrapper key.
//!
//! ## Resolvers
//!
//! Every attribute and association owns a resolver, looked up by name at
//! serialization time. Declarations install a default resolver (a field read,
//! a hop chain or a relation read) only when none exists yet, so custom
//! resolvers survive re-declaration and inheritance.

// -----------------------------------------------------------------------------
// Modules

mod association;
mod builder;
pub(crate) mod resolver;
mod schema;

// -----------------------------------------------------------------------------
// Exports

pub use association::{AssociationDescriptor, AssociationOptions, Cardinality, EmbedMode};
pub use builder::SchemaBuilder;
pub use schema::{RootName, Schema};
