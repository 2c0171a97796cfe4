//! Provide the schema registry used to find the schema of related objects.
//!
//! ## Menu
//!
//! - [`SchemaRegistry`]: maps a domain type's [`TypeId`](core::any::TypeId) to its [`Schema`](crate::schema::Schema).
//! - [`SchemaRegistryArc`]: a shared registry behind a read-write lock.
//!
//! ## auto_register
//!
//! See [`SchemaRegistry::auto_register`].
//!
//! We use [`inventory`] crate to implement static registration,
//! not all platforms support it (although major platforms do).
//! On unsupported platforms no schema is submitted and the registry
//! simply stays as it is.
//!
//! [`inventory`]: https://docs.rs/inventory

// -----------------------------------------------------------------------------
// Modules

#[cfg(feature = "auto_register")]
mod auto_register;
mod schema_registry;

// -----------------------------------------------------------------------------
// Exports

#[cfg(feature = "auto_register")]
#[doc(hidden)]
pub use auto_register::__AutoRegisterSchema;
pub use schema_registry::{SchemaRegistry, SchemaRegistryArc};
