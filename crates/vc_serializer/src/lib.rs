#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

// -----------------------------------------------------------------------------
// Extern

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod error;
mod inflect;
mod object;

pub mod config;
pub mod filter;
pub mod registry;
pub mod schema;
pub mod ser;

#[cfg(test)]
mod fixtures;

// -----------------------------------------------------------------------------
// Top-Level exports

#[doc(hidden)]
pub mod __macro_exports;

pub use error::SerializeError;
pub use object::{Relation, Scope, Serializable};

pub use erased_serde;
pub use serde_json::{Map, Value};
