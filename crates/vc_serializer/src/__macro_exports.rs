//! Items used by exported macros. Not part of the public API.

#[cfg(feature = "auto_register")]
pub use crate::registry::__AutoRegisterSchema;
#[cfg(feature = "auto_register")]
pub use inventory;
