use crate::registry::SchemaRegistry;

// -----------------------------------------------------------------------------
// Static registration

/// A registration function submitted by [`auto_register_schema!`](crate::auto_register_schema).
///
/// Returns `true` if it inserted a schema.
#[doc(hidden)]
pub struct __AutoRegisterSchema(pub fn(&mut SchemaRegistry) -> bool);

inventory::collect!(__AutoRegisterSchema);

pub(crate) fn register_submitted(registry: &mut SchemaRegistry) -> usize {
    let inserted = inventory::iter::<__AutoRegisterSchema>
        .into_iter()
        .filter(|entry| (entry.0)(registry))
        .count();
    log::debug!("auto-registered {inserted} schema(s)");
    inserted
}

/// Submits a schema for static registration.
///
/// The schema expression is evaluated when [`SchemaRegistry::auto_register`]
/// runs, and only if the type has no schema yet.
///
/// # Examples
///
/// ```
/// use vc_serializer::{auto_register_schema, Serializable};
/// use vc_serializer::registry::SchemaRegistry;
/// use vc_serializer::schema::SchemaBuilder;
///
/// struct Note { text: String }
///
/// impl Serializable for Note {
///     fn read_attribute_for_serialization(&self, name: &str) -> Option<&dyn erased_serde::Serialize> {
///         match name {
///             "text" => Some(&self.text),
///             _ => None,
///         }
///     }
/// }
///
/// auto_register_schema!(Note => SchemaBuilder::<Note>::new().attributes(["text"]).build());
///
/// let mut registry = SchemaRegistry::new();
/// registry.auto_register();
/// assert!(registry.get_of::<Note>().is_some());
/// ```
#[macro_export]
macro_rules! auto_register_schema {
    ($ty:ty => $schema:expr) => {
        const _: () = {
            fn __register(registry: &mut $crate::registry::SchemaRegistry) -> bool {
                registry.try_register::<$ty>(|| $schema)
            }

            $crate::__macro_exports::inventory::submit! {
                $crate::__macro_exports::__AutoRegisterSchema(__register)
            }
        };
    };
}

// -----------------------------------------------------------------------------
// Tests
