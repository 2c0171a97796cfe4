use alloc::string::String;

use crate::{Map, SerializeError, Value};

// -----------------------------------------------------------------------------
// JsonDocument

/// Composes a serializer's parts into the final JSON document.
///
/// With a json key the document is
///
/// ```text
/// { json_key: serializable_object, ..embedded_in_root_associations, meta_key: meta }
/// ```
///
/// Without one it is the bare serializable object, and root-flattened
/// associations and meta are dropped.
pub trait JsonDocument {
    /// Document wrapper key, `None` for a bare document.
    fn json_key(&self) -> Option<String>;

    /// The primary structure.
    fn serializable_object(&self) -> Result<Value, SerializeError>;

    /// Associations flattened to the document root, by root key.
    fn embedded_in_root_associations(&self) -> Result<Map<String, Value>, SerializeError>;

    fn meta_key(&self) -> &str;

    fn meta(&self) -> Option<&Value>;

    /// Everything the document holds next to the primary structure.
    fn serializable_data(&self) -> Result<Map<String, Value>, SerializeError> {
        let mut data = self.embedded_in_root_associations()?;
        if let Some(meta) = self.meta() {
            data.insert(self.meta_key().into(), meta.clone());
        }
        Ok(data)
    }

    /// Builds the document.
    fn as_json(&self) -> Result<Value, SerializeError> {
        let Some(key) = self.json_key() else {
            return self.serializable_object();
        };
        let mut document = Map::new();
        document.insert(key, self.serializable_object()?);
        document.extend(self.serializable_data()?);
        Ok(Value::Object(document))
    }
}
