//! Documents returned by the store.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// A document: the store-assigned id plus a JSON field map.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Store-assigned identity, stable for the document's lifetime.
    pub id: String,
    /// The document's fields.
    pub fields: Map<String, Value>,
}

impl Document {
    /// Create a document from an id and its fields.
    pub fn new(id: impl Into<String>, fields: Map<String, Value>) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }

    /// Get a field value.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Deserialize into a caller-supplied shape.
    ///
    /// The store-assigned id is merged into the fields under `"id"` before
    /// deserializing, so row shapes carry their identity without the store
    /// duplicating it inside the document body.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        let mut fields = self.fields.clone();
        fields.insert("id".to_string(), Value::String(self.id.clone()));
        serde_json::from_value(Value::Object(fields))
    }
}
