use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Raw document payload: an ordered mapping from field name to JSON value
///
/// Field order is preserved (serde_json `preserve_order`), matching the
/// ordered-mapping shape instances have on the wire.
pub type Document = serde_json::Map<String, Value>;

/// One record of a given object type
///
/// Instances are dynamic and schema-less: a heterogeneous named-field
/// mapping rather than a fixed struct per object type. The wrapper adds
/// typed accessor helpers over the raw document. Which fields are required
/// (identity field, owner field) is decided by the table router and the
/// CRUD core, not by this type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Instance {
    fields: Document,
}

impl Instance {
    /// Create a new empty Instance
    pub fn new() -> Self {
        Self {
            fields: Document::new(),
        }
    }

    /// Wrap an existing document
    pub fn from_document(fields: Document) -> Self {
        Self { fields }
    }

    /// Get the underlying document
    pub fn as_document(&self) -> &Document {
        &self.fields
    }

    /// Consume the wrapper, returning the document
    pub fn into_document(self) -> Document {
        self.fields
    }

    /// Get a field value
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Set a field value
    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        self.fields.insert(key.into(), value);
    }

    /// Remove a field
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.fields.shift_remove(key)
    }

    /// Check if a field exists
    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Get a field as &str, if it is a string
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }

    /// Get a field coerced to u64
    ///
    /// Accepts JSON numbers and numeric strings; identity fields arrive in
    /// both shapes depending on the producer.
    pub fn get_u64(&self, key: &str) -> Option<u64> {
        self.fields.get(key).and_then(coerce_u64)
    }

    /// Get the number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if the instance has no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl From<Document> for Instance {
    fn from(fields: Document) -> Self {
        Self { fields }
    }
}

/// Coerce a JSON value to u64
///
/// Accepts unsigned numbers, non-negative signed numbers, and numeric
/// strings. Anything else yields None.
pub fn coerce_u64(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Coerce a JSON value to its string form
///
/// Strings pass through unquoted, null becomes the empty string, and any
/// other value is rendered as compact JSON.
pub fn coerce_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
