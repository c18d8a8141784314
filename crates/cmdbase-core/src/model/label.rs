use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use cmdbase_core_types::schema;

use super::instance::coerce_string;

/// Secondary scoping label carried in an instance's metadata field
///
/// Labels are string-keyed; the business-unit id is the one key the update
/// path cares about, because validation rules may differ per business unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Label {
    entries: BTreeMap<String, String>,
}

impl Label {
    /// Create a new empty Label
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Set a label entry
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Get a label entry
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Get the business-unit id, if labelled
    pub fn business_id(&self) -> Option<&str> {
        self.get(schema::LABEL_BUSINESS_ID)
    }

    /// Check if the label has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Extract the label from a condition's metadata value
    ///
    /// The metadata value is expected to look like
    /// `{"label": {"business_id": "3"}}`; a missing or differently-shaped
    /// value yields an empty label. Numeric label values are coerced to
    /// their string form.
    pub fn from_metadata_value(metadata: &Value) -> Self {
        let mut label = Self::new();
        let Some(entries) = metadata
            .get(schema::LABEL_KEY)
            .and_then(Value::as_object)
        else {
            return label;
        };
        for (key, value) in entries {
            let rendered = coerce_string(value);
            if !rendered.is_empty() {
                label.set(key.clone(), rendered);
            }
        }
        label
    }
}
