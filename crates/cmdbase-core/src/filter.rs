//! Condition evaluation and scoping helpers
//!
//! Conditions are documents interpreted as filters: plain values match by
//! equality, `{"$in": [..]}` matches membership, and dotted keys address
//! nested mappings (`"property.bind_ip.value"`). Store backends share this
//! evaluation so filter semantics stay identical across them.

use serde_json::Value;

use cmdbase_core_types::{schema, OwnerId};

use crate::model::Document;

/// Membership operator key
pub const OP_IN: &str = "$in";

/// Build a membership condition value from a list of ids
pub fn any_of<I>(values: I) -> Value
where
    I: IntoIterator,
    I::Item: Into<Value>,
{
    let list: Vec<Value> = values.into_iter().map(Into::into).collect();
    let mut operator = Document::new();
    operator.insert(OP_IN.to_string(), Value::Array(list));
    Value::Object(operator)
}

/// Scope a condition to the owner in the request context
///
/// Overwrites any caller-supplied owner constraint; callers never widen
/// their own tenant scope.
pub fn scope_to_owner(condition: &mut Document, owner: &OwnerId) {
    condition.insert(
        schema::FIELD_OWNER_ID.to_string(),
        Value::String(owner.as_str().to_string()),
    );
}

/// Check whether a caller-supplied object-type constraint contradicts the
/// resolved object type
///
/// Any constraint that is not exactly the resolved object type counts as a
/// contradiction, including operator documents.
pub fn object_type_conflicts(condition: &Document, object_type: &str) -> bool {
    match condition.get(schema::FIELD_OBJECT_TYPE) {
        None => false,
        Some(Value::String(s)) => s != object_type,
        Some(_) => true,
    }
}

/// Evaluate a condition against a document
pub fn matches(document: &Document, condition: &Document) -> bool {
    condition
        .iter()
        .all(|(key, expected)| value_matches(lookup_path(document, key), expected))
}

fn value_matches(actual: Option<&Value>, expected: &Value) -> bool {
    if let Some(list) = expected.get(OP_IN).and_then(Value::as_array) {
        return match actual {
            Some(actual) => list.iter().any(|candidate| candidate == actual),
            None => false,
        };
    }
    actual == Some(expected)
}

/// Resolve a possibly-dotted key against a document
///
/// `"a.b.c"` descends through nested mappings; a plain key is a direct
/// field lookup.
pub fn lookup_path<'a>(document: &'a Document, path: &str) -> Option<&'a Value> {
    let mut segments = path.split('.');
    let mut current = document.get(segments.next()?)?;
    for segment in segments {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

/// Render a condition for error context
pub fn render(condition: &Document) -> String {
    serde_json::to_string(condition).unwrap_or_else(|_| "{}".to_string())
}
