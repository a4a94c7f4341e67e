//! Request payload normalization applied before validation.

use serde_json::Value;

/// Trim every string in `value` and turn the ones left empty into `null`.
///
/// Recurses through arrays and objects, so `{"tags": [" ", "a "]}` becomes
/// `{"tags": [null, "a"]}`.
pub fn normalize_payload(value: Value) -> Value {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                Value::Null
            } else if trimmed.len() == s.len() {
                Value::String(s)
            } else {
                Value::String(trimmed.to_string())
            }
        }
        Value::Array(items) => Value::Array(items.into_iter().map(normalize_payload).collect()),
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| (k, normalize_payload(v)))
                .collect(),
        ),
        other => other,
    }
}
