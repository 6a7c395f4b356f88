#![forbid(unsafe_code)]

pub(super) mod schema;

use serde_json::Value as JsonValue;

/// Serializes a slice of strings into a JSON array, used for
/// `sanitization_log.issues` and job-failure `error` free text stays plain.
pub(super) fn json_string_array(items: &[String]) -> String {
    JsonValue::Array(items.iter().cloned().map(JsonValue::String).collect()).to_string()
}

pub(super) fn parse_json_string_array(raw: &str) -> Vec<String> {
    serde_json::from_str::<Vec<String>>(raw).unwrap_or_default()
}
