//! JSON utility functions

use serde_json::Value as JsonValue;

/// Returns true if the value would count as "set" under logical-OR defaulting.
///
/// `null`, `false`, `0`, `0.0` and `""` are falsy. Every object and array is
/// truthy, including empty ones.
pub fn is_truthy(value: &JsonValue) -> bool {
    match value {
        JsonValue::Null => false,
        JsonValue::Bool(b) => *b,
        JsonValue::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        JsonValue::String(s) => !s.is_empty(),
        JsonValue::Array(_) | JsonValue::Object(_) => true,
    }
}

/// Returns the value only if it is present and truthy.
pub fn truthy(value: Option<&JsonValue>) -> Option<&JsonValue> {
    value.filter(|v| is_truthy(v))
}

/// Short name of the JSON type, for log fields and error messages.
pub fn type_name(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

/// Object or array.
pub fn is_composite(value: &JsonValue) -> bool {
    matches!(value, JsonValue::Array(_) | JsonValue::Object(_))
}

/// Object or array with no entries.
pub fn is_empty_composite(value: &JsonValue) -> bool {
    match value {
        JsonValue::Array(items) => items.is_empty(),
        JsonValue::Object(map) => map.is_empty(),
        _ => false,
    }
}
