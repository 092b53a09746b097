//! Helpers for working with [`serde_json::Value`] the way form options and
//! submitted data are interpreted.

use serde_json::{Map, Value};

/// Returns `true` if the value counts as empty.
///
/// `null`, `false`, zero, the empty string, the string `"0"`, and empty
/// arrays and objects are all empty. Option resolution and value coercion use
/// this test wherever a value is "not set".
///
/// # Examples
///
/// ```
/// use autoform_core::json::is_empty;
/// use serde_json::json;
///
/// assert!(is_empty(&json!(null)));
/// assert!(is_empty(&json!("0")));
/// assert!(is_empty(&json!([])));
/// assert!(!is_empty(&json!("users")));
/// ```
pub fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f == 0.0),
        Value::String(s) => s.is_empty() || s == "0",
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}

/// Returns `true` if the value is an array or an object.
pub const fn is_structured(value: &Value) -> bool {
    matches!(value, Value::Array(_) | Value::Object(_))
}

/// Recursively merges `overrides` into `base`. Values from `overrides` win.
///
/// Objects are merged key by key with [`merge_maps`]. Any other override
/// value replaces the base value wholesale, arrays included.
pub fn merge(base: Value, overrides: Value) -> Value {
    match (base, overrides) {
        (Value::Object(base_map), Value::Object(override_map)) => {
            Value::Object(merge_maps(base_map, override_map))
        }
        (_, overrides) => overrides,
    }
}

/// Recursively merges two objects, keeping the key order of `base` and
/// appending keys that only exist in `overrides`.
pub fn merge_maps(mut base: Map<String, Value>, overrides: Map<String, Value>) -> Map<String, Value> {
    for (key, override_v) in overrides {
        let merged = match base.get_mut(&key) {
            Some(base_v) => merge(base_v.take(), override_v),
            None => override_v,
        };
        base.insert(key, merged);
    }
    base
}

/// Converts a TOML value into the equivalent JSON value.
///
/// TOML datetimes have no JSON counterpart and become strings.
pub fn toml_to_json(value: toml::Value) -> Value {
    match value {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => serde_json::json!(i),
        toml::Value::Float(f) => serde_json::json!(f),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(arr) => Value::Array(arr.into_iter().map(toml_to_json).collect()),
        toml::Value::Table(table) => Value::Object(
            table
                .into_iter()
                .map(|(k, v)| (k, toml_to_json(v)))
                .collect(),
        ),
    }
}

/// Short, human-readable name of a JSON value's type, used in error messages.
pub const fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
