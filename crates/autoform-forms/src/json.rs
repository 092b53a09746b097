//! The JSON field.
//!
//! A JSON field holds a structured value (an object or an array) in the model
//! and carries it through the form as serialized text. Submitted input is
//! untrusted, so the coercion back never fails: it falls back to the most
//! sensible structured value instead.

use std::sync::Arc;

use autoform_core::json::{is_empty, is_structured};
use autoform_core::FormsResult;
use serde_json::Value;

use crate::field::{FieldBuilder, FormType};
use crate::options::FieldOptions;
use crate::transformer::DataTransformer;

/// Serializes a structured value to text. Any other value is returned as is.
///
/// # Examples
///
/// ```
/// use autoform_forms::json::to_external;
/// use serde_json::json;
///
/// assert_eq!(to_external(&json!({"a": [1, 2]})), json!(r#"{"a":[1,2]}"#));
/// assert_eq!(to_external(&json!("plain")), json!("plain"));
/// ```
pub fn to_external(value: &Value) -> Value {
    if is_structured(value) {
        Value::String(value.to_string())
    } else {
        value.clone()
    }
}

/// Coerces a submitted value into a structured value.
///
/// - Objects and arrays are returned unchanged.
/// - Empty values (`null`, `""`, `"0"`, `false`, `0`) become `[]`.
/// - A string holding a serialized object or array becomes that value.
/// - A string holding some other truthy JSON scalar (`"\"text\""`, `"12"`)
///   becomes `[]`.
/// - Anything else, including text that is not JSON, is wrapped as `[value]`.
///
/// # Examples
///
/// ```
/// use autoform_forms::json::to_internal;
/// use serde_json::json;
///
/// assert_eq!(to_internal(&json!(r#"{"a":1}"#)), json!({"a": 1}));
/// assert_eq!(to_internal(&json!("not valid json")), json!(["not valid json"]));
/// assert_eq!(to_internal(&json!(null)), json!([]));
/// ```
pub fn to_internal(value: &Value) -> Value {
    if is_structured(value) {
        return value.clone();
    }
    if is_empty(value) {
        return Value::Array(Vec::new());
    }

    if let Value::String(text) = value {
        if let Ok(parsed) = serde_json::from_str::<Value>(text) {
            if is_structured(&parsed) {
                return parsed;
            }
            if !is_empty(&parsed) {
                return Value::Array(Vec::new());
            }
        }
    }

    Value::Array(vec![value.clone()])
}

/// The JSON field's view transformer. Never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonTransformer;

impl DataTransformer for JsonTransformer {
    fn transform(&self, value: &Value) -> FormsResult<Value> {
        Ok(to_external(value))
    }

    fn reverse_transform(&self, value: &Value) -> FormsResult<Value> {
        Ok(to_internal(value))
    }
}

/// Resolved options of a [`JsonType`] field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JsonOptions {
    /// The field holds a collection of values.
    pub multiple: bool,
    /// The field has no child fields.
    pub compound: bool,
}

impl Default for JsonOptions {
    fn default() -> Self {
        Self {
            multiple: true,
            compound: false,
        }
    }
}

/// A field whose structured value travels through the form as JSON text.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonType;

impl FormType for JsonType {
    type Options = JsonOptions;

    fn block_prefix(&self) -> &'static str {
        "json_type"
    }

    fn configure_options(&self, mut options: FieldOptions) -> FormsResult<JsonOptions> {
        let mut resolved = JsonOptions::default();
        if let Some(multiple) = options.take("multiple") {
            resolved.multiple = multiple.is_truthy();
        }
        if let Some(compound) = options.take("compound") {
            resolved.compound = compound.is_truthy();
        }
        options.ensure_consumed()?;
        Ok(resolved)
    }

    fn build_form(&self, builder: &mut FieldBuilder, _options: &JsonOptions) {
        builder.add_view_transformer(Arc::new(JsonTransformer));
    }
}
