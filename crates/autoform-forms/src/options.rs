//! Raw, caller-supplied field options.
//!
//! Callers hand a field type a loosely typed [`FieldOptions`] map. Most
//! options are plain JSON values; capability options (converters,
//! transformers, search handlers) are carried as trait objects. Each field
//! type resolves the raw map into its own statically typed options struct and
//! reports a configuration error when a value has the wrong shape.

use std::collections::HashMap;
use std::sync::Arc;

use autoform_core::json::{is_empty, type_name};
use autoform_core::FormsError;
use serde_json::Value;

use crate::autocomplete::{Converter, SearchHandler};
use crate::transformer::DataTransformer;

/// A single raw option value.
#[derive(Debug, Clone)]
pub enum OptionValue {
    /// A plain JSON value. `Value::Null` means "not set".
    Json(Value),
    /// A converter capability.
    Converter(Arc<dyn Converter>),
    /// A data transformer capability.
    Transformer(Arc<dyn DataTransformer>),
    /// A search handler, which also satisfies the converter capability.
    SearchHandler(Arc<dyn SearchHandler>),
}

impl OptionValue {
    /// The unset value.
    pub const NULL: Self = Self::Json(Value::Null);

    /// Returns `true` if the option counts as unset.
    ///
    /// JSON values use [`is_empty`]; capability values are never empty.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Json(value) => is_empty(value),
            Self::Converter(_) | Self::Transformer(_) | Self::SearchHandler(_) => false,
        }
    }

    /// Returns the JSON value, if this option is one.
    pub const fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Json(value) => Some(value),
            _ => None,
        }
    }

    /// Short description of what this option holds, for error messages.
    pub const fn describe(&self) -> &'static str {
        match self {
            Self::Json(value) => type_name(value),
            Self::Converter(_) => "Converter",
            Self::Transformer(_) => "DataTransformer",
            Self::SearchHandler(_) => "SearchHandler",
        }
    }

    /// Interprets the option as a boolean flag: any non-empty value is `true`.
    pub fn is_truthy(&self) -> bool {
        !self.is_empty()
    }

    /// Reads the option as an optional string. Empty values read as `None`.
    ///
    /// Numbers are accepted and rendered as strings; any other non-empty value
    /// is a configuration error for option `name`.
    pub fn as_optional_string(&self, name: &str) -> Result<Option<String>, FormsError> {
        if self.is_empty() {
            return Ok(None);
        }
        match self {
            Self::Json(Value::String(s)) => Ok(Some(s.clone())),
            Self::Json(Value::Number(n)) => Ok(Some(n.to_string())),
            other => Err(FormsError::ConfigurationError(format!(
                "The option \"{name}\" must be a string, got {}.",
                other.describe()
            ))),
        }
    }

    /// Consumes the option as a JSON value, failing for capability values.
    pub fn into_json(self, name: &str) -> Result<Value, FormsError> {
        match self {
            Self::Json(value) => Ok(value),
            other => Err(FormsError::ConfigurationError(format!(
                "The option \"{name}\" must be a plain value, got {}.",
                other.describe()
            ))),
        }
    }
}

impl Default for OptionValue {
    fn default() -> Self {
        Self::NULL
    }
}

impl From<Value> for OptionValue {
    fn from(value: Value) -> Self {
        Self::Json(value)
    }
}

impl From<&str> for OptionValue {
    fn from(value: &str) -> Self {
        Self::Json(Value::String(value.to_string()))
    }
}

impl From<String> for OptionValue {
    fn from(value: String) -> Self {
        Self::Json(Value::String(value))
    }
}

impl From<bool> for OptionValue {
    fn from(value: bool) -> Self {
        Self::Json(Value::Bool(value))
    }
}

impl From<Arc<dyn Converter>> for OptionValue {
    fn from(value: Arc<dyn Converter>) -> Self {
        Self::Converter(value)
    }
}

impl From<Arc<dyn DataTransformer>> for OptionValue {
    fn from(value: Arc<dyn DataTransformer>) -> Self {
        Self::Transformer(value)
    }
}

impl From<Arc<dyn SearchHandler>> for OptionValue {
    fn from(value: Arc<dyn SearchHandler>) -> Self {
        Self::SearchHandler(value)
    }
}

/// Caller-supplied options for one field, keyed by option name.
///
/// # Examples
///
/// ```
/// use autoform_forms::options::FieldOptions;
/// use serde_json::json;
///
/// let options = FieldOptions::new()
///     .with("autocomplete_alias", "users")
///     .with("configs", json!({"multiple": true}));
/// assert!(options.contains("configs"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct FieldOptions {
    values: HashMap<String, OptionValue>,
}

impl FieldOptions {
    /// Creates an empty options map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets an option, returning the map for chaining.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<OptionValue>) -> Self {
        self.set(name, value);
        self
    }

    /// Sets an option, replacing any previous value.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<OptionValue>) {
        self.values.insert(name.into(), value.into());
    }

    /// Returns the option stored under `name`.
    pub fn get(&self, name: &str) -> Option<&OptionValue> {
        self.values.get(name)
    }

    /// Removes and returns the option stored under `name`.
    pub fn take(&mut self, name: &str) -> Option<OptionValue> {
        self.values.remove(name)
    }

    /// Returns `true` if an option named `name` was supplied.
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Returns `true` if no options are left.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Fails with [`FormsError::UndefinedOption`] if any option remains.
    ///
    /// Field types call this after taking every option they declare. The
    /// reported name is the alphabetically first leftover, so the error is
    /// stable across runs.
    pub fn ensure_consumed(&self) -> Result<(), FormsError> {
        match self.values.keys().min() {
            Some(name) => Err(FormsError::UndefinedOption(name.clone())),
            None => Ok(()),
        }
    }
}

impl<K: Into<String>, V: Into<OptionValue>> FromIterator<(K, V)> for FieldOptions {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_option_value_emptiness() {
        assert!(OptionValue::NULL.is_empty());
        assert!(OptionValue::from("").is_empty());
        assert!(OptionValue::from(false).is_empty());
        assert!(!OptionValue::from("users").is_empty());
        assert!(OptionValue::from(true).is_truthy());
    }

    #[test]
    fn test_as_optional_string() {
        assert_eq!(
            OptionValue::from("User").as_optional_string("entity_class").unwrap(),
            Some("User".to_string())
        );
        assert_eq!(OptionValue::NULL.as_optional_string("entity_class").unwrap(), None);
        assert_eq!(
            OptionValue::from(json!(12)).as_optional_string("entity_class").unwrap(),
            Some("12".to_string())
        );
        let err = OptionValue::from(json!(["User"]))
            .as_optional_string("entity_class")
            .unwrap_err();
        assert!(err.to_string().contains("\"entity_class\" must be a string, got array"));
    }

    #[test]
    fn test_describe() {
        assert_eq!(OptionValue::from(json!({})).describe(), "object");
        assert_eq!(OptionValue::from("x").describe(), "string");
    }

    #[test]
    fn test_field_options_take_and_consume() {
        let mut options = FieldOptions::new().with("label", "Owner").with("zeta", true);
        assert!(options.contains("label"));
        assert!(options.take("label").is_some());
        assert!(options.take("label").is_none());

        let err = options.ensure_consumed().unwrap_err();
        assert!(matches!(err, FormsError::UndefinedOption(name) if name == "zeta"));

        options.take("zeta");
        assert!(options.is_empty());
        assert!(options.ensure_consumed().is_ok());
    }

    #[test]
    fn test_field_options_from_iter() {
        let options: FieldOptions = [("a", json!(1)), ("b", json!(2))].into_iter().collect();
        assert_eq!(options.get("b").and_then(OptionValue::as_json), Some(&json!(2)));
    }
}
