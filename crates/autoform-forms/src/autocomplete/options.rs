use std::sync::Arc;

use autoform_core::json::is_empty;
use serde_json::{Map, Value};

use super::converter::Converter;
use crate::transformer::DataTransformer;

/// Fully resolved options of an autocomplete field.
///
/// Produced by [`OptionsResolver`](super::OptionsResolver). Once resolved,
/// `entity_class` is non-empty, `converter` and `transformer` are set, and
/// `configs["route_name"]` is a non-empty string.
#[derive(Debug, Clone)]
pub struct AutocompleteOptions {
    /// Placeholder of the hidden input itself.
    pub placeholder: Value,
    /// View value submitted in place of a blank submission.
    pub empty_data: Value,
    /// The referenced entity class.
    pub entity_class: String,
    /// Client-side widget configuration.
    pub configs: Map<String, Value>,
    /// Renders the selected entity for the widget.
    pub converter: Arc<dyn Converter>,
    /// Moves the value between entity and identifier.
    pub transformer: Arc<dyn DataTransformer>,
    /// Alias of the search handler backing the widget.
    pub autocomplete_alias: Option<String>,
    /// Identifiers suppressed from search results.
    pub excluded: Value,
    /// Whether the view id gets a random suffix.
    pub random_id: bool,
    /// Whether errors are reported on the parent form instead of the field.
    pub error_bubbling: bool,
}

impl AutocompleteOptions {
    /// The `configs["multiple"]` flag; absent when the caller never set it.
    pub fn multiple(&self) -> Option<bool> {
        self.configs.get("multiple").map(|value| !is_empty(value))
    }

    /// Whether the field holds a list of entities. Absent means `false`.
    pub fn is_multiple(&self) -> bool {
        self.multiple().unwrap_or(false)
    }

    /// The resolved route name.
    pub fn route_name(&self) -> &str {
        self.configs
            .get("route_name")
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    /// The resolved widget properties.
    pub fn properties(&self) -> Vec<&str> {
        self.configs
            .get("properties")
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }
}
