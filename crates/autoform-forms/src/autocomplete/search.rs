use std::collections::HashMap;
use std::sync::Arc;

use autoform_core::{FormsError, FormsResult};
use serde_json::{Map, Value};

use super::converter::Converter;

/// Entity metadata and display conversion behind an autocomplete alias.
///
/// The search itself is served by the host application; field types only
/// read the entity name and the displayed properties, and use the handler
/// as a converter for the currently selected value.
pub trait SearchHandler: Converter {
    /// The entity class searched by this handler.
    fn entity_name(&self) -> &str;

    /// The entity properties shown by the widget.
    fn properties(&self) -> &[String];
}

/// A [`SearchHandler`] that displays an entity's identifier and a fixed list
/// of properties.
///
/// Properties may be dotted paths into nested objects (`"owner.name"`).
///
/// # Examples
///
/// ```
/// use autoform_forms::autocomplete::{Converter, EntitySearchHandler};
/// use serde_json::json;
///
/// let handler = EntitySearchHandler::new("User", ["name"]);
/// let item = handler.convert_item(&json!({"id": 3, "name": "Ada", "password": "x"}));
/// assert_eq!(item, json!({"id": 3, "name": "Ada"}));
/// ```
#[derive(Debug, Clone)]
pub struct EntitySearchHandler {
    entity_name: String,
    id_field: String,
    properties: Vec<String>,
}

impl EntitySearchHandler {
    /// Creates a handler for `entity_name` identified by `"id"`.
    pub fn new<I, S>(entity_name: impl Into<String>, properties: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            entity_name: entity_name.into(),
            id_field: "id".to_string(),
            properties: properties.into_iter().map(Into::into).collect(),
        }
    }

    /// Sets the identifier field.
    #[must_use]
    pub fn with_id_field(mut self, id_field: impl Into<String>) -> Self {
        self.id_field = id_field.into();
        self
    }
}

impl Converter for EntitySearchHandler {
    fn convert_item(&self, item: &Value) -> Value {
        let mut result = Map::new();
        result.insert(
            self.id_field.clone(),
            lookup(item, &self.id_field).cloned().unwrap_or(Value::Null),
        );
        for property in &self.properties {
            result.insert(
                property.clone(),
                lookup(item, property).cloned().unwrap_or(Value::Null),
            );
        }
        Value::Object(result)
    }
}

impl SearchHandler for EntitySearchHandler {
    fn entity_name(&self) -> &str {
        &self.entity_name
    }

    fn properties(&self) -> &[String] {
        &self.properties
    }
}

fn lookup<'a>(item: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(item, |current, segment| current.get(segment))
}

/// Search handlers keyed by alias.
///
/// The registry is filled while the application starts and is read-only
/// afterwards; share it behind an `Arc`.
#[derive(Debug, Clone, Default)]
pub struct SearchRegistry {
    handlers: HashMap<String, Arc<dyn SearchHandler>>,
}

impl SearchRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` under `alias`, replacing any previous handler.
    pub fn add_search_handler(
        &mut self,
        alias: impl Into<String>,
        handler: Arc<dyn SearchHandler>,
    ) -> &mut Self {
        self.handlers.insert(alias.into(), handler);
        self
    }

    /// Returns `true` if a handler is registered under `alias`.
    pub fn has_search_handler(&self, alias: &str) -> bool {
        self.handlers.contains_key(alias)
    }

    /// Returns the handler registered under `alias`.
    pub fn get_search_handler(&self, alias: &str) -> FormsResult<Arc<dyn SearchHandler>> {
        self.handlers
            .get(alias)
            .cloned()
            .ok_or_else(|| FormsError::UnknownAlias(alias.to_string()))
    }

    /// Registered aliases, sorted.
    pub fn aliases(&self) -> Vec<&str> {
        let mut aliases: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        aliases.sort_unstable();
        aliases
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_convert_item_keeps_id_and_properties() {
        let handler = EntitySearchHandler::new("User", ["name", "email"]);
        let converted = handler.convert_item(&json!({
            "id": 1,
            "name": "Ada",
            "email": "ada@example.com",
            "password": "secret"
        }));
        assert_eq!(
            converted,
            json!({"id": 1, "name": "Ada", "email": "ada@example.com"})
        );
    }

    #[test]
    fn test_convert_item_nested_and_missing_properties() {
        let handler =
            EntitySearchHandler::new("Task", ["owner.name", "due"]).with_id_field("uuid");
        let converted = handler.convert_item(&json!({"uuid": "t-1", "owner": {"name": "Ada"}}));
        assert_eq!(
            converted,
            json!({"uuid": "t-1", "owner.name": "Ada", "due": null})
        );
    }

    #[test]
    fn test_registry_lookup() {
        let mut registry = SearchRegistry::new();
        registry
            .add_search_handler("users", Arc::new(EntitySearchHandler::new("User", ["name"])))
            .add_search_handler("groups", Arc::new(EntitySearchHandler::new("Group", ["title"])));

        assert!(registry.has_search_handler("users"));
        assert!(!registry.has_search_handler("tags"));
        assert_eq!(registry.aliases(), ["groups", "users"]);

        let handler = registry.get_search_handler("groups").unwrap();
        assert_eq!(handler.entity_name(), "Group");
        assert_eq!(handler.properties(), ["title"]);
    }

    #[test]
    fn test_registry_unknown_alias() {
        let registry = SearchRegistry::new();
        let err = registry.get_search_handler("users").unwrap_err();
        assert!(matches!(err, FormsError::UnknownAlias(alias) if alias == "users"));
    }
}
