use std::sync::Arc;

use autoform_core::settings::AutocompleteSettings;
use autoform_core::FormsResult;
use autoform_db::EntityManager;
use serde_json::{Map, Value};

use super::converter::Converter;
use super::options::AutocompleteOptions;
use super::resolver::OptionsResolver;
use super::search::SearchRegistry;
use crate::field::{has_data, Field, FieldBuilder, FieldView, FormType};
use crate::options::FieldOptions;

/// The `attr` key carrying the pre-selected entities for the widget.
pub const SELECTED_DATA_ATTR: &str = "data-selected-data";

/// A hidden input holding an entity identifier, driven by a search widget.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use autoform_db::InMemoryEntityManager;
/// use autoform_forms::autocomplete::{AutocompleteType, EntitySearchHandler, SearchRegistry};
/// use autoform_forms::{create_field, FieldOptions};
///
/// let mut registry = SearchRegistry::new();
/// registry.add_search_handler("users", Arc::new(EntitySearchHandler::new("User", ["name"])));
///
/// let manager = InMemoryEntityManager::new();
/// manager.register_class("User", "id");
///
/// let autocomplete = AutocompleteType::new(Arc::new(registry), Arc::new(manager));
/// let field = create_field(
///     &autocomplete,
///     "owner",
///     FieldOptions::new().with("autocomplete_alias", "users"),
/// )
/// .unwrap();
/// assert_eq!(field.options().entity_class, "User");
/// ```
#[derive(Clone)]
pub struct AutocompleteType {
    registry: Arc<SearchRegistry>,
    entity_manager: Arc<dyn EntityManager>,
    settings: AutocompleteSettings,
}

impl AutocompleteType {
    /// Creates the field type with default settings.
    pub fn new(registry: Arc<SearchRegistry>, entity_manager: Arc<dyn EntityManager>) -> Self {
        Self {
            registry,
            entity_manager,
            settings: AutocompleteSettings::default(),
        }
    }

    /// Replaces the settings that provide default routes and widget configs.
    #[must_use]
    pub fn with_settings(mut self, settings: AutocompleteSettings) -> Self {
        self.settings = settings;
        self
    }

    /// The search handler registry.
    pub fn registry(&self) -> &SearchRegistry {
        &self.registry
    }

    /// A resolver over this type's registry, entity manager and settings.
    pub fn resolver(&self) -> OptionsResolver<'_> {
        OptionsResolver::new(&self.registry, &self.entity_manager, &self.settings)
    }
}

impl std::fmt::Debug for AutocompleteType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AutocompleteType")
            .field("aliases", &self.registry.aliases())
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl FormType for AutocompleteType {
    type Options = AutocompleteOptions;

    fn block_prefix(&self) -> &'static str {
        "select_hidden_autocomplete"
    }

    fn parent(&self) -> Option<&'static str> {
        Some("select_hidden")
    }

    fn configure_options(&self, options: FieldOptions) -> FormsResult<AutocompleteOptions> {
        self.resolver().resolve(options)
    }

    fn build_form(&self, builder: &mut FieldBuilder, options: &AutocompleteOptions) {
        builder.add_view_transformer(Arc::clone(&options.transformer));
    }

    fn empty_data(&self, options: &AutocompleteOptions) -> Value {
        options.empty_data.clone()
    }

    fn build_view(&self, view: &mut FieldView, field: &Field<AutocompleteOptions>) {
        let options = field.options();
        view.set_var("placeholder", options.placeholder.clone());
        view.set_var("error_bubbling", Value::Bool(options.error_bubbling));
        view.set_var("configs", Value::Object(options.configs.clone()));
        view.set_var("excluded", excluded_list(&options.excluded));

        if has_data(field) {
            let selected = selected_data(
                options.converter.as_ref(),
                field.data(),
                options.is_multiple(),
            );
            let mut attr = Map::new();
            attr.insert(SELECTED_DATA_ATTR.to_string(), selected);
            let mut vars = Map::new();
            vars.insert("attr".to_string(), Value::Object(attr));
            view.merge_vars(vars);
        }

        if options.random_id {
            view.randomize_id();
        }
    }
}

/// Projects the field data through `converter` for display.
///
/// A multiple field maps every element, keeping their order; a lone value in
/// a multiple field is treated as a one-element list.
pub fn selected_data(converter: &dyn Converter, data: &Value, multiple: bool) -> Value {
    match (multiple, data) {
        (true, Value::Array(items)) => {
            Value::Array(items.iter().map(|item| converter.convert_item(item)).collect())
        }
        (true, item) => Value::Array(vec![converter.convert_item(item)]),
        (false, item) => converter.convert_item(item),
    }
}

fn excluded_list(excluded: &Value) -> Value {
    match excluded {
        Value::Null => Value::Array(Vec::new()),
        Value::Array(_) | Value::Object(_) => excluded.clone(),
        scalar => Value::Array(vec![scalar.clone()]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::autocomplete::EntitySearchHandler;
    use crate::field::{create_field, create_view};
    use autoform_db::InMemoryEntityManager;
    use serde_json::json;

    fn autocomplete() -> AutocompleteType {
        let mut registry = SearchRegistry::new();
        registry.add_search_handler(
            "users",
            Arc::new(EntitySearchHandler::new("User", ["name"])),
        );

        let manager = InMemoryEntityManager::new();
        manager.register_class("User", "id");
        manager.insert("User", json!({"id": 1, "name": "Ada"})).unwrap();
        manager.insert("User", json!({"id": 2, "name": "Grace"})).unwrap();

        AutocompleteType::new(Arc::new(registry), Arc::new(manager))
    }

    #[test]
    fn test_block_prefixes() {
        let field = create_field(
            &autocomplete(),
            "owner",
            FieldOptions::new().with("autocomplete_alias", "users"),
        )
        .unwrap();
        assert_eq!(
            field.block_prefixes(),
            ["select_hidden", "select_hidden_autocomplete"]
        );
    }

    #[test]
    fn test_view_without_data() {
        let form_type = autocomplete();
        let field = create_field(
            &form_type,
            "owner",
            FieldOptions::new()
                .with("autocomplete_alias", "users")
                .with("random_id", false),
        )
        .unwrap();

        let view = create_view(&form_type, &field).unwrap();
        assert_eq!(view.id(), "id_owner");
        assert_eq!(view.var("value"), Some(&Value::Null));
        assert_eq!(view.var("excluded"), Some(&json!([])));
        assert_eq!(view.var("configs").unwrap()["route_name"], "autocomplete_search");
        assert_eq!(view.var("attr"), Some(&json!({})));
        assert_eq!(view.var("placeholder"), Some(&json!("")));
        assert_eq!(view.var("error_bubbling"), Some(&json!(false)));
    }

    #[test]
    fn test_view_carries_placeholder_and_error_bubbling() {
        let form_type = autocomplete();
        let field = create_field(
            &form_type,
            "owner",
            FieldOptions::new()
                .with("autocomplete_alias", "users")
                .with("placeholder", "Pick one")
                .with("error_bubbling", true),
        )
        .unwrap();

        let view = create_view(&form_type, &field).unwrap();
        assert_eq!(view.var("placeholder"), Some(&json!("Pick one")));
        assert_eq!(view.var("error_bubbling"), Some(&json!(true)));
        assert_eq!(view.var("configs").unwrap()["placeholder"], "<choose-value-key>");
    }

    #[test]
    fn test_blank_submission_uses_empty_data() {
        let form_type = autocomplete();
        let mut field = create_field(
            &form_type,
            "owner",
            FieldOptions::new()
                .with("autocomplete_alias", "users")
                .with("empty_data", "1"),
        )
        .unwrap();

        field.submit(&json!("")).unwrap();
        assert_eq!(field.data(), &json!({"id": 1, "name": "Ada"}));

        field.submit(&json!("2")).unwrap();
        assert_eq!(field.data(), &json!({"id": 2, "name": "Grace"}));
    }

    #[test]
    fn test_blank_submission_without_empty_data_clears_the_field() {
        let form_type = autocomplete();
        let mut field = create_field(
            &form_type,
            "owner",
            FieldOptions::new().with("autocomplete_alias", "users"),
        )
        .unwrap();
        field.set_data(json!({"id": 2, "name": "Grace"}));

        field.submit(&json!("")).unwrap();
        assert_eq!(field.data(), &Value::Null);
    }

    /// Counts conversions and records what it was given.
    #[derive(Debug, Default)]
    struct RecordingConverter {
        calls: std::sync::Mutex<Vec<Value>>,
    }

    impl Converter for RecordingConverter {
        fn convert_item(&self, item: &Value) -> Value {
            self.calls.lock().unwrap().push(item.clone());
            json!("converted")
        }
    }

    #[test]
    fn test_explicitly_single_field_converts_data_once() {
        let recorder = Arc::new(RecordingConverter::default());
        let converter: Arc<dyn Converter> = recorder.clone();
        let form_type = autocomplete();
        let mut field = create_field(
            &form_type,
            "owners",
            FieldOptions::new()
                .with("autocomplete_alias", "users")
                .with("converter", converter)
                .with("configs", json!({"multiple": false})),
        )
        .unwrap();
        let data = json!([{"id": 1, "name": "Ada"}, {"id": 2, "name": "Grace"}]);
        field.set_data(data.clone());

        let view = create_view(&form_type, &field).unwrap();
        assert_eq!(view.var("attr").unwrap()[SELECTED_DATA_ATTR], json!("converted"));
        assert_eq!(*recorder.calls.lock().unwrap(), vec![data]);
    }

    #[test]
    fn test_view_with_single_entity() {
        let form_type = autocomplete();
        let mut field = create_field(
            &form_type,
            "owner",
            FieldOptions::new()
                .with("autocomplete_alias", "users")
                .with("attr", json!({"class": "picker"}))
                .with("excluded", json!(3)),
        )
        .unwrap();
        field.set_data(json!({"id": 1, "name": "Ada"}));

        let view = create_view(&form_type, &field).unwrap();
        assert_eq!(view.var("value"), Some(&json!(1)));
        assert_eq!(view.var("excluded"), Some(&json!([3])));
        assert_eq!(
            view.var("attr"),
            Some(&json!({"class": "picker", "data-selected-data": {"id": 1, "name": "Ada"}}))
        );
        assert!(view.id().starts_with("id_owner-uid-"));
    }

    #[test]
    fn test_view_with_multiple_entities() {
        let form_type = autocomplete();
        let mut field = create_field(
            &form_type,
            "reviewers",
            FieldOptions::new()
                .with("autocomplete_alias", "users")
                .with("configs", json!({"multiple": true})),
        )
        .unwrap();
        field.set_data(json!([
            {"id": 2, "name": "Grace", "role": "admin"},
            {"id": 1, "name": "Ada"}
        ]));

        let view = create_view(&form_type, &field).unwrap();
        assert_eq!(view.var("value"), Some(&json!([2, 1])));
        assert_eq!(
            view.var("attr").unwrap()[SELECTED_DATA_ATTR],
            json!([{"id": 2, "name": "Grace"}, {"id": 1, "name": "Ada"}])
        );
    }

    #[test]
    fn test_submit_resolves_entities() {
        let form_type = autocomplete();
        let mut field = create_field(
            &form_type,
            "owner",
            FieldOptions::new().with("autocomplete_alias", "users"),
        )
        .unwrap();

        field.submit(&json!("2")).unwrap();
        assert_eq!(field.data(), &json!({"id": 2, "name": "Grace"}));
        assert!(field.submit(&json!("9")).is_err());
        assert_eq!(field.data(), &json!({"id": 2, "name": "Grace"}));
    }

    #[test]
    fn test_selected_data_wraps_lone_value_when_multiple() {
        let handler = EntitySearchHandler::new("User", ["name"]);
        let entity = json!({"id": 1, "name": "Ada"});
        assert_eq!(
            selected_data(&handler, &entity, true),
            json!([{"id": 1, "name": "Ada"}])
        );
        assert_eq!(
            selected_data(&handler, &entity, false),
            json!({"id": 1, "name": "Ada"})
        );
    }

    #[test]
    fn test_excluded_list() {
        assert_eq!(excluded_list(&Value::Null), json!([]));
        assert_eq!(excluded_list(&json!("5")), json!(["5"]));
        assert_eq!(excluded_list(&json!([1, 2])), json!([1, 2]));
    }
}
