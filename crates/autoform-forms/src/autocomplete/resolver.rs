use std::sync::Arc;

use autoform_core::json::{is_empty, merge_maps, type_name};
use autoform_core::settings::AutocompleteSettings;
use autoform_core::{FormsError, FormsResult};
use autoform_db::EntityManager;
use serde_json::{Map, Value};

use super::converter::{Converter, HandlerConverter};
use super::options::AutocompleteOptions;
use super::search::{SearchHandler, SearchRegistry};
use crate::options::{FieldOptions, OptionValue};
use crate::transformer::{DataTransformer, EntityToIdTransformer};

/// Resolves raw autocomplete options into [`AutocompleteOptions`].
///
/// Resolution runs as an ordered pipeline over the caller's options merged
/// with the defaults: converter, entity class, transformer, then `configs`.
/// Later steps read what earlier steps derived. The registry is only read,
/// and only when an alias is set and a value has to be derived from it.
pub struct OptionsResolver<'a> {
    registry: &'a SearchRegistry,
    entity_manager: &'a Arc<dyn EntityManager>,
    settings: &'a AutocompleteSettings,
}

impl<'a> OptionsResolver<'a> {
    /// Creates a resolver reading from `registry` and building default
    /// transformers on top of `entity_manager`.
    pub const fn new(
        registry: &'a SearchRegistry,
        entity_manager: &'a Arc<dyn EntityManager>,
        settings: &'a AutocompleteSettings,
    ) -> Self {
        Self {
            registry,
            entity_manager,
            settings,
        }
    }

    /// The default `configs` mapping.
    pub fn default_configs(&self) -> Map<String, Value> {
        let mut configs = Map::new();
        configs.insert(
            "placeholder".to_string(),
            Value::from(self.settings.placeholder.as_str()),
        );
        configs.insert("allowClear".to_string(), Value::from(self.settings.allow_clear));
        configs.insert(
            "minimumInputLength".to_string(),
            Value::from(self.settings.minimum_input_length),
        );
        configs
    }

    /// Resolves `options`, failing on the first option that cannot be
    /// resolved. Options the field does not declare are rejected.
    pub fn resolve(&self, mut options: FieldOptions) -> FormsResult<AutocompleteOptions> {
        let placeholder = match take(&mut options, "placeholder").into_json("placeholder")? {
            Value::Null => Value::String(String::new()),
            placeholder => placeholder,
        };
        let empty_data = take(&mut options, "empty_data").into_json("empty_data")?;
        // Field data is always an entity of `entity_class`.
        if let Some(data_class) =
            take(&mut options, "data_class").as_optional_string("data_class")?
        {
            return Err(FormsError::ConfigurationError(format!(
                "The option \"data_class\" must be empty, got \"{data_class}\"."
            )));
        }
        let alias =
            take(&mut options, "autocomplete_alias").as_optional_string("autocomplete_alias")?;
        let excluded = take(&mut options, "excluded").into_json("excluded")?;
        let random_id = options
            .take("random_id")
            .map_or(true, |value| value.is_truthy());
        let error_bubbling = options
            .take("error_bubbling")
            .is_some_and(|value| value.is_truthy());

        let raw_converter = take(&mut options, "converter");
        let raw_entity_class = take(&mut options, "entity_class");
        let raw_transformer = take(&mut options, "transformer");
        let raw_configs = take(&mut options, "configs");
        options.ensure_consumed()?;

        let mut lookup = AliasLookup {
            registry: self.registry,
            alias: alias.as_deref(),
            handler: None,
        };

        let converter = resolve_converter(raw_converter, &mut lookup)?;
        let entity_class = resolve_entity_class(&raw_entity_class, &mut lookup)?;
        let transformer = self.resolve_transformer(raw_transformer, &entity_class)?;
        let configs = self.resolve_configs(raw_configs, &mut lookup)?;

        Ok(AutocompleteOptions {
            placeholder,
            empty_data,
            entity_class,
            configs,
            converter,
            transformer,
            autocomplete_alias: alias,
            excluded,
            random_id,
            error_bubbling,
        })
    }

    fn resolve_transformer(
        &self,
        value: OptionValue,
        entity_class: &str,
    ) -> FormsResult<Arc<dyn DataTransformer>> {
        let value = if value.is_empty() && !entity_class.is_empty() {
            tracing::debug!(entity_class, "default entity-to-id transformer");
            OptionValue::Transformer(Arc::new(EntityToIdTransformer::new(
                Arc::clone(self.entity_manager),
                entity_class,
            )))
        } else {
            value
        };

        match value {
            OptionValue::Transformer(transformer) => Ok(transformer),
            other => {
                tracing::warn!(found = other.describe(), "invalid transformer option");
                Err(FormsError::InvalidTransformerType {
                    found: other.describe().to_string(),
                })
            }
        }
    }

    fn resolve_configs(
        &self,
        value: OptionValue,
        lookup: &mut AliasLookup<'_>,
    ) -> FormsResult<Map<String, Value>> {
        let overrides = match value.into_json("configs")? {
            Value::Null => Map::new(),
            Value::Object(map) => map,
            other => {
                return Err(FormsError::ConfigurationError(format!(
                    "The option \"configs\" must be an object, got {}.",
                    type_name(&other)
                )))
            }
        };
        let mut configs = merge_maps(self.default_configs(), overrides);

        if let Some(alias) = lookup.alias {
            configs.insert("autocomplete_alias".to_string(), Value::from(alias));

            if configs.get("properties").map_or(true, is_empty) {
                let properties = lookup.get()?.properties().to_vec();
                tracing::debug!(alias, ?properties, "properties from search handler");
                configs.insert("properties".to_string(), Value::from(properties));
            }
            if configs.get("route_name").map_or(true, is_empty) {
                configs.insert(
                    "route_name".to_string(),
                    Value::from(self.settings.route_name.as_str()),
                );
            }
            if configs.get("component").map_or(true, is_empty) {
                configs.insert(
                    "component".to_string(),
                    Value::from(self.settings.component.as_str()),
                );
            }
        }

        if !configs.contains_key("route_parameters") {
            configs.insert("route_parameters".to_string(), Value::Object(Map::new()));
        }

        match configs.get("route_name") {
            Some(route) if !is_empty(route) => {
                if !route.is_string() {
                    return Err(FormsError::ConfigurationError(format!(
                        "Option \"configs[route_name]\" must be a string, got {}.",
                        type_name(route)
                    )));
                }
            }
            _ => {
                tracing::warn!("autocomplete field has no route name");
                return Err(FormsError::MissingRouteName);
            }
        }

        Ok(configs)
    }
}

fn take(options: &mut FieldOptions, name: &str) -> OptionValue {
    options.take(name).unwrap_or_default()
}

/// Fetches the search handler of the alias at most once per resolution.
struct AliasLookup<'a> {
    registry: &'a SearchRegistry,
    alias: Option<&'a str>,
    handler: Option<Arc<dyn SearchHandler>>,
}

impl AliasLookup<'_> {
    fn get(&mut self) -> FormsResult<Arc<dyn SearchHandler>> {
        if let Some(handler) = &self.handler {
            return Ok(Arc::clone(handler));
        }

        let alias = self.alias.ok_or_else(|| {
            FormsError::ConfigurationError("No autocomplete alias to look up.".to_string())
        })?;
        let handler = self.registry.get_search_handler(alias)?;
        self.handler = Some(Arc::clone(&handler));
        Ok(handler)
    }
}

fn resolve_converter(
    value: OptionValue,
    lookup: &mut AliasLookup<'_>,
) -> FormsResult<Arc<dyn Converter>> {
    let alias = lookup.alias;
    let value = match alias {
        Some(alias) if value.is_empty() => {
            tracing::debug!(alias, "converter from search handler");
            OptionValue::SearchHandler(lookup.get()?)
        }
        _ => value,
    };

    match value {
        OptionValue::Converter(converter) => Ok(converter),
        OptionValue::SearchHandler(handler) => Ok(Arc::new(HandlerConverter::new(handler))),
        missing if missing.is_empty() => {
            tracing::warn!("autocomplete field has no converter");
            Err(FormsError::MissingConverter)
        }
        other => {
            tracing::warn!(found = other.describe(), "invalid converter option");
            Err(FormsError::InvalidConverterType {
                found: other.describe().to_string(),
            })
        }
    }
}

fn resolve_entity_class(
    value: &OptionValue,
    lookup: &mut AliasLookup<'_>,
) -> FormsResult<String> {
    if let Some(entity_class) = value.as_optional_string("entity_class")? {
        return Ok(entity_class);
    }

    if let Some(alias) = lookup.alias {
        let entity_class = lookup.get()?.entity_name().to_string();
        tracing::debug!(alias, %entity_class, "entity class from search handler");
        return Ok(entity_class);
    }

    tracing::warn!("autocomplete field has no entity class");
    Err(FormsError::MissingEntityClass)
}
