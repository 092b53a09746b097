//! Settings for autoform field types.
//!
//! [`Settings`] holds logging switches and the [`AutocompleteSettings`] used
//! as defaults while autocomplete field options are resolved. Settings are
//! plain values handed to the field types that need them; there is no global
//! instance.

use serde::{Deserialize, Serialize};

/// Route used by autocomplete widgets when a search alias is configured and
/// no route is given.
pub const DEFAULT_ROUTE_NAME: &str = "autocomplete_search";

/// Client-side component used by autocomplete widgets.
pub const DEFAULT_COMPONENT: &str = "autocomplete";

/// Translation key of the default widget placeholder.
pub const DEFAULT_PLACEHOLDER: &str = "<choose-value-key>";

/// Defaults applied to autocomplete field `configs`.
///
/// # Examples
///
/// ```
/// use autoform_core::settings::AutocompleteSettings;
///
/// let settings = AutocompleteSettings::default();
/// assert_eq!(settings.route_name, "autocomplete_search");
/// assert!(settings.allow_clear);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutocompleteSettings {
    /// Route name stamped into `configs.route_name` for alias-backed fields.
    pub route_name: String,
    /// Component name stamped into `configs.component` for alias-backed fields.
    pub component: String,
    /// Default `configs.placeholder`.
    pub placeholder: String,
    /// Default `configs.allowClear`.
    pub allow_clear: bool,
    /// Default `configs.minimumInputLength`.
    pub minimum_input_length: u32,
}

impl Default for AutocompleteSettings {
    fn default() -> Self {
        Self {
            route_name: DEFAULT_ROUTE_NAME.to_string(),
            component: DEFAULT_COMPONENT.to_string(),
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
            allow_clear: true,
            minimum_input_length: 0,
        }
    }
}

/// The complete set of autoform settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Whether debug mode is enabled. Selects human-readable log output.
    pub debug: bool,
    /// The log filter (e.g. "info", "autoform_forms=debug").
    pub log_level: String,
    /// Autocomplete field defaults.
    pub autocomplete: AutocompleteSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debug: true,
            log_level: "info".to_string(),
            autocomplete: AutocompleteSettings::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert!(settings.debug);
        assert_eq!(settings.log_level, "info");
        assert_eq!(settings.autocomplete.component, "autocomplete");
        assert_eq!(settings.autocomplete.placeholder, "<choose-value-key>");
        assert_eq!(settings.autocomplete.minimum_input_length, 0);
    }

    #[test]
    fn test_partial_deserialize_keeps_defaults() {
        let settings: Settings =
            serde_json::from_str(r#"{"autocomplete": {"route_name": "search"}}"#).unwrap();
        assert_eq!(settings.autocomplete.route_name, "search");
        assert_eq!(settings.autocomplete.component, "autocomplete");
        assert_eq!(settings.log_level, "info");
    }
}
