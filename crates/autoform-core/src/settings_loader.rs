//! Settings loading from configuration files.
//!
//! ## Loading Order
//!
//! 1. Start with default settings.
//! 2. Load from a TOML or JSON file (overriding defaults).
//! 3. Apply environment variable overrides (highest priority).
//!
//! ## Environment Variable Mapping
//!
//! | Env Var | Setting |
//! |---|---|
//! | `AUTOFORM_DEBUG` | `debug` |
//! | `AUTOFORM_LOG_LEVEL` | `log_level` |
//! | `AUTOFORM_ROUTE_NAME` | `autocomplete.route_name` |
//! | `AUTOFORM_COMPONENT` | `autocomplete.component` |
//! | `AUTOFORM_PLACEHOLDER` | `autocomplete.placeholder` |
//!
//! ## Examples
//!
//! ```rust,no_run
//! use autoform_core::settings_loader;
//!
//! let settings = settings_loader::from_toml_file_with_env("config/autoform.toml").unwrap();
//! ```

use std::path::Path;

use crate::error::FormsError;
use crate::json::{merge, toml_to_json};
use crate::settings::Settings;

/// Loads settings from a TOML string.
///
/// Keys missing from the TOML keep their default values.
///
/// # Errors
///
/// Returns an error if the TOML is malformed or cannot be deserialized.
pub fn from_toml_str(toml_str: &str) -> Result<Settings, FormsError> {
    let toml_value: toml::Value = toml::from_str(toml_str)
        .map_err(|e| FormsError::ConfigurationError(format!("Failed to parse TOML: {e}")))?;
    from_overrides(toml_to_json(toml_value), "TOML")
}

/// Loads settings from a TOML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the TOML is malformed.
pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Settings, FormsError> {
    from_toml_str(&read_file(path.as_ref(), "TOML")?)
}

/// Loads settings from a TOML file and then applies environment variable overrides.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the TOML is malformed.
pub fn from_toml_file_with_env(path: impl AsRef<Path>) -> Result<Settings, FormsError> {
    let mut settings = from_toml_file(path)?;
    apply_env_overrides(&mut settings);
    Ok(settings)
}

/// Loads settings from a JSON string.
///
/// # Errors
///
/// Returns an error if the JSON is malformed or cannot be deserialized.
pub fn from_json_str(json_str: &str) -> Result<Settings, FormsError> {
    let json_value: serde_json::Value = serde_json::from_str(json_str)
        .map_err(|e| FormsError::ConfigurationError(format!("Failed to parse JSON: {e}")))?;
    from_overrides(json_value, "JSON")
}

/// Loads settings from a JSON file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the JSON is malformed.
pub fn from_json_file(path: impl AsRef<Path>) -> Result<Settings, FormsError> {
    from_json_str(&read_file(path.as_ref(), "JSON")?)
}

/// Loads settings from a JSON file and then applies environment variable overrides.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the JSON is malformed.
pub fn from_json_file_with_env(path: impl AsRef<Path>) -> Result<Settings, FormsError> {
    let mut settings = from_json_file(path)?;
    apply_env_overrides(&mut settings);
    Ok(settings)
}

/// Loads settings from just environment variables (starting from defaults).
pub fn from_env() -> Settings {
    let mut settings = Settings::default();
    apply_env_overrides(&mut settings);
    settings
}

/// Applies environment variable overrides to a settings struct.
///
/// `AUTOFORM_DEBUG` accepts "true", "1" or "yes" (case-insensitive); any
/// other value disables debug mode.
pub fn apply_env_overrides(settings: &mut Settings) {
    if let Ok(val) = std::env::var("AUTOFORM_DEBUG") {
        settings.debug = matches!(val.to_lowercase().as_str(), "true" | "1" | "yes");
    }

    if let Ok(val) = std::env::var("AUTOFORM_LOG_LEVEL") {
        settings.log_level = val;
    }

    if let Ok(val) = std::env::var("AUTOFORM_ROUTE_NAME") {
        settings.autocomplete.route_name = val;
    }

    if let Ok(val) = std::env::var("AUTOFORM_COMPONENT") {
        settings.autocomplete.component = val;
    }

    if let Ok(val) = std::env::var("AUTOFORM_PLACEHOLDER") {
        settings.autocomplete.placeholder = val;
    }
}

fn read_file(path: &Path, format: &str) -> Result<String, FormsError> {
    std::fs::read_to_string(path).map_err(|e| {
        FormsError::ConfigurationError(format!(
            "Failed to read {format} file '{}': {e}",
            path.display()
        ))
    })
}

fn from_overrides(overrides: serde_json::Value, format: &str) -> Result<Settings, FormsError> {
    let default_json = serde_json::to_value(Settings::default()).map_err(|e| {
        FormsError::ConfigurationError(format!("Failed to serialize default settings: {e}"))
    })?;

    serde_json::from_value(merge(default_json, overrides)).map_err(|e| {
        FormsError::ConfigurationError(format!("Failed to deserialize settings from {format}: {e}"))
    })
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use serial_test::serial;

    use super::*;

    const ENV_VARS: [&str; 5] = [
        "AUTOFORM_DEBUG",
        "AUTOFORM_LOG_LEVEL",
        "AUTOFORM_ROUTE_NAME",
        "AUTOFORM_COMPONENT",
        "AUTOFORM_PLACEHOLDER",
    ];

    fn clear_env() {
        for var in ENV_VARS {
            std::env::remove_var(var);
        }
    }

    // ── TOML loading ────────────────────────────────────────────────

    #[test]
    fn test_from_toml_str_basic() {
        let toml = r#"
            debug = false
            log_level = "warn"

            [autocomplete]
            route_name = "entity_search"
        "#;

        let settings = from_toml_str(toml).unwrap();
        assert!(!settings.debug);
        assert_eq!(settings.log_level, "warn");
        assert_eq!(settings.autocomplete.route_name, "entity_search");
        // Defaults preserved
        assert_eq!(settings.autocomplete.component, "autocomplete");
        assert!(settings.autocomplete.allow_clear);
    }

    #[test]
    fn test_from_toml_str_empty() {
        let settings = from_toml_str("").unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_from_toml_str_invalid() {
        let result = from_toml_str("debug = = true");
        assert!(matches!(result, Err(FormsError::ConfigurationError(_))));
    }

    #[test]
    fn test_from_toml_str_wrong_type() {
        let result = from_toml_str("debug = \"maybe\"");
        let err = result.unwrap_err();
        assert!(err.to_string().contains("from TOML"));
    }

    #[test]
    fn test_from_toml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[autocomplete]\nminimum_input_length = 2").unwrap();

        let settings = from_toml_file(file.path()).unwrap();
        assert_eq!(settings.autocomplete.minimum_input_length, 2);
    }

    #[test]
    fn test_from_toml_file_missing() {
        let result = from_toml_file("/nonexistent/autoform.toml");
        let err = result.unwrap_err();
        assert!(err.to_string().contains("Failed to read TOML file"));
    }

    // ── JSON loading ────────────────────────────────────────────────

    #[test]
    fn test_from_json_str_basic() {
        let settings =
            from_json_str(r#"{"debug": false, "autocomplete": {"allow_clear": false}}"#).unwrap();
        assert!(!settings.debug);
        assert!(!settings.autocomplete.allow_clear);
        assert_eq!(settings.autocomplete.route_name, "autocomplete_search");
    }

    #[test]
    fn test_from_json_str_invalid() {
        assert!(from_json_str("{not json").is_err());
    }

    #[test]
    fn test_from_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"log_level": "debug"}}"#).unwrap();

        let settings = from_json_file(file.path()).unwrap();
        assert_eq!(settings.log_level, "debug");
    }

    // ── Environment overrides ───────────────────────────────────────

    #[test]
    #[serial]
    fn test_env_override_debug() {
        clear_env();
        std::env::set_var("AUTOFORM_DEBUG", "false");
        assert!(!from_env().debug);

        std::env::set_var("AUTOFORM_DEBUG", "YES");
        assert!(from_env().debug);
        clear_env();
    }

    #[test]
    #[serial]
    fn test_env_override_autocomplete() {
        clear_env();
        std::env::set_var("AUTOFORM_ROUTE_NAME", "api_search");
        std::env::set_var("AUTOFORM_COMPONENT", "select2");
        std::env::set_var("AUTOFORM_PLACEHOLDER", "pick.one");

        let settings = from_env();
        assert_eq!(settings.autocomplete.route_name, "api_search");
        assert_eq!(settings.autocomplete.component, "select2");
        assert_eq!(settings.autocomplete.placeholder, "pick.one");
        clear_env();
    }

    #[test]
    #[serial]
    fn test_env_overrides_file() {
        clear_env();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "log_level = \"info\"").unwrap();
        std::env::set_var("AUTOFORM_LOG_LEVEL", "trace");

        let settings = from_toml_file_with_env(file.path()).unwrap();
        assert_eq!(settings.log_level, "trace");
        clear_env();
    }
}
