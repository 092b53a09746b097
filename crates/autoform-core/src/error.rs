//! Error types for autoform.
//!
//! [`FormsError`] covers every failure a field type can report: configuration
//! mistakes detected while resolving options, transformation failures raised
//! while moving values between the model and the view, and settings loading
//! errors.

use thiserror::Error;

/// The primary error type for autoform.
///
/// The configuration variants are raised synchronously while a field's options
/// are resolved. They indicate an integration mistake and abort field
/// construction; they are never retried.
#[derive(Error, Debug)]
pub enum FormsError {
    // ── Option resolution ────────────────────────────────────────────

    /// No converter was supplied and none could be derived from an
    /// autocomplete alias.
    #[error("The option \"converter\" must be set.")]
    MissingConverter,

    /// A converter option was supplied but does not implement the converter
    /// capability.
    #[error("The option \"converter\" must implement Converter, got {found}.")]
    InvalidConverterType {
        /// Short description of the value that was supplied.
        found: String,
    },

    /// No entity class was supplied and none could be derived from an
    /// autocomplete alias.
    #[error("The option \"entity_class\" must be set.")]
    MissingEntityClass,

    /// A transformer option was supplied (or defaulted) but does not implement
    /// the transformer capability.
    #[error("The option \"transformer\" must implement DataTransformer, got {found}.")]
    InvalidTransformerType {
        /// Short description of the value that was supplied.
        found: String,
    },

    /// The resolved `configs` mapping carries no route name.
    #[error("Option \"configs[route_name]\" must be set.")]
    MissingRouteName,

    /// The search registry has no handler registered under this alias.
    #[error("Search handler \"{0}\" is not registered.")]
    UnknownAlias(String),

    /// The caller passed an option the field type does not declare.
    #[error("The option \"{0}\" does not exist.")]
    UndefinedOption(String),

    // ── Transformation ───────────────────────────────────────────────

    /// A data transformer could not convert a value.
    #[error("Transformation failed: {0}")]
    TransformationFailed(String),

    // ── Configuration ────────────────────────────────────────────────

    /// A settings value is missing or invalid.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    // ── IO ───────────────────────────────────────────────────────────

    /// An I/O error occurred.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl FormsError {
    /// Returns `true` for errors raised while resolving field options.
    pub const fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::MissingConverter
                | Self::InvalidConverterType { .. }
                | Self::MissingEntityClass
                | Self::InvalidTransformerType { .. }
                | Self::MissingRouteName
                | Self::UnknownAlias(_)
                | Self::UndefinedOption(_)
                | Self::ConfigurationError(_)
        )
    }
}

/// A convenience type alias for `Result<T, FormsError>`.
pub type FormsResult<T> = Result<T, FormsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_errors_are_classified() {
        assert!(FormsError::MissingConverter.is_configuration_error());
        assert!(FormsError::MissingEntityClass.is_configuration_error());
        assert!(FormsError::MissingRouteName.is_configuration_error());
        assert!(FormsError::UnknownAlias("users".into()).is_configuration_error());
        assert!(FormsError::InvalidConverterType {
            found: "string".into()
        }
        .is_configuration_error());
        assert!(!FormsError::TransformationFailed("x".into()).is_configuration_error());
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            FormsError::MissingConverter.to_string(),
            "The option \"converter\" must be set."
        );
        assert_eq!(
            FormsError::MissingRouteName.to_string(),
            "Option \"configs[route_name]\" must be set."
        );
        assert_eq!(
            FormsError::UnknownAlias("users".into()).to_string(),
            "Search handler \"users\" is not registered."
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: FormsError = io_err.into();
        assert!(!err.is_configuration_error());
        assert!(err.to_string().contains("file missing"));
    }
}
