//! # autoform-forms
//!
//! Field types for server-side forms:
//!
//! - [`json::JsonType`] carries a structured value through a text input,
//!   coercing between the two with [`json::to_external`] and
//!   [`json::to_internal`].
//! - [`autocomplete::AutocompleteType`] binds a search-driven widget to a
//!   hidden entity-reference input. Its options are resolved against a
//!   [`autocomplete::SearchRegistry`] before the field is built.
//!
//! Both plug into the host through the [`field::FormType`] trait.

pub mod autocomplete;
pub mod field;
pub mod json;
pub mod options;
pub mod transformer;

pub use field::{create_field, create_view, Field, FieldBuilder, FieldView, FormType};
pub use options::{FieldOptions, OptionValue};
pub use transformer::{DataTransformer, EntityToIdTransformer};
