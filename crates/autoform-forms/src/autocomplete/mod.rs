//! The hidden-input autocomplete field.
//!
//! A visible, search-driven widget selects an entity; the hidden input
//! carries the entity identifier. The field is configured either directly
//! (entity class, converter, route) or through an alias naming a
//! [`SearchHandler`] in a [`SearchRegistry`], from which the missing pieces
//! are derived by [`OptionsResolver`].

mod converter;
mod field_type;
mod options;
mod resolver;
mod search;

pub use converter::{Converter, HandlerConverter};
pub use field_type::{selected_data, AutocompleteType, SELECTED_DATA_ATTR};
pub use options::AutocompleteOptions;
pub use resolver::OptionsResolver;
pub use search::{EntitySearchHandler, SearchHandler, SearchRegistry};
