//! # autoform
//!
//! JSON and autocomplete field types for server-side web forms.
//!
//! This is the meta-crate that re-exports the workspace crates. Depend on
//! `autoform` to get everything, or on the individual crates for finer-grained
//! control.
//!
//! Hosts call [`setup_logging`] once at startup to route the crates' tracing
//! events; field construction runs inside a per-field span.
//!
//! ```
//! use std::sync::Arc;
//! use autoform::db::InMemoryEntityManager;
//! use autoform::forms::autocomplete::{AutocompleteType, EntitySearchHandler, SearchRegistry};
//! use autoform::forms::{create_field, create_view, FieldOptions};
//! use autoform::serde_json::json;
//!
//! let mut registry = SearchRegistry::new();
//! registry.add_search_handler("users", Arc::new(EntitySearchHandler::new("User", ["name"])));
//!
//! let manager = InMemoryEntityManager::new();
//! manager.register_class("User", "id");
//! manager.insert("User", json!({"id": 1, "name": "Ada"})).unwrap();
//!
//! let owner = AutocompleteType::new(Arc::new(registry), Arc::new(manager));
//! let mut field = create_field(
//!     &owner,
//!     "owner",
//!     FieldOptions::new().with("autocomplete_alias", "users"),
//! )
//! .unwrap();
//! field.submit(&json!("1")).unwrap();
//!
//! let view = create_view(&owner, &field).unwrap();
//! assert_eq!(view.var("value"), Some(&json!(1)));
//! ```

/// Error taxonomy, settings, logging, and JSON helpers.
pub use autoform_core as core;

/// The persistence collaborator: entity lookup by identifier.
pub use autoform_db as db;

/// Field types, option resolution, and views.
pub use autoform_forms as forms;

pub use autoform_core::logging::setup_logging;
pub use autoform_core::{FormsError, FormsResult, Settings};

pub use serde_json;
pub use tracing;
