//! # autoform-core
//!
//! Core types shared by every autoform crate. This crate has no dependency on
//! the other workspace members.
//!
//! ## Modules
//!
//! - [`error`] - The [`FormsError`] taxonomy and result alias
//! - [`json`] - Emptiness checks and recursive merging for JSON values
//! - [`settings`] - Field-type settings with defaults
//! - [`settings_loader`] - Loading settings from TOML, JSON, and the environment
//! - [`logging`] - Tracing-based logging integration

pub mod error;
pub mod json;
pub mod logging;
pub mod settings;
pub mod settings_loader;

pub use error::{FormsError, FormsResult};
pub use settings::{AutocompleteSettings, Settings};
