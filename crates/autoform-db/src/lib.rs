//! # autoform-db
//!
//! The persistence collaborator consumed by entity-backed fields. Field types
//! never own entity storage; they resolve identifiers to entities through an
//! [`EntityManager`] supplied by the host application.
//!
//! Entities are represented as JSON objects.

pub mod manager;
pub mod metadata;

pub use manager::{EntityManager, InMemoryEntityManager};
pub use metadata::ClassMetadata;
