//! The [`EntityManager`] contract and an in-memory implementation.

use std::collections::HashMap;
use std::sync::RwLock;

use autoform_core::{FormsError, FormsResult};
use serde_json::Value;

use crate::metadata::ClassMetadata;

/// Resolves entities by class and identifier.
///
/// Implementations are shared across field instances and threads, so they
/// must be `Send + Sync`. Lookups are read-only.
pub trait EntityManager: Send + Sync {
    /// Returns the mapping metadata for an entity class.
    ///
    /// Fails with [`FormsError::ConfigurationError`] for unknown classes.
    fn metadata(&self, entity_class: &str) -> FormsResult<ClassMetadata>;

    /// Finds the entity of `entity_class` whose identifier equals `id`.
    fn find(&self, entity_class: &str, id: &Value) -> FormsResult<Option<Value>>;
}

struct EntityTable {
    metadata: ClassMetadata,
    rows: Vec<Value>,
}

/// An [`EntityManager`] that keeps entities in memory.
///
/// Useful for tests and for hosts whose lookup data is small and static.
///
/// # Examples
///
/// ```
/// use autoform_db::{EntityManager, InMemoryEntityManager};
/// use serde_json::json;
///
/// let manager = InMemoryEntityManager::new();
/// manager.register_class("User", "id");
/// manager.insert("User", json!({"id": 1, "name": "Ada"})).unwrap();
///
/// let found = manager.find("User", &json!(1)).unwrap();
/// assert_eq!(found, Some(json!({"id": 1, "name": "Ada"})));
/// ```
#[derive(Default)]
pub struct InMemoryEntityManager {
    tables: RwLock<HashMap<String, EntityTable>>,
}

impl InMemoryEntityManager {
    /// Creates an empty manager with no entity classes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an entity class. Re-registering a class drops its rows.
    pub fn register_class(&self, entity_class: impl Into<String>, identifier: impl Into<String>) {
        let metadata = ClassMetadata::new(entity_class, identifier);
        let mut tables = self.tables.write().expect("entity table lock poisoned");
        tables.insert(
            metadata.entity_class.clone(),
            EntityTable {
                metadata,
                rows: Vec::new(),
            },
        );
    }

    /// Stores an entity. The entity must be an object carrying its identifier.
    pub fn insert(&self, entity_class: &str, entity: Value) -> FormsResult<()> {
        let mut tables = self.tables.write().expect("entity table lock poisoned");
        let table = tables
            .get_mut(entity_class)
            .ok_or_else(|| unknown_class(entity_class))?;

        if entity.get(&table.metadata.identifier).is_none() {
            return Err(FormsError::ConfigurationError(format!(
                "Entity of class \"{entity_class}\" has no \"{}\" identifier",
                table.metadata.identifier
            )));
        }
        table.rows.push(entity);
        Ok(())
    }
}

impl EntityManager for InMemoryEntityManager {
    fn metadata(&self, entity_class: &str) -> FormsResult<ClassMetadata> {
        let tables = self.tables.read().expect("entity table lock poisoned");
        tables
            .get(entity_class)
            .map(|table| table.metadata.clone())
            .ok_or_else(|| unknown_class(entity_class))
    }

    fn find(&self, entity_class: &str, id: &Value) -> FormsResult<Option<Value>> {
        let tables = self.tables.read().expect("entity table lock poisoned");
        let table = tables
            .get(entity_class)
            .ok_or_else(|| unknown_class(entity_class))?;

        let found = table
            .rows
            .iter()
            .find(|row| row.get(&table.metadata.identifier).is_some_and(|v| ids_match(v, id)))
            .cloned();
        tracing::trace!(entity_class, %id, found = found.is_some(), "entity lookup");
        Ok(found)
    }
}

fn unknown_class(entity_class: &str) -> FormsError {
    FormsError::ConfigurationError(format!("Class \"{entity_class}\" is not a registered entity"))
}

/// Submitted identifiers arrive as strings; stored ones may be numbers.
fn ids_match(stored: &Value, wanted: &Value) -> bool {
    match (stored, wanted) {
        (Value::Number(n), Value::String(s)) | (Value::String(s), Value::Number(n)) => {
            n.to_string() == *s
        }
        _ => stored == wanted,
    }
}
