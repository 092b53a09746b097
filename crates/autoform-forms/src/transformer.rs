//! Data transformers move a field's value between its model form and its
//! view (submitted) form.
//!
//! [`EntityToIdTransformer`] is the default transformer of entity-backed
//! fields: the view carries the entity identifier, the model carries the
//! entity itself.

use std::fmt;
use std::sync::Arc;

use autoform_core::json::{is_empty, type_name};
use autoform_core::{FormsError, FormsResult};
use autoform_db::EntityManager;
use serde_json::Value;

/// Converts a value between its model and view representations.
///
/// All transformers must be `Send + Sync` so built fields can be shared
/// across request-handling threads.
pub trait DataTransformer: Send + Sync + fmt::Debug {
    /// Converts a model value into its view value.
    fn transform(&self, value: &Value) -> FormsResult<Value>;

    /// Converts a submitted view value back into its model value.
    fn reverse_transform(&self, value: &Value) -> FormsResult<Value>;
}

/// Transforms an entity into its identifier and an identifier back into the
/// entity, looking entities up through an [`EntityManager`].
///
/// Lists are transformed element by element, so the same transformer serves
/// fields holding several entities.
pub struct EntityToIdTransformer {
    manager: Arc<dyn EntityManager>,
    entity_class: String,
    property: Option<String>,
}

impl EntityToIdTransformer {
    /// Creates a transformer for `entity_class`.
    ///
    /// The identifier property is read from the class metadata the first time
    /// it is needed.
    pub fn new(manager: Arc<dyn EntityManager>, entity_class: impl Into<String>) -> Self {
        Self {
            manager,
            entity_class: entity_class.into(),
            property: None,
        }
    }

    /// Uses `property` as the identifier instead of the mapped identifier.
    #[must_use]
    pub fn with_property(mut self, property: impl Into<String>) -> Self {
        self.property = Some(property.into());
        self
    }

    /// The entity class this transformer is bound to.
    pub fn entity_class(&self) -> &str {
        &self.entity_class
    }

    fn property(&self) -> FormsResult<String> {
        match &self.property {
            Some(property) => Ok(property.clone()),
            None => Ok(self.manager.metadata(&self.entity_class)?.identifier),
        }
    }
}

impl fmt::Debug for EntityToIdTransformer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityToIdTransformer")
            .field("entity_class", &self.entity_class)
            .field("property", &self.property)
            .finish_non_exhaustive()
    }
}

impl DataTransformer for EntityToIdTransformer {
    fn transform(&self, value: &Value) -> FormsResult<Value> {
        match value {
            Value::Null => Ok(Value::Null),
            Value::Array(entities) => entities
                .iter()
                .map(|entity| self.transform(entity))
                .collect::<FormsResult<Vec<_>>>()
                .map(Value::Array),
            Value::Object(entity) => {
                let property = self.property()?;
                Ok(entity.get(&property).cloned().unwrap_or(Value::Null))
            }
            other => Err(FormsError::TransformationFailed(format!(
                "Expected an object, got {}",
                type_name(other)
            ))),
        }
    }

    fn reverse_transform(&self, value: &Value) -> FormsResult<Value> {
        if let Value::Array(ids) = value {
            return ids
                .iter()
                .filter(|id| !is_empty(id))
                .map(|id| self.reverse_transform(id))
                .collect::<FormsResult<Vec<_>>>()
                .map(Value::Array);
        }
        if is_empty(value) {
            return Ok(Value::Null);
        }

        match self.manager.find(&self.entity_class, value)? {
            Some(entity) => Ok(entity),
            None => {
                let id = value.as_str().map_or_else(|| value.to_string(), str::to_string);
                Err(FormsError::TransformationFailed(format!(
                    "The value \"{id}\" does not exist or not unique."
                )))
            }
        }
    }
}
