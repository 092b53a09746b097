//! Entity class metadata.

/// Mapping metadata for one entity class.
///
/// Only single-field identifiers are supported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassMetadata {
    /// The entity class name (e.g. "User").
    pub entity_class: String,
    /// The name of the identifier property (e.g. "id").
    pub identifier: String,
}

impl ClassMetadata {
    /// Creates metadata for an entity class with the given identifier property.
    pub fn new(entity_class: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self {
            entity_class: entity_class.into(),
            identifier: identifier.into(),
        }
    }
}
