use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use super::search::SearchHandler;

/// Renders an entity into the value the client-side widget displays.
pub trait Converter: Send + Sync + fmt::Debug {
    /// Converts one entity.
    fn convert_item(&self, item: &Value) -> Value;
}

/// Exposes a [`SearchHandler`] through the [`Converter`] capability.
#[derive(Debug, Clone)]
pub struct HandlerConverter {
    handler: Arc<dyn SearchHandler>,
}

impl HandlerConverter {
    /// Wraps a search handler.
    pub fn new(handler: Arc<dyn SearchHandler>) -> Self {
        Self { handler }
    }

    /// The wrapped search handler.
    pub fn handler(&self) -> &Arc<dyn SearchHandler> {
        &self.handler
    }
}

impl Converter for HandlerConverter {
    fn convert_item(&self, item: &Value) -> Value {
        self.handler.convert_item(item)
    }
}
