//! Registries mapping tags, attributes and extension types to handlers.

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::Arc;

use super::handler::{
    AttributeHandler, ElementBuilder, ExtensionAttributeWriter, ExtensionElementWriter,
    ReadCompletionListener,
};
use crate::model::Extension;

/// Registry used while reading documents.
///
/// Populated once, then only read from, so one registry can serve any
/// number of reads.
#[derive(Default)]
pub struct ReadRegistry {
    builders: HashMap<String, Arc<dyn ElementBuilder>>,
    attributes: HashMap<String, HashMap<String, Box<dyn AttributeHandler>>>,
    listeners: Vec<Arc<dyn ReadCompletionListener>>,
}

impl ReadRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the builder for a tag, replacing any previous one.
    pub fn register_element(&mut self, tag: impl Into<String>, builder: Arc<dyn ElementBuilder>) {
        self.builders.insert(tag.into(), builder);
    }

    /// Register the handler for an attribute of a tag.
    ///
    /// A later registration for the same pair overwrites the earlier one.
    pub fn register_attribute(
        &mut self,
        tag: impl Into<String>,
        attribute: impl Into<String>,
        handler: impl AttributeHandler + 'static,
    ) {
        self.attributes
            .entry(tag.into())
            .or_default()
            .insert(attribute.into(), Box::new(handler));
    }

    /// Register a listener that runs once after each complete read.
    pub fn register_completion(&mut self, listener: Arc<dyn ReadCompletionListener>) {
        self.listeners.push(listener);
    }

    /// Get the builder for a tag.
    #[must_use]
    pub fn element_builder(&self, tag: &str) -> Option<&dyn ElementBuilder> {
        self.builders.get(tag).map(|b| b.as_ref())
    }

    /// Get the handler for an attribute of a tag.
    #[must_use]
    pub fn attribute_handler(&self, tag: &str, attribute: &str) -> Option<&dyn AttributeHandler> {
        self.attributes
            .get(tag)
            .and_then(|handlers| handlers.get(attribute))
            .map(|h| h.as_ref())
    }

    /// Completion listeners in registration order.
    pub fn completion_listeners(&self) -> impl Iterator<Item = &dyn ReadCompletionListener> {
        self.listeners.iter().map(|l| l.as_ref())
    }

    /// Check if a builder is registered for a tag.
    #[must_use]
    pub fn has_element(&self, tag: &str) -> bool {
        self.builders.contains_key(tag)
    }

    /// Check if a handler is registered for an attribute of a tag.
    #[must_use]
    pub fn has_attribute(&self, tag: &str, attribute: &str) -> bool {
        self.attribute_handler(tag, attribute).is_some()
    }
}

/// Registry used while writing documents.
///
/// Writers are keyed by extension type and run in registration order.
#[derive(Default)]
pub struct WriteRegistry {
    attribute_writers: Vec<(TypeId, Arc<dyn ExtensionAttributeWriter>)>,
    element_writers: Vec<(TypeId, Arc<dyn ExtensionElementWriter>)>,
}

impl WriteRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the attribute writer for extensions of type `E`.
    pub fn register_attribute_writer<E: Extension>(
        &mut self,
        writer: Arc<dyn ExtensionAttributeWriter>,
    ) {
        upsert(&mut self.attribute_writers, TypeId::of::<E>(), writer);
    }

    /// Register the element writer for extensions of type `E`.
    pub fn register_element_writer<E: Extension>(&mut self, writer: Arc<dyn ExtensionElementWriter>) {
        upsert(&mut self.element_writers, TypeId::of::<E>(), writer);
    }

    /// Attribute writers with their extension type, in registration order.
    pub fn attribute_writers(
        &self,
    ) -> impl Iterator<Item = (TypeId, &dyn ExtensionAttributeWriter)> {
        self.attribute_writers.iter().map(|(t, w)| (*t, w.as_ref()))
    }

    /// Element writers with their extension type, in registration order.
    pub fn element_writers(&self) -> impl Iterator<Item = (TypeId, &dyn ExtensionElementWriter)> {
        self.element_writers.iter().map(|(t, w)| (*t, w.as_ref()))
    }
}

/// Replace the entry for `key` in place, or append it.
fn upsert<W: ?Sized>(entries: &mut Vec<(TypeId, Arc<W>)>, key: TypeId, value: Arc<W>) {
    match entries.iter_mut().find(|(t, _)| *t == key) {
        Some(entry) => entry.1 = value,
        None => entries.push((key, value)),
    }
}
