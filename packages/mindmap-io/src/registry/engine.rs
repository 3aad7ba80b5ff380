//! Reader that walks a document and dispatches to registered handlers.

use roxmltree::{Document, Node};

use super::core::ReadRegistry;
use super::types::{ElementObject, ParseWarning, ReadContext};
use crate::config::{XML_MAP, XML_NODE};
use crate::error::{DocumentError, Result};
use crate::model::{MapModel, NodeKey};

/// A successfully read map plus everything worth telling the caller about it.
#[derive(Debug)]
pub struct ParseOutcome {
    pub map: MapModel,
    pub warnings: Vec<ParseWarning>,
}

/// Walks XML element trees and dispatches them through a [`ReadRegistry`].
///
/// For each element: the tag's builder creates the element object, the
/// attribute handlers run in document order, children are read with the
/// new object as parent, and finally the builder's `end_element` runs.
/// Once the whole tree is read, completion listeners run exactly once.
pub struct DocumentReader {
    registry: ReadRegistry,
}

impl DocumentReader {
    /// Create a new reader with the given registry.
    #[must_use]
    pub fn new(registry: ReadRegistry) -> Self {
        Self { registry }
    }

    /// Get a reference to the underlying registry.
    #[must_use]
    pub fn registry(&self) -> &ReadRegistry {
        &self.registry
    }

    /// Read a complete map document.
    ///
    /// # Errors
    /// Fails on malformed XML, a document element other than `<map>`, or
    /// the first attribute value that cannot be applied.
    pub fn read(&self, xml: &str) -> Result<ParseOutcome> {
        let doc = Document::parse(xml)?;
        let root = doc.root_element();
        expect_tag(root, XML_MAP)?;

        let mut map = MapModel::new();
        let warnings = {
            let mut context = ReadContext::new(&mut map);
            self.read_tree(root, ElementObject::Map, &mut context)?;
            context.into_warnings()
        };
        tracing::debug!(nodes = map.len(), warnings = warnings.len(), "Read map");
        Ok(ParseOutcome { map, warnings })
    }

    /// Read a `<node>` fragment into an existing map as the last child of `parent`.
    ///
    /// Node identifiers that collide with nodes already in `map` are
    /// replaced, and connectors in the fragment follow the replacement.
    ///
    /// # Errors
    /// `DetachedNode` if `parent` was removed from `map`, otherwise the same
    /// as [`DocumentReader::read`]. On a failed attribute the nodes read
    /// before it stay in the map, but none of the fragment's connectors are
    /// attached since the completion pass never runs.
    pub fn read_into(
        &self,
        map: &mut MapModel,
        parent: NodeKey,
        xml: &str,
    ) -> Result<Vec<ParseWarning>> {
        let parent_node = map.node(parent);
        if !parent_node.is_attached() {
            return Err(DocumentError::DetachedNode(
                parent_node.id().map(str::to_string),
            ));
        }
        let doc = Document::parse(xml)?;
        let root = doc.root_element();
        expect_tag(root, XML_NODE)?;

        let mut context = ReadContext::new(map);
        self.read_tree(root, ElementObject::Node(parent), &mut context)?;
        Ok(context.into_warnings())
    }

    /// Read `node` and its subtree under `parent`, then run completion listeners.
    pub fn read_tree(
        &self,
        node: Node<'_, '_>,
        parent: ElementObject,
        context: &mut ReadContext<'_>,
    ) -> Result<()> {
        self.read_element(node, parent, context)?;
        for listener in self.registry.completion_listeners() {
            listener.reading_completed(parent, context);
        }
        Ok(())
    }

    fn read_element(
        &self,
        node: Node<'_, '_>,
        parent: ElementObject,
        context: &mut ReadContext<'_>,
    ) -> Result<()> {
        let tag = node.tag_name().name();

        let Some(builder) = self.registry.element_builder(tag) else {
            tracing::debug!(tag, "No builder for element, skipping");
            return Ok(());
        };
        let Some(element) = builder.create_element(parent, tag, node, context)? else {
            tracing::debug!(tag, ?parent, "Element not created, skipping");
            return Ok(());
        };

        for attribute in node.attributes() {
            let name = attribute.name();
            let Some(handler) = self.registry.attribute_handler(tag, name) else {
                tracing::trace!(tag, attribute = name, "No handler for attribute");
                continue;
            };
            handler
                .set_attribute(element, attribute.value(), context)
                .map_err(|source| DocumentError::MalformedAttribute {
                    tag: tag.to_string(),
                    attribute: name.to_string(),
                    value: attribute.value().to_string(),
                    source,
                })?;
        }

        for child in node.children().filter(Node::is_element) {
            self.read_element(child, element, context)?;
        }

        builder.end_element(parent, tag, element, node, context)
    }
}

fn expect_tag(node: Node<'_, '_>, expected: &str) -> Result<()> {
    let tag = node.tag_name().name();
    if tag == expected {
        Ok(())
    } else {
        Err(DocumentError::UnexpectedRoot {
            tag: tag.to_string(),
            expected: expected.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValueError;
    use crate::nodes::NodeBuilder;
    use crate::registry::{AttributeHandler, ReadCompletionListener};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct Counter(Arc<AtomicUsize>);

    impl ReadCompletionListener for Counter {
        fn reading_completed(&self, _root: ElementObject, _context: &mut ReadContext<'_>) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    struct Reject;

    impl AttributeHandler for Reject {
        fn set_attribute(
            &self,
            _element: ElementObject,
            value: &str,
            _context: &mut ReadContext<'_>,
        ) -> std::result::Result<(), ValueError> {
            Err(ValueError::InvalidInteger(value.to_string()))
        }
    }

    fn node_reader() -> ReadRegistry {
        let mut registry = ReadRegistry::new();
        NodeBuilder::register_by(&mut registry);
        registry
    }

    #[test]
    fn test_read_builds_tree() {
        let reader = DocumentReader::new(node_reader());
        let xml = r#"<map><node ID="r" TEXT="root"><node TEXT="a"/><node TEXT="b"><node TEXT="b1"/></node></node></map>"#;

        let outcome = reader.read(xml).unwrap();
        let map = &outcome.map;
        let texts: Vec<_> = map.nodes().into_iter().map(|k| map.node(k).text()).collect();
        assert_eq!(texts, vec!["root", "a", "b", "b1"]);
        assert_eq!(map.node_for_id("r"), map.root());
        assert!(outcome.warnings.is_empty());
    }

    #[test]
    fn test_unknown_elements_and_attributes_are_ignored() {
        let reader = DocumentReader::new(node_reader());
        let xml = r#"<map><node TEXT="root" FUTURE="1"><hook NAME="x"><node TEXT="hidden"/></hook><node TEXT="kept"/></node></map>"#;

        let outcome = reader.read(xml).unwrap();
        assert_eq!(outcome.map.len(), 2);
    }

    #[test]
    fn test_completion_runs_once_per_read() {
        let count = Arc::new(AtomicUsize::new(0));
        let mut registry = node_reader();
        registry.register_completion(Arc::new(Counter(count.clone())));
        let reader = DocumentReader::new(registry);

        reader.read("<map><node><node/><node/></node></map>").unwrap();
        assert_eq!(count.load(Ordering::SeqCst), 1);
        reader.read("<map/>").unwrap();
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_attribute_error_aborts_with_context() {
        let mut registry = node_reader();
        registry.register_attribute("node", "SIZE", Reject);
        let reader = DocumentReader::new(registry);

        let err = reader
            .read(r#"<map><node><node SIZE="big"/></node></map>"#)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Malformed attribute SIZE=\"big\" on <node>: 'big' is not a valid integer"
        );
    }

    #[test]
    fn test_wrong_document_element() {
        let reader = DocumentReader::new(node_reader());
        assert!(matches!(
            reader.read("<node/>"),
            Err(DocumentError::UnexpectedRoot { .. })
        ));
    }

    #[test]
    fn test_malformed_xml() {
        let reader = DocumentReader::new(node_reader());
        assert!(matches!(
            reader.read("<map><node></map>"),
            Err(DocumentError::XmlParse(_))
        ));
    }

    #[test]
    fn test_read_into_appends_under_parent() {
        let reader = DocumentReader::new(node_reader());
        let mut outcome = reader.read(r#"<map><node ID="r"/></map>"#).unwrap();
        let root = outcome.map.root().unwrap();

        let warnings = reader
            .read_into(&mut outcome.map, root, r#"<node ID="r" TEXT="pasted"/>"#)
            .unwrap();

        let pasted = outcome.map.node(root).children()[0];
        assert_eq!(outcome.map.node(pasted).text(), "pasted");
        assert_ne!(outcome.map.node(pasted).id(), Some("r"));
        assert_eq!(warnings.len(), 1);
    }
}
