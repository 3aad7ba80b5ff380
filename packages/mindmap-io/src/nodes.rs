//! Reading of `map` and `node` elements.

use std::sync::Arc;

use roxmltree::Node;

use crate::config::{node_attr, XML_MAP, XML_NODE};
use crate::error::{DocumentError, Result, ValueError};
use crate::registry::{
    AttributeHandler, ElementBuilder, ElementObject, ParseWarning, ReadContext, ReadRegistry,
};

/// Builds the map tree.
///
/// A `node` directly under `map` becomes the root; a `node` under another
/// node becomes its last child.
pub struct NodeBuilder;

impl NodeBuilder {
    /// Register the `map`/`node` builders and the `ID`/`TEXT` handlers.
    pub fn register_by(reader: &mut ReadRegistry) {
        let builder = Arc::new(NodeBuilder);
        reader.register_element(XML_MAP, builder.clone());
        reader.register_element(XML_NODE, builder);
        reader.register_attribute(XML_NODE, node_attr::ID, NodeAttribute::Id);
        reader.register_attribute(XML_NODE, node_attr::TEXT, NodeAttribute::Text);
    }
}

impl ElementBuilder for NodeBuilder {
    fn create_element(
        &self,
        parent: ElementObject,
        tag: &str,
        attributes: Node<'_, '_>,
        context: &mut ReadContext<'_>,
    ) -> Result<Option<ElementObject>> {
        match (tag, parent) {
            (XML_MAP, ElementObject::Map) => Ok(Some(ElementObject::Map)),
            (XML_NODE, ElementObject::Map) => {
                let root = context.map_mut().add_root().map_err(|_| {
                    DocumentError::MultipleRoots {
                        id: attributes.attribute(node_attr::ID).map(str::to_string),
                    }
                })?;
                Ok(Some(ElementObject::Node(root)))
            }
            (XML_NODE, ElementObject::Node(parent)) => {
                Ok(Some(ElementObject::Node(context.map_mut().add_child(parent))))
            }
            _ => Ok(None),
        }
    }
}

/// Node attributes owned by the tree builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeAttribute {
    /// Durable identifier; collisions with existing nodes are remapped.
    Id,
    Text,
}

impl AttributeHandler for NodeAttribute {
    fn set_attribute(
        &self,
        element: ElementObject,
        value: &str,
        context: &mut ReadContext<'_>,
    ) -> std::result::Result<(), ValueError> {
        let ElementObject::Node(node) = element else {
            return Ok(());
        };
        match self {
            Self::Id => {
                if let Some(replacement) = context.map_mut().claim_id(node, value) {
                    context.remap_id(value, replacement.clone());
                    context.warn(ParseWarning::DuplicateId {
                        id: value.to_string(),
                        replacement,
                    });
                }
            }
            Self::Text => context.map_mut().node_mut(node).set_text(value),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MapModel;

    #[test]
    fn test_node_under_map_becomes_root() {
        let doc = roxmltree::Document::parse("<node/>").unwrap();
        let mut map = MapModel::new();
        let mut ctx = ReadContext::new(&mut map);

        let root = NodeBuilder
            .create_element(ElementObject::Map, XML_NODE, doc.root_element(), &mut ctx)
            .unwrap();
        assert_eq!(root, ctx.map().root().map(ElementObject::Node));
    }

    #[test]
    fn test_second_root_is_an_error() {
        let doc = roxmltree::Document::parse(r#"<node ID="second"/>"#).unwrap();
        let mut map = MapModel::new();
        map.add_root().unwrap();
        let mut ctx = ReadContext::new(&mut map);

        let err = NodeBuilder
            .create_element(ElementObject::Map, XML_NODE, doc.root_element(), &mut ctx)
            .unwrap_err();
        assert!(matches!(
            err,
            DocumentError::MultipleRoots { id: Some(ref id) } if id == "second"
        ));
    }

    #[test]
    fn test_unknown_parent_creates_nothing() {
        let doc = roxmltree::Document::parse("<map/>").unwrap();
        let mut map = MapModel::new();
        let root = map.add_root().unwrap();
        let mut ctx = ReadContext::new(&mut map);

        let created = NodeBuilder
            .create_element(ElementObject::Node(root), XML_MAP, doc.root_element(), &mut ctx)
            .unwrap();
        assert!(created.is_none());
    }

    #[test]
    fn test_id_collision_is_remapped() {
        let mut map = MapModel::new();
        let root = map.add_root().unwrap();
        map.set_id(root, "node7").unwrap();
        let child = map.add_child(root);

        let mut ctx = ReadContext::new(&mut map);
        NodeAttribute::Id
            .set_attribute(ElementObject::Node(child), "node7", &mut ctx)
            .unwrap();

        let replacement = ctx.remapped_id("node7").unwrap().to_string();
        assert_eq!(ctx.map().node_for_id(&replacement), Some(child));
        assert_eq!(ctx.map().node_for_id("node7"), Some(root));
        assert_eq!(
            ctx.warnings(),
            &[ParseWarning::DuplicateId {
                id: "node7".to_string(),
                replacement,
            }]
        );
    }

    #[test]
    fn test_text() {
        let mut map = MapModel::new();
        let root = map.add_root().unwrap();
        {
            let mut ctx = ReadContext::new(&mut map);
            NodeAttribute::Text
                .set_attribute(ElementObject::Node(root), "Hello", &mut ctx)
                .unwrap();
        }
        assert_eq!(map.node(root).text(), "Hello");
    }
}
