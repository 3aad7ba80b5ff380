//! Reading and writing whole map documents.

use std::path::Path;
use std::sync::Arc;

use crate::config::ConnectorStyle;
use crate::error::{DocumentError, Result};
use crate::links::LinkPolicy;
use crate::model::{MapModel, NodeKey};
use crate::registry::{create_registries, DocumentReader, ParseOutcome, ParseWarning};
use crate::writer::DocumentWriter;

/// Reader and writer sharing one link policy.
pub struct MapIo {
    policy: Arc<LinkPolicy>,
    reader: DocumentReader,
    writer: DocumentWriter,
}

impl MapIo {
    #[must_use]
    pub fn new(style: ConnectorStyle) -> Self {
        let policy = Arc::new(LinkPolicy::new(style));
        let (read_registry, write_registry) = create_registries(policy.clone());
        Self {
            policy,
            reader: DocumentReader::new(read_registry),
            writer: DocumentWriter::new(write_registry),
        }
    }

    /// Build with the connector style stored in a YAML file.
    pub fn from_style_file(path: &Path) -> Result<Self> {
        Ok(Self::new(ConnectorStyle::from_yaml_file(path)?))
    }

    #[must_use]
    pub fn policy(&self) -> &LinkPolicy {
        &self.policy
    }

    pub fn read(&self, xml: &str) -> Result<ParseOutcome> {
        self.reader.read(xml)
    }

    pub fn read_file(&self, path: &Path) -> Result<ParseOutcome> {
        let xml = std::fs::read_to_string(path)?;
        self.read(&xml)
    }

    /// Paste a `<node>` fragment as the last child of `parent`.
    pub fn read_into(
        &self,
        map: &mut MapModel,
        parent: NodeKey,
        xml: &str,
    ) -> Result<Vec<ParseWarning>> {
        self.reader.read_into(map, parent, xml)
    }

    /// Paste a fragment under the node carrying the identifier `parent_id`.
    ///
    /// # Errors
    /// `DocumentError::UnknownNode` if no node carries `parent_id`, otherwise
    /// whatever [`MapIo::read_into`] reports.
    pub fn paste(
        &self,
        map: &mut MapModel,
        parent_id: &str,
        xml: &str,
    ) -> Result<Vec<ParseWarning>> {
        let parent = map.require_node_for_id(parent_id)?;
        let warnings = self.read_into(map, parent, xml)?;
        tracing::debug!(parent = parent_id, warnings = warnings.len(), "Pasted fragment");
        Ok(warnings)
    }

    pub fn write(&self, map: &MapModel) -> Result<String> {
        self.writer.write(map)
    }

    /// Write a node and its subtree as a `<node>` fragment.
    pub fn write_node(&self, map: &MapModel, node: NodeKey) -> Result<String> {
        let model = map.node(node);
        if !model.is_attached() {
            return Err(DocumentError::DetachedNode(model.id().map(str::to_string)));
        }
        self.writer.write_node(map, node)
    }
}

impl Default for MapIo {
    fn default() -> Self {
        Self::new(ConnectorStyle::default())
    }
}

/// Read a map with the default connector style.
pub fn read_map(xml: &str) -> Result<ParseOutcome> {
    MapIo::default().read(xml)
}

/// Write a map with the default connector style.
pub fn write_map(map: &MapModel) -> Result<String> {
    MapIo::default().write(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::links::NodeLinks;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_round_trip_without_connectors() {
        let xml = concat!(
            "<map version=\"freeplane 1.2.0\">\n",
            "  <node ID=\"ID_1\" TEXT=\"Root\" LINK=\"https://example.org\">\n",
            "    <node ID=\"ID_2\" TEXT=\"Child\"/>\n",
            "  </node>\n",
            "</map>\n",
        );
        let outcome = read_map(xml).unwrap();
        assert_eq!(write_map(&outcome.map).unwrap(), xml);
    }

    #[test]
    fn test_paste_under_unknown_parent() {
        let io = MapIo::default();
        let mut map = io.read(r#"<map><node ID="a"/></map>"#).unwrap().map;

        let err = io.paste(&mut map, "missing", "<node/>").unwrap_err();
        assert!(matches!(err, DocumentError::UnknownNode(ref id) if id == "missing"));
    }

    #[test]
    fn test_policy_style_reaches_new_connectors() {
        let style = ConnectorStyle::from_yaml_str("width: 5").unwrap();
        let io = MapIo::new(style);
        let mut map = io
            .read(r#"<map><node ID="a"><node ID="b"/></node></map>"#)
            .unwrap()
            .map;
        let a = map.node_for_id("a").unwrap();
        let b = map.node_for_id("b").unwrap();

        io.policy().add_connector(&mut map, a, b);
        let links = map.node(a).extensions().get::<NodeLinks>().unwrap();
        assert_eq!(links.connectors().next().unwrap().width, 5);
    }

    #[test]
    fn test_write_detached_node_fails() {
        let io = MapIo::default();
        let mut map = io
            .read(r#"<map><node ID="a"><node ID="b"/></node></map>"#)
            .unwrap()
            .map;
        let b = map.node_for_id("b").unwrap();
        map.delete_node(b);

        assert!(matches!(
            io.write_node(&map, b),
            Err(DocumentError::DetachedNode(Some(ref id))) if id == "b"
        ));
    }

    #[test]
    fn test_read_into_deleted_parent_is_rejected() {
        let io = MapIo::default();
        let mut map = io
            .read(r#"<map><node ID="a"><node ID="b"/></node></map>"#)
            .unwrap()
            .map;
        let a = map.node_for_id("a").unwrap();
        let b = map.node_for_id("b").unwrap();
        map.delete_node(b);

        let err = io.read_into(&mut map, b, r#"<node ID="z"/>"#).unwrap_err();
        assert!(matches!(err, DocumentError::DetachedNode(Some(ref id)) if id == "b"));
        assert_eq!(map.node_for_id("z"), None);

        assert_eq!(map.nodes(), vec![a]);

        // A connector into the deleted subtree is not written
        io.policy().add_connector(&mut map, a, b);
        let reread = io.read(&io.write(&map).unwrap()).unwrap();
        assert!(reread.warnings.is_empty());
        assert!(!io.write(&map).unwrap().contains("<arrowlink"));
    }
}
