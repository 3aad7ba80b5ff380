//! XML writer for map documents.

use std::borrow::Cow;

use quick_xml::escape::escape;
use quick_xml::events::{BytesEnd, BytesStart, Event};
use quick_xml::Writer;

use crate::config::{node_attr, MAP_VERSION, XML_MAP, XML_NODE};
use crate::error::{DocumentError, Result};
use crate::model::{MapModel, NodeKey};
use crate::registry::WriteRegistry;

/// An element being assembled for output.
///
/// Attributes keep insertion order; setting an existing attribute
/// replaces its value in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlElement {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<XmlElement>,
}

impl XmlElement {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.attributes.push((name, value)),
        }
    }

    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    #[must_use]
    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    pub fn add_child(&mut self, child: XmlElement) {
        self.children.push(child);
    }

    #[must_use]
    pub fn children(&self) -> &[XmlElement] {
        &self.children
    }
}

/// Writes maps by walking the node tree and asking the registry's
/// extension writers for each node's extra attributes and elements.
pub struct DocumentWriter {
    registry: WriteRegistry,
}

impl DocumentWriter {
    #[must_use]
    pub fn new(registry: WriteRegistry) -> Self {
        Self { registry }
    }

    /// Serialize a whole map as a `<map>` document.
    pub fn write(&self, map: &MapModel) -> Result<String> {
        let mut document = XmlElement::new(XML_MAP);
        document.set_attribute("version", MAP_VERSION);
        if let Some(root) = map.root() {
            document.add_child(self.node_element(map, root));
        }
        serialize(&document)
    }

    /// Serialize one node and its subtree as a `<node>` fragment.
    pub fn write_node(&self, map: &MapModel, node: NodeKey) -> Result<String> {
        serialize(&self.node_element(map, node))
    }

    /// Build the element tree for a node and its subtree.
    ///
    /// Order inside a node: `ID`, `TEXT`, extension attributes, then
    /// extension elements followed by child nodes.
    #[must_use]
    pub fn node_element(&self, map: &MapModel, key: NodeKey) -> XmlElement {
        let node = map.node(key);
        let mut element = XmlElement::new(XML_NODE);
        if let Some(id) = node.id() {
            element.set_attribute(node_attr::ID, id);
        }
        element.set_attribute(node_attr::TEXT, node.text());

        for (type_id, writer) in self.registry.attribute_writers() {
            if let Some(extension) = node.extensions().get_dyn(type_id) {
                writer.write_attributes(map, key, extension, &mut element);
            }
        }
        for (type_id, writer) in self.registry.element_writers() {
            if let Some(extension) = node.extensions().get_dyn(type_id) {
                writer.write_content(map, key, extension, &mut element);
            }
        }
        for child in node.children() {
            element.add_child(self.node_element(map, *child));
        }
        element
    }
}

/// Escape an attribute value so it survives attribute-value normalization.
fn escape_attribute(value: &str) -> Cow<'_, str> {
    let escaped = escape(value);
    if escaped.contains(['\n', '\r', '\t']) {
        Cow::Owned(
            escaped
                .replace('\n', "&#10;")
                .replace('\r', "&#13;")
                .replace('\t', "&#9;"),
        )
    } else {
        escaped
    }
}

fn serialize(root: &XmlElement) -> Result<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    write_element(&mut writer, root)?;
    let mut xml =
        String::from_utf8(writer.into_inner()).map_err(|e| DocumentError::Write(e.to_string()))?;
    xml.push('\n');
    Ok(xml)
}

fn write_element(writer: &mut Writer<Vec<u8>>, element: &XmlElement) -> Result<()> {
    let mut start = BytesStart::new(element.name());
    for (name, value) in element.attributes() {
        let value = escape_attribute(value);
        start.push_attribute((name.as_bytes(), value.as_bytes()));
    }

    if element.children().is_empty() {
        emit(writer, Event::Empty(start))
    } else {
        emit(writer, Event::Start(start))?;
        for child in element.children() {
            write_element(writer, child)?;
        }
        emit(writer, Event::End(BytesEnd::new(element.name())))
    }
}

fn emit(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<()> {
    writer
        .write_event(event)
        .map_err(|e| DocumentError::Write(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn bare_writer() -> DocumentWriter {
        DocumentWriter::new(WriteRegistry::new())
    }

    #[test]
    fn test_set_attribute_replaces_in_place() {
        let mut element = XmlElement::new("node");
        element.set_attribute("A", "1");
        element.set_attribute("B", "2");
        element.set_attribute("A", "3");

        assert_eq!(
            element.attributes(),
            &[
                ("A".to_string(), "3".to_string()),
                ("B".to_string(), "2".to_string())
            ]
        );
    }

    #[test]
    fn test_write_empty_map() {
        let xml = bare_writer().write(&MapModel::new()).unwrap();
        assert_eq!(xml, "<map version=\"freeplane 1.2.0\"/>\n");
    }

    #[test]
    fn test_write_nested_nodes() {
        let mut map = MapModel::new();
        let root = map.add_root().unwrap();
        map.set_id(root, "ID_1").unwrap();
        map.node_mut(root).set_text("Root");
        let child = map.add_child(root);
        map.node_mut(child).set_text("Child");

        let xml = bare_writer().write(&map).unwrap();
        assert_eq!(
            xml,
            concat!(
                "<map version=\"freeplane 1.2.0\">\n",
                "  <node ID=\"ID_1\" TEXT=\"Root\">\n",
                "    <node TEXT=\"Child\"/>\n",
                "  </node>\n",
                "</map>\n",
            )
        );
    }

    #[test]
    fn test_attribute_escaping_round_trips() {
        let mut map = MapModel::new();
        let root = map.add_root().unwrap();
        let text = "a < b & \"c\"\nsecond\tline";
        map.node_mut(root).set_text(text);

        let xml = bare_writer().write_node(&map, root).unwrap();
        let doc = roxmltree::Document::parse(&xml).unwrap();
        assert_eq!(doc.root_element().attribute("TEXT"), Some(text));
    }
}
