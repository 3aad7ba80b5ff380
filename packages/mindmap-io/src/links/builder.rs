//! Reading and writing of connectors and hyperlinks.

use std::sync::Arc;

use roxmltree::Node;

use crate::config::{connector_attr, node_attr, XML_ARROWLINK, XML_NODE};
use crate::error::{DocumentError, Result, ValueError};
use crate::model::{Extension, MapModel, NodeKey};
use crate::registry::{
    ElementBuilder, ElementObject, ExtensionAttributeWriter, ExtensionElementWriter,
    ParseWarning, ReadCompletionListener, ReadContext, ReadRegistry, WriteRegistry,
};
use crate::types::{format_dash, parse_alpha};
use crate::writer::XmlElement;

use super::attributes::{ConnectorAttribute, HyperlinkAttribute};
use super::model::{ConnectorModel, NodeLinks};
use super::policy::LinkPolicy;

/// Reads `arrowlink` elements and writes the [`NodeLinks`] extension.
pub struct LinkBuilder {
    policy: Arc<LinkPolicy>,
}

impl LinkBuilder {
    #[must_use]
    pub fn new(policy: Arc<LinkPolicy>) -> Self {
        Self { policy }
    }

    #[must_use]
    pub fn policy(&self) -> &LinkPolicy {
        &self.policy
    }

    /// Register this builder's element, attribute, completion and writer handlers.
    pub fn register_by(self: &Arc<Self>, reader: &mut ReadRegistry, writer: &mut WriteRegistry) {
        reader.register_element(XML_ARROWLINK, self.clone());
        reader.register_attribute(
            XML_NODE,
            node_attr::LINK,
            HyperlinkAttribute::new(self.policy.clone()),
        );
        for attribute in ConnectorAttribute::ALL {
            reader.register_attribute(XML_ARROWLINK, attribute.name(), attribute);
        }
        reader.register_completion(self.clone());
        writer.register_attribute_writer::<NodeLinks>(self.clone());
        writer.register_element_writer::<NodeLinks>(self.clone());
    }

    /// Build the `arrowlink` element for a connector.
    ///
    /// Returns `None` when the target node no longer exists.
    #[must_use]
    pub fn save(&self, map: &MapModel, connector: &ConnectorModel) -> Option<XmlElement> {
        let target = connector
            .target_id
            .as_deref()
            .and_then(|id| map.node_for_id(id));
        let Some(target) = target else {
            tracing::debug!(
                target_id = connector.target_id.as_deref().unwrap_or_default(),
                "Connector target is gone, not writing it"
            );
            return None;
        };

        let mut element = XmlElement::new(XML_ARROWLINK);
        element.set_attribute(connector_attr::SHAPE, connector.shape.as_str());
        element.set_attribute(connector_attr::COLOR, connector.color.to_string());
        element.set_attribute(connector_attr::WIDTH, connector.width.to_string());
        element.set_attribute(connector_attr::TRANSPARENCY, connector.alpha.to_string());
        if let Some(dash) = &connector.dash {
            element.set_attribute(connector_attr::DASH, format_dash(dash));
        }
        if let Some(destination) = map.node(target).id() {
            element.set_attribute(connector_attr::DESTINATION, destination);
        }
        if let Some(label) = &connector.source_label {
            element.set_attribute(connector_attr::SOURCE_LABEL, label);
        }
        if let Some(label) = &connector.target_label {
            element.set_attribute(connector_attr::TARGET_LABEL, label);
        }
        if let Some(label) = &connector.middle_label {
            element.set_attribute(connector_attr::MIDDLE_LABEL, label);
        }
        if let Some(point) = connector.start_inclination {
            element.set_attribute(connector_attr::STARTINCLINATION, point.to_string());
        }
        if let Some(point) = connector.end_inclination {
            element.set_attribute(connector_attr::ENDINCLINATION, point.to_string());
        }
        element.set_attribute(connector_attr::STARTARROW, connector.start_arrow.as_str());
        element.set_attribute(connector_attr::ENDARROW, connector.end_arrow.as_str());
        Some(element)
    }

    /// Derive final color and opacity from the raw `COLOR` / `TRANSPARENCY` attributes.
    ///
    /// Color present: use it, and opacity becomes 255 unless given.
    /// Color absent: standard color, and standard opacity unless given.
    fn apply_color_and_alpha(
        &self,
        connector: &mut ConnectorModel,
        color: Option<&str>,
        transparency: Option<&str>,
    ) -> std::result::Result<(), (&'static str, ValueError)> {
        if let Some(color) = color {
            connector.color = color.parse().map_err(|e| (connector_attr::COLOR, e))?;
            if transparency.is_none() {
                connector.alpha = 255;
            }
        } else {
            connector.color = self.policy.standard_color();
        }

        if let Some(transparency) = transparency {
            connector.alpha =
                parse_alpha(transparency).map_err(|e| (connector_attr::TRANSPARENCY, e))?;
        } else if color.is_none() {
            connector.alpha = self.policy.standard_alpha();
        }
        Ok(())
    }
}

impl ElementBuilder for LinkBuilder {
    fn create_element(
        &self,
        parent: ElementObject,
        tag: &str,
        _attributes: Node<'_, '_>,
        context: &mut ReadContext<'_>,
    ) -> Result<Option<ElementObject>> {
        match (tag, parent) {
            (XML_ARROWLINK, ElementObject::Node(source)) => {
                let connector = self.policy.create_connector(source, None);
                Ok(Some(ElementObject::Connector(context.add_connector(connector))))
            }
            _ => Ok(None),
        }
    }

    fn end_element(
        &self,
        _parent: ElementObject,
        tag: &str,
        element: ElementObject,
        attributes: Node<'_, '_>,
        context: &mut ReadContext<'_>,
    ) -> Result<()> {
        let Some(connector) = context.connector_for(element) else {
            return Ok(());
        };
        let color = attributes.attribute(connector_attr::COLOR);
        let transparency = attributes.attribute(connector_attr::TRANSPARENCY);

        self.apply_color_and_alpha(connector, color, transparency)
            .map_err(|(attribute, source)| DocumentError::MalformedAttribute {
                tag: tag.to_string(),
                attribute: attribute.to_string(),
                value: attributes.attribute(attribute).unwrap_or_default().to_string(),
                source,
            })
    }
}

impl ReadCompletionListener for LinkBuilder {
    /// Attach every pending connector to its source node.
    ///
    /// Target identifiers are passed through the remap table first; a
    /// target that still matches no node is reported and the connector dropped.
    fn reading_completed(&self, _root: ElementObject, context: &mut ReadContext<'_>) {
        for key in context.take_pending() {
            let Some(mut connector) = context.take_connector(key) else {
                continue;
            };
            let source_id = context.map().node(connector.source).id().map(str::to_string);
            let Some(raw_id) = connector.target_id.take() else {
                context.warn(ParseWarning::MissingDestination { source_id });
                continue;
            };

            let target_id = context
                .remapped_id(&raw_id)
                .map_or_else(|| raw_id.clone(), str::to_string);
            if context.map().node_for_id(&target_id).is_none() {
                context.warn(ParseWarning::UnresolvedTarget {
                    source_id,
                    target_id: raw_id,
                });
                continue;
            }

            connector.target_id = Some(target_id);
            connector.attach(context.map_mut());
        }

        // Connectors that never saw a DESTINATION were never pending.
        for orphan in context.drain_connectors() {
            let source_id = context.map().node(orphan.source).id().map(str::to_string);
            context.warn(ParseWarning::MissingDestination { source_id });
        }
    }
}

impl ExtensionAttributeWriter for LinkBuilder {
    fn write_attributes(
        &self,
        map: &MapModel,
        _node: NodeKey,
        extension: &dyn Extension,
        element: &mut XmlElement,
    ) {
        let Some(links) = extension.as_any().downcast_ref::<NodeLinks>() else {
            return;
        };
        let Some(hyperlink) = links.hyperlink() else {
            return;
        };
        if let Some(id) = hyperlink.local_target() {
            if map.node_for_id(id).is_none() {
                tracing::debug!(link = %hyperlink, "Dropping dangling same-document link");
                return;
            }
        }
        element.set_attribute(node_attr::LINK, hyperlink.as_str());
    }
}

impl ExtensionElementWriter for LinkBuilder {
    fn write_content(
        &self,
        map: &MapModel,
        _node: NodeKey,
        extension: &dyn Extension,
        element: &mut XmlElement,
    ) {
        let Some(links) = extension.as_any().downcast_ref::<NodeLinks>() else {
            return;
        };
        for connector in links.connectors() {
            if let Some(child) = self.save(map, connector) {
                element.add_child(child);
            }
        }
    }
}
