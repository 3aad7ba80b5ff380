//! Attribute handlers for connector elements and the node `LINK` attribute.

use std::sync::Arc;

use crate::config::connector_attr;
use crate::error::ValueError;
use crate::registry::{AttributeHandler, ElementObject, ReadContext};
use crate::types::{parse_dash, parse_int, Shape};

use super::policy::LinkPolicy;

/// One recognized attribute of a connector element.
///
/// `COLOR` and `TRANSPARENCY` are not here: they depend on each other and
/// are resolved when the element closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectorAttribute {
    /// Legacy alias; any value forces the edge-like shape.
    EdgeLike,
    Shape,
    Dash,
    Destination,
    SourceLabel,
    MiddleLabel,
    TargetLabel,
    StartInclination,
    EndInclination,
    StartArrow,
    EndArrow,
    Width,
}

impl ConnectorAttribute {
    pub const ALL: [ConnectorAttribute; 12] = [
        Self::EdgeLike,
        Self::Shape,
        Self::Dash,
        Self::Destination,
        Self::SourceLabel,
        Self::MiddleLabel,
        Self::TargetLabel,
        Self::StartInclination,
        Self::EndInclination,
        Self::StartArrow,
        Self::EndArrow,
        Self::Width,
    ];

    /// Attribute name in documents.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::EdgeLike => connector_attr::EDGE_LIKE,
            Self::Shape => connector_attr::SHAPE,
            Self::Dash => connector_attr::DASH,
            Self::Destination => connector_attr::DESTINATION,
            Self::SourceLabel => connector_attr::SOURCE_LABEL,
            Self::MiddleLabel => connector_attr::MIDDLE_LABEL,
            Self::TargetLabel => connector_attr::TARGET_LABEL,
            Self::StartInclination => connector_attr::STARTINCLINATION,
            Self::EndInclination => connector_attr::ENDINCLINATION,
            Self::StartArrow => connector_attr::STARTARROW,
            Self::EndArrow => connector_attr::ENDARROW,
            Self::Width => connector_attr::WIDTH,
        }
    }
}

impl AttributeHandler for ConnectorAttribute {
    fn set_attribute(
        &self,
        element: ElementObject,
        value: &str,
        context: &mut ReadContext<'_>,
    ) -> Result<(), ValueError> {
        let ElementObject::Connector(key) = element else {
            return Ok(());
        };
        let Some(connector) = context.connector_mut(key) else {
            return Ok(());
        };

        match self {
            Self::EdgeLike => connector.shape = Shape::EdgeLike,
            Self::Shape => connector.shape = value.parse()?,
            Self::Dash => connector.dash = Some(parse_dash(value)?),
            Self::Destination => {
                connector.target_id = Some(value.to_string());
                context.mark_pending(key);
            }
            Self::SourceLabel => connector.source_label = Some(value.to_string()),
            Self::MiddleLabel => connector.middle_label = Some(value.to_string()),
            Self::TargetLabel => connector.target_label = Some(value.to_string()),
            Self::StartInclination => connector.start_inclination = Some(value.parse()?),
            Self::EndInclination => connector.end_inclination = Some(value.parse()?),
            Self::StartArrow => connector.start_arrow = value.parse()?,
            Self::EndArrow => connector.end_arrow = value.parse()?,
            Self::Width => connector.width = parse_int(value)?,
        }
        Ok(())
    }
}

/// Handler for the node `LINK` attribute, delegating to the link policy.
pub struct HyperlinkAttribute {
    policy: Arc<LinkPolicy>,
}

impl HyperlinkAttribute {
    #[must_use]
    pub fn new(policy: Arc<LinkPolicy>) -> Self {
        Self { policy }
    }
}

impl AttributeHandler for HyperlinkAttribute {
    fn set_attribute(
        &self,
        element: ElementObject,
        value: &str,
        context: &mut ReadContext<'_>,
    ) -> Result<(), ValueError> {
        if let ElementObject::Node(node) = element {
            self.policy.load_link(context.map_mut(), node, value);
        }
        Ok(())
    }
}
