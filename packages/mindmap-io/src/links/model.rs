//! Link types and the per-node links extension.

use std::any::Any;
use std::fmt;

use crate::config::ConnectorStyle;
use crate::model::{Extension, MapModel, NodeKey};
use crate::types::{ArrowType, Color, Point, Shape};

/// A styled arrow from one node to another.
///
/// The target is held by identifier only and looked up in the map when
/// needed, so deleting the target node leaves the connector dangling
/// rather than keeping the node alive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectorModel {
    /// Node the connector starts at.
    pub source: NodeKey,
    /// Identifier of the node the connector points at.
    pub target_id: Option<String>,
    pub shape: Shape,
    pub color: Color,
    /// Opacity, 0 (transparent) to 255 (opaque).
    pub alpha: u8,
    pub width: i32,
    /// Dash lengths; `None` draws a solid line.
    pub dash: Option<Vec<u32>>,
    pub source_label: Option<String>,
    pub middle_label: Option<String>,
    pub target_label: Option<String>,
    /// Bend-point offset at the source end.
    pub start_inclination: Option<Point>,
    /// Bend-point offset at the target end.
    pub end_inclination: Option<Point>,
    pub start_arrow: ArrowType,
    pub end_arrow: ArrowType,
}

impl ConnectorModel {
    /// Create a connector styled with the standard connector style.
    #[must_use]
    pub fn new(source: NodeKey, target_id: Option<String>, style: &ConnectorStyle) -> Self {
        Self {
            source,
            target_id,
            shape: style.shape,
            color: style.color,
            alpha: style.alpha,
            width: style.width,
            dash: None,
            source_label: None,
            middle_label: None,
            target_label: None,
            start_inclination: None,
            end_inclination: None,
            start_arrow: style.start_arrow,
            end_arrow: style.end_arrow,
        }
    }

    /// Append this connector to the links of its source node.
    pub fn attach(self, map: &mut MapModel) {
        map.node_mut(self.source)
            .extensions_mut()
            .get_or_insert_default::<NodeLinks>()
            .add_link(Link::Connector(self));
    }
}

/// An unstyled link to another node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlainLink {
    pub source: NodeKey,
    pub target_id: String,
}

/// A link from a node to another node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Link {
    Connector(ConnectorModel),
    Plain(PlainLink),
}

impl Link {
    #[must_use]
    pub fn source(&self) -> NodeKey {
        match self {
            Self::Connector(c) => c.source,
            Self::Plain(p) => p.source,
        }
    }

    #[must_use]
    pub fn target_id(&self) -> Option<&str> {
        match self {
            Self::Connector(c) => c.target_id.as_deref(),
            Self::Plain(p) => Some(&p.target_id),
        }
    }

    #[must_use]
    pub fn as_connector(&self) -> Option<&ConnectorModel> {
        match self {
            Self::Connector(c) => Some(c),
            Self::Plain(_) => None,
        }
    }
}

/// A node's plain hyperlink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hyperlink(String);

impl Hyperlink {
    #[must_use]
    pub fn new(uri: impl Into<String>) -> Self {
        Self(uri.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Target identifier of a same-document link (`#<id>`).
    ///
    /// # Examples
    /// ```
    /// use mindmap_io::links::Hyperlink;
    ///
    /// assert_eq!(Hyperlink::new("#ID_12").local_target(), Some("ID_12"));
    /// assert_eq!(Hyperlink::new("https://example.com/#top").local_target(), None);
    /// ```
    #[must_use]
    pub fn local_target(&self) -> Option<&str> {
        self.0.strip_prefix('#')
    }
}

impl fmt::Display for Hyperlink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Links extension of a node: outgoing links plus at most one hyperlink.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeLinks {
    links: Vec<Link>,
    hyperlink: Option<Hyperlink>,
}

impl NodeLinks {
    /// Outgoing links in insertion order.
    #[must_use]
    pub fn links(&self) -> &[Link] {
        &self.links
    }

    /// Outgoing connectors in insertion order.
    pub fn connectors(&self) -> impl Iterator<Item = &ConnectorModel> {
        self.links.iter().filter_map(Link::as_connector)
    }

    pub fn connectors_mut(&mut self) -> impl Iterator<Item = &mut ConnectorModel> {
        self.links.iter_mut().filter_map(|link| match link {
            Link::Connector(c) => Some(c),
            Link::Plain(_) => None,
        })
    }

    pub fn add_link(&mut self, link: Link) {
        self.links.push(link);
    }

    /// Remove and return the link at `index`.
    pub fn remove_link(&mut self, index: usize) -> Option<Link> {
        (index < self.links.len()).then(|| self.links.remove(index))
    }

    #[must_use]
    pub fn hyperlink(&self) -> Option<&Hyperlink> {
        self.hyperlink.as_ref()
    }

    pub fn set_hyperlink(&mut self, hyperlink: Option<Hyperlink>) {
        self.hyperlink = hyperlink;
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.links.is_empty() && self.hyperlink.is_none()
    }
}

impl Extension for NodeLinks {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
