//! Link policy: the standard connector style and hyperlink loading.

use crate::config::ConnectorStyle;
use crate::model::{MapModel, NodeKey};
use crate::types::{Color, Shape};

use super::model::{ConnectorModel, Hyperlink, NodeLinks};

/// Document-wide link settings shared by the link reader and writer.
#[derive(Debug, Clone, Default)]
pub struct LinkPolicy {
    style: ConnectorStyle,
}

impl LinkPolicy {
    #[must_use]
    pub fn new(style: ConnectorStyle) -> Self {
        Self { style }
    }

    #[must_use]
    pub fn style(&self) -> &ConnectorStyle {
        &self.style
    }

    #[must_use]
    pub fn standard_color(&self) -> Color {
        self.style.color
    }

    #[must_use]
    pub fn standard_alpha(&self) -> u8 {
        self.style.alpha
    }

    #[must_use]
    pub fn standard_shape(&self) -> Shape {
        self.style.shape
    }

    #[must_use]
    pub fn standard_width(&self) -> i32 {
        self.style.width
    }

    /// Create a connector from `source` with the standard style.
    #[must_use]
    pub fn create_connector(&self, source: NodeKey, target_id: Option<String>) -> ConnectorModel {
        ConnectorModel::new(source, target_id, &self.style)
    }

    /// Styled connector from `source` to `target`, creating the target's
    /// identifier if it has none. The connector is not attached yet.
    pub fn connect(&self, map: &mut MapModel, source: NodeKey, target: NodeKey) -> ConnectorModel {
        let target_id = map.create_id(target);
        self.create_connector(source, Some(target_id))
    }

    /// Connect `source` to `target` with the standard style.
    pub fn add_connector(&self, map: &mut MapModel, source: NodeKey, target: NodeKey) {
        self.connect(map, source, target).attach(map);
    }

    /// Set a node's hyperlink from its `LINK` attribute text.
    ///
    /// An empty value clears the hyperlink.
    pub fn load_link(&self, map: &mut MapModel, node: NodeKey, value: &str) {
        let links = map
            .node_mut(node)
            .extensions_mut()
            .get_or_insert_default::<NodeLinks>();
        if value.is_empty() {
            links.set_hyperlink(None);
        } else {
            links.set_hyperlink(Some(Hyperlink::new(value)));
        }
    }
}
