//! File-format constants and the standard connector style.

use std::path::Path;

use serde::Deserialize;

use crate::error::Result;
use crate::types::{ArrowType, Color, Shape};

/// Version string written on the `<map>` element.
pub const MAP_VERSION: &str = "freeplane 1.2.0";

/// Document element of a full map.
pub const XML_MAP: &str = "map";

/// Node element.
pub const XML_NODE: &str = "node";

/// Connector element, child of a node element.
pub const XML_ARROWLINK: &str = "arrowlink";

/// Node attribute names.
pub mod node_attr {
    pub const ID: &str = "ID";
    pub const TEXT: &str = "TEXT";
    pub const LINK: &str = "LINK";
}

/// Connector attribute names. These are a persisted file-format contract.
pub mod connector_attr {
    pub const EDGE_LIKE: &str = "EDGE_LIKE";
    pub const SHAPE: &str = "SHAPE";
    pub const COLOR: &str = "COLOR";
    pub const WIDTH: &str = "WIDTH";
    pub const TRANSPARENCY: &str = "TRANSPARENCY";
    pub const DASH: &str = "DASH";
    pub const DESTINATION: &str = "DESTINATION";
    pub const SOURCE_LABEL: &str = "SOURCE_LABEL";
    pub const MIDDLE_LABEL: &str = "MIDDLE_LABEL";
    pub const TARGET_LABEL: &str = "TARGET_LABEL";
    pub const STARTINCLINATION: &str = "STARTINCLINATION";
    pub const ENDINCLINATION: &str = "ENDINCLINATION";
    pub const STARTARROW: &str = "STARTARROW";
    pub const ENDARROW: &str = "ENDARROW";
}

/// Prefix of generated node identifiers.
pub const ID_PREFIX: &str = "ID_";

/// Document-wide standard connector style.
///
/// Applied to every connector when it is created and used as the fallback
/// when a connector element omits `COLOR` or `TRANSPARENCY`.
///
/// # Examples
/// ```
/// use mindmap_io::config::ConnectorStyle;
///
/// let style = ConnectorStyle::from_yaml_str("color: '#ff0000'\nwidth: 4\n").unwrap();
/// assert_eq!(style.color.to_string(), "#ff0000");
/// assert_eq!(style.width, 4);
/// assert_eq!(style.alpha, ConnectorStyle::default().alpha);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConnectorStyle {
    pub color: Color,
    pub alpha: u8,
    pub shape: Shape,
    pub width: i32,
    pub start_arrow: ArrowType,
    pub end_arrow: ArrowType,
}

impl ConnectorStyle {
    /// Parse a style from YAML text. Missing keys keep their defaults.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml_ng::from_str(yaml)?)
    }

    /// Load a style from a YAML file.
    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }
}

impl Default for ConnectorStyle {
    fn default() -> Self {
        Self {
            color: Color::new(0x80, 0x80, 0x80),
            alpha: 80,
            shape: Shape::CubicCurve,
            width: 2,
            start_arrow: ArrowType::None,
            end_arrow: ArrowType::Default,
        }
    }
}
