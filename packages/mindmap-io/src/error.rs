//! Error types for reading and writing map documents.
//!
//! Uses the dual-error pattern: `DocumentError` for library consumers
//! with element/attribute context, and `ValueError` for the attribute
//! handlers, which only know about the single value they were given.

use thiserror::Error;

/// Main error type for the library.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// XML parsing failed.
    #[error("XML parsing failed: {0}")]
    XmlParse(#[from] roxmltree::Error),

    /// An attribute value could not be applied to its element.
    #[error("Malformed attribute {attribute}=\"{value}\" on <{tag}>: {source}")]
    MalformedAttribute {
        tag: String,
        attribute: String,
        value: String,
        #[source]
        source: ValueError,
    },

    /// A map document contained more than one root node.
    #[error("Map already has a root node; second <node> under <map>{}", .id.as_ref().map(|id| format!(" (ID {id})")).unwrap_or_default())]
    MultipleRoots { id: Option<String> },

    /// The document element is not one the reader can start from.
    #[error("Unexpected document element <{tag}>, expected <{expected}>")]
    UnexpectedRoot { tag: String, expected: String },

    /// A node identifier was referenced that the map does not contain.
    #[error("No node with ID '{0}'")]
    UnknownNode(String),

    /// A node was passed that has been removed from its map.
    #[error("Node {} is not part of the map", .0.as_deref().map(|id| format!("'{id}'")).unwrap_or_else(|| "without ID".to_string()))]
    DetachedNode(Option<String>),

    /// A node identifier is already used by another node.
    #[error("Node ID '{0}' is already in use")]
    DuplicateId(String),

    /// XML emission failed.
    #[error("XML writing failed: {0}")]
    Write(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Style configuration could not be parsed.
    #[error("Invalid style configuration: {0}")]
    StyleConfig(#[from] serde_yaml_ng::Error),
}

/// Error raised by a single attribute handler.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    /// Not a valid integer.
    #[error("'{0}' is not a valid integer")]
    InvalidInteger(String),

    /// Not a valid non-negative integer.
    #[error("'{0}' is not a valid non-negative integer")]
    NegativeInteger(String),

    /// Unknown connector shape name.
    #[error("unknown connector shape '{0}'")]
    InvalidShape(String),

    /// Unknown arrowhead name.
    #[error("unknown arrow type '{0}'")]
    InvalidArrow(String),

    /// Not a valid point encoding.
    #[error("'{0}' is not a valid point, expected <dx>;<dy>")]
    InvalidPoint(String),

    /// Not a valid color encoding.
    #[error("'{0}' is not a valid color, expected #rrggbb")]
    InvalidColor(String),

    /// Opacity out of range.
    #[error("opacity {0} is out of range 0-255")]
    InvalidAlpha(i64),
}

/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, DocumentError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_attribute_display() {
        let err = DocumentError::MalformedAttribute {
            tag: "arrowlink".to_string(),
            attribute: "WIDTH".to_string(),
            value: "wide".to_string(),
            source: ValueError::InvalidInteger("wide".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "Malformed attribute WIDTH=\"wide\" on <arrowlink>: 'wide' is not a valid integer"
        );
    }

    #[test]
    fn test_multiple_roots_with_id() {
        let err = DocumentError::MultipleRoots {
            id: Some("ID_2".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "Map already has a root node; second <node> under <map> (ID ID_2)"
        );
    }

    #[test]
    fn test_detached_node_display() {
        assert_eq!(
            DocumentError::DetachedNode(Some("ID_7".to_string())).to_string(),
            "Node 'ID_7' is not part of the map"
        );
        assert_eq!(
            DocumentError::DetachedNode(None).to_string(),
            "Node without ID is not part of the map"
        );
    }

    #[test]
    fn test_multiple_roots_without_id() {
        let err = DocumentError::MultipleRoots { id: None };
        assert_eq!(
            err.to_string(),
            "Map already has a root node; second <node> under <map>"
        );
    }
}
