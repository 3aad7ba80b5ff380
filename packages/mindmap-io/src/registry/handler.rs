//! Handler trait definitions.
//!
//! Readers dispatch on tag name (element builders) and on the pair of tag
//! and attribute name (attribute handlers). Writers dispatch on the
//! runtime type of a node extension.

use roxmltree::Node;

use super::types::{ElementObject, ReadContext};
use crate::error::{Result, ValueError};
use crate::model::{Extension, MapModel, NodeKey};
use crate::writer::XmlElement;

/// Builds the object an element is read into.
pub trait ElementBuilder: Send + Sync {
    /// Create the object for a `tag` element under `parent`.
    ///
    /// Returning `None` means the element (and its subtree) is not read.
    /// `attributes` is the raw element, for builders that need to look at
    /// attributes before the handlers run.
    fn create_element(
        &self,
        parent: ElementObject,
        tag: &str,
        attributes: Node<'_, '_>,
        context: &mut ReadContext<'_>,
    ) -> Result<Option<ElementObject>>;

    /// Called once the closing tag is seen, after all attributes and children.
    ///
    /// Default implementation does nothing.
    fn end_element(
        &self,
        _parent: ElementObject,
        _tag: &str,
        _element: ElementObject,
        _attributes: Node<'_, '_>,
        _context: &mut ReadContext<'_>,
    ) -> Result<()> {
        Ok(())
    }
}

/// Applies one attribute's raw text to an element object.
pub trait AttributeHandler: Send + Sync {
    fn set_attribute(
        &self,
        element: ElementObject,
        value: &str,
        context: &mut ReadContext<'_>,
    ) -> std::result::Result<(), ValueError>;
}

/// Runs once after a whole document has been read.
pub trait ReadCompletionListener: Send + Sync {
    fn reading_completed(&self, root: ElementObject, context: &mut ReadContext<'_>);
}

/// Writes the attributes an extension contributes to its node element.
pub trait ExtensionAttributeWriter: Send + Sync {
    fn write_attributes(
        &self,
        map: &MapModel,
        node: NodeKey,
        extension: &dyn Extension,
        element: &mut XmlElement,
    );
}

/// Writes the child elements an extension contributes to its node element.
pub trait ExtensionElementWriter: Send + Sync {
    fn write_content(
        &self,
        map: &MapModel,
        node: NodeKey,
        extension: &dyn Extension,
        element: &mut XmlElement,
    );
}
