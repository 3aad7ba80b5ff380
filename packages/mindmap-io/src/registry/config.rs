//! Registry configuration for mind-map documents.

use std::sync::Arc;

use super::core::{ReadRegistry, WriteRegistry};
use crate::links::{LinkBuilder, LinkPolicy};
use crate::nodes::NodeBuilder;

/// Create the read and write registries for map documents.
///
/// Registers the tree builder and the connector/hyperlink builder, which
/// shares `policy` between reading and writing.
#[must_use]
pub fn create_registries(policy: Arc<LinkPolicy>) -> (ReadRegistry, WriteRegistry) {
    let mut reader = ReadRegistry::new();
    let mut writer = WriteRegistry::new();

    NodeBuilder::register_by(&mut reader);
    Arc::new(LinkBuilder::new(policy)).register_by(&mut reader, &mut writer);

    (reader, writer)
}
