//! Types for the handler registry system.

use std::collections::HashMap;
use std::fmt;

use crate::links::ConnectorModel;
use crate::model::{MapModel, NodeKey};

/// Handle to a connector that is still being read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectorKey(usize);

/// The object an element was read into.
///
/// Builders return one of these from `create_element`; attribute handlers
/// and child elements receive it back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementObject {
    /// The `<map>` document element.
    Map,
    /// A node of the map being read.
    Node(NodeKey),
    /// An in-progress connector owned by the read context.
    Connector(ConnectorKey),
}

/// Non-fatal issue found while reading a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseWarning {
    /// A connector's target identifier matches no node, even after remapping.
    UnresolvedTarget {
        source_id: Option<String>,
        target_id: String,
    },
    /// A connector element had no `DESTINATION` attribute.
    MissingDestination { source_id: Option<String> },
    /// A node identifier collided with an existing node and was replaced.
    DuplicateId { id: String, replacement: String },
}

impl fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let source = |id: &Option<String>| id.clone().unwrap_or_else(|| "<no ID>".to_string());
        match self {
            Self::UnresolvedTarget {
                source_id,
                target_id,
            } => write!(
                f,
                "connector from {} points at unknown node '{target_id}', dropped",
                source(source_id)
            ),
            Self::MissingDestination { source_id } => write!(
                f,
                "connector from {} has no DESTINATION, dropped",
                source(source_id)
            ),
            Self::DuplicateId { id, replacement } => {
                write!(f, "duplicate node ID '{id}' renamed to '{replacement}'")
            }
        }
    }
}

/// State of a single read operation.
///
/// A fresh context is created for every document or fragment read, so
/// in-progress connectors, the pending set and the remap table never leak
/// between reads.
pub struct ReadContext<'m> {
    map: &'m mut MapModel,
    connectors: Vec<Option<ConnectorModel>>,
    pending: Vec<ConnectorKey>,
    id_remap: HashMap<String, String>,
    warnings: Vec<ParseWarning>,
}

impl<'m> ReadContext<'m> {
    /// Create a context that reads into `map`.
    pub fn new(map: &'m mut MapModel) -> Self {
        Self {
            map,
            connectors: Vec::new(),
            pending: Vec::new(),
            id_remap: HashMap::new(),
            warnings: Vec::new(),
        }
    }

    #[must_use]
    pub fn map(&self) -> &MapModel {
        self.map
    }

    pub fn map_mut(&mut self) -> &mut MapModel {
        self.map
    }

    /// Take ownership of a freshly built connector.
    pub fn add_connector(&mut self, connector: ConnectorModel) -> ConnectorKey {
        let key = ConnectorKey(self.connectors.len());
        self.connectors.push(Some(connector));
        key
    }

    #[must_use]
    pub fn connector(&self, key: ConnectorKey) -> Option<&ConnectorModel> {
        self.connectors.get(key.0).and_then(Option::as_ref)
    }

    pub fn connector_mut(&mut self, key: ConnectorKey) -> Option<&mut ConnectorModel> {
        self.connectors.get_mut(key.0).and_then(Option::as_mut)
    }

    /// The connector behind `element`, if it is one.
    pub fn connector_for(&mut self, element: ElementObject) -> Option<&mut ConnectorModel> {
        match element {
            ElementObject::Connector(key) => self.connector_mut(key),
            ElementObject::Map | ElementObject::Node(_) => None,
        }
    }

    /// Remove a connector from the context, handing ownership to the caller.
    pub fn take_connector(&mut self, key: ConnectorKey) -> Option<ConnectorModel> {
        self.connectors.get_mut(key.0).and_then(Option::take)
    }

    /// Remove every connector still held by the context.
    pub fn drain_connectors(&mut self) -> Vec<ConnectorModel> {
        self.connectors.drain(..).flatten().collect()
    }

    /// Add a connector to the pending-link set. Adding twice is a no-op.
    pub fn mark_pending(&mut self, key: ConnectorKey) {
        if !self.pending.contains(&key) {
            self.pending.push(key);
        }
    }

    /// Members of the pending-link set, in the order they were added.
    #[must_use]
    pub fn pending(&self) -> &[ConnectorKey] {
        &self.pending
    }

    /// Empty the pending-link set, returning its members.
    pub fn take_pending(&mut self) -> Vec<ConnectorKey> {
        std::mem::take(&mut self.pending)
    }

    /// Record that identifier `old` was renamed to `new` during this read.
    pub fn remap_id(&mut self, old: impl Into<String>, new: impl Into<String>) {
        self.id_remap.insert(old.into(), new.into());
    }

    /// The replacement for `id`, if it was remapped.
    #[must_use]
    pub fn remapped_id(&self, id: &str) -> Option<&str> {
        self.id_remap.get(id).map(String::as_str)
    }

    #[must_use]
    pub fn id_remap(&self) -> &HashMap<String, String> {
        &self.id_remap
    }

    /// Record a non-fatal issue.
    pub fn warn(&mut self, warning: ParseWarning) {
        tracing::warn!(%warning, "Document read warning");
        self.warnings.push(warning);
    }

    #[must_use]
    pub fn warnings(&self) -> &[ParseWarning] {
        &self.warnings
    }

    #[must_use]
    pub fn into_warnings(self) -> Vec<ParseWarning> {
        self.warnings
    }
}

impl fmt::Debug for ReadContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReadContext")
            .field("nodes", &self.map.len())
            .field("connectors", &self.connectors.iter().flatten().count())
            .field("pending", &self.pending)
            .field("id_remap", &self.id_remap)
            .field("warnings", &self.warnings)
            .finish()
    }
}
