//! Map and node model.
//!
//! Nodes live in an arena owned by [`MapModel`] and are addressed by
//! [`NodeKey`]. A node's durable identifier is optional until something
//! needs to refer to it; [`MapModel::create_id`] creates one on demand and
//! it is stable afterwards. Features attach their own state to nodes as
//! typed [`Extension`]s.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;

use uuid::Uuid;

use crate::config::ID_PREFIX;
use crate::error::{DocumentError, Result};

/// Handle to a node inside its [`MapModel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeKey(usize);

/// State a feature attaches to a node.
///
/// At most one extension of each concrete type is stored per node.
pub trait Extension: Any + fmt::Debug + Send + Sync {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Typed extension storage of a single node.
#[derive(Debug, Default)]
pub struct Extensions {
    by_type: HashMap<TypeId, Box<dyn Extension>>,
}

impl Extensions {
    /// Get the extension of type `E`, if present.
    #[must_use]
    pub fn get<E: Extension>(&self) -> Option<&E> {
        self.by_type
            .get(&TypeId::of::<E>())
            .and_then(|ext| ext.as_any().downcast_ref())
    }

    /// Get the extension of type `E` mutably, if present.
    pub fn get_mut<E: Extension>(&mut self) -> Option<&mut E> {
        self.by_type
            .get_mut(&TypeId::of::<E>())
            .and_then(|ext| ext.as_any_mut().downcast_mut())
    }

    /// Get the extension of type `E`, creating a default one if absent.
    #[allow(clippy::expect_used)] // Entries are keyed by the TypeId of their own value
    pub fn get_or_insert_default<E: Extension + Default>(&mut self) -> &mut E {
        let ext = self
            .by_type
            .entry(TypeId::of::<E>())
            .or_insert_with(|| Box::new(E::default()));
        ext.as_any_mut()
            .downcast_mut()
            .expect("extension stored under its own TypeId")
    }

    /// Insert an extension, returning the previous one of the same type.
    pub fn insert<E: Extension>(&mut self, ext: E) -> Option<Box<dyn Extension>> {
        self.by_type.insert(TypeId::of::<E>(), Box::new(ext))
    }

    /// Remove the extension of type `E`.
    pub fn remove<E: Extension>(&mut self) -> Option<Box<dyn Extension>> {
        self.by_type.remove(&TypeId::of::<E>())
    }

    /// Look up an extension by runtime type, for writers dispatched by `TypeId`.
    #[must_use]
    pub fn get_dyn(&self, type_id: TypeId) -> Option<&dyn Extension> {
        self.by_type.get(&type_id).map(|ext| ext.as_ref())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_type.is_empty()
    }
}

/// A node of the map tree.
#[derive(Debug, Default)]
pub struct NodeModel {
    id: Option<String>,
    text: String,
    parent: Option<NodeKey>,
    children: Vec<NodeKey>,
    attached: bool,
    extensions: Extensions,
}

impl NodeModel {
    /// The node's durable identifier, if one was created.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    #[must_use]
    pub fn parent(&self) -> Option<NodeKey> {
        self.parent
    }

    #[must_use]
    pub fn children(&self) -> &[NodeKey] {
        &self.children
    }

    /// Whether the node is still part of its map (not deleted).
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    #[must_use]
    pub fn extensions(&self) -> &Extensions {
        &self.extensions
    }

    pub fn extensions_mut(&mut self) -> &mut Extensions {
        &mut self.extensions
    }
}

/// A mind map: a single-rooted tree of nodes with an identifier index.
#[derive(Debug, Default)]
pub struct MapModel {
    nodes: Vec<NodeModel>,
    root: Option<NodeKey>,
    ids: HashMap<String, NodeKey>,
}

impl MapModel {
    /// Create an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn root(&self) -> Option<NodeKey> {
        self.root
    }

    /// Create the root node.
    ///
    /// # Errors
    /// Returns `MultipleRoots` if the map already has a root.
    pub fn add_root(&mut self) -> Result<NodeKey> {
        if self.root.is_some() {
            return Err(DocumentError::MultipleRoots { id: None });
        }
        let key = self.push_node(None, true);
        self.root = Some(key);
        Ok(key)
    }

    /// Append a new child to `parent`.
    ///
    /// The child is part of the map only if `parent` is.
    pub fn add_child(&mut self, parent: NodeKey) -> NodeKey {
        let attached = self.nodes[parent.0].attached;
        let key = self.push_node(Some(parent), attached);
        self.nodes[parent.0].children.push(key);
        key
    }

    fn push_node(&mut self, parent: Option<NodeKey>, attached: bool) -> NodeKey {
        let key = NodeKey(self.nodes.len());
        self.nodes.push(NodeModel {
            parent,
            attached,
            ..NodeModel::default()
        });
        key
    }

    /// Record `id` for `key`. Only attached nodes are resolvable by identifier.
    fn index_id(&mut self, key: NodeKey, id: &str) {
        if self.nodes[key.0].attached {
            self.ids.insert(id.to_string(), key);
        }
    }

    /// Drop `id` from the index if it still points at `key`.
    fn unindex_id(&mut self, key: NodeKey, id: &str) {
        if self.ids.get(id) == Some(&key) {
            self.ids.remove(id);
        }
    }

    #[must_use]
    pub fn node(&self, key: NodeKey) -> &NodeModel {
        &self.nodes[key.0]
    }

    pub fn node_mut(&mut self, key: NodeKey) -> &mut NodeModel {
        &mut self.nodes[key.0]
    }

    /// Find an attached node by its identifier.
    #[must_use]
    pub fn node_for_id(&self, id: &str) -> Option<NodeKey> {
        self.ids.get(id).copied()
    }

    /// Find an attached node by its identifier or fail.
    pub fn require_node_for_id(&self, id: &str) -> Result<NodeKey> {
        self.node_for_id(id)
            .ok_or_else(|| DocumentError::UnknownNode(id.to_string()))
    }

    /// Give `key` the identifier `id`.
    ///
    /// # Errors
    /// Returns `DuplicateId` if another node already uses `id`.
    pub fn set_id(&mut self, key: NodeKey, id: impl Into<String>) -> Result<()> {
        let id = id.into();
        if let Some(owner) = self.ids.get(&id) {
            if *owner == key {
                return Ok(());
            }
            return Err(DocumentError::DuplicateId(id));
        }
        if let Some(old) = self.nodes[key.0].id.take() {
            self.unindex_id(key, &old);
        }
        self.index_id(key, &id);
        self.nodes[key.0].id = Some(id);
        Ok(())
    }

    /// Give `key` the identifier `wanted`, or a fresh one if `wanted` is taken.
    ///
    /// Returns the replacement identifier when one had to be generated.
    pub fn claim_id(&mut self, key: NodeKey, wanted: &str) -> Option<String> {
        if self.set_id(key, wanted).is_ok() {
            return None;
        }
        let fresh = self.generate_id();
        if let Some(old) = self.nodes[key.0].id.replace(fresh.clone()) {
            self.unindex_id(key, &old);
        }
        self.index_id(key, &fresh);
        Some(fresh)
    }

    /// Return the node's identifier, creating a unique one if it has none.
    pub fn create_id(&mut self, key: NodeKey) -> String {
        if let Some(id) = &self.nodes[key.0].id {
            return id.clone();
        }
        let fresh = self.generate_id();
        self.index_id(key, &fresh);
        self.nodes[key.0].id = Some(fresh.clone());
        fresh
    }

    /// Generate an identifier no node of this map uses.
    #[must_use]
    pub fn generate_id(&self) -> String {
        loop {
            let number = Uuid::new_v4().as_u128() % 2_000_000_000;
            let id = format!("{ID_PREFIX}{number}");
            if !self.ids.contains_key(&id) {
                return id;
            }
        }
    }

    /// Detach a node and its subtree from the map.
    ///
    /// The nodes stay readable through their keys but their identifiers
    /// no longer resolve, so links pointing at them dangle.
    pub fn delete_node(&mut self, key: NodeKey) {
        if let Some(parent) = self.nodes[key.0].parent {
            self.nodes[parent.0].children.retain(|child| *child != key);
        }
        if self.root == Some(key) {
            self.root = None;
        }
        let mut stack = vec![key];
        while let Some(current) = stack.pop() {
            let node = &mut self.nodes[current.0];
            node.attached = false;
            if let Some(id) = node.id.clone() {
                self.unindex_id(current, &id);
            }
            stack.extend(self.nodes[current.0].children.iter().copied());
        }
    }

    /// Attached nodes in pre-order, starting at the root.
    #[must_use]
    pub fn nodes(&self) -> Vec<NodeKey> {
        let mut order = Vec::new();
        let mut stack: Vec<NodeKey> = self.root.into_iter().collect();
        while let Some(key) = stack.pop() {
            order.push(key);
            stack.extend(self.nodes[key.0].children.iter().rev().copied());
        }
        order
    }

    /// Number of attached nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, PartialEq)]
    struct Marker(u32);

    impl Extension for Marker {
        fn as_any(&self) -> &dyn Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    #[test]
    fn test_single_root() {
        let mut map = MapModel::new();
        assert!(map.add_root().is_ok());
        assert!(matches!(
            map.add_root(),
            Err(DocumentError::MultipleRoots { id: None })
        ));
    }

    #[test]
    fn test_preorder_nodes() {
        let mut map = MapModel::new();
        let root = map.add_root().unwrap();
        let a = map.add_child(root);
        let b = map.add_child(root);
        let a1 = map.add_child(a);

        assert_eq!(map.nodes(), vec![root, a, a1, b]);
        assert_eq!(map.len(), 4);
        assert_eq!(map.node(a1).parent(), Some(a));
    }

    #[test]
    fn test_create_id_is_stable() {
        let mut map = MapModel::new();
        let root = map.add_root().unwrap();
        assert!(map.node(root).id().is_none());

        let id = map.create_id(root);
        assert!(id.starts_with(ID_PREFIX));
        assert_eq!(map.create_id(root), id);
        assert_eq!(map.node_for_id(&id), Some(root));
    }

    #[test]
    fn test_set_id_rejects_duplicate() {
        let mut map = MapModel::new();
        let root = map.add_root().unwrap();
        let child = map.add_child(root);

        map.set_id(root, "a").unwrap();
        assert!(map.set_id(root, "a").is_ok());
        assert!(matches!(
            map.set_id(child, "a"),
            Err(DocumentError::DuplicateId(id)) if id == "a"
        ));
    }

    #[test]
    fn test_set_id_replaces_old_index_entry() {
        let mut map = MapModel::new();
        let root = map.add_root().unwrap();
        map.set_id(root, "old").unwrap();
        map.set_id(root, "new").unwrap();

        assert_eq!(map.node_for_id("old"), None);
        assert_eq!(map.node_for_id("new"), Some(root));
    }

    #[test]
    fn test_claim_id_generates_replacement() {
        let mut map = MapModel::new();
        let root = map.add_root().unwrap();
        let child = map.add_child(root);
        map.set_id(root, "x").unwrap();

        assert_eq!(map.claim_id(child, "y"), None);
        let replacement = map.claim_id(child, "x").unwrap();

        assert_ne!(replacement, "x");
        assert_eq!(map.node_for_id("x"), Some(root));
        assert_eq!(map.node_for_id(&replacement), Some(child));
        assert_eq!(map.node_for_id("y"), None);
    }

    #[test]
    fn test_delete_node_unregisters_subtree() {
        let mut map = MapModel::new();
        let root = map.add_root().unwrap();
        let a = map.add_child(root);
        let a1 = map.add_child(a);
        map.set_id(a1, "leaf").unwrap();

        map.delete_node(a);

        assert_eq!(map.node_for_id("leaf"), None);
        assert!(!map.node(a1).is_attached());
        assert_eq!(map.nodes(), vec![root]);
    }

    #[test]
    fn test_children_of_deleted_node_stay_detached() {
        let mut map = MapModel::new();
        let root = map.add_root().unwrap();
        let gone = map.add_child(root);
        map.delete_node(gone);

        let orphan = map.add_child(gone);
        map.set_id(orphan, "z").unwrap();
        let fresh = map.create_id(gone);

        assert!(!map.node(orphan).is_attached());
        assert_eq!(map.node_for_id("z"), None);
        assert_eq!(map.node_for_id(&fresh), None);
        assert_eq!(map.nodes(), vec![root]);
    }

    #[test]
    fn test_detached_node_does_not_release_reused_id() {
        let mut map = MapModel::new();
        let root = map.add_root().unwrap();
        let old = map.add_child(root);
        map.set_id(old, "x").unwrap();
        map.delete_node(old);

        let new = map.add_child(root);
        map.set_id(new, "x").unwrap();
        map.set_id(old, "y").unwrap();

        assert_eq!(map.node_for_id("x"), Some(new));
    }

    #[test]
    fn test_extensions() {
        let mut map = MapModel::new();
        let root = map.add_root().unwrap();
        let extensions = map.node_mut(root).extensions_mut();

        assert!(extensions.get::<Marker>().is_none());
        extensions.get_or_insert_default::<Marker>().0 = 7;
        assert_eq!(extensions.get::<Marker>(), Some(&Marker(7)));
        assert!(extensions.get_dyn(TypeId::of::<Marker>()).is_some());

        extensions.remove::<Marker>();
        assert!(extensions.is_empty());
    }
}
