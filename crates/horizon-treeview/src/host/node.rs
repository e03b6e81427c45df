//! Host-side node data.
//!
//! Nodes are the application's model of the tree. Items in the
//! [`Tree`](crate::Tree) only carry a [`NodeId`]; every lookup goes back
//! through the [`NodeStore`] so a node that has since been removed is
//! simply not found.

use std::fmt;

use serde::Deserialize;

/// Stable, unique identifier of a node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    /// Wrap an identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for NodeId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// The role of a node, which decides what children it loads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// A top-level node.
    Root,
    /// A container of sequences.
    Folder,
    /// A terminal entry.
    Sequence,
    /// A generic child.
    Child,
}

/// A node of host data.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Node {
    /// Unique id.
    pub id: NodeId,
    /// Display label.
    pub header: String,
    /// Role.
    pub kind: NodeKind,
    /// Children in display order.
    #[serde(default)]
    pub children: Vec<Node>,
    /// Whether children have been fetched.
    #[serde(default)]
    pub loaded: bool,
    /// Whether the context-menu affordance is shown.
    #[serde(default)]
    pub show_context_menu: bool,
}

impl Node {
    /// A node whose children have not been fetched yet.
    pub fn new(id: impl Into<NodeId>, header: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            id: id.into(),
            header: header.into(),
            kind,
            children: Vec::new(),
            loaded: false,
            show_context_menu: false,
        }
    }

    /// Attach already-known children and mark the node loaded.
    pub fn with_children(mut self, children: impl IntoIterator<Item = Node>) -> Self {
        self.children = children.into_iter().collect();
        self.loaded = true;
        self
    }

    /// Depth-first search of this subtree.
    pub fn find(&self, id: &NodeId) -> Option<&Node> {
        if &self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(id))
    }

    /// Depth-first search of this subtree.
    pub fn find_mut(&mut self, id: &NodeId) -> Option<&mut Node> {
        if &self.id == id {
            return Some(self);
        }
        self.children.iter_mut().find_map(|child| child.find_mut(id))
    }

    /// Ids of this node and all its descendants.
    pub fn subtree_ids(&self) -> Vec<NodeId> {
        let mut ids = vec![self.id.clone()];
        for child in &self.children {
            ids.extend(child.subtree_ids());
        }
        ids
    }

    /// Nodes declared with children already have them.
    fn mark_declared_loaded(&mut self) {
        if !self.children.is_empty() {
            self.loaded = true;
        }
        for child in &mut self.children {
            child.mark_declared_loaded();
        }
    }

    fn remove_descendant(&mut self, id: &NodeId) -> Option<Node> {
        if let Some(pos) = self.children.iter().position(|child| &child.id == id) {
            return Some(self.children.remove(pos));
        }
        self.children
            .iter_mut()
            .find_map(|child| child.remove_descendant(id))
    }
}

/// The host's forest of nodes.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct NodeStore {
    #[serde(default)]
    roots: Vec<Node>,
}

impl NodeStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// A store holding `roots`.
    pub fn with_roots(roots: impl IntoIterator<Item = Node>) -> Self {
        Self {
            roots: roots.into_iter().collect(),
        }
    }

    /// Parse a store from TOML (`[[roots]]` tables).
    ///
    /// A node declared with `children` counts as loaded, so expanding it
    /// never replaces the declared subtree.
    pub fn from_toml_str(source: &str) -> crate::Result<Self> {
        let mut store: Self = toml::from_str(source)?;
        for root in &mut store.roots {
            root.mark_declared_loaded();
        }
        Ok(store)
    }

    /// Root nodes in display order.
    pub fn roots(&self) -> &[Node] {
        &self.roots
    }

    /// Append a root.
    pub fn insert_root(&mut self, node: Node) {
        self.roots.push(node);
    }

    /// Find a node anywhere in the forest.
    pub fn find(&self, id: &NodeId) -> Option<&Node> {
        self.roots.iter().find_map(|root| root.find(id))
    }

    /// Find a node anywhere in the forest.
    pub fn find_mut(&mut self, id: &NodeId) -> Option<&mut Node> {
        self.roots.iter_mut().find_map(|root| root.find_mut(id))
    }

    /// Whether a node with `id` exists.
    pub fn contains(&self, id: &NodeId) -> bool {
        self.find(id).is_some()
    }

    /// Detach a node and its subtree.
    pub fn remove(&mut self, id: &NodeId) -> Option<Node> {
        if let Some(pos) = self.roots.iter().position(|root| &root.id == id) {
            return Some(self.roots.remove(pos));
        }
        self.roots
            .iter_mut()
            .find_map(|root| root.remove_descendant(id))
    }
}
