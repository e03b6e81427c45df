//! Child sources: where lazily loaded children come from.

use super::node::{Node, NodeKind};

/// Produces the children of a node when it is first expanded.
pub trait ChildSource {
    /// Build the children of `node`. An empty list turns the item into a leaf.
    fn load_children(&mut self, node: &Node) -> Vec<Node>;

    /// Whether `node` can never have children.
    fn is_leaf(&self, node: &Node) -> bool {
        let _ = node;
        false
    }
}

/// Child ids follow `{parent}_{position}_{generation}`, where the generation
/// increases with every load so reloaded children never reuse an id.
fn child(parent: &Node, position: usize, generation: u64, header: &str, kind: NodeKind) -> Node {
    Node::new(
        format!("{}_{}_{}", parent.id, position, generation),
        header,
        kind,
    )
}

/// Every node loads two generic children, forever.
#[derive(Debug, Clone, Default)]
pub struct PairSource {
    generation: u64,
}

impl PairSource {
    /// Create a source starting at generation zero.
    pub fn new() -> Self {
        Self::default()
    }
}

impl ChildSource for PairSource {
    fn load_children(&mut self, node: &Node) -> Vec<Node> {
        self.generation += 1;
        vec![
            child(node, 1, self.generation, "Child1", NodeKind::Child),
            child(node, 2, self.generation, "Child2", NodeKind::Child),
        ]
    }
}

/// A repository layout: roots hold folders, folders hold sequences, and
/// sequences are leaves.
#[derive(Debug, Clone, Default)]
pub struct VaultSource {
    generation: u64,
}

impl VaultSource {
    /// Create a source starting at generation zero.
    pub fn new() -> Self {
        Self::default()
    }
}

impl ChildSource for VaultSource {
    fn load_children(&mut self, node: &Node) -> Vec<Node> {
        self.generation += 1;
        let (kind, prefix) = match node.kind {
            NodeKind::Root => (NodeKind::Folder, "Folder"),
            NodeKind::Folder => (NodeKind::Sequence, "Sequence"),
            NodeKind::Sequence | NodeKind::Child => return Vec::new(),
        };
        (1..=2)
            .map(|position| {
                child(node, position, self.generation, &format!("{prefix}{position}"), kind)
            })
            .collect()
    }

    fn is_leaf(&self, node: &Node) -> bool {
        node.kind == NodeKind::Sequence
    }
}
