//! Item storage and structural queries.
//!
//! [`ItemArena`] owns every [`TreeItem`] of a tree in a slot map keyed by
//! [`ItemId`], plus the ordered list of roots. Parents keep their children in
//! display order; each child keeps a back-link to its parent. The arena never
//! emits notifications: the [`Tree`](crate::Tree) container wraps mutations
//! that users should observe.

use slotmap::SlotMap;

use crate::error::{Result, TreeError};
use crate::item::{ItemId, TreeItem};
use crate::logging::targets;

/// Arena of tree items.
#[derive(Debug)]
pub struct ItemArena<D> {
    items: SlotMap<ItemId, TreeItem<D>>,
    roots: Vec<ItemId>,
}

impl<D> Default for ItemArena<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D> ItemArena<D> {
    /// Create an empty arena.
    pub fn new() -> Self {
        Self {
            items: SlotMap::with_key(),
            roots: Vec::new(),
        }
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the arena holds no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether `id` refers to a live item.
    pub fn contains(&self, id: ItemId) -> bool {
        self.items.contains_key(id)
    }

    /// Look up an item.
    pub fn get(&self, id: ItemId) -> Option<&TreeItem<D>> {
        self.items.get(id)
    }

    pub(crate) fn get_mut(&mut self, id: ItemId) -> Option<&mut TreeItem<D>> {
        self.items.get_mut(id)
    }

    /// Root items in display order.
    pub fn roots(&self) -> &[ItemId] {
        &self.roots
    }

    /// Children of `parent`, or the roots when `parent` is `None`.
    ///
    /// A stale parent id yields an empty slice.
    pub fn children_of(&self, parent: Option<ItemId>) -> &[ItemId] {
        match parent {
            None => &self.roots,
            Some(id) => self.items.get(id).map_or(&[], |item| item.children()),
        }
    }

    /// The parent of `id`, or `None` for roots and stale ids.
    pub fn parent(&self, id: ItemId) -> Option<ItemId> {
        self.items.get(id).and_then(TreeItem::parent)
    }

    /// Iterate over all live items in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (ItemId, &TreeItem<D>)> {
        self.items.iter()
    }

    // =========================================================================
    // Mutation
    // =========================================================================

    /// Insert `item` under `parent` at `index` (clamped), or at the end.
    ///
    /// Fails if `parent` does not exist.
    pub(crate) fn insert(
        &mut self,
        parent: Option<ItemId>,
        index: Option<usize>,
        mut item: TreeItem<D>,
    ) -> Result<ItemId> {
        if let Some(parent_id) = parent
            && !self.items.contains_key(parent_id)
        {
            return Err(TreeError::ItemNotFound(parent_id));
        }

        item.parent = parent;
        item.children.clear();
        let id = self.items.insert(item);

        let siblings = match parent {
            None => &mut self.roots,
            Some(parent_id) => match self.items.get_mut(parent_id) {
                Some(parent) => &mut parent.children,
                None => return Err(TreeError::ItemNotFound(parent_id)),
            },
        };
        let at = index.map_or(siblings.len(), |i| i.min(siblings.len()));
        siblings.insert(at, id);

        tracing::trace!(target: targets::TREE, ?id, ?parent, index = at, "inserted item");
        Ok(id)
    }

    /// Remove `id` and its whole subtree.
    ///
    /// Returns the removed items, the requested item first. A stale id yields
    /// an empty list.
    pub(crate) fn remove(&mut self, id: ItemId) -> Vec<(ItemId, TreeItem<D>)> {
        let Some(item) = self.items.get(id) else {
            return Vec::new();
        };

        match item.parent {
            None => self.roots.retain(|&root| root != id),
            Some(parent_id) => {
                if let Some(parent) = self.items.get_mut(parent_id) {
                    parent.children.retain(|&child| child != id);
                }
            }
        }

        let mut removed = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(item) = self.items.remove(current) {
                stack.extend(item.children.iter().rev().copied());
                removed.push((current, item));
            }
        }

        tracing::trace!(target: targets::TREE, ?id, count = removed.len(), "removed subtree");
        removed
    }

    /// Replace the child order of `parent`.
    ///
    /// `order` must be a permutation of the current children.
    pub(crate) fn reorder_children(&mut self, parent: Option<ItemId>, order: Vec<ItemId>) {
        let siblings = match parent {
            None => &mut self.roots,
            Some(parent_id) => match self.items.get_mut(parent_id) {
                Some(item) => &mut item.children,
                None => return,
            },
        };
        debug_assert_eq!(siblings.len(), order.len());
        *siblings = order;
    }

    // =========================================================================
    // Structural queries
    // =========================================================================

    /// Items sharing `id`'s parent, `id` included.
    pub fn siblings(&self, id: ItemId) -> &[ItemId] {
        match self.items.get(id) {
            Some(item) => self.children_of(item.parent),
            None => &[],
        }
    }

    /// Index of `id` among its siblings.
    pub fn sibling_index(&self, id: ItemId) -> Option<usize> {
        self.siblings(id).iter().position(|&sibling| sibling == id)
    }

    /// The sibling right after `id`.
    pub fn next_sibling(&self, id: ItemId) -> Option<ItemId> {
        let siblings = self.siblings(id);
        let pos = siblings.iter().position(|&sibling| sibling == id)?;
        siblings.get(pos + 1).copied()
    }

    /// The sibling right before `id`.
    pub fn previous_sibling(&self, id: ItemId) -> Option<ItemId> {
        let siblings = self.siblings(id);
        let pos = siblings.iter().position(|&sibling| sibling == id)?;
        pos.checked_sub(1).and_then(|prev| siblings.get(prev).copied())
    }

    /// Ancestors of `id` from its parent up to its root.
    pub fn ancestors(&self, id: ItemId) -> Ancestors<'_, D> {
        Ancestors {
            arena: self,
            next: self.parent(id),
        }
    }

    /// Whether `ancestor` is a strict ancestor of `id`.
    pub fn is_ancestor_of(&self, ancestor: ItemId, id: ItemId) -> bool {
        self.ancestors(id).any(|current| current == ancestor)
    }

    /// Nesting depth: zero for roots.
    pub fn depth(&self, id: ItemId) -> usize {
        self.ancestors(id).count()
    }

    /// `id` and all its descendants in pre-order.
    pub fn depth_first_preorder(&self, id: ItemId) -> Vec<ItemId> {
        let mut result = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(item) = self.items.get(current) {
                result.push(current);
                stack.extend(item.children.iter().rev().copied());
            }
        }
        result
    }

    /// Every item in document order.
    pub fn document_order(&self) -> Vec<ItemId> {
        self.roots
            .iter()
            .flat_map(|&root| self.depth_first_preorder(root))
            .collect()
    }

    /// Whether every ancestor of `id` is expanded.
    pub fn is_visible(&self, id: ItemId) -> bool {
        self.contains(id)
            && self
                .ancestors(id)
                .all(|ancestor| self.items.get(ancestor).is_some_and(TreeItem::is_expanded))
    }

    /// Visible items in document order.
    pub fn visible_items(&self) -> Vec<ItemId> {
        let mut result = Vec::new();
        let mut stack: Vec<ItemId> = self.roots.iter().rev().copied().collect();
        while let Some(current) = stack.pop() {
            if let Some(item) = self.items.get(current) {
                result.push(current);
                if item.is_expanded() {
                    stack.extend(item.children.iter().rev().copied());
                }
            }
        }
        result
    }
}

/// Iterator over an item's ancestors, nearest first.
#[derive(Debug)]
pub struct Ancestors<'a, D> {
    arena: &'a ItemArena<D>,
    next: Option<ItemId>,
}

impl<D> Iterator for Ancestors<'_, D> {
    type Item = ItemId;

    fn next(&mut self) -> Option<ItemId> {
        let current = self.next?;
        self.next = self.arena.parent(current);
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str) -> TreeItem<&'static str> {
        TreeItem::new(name.to_string(), None, false)
    }

    /// r
    /// ├── a
    /// │   ├── a1
    /// │   └── a2
    /// └── b
    fn sample() -> (ItemArena<&'static str>, [ItemId; 5]) {
        let mut arena = ItemArena::new();
        let r = arena.insert(None, None, item("r")).unwrap();
        let a = arena.insert(Some(r), None, item("a")).unwrap();
        let b = arena.insert(Some(r), None, item("b")).unwrap();
        let a1 = arena.insert(Some(a), None, item("a1")).unwrap();
        let a2 = arena.insert(Some(a), None, item("a2")).unwrap();
        (arena, [r, a, b, a1, a2])
    }

    #[test]
    fn test_insert_links_parent_and_children() {
        let (arena, [r, a, b, a1, a2]) = sample();
        assert_eq!(arena.roots(), &[r]);
        assert_eq!(arena.children_of(Some(r)), &[a, b]);
        assert_eq!(arena.children_of(Some(a)), &[a1, a2]);
        assert_eq!(arena.parent(a1), Some(a));
        assert_eq!(arena.parent(r), None);
        assert_eq!(arena.len(), 5);
    }

    #[test]
    fn test_insert_at_index() {
        let (mut arena, [r, a, b, ..]) = sample();
        let c = arena.insert(Some(r), Some(1), item("c")).unwrap();
        assert_eq!(arena.children_of(Some(r)), &[a, c, b]);
        let d = arena.insert(Some(r), Some(99), item("d")).unwrap();
        assert_eq!(arena.children_of(Some(r)), &[a, c, b, d]);
    }

    #[test]
    fn test_insert_under_missing_parent() {
        let (mut arena, [_, a, ..]) = sample();
        arena.remove(a);
        let err = arena.insert(Some(a), None, item("x")).unwrap_err();
        assert!(matches!(err, TreeError::ItemNotFound(id) if id == a));
    }

    #[test]
    fn test_siblings() {
        let (arena, [r, a, b, a1, a2]) = sample();
        assert_eq!(arena.next_sibling(a), Some(b));
        assert_eq!(arena.next_sibling(b), None);
        assert_eq!(arena.previous_sibling(a2), Some(a1));
        assert_eq!(arena.previous_sibling(a1), None);
        assert_eq!(arena.next_sibling(r), None);
        assert_eq!(arena.sibling_index(b), Some(1));
    }

    #[test]
    fn test_ancestors() {
        let (arena, [r, a, b, a1, _]) = sample();
        assert_eq!(arena.ancestors(a1).collect::<Vec<_>>(), vec![a, r]);
        assert!(arena.is_ancestor_of(r, a1));
        assert!(!arena.is_ancestor_of(b, a1));
        assert!(!arena.is_ancestor_of(a1, a1));
        assert_eq!(arena.depth(a1), 2);
        assert_eq!(arena.depth(r), 0);
    }

    #[test]
    fn test_remove_subtree() {
        let (mut arena, [r, a, b, a1, a2]) = sample();
        let removed: Vec<ItemId> = arena.remove(a).into_iter().map(|(id, _)| id).collect();
        assert_eq!(removed, vec![a, a1, a2]);
        assert_eq!(arena.children_of(Some(r)), &[b]);
        assert!(!arena.contains(a1));
        assert!(arena.remove(a).is_empty());
    }

    #[test]
    fn test_document_order() {
        let (arena, [r, a, b, a1, a2]) = sample();
        assert_eq!(arena.document_order(), vec![r, a, a1, a2, b]);
    }

    #[test]
    fn test_visible_items_follow_expansion() {
        let (mut arena, [r, a, b, a1, a2]) = sample();
        assert_eq!(arena.visible_items(), vec![r]);

        arena.get_mut(r).unwrap().force_expanded(true);
        assert_eq!(arena.visible_items(), vec![r, a, b]);
        assert!(!arena.is_visible(a1));

        arena.get_mut(a).unwrap().force_expanded(true);
        assert_eq!(arena.visible_items(), vec![r, a, a1, a2, b]);
        assert!(arena.is_visible(a2));
    }

    #[test]
    fn test_reorder_children() {
        let (mut arena, [r, a, b, ..]) = sample();
        arena.reorder_children(Some(r), vec![b, a]);
        assert_eq!(arena.children_of(Some(r)), &[b, a]);
        assert_eq!(arena.next_sibling(b), Some(a));
    }
}
