//! Keyboard traversal over the visible items of a hierarchy.
//!
//! "Visible" means every ancestor is expanded. Traversal follows document
//! order restricted to visible items, so [`item_below`] and [`item_above`] are
//! inverses of each other on the visible sequence. All functions are pure:
//! they read an [`ItemArena`] and return a target, never mutating state.

use crate::hierarchy::ItemArena;
use crate::item::{ItemId, TreeItem};

/// The first root, if any.
pub fn first_visible<D>(arena: &ItemArena<D>) -> Option<ItemId> {
    arena.roots().first().copied()
}

/// The last item in visible document order.
pub fn last_visible<D>(arena: &ItemArena<D>) -> Option<ItemId> {
    arena
        .roots()
        .last()
        .map(|&root| deepest_last_visible(arena, root))
}

/// The first child of an expanded item.
pub fn first_child<D>(arena: &ItemArena<D>, id: ItemId) -> Option<ItemId> {
    let item = arena.get(id)?;
    if item.is_expanded() {
        item.children().first().copied()
    } else {
        None
    }
}

/// The visible item directly below `id`.
///
/// Steps into the first child of an expanded item; otherwise takes the next
/// sibling of `id` or of its nearest ancestor that has one.
pub fn item_below<D>(arena: &ItemArena<D>, id: ItemId) -> Option<ItemId> {
    if let Some(child) = first_child(arena, id) {
        return Some(child);
    }
    std::iter::once(id)
        .chain(arena.ancestors(id))
        .find_map(|current| arena.next_sibling(current))
}

/// The visible item directly above `id`.
///
/// That is the deepest last visible descendant of the previous sibling, or
/// the parent when `id` is a first child.
pub fn item_above<D>(arena: &ItemArena<D>, id: ItemId) -> Option<ItemId> {
    match arena.previous_sibling(id) {
        Some(previous) => Some(deepest_last_visible(arena, previous)),
        None => arena.parent(id),
    }
}

/// Descend through last children while items are expanded.
pub fn deepest_last_visible<D>(arena: &ItemArena<D>, id: ItemId) -> ItemId {
    let mut current = id;
    while let Some(last) = arena
        .get(current)
        .filter(|item| item.is_expanded())
        .and_then(|item| item.children().last().copied())
    {
        current = last;
    }
    current
}

/// Whether `id` can be expanded from the keyboard.
pub fn can_expand<D>(arena: &ItemArena<D>, id: ItemId) -> bool {
    arena
        .get(id)
        .is_some_and(|item| !item.is_leaf() && !item.is_expanded())
}

/// Whether `id` is expanded and would collapse on ArrowLeft.
pub fn can_collapse<D>(arena: &ItemArena<D>, id: ItemId) -> bool {
    arena.get(id).is_some_and(TreeItem::is_expanded)
}
