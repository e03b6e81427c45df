//! The tree container.
//!
//! [`Tree`] owns the item hierarchy and the single focus/selection state. It
//! turns key presses and pointer input into state transitions, routes item
//! notifications, and announces everything observable through [`Signal`]s.
//!
//! # Focus model
//!
//! At most one item is focused at any time. Every transition clears the old
//! item's flag before setting the new one and emits exactly one
//! [`focus_changed`](Tree::focus_changed) with both endpoints. Moving focus to
//! the item that already holds it is not a transition and emits nothing.
//!
//! # Example
//!
//! ```
//! use horizon_treeview::{ItemTemplate, Key, Tree};
//!
//! let mut tree = Tree::new();
//! let root = tree
//!     .insert(None, ItemTemplate::new("R").with_data("r").with_children([
//!         ItemTemplate::leaf("A").with_data("a"),
//!         ItemTemplate::leaf("B").with_data("b"),
//!     ]))
//!     .unwrap();
//!
//! tree.mount();
//! assert_eq!(tree.focused_item(), Some(root));
//!
//! tree.handle_key(Key::ArrowRight);
//! assert!(tree.item(root).unwrap().is_expanded());
//!
//! tree.handle_key(Key::ArrowDown);
//! assert_eq!(tree.focused_data(), Some(&"a"));
//! ```

use std::collections::HashSet;

use horizon_treeview_core::{PerfSpan, Signal};

use crate::config::TreeConfig;
use crate::error::{Result, TreeError};
use crate::hierarchy::ItemArena;
use crate::item::{ItemId, ItemTemplate, TreeItem};
use crate::key::Key;
use crate::logging::targets;
use crate::navigation;
use crate::notification::{ExpansionChange, FocusChange, ItemNotification, ItemRef, Propagation};

/// A keyboard-navigable tree of items carrying payloads of type `D`.
#[derive(Debug)]
pub struct Tree<D> {
    arena: ItemArena<D>,
    focused: Option<ItemId>,
    selected: Option<ItemId>,
    mounted: bool,
    config: TreeConfig,

    /// Emitted after an item expands or collapses through user input or
    /// [`set_expanded`](Tree::set_expanded).
    pub expanded_changed: Signal<ExpansionChange<D>>,
    /// Emitted when an item header is activated.
    pub node_selected: Signal<ItemRef<D>>,
    /// Emitted on every focus transition.
    pub focus_changed: Signal<FocusChange<D>>,
    /// Emitted when the selection changes through Enter or a header click.
    pub selection_changed: Signal<ItemRef<D>>,
    /// Emitted when the pointer enters an item header.
    pub item_mouse_over: Signal<ItemRef<D>>,
    /// Emitted when the pointer leaves an item header.
    pub item_mouse_out: Signal<ItemRef<D>>,
}

impl<D: Clone + 'static> Default for Tree<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: Clone + 'static> Tree<D> {
    /// Create an empty tree with the default configuration.
    pub fn new() -> Self {
        Self::with_config(TreeConfig::default())
    }

    /// Create an empty tree.
    pub fn with_config(config: TreeConfig) -> Self {
        Self {
            arena: ItemArena::new(),
            focused: None,
            selected: None,
            mounted: false,
            config,
            expanded_changed: Signal::new(),
            node_selected: Signal::new(),
            focus_changed: Signal::new(),
            selection_changed: Signal::new(),
            item_mouse_over: Signal::new(),
            item_mouse_out: Signal::new(),
        }
    }

    /// The active configuration.
    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    /// Replace the configuration. Takes effect on the next input.
    pub fn set_config(&mut self, config: TreeConfig) {
        self.config = config;
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// The underlying hierarchy.
    pub fn hierarchy(&self) -> &ItemArena<D> {
        &self.arena
    }

    /// Look up an item.
    pub fn item(&self, id: ItemId) -> Option<&TreeItem<D>> {
        self.arena.get(id)
    }

    /// Whether `id` refers to a live item.
    pub fn contains(&self, id: ItemId) -> bool {
        self.arena.contains(id)
    }

    /// Root items in display order.
    pub fn roots(&self) -> &[ItemId] {
        self.arena.roots()
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    /// Whether the tree has no items.
    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Visible items in document order.
    pub fn visible_items(&self) -> Vec<ItemId> {
        self.arena.visible_items()
    }

    /// The focused item.
    pub fn focused_item(&self) -> Option<ItemId> {
        self.focused
    }

    /// Payload of the focused item.
    pub fn focused_data(&self) -> Option<&D> {
        self.focused
            .and_then(|id| self.arena.get(id))
            .and_then(TreeItem::data)
    }

    /// The selected item.
    pub fn selected_item(&self) -> Option<ItemId> {
        self.selected
    }

    /// Whether [`mount`](Self::mount) has run.
    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// First item in document order whose payload equals `data`.
    pub fn find_by_data(&self, data: &D) -> Option<ItemId>
    where
        D: PartialEq,
    {
        self.arena
            .document_order()
            .into_iter()
            .find(|&id| self.arena.get(id).and_then(TreeItem::data) == Some(data))
    }

    fn item_ref(&self, id: ItemId) -> Option<ItemRef<D>> {
        self.arena.get(id).map(|item| ItemRef {
            item: id,
            data: item.data().cloned(),
        })
    }

    fn require(&self, id: ItemId) -> Result<&TreeItem<D>> {
        self.arena.get(id).ok_or(TreeError::ItemNotFound(id))
    }

    // =========================================================================
    // Structure
    // =========================================================================

    /// Insert `template` and its subtree as the last child of `parent`.
    pub fn insert(&mut self, parent: Option<ItemId>, template: ItemTemplate<D>) -> Result<ItemId> {
        self.insert_at(parent, None, template)
    }

    /// Insert `template` at `index` among `parent`'s children.
    pub fn insert_at(
        &mut self,
        parent: Option<ItemId>,
        index: Option<usize>,
        template: ItemTemplate<D>,
    ) -> Result<ItemId> {
        let (item, children) = template.into_item();
        let id = self.arena.insert(parent, index, item)?;
        for child in children {
            self.insert_at(Some(id), None, child)?;
        }
        Ok(id)
    }

    /// Remove `id` and its subtree.
    ///
    /// If the focused item is removed, focus is cleared and a
    /// [`focus_changed`](Self::focus_changed) with no new item is emitted. A
    /// removed selection is cleared silently.
    #[tracing::instrument(skip(self), target = "horizon_treeview::tree", level = "debug")]
    pub fn remove(&mut self, id: ItemId) -> Result<()> {
        self.require(id)?;
        let removed = self.arena.remove(id);

        if let Some(selected) = self.selected
            && removed.iter().any(|(removed_id, _)| *removed_id == selected)
        {
            self.selected = None;
        }

        if let Some(focused) = self.focused
            && let Some((_, item)) = removed.iter().find(|(removed_id, _)| *removed_id == focused)
        {
            self.focused = None;
            tracing::debug!(target: targets::NAVIGATION, ?focused, "focused item removed");
            self.focus_changed.emit(FocusChange {
                old: Some(ItemRef {
                    item: focused,
                    data: item.data().cloned(),
                }),
                new: None,
            });
        }
        Ok(())
    }

    /// Make `parent`'s children match `templates`, in order.
    ///
    /// Existing children are matched to templates by payload and keep their
    /// expansion, focus and animation state; only header, leaf and loading
    /// flags are refreshed and the matched template's own children are
    /// ignored. Unmatched templates are inserted with their subtrees and
    /// unmatched children are removed as by [`remove`](Self::remove).
    ///
    /// Returns the child ids in the new order.
    pub fn reconcile_children(
        &mut self,
        parent: Option<ItemId>,
        templates: Vec<ItemTemplate<D>>,
    ) -> Result<Vec<ItemId>>
    where
        D: PartialEq,
    {
        if let Some(parent_id) = parent {
            self.require(parent_id)?;
        }

        let existing = self.arena.children_of(parent).to_vec();
        let mut claimed = HashSet::with_capacity(existing.len());
        let mut order = Vec::with_capacity(templates.len());

        for template in templates {
            let matched = template.data().and_then(|data| {
                existing.iter().copied().find(|id| {
                    !claimed.contains(id)
                        && self.arena.get(*id).and_then(TreeItem::data) == Some(data)
                })
            });

            let id = match matched {
                Some(id) => {
                    claimed.insert(id);
                    self.refresh(id, &template)?;
                    id
                }
                None => self.insert(parent, template)?,
            };
            order.push(id);
        }

        for id in existing {
            if !claimed.contains(&id) {
                self.remove(id)?;
            }
        }

        self.arena.reorder_children(parent, order.clone());
        Ok(order)
    }

    fn refresh(&mut self, id: ItemId, template: &ItemTemplate<D>) -> Result<()> {
        self.set_header(id, template.header.clone())?;
        self.set_loading(id, template.loading)?;
        self.set_leaf(id, template.leaf)
    }

    /// Change an item's label.
    pub fn set_header(&mut self, id: ItemId, header: impl Into<String>) -> Result<()> {
        let item = self.arena.get_mut(id).ok_or(TreeError::ItemNotFound(id))?;
        item.set_header(header.into());
        Ok(())
    }

    /// Replace an item's payload.
    pub fn set_data(&mut self, id: ItemId, data: Option<D>) -> Result<()> {
        let item = self.arena.get_mut(id).ok_or(TreeError::ItemNotFound(id))?;
        item.set_data(data);
        Ok(())
    }

    /// Toggle the loading indicator.
    pub fn set_loading(&mut self, id: ItemId, loading: bool) -> Result<()> {
        let item = self.arena.get_mut(id).ok_or(TreeError::ItemNotFound(id))?;
        item.set_loading(loading);
        Ok(())
    }

    /// Mark an item as a leaf or not.
    ///
    /// A leaf cannot be expanded, so an expanded item closes without
    /// notification; focus inside it moves back to the item.
    pub fn set_leaf(&mut self, id: ItemId, leaf: bool) -> Result<()> {
        let item = self.arena.get_mut(id).ok_or(TreeError::ItemNotFound(id))?;
        let was_expanded = item.is_expanded();
        if item.set_leaf(leaf) && was_expanded {
            self.reveal_focus(id);
        }
        Ok(())
    }

    // =========================================================================
    // Input
    // =========================================================================

    /// Called once the tree is attached to its host.
    pub fn mount(&mut self) {
        if self.mounted {
            return;
        }
        self.mounted = true;
        tracing::debug!(target: targets::TREE, items = self.arena.len(), "mounted");
        if self.config.focus_on_mount && self.focused.is_none() {
            self.focus_first_visible();
        }
    }

    /// Keyboard focus entered the tree.
    ///
    /// Focuses the first visible item when nothing is focused yet.
    pub fn focus_in(&mut self) -> bool {
        self.focused.is_none() && self.focus_first_visible()
    }

    /// Handle a navigation key. Returns `true` if the key was consumed.
    ///
    /// Keys whose target does not exist leave all state untouched. With
    /// nothing focused, a key is consumed only if it focused the first
    /// visible item.
    #[tracing::instrument(skip(self), target = "horizon_treeview::navigation", level = "trace")]
    pub fn handle_key(&mut self, key: Key) -> bool {
        let Some(focused) = self.focused.filter(|&id| self.arena.contains(id)) else {
            return key != Key::Enter && self.focus_first_visible();
        };

        match key {
            Key::ArrowUp => {
                if let Some(target) = navigation::item_above(&self.arena, focused) {
                    self.move_focus(target);
                }
            }
            Key::ArrowDown => {
                if let Some(target) = navigation::item_below(&self.arena, focused) {
                    self.move_focus(target);
                }
            }
            Key::ArrowRight => {
                if navigation::can_expand(&self.arena, focused) {
                    self.apply_expanded(focused, true);
                } else if let Some(child) = navigation::first_child(&self.arena, focused) {
                    self.move_focus(child);
                }
            }
            Key::ArrowLeft => {
                if navigation::can_collapse(&self.arena, focused) {
                    self.apply_expanded(focused, false);
                } else if let Some(parent) = self.arena.parent(focused) {
                    self.move_focus(parent);
                }
            }
            Key::Enter => {
                self.select(focused);
            }
            Key::Home => {
                self.focus_first_visible();
            }
            Key::End => {
                if let Some(target) = navigation::last_visible(&self.arena) {
                    self.move_focus(target);
                }
            }
        }
        true
    }

    /// Handle a key given by its DOM name. Unknown keys are not consumed.
    pub fn handle_key_name(&mut self, name: &str) -> bool {
        match name.parse::<Key>() {
            Ok(key) => self.handle_key(key),
            Err(_) => false,
        }
    }

    /// Flip an item's expansion state, as a click on its expand icon does.
    ///
    /// Returns `Ok(false)` for leaves.
    pub fn toggle_expansion(&mut self, id: ItemId) -> Result<bool> {
        let expanded = self.require(id)?.is_expanded();
        Ok(self.apply_expanded(id, !expanded))
    }

    /// Expand or collapse an item with notification.
    ///
    /// Returns `Ok(true)` if the state changed.
    pub fn set_expanded(&mut self, id: ItemId, expanded: bool) -> Result<bool> {
        self.require(id)?;
        Ok(self.apply_expanded(id, expanded))
    }

    /// A click on an item's header.
    pub fn click_header(&mut self, id: ItemId) -> Result<()> {
        let selected = self.item_ref(id).ok_or(TreeError::ItemNotFound(id))?;
        self.deliver(ItemNotification::NodeSelected(selected));
        Ok(())
    }

    /// The pointer entered an item's header.
    pub fn mouse_over(&mut self, id: ItemId) -> Result<()> {
        let target = self.item_ref(id).ok_or(TreeError::ItemNotFound(id))?;
        self.deliver(ItemNotification::MouseOver(target));
        Ok(())
    }

    /// The pointer left an item's header.
    pub fn mouse_out(&mut self, id: ItemId) -> Result<()> {
        let target = self.item_ref(id).ok_or(TreeError::ItemNotFound(id))?;
        self.deliver(ItemNotification::MouseOut(target));
        Ok(())
    }

    /// The children panel of `id` finished animating.
    pub fn transition_end(&mut self, id: ItemId) -> Result<()> {
        let item = self.arena.get_mut(id).ok_or(TreeError::ItemNotFound(id))?;
        item.transition_end();
        Ok(())
    }

    // =========================================================================
    // Imperative API
    // =========================================================================

    /// Move focus to `id`.
    pub fn set_focus(&mut self, id: ItemId) -> Result<()> {
        self.require(id)?;
        self.move_focus(id);
        Ok(())
    }

    /// Clear focus.
    pub fn un_focus(&mut self) {
        let Some(old) = self.focused.take() else {
            return;
        };
        if let Some(item) = self.arena.get_mut(old) {
            item.un_focus();
        }
        self.focus_changed.emit(FocusChange {
            old: self.item_ref(old),
            new: None,
        });
    }

    /// Expand `id` and every descendant, without notifications or animation.
    pub fn expand_all(&mut self, id: ItemId) -> Result<()> {
        self.require(id)?;
        let _span = PerfSpan::new("expand_all");
        for current in self.arena.depth_first_preorder(id) {
            if let Some(item) = self.arena.get_mut(current) {
                item.force_expanded(true);
            }
        }
        Ok(())
    }

    /// Collapse `id` and every descendant, without notifications or
    /// animation.
    pub fn collapse_all(&mut self, id: ItemId) -> Result<()> {
        self.require(id)?;
        let _span = PerfSpan::new("collapse_all");
        for current in self.arena.depth_first_preorder(id) {
            if let Some(item) = self.arena.get_mut(current) {
                item.force_expanded(false);
            }
        }
        self.reveal_focus(id);
        Ok(())
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    fn focus_first_visible(&mut self) -> bool {
        match navigation::first_visible(&self.arena) {
            Some(first) => self.move_focus(first),
            None => false,
        }
    }

    /// Move focus to `target`. Returns `true` if focus changed.
    fn move_focus(&mut self, target: ItemId) -> bool {
        if self.focused == Some(target) || !self.arena.contains(target) {
            return false;
        }

        let old = self.focused.take().and_then(|old| {
            let item = self.arena.get_mut(old)?;
            item.un_focus();
            Some(ItemRef {
                item: old,
                data: item.data().cloned(),
            })
        });

        let Some(item) = self.arena.get_mut(target) else {
            return false;
        };
        item.set_focus();
        let new = ItemRef {
            item: target,
            data: item.data().cloned(),
        };
        self.focused = Some(target);

        tracing::debug!(
            target: targets::NAVIGATION,
            old = ?old.as_ref().map(|r| r.item),
            new = ?target,
            "focus changed"
        );
        self.focus_changed.emit(FocusChange { old, new: Some(new) });
        true
    }

    fn select(&mut self, id: ItemId) {
        let Some(selected) = self.item_ref(id) else {
            return;
        };
        self.selected = Some(id);
        tracing::debug!(target: targets::NAVIGATION, ?id, "selected");
        self.selection_changed.emit(selected);
    }

    /// Change expansion with animation and notification.
    fn apply_expanded(&mut self, id: ItemId, expanded: bool) -> bool {
        let Some(item) = self.arena.get_mut(id) else {
            return false;
        };
        if !item.set_expanded(expanded) {
            return false;
        }
        let data = item.data().cloned();

        if !expanded {
            self.reveal_focus(id);
        }
        self.deliver(ItemNotification::ExpandedChanged(ExpansionChange {
            item: id,
            expanded,
            data,
        }));
        true
    }

    /// Pull focus out of a subtree that just became hidden.
    fn reveal_focus(&mut self, collapsed: ItemId) {
        if !self.config.reveal_focus_on_collapse {
            return;
        }
        if let Some(focused) = self.focused
            && self.arena.is_ancestor_of(collapsed, focused)
        {
            self.move_focus(collapsed);
        }
    }

    /// Items a notification passes through, starting at its origin.
    ///
    /// Bubbling notifications continue to the container after the last
    /// entry; the others end at the origin.
    pub fn delivery_route(&self, notification: &ItemNotification<D>) -> Vec<ItemId> {
        let origin = notification.item();
        if !self.arena.contains(origin) {
            return Vec::new();
        }
        match notification.propagation() {
            Propagation::StopAtItem => vec![origin],
            Propagation::Bubble => std::iter::once(origin)
                .chain(self.arena.ancestors(origin))
                .collect(),
        }
    }

    /// Route a notification from its item to the container.
    fn deliver(&mut self, notification: ItemNotification<D>) {
        let item = notification.item();
        let route = self.delivery_route(&notification);
        match notification.propagation() {
            Propagation::StopAtItem => {
                tracing::trace!(target: targets::TREE, ?item, kind = notification.name(), "item notification");
                match notification {
                    ItemNotification::MouseOver(target) => {
                        self.item_mouse_over.emit(target);
                    }
                    ItemNotification::MouseOut(target) => {
                        self.item_mouse_out.emit(target);
                    }
                    _ => {}
                }
            }
            Propagation::Bubble => {
                tracing::trace!(target: targets::TREE, ?route, kind = notification.name(), "bubbled notification");
                match notification {
                    ItemNotification::ExpandedChanged(change) => {
                        if self.config.focus_follows_expansion {
                            self.move_focus(change.item);
                        }
                        self.expanded_changed.emit(change);
                    }
                    ItemNotification::NodeSelected(target) => {
                        self.move_focus(target.item);
                        self.select(target.item);
                        self.node_selected.emit(target);
                    }
                    _ => {}
                }
            }
        }
    }
}

static_assertions::assert_impl_all!(Tree<String>: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    fn recorder<T: Clone + Send + 'static>(signal: &Signal<T>) -> Arc<Mutex<Vec<T>>> {
        let log = Arc::new(Mutex::new(Vec::new()));
        let sink = log.clone();
        signal.connect(move |value: &T| sink.lock().push(value.clone()));
        log
    }

    /// R
    /// ├── A
    /// └── B
    ///     ├── B1
    ///     └── B2
    fn sample() -> (Tree<&'static str>, [ItemId; 5]) {
        let mut tree = Tree::new();
        let r = tree.insert(None, ItemTemplate::new("R").with_data("r")).unwrap();
        let a = tree.insert(Some(r), ItemTemplate::leaf("A").with_data("a")).unwrap();
        let b = tree.insert(Some(r), ItemTemplate::new("B").with_data("b")).unwrap();
        let b1 = tree.insert(Some(b), ItemTemplate::leaf("B1").with_data("b1")).unwrap();
        let b2 = tree.insert(Some(b), ItemTemplate::leaf("B2").with_data("b2")).unwrap();
        (tree, [r, a, b, b1, b2])
    }

    fn focused_count(tree: &Tree<&'static str>) -> usize {
        tree.hierarchy()
            .iter()
            .filter(|(_, item)| item.is_focused())
            .count()
    }

    #[test]
    fn test_mount_focuses_first_visible() {
        let (mut tree, [r, ..]) = sample();
        let focus = recorder(&tree.focus_changed);
        tree.mount();
        assert_eq!(tree.focused_item(), Some(r));
        assert!(tree.item(r).unwrap().is_focused());
        assert_eq!(focus.lock().len(), 1);
        assert!(focus.lock()[0].old.is_none());

        tree.mount();
        assert_eq!(focus.lock().len(), 1);
    }

    #[test]
    fn test_mount_respects_config() {
        let (mut tree, _) = sample();
        tree.set_config(TreeConfig::default().with_focus_on_mount(false));
        tree.mount();
        assert_eq!(tree.focused_item(), None);
        assert!(tree.focus_in());
        assert!(!tree.focus_in());
    }

    #[test]
    fn test_arrow_right_expands_then_descends() {
        let (mut tree, [r, a, ..]) = sample();
        tree.mount();
        let expanded = recorder(&tree.expanded_changed);

        tree.handle_key(Key::ArrowRight);
        assert!(tree.item(r).unwrap().is_expanded());
        assert_eq!(expanded.lock().len(), 1);
        assert!(expanded.lock()[0].expanded);
        assert_eq!(expanded.lock()[0].data, Some("r"));

        tree.handle_key(Key::ArrowRight);
        assert_eq!(tree.focused_item(), Some(a));
        assert_eq!(expanded.lock().len(), 1);
    }

    #[test]
    fn test_arrow_right_on_leaf_is_noop() {
        let (mut tree, [r, a, ..]) = sample();
        tree.expand_all(r).unwrap();
        tree.set_focus(a).unwrap();
        let expanded = recorder(&tree.expanded_changed);
        let focus = recorder(&tree.focus_changed);

        tree.handle_key(Key::ArrowRight);
        assert!(!tree.item(a).unwrap().is_expanded());
        assert_eq!(tree.focused_item(), Some(a));
        assert!(expanded.lock().is_empty());
        assert!(focus.lock().is_empty());
    }

    #[test]
    fn test_arrow_left_collapses_then_ascends() {
        let (mut tree, [r, _, b, b1, _]) = sample();
        tree.expand_all(r).unwrap();
        tree.set_focus(b1).unwrap();

        tree.handle_key(Key::ArrowLeft);
        assert_eq!(tree.focused_item(), Some(b));

        tree.handle_key(Key::ArrowLeft);
        assert!(!tree.item(b).unwrap().is_expanded());
        assert_eq!(tree.focused_item(), Some(b));

        tree.handle_key(Key::ArrowLeft);
        assert_eq!(tree.focused_item(), Some(r));
    }

    #[test]
    fn test_boundary_keys_are_noops() {
        let (mut tree, [r, ..]) = sample();
        tree.mount();
        let focus = recorder(&tree.focus_changed);

        tree.handle_key(Key::ArrowUp);
        tree.handle_key(Key::ArrowLeft);
        tree.handle_key(Key::Home);
        tree.handle_key(Key::End);
        assert_eq!(tree.focused_item(), Some(r));
        assert!(focus.lock().is_empty());
    }

    #[test]
    fn test_home_and_end() {
        let (mut tree, [r, _, _, _, b2]) = sample();
        tree.expand_all(r).unwrap();
        tree.mount();

        tree.handle_key(Key::End);
        assert_eq!(tree.focused_item(), Some(b2));
        tree.handle_key(Key::Home);
        assert_eq!(tree.focused_item(), Some(r));
    }

    #[test]
    fn test_keys_without_focus() {
        let (mut tree, [r, ..]) = sample();
        let selected = recorder(&tree.selection_changed);

        assert!(!tree.handle_key(Key::Enter));
        assert_eq!(tree.focused_item(), None);
        assert!(selected.lock().is_empty());

        assert!(tree.handle_key(Key::ArrowDown));
        assert_eq!(tree.focused_item(), Some(r));
    }

    #[test]
    fn test_keys_on_empty_tree_not_consumed() {
        let mut tree = Tree::<&'static str>::new();
        tree.mount();
        for key in Key::ALL {
            assert!(!tree.handle_key(key));
        }
        assert_eq!(tree.focused_item(), None);
    }

    #[test]
    fn test_enter_selects_focused() {
        let (mut tree, [r, ..]) = sample();
        tree.mount();
        let selected = recorder(&tree.selection_changed);

        tree.handle_key(Key::Enter);
        assert_eq!(tree.selected_item(), Some(r));
        assert_eq!(selected.lock().as_slice(), &[ItemRef { item: r, data: Some("r") }]);
    }

    #[test]
    fn test_unknown_key_name_not_consumed() {
        let (mut tree, _) = sample();
        tree.mount();
        assert!(!tree.handle_key_name("Tab"));
        assert!(tree.handle_key_name("ArrowDown"));
    }

    #[test]
    fn test_single_focus_invariant() {
        let (mut tree, [r, ..]) = sample();
        tree.expand_all(r).unwrap();
        tree.mount();
        for key in [Key::ArrowDown, Key::ArrowDown, Key::ArrowRight, Key::End, Key::ArrowUp] {
            tree.handle_key(key);
            assert_eq!(focused_count(&tree), 1);
        }
    }

    #[test]
    fn test_focus_event_has_both_endpoints() {
        let (mut tree, [r, a, ..]) = sample();
        tree.expand_all(r).unwrap();
        tree.mount();
        let focus = recorder(&tree.focus_changed);

        tree.handle_key(Key::ArrowDown);
        let events = focus.lock();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].old, Some(ItemRef { item: r, data: Some("r") }));
        assert_eq!(events[0].new, Some(ItemRef { item: a, data: Some("a") }));
    }

    #[test]
    fn test_refocus_same_item_is_silent() {
        let (mut tree, [r, ..]) = sample();
        tree.mount();
        let focus = recorder(&tree.focus_changed);
        tree.set_focus(r).unwrap();
        assert!(focus.lock().is_empty());
    }

    #[test]
    fn test_toggle_moves_focus_to_item() {
        let (mut tree, [r, _, b, ..]) = sample();
        tree.expand_all(r).unwrap();
        tree.mount();

        assert!(tree.toggle_expansion(b).unwrap());
        assert_eq!(tree.focused_item(), Some(b));
        assert!(tree.item(b).unwrap().is_expanded());
    }

    #[test]
    fn test_toggle_without_focus_follow() {
        let (mut tree, [r, _, b, ..]) = sample();
        tree.set_config(TreeConfig::default().with_focus_follows_expansion(false));
        tree.expand_all(r).unwrap();
        tree.mount();

        tree.toggle_expansion(b).unwrap();
        assert_eq!(tree.focused_item(), Some(r));
    }

    #[test]
    fn test_toggle_leaf_is_noop() {
        let (mut tree, [_, a, ..]) = sample();
        let expanded = recorder(&tree.expanded_changed);
        assert!(!tree.toggle_expansion(a).unwrap());
        assert!(expanded.lock().is_empty());
    }

    #[test]
    fn test_collapse_reveals_hidden_focus() {
        let (mut tree, [r, _, b, b1, _]) = sample();
        tree.set_config(TreeConfig::default().with_focus_follows_expansion(false));
        tree.expand_all(r).unwrap();
        tree.set_focus(b1).unwrap();

        tree.set_expanded(b, false).unwrap();
        assert_eq!(tree.focused_item(), Some(b));
    }

    #[test]
    fn test_collapse_all_reveals_focus_silently() {
        let (mut tree, [r, _, b, b1, b2]) = sample();
        tree.expand_all(r).unwrap();
        tree.set_focus(b2).unwrap();
        let expanded = recorder(&tree.expanded_changed);

        tree.collapse_all(r).unwrap();
        for id in [r, b, b1] {
            assert!(!tree.item(id).unwrap().is_expanded());
        }
        assert_eq!(tree.focused_item(), Some(r));
        assert!(expanded.lock().is_empty());
    }

    #[test]
    fn test_expand_all_skips_leaves() {
        let (mut tree, [r, a, b, ..]) = sample();
        tree.expand_all(r).unwrap();
        assert!(tree.item(r).unwrap().is_expanded());
        assert!(tree.item(b).unwrap().is_expanded());
        assert!(!tree.item(a).unwrap().is_expanded());
        assert!(!tree.item(b).unwrap().is_transitioning());
    }

    #[test]
    fn test_click_header_focuses_and_selects() {
        let (mut tree, [r, a, ..]) = sample();
        tree.expand_all(r).unwrap();
        tree.mount();
        let selected = recorder(&tree.node_selected);

        tree.click_header(a).unwrap();
        assert_eq!(tree.focused_item(), Some(a));
        assert_eq!(tree.selected_item(), Some(a));
        assert_eq!(selected.lock().len(), 1);
    }

    #[test]
    fn test_mouse_notifications_do_not_touch_focus() {
        let (mut tree, [r, a, ..]) = sample();
        tree.expand_all(r).unwrap();
        tree.mount();
        let over = recorder(&tree.item_mouse_over);
        let out = recorder(&tree.item_mouse_out);

        tree.mouse_over(a).unwrap();
        tree.mouse_out(a).unwrap();
        assert_eq!(tree.focused_item(), Some(r));
        assert_eq!(over.lock().len(), 1);
        assert_eq!(out.lock()[0].data, Some("a"));
    }

    #[test]
    fn test_delivery_route() {
        let (tree, [r, _, b, b1, _]) = sample();
        let selected = ItemNotification::NodeSelected(ItemRef { item: b1, data: Some("b1") });
        assert_eq!(tree.delivery_route(&selected), vec![b1, b, r]);

        let over = ItemNotification::MouseOver(ItemRef { item: b1, data: Some("b1") });
        assert_eq!(tree.delivery_route(&over), vec![b1]);
    }

    #[test]
    fn test_remove_focused_clears_focus() {
        let (mut tree, [r, _, b, b1, _]) = sample();
        tree.expand_all(r).unwrap();
        tree.set_focus(b1).unwrap();
        tree.handle_key(Key::Enter);
        let focus = recorder(&tree.focus_changed);

        tree.remove(b).unwrap();
        assert_eq!(tree.focused_item(), None);
        assert_eq!(tree.selected_item(), None);
        assert_eq!(focus.lock().len(), 1);
        assert_eq!(focus.lock()[0].old.as_ref().map(|o| o.item), Some(b1));
        assert!(focus.lock()[0].new.is_none());

        assert!(tree.remove(b).unwrap_err().is_not_found());
        assert!(tree.set_focus(b1).is_err());
    }

    #[test]
    fn test_reconcile_preserves_state() {
        let (mut tree, [r, a, b, ..]) = sample();
        tree.expand_all(r).unwrap();
        tree.set_focus(b).unwrap();

        let order = tree
            .reconcile_children(
                Some(r),
                vec![
                    ItemTemplate::new("B renamed").with_data("b"),
                    ItemTemplate::leaf("C").with_data("c"),
                ],
            )
            .unwrap();

        assert_eq!(order.len(), 2);
        assert_eq!(order[0], b);
        assert!(!tree.contains(a));
        assert_eq!(tree.item(b).unwrap().header(), "B renamed");
        assert!(tree.item(b).unwrap().is_expanded());
        assert_eq!(tree.focused_item(), Some(b));
        assert_eq!(tree.hierarchy().children_of(Some(r)), order.as_slice());
    }

    #[test]
    fn test_set_leaf_collapses_and_reveals() {
        let (mut tree, [r, _, b, b1, _]) = sample();
        tree.expand_all(r).unwrap();
        tree.set_focus(b1).unwrap();

        tree.set_leaf(b, true).unwrap();
        assert!(!tree.item(b).unwrap().is_expanded());
        assert_eq!(tree.focused_item(), Some(b));
    }

    #[test]
    fn test_find_by_data() {
        let (tree, [_, _, _, b1, _]) = sample();
        assert_eq!(tree.find_by_data(&"b1"), Some(b1));
        assert_eq!(tree.find_by_data(&"zz"), None);
    }

    #[test]
    fn test_un_focus() {
        let (mut tree, [r, ..]) = sample();
        tree.mount();
        let focus = recorder(&tree.focus_changed);
        tree.un_focus();
        assert_eq!(tree.focused_item(), None);
        assert!(!tree.item(r).unwrap().is_focused());
        assert_eq!(focus.lock().len(), 1);
        tree.un_focus();
        assert_eq!(focus.lock().len(), 1);
    }
}
