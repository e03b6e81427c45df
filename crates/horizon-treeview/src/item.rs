//! Tree items.
//!
//! A [`TreeItem`] is one node of the visual hierarchy. It owns its display
//! state (header, expansion, focus, loading) and an optional payload `D`
//! supplied by the host. Structural links (`parent`, `children`) are kept by
//! the [`ItemArena`](crate::hierarchy::ItemArena); state changes that must be
//! announced go through the [`Tree`](crate::Tree) container.

use slotmap::new_key_type;

new_key_type! {
    /// A unique identifier for an item within a tree.
    ///
    /// Identifiers are generational: once an item is removed its id never
    /// resolves again, even if the slot is reused.
    pub struct ItemId;
}

/// What an item shows in front of its header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Affordance {
    /// Leaf items show nothing.
    None,
    /// A spinner while children are being fetched.
    Loader,
    /// The expand/collapse toggle.
    ExpandIcon {
        /// Whether the icon is in its expanded orientation.
        expanded: bool,
    },
}

/// A single node in the tree.
#[derive(Debug, Clone)]
pub struct TreeItem<D> {
    header: String,
    data: Option<D>,
    expanded: bool,
    leaf: bool,
    loading: bool,
    focused: bool,
    transitioning: bool,
    pub(crate) parent: Option<ItemId>,
    pub(crate) children: Vec<ItemId>,
}

impl<D> TreeItem<D> {
    pub(crate) fn new(header: String, data: Option<D>, leaf: bool) -> Self {
        Self {
            header,
            data,
            expanded: false,
            leaf,
            loading: false,
            focused: false,
            transitioning: false,
            parent: None,
            children: Vec::new(),
        }
    }

    /// The label shown for this item.
    pub fn header(&self) -> &str {
        &self.header
    }

    /// The host payload, if any.
    pub fn data(&self) -> Option<&D> {
        self.data.as_ref()
    }

    /// Whether the children panel is open.
    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    /// Whether this item can never have children.
    pub fn is_leaf(&self) -> bool {
        self.leaf
    }

    /// Whether children are being fetched.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Whether this item holds the tree's focus.
    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// Whether the children panel is animating open or closed.
    pub fn is_transitioning(&self) -> bool {
        self.transitioning
    }

    /// The parent item, or `None` for a root.
    pub fn parent(&self) -> Option<ItemId> {
        self.parent
    }

    /// Direct children in display order.
    pub fn children(&self) -> &[ItemId] {
        &self.children
    }

    /// Whether this item has any children.
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// The affordance rendered before the header.
    pub fn affordance(&self) -> Affordance {
        if self.leaf {
            Affordance::None
        } else if self.loading {
            Affordance::Loader
        } else {
            Affordance::ExpandIcon {
                expanded: self.expanded,
            }
        }
    }

    /// Whether the children panel is rendered.
    ///
    /// The panel stays up while a collapse animation is running.
    pub fn shows_children_panel(&self) -> bool {
        self.expanded || self.transitioning
    }

    /// Set the expansion state. Returns `true` if it changed.
    ///
    /// Leaf items refuse to expand.
    pub(crate) fn set_expanded(&mut self, expanded: bool) -> bool {
        if self.expanded == expanded || (expanded && self.leaf) {
            return false;
        }
        self.expanded = expanded;
        self.transitioning = true;
        true
    }

    /// Open or close the panel without animating.
    pub(crate) fn force_expanded(&mut self, expanded: bool) -> bool {
        if self.expanded == expanded || (expanded && self.leaf) {
            return false;
        }
        self.expanded = expanded;
        true
    }

    pub(crate) fn set_focus(&mut self) {
        self.focused = true;
    }

    pub(crate) fn un_focus(&mut self) {
        self.focused = false;
    }

    /// Returns `true` if an animation was running.
    pub(crate) fn transition_end(&mut self) -> bool {
        std::mem::replace(&mut self.transitioning, false)
    }

    pub(crate) fn set_header(&mut self, header: String) -> bool {
        if self.header == header {
            return false;
        }
        self.header = header;
        true
    }

    pub(crate) fn set_data(&mut self, data: Option<D>) {
        self.data = data;
    }

    /// Marking an item as a leaf closes its panel.
    pub(crate) fn set_leaf(&mut self, leaf: bool) -> bool {
        if self.leaf == leaf {
            return false;
        }
        self.leaf = leaf;
        if leaf {
            self.expanded = false;
            self.transitioning = false;
        }
        true
    }

    pub(crate) fn set_loading(&mut self, loading: bool) -> bool {
        if self.loading == loading {
            return false;
        }
        self.loading = loading;
        true
    }
}

/// A description of an item (and optionally its subtree) to insert.
///
/// # Example
///
/// ```
/// use horizon_treeview::ItemTemplate;
///
/// let template = ItemTemplate::new("Vault")
///     .with_data(1u32)
///     .expanded(true)
///     .with_child(ItemTemplate::leaf("Sequence1").with_data(2));
/// assert_eq!(template.children().len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ItemTemplate<D> {
    pub(crate) header: String,
    pub(crate) data: Option<D>,
    pub(crate) leaf: bool,
    pub(crate) expanded: bool,
    pub(crate) loading: bool,
    pub(crate) children: Vec<ItemTemplate<D>>,
}

impl<D> ItemTemplate<D> {
    /// A collapsed, non-leaf item.
    pub fn new(header: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            data: None,
            leaf: false,
            expanded: false,
            loading: false,
            children: Vec::new(),
        }
    }

    /// A leaf item.
    pub fn leaf(header: impl Into<String>) -> Self {
        Self::new(header).with_leaf(true)
    }

    /// Attach a payload.
    pub fn with_data(mut self, data: D) -> Self {
        self.data = Some(data);
        self
    }

    /// Set the leaf flag.
    pub fn with_leaf(mut self, leaf: bool) -> Self {
        self.leaf = leaf;
        if leaf {
            self.expanded = false;
        }
        self
    }

    /// Start expanded. Ignored for leaves.
    pub fn expanded(mut self, expanded: bool) -> Self {
        self.expanded = expanded && !self.leaf;
        self
    }

    /// Start in the loading state.
    pub fn with_loading(mut self, loading: bool) -> Self {
        self.loading = loading;
        self
    }

    /// Append a child template.
    pub fn with_child(mut self, child: ItemTemplate<D>) -> Self {
        self.children.push(child);
        self
    }

    /// Append several child templates.
    pub fn with_children(mut self, children: impl IntoIterator<Item = ItemTemplate<D>>) -> Self {
        self.children.extend(children);
        self
    }

    /// The header text.
    pub fn header(&self) -> &str {
        &self.header
    }

    /// The payload, if any.
    pub fn data(&self) -> Option<&D> {
        self.data.as_ref()
    }

    /// Child templates.
    pub fn children(&self) -> &[ItemTemplate<D>] {
        &self.children
    }

    pub(crate) fn into_item(self) -> (TreeItem<D>, Vec<ItemTemplate<D>>) {
        let mut item = TreeItem::new(self.header, self.data, self.leaf);
        item.force_expanded(self.expanded);
        item.set_loading(self.loading);
        (item, self.children)
    }
}
