//! A host that projects a [`NodeStore`] into a [`Tree`] and loads children
//! on first expansion.
//!
//! The host listens to the tree's signals through an inbox and reacts on the
//! event loop: expanding an unloaded node swaps its header for a loading
//! placeholder, flags the item as loading and posts a delayed completion.
//! When the completion fires the node is looked up again by id. If it is
//! gone the completion does nothing.
//!
//! ```
//! use std::time::Duration;
//! use horizon_treeview::host::{LazyTreeHost, Node, NodeKind, NodeStore, PairSource};
//! use horizon_treeview::{Key, LoaderConfig};
//! use horizon_treeview_core::EventLoop;
//!
//! let store = NodeStore::with_roots([Node::new("r", "Root", NodeKind::Root)]);
//! let host = LazyTreeHost::new(store, PairSource::new(), LoaderConfig::default());
//! let mut event_loop = EventLoop::new(host);
//!
//! event_loop.dispatch(|host, scheduler| host.mount(scheduler));
//! event_loop.dispatch(|host, scheduler| host.handle_key(Key::ArrowRight, scheduler));
//! assert!(event_loop.state().is_loading(&"r".into()));
//!
//! event_loop.advance(Duration::from_secs(1));
//! let root = event_loop.state().store().find(&"r".into()).unwrap();
//! assert_eq!(root.header, "Root");
//! assert_eq!(root.children.len(), 2);
//! ```

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use horizon_treeview_core::{PerfSpan, Scheduler, TimerId};
use parking_lot::Mutex;

use super::node::{Node, NodeId, NodeStore};
use super::source::ChildSource;
use crate::config::{LoaderConfig, TreeConfig};
use crate::item::{ItemId, ItemTemplate};
use crate::key::Key;
use crate::logging::targets;
use crate::notification::{ExpansionChange, FocusChange, ItemRef};
use crate::tree::Tree;

/// A tree notification queued for the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostMessage {
    /// An item expanded or collapsed.
    Expanded(ExpansionChange<NodeId>),
    /// Focus moved.
    Focus(FocusChange<NodeId>),
    /// The pointer entered an item.
    MouseOver(ItemRef<NodeId>),
    /// The pointer left an item.
    MouseOut(ItemRef<NodeId>),
}

type Inbox = Arc<Mutex<VecDeque<HostMessage>>>;

#[derive(Debug)]
struct PendingLoad {
    timer: TimerId,
    original_header: String,
}

/// Lazy-loading tree host over a [`ChildSource`].
#[derive(Debug)]
pub struct LazyTreeHost<S> {
    store: NodeStore,
    tree: Tree<NodeId>,
    source: S,
    config: LoaderConfig,
    inbox: Inbox,
    pending: HashMap<NodeId, PendingLoad>,
}

impl<S: ChildSource + 'static> LazyTreeHost<S> {
    /// Create a host and project `store` into a fresh tree.
    pub fn new(store: NodeStore, source: S, config: LoaderConfig) -> Self {
        let tree = Tree::new();
        let inbox = Inbox::default();
        connect_inbox(&tree, &inbox);

        let mut host = Self {
            store,
            tree,
            source,
            config,
            inbox,
            pending: HashMap::new(),
        };
        host.project();
        host
    }

    /// Sets the tree configuration using builder pattern.
    pub fn with_tree_config(mut self, config: TreeConfig) -> Self {
        self.tree.set_config(config);
        self
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// The node data.
    pub fn store(&self) -> &NodeStore {
        &self.store
    }

    /// The projected tree.
    pub fn tree(&self) -> &Tree<NodeId> {
        &self.tree
    }

    /// The child source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// The loader settings.
    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// The item projecting node `id`.
    pub fn item_for(&self, id: &NodeId) -> Option<ItemId> {
        self.tree.find_by_data(id)
    }

    /// The node behind the focused item.
    pub fn focused_node(&self) -> Option<&Node> {
        self.tree.focused_data().and_then(|id| self.store.find(id))
    }

    /// Whether children of `id` are being fetched.
    pub fn is_loading(&self, id: &NodeId) -> bool {
        self.pending.contains_key(id)
    }

    /// Number of loads in flight.
    pub fn pending_loads(&self) -> usize {
        self.pending.len()
    }

    // =========================================================================
    // Input
    // =========================================================================

    /// Attach the tree.
    pub fn mount(&mut self, scheduler: &mut Scheduler<Self>) {
        self.tree.mount();
        self.pump(scheduler);
    }

    /// Keyboard focus entered the tree.
    pub fn focus_in(&mut self, scheduler: &mut Scheduler<Self>) {
        self.tree.focus_in();
        self.pump(scheduler);
    }

    /// Forward a key to the tree and react to what it announced.
    pub fn handle_key(&mut self, key: Key, scheduler: &mut Scheduler<Self>) -> bool {
        let consumed = self.tree.handle_key(key);
        self.pump(scheduler);
        consumed
    }

    /// Click on the expand icon of node `id`. Returns `false` if the node has
    /// no item or is a leaf.
    pub fn toggle(&mut self, id: &NodeId, scheduler: &mut Scheduler<Self>) -> bool {
        let Some(item) = self.item_for(id) else {
            return false;
        };
        let toggled = self.tree.toggle_expansion(item).unwrap_or(false);
        self.pump(scheduler);
        toggled
    }

    /// Click on the header of node `id`.
    pub fn click_header(&mut self, id: &NodeId, scheduler: &mut Scheduler<Self>) -> bool {
        let clicked = self
            .item_for(id)
            .is_some_and(|item| self.tree.click_header(item).is_ok());
        self.pump(scheduler);
        clicked
    }

    /// The pointer entered or left the header of node `id`.
    pub fn hover(&mut self, id: &NodeId, inside: bool, scheduler: &mut Scheduler<Self>) -> bool {
        let Some(item) = self.item_for(id) else {
            return false;
        };
        let delivered = if inside {
            self.tree.mouse_over(item)
        } else {
            self.tree.mouse_out(item)
        };
        self.pump(scheduler);
        delivered.is_ok()
    }

    // =========================================================================
    // Structure
    // =========================================================================

    /// Append a root node and project it.
    pub fn insert_root(&mut self, node: Node, scheduler: &mut Scheduler<Self>) {
        tracing::debug!(target: targets::LAZY_LOAD, node = %node.id, "root inserted");
        self.store.insert_root(node);
        self.project();
        self.pump(scheduler);
    }

    /// Remove a node and its subtree, cancelling loads inside it.
    pub fn remove_node(&mut self, id: &NodeId, scheduler: &mut Scheduler<Self>) -> Option<Node> {
        let removed = self.store.remove(id)?;
        for node_id in removed.subtree_ids() {
            if let Some(pending) = self.pending.remove(&node_id) {
                stop_timer(scheduler, pending.timer, &node_id);
            }
        }
        self.project();
        self.pump(scheduler);
        Some(removed)
    }

    /// Abandon the load of `id` and restore its header.
    ///
    /// The item stays expanded with no children; collapsing and expanding
    /// it again starts a new load.
    pub fn cancel_load(&mut self, id: &NodeId, scheduler: &mut Scheduler<Self>) -> bool {
        let Some(pending) = self.pending.remove(id) else {
            return false;
        };
        stop_timer(scheduler, pending.timer, id);
        if let Some(node) = self.store.find_mut(id) {
            node.header = pending.original_header;
        }
        tracing::debug!(target: targets::LAZY_LOAD, node = %id, "load cancelled");
        self.project();
        self.pump(scheduler);
        true
    }

    // =========================================================================
    // Reactions
    // =========================================================================

    /// Handle everything the tree has announced since the last call.
    ///
    /// Returns the number of messages handled.
    pub fn pump(&mut self, scheduler: &mut Scheduler<Self>) -> usize {
        let mut handled = 0;
        loop {
            let message = self.inbox.lock().pop_front();
            let Some(message) = message else {
                break;
            };
            self.handle_message(message, scheduler);
            handled += 1;
        }
        handled
    }

    fn handle_message(&mut self, message: HostMessage, scheduler: &mut Scheduler<Self>) {
        match message {
            HostMessage::Expanded(change) => {
                if change.expanded
                    && let Some(id) = change.data
                {
                    self.begin_load(id, scheduler);
                }
            }
            HostMessage::Focus(change) => {
                if !self.config.context_menu_follows_focus {
                    return;
                }
                if let Some(new) = change.new.and_then(|r| r.data) {
                    self.set_context_menu(&new, true);
                }
                if let Some(old) = change.old.and_then(|r| r.data) {
                    self.set_context_menu(&old, false);
                }
            }
            HostMessage::MouseOver(target) => {
                if let Some(id) = target.data {
                    self.set_context_menu(&id, true);
                }
            }
            HostMessage::MouseOut(target) => {
                if let Some(id) = target.data {
                    self.set_context_menu(&id, false);
                }
            }
        }
    }

    fn set_context_menu(&mut self, id: &NodeId, shown: bool) {
        match self.store.find_mut(id) {
            Some(node) => node.show_context_menu = shown,
            None => tracing::debug!(target: targets::LAZY_LOAD, node = %id, "context menu target gone"),
        }
    }

    fn begin_load(&mut self, id: NodeId, scheduler: &mut Scheduler<Self>) {
        let Some(node) = self.store.find_mut(&id) else {
            tracing::debug!(target: targets::LAZY_LOAD, node = %id, "expanded node not found, skipping load");
            return;
        };
        if node.loaded || self.pending.contains_key(&id) {
            tracing::trace!(target: targets::LAZY_LOAD, node = %id, loaded = node.loaded, "no load needed");
            return;
        }

        let original_header = std::mem::replace(&mut node.header, self.config.loading_text.clone());
        let replaced: Vec<NodeId> = node
            .children
            .drain(..)
            .flat_map(|child| child.subtree_ids())
            .collect();
        for stale in replaced {
            if let Some(pending) = self.pending.remove(&stale) {
                stop_timer(scheduler, pending.timer, &stale);
            }
        }

        let delay = self.config.load_delay();
        let completion_id = id.clone();
        let timer = scheduler.post_delayed(delay, move |host: &mut Self, scheduler| {
            host.complete_load(&completion_id, scheduler);
        });
        tracing::debug!(target: targets::LAZY_LOAD, node = %id, ?delay, "load started");

        self.pending.insert(
            id,
            PendingLoad {
                timer,
                original_header,
            },
        );
        self.project();
    }

    fn complete_load(&mut self, id: &NodeId, scheduler: &mut Scheduler<Self>) {
        let Some(pending) = self.pending.remove(id) else {
            tracing::debug!(target: targets::LAZY_LOAD, node = %id, "no load pending");
            return;
        };
        let Some(node) = self.store.find(id) else {
            tracing::debug!(target: targets::LAZY_LOAD, node = %id, "node removed before load completed");
            return;
        };

        let children = self.source.load_children(node);
        let count = children.len();
        if let Some(node) = self.store.find_mut(id) {
            node.children = children;
            node.header = pending.original_header;
            node.loaded = true;
        }
        tracing::debug!(target: targets::LAZY_LOAD, node = %id, count, "load completed");

        self.project();
        self.pump(scheduler);
    }

    /// Bring the tree in line with the store.
    fn project(&mut self) {
        let _span = PerfSpan::new("project");
        let Self {
            store,
            tree,
            source,
            pending,
            ..
        } = self;
        project_level(tree, None, store.roots(), source, pending);
    }
}

fn connect_inbox(tree: &Tree<NodeId>, inbox: &Inbox) {
    let sink = inbox.clone();
    tree.expanded_changed
        .connect(move |change| sink.lock().push_back(HostMessage::Expanded(change.clone())));
    let sink = inbox.clone();
    tree.focus_changed
        .connect(move |change| sink.lock().push_back(HostMessage::Focus(change.clone())));
    let sink = inbox.clone();
    tree.item_mouse_over
        .connect(move |target| sink.lock().push_back(HostMessage::MouseOver(target.clone())));
    let sink = inbox.clone();
    tree.item_mouse_out
        .connect(move |target| sink.lock().push_back(HostMessage::MouseOut(target.clone())));
}

fn stop_timer<S>(scheduler: &mut Scheduler<S>, timer: TimerId, id: &NodeId) {
    if let Err(err) = scheduler.cancel_timer(timer) {
        tracing::debug!(target: targets::LAZY_LOAD, node = %id, %err, "load timer already gone");
    }
}

fn project_level<S: ChildSource>(
    tree: &mut Tree<NodeId>,
    parent: Option<ItemId>,
    nodes: &[Node],
    source: &S,
    pending: &HashMap<NodeId, PendingLoad>,
) {
    let templates = nodes
        .iter()
        .map(|node| {
            let leaf = source.is_leaf(node) || (node.loaded && node.children.is_empty());
            ItemTemplate::new(node.header.clone())
                .with_data(node.id.clone())
                .with_leaf(leaf)
                .with_loading(pending.contains_key(&node.id))
        })
        .collect();

    let items = match tree.reconcile_children(parent, templates) {
        Ok(items) => items,
        Err(err) => {
            tracing::warn!(target: targets::LAZY_LOAD, ?parent, %err, "projection skipped");
            return;
        }
    };
    for (item, node) in items.into_iter().zip(nodes) {
        project_level(tree, Some(item), &node.children, source, pending);
    }
}
