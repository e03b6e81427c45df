//! Logging and debugging facilities for the tree engine.
//!
//! Tracing output is grouped under the [`targets`] below. Install a
//! subscriber to see it:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("horizon_treeview::navigation=debug,horizon_treeview::lazy_load=debug")
//!     .init();
//! ```
//!
//! # Debug Visualization
//!
//! [`TreeDump`] renders a tree with its per-item state:
//!
//! ```
//! use horizon_treeview::logging::{TreeDump, TreeFormatOptions, TreeStyle};
//! use horizon_treeview::{ItemTemplate, Tree};
//!
//! let mut tree = Tree::new();
//! let root = tree
//!     .insert(None, ItemTemplate::new("Vault").with_data(0).expanded(true).with_children([
//!         ItemTemplate::leaf("Sequence1").with_data(1),
//!         ItemTemplate::leaf("Sequence2").with_data(2),
//!     ]))
//!     .unwrap();
//! tree.set_focus(root).unwrap();
//!
//! let dump = TreeDump::with_options(TreeFormatOptions::minimal().with_style(TreeStyle::Ascii));
//! assert_eq!(
//!     dump.format(&tree),
//!     "Vault\n+-- Sequence1\n`-- Sequence2\n"
//! );
//! ```

use crate::item::{Affordance, ItemId, TreeItem};
use crate::tree::Tree;

/// Target names for log filtering.
pub mod targets {
    /// Tree crate target.
    pub const TREE: &str = "horizon_treeview::tree";
    /// Focus and key handling.
    pub const NAVIGATION: &str = "horizon_treeview::navigation";
    /// Lazy child loading in the host.
    pub const LAZY_LOAD: &str = "horizon_treeview::lazy_load";
}

/// Branch drawing style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TreeStyle {
    /// ASCII characters for tree branches.
    Ascii,
    /// Unicode box-drawing characters.
    #[default]
    Unicode,
    /// Plain indentation.
    Compact,
}

impl TreeStyle {
    /// (continuation, tee, corner)
    fn glyphs(self) -> (&'static str, &'static str, &'static str) {
        match self {
            TreeStyle::Ascii => ("|", "+--", "`--"),
            TreeStyle::Unicode => ("\u{2502}", "\u{251c}\u{2500}\u{2500}", "\u{2514}\u{2500}\u{2500}"),
            TreeStyle::Compact => ("", "-", "-"),
        }
    }
}

/// Configuration for [`TreeDump`] output.
#[derive(Debug, Clone)]
pub struct TreeFormatOptions {
    /// Branch drawing style.
    pub style: TreeStyle,
    /// Append each item's id.
    pub show_ids: bool,
    /// Append state flags such as `expanded` or `focused`.
    pub show_state: bool,
    /// Skip children of collapsed items.
    pub only_visible: bool,
    /// Maximum depth to descend (None for unlimited).
    pub max_depth: Option<usize>,
    /// Spaces after each continuation glyph.
    pub indent_size: usize,
}

impl Default for TreeFormatOptions {
    fn default() -> Self {
        Self {
            style: TreeStyle::default(),
            show_ids: false,
            show_state: true,
            only_visible: false,
            max_depth: None,
            indent_size: 3,
        }
    }
}

impl TreeFormatOptions {
    /// Ids and state on every line.
    pub fn detailed() -> Self {
        Self {
            show_ids: true,
            ..Default::default()
        }
    }

    /// Headers only.
    pub fn minimal() -> Self {
        Self {
            show_ids: false,
            show_state: false,
            ..Default::default()
        }
    }

    /// Render what a user would see.
    pub fn visible() -> Self {
        Self {
            only_visible: true,
            ..Default::default()
        }
    }

    /// Sets the style using builder pattern.
    pub fn with_style(mut self, style: TreeStyle) -> Self {
        self.style = style;
        self
    }
}

/// Text rendering of a [`Tree`] for logs and test failures.
#[derive(Debug, Clone, Default)]
pub struct TreeDump {
    options: TreeFormatOptions,
}

impl TreeDump {
    /// Create a dump with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a dump with custom options.
    pub fn with_options(options: TreeFormatOptions) -> Self {
        Self { options }
    }

    /// Render every root and its subtree.
    pub fn format<D: Clone + 'static>(&self, tree: &Tree<D>) -> String {
        let mut output = String::new();
        for &root in tree.roots() {
            self.format_item_into(tree, root, &mut Vec::new(), &mut output);
        }
        output
    }

    /// Render the subtree under `root`. Returns an empty string for stale ids.
    pub fn format_subtree<D: Clone + 'static>(&self, tree: &Tree<D>, root: ItemId) -> String {
        let mut output = String::new();
        self.format_item_into(tree, root, &mut Vec::new(), &mut output);
        output
    }

    /// `trail` holds, per ancestor level below the root, whether that
    /// ancestor was the last of its siblings.
    fn format_item_into<D: Clone + 'static>(
        &self,
        tree: &Tree<D>,
        id: ItemId,
        trail: &mut Vec<bool>,
        output: &mut String,
    ) {
        let Some(item) = tree.item(id) else {
            return;
        };

        output.push_str(&self.build_prefix(trail));
        output.push_str(item.header());
        if self.options.show_ids {
            output.push_str(&format!(" [{id:?}]"));
        }
        if self.options.show_state {
            let flags = state_flags(item);
            if !flags.is_empty() {
                output.push_str(&format!(" ({})", flags.join(", ")));
            }
        }
        output.push('\n');

        if self.options.only_visible && !item.is_expanded() {
            return;
        }
        if self.options.max_depth.is_some_and(|max| trail.len() >= max) {
            return;
        }

        let children = item.children();
        for (i, &child) in children.iter().enumerate() {
            trail.push(i + 1 == children.len());
            self.format_item_into(tree, child, trail, output);
            trail.pop();
        }
    }

    fn build_prefix(&self, trail: &[bool]) -> String {
        let Some((&is_last, parents)) = trail.split_last() else {
            return String::new();
        };
        let (branch, tee, corner) = self.options.style.glyphs();

        let mut prefix = String::new();
        for &parent_was_last in parents {
            if parent_was_last {
                prefix.push_str(&" ".repeat(branch.chars().count()));
            } else {
                prefix.push_str(branch);
            }
            prefix.push_str(&" ".repeat(self.options.indent_size));
        }
        prefix.push_str(if is_last { corner } else { tee });
        prefix.push(' ');
        prefix
    }
}

fn state_flags<D>(item: &TreeItem<D>) -> Vec<&'static str> {
    let mut flags = Vec::new();
    match item.affordance() {
        Affordance::None => flags.push("leaf"),
        Affordance::Loader => flags.push("loading"),
        Affordance::ExpandIcon { expanded: true } => flags.push("expanded"),
        Affordance::ExpandIcon { expanded: false } => {}
    }
    if item.is_focused() {
        flags.push("focused");
    }
    if item.is_transitioning() {
        flags.push("animating");
    }
    flags
}
