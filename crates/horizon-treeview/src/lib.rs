//! Horizon Treeview - a keyboard-navigable tree view engine.
//!
//! The crate models a tree view without rendering it:
//!
//! - **Items** ([`TreeItem`]): header, expansion, leaf, loading and focus
//!   state, with an optional host payload
//! - **Container** ([`Tree`]): owns the hierarchy, the single focus and
//!   selection, turns keys into traversal and re-announces item
//!   notifications on typed [`Signal`]s
//! - **Navigation** ([`navigation`]): visible-order traversal algorithms
//! - **Lazy host** ([`host`]): projects application data into a tree and
//!   fetches children on first expansion, on a
//!   [`horizon_treeview_core::EventLoop`]
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use parking_lot::Mutex;
//! use horizon_treeview::{ItemTemplate, Key, Tree};
//!
//! let mut tree = Tree::new();
//! tree.insert(None, ItemTemplate::new("R").with_data("r").with_children([
//!     ItemTemplate::leaf("A").with_data("a"),
//! ]))
//! .unwrap();
//!
//! let focused = Arc::new(Mutex::new(Vec::new()));
//! let sink = focused.clone();
//! tree.focus_changed.connect(move |change| {
//!     sink.lock().push(change.new.as_ref().and_then(|n| n.data));
//! });
//!
//! tree.mount();
//! tree.handle_key(Key::ArrowRight);
//! tree.handle_key(Key::ArrowDown);
//! assert_eq!(*focused.lock(), vec![Some("r"), Some("a")]);
//! ```

pub mod config;
mod error;
pub mod hierarchy;
pub mod host;
mod item;
mod key;
pub mod logging;
pub mod navigation;
mod notification;
mod tree;

pub use config::{LoaderConfig, TreeConfig};
pub use error::{Result, TreeError};
pub use hierarchy::ItemArena;
pub use horizon_treeview_core::Signal;
pub use item::{Affordance, ItemId, ItemTemplate, TreeItem};
pub use key::Key;
pub use notification::{ExpansionChange, FocusChange, ItemNotification, ItemRef, Propagation};
pub use tree::Tree;
