//! Lazy-loading host.
//!
//! The host owns application data as a forest of [`Node`]s, projects it into
//! a [`Tree<NodeId>`](crate::Tree), and fetches children from a
//! [`ChildSource`] the first time a node is expanded.

mod lazy;
mod node;
mod source;

pub use lazy::{HostMessage, LazyTreeHost};
pub use node::{Node, NodeId, NodeKind, NodeStore};
pub use source::{ChildSource, PairSource, VaultSource};
