//! Error types for the tree engine.
//!
//! Navigation never fails: a key with no valid target is a no-op. Errors are
//! reserved for imperative calls that name an item which is no longer part of
//! the hierarchy, and for malformed configuration.

use crate::item::ItemId;

/// Result type alias for tree operations.
pub type Result<T> = std::result::Result<T, TreeError>;

/// Errors that can occur when driving a [`Tree`](crate::Tree).
#[derive(Debug, thiserror::Error)]
pub enum TreeError {
    /// The item is not (or no longer) part of the hierarchy.
    #[error("Tree item {0:?} not found")]
    ItemNotFound(ItemId),

    /// A key name that the tree does not handle.
    #[error("Unknown key '{0}'")]
    UnknownKey(String),

    /// Configuration could not be parsed.
    #[error("Invalid configuration: {0}")]
    Config(#[from] toml::de::Error),
}

impl TreeError {
    /// Whether this error reports a stale item reference.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ItemNotFound(_))
    }
}
