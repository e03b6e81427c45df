//! Configuration for the tree container and the lazy-loading host.
//!
//! Both structs can be built in code with `with_*` builder methods or parsed
//! from TOML. Missing keys fall back to their defaults:
//!
//! ```
//! use horizon_treeview::{LoaderConfig, TreeConfig};
//!
//! let tree = TreeConfig::from_toml_str("focus_on_mount = false").unwrap();
//! assert!(!tree.focus_on_mount);
//! assert!(tree.focus_follows_expansion);
//!
//! let loader = LoaderConfig::from_toml_str("load_delay_ms = 250").unwrap();
//! assert_eq!(loader.loading_text, "Loading...");
//! ```

use std::time::Duration;

use serde::Deserialize;

use crate::error::Result;

/// Behavior switches for [`Tree`](crate::Tree).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TreeConfig {
    /// Focus the first visible item when the tree is mounted.
    pub focus_on_mount: bool,
    /// Move focus onto an item whenever its expansion state changes.
    pub focus_follows_expansion: bool,
    /// When an ancestor of the focused item collapses, move focus onto it.
    pub reveal_focus_on_collapse: bool,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            focus_on_mount: true,
            focus_follows_expansion: true,
            reveal_focus_on_collapse: true,
        }
    }
}

impl TreeConfig {
    /// Parse a configuration from TOML.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    /// Sets `focus_on_mount` using builder pattern.
    pub fn with_focus_on_mount(mut self, enabled: bool) -> Self {
        self.focus_on_mount = enabled;
        self
    }

    /// Sets `focus_follows_expansion` using builder pattern.
    pub fn with_focus_follows_expansion(mut self, enabled: bool) -> Self {
        self.focus_follows_expansion = enabled;
        self
    }

    /// Sets `reveal_focus_on_collapse` using builder pattern.
    pub fn with_reveal_focus_on_collapse(mut self, enabled: bool) -> Self {
        self.reveal_focus_on_collapse = enabled;
        self
    }
}

/// Settings for [`LazyTreeHost`](crate::host::LazyTreeHost).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Header shown on a node while its children load.
    pub loading_text: String,
    /// Simulated fetch latency, in milliseconds.
    pub load_delay_ms: u64,
    /// Show the context-menu affordance on the focused node.
    pub context_menu_follows_focus: bool,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            loading_text: "Loading...".to_string(),
            load_delay_ms: 1000,
            context_menu_follows_focus: true,
        }
    }
}

impl LoaderConfig {
    /// Parse a configuration from TOML.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    /// The fetch latency as a `Duration`.
    pub fn load_delay(&self) -> Duration {
        Duration::from_millis(self.load_delay_ms)
    }

    /// Sets the loading placeholder using builder pattern.
    pub fn with_loading_text(mut self, text: impl Into<String>) -> Self {
        self.loading_text = text.into();
        self
    }

    /// Sets the load delay using builder pattern.
    pub fn with_load_delay(mut self, delay: Duration) -> Self {
        self.load_delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Sets `context_menu_follows_focus` using builder pattern.
    pub fn with_context_menu_follows_focus(mut self, enabled: bool) -> Self {
        self.context_menu_follows_focus = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TreeError;

    #[test]
    fn test_tree_config_defaults() {
        let config = TreeConfig::default();
        assert!(config.focus_on_mount);
        assert!(config.focus_follows_expansion);
        assert!(config.reveal_focus_on_collapse);
        assert_eq!(TreeConfig::from_toml_str("").unwrap(), config);
    }

    #[test]
    fn test_tree_config_builder() {
        let config = TreeConfig::default()
            .with_focus_on_mount(false)
            .with_focus_follows_expansion(false)
            .with_reveal_focus_on_collapse(false);
        assert!(!config.focus_on_mount);
        assert!(!config.focus_follows_expansion);
        assert!(!config.reveal_focus_on_collapse);
    }

    #[test]
    fn test_loader_config_from_toml() {
        let config = LoaderConfig::from_toml_str(
            r#"
            loading_text = "Fetching..."
            load_delay_ms = 20
            context_menu_follows_focus = false
            "#,
        )
        .unwrap();
        assert_eq!(config.loading_text, "Fetching...");
        assert_eq!(config.load_delay(), Duration::from_millis(20));
        assert!(!config.context_menu_follows_focus);
    }

    #[test]
    fn test_loader_config_builder() {
        let config = LoaderConfig::default()
            .with_loading_text("...")
            .with_load_delay(Duration::from_millis(5));
        assert_eq!(config.loading_text, "...");
        assert_eq!(config.load_delay_ms, 5);
    }

    #[test]
    fn test_invalid_config_is_reported() {
        let err = LoaderConfig::from_toml_str("load_delay_ms = \"soon\"").unwrap_err();
        assert!(matches!(err, TreeError::Config(_)));
    }
}
