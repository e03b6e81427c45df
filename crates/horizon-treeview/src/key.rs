//! Navigation keys understood by the tree container.

use std::fmt;
use std::str::FromStr;

use crate::error::TreeError;

/// A key the tree container reacts to.
///
/// Names follow the DOM `KeyboardEvent.key` values, so hosts that receive key
/// names as strings can parse them directly:
///
/// ```
/// use horizon_treeview::Key;
///
/// let key: Key = "ArrowDown".parse().unwrap();
/// assert_eq!(key, Key::ArrowDown);
/// assert!("Tab".parse::<Key>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// Focus the visible item above.
    ArrowUp,
    /// Focus the visible item below.
    ArrowDown,
    /// Expand, or step into the first child.
    ArrowRight,
    /// Collapse, or step out to the parent.
    ArrowLeft,
    /// Select the focused item.
    Enter,
    /// Focus the first visible item.
    Home,
    /// Focus the last visible item.
    End,
}

impl Key {
    /// All keys, in a stable order.
    pub const ALL: [Key; 7] = [
        Key::ArrowUp,
        Key::ArrowDown,
        Key::ArrowRight,
        Key::ArrowLeft,
        Key::Enter,
        Key::Home,
        Key::End,
    ];

    /// The DOM key name.
    pub fn name(self) -> &'static str {
        match self {
            Key::ArrowUp => "ArrowUp",
            Key::ArrowDown => "ArrowDown",
            Key::ArrowRight => "ArrowRight",
            Key::ArrowLeft => "ArrowLeft",
            Key::Enter => "Enter",
            Key::Home => "Home",
            Key::End => "End",
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Key {
    type Err = TreeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Key::ALL
            .into_iter()
            .find(|key| key.name() == s)
            .ok_or_else(|| TreeError::UnknownKey(s.to_string()))
    }
}
