//! Notifications raised by tree items.
//!
//! An item raises an [`ItemNotification`] when its state changes or the
//! pointer interacts with it. Each kind has a fixed [`Propagation`]:
//! expansion changes and selections bubble through the ancestors to the
//! container, which intercepts them to update focus and selection before
//! re-announcing them on its own signals. Pointer notifications stop at the
//! item and are announced as-is.

use crate::item::ItemId;

/// Reference to an item together with its payload at the time of the event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemRef<D> {
    /// The item.
    pub item: ItemId,
    /// A clone of the item's payload.
    pub data: Option<D>,
}

/// Payload of an expansion change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpansionChange<D> {
    /// The item whose expansion state changed.
    pub item: ItemId,
    /// The new state.
    pub expanded: bool,
    /// A clone of the item's payload.
    pub data: Option<D>,
}

impl<D> ExpansionChange<D> {
    /// The changed item as an [`ItemRef`].
    pub fn item_ref(&self) -> ItemRef<D>
    where
        D: Clone,
    {
        ItemRef {
            item: self.item,
            data: self.data.clone(),
        }
    }
}

/// Payload of a focus transition.
///
/// `old` and `new` never refer to the same item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FocusChange<D> {
    /// Previously focused item.
    pub old: Option<ItemRef<D>>,
    /// Newly focused item. `None` when focus was cleared.
    pub new: Option<ItemRef<D>>,
}

/// How far a notification travels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Propagation {
    /// Delivered to every ancestor and then the container.
    Bubble,
    /// Delivered to the item's own listeners only.
    StopAtItem,
}

/// A notification raised by an item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemNotification<D> {
    /// The item expanded or collapsed.
    ExpandedChanged(ExpansionChange<D>),
    /// The item's header was activated.
    NodeSelected(ItemRef<D>),
    /// The pointer entered the header.
    MouseOver(ItemRef<D>),
    /// The pointer left the header.
    MouseOut(ItemRef<D>),
}

impl<D> ItemNotification<D> {
    /// The item that raised the notification.
    pub fn item(&self) -> ItemId {
        match self {
            Self::ExpandedChanged(change) => change.item,
            Self::NodeSelected(r) | Self::MouseOver(r) | Self::MouseOut(r) => r.item,
        }
    }

    /// Delivery scope.
    pub fn propagation(&self) -> Propagation {
        match self {
            Self::ExpandedChanged(_) | Self::NodeSelected(_) => Propagation::Bubble,
            Self::MouseOver(_) | Self::MouseOut(_) => Propagation::StopAtItem,
        }
    }

    /// Short name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Self::ExpandedChanged(_) => "expanded-changed",
            Self::NodeSelected(_) => "node-selected",
            Self::MouseOver(_) => "mouse-over",
            Self::MouseOut(_) => "mouse-out",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::KeyData;

    fn id() -> ItemId {
        ItemId::from(KeyData::from_ffi(1))
    }

    #[test]
    fn test_propagation_by_kind() {
        let r = ItemRef { item: id(), data: Some(1u8) };
        let change = ExpansionChange { item: id(), expanded: true, data: Some(1u8) };

        assert_eq!(
            ItemNotification::ExpandedChanged(change).propagation(),
            Propagation::Bubble
        );
        assert_eq!(
            ItemNotification::NodeSelected(r.clone()).propagation(),
            Propagation::Bubble
        );
        assert_eq!(
            ItemNotification::MouseOver(r.clone()).propagation(),
            Propagation::StopAtItem
        );
        assert_eq!(ItemNotification::MouseOut(r).propagation(), Propagation::StopAtItem);
    }

    #[test]
    fn test_item_ref_from_change() {
        let change = ExpansionChange { item: id(), expanded: false, data: Some("x") };
        assert_eq!(change.item_ref(), ItemRef { item: id(), data: Some("x") });
        assert_eq!(ItemNotification::ExpandedChanged(change).item(), id());
    }
}
