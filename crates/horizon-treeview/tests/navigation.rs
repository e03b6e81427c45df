//! End-to-end keyboard navigation scenarios.

use std::sync::Arc;

use horizon_treeview::{ExpansionChange, FocusChange, ItemId, ItemTemplate, Key, Tree};
use parking_lot::Mutex;

/// R (expanded)
/// ├── A (leaf)
/// └── B (collapsed)
///     ├── B1
///     └── B2
struct Fixture {
    tree: Tree<&'static str>,
    r: ItemId,
    a: ItemId,
    b: ItemId,
    b1: ItemId,
    b2: ItemId,
}

fn fixture() -> Fixture {
    let mut tree = Tree::new();
    let r = tree
        .insert(None, ItemTemplate::new("R").with_data("r").expanded(true))
        .unwrap();
    let a = tree.insert(Some(r), ItemTemplate::leaf("A").with_data("a")).unwrap();
    let b = tree.insert(Some(r), ItemTemplate::new("B").with_data("b")).unwrap();
    let b1 = tree.insert(Some(b), ItemTemplate::leaf("B1").with_data("b1")).unwrap();
    let b2 = tree.insert(Some(b), ItemTemplate::leaf("B2").with_data("b2")).unwrap();
    tree.mount();
    Fixture { tree, r, a, b, b1, b2 }
}

/// A wider, deeper tree for property checks.
fn forest() -> Tree<u32> {
    let leaf = |n: u32| ItemTemplate::leaf(format!("L{n}")).with_data(n);
    let mut tree = Tree::new();
    tree.insert(
        None,
        ItemTemplate::new("P").with_data(1).expanded(true).with_children([
            ItemTemplate::new("Q")
                .with_data(2)
                .expanded(true)
                .with_children([leaf(3), leaf(4)]),
            ItemTemplate::new("S").with_data(5).with_child(leaf(6)),
            ItemTemplate::new("T")
                .with_data(7)
                .expanded(true)
                .with_child(ItemTemplate::new("U").with_data(8).expanded(true).with_child(leaf(9))),
        ]),
    )
    .unwrap();
    tree.insert(None, ItemTemplate::new("V").with_data(10).with_child(leaf(11)))
        .unwrap();
    tree.mount();
    tree
}

fn focused_count<D: Clone + 'static>(tree: &Tree<D>) -> usize {
    tree.hierarchy()
        .iter()
        .filter(|(_, item)| item.is_focused())
        .count()
}

#[test]
fn test_walkthrough_expand_and_descend() {
    let Fixture {
        mut tree, r, a, b, b1, ..
    } = fixture();
    let expansions: Arc<Mutex<Vec<ExpansionChange<&'static str>>>> = Arc::default();
    let sink = expansions.clone();
    tree.expanded_changed.connect(move |change| sink.lock().push(change.clone()));

    assert_eq!(tree.focused_item(), Some(r));
    tree.handle_key(Key::ArrowDown);
    assert_eq!(tree.focused_item(), Some(a));

    tree.handle_key(Key::ArrowDown);
    assert_eq!(tree.focused_item(), Some(b));

    tree.handle_key(Key::ArrowRight);
    assert!(tree.item(b).unwrap().is_expanded());
    assert_eq!(tree.focused_item(), Some(b));
    assert_eq!(
        expansions.lock().as_slice(),
        &[ExpansionChange { item: b, expanded: true, data: Some("b") }]
    );

    tree.handle_key(Key::ArrowDown);
    assert_eq!(tree.focused_item(), Some(b1));
}

#[test]
fn test_walkthrough_up_from_first_child() {
    let Fixture {
        mut tree, a, b, b1, b2, ..
    } = fixture();
    tree.set_expanded(b, true).unwrap();
    tree.set_focus(b1).unwrap();

    tree.handle_key(Key::ArrowUp);
    assert_eq!(tree.focused_item(), Some(b));
    tree.handle_key(Key::ArrowUp);
    assert_eq!(tree.focused_item(), Some(a));

    tree.set_focus(b2).unwrap();
    tree.handle_key(Key::ArrowUp);
    assert_eq!(tree.focused_item(), Some(b1));
}

#[test]
fn test_focus_events_carry_both_endpoints() {
    let Fixture { mut tree, r, a, .. } = fixture();
    let events: Arc<Mutex<Vec<FocusChange<&'static str>>>> = Arc::default();
    let sink = events.clone();
    tree.focus_changed.connect(move |change| sink.lock().push(change.clone()));

    tree.handle_key(Key::ArrowDown);
    let events = events.lock();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].old.as_ref().map(|o| o.item), Some(r));
    assert_eq!(events[0].new.as_ref().map(|n| n.item), Some(a));
    assert_eq!(events[0].new.as_ref().and_then(|n| n.data), Some("a"));
}

#[test]
fn test_at_most_one_focused() {
    let mut tree = forest();
    let keys = [
        Key::ArrowDown,
        Key::ArrowDown,
        Key::ArrowRight,
        Key::ArrowLeft,
        Key::ArrowLeft,
        Key::End,
        Key::ArrowUp,
        Key::Home,
        Key::ArrowRight,
        Key::Enter,
        Key::ArrowDown,
    ];
    for key in keys {
        tree.handle_key(key);
        assert!(focused_count(&tree) <= 1);
        if let Some(focused) = tree.focused_item() {
            assert!(tree.item(focused).unwrap().is_focused());
        }
    }
}

#[test]
fn test_down_then_up_is_identity() {
    let mut tree = forest();
    let visible = tree.visible_items();
    for &start in &visible[..visible.len() - 1] {
        tree.set_focus(start).unwrap();
        tree.handle_key(Key::ArrowDown);
        tree.handle_key(Key::ArrowUp);
        assert_eq!(tree.focused_item(), Some(start));
    }
}

#[test]
fn test_down_visits_visible_order() {
    let mut tree = forest();
    let visible = tree.visible_items();
    tree.handle_key(Key::Home);
    let mut visited = vec![tree.focused_item().unwrap()];
    for _ in 1..visible.len() {
        tree.handle_key(Key::ArrowDown);
        visited.push(tree.focused_item().unwrap());
    }
    assert_eq!(visited, visible);

    tree.handle_key(Key::ArrowDown);
    assert_eq!(tree.focused_item(), visible.last().copied());
}

#[test]
fn test_home_and_end_boundaries() {
    let mut tree = forest();
    let visible = tree.visible_items();
    tree.set_focus(visible[3]).unwrap();

    tree.handle_key(Key::End);
    assert_eq!(tree.focused_item(), visible.last().copied());
    tree.handle_key(Key::Home);
    assert_eq!(tree.focused_item(), visible.first().copied());
}

#[test]
fn test_toggle_on_leaf_is_idempotent() {
    let Fixture { mut tree, a, .. } = fixture();
    for _ in 0..3 {
        assert!(!tree.toggle_expansion(a).unwrap());
        assert!(!tree.item(a).unwrap().is_expanded());
    }
}

#[test]
fn test_collapse_all_leaves_nothing_expanded() {
    let mut tree = forest();
    let root = tree.roots()[0];
    tree.collapse_all(root).unwrap();
    for id in tree.hierarchy().depth_first_preorder(root) {
        assert!(!tree.item(id).unwrap().is_expanded());
    }
    assert_eq!(tree.visible_items().len(), 2);
}

#[test]
fn test_expand_all_never_expands_leaves() {
    let mut tree = forest();
    for root in tree.roots().to_vec() {
        tree.expand_all(root).unwrap();
    }
    for (_, item) in tree.hierarchy().iter() {
        assert_eq!(item.is_expanded(), !item.is_leaf());
    }
    assert_eq!(tree.visible_items().len(), tree.len());
}

#[test]
fn test_enter_and_click_select() {
    let Fixture { mut tree, r, b, .. } = fixture();
    tree.handle_key(Key::Enter);
    assert_eq!(tree.selected_item(), Some(r));

    tree.click_header(b).unwrap();
    assert_eq!(tree.selected_item(), Some(b));
    assert_eq!(tree.focused_item(), Some(b));
}

#[test]
fn test_key_names_from_host() {
    let Fixture { mut tree, a, .. } = fixture();
    assert!(tree.handle_key_name("ArrowDown"));
    assert_eq!(tree.focused_item(), Some(a));
    assert!(!tree.handle_key_name("PageDown"));
    assert_eq!(tree.focused_item(), Some(a));
}
