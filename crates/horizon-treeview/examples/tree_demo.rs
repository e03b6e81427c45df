//! Horizon Treeview Demo
//!
//! Drives two lazily loaded trees through scripted keyboard input on a
//! virtual clock and prints the tree after every step:
//! - A repository tree whose folders load sequences
//! - A root that only appears two seconds after start-up
//!
//! Run with: cargo run -p horizon-treeview --example tree_demo
//! Set RUST_LOG=horizon_treeview=debug for the focus and load trace.

use std::time::Duration;

use horizon_treeview::host::{ChildSource, LazyTreeHost, Node, NodeKind, NodeStore, PairSource, VaultSource};
use horizon_treeview::logging::{TreeDump, TreeFormatOptions};
use horizon_treeview::{Key, LoaderConfig};
use horizon_treeview_core::EventLoop;
use tracing_subscriber::EnvFilter;

const LOAD_DELAY: Duration = Duration::from_millis(1000);

fn print_step<S: ChildSource + 'static>(
    event_loop: &EventLoop<LazyTreeHost<S>>,
    dump: &TreeDump,
    label: &str,
) {
    println!("[t={:>5}ms] {label}", event_loop.now().as_millis());
    for line in dump.format(event_loop.state().tree()).lines() {
        println!("    {line}");
    }
}

fn vault_demo(dump: &TreeDump) {
    println!("== Luna Repository ==");
    let store = NodeStore::with_roots([Node::new("/", "Luna Repository", NodeKind::Root)]);
    let host = LazyTreeHost::new(store, VaultSource::new(), LoaderConfig::default());
    let mut event_loop = EventLoop::new(host);

    event_loop.dispatch(|host, scheduler| host.mount(scheduler));
    print_step(&event_loop, dump, "mounted");

    let script = [
        Key::ArrowRight,
        Key::ArrowDown,
        Key::ArrowRight,
        Key::ArrowDown,
        Key::ArrowDown,
        Key::Enter,
        Key::End,
        Key::Home,
        Key::ArrowLeft,
    ];
    for key in script {
        event_loop.dispatch(|host, scheduler| host.handle_key(key, scheduler));
        print_step(&event_loop, dump, &format!("key {key}"));
        if event_loop.state().pending_loads() > 0 {
            event_loop.advance(LOAD_DELAY);
            print_step(&event_loop, dump, "load completed");
        }
    }

    if let Some(node) = event_loop.state().focused_node() {
        println!("focused: {} (context menu shown: {})", node.header, node.show_context_menu);
    }
}

fn delayed_root_demo(dump: &TreeDump) {
    println!("== Delayed root ==");
    let host = LazyTreeHost::new(NodeStore::new(), PairSource::new(), LoaderConfig::default());
    let mut event_loop = EventLoop::new(host);

    event_loop.dispatch(|host, scheduler| {
        host.mount(scheduler);
        scheduler.post_delayed(Duration::from_secs(2), |host, scheduler| {
            host.insert_root(
                Node::new("lazy", "Root3 (LazyLoaded)", NodeKind::Root),
                scheduler,
            );
        });
    });
    print_step(&event_loop, dump, "mounted (empty)");

    event_loop.advance(Duration::from_secs(2));
    event_loop.dispatch(|host, scheduler| host.focus_in(scheduler));
    print_step(&event_loop, dump, "root arrived");

    event_loop.dispatch(|host, scheduler| host.handle_key(Key::ArrowRight, scheduler));
    print_step(&event_loop, dump, "expanding");

    let executed = event_loop.run_until_idle();
    print_step(&event_loop, dump, &format!("idle after {executed} task(s)"));
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let dump = TreeDump::with_options(TreeFormatOptions::visible());
    vault_demo(&dump);
    println!();
    delayed_root_demo(&dump);
}
