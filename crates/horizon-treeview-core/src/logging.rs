//! Tracing integration.
//!
//! Horizon Treeview uses the `tracing` crate for instrumentation. Nothing is
//! printed unless the application installs a subscriber:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("horizon_treeview=debug,horizon_treeview_core=trace")
//!     .init();
//! ```

/// Target names for log filtering.
pub mod targets {
    /// Core crate target.
    pub const CORE: &str = "horizon_treeview_core";
    /// Event loop target.
    pub const EVENT_LOOP: &str = "horizon_treeview_core::event_loop";
    /// Timer target.
    pub const TIMER: &str = "horizon_treeview_core::timer";
    /// Task queue target.
    pub const TASK: &str = "horizon_treeview_core::task";
    /// Signal/slot target.
    pub const SIGNAL: &str = "horizon_treeview_core::signal";
}

/// A guard that keeps a tracing span entered until dropped.
///
/// Useful for timing a block of work such as a re-projection pass.
#[derive(Debug)]
pub struct PerfSpan {
    _span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Enter a new performance span for `operation`.
    pub fn new(operation: &'static str) -> Self {
        let span = tracing::debug_span!(target: "horizon_treeview::perf", "perf", operation);
        Self {
            _span: span.entered(),
        }
    }
}
