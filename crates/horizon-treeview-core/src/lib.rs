//! Core systems for Horizon Treeview.
//!
//! This crate provides the event plumbing the tree engine is built on:
//!
//! - **Signal/Slot System**: Typed notifications with connect/disconnect
//! - **Timers**: One-shot timers on a virtual clock
//! - **Task Queue**: Deferred work for the next loop turn
//! - **Event Loop**: A single-threaded loop that owns application state and
//!   runs posted and delayed tasks against it
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use horizon_treeview_core::{EventLoop, Signal};
//!
//! let loaded = Signal::<String>::new();
//! loaded.connect(|id| println!("children of {id} loaded"));
//!
//! let mut event_loop = EventLoop::new(loaded);
//! event_loop.dispatch(|_, scheduler| {
//!     scheduler.post_delayed(Duration::from_secs(1), |loaded, _| {
//!         loaded.emit("root".to_string());
//!     });
//! });
//! event_loop.run_until_idle();
//! ```

mod error;
pub mod event_loop;
pub mod logging;
pub mod signal;
mod task;
mod timer;

pub use error::{CoreError, Result};
pub use event_loop::{EventLoop, Scheduler, Task};
pub use logging::PerfSpan;
pub use signal::{ConnectionId, Signal};
pub use task::{TaskId, TaskQueue};
pub use timer::{TimerId, TimerManager};
