//! Single-threaded event loop with a virtual clock.
//!
//! [`EventLoop<S>`] owns an application state `S` and a [`Scheduler<S>`].
//! Input is delivered with [`EventLoop::dispatch`]; handlers may post
//! immediate tasks or delayed completions, which run on later turns of the
//! loop with exclusive access to the state. Nothing runs concurrently, so
//! state needs no locking.
//!
//! Time only advances through [`EventLoop::advance`] or
//! [`EventLoop::run_until_idle`]:
//!
//! ```
//! use std::time::Duration;
//! use horizon_treeview_core::EventLoop;
//!
//! let mut event_loop = EventLoop::new(Vec::<&str>::new());
//! event_loop.dispatch(|log, scheduler| {
//!     log.push("input");
//!     scheduler.post_delayed(Duration::from_millis(500), |log, _| log.push("loaded"));
//! });
//!
//! event_loop.advance(Duration::from_millis(499));
//! assert_eq!(event_loop.state(), &vec!["input"]);
//! event_loop.advance(Duration::from_millis(1));
//! assert_eq!(event_loop.state(), &vec!["input", "loaded"]);
//! ```

use std::time::Duration;

use slotmap::SecondaryMap;

use crate::error::Result;
use crate::logging::targets;
use crate::task::{TaskId, TaskQueue};
use crate::timer::{TimerId, TimerManager};

/// A unit of deferred work for an event loop over state `S`.
pub type Task<S> = Box<dyn FnOnce(&mut S, &mut Scheduler<S>)>;

/// Queues immediate tasks and delayed completions for an [`EventLoop<S>`].
pub struct Scheduler<S> {
    timers: TimerManager,
    delayed: SecondaryMap<TimerId, Task<S>>,
    tasks: TaskQueue<Task<S>>,
}

impl<S> Default for Scheduler<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> Scheduler<S> {
    /// Create an empty scheduler with the clock at zero.
    pub fn new() -> Self {
        Self {
            timers: TimerManager::new(),
            delayed: SecondaryMap::new(),
            tasks: TaskQueue::new(),
        }
    }

    /// The current virtual time.
    pub fn now(&self) -> Duration {
        self.timers.now()
    }

    /// Post a task to run on the next turn of the loop.
    pub fn post<F>(&mut self, task: F) -> TaskId
    where
        F: FnOnce(&mut S, &mut Scheduler<S>) + 'static,
    {
        self.tasks.post(Box::new(task))
    }

    /// Post a task to run once `delay` has elapsed.
    pub fn post_delayed<F>(&mut self, delay: Duration, task: F) -> TimerId
    where
        F: FnOnce(&mut S, &mut Scheduler<S>) + 'static,
    {
        let id = self.timers.start_one_shot(delay);
        self.delayed.insert(id, Box::new(task));
        id
    }

    /// Cancel a delayed task before it fires.
    pub fn cancel_timer(&mut self, id: TimerId) -> Result<()> {
        self.timers.stop(id)?;
        self.delayed.remove(id);
        Ok(())
    }

    /// Cancel an immediate task before it runs.
    pub fn cancel_task(&mut self, id: TaskId) -> Result<()> {
        self.tasks.cancel(id)
    }

    /// Whether a delayed task is still waiting to fire.
    pub fn is_timer_pending(&self, id: TimerId) -> bool {
        self.timers.is_active(id)
    }

    /// Number of immediate tasks waiting to run.
    pub fn pending_tasks(&self) -> usize {
        self.tasks.pending_count()
    }

    /// Number of delayed tasks waiting to fire.
    pub fn pending_timers(&self) -> usize {
        self.timers.active_count()
    }
}

impl<S> std::fmt::Debug for Scheduler<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduler")
            .field("now", &self.timers.now())
            .field("tasks", &self.tasks.pending_count())
            .field("timers", &self.timers.active_count())
            .finish()
    }
}

/// Owns application state and drives its scheduled work.
pub struct EventLoop<S> {
    state: S,
    scheduler: Scheduler<S>,
}

impl<S> EventLoop<S> {
    /// Create a loop around `state`.
    pub fn new(state: S) -> Self {
        Self {
            state,
            scheduler: Scheduler::new(),
        }
    }

    /// Shared access to the state.
    pub fn state(&self) -> &S {
        &self.state
    }

    /// Exclusive access to the state, outside of any task.
    pub fn state_mut(&mut self) -> &mut S {
        &mut self.state
    }

    /// Consume the loop, returning the state. Pending work is dropped.
    pub fn into_state(self) -> S {
        self.state
    }

    /// The scheduler, for inspection.
    pub fn scheduler(&self) -> &Scheduler<S> {
        &self.scheduler
    }

    /// The current virtual time.
    pub fn now(&self) -> Duration {
        self.scheduler.now()
    }

    /// Deliver an input to the state, then run any immediate tasks it posted.
    pub fn dispatch<F, R>(&mut self, handler: F) -> R
    where
        F: FnOnce(&mut S, &mut Scheduler<S>) -> R,
    {
        let result = handler(&mut self.state, &mut self.scheduler);
        self.run_pending();
        result
    }

    /// Run immediate tasks until the queue is empty.
    ///
    /// Returns the number of tasks executed.
    pub fn run_pending(&mut self) -> usize {
        let mut count = 0;
        while let Some(task) = self.scheduler.tasks.pop() {
            task(&mut self.state, &mut self.scheduler);
            count += 1;
        }
        if count > 0 {
            tracing::trace!(target: targets::TASK, count, "processed tasks");
        }
        count
    }

    /// Move the clock forward by `by`, firing due timers in deadline order.
    ///
    /// Immediate tasks posted by a fired timer run before the next timer
    /// fires. Returns the number of tasks and timers executed.
    #[tracing::instrument(skip(self), target = "horizon_treeview_core::event_loop", level = "trace")]
    pub fn advance(&mut self, by: Duration) -> usize {
        let target = self.scheduler.now().saturating_add(by);
        self.run_until(target)
    }

    /// Run all pending work, jumping the clock from deadline to deadline
    /// until no tasks or timers remain.
    ///
    /// Work that keeps rescheduling itself makes this loop forever.
    pub fn run_until_idle(&mut self) -> usize {
        let mut count = self.run_pending();
        while let Some(deadline) = self.scheduler.timers.next_deadline() {
            count += self.run_until(deadline);
        }
        count
    }

    fn run_until(&mut self, target: Duration) -> usize {
        let mut count = self.run_pending();
        while let Some(id) = self.scheduler.timers.pop_due(target) {
            if let Some(task) = self.scheduler.delayed.remove(id) {
                tracing::trace!(target: targets::EVENT_LOOP, ?id, "running delayed task");
                task(&mut self.state, &mut self.scheduler);
                count += 1;
            }
            count += self.run_pending();
        }
        self.scheduler.timers.advance_to(target);
        count
    }
}

impl<S: std::fmt::Debug> std::fmt::Debug for EventLoop<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventLoop")
            .field("state", &self.state)
            .field("scheduler", &self.scheduler)
            .finish()
    }
}
