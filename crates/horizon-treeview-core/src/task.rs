//! Deferred task queue.
//!
//! Tasks are closures posted to run on the next turn of the event loop. They
//! receive the loop state and its scheduler, so a task may post follow-up
//! work.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::{CoreError, Result};

/// A unique identifier for a deferred task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(u64);

impl TaskId {
    /// Get the raw u64 value of this task ID.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

/// Global counter for generating unique task IDs.
static NEXT_TASK_ID: AtomicU64 = AtomicU64::new(1);

fn next_task_id() -> TaskId {
    TaskId(NEXT_TASK_ID.fetch_add(1, Ordering::Relaxed))
}

/// FIFO queue of pending work items of type `T`.
pub struct TaskQueue<T> {
    tasks: VecDeque<(TaskId, T)>,
}

impl<T> Default for TaskQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TaskQueue<T> {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self {
            tasks: VecDeque::new(),
        }
    }

    /// Append a task; returns its ID.
    pub fn post(&mut self, task: T) -> TaskId {
        let id = next_task_id();
        self.tasks.push_back((id, task));
        id
    }

    /// Remove a pending task.
    pub fn cancel(&mut self, id: TaskId) -> Result<()> {
        let pos = self
            .tasks
            .iter()
            .position(|(task_id, _)| *task_id == id)
            .ok_or(CoreError::TaskNotFound)?;
        self.tasks.remove(pos);
        Ok(())
    }

    /// Take the oldest pending task.
    pub fn pop(&mut self) -> Option<T> {
        self.tasks.pop_front().map(|(_, task)| task)
    }

    /// Check if there are any pending tasks.
    pub fn has_pending(&self) -> bool {
        !self.tasks.is_empty()
    }

    /// Get the number of pending tasks.
    pub fn pending_count(&self) -> usize {
        self.tasks.len()
    }
}

impl<T> std::fmt::Debug for TaskQueue<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskQueue")
            .field("pending", &self.tasks.len())
            .finish()
    }
}
