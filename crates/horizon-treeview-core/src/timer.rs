//! One-shot timers on a virtual clock.
//!
//! The clock only moves when the owner calls [`TimerManager::advance_to`], which
//! makes deferred completions deterministic and testable without sleeping.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::time::Duration;

use slotmap::{new_key_type, SlotMap};

use crate::error::{CoreError, Result};
use crate::logging::targets;

new_key_type! {
    /// A unique identifier for a timer.
    pub struct TimerId;
}

/// Internal timer data.
#[derive(Debug)]
struct TimerData {
    /// When this timer fires, measured from clock start.
    deadline: Duration,
}

/// An entry in the timer queue (min-heap by deadline, then scheduling order).
#[derive(Debug, Clone, Copy)]
struct TimerQueueEntry {
    id: TimerId,
    deadline: Duration,
    sequence: u64,
}

impl PartialEq for TimerQueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.deadline == other.deadline && self.sequence == other.sequence
    }
}

impl Eq for TimerQueueEntry {}

impl PartialOrd for TimerQueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TimerQueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed: BinaryHeap is a max-heap.
        other
            .deadline
            .cmp(&self.deadline)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

/// Manages pending one-shot timers against a virtual clock.
#[derive(Debug, Default)]
pub struct TimerManager {
    /// Live timers.
    timers: SlotMap<TimerId, TimerData>,
    /// Pending fires; may contain entries for stopped timers.
    queue: BinaryHeap<TimerQueueEntry>,
    /// Current virtual time.
    now: Duration,
    /// Tie-breaker for timers sharing a deadline.
    next_sequence: u64,
}

impl TimerManager {
    /// Create a new timer manager with the clock at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// The current virtual time.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Start a one-shot timer that fires `delay` after the current time.
    pub fn start_one_shot(&mut self, delay: Duration) -> TimerId {
        let deadline = self.now.saturating_add(delay);
        let id = self.timers.insert(TimerData { deadline });
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.queue.push(TimerQueueEntry {
            id,
            deadline,
            sequence,
        });
        tracing::trace!(target: targets::TIMER, ?id, ?deadline, "timer started");
        id
    }

    /// Stop and remove a timer.
    pub fn stop(&mut self, id: TimerId) -> Result<()> {
        match self.timers.remove(id) {
            Some(_) => {
                tracing::trace!(target: targets::TIMER, ?id, "timer stopped");
                Ok(())
            }
            None => Err(CoreError::InvalidTimerId),
        }
    }

    /// Check if a timer is still pending.
    pub fn is_active(&self, id: TimerId) -> bool {
        self.timers.contains_key(id)
    }

    /// Number of pending timers.
    pub fn active_count(&self) -> usize {
        self.timers.len()
    }

    /// Deadline of the earliest pending timer, if any.
    pub fn next_deadline(&mut self) -> Option<Duration> {
        self.discard_stopped();
        self.queue.peek().map(|entry| entry.deadline)
    }

    /// Duration until the next timer fires, if any.
    pub fn time_until_next(&mut self) -> Option<Duration> {
        let now = self.now;
        self.next_deadline()
            .map(|deadline| deadline.saturating_sub(now))
    }

    /// Pop the earliest timer whose deadline is at or before `limit`.
    ///
    /// The clock moves forward to that timer's deadline. Returns `None` once
    /// no pending timer is due by `limit`; the clock is left untouched in that
    /// case so callers can settle it with [`advance_to`](Self::advance_to).
    pub fn pop_due(&mut self, limit: Duration) -> Option<TimerId> {
        self.discard_stopped();
        let entry = *self.queue.peek()?;
        if entry.deadline > limit {
            return None;
        }
        self.queue.pop();
        self.timers.remove(entry.id);
        if entry.deadline > self.now {
            self.now = entry.deadline;
        }
        tracing::trace!(target: targets::TIMER, id = ?entry.id, "timer fired");
        Some(entry.id)
    }

    /// Fire every timer due at or before `target`, in deadline order, and move
    /// the clock to `target`.
    pub fn advance_to(&mut self, target: Duration) -> Vec<TimerId> {
        let mut fired = Vec::new();
        while let Some(id) = self.pop_due(target) {
            fired.push(id);
        }
        if target > self.now {
            self.now = target;
        }
        fired
    }

    fn discard_stopped(&mut self) {
        while let Some(entry) = self.queue.peek() {
            if self.timers.contains_key(entry.id) {
                break;
            }
            self.queue.pop();
        }
    }
}
