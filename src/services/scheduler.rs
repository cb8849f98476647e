//! Virtual-time timer queue with one cancellable task per key.
//!
//! Scheduling for a key that already has a pending task replaces it, so a
//! superseded task can never fire. Time only moves when the owner pops due
//! tasks or advances the clock.

use std::collections::HashMap;
use std::hash::Hash;
use std::time::Duration;

/// Identifies one scheduled task. Handles are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskHandle(u64);

#[derive(Debug, Clone, Copy)]
struct ScheduledTask {
    due: Duration,
    handle: TaskHandle,
}

#[derive(Debug)]
pub struct Scheduler<K> {
    now: Duration,
    next_token: u64,
    tasks: HashMap<K, ScheduledTask>,
}

impl<K: Eq + Hash + Clone> Scheduler<K> {
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            next_token: 0,
            tasks: HashMap::new(),
        }
    }

    /// Current virtual time since the scheduler was created.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Schedules a task for `key` after `delay`, cancelling any pending one.
    pub fn schedule(&mut self, key: K, delay: Duration) -> TaskHandle {
        self.next_token += 1;
        let handle = TaskHandle(self.next_token);
        self.tasks.insert(
            key,
            ScheduledTask {
                due: self.now + delay,
                handle,
            },
        );
        handle
    }

    /// Cancels the pending task for `key`. Returns whether one existed.
    pub fn cancel(&mut self, key: &K) -> bool {
        self.tasks.remove(key).is_some()
    }

    pub fn is_scheduled(&self, key: &K) -> bool {
        self.tasks.contains_key(key)
    }

    /// Earliest pending due time.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.tasks.values().map(|t| t.due).min()
    }

    /// Removes and returns the earliest task due at or before `until`,
    /// moving the clock to its due time. Ties fire in scheduling order.
    pub fn pop_due(&mut self, until: Duration) -> Option<(K, TaskHandle)> {
        let key = self
            .tasks
            .iter()
            .filter(|(_, task)| task.due <= until)
            .min_by_key(|(_, task)| (task.due, task.handle.0))
            .map(|(key, _)| key.clone())?;
        let task = self.tasks.remove(&key)?;
        if task.due > self.now {
            self.now = task.due;
        }
        Some((key, task.handle))
    }

    /// Moves the clock forward to `to`; never backwards.
    pub fn advance_clock(&mut self, to: Duration) {
        if to > self.now {
            self.now = to;
        }
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

impl<K: Eq + Hash + Clone> Default for Scheduler<K> {
    fn default() -> Self {
        Self::new()
    }
}
