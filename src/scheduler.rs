//! Deferred-callback queue on a virtual clock.
//!
//! The engine is single-threaded and cooperative: every piece of "async" work
//! (staggered image loads, fetch completions, toast auto-dismissal) is a task
//! scheduled for a future instant and dispatched by its owner when the clock
//! reaches it. Tasks are plain data, not closures, so the owner decides what a
//! task means at dispatch time, which is where stale-epoch checks live.
//!
//! Time only moves when the owner drains due tasks with [`Scheduler::pop_due`]
//! and then calls [`Scheduler::settle`], which makes every timeline
//! reproducible in tests.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashSet};
use std::time::Duration;

/// Handle to a scheduled task, usable for [`Scheduler::cancel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

#[derive(Debug)]
struct Entry<T> {
    due: Duration,
    id: TimerId,
    task: T,
}

// Ordering ignores the payload: (due, id) is unique and id preserves
// scheduling order among tasks due at the same instant.
impl<T> PartialEq for Entry<T> {
    fn eq(&self, other: &Self) -> bool {
        (self.due, self.id) == (other.due, other.id)
    }
}

impl<T> Eq for Entry<T> {}

impl<T> PartialOrd for Entry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Entry<T> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (self.due, self.id).cmp(&(other.due, other.id))
    }
}

/// Min-queue of tasks keyed by due time.
#[derive(Debug)]
pub struct Scheduler<T> {
    now: Duration,
    next_id: u64,
    queue: BinaryHeap<Reverse<Entry<T>>>,
    cancelled: HashSet<TimerId>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self {
            now: Duration::ZERO,
            next_id: 0,
            queue: BinaryHeap::new(),
            cancelled: HashSet::new(),
        }
    }
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time since the scheduler was created.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Schedule `task` to become due `delay` from now.
    pub fn schedule(&mut self, delay: Duration, task: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.queue.push(Reverse(Entry {
            due: self.now + delay,
            id,
            task,
        }));
        id
    }

    /// Drop a task before it fires. Returns `false` if it already fired or was
    /// never scheduled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let pending =
            !self.cancelled.contains(&id) && self.queue.iter().any(|Reverse(e)| e.id == id);
        if pending {
            self.cancelled.insert(id);
        }
        pending
    }

    /// Pop the earliest task due at or before `deadline`, moving the clock to
    /// its due time.
    pub fn pop_due(&mut self, deadline: Duration) -> Option<T> {
        loop {
            let due = self.queue.peek().map(|Reverse(e)| e.due)?;
            if due > deadline {
                return None;
            }
            let Reverse(entry) = self.queue.pop()?;
            if self.cancelled.remove(&entry.id) {
                continue;
            }
            self.now = self.now.max(entry.due);
            return Some(entry.task);
        }
    }

    /// Move the clock to `deadline` once nothing else is due before it.
    pub fn settle(&mut self, deadline: Duration) {
        self.now = self.now.max(deadline);
    }

    /// Due time of the next live task.
    pub fn next_due(&self) -> Option<Duration> {
        self.queue
            .iter()
            .filter(|Reverse(e)| !self.cancelled.contains(&e.id))
            .map(|Reverse(e)| e.due)
            .min()
    }

    /// Number of live (not cancelled) tasks still queued.
    pub fn pending(&self) -> usize {
        self.queue
            .iter()
            .filter(|Reverse(e)| !self.cancelled.contains(&e.id))
            .count()
    }

    pub fn is_idle(&self) -> bool {
        self.pending() == 0
    }
}
