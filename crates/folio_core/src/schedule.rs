//! Clock abstraction and deferred task queue.
//!
//! # Responsibility
//! - Provide a millisecond clock that hosts can drive from wall time or from
//!   tests (advanceable manual clock).
//! - Keep deferred tasks ordered by due time with explicit cancellation.
//!
//! # Invariants
//! - Task ids are never reused within one queue.
//! - A cancelled task never fires.
//! - Tasks due at the same instant fire in scheduling order.

use std::cell::Cell;
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::rc::Rc;
use std::time::Instant;

/// Millisecond time source used by deferred work.
pub trait Clock {
    /// Milliseconds since an arbitrary, fixed origin. Never decreases.
    fn now_ms(&self) -> u64;
}

/// Wall clock measured from construction time.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        u64::try_from(self.origin.elapsed().as_millis()).unwrap_or(u64::MAX)
    }
}

/// Manually advanced clock.
///
/// Clones share the same underlying time, so a test can hand one clone to a
/// bus and keep another to move time forward.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<u64>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starting_at(now_ms: u64) -> Self {
        Self {
            now: Rc::new(Cell::new(now_ms)),
        }
    }

    /// Moves time forward by `delta_ms` (saturating).
    pub fn advance(&self, delta_ms: u64) {
        self.now.set(self.now.get().saturating_add(delta_ms));
    }

    /// Jumps to `now_ms`. Earlier values are ignored to keep time monotonic.
    pub fn set(&self, now_ms: u64) {
        if now_ms > self.now.get() {
            self.now.set(now_ms);
        }
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.get()
    }
}

/// Identifier of one scheduled task inside a [`TaskQueue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskId(u64);

impl TaskId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl Display for TaskId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "task-{}", self.0)
    }
}

/// Deferred payloads keyed by due time.
#[derive(Debug)]
pub struct TaskQueue<T> {
    pending: BTreeMap<(u64, TaskId), T>,
    due_by_id: BTreeMap<TaskId, u64>,
    next_id: u64,
}

impl<T> Default for TaskQueue<T> {
    fn default() -> Self {
        Self {
            pending: BTreeMap::new(),
            due_by_id: BTreeMap::new(),
            next_id: 0,
        }
    }
}

impl<T> TaskQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules `payload` to become due at `due_ms`.
    pub fn schedule(&mut self, due_ms: u64, payload: T) -> TaskId {
        self.next_id += 1;
        let id = TaskId(self.next_id);
        self.pending.insert((due_ms, id), payload);
        self.due_by_id.insert(id, due_ms);
        id
    }

    /// Cancels one pending task and returns its payload.
    ///
    /// Returns `None` when the task already fired or was cancelled.
    pub fn cancel(&mut self, id: TaskId) -> Option<T> {
        let due_ms = self.due_by_id.remove(&id)?;
        self.pending.remove(&(due_ms, id))
    }

    pub fn is_pending(&self, id: TaskId) -> bool {
        self.due_by_id.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Due time of the earliest pending task.
    pub fn next_due(&self) -> Option<u64> {
        self.pending.keys().next().map(|(due_ms, _)| *due_ms)
    }

    /// Removes and returns every task due at or before `now_ms`, earliest
    /// first.
    pub fn drain_due(&mut self, now_ms: u64) -> Vec<(TaskId, T)> {
        let mut due = Vec::new();
        while let Some((&(due_ms, id), _)) = self.pending.first_key_value() {
            if due_ms > now_ms {
                break;
            }
            if let Some(payload) = self.pending.remove(&(due_ms, id)) {
                self.due_by_id.remove(&id);
                due.push((id, payload));
            }
        }
        due
    }

    /// Drops every pending task, returning how many were cancelled.
    pub fn clear(&mut self) -> usize {
        let cancelled = self.pending.len();
        self.pending.clear();
        self.due_by_id.clear();
        cancelled
    }
}
