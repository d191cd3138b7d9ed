//! Notification bus with timed removal.
//!
//! # Responsibility
//! - Own the ordered list of short-lived notification entries.
//! - Fan a "something changed" signal out to registered listeners.
//! - Remove each entry after a fixed delay through a cancellable task.
//!
//! # Invariants
//! - Notification ids strictly increase for the lifetime of one bus.
//! - Listeners run only after internal borrows are released, so a listener
//!   may publish, subscribe or unsubscribe re-entrantly.
//! - One failing listener never prevents the remaining listeners from running.
//! - A closed bus rejects publishes and holds no listeners or pending tasks.

use crate::logging::sanitize_message;
use crate::schedule::{Clock, TaskId, TaskQueue};
use log::{debug, error, warn};
use serde::Serialize;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::rc::{Rc, Weak};

/// Default lifetime of one notification entry.
pub const DEFAULT_NOTIFICATION_TTL_MS: u64 = 3_000;

const MAX_LOGGED_ERROR_CHARS: usize = 160;

/// Stable identifier of one published notification.
///
/// The sequence number makes ids unique even when two publishes share a
/// millisecond; `issued_at_ms` is kept for display ordering and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct NotificationId {
    seq: u64,
    issued_at_ms: u64,
}

impl NotificationId {
    pub fn seq(self) -> u64 {
        self.seq
    }

    pub fn issued_at_ms(self) -> u64 {
        self.issued_at_ms
    }
}

impl Display for NotificationId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.issued_at_ms, self.seq)
    }
}

/// One user-facing acknowledgment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationEntry {
    pub id: NotificationId,
    pub title: String,
    pub description: String,
}

/// Identifier of one registered listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListenerId(u64);

/// Failure reported by a listener callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListenerError {
    message: String,
}

impl ListenerError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for ListenerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "listener failed: {}", self.message)
    }
}

impl Error for ListenerError {}

/// Bus operation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyError {
    /// The bus was shut down.
    Closed,
}

impl Display for NotifyError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Closed => write!(f, "notification bus is closed"),
        }
    }
}

impl Error for NotifyError {}

type Listener = Rc<dyn Fn() -> Result<(), ListenerError>>;

struct BusState {
    entries: Vec<NotificationEntry>,
    listeners: BTreeMap<ListenerId, Listener>,
    removals: TaskQueue<NotificationId>,
    removal_by_entry: BTreeMap<NotificationId, TaskId>,
    next_seq: u64,
    next_listener: u64,
    closed: bool,
}

struct BusInner {
    clock: Rc<dyn Clock>,
    ttl_ms: u64,
    state: RefCell<BusState>,
}

/// Shared notification list plus listener fan-out.
///
/// Cloning yields another handle to the same bus. Construct one instance at
/// startup and pass it to every component that publishes or displays
/// notifications.
#[derive(Clone)]
pub struct NotificationBus {
    inner: Rc<BusInner>,
}

/// Result of a successful publish.
#[derive(Debug, Clone)]
pub struct PublishReceipt {
    pub id: NotificationId,
    pub removal: RemovalHandle,
}

/// Cancellation token for one pending removal.
#[derive(Clone)]
pub struct RemovalHandle {
    task: TaskId,
    entry: NotificationId,
    bus: Weak<BusInner>,
}

/// Registration handle returned by [`NotificationBus::subscribe`].
#[derive(Clone)]
pub struct Subscription {
    id: ListenerId,
    bus: Weak<BusInner>,
}

impl NotificationBus {
    /// Creates a bus whose entries live for `ttl_ms` after publish.
    pub fn new(clock: Rc<dyn Clock>, ttl_ms: u64) -> Self {
        Self {
            inner: Rc::new(BusInner {
                clock,
                ttl_ms,
                state: RefCell::new(BusState {
                    entries: Vec::new(),
                    listeners: BTreeMap::new(),
                    removals: TaskQueue::new(),
                    removal_by_entry: BTreeMap::new(),
                    next_seq: 0,
                    next_listener: 0,
                    closed: false,
                }),
            }),
        }
    }

    /// Creates a bus with [`DEFAULT_NOTIFICATION_TTL_MS`].
    pub fn with_default_ttl(clock: Rc<dyn Clock>) -> Self {
        Self::new(clock, DEFAULT_NOTIFICATION_TTL_MS)
    }

    pub fn ttl_ms(&self) -> u64 {
        self.inner.ttl_ms
    }

    /// Appends one entry, notifies listeners and schedules its removal.
    ///
    /// # Errors
    /// - Returns [`NotifyError::Closed`] after [`NotificationBus::shutdown`].
    pub fn publish(
        &self,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<PublishReceipt, NotifyError> {
        let now_ms = self.inner.clock.now_ms();
        let (id, task, pending) = {
            let mut state = self.inner.state.borrow_mut();
            if state.closed {
                return Err(NotifyError::Closed);
            }
            state.next_seq += 1;
            let id = NotificationId {
                seq: state.next_seq,
                issued_at_ms: now_ms,
            };
            state.entries.push(NotificationEntry {
                id,
                title: title.into(),
                description: description.into(),
            });
            let task = state
                .removals
                .schedule(now_ms.saturating_add(self.inner.ttl_ms), id);
            state.removal_by_entry.insert(id, task);
            (id, task, state.entries.len())
        };

        debug!(
            "event=notification_publish module=notify status=ok id={} visible={}",
            id, pending
        );
        self.fan_out();

        Ok(PublishReceipt {
            id,
            removal: RemovalHandle {
                task,
                entry: id,
                bus: Rc::downgrade(&self.inner),
            },
        })
    }

    /// Registers a change listener.
    ///
    /// Listeners receive no payload; they re-read [`NotificationBus::entries`].
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn() -> Result<(), ListenerError> + 'static,
    {
        let mut state = self.inner.state.borrow_mut();
        state.next_listener += 1;
        let id = ListenerId(state.next_listener);
        if !state.closed {
            state.listeners.insert(id, Rc::new(listener));
        }
        Subscription {
            id,
            bus: Rc::downgrade(&self.inner),
        }
    }

    /// Removes one listener. Returns `false` when it was not registered.
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        self.inner.state.borrow_mut().listeners.remove(&id).is_some()
    }

    /// Snapshot of the visible entries in publish order.
    pub fn entries(&self) -> Vec<NotificationEntry> {
        self.inner.state.borrow().entries.clone()
    }

    pub fn len(&self) -> usize {
        self.inner.state.borrow().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.state.borrow().entries.is_empty()
    }

    pub fn listener_count(&self) -> usize {
        self.inner.state.borrow().listeners.len()
    }

    pub fn pending_removals(&self) -> usize {
        self.inner.state.borrow().removals.len()
    }

    /// Due time of the next scheduled removal, for hosts that arm a timer.
    pub fn next_removal_due_ms(&self) -> Option<u64> {
        self.inner.state.borrow().removals.next_due()
    }

    pub fn is_closed(&self) -> bool {
        self.inner.state.borrow().closed
    }

    /// Fires every removal that is due according to the bus clock.
    ///
    /// Listeners are notified once per removed entry. Returns the number of
    /// entries removed.
    pub fn poll(&self) -> usize {
        let now_ms = self.inner.clock.now_ms();
        let removed = {
            let mut state = self.inner.state.borrow_mut();
            let due = state.removals.drain_due(now_ms);
            let mut removed = 0;
            for (_, entry_id) in due {
                state.removal_by_entry.remove(&entry_id);
                if remove_entry(&mut state.entries, entry_id) {
                    removed += 1;
                }
            }
            removed
        };

        if removed > 0 {
            debug!(
                "event=notification_expire module=notify status=ok removed={} now_ms={}",
                removed, now_ms
            );
        }
        for _ in 0..removed {
            self.fan_out();
        }
        removed
    }

    /// Removes one entry immediately and cancels its pending removal.
    pub fn dismiss(&self, id: NotificationId) -> bool {
        let removed = {
            let mut state = self.inner.state.borrow_mut();
            if let Some(task) = state.removal_by_entry.remove(&id) {
                state.removals.cancel(task);
            }
            remove_entry(&mut state.entries, id)
        };
        if removed {
            self.fan_out();
        }
        removed
    }

    /// Cancels pending removals, drops listeners and entries, and closes the
    /// bus. Returns the number of cancelled removals. Idempotent.
    pub fn shutdown(&self) -> usize {
        let mut state = self.inner.state.borrow_mut();
        if state.closed {
            return 0;
        }
        let cancelled = state.removals.clear();
        state.removal_by_entry.clear();
        state.listeners.clear();
        state.entries.clear();
        state.closed = true;
        debug!(
            "event=notification_shutdown module=notify status=ok cancelled={}",
            cancelled
        );
        cancelled
    }

    fn fan_out(&self) {
        let snapshot: Vec<(ListenerId, Listener)> = self
            .inner
            .state
            .borrow()
            .listeners
            .iter()
            .map(|(id, listener)| (*id, Rc::clone(listener)))
            .collect();

        for (id, listener) in snapshot {
            // Skip listeners removed by an earlier listener in this round.
            if !self.inner.state.borrow().listeners.contains_key(&id) {
                continue;
            }
            match catch_unwind(AssertUnwindSafe(|| (*listener)())) {
                Ok(Ok(())) => {}
                Ok(Err(err)) => warn!(
                    "event=listener_failed module=notify status=error listener={} error={}",
                    id.0,
                    sanitize_message(err.message(), MAX_LOGGED_ERROR_CHARS)
                ),
                Err(_) => error!(
                    "event=listener_panicked module=notify status=error listener={}",
                    id.0
                ),
            }
        }
    }
}

impl Debug for NotificationBus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.state.borrow();
        f.debug_struct("NotificationBus")
            .field("ttl_ms", &self.inner.ttl_ms)
            .field("entries", &state.entries.len())
            .field("listeners", &state.listeners.len())
            .field("pending_removals", &state.removals.len())
            .field("closed", &state.closed)
            .finish()
    }
}

impl RemovalHandle {
    pub fn entry(&self) -> NotificationId {
        self.entry
    }

    /// Cancels the scheduled removal. The entry stays visible until it is
    /// dismissed or the bus shuts down.
    ///
    /// Returns `false` when the removal already fired, was cancelled, or the
    /// bus is gone.
    pub fn cancel(&self) -> bool {
        let Some(bus) = self.bus.upgrade() else {
            return false;
        };
        let mut state = bus.state.borrow_mut();
        if state.removals.cancel(self.task).is_none() {
            return false;
        }
        state.removal_by_entry.remove(&self.entry);
        true
    }

    pub fn is_pending(&self) -> bool {
        self.bus
            .upgrade()
            .map(|bus| bus.state.borrow().removals.is_pending(self.task))
            .unwrap_or(false)
    }
}

impl Debug for RemovalHandle {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemovalHandle")
            .field("task", &self.task)
            .field("entry", &self.entry)
            .finish()
    }
}

impl Subscription {
    pub fn id(&self) -> ListenerId {
        self.id
    }

    /// Removes this listener. Returns `false` when already removed or the bus
    /// is gone.
    pub fn unsubscribe(&self) -> bool {
        self.bus
            .upgrade()
            .map(|bus| bus.state.borrow_mut().listeners.remove(&self.id).is_some())
            .unwrap_or(false)
    }
}

impl Debug for Subscription {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

fn remove_entry(entries: &mut Vec<NotificationEntry>, id: NotificationId) -> bool {
    let before = entries.len();
    entries.retain(|entry| entry.id != id);
    entries.len() != before
}
