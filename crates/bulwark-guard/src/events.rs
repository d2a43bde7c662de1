//! # Pause Events and Sinks
//!
//! A [`PauseGate`](crate::PauseGate) reports every successful transition to
//! an [`EventSink`]. Delivery is the sink's concern; the gate only promises
//! that an event is emitted once per successful transition and never for a
//! rejected one.

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use bulwark_core::{AccountId, EventId, Timestamp};

/// Which transition an event reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PauseEventKind {
    /// The component was suspended.
    Paused,
    /// The component was resumed.
    Unpaused,
}

impl std::fmt::Display for PauseEventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Paused => "Paused",
            Self::Unpaused => "Unpaused",
        };
        f.write_str(s)
    }
}

/// A pause transition notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PauseEvent {
    /// Unique event identifier.
    pub id: EventId,
    /// The transition that occurred.
    pub kind: PauseEventKind,
    /// The identity that initiated the transition.
    pub account: AccountId,
    /// When the transition occurred.
    pub at: Timestamp,
}

impl PauseEvent {
    /// `Paused{account}`.
    pub fn paused(account: AccountId) -> Self {
        Self::new(PauseEventKind::Paused, account)
    }

    /// `Unpaused{account}`.
    pub fn unpaused(account: AccountId) -> Self {
        Self::new(PauseEventKind::Unpaused, account)
    }

    fn new(kind: PauseEventKind, account: AccountId) -> Self {
        Self {
            id: EventId::new(),
            kind,
            account,
            at: Timestamp::now(),
        }
    }
}

/// Receiver of pause transition notifications.
pub trait EventSink {
    /// Deliver one event.
    fn emit(&self, event: &PauseEvent);
}

/// Discards every event.
impl EventSink for () {
    fn emit(&self, _event: &PauseEvent) {}
}

impl<T: EventSink + ?Sized> EventSink for &T {
    fn emit(&self, event: &PauseEvent) {
        (**self).emit(event)
    }
}

impl<T: EventSink + ?Sized> EventSink for Box<T> {
    fn emit(&self, event: &PauseEvent) {
        (**self).emit(event)
    }
}

impl<T: EventSink + ?Sized> EventSink for Rc<T> {
    fn emit(&self, event: &PauseEvent) {
        (**self).emit(event)
    }
}

/// Keeps every emitted event in memory, in emission order.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: RefCell<Vec<PauseEvent>>,
}

impl RecordingSink {
    /// An empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// A copy of all events recorded so far.
    pub fn events(&self) -> Vec<PauseEvent> {
        self.events.borrow().clone()
    }

    /// Kinds of all events recorded so far.
    pub fn kinds(&self) -> Vec<PauseEventKind> {
        self.events.borrow().iter().map(|e| e.kind).collect()
    }

    /// Number of recorded events.
    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }

    /// Forget all recorded events.
    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }
}

impl EventSink for RecordingSink {
    fn emit(&self, event: &PauseEvent) {
        self.events.borrow_mut().push(event.clone());
    }
}

/// Forwards events to `tracing` at `info` level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&self, event: &PauseEvent) {
        tracing::info!(
            event_id = %event.id,
            kind = %event.kind,
            account = %event.account,
            at = %event.at,
            "pause transition"
        );
    }
}
