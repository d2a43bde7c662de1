//! # Pause Gate
//!
//! Owns the single "suspended" flag of a pausable component.
//!
//! ## States
//!
//! ```text
//! Running ──pause()──▶ Suspended ──unpause()──▶ Running
//! ```
//!
//! Transitions strictly alternate. `pause()` while suspended fails with
//! `AlreadyPaused`; `unpause()` while running fails with `NotPaused`. A
//! rejected transition neither changes the flag nor emits an event.
//!
//! The gate performs no identity checks. Whoever calls `pause()` has
//! already been approved by an authorization collaborator; see
//! [`PauseController`](crate::PauseController).

use std::cell::Cell;

use serde::{Deserialize, Serialize};

use bulwark_core::{AccountId, GuardError};

use crate::events::{EventSink, PauseEvent};

/// Snapshot of a gate's flag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PauseState {
    /// Whether normal operation is suspended.
    pub suspended: bool,
}

/// The suspended flag of one component, mutated only through
/// [`pause`](Self::pause) and [`unpause`](Self::unpause).
#[derive(Debug, Default)]
pub struct PauseGate {
    suspended: Cell<bool>,
}

impl PauseGate {
    /// A gate in the running (not suspended) state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the component is suspended. Pure query.
    pub fn paused(&self) -> bool {
        self.suspended.get()
    }

    /// Current state as a value.
    pub fn state(&self) -> PauseState {
        PauseState {
            suspended: self.paused(),
        }
    }

    /// Suspend the component and emit `Paused{account}` to `sink`.
    ///
    /// # Errors
    ///
    /// [`GuardError::AlreadyPaused`] if already suspended.
    pub fn pause<S: EventSink + ?Sized>(
        &self,
        account: &AccountId,
        sink: &S,
    ) -> Result<PauseEvent, GuardError> {
        if self.paused() {
            return Err(GuardError::AlreadyPaused);
        }
        self.suspended.set(true);
        let event = PauseEvent::paused(account.clone());
        tracing::info!(account = %account, "paused");
        sink.emit(&event);
        Ok(event)
    }

    /// Resume the component and emit `Unpaused{account}` to `sink`.
    ///
    /// # Errors
    ///
    /// [`GuardError::NotPaused`] if not suspended.
    pub fn unpause<S: EventSink + ?Sized>(
        &self,
        account: &AccountId,
        sink: &S,
    ) -> Result<PauseEvent, GuardError> {
        if !self.paused() {
            return Err(GuardError::NotPaused);
        }
        self.suspended.set(false);
        let event = PauseEvent::unpaused(account.clone());
        tracing::info!(account = %account, "unpaused");
        sink.emit(&event);
        Ok(event)
    }

    /// `whenNotPaused` check for `operation`. Never mutates.
    pub fn require_not_paused(&self, operation: &str) -> Result<(), GuardError> {
        if self.paused() {
            tracing::warn!(operation, "operation rejected while paused");
            return Err(GuardError::OperationPaused {
                operation: operation.to_string(),
            });
        }
        Ok(())
    }

    /// `whenPaused` check for `operation`. Never mutates.
    pub fn require_paused(&self, operation: &str) -> Result<(), GuardError> {
        if !self.paused() {
            tracing::warn!(operation, "operation rejected while not paused");
            return Err(GuardError::OperationNotPaused {
                operation: operation.to_string(),
            });
        }
        Ok(())
    }
}
