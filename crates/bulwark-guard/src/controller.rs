//! # Pause Controller
//!
//! Wires a [`PauseGate`] to its collaborators: an [`Authorizer`] that
//! approves the caller, and an [`EventSink`] that hears about transitions.
//!
//! ```text
//! caller ──▶ authorize ──▶ gate transition ──▶ emit event
//! ```
//!
//! A refusal at any step leaves the gate untouched and emits nothing.

use bulwark_core::{AccountId, GuardError};

use crate::auth::{Action, Authorizer};
use crate::events::{EventSink, PauseEvent};
use crate::pause::PauseGate;

/// Authorized access to a component's pause gate.
#[derive(Debug)]
pub struct PauseController<A, S> {
    gate: PauseGate,
    authorizer: A,
    sink: S,
}

impl<A: Authorizer, S: EventSink> PauseController<A, S> {
    /// A running gate guarded by `authorizer`, reporting to `sink`.
    pub fn new(authorizer: A, sink: S) -> Self {
        Self {
            gate: PauseGate::new(),
            authorizer,
            sink,
        }
    }

    /// Suspend on behalf of `caller`.
    ///
    /// # Errors
    ///
    /// `Unauthorized` from the authorizer, or `AlreadyPaused`.
    pub fn pause(&self, caller: &AccountId) -> Result<PauseEvent, GuardError> {
        self.authorizer.authorize(caller, Action::Pause)?;
        self.gate.pause(caller, &self.sink)
    }

    /// Resume on behalf of `caller`.
    ///
    /// # Errors
    ///
    /// `Unauthorized` from the authorizer, or `NotPaused`.
    pub fn unpause(&self, caller: &AccountId) -> Result<PauseEvent, GuardError> {
        self.authorizer.authorize(caller, Action::Unpause)?;
        self.gate.unpause(caller, &self.sink)
    }

    /// Whether suspended.
    pub fn paused(&self) -> bool {
        self.gate.paused()
    }

    /// The underlying gate, for composing into guard chains.
    pub fn gate(&self) -> &PauseGate {
        &self.gate
    }

    /// The authorization collaborator.
    pub fn authorizer(&self) -> &A {
        &self.authorizer
    }

    /// The event sink.
    pub fn sink(&self) -> &S {
        &self.sink
    }
}

impl<A, S> PauseController<A, S> {
    /// Report to `sink` instead. The gate and its current state carry over.
    pub fn with_sink<T: EventSink>(self, sink: T) -> PauseController<A, T> {
        PauseController {
            gate: self.gate,
            authorizer: self.authorizer,
            sink,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::SingleOwner;
    use crate::events::{PauseEventKind, RecordingSink};
    use bulwark_core::GuardErrorKind;

    fn id(name: &str) -> AccountId {
        AccountId::new(name).unwrap()
    }

    fn controller() -> PauseController<SingleOwner, RecordingSink> {
        PauseController::new(SingleOwner::new(id("owner")), RecordingSink::new())
    }

    #[test]
    fn test_owner_pauses_and_unpauses() {
        let ctl = controller();
        let paused = ctl.pause(&id("owner")).unwrap();
        assert!(ctl.paused());
        assert_eq!(paused.account, id("owner"));
        ctl.unpause(&id("owner")).unwrap();
        assert!(!ctl.paused());
        assert_eq!(
            ctl.sink().kinds(),
            vec![PauseEventKind::Paused, PauseEventKind::Unpaused]
        );
    }

    #[test]
    fn test_unauthorized_pause_leaves_gate_untouched() {
        let ctl = controller();
        let err = ctl.pause(&id("mallory")).unwrap_err();
        assert_eq!(err.kind(), GuardErrorKind::Unauthorized);
        assert!(!ctl.paused());
        assert!(ctl.sink().is_empty());
    }

    #[test]
    fn test_unauthorized_checked_before_state() {
        // An outsider sees `Unauthorized`, not `NotPaused`.
        let ctl = controller();
        let err = ctl.unpause(&id("mallory")).unwrap_err();
        assert_eq!(err.kind(), GuardErrorKind::Unauthorized);
    }

    #[test]
    fn test_double_pause_through_controller() {
        let ctl = controller();
        ctl.pause(&id("owner")).unwrap();
        let err = ctl.pause(&id("owner")).unwrap_err();
        assert_eq!(err, GuardError::AlreadyPaused);
        assert_eq!(ctl.sink().len(), 1);
    }

    #[test]
    fn test_sink_swap_keeps_suspended_gate() {
        let ctl = controller();
        ctl.pause(&id("owner")).unwrap();
        let ctl = ctl.with_sink(RecordingSink::new());
        assert!(ctl.paused());
        assert!(ctl.sink().is_empty());
        ctl.unpause(&id("owner")).unwrap();
        assert_eq!(ctl.sink().kinds(), vec![PauseEventKind::Unpaused]);
    }
}
