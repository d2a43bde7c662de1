//! # Guarded Operations
//!
//! [`GuardedOperation`] composes a component's [`PauseGate`] and
//! [`ReentrancyLock`] with a protected body.
//!
//! ## Evaluation
//!
//! 1. Guards run in chain order. The first failure aborts the call before
//!    the body runs; a lock acquired by an earlier guard is released.
//! 2. With [`execute_atomic`](GuardedOperation::execute_atomic), the
//!    component's bookkeeping is checkpointed once every guard has passed.
//! 3. The body runs with the lock held (if the chain declares
//!    `nonReentrant`).
//! 4. On body failure the checkpoint is restored, then the lock is
//!    released, then the error reaches the caller.
//!
//! Steps 3 and 4 are enforced by drop guards, so a panicking body also
//! restores the checkpoint and releases the lock while unwinding.
//!
//! ## Effects before interactions
//!
//! The lock only stops the *same* lock from being re-acquired. A body that
//! calls out to untrusted code must still finish its own bookkeeping before
//! the call, because a different operation that skips the lock can observe
//! that bookkeeping during the callback.

use std::cell::{Cell, RefCell};

use bulwark_core::GuardError;

use crate::chain::{Guard, GuardChain};
use crate::lock::{LockGuard, ReentrancyLock};
use crate::pause::PauseGate;

/// State that can be captured and restored as a unit.
pub trait Checkpoint {
    /// A captured copy of the state.
    type Snapshot;

    /// Capture the current state.
    fn checkpoint(&self) -> Self::Snapshot;

    /// Replace the current state with `snapshot`.
    fn restore(&self, snapshot: Self::Snapshot);
}

impl<T: Clone> Checkpoint for RefCell<T> {
    type Snapshot = T;

    fn checkpoint(&self) -> T {
        self.borrow().clone()
    }

    fn restore(&self, snapshot: T) {
        *self.borrow_mut() = snapshot;
    }
}

impl<T: Copy> Checkpoint for Cell<T> {
    type Snapshot = T;

    fn checkpoint(&self) -> T {
        self.get()
    }

    fn restore(&self, snapshot: T) {
        self.set(snapshot);
    }
}

/// Restores a checkpoint on drop unless committed.
struct Rollback<'s, C: Checkpoint + ?Sized> {
    state: &'s C,
    snapshot: Option<C::Snapshot>,
    operation: &'s str,
}

impl<'s, C: Checkpoint + ?Sized> Rollback<'s, C> {
    fn arm(state: &'s C, operation: &'s str) -> Self {
        Self {
            state,
            snapshot: Some(state.checkpoint()),
            operation,
        }
    }

    fn commit(mut self) {
        self.snapshot = None;
    }
}

impl<C: Checkpoint + ?Sized> Drop for Rollback<'_, C> {
    fn drop(&mut self) {
        if let Some(snapshot) = self.snapshot.take() {
            self.state.restore(snapshot);
            tracing::debug!(operation = self.operation, "rolled back bookkeeping");
        }
    }
}

/// The guards of one component, ready to wrap protected bodies.
#[derive(Debug, Clone, Copy)]
pub struct GuardedOperation<'a> {
    gate: &'a PauseGate,
    lock: &'a ReentrancyLock,
}

impl<'a> GuardedOperation<'a> {
    /// Compose a component's gate and lock.
    pub fn new(gate: &'a PauseGate, lock: &'a ReentrancyLock) -> Self {
        Self { gate, lock }
    }

    /// Run `body` behind `chain`.
    ///
    /// Guard failures are converted into `E`; body failures pass through
    /// unchanged. Either way the lock, if acquired, is released before
    /// this returns.
    pub fn execute<T, E, F>(&self, chain: &GuardChain, body: F) -> Result<T, E>
    where
        F: FnOnce() -> Result<T, E>,
        E: From<GuardError>,
    {
        let _held = self.admit(chain)?;
        body()
    }

    /// Run `body` behind `chain`, discarding every change to `state` if the
    /// body fails.
    pub fn execute_atomic<T, E, C, F>(&self, chain: &GuardChain, state: &C, body: F) -> Result<T, E>
    where
        C: Checkpoint + ?Sized,
        F: FnOnce() -> Result<T, E>,
        E: From<GuardError>,
    {
        let _held = self.admit(chain)?;
        // Dropped before `_held`: restore first, then release.
        let rollback = Rollback::arm(state, chain.operation());
        let value = body()?;
        rollback.commit();
        Ok(value)
    }

    /// Evaluate every guard in order. On success, returns the lock guard
    /// if the chain acquired one.
    fn admit(&self, chain: &GuardChain) -> Result<Option<LockGuard<'a>>, GuardError> {
        let operation = chain.operation();
        let mut held = None;
        for guard in chain.guards() {
            tracing::debug!(operation, %guard, "checking guard");
            match guard {
                Guard::WhenNotPaused => self.gate.require_not_paused(operation)?,
                Guard::WhenPaused => self.gate.require_paused(operation)?,
                Guard::NonReentrant => held = Some(self.lock.enter(operation)?),
            }
        }
        Ok(held)
    }
}
