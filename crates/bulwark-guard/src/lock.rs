//! # Reentrancy Lock
//!
//! A two-state lock that rejects recursive re-entry into a protected
//! operation on the same call stack.
//!
//! ## States
//!
//! ```text
//! NotEntered ──enter()──▶ Entered ──exit()──▶ NotEntered
//!                            │
//!                            └──enter()──▶ ReentrantCall (rejected, state unchanged)
//! ```
//!
//! `enter()` never blocks or queues. A rejected `enter()` is the defense
//! firing: the nested caller's whole operation must abort.
//!
//! ## Release
//!
//! `enter()` hands back a [`LockGuard`]. Dropping it performs `exit()`, so
//! the lock is released on normal return, on `?` propagation, and while
//! unwinding from a panic. Leaking the guard (`std::mem::forget`) leaves the
//! lock `Entered`; nothing in this workspace does that.

use std::cell::Cell;

use serde::{Deserialize, Serialize};

use bulwark_core::GuardError;

/// Status of a [`ReentrancyLock`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LockStatus {
    /// No protected body is executing.
    #[default]
    NotEntered,
    /// A protected body is executing.
    Entered,
}

impl std::fmt::Display for LockStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::NotEntered => "NOT_ENTERED",
            Self::Entered => "ENTERED",
        };
        f.write_str(s)
    }
}

/// Single-stack reentrancy lock, owned by the component it protects.
///
/// Interior mutability lets a nested call reach the lock through the same
/// shared reference as the outer call. The type is `!Sync`; it guards
/// recursion, not threads.
#[derive(Debug, Default)]
pub struct ReentrancyLock {
    status: Cell<LockStatus>,
}

impl ReentrancyLock {
    /// A lock in the `NotEntered` state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current status. Pure query.
    pub fn status(&self) -> LockStatus {
        self.status.get()
    }

    /// Whether a protected body is currently executing.
    pub fn is_entered(&self) -> bool {
        self.status() == LockStatus::Entered
    }

    /// Transition `NotEntered → Entered` on behalf of `operation`.
    ///
    /// # Errors
    ///
    /// Returns [`GuardError::ReentrantCall`] if the lock is already
    /// `Entered`. The status is left unchanged.
    pub fn enter(&self, operation: &str) -> Result<LockGuard<'_>, GuardError> {
        if self.is_entered() {
            tracing::warn!(operation, "reentrant call rejected");
            return Err(GuardError::ReentrantCall {
                operation: operation.to_string(),
            });
        }
        self.status.set(LockStatus::Entered);
        tracing::debug!(operation, "reentrancy lock entered");
        Ok(LockGuard {
            lock: self,
            operation: operation.to_string(),
        })
    }

    /// Unconditionally transition to `NotEntered`.
    ///
    /// Normally invoked by dropping a [`LockGuard`].
    pub fn exit(&self) {
        self.status.set(LockStatus::NotEntered);
    }
}

/// Proof that a [`ReentrancyLock`] is held. Releases the lock on drop.
#[must_use = "dropping the guard releases the lock immediately"]
#[derive(Debug)]
pub struct LockGuard<'a> {
    lock: &'a ReentrancyLock,
    operation: String,
}

impl LockGuard<'_> {
    /// The operation that acquired the lock.
    pub fn operation(&self) -> &str {
        &self.operation
    }
}

impl Drop for LockGuard<'_> {
    fn drop(&mut self) {
        self.lock.exit();
        tracing::debug!(operation = %self.operation, "reentrancy lock released");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bulwark_core::GuardErrorKind;

    #[test]
    fn test_new_lock_not_entered() {
        let lock = ReentrancyLock::new();
        assert_eq!(lock.status(), LockStatus::NotEntered);
        assert!(!lock.is_entered());
    }

    #[test]
    fn test_enter_then_drop_releases() {
        let lock = ReentrancyLock::new();
        {
            let guard = lock.enter("withdraw").unwrap();
            assert_eq!(guard.operation(), "withdraw");
            assert_eq!(lock.status(), LockStatus::Entered);
        }
        assert_eq!(lock.status(), LockStatus::NotEntered);
    }

    #[test]
    fn test_enter_while_entered_rejected() {
        let lock = ReentrancyLock::new();
        let _outer = lock.enter("withdraw").unwrap();
        let err = lock.enter("withdraw").unwrap_err();
        assert_eq!(err.kind(), GuardErrorKind::ReentrantCall);
        // The rejected attempt does not disturb the outer holder.
        assert_eq!(lock.status(), LockStatus::Entered);
    }

    #[test]
    fn test_rejection_names_operation() {
        let lock = ReentrancyLock::new();
        let _outer = lock.enter("withdraw").unwrap();
        let err = lock.enter("claim").unwrap_err();
        assert_eq!(
            err,
            GuardError::ReentrantCall {
                operation: "claim".to_string()
            }
        );
    }

    #[test]
    fn test_exit_is_unconditional() {
        let lock = ReentrancyLock::new();
        lock.exit();
        assert_eq!(lock.status(), LockStatus::NotEntered);
    }

    #[test]
    fn test_reacquire_after_release() {
        let lock = ReentrancyLock::new();
        drop(lock.enter("a").unwrap());
        drop(lock.enter("b").unwrap());
        assert!(!lock.is_entered());
    }

    #[test]
    fn test_released_on_error_propagation() {
        fn body(lock: &ReentrancyLock) -> Result<(), GuardError> {
            let _guard = lock.enter("withdraw")?;
            Err(GuardError::NotPaused)
        }
        let lock = ReentrancyLock::new();
        assert!(body(&lock).is_err());
        assert_eq!(lock.status(), LockStatus::NotEntered);
    }

    #[test]
    fn test_released_on_panic() {
        let lock = ReentrancyLock::new();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = lock.enter("withdraw").unwrap();
            panic!("body panicked");
        }));
        assert!(result.is_err());
        assert_eq!(lock.status(), LockStatus::NotEntered);
    }

    #[test]
    fn test_status_display() {
        assert_eq!(LockStatus::NotEntered.to_string(), "NOT_ENTERED");
        assert_eq!(LockStatus::Entered.to_string(), "ENTERED");
    }

    #[test]
    fn test_status_serialization() {
        let json = serde_json::to_string(&LockStatus::Entered).unwrap();
        assert_eq!(json, "\"ENTERED\"");
    }
}
