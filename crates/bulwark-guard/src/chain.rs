//! # Guard Chains
//!
//! A [`GuardChain`] is the ordered list of guards declared for one
//! protected operation. It is built per call, evaluated front to back by
//! [`GuardedOperation`](crate::GuardedOperation), and never persisted.
//!
//! Each guard appears at most once; re-declaring a guard keeps its first
//! position.

use serde::{Deserialize, Serialize};

use crate::policy::{GuardOrder, GuardPolicy};

/// A precondition composed in front of a protected operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Guard {
    /// Reject while the component is suspended.
    WhenNotPaused,
    /// Reject while the component is running.
    WhenPaused,
    /// Acquire the component's reentrancy lock for the duration of the body.
    NonReentrant,
}

impl Guard {
    /// Whether this guard consults the pause gate.
    pub fn is_pause_check(&self) -> bool {
        matches!(self, Self::WhenNotPaused | Self::WhenPaused)
    }

    fn rank(&self, order: GuardOrder) -> u8 {
        match (order, self.is_pause_check()) {
            (GuardOrder::PauseThenLock, true) | (GuardOrder::LockThenPause, false) => 0,
            _ => 1,
        }
    }
}

impl std::fmt::Display for Guard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::WhenNotPaused => "whenNotPaused",
            Self::WhenPaused => "whenPaused",
            Self::NonReentrant => "nonReentrant",
        };
        f.write_str(s)
    }
}

/// Ordered guards for one named operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardChain {
    operation: String,
    guards: Vec<Guard>,
}

impl GuardChain {
    /// An unguarded chain for `operation`.
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            guards: Vec::new(),
        }
    }

    /// A chain evaluated in exactly the given order.
    pub fn ordered(operation: impl Into<String>, guards: impl IntoIterator<Item = Guard>) -> Self {
        guards
            .into_iter()
            .fold(Self::new(operation), |chain, guard| chain.with(guard))
    }

    /// A chain whose pause checks and lock are arranged by `policy`.
    /// Relative order among pause checks is preserved.
    pub fn with_policy(
        operation: impl Into<String>,
        policy: &GuardPolicy,
        guards: impl IntoIterator<Item = Guard>,
    ) -> Self {
        let mut chain = Self::ordered(operation, guards);
        chain.guards.sort_by_key(|g| g.rank(policy.order));
        chain
    }

    /// Append a guard unless it is already declared.
    pub fn with(mut self, guard: Guard) -> Self {
        if !self.guards.contains(&guard) {
            self.guards.push(guard);
        }
        self
    }

    /// Append `whenNotPaused`.
    pub fn when_not_paused(self) -> Self {
        self.with(Guard::WhenNotPaused)
    }

    /// Append `whenPaused`.
    pub fn when_paused(self) -> Self {
        self.with(Guard::WhenPaused)
    }

    /// Append `nonReentrant`.
    pub fn non_reentrant(self) -> Self {
        self.with(Guard::NonReentrant)
    }

    /// The operation name used in rejections and logs.
    pub fn operation(&self) -> &str {
        &self.operation
    }

    /// Guards in evaluation order.
    pub fn guards(&self) -> &[Guard] {
        &self.guards
    }

    /// Whether evaluating this chain acquires the reentrancy lock.
    pub fn acquires_lock(&self) -> bool {
        self.guards.contains(&Guard::NonReentrant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_preserves_declaration_order() {
        let chain = GuardChain::new("withdraw").non_reentrant().when_not_paused();
        assert_eq!(chain.guards(), &[Guard::NonReentrant, Guard::WhenNotPaused]);
        assert_eq!(chain.operation(), "withdraw");
        assert!(chain.acquires_lock());
    }

    #[test]
    fn test_duplicates_collapse_to_first() {
        let chain = GuardChain::ordered(
            "withdraw",
            [Guard::WhenNotPaused, Guard::NonReentrant, Guard::WhenNotPaused],
        );
        assert_eq!(chain.guards(), &[Guard::WhenNotPaused, Guard::NonReentrant]);
    }

    #[test]
    fn test_policy_pause_then_lock() {
        let chain = GuardChain::with_policy(
            "withdraw",
            &GuardPolicy::new(GuardOrder::PauseThenLock),
            [Guard::NonReentrant, Guard::WhenNotPaused],
        );
        assert_eq!(chain.guards(), &[Guard::WhenNotPaused, Guard::NonReentrant]);
    }

    #[test]
    fn test_policy_lock_then_pause() {
        let chain = GuardChain::with_policy(
            "sweep",
            &GuardPolicy::new(GuardOrder::LockThenPause),
            [Guard::WhenPaused, Guard::NonReentrant],
        );
        assert_eq!(chain.guards(), &[Guard::NonReentrant, Guard::WhenPaused]);
    }

    #[test]
    fn test_policy_keeps_pause_checks_relative_order() {
        let chain = GuardChain::with_policy(
            "odd",
            &GuardPolicy::default(),
            [Guard::WhenPaused, Guard::NonReentrant, Guard::WhenNotPaused],
        );
        assert_eq!(
            chain.guards(),
            &[Guard::WhenPaused, Guard::WhenNotPaused, Guard::NonReentrant]
        );
    }

    #[test]
    fn test_empty_chain_takes_no_lock() {
        let chain = GuardChain::new("balance_of");
        assert!(chain.guards().is_empty());
        assert!(!chain.acquires_lock());
    }

    #[test]
    fn test_guard_display_names() {
        assert_eq!(Guard::WhenNotPaused.to_string(), "whenNotPaused");
        assert_eq!(Guard::WhenPaused.to_string(), "whenPaused");
        assert_eq!(Guard::NonReentrant.to_string(), "nonReentrant");
    }
}
