//! # Authorization Collaborators
//!
//! Deciding *who* may pause, unpause, or run a privileged operation is not
//! a guard's job. An [`Authorizer`] is consulted before the transition; its
//! `Unauthorized` rejection travels to the caller unchanged.

use std::cell::RefCell;
use std::collections::BTreeSet;

use bulwark_core::{AccountId, GuardError};

/// An action that requires authorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// `pause()`.
    Pause,
    /// `unpause()`.
    Unpause,
    /// A component-specific privileged operation.
    Privileged(&'static str),
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pause => f.write_str("pause"),
            Self::Unpause => f.write_str("unpause"),
            Self::Privileged(name) => f.write_str(name),
        }
    }
}

/// Decides whether `caller` may perform `action`.
pub trait Authorizer {
    /// # Errors
    ///
    /// [`GuardError::Unauthorized`] if the caller is refused.
    fn authorize(&self, caller: &AccountId, action: Action) -> Result<(), GuardError>;
}

impl<T: Authorizer + ?Sized> Authorizer for &T {
    fn authorize(&self, caller: &AccountId, action: Action) -> Result<(), GuardError> {
        (**self).authorize(caller, action)
    }
}

impl<T: Authorizer + ?Sized> Authorizer for Box<T> {
    fn authorize(&self, caller: &AccountId, action: Action) -> Result<(), GuardError> {
        (**self).authorize(caller, action)
    }
}

fn refuse(caller: &AccountId, action: Action) -> GuardError {
    tracing::warn!(account = %caller, %action, "unauthorized");
    GuardError::Unauthorized {
        account: caller.clone(),
        action: action.to_string(),
    }
}

/// A single owner who may perform every action.
#[derive(Debug)]
pub struct SingleOwner {
    owner: RefCell<AccountId>,
}

impl SingleOwner {
    /// Owned by `owner`.
    pub fn new(owner: AccountId) -> Self {
        Self {
            owner: RefCell::new(owner),
        }
    }

    /// The current owner.
    pub fn owner(&self) -> AccountId {
        self.owner.borrow().clone()
    }

    /// Hand ownership to `new_owner`. Only the current owner may do this.
    pub fn transfer_ownership(
        &self,
        caller: &AccountId,
        new_owner: AccountId,
    ) -> Result<(), GuardError> {
        self.authorize(caller, Action::Privileged("transfer_ownership"))?;
        tracing::info!(from = %caller, to = %new_owner, "ownership transferred");
        *self.owner.borrow_mut() = new_owner;
        Ok(())
    }
}

impl Authorizer for SingleOwner {
    fn authorize(&self, caller: &AccountId, action: Action) -> Result<(), GuardError> {
        if *self.owner.borrow() == *caller {
            Ok(())
        } else {
            Err(refuse(caller, action))
        }
    }
}

/// A fixed set of accounts allowed to pause and unpause. Privileged
/// actions are refused to everyone.
#[derive(Debug, Clone, Default)]
pub struct AllowList {
    pausers: BTreeSet<AccountId>,
}

impl AllowList {
    /// Allow exactly `pausers`.
    pub fn new(pausers: impl IntoIterator<Item = AccountId>) -> Self {
        Self {
            pausers: pausers.into_iter().collect(),
        }
    }

    /// Add a pauser.
    pub fn grant(&mut self, account: AccountId) {
        self.pausers.insert(account);
    }

    /// Remove a pauser.
    pub fn revoke(&mut self, account: &AccountId) {
        self.pausers.remove(account);
    }

    /// Whether `account` may pause and unpause.
    pub fn contains(&self, account: &AccountId) -> bool {
        self.pausers.contains(account)
    }
}

impl Authorizer for AllowList {
    fn authorize(&self, caller: &AccountId, action: Action) -> Result<(), GuardError> {
        match action {
            Action::Pause | Action::Unpause if self.contains(caller) => Ok(()),
            _ => Err(refuse(caller, action)),
        }
    }
}
