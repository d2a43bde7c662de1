//! # Recipients
//!
//! The external side of a payout. The vault treats a recipient as opaque
//! code that runs synchronously on the vault's own call stack and may call
//! back into the vault before the payout returns.

use std::cell::{Cell, RefCell};

use serde::{Deserialize, Serialize};

use bulwark_core::AccountId;

use crate::error::VaultError;
use crate::vault::Vault;

/// Receiver of vault payouts.
pub trait Recipient {
    /// The account whose balance is paid out.
    fn account(&self) -> &AccountId;

    /// Called after the vault has released `amount` and before the payout
    /// returns.
    fn on_receive(&self, vault: &Vault, amount: u64) -> Result<(), VaultError>;
}

/// An honest wallet that tallies what it receives.
#[derive(Debug)]
pub struct Wallet {
    account: AccountId,
    received: Cell<u64>,
    accepts: bool,
}

impl Wallet {
    /// A wallet that accepts every payment.
    pub fn new(account: AccountId) -> Self {
        Self {
            account,
            received: Cell::new(0),
            accepts: true,
        }
    }

    /// A wallet that refuses every payment.
    pub fn rejecting(account: AccountId) -> Self {
        Self {
            accepts: false,
            ..Self::new(account)
        }
    }

    /// Total accepted so far.
    pub fn received(&self) -> u64 {
        self.received.get()
    }
}

impl Recipient for Wallet {
    fn account(&self) -> &AccountId {
        &self.account
    }

    fn on_receive(&self, _vault: &Vault, amount: u64) -> Result<(), VaultError> {
        if !self.accepts {
            return Err(VaultError::RecipientRejected {
                account: self.account.clone(),
                reason: "wallet does not accept payments".to_string(),
            });
        }
        self.received.set(self.received.get().saturating_add(amount));
        Ok(())
    }
}

/// What a [`ReentrantAttacker`] does from inside its callback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum AttackMode {
    /// Call `withdraw` again for the amount just received.
    Withdraw,
    /// Move the not-yet-settled balance to an accomplice with `transfer`.
    Transfer {
        /// Receiver of the moved balance.
        to: AccountId,
    },
}

/// A recipient that re-enters the vault from its callback.
///
/// Each re-entry's outcome is recorded and swallowed, so the outer payout
/// completes whenever the vault lets it.
#[derive(Debug)]
pub struct ReentrantAttacker {
    account: AccountId,
    mode: AttackMode,
    remaining: Cell<u32>,
    received: Cell<u64>,
    inner_results: RefCell<Vec<Result<u64, VaultError>>>,
}

impl ReentrantAttacker {
    /// An attacker that re-enters at most `reentries` times in total.
    pub fn new(account: AccountId, mode: AttackMode, reentries: u32) -> Self {
        Self {
            account,
            mode,
            remaining: Cell::new(reentries),
            received: Cell::new(0),
            inner_results: RefCell::new(Vec::new()),
        }
    }

    /// Total received across all payouts.
    pub fn received(&self) -> u64 {
        self.received.get()
    }

    /// Outcomes of the nested calls, in the order they were attempted.
    pub fn inner_results(&self) -> Vec<Result<u64, VaultError>> {
        self.inner_results.borrow().clone()
    }
}

impl Recipient for ReentrantAttacker {
    fn account(&self) -> &AccountId {
        &self.account
    }

    fn on_receive(&self, vault: &Vault, amount: u64) -> Result<(), VaultError> {
        self.received.set(self.received.get().saturating_add(amount));
        let remaining = self.remaining.get();
        if remaining == 0 {
            return Ok(());
        }
        self.remaining.set(remaining - 1);

        let outcome = match &self.mode {
            AttackMode::Withdraw => vault.withdraw(self, amount),
            AttackMode::Transfer { to } => vault.transfer(&self.account, to, amount).map(|()| amount),
        };
        tracing::debug!(account = %self.account, ok = outcome.is_ok(), "reentrant call returned");
        self.inner_results.borrow_mut().push(outcome);
        Ok(())
    }
}
