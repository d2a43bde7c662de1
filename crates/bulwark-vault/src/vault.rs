//! # Vault
//!
//! A pausable balance vault whose withdrawals call out to the recipient
//! before returning. The recipient may call straight back into the vault,
//! which makes the vault a concrete target for the reentrancy defenses in
//! `bulwark-guard`.
//!
//! ## Operations
//!
//! | Operation | Guards |
//! |---|---|
//! | `deposit` | `whenNotPaused` |
//! | `withdraw` | `whenNotPaused`, `nonReentrant`* |
//! | `transfer` | `whenNotPaused` |
//! | `emergency_withdraw` | `whenPaused`, `nonReentrant`* |
//! | `pause` / `unpause` | owner only |
//!
//! \* when the configured [`Protection`] takes the lock.
//!
//! Every guarded operation is atomic: a failure restores the ledger as it
//! was when the guards admitted the call.

use std::cell::RefCell;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use bulwark_core::AccountId;
use bulwark_guard::{
    EventSink, Guard, GuardChain, GuardPolicy, GuardedOperation, LockStatus, PauseController,
    PauseEvent, ReentrancyLock, SingleOwner, TracingSink,
};

use crate::error::VaultError;
use crate::ledger::Ledger;
use crate::recipient::Recipient;

/// Which reentrancy defenses a payout applies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Protection {
    /// Lock and effects-before-interactions.
    #[default]
    Full,
    /// Lock only; the balance is updated after the external call.
    LockOnly,
    /// Effects-before-interactions only; no lock.
    EffectsFirst,
    /// Neither.
    Unprotected,
}

impl Protection {
    /// Whether payouts declare `nonReentrant`.
    pub fn locks(&self) -> bool {
        matches!(self, Self::Full | Self::LockOnly)
    }

    /// Whether payouts settle the balance before calling the recipient.
    pub fn effects_first(&self) -> bool {
        matches!(self, Self::Full | Self::EffectsFirst)
    }
}

impl std::fmt::Display for Protection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Full => "full",
            Self::LockOnly => "lock-only",
            Self::EffectsFirst => "effects-first",
            Self::Unprotected => "unprotected",
        };
        f.write_str(s)
    }
}

/// Unrecognized protection name.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown protection {0:?}; expected full, lock-only, effects-first, or unprotected")]
pub struct ParseProtectionError(String);

impl FromStr for Protection {
    type Err = ParseProtectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "full" => Ok(Self::Full),
            "lock-only" => Ok(Self::LockOnly),
            "effects-first" => Ok(Self::EffectsFirst),
            "unprotected" => Ok(Self::Unprotected),
            other => Err(ParseProtectionError(other.to_string())),
        }
    }
}

/// A pausable balance vault.
pub struct Vault {
    controller: PauseController<SingleOwner, Box<dyn EventSink>>,
    lock: ReentrancyLock,
    ledger: RefCell<Ledger>,
    protection: Protection,
    policy: GuardPolicy,
}

impl std::fmt::Debug for Vault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Vault")
            .field("owner", &self.owner())
            .field("pause", &self.controller.gate().state())
            .field("lock", &self.lock.status())
            .field("ledger", &*self.ledger.borrow())
            .field("protection", &self.protection)
            .field("policy", &self.policy)
            .finish()
    }
}

impl Vault {
    /// An empty, running vault owned by `owner`. Pause events go to
    /// [`TracingSink`].
    pub fn new(owner: AccountId, protection: Protection) -> Self {
        Self {
            controller: PauseController::new(SingleOwner::new(owner), Box::new(TracingSink)),
            lock: ReentrancyLock::new(),
            ledger: RefCell::new(Ledger::new()),
            protection,
            policy: GuardPolicy::default(),
        }
    }

    /// Send pause events to `sink` instead. Pause state and ownership are
    /// unchanged.
    pub fn with_sink(self, sink: Box<dyn EventSink>) -> Self {
        let Self {
            controller,
            lock,
            ledger,
            protection,
            policy,
        } = self;
        Self {
            controller: controller.with_sink(sink),
            lock,
            ledger,
            protection,
            policy,
        }
    }

    /// Order guard chains by `policy`.
    pub fn with_policy(self, policy: GuardPolicy) -> Self {
        Self { policy, ..self }
    }

    // ── Queries ─────────────────────────────────────────────────────

    /// Current owner.
    pub fn owner(&self) -> AccountId {
        self.controller.authorizer().owner()
    }

    /// Whether suspended.
    pub fn paused(&self) -> bool {
        self.controller.paused()
    }

    /// Reentrancy lock status.
    pub fn lock_status(&self) -> LockStatus {
        self.lock.status()
    }

    /// Configured protection.
    pub fn protection(&self) -> Protection {
        self.protection
    }

    /// Configured guard policy.
    pub fn policy(&self) -> &GuardPolicy {
        &self.policy
    }

    /// Recorded balance of `account`.
    pub fn balance_of(&self, account: &AccountId) -> u64 {
        self.ledger.borrow().balance_of(account)
    }

    /// Funds held by the vault.
    pub fn reserve(&self) -> u64 {
        self.ledger.borrow().reserve()
    }

    /// A copy of the ledger.
    pub fn ledger(&self) -> Ledger {
        self.ledger.borrow().clone()
    }

    // ── Administration ──────────────────────────────────────────────

    /// Suspend. Owner only.
    pub fn pause(&self, caller: &AccountId) -> Result<PauseEvent, VaultError> {
        Ok(self.controller.pause(caller)?)
    }

    /// Resume. Owner only.
    pub fn unpause(&self, caller: &AccountId) -> Result<PauseEvent, VaultError> {
        Ok(self.controller.unpause(caller)?)
    }

    /// Hand ownership (and with it pause rights) to `new_owner`.
    pub fn transfer_ownership(
        &self,
        caller: &AccountId,
        new_owner: AccountId,
    ) -> Result<(), VaultError> {
        Ok(self
            .controller
            .authorizer()
            .transfer_ownership(caller, new_owner)?)
    }

    // ── Guarded operations ──────────────────────────────────────────

    /// Credit `amount` to `account`. Returns the new balance.
    pub fn deposit(&self, account: &AccountId, amount: u64) -> Result<u64, VaultError> {
        let chain = self.chain("deposit", [Guard::WhenNotPaused]);
        self.guards().execute_atomic(&chain, &self.ledger, || {
            if amount == 0 {
                return Err(VaultError::ZeroAmount);
            }
            let balance = self.ledger.borrow_mut().credit(account, amount)?;
            tracing::debug!(account = %account, amount, balance, "deposit");
            Ok(balance)
        })
    }

    /// Pay `amount` of the recipient's balance out to the recipient.
    pub fn withdraw(&self, recipient: &dyn Recipient, amount: u64) -> Result<u64, VaultError> {
        let chain = self.payout_chain("withdraw", Guard::WhenNotPaused);
        self.payout(&chain, recipient, amount)
    }

    /// Like [`withdraw`](Self::withdraw), but only while paused.
    pub fn emergency_withdraw(
        &self,
        recipient: &dyn Recipient,
        amount: u64,
    ) -> Result<u64, VaultError> {
        let chain = self.payout_chain("emergency_withdraw", Guard::WhenPaused);
        self.payout(&chain, recipient, amount)
    }

    /// Move `amount` of recorded balance from `from` to `to`. No funds
    /// leave the vault and no lock is taken.
    pub fn transfer(&self, from: &AccountId, to: &AccountId, amount: u64) -> Result<(), VaultError> {
        let chain = self.chain("transfer", [Guard::WhenNotPaused]);
        self.guards().execute_atomic(&chain, &self.ledger, || {
            if amount == 0 {
                return Err(VaultError::ZeroAmount);
            }
            let mut ledger = self.ledger.borrow_mut();
            let balance = ledger.balance_of(from);
            if balance < amount {
                return Err(VaultError::InsufficientFunds {
                    account: from.clone(),
                    balance,
                    requested: amount,
                });
            }
            ledger.set_balance(from, balance - amount);
            // Read after the debit so that a self-transfer is a no-op.
            let credited = ledger
                .balance_of(to)
                .checked_add(amount)
                .ok_or_else(|| VaultError::Overflow { account: to.clone() })?;
            ledger.set_balance(to, credited);
            tracing::debug!(from = %from, to = %to, amount, "transfer");
            Ok(())
        })
    }

    // ── Internals ───────────────────────────────────────────────────

    fn guards(&self) -> GuardedOperation<'_> {
        GuardedOperation::new(self.controller.gate(), &self.lock)
    }

    fn chain<const N: usize>(&self, operation: &str, guards: [Guard; N]) -> GuardChain {
        GuardChain::with_policy(operation, &self.policy, guards)
    }

    fn payout_chain(&self, operation: &str, pause_guard: Guard) -> GuardChain {
        if self.protection.locks() {
            self.chain(operation, [pause_guard, Guard::NonReentrant])
        } else {
            self.chain(operation, [pause_guard])
        }
    }

    fn payout(
        &self,
        chain: &GuardChain,
        recipient: &dyn Recipient,
        amount: u64,
    ) -> Result<u64, VaultError> {
        let account = recipient.account();
        self.guards().execute_atomic(chain, &self.ledger, || {
            if amount == 0 {
                return Err(VaultError::ZeroAmount);
            }
            let balance = self.ledger.borrow().balance_of(account);
            if balance < amount {
                return Err(VaultError::InsufficientFunds {
                    account: account.clone(),
                    balance,
                    requested: amount,
                });
            }
            self.ledger.borrow_mut().release(amount)?;

            if self.protection.effects_first() {
                self.ledger.borrow_mut().set_balance(account, balance - amount);
            }

            // Interaction: the recipient may re-enter the vault from here.
            recipient.on_receive(self, amount)?;

            if !self.protection.effects_first() {
                self.ledger.borrow_mut().set_balance(account, balance - amount);
            }
            tracing::debug!(
                operation = chain.operation(),
                locked = chain.acquires_lock(),
                account = %account,
                amount,
                "payout settled"
            );
            Ok(amount)
        })
    }
}
