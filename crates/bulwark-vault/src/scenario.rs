//! # Reentrancy Attack Scenario
//!
//! The canonical attack against a payout that calls out before settling:
//!
//! 1. A victim and the attacker deposit into the same vault.
//! 2. The attacker withdraws its deposit.
//! 3. From inside the payout callback, the attacker re-enters, either with
//!    another `withdraw` of the same amount or with a `transfer` of its
//!    not-yet-settled balance to an accomplice.
//!
//! The attack succeeds when the vault ends up insolvent: its reserve no
//! longer covers the recorded balances.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use bulwark_core::{AccountId, BulwarkError};
use bulwark_guard::{GuardOrder, GuardPolicy, LockStatus};

use crate::error::VaultError;
use crate::recipient::{AttackMode, ReentrantAttacker};
use crate::vault::{Protection, Vault};

/// Which operation the attacker re-enters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttackKind {
    /// Re-enter the same operation.
    #[default]
    Withdraw,
    /// Re-enter a different operation over the same balance.
    Transfer,
}

impl std::fmt::Display for AttackKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Withdraw => "withdraw",
            Self::Transfer => "transfer",
        };
        f.write_str(s)
    }
}

impl FromStr for AttackKind {
    type Err = BulwarkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "withdraw" => Ok(Self::Withdraw),
            "transfer" => Ok(Self::Transfer),
            other => Err(BulwarkError::Config(format!(
                "unknown attack {other:?}; expected withdraw or transfer"
            ))),
        }
    }
}

/// Parameters of one attack run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttackScenario {
    /// Defenses applied by the vault.
    pub protection: Protection,
    /// Guard ordering policy.
    pub policy: GuardPolicy,
    /// Operation re-entered from the callback.
    pub attack: AttackKind,
    /// Attacker's deposit, also the amount withdrawn.
    pub attacker_deposit: u64,
    /// Bystander funds held by the same vault.
    pub victim_deposit: u64,
    /// Maximum number of nested calls the attacker attempts.
    pub reentries: u32,
}

impl Default for AttackScenario {
    fn default() -> Self {
        Self {
            protection: Protection::Full,
            policy: GuardPolicy::default(),
            attack: AttackKind::Withdraw,
            attacker_deposit: 10,
            victim_deposit: 30,
            reentries: 1,
        }
    }
}

/// Outcome of a single call, flattened for reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InnerOutcome {
    /// Whether the call succeeded.
    pub ok: bool,
    /// Amount moved, on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<u64>,
    /// Rendered error, on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<&Result<u64, VaultError>> for InnerOutcome {
    fn from(result: &Result<u64, VaultError>) -> Self {
        match result {
            Ok(amount) => Self {
                ok: true,
                amount: Some(*amount),
                error: None,
            },
            Err(e) => Self {
                ok: false,
                amount: None,
                error: Some(e.to_string()),
            },
        }
    }
}

/// What an attack run left behind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttackReport {
    /// Defenses applied.
    pub protection: Protection,
    /// Operation re-entered.
    pub attack: AttackKind,
    /// Guard ordering in effect.
    pub order: GuardOrder,
    /// The attacker's top-level withdrawal.
    pub outer: InnerOutcome,
    /// Nested calls made from the callback.
    pub inner: Vec<InnerOutcome>,
    /// Funds that left the vault to the attacker.
    pub attacker_received: u64,
    /// Attacker's recorded balance afterwards.
    pub attacker_balance: u64,
    /// Accomplice's recorded balance afterwards.
    pub accomplice_balance: u64,
    /// Victim's recorded balance afterwards.
    pub victim_balance: u64,
    /// Funds the vault still holds.
    pub vault_reserve: u64,
    /// Whether the reserve still covers every recorded balance.
    pub solvent: bool,
    /// Lock status once the top-level call has returned.
    pub lock_status_after: LockStatus,
}

impl AttackReport {
    /// Whether the attacker extracted value it was not owed.
    pub fn exploited(&self) -> bool {
        !self.solvent
    }
}

impl AttackScenario {
    /// Run the scenario against a fresh vault.
    ///
    /// # Errors
    ///
    /// Only setup failures (account creation, the initial deposits) are
    /// returned. The
    /// attacker's own calls are reported, not propagated.
    pub fn run(&self) -> Result<AttackReport, VaultError> {
        let owner = fixed_account("owner")?;
        let victim = fixed_account("victim")?;
        let attacker_id = fixed_account("attacker")?;
        let accomplice = fixed_account("accomplice")?;

        let vault = Vault::new(owner, self.protection).with_policy(self.policy.clone());
        if self.victim_deposit > 0 {
            vault.deposit(&victim, self.victim_deposit)?;
        }
        vault.deposit(&attacker_id, self.attacker_deposit)?;

        let mode = match self.attack {
            AttackKind::Withdraw => AttackMode::Withdraw,
            AttackKind::Transfer => AttackMode::Transfer {
                to: accomplice.clone(),
            },
        };
        let attacker = ReentrantAttacker::new(attacker_id.clone(), mode, self.reentries);
        let outer = vault.withdraw(&attacker, self.attacker_deposit);

        let ledger = vault.ledger();
        let report = AttackReport {
            protection: self.protection,
            attack: self.attack,
            order: self.policy.order,
            outer: InnerOutcome::from(&outer),
            inner: attacker.inner_results().iter().map(InnerOutcome::from).collect(),
            attacker_received: attacker.received(),
            attacker_balance: ledger.balance_of(&attacker_id),
            accomplice_balance: ledger.balance_of(&accomplice),
            victim_balance: ledger.balance_of(&victim),
            vault_reserve: ledger.reserve(),
            solvent: ledger.is_solvent(),
            lock_status_after: vault.lock_status(),
        };
        tracing::info!(
            protection = %report.protection,
            attack = %report.attack,
            received = report.attacker_received,
            solvent = report.solvent,
            "attack scenario finished"
        );
        Ok(report)
    }
}

fn fixed_account(name: &str) -> Result<AccountId, VaultError> {
    AccountId::new(name).map_err(|e| VaultError::InvalidAccount(e.to_string()))
}
