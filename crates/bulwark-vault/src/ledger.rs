//! # Ledger
//!
//! The vault's bookkeeping: per-account balances and the funds the vault
//! actually holds. The vault is solvent while the reserve covers every
//! recorded balance; the reentrancy scenarios are judged by that property.

use std::collections::BTreeMap;

use serde::Serialize;

use bulwark_core::AccountId;

use crate::error::VaultError;

/// Balances plus reserve.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Ledger {
    balances: BTreeMap<AccountId, u64>,
    reserve: u64,
}

impl Ledger {
    /// An empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded balance of `account` (zero if unknown).
    pub fn balance_of(&self, account: &AccountId) -> u64 {
        self.balances.get(account).copied().unwrap_or(0)
    }

    /// Funds held by the vault.
    pub fn reserve(&self) -> u64 {
        self.reserve
    }

    /// Sum of all recorded balances.
    pub fn total_balances(&self) -> u64 {
        self.balances.values().copied().fold(0u64, u64::saturating_add)
    }

    /// Whether the reserve covers every recorded balance.
    pub fn is_solvent(&self) -> bool {
        self.reserve >= self.total_balances()
    }

    /// Record incoming funds for `account`.
    pub fn credit(&mut self, account: &AccountId, amount: u64) -> Result<u64, VaultError> {
        let overflow = || VaultError::Overflow {
            account: account.clone(),
        };
        let balance = self.balance_of(account).checked_add(amount).ok_or_else(overflow)?;
        let reserve = self.reserve.checked_add(amount).ok_or_else(overflow)?;
        self.balances.insert(account.clone(), balance);
        self.reserve = reserve;
        Ok(balance)
    }

    /// Overwrite the recorded balance of `account`.
    pub fn set_balance(&mut self, account: &AccountId, balance: u64) {
        if balance == 0 {
            self.balances.remove(account);
        } else {
            self.balances.insert(account.clone(), balance);
        }
    }

    /// Take `amount` out of the reserve for payment.
    pub fn release(&mut self, amount: u64) -> Result<(), VaultError> {
        self.reserve = self
            .reserve
            .checked_sub(amount)
            .ok_or(VaultError::InsufficientReserve {
                reserve: self.reserve,
                requested: amount,
            })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(name: &str) -> AccountId {
        AccountId::new(name).unwrap()
    }

    #[test]
    fn test_credit_updates_balance_and_reserve() {
        let mut ledger = Ledger::new();
        assert_eq!(ledger.credit(&id("a"), 10).unwrap(), 10);
        assert_eq!(ledger.credit(&id("a"), 5).unwrap(), 15);
        ledger.credit(&id("b"), 7).unwrap();
        assert_eq!(ledger.reserve(), 22);
        assert_eq!(ledger.total_balances(), 22);
        assert!(ledger.is_solvent());
    }

    #[test]
    fn test_credit_overflow_rejected_without_change() {
        let mut ledger = Ledger::new();
        ledger.credit(&id("a"), u64::MAX).unwrap();
        let err = ledger.credit(&id("a"), 1).unwrap_err();
        assert_eq!(err, VaultError::Overflow { account: id("a") });
        assert_eq!(ledger.balance_of(&id("a")), u64::MAX);
        assert_eq!(ledger.reserve(), u64::MAX);
    }

    #[test]
    fn test_release_beyond_reserve_rejected() {
        let mut ledger = Ledger::new();
        ledger.credit(&id("a"), 3).unwrap();
        let err = ledger.release(4).unwrap_err();
        assert_eq!(err, VaultError::InsufficientReserve { reserve: 3, requested: 4 });
        assert_eq!(ledger.reserve(), 3);
    }

    #[test]
    fn test_insolvent_after_unrecorded_release() {
        let mut ledger = Ledger::new();
        ledger.credit(&id("a"), 10).unwrap();
        ledger.release(10).unwrap();
        assert!(!ledger.is_solvent());
        ledger.set_balance(&id("a"), 0);
        assert!(ledger.is_solvent());
    }

    #[test]
    fn test_zero_balance_removes_entry() {
        let mut ledger = Ledger::new();
        ledger.credit(&id("a"), 1).unwrap();
        ledger.set_balance(&id("a"), 0);
        assert_eq!(ledger.balance_of(&id("a")), 0);
        let json = serde_json::to_value(&ledger).unwrap();
        assert_eq!(json["balances"], serde_json::json!({}));
    }
}
