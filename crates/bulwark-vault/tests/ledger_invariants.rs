//! # Ledger Invariants Under Arbitrary Call Sequences
//!
//! Drives a fully protected vault with random deposits, withdrawals,
//! transfers, pause transitions, and reentrant withdrawals, checking after
//! every top-level call that:
//!
//! - the reentrancy lock is `NotEntered`,
//! - a failed call left the ledger exactly as it found it,
//! - the vault stays solvent,
//! - `paused()` reflects the last successful transition.

use bulwark_core::AccountId;
use bulwark_guard::LockStatus;
use bulwark_vault::{AttackMode, Protection, ReentrantAttacker, Vault, Wallet};
use proptest::prelude::*;

const ACCOUNTS: [&str; 3] = ["alice", "bob", "carol"];

#[derive(Debug, Clone)]
enum Step {
    Deposit { who: usize, amount: u64 },
    Withdraw { who: usize, amount: u64 },
    Transfer { from: usize, to: usize, amount: u64 },
    Attack { who: usize, amount: u64, reentries: u32 },
    Pause,
    Unpause,
}

fn step_strategy() -> impl Strategy<Value = Step> {
    let who = 0..ACCOUNTS.len();
    let amount = 0u64..40;
    prop_oneof![
        3 => (who.clone(), amount.clone()).prop_map(|(who, amount)| Step::Deposit { who, amount }),
        2 => (who.clone(), amount.clone()).prop_map(|(who, amount)| Step::Withdraw { who, amount }),
        2 => (who.clone(), who.clone(), amount.clone())
            .prop_map(|(from, to, amount)| Step::Transfer { from, to, amount }),
        2 => (who, amount, 1u32..4)
            .prop_map(|(who, amount, reentries)| Step::Attack { who, amount, reentries }),
        1 => Just(Step::Pause),
        1 => Just(Step::Unpause),
    ]
}

fn account(who: usize) -> AccountId {
    AccountId::new(ACCOUNTS[who]).unwrap()
}

proptest! {
    #[test]
    fn protected_vault_invariants_hold(steps in prop::collection::vec(step_strategy(), 1..48)) {
        let owner = AccountId::new("owner").unwrap();
        let vault = Vault::new(owner.clone(), Protection::Full);
        let mut paused = false;

        for step in &steps {
            let before = vault.ledger();
            let ok = match step {
                Step::Deposit { who, amount } => vault.deposit(&account(*who), *amount).is_ok(),
                Step::Withdraw { who, amount } => {
                    let wallet = Wallet::new(account(*who));
                    let result = vault.withdraw(&wallet, *amount);
                    if result.is_ok() {
                        prop_assert_eq!(wallet.received(), *amount);
                    } else {
                        prop_assert_eq!(wallet.received(), 0);
                    }
                    result.is_ok()
                }
                Step::Transfer { from, to, amount } => {
                    vault.transfer(&account(*from), &account(*to), *amount).is_ok()
                }
                Step::Attack { who, amount, reentries } => {
                    let attacker =
                        ReentrantAttacker::new(account(*who), AttackMode::Withdraw, *reentries);
                    let result = vault.withdraw(&attacker, *amount);
                    prop_assert!(attacker.inner_results().iter().all(|r| r.is_err()));
                    prop_assert!(attacker.received() <= *amount);
                    result.is_ok()
                }
                Step::Pause => {
                    let ok = vault.pause(&owner).is_ok();
                    prop_assert_eq!(ok, !paused);
                    paused = true;
                    ok
                }
                Step::Unpause => {
                    let ok = vault.unpause(&owner).is_ok();
                    prop_assert_eq!(ok, paused);
                    paused = false;
                    ok
                }
            };

            prop_assert_eq!(vault.lock_status(), LockStatus::NotEntered);
            prop_assert_eq!(vault.paused(), paused);
            prop_assert!(vault.ledger().is_solvent());
            if !ok {
                prop_assert_eq!(vault.ledger(), before);
            }
        }
    }
}
