//! # bulwark-vault — A Guarded Reference Component
//!
//! A small balance vault built on `bulwark-guard`. Its payouts call out to
//! a [`Recipient`] before returning, so a malicious recipient can re-enter
//! the vault mid-payout. The vault's [`Protection`] setting chooses which
//! defenses are applied, which lets the attack and each defense be
//! demonstrated side by side.
//!
//! - [`Vault`] — the guarded component.
//! - [`Ledger`] — its bookkeeping, checkpointed per call.
//! - [`Wallet`], [`ReentrantAttacker`] — recipients.
//! - [`AttackScenario`] — the deposit/withdraw/re-enter scenario as a
//!   reusable, serializable run.

pub mod error;
pub mod ledger;
pub mod recipient;
pub mod scenario;
pub mod vault;

pub use error::VaultError;
pub use ledger::Ledger;
pub use recipient::{AttackMode, ReentrantAttacker, Recipient, Wallet};
pub use scenario::{AttackKind, AttackReport, AttackScenario, InnerOutcome};
pub use vault::{ParseProtectionError, Protection, Vault};
