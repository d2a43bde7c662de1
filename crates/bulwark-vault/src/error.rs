//! # Vault Errors

use thiserror::Error;

use bulwark_core::{AccountId, GuardError, GuardErrorKind};

/// Errors returned by [`Vault`](crate::Vault) operations.
///
/// Guard rejections, including `Unauthorized` from the owner check, are
/// carried unchanged in [`VaultError::Guard`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VaultError {
    /// A guard or the authorization collaborator refused the call.
    #[error(transparent)]
    Guard(#[from] GuardError),

    /// The account's recorded balance does not cover the request.
    #[error("insufficient funds for {account}: balance {balance}, requested {requested}")]
    InsufficientFunds {
        /// The debited account.
        account: AccountId,
        /// Balance observed at the time of the check.
        balance: u64,
        /// Amount requested.
        requested: u64,
    },

    /// The vault does not hold enough funds to pay out.
    #[error("vault reserve {reserve} cannot cover payout of {requested}")]
    InsufficientReserve {
        /// Funds held by the vault.
        reserve: u64,
        /// Amount requested.
        requested: u64,
    },

    /// A credit would overflow a balance or the reserve.
    #[error("amount overflow crediting {account}")]
    Overflow {
        /// The credited account.
        account: AccountId,
    },

    /// An account identifier failed validation.
    #[error("invalid account: {0}")]
    InvalidAccount(String),

    /// Zero-amount operations are refused.
    #[error("amount must be non-zero")]
    ZeroAmount,

    /// The recipient refused an incoming payment.
    #[error("recipient {account} rejected payment: {reason}")]
    RecipientRejected {
        /// The refusing recipient.
        account: AccountId,
        /// Why.
        reason: String,
    },
}

impl VaultError {
    /// The guard rejection kind, if this is a guard rejection.
    pub fn guard_kind(&self) -> Option<GuardErrorKind> {
        match self {
            Self::Guard(e) => Some(e.kind()),
            _ => None,
        }
    }
}
