//! # Identity Newtypes
//!
//! `AccountId` names the actor behind a call: the initiator of a pause
//! transition, the owner of a balance, the target of an authorization
//! check. `EventId` names a single emitted event.
//!
//! Account identifiers are supplied by the authorization collaborator and
//! are never computed by the guards.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::BulwarkError;

/// Maximum accepted length of an account identifier, in bytes.
pub const MAX_ACCOUNT_ID_LEN: usize = 128;

/// Identity of an actor interacting with a guarded component.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccountId(String);

impl AccountId {
    /// Create an account identifier.
    ///
    /// # Errors
    ///
    /// Rejects empty identifiers, identifiers longer than
    /// [`MAX_ACCOUNT_ID_LEN`], and identifiers containing whitespace or
    /// control characters.
    pub fn new(id: impl Into<String>) -> Result<Self, BulwarkError> {
        let id = id.into();
        if id.is_empty() {
            return Err(BulwarkError::InvalidIdentifier(
                "account id must not be empty".to_string(),
            ));
        }
        if id.len() > MAX_ACCOUNT_ID_LEN {
            return Err(BulwarkError::InvalidIdentifier(format!(
                "account id exceeds {MAX_ACCOUNT_ID_LEN} bytes"
            )));
        }
        if id.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(BulwarkError::InvalidIdentifier(format!(
                "account id {id:?} contains whitespace or control characters"
            )));
        }
        Ok(Self(id))
    }

    /// Access the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for AccountId {
    type Error = BulwarkError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<AccountId> for String {
    fn from(id: AccountId) -> Self {
        id.0
    }
}

impl std::fmt::Display for AccountId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unique identifier for an emitted event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventId(pub Uuid);

impl EventId {
    /// Generate a new random event identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "event:{}", self.0)
    }
}
