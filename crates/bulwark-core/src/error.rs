//! # Error Types — Guard Rejections and Workspace Errors
//!
//! Defines the error types shared by every guarded component. All errors use
//! `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! ## Design
//!
//! - Every guard rejection is a hard failure. Nothing in this taxonomy is
//!   transient, so nothing in the workspace retries on it.
//! - Rejections name the operation they refused, so a log line or a test
//!   assertion can tell *which* guarded entry point was hit.
//! - `Unauthorized` is raised by authorization collaborators, not by the
//!   guards themselves. It lives here so that it can travel through a guard
//!   chain unchanged.

use thiserror::Error;

use crate::identity::AccountId;

/// A rejection produced by a guard, a pause transition, or an authorization
/// collaborator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GuardError {
    /// `pause()` was called while already suspended.
    #[error("already paused")]
    AlreadyPaused,

    /// `unpause()` was called while not suspended.
    #[error("not paused")]
    NotPaused,

    /// A `whenNotPaused` operation was invoked while suspended.
    #[error("operation {operation} rejected: component is paused")]
    OperationPaused {
        /// The guarded operation that was refused.
        operation: String,
    },

    /// A `whenPaused` operation was invoked while not suspended.
    #[error("operation {operation} rejected: component is not paused")]
    OperationNotPaused {
        /// The guarded operation that was refused.
        operation: String,
    },

    /// The reentrancy lock was already `Entered` when `enter()` was attempted.
    #[error("reentrant call into {operation} rejected")]
    ReentrantCall {
        /// The guarded operation whose lock was already held.
        operation: String,
    },

    /// The authorization collaborator refused the caller.
    #[error("account {account} is not authorized to {action}")]
    Unauthorized {
        /// The identity that attempted the call.
        account: AccountId,
        /// The action that was refused.
        action: String,
    },
}

/// Discriminant of [`GuardError`], for assertions that do not care about
/// the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GuardErrorKind {
    /// See [`GuardError::AlreadyPaused`].
    AlreadyPaused,
    /// See [`GuardError::NotPaused`].
    NotPaused,
    /// See [`GuardError::OperationPaused`].
    OperationPaused,
    /// See [`GuardError::OperationNotPaused`].
    OperationNotPaused,
    /// See [`GuardError::ReentrantCall`].
    ReentrantCall,
    /// See [`GuardError::Unauthorized`].
    Unauthorized,
}

impl GuardError {
    /// The kind of this rejection.
    pub fn kind(&self) -> GuardErrorKind {
        match self {
            Self::AlreadyPaused => GuardErrorKind::AlreadyPaused,
            Self::NotPaused => GuardErrorKind::NotPaused,
            Self::OperationPaused { .. } => GuardErrorKind::OperationPaused,
            Self::OperationNotPaused { .. } => GuardErrorKind::OperationNotPaused,
            Self::ReentrantCall { .. } => GuardErrorKind::ReentrantCall,
            Self::Unauthorized { .. } => GuardErrorKind::Unauthorized,
        }
    }
}

/// Top-level error type for the bulwark workspace.
#[derive(Error, Debug)]
pub enum BulwarkError {
    /// A guard rejected the call.
    #[error(transparent)]
    Guard(#[from] GuardError),

    /// An identifier failed validation.
    #[error("invalid identifier: {0}")]
    InvalidIdentifier(String),

    /// A configuration document was rejected.
    #[error("configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
