//! # bulwark-core — Foundational Types for Guarded Components
//!
//! This crate is the leaf of the bulwark workspace. It defines the
//! primitives every guard and every guarded component shares: who is acting,
//! when it happened, and how a rejected call is reported.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for identities.** `AccountId` and `EventId` are
//!    distinct types with validated constructors. No bare strings for the
//!    identity that initiated a pause transition.
//!
//! 2. **One error taxonomy.** `GuardError` has exactly one variant per
//!    rejection kind. Callers and test harnesses match on
//!    [`GuardErrorKind`] rather than on message text.
//!
//! 3. **UTC-only timestamps.** Event payloads carry a [`Timestamp`] truncated
//!    to seconds, so serialized events are deterministic.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `bulwark-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod identity;
pub mod temporal;

// Re-export primary types for ergonomic imports.
pub use error::{BulwarkError, GuardError, GuardErrorKind};
pub use identity::{AccountId, EventId};
pub use temporal::Timestamp;
