//! # bulwark-guard — Call Guards for Externally-Callable State
//!
//! Protects a component's mutable state from two hazards that share a root
//! cause (an operation that yields to outside code before it has finished
//! its own bookkeeping):
//!
//! - **Invocation while suspended.** [`PauseGate`] owns a single suspended
//!   flag with strictly alternating `pause()`/`unpause()` transitions.
//!   [`PauseController`] puts an [`Authorizer`] in front of it and reports
//!   transitions to an [`EventSink`].
//!
//! - **Recursive re-entry.** [`ReentrancyLock`] is a two-state
//!   `NotEntered`/`Entered` lock. A nested `enter()` is rejected outright;
//!   release is tied to a [`LockGuard`] drop.
//!
//! [`GuardedOperation`] composes both around a protected body using an
//! ordered [`GuardChain`], and with
//! [`execute_atomic`](GuardedOperation::execute_atomic) discards every
//! bookkeeping change of a failed call via [`Checkpoint`].
//!
//! ## Execution model
//!
//! Single-threaded and call-stack based. "Concurrency" here means a
//! callback re-entering the component on the same stack, so state lives in
//! `Cell`/`RefCell` and is reached through shared references. None of these
//! types are `Sync`.
//!
//! ## Crate Policy
//!
//! - Guard state is owned by a component instance, never static.
//! - No retries: every rejection aborts the whole guarded call.
//! - No `.unwrap()` outside tests.

pub mod auth;
pub mod chain;
pub mod controller;
pub mod events;
pub mod lock;
pub mod operation;
pub mod pause;
pub mod policy;

// ─── Re-exports ─────────────────────────────────────────────────────

pub use auth::{Action, AllowList, Authorizer, SingleOwner};
pub use chain::{Guard, GuardChain};
pub use controller::PauseController;
pub use events::{EventSink, PauseEvent, PauseEventKind, RecordingSink, TracingSink};
pub use lock::{LockGuard, LockStatus, ReentrancyLock};
pub use operation::{Checkpoint, GuardedOperation};
pub use pause::{PauseGate, PauseState};
pub use policy::{GuardOrder, GuardPolicy};
