//! # bulwark-cli — Command-Line Interface
//!
//! ## Subcommands
//!
//! - `simulate` — run the reentrancy attack scenario and print a JSON report
//! - `policy` — show or validate a guard policy file
//!
//! Argument parsing lives here; the scenario and the policy format belong
//! to `bulwark-vault` and `bulwark-guard`.

pub mod policy;
pub mod simulate;
