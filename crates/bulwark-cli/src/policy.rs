//! # Policy Subcommand
//!
//! `bulwark policy show [--policy FILE]` prints the effective guard policy
//! as YAML. `bulwark policy check FILE` validates a policy file.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Subcommand};

use bulwark_guard::GuardPolicy;

/// Arguments for the policy subcommand.
#[derive(Args, Debug)]
pub struct PolicyArgs {
    #[command(subcommand)]
    pub command: PolicyCommand,
}

/// Policy operations.
#[derive(Subcommand, Debug)]
pub enum PolicyCommand {
    /// Print the effective policy.
    Show {
        /// Policy file; the built-in default is used when omitted.
        #[arg(long)]
        policy: Option<PathBuf>,
    },
    /// Validate a policy file.
    Check {
        /// Policy file to validate.
        file: PathBuf,
    },
}

/// Load `path`, or the default policy when no path is given.
pub fn load_policy(path: Option<&Path>) -> anyhow::Result<GuardPolicy> {
    match path {
        Some(path) => GuardPolicy::load(path)
            .with_context(|| format!("loading guard policy from {}", path.display())),
        None => Ok(GuardPolicy::default()),
    }
}

/// Execute the policy subcommand, returning the text to print.
pub fn run_policy(args: &PolicyArgs) -> anyhow::Result<String> {
    match &args.command {
        PolicyCommand::Show { policy } => {
            let policy = load_policy(policy.as_deref())?;
            Ok(policy.to_yaml()?)
        }
        PolicyCommand::Check { file } => {
            let policy = load_policy(Some(file.as_path()))?;
            tracing::info!(file = %file.display(), order = %policy.order, "policy valid");
            Ok(format!("{}: ok (order: {})\n", file.display(), policy.order))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn policy_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_show_default() {
        let out = run_policy(&PolicyArgs {
            command: PolicyCommand::Show { policy: None },
        })
        .unwrap();
        assert!(out.contains("pause_then_lock"));
    }

    #[test]
    fn test_check_valid_file() {
        let file = policy_file("order: lock_then_pause\n");
        let out = run_policy(&PolicyArgs {
            command: PolicyCommand::Check {
                file: file.path().to_path_buf(),
            },
        })
        .unwrap();
        assert!(out.contains("ok (order: lock_then_pause)"));
    }

    #[test]
    fn test_check_invalid_file() {
        let file = policy_file("order: sideways\n");
        let err = run_policy(&PolicyArgs {
            command: PolicyCommand::Check {
                file: file.path().to_path_buf(),
            },
        })
        .unwrap_err();
        assert!(format!("{err:#}").contains("invalid guard policy"));
    }
}
