//! # bulwark CLI Entry Point
//!
//! Assembles subcommands and dispatches to handler modules.

use clap::Parser;

/// bulwark — pause and reentrancy guards for externally-callable state.
///
/// Runs reentrancy attack scenarios against each protection level and
/// inspects guard ordering policies.
#[derive(Parser, Debug)]
#[command(name = "bulwark", version, about)]
struct Cli {
    /// Emit logs as JSON.
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Run the reentrancy attack scenario.
    Simulate(bulwark_cli::simulate::SimulateArgs),
    /// Show or validate guard policies.
    Policy(bulwark_cli::policy::PolicyArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::from_default_env();
    if cli.json_logs {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }

    match cli.command {
        Commands::Simulate(args) => {
            let report = bulwark_cli::simulate::run_simulate(&args)?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::Policy(args) => {
            print!("{}", bulwark_cli::policy::run_policy(&args)?);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_simulate() {
        let cli = Cli::try_parse_from([
            "bulwark",
            "simulate",
            "--protection",
            "lock-only",
            "--attack",
            "transfer",
            "--reentries",
            "2",
        ])
        .unwrap();
        match cli.command {
            Commands::Simulate(args) => {
                assert_eq!(args.protection, bulwark_vault::Protection::LockOnly);
                assert_eq!(args.attack, bulwark_vault::AttackKind::Transfer);
                assert_eq!(args.reentries, 2);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_unknown_protection_rejected() {
        assert!(Cli::try_parse_from(["bulwark", "simulate", "--protection", "maybe"]).is_err());
    }
}
