//! # taxo CLI entry point
//!
//! Parses command-line arguments, installs the log subscriber and
//! dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use taxo_cli::validate::{run_validate, ValidateArgs, EXIT_FATAL};
use taxo_cli::versions::{run_versions, VersionsArgs};

/// Taxonomy validator.
///
/// Lints `qna.yaml` taxonomy files and validates them against the versioned
/// JSON Schema corpus, reporting problems as plain text, GitHub workflow
/// annotations or log records.
#[derive(Parser, Debug)]
#[command(name = "taxo", version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    log_json: bool,

    /// Path to a YAML file of parser options.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Lint and schema-validate taxonomy files.
    Validate(ValidateArgs),

    /// List the installed schema versions.
    Versions(VersionsArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.log_json);

    tracing::debug!("taxo CLI v{} starting", env!("CARGO_PKG_VERSION"));

    let result = match &cli.command {
        Commands::Validate(args) => run_validate(args, cli.config.as_deref()),
        Commands::Versions(args) => run_versions(args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(EXIT_FATAL)
        }
    }
}

/// Logs go to standard error. `RUST_LOG` takes precedence over `-v`.
fn init_tracing(verbose: u8, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        })
    });

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parse_validate() {
        let cli = Cli::try_parse_from(["taxo", "validate", "a/qna.yaml", "b/qna.yaml"]).unwrap();
        match cli.command {
            Commands::Validate(args) => {
                assert_eq!(args.paths.len(), 2);
                assert!(!args.yamllint_strict);
                assert!(args.schema_version.is_none());
            }
            other => panic!("Expected Validate, got {other:?}"),
        }
    }

    #[test]
    fn cli_parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "taxo", "validate", "-vv", "--log-json", "--config", "taxo.yaml", "qna.yaml",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(cli.log_json);
        assert_eq!(cli.config, Some(PathBuf::from("taxo.yaml")));
    }

    #[test]
    fn cli_parse_versions() {
        let cli = Cli::try_parse_from(["taxo", "versions", "--latest"]).unwrap();
        assert!(matches!(cli.command, Commands::Versions(VersionsArgs { latest: true, .. })));
    }

    #[test]
    fn cli_requires_subcommand() {
        assert!(Cli::try_parse_from(["taxo"]).is_err());
    }
}
