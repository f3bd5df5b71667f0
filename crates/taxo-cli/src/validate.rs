//! # Validate Subcommand
//!
//! Parses each given `qna.yaml` file and prints its diagnostics.
//!
//! Exit codes: `0` when no file has errors (warnings do not fail the run),
//! `1` when any file has errors, `2` when a file could not be read at all.
//!
//! ```bash
//! taxo validate compositional_skills/writing/poetry/qna.yaml
//! taxo validate --schema-version 0 --format github knowledge/**/qna.yaml
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use taxo_core::MessageFormat;
use taxo_parser::{ParserOptions, TaxonomyParser, VersionSelection};

use crate::schema_dir::resolve_schema_dir;

/// Exit code when any file has errors.
pub const EXIT_INVALID: u8 = 1;
/// Exit code when a file could not be read or decoded.
pub const EXIT_FATAL: u8 = 2;

/// Arguments for the validate subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Taxonomy files to validate.
    #[arg(required = true, value_name = "PATH")]
    pub paths: Vec<PathBuf>,

    /// Schema corpus directory holding `v1/`, `v2/`, ...
    #[arg(long, env = "TAXO_SCHEMA_DIR")]
    pub schema_dir: Option<PathBuf>,

    /// Schema version to validate against. Values below 1 use each
    /// document's own `version`. Defaults to the latest version.
    #[arg(long, allow_negative_numbers = true)]
    pub schema_version: Option<i64>,

    /// yamllint configuration data.
    #[arg(long)]
    pub yamllint_config: Option<String>,

    /// Report every lint finding as an error.
    #[arg(long)]
    pub yamllint_strict: bool,

    /// Message format: auto, standard, github or logging.
    #[arg(long = "format", env = "TAXO_MESSAGE_FORMAT")]
    pub message_format: Option<MessageFormat>,

    /// Taxonomy folder name; repeat to give several. Replaces the defaults.
    #[arg(long = "taxonomy-folder", value_name = "NAME")]
    pub taxonomy_folders: Vec<String>,

    /// Lint executable.
    #[arg(long)]
    pub lint_command: Option<String>,

    /// Line-lookup executable.
    #[arg(long)]
    pub locator_command: Option<String>,
}

impl ValidateArgs {
    /// Parser options: the configuration file (or defaults) with every
    /// flag given on the command line applied on top.
    pub fn parser_options(&self, config: Option<&Path>) -> Result<ParserOptions> {
        let mut options = match config {
            Some(path) => load_options(path)?,
            None => ParserOptions::default(),
        };

        if let Some(version) = self.schema_version {
            options.schema_version =
                VersionSelection::from_number(Some(version)).map_err(anyhow::Error::msg)?;
        }
        if let Some(config) = &self.yamllint_config {
            options.yamllint_config = config.clone();
        }
        if self.yamllint_strict {
            options.yamllint_strict = true;
        }
        if let Some(format) = self.message_format {
            options.message_format = format;
        }
        if !self.taxonomy_folders.is_empty() {
            options.taxonomy_folders = self.taxonomy_folders.clone();
        }
        if let Some(command) = &self.lint_command {
            options.lint_command = command.clone();
        }
        if let Some(command) = &self.locator_command {
            options.locator_command = command.clone();
        }
        Ok(options)
    }
}

/// Read parser options from a YAML file.
pub fn load_options(path: &Path) -> Result<ParserOptions> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    serde_yaml::from_str(&text)
        .with_context(|| format!("invalid config file {}", path.display()))
}

/// Totals over one run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ValidationSummary {
    pub files: usize,
    pub errors: usize,
    pub warnings: usize,
    pub unreadable: usize,
}

impl ValidationSummary {
    /// The process exit code for this run.
    pub fn exit_code(&self) -> u8 {
        if self.unreadable > 0 {
            EXIT_FATAL
        } else if self.errors > 0 {
            EXIT_INVALID
        } else {
            0
        }
    }
}

/// Execute the validate subcommand.
pub fn run_validate(args: &ValidateArgs, config: Option<&Path>) -> Result<u8> {
    let options = args.parser_options(config)?;
    let cwd = std::env::current_dir().ok();
    let schema_dir = resolve_schema_dir(args.schema_dir.as_deref(), cwd.as_deref());
    let parser = TaxonomyParser::new(&schema_dir, options)
        .with_context(|| format!("cannot open schema corpus at {}", schema_dir.display()))?;

    let summary = validate_paths(&parser, &args.paths);
    tracing::info!(
        files = summary.files,
        errors = summary.errors,
        warnings = summary.warnings,
        unreadable = summary.unreadable,
        "validation complete"
    );
    Ok(summary.exit_code())
}

/// Parse every path, continuing past files that cannot be read.
pub fn validate_paths(parser: &TaxonomyParser, paths: &[PathBuf]) -> ValidationSummary {
    let mut summary = ValidationSummary::default();
    for path in paths {
        summary.files += 1;
        match parser.parse(path) {
            Ok(entry) => {
                summary.errors += entry.errors;
                summary.warnings += entry.warnings;
            }
            Err(e) => {
                summary.unreadable += 1;
                tracing::error!("{:#}", anyhow::Error::new(e));
            }
        }
    }
    summary
}
