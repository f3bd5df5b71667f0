//! # Versions Subcommand
//!
//! Lists the schema versions installed in the corpus, one per line, in
//! ascending order.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use taxo_schema::SchemaRepository;

use crate::schema_dir::resolve_schema_dir;

/// Arguments for the versions subcommand.
#[derive(Args, Debug)]
pub struct VersionsArgs {
    /// Schema corpus directory holding `v1/`, `v2/`, ...
    #[arg(long, env = "TAXO_SCHEMA_DIR")]
    pub schema_dir: Option<PathBuf>,

    /// Print only the latest version.
    #[arg(long)]
    pub latest: bool,
}

/// Execute the versions subcommand.
pub fn run_versions(args: &VersionsArgs) -> Result<u8> {
    let cwd = std::env::current_dir().ok();
    let schema_dir = resolve_schema_dir(args.schema_dir.as_deref(), cwd.as_deref());
    for line in version_lines(&schema_dir, args.latest)? {
        println!("{line}");
    }
    Ok(0)
}

/// The lines `versions` prints for the corpus at `schema_dir`.
pub fn version_lines(schema_dir: &Path, latest_only: bool) -> Result<Vec<String>> {
    let repository = SchemaRepository::new(schema_dir)
        .with_context(|| format!("cannot open schema corpus at {}", schema_dir.display()))?;
    if latest_only {
        return Ok(vec![repository.latest().dir_name()]);
    }
    Ok(repository
        .list_versions()
        .iter()
        .map(|v| v.dir_name())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lists_numerically() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["v10", "v2", "v1", "vx", "notes"] {
            std::fs::create_dir(dir.path().join(name)).unwrap();
        }
        assert_eq!(version_lines(dir.path(), false).unwrap(), ["v1", "v2", "v10"]);
        assert_eq!(version_lines(dir.path(), true).unwrap(), ["v10"]);
    }

    #[test]
    fn test_empty_corpus_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = version_lines(dir.path(), false).unwrap_err();
        assert!(format!("{err:#}").contains("does not contain any schema versions"));
    }
}
