//! # Error Types
//!
//! Defines the error kinds shared across the taxonomy crates. All errors use
//! `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! ## Propagation Policy
//!
//! - Configuration errors (no schema versions installed) are fatal when a
//!   repository or parser is constructed, never per file.
//! - A missing or undecodable schema document is a `SchemaNotFound`; the
//!   parser records it as a single diagnostic rather than propagating it.
//! - `Reading` is the only error that terminates a parse abnormally.
//!
//! Input problems and validation findings are never errors of this type:
//! they are diagnostics counted on the parsed entry.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for taxonomy validation.
#[derive(Error, Debug)]
pub enum TaxonomyError {
    /// The schema root holds no `v<digits>` directories.
    #[error("schema base \"{}\" does not contain any schema versions", root.display())]
    NoSchemaVersions {
        /// The directory that was searched.
        root: PathBuf,
    },

    /// A schema document could not be read or decoded.
    #[error("cannot load schema v{version}/{name}.json: {reason}")]
    SchemaNotFound {
        /// The schema version directory that was searched.
        version: u32,
        /// Schema name without the `.json` extension.
        name: String,
        /// The underlying I/O or decode failure.
        reason: String,
    },

    /// The taxonomy file could not be read or decoded.
    #[error("error reading taxonomy file {}: {source}", path.display())]
    Reading {
        /// The file being parsed.
        path: PathBuf,
        /// The underlying failure.
        #[source]
        source: ReadingError,
    },
}

impl TaxonomyError {
    /// The `v<version>/<name>.json` reference of a missing schema, if this
    /// is a `SchemaNotFound` error.
    pub fn schema_ref(&self) -> Option<String> {
        match self {
            Self::SchemaNotFound { version, name, .. } => Some(format!("v{version}/{name}.json")),
            _ => None,
        }
    }
}

/// The cause of a [`TaxonomyError::Reading`] failure.
#[derive(Error, Debug)]
pub enum ReadingError {
    /// The file could not be read as UTF-8 text.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The content is not well-formed YAML.
    #[error("invalid YAML: {0}")]
    Yaml(String),
}
