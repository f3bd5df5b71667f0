//! # taxo-parser — Taxonomy File Validation
//!
//! Validates taxonomy `qna.yaml` files: file classification, schema-version
//! resolution, YAML linting through an external linter, JSON Schema
//! validation against the versioned corpus, and diagnostic reporting.
//!
//! ## Usage
//!
//! ```no_run
//! use taxo_parser::{ParserOptions, TaxonomyParser};
//!
//! let parser = TaxonomyParser::new("schemas", ParserOptions::default())?;
//! let entry = parser.parse("taxonomy/knowledge/science/qna.yaml")?;
//! if !entry.is_valid() {
//!     eprintln!("{} error(s)", entry.errors);
//! }
//! # Ok::<(), taxo_core::TaxonomyError>(())
//! ```
//!
//! ## External Tools
//!
//! Linting and line lookup shell out to `yamllint` and `yq` (configurable
//! through [`ParserOptions`]). Both are optional: a missing binary is logged
//! once and the feature degrades to nothing or to line 1.

pub mod document;
pub mod entry;
pub mod lint;
pub mod locate;
pub mod options;
pub mod parser;
pub mod process;

pub use document::{DuplicateKey, TaxonomyDocument};
pub use entry::TaxonomyEntry;
pub use lint::{parse_lint_output, LintAdapter, LintFinding};
pub use locate::LineLocator;
pub use options::{
    ParserOptions, VersionSelection, DEFAULT_LINT_COMMAND, DEFAULT_LOCATOR_COMMAND,
    DEFAULT_TAXONOMY_FOLDERS, DEFAULT_YAMLLINT_CONFIG, QNA_FILE_NAME,
};
pub use parser::TaxonomyParser;
pub use process::ToolError;
