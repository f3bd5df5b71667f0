//! # taxo-cli — Taxonomy Validation Command-Line Interface
//!
//! ## Subcommands
//!
//! - `validate` — lint and schema-validate `qna.yaml` files
//! - `versions` — list the schema versions of the corpus
//!
//! ## Crate Policy
//!
//! - CLI construction (argument parsing) is separated from business logic.
//! - Handler functions delegate to `taxo-parser` and `taxo-schema`.
//! - Standard output carries only diagnostics and command output; logs go
//!   to standard error.

pub mod schema_dir;
pub mod validate;
pub mod versions;
