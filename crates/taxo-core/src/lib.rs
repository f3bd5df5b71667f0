//! # taxo-core — Foundational Types for Taxonomy Validation
//!
//! Leaf crate of the workspace. It defines the vocabulary shared by the
//! schema repository, the parser and the CLI:
//!
//! 1. **`SchemaVersion`.** A validated `>= 1` newtype parsed from `v<digits>`
//!    directory names and ordered numerically.
//!
//! 2. **`MessageFormat`.** The closed set of diagnostic output channels.
//!    `Auto` resolves once from the environment and never changes afterwards.
//!
//! 3. **`Diagnostic` rendering.** One location body shared by the plain-text,
//!    GitHub annotation and structured-log channels.
//!
//! 4. **`TaxonomyError`.** The small set of error kinds that propagate out of
//!    the library. Everything else is reported as a diagnostic.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `taxo-*` crates.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod diagnostic;
pub mod error;
pub mod format;
pub mod version;

// Re-export primary types for ergonomic imports.
pub use diagnostic::{Diagnostic, Severity};
pub use error::{ReadingError, TaxonomyError};
pub use format::{MessageFormat, UnknownMessageFormat, CI_ENV_MARKERS};
pub use version::SchemaVersion;
