//! # taxo-schema — Versioned Schema Corpus
//!
//! Loads the taxonomy JSON Schemas from a directory of versions (`v1/`,
//! `v2/`, ...) and validates documents against them.
//!
//! ## Schema Repository (`repository`)
//!
//! [`SchemaRepository`] discovers the installed versions once, in numeric
//! order, and loads `v{version}/{name}.json` documents on demand through a
//! keyed cache. Construction fails when no versions are installed.
//!
//! ## Reference Resolution (`resolver`)
//!
//! [`SchemaResolver`] binds the repository to one version and plugs it into
//! the `jsonschema` engine as its retriever, so a schema can `$ref` sibling
//! files of the same version (for example the shared `version.json`).
//!
//! ## Violations (`violation`)
//!
//! [`collect_violations`] runs a compiled validator and normalises every
//! violation's message and path for reporting.
//!
//! ## Crate Policy
//!
//! - Depends only on `taxo-core` internally.
//! - Never performs network requests for `$ref` resolution.

pub mod repository;
pub mod resolver;
pub mod violation;

pub use repository::{FsSchemaSource, SchemaDocument, SchemaRepository, SchemaSource};
pub use resolver::{NoSuchResource, SchemaResolver};
pub use violation::{collect_violations, pointer_to_yaml_path, Violation, MAX_MESSAGE_CHARS};

/// Schemas every version directory must provide.
pub const REQUIRED_SCHEMAS: [&str; 3] = ["compositional_skills", "knowledge", "version"];
