//! # Reference Resolution
//!
//! Adapts the [`SchemaRepository`] to the `jsonschema` crate's retrieval
//! contract. A resolver is bound to one schema version: every reference it
//! sees is interpreted as a file name inside that version's directory, so
//! `compositional_skills.json` can `$ref` its sibling `./version.json`.
//!
//! Schemas in the corpus carry no `$id`, so the engine presents relative
//! references against its default base URI (`json-schema:///version.json`).
//! Only the last path segment of a reference is significant.
//!
//! No network access is ever attempted; a reference that does not name a
//! document of the bound version is a [`NoSuchResource`]. Draft metaschemas
//! (`https://json-schema.org/...`) ship with the engine and are never served
//! from the corpus.

use std::sync::Arc;

use jsonschema::{Retrieve, Uri, Validator};
use serde_json::Value;
use taxo_core::{SchemaVersion, TaxonomyError};
use thiserror::Error;

use crate::repository::{SchemaDocument, SchemaRepository};

const METASCHEMA_PREFIX: &str = "https://json-schema.org/";

/// A schema resource could not be resolved or compiled.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{reason}")]
pub struct NoSuchResource {
    /// The reference as it would appear in the corpus, e.g. `v2/knowledge.json`.
    pub reference: String,
    /// Why resolution failed.
    pub reason: String,
}

/// Resolves schema references within a single schema version.
#[derive(Debug, Clone)]
pub struct SchemaResolver {
    repository: Arc<SchemaRepository>,
    version: SchemaVersion,
}

impl SchemaResolver {
    /// Bind a resolver to `version` of `repository`.
    pub fn new(repository: Arc<SchemaRepository>, version: SchemaVersion) -> Self {
        Self {
            repository,
            version,
        }
    }

    /// The version this resolver is bound to.
    pub fn version(&self) -> SchemaVersion {
        self.version
    }

    /// Resolve a reference such as `knowledge.json`, `./version.json` or
    /// `json-schema:///version.json` to a schema document.
    ///
    /// # Errors
    ///
    /// Returns `NoSuchResource` if the reference names no loadable document.
    pub fn resolve(&self, reference: &str) -> Result<Arc<SchemaDocument>, NoSuchResource> {
        if reference.starts_with(METASCHEMA_PREFIX) {
            return Err(NoSuchResource {
                reference: reference.to_string(),
                reason: format!("metaschema {reference:?} is not part of the schema corpus"),
            });
        }
        let name = schema_name_of(reference);
        if name.is_empty() {
            return Err(NoSuchResource {
                reference: reference.to_string(),
                reason: format!("reference {reference:?} does not name a schema file"),
            });
        }
        self.repository
            .load(self.version, name)
            .map_err(|e| NoSuchResource {
                reference: format!("{}/{name}.json", self.version.dir_name()),
                reason: match e {
                    TaxonomyError::SchemaNotFound { reason, .. } => reason,
                    other => other.to_string(),
                },
            })
    }

    /// Compile a Draft 2020-12 validator rooted at `<name>.json`, with this
    /// resolver installed for every cross-document reference.
    ///
    /// # Errors
    ///
    /// Returns `NoSuchResource` if the root schema cannot be loaded, or if
    /// compilation fails (including unresolvable `$ref`s).
    pub fn build_validator(&self, name: &str) -> Result<Validator, NoSuchResource> {
        let root = self.resolve(&format!("{name}.json"))?;

        let mut opts = jsonschema::options();
        opts.with_draft(jsonschema::Draft::Draft202012);
        opts.with_retriever(self.clone());

        opts.build(&root.contents).map_err(|e| NoSuchResource {
            reference: format!("{}/{name}.json", self.version.dir_name()),
            reason: e.to_string(),
        })
    }
}

impl Retrieve for SchemaResolver {
    fn retrieve(
        &self,
        uri: &Uri<&str>,
    ) -> Result<Value, Box<dyn std::error::Error + Send + Sync>> {
        let doc = self.resolve(uri.as_str())?;
        tracing::trace!(uri = uri.as_str(), schema = %doc.path.display(), "resolved schema reference");
        Ok(doc.contents.clone())
    }
}

/// Extract the schema name from a reference: the last path segment with
/// any fragment and `.json` extension removed.
fn schema_name_of(reference: &str) -> &str {
    let without_fragment = reference.split('#').next().unwrap_or(reference);
    let file = without_fragment
        .rsplit('/')
        .next()
        .unwrap_or(without_fragment);
    file.strip_suffix(".json").unwrap_or(file)
}
