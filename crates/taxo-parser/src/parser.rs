//! # Taxonomy Parser
//!
//! Parses one `qna.yaml` file into a [`TaxonomyEntry`], reporting every
//! problem found along the way. The steps run strictly in order and the
//! first four can end the parse early:
//!
//! 1. anchor the path at the innermost taxonomy folder,
//! 2. check that the path is a regular file,
//! 3. check that it is named `qna.yaml`,
//! 4. decode the YAML (empty documents warn, non-mappings error),
//! 5. resolve the schema version,
//! 6. lint the raw text (skipped for version 1); repeated keys are
//!    reported here when the linter did not run,
//! 7. select the schema by taxonomy folder or document shape,
//! 8. validate against the schema, locating each violation's line.
//!
//! Only an unreadable or undecodable file escapes as an error
//! ([`TaxonomyError::Reading`]). Everything else is a diagnostic on the
//! returned entry.

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use serde_json::{Map, Value};
use taxo_core::{Diagnostic, ReadingError, SchemaVersion, Severity, TaxonomyError};
use taxo_schema::{collect_violations, SchemaRepository, SchemaResolver};

use crate::document::TaxonomyDocument;
use crate::entry::TaxonomyEntry;
use crate::lint::LintAdapter;
use crate::locate::LineLocator;
use crate::options::{ParserOptions, VersionSelection, QNA_FILE_NAME};

/// Schema used for documents with a `document` key outside a taxonomy folder.
const KNOWLEDGE_SCHEMA: &str = "knowledge";
/// Schema used for every other document outside a taxonomy folder.
const SKILLS_SCHEMA: &str = "compositional_skills";

/// Parser for taxonomy `qna.yaml` files.
///
/// A parser can be shared across threads; the schema cache and the
/// tool-availability flags are its only mutable state.
#[derive(Debug)]
pub struct TaxonomyParser {
    repository: Arc<SchemaRepository>,
    options: ParserOptions,
    fixed_version: Option<SchemaVersion>,
    lint: LintAdapter,
    locator: LineLocator,
}

impl TaxonomyParser {
    /// Create a parser over the schema corpus at `schema_dir`.
    ///
    /// # Errors
    ///
    /// Returns `TaxonomyError::NoSchemaVersions` if the corpus holds no
    /// schema versions.
    pub fn new(schema_dir: impl Into<PathBuf>, options: ParserOptions) -> Result<Self, TaxonomyError> {
        let repository = SchemaRepository::new(schema_dir)?;
        Ok(Self::with_repository(Arc::new(repository), options))
    }

    /// Create a parser over an already opened repository.
    pub fn with_repository(repository: Arc<SchemaRepository>, options: ParserOptions) -> Self {
        let fixed_version = match options.schema_version {
            VersionSelection::Latest => Some(repository.latest()),
            VersionSelection::FromDocument => None,
            VersionSelection::Fixed(version) => Some(version),
        };
        let lint = LintAdapter::new(
            options.lint_command.clone(),
            options.yamllint_config.clone(),
            options.yamllint_strict,
        );
        let locator = LineLocator::new(options.locator_command.clone());
        tracing::debug!(
            schema_root = %repository.root().display(),
            schema_version = ?fixed_version.map(SchemaVersion::get),
            message_format = %options.message_format,
            "taxonomy parser ready"
        );
        Self {
            repository,
            options,
            fixed_version,
            lint,
            locator,
        }
    }

    /// The schema repository.
    pub fn repository(&self) -> &Arc<SchemaRepository> {
        &self.repository
    }

    /// The options the parser was created with.
    pub fn options(&self) -> &ParserOptions {
        &self.options
    }

    /// The version every document is validated against, or `None` when
    /// each document's own `version` key decides.
    pub fn fixed_version(&self) -> Option<SchemaVersion> {
        self.fixed_version
    }

    /// Parse the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns `TaxonomyError::Reading` if the file cannot be read as UTF-8
    /// or is not well-formed YAML. All other problems are reported on the
    /// returned entry.
    pub fn parse(&self, path: impl AsRef<Path>) -> Result<TaxonomyEntry, TaxonomyError> {
        let abs_path = absolutize(path.as_ref());
        let taxonomy_path = self.taxonomy_path(&abs_path);
        let mut entry = TaxonomyEntry::new(taxonomy_path, abs_path.clone(), self.options.message_format);

        if !abs_path.is_file() {
            entry.error(format!(
                "The file \"{}\" does not exist or is not a file",
                abs_path.display()
            ));
            return Ok(entry);
        }

        let file_name = abs_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        if file_name != QNA_FILE_NAME {
            entry.error(format!(
                "Taxonomy file must be named \"{QNA_FILE_NAME}\"; \"{file_name}\" is not a valid name"
            ));
            return Ok(entry);
        }

        let reading = |source: ReadingError| TaxonomyError::Reading {
            path: abs_path.clone(),
            source,
        };
        let content = std::fs::read_to_string(&abs_path).map_err(|e| reading(e.into()))?;
        let document = TaxonomyDocument::decode(&content)
            .map_err(|e| reading(ReadingError::Yaml(e.to_string())))?;

        if document.is_empty() {
            entry.warning("The file is empty");
            return Ok(entry);
        }
        let Value::Object(parsed) = document.value else {
            entry.error(
                "The file is not valid. The top-level element is not an object with key-value pairs.",
            );
            return Ok(entry);
        };

        let version = match self.fixed_version {
            Some(version) => i64::from(version.get()),
            None => document_version(&parsed),
        };
        entry.version = version;
        entry.parsed = parsed;
        tracing::debug!(file = %entry.rel_path.display(), version, "decoded taxonomy file");

        let linted = version > 1 && {
            for diagnostic in self.lint.lint(&content) {
                entry.report(diagnostic);
            }
            self.lint.is_available()
        };
        // The linter reports repeated keys itself.
        if !linted {
            for duplicate in &document.duplicate_keys {
                let line = self.locator.locate(&duplicate.yaml_path, &content).unwrap_or(1);
                entry.report(
                    Diagnostic::new(Severity::Error, format!("Duplicate key \"{}\"", duplicate.key))
                        .at(line, 1)
                        .with_path(duplicate.yaml_path.clone()),
                );
            }
        }

        self.validate(&content, &mut entry);

        tracing::debug!(
            file = %entry.rel_path.display(),
            errors = entry.errors,
            warnings = entry.warnings,
            "parsed taxonomy file"
        );
        Ok(entry)
    }

    /// The path starting at the innermost taxonomy folder, or `abs_path`
    /// itself when no component names one.
    fn taxonomy_path(&self, abs_path: &Path) -> PathBuf {
        let components: Vec<Component<'_>> = abs_path.components().collect();
        components
            .iter()
            .rposition(|c| match c {
                Component::Normal(name) => self.is_taxonomy_folder(&name.to_string_lossy()),
                _ => false,
            })
            .map(|i| components[i..].iter().collect())
            .unwrap_or_else(|| abs_path.to_path_buf())
    }

    fn is_taxonomy_folder(&self, name: &str) -> bool {
        self.options.taxonomy_folders.iter().any(|f| f == name)
    }

    /// The schema for `entry`: its taxonomy folder, or the document shape
    /// when the file is outside any taxonomy folder.
    fn schema_name(&self, entry: &TaxonomyEntry) -> String {
        if let Some(Component::Normal(first)) = entry.path.components().next() {
            let first = first.to_string_lossy();
            if self.is_taxonomy_folder(&first) {
                return first.into_owned();
            }
        }
        if entry.parsed.contains_key("document") {
            KNOWLEDGE_SCHEMA.to_string()
        } else {
            SKILLS_SCHEMA.to_string()
        }
    }

    fn validate(&self, content: &str, entry: &mut TaxonomyEntry) {
        let name = self.schema_name(entry);

        let Some(version) = SchemaVersion::from_i64(entry.version) else {
            entry.error(format!(
                "Cannot load schema file v{}/{name}.json. Schema version {} is not valid",
                entry.version, entry.version
            ));
            return;
        };

        let resolver = SchemaResolver::new(Arc::clone(&self.repository), version);
        let validator = match resolver.build_validator(&name) {
            Ok(validator) => validator,
            Err(e) => {
                entry.error(format!("Cannot load schema file {}. {}", e.reference, e.reason));
                return;
            }
        };

        let instance = Value::Object(entry.parsed.clone());
        for violation in collect_violations(&validator, &instance) {
            let line = self.locator.locate(&violation.yaml_path, content).unwrap_or(1);
            entry.report(
                Diagnostic::new(Severity::Error, violation.message)
                    .at(line, 1)
                    .with_path(violation.yaml_path),
            );
        }
    }
}

/// The document's own `version`: 1 when absent, otherwise its integer
/// value, falling back to 1 when it has none. Schema validation reports the
/// ill-typed value separately.
fn document_version(parsed: &Map<String, Value>) -> i64 {
    match parsed.get("version") {
        None => 1,
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or(1),
        Some(Value::Bool(b)) => i64::from(*b),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(1),
        Some(_) => 1,
    }
}

/// Make `path` absolute, resolving symlinks when it exists and normalising
/// `.` and `..` lexically when it does not.
fn absolutize(path: &Path) -> PathBuf {
    if let Ok(canonical) = std::fs::canonicalize(path) {
        return canonical;
    }
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    };
    let mut normalised = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalised.pop();
            }
            other => normalised.push(other.as_os_str()),
        }
    }
    normalised
}
