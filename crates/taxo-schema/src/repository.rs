//! # Schema Repository
//!
//! Enumerates and loads versioned schema documents from a directory laid out
//! as `v1/`, `v2/`, ... with one `<name>.json` file per schema.
//!
//! ## Caching
//!
//! Loaded documents are cached keyed by the exact `(version, name)` pair.
//! The first successful load of a key wins; every later call returns the
//! same `Arc`, so repeated loads are pure lookups and never touch the
//! [`SchemaSource`] again. Failed loads are not cached.
//!
//! The cache is shared read-only between concurrent validations; the lock
//! is only held for the map operations, never across I/O.

use std::collections::HashMap;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::Value;
use taxo_core::{SchemaVersion, TaxonomyError};

/// Raw access to a schema corpus.
///
/// The filesystem implementation is [`FsSchemaSource`]; tests substitute
/// their own to observe how often documents are read.
pub trait SchemaSource: fmt::Debug + Send + Sync {
    /// The corpus root, used for error messages and document paths.
    fn root(&self) -> &Path;

    /// Names of the entries directly under the root.
    fn entries(&self) -> io::Result<Vec<String>>;

    /// Read a file below the root as UTF-8 text.
    fn read(&self, relative: &Path) -> io::Result<String>;
}

/// A schema corpus on the local filesystem.
#[derive(Debug, Clone)]
pub struct FsSchemaSource {
    root: PathBuf,
}

impl FsSchemaSource {
    /// Create a source rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl SchemaSource for FsSchemaSource {
    fn root(&self) -> &Path {
        &self.root
    }

    fn entries(&self) -> io::Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in std::fs::read_dir(&self.root)? {
            let entry = entry?;
            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_string());
            }
        }
        Ok(names)
    }

    fn read(&self, relative: &Path) -> io::Result<String> {
        std::fs::read_to_string(self.root.join(relative))
    }
}

/// An immutable parsed schema, identified by `(version, name)`.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaDocument {
    /// Version directory the document came from.
    pub version: SchemaVersion,
    /// Schema name without the `.json` extension.
    pub name: String,
    /// Path of the originating file.
    pub path: PathBuf,
    /// Decoded JSON contents.
    pub contents: Value,
}

/// Versioned schema documents with per-`(version, name)` caching.
#[derive(Debug)]
pub struct SchemaRepository {
    source: Box<dyn SchemaSource>,
    /// Discovered versions, ascending. Never empty.
    versions: Vec<SchemaVersion>,
    latest: SchemaVersion,
    cache: RwLock<HashMap<(SchemaVersion, String), Arc<SchemaDocument>>>,
}

impl SchemaRepository {
    /// Open the schema corpus rooted at `root` on the filesystem.
    ///
    /// # Errors
    ///
    /// Returns `TaxonomyError::NoSchemaVersions` if the root cannot be listed
    /// or contains no `v<digits>` entries.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, TaxonomyError> {
        Self::with_source(FsSchemaSource::new(root))
    }

    /// Open a schema corpus backed by an arbitrary source.
    ///
    /// # Errors
    ///
    /// Returns `TaxonomyError::NoSchemaVersions` if no versions are found.
    pub fn with_source(source: impl SchemaSource + 'static) -> Result<Self, TaxonomyError> {
        let (versions, latest) = discover_versions(&source)?;
        tracing::debug!(
            root = %source.root().display(),
            versions = ?versions.iter().map(|v| v.get()).collect::<Vec<_>>(),
            "discovered schema versions"
        );
        Ok(Self {
            source: Box::new(source),
            versions,
            latest,
            cache: RwLock::new(HashMap::new()),
        })
    }

    /// Returns the corpus root.
    pub fn root(&self) -> &Path {
        self.source.root()
    }

    /// Discovered versions in ascending numeric order. Never empty.
    pub fn list_versions(&self) -> &[SchemaVersion] {
        &self.versions
    }

    /// The highest discovered version.
    pub fn latest(&self) -> SchemaVersion {
        self.latest
    }

    /// Whether `version` is one of the discovered versions.
    pub fn contains(&self, version: SchemaVersion) -> bool {
        self.versions.binary_search(&version).is_ok()
    }

    /// Load `v{version}/{name}.json`.
    ///
    /// # Errors
    ///
    /// Returns `TaxonomyError::SchemaNotFound` wrapping any I/O or JSON
    /// decode failure.
    pub fn load(
        &self,
        version: SchemaVersion,
        name: &str,
    ) -> Result<Arc<SchemaDocument>, TaxonomyError> {
        let key = (version, name.to_string());
        if let Some(doc) = self.cache.read().get(&key) {
            return Ok(Arc::clone(doc));
        }

        let relative = Path::new(&version.dir_name()).join(format!("{name}.json"));
        let not_found = |reason: String| TaxonomyError::SchemaNotFound {
            version: version.get(),
            name: name.to_string(),
            reason,
        };

        let text = self
            .source
            .read(&relative)
            .map_err(|e| not_found(e.to_string()))?;
        let contents: Value =
            serde_json::from_str(&text).map_err(|e| not_found(format!("invalid JSON: {e}")))?;

        tracing::debug!(schema = %relative.display(), "loaded schema document");

        let doc = Arc::new(SchemaDocument {
            version,
            name: name.to_string(),
            path: self.source.root().join(&relative),
            contents,
        });
        let mut cache = self.cache.write();
        Ok(Arc::clone(cache.entry(key).or_insert(doc)))
    }

    /// Number of cached documents.
    pub fn cached_count(&self) -> usize {
        self.cache.read().len()
    }
}

/// List the `v<digits>` entries of a source, sorted numerically, together
/// with the highest one.
fn discover_versions(
    source: &dyn SchemaSource,
) -> Result<(Vec<SchemaVersion>, SchemaVersion), TaxonomyError> {
    let no_versions = || TaxonomyError::NoSchemaVersions {
        root: source.root().to_path_buf(),
    };
    let entries = source.entries().map_err(|e| {
        tracing::debug!(root = %source.root().display(), error = %e, "cannot list schema root");
        no_versions()
    })?;

    let mut versions: Vec<SchemaVersion> = entries
        .iter()
        .filter_map(|name| SchemaVersion::from_dir_name(name))
        .collect();
    versions.sort();
    versions.dedup();

    match versions.last().copied() {
        Some(latest) => Ok((versions, latest)),
        None => Err(no_versions()),
    }
}
