//! Locating the schema corpus when `--schema-dir` is not given.

use std::path::{Path, PathBuf};

/// The corpus shipped next to this crate's sources.
const BUILTIN_SCHEMA_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../../schemas");

/// Pick the schema directory: the explicit one if given, else the nearest
/// `schemas/` directory holding a `v1/` version walking up from `cwd`, else
/// the corpus shipped with the sources.
pub fn resolve_schema_dir(explicit: Option<&Path>, cwd: Option<&Path>) -> PathBuf {
    if let Some(dir) = explicit {
        return dir.to_path_buf();
    }
    if let Some(found) = cwd.and_then(find_upwards) {
        tracing::debug!(schema_dir = %found.display(), "found schema corpus");
        return found;
    }
    PathBuf::from(BUILTIN_SCHEMA_DIR)
}

fn find_upwards(start: &Path) -> Option<PathBuf> {
    start.ancestors().map(|dir| dir.join("schemas")).find(|candidate| candidate.join("v1").is_dir())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_dir_wins() {
        let dir = resolve_schema_dir(Some(Path::new("/opt/schemas")), Some(Path::new("/")));
        assert_eq!(dir, Path::new("/opt/schemas"));
    }

    #[test]
    fn test_walks_up_from_cwd() {
        let root = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(root.path().join("schemas/v1")).unwrap();
        let nested = root.path().join("taxonomy/knowledge");
        std::fs::create_dir_all(&nested).unwrap();

        let dir = resolve_schema_dir(None, Some(&nested));
        assert_eq!(dir, root.path().join("schemas"));
    }

    #[test]
    fn test_builtin_fallback() {
        let root = tempfile::tempdir().unwrap();
        let dir = resolve_schema_dir(None, Some(root.path()));
        // A temp dir's ancestors normally hold no corpus.
        if !root.path().ancestors().any(|a| a.join("schemas/v1").is_dir()) {
            assert_eq!(dir, PathBuf::from(BUILTIN_SCHEMA_DIR));
        }
        assert!(PathBuf::from(BUILTIN_SCHEMA_DIR).join("v1").is_dir());
    }
}
