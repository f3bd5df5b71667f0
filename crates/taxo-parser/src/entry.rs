//! # Taxonomy Entry
//!
//! The result of parsing one `qna.yaml` file. The entry is also the
//! diagnostic sink for that file: every error or warning is rendered in the
//! entry's message format and emitted immediately, and only the counts are
//! kept.
//!
//! Plain-text and GitHub annotation lines go to standard output. The
//! structured-log format emits `tracing` events at error or warning level
//! and leaves output to whichever subscriber the application installed.

use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use taxo_core::{Diagnostic, MessageFormat, Severity};

/// A parsed taxonomy file and the counts of what was reported against it.
#[derive(Debug, Clone)]
pub struct TaxonomyEntry {
    /// Taxonomy path, starting at the taxonomy folder holding the file.
    /// The absolute path when no taxonomy folder was found.
    pub path: PathBuf,
    /// Absolute path of the file.
    pub abs_path: PathBuf,
    /// `abs_path` relative to the working directory when it lies below it.
    /// This is the file name printed in diagnostics.
    pub rel_path: PathBuf,
    /// Resolved output format; never `Auto`.
    pub message_format: MessageFormat,
    /// Number of errors reported.
    pub errors: usize,
    /// Number of warnings reported.
    pub warnings: usize,
    /// The decoded document, empty until decoding succeeds.
    pub parsed: Map<String, Value>,
    /// The schema version the document was validated against; 0 until
    /// version resolution has run.
    pub version: i64,
}

impl TaxonomyEntry {
    /// Create an entry, resolving `Auto` against the process environment
    /// and `rel_path` against the current working directory.
    pub fn new(path: PathBuf, abs_path: PathBuf, message_format: MessageFormat) -> Self {
        let cwd = std::env::current_dir().ok();
        Self::with_context(path, abs_path, message_format.resolve(), cwd.as_deref())
    }

    /// Create an entry with an explicit working directory. `message_format`
    /// is used as given, except that `Auto` becomes plain text.
    pub fn with_context(
        path: PathBuf,
        abs_path: PathBuf,
        message_format: MessageFormat,
        cwd: Option<&Path>,
    ) -> Self {
        let rel_path = cwd
            .and_then(|cwd| abs_path.strip_prefix(cwd).ok())
            .filter(|rel| !rel.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| abs_path.clone());
        Self {
            path,
            abs_path,
            rel_path,
            message_format: message_format.resolve_with(|_| false),
            errors: 0,
            warnings: 0,
            parsed: Map::new(),
            version: 0,
        }
    }

    /// True when no errors were reported. Warnings do not count.
    pub fn is_valid(&self) -> bool {
        self.errors == 0
    }

    /// Report an error covering the whole document.
    pub fn error(&mut self, message: impl Into<String>) -> &mut Self {
        self.report(Diagnostic::new(Severity::Error, message))
    }

    /// Report a warning covering the whole document.
    pub fn warning(&mut self, message: impl Into<String>) -> &mut Self {
        self.report(Diagnostic::new(Severity::Warning, message))
    }

    /// Count and emit a diagnostic.
    pub fn report(&mut self, diagnostic: Diagnostic) -> &mut Self {
        match diagnostic.severity {
            Severity::Error => self.errors += 1,
            Severity::Warning => self.warnings += 1,
        }
        self.emit(&diagnostic);
        self
    }

    /// The line printed for `diagnostic`, or `None` for the structured-log
    /// format, which prints nothing itself.
    pub fn render(&self, diagnostic: &Diagnostic) -> Option<String> {
        match self.message_format {
            MessageFormat::StructuredLog => None,
            format => Some(diagnostic.render(format, &self.file_label())),
        }
    }

    fn file_label(&self) -> String {
        self.rel_path.display().to_string()
    }

    fn emit(&self, diagnostic: &Diagnostic) {
        match self.message_format {
            MessageFormat::StructuredLog => {
                let record = diagnostic.located(&self.file_label());
                match diagnostic.severity {
                    Severity::Error => tracing::error!("{record}"),
                    Severity::Warning => tracing::warn!("{record}"),
                }
            }
            format => println!("{}", diagnostic.render(format, &self.file_label())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(format: MessageFormat) -> TaxonomyEntry {
        TaxonomyEntry::with_context(
            PathBuf::from("knowledge/science/qna.yaml"),
            PathBuf::from("/work/taxonomy/knowledge/science/qna.yaml"),
            format,
            Some(Path::new("/work/taxonomy")),
        )
    }

    #[test]
    fn test_rel_path_below_cwd() {
        let e = entry(MessageFormat::PlainText);
        assert_eq!(e.rel_path, Path::new("knowledge/science/qna.yaml"));
    }

    #[test]
    fn test_rel_path_outside_cwd_stays_absolute() {
        let e = TaxonomyEntry::with_context(
            PathBuf::from("knowledge/qna.yaml"),
            PathBuf::from("/elsewhere/knowledge/qna.yaml"),
            MessageFormat::PlainText,
            Some(Path::new("/work")),
        );
        assert_eq!(e.rel_path, Path::new("/elsewhere/knowledge/qna.yaml"));

        let e = TaxonomyEntry::with_context(
            PathBuf::from("qna.yaml"),
            PathBuf::from("/work/qna.yaml"),
            MessageFormat::PlainText,
            None,
        );
        assert_eq!(e.rel_path, Path::new("/work/qna.yaml"));
    }

    #[test]
    fn test_counts_and_chaining() {
        let mut e = entry(MessageFormat::PlainText);
        assert!(e.is_valid());
        e.warning("The file is empty").warning("again");
        assert_eq!((e.errors, e.warnings), (0, 2));
        assert!(e.is_valid());
        e.error("bad");
        assert_eq!((e.errors, e.warnings), (1, 2));
        assert!(!e.is_valid());
    }

    #[test]
    fn test_render_uses_rel_path() {
        let e = entry(MessageFormat::GithubAnnotation);
        let d = Diagnostic::new(Severity::Error, "boom").at(4, 2).with_path(".seed_examples");
        assert_eq!(
            e.render(&d).unwrap(),
            "::error file=knowledge/science/qna.yaml,line=4,col=2::4:2 [.seed_examples] boom"
        );

        let e = entry(MessageFormat::PlainText);
        assert_eq!(
            e.render(&Diagnostic::new(Severity::Warning, "w")).unwrap(),
            "WARN: knowledge/science/qna.yaml:1:1 w"
        );
    }

    #[test]
    fn test_structured_log_renders_nothing() {
        let e = entry(MessageFormat::StructuredLog);
        assert!(e.render(&Diagnostic::new(Severity::Error, "x")).is_none());
    }

    #[test]
    fn test_auto_is_never_kept() {
        let e = entry(MessageFormat::Auto);
        assert_eq!(e.message_format, MessageFormat::PlainText);
    }
}
