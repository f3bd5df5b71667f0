//! # Diagnostics
//!
//! A diagnostic is one reported error or warning against a taxonomy file,
//! with a 1-based position and an optional logical path into the parsed
//! document. Diagnostics are rendered and emitted immediately; only their
//! counts are kept on the parsed entry.
//!
//! Every channel shares the same location body,
//! `<file>:<line>:<col> [<path>] <message>`, where the bracketed path
//! segment is omitted entirely when the path is empty.

use serde::{Deserialize, Serialize};

use crate::format::MessageFormat;

/// Severity of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Counts against the file; the file is invalid.
    Error,
    /// Reported but does not make the file invalid.
    Warning,
}

impl Severity {
    /// Prefix used by the plain-text format.
    pub fn plain_prefix(&self) -> &'static str {
        match self {
            Self::Error => "ERROR",
            Self::Warning => "WARN",
        }
    }

    /// Workflow command name used by the GitHub annotation format.
    pub fn workflow_command(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.workflow_command())
    }
}

/// A single reported issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Error or warning.
    pub severity: Severity,
    /// Fully formatted message text.
    pub message: String,
    /// 1-based line; 1 when unknown.
    pub line: usize,
    /// 1-based column; 1 when unknown.
    pub column: usize,
    /// Logical path of the issue in the document; empty for the whole document.
    pub yaml_path: String,
}

impl Diagnostic {
    /// A diagnostic at line 1, column 1, covering the whole document.
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
            line: 1,
            column: 1,
            yaml_path: String::new(),
        }
    }

    /// Set the position. Zero is treated as unknown and becomes 1.
    pub fn at(mut self, line: usize, column: usize) -> Self {
        self.line = line.max(1);
        self.column = column.max(1);
        self
    }

    /// Set the logical path.
    pub fn with_path(mut self, yaml_path: impl Into<String>) -> Self {
        self.yaml_path = yaml_path.into();
        self
    }

    /// `<line>:<col> [<path>] <message>`, without the file.
    fn position_body(&self) -> String {
        if self.yaml_path.is_empty() {
            format!("{}:{} {}", self.line, self.column, self.message)
        } else {
            format!(
                "{}:{} [{}] {}",
                self.line, self.column, self.yaml_path, self.message
            )
        }
    }

    /// `<file>:<line>:<col> [<path>] <message>`.
    ///
    /// This is the message carried by structured-log records. `file` is
    /// substituted literally.
    pub fn located(&self, file: &str) -> String {
        format!("{file}:{}", self.position_body())
    }

    /// Render the single output line for `format`.
    ///
    /// `Auto` renders as plain text; callers are expected to resolve it
    /// first with [`MessageFormat::resolve`].
    pub fn render(&self, format: MessageFormat, file: &str) -> String {
        match format {
            MessageFormat::GithubAnnotation => format!(
                "::{} file={file},line={},col={}::{}",
                self.severity.workflow_command(),
                self.line,
                self.column,
                self.position_body()
            ),
            MessageFormat::StructuredLog => self.located(file),
            MessageFormat::PlainText | MessageFormat::Auto => {
                format!("{}: {}", self.severity.plain_prefix(), self.located(file))
            }
        }
    }
}
