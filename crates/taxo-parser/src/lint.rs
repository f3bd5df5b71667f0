//! # Lint Adapter
//!
//! Runs the external YAML linter over a file's raw text and turns its
//! parsable output into diagnostics.
//!
//! The linter is invoked as `<lint-command> -f parsable -d <config> -` with
//! the content on standard input. Each finding is one line of the form
//! `<file>:<line>:<col>: [<severity>] <message>`; anything else in the
//! output is ignored.
//!
//! Linting is best-effort. When the linter binary is missing, the adapter
//! logs a warning once and reports nothing for the rest of its lifetime.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::OnceLock;

use regex::Regex;
use taxo_core::{Diagnostic, Severity};

use crate::process::pipe_through;

/// One parsed line of linter output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintFinding {
    /// 1-based line.
    pub line: usize,
    /// 1-based column.
    pub column: usize,
    /// Severity as printed by the linter (`error`, `warning`, ...).
    pub severity: String,
    /// Finding text, including the rule name.
    pub message: String,
}

impl LintFinding {
    /// Convert to a diagnostic. `error` findings are always errors; any
    /// other severity is a warning unless `strict` escalates it.
    pub fn into_diagnostic(self, strict: bool) -> Diagnostic {
        let severity = if strict || self.severity == "error" {
            Severity::Error
        } else {
            Severity::Warning
        };
        Diagnostic::new(severity, self.message).at(self.line, self.column)
    }
}

fn finding_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"^[^:]+:(?P<line>\d+):(?P<col>\d+):\s*\[(?P<severity>[^\]]+)\]\s*(?P<message>.*)$",
        )
        .unwrap_or_else(|e| unreachable!("lint finding pattern is valid: {e}"))
    })
}

/// Parse the linter's parsable output. Lines that do not look like a
/// finding are skipped.
pub fn parse_lint_output(output: &str) -> Vec<LintFinding> {
    let pattern = finding_pattern();
    output
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| {
            let caps = pattern.captures(line)?;
            Some(LintFinding {
                line: caps["line"].parse().ok()?,
                column: caps["col"].parse().ok()?,
                severity: caps["severity"].trim().to_string(),
                message: caps["message"].trim_end().to_string(),
            })
        })
        .collect()
}

/// Invokes the external linter.
#[derive(Debug)]
pub struct LintAdapter {
    command: String,
    config: String,
    strict: bool,
    available: AtomicBool,
}

impl LintAdapter {
    /// Create an adapter for `command`, passing `config` with `-d`.
    pub fn new(command: impl Into<String>, config: impl Into<String>, strict: bool) -> Self {
        Self {
            command: command.into(),
            config: config.into(),
            strict,
            available: AtomicBool::new(true),
        }
    }

    /// Whether every finding is reported as an error.
    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// Whether the linter has not yet been found missing.
    pub fn is_available(&self) -> bool {
        self.available.load(Ordering::Relaxed)
    }

    /// Lint `content` and return one diagnostic per finding.
    ///
    /// Standard output and standard error are both scanned. The linter's
    /// exit status is ignored since it is non-zero whenever it finds problems.
    pub fn lint(&self, content: &str) -> Vec<Diagnostic> {
        if !self.is_available() {
            return Vec::new();
        }

        let args = ["-f", "parsable", "-d", self.config.as_str(), "-"];
        let output = match pipe_through(&self.command, &args, content) {
            Ok(output) => output,
            Err(e) => {
                if e.is_not_found() {
                    self.available.store(false, Ordering::Relaxed);
                }
                tracing::warn!(command = %self.command, error = %e, "could not run lint command");
                return Vec::new();
            }
        };

        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        if !output.stderr.is_empty() {
            if !text.is_empty() && !text.ends_with('\n') {
                text.push('\n');
            }
            text.push_str(&String::from_utf8_lossy(&output.stderr));
        }

        let findings = parse_lint_output(&text);
        tracing::debug!(findings = findings.len(), "lint pass complete");
        findings
            .into_iter()
            .map(|f| f.into_diagnostic(self.strict))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OUTPUT: &str = "\
stdin:3:121: [warning] line too long (135 > 120 characters) (line-length)
stdin:9:1: [error] syntax error: could not find expected ':' (syntax)

some banner the linter printed
stdin:12:5: [warning] wrong indentation: expected 4 but found 2 (indentation)
";

    #[test]
    fn test_parse_lint_output() {
        let findings = parse_lint_output(OUTPUT);
        assert_eq!(findings.len(), 3);
        assert_eq!(
            findings[0],
            LintFinding {
                line: 3,
                column: 121,
                severity: "warning".to_string(),
                message: "line too long (135 > 120 characters) (line-length)".to_string(),
            }
        );
        assert_eq!(findings[1].severity, "error");
        assert_eq!(findings[2].line, 12);
        assert_eq!(findings[2].column, 5);
    }

    #[test]
    fn test_non_numeric_positions_are_skipped() {
        assert!(parse_lint_output("stdin:x:1: [warning] nope").is_empty());
        assert!(parse_lint_output("no finding here").is_empty());
    }

    #[test]
    fn test_severity_mapping() {
        let findings = parse_lint_output(OUTPUT);
        let relaxed: Vec<Severity> = findings
            .iter()
            .cloned()
            .map(|f| f.into_diagnostic(false).severity)
            .collect();
        assert_eq!(relaxed, [Severity::Warning, Severity::Error, Severity::Warning]);

        let strict: Vec<Severity> = findings
            .into_iter()
            .map(|f| f.into_diagnostic(true).severity)
            .collect();
        assert_eq!(strict, [Severity::Error; 3]);
    }

    #[test]
    fn test_diagnostic_carries_position_without_path() {
        let finding = parse_lint_output(OUTPUT).remove(0);
        let d = finding.into_diagnostic(false);
        assert_eq!((d.line, d.column), (3, 121));
        assert!(d.yaml_path.is_empty());
    }

    #[test]
    fn test_missing_linter_disables_adapter() {
        let adapter = LintAdapter::new("taxo-no-such-linter-12345", "{}", false);
        assert!(adapter.is_available());
        assert!(adapter.lint("a: 1\n").is_empty());
        assert!(!adapter.is_available());
        assert!(adapter.lint("a: 1\n").is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_lint_reads_both_streams_and_passes_config() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("fake-lint");
        std::fs::write(
            &script,
            "#!/bin/sh\n\
             echo \"stdin:2:1: [warning] config=$4 (rule)\"\n\
             echo 'stdin:4:1: [error] from stderr (rule)' >&2\n\
             exit 1\n",
        )
        .unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let adapter = LintAdapter::new(script.to_string_lossy(), "relaxed", false);
        let diagnostics = adapter.lint("a: 1\n");
        assert_eq!(diagnostics.len(), 2);
        assert_eq!(diagnostics[0].severity, Severity::Warning);
        assert_eq!(diagnostics[0].message, "config=relaxed (rule)");
        assert_eq!(diagnostics[1].severity, Severity::Error);
        assert_eq!(diagnostics[1].line, 4);
        assert!(adapter.is_available());
    }
}
