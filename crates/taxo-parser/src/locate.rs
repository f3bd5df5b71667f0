//! # Line Locator
//!
//! Maps a schema violation's dotted path back to a line in the YAML text by
//! asking an external query tool: `<locator-command> "<path> | line"` with
//! the content on standard input, expecting one integer on standard output.
//!
//! Best-effort: any failure yields `None` and the caller falls back to line 1.
//! A missing binary disables the locator for the rest of its lifetime.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::process::pipe_through_checked;

/// Invokes the external line-lookup tool.
#[derive(Debug)]
pub struct LineLocator {
    command: String,
    available: AtomicBool,
}

impl LineLocator {
    /// Create a locator running `command`.
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            available: AtomicBool::new(true),
        }
    }

    /// Whether the tool has not yet been found missing.
    pub fn is_available(&self) -> bool {
        self.available.load(Ordering::Relaxed)
    }

    /// The 1-based line of `yaml_path` in `content`, if it can be determined.
    pub fn locate(&self, yaml_path: &str, content: &str) -> Option<usize> {
        if !self.is_available() {
            return None;
        }

        let expression = format!("{yaml_path} | line");
        match pipe_through_checked(&self.command, &[expression.as_str()], content) {
            Ok(stdout) => parse_line_number(&stdout),
            Err(e) => {
                if e.is_not_found() {
                    self.available.store(false, Ordering::Relaxed);
                }
                tracing::warn!(command = %self.command, error = %e, "could not run line lookup command");
                None
            }
        }
    }
}

/// The first line of `output` as a positive integer.
fn parse_line_number(output: &str) -> Option<usize> {
    output
        .lines()
        .next()?
        .trim()
        .parse::<usize>()
        .ok()
        .filter(|&line| line > 0)
}
