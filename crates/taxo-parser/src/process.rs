//! # External Tool Invocation
//!
//! Runs an external command with text piped to its standard input and
//! captures its output. Used by the lint adapter and the line locator.
//!
//! No timeout is applied: a hung tool blocks the caller. Callers that need
//! bounded latency must put a deadline around the whole per-file parse.

use std::io::Write;
use std::process::{Command, ExitStatus, Output, Stdio};

use thiserror::Error;

/// Failure to obtain output from an external tool.
#[derive(Error, Debug)]
pub enum ToolError {
    /// The binary does not exist on `PATH`.
    #[error("command '{command}' not found")]
    NotFound {
        /// The program that was looked up.
        command: String,
    },

    /// The process could not be started or waited on.
    #[error("cannot run command '{command}': {source}")]
    Spawn {
        /// The program that failed.
        command: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The process ran and exited unsuccessfully.
    #[error("command '{command}' failed ({status}): {stderr}")]
    Failed {
        /// The program that failed.
        command: String,
        /// Its exit status.
        status: ExitStatus,
        /// Its trimmed standard error.
        stderr: String,
    },
}

impl ToolError {
    /// Whether the tool binary itself is missing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Run `program args...`, writing `input` to its standard input.
///
/// The input is written from a separate thread so a tool that produces
/// output before consuming all of its input cannot deadlock the pipe.
pub fn pipe_through(program: &str, args: &[&str], input: &str) -> Result<Output, ToolError> {
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ToolError::NotFound {
                command: program.to_string(),
            },
            _ => ToolError::Spawn {
                command: program.to_string(),
                source: e,
            },
        })?;

    let stdin = child.stdin.take();
    std::thread::scope(|scope| {
        if let Some(mut stdin) = stdin {
            scope.spawn(move || {
                // A tool may exit without reading everything; that is not an error here.
                if let Err(e) = stdin.write_all(input.as_bytes()) {
                    tracing::debug!(command = program, error = %e, "stdin closed early");
                }
            });
        }
        child.wait_with_output()
    })
    .map_err(|e| ToolError::Spawn {
        command: program.to_string(),
        source: e,
    })
}

/// Like [`pipe_through`], but treats a non-zero exit status as an error.
pub fn pipe_through_checked(
    program: &str,
    args: &[&str],
    input: &str,
) -> Result<String, ToolError> {
    let output = pipe_through(program, args, input)?;
    if output.status.success() {
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    } else {
        Err(ToolError::Failed {
            command: program.to_string(),
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }
}
