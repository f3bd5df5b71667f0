//! # Message Formats
//!
//! Defines the `MessageFormat` enum selecting how diagnostics are rendered.
//! The set is closed: every renderer `match`es exhaustively, so adding a
//! channel forces each consumer to handle it.
//!
//! `Auto` is never rendered directly. It is resolved once, when a parsed
//! entry is created, to `GithubAnnotation` when both GitHub Actions
//! environment markers are present and to `PlainText` otherwise.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Environment markers that must both be set for `Auto` to pick
/// GitHub workflow-command output.
pub const CI_ENV_MARKERS: [&str; 2] = ["GITHUB_ACTIONS", "GITHUB_WORKFLOW"];

/// Output channel for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MessageFormat {
    /// Choose between `GithubAnnotation` and `PlainText` from the environment.
    #[default]
    Auto,
    /// `ERROR: file:line:col ...` / `WARN: file:line:col ...` on standard output.
    #[serde(alias = "standard")]
    PlainText,
    /// GitHub Actions workflow commands (`::error file=...`) on standard output.
    #[serde(alias = "github")]
    GithubAnnotation,
    /// Records at error or warning level through `tracing`.
    #[serde(alias = "logging")]
    StructuredLog,
}

impl MessageFormat {
    /// Returns all formats in declaration order.
    pub fn all() -> &'static [MessageFormat] {
        &[
            Self::Auto,
            Self::PlainText,
            Self::GithubAnnotation,
            Self::StructuredLog,
        ]
    }

    /// Returns the kebab-case identifier for this format.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::PlainText => "plain-text",
            Self::GithubAnnotation => "github-annotation",
            Self::StructuredLog => "structured-log",
        }
    }

    /// Resolve `Auto` against the process environment.
    pub fn resolve(self) -> Self {
        self.resolve_with(|name| std::env::var_os(name).is_some())
    }

    /// Resolve `Auto` using `is_set` to test for each environment marker.
    /// Concrete formats are returned unchanged.
    pub fn resolve_with(self, is_set: impl Fn(&str) -> bool) -> Self {
        match self {
            Self::Auto if CI_ENV_MARKERS.iter().all(|name| is_set(name)) => Self::GithubAnnotation,
            Self::Auto => Self::PlainText,
            concrete => concrete,
        }
    }
}

impl std::fmt::Display for MessageFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string names no known message format.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown message format {0:?}; expected one of auto, standard, github, logging")]
pub struct UnknownMessageFormat(pub String);

impl FromStr for MessageFormat {
    type Err = UnknownMessageFormat;

    /// Parse a message format, ignoring ASCII case.
    ///
    /// Accepts the kebab-case identifiers from [`MessageFormat::as_str()`]
    /// and the short names `standard`, `github` and `logging`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "auto" => Ok(Self::Auto),
            "standard" | "plain-text" => Ok(Self::PlainText),
            "github" | "github-annotation" => Ok(Self::GithubAnnotation),
            "logging" | "structured-log" => Ok(Self::StructuredLog),
            _ => Err(UnknownMessageFormat(s.to_string())),
        }
    }
}
