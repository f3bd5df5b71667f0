//! # Parser Options
//!
//! The configuration surface accepted by [`crate::TaxonomyParser`]. Every
//! field has a default, so a configuration file only needs to name what it
//! changes.
//!
//! ```yaml
//! taxonomy_folders: [compositional_skills, knowledge]
//! schema_version: 0          # < 1: use each document's `version` key
//! yamllint_config: "{extends: relaxed, rules: {line-length: {max: 180}}}"
//! yamllint_strict: true
//! message_format: github
//! ```

use serde::Deserialize;
use taxo_core::{MessageFormat, SchemaVersion};

/// Taxonomy folders, which are also the schema names.
pub const DEFAULT_TAXONOMY_FOLDERS: [&str; 2] = ["compositional_skills", "knowledge"];

/// Default yamllint configuration.
pub const DEFAULT_YAMLLINT_CONFIG: &str =
    "{extends: relaxed, rules: {line-length: {max: 120}}}";

/// Default lint executable.
pub const DEFAULT_LINT_COMMAND: &str = "yamllint";

/// Default line-lookup executable.
pub const DEFAULT_LOCATOR_COMMAND: &str = "yq";

/// The only accepted taxonomy file name.
pub const QNA_FILE_NAME: &str = "qna.yaml";

/// Which schema version a parser validates against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "Option<i64>")]
pub enum VersionSelection {
    /// The highest version installed in the schema repository.
    #[default]
    Latest,
    /// Each document's own `version` key.
    FromDocument,
    /// Always this version.
    Fixed(SchemaVersion),
}

impl VersionSelection {
    /// Interpret the integer encoding: absent selects the latest version,
    /// anything below 1 selects the document's version, and `n >= 1` fixes
    /// version `n`.
    pub fn from_number(version: Option<i64>) -> Result<Self, String> {
        match version {
            None => Ok(Self::Latest),
            Some(n) if n < 1 => Ok(Self::FromDocument),
            Some(n) => SchemaVersion::from_i64(n)
                .map(Self::Fixed)
                .ok_or_else(|| format!("schema version {n} is out of range")),
        }
    }
}

impl TryFrom<Option<i64>> for VersionSelection {
    type Error = String;

    fn try_from(value: Option<i64>) -> Result<Self, Self::Error> {
        Self::from_number(value)
    }
}

/// Options for [`crate::TaxonomyParser`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParserOptions {
    /// Folder names that anchor a taxonomy path; also the schema names.
    pub taxonomy_folders: Vec<String>,
    /// Schema version selection.
    pub schema_version: VersionSelection,
    /// Configuration passed to the linter with `-d`.
    pub yamllint_config: String,
    /// Report every lint finding as an error.
    pub yamllint_strict: bool,
    /// Diagnostic output channel.
    pub message_format: MessageFormat,
    /// Lint executable.
    pub lint_command: String,
    /// Line-lookup executable.
    pub locator_command: String,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            taxonomy_folders: DEFAULT_TAXONOMY_FOLDERS.iter().map(|s| s.to_string()).collect(),
            schema_version: VersionSelection::Latest,
            yamllint_config: DEFAULT_YAMLLINT_CONFIG.to_string(),
            yamllint_strict: false,
            message_format: MessageFormat::Auto,
            lint_command: DEFAULT_LINT_COMMAND.to_string(),
            locator_command: DEFAULT_LOCATOR_COMMAND.to_string(),
        }
    }
}
