//! # Schema Versions
//!
//! A schema version is one generation of the taxonomy validation rules.
//! Each version lives in a directory named `v` followed only by decimal
//! digits (`v1`, `v2`, ...). Versions order numerically, so `v10` sorts
//! after `v9`.

use serde::{Deserialize, Serialize};

/// One generation of the schema corpus, always `>= 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct SchemaVersion(u32);

impl SchemaVersion {
    /// Create a schema version. Returns `None` for zero.
    pub fn new(version: u32) -> Option<Self> {
        (version >= 1).then_some(Self(version))
    }

    /// Create a schema version from an arbitrary integer, as found in a
    /// document's `version` key. Returns `None` when it is out of range.
    pub fn from_i64(version: i64) -> Option<Self> {
        u32::try_from(version).ok().and_then(Self::new)
    }

    /// Parse a version directory name such as `v2`.
    ///
    /// The name must be `v` followed by one or more ASCII digits and nothing
    /// else. `v0` is rejected.
    pub fn from_dir_name(name: &str) -> Option<Self> {
        let digits = name.strip_prefix('v')?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.parse::<u32>().ok().and_then(Self::new)
    }

    /// The directory name for this version, e.g. `v2`.
    pub fn dir_name(self) -> String {
        format!("v{}", self.0)
    }

    /// The numeric version.
    pub fn get(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u32> for SchemaVersion {
    type Error = String;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| format!("schema version must be at least 1, got {value}"))
    }
}

impl From<SchemaVersion> for u32 {
    fn from(value: SchemaVersion) -> Self {
        value.0
    }
}
