//! Shared test helpers for integration tests.
//!
//! The external linter and line-lookup tool are replaced by small shell
//! scripts so results do not depend on what is installed on the host.

#![allow(dead_code)]

use std::io::Write;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use taxo_core::MessageFormat;
use taxo_parser::{ParserOptions, TaxonomyParser, VersionSelection};

/// Flags lines longer than the `max:` found in the config argument.
const FAKE_LINT: &str = r#"#!/bin/sh
max=$(printf '%s' "$4" | sed -n 's/.*max: *\([0-9][0-9]*\).*/\1/p')
[ -n "$max" ] || max=80
awk -v max="$max" 'length($0) > max {
  printf "stdin:%d:%d: [warning] line too long (%d > %d characters) (line-length)\n", NR, max + 1, length($0), max
}'
"#;

/// Answers `.<key>... | line` with the line of the top-level `<key>:`.
const FAKE_LOCATOR: &str = r#"#!/bin/sh
expr="${1% | line}"
key=$(printf '%s' "$expr" | sed -n 's/^\.\([A-Za-z0-9_-][A-Za-z0-9_-]*\).*/\1/p')
if [ -z "$key" ]; then
  echo 1
  exit 0
fi
grep -n "^$key:" | head -n 1 | cut -d: -f1 | grep . || echo 0
"#;

/// Relative path of the fixture directory, as seen from the crate root.
pub const TESTDATA: &str = "tests/testdata";

/// The shipped schema corpus.
pub fn schema_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../schemas")
}

/// `tests/testdata/<name>`, relative to the crate root.
pub fn testdata(name: &str) -> PathBuf {
    Path::new(TESTDATA).join(name)
}

/// Fake tool scripts living in a temporary directory.
pub struct FakeTools {
    _dir: tempfile::TempDir,
    pub lint: PathBuf,
    pub locator: PathBuf,
}

impl FakeTools {
    pub fn install() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create tool dir");
        let lint = write_script(dir.path(), "fake-yamllint", FAKE_LINT);
        let locator = write_script(dir.path(), "fake-yq", FAKE_LOCATOR);
        Self {
            _dir: dir,
            lint,
            locator,
        }
    }

    /// Default options pointing at the fake tools.
    pub fn options(&self, schema_version: VersionSelection, format: MessageFormat) -> ParserOptions {
        ParserOptions {
            schema_version,
            message_format: format,
            lint_command: self.lint.to_string_lossy().into_owned(),
            locator_command: self.locator.to_string_lossy().into_owned(),
            ..ParserOptions::default()
        }
    }

    pub fn parser(&self, options: ParserOptions) -> TaxonomyParser {
        TaxonomyParser::new(schema_dir(), options).expect("Failed to open schema corpus")
    }
}

fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, body).expect("Failed to write script");
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
        .expect("Failed to make script executable");
    path
}

/// One captured log record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub level: String,
    pub message: String,
}

#[derive(Clone, Default)]
struct SharedBuf(Arc<Mutex<Vec<u8>>>);

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().expect("log buffer poisoned").extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Run `f` with a subscriber recording warning and error events.
pub fn capture_logs<T>(f: impl FnOnce() -> T) -> (T, Vec<Record>) {
    let buf = SharedBuf::default();
    let writer = buf.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_max_level(tracing::Level::WARN)
        .with_ansi(false)
        .without_time()
        .with_target(false)
        .finish();

    let result = tracing::subscriber::with_default(subscriber, f);

    let bytes = buf.0.lock().expect("log buffer poisoned").clone();
    let records = String::from_utf8_lossy(&bytes)
        .lines()
        .filter_map(|line| {
            let (level, message) = line.trim_start().split_once(' ')?;
            Some(Record {
                level: level.to_string(),
                message: message.trim_start().to_string(),
            })
        })
        .collect();
    (result, records)
}

/// Levels of the records whose message contains `needle`.
pub fn levels_of<'a>(records: &'a [Record], needle: &str) -> Vec<&'a str> {
    records
        .iter()
        .filter(|r| r.message.contains(needle))
        .map(|r| r.level.as_str())
        .collect()
}
