//! Shared test utilities for the postkit test suite.
//!
//! Provides fixture setup, article builders, and directory snapshots for
//! tests that run the publish scheduler against real files.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_fixtures();
//! let before = snapshot_dir(tmp.path());
//! let report = publish::run(&PublishConfig::new(tmp.path()), now, |_| {}).unwrap();
//! assert_eq!(
//!     outcome_names(&report, |o| matches!(o, ArticleOutcome::Published { .. })),
//!     vec!["due-date-only.md", "due-with-offset.md"],
//! );
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::publish::{ArticleOutcome, PublishReport};

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/articles/` to a temp directory and return it.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/articles");
    for entry in std::fs::read_dir(&fixtures).unwrap() {
        let entry = entry.unwrap();
        std::fs::copy(entry.path(), tmp.path().join(entry.file_name())).unwrap();
    }
    tmp
}

// =========================================================================
// Article builders
// =========================================================================

/// Write `content` to `dir/name` and return the path.
pub fn write_article(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

pub fn read_article(path: &Path) -> String {
    std::fs::read_to_string(path).unwrap()
}

/// An article scheduled for `date` with `published: false`.
pub fn scheduled_article(date: &str, body: &str) -> String {
    format!("---\ntitle: Scheduled\ndate: {date}\npublished: false\n---\n{body}")
}

/// [`scheduled_article`] after the scheduler has flipped it.
pub fn scheduled_article_published(date: &str, body: &str) -> String {
    format!("---\ntitle: Scheduled\ndate: {date}\npublished: true\n---\n{body}")
}

// =========================================================================
// Assertions
// =========================================================================

/// File name → raw bytes for every file directly inside `dir`.
pub fn snapshot_dir(dir: &Path) -> BTreeMap<String, Vec<u8>> {
    std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().path())
        .filter(|p| p.is_file())
        .map(|p| {
            let name = p.file_name().unwrap().to_string_lossy().into_owned();
            (name, std::fs::read(&p).unwrap())
        })
        .collect()
}

/// File names of the articles whose outcome matches `pred`, in scan order.
pub fn outcome_names(
    report: &PublishReport,
    pred: impl Fn(&ArticleOutcome) -> bool,
) -> Vec<String> {
    report
        .articles
        .iter()
        .filter(|a| pred(&a.outcome))
        .map(|a| a.path.file_name().unwrap().to_string_lossy().into_owned())
        .collect()
}
