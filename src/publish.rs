//! Scheduled publishing.
//!
//! Scans a directory of articles and flips `published: false` to
//! `published: true` for every article whose frontmatter `date` has passed.
//!
//! ## Eligibility
//!
//! An article is only considered when its frontmatter is a mapping with
//! `published` set to exactly the boolean `false`. A missing `published` key
//! means the article is not under scheduler control; `published: true` means
//! it is already out. Because an updated article reads `published: true`,
//! running the scheduler again is a no-op.
//!
//! ```text
//! ---
//! title: Coming soon
//! date: 2024-05-01 09:00     # naive times are UTC
//! published: false          # becomes `published: true` once due
//! ---
//! ```
//!
//! ## Failure containment
//!
//! Every per-article problem (unreadable file, broken YAML, unparseable date,
//! failed write) is recorded as that article's [`ArticleOutcome`] and the scan
//! moves on. Only discovering the directory itself can fail the whole run.
//!
//! Articles are processed one at a time. There is no locking and no rollback:
//! a run that is killed part-way leaves earlier articles updated.

use crate::config::ToolConfig;
use crate::frontmatter::{self, Frontmatter};
use crate::schedule::{DateError, ScheduleDate};
use chrono::{DateTime, Utc};
use serde_yaml::Value;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PublishError {
    #[error("Error reading file: {0}")]
    Read(#[source] std::io::Error),
    #[error("Invalid YAML: {0}")]
    Yaml(#[from] frontmatter::FrontmatterError),
    #[error("Date parsing failed ({raw}): {source}")]
    Date {
        raw: String,
        #[source]
        source: DateError,
    },
    #[error("No top-level `published: false` line to rewrite")]
    NoPublishedLine,
    #[error("Failed to write file: {0}")]
    Write(#[source] std::io::Error),
    #[error("Failed to list {}: {source}", .dir.display())]
    Discover {
        dir: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

/// Configuration for a publish run.
#[derive(Debug, Clone, PartialEq)]
pub struct PublishConfig {
    pub articles_dir: PathBuf,
    /// Article extension without the dot, matched case-insensitively.
    pub extension: String,
    /// Evaluate and report without writing any file.
    pub dry_run: bool,
}

impl PublishConfig {
    pub fn new(articles_dir: impl Into<PathBuf>) -> Self {
        Self {
            articles_dir: articles_dir.into(),
            ..Self::default()
        }
    }

    /// Build a PublishConfig from ToolConfig values.
    pub fn from_tool_config(config: &ToolConfig) -> Self {
        Self {
            articles_dir: config.publish.articles_dir.clone(),
            extension: config.publish.extension.trim_start_matches('.').to_string(),
            dry_run: false,
        }
    }

    /// Glob-style description of what is scanned, for messages.
    pub fn search_pattern(&self) -> String {
        format!("{}/*.{}", self.articles_dir.display(), self.extension)
    }
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self::from_tool_config(&ToolConfig::default())
    }
}

/// Why an article was left alone without it being an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Document does not start with a `---` block.
    NoFrontmatter,
    /// Frontmatter parsed, but not as a key/value mapping.
    NotMapping,
    /// `published` is missing or anything other than `false`.
    NotScheduled,
    /// `published: false` but no usable `date`.
    NoDate,
}

/// Result of evaluating one article's text. Pure: no I/O.
#[derive(Debug, Clone, PartialEq)]
pub enum Evaluation {
    Skip(SkipReason),
    /// Scheduled for later.
    Pending { scheduled: DateTime<Utc> },
    /// Due now; `content` is the rewritten document.
    Due {
        scheduled: DateTime<Utc>,
        content: String,
    },
}

/// What happened to one article during a run.
#[derive(Debug)]
pub enum ArticleOutcome {
    Published { scheduled: DateTime<Utc> },
    /// Due, but left untouched because of `dry_run`.
    WouldPublish { scheduled: DateTime<Utc> },
    Pending { scheduled: DateTime<Utc> },
    Skipped(SkipReason),
    Failed(PublishError),
}

#[derive(Debug)]
pub struct ArticleReport {
    pub path: PathBuf,
    pub outcome: ArticleOutcome,
}

/// Summary of a whole run.
#[derive(Debug)]
pub struct PublishReport {
    pub now: DateTime<Utc>,
    pub search_pattern: String,
    pub dry_run: bool,
    pub articles: Vec<ArticleReport>,
}

impl PublishReport {
    /// Number of articles rewritten on disk.
    pub fn updated_count(&self) -> usize {
        self.count(|o| matches!(o, ArticleOutcome::Published { .. }))
    }

    /// Number of articles that were due, written or not.
    pub fn due_count(&self) -> usize {
        self.count(|o| {
            matches!(
                o,
                ArticleOutcome::Published { .. } | ArticleOutcome::WouldPublish { .. }
            )
        })
    }

    pub fn failed_count(&self) -> usize {
        self.count(|o| matches!(o, ArticleOutcome::Failed(_)))
    }

    pub fn any_updated(&self) -> bool {
        self.updated_count() > 0
    }

    fn count(&self, pred: impl Fn(&ArticleOutcome) -> bool) -> usize {
        self.articles.iter().filter(|a| pred(&a.outcome)).count()
    }
}

/// Decide what to do with one article's text at time `now`.
pub fn evaluate(content: &str, now: DateTime<Utc>) -> Result<Evaluation, PublishError> {
    let Some(fm) = Frontmatter::locate(content) else {
        return Ok(Evaluation::Skip(SkipReason::NoFrontmatter));
    };

    let data = fm.parse()?;
    let Value::Mapping(mapping) = data else {
        return Ok(Evaluation::Skip(SkipReason::NotMapping));
    };

    // Opt-in: only an explicit boolean `false` puts the article on a schedule
    if mapping.get("published") != Some(&Value::Bool(false)) {
        return Ok(Evaluation::Skip(SkipReason::NotScheduled));
    }

    let Some(raw_date) = mapping.get("date") else {
        return Ok(Evaluation::Skip(SkipReason::NoDate));
    };
    let date = match ScheduleDate::from_yaml(raw_date) {
        Ok(Some(date)) => date,
        Ok(None) => return Ok(Evaluation::Skip(SkipReason::NoDate)),
        Err(source) => {
            return Err(PublishError::Date {
                raw: display_yaml(raw_date),
                source,
            });
        }
    };

    let scheduled = date.to_utc();
    if !date.is_due(now) {
        return Ok(Evaluation::Pending { scheduled });
    }

    let yaml = frontmatter::mark_published(fm.yaml()).ok_or(PublishError::NoPublishedLine)?;
    Ok(Evaluation::Due {
        scheduled,
        content: fm.replace_yaml(&yaml),
    })
}

/// Render a YAML scalar the way it was most likely written.
fn display_yaml(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_else(|_| format!("{other:?}")),
    }
}

/// Writes an article's new text back to disk.
type WriteFn = dyn Fn(&Path, &str) -> std::io::Result<()>;

fn write_to_disk(path: &Path, content: &str) -> std::io::Result<()> {
    fs::write(path, content)
}

/// Read, evaluate, and (unless `dry_run`) rewrite a single article.
pub fn publish_article(path: &Path, now: DateTime<Utc>, dry_run: bool) -> ArticleOutcome {
    publish_article_with(path, now, dry_run, &write_to_disk)
}

fn publish_article_with(
    path: &Path,
    now: DateTime<Utc>,
    dry_run: bool,
    write: &WriteFn,
) -> ArticleOutcome {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => return ArticleOutcome::Failed(PublishError::Read(e)),
    };

    let outcome = match evaluate(&content, now) {
        Ok(Evaluation::Skip(reason)) => {
            log::debug!("skipping {}: {:?}", path.display(), reason);
            ArticleOutcome::Skipped(reason)
        }
        Ok(Evaluation::Pending { scheduled }) => ArticleOutcome::Pending { scheduled },
        Ok(Evaluation::Due { scheduled, .. }) if dry_run => {
            ArticleOutcome::WouldPublish { scheduled }
        }
        Ok(Evaluation::Due { scheduled, content }) => match write(path, &content) {
            Ok(()) => ArticleOutcome::Published { scheduled },
            Err(e) => ArticleOutcome::Failed(PublishError::Write(e)),
        },
        Err(e) => ArticleOutcome::Failed(e),
    };
    if let ArticleOutcome::Failed(e) = &outcome {
        log::warn!("{}: {}", path.display(), e);
    }
    outcome
}

/// List the articles directly inside `dir`, sorted by path.
///
/// Hidden files (names starting with `.`, such as `.draft.md`) are not
/// articles. A missing directory yields an empty list. Unreadable entries are
/// logged and skipped.
pub fn discover_articles(dir: &Path, extension: &str) -> Result<Vec<PathBuf>, PublishError> {
    if !dir.is_dir() {
        log::debug!("articles directory {} does not exist", dir.display());
        return Ok(Vec::new());
    }

    let walker = walkdir::WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name();

    let mut articles = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            // The root itself failing to open is fatal; anything below it is not
            Err(e) if e.depth() == 0 => {
                return Err(PublishError::Discover {
                    dir: dir.to_path_buf(),
                    source: e,
                });
            }
            Err(e) => {
                log::warn!("skipping unreadable entry in {}: {}", dir.display(), e);
                continue;
            }
        };

        if entry.file_name().to_string_lossy().starts_with('.') {
            continue;
        }
        let path = entry.path();
        let matches_ext = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(extension));
        // `is_file` follows symlinks, so linked articles count too
        if matches_ext && path.is_file() {
            articles.push(path.to_path_buf());
        }
    }
    Ok(articles)
}

/// Run the scheduler over `config.articles_dir` at time `now`.
///
/// `on_article` is called after each article is handled, in scan order, so
/// callers can stream diagnostics while the run is in progress.
pub fn run(
    config: &PublishConfig,
    now: DateTime<Utc>,
    on_article: impl FnMut(&ArticleReport),
) -> Result<PublishReport, PublishError> {
    run_with(config, now, &write_to_disk, on_article)
}

fn run_with(
    config: &PublishConfig,
    now: DateTime<Utc>,
    write: &WriteFn,
    mut on_article: impl FnMut(&ArticleReport),
) -> Result<PublishReport, PublishError> {
    let paths = discover_articles(&config.articles_dir, &config.extension)?;
    log::debug!(
        "found {} article(s) matching {}",
        paths.len(),
        config.search_pattern()
    );

    let mut articles = Vec::with_capacity(paths.len());
    for path in paths {
        let outcome = publish_article_with(&path, now, config.dry_run, write);
        let report = ArticleReport { path, outcome };
        on_article(&report);
        articles.push(report);
    }

    Ok(PublishReport {
        now,
        search_pattern: config.search_pattern(),
        dry_run: config.dry_run,
        articles,
    })
}
