//! CLI output formatting for both tools.
//!
//! Each command has `format_*` functions (returning `Vec<String>` or
//! `String`) for testability, and `print_*` wrappers that write to stdout.
//! Format functions are pure and never touch stdout.
//!
//! # Output Format
//!
//! ## Cover
//!
//! ```text
//! Success: Created 'covers/post.png'. Size: (1000, 420)
//! ```
//!
//! ## Publish
//!
//! ```text
//! Checking for scheduled articles at 2030-01-01T00:00:00+00:00
//!     Publishing: articles/launch.md (Scheduled: 2020-01-01T00:00:00+00:00)
//!     Pending: articles/next.md (Scheduled: 2099-01-01T00:00:00+00:00)
//!     Invalid YAML in articles/broken.md: did not find expected ',' or ']'
//! Successfully published 1 article(s).
//! ```
//!
//! Skipped articles (no frontmatter, not scheduled, no date) print nothing.

use crate::imaging::CoverLayout;
use crate::publish::{ArticleOutcome, ArticleReport, PublishError, PublishReport};
use chrono::{DateTime, SecondsFormat, Utc};
use std::path::Path;

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn timestamp(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::AutoSi, false)
}

// ============================================================================
// Cover output
// ============================================================================

pub fn format_cover_success(output: &Path, layout: &CoverLayout) -> String {
    format!(
        "Success: Created '{}'. Size: ({}, {})",
        output.display(),
        layout.canvas.0,
        layout.canvas.1
    )
}

pub fn format_cover_error(err: &crate::imaging::CoverError) -> String {
    format!("Error: {}", err)
}

// ============================================================================
// Publish output
// ============================================================================

pub fn format_publish_header(now: &DateTime<Utc>) -> String {
    format!("Checking for scheduled articles at {}", timestamp(now))
}

/// Format the diagnostic lines for one article.
///
/// Returns an empty vec for silently skipped articles.
pub fn format_article(report: &ArticleReport) -> Vec<String> {
    let path = report.path.display();
    let line = match &report.outcome {
        ArticleOutcome::Published { scheduled } => {
            format!("Publishing: {} (Scheduled: {})", path, timestamp(scheduled))
        }
        ArticleOutcome::WouldPublish { scheduled } => {
            format!(
                "Would publish: {} (Scheduled: {})",
                path,
                timestamp(scheduled)
            )
        }
        ArticleOutcome::Pending { scheduled } => {
            format!("Pending: {} (Scheduled: {})", path, timestamp(scheduled))
        }
        ArticleOutcome::Skipped(_) => return Vec::new(),
        ArticleOutcome::Failed(err) => format_failure(&report.path, err),
    };
    vec![format!("{}{}", indent(1), line)]
}

fn format_failure(path: &Path, err: &PublishError) -> String {
    let path = path.display();
    match err {
        PublishError::Read(e) => format!("Error reading {}: {}", path, e),
        PublishError::Yaml(e) => format!("Invalid YAML in {}: {}", path, e),
        PublishError::Date { raw, source } => {
            format!("Date parsing failed for {} ({}): {}", path, raw, source)
        }
        PublishError::NoPublishedLine => format!(
            "Cannot publish {}: no top-level `published: false` line to rewrite",
            path
        ),
        PublishError::Write(e) => format!("Failed to write {}: {}", path, e),
        other => format!("{}: {}", path, other),
    }
}

/// Format the closing summary of a publish run.
pub fn format_publish_summary(report: &PublishReport) -> Vec<String> {
    if report.articles.is_empty() {
        return vec![format!("No articles found in {}", report.search_pattern)];
    }

    let mut lines = Vec::new();
    if report.dry_run {
        match report.due_count() {
            0 => lines.push("No articles need publishing.".to_string()),
            n => lines.push(format!("Dry run: {} article(s) would be published.", n)),
        }
    } else {
        match report.updated_count() {
            0 => lines.push("No articles need publishing.".to_string()),
            n => lines.push(format!("Successfully published {} article(s).", n)),
        }
    }

    let failed = report.failed_count();
    if failed > 0 {
        lines.push(format!("{} article(s) could not be processed.", failed));
    }
    lines
}

pub fn print_publish_header(now: &DateTime<Utc>) {
    println!("{}", format_publish_header(now));
}

pub fn print_article(report: &ArticleReport) {
    for line in format_article(report) {
        println!("{}", line);
    }
}

pub fn print_publish_summary(report: &PublishReport) {
    for line in format_publish_summary(report) {
        println!("{}", line);
    }
}
