//! # postkit
//!
//! Two small tools for a markdown article repository:
//!
//! - **`postkit cover`** letterboxes any image into a fixed-size PNG cover
//!   (dev.to's 1000×420 by default) without cropping or stretching.
//! - **`postkit publish`** scans an articles directory and flips
//!   `published: false` to `published: true` in each article whose
//!   frontmatter `date` has passed. Safe to run on a timer.
//!
//! The two tools share nothing but configuration and output conventions.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`imaging`] | Cover geometry, the [`imaging::ImageBackend`] seam, and the `image`-crate backend |
//! | [`frontmatter`] | Locating the `---` block and rewriting the `published` line in place |
//! | [`schedule`] | Normalising frontmatter dates (date, naive, offset) to UTC |
//! | [`publish`] | Article discovery, per-article evaluation, and the scheduler run |
//! | [`config`] | `postkit.toml` loading, merging, and validation |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Textual Frontmatter Rewrites
//!
//! The scheduler parses frontmatter with `serde_yaml` only to *decide*. The
//! change itself is a single-line regex substitution on the original text,
//! so comments, key order and quoting survive untouched. The article body is
//! never part of the substitution.
//!
//! ## Opt-In Scheduling
//!
//! Only `published: false` (the boolean) makes an article eligible. Articles
//! without the key are not under scheduler control, which keeps hand-managed
//! posts out of reach.
//!
//! ## Contained Failures
//!
//! A broken article never stops a scan. Each article ends up with exactly one
//! [`publish::ArticleOutcome`]; read, YAML, date and write failures are
//! reported and the run moves on.

pub mod config;
pub mod frontmatter;
pub mod imaging;
pub mod output;
pub mod publish;
pub mod schedule;

#[cfg(test)]
pub(crate) mod test_helpers;
