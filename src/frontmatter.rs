//! Locating and rewriting the YAML frontmatter block of an article.
//!
//! A frontmatter block starts on the very first line of the document with a
//! `---` delimiter and ends at the next line that is exactly `---`:
//!
//! ```text
//! ---
//! title: Hello
//! date: 2024-05-01
//! published: false   # flipped by `postkit publish`
//! ---
//! Body text, never touched.
//! ```
//!
//! Rewrites are textual. The only change ever made is replacing the first
//! `published: false` line with `published: true`; comments, key order and
//! quoting elsewhere in the block survive byte for byte. Re-serialising the
//! mapping through `serde_yaml` would lose all of that.

use regex::Regex;
use serde_yaml::Value;
use std::sync::LazyLock;
use thiserror::Error;

/// Delimiter line that opens and closes the block.
pub const DELIMITER: &str = "---";

static PUBLISHED_FALSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?mi)^published:\s*false").expect("static regex is valid"));

const PUBLISHED_TRUE: &str = "published: true";

#[derive(Error, Debug)]
pub enum FrontmatterError {
    #[error("{0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// A frontmatter block located inside a document.
///
/// Holds byte offsets into the document so the YAML text can be swapped out
/// without touching anything around it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frontmatter<'a> {
    content: &'a str,
    yaml_start: usize,
    yaml_end: usize,
    block_end: usize,
}

impl<'a> Frontmatter<'a> {
    /// Find the frontmatter block at the start of `content`.
    ///
    /// Returns `None` when the document does not open with a `---` line or
    /// the block is never closed.
    pub fn locate(content: &'a str) -> Option<Self> {
        let yaml_start = opening_len(content)?;

        let mut offset = yaml_start;
        for line in content[yaml_start..].split_inclusive('\n') {
            let bare = line
                .strip_suffix('\n')
                .map(|l| l.strip_suffix('\r').unwrap_or(l))
                .unwrap_or(line);
            if bare == DELIMITER {
                // The newline ending the last YAML line belongs to the delimiter
                let yaml_end = if offset > yaml_start { offset - 1 } else { yaml_start };
                return Some(Self {
                    content,
                    yaml_start,
                    yaml_end,
                    block_end: offset + bare.len(),
                });
            }
            offset += line.len();
        }
        None
    }

    /// Raw YAML text between the delimiters.
    pub fn yaml(&self) -> &'a str {
        &self.content[self.yaml_start..self.yaml_end]
    }

    /// Everything after the closing delimiter.
    pub fn body(&self) -> &'a str {
        &self.content[self.block_end..]
    }

    /// Parse the YAML text into a generic value. An empty block is `Null`.
    pub fn parse(&self) -> Result<Value, FrontmatterError> {
        if self.yaml().trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_yaml::from_str(self.yaml())?)
    }

    /// Rebuild the document with `yaml` in place of the original block text.
    pub fn replace_yaml(&self, yaml: &str) -> String {
        let mut out = String::with_capacity(self.content.len() + yaml.len());
        out.push_str(&self.content[..self.yaml_start]);
        out.push_str(yaml);
        out.push_str(&self.content[self.yaml_end..]);
        out
    }
}

fn opening_len(content: &str) -> Option<usize> {
    ["---\n", "---\r\n"]
        .into_iter()
        .find(|opening| content.starts_with(opening))
        .map(str::len)
}

/// Replace the first `published: false` line of `yaml` with `published: true`.
///
/// Case-insensitive; any whitespace between the colon and `false` is accepted.
/// Returns `None` when no such line exists.
pub fn mark_published(yaml: &str) -> Option<String> {
    if !PUBLISHED_FALSE.is_match(yaml) {
        return None;
    }
    Some(PUBLISHED_FALSE.replace(yaml, PUBLISHED_TRUE).into_owned())
}
