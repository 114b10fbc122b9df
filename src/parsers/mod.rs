// gitrun: git command automation layer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Output parsers, one module per operation family.
//!
//! ```text
//! TaskOutput (bytes + exit code)
//!      |
//!      v
//! OutputParser::parse ---> typed summary (Serialize)
//!      |               \
//!      |                `--> GitError::ParsedFailure(GitResponse)
//!      v
//! status  branch  diff  log  push  pull  merge  tag  clean  commit  fetch  remote
//! ```
//!
//! Parsers hold no state between calls: the same bytes always produce the
//! same result or the same error.

pub mod branch;
pub mod clean;
pub mod commit;
pub mod diff;
pub mod fetch;
pub mod log;
pub mod merge;
pub mod pull;
pub mod push;
pub mod remote;
pub mod status;
pub mod tag;


use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

use crate::error::GitResult;
use crate::task::{OutputParser, TaskOutput};

/// Compiles a pattern that is known to be valid at compile time.
pub(crate) fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| unreachable!("invalid built-in pattern {pattern}: {e}"))
}

/// Non-empty lines with trailing whitespace and `\r` removed.
pub(crate) fn lines(text: &str) -> impl Iterator<Item = &str> {
    text.lines()
        .map(str::trim_end)
        .filter(|line| !line.is_empty())
}

/// Totals line shared by diff, commit, pull and merge output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ChangeSummary {
    pub changes: usize,
    pub insertions: usize,
    pub deletions: usize,
}

static SUMMARY_FILES: LazyLock<Regex> = LazyLock::new(|| compile(r"^\s*(\d+) files? changed"));
static SUMMARY_INSERTIONS: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(\d+) insertions?\(\+\)"));
static SUMMARY_DELETIONS: LazyLock<Regex> = LazyLock::new(|| compile(r"(\d+) deletions?\(-\)"));

impl ChangeSummary {
    /// Parses ` 2 files changed, 3 insertions(+), 1 deletion(-)`.
    #[must_use]
    pub fn parse_line(line: &str) -> Option<Self> {
        let changes = SUMMARY_FILES.captures(line)?[1].parse().ok()?;
        let count = |re: &Regex| {
            re.captures(line)
                .and_then(|caps| caps[1].parse().ok())
                .unwrap_or(0)
        };
        Some(Self {
            changes,
            insertions: count(&SUMMARY_INSERTIONS),
            deletions: count(&SUMMARY_DELETIONS),
        })
    }
}

/// One `file | N ++--` row of a `--stat` block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum StatLine {
    Text {
        file: String,
        changes: usize,
        insertions: usize,
        deletions: usize,
    },
    Binary {
        file: String,
        before: usize,
        after: usize,
    },
}

static STAT_TEXT: LazyLock<Regex> =
    LazyLock::new(|| compile(r"^\s*(.+?)\s+\|\s+(\d+)(?:\s+([+\-]*))?$"));
static STAT_BINARY: LazyLock<Regex> =
    LazyLock::new(|| compile(r"^\s*(.+?)\s+\|\s+Bin(?:\s+(\d+)\s+->\s+(\d+)\s+bytes)?$"));

impl StatLine {
    pub(crate) fn parse(line: &str) -> Option<Self> {
        if let Some(caps) = STAT_BINARY.captures(line) {
            let size = |i: usize| {
                caps.get(i)
                    .and_then(|m| m.as_str().parse().ok())
                    .unwrap_or(0)
            };
            return Some(Self::Binary {
                file: caps[1].to_string(),
                before: size(2),
                after: size(3),
            });
        }
        let caps = STAT_TEXT.captures(line)?;
        let graph = caps.get(3).map_or("", |m| m.as_str());
        Some(Self::Text {
            file: caps[1].to_string(),
            changes: caps[2].parse().ok()?,
            insertions: graph.matches('+').count(),
            deletions: graph.matches('-').count(),
        })
    }

    pub(crate) fn file(&self) -> &str {
        match self {
            Self::Text { file, .. } | Self::Binary { file, .. } => file,
        }
    }
}

/// Stdout decoded as text, unmodified.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextParser;

impl OutputParser for TextParser {
    type Output = String;

    fn parse(&self, output: &TaskOutput) -> GitResult<String> {
        Ok(output.stdout_text().into_owned())
    }
}

/// Stdout decoded as text with surrounding whitespace removed.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrimmedParser;

impl OutputParser for TrimmedParser {
    type Output = String;

    fn parse(&self, output: &TaskOutput) -> GitResult<String> {
        Ok(output.stdout_text().trim().to_string())
    }
}

/// Raw stdout bytes, for binary output such as `cat-file`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BytesParser;

impl OutputParser for BytesParser {
    type Output = Vec<u8>;

    fn parse(&self, output: &TaskOutput) -> GitResult<Vec<u8>> {
        Ok(output.stdout().to_vec())
    }
}
