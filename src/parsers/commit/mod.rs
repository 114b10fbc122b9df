// gitrun: git command automation layer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! `git commit` output.
//!
//! ```text
//! [main (root-commit) 1a2b3c4] Initial import
//!  Author: Ada <ada@example.com>
//!  2 files changed, 10 insertions(+)
//! ```
//!
//! "nothing to commit" is not an error: both the parser and
//! [`CommitParser::on_error`] resolve it to an empty [`CommitResult`].

use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

use super::{ChangeSummary, compile, lines};
use crate::error::GitResult;
use crate::task::{ErrorResolution, OutputParser, TaskOutput};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitAuthor {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CommitResult {
    pub branch: String,
    /// Abbreviated hash, empty when nothing was committed.
    pub commit: String,
    pub root: bool,
    pub author: Option<CommitAuthor>,
    pub summary: ChangeSummary,
}

impl CommitResult {
    /// True when git reported nothing to commit.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commit.is_empty()
    }
}

static HEADER: LazyLock<Regex> =
    LazyLock::new(|| compile(r"^\[(.+?)( \(root-commit\))? ([a-f0-9]+)\]"));
static AUTHOR: LazyLock<Regex> = LazyLock::new(|| compile(r"^\s*Author:\s+(.+?)\s+<([^>]*)>"));

fn nothing_to_commit(text: &str) -> bool {
    lines(text).any(|line| {
        let line = line.trim_start();
        line.starts_with("nothing to commit")
            || line.starts_with("nothing added to commit")
            || line.starts_with("no changes added to commit")
    })
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CommitParser;

impl CommitParser {
    #[must_use]
    pub fn parse_text(text: &str) -> CommitResult {
        let mut result = CommitResult::default();
        for line in lines(text) {
            if let Some(caps) = HEADER.captures(line) {
                result.branch = caps[1].to_string();
                result.root = caps.get(2).is_some();
                result.commit = caps[3].to_string();
            } else if let Some(caps) = AUTHOR.captures(line) {
                result.author = Some(CommitAuthor {
                    name: caps[1].to_string(),
                    email: caps[2].to_string(),
                });
            } else if let Some(totals) = ChangeSummary::parse_line(line) {
                result.summary = totals;
            }
        }
        result
    }

    /// `on_error` hook: "nothing to commit" is a benign non-zero exit.
    #[must_use]
    pub fn on_error(output: &TaskOutput) -> ErrorResolution<CommitResult> {
        if nothing_to_commit(&output.combined_text()) {
            ErrorResolution::Succeed(CommitResult::default())
        } else {
            ErrorResolution::Reject
        }
    }
}

impl OutputParser for CommitParser {
    type Output = CommitResult;

    fn parse(&self, output: &TaskOutput) -> GitResult<CommitResult> {
        let text = output.stdout_text();
        if nothing_to_commit(&text) {
            return Ok(CommitResult::default());
        }
        Ok(Self::parse_text(&text))
    }
}

#[cfg(test)]
mod tests;
