// gitrun: git command automation layer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! `git merge` output.
//!
//! A merge that leaves `CONFLICT` markers is a failure even when git exits 0
//! (e.g. `merge --no-commit` wrappers); the parser raises
//! [`GitError::ParsedFailure`] carrying the [`MergeSummary`] either way.

use regex::Regex;
use serde::Serialize;
use std::fmt::Write as _;
use std::sync::LazyLock;

use super::{ChangeSummary, compile, lines};
use crate::error::{GitError, GitResponse, GitResult};
use crate::task::{ErrorResolution, OutputParser, TaskOutput};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MergeConflict {
    /// Conflict kind in parentheses: `content`, `modify/delete`, ...
    pub reason: String,
    pub file: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeOutcome {
    #[default]
    Success,
    UpToDate,
    Failed,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MergeSummary {
    pub conflicts: Vec<MergeConflict>,
    /// Files git auto-merged.
    pub merges: Vec<String>,
    pub result: MergeOutcome,
    pub failed: bool,
    pub summary: ChangeSummary,
}

impl MergeSummary {
    /// `CONFLICTS: a.txt:content, b.txt:modify/delete`.
    #[must_use]
    pub fn conflict_message(&self) -> String {
        let mut message = String::from("CONFLICTS:");
        for (i, conflict) in self.conflicts.iter().enumerate() {
            let sep = if i == 0 { " " } else { ", " };
            let file = conflict.file.as_deref().unwrap_or("?");
            let _ = write!(message, "{sep}{file}:{}", conflict.reason);
        }
        message
    }
}

static CONFLICT: LazyLock<Regex> =
    LazyLock::new(|| compile(r"^CONFLICT \(([^)]+)\): (?:Merge conflict in (.+)|(\S+).*)$"));

#[derive(Debug, Clone, Copy, Default)]
pub struct MergeParser;

impl MergeParser {
    /// Collects merge information without classifying it.
    #[must_use]
    pub fn summarize(text: &str) -> MergeSummary {
        let mut summary = MergeSummary::default();
        for line in lines(text) {
            let line = line.trim_start();
            if let Some(file) = line.strip_prefix("Auto-merging ") {
                summary.merges.push(file.to_string());
            } else if let Some(caps) = CONFLICT.captures(line) {
                let file = caps.get(2).or_else(|| caps.get(3)).map(|m| m.as_str().to_string());
                summary.conflicts.push(MergeConflict {
                    reason: caps[1].to_string(),
                    file,
                });
            } else if line.starts_with("Automatic merge failed") {
                summary.failed = true;
            } else if line.starts_with("Already up to date") || line.starts_with("Already up-to-date") {
                summary.result = MergeOutcome::UpToDate;
            } else if let Some(totals) = ChangeSummary::parse_line(line) {
                summary.summary = totals;
            }
        }
        if !summary.conflicts.is_empty() {
            summary.failed = true;
        }
        if summary.failed {
            summary.result = MergeOutcome::Failed;
        }
        summary
    }

    /// Parses and raises when the merge left conflicts.
    ///
    /// # Errors
    ///
    /// Returns [`GitError::ParsedFailure`] with [`GitResponse::Merge`].
    pub fn parse_checked(text: &str) -> GitResult<MergeSummary> {
        let summary = Self::summarize(text);
        if summary.failed {
            let message = if summary.conflicts.is_empty() {
                "automatic merge failed".to_string()
            } else {
                summary.conflict_message()
            };
            return Err(GitError::parsed_failure(message, GitResponse::Merge(summary)));
        }
        Ok(summary)
    }

    /// `on_error` hook: conflicted merges exit 1 and are still parseable.
    #[must_use]
    pub fn on_error(output: &TaskOutput) -> ErrorResolution<MergeSummary> {
        match Self::parse_checked(&output.combined_text()) {
            Err(err) => ErrorResolution::Fail(err),
            Ok(_) => ErrorResolution::Reject,
        }
    }
}

impl OutputParser for MergeParser {
    type Output = MergeSummary;

    fn parse(&self, output: &TaskOutput) -> GitResult<MergeSummary> {
        Self::parse_checked(&output.stdout_text())
    }
}
