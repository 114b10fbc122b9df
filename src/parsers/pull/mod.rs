// gitrun: git command automation layer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! `git pull --stat`, stderr appended to stdout.

use serde::Serialize;
use std::collections::BTreeMap;

use super::merge::{MergeParser, MergeSummary};
use super::{ChangeSummary, StatLine, lines};
use crate::error::{GitError, GitResponse, GitResult};
use crate::task::{ErrorResolution, OutputParser, TaskOutput};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PullResult {
    pub files: Vec<String>,
    pub insertions: BTreeMap<String, usize>,
    pub deletions: BTreeMap<String, usize>,
    pub summary: ChangeSummary,
    pub created: Vec<String>,
    pub deleted: Vec<String>,
    pub binary: Vec<String>,
    pub remote_messages: Vec<String>,
}

/// A pull whose merge step left conflicts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PullFailure {
    pub pull: PullResult,
    pub merge: MergeSummary,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PullParser;

impl PullParser {
    #[must_use]
    pub fn parse_text(text: &str) -> PullResult {
        let mut result = PullResult::default();
        for line in lines(text) {
            if let Some(message) = line.strip_prefix("remote:") {
                let message = message.trim();
                if !message.is_empty() {
                    result.remote_messages.push(message.to_string());
                }
                continue;
            }
            let trimmed = line.trim_start();
            if let Some(rest) = trimmed.strip_prefix("create mode ") {
                result.created.extend(mode_path(rest));
            } else if let Some(rest) = trimmed.strip_prefix("delete mode ") {
                result.deleted.extend(mode_path(rest));
            } else if let Some(totals) = ChangeSummary::parse_line(line) {
                result.summary = totals;
            } else if let Some(stat) = StatLine::parse(line) {
                result.files.push(stat.file().to_string());
                match stat {
                    StatLine::Text {
                        file,
                        insertions,
                        deletions,
                        ..
                    } => {
                        if insertions > 0 {
                            result.insertions.insert(file.clone(), insertions);
                        }
                        if deletions > 0 {
                            result.deletions.insert(file, deletions);
                        }
                    }
                    StatLine::Binary { file, .. } => result.binary.push(file),
                }
            }
        }
        result
    }

    /// Parses and raises when the merge step conflicted.
    ///
    /// # Errors
    ///
    /// Returns [`GitError::ParsedFailure`] with [`GitResponse::Pull`].
    pub fn parse_checked(text: &str) -> GitResult<PullResult> {
        let pull = Self::parse_text(text);
        let merge = MergeParser::summarize(text);
        if merge.conflicts.is_empty() {
            return Ok(pull);
        }
        let message = merge.conflict_message();
        Err(GitError::parsed_failure(
            message,
            GitResponse::Pull(PullFailure { pull, merge }),
        ))
    }

    /// `on_error` hook: a conflicted pull exits 1 with hints on stderr.
    #[must_use]
    pub fn on_error(output: &TaskOutput) -> ErrorResolution<PullResult> {
        match Self::parse_checked(&output.combined_text()) {
            Err(err) => ErrorResolution::Fail(err),
            Ok(_) => ErrorResolution::Reject,
        }
    }
}

/// `100644 path/to/file` after a create/delete mode prefix.
fn mode_path(rest: &str) -> Option<String> {
    rest.split_once(' ').map(|(_, path)| path.to_string())
}

impl OutputParser for PullParser {
    type Output = PullResult;

    fn parse(&self, output: &TaskOutput) -> GitResult<PullResult> {
        Self::parse_checked(&output.stdout_text())
    }
}
