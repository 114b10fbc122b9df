// gitrun: git command automation layer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! `git branch -a -v --no-abbrev` and `git branch -d|-D`.

use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::LazyLock;

use super::{compile, lines};
use crate::error::{GitError, GitResponse, GitResult};
use crate::task::{ErrorResolution, OutputParser, TaskOutput};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BranchInfo {
    pub current: bool,
    pub name: String,
    pub commit: String,
    pub label: String,
    /// Checked out in another worktree (`+` marker).
    pub linked_work_tree: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BranchSummary {
    pub detached: bool,
    pub current: Option<String>,
    pub all: Vec<String>,
    pub branches: BTreeMap<String, BranchInfo>,
}

static DETACHED: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"^([*+]\s)?\s*\((?:HEAD )?detached (?:from|at) (\S+)\)\s+([a-f0-9]+)\s?(.*)$")
});
static BRANCH: LazyLock<Regex> =
    LazyLock::new(|| compile(r"^([*+]\s)?\s*(\S+)\s+([a-f0-9]+)\s?(.*)$"));

#[derive(Debug, Clone, Copy, Default)]
pub struct BranchListParser;

impl BranchListParser {
    #[must_use]
    pub fn parse_text(text: &str) -> BranchSummary {
        let mut summary = BranchSummary::default();
        for line in lines(text) {
            let (caps, detached) = if let Some(caps) = DETACHED.captures(line) {
                (caps, true)
            } else if let Some(caps) = BRANCH.captures(line) {
                (caps, false)
            } else {
                continue;
            };

            let marker = caps.get(1).map_or("", |m| m.as_str().trim());
            let info = BranchInfo {
                current: marker == "*",
                name: caps[2].to_string(),
                commit: caps[3].to_string(),
                label: caps[4].to_string(),
                linked_work_tree: marker == "+",
            };
            if info.current {
                summary.detached = detached;
                summary.current = Some(info.name.clone());
            }
            summary.all.push(info.name.clone());
            summary.branches.insert(info.name.clone(), info);
        }
        summary
    }
}

impl OutputParser for BranchListParser {
    type Output = BranchSummary;

    fn parse(&self, output: &TaskOutput) -> GitResult<BranchSummary> {
        Ok(Self::parse_text(&output.stdout_text()))
    }
}

/// Outcome of deleting one branch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BranchDeletionSummary {
    pub branch: String,
    pub hash: Option<String>,
    pub success: bool,
}

static DELETED: LazyLock<Regex> =
    LazyLock::new(|| compile(r"^Deleted (?:remote-tracking )?branch (\S+) \(was ([a-f0-9]+)\)"));
static NOT_FOUND: LazyLock<Regex> = LazyLock::new(|| compile(r"^error: branch '(.+)' not found"));
static NOT_MERGED: LazyLock<Regex> =
    LazyLock::new(|| compile(r"^error: [Tt]he branch '(.+)' is not fully merged"));

/// Parses deletion output for `branch`, which may sit on either stream.
#[derive(Debug, Clone)]
pub struct BranchDeleteParser {
    branch: String,
}

impl BranchDeleteParser {
    pub fn new(branch: impl Into<String>) -> Self {
        Self {
            branch: branch.into(),
        }
    }

    /// Scans `text` for the deletion result.
    ///
    /// # Errors
    ///
    /// Returns [`GitError::ParsedFailure`] carrying an unsuccessful
    /// [`BranchDeletionSummary`] when git refused the deletion.
    pub fn parse_text(&self, text: &str) -> GitResult<BranchDeletionSummary> {
        for line in lines(text) {
            if let Some(caps) = DELETED.captures(line) {
                return Ok(BranchDeletionSummary {
                    branch: caps[1].to_string(),
                    hash: Some(caps[2].to_string()),
                    success: true,
                });
            }
            let failure = NOT_FOUND
                .captures(line)
                .map(|caps| (caps[1].to_string(), "not found"))
                .or_else(|| {
                    NOT_MERGED
                        .captures(line)
                        .map(|caps| (caps[1].to_string(), "not fully merged"))
                });
            if let Some((branch, reason)) = failure {
                return Err(Self::failure(branch, reason));
            }
        }
        Err(Self::failure(self.branch.clone(), "no deletion reported"))
    }

    fn failure(branch: String, reason: &str) -> GitError {
        let message = format!("failed to delete branch '{branch}': {reason}");
        GitError::parsed_failure(
            message,
            GitResponse::BranchDelete(BranchDeletionSummary {
                branch,
                hash: None,
                success: false,
            }),
        )
    }

    /// `on_error` hook: classifies refused deletions instead of a bare exit.
    #[must_use]
    pub fn on_error(&self, output: &TaskOutput) -> ErrorResolution<BranchDeletionSummary> {
        let text = output.combined_text();
        let recognized = lines(&text).any(|line| {
            DELETED.is_match(line) || NOT_FOUND.is_match(line) || NOT_MERGED.is_match(line)
        });
        if !recognized {
            return ErrorResolution::Reject;
        }
        match self.parse_text(&text) {
            Ok(summary) => ErrorResolution::Succeed(summary),
            Err(err) => ErrorResolution::Fail(err),
        }
    }
}

impl OutputParser for BranchDeleteParser {
    type Output = BranchDeletionSummary;

    fn parse(&self, output: &TaskOutput) -> GitResult<BranchDeletionSummary> {
        self.parse_text(&output.combined_text())
    }
}
