// gitrun: git command automation layer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! `git push --verbose --porcelain`, stderr appended to stdout.
//!
//! ```text
//! Pushing to https://example.com/repo.git        (stderr)
//! remote: Create a merge request for 'topic'     (stderr)
//! To https://example.com/repo.git                (stdout)
//! *\trefs/heads/topic:refs/heads/topic\t[new branch]
//! !\trefs/heads/main:refs/heads/main\t[rejected] (fetch first)
//! Done
//! branch 'topic' set up to track 'origin/topic'.
//! ```

use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

use super::{compile, lines};
use crate::error::{GitError, GitResponse, GitResult};
use crate::task::{ErrorResolution, OutputParser, TaskOutput};

/// Porcelain flag column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PushStatus {
    FastForward,
    Forced,
    Deleted,
    New,
    Rejected,
    UpToDate,
}

impl PushStatus {
    const fn from_flag(flag: char) -> Option<Self> {
        Some(match flag {
            ' ' => Self::FastForward,
            '+' => Self::Forced,
            '-' => Self::Deleted,
            '*' => Self::New,
            '!' => Self::Rejected,
            '=' => Self::UpToDate,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PushedRef {
    pub local: String,
    pub remote: String,
    pub status: PushStatus,
    pub summary: String,
}

/// Upstream configured by `push -u`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PushTracking {
    pub local: String,
    pub remote: String,
}

/// First ref that moved an existing remote head.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PushUpdate {
    pub local: String,
    pub remote: String,
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PushResult {
    pub repo: Option<String>,
    pub pushed: Vec<PushedRef>,
    pub branch: Option<PushTracking>,
    pub update: Option<PushUpdate>,
    pub remote_messages: Vec<String>,
}

impl PushResult {
    /// Refs the remote refused.
    pub fn rejected(&self) -> impl Iterator<Item = &PushedRef> {
        self.pushed
            .iter()
            .filter(|r| r.status == PushStatus::Rejected)
    }
}

static REF_LINE: LazyLock<Regex> =
    LazyLock::new(|| compile(r"^([ +\-*=!])\t([^:\t]*):([^\t]*)\t(.*)$"));
static RANGE: LazyLock<Regex> =
    LazyLock::new(|| compile(r"^\+?([a-f0-9]+)\.\.\.?([a-f0-9]+)"));
static TRACKING: LazyLock<Regex> =
    LazyLock::new(|| compile(r"^[Bb]ranch '([^']+)' set up to track '([^']+)'"));
static TRACKING_LEGACY: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"^[Bb]ranch '?([^' ]+?)'? set up to track remote branch '?([^' ]+?)'? from '?([^' ]+?)'?\.?$")
});

#[derive(Debug, Clone, Copy, Default)]
pub struct PushParser;

impl PushParser {
    #[must_use]
    pub fn parse_text(text: &str) -> PushResult {
        let mut result = PushResult::default();
        for line in lines(text) {
            if let Some(message) = line.strip_prefix("remote:") {
                let message = message.trim();
                if !message.is_empty() {
                    result.remote_messages.push(message.to_string());
                }
            } else if let Some(repo) = line.strip_prefix("To ") {
                result.repo = Some(repo.trim().to_string());
            } else if let Some(caps) = TRACKING.captures(line) {
                result.branch = Some(PushTracking {
                    local: caps[1].to_string(),
                    remote: caps[2].to_string(),
                });
            } else if let Some(caps) = TRACKING_LEGACY.captures(line) {
                result.branch = Some(PushTracking {
                    local: caps[1].to_string(),
                    remote: format!("{}/{}", &caps[3], &caps[2]),
                });
            } else if let Some(caps) = REF_LINE.captures(line) {
                let Some(status) = caps[1].chars().next().and_then(PushStatus::from_flag) else {
                    continue;
                };
                let pushed = PushedRef {
                    local: caps[2].to_string(),
                    remote: caps[3].to_string(),
                    status,
                    summary: caps[4].to_string(),
                };
                if result.update.is_none()
                    && matches!(status, PushStatus::FastForward | PushStatus::Forced)
                    && let Some(range) = RANGE.captures(&pushed.summary)
                {
                    result.update = Some(PushUpdate {
                        local: pushed.local.clone(),
                        remote: pushed.remote.clone(),
                        from: range[1].to_string(),
                        to: range[2].to_string(),
                    });
                }
                result.pushed.push(pushed);
            }
        }
        result
    }

    /// Parses and raises for rejected refs.
    ///
    /// # Errors
    ///
    /// Returns [`GitError::ParsedFailure`] carrying the [`PushResult`] when
    /// any ref was rejected.
    pub fn parse_checked(text: &str) -> GitResult<PushResult> {
        let result = Self::parse_text(text);
        let rejected: Vec<&str> = result.rejected().map(|r| r.remote.as_str()).collect();
        if rejected.is_empty() {
            return Ok(result);
        }
        let message = format!("push rejected: {}", rejected.join(", "));
        Err(GitError::parsed_failure(message, GitResponse::Push(result)))
    }

    /// `on_error` hook: a rejected push exits non-zero but is still parseable.
    #[must_use]
    pub fn on_error(output: &TaskOutput) -> ErrorResolution<PushResult> {
        match Self::parse_checked(&output.combined_text()) {
            Err(err) => ErrorResolution::Fail(err),
            Ok(_) => ErrorResolution::Reject,
        }
    }
}

impl OutputParser for PushParser {
    type Output = PushResult;

    fn parse(&self, output: &TaskOutput) -> GitResult<PushResult> {
        Self::parse_checked(&output.stdout_text())
    }
}

#[cfg(test)]
mod tests;
