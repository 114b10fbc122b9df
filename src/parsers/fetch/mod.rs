// gitrun: git command automation layer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! `git fetch`, stderr appended to stdout.
//!
//! ```text
//! From https://example.com/repo
//!  * [new branch]      topic      -> origin/topic
//!  * [new tag]         v1.0       -> v1.0
//!    1a2b3c4..5d6e7f8  main       -> origin/main
//!  - [deleted]         (none)     -> origin/gone
//! ```

use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

use super::{compile, lines};
use crate::error::GitResult;
use crate::task::{OutputParser, TaskOutput};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FetchedRef {
    pub name: String,
    pub tracking: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FetchUpdate {
    pub name: String,
    pub tracking: String,
    pub from: String,
    pub to: String,
    pub forced: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FetchResult {
    pub remote: Option<String>,
    pub branches: Vec<FetchedRef>,
    pub tags: Vec<FetchedRef>,
    pub updated: Vec<FetchUpdate>,
    /// Tracking refs pruned because the remote branch is gone.
    pub deleted: Vec<String>,
    pub remote_messages: Vec<String>,
}

static NEW_REF: LazyLock<Regex> =
    LazyLock::new(|| compile(r"^\s*\*\s+\[new (branch|tag|ref)\]\s+(\S+)\s+->\s+(\S+)"));
static UPDATED: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"^\s*(\+)?\s*([a-f0-9]+)\.\.\.?([a-f0-9]+)\s+(\S+)\s+->\s+(\S+)")
});
static DELETED: LazyLock<Regex> =
    LazyLock::new(|| compile(r"^\s*-\s+\[deleted\]\s+\S+\s+->\s+(\S+)"));

#[derive(Debug, Clone, Copy, Default)]
pub struct FetchParser;

impl FetchParser {
    #[must_use]
    pub fn parse_text(text: &str) -> FetchResult {
        let mut result = FetchResult::default();
        for line in lines(text) {
            if let Some(message) = line.strip_prefix("remote:") {
                let message = message.trim();
                if !message.is_empty() {
                    result.remote_messages.push(message.to_string());
                }
            } else if let Some(remote) = line.strip_prefix("From ") {
                result.remote = Some(remote.trim().to_string());
            } else if let Some(caps) = NEW_REF.captures(line) {
                let fetched = FetchedRef {
                    name: caps[2].to_string(),
                    tracking: caps[3].to_string(),
                };
                if &caps[1] == "tag" {
                    result.tags.push(fetched);
                } else {
                    result.branches.push(fetched);
                }
            } else if let Some(caps) = UPDATED.captures(line) {
                result.updated.push(FetchUpdate {
                    name: caps[4].to_string(),
                    tracking: caps[5].to_string(),
                    from: caps[2].to_string(),
                    to: caps[3].to_string(),
                    forced: caps.get(1).is_some(),
                });
            } else if let Some(caps) = DELETED.captures(line) {
                result.deleted.push(caps[1].to_string());
            }
        }
        result
    }
}

impl OutputParser for FetchParser {
    type Output = FetchResult;

    fn parse(&self, output: &TaskOutput) -> GitResult<FetchResult> {
        Ok(Self::parse_text(&output.stdout_text()))
    }
}

#[cfg(test)]
mod tests;
