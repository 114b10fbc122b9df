// gitrun: git command automation layer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! `git diff --stat=4096`.
//!
//! ```text
//!  src/lib.rs   | 12 ++++++++----
//!  logo.png     | Bin 0 -> 2048 bytes
//!  2 files changed, 8 insertions(+), 4 deletions(-)
//! ```

use serde::Serialize;

use super::{ChangeSummary, StatLine, lines};
use crate::error::GitResult;
use crate::task::{OutputParser, TaskOutput};

/// One row of the stat block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DiffFile {
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

impl DiffFile {
    #[must_use]
    pub fn file(&self) -> &str {
        match self {
            Self::Text { file, .. } | Self::Binary { file, .. } => file,
        }
    }

    #[must_use]
    pub const fn is_binary(&self) -> bool {
        matches!(self, Self::Binary { .. })
    }
}

impl From<StatLine> for DiffFile {
    fn from(line: StatLine) -> Self {
        match line {
            StatLine::Text {
                file,
                changes,
                insertions,
                deletions,
            } => Self::Text {
                file,
                changes,
                insertions,
                deletions,
            },
            StatLine::Binary {
                file,
                before,
                after,
            } => Self::Binary {
                file,
                before,
                after,
            },
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DiffSummary {
    pub changed: usize,
    pub insertions: usize,
    pub deletions: usize,
    pub files: Vec<DiffFile>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DiffSummaryParser;

impl DiffSummaryParser {
    #[must_use]
    pub fn parse_text(text: &str) -> DiffSummary {
        let mut summary = DiffSummary::default();
        for line in lines(text) {
            if let Some(totals) = ChangeSummary::parse_line(line) {
                summary.changed = totals.changes;
                summary.insertions = totals.insertions;
                summary.deletions = totals.deletions;
            } else if let Some(stat) = StatLine::parse(line) {
                summary.files.push(stat.into());
            }
        }
        summary
    }
}

impl OutputParser for DiffSummaryParser {
    type Output = DiffSummary;

    fn parse(&self, output: &TaskOutput) -> GitResult<DiffSummary> {
        Ok(Self::parse_text(&output.stdout_text()))
    }
}

#[cfg(test)]
mod tests;
