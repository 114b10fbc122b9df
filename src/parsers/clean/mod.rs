// gitrun: git command automation layer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! `git clean -n|-f`.

use serde::Serialize;

use super::lines;
use crate::error::GitResult;
use crate::task::{OutputParser, TaskOutput};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CleanSummary {
    pub dry_run: bool,
    /// Files removed (or that would be removed).
    pub paths: Vec<String>,
    /// Directories, reported with a trailing `/`.
    pub folders: Vec<String>,
    /// Nested repositories left alone.
    pub skipped: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CleanParser {
    dry_run: bool,
}

impl CleanParser {
    #[must_use]
    pub const fn new(dry_run: bool) -> Self {
        Self { dry_run }
    }

    #[must_use]
    pub fn parse_text(&self, text: &str) -> CleanSummary {
        let mut summary = CleanSummary {
            dry_run: self.dry_run,
            ..CleanSummary::default()
        };
        for line in lines(text) {
            let skipped = line
                .strip_prefix("Would skip repository ")
                .or_else(|| line.strip_prefix("Skipping repository "));
            if let Some(path) = skipped {
                summary.skipped.push(path.to_string());
                continue;
            }
            let Some(path) = line
                .strip_prefix("Would remove ")
                .or_else(|| line.strip_prefix("Removing "))
            else {
                continue;
            };
            if path.ends_with('/') {
                summary.folders.push(path.to_string());
            } else {
                summary.paths.push(path.to_string());
            }
        }
        summary
    }
}

impl OutputParser for CleanParser {
    type Output = CleanSummary;

    fn parse(&self, output: &TaskOutput) -> GitResult<CleanSummary> {
        Ok(self.parse_text(&output.stdout_text()))
    }
}
