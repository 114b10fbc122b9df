// gitrun: git command automation layer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! `git log` with a machine-readable pretty format.
//!
//! Fields are separated by ASCII unit separators (0x1f) and records by the
//! record separator (0x1e), so subjects and bodies may contain anything else.

use serde::Serialize;

use crate::error::GitResult;
use crate::task::{OutputParser, TaskOutput};

const FIELD_SEPARATOR: char = '\x1f';
const RECORD_SEPARATOR: char = '\x1e';

/// Pretty format matching [`LogParser`]'s field order.
pub const LOG_FORMAT: &str = "--pretty=format:%H%x1f%aI%x1f%s%x1f%D%x1f%b%x1f%aN%x1f%aE%x1e";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LogEntry {
    pub hash: String,
    pub date: String,
    pub message: String,
    pub refs: String,
    pub body: String,
    pub author_name: String,
    pub author_email: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LogResult {
    pub all: Vec<LogEntry>,
    pub total: usize,
    /// Most recent commit (first in git's output).
    pub latest: Option<LogEntry>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LogParser;

impl LogParser {
    #[must_use]
    pub fn parse_text(text: &str) -> LogResult {
        let all: Vec<LogEntry> = text
            .split(RECORD_SEPARATOR)
            .map(|record| record.trim_start_matches(['\n', '\r']))
            .filter(|record| !record.trim().is_empty())
            .map(parse_record)
            .collect();

        LogResult {
            total: all.len(),
            latest: all.first().cloned(),
            all,
        }
    }
}

fn parse_record(record: &str) -> LogEntry {
    let mut fields = record.split(FIELD_SEPARATOR);
    let mut next = || fields.next().unwrap_or_default().to_string();
    LogEntry {
        hash: next(),
        date: next(),
        message: next(),
        refs: next(),
        body: next().trim_end().to_string(),
        author_name: next(),
        author_email: next().trim_end().to_string(),
    }
}

impl OutputParser for LogParser {
    type Output = LogResult;

    fn parse(&self, output: &TaskOutput) -> GitResult<LogResult> {
        Ok(Self::parse_text(&output.stdout_text()))
    }
}

#[cfg(test)]
mod tests;
