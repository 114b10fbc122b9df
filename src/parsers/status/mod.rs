// gitrun: git command automation layer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! `git status --porcelain -b -u --null`.
//!
//! ```text
//! ## main...origin/main [ahead 1, behind 2]\0
//!  M src/lib.rs\0
//! R  new.rs\0old.rs\0
//! ?? scratch.txt\0
//! ```
//!
//! Newline-separated porcelain output (`R  old -> new`) is accepted too.

use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

use super::compile;
use crate::error::GitResult;
use crate::task::{OutputParser, TaskOutput};

/// Index/worktree codes that mark an unmerged path.
const CONFLICT_CODES: [&str; 7] = ["DD", "AU", "UD", "UA", "DU", "AA", "UU"];

/// One entry of the porcelain listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileStatus {
    pub path: String,
    /// Original path of a rename or copy.
    pub from: Option<String>,
    pub index: char,
    pub working_dir: char,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenamedFile {
    pub from: String,
    pub to: String,
}

/// Parsed working tree status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatusSummary {
    pub current: Option<String>,
    pub tracking: Option<String>,
    pub detached: bool,
    pub ahead: usize,
    pub behind: usize,
    pub not_added: Vec<String>,
    pub conflicted: Vec<String>,
    pub created: Vec<String>,
    pub deleted: Vec<String>,
    pub modified: Vec<String>,
    pub renamed: Vec<RenamedFile>,
    pub staged: Vec<String>,
    pub files: Vec<FileStatus>,
}

impl StatusSummary {
    /// True when nothing is staged, modified or untracked.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.files.is_empty()
    }

    fn apply_header(&mut self, header: &str) {
        if header.starts_with("HEAD (no branch)") {
            self.detached = true;
            return;
        }
        let Some(caps) = BRANCH_HEADER.captures(header) else {
            return;
        };
        self.current = Some(caps[1].to_string());
        self.tracking = caps.get(2).map(|m| m.as_str().to_string());
        if let Some(counts) = caps.get(3) {
            for part in counts.as_str().split(", ") {
                if let Some(n) = part.strip_prefix("ahead ") {
                    self.ahead = n.parse().unwrap_or(0);
                } else if let Some(n) = part.strip_prefix("behind ") {
                    self.behind = n.parse().unwrap_or(0);
                }
            }
        }
    }

    fn apply_file(&mut self, file: FileStatus) {
        let code: String = [file.index, file.working_dir].iter().collect();
        let path = file.path.clone();

        if code == "??" {
            self.not_added.push(path);
        } else if CONFLICT_CODES.contains(&code.as_str()) {
            self.conflicted.push(path);
        } else {
            match file.index {
                'A' | 'C' => {
                    self.created.push(path.clone());
                    self.staged.push(path.clone());
                }
                'M' => self.staged.push(path.clone()),
                'D' => {
                    self.deleted.push(path.clone());
                    self.staged.push(path.clone());
                }
                'R' => {
                    self.renamed.push(RenamedFile {
                        from: file.from.clone().unwrap_or_default(),
                        to: path.clone(),
                    });
                    self.staged.push(path.clone());
                }
                _ => {}
            }
            match file.working_dir {
                'M' => self.modified.push(path),
                'D' if file.index != 'D' => self.deleted.push(path),
                _ => {}
            }
        }
        self.files.push(file);
    }
}

static BRANCH_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"^(?:No commits yet on |Initial commit on )?(\S+?)(?:\.\.\.(\S+))?(?: \[(.+)\])?$")
});

fn split_entry(entry: &str) -> Option<(char, char, &str)> {
    let mut chars = entry.chars();
    let index = chars.next()?;
    let working_dir = chars.next()?;
    let path = entry.get(3..)?;
    (!path.is_empty()).then_some((index, working_dir, path))
}

/// Parses porcelain v1 status output.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatusParser;

impl StatusParser {
    #[must_use]
    pub fn parse_text(text: &str) -> StatusSummary {
        let mut summary = StatusSummary::default();
        let null_separated = text.contains('\0');
        let mut entries: Box<dyn Iterator<Item = &str> + '_> = if null_separated {
            Box::new(text.split('\0'))
        } else {
            Box::new(text.lines())
        };

        while let Some(entry) = entries.next() {
            let entry = entry.trim_end_matches(['\r', '\n']);
            if entry.is_empty() {
                continue;
            }
            if let Some(header) = entry.strip_prefix("## ") {
                summary.apply_header(header);
                continue;
            }
            let Some((index, working_dir, path)) = split_entry(entry) else {
                continue;
            };

            let (path, from) = if matches!(index, 'R' | 'C') {
                if null_separated {
                    (path.to_string(), entries.next().map(str::to_string))
                } else if let Some((from, to)) = path.split_once(" -> ") {
                    (to.to_string(), Some(from.to_string()))
                } else {
                    (path.to_string(), None)
                }
            } else {
                (path.to_string(), None)
            };

            summary.apply_file(FileStatus {
                path,
                from,
                index,
                working_dir,
            });
        }
        summary
    }
}

impl OutputParser for StatusParser {
    type Output = StatusSummary;

    fn parse(&self, output: &TaskOutput) -> GitResult<StatusSummary> {
        Ok(Self::parse_text(&output.stdout_text()))
    }
}
