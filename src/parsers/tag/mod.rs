// gitrun: git command automation layer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! `git tag -l` and tag creation.

use serde::Serialize;
use std::cmp::Ordering;

use super::lines;
use crate::error::GitResult;
use crate::task::{OutputParser, TaskOutput};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TagList {
    /// Tags in ascending version order.
    pub all: Vec<String>,
    pub latest: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagName {
    pub name: String,
}

/// Compares tags so that numeric runs order by value (`v1.9 < v1.10`).
#[must_use]
pub fn version_order(a: &str, b: &str) -> Ordering {
    let (mut a, mut b) = (a, b);
    loop {
        match (a.is_empty(), b.is_empty()) {
            (true, true) => return Ordering::Equal,
            (true, false) => return Ordering::Less,
            (false, true) => return Ordering::Greater,
            (false, false) => {}
        }
        let (head_a, rest_a) = split_run(a);
        let (head_b, rest_b) = split_run(b);
        let ordering = match (head_a.parse::<u64>(), head_b.parse::<u64>()) {
            (Ok(x), Ok(y)) => x.cmp(&y).then_with(|| head_a.len().cmp(&head_b.len())),
            (Ok(_), Err(_)) => Ordering::Greater,
            (Err(_), Ok(_)) => Ordering::Less,
            (Err(_), Err(_)) => head_a.cmp(head_b),
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
        a = rest_a;
        b = rest_b;
    }
}

/// Splits off the leading run of digits or non-digits.
fn split_run(s: &str) -> (&str, &str) {
    let digits = s.starts_with(|c: char| c.is_ascii_digit());
    let end = s
        .find(|c: char| c.is_ascii_digit() != digits)
        .unwrap_or(s.len());
    s.split_at(end)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TagListParser;

impl TagListParser {
    #[must_use]
    pub fn parse_text(text: &str) -> TagList {
        let mut all: Vec<String> = lines(text).map(|l| l.trim().to_string()).collect();
        all.sort_by(|a, b| version_order(a, b));
        TagList {
            latest: all.last().cloned(),
            all,
        }
    }
}

impl OutputParser for TagListParser {
    type Output = TagList;

    fn parse(&self, output: &TaskOutput) -> GitResult<TagList> {
        Ok(Self::parse_text(&output.stdout_text()))
    }
}

/// `git tag` prints nothing on success; the result echoes the requested name.
#[derive(Debug, Clone)]
pub struct TagNameParser {
    name: String,
}

impl TagNameParser {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl OutputParser for TagNameParser {
    type Output = TagName;

    fn parse(&self, _output: &TaskOutput) -> GitResult<TagName> {
        Ok(TagName {
            name: self.name.clone(),
        })
    }
}
