// gitrun: git command automation layer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! `git remote -v`.

use serde::Serialize;

use super::lines;
use crate::error::GitResult;
use crate::task::{OutputParser, TaskOutput};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RemoteRefs {
    pub fetch: String,
    pub push: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemoteWithRefs {
    pub name: String,
    pub refs: RemoteRefs,
}

/// Accepts both `remote` (names only) and `remote -v` listings.
#[derive(Debug, Clone, Copy, Default)]
pub struct RemoteParser;

impl RemoteParser {
    #[must_use]
    pub fn parse_text(text: &str) -> Vec<RemoteWithRefs> {
        let mut remotes: Vec<RemoteWithRefs> = Vec::new();
        for line in lines(text) {
            let mut parts = line.split_whitespace();
            let Some(name) = parts.next() else {
                continue;
            };
            let index = match remotes.iter().position(|r| r.name == name) {
                Some(index) => index,
                None => {
                    remotes.push(RemoteWithRefs {
                        name: name.to_string(),
                        refs: RemoteRefs::default(),
                    });
                    remotes.len() - 1
                }
            };
            let (Some(url), Some(kind)) = (parts.next(), parts.next()) else {
                continue;
            };
            let refs = &mut remotes[index].refs;
            match kind {
                "(fetch)" => refs.fetch = url.to_string(),
                "(push)" => refs.push = url.to_string(),
                _ => {}
            }
        }
        remotes
    }
}

impl OutputParser for RemoteParser {
    type Output = Vec<RemoteWithRefs>;

    fn parse(&self, output: &TaskOutput) -> GitResult<Vec<RemoteWithRefs>> {
        Ok(Self::parse_text(&output.stdout_text()))
    }
}
