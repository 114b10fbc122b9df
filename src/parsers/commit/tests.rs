// gitrun: git command automation layer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::{CommitAuthor, CommitParser};
use crate::task::{ErrorResolution, OutputParser, TaskOutput};
use crate::utility::encoding::Encoding;

#[test]
fn test_root_commit() {
    let text = "[main (root-commit) 1a2b3c4] Initial import\n \
                Author: Ada Lovelace <ada@example.com>\n \
                2 files changed, 10 insertions(+)\n \
                create mode 100644 a.txt\n";
    let result = CommitParser::parse_text(text);

    assert_eq!(result.branch, "main");
    assert_eq!(result.commit, "1a2b3c4");
    assert!(result.root);
    assert_eq!(
        result.author,
        Some(CommitAuthor {
            name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
        })
    );
    assert_eq!(result.summary.changes, 2);
    assert_eq!(result.summary.insertions, 10);
}

#[test]
fn test_detached_commit() {
    let result = CommitParser::parse_text("[detached HEAD 9f8e7d6] Fixup\n 1 file changed, 1 deletion(-)\n");
    assert_eq!(result.branch, "detached HEAD");
    assert_eq!(result.commit, "9f8e7d6");
    assert!(!result.root);
    assert_eq!(result.summary.deletions, 1);
}

#[test]
fn test_nothing_to_commit_on_stdout() {
    let output = TaskOutput::new(
        Some(1),
        b"On branch main\nnothing to commit, working tree clean\n".to_vec(),
        Vec::new(),
        Encoding::Utf8,
    );
    let result = CommitParser.parse(&output).expect("benign");
    assert!(result.is_empty());
}

#[test]
fn test_nothing_to_commit_on_stderr_resolves_via_hook() {
    let output = TaskOutput::new(Some(1), Vec::new(), b"nothing to commit\n".to_vec(), Encoding::Utf8);
    let ErrorResolution::Succeed(result) = CommitParser::on_error(&output) else {
        panic!("expected benign success");
    };
    assert!(result.is_empty());
}

#[test]
fn test_other_failures_are_rejected() {
    let output = TaskOutput::new(
        Some(128),
        Vec::new(),
        b"fatal: unable to auto-detect email address\n".to_vec(),
        Encoding::Utf8,
    );
    assert!(matches!(CommitParser::on_error(&output), ErrorResolution::Reject));
}
