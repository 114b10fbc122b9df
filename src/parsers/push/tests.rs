// gitrun: git command automation layer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::{PushParser, PushStatus, PushTracking};
use crate::error::GitResponse;
use crate::task::{ErrorResolution, OutputParser, TaskOutput};
use crate::utility::encoding::Encoding;

const NEW_BRANCH: &str = "To https://example.com/repo.git\n\
*\trefs/heads/topic:refs/heads/topic\t[new branch]\n\
Done\n\
Pushing to https://example.com/repo.git\n\
remote: \n\
remote: Create a merge request for topic:\n\
remote:   https://example.com/repo/-/merge_requests/new\n\
branch 'topic' set up to track 'origin/topic'.\n";

#[test]
fn test_new_branch_with_tracking() {
    let result = PushParser::parse_text(NEW_BRANCH);

    assert_eq!(result.repo.as_deref(), Some("https://example.com/repo.git"));
    assert_eq!(result.pushed.len(), 1);
    assert_eq!(result.pushed[0].status, PushStatus::New);
    assert_eq!(result.pushed[0].local, "refs/heads/topic");
    assert_eq!(result.pushed[0].summary, "[new branch]");
    assert_eq!(
        result.branch,
        Some(PushTracking {
            local: "topic".to_string(),
            remote: "origin/topic".to_string(),
        })
    );
    assert_eq!(
        result.remote_messages,
        vec![
            "Create a merge request for topic:",
            "https://example.com/repo/-/merge_requests/new",
        ]
    );
    assert!(result.update.is_none());
}

#[test]
fn test_fast_forward_update() {
    let text = "To ../remote\n \trefs/heads/main:refs/heads/main\t1a2b3c4..5d6e7f8\nDone\n";
    let result = PushParser::parse_text(text);
    let update = result.update.expect("update");
    assert_eq!(update.from, "1a2b3c4");
    assert_eq!(update.to, "5d6e7f8");
    assert_eq!(result.pushed[0].status, PushStatus::FastForward);
}

#[test]
fn test_legacy_tracking_message() {
    let text = "Branch 'dev' set up to track remote branch 'dev' from 'upstream'.\n";
    let result = PushParser::parse_text(text);
    assert_eq!(result.branch.map(|b| b.remote).as_deref(), Some("upstream/dev"));
}

#[test]
fn test_rejected_ref_raises_parsed_failure() {
    let stdout = b"To ../remote\n!\trefs/heads/main:refs/heads/main\t[rejected] (fetch first)\nDone\n";
    let stderr = b"error: failed to push some refs to '../remote'\n";
    let output = TaskOutput::new(Some(1), stdout.to_vec(), stderr.to_vec(), Encoding::Utf8);

    let ErrorResolution::Fail(err) = PushParser::on_error(&output) else {
        panic!("expected a classified failure");
    };
    insta::assert_snapshot!(err, @"push rejected: refs/heads/main");
    let Some(GitResponse::Push(result)) = err.response() else {
        panic!("expected push response");
    };
    assert_eq!(result.rejected().count(), 1);
}

#[test]
fn test_unrelated_failure_is_rejected() {
    let output = TaskOutput::new(
        Some(128),
        Vec::new(),
        b"fatal: 'nowhere' does not appear to be a git repository\n".to_vec(),
        Encoding::Utf8,
    );
    assert!(matches!(PushParser::on_error(&output), ErrorResolution::Reject));
}

#[test]
fn test_parser_accepts_up_to_date() {
    let output = TaskOutput::text("To r\n=\trefs/heads/main:refs/heads/main\t[up to date]\nDone\n", "");
    let result = PushParser.parse(&output).expect("up to date");
    assert_eq!(result.pushed[0].status, PushStatus::UpToDate);
}
