// gitrun: git command automation layer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::{FetchParser, FetchedRef};

#[test]
fn test_fetch_output() {
    let text = "From https://example.com/repo\n \
* [new branch]      topic      -> origin/topic\n \
* [new tag]         v1.0       -> v1.0\n   \
1a2b3c4..5d6e7f8  main       -> origin/main\n \
+ 0000aaa...1111bbb rewrite    -> origin/rewrite  (forced update)\n \
- [deleted]         (none)     -> origin/gone\n";
    let result = FetchParser::parse_text(text);

    assert_eq!(result.remote.as_deref(), Some("https://example.com/repo"));
    assert_eq!(
        result.branches,
        vec![FetchedRef {
            name: "topic".to_string(),
            tracking: "origin/topic".to_string(),
        }]
    );
    assert_eq!(result.tags[0].name, "v1.0");
    assert_eq!(result.updated.len(), 2);
    assert_eq!(result.updated[0].from, "1a2b3c4");
    assert!(!result.updated[0].forced);
    assert_eq!(result.updated[1].tracking, "origin/rewrite");
    assert!(result.updated[1].forced);
    assert_eq!(result.deleted, vec!["origin/gone"]);
}

#[test]
fn test_quiet_fetch() {
    let result = FetchParser::parse_text("");
    assert_eq!(result.remote, None);
    assert!(result.updated.is_empty());
}
