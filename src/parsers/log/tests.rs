// gitrun: git command automation layer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::LogParser;

fn record(fields: [&str; 7]) -> String {
    format!("{}\x1e", fields.join("\x1f"))
}

#[test]
fn test_two_entries() {
    let text = format!(
        "{}\n{}",
        record([
            "bbbb",
            "2026-01-02T10:00:00+00:00",
            "Second | with pipe",
            "HEAD -> main, tag: v1.0",
            "Body line one\nBody line two\n",
            "Ada Lovelace",
            "ada@example.com",
        ]),
        record([
            "aaaa",
            "2026-01-01T09:00:00+00:00",
            "First",
            "",
            "",
            "Ada Lovelace",
            "ada@example.com",
        ]),
    );
    let log = LogParser::parse_text(&text);

    assert_eq!(log.total, 2);
    let latest = log.latest.as_ref().expect("latest entry");
    assert_eq!(latest.hash, "bbbb");
    assert_eq!(latest.message, "Second | with pipe");
    assert_eq!(latest.refs, "HEAD -> main, tag: v1.0");
    assert_eq!(latest.body, "Body line one\nBody line two");
    assert_eq!(log.all[1].hash, "aaaa");
    assert_eq!(log.all[1].author_email, "ada@example.com");
}

#[test]
fn test_empty_log() {
    let log = LogParser::parse_text("");
    assert_eq!(log.total, 0);
    assert!(log.latest.is_none());
}

#[test]
fn test_missing_trailing_fields_default_to_empty() {
    let log = LogParser::parse_text("cccc\x1f2026-01-01\x1fsubject\x1e");
    assert_eq!(log.all[0].message, "subject");
    assert_eq!(log.all[0].author_name, "");
}
