// gitrun: git command automation layer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::{DiffFile, DiffSummaryParser};

#[test]
fn test_stat_block() {
    let text = " src/lib.rs | 12 ++++++++----\n \
                logo.png   | Bin 0 -> 2048 bytes\n \
                2 files changed, 8 insertions(+), 4 deletions(-)\n";
    let summary = DiffSummaryParser::parse_text(text);

    assert_eq!(summary.changed, 2);
    assert_eq!(summary.insertions, 8);
    assert_eq!(summary.deletions, 4);
    assert_eq!(
        summary.files,
        vec![
            DiffFile::Text {
                file: "src/lib.rs".to_string(),
                changes: 12,
                insertions: 8,
                deletions: 4,
            },
            DiffFile::Binary {
                file: "logo.png".to_string(),
                before: 0,
                after: 2048,
            },
        ]
    );
    assert!(summary.files[1].is_binary());
}

#[test]
fn test_insertions_only() {
    let summary = DiffSummaryParser::parse_text(" a.txt | 1 +\n 1 file changed, 1 insertion(+)\n");
    assert_eq!((summary.changed, summary.insertions, summary.deletions), (1, 1, 0));
    assert_eq!(summary.files[0].file(), "a.txt");
}

#[test]
fn test_empty_diff() {
    let summary = DiffSummaryParser::parse_text("");
    assert_eq!(summary.changed, 0);
    assert!(summary.files.is_empty());
}

#[test]
fn test_summary_serializes_with_type_tag() {
    let summary = DiffSummaryParser::parse_text(" a | Bin\n");
    let json = serde_json::to_value(&summary).expect("serialize");
    assert_eq!(json["files"][0]["type"], "binary");
    assert_eq!(json["files"][0]["after"], 0);
}
