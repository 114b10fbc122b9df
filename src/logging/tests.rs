// gitrun: git command automation layer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::{LogConfig, LogLevel, Logger};
use crate::task::test_utils::capture_logs;

#[test]
fn test_log_level_bounds() {
    assert!(LogLevel::new(6).is_ok());
    let err = LogLevel::new(7).expect_err("out of range");
    insta::assert_snapshot!(err, @"invalid value for 'level' in section '[log]': log level must be 0-6, got 7");
    assert_eq!(LogLevel::from_u8(9), None);
    assert_eq!(LogLevel::from_u8(5), Some(LogLevel::TRACE));
}

#[test]
fn test_filter_strings_cap_dependencies() {
    assert_eq!(LogLevel::SILENT.to_filter_string(), "off");
    assert_eq!(LogLevel::INFO.to_filter_string(), "warn,gitrun=info");
    assert_eq!(LogLevel::DUMP.to_filter_string(), "trace");
}

#[test]
fn test_log_config_defaults() {
    let config = LogConfig::default();
    assert_eq!(config.console_level(), LogLevel::INFO);
    assert_eq!(config.file_level(), LogLevel::TRACE);
    assert!(config.log_file().is_none());
    assert!(config.show_timestamps());
    assert!(!config.json());
}

#[test]
fn test_logger_channels() {
    let root = Logger::new("gitrun");
    let task = root.child("commit:3");
    assert_eq!(task.channel(), "gitrun/commit:3");
    assert_eq!(task.sibling("push:4").channel(), "gitrun/push:4");
    assert_eq!(Logger::new("solo").sibling("x").channel(), "solo/x");
    assert_eq!(format!("{:?}", Logger::disabled()), "Logger(disabled)");
    assert!(!Logger::disabled().child("a").is_enabled());
}

#[tokio::test]
async fn test_logger_emits_channel_field() {
    let logs = capture_logs(|| async {
        Logger::new("gitrun").child("status:1").info("spawned");
        Logger::disabled().info("never shown");
    })
    .await;

    assert!(logs.contains("channel=gitrun/status:1"), "{logs}");
    assert!(logs.contains("spawned"));
    assert!(!logs.contains("never shown"));
}
