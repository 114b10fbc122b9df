// gitrun: git command automation layer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use crate::cli::global::GlobalOptions;
use crate::cli::{Cli, Command};
use clap::Parser;

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(std::iter::once("gitrun").chain(args.iter().copied())).unwrap()
}

fn overrides(global: &GlobalOptions) -> String {
    global
        .to_config_overrides()
        .into_iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn test_parse_version() {
    let cli = parse(&["version"]);
    assert!(matches!(cli.command, Some(Command::Version)));
}

#[test]
fn test_parse_global_options() {
    let cli = parse(&[
        "-C", "/tmp/repo", "-j", "2", "-l", "4", "--log-file", "run.log", "-e", "LANG=C", "-e",
        "GIT_TRACE=1", "--config", "a.toml", "--config", "b.toml", "status",
    ]);
    let global = &cli.global;

    assert_eq!(global.configs.len(), 2);
    assert_eq!(
        global.env,
        [
            ("LANG".to_string(), "C".to_string()),
            ("GIT_TRACE".to_string(), "1".to_string())
        ]
    );
    insta::assert_snapshot!(overrides(global), @r"
    runner.base_dir=/tmp/repo
    runner.concurrency=2
    log.level=4
    log.file_level=4
    log.file=run.log
    ");
}

#[test]
fn test_file_log_level_overrides_console_level() {
    let cli = parse(&["-l", "1", "--file-log-level", "5", "tags"]);
    insta::assert_snapshot!(overrides(&cli.global), @r"
    log.level=1
    log.file_level=5
    ");
}

#[test]
fn test_rejects_bad_global_values() {
    assert!(Cli::try_parse_from(["gitrun", "-j", "0", "status"]).is_err());
    assert!(Cli::try_parse_from(["gitrun", "-l", "7", "status"]).is_err());
    assert!(Cli::try_parse_from(["gitrun", "-e", "NOVALUE", "status"]).is_err());
    assert!(Cli::try_parse_from(["gitrun", "-e", "=x", "status"]).is_err());
}

#[test]
fn test_env_value_may_contain_equals() {
    let cli = parse(&["-e", "GIT_CONFIG_VALUE_0=a=b", "status"]);
    assert_eq!(cli.global.env[0].1, "a=b");
}

#[test]
fn test_parse_commit_with_add() {
    let cli = parse(&["commit", "-m", "fix: typo", "--add", "a.txt", "b.txt"]);
    let Some(Command::Commit(args)) = cli.command else {
        panic!("expected commit");
    };
    assert_eq!(args.message, "fix: typo");
    assert_eq!(args.add, ["a.txt", "b.txt"]);
    assert!(args.files.is_empty());
}

#[test]
fn test_parse_push_with_options() {
    let cli = parse(&["push", "origin", "main", "--", "--force", "-u"]);
    let Some(Command::Push(args)) = cli.command else {
        panic!("expected push");
    };
    assert_eq!(args.remote.as_deref(), Some("origin"));
    assert_eq!(args.branch.as_deref(), Some("main"));
    assert_eq!(args.options, ["--force", "-u"]);
}

#[test]
fn test_parse_log() {
    let cli = parse(&["log", "-n", "5", "--from", "v1.0.0", "--file", "README.md"]);
    let Some(Command::Log(args)) = cli.command else {
        panic!("expected log");
    };
    assert_eq!(args.max_count, Some(5));
    assert_eq!(args.from.as_deref(), Some("v1.0.0"));
    assert_eq!(args.to, None);
    assert_eq!(args.file.as_deref(), Some("README.md"));
}

#[test]
fn test_clean_requires_a_mode() {
    assert!(Cli::try_parse_from(["gitrun", "clean"]).is_err());
    assert!(Cli::try_parse_from(["gitrun", "clean", "-f", "-n"]).is_err());

    let cli = parse(&["clean", "-n", "-d"]);
    let Some(Command::Clean(args)) = cli.command else {
        panic!("expected clean");
    };
    assert!(args.dry_run && args.directories && !args.force);
}

#[test]
fn test_parse_raw_keeps_hyphen_arguments() {
    let cli = parse(&["raw", "log", "--oneline", "-3"]);
    let Some(Command::Raw(args)) = cli.command else {
        panic!("expected raw");
    };
    assert_eq!(args.args, ["log", "--oneline", "-3"]);
    assert!(Cli::try_parse_from(["gitrun", "raw"]).is_err());
}
