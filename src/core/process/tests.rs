// gitrun: git command automation layer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

#![cfg(unix)]

use std::time::{Duration, Instant};

use super::builder::ProcessBuilder;
use super::{OutputStream, ProcessSpawner, RawProcessResult, SpawnRequest, Spawner};
use crate::logging::Logger;
use crate::task::test_utils::task_id;

fn sh(script: &str) -> ProcessBuilder {
    ProcessBuilder::new("/bin/sh").arg("-c").arg(script)
}

fn text(chunks: &[Vec<u8>]) -> String {
    String::from_utf8_lossy(&chunks.concat()).into_owned()
}

#[tokio::test]
async fn test_process_echo() {
    let result = sh("echo hello").run().await.expect("echo should run");
    assert_eq!(result.exit_code(), Some(0));
    insta::assert_snapshot!(text(result.stdout_chunks()).trim(), @"hello");
    assert!(result.stderr_chunks().is_empty());
}

#[tokio::test]
async fn test_process_exit_code_and_stderr() {
    let result = sh("echo oops >&2; exit 42").run().await.expect("process should complete");
    assert_eq!(result.exit_code(), Some(42));
    assert_eq!(text(result.stderr_chunks()), "oops\n");
}

#[tokio::test]
async fn test_signal_exit_has_no_code() {
    let result = sh("kill -9 $$").run().await.expect("process should complete");
    assert_eq!(result.exit_code(), None);
}

#[tokio::test]
async fn test_env_overlay_and_non_interactive_defaults() {
    let result = sh("echo \"$TEST_VAR $GIT_TERMINAL_PROMPT $GCM_INTERACTIVE\"")
        .env("TEST_VAR", "test_value")
        .run()
        .await
        .expect("process should succeed");
    insta::assert_snapshot!(text(result.stdout_chunks()).trim(), @"test_value 0 never");
}

#[tokio::test]
async fn test_overlay_overrides_defaults() {
    let result = sh("echo $GIT_TERMINAL_PROMPT")
        .env("GIT_TERMINAL_PROMPT", "1")
        .run()
        .await
        .expect("process should succeed");
    assert_eq!(text(result.stdout_chunks()).trim(), "1");
}

#[tokio::test]
async fn test_cwd() {
    let dir = tempfile::tempdir().expect("tempdir");
    let result = sh("pwd").cwd(dir.path()).run().await.expect("pwd");
    let reported = std::path::PathBuf::from(text(result.stdout_chunks()).trim());
    assert_eq!(
        reported.canonicalize().expect("canonical"),
        dir.path().canonicalize().expect("canonical")
    );
}

#[tokio::test]
async fn test_missing_binary_is_io_error() {
    let err = ProcessBuilder::new("/nonexistent/gitrun-test-binary")
        .run()
        .await
        .expect_err("spawn should fail");
    assert_eq!(err.kind(), std::io::ErrorKind::NotFound);
}

#[tokio::test]
async fn test_settles_when_grandchild_holds_pipes() {
    let started = Instant::now();
    let result = sh("sleep 3 & echo done")
        .settle_grace(Duration::from_millis(50))
        .run()
        .await
        .expect("process should complete");

    assert!(started.elapsed() < Duration::from_secs(2), "settled without waiting for sleep");
    assert_eq!(result.exit_code(), Some(0));
    assert_eq!(text(result.stdout_chunks()).trim(), "done");
}

#[tokio::test]
async fn test_spawner_feeds_tap() {
    let (tx, rx) = flume::unbounded();
    let id = task_id();
    let request = SpawnRequest {
        task: id,
        name: "raw:1".to_string(),
        program: "/bin/sh".to_string(),
        args: vec!["-c".to_string(), "printf out; printf err >&2".to_string()],
        cwd: None,
        env: std::collections::BTreeMap::new(),
        tap: Some(tx),
        logger: Logger::disabled(),
    };

    let result = ProcessSpawner::default()
        .spawn(request)
        .await
        .expect("spawn");
    assert_eq!(result.into_buffers(), (b"out".to_vec(), b"err".to_vec()));

    let chunks: Vec<_> = rx.drain().collect();
    assert!(chunks.iter().all(|c| c.task == id && c.name == "raw:1"));
    let stdout: Vec<u8> = chunks
        .iter()
        .filter(|c| c.stream == OutputStream::Stdout)
        .flat_map(|c| c.bytes.clone())
        .collect();
    assert_eq!(stdout, b"out");
}

#[test]
fn test_raw_result_concatenates_chunks_in_order() {
    let raw = RawProcessResult::new(
        Some(0),
        vec![b"ab".to_vec(), b"cd".to_vec()],
        vec![b"x".to_vec()],
    );
    assert_eq!(raw.into_buffers(), (b"abcd".to_vec(), b"x".to_vec()));

    let empty = RawProcessResult::from_output(Some(1), "", "");
    assert!(empty.stdout_chunks().is_empty() && empty.stderr_chunks().is_empty());
}

#[test]
fn test_executable_lookup() {
    assert!(ProcessBuilder::exists("sh"));
    assert!(ProcessBuilder::find("gitrun_nonexistent_program_12345").is_none());
}
