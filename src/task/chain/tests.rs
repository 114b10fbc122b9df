// gitrun: git command automation layer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

use super::{ExecutionChain, ExecutionContext};
use crate::error::{GitError, GitResponse};
use crate::logging::Logger;
use crate::parsers::TextParser;
use crate::parsers::commit::CommitParser;
use crate::parsers::merge::{MergeOutcome, MergeParser};
use crate::task::scheduler::Scheduler;
use crate::task::test_utils::{FakeSpawner, Scripted, capture_logs};
use crate::task::{FnParser, Task, TaskOutput};

fn context(spawner: &FakeSpawner) -> Arc<ExecutionContext> {
    Arc::new(ExecutionContext::new("git", Arc::new(spawner.clone())))
}

fn chain(spawner: &FakeSpawner, concurrency: usize) -> ExecutionChain {
    ExecutionChain::new(
        Arc::new(Scheduler::new(concurrency, Logger::disabled())),
        context(spawner),
        Logger::disabled(),
    )
}

fn text(name: &'static str) -> Task<String> {
    Task::command(name, vec![name.to_string()], TextParser)
}

/// Scripts by subcommand: `fail*` exits 1 with stderr, `slow*` takes 10ms.
fn scripted() -> FakeSpawner {
    FakeSpawner::new(|request| {
        let sub = request.args.first().map_or("", String::as_str);
        if sub.starts_with("fail") {
            Scripted::exit(1, "", "fatal: bad revision\n")
        } else if sub.starts_with("slow") {
            Scripted::ok(sub).after(Duration::from_millis(10))
        } else {
            Scripted::ok(sub)
        }
    })
}

#[tokio::test(start_paused = true)]
async fn test_tasks_on_one_chain_never_overlap() {
    let spawner = scripted();
    let chain = chain(&spawner, 5);

    let first = chain.push(text("slow-a"));
    let second = chain.push(text("slow-b"));
    let third = chain.push(text("slow-c"));

    assert_eq!(third.await.expect("third"), "slow-c");
    assert_eq!(first.await.expect("first"), "slow-a");
    assert_eq!(second.await.expect("second"), "slow-b");

    let records = spawner.spawned();
    assert_eq!(spawner.subcommands(), ["slow-a", "slow-b", "slow-c"]);
    for pair in records.windows(2) {
        let finished = pair[0].finished.expect("finished");
        assert!(finished <= pair[1].started);
    }
    assert_eq!(spawner.peak(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_chains_share_the_scheduler_limit() {
    let spawner = scripted();
    let scheduler = Arc::new(Scheduler::new(1, Logger::disabled()));
    let context = context(&spawner);
    let chains: Vec<_> = (0..3)
        .map(|_| ExecutionChain::new(Arc::clone(&scheduler), Arc::clone(&context), Logger::disabled()))
        .collect();

    let start = Instant::now();
    let pending: Vec<_> = chains.iter().map(|c| c.push(text("slow"))).collect();
    for fut in pending {
        fut.await.expect("task");
    }

    assert!(start.elapsed() >= Duration::from_millis(30));
    assert_eq!(spawner.peak(), 1);
    assert_eq!(scheduler.running(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_independent_chains_run_concurrently() {
    let spawner = scripted();
    let scheduler = Arc::new(Scheduler::new(3, Logger::disabled()));
    let context = context(&spawner);

    let start = Instant::now();
    let pending: Vec<_> = (0..3)
        .map(|_| {
            ExecutionChain::new(Arc::clone(&scheduler), Arc::clone(&context), Logger::disabled())
                .push(text("slow"))
        })
        .collect();
    for fut in pending {
        fut.await.expect("task");
    }

    assert!(start.elapsed() < Duration::from_millis(20));
    assert_eq!(spawner.peak(), 3);
}

#[tokio::test]
async fn test_failure_purges_queued_tasks() {
    let spawner = scripted();
    let chain = chain(&spawner, 5);

    let first = chain.push(text("one"));
    let second = chain.push(text("fail"));
    let third = chain.push(text("three"));

    assert_eq!(first.await.expect("first"), "one");
    let err = second.await.expect_err("second fails");
    assert!(matches!(err, GitError::NonZeroExit(_)), "{err:?}");

    let err = third.await.expect_err("third is abandoned");
    let GitError::QueueFatal(fatal) = &err else {
        panic!("expected QueueFatal, got {err:?}");
    };
    assert!(fatal.cause().contains("fatal: bad revision"), "{}", fatal.cause());
    assert_eq!(spawner.subcommands(), ["one", "fail"]);
    assert!(chain.pending().is_empty());

    // The chain keeps working after a purge.
    assert_eq!(chain.push(text("four")).await.expect("four"), "four");
    assert_eq!(spawner.subcommands(), ["one", "fail", "four"]);
}

#[tokio::test]
async fn test_purge_is_logged_on_the_chain_channel() {
    let logs = capture_logs(|| async {
        let spawner = scripted();
        let chain = ExecutionChain::new(
            Arc::new(Scheduler::new(5, Logger::disabled())),
            context(&spawner),
            Logger::new("gitrun"),
        );
        let failing = chain.push(text("fail"));
        let abandoned = chain.push(text("later"));
        assert!(failing.await.is_err());
        assert!(abandoned.await.is_err());
    })
    .await;

    assert!(logs.contains("fail:1 failed, abandoning later:2"), "{logs}");
    assert!(logs.contains("channel=gitrun/later:2"), "{logs}");
}

#[tokio::test]
async fn test_spawn_failure_releases_the_slot() {
    let spawner = FakeSpawner::new(|request| {
        if request.args.first().is_some_and(|a| a == "missing") {
            Scripted::spawn_error(io::ErrorKind::NotFound)
        } else {
            Scripted::ok("fine")
        }
    });
    let scheduler = Arc::new(Scheduler::new(1, Logger::disabled()));
    let context = context(&spawner);
    let a = ExecutionChain::new(Arc::clone(&scheduler), Arc::clone(&context), Logger::disabled());
    let b = ExecutionChain::new(Arc::clone(&scheduler), context, Logger::disabled());

    let err = a.push(text("missing")).await.expect_err("spawn fails");
    let GitError::Spawn(failure) = &err else {
        panic!("expected Spawn, got {err:?}");
    };
    assert_eq!(failure.io_error().kind(), io::ErrorKind::NotFound);

    assert_eq!(b.push(text("ok")).await.expect("second chain"), "fine");
    assert_eq!(scheduler.running(), 0);
}

#[tokio::test]
async fn test_configuration_task_never_spawns() {
    let spawner = scripted();
    let chain = chain(&spawner, 5);

    let err = chain
        .push(Task::<String>::configuration_error("add", "no paths given"))
        .await
        .expect_err("configuration error");
    assert_eq!(err.kind(), "configuration");
    assert_eq!(err.task().map(|t| t.name()), Some("add"));
    assert!(spawner.spawned().is_empty());
}

#[tokio::test]
async fn test_nothing_to_commit_resolves_to_empty_result() {
    let spawner = FakeSpawner::new(|request| match request.args.last().map(String::as_str) {
        Some("stdout") => Scripted::exit(1, "On branch main\nnothing to commit, working tree clean\n", ""),
        _ => Scripted::exit(1, "", "nothing added to commit but untracked files present\n"),
    });
    let chain = chain(&spawner, 5);
    let commit = |via: &str| {
        Task::command(
            "commit",
            vec!["commit".to_string(), "-m".to_string(), via.to_string()],
            CommitParser,
        )
        .with_on_error(CommitParser::on_error)
    };

    let on_stdout = chain.push(commit("stdout")).await.expect("stdout variant");
    let on_stderr = chain.push(commit("stderr")).await.expect("stderr variant");
    assert!(on_stdout.is_empty());
    assert!(on_stderr.is_empty());
}

#[tokio::test]
async fn test_conflicted_merge_is_a_parsed_failure() {
    let spawner = FakeSpawner::new(|_| {
        Scripted::ok(
            "Auto-merging a.txt\nCONFLICT (content): Merge conflict in a.txt\n\
             Automatic merge failed; fix conflicts and then commit the result.\n",
        )
    });
    let chain = chain(&spawner, 5);

    let err = chain
        .push(Task::command("merge", vec!["merge".to_string(), "topic".to_string()], MergeParser))
        .await
        .expect_err("conflict");

    insta::assert_snapshot!(err.to_string(), @"`git merge topic` failed: CONFLICTS: a.txt:content");
    assert_eq!(err.task().map(|t| t.name()), Some("merge"));
    let Some(GitResponse::Merge(summary)) = err.response() else {
        panic!("expected merge response, got {err:?}");
    };
    assert_eq!(summary.result, MergeOutcome::Failed);
    assert_eq!(summary.merges, ["a.txt"]);
}

#[tokio::test(start_paused = true)]
async fn test_settings_are_read_at_spawn_time() {
    let spawner = scripted();
    let chain = chain(&spawner, 5);

    let running = chain.push(text("slow"));
    let queued = chain.push(text("next"));
    tokio::time::sleep(Duration::from_millis(1)).await;

    chain.context().set_cwd(Some(PathBuf::from("/repo")));
    chain.context().insert_env("GIT_AUTHOR_NAME", "Test");

    running.await.expect("running");
    queued.await.expect("queued");

    let records = spawner.spawned();
    assert_eq!(records[0].cwd, None);
    assert!(records[0].env.is_empty());
    assert_eq!(records[1].cwd, Some(PathBuf::from("/repo")));
    assert_eq!(records[1].env.get("GIT_AUTHOR_NAME").map(String::as_str), Some("Test"));
    assert_eq!(records[1].program, "git");
}

#[tokio::test]
async fn test_dropped_future_still_runs_and_orders() {
    let spawner = scripted();
    let chain = chain(&spawner, 5);

    drop(chain.push(text("detached")));
    assert_eq!(chain.push(text("after")).await.expect("after"), "after");
    assert_eq!(spawner.subcommands(), ["detached", "after"]);
}

#[tokio::test]
#[should_panic(expected = "parser exploded")]
async fn test_parser_panic_reaches_the_caller() {
    let spawner = scripted();
    let chain = chain(&spawner, 5);
    let task = Task::command(
        "status",
        vec!["status".to_string()],
        FnParser(|_: &TaskOutput| -> crate::error::GitResult<()> { panic!("parser exploded") }),
    );
    let _ = chain.push(task).await;
}
