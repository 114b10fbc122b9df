// gitrun: git command automation layer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Git command handlers.
//!
//! Results are written as pretty JSON, except `diff` without `--stat` and
//! `raw`, which write git's text unchanged. A parsed failure (merge conflict,
//! rejected push, ...) writes its structured response before returning the
//! error.

use serde::Serialize;
use std::io::Write;

use crate::cli::Command;
use crate::cli::global::GlobalOptions;
use crate::config::Config;
use crate::error::{GitError, GitResult, Result};
use crate::git::{CleanMode, Git, GitCommands, LogOptions};

/// Builds the runner from configuration plus `--env` pairs.
#[must_use]
pub fn build_runner(config: &Config, global: &GlobalOptions) -> Git {
    let git = Git::from_config(&config.runner);
    for (key, value) in &global.env {
        git.set_env(key, value);
    }
    git
}

fn strs(values: &[String]) -> Vec<&str> {
    values.iter().map(String::as_str).collect()
}

fn write_json<W: Write, T: Serialize>(out: &mut W, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

/// Writes a successful result as JSON, or the response of a parsed failure.
fn emit<W: Write, T: Serialize>(out: &mut W, result: GitResult<T>) -> Result<()> {
    match result {
        Ok(value) => write_json(out, &value),
        Err(err) => {
            if let Some(response) = err.response() {
                write_json(out, response)?;
            }
            Err(err.into())
        }
    }
}

fn emit_text<W: Write>(out: &mut W, result: GitResult<String>) -> Result<()> {
    out.write_all(result?.as_bytes())?;
    Ok(())
}

/// Main handler for the git commands.
///
/// # Errors
///
/// Returns the [`GitError`] of the failed operation, or an I/O error if the
/// output cannot be written.
pub async fn run_git_command<W: Write>(command: &Command, git: &Git, out: &mut W) -> Result<()> {
    match command {
        Command::Status(args) => emit(out, git.status(&strs(&args.paths)).await),
        Command::Log(args) => {
            let options = LogOptions::builder()
                .maybe_with_max_count(args.max_count)
                .maybe_with_from(args.from.clone())
                .maybe_with_to(args.to.clone())
                .maybe_with_file(args.file.clone())
                .build();
            emit(out, git.log(&options).await)
        }
        Command::Branches(args) => {
            let result = if args.local {
                git.branch_local().await
            } else {
                git.branch_list(&[]).await
            };
            emit(out, result)
        }
        Command::Tags => emit(out, git.tags(&[]).await),
        Command::Diff(args) => {
            let options = strs(&args.args);
            if args.stat {
                emit(out, git.diff_summary(&options).await)
            } else {
                emit_text(out, git.diff(&options).await)
            }
        }
        Command::Remotes => emit(out, git.remotes().await),
        Command::Add(args) => emit(out, git.add(&strs(&args.paths)).await),
        Command::Commit(args) => {
            let session = git.session();
            let staged = (!args.add.is_empty()).then(|| session.add(&strs(&args.add)));
            let committed = session.commit(&args.message, &strs(&args.files));
            if let Some(staged) = staged {
                staged.await?;
            }
            emit(out, committed.await)
        }
        Command::Push(args) => {
            let result = git
                .push(
                    args.remote.as_deref(),
                    args.branch.as_deref(),
                    &strs(&args.options),
                )
                .await;
            emit(out, result)
        }
        Command::Pull(args) => {
            let result = git
                .pull(
                    args.remote.as_deref(),
                    args.branch.as_deref(),
                    &strs(&args.options),
                )
                .await;
            emit(out, result)
        }
        Command::Fetch(args) => {
            let result = git
                .fetch(
                    args.remote.as_deref(),
                    args.branch.as_deref(),
                    &strs(&args.options),
                )
                .await;
            emit(out, result)
        }
        Command::Merge(args) => emit(out, git.merge(&strs(&args.args)).await),
        Command::Clean(args) => {
            let mode = if args.force {
                CleanMode::Force
            } else {
                CleanMode::DryRun
            };
            let mut options = Vec::new();
            if args.directories {
                options.push("-d");
            }
            if args.ignored {
                options.push("-x");
            }
            emit(out, git.clean(mode, &options).await)
        }
        Command::Raw(args) => emit_text(out, git.raw(&strs(&args.args)).await),
        Command::Version | Command::Options | Command::Configs => Err(GitError::configuration(
            "command does not run git",
        )
        .into()),
    }
}
