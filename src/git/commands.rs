// gitrun: git command automation layer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! High-level operations shared by [`Git`](super::Git) and
//! [`Session`](super::Session).
//!
//! ```text
//! git.status(&[])          --> tasks::status --> execute --> fresh chain
//! session.status(&[])      --> tasks::status --> execute --> session chain
//! ```
//!
//! Every method builds its [`Task`] synchronously, so the task is queued
//! before the returned future is first polled.

use futures_util::future::BoxFuture;

use super::tasks::{self, CleanMode, LogOptions, ResetMode};
use crate::error::GitResult;
use crate::parsers::branch::{BranchDeletionSummary, BranchSummary};
use crate::parsers::clean::CleanSummary;
use crate::parsers::commit::CommitResult;
use crate::parsers::diff::DiffSummary;
use crate::parsers::fetch::FetchResult;
use crate::parsers::log::LogResult;
use crate::parsers::merge::MergeSummary;
use crate::parsers::pull::PullResult;
use crate::parsers::push::PushResult;
use crate::parsers::remote::RemoteWithRefs;
use crate::parsers::status::StatusSummary;
use crate::parsers::tag::{TagList, TagName};
use crate::task::Task;

/// Result of every facade operation.
pub type GitFuture<T> = BoxFuture<'static, GitResult<T>>;

/// Git operations on top of a task executor.
///
/// Implementors only provide [`GitCommands::execute`].
pub trait GitCommands {
    /// Queues `task` and resolves with its result.
    fn execute<T: Send + 'static>(&self, task: Task<T>) -> GitFuture<T>;

    /// Working tree status, optionally restricted to `paths`.
    fn status(&self, paths: &[&str]) -> GitFuture<StatusSummary> {
        self.execute(tasks::status(paths))
    }

    fn add(&self, paths: &[&str]) -> GitFuture<String> {
        self.execute(tasks::add(paths))
    }

    /// Commits staged changes, or only `files` when non-empty.
    ///
    /// # Errors
    ///
    /// A blank message is a configuration error. "Nothing to commit" is not an
    /// error; it yields an empty [`CommitResult`].
    fn commit(&self, message: &str, files: &[&str]) -> GitFuture<CommitResult> {
        self.execute(tasks::commit(message, files))
    }

    /// # Errors
    ///
    /// Rejected refs surface as a parsed failure carrying the [`PushResult`].
    fn push(
        &self,
        remote: Option<&str>,
        branch: Option<&str>,
        options: &[&str],
    ) -> GitFuture<PushResult> {
        self.execute(tasks::push(remote, branch, options))
    }

    /// # Errors
    ///
    /// Merge conflicts surface as a parsed failure carrying the pull and merge
    /// summaries.
    fn pull(
        &self,
        remote: Option<&str>,
        branch: Option<&str>,
        options: &[&str],
    ) -> GitFuture<PullResult> {
        self.execute(tasks::pull(remote, branch, options))
    }

    fn fetch(
        &self,
        remote: Option<&str>,
        branch: Option<&str>,
        options: &[&str],
    ) -> GitFuture<FetchResult> {
        self.execute(tasks::fetch(remote, branch, options))
    }

    /// Local and remote-tracking branches.
    fn branch_list(&self, options: &[&str]) -> GitFuture<BranchSummary> {
        self.execute(tasks::branch_list(options))
    }

    fn branch_local(&self) -> GitFuture<BranchSummary> {
        self.execute(tasks::branch_local())
    }

    fn delete_branch(&self, branch: &str, force: bool) -> GitFuture<BranchDeletionSummary> {
        self.execute(tasks::delete_branch(branch, force))
    }

    fn checkout(&self, what: &str, options: &[&str]) -> GitFuture<String> {
        self.execute(tasks::checkout(what, options))
    }

    fn checkout_local_branch(&self, branch: &str, start_point: Option<&str>) -> GitFuture<String> {
        self.execute(tasks::checkout_local_branch(branch, start_point))
    }

    fn diff(&self, options: &[&str]) -> GitFuture<String> {
        self.execute(tasks::diff(options))
    }

    fn diff_summary(&self, options: &[&str]) -> GitFuture<DiffSummary> {
        self.execute(tasks::diff_summary(options))
    }

    fn log(&self, options: &LogOptions) -> GitFuture<LogResult> {
        self.execute(tasks::log(options))
    }

    /// # Errors
    ///
    /// Any `CONFLICT` line is a parsed failure, even when git exits 0.
    fn merge(&self, options: &[&str]) -> GitFuture<MergeSummary> {
        self.execute(tasks::merge(options))
    }

    fn tags(&self, options: &[&str]) -> GitFuture<TagList> {
        self.execute(tasks::tags(options))
    }

    fn add_tag(&self, name: &str) -> GitFuture<TagName> {
        self.execute(tasks::add_tag(name))
    }

    fn add_annotated_tag(&self, name: &str, message: &str) -> GitFuture<TagName> {
        self.execute(tasks::add_annotated_tag(name, message))
    }

    fn clean(&self, mode: CleanMode, options: &[&str]) -> GitFuture<CleanSummary> {
        self.execute(tasks::clean(mode, options))
    }

    fn remotes(&self) -> GitFuture<Vec<RemoteWithRefs>> {
        self.execute(tasks::remotes())
    }

    fn add_remote(&self, name: &str, url: &str) -> GitFuture<String> {
        self.execute(tasks::add_remote(name, url))
    }

    fn remove_remote(&self, name: &str) -> GitFuture<String> {
        self.execute(tasks::remove_remote(name))
    }

    fn submodule_add(&self, repo: &str, path: &str) -> GitFuture<String> {
        self.execute(tasks::submodule_add(repo, path))
    }

    fn submodule_update(&self, options: &[&str]) -> GitFuture<String> {
        self.execute(tasks::submodule_update(options))
    }

    fn submodule_init(&self, options: &[&str]) -> GitFuture<String> {
        self.execute(tasks::submodule_init(options))
    }

    fn init(&self, bare: bool) -> GitFuture<String> {
        self.execute(tasks::init(bare))
    }

    /// Trimmed `rev-parse` output, e.g. a full hash or `--show-toplevel`.
    fn rev_parse(&self, options: &[&str]) -> GitFuture<String> {
        self.execute(tasks::rev_parse(options))
    }

    fn reset(&self, mode: ResetMode, target: Option<&str>) -> GitFuture<String> {
        self.execute(tasks::reset(mode, target))
    }

    /// Removes `paths` from the index; `keep_local` leaves the files on disk.
    fn rm(&self, paths: &[&str], keep_local: bool) -> GitFuture<String> {
        self.execute(tasks::rm(paths, keep_local))
    }

    fn show(&self, options: &[&str]) -> GitFuture<String> {
        self.execute(tasks::show(options))
    }

    fn cat_file_binary(&self, options: &[&str]) -> GitFuture<Vec<u8>> {
        self.execute(tasks::cat_file_binary(options))
    }

    /// Any git invocation; `args` excludes the binary itself.
    fn raw(&self, args: &[&str]) -> GitFuture<String> {
        self.execute(tasks::raw(args))
    }
}
