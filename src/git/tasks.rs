// gitrun: git command automation layer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Task constructors, one per facade operation.
//!
//! Each function validates what it can without running git and returns a
//! configuration-error task when the arguments are unusable. The argument
//! vectors here are the only place that knows git's flags.

use bon::Builder;
use serde::Serialize;

use crate::parsers::branch::{
    BranchDeleteParser, BranchDeletionSummary, BranchListParser, BranchSummary,
};
use crate::parsers::clean::{CleanParser, CleanSummary};
use crate::parsers::commit::{CommitParser, CommitResult};
use crate::parsers::diff::{DiffSummary, DiffSummaryParser};
use crate::parsers::fetch::{FetchParser, FetchResult};
use crate::parsers::log::{LOG_FORMAT, LogParser, LogResult};
use crate::parsers::merge::{MergeParser, MergeSummary};
use crate::parsers::pull::{PullParser, PullResult};
use crate::parsers::push::{PushParser, PushResult};
use crate::parsers::remote::{RemoteParser, RemoteWithRefs};
use crate::parsers::status::{StatusParser, StatusSummary};
use crate::parsers::tag::{TagList, TagListParser, TagName, TagNameParser};
use crate::parsers::{BytesParser, TextParser, TrimmedParser};
use crate::task::{OutputFormat, Task, TaskFlags, TaskOutput};

fn argv<'a>(head: &[&'a str], tail: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    head.iter()
        .copied()
        .chain(tail)
        .map(str::to_string)
        .collect()
}

fn blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// `clean` must either delete or preview; interactive mode needs a terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CleanMode {
    Force,
    DryRun,
}

impl CleanMode {
    const fn flag(self) -> &'static str {
        match self {
            Self::Force => "-f",
            Self::DryRun => "-n",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResetMode {
    Soft,
    #[default]
    Mixed,
    Hard,
    Merge,
    Keep,
}

impl ResetMode {
    const fn flag(self) -> &'static str {
        match self {
            Self::Soft => "--soft",
            Self::Mixed => "--mixed",
            Self::Hard => "--hard",
            Self::Merge => "--merge",
            Self::Keep => "--keep",
        }
    }
}

/// Filters for [`log`].
#[derive(Debug, Clone, Builder)]
pub struct LogOptions {
    /// Limit the number of commits.
    #[builder(setters(name = with_max_count))]
    max_count: Option<usize>,
    /// Exclusive start of a `from..to` range.
    #[builder(setters(name = with_from), into)]
    from: Option<String>,
    /// Inclusive end of the range, `HEAD` when only `from` is given.
    #[builder(setters(name = with_to), into)]
    to: Option<String>,
    /// Only commits touching this path.
    #[builder(setters(name = with_file), into)]
    file: Option<String>,
}

impl Default for LogOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl LogOptions {
    #[must_use]
    pub const fn max_count(&self) -> Option<usize> {
        self.max_count
    }

    #[must_use]
    pub fn range(&self) -> Option<String> {
        match (&self.from, &self.to) {
            (Some(from), Some(to)) => Some(format!("{from}..{to}")),
            (Some(from), None) => Some(format!("{from}..HEAD")),
            (None, Some(to)) => Some(to.clone()),
            (None, None) => None,
        }
    }

    #[must_use]
    pub fn file(&self) -> Option<&str> {
        self.file.as_deref()
    }
}

// --- Working tree ---

pub fn status(paths: &[&str]) -> Task<StatusSummary> {
    let mut commands = argv(&["status", "--porcelain", "-b", "-u", "--null"], []);
    if !paths.is_empty() {
        commands.push("--".to_string());
        commands.extend(paths.iter().map(|p| (*p).to_string()));
    }
    Task::command("status", commands, StatusParser)
}

pub fn add(paths: &[&str]) -> Task<String> {
    if paths.is_empty() {
        return Task::configuration_error("add", "add requires at least one path");
    }
    Task::command("add", argv(&["add"], paths.iter().copied()), TextParser)
}

/// Commits the index, or only `files` when given.
///
/// "Nothing to commit" resolves to an empty [`CommitResult`].
pub fn commit(message: &str, files: &[&str]) -> Task<CommitResult> {
    if blank(message) {
        return Task::configuration_error("commit", "commit message must not be empty");
    }
    let mut commands = argv(&["commit", "-m", message], []);
    if !files.is_empty() {
        commands.push("--".to_string());
        commands.extend(files.iter().map(|f| (*f).to_string()));
    }
    Task::command("commit", commands, CommitParser).with_on_error(CommitParser::on_error)
}

pub fn rm(paths: &[&str], keep_local: bool) -> Task<String> {
    if paths.is_empty() {
        return Task::configuration_error("rm", "rm requires at least one path");
    }
    let mode = if keep_local { "--cached" } else { "-f" };
    Task::command("rm", argv(&["rm", mode, "--"], paths.iter().copied()), TextParser)
}

pub fn reset(mode: ResetMode, target: Option<&str>) -> Task<String> {
    Task::command("reset", argv(&["reset", mode.flag()], target), TextParser)
        .with_flags(TaskFlags::CONCAT_STDERR)
}

pub fn clean(mode: CleanMode, options: &[&str]) -> Task<CleanSummary> {
    let interactive = |option: &&str| match option.strip_prefix("--") {
        Some(long) => long == "interactive",
        None => option.starts_with('-') && option.contains('i'),
    };
    if options.iter().any(interactive) {
        return Task::configuration_error("clean", "interactive clean is not supported");
    }
    Task::command(
        "clean",
        argv(&["clean", mode.flag()], options.iter().copied()),
        CleanParser::new(mode == CleanMode::DryRun),
    )
}

pub fn init(bare: bool) -> Task<String> {
    let flag = bare.then_some("--bare");
    Task::command("init", argv(&["init"], flag), TextParser)
}

// --- Remotes ---

/// Pushes `branch` to `remote` (git's defaults when both are omitted).
pub fn push(remote: Option<&str>, branch: Option<&str>, options: &[&str]) -> Task<PushResult> {
    if remote.is_none() && branch.is_some() {
        return Task::configuration_error("push", "a branch can only be pushed to a named remote");
    }
    let mut commands = argv(&["push"], options.iter().copied());
    commands.extend(argv(&["--verbose", "--porcelain"], remote.into_iter().chain(branch)));
    Task::command("push", commands, PushParser)
        .with_flags(TaskFlags::CONCAT_STDERR)
        .with_on_error(PushParser::on_error)
}

pub fn pull(remote: Option<&str>, branch: Option<&str>, options: &[&str]) -> Task<PullResult> {
    if remote.is_none() && branch.is_some() {
        return Task::configuration_error("pull", "a branch can only be pulled from a named remote");
    }
    let mut commands = argv(&["pull"], options.iter().copied());
    commands.extend(remote.into_iter().chain(branch).map(str::to_string));
    Task::command("pull", commands, PullParser)
        .with_flags(TaskFlags::CONCAT_STDERR)
        .with_on_error(PullParser::on_error)
}

pub fn fetch(remote: Option<&str>, branch: Option<&str>, options: &[&str]) -> Task<FetchResult> {
    if remote.is_none() && branch.is_some() {
        return Task::configuration_error(
            "fetch",
            "a branch can only be fetched from a named remote",
        );
    }
    let mut commands = argv(&["fetch"], options.iter().copied());
    commands.extend(remote.into_iter().chain(branch).map(str::to_string));
    Task::command("fetch", commands, FetchParser).with_flags(TaskFlags::CONCAT_STDERR)
}

pub fn remotes() -> Task<Vec<RemoteWithRefs>> {
    Task::command("remotes", argv(&["remote", "-v"], []), RemoteParser)
}

pub fn add_remote(name: &str, url: &str) -> Task<String> {
    if blank(name) || blank(url) {
        return Task::configuration_error("add_remote", "remote name and url must not be empty");
    }
    Task::command("add_remote", argv(&["remote", "add", name, url], []), TextParser)
}

pub fn remove_remote(name: &str) -> Task<String> {
    if blank(name) {
        return Task::configuration_error("remove_remote", "remote name must not be empty");
    }
    Task::command("remove_remote", argv(&["remote", "remove", name], []), TextParser)
}

// --- Branches and tags ---

pub fn branch_list(options: &[&str]) -> Task<BranchSummary> {
    Task::command(
        "branch_list",
        argv(&["branch", "-a", "-v", "--no-abbrev"], options.iter().copied()),
        BranchListParser,
    )
}

pub fn branch_local() -> Task<BranchSummary> {
    Task::command("branch_local", argv(&["branch", "-v", "--no-abbrev"], []), BranchListParser)
}

/// Deletes a local branch; `force` deletes even when unmerged.
///
/// A refusal is a parsed failure carrying an unsuccessful summary.
pub fn delete_branch(branch: &str, force: bool) -> Task<BranchDeletionSummary> {
    if blank(branch) {
        return Task::configuration_error("delete_branch", "branch name must not be empty");
    }
    let flag = if force { "-D" } else { "-d" };
    let parser = BranchDeleteParser::new(branch);
    let hook = parser.clone();
    Task::command("delete_branch", argv(&["branch", flag, branch], []), parser)
        .with_on_error(move |output: &TaskOutput| hook.on_error(output))
}

pub fn checkout(what: &str, options: &[&str]) -> Task<String> {
    if blank(what) {
        return Task::configuration_error("checkout", "checkout target must not be empty");
    }
    let mut commands = argv(&["checkout"], options.iter().copied());
    commands.push(what.to_string());
    Task::command("checkout", commands, TextParser).with_flags(TaskFlags::CONCAT_STDERR)
}

pub fn checkout_local_branch(branch: &str, start_point: Option<&str>) -> Task<String> {
    if blank(branch) {
        return Task::configuration_error("checkout_local_branch", "branch name must not be empty");
    }
    Task::command(
        "checkout_local_branch",
        argv(&["checkout", "-b", branch], start_point),
        TextParser,
    )
    .with_flags(TaskFlags::CONCAT_STDERR)
}

pub fn merge(options: &[&str]) -> Task<MergeSummary> {
    if options.is_empty() {
        return Task::configuration_error("merge", "merge requires a branch or options");
    }
    Task::command("merge", argv(&["merge"], options.iter().copied()), MergeParser)
        .with_on_error(MergeParser::on_error)
}

pub fn tags(options: &[&str]) -> Task<TagList> {
    Task::command("tags", argv(&["tag", "-l"], options.iter().copied()), TagListParser)
}

pub fn add_tag(name: &str) -> Task<TagName> {
    if blank(name) {
        return Task::configuration_error("add_tag", "tag name must not be empty");
    }
    Task::command("add_tag", argv(&["tag", name], []), TagNameParser::new(name))
}

pub fn add_annotated_tag(name: &str, message: &str) -> Task<TagName> {
    if blank(name) {
        return Task::configuration_error("add_annotated_tag", "tag name must not be empty");
    }
    if blank(message) {
        return Task::configuration_error("add_annotated_tag", "tag message must not be empty");
    }
    Task::command(
        "add_annotated_tag",
        argv(&["tag", "-a", "-m", message, name], []),
        TagNameParser::new(name),
    )
}

// --- History and objects ---

pub fn diff(options: &[&str]) -> Task<String> {
    Task::command("diff", argv(&["diff"], options.iter().copied()), TextParser)
}

pub fn diff_summary(options: &[&str]) -> Task<DiffSummary> {
    Task::command(
        "diff_summary",
        argv(&["diff", "--stat=4096"], options.iter().copied()),
        DiffSummaryParser,
    )
}

pub fn log(options: &LogOptions) -> Task<LogResult> {
    let mut commands = argv(&["log", LOG_FORMAT], []);
    if let Some(count) = options.max_count() {
        commands.push(format!("--max-count={count}"));
    }
    commands.extend(options.range());
    if let Some(file) = options.file() {
        commands.push("--follow".to_string());
        commands.push("--".to_string());
        commands.push(file.to_string());
    }
    Task::command("log", commands, LogParser)
}

pub fn show(options: &[&str]) -> Task<String> {
    Task::command("show", argv(&["show"], options.iter().copied()), TextParser)
}

pub fn rev_parse(options: &[&str]) -> Task<String> {
    Task::command("rev_parse", argv(&["rev-parse"], options.iter().copied()), TrimmedParser)
}

/// `cat-file` with the output kept as raw bytes.
pub fn cat_file_binary(options: &[&str]) -> Task<Vec<u8>> {
    if options.is_empty() {
        return Task::configuration_error("cat_file_binary", "cat-file requires an object");
    }
    Task::command("cat_file", argv(&["cat-file"], options.iter().copied()), BytesParser)
        .with_format(OutputFormat::Binary)
}

// --- Submodules ---

pub fn submodule_add(repo: &str, path: &str) -> Task<String> {
    if blank(repo) || blank(path) {
        return Task::configuration_error(
            "submodule_add",
            "submodule url and path must not be empty",
        );
    }
    Task::command("submodule_add", argv(&["submodule", "add", repo, path], []), TextParser)
        .with_flags(TaskFlags::CONCAT_STDERR)
}

pub fn submodule_update(options: &[&str]) -> Task<String> {
    Task::command(
        "submodule_update",
        argv(&["submodule", "update"], options.iter().copied()),
        TextParser,
    )
    .with_flags(TaskFlags::CONCAT_STDERR)
}

pub fn submodule_init(options: &[&str]) -> Task<String> {
    Task::command(
        "submodule_init",
        argv(&["submodule", "init"], options.iter().copied()),
        TextParser,
    )
    .with_flags(TaskFlags::CONCAT_STDERR)
}

/// Runs an arbitrary git command and returns its stdout.
pub fn raw(args: &[&str]) -> Task<String> {
    if args.is_empty() {
        return Task::configuration_error("raw", "raw requires at least one argument");
    }
    Task::command("raw", argv(&[], args.iter().copied()), TextParser)
}
