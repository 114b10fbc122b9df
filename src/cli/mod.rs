// gitrun: git command automation layer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! CLI module for gitrun using clap derive.
//!
//! # Command Structure
//!
//! ```text
//! gitrun [global options] <command>
//! status [PATH...]          branches [--local]
//! log [-n N] [--from REV]   tags
//! diff [--stat] [ARG...]    remotes
//! add PATH...               commit -m MSG [--add PATH...]
//! push [REMOTE [BRANCH]]    pull [REMOTE [BRANCH]]
//! fetch [REMOTE [BRANCH]]   merge ARG...
//! clean (--force|--dry-run) raw -- ARG...
//! options                   configs
//! ```
//!
//! Every git command prints its parsed result as JSON on stdout.

pub mod git;
pub mod global;

#[cfg(test)]
mod tests;

use crate::cli::git::{
    BranchesArgs, CleanArgs, CommitArgs, DiffArgs, LogArgs, MergeArgs, PathsArgs,
    RawArgs, RemoteArgs,
};
use crate::cli::global::GlobalOptions;
use clap::{Parser, Subcommand};

/// Bounded-concurrency git runner with typed output.
#[derive(Debug, Parser)]
#[command(
    name = "gitrun",
    author,
    version,
    about = "Runs git commands and prints their parsed output as JSON",
    long_about = "gitrun Copyright (C) 2026 Romeo Ahmed\n\
                  This program comes with ABSOLUTELY NO WARRANTY\n\
                  This is free software, and you are welcome to redistribute it\n\
                  under certain conditions; see LICENSE for details.\n\n\
                  Runs git commands through a bounded scheduler and prints the\n\
                  parsed result of each command as JSON. See\n\
                  `gitrun <command> --help` for more information about a command.",
    after_help = "CONFIGURATION:\n\n\
                  gitrun reads `gitrun.toml` from the current directory when present,\n\
                  then every file given with --config, then GITRUN_* environment\n\
                  variables such as GITRUN_RUNNER__CONCURRENCY=2. Command-line\n\
                  flags override all of them."
)]
pub struct Cli {
    /// Global options shared by all commands
    #[command(flatten)]
    pub global: GlobalOptions,

    /// Command to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Shows the version.
    Version,

    /// Lists all options and their effective values.
    Options,

    /// Lists the configuration files that were loaded.
    Configs,

    /// Shows the working tree status.
    Status(PathsArgs),

    /// Shows commit history.
    Log(LogArgs),

    /// Lists branches.
    Branches(BranchesArgs),

    /// Lists tags.
    Tags,

    /// Shows changes, as a patch or as per-file counts.
    Diff(DiffArgs),

    /// Lists remotes with their fetch and push urls.
    Remotes,

    /// Stages files.
    Add(PathsArgs),

    /// Records a commit, optionally staging files first.
    Commit(CommitArgs),

    /// Pushes to a remote.
    Push(RemoteArgs),

    /// Pulls from a remote.
    Pull(RemoteArgs),

    /// Fetches from a remote.
    Fetch(RemoteArgs),

    /// Merges branches into the current one.
    Merge(MergeArgs),

    /// Removes untracked files.
    Clean(CleanArgs),

    /// Runs any git command and prints its stdout.
    Raw(RawArgs),
}

/// Parses command-line arguments.
#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}

/// Parses command-line arguments from an iterator.
pub fn parse_from<I, T>(iter: I) -> Cli
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::parse_from(iter)
}

/// Tries to parse command-line arguments, returning an error on failure.
///
/// # Errors
///
/// Returns a `clap::Error` if the arguments are invalid or if help/version information
/// was requested.
pub fn try_parse() -> Result<Cli, clap::Error> {
    Cli::try_parse()
}
