// gitrun: git command automation layer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Arguments of the git commands.
//!
//! ```text
//! commit -m MSG --add a.txt b.txt
//!   -> one session: add a.txt b.txt, then commit
//! push origin main --force
//!   -> git push --force --verbose --porcelain origin main
//! raw -- log --oneline
//!   -> git log --oneline
//! ```

use clap::{ArgGroup, Args};

/// Optional list of paths.
#[derive(Debug, Clone, Args)]
pub struct PathsArgs {
    /// Paths to restrict the command to.
    #[arg(value_name = "PATH")]
    pub paths: Vec<String>,
}

/// Arguments for the `log` command.
#[derive(Debug, Clone, Args)]
pub struct LogArgs {
    /// Limits the number of commits.
    #[arg(short = 'n', long = "max-count", value_name = "N")]
    pub max_count: Option<usize>,

    /// Only commits after this revision.
    #[arg(long, value_name = "REV")]
    pub from: Option<String>,

    /// Only commits up to this revision.
    #[arg(long, value_name = "REV")]
    pub to: Option<String>,

    /// Only commits touching this file, following renames.
    #[arg(long, value_name = "PATH")]
    pub file: Option<String>,
}

/// Arguments for the `branches` command.
#[derive(Debug, Clone, Args)]
pub struct BranchesArgs {
    /// Lists local branches only.
    #[arg(long)]
    pub local: bool,
}

/// Arguments for the `diff` command.
#[derive(Debug, Clone, Args)]
pub struct DiffArgs {
    /// Prints per-file counts instead of the patch.
    #[arg(long)]
    pub stat: bool,

    /// Revisions and paths passed to git diff.
    #[arg(value_name = "ARG", allow_hyphen_values = true)]
    pub args: Vec<String>,
}

/// Arguments for the `commit` command.
#[derive(Debug, Clone, Args)]
pub struct CommitArgs {
    /// Commit message.
    #[arg(short = 'm', long = "message", value_name = "MSG")]
    pub message: String,

    /// Stages these paths before committing.
    #[arg(long = "add", value_name = "PATH", num_args = 1..)]
    pub add: Vec<String>,

    /// Commits only these paths.
    #[arg(value_name = "PATH", last = true)]
    pub files: Vec<String>,
}

/// Remote and branch shared by `push`, `pull` and `fetch`.
#[derive(Debug, Clone, Args)]
pub struct RemoteArgs {
    /// Remote name.
    #[arg(value_name = "REMOTE")]
    pub remote: Option<String>,

    /// Branch name, requires a remote.
    #[arg(value_name = "BRANCH", requires = "remote")]
    pub branch: Option<String>,

    /// Extra options passed to git, after `--`.
    #[arg(value_name = "OPTION", last = true)]
    pub options: Vec<String>,
}

/// Arguments for the `merge` command.
#[derive(Debug, Clone, Args)]
pub struct MergeArgs {
    /// Branches and options passed to git merge.
    #[arg(value_name = "ARG", required = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

/// Arguments for the `clean` command.
#[derive(Debug, Clone, Args)]
#[command(group(ArgGroup::new("mode").required(true).args(["force", "dry_run"])))]
pub struct CleanArgs {
    /// Deletes the files.
    #[arg(short = 'f', long)]
    pub force: bool,

    /// Only reports what would be deleted.
    #[arg(short = 'n', long = "dry-run")]
    pub dry_run: bool,

    /// Also removes untracked directories.
    #[arg(short = 'd', long = "directories")]
    pub directories: bool,

    /// Also removes ignored files.
    #[arg(short = 'x', long = "ignored")]
    pub ignored: bool,
}

/// Arguments for the `raw` command.
#[derive(Debug, Clone, Args)]
pub struct RawArgs {
    /// Arguments passed to git unchanged.
    #[arg(value_name = "ARG", required = true, trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}
