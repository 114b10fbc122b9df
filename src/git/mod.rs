// gitrun: git command automation layer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Git command facade.
//!
//! ```text
//!                 Git (runner)
//!     cwd / env overlay / output tap / Scheduler
//!        |                          |
//!        | GitCommands::execute     | session()
//!        v                          v
//!   fresh ExecutionChain      Session (one ExecutionChain)
//!   per call: independent     calls strictly ordered
//!        \                          /
//!         `------> Scheduler <-----'
//!                 (shared slots)
//! ```
//!
//! ```no_run
//! use gitrun::git::{Git, GitCommands};
//!
//! # async fn demo() -> gitrun::error::GitResult<()> {
//! let git = Git::builder().with_concurrency(2).build();
//! git.set_cwd("/path/to/repo")?;
//!
//! // Independent calls may run in parallel.
//! let (status, tags) = tokio::join!(git.status(&[]), git.tags(&[]));
//! println!("{} tags, clean: {}", tags?.all.len(), status?.is_clean());
//!
//! // A session keeps related calls in order.
//! let session = git.session();
//! let add = session.add(&["README.md"]);
//! let commit = session.commit("docs: readme", &[]);
//! add.await?;
//! commit.await?;
//! # Ok(())
//! # }
//! ```

pub mod commands;
mod runner;
mod session;
pub mod tasks;


pub use commands::{GitCommands, GitFuture};
pub use runner::Git;
pub use session::Session;
pub use tasks::{CleanMode, LogOptions, ResetMode};
