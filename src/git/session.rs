// gitrun: git command automation layer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::commands::{GitCommands, GitFuture};
use crate::logging::Logger;
use crate::task::Task;
use crate::task::chain::ExecutionChain;

/// Ordered sequence of operations sharing one chain.
///
/// Each call is queued when the method is invoked, so
/// `tokio::join!(s.add(..), s.commit(..))` still adds before committing.
/// When a call fails, calls queued behind it resolve with
/// [`GitError::QueueFatal`](crate::error::GitError::QueueFatal); calls made
/// afterwards run normally.
#[derive(Debug, Clone)]
pub struct Session {
    chain: ExecutionChain,
}

impl Session {
    pub(super) const fn new(chain: ExecutionChain) -> Self {
        Self { chain }
    }

    /// Diagnostic names of queued and running calls.
    #[must_use]
    pub fn pending(&self) -> Vec<String> {
        self.chain.pending()
    }

    #[must_use]
    pub fn logger(&self) -> &Logger {
        self.chain.logger()
    }
}

impl GitCommands for Session {
    fn execute<T: Send + 'static>(&self, task: Task<T>) -> GitFuture<T> {
        self.chain.push(task)
    }
}
