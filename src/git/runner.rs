// gitrun: git command automation layer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use bon::bon;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use super::commands::{GitCommands, GitFuture};
use super::session::Session;
use crate::config::RunnerConfig;
use crate::core::process::{DEFAULT_SETTLE_GRACE, OutputChunk, ProcessSpawner, Spawner};
use crate::error::{GitError, GitResult};
use crate::logging::Logger;
use crate::task::Task;
use crate::task::chain::{ExecutionChain, ExecutionContext};
use crate::task::scheduler::{DEFAULT_CONCURRENCY, Scheduler};

/// Top-level runner.
///
/// Owns the shared scheduler and the mutable process settings. Each
/// operation called directly on `Git` runs on its own chain; use
/// [`Git::session`] for ordered sequences. Cloning yields another handle to
/// the same runner.
///
/// All operations spawn onto the current Tokio runtime.
#[derive(Debug, Clone)]
pub struct Git {
    scheduler: Arc<Scheduler>,
    context: Arc<ExecutionContext>,
    logger: Logger,
    sessions: Arc<AtomicU64>,
}

#[bon]
impl Git {
    #[builder]
    pub fn new(
        #[builder(setters(name = with_binary), into, default = "git".to_string())] binary: String,
        #[builder(setters(name = with_concurrency), default = DEFAULT_CONCURRENCY)]
        concurrency: usize,
        #[builder(setters(name = with_cwd), into)] cwd: Option<PathBuf>,
        #[builder(setters(name = with_env), default)] env: BTreeMap<String, String>,
        #[builder(setters(name = with_settle_grace), default = DEFAULT_SETTLE_GRACE)]
        settle_grace: Duration,
        #[builder(setters(name = with_spawner))] spawner: Option<Arc<dyn Spawner>>,
        #[builder(setters(name = with_logger), default)] logger: Logger,
    ) -> Self {
        let spawner = spawner.unwrap_or_else(|| Arc::new(ProcessSpawner::new(settle_grace)));
        let context = Arc::new(ExecutionContext::new(binary, spawner));
        context.set_cwd(cwd);
        context.set_env(env);

        let scheduler = Arc::new(Scheduler::new(concurrency, logger.child("scheduler")));
        logger.debug(&format!(
            "runner ready: {} with {} slot(s)",
            context.binary(),
            scheduler.concurrency()
        ));

        Self {
            scheduler,
            context,
            logger,
            sessions: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Runner configured from the `[runner]` section.
    #[must_use]
    pub fn from_config(config: &RunnerConfig) -> Self {
        Self::builder()
            .with_binary(config.binary.clone())
            .with_concurrency(config.concurrency)
            .maybe_with_cwd(config.base_dir.clone())
            .with_env(config.env.clone())
            .with_settle_grace(config.settle_grace())
            .build()
    }

    /// A new chain whose operations run strictly in call order.
    #[must_use]
    pub fn session(&self) -> Session {
        let n = self.sessions.fetch_add(1, Ordering::Relaxed);
        let logger = self.logger.child(&format!("session-{n}"));
        Session::new(ExecutionChain::new(
            Arc::clone(&self.scheduler),
            Arc::clone(&self.context),
            logger,
        ))
    }

    /// Working directory for processes spawned from now on.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `dir` is not an existing directory.
    pub fn set_cwd(&self, dir: impl AsRef<Path>) -> GitResult<()> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(GitError::configuration(format!(
                "working directory does not exist: {}",
                dir.display()
            )));
        }
        self.logger.debug(&format!("cwd set to {}", dir.display()));
        self.context.set_cwd(Some(dir.to_path_buf()));
        Ok(())
    }

    /// Spawn later processes in the inherited working directory.
    pub fn clear_cwd(&self) {
        self.context.set_cwd(None);
    }

    #[must_use]
    pub fn cwd(&self) -> Option<PathBuf> {
        self.context.settings().cwd
    }

    /// Adds one variable to the environment overlay.
    pub fn set_env(&self, key: impl Into<String>, value: impl Into<String>) {
        self.context.insert_env(key, value);
    }

    /// Replaces the whole environment overlay.
    pub fn env_overlay(&self, env: BTreeMap<String, String>) {
        self.context.set_env(env);
    }

    #[must_use]
    pub fn env(&self) -> BTreeMap<String, String> {
        self.context.settings().env
    }

    /// Streams raw output chunks of every process spawned from now on.
    ///
    /// Replaces any previous observer. Chunks are copies; parsing is unaffected.
    #[must_use]
    pub fn observe_output(&self) -> flume::Receiver<OutputChunk> {
        let (tx, rx) = flume::unbounded();
        self.context.set_tap(Some(tx));
        rx
    }

    pub fn stop_observing(&self) {
        self.context.set_tap(None);
    }

    #[must_use]
    pub fn scheduler(&self) -> &Arc<Scheduler> {
        &self.scheduler
    }

    #[must_use]
    pub fn binary(&self) -> &str {
        self.context.binary()
    }
}

impl Default for Git {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl GitCommands for Git {
    fn execute<T: Send + 'static>(&self, task: Task<T>) -> GitFuture<T> {
        ExecutionChain::new(
            Arc::clone(&self.scheduler),
            Arc::clone(&self.context),
            self.logger.clone(),
        )
        .push(task)
    }
}
