// gitrun: git command automation layer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Serialized continuation of tasks.
//!
//! ```text
//! push(task) ----------------------------------------------.
//!   | enqueue (PendingQueue)                                |
//!   | swap tail: prev_done <- tail <- this_done             |
//!   v                                                       |
//! tokio::spawn(attempt)                          returns BoxFuture
//!   await prev_done                                 (JoinHandle)
//!   mark_attempting ---- Abandoned --> QueueFatal
//!   Scheduler::request_slot
//!   Spawner::spawn (cwd/env/tap snapshot)
//!   release slot
//!   Task::settle
//!   Err (not QueueFatal) --> purge others, reset tail
//!   complete, signal this_done
//! ```
//!
//! Tasks of one chain never overlap. Tasks of different chains only contend
//! for scheduler slots. Dropping the returned future does not cancel the
//! task: later tasks on the chain still wait for it to settle.

#[cfg(test)]
mod tests;

use futures_util::future::{self, BoxFuture};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::atomic::AtomicU64;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};
use tokio::sync::oneshot;

use super::queue::{PendingQueue, QueueError, QueuedProgress};
use super::scheduler::Scheduler;
use super::{Task, TaskId};
use crate::core::process::{OutputChunk, SpawnRequest, Spawner};
use crate::error::{GitError, GitResult};
use crate::logging::Logger;

/// Mutable process settings, read once per spawn.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunnerSettings {
    pub cwd: Option<PathBuf>,
    pub env: BTreeMap<String, String>,
}

/// Binary, spawner and settings shared by every chain of one runner.
///
/// Chains built on the same context also share one task-name counter.
pub struct ExecutionContext {
    binary: String,
    spawner: Arc<dyn Spawner>,
    settings: RwLock<RunnerSettings>,
    tap: RwLock<Option<flume::Sender<OutputChunk>>>,
    names: Arc<AtomicU64>,
}

impl std::fmt::Debug for ExecutionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExecutionContext")
            .field("binary", &self.binary)
            .field("settings", &self.settings())
            .finish_non_exhaustive()
    }
}

impl ExecutionContext {
    pub fn new(binary: impl Into<String>, spawner: Arc<dyn Spawner>) -> Self {
        Self {
            binary: binary.into(),
            spawner,
            settings: RwLock::new(RunnerSettings::default()),
            tap: RwLock::new(None),
            names: Arc::new(AtomicU64::new(1)),
        }
    }

    #[must_use]
    pub fn binary(&self) -> &str {
        &self.binary
    }

    /// Copy of the current settings.
    #[must_use]
    pub fn settings(&self) -> RunnerSettings {
        self.settings
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Working directory for processes spawned from now on.
    pub fn set_cwd(&self, cwd: Option<PathBuf>) {
        self.settings
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .cwd = cwd;
    }

    /// Replaces the environment overlay for processes spawned from now on.
    pub fn set_env(&self, env: BTreeMap<String, String>) {
        self.settings
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .env = env;
    }

    /// Adds or replaces one overlay variable.
    pub fn insert_env(&self, key: impl Into<String>, value: impl Into<String>) {
        self.settings
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .env
            .insert(key.into(), value.into());
    }

    /// Routes raw output chunks of later spawns to `tap`.
    pub fn set_tap(&self, tap: Option<flume::Sender<OutputChunk>>) {
        *self.tap.write().unwrap_or_else(PoisonError::into_inner) = tap;
    }

    fn request(&self, task: TaskId, progress: &QueuedProgress, args: &[String]) -> SpawnRequest {
        let RunnerSettings { cwd, env } = self.settings();
        SpawnRequest {
            task,
            name: progress.name().to_string(),
            program: self.binary.clone(),
            args: args.to_vec(),
            cwd,
            env,
            tap: self
                .tap
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .clone(),
            logger: progress.logger().clone(),
        }
    }
}

struct ChainInner {
    scheduler: Arc<Scheduler>,
    context: Arc<ExecutionContext>,
    queue: PendingQueue,
    tail: Mutex<Option<oneshot::Receiver<()>>>,
    logger: Logger,
}

/// Runs pushed tasks one after another.
///
/// Cloning yields another handle to the same chain.
#[derive(Clone)]
pub struct ExecutionChain {
    inner: Arc<ChainInner>,
}

impl std::fmt::Debug for ExecutionChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExecutionChain")
            .field("logger", &self.inner.logger)
            .field("pending", &self.inner.queue.len())
            .finish_non_exhaustive()
    }
}

impl ExecutionChain {
    #[must_use]
    pub fn new(scheduler: Arc<Scheduler>, context: Arc<ExecutionContext>, logger: Logger) -> Self {
        let queue = PendingQueue::with_counter(logger.clone(), Arc::clone(&context.names));
        Self {
            inner: Arc::new(ChainInner {
                scheduler,
                context,
                queue,
                tail: Mutex::new(None),
                logger,
            }),
        }
    }

    #[must_use]
    pub fn logger(&self) -> &Logger {
        &self.inner.logger
    }

    #[must_use]
    pub fn context(&self) -> &Arc<ExecutionContext> {
        &self.inner.context
    }

    #[must_use]
    pub fn scheduler(&self) -> &Arc<Scheduler> {
        &self.inner.scheduler
    }

    /// Names of tasks that are queued or running on this chain.
    #[must_use]
    pub fn pending(&self) -> Vec<String> {
        self.inner.queue.names()
    }

    /// Appends `task` to the chain.
    ///
    /// The task is queued immediately, in call order, and runs on the Tokio
    /// runtime whether or not the returned future is polled.
    ///
    /// # Panics
    ///
    /// Must be called from within a Tokio runtime. A panic inside a parser or
    /// hook is resumed on the caller when the future is awaited.
    pub fn push<T>(&self, task: Task<T>) -> BoxFuture<'static, GitResult<T>>
    where
        T: Send + 'static,
    {
        let summary = task.summary().with_program(self.inner.context.binary());
        let (done_tx, done_rx) = oneshot::channel();

        let (progress, previous) = {
            let mut tail = self.inner.tail();
            match self.inner.queue.enqueue(task.id(), task.name()) {
                Ok(progress) => (progress, tail.replace(done_rx)),
                Err(err) => {
                    return Box::pin(future::ready(Err(GitError::queue_fatal(
                        summary,
                        err.to_string(),
                    ))));
                }
            }
        };

        let inner = Arc::clone(&self.inner);
        let handle = tokio::spawn(async move {
            if let Some(previous) = previous {
                // Err only means the predecessor's sender is gone, which is
                // also how it signals completion.
                let _ = previous.await;
            }
            let result = inner
                .attempt(&task, &progress)
                .await
                .map_err(|err| err.with_program(inner.context.binary()));
            if let Err(err) = &result
                && !matches!(err, GitError::QueueFatal(_))
            {
                inner.fail(task.id(), err, &progress);
            }
            inner.queue.complete(task.id());
            drop(done_tx);
            result
        });

        Box::pin(async move {
            match handle.await {
                Ok(result) => result,
                Err(err) if err.is_panic() => std::panic::resume_unwind(err.into_panic()),
                Err(err) => Err(GitError::queue_fatal(summary, err.to_string())),
            }
        })
    }
}

impl ChainInner {
    fn tail(&self) -> MutexGuard<'_, Option<oneshot::Receiver<()>>> {
        self.tail.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn attempt<T>(&self, task: &Task<T>, progress: &QueuedProgress) -> GitResult<T> {
        let logger = progress.logger();

        if let Err(err) = self.queue.mark_attempting(task.id()) {
            let cause = match err {
                QueueError::Abandoned { cause } => cause,
                other => other.to_string(),
            };
            return Err(GitError::queue_fatal(task.summary(), cause));
        }

        if let Some(message) = task.configuration_message() {
            logger.warn(&format!("rejected before spawn: {message}"));
            return Err(GitError::configuration(message).with_task(&task.summary()));
        }

        let slot = self.scheduler.request_slot().await;
        let request = self
            .context
            .request(task.id(), progress, task.commands());
        logger.debug(&format!(
            "running {}",
            task.summary().with_program(self.context.binary())
        ));

        let raw = self.context.spawner.spawn(request).await;
        slot.release();

        let raw = raw.map_err(|err| {
            logger.error(&format!("spawn failed: {err}"));
            GitError::spawn(task.summary(), err)
        })?;
        logger.trace(&format!("exited with {:?}", raw.exit_code()));

        task.settle(raw)
    }

    fn fail(&self, failed: TaskId, err: &GitError, progress: &QueuedProgress) {
        progress
            .logger()
            .debug(&format!("failed ({}): {err}", err.kind()));
        let mut tail = self.tail();
        let purged = self.queue.purge_on_fatal(failed, err);
        *tail = None;
        if !purged.is_empty() {
            self.logger.warn(&format!(
                "{} failed, abandoning {}",
                progress.name(),
                purged.join(", ")
            ));
        }
    }
}
