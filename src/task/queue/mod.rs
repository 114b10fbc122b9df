// gitrun: git command automation layer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Per-chain progress tracker.
//!
//! ```text
//! enqueue(id, "commit") --> Pending   name "commit:7", channel gitrun/commit:7
//! mark_attempting(id)   --> Attempting
//! complete(id)          --> removed
//!
//! purge_on_fatal(failed, err)
//!   every other entry --> logged "abandoned", removed, cause remembered
//!   mark_attempting(abandoned id) --> Err(Abandoned { cause })
//! ```

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;

use super::TaskId;
use crate::error::GitError;
use crate::logging::Logger;

/// Bookkeeping failures; none of them should happen in correct use.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum QueueError {
    #[error("task {0} is already queued")]
    Duplicate(TaskId),

    #[error("task {0} is not queued")]
    Unknown(TaskId),

    #[error("abandoned after an earlier task failed: {cause}")]
    Abandoned { cause: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressState {
    Pending,
    Attempting,
}

/// Diagnostic handle for one queued task.
#[derive(Debug, Clone)]
pub struct QueuedProgress {
    id: TaskId,
    name: String,
    logger: Logger,
}

impl QueuedProgress {
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Operation name plus counter, e.g. `commit:7`.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Dedicated log channel for this task.
    #[must_use]
    pub const fn logger(&self) -> &Logger {
        &self.logger
    }
}

#[derive(Debug)]
struct Entry {
    name: String,
    state: ProgressState,
    logger: Logger,
}

#[derive(Debug, Default)]
struct Entries {
    live: BTreeMap<TaskId, Entry>,
    abandoned: BTreeMap<TaskId, String>,
}

/// In-flight and pending tasks of one execution chain.
#[derive(Debug)]
pub struct PendingQueue {
    entries: Mutex<Entries>,
    counter: Arc<AtomicU64>,
    logger: Logger,
}

impl PendingQueue {
    #[must_use]
    pub fn new(logger: Logger) -> Self {
        Self::with_counter(logger, Arc::new(AtomicU64::new(1)))
    }

    /// Draws name suffixes from `counter`, which other queues may share.
    #[must_use]
    pub fn with_counter(logger: Logger, counter: Arc<AtomicU64>) -> Self {
        Self {
            entries: Mutex::new(Entries::default()),
            counter,
            logger,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Entries> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Records a new pending task.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::Duplicate`] if `id` is already tracked.
    pub fn enqueue(&self, id: TaskId, operation: &str) -> Result<QueuedProgress, QueueError> {
        let mut entries = self.lock();
        if entries.live.contains_key(&id) {
            self.logger.error(&format!("task {id} enqueued twice"));
            return Err(QueueError::Duplicate(id));
        }
        let n = self.counter.fetch_add(1, Ordering::Relaxed);
        let name = format!("{operation}:{n}");
        let logger = self.logger.child(&name);
        logger.trace("queued");
        entries.live.insert(
            id,
            Entry {
                name: name.clone(),
                state: ProgressState::Pending,
                logger: logger.clone(),
            },
        );
        Ok(QueuedProgress { id, name, logger })
    }

    /// Moves a task from pending to in progress.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::Abandoned`] if a purge dropped the task, or
    /// [`QueueError::Unknown`] if it was never queued.
    pub fn mark_attempting(&self, id: TaskId) -> Result<(), QueueError> {
        let mut entries = self.lock();
        if let Some(cause) = entries.abandoned.remove(&id) {
            return Err(QueueError::Abandoned { cause });
        }
        match entries.live.get_mut(&id) {
            Some(entry) => {
                entry.state = ProgressState::Attempting;
                entry.logger.trace("attempting");
                Ok(())
            }
            None => {
                self.logger
                    .error(&format!("internal error: task {id} attempted but never queued"));
                Err(QueueError::Unknown(id))
            }
        }
    }

    /// Drops bookkeeping for a settled task.
    pub fn complete(&self, id: TaskId) {
        if let Some(entry) = self.lock().live.remove(&id) {
            entry.logger.trace("completed");
        }
    }

    /// Abandons every task other than `failed`, returning their names.
    pub fn purge_on_fatal(&self, failed: TaskId, err: &GitError) -> Vec<String> {
        let cause = err.to_string();
        let mut entries = self.lock();
        let doomed: Vec<TaskId> = entries
            .live
            .keys()
            .copied()
            .filter(|id| *id != failed)
            .collect();

        let mut names = Vec::with_capacity(doomed.len());
        for id in doomed {
            if let Some(entry) = entries.live.remove(&id) {
                entry.logger.warn(&format!("abandoned: {cause}"));
                names.push(entry.name);
            }
            entries.abandoned.insert(id, cause.clone());
        }
        names
    }

    /// State of a tracked task.
    #[must_use]
    pub fn state(&self, id: TaskId) -> Option<ProgressState> {
        self.lock().live.get(&id).map(|entry| entry.state)
    }

    /// Names of tracked tasks in enqueue order.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.lock().live.values().map(|e| e.name.clone()).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().live.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests;
