// gitrun: git command automation layer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Global admission gate.
//!
//! ```text
//! request_slot() --> Semaphore::acquire_owned (fair: FIFO waiters)
//!                      |
//!                      v
//!                ScheduledSlot { id, permit }
//!                      |
//!                  drop / release()  --> next waiter promoted
//! ```
//!
//! `running() <= concurrency()` holds at all times. The gate has no failure
//! mode of its own.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

use crate::logging::Logger;

/// Default number of concurrently running processes.
pub const DEFAULT_CONCURRENCY: usize = 5;

/// Bounds the number of concurrently running processes across all chains
/// that share it.
#[derive(Debug)]
pub struct Scheduler {
    semaphore: Arc<Semaphore>,
    concurrency: usize,
    next_id: AtomicU64,
    running: Arc<AtomicUsize>,
    logger: Logger,
}

impl Scheduler {
    /// Creates a scheduler; a concurrency of 0 is raised to 1.
    #[must_use]
    pub fn new(concurrency: usize, logger: Logger) -> Self {
        let concurrency = concurrency.max(1);
        Self {
            semaphore: Arc::new(Semaphore::new(concurrency)),
            concurrency,
            next_id: AtomicU64::new(1),
            running: Arc::new(AtomicUsize::new(0)),
            logger,
        }
    }

    /// Waits for a slot; waiters are granted strictly in arrival order.
    pub async fn request_slot(&self) -> ScheduledSlot {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.logger.trace(&format!(
            "slot {id} requested ({} of {} running)",
            self.running(),
            self.concurrency
        ));

        let permit = Arc::clone(&self.semaphore)
            .acquire_owned()
            .await
            .unwrap_or_else(|_| unreachable!("scheduler semaphore is never closed"));

        let running = self.running.fetch_add(1, Ordering::SeqCst) + 1;
        self.logger
            .trace(&format!("slot {id} granted ({running} of {} running)", self.concurrency));

        ScheduledSlot {
            id,
            _permit: permit,
            running: Arc::clone(&self.running),
            logger: self.logger.clone(),
        }
    }

    /// Slots currently granted.
    #[must_use]
    pub fn running(&self) -> usize {
        self.running.load(Ordering::SeqCst)
    }

    #[must_use]
    pub const fn concurrency(&self) -> usize {
        self.concurrency
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new(DEFAULT_CONCURRENCY, Logger::default().child("scheduler"))
    }
}

/// Permission to run one process; released exactly once, on drop.
#[derive(Debug)]
#[must_use = "the slot is released as soon as it is dropped"]
pub struct ScheduledSlot {
    id: u64,
    _permit: OwnedSemaphorePermit,
    running: Arc<AtomicUsize>,
    logger: Logger,
}

impl ScheduledSlot {
    #[must_use]
    pub const fn id(&self) -> u64 {
        self.id
    }

    /// Releases the slot now rather than at end of scope.
    pub fn release(self) {
        drop(self);
    }
}

impl Drop for ScheduledSlot {
    fn drop(&mut self) {
        self.running.fetch_sub(1, Ordering::SeqCst);
        self.logger.trace(&format!("slot {} released", self.id));
    }
}
