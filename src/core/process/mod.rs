// gitrun: git command automation layer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Async process spawning behind the [`Spawner`] seam.
//!
//! ```text
//! SpawnRequest { program, args, cwd, env, tap }
//!      |
//!      v
//! ProcessSpawner --> ProcessBuilder::run()
//!                      tokio::process::Command (stdin null, pipes)
//!                      stdout/stderr reader tasks --> mpsc (+ flume tap)
//!                      wait exit  |  wait stream close
//!                      grace period once exit is known
//!      |
//!      v
//! RawProcessResult { exit_code, stdout_chunks, stderr_chunks }
//! ```
//!
//! Tests substitute their own [`Spawner`] to script results without
//! touching the operating system.

pub mod builder;
mod io;
mod runner;
#[cfg(test)]
mod tests;

use futures_util::future::BoxFuture;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use crate::logging::Logger;
use crate::task::TaskId;

pub use builder::ProcessBuilder;

/// Grace period between process exit and forced settlement.
pub const DEFAULT_SETTLE_GRACE: Duration = Duration::from_millis(50);

/// Which pipe a chunk came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputStream {
    Stdout,
    Stderr,
}

/// A raw chunk of process output, delivered to the output tap as it arrives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputChunk {
    pub task: TaskId,
    pub name: String,
    pub stream: OutputStream,
    pub bytes: Vec<u8>,
}

/// Exit code and ordered output chunks of a finished process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawProcessResult {
    exit_code: Option<i32>,
    stdout_chunks: Vec<Vec<u8>>,
    stderr_chunks: Vec<Vec<u8>>,
}

impl RawProcessResult {
    #[must_use]
    pub const fn new(
        exit_code: Option<i32>,
        stdout_chunks: Vec<Vec<u8>>,
        stderr_chunks: Vec<Vec<u8>>,
    ) -> Self {
        Self {
            exit_code,
            stdout_chunks,
            stderr_chunks,
        }
    }

    /// Single-chunk result, convenient for scripted spawners.
    #[must_use]
    pub fn from_output(exit_code: Option<i32>, stdout: &str, stderr: &str) -> Self {
        let chunk = |text: &str| {
            if text.is_empty() {
                Vec::new()
            } else {
                vec![text.as_bytes().to_vec()]
            }
        };
        Self::new(exit_code, chunk(stdout), chunk(stderr))
    }

    #[must_use]
    pub const fn exit_code(&self) -> Option<i32> {
        self.exit_code
    }

    #[must_use]
    pub fn stdout_chunks(&self) -> &[Vec<u8>] {
        &self.stdout_chunks
    }

    #[must_use]
    pub fn stderr_chunks(&self) -> &[Vec<u8>] {
        &self.stderr_chunks
    }

    pub(crate) fn push(&mut self, stream: OutputStream, bytes: Vec<u8>) {
        match stream {
            OutputStream::Stdout => self.stdout_chunks.push(bytes),
            OutputStream::Stderr => self.stderr_chunks.push(bytes),
        }
    }

    /// Concatenates the chunks into `(stdout, stderr)`.
    #[must_use]
    pub fn into_buffers(self) -> (Vec<u8>, Vec<u8>) {
        (self.stdout_chunks.concat(), self.stderr_chunks.concat())
    }
}

/// Everything needed to start one process.
#[derive(Debug, Clone)]
pub struct SpawnRequest {
    pub task: TaskId,
    /// Diagnostic name, e.g. `commit:3`.
    pub name: String,
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
    /// Overlay applied on top of the inherited environment.
    pub env: BTreeMap<String, String>,
    pub tap: Option<flume::Sender<OutputChunk>>,
    pub logger: Logger,
}

/// Process-layer seam used by the execution chain.
pub trait Spawner: Send + Sync {
    /// Starts the process and resolves once it has settled.
    ///
    /// An `Err` means the process could not be started or waited on.
    fn spawn(&self, request: SpawnRequest) -> BoxFuture<'static, std::io::Result<RawProcessResult>>;
}

/// [`Spawner`] backed by `tokio::process`.
#[derive(Debug, Clone, Copy)]
pub struct ProcessSpawner {
    settle_grace: Duration,
}

impl ProcessSpawner {
    #[must_use]
    pub const fn new(settle_grace: Duration) -> Self {
        Self { settle_grace }
    }

    #[must_use]
    pub const fn settle_grace(&self) -> Duration {
        self.settle_grace
    }
}

impl Default for ProcessSpawner {
    fn default() -> Self {
        Self::new(DEFAULT_SETTLE_GRACE)
    }
}

impl Spawner for ProcessSpawner {
    fn spawn(&self, request: SpawnRequest) -> BoxFuture<'static, std::io::Result<RawProcessResult>> {
        let builder = ProcessBuilder::from_request(request).settle_grace(self.settle_grace);
        Box::pin(builder.run())
    }
}
