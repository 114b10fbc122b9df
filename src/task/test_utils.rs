// gitrun: git command automation layer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Shared test utilities: log capture and a scripted [`Spawner`].

use futures_util::future::BoxFuture;
use std::collections::BTreeMap;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::time::Instant;
use tracing::Level;
use tracing_subscriber::fmt::MakeWriter;

use super::TaskId;
use crate::core::process::{OutputChunk, OutputStream, RawProcessResult, SpawnRequest, Spawner};

/// Fresh task id for tests that drive the queue or process layer directly.
pub(crate) fn task_id() -> TaskId {
    TaskId::next()
}

#[derive(Clone)]
struct BufferWriter {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl Write for BufferWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer
            .lock()
            .map_err(|_| io::Error::other("buffer poisoned"))?
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[derive(Clone)]
struct BufferMakeWriter {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl<'a> MakeWriter<'a> for BufferMakeWriter {
    type Writer = BufferWriter;

    fn make_writer(&'a self) -> Self::Writer {
        BufferWriter {
            buffer: self.buffer.clone(),
        }
    }
}

/// Runs an async closure while capturing tracing output of the current thread.
///
/// Use with the default current-thread test runtime so spawned tasks log into
/// the same subscriber.
pub(crate) async fn capture_logs<F, Fut>(f: F) -> String
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = ()>,
{
    let buffer = Arc::new(Mutex::new(Vec::new()));
    let subscriber = tracing_subscriber::fmt::Subscriber::builder()
        .with_writer(BufferMakeWriter {
            buffer: buffer.clone(),
        })
        .with_max_level(Level::TRACE)
        .with_ansi(false)
        .with_target(false)
        .with_level(false)
        .finish();

    let _guard = tracing::subscriber::set_default(subscriber);
    f().await;

    let guard = buffer.lock().unwrap_or_else(PoisonError::into_inner);
    String::from_utf8_lossy(&guard).to_string()
}

/// What a scripted process does.
#[derive(Debug, Clone)]
pub(crate) enum Outcome {
    Exit(RawProcessResult),
    SpawnError(io::ErrorKind),
}

/// Scripted behaviour of one fake process.
#[derive(Debug, Clone)]
pub(crate) struct Scripted {
    pub delay: Duration,
    pub outcome: Outcome,
}

impl Scripted {
    pub(crate) fn exit(code: i32, stdout: &str, stderr: &str) -> Self {
        Self {
            delay: Duration::ZERO,
            outcome: Outcome::Exit(RawProcessResult::from_output(Some(code), stdout, stderr)),
        }
    }

    pub(crate) fn ok(stdout: &str) -> Self {
        Self::exit(0, stdout, "")
    }

    pub(crate) const fn spawn_error(kind: io::ErrorKind) -> Self {
        Self {
            delay: Duration::ZERO,
            outcome: Outcome::SpawnError(kind),
        }
    }

    pub(crate) const fn after(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// One call observed by [`FakeSpawner`].
#[derive(Debug, Clone)]
pub(crate) struct SpawnRecord {
    pub name: String,
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
    pub env: BTreeMap<String, String>,
    pub started: Instant,
    pub finished: Option<Instant>,
}

#[derive(Debug, Default)]
struct FakeState {
    records: Vec<SpawnRecord>,
    running: usize,
    peak: usize,
}

type Script = dyn Fn(&SpawnRequest) -> Scripted + Send + Sync;

/// [`Spawner`] that answers from a script instead of starting processes.
#[derive(Clone)]
pub(crate) struct FakeSpawner {
    script: Arc<Script>,
    state: Arc<Mutex<FakeState>>,
}

impl FakeSpawner {
    pub(crate) fn new<F>(script: F) -> Self
    where
        F: Fn(&SpawnRequest) -> Scripted + Send + Sync + 'static,
    {
        Self {
            script: Arc::new(script),
            state: Arc::default(),
        }
    }

    /// Every process succeeds with empty output.
    pub(crate) fn succeeding() -> Self {
        Self::new(|_| Scripted::ok(""))
    }

    fn state(&self) -> std::sync::MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Calls in spawn order.
    pub(crate) fn spawned(&self) -> Vec<SpawnRecord> {
        self.state().records.clone()
    }

    /// First argument of every call, in spawn order.
    pub(crate) fn subcommands(&self) -> Vec<String> {
        self.state()
            .records
            .iter()
            .map(|r| r.args.first().cloned().unwrap_or_default())
            .collect()
    }

    /// Highest number of simultaneously running fake processes.
    pub(crate) fn peak(&self) -> usize {
        self.state().peak
    }
}

impl Spawner for FakeSpawner {
    fn spawn(&self, request: SpawnRequest) -> BoxFuture<'static, io::Result<RawProcessResult>> {
        let scripted = (self.script)(&request);
        let state = Arc::clone(&self.state);

        Box::pin(async move {
            let index = {
                let mut state = state.lock().unwrap_or_else(PoisonError::into_inner);
                if let Outcome::SpawnError(kind) = scripted.outcome {
                    return Err(io::Error::new(kind, format!("cannot start {}", request.program)));
                }
                state.running += 1;
                state.peak = state.peak.max(state.running);
                state.records.push(SpawnRecord {
                    name: request.name.clone(),
                    program: request.program.clone(),
                    args: request.args.clone(),
                    cwd: request.cwd.clone(),
                    env: request.env.clone(),
                    started: Instant::now(),
                    finished: None,
                });
                state.records.len() - 1
            };

            if !scripted.delay.is_zero() {
                tokio::time::sleep(scripted.delay).await;
            }

            let mut state = state.lock().unwrap_or_else(PoisonError::into_inner);
            state.running -= 1;
            state.records[index].finished = Some(Instant::now());
            drop(state);

            let Outcome::Exit(result) = scripted.outcome else {
                unreachable!("spawn errors return before running")
            };
            if let Some(tap) = &request.tap {
                for bytes in result.stdout_chunks() {
                    let _ = tap.send(OutputChunk {
                        task: request.task,
                        name: request.name.clone(),
                        stream: OutputStream::Stdout,
                        bytes: bytes.clone(),
                    });
                }
            }
            Ok(result)
        })
    }
}
