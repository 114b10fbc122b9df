// gitrun: git command automation layer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Output streaming and exit reconciliation.
//!
//! ```text
//! stdout reader --.                      ,--> flume tap (observe only)
//!                 +--> mpsc (stream, bytes)
//! stderr reader --'        |
//!                          v
//! run_child(): select { chunk | child.wait() | grace deadline }
//!   exit known + streams closed       --> settle
//!   exit known + grace elapsed first  --> warn, settle with what arrived
//! ```
//!
//! Exit and stream closure are separate events: a grandchild that inherited
//! the pipes can keep them open long after git itself has exited.

use tokio::io::AsyncReadExt;
use tokio::process::Child;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use super::builder::ProcessBuilder;
use super::{OutputChunk, OutputStream, RawProcessResult};
use crate::logging::Logger;
use crate::task::TaskId;

const READ_BUFFER: usize = 8 * 1024;

type ChunkSender = mpsc::UnboundedSender<(OutputStream, Vec<u8>)>;

/// Where a reader forwards the bytes it reads.
struct ReaderSink {
    stream: OutputStream,
    tx: ChunkSender,
    tap: Option<(flume::Sender<OutputChunk>, TaskId)>,
    name: String,
    logger: Logger,
}

fn spawn_reader<R>(reader: Option<R>, sink: ReaderSink) -> Option<JoinHandle<()>>
where
    R: tokio::io::AsyncRead + Unpin + Send + 'static,
{
    reader.map(|reader| tokio::spawn(read_stream(reader, sink)))
}

async fn read_stream<R>(mut reader: R, sink: ReaderSink)
where
    R: tokio::io::AsyncRead + Unpin,
{
    let mut buf = vec![0u8; READ_BUFFER];
    loop {
        match reader.read(&mut buf).await {
            Ok(0) => break,
            Ok(n) => {
                let bytes = buf[..n].to_vec();
                if let Some((tap, task)) = &sink.tap {
                    let _ = tap.send(OutputChunk {
                        task: *task,
                        name: sink.name.clone(),
                        stream: sink.stream,
                        bytes: bytes.clone(),
                    });
                }
                if sink.tx.send((sink.stream, bytes)).is_err() {
                    break;
                }
            }
            Err(e) => {
                sink.logger
                    .warn(&format!("error reading {:?}: {e}", sink.stream));
                break;
            }
        }
    }
}

impl ProcessBuilder {
    /// Collects output until the exit code is known and both pipes have
    /// closed, or until the grace period after exit has elapsed.
    pub(super) async fn run_child(
        &self,
        name: &str,
        child: &mut Child,
    ) -> std::io::Result<RawProcessResult> {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let tap = self
            .output_tap()
            .cloned()
            .zip(self.task_id());
        let sink = |stream| ReaderSink {
            stream,
            tx: tx.clone(),
            tap: tap.clone(),
            name: name.to_string(),
            logger: self.log().clone(),
        };

        let stdout = spawn_reader(child.stdout.take(), sink(OutputStream::Stdout));
        let stderr = spawn_reader(child.stderr.take(), sink(OutputStream::Stderr));
        drop(tx);

        let mut result = RawProcessResult::default();
        let mut exit_code: Option<Option<i32>> = None;
        let mut streams_closed = false;
        let mut deadline: Option<Instant> = None;

        while exit_code.is_none() || !streams_closed {
            tokio::select! {
                chunk = rx.recv(), if !streams_closed => match chunk {
                    Some((stream, bytes)) => result.push(stream, bytes),
                    None => streams_closed = true,
                },
                status = child.wait(), if exit_code.is_none() => {
                    exit_code = Some(status?.code());
                    deadline = Some(Instant::now() + self.grace());
                },
                () = tokio::time::sleep_until(deadline.unwrap_or_else(Instant::now)),
                    if deadline.is_some() && !streams_closed =>
                {
                    self.log().warn(&format!(
                        "{name} exited but its output streams stayed open for {:?}; settling anyway",
                        self.grace()
                    ));
                    break;
                }
            }
        }

        // Readers still blocked on an inherited pipe are left to finish on
        // their own; everything they read from now on is discarded.
        if streams_closed {
            for handle in [stdout, stderr].into_iter().flatten() {
                let _ = handle.await;
            }
        }

        result.exit_code = exit_code.flatten();
        Ok(result)
    }
}
