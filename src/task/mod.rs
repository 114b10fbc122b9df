// gitrun: git command automation layer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Task description and execution machinery.
//!
//! # Architecture
//!
//! ```text
//! Task<T> (immutable: argv, format, parser, on_error, flags)
//!      |
//!      v
//! ExecutionChain::push ----> PendingQueue (bookkeeping, purge)
//!      |
//!      v  (after previous task on the chain settles)
//! Scheduler::request_slot    (FIFO, <= concurrency)
//!      |
//!      v
//! Spawner::spawn ----> RawProcessResult
//!      |
//!      v
//! Task::settle ----> on_error | NonZeroExit | parser
//! ```
//!
//! # Key Types
//!
//! | Type | Purpose |
//! |------|---------|
//! | [`Task`] | One operation: argv plus how to interpret its output |
//! | [`OutputParser`] | Per-family parser selected when the task is built |
//! | [`OnError`] | Optional hook that can neutralize a non-zero exit |
//! | [`TaskOutput`] | Buffered streams and exit code handed to parsers |
//! | [`scheduler::Scheduler`] | Global admission gate |
//! | [`queue::PendingQueue`] | Per-chain progress tracker |
//! | [`chain::ExecutionChain`] | Serialized continuation of tasks |
//!
//! # Result assembly
//!
//! 1. Non-zero exit with stderr and an `on_error` hook: the hook decides.
//! 2. Non-zero exit with stderr and no hook: [`GitError::NonZeroExit`].
//! 3. `CONCAT_STDERR`: stderr bytes are appended to stdout.
//! 4. Otherwise the parser runs; it may raise a classified error itself.

pub mod chain;
pub mod queue;
pub mod scheduler;

#[cfg(test)]
pub(crate) mod test_utils;

use bitflags::bitflags;
use std::borrow::Cow;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::core::process::RawProcessResult;
use crate::error::{GitError, GitResult, TaskSummary};
use crate::utility::encoding::{Encoding, bytes_to_utf8};

static NEXT_TASK_ID: AtomicU64 = AtomicU64::new(1);

/// Process-wide identity of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskId(u64);

impl TaskId {
    fn next() -> Self {
        Self(NEXT_TASK_ID.fetch_add(1, Ordering::Relaxed))
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Expected encoding of the process output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Text decoded with the given encoding.
    Text(Encoding),
    /// Raw bytes, never decoded.
    Binary,
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self::Text(Encoding::Utf8)
    }
}

bitflags! {
    /// Flags controlling result assembly.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct TaskFlags: u8 {
        /// Append stderr to stdout before parsing.
        const CONCAT_STDERR = 0x01;
    }
}

/// Buffered output of a finished process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskOutput {
    exit_code: Option<i32>,
    stdout: Vec<u8>,
    stderr: Vec<u8>,
    encoding: Encoding,
}

impl TaskOutput {
    #[must_use]
    pub const fn new(
        exit_code: Option<i32>,
        stdout: Vec<u8>,
        stderr: Vec<u8>,
        encoding: Encoding,
    ) -> Self {
        Self {
            exit_code,
            stdout,
            stderr,
            encoding,
        }
    }

    /// Text output with a zero exit code; handy for exercising parsers.
    #[must_use]
    pub fn text(stdout: &str, stderr: &str) -> Self {
        Self::new(
            Some(0),
            stdout.as_bytes().to_vec(),
            stderr.as_bytes().to_vec(),
            Encoding::Utf8,
        )
    }

    /// Exit code, `None` if the process was terminated by a signal.
    #[must_use]
    pub const fn exit_code(&self) -> Option<i32> {
        self.exit_code
    }

    /// Returns true if the process exited with code 0.
    #[must_use]
    pub const fn success(&self) -> bool {
        matches!(self.exit_code, Some(0))
    }

    #[must_use]
    pub fn stdout(&self) -> &[u8] {
        &self.stdout
    }

    #[must_use]
    pub fn stderr(&self) -> &[u8] {
        &self.stderr
    }

    #[must_use]
    pub fn stdout_text(&self) -> Cow<'_, str> {
        bytes_to_utf8(self.encoding, &self.stdout)
    }

    #[must_use]
    pub fn stderr_text(&self) -> Cow<'_, str> {
        bytes_to_utf8(self.encoding, &self.stderr)
    }

    /// Stdout followed by stderr, for hooks on tasks that interleave both.
    #[must_use]
    pub fn combined_text(&self) -> String {
        let mut text = self.stdout_text().into_owned();
        if !self.stderr.is_empty() {
            if !text.is_empty() && !text.ends_with('\n') {
                text.push('\n');
            }
            text.push_str(&self.stderr_text());
        }
        text
    }
}

/// Converts process output into a typed result.
///
/// Implemented once per operation family in [`crate::parsers`]; the parser is
/// chosen when the [`Task`] is built, never at execution time.
pub trait OutputParser: Send + Sync {
    type Output;

    /// Parses the buffered output.
    ///
    /// # Errors
    ///
    /// Returns a classified error (typically [`GitError::ParsedFailure`]) when
    /// the output describes a failed operation.
    fn parse(&self, output: &TaskOutput) -> GitResult<Self::Output>;
}

/// Adapts a closure into an [`OutputParser`].
pub struct FnParser<F>(pub F);

impl<F, T> OutputParser for FnParser<F>
where
    F: Fn(&TaskOutput) -> GitResult<T> + Send + Sync,
{
    type Output = T;

    fn parse(&self, output: &TaskOutput) -> GitResult<T> {
        (self.0)(output)
    }
}

/// Decision of an [`OnError`] hook.
#[derive(Debug)]
pub enum ErrorResolution<T> {
    /// The exit code is a known benign condition; use this result.
    Succeed(T),
    /// The failure was recognized and classified.
    Fail(GitError),
    /// Not recognized; fall back to [`GitError::NonZeroExit`].
    Reject,
}

/// Hook invoked on a non-zero exit with stderr output.
pub trait OnError<T>: Send + Sync {
    fn on_error(&self, output: &TaskOutput) -> ErrorResolution<T>;
}

impl<T, F> OnError<T> for F
where
    F: Fn(&TaskOutput) -> ErrorResolution<T> + Send + Sync,
{
    fn on_error(&self, output: &TaskOutput) -> ErrorResolution<T> {
        self(output)
    }
}

/// Process invocation half of a [`Task`].
pub(crate) struct CommandSpec<T> {
    commands: Vec<String>,
    format: OutputFormat,
    parser: Box<dyn OutputParser<Output = T>>,
    on_error: Option<Box<dyn OnError<T>>>,
    flags: TaskFlags,
}

pub(crate) enum TaskKind<T> {
    Command(CommandSpec<T>),
    /// Argument validation failed; nothing is spawned.
    Configuration(String),
}

/// Immutable description of one operation.
///
/// Built by the command facade and consumed exactly once by an
/// [`chain::ExecutionChain`].
pub struct Task<T> {
    id: TaskId,
    name: &'static str,
    kind: TaskKind<T>,
}

impl<T> fmt::Debug for Task<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("Task");
        s.field("id", &self.id).field("name", &self.name);
        match &self.kind {
            TaskKind::Command(spec) => s
                .field("commands", &spec.commands)
                .field("format", &spec.format)
                .field("flags", &spec.flags)
                .field("on_error", &spec.on_error.is_some()),
            TaskKind::Configuration(message) => s.field("configuration_error", message),
        };
        s.finish()
    }
}

impl<T> Task<T> {
    /// Creates a text task with the given parser.
    pub fn command<P>(name: &'static str, commands: Vec<String>, parser: P) -> Self
    where
        P: OutputParser<Output = T> + 'static,
    {
        Self {
            id: TaskId::next(),
            name,
            kind: TaskKind::Command(CommandSpec {
                commands,
                format: OutputFormat::default(),
                parser: Box::new(parser),
                on_error: None,
                flags: TaskFlags::empty(),
            }),
        }
    }

    /// Creates a task that fails with a configuration error when run.
    pub fn configuration_error(name: &'static str, message: impl Into<String>) -> Self {
        Self {
            id: TaskId::next(),
            name,
            kind: TaskKind::Configuration(message.into()),
        }
    }

    /// Sets the output format.
    #[must_use]
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        if let TaskKind::Command(spec) = &mut self.kind {
            spec.format = format;
        }
        self
    }

    /// Installs a hook for non-zero exits with stderr output.
    #[must_use]
    pub fn with_on_error<H>(mut self, handler: H) -> Self
    where
        H: OnError<T> + 'static,
    {
        if let TaskKind::Command(spec) = &mut self.kind {
            spec.on_error = Some(Box::new(handler));
        }
        self
    }

    /// Adds assembly flags.
    #[must_use]
    pub fn with_flags(mut self, flags: TaskFlags) -> Self {
        if let TaskKind::Command(spec) = &mut self.kind {
            spec.flags |= flags;
        }
        self
    }

    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Diagnostic operation name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Argument vector (empty for configuration-error tasks).
    #[must_use]
    pub fn commands(&self) -> &[String] {
        match &self.kind {
            TaskKind::Command(spec) => &spec.commands,
            TaskKind::Configuration(_) => &[],
        }
    }

    #[must_use]
    pub const fn format(&self) -> Option<OutputFormat> {
        match &self.kind {
            TaskKind::Command(spec) => Some(spec.format),
            TaskKind::Configuration(_) => None,
        }
    }

    #[must_use]
    pub const fn flags(&self) -> TaskFlags {
        match &self.kind {
            TaskKind::Command(spec) => spec.flags,
            TaskKind::Configuration(_) => TaskFlags::empty(),
        }
    }

    #[must_use]
    pub const fn is_configuration_error(&self) -> bool {
        matches!(self.kind, TaskKind::Configuration(_))
    }

    #[must_use]
    pub fn summary(&self) -> TaskSummary {
        TaskSummary::new(self.name, self.commands().to_vec())
    }

    /// Validation message of a configuration-error task.
    pub(crate) fn configuration_message(&self) -> Option<&str> {
        match &self.kind {
            TaskKind::Configuration(message) => Some(message),
            TaskKind::Command(_) => None,
        }
    }

    /// Turns the raw streams of a finished process into this task's result.
    ///
    /// # Errors
    ///
    /// Returns [`GitError::NonZeroExit`] for unhandled failures, whatever the
    /// `on_error` hook decides, or the parser's classified error. Errors are
    /// tagged with this task's summary.
    pub fn settle(&self, raw: RawProcessResult) -> GitResult<T> {
        let spec = match &self.kind {
            TaskKind::Command(spec) => spec,
            TaskKind::Configuration(message) => {
                return Err(GitError::configuration(message.clone()).with_task(&self.summary()));
            }
        };

        let encoding = match spec.format {
            OutputFormat::Text(encoding) => encoding,
            OutputFormat::Binary => Encoding::Utf8,
        };
        let exit_code = raw.exit_code();
        let (mut stdout, stderr) = raw.into_buffers();
        let failed = exit_code != Some(0);

        if failed && !stderr.is_empty() {
            let output = TaskOutput::new(exit_code, stdout, stderr, encoding);
            let resolution = spec
                .on_error
                .as_ref()
                .map_or(ErrorResolution::Reject, |handler| handler.on_error(&output));
            return match resolution {
                ErrorResolution::Succeed(value) => Ok(value),
                ErrorResolution::Fail(err) => Err(err.with_task(&self.summary())),
                ErrorResolution::Reject => Err(GitError::non_zero_exit(
                    self.summary(),
                    exit_code,
                    output.stderr_text().into_owned(),
                )),
            };
        }

        let stderr = if spec.flags.contains(TaskFlags::CONCAT_STDERR) {
            stdout.extend_from_slice(&stderr);
            Vec::new()
        } else {
            stderr
        };

        let output = TaskOutput::new(exit_code, stdout, stderr, encoding);
        spec.parser
            .parse(&output)
            .map_err(|err| err.with_task(&self.summary()))
    }
}
