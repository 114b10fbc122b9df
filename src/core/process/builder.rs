// gitrun: git command automation layer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Process builder with configuration options.
//!
//! ```text
//! ProcessBuilder
//!  • new/from_request/find
//!  • args/cwd/env/name/task/tap/settle_grace/logger
//! ```

use std::collections::BTreeMap;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::sync::{OnceLock, RwLock};
use std::time::Duration;

use super::{DEFAULT_SETTLE_GRACE, OutputChunk, SpawnRequest};
use crate::logging::Logger;
use crate::task::TaskId;

/// Variables that keep git from blocking on interactive prompts.
pub const NON_INTERACTIVE_ENV: [(&str, &str); 2] =
    [("GIT_TERMINAL_PROMPT", "0"), ("GCM_INTERACTIVE", "never")];

/// Static cache for executable paths resolved via `which`.
static EXECUTABLE_CACHE: OnceLock<RwLock<BTreeMap<String, PathBuf>>> = OnceLock::new();

fn exe_cache() -> &'static RwLock<BTreeMap<String, PathBuf>> {
    EXECUTABLE_CACHE.get_or_init(|| RwLock::new(BTreeMap::new()))
}

/// Builder for configuring and running a process.
#[derive(Debug)]
pub struct ProcessBuilder {
    program: PathBuf,
    args: Vec<String>,
    cwd: Option<PathBuf>,
    /// Overlay on top of the inherited environment.
    env: BTreeMap<String, String>,
    name: Option<String>,
    task: Option<TaskId>,
    tap: Option<flume::Sender<OutputChunk>>,
    settle_grace: Duration,
    logger: Logger,
}

impl ProcessBuilder {
    /// Creates a new `ProcessBuilder` for the given program.
    ///
    /// A bare name is resolved via PATH when the process is spawned.
    pub fn new(program: impl AsRef<Path>) -> Self {
        Self {
            program: program.as_ref().to_path_buf(),
            args: Vec::new(),
            cwd: None,
            env: BTreeMap::new(),
            name: None,
            task: None,
            tap: None,
            settle_grace: DEFAULT_SETTLE_GRACE,
            logger: Logger::disabled(),
        }
    }

    /// Creates a builder from the execution chain's request.
    #[must_use]
    pub fn from_request(request: SpawnRequest) -> Self {
        let mut builder = Self::new(&request.program)
            .args(request.args)
            .name(request.name)
            .task(request.task)
            .logger(request.logger);
        builder.cwd = request.cwd;
        builder.env = request.env;
        builder.tap = request.tap;
        builder
    }

    /// Finds the full path to an executable in PATH.
    ///
    /// Results are cached for subsequent lookups.
    #[must_use]
    pub fn find(program: &str) -> Option<PathBuf> {
        {
            let cache = exe_cache()
                .read()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            if let Some(path) = cache.get(program) {
                return Some(path.clone());
            }
        }

        which::which(program).map_or(None, |path| {
            {
                let mut cache = exe_cache()
                    .write()
                    .unwrap_or_else(std::sync::PoisonError::into_inner);
                cache.insert(program.to_string(), path.clone());
            }
            Some(path)
        })
    }

    /// Checks if an executable exists in PATH.
    #[must_use]
    pub fn exists(program: &str) -> bool {
        Self::find(program).is_some()
    }

    /// Adds an argument to the command.
    #[must_use]
    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_string_lossy().into_owned());
        self
    }

    /// Adds multiple arguments to the command.
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        for arg in args {
            self.args.push(arg.as_ref().to_string_lossy().into_owned());
        }
        self
    }

    /// Sets the working directory for the process.
    #[must_use]
    pub fn cwd(mut self, dir: impl AsRef<Path>) -> Self {
        self.cwd = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Adds an environment variable to the overlay.
    #[must_use]
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// Sets a display name for logging.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Tags output chunks with the owning task.
    #[must_use]
    pub const fn task(mut self, task: TaskId) -> Self {
        self.task = Some(task);
        self
    }

    /// Mirrors every output chunk to `tap`.
    #[must_use]
    pub fn tap(mut self, tap: flume::Sender<OutputChunk>) -> Self {
        self.tap = Some(tap);
        self
    }

    /// Sets how long to wait for the pipes to close once the exit code is known.
    #[must_use]
    pub const fn settle_grace(mut self, grace: Duration) -> Self {
        self.settle_grace = grace;
        self
    }

    #[must_use]
    pub fn logger(mut self, logger: Logger) -> Self {
        self.logger = logger;
        self
    }

    // Getters for field access within the process module

    #[must_use]
    pub const fn program(&self) -> &PathBuf {
        &self.program
    }

    pub(super) fn args_slice(&self) -> &[String] {
        &self.args
    }

    pub(super) const fn working_dir(&self) -> Option<&PathBuf> {
        self.cwd.as_ref()
    }

    pub(super) const fn env_overlay(&self) -> &BTreeMap<String, String> {
        &self.env
    }

    pub(super) fn name_override(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub(super) const fn task_id(&self) -> Option<TaskId> {
        self.task
    }

    pub(super) const fn output_tap(&self) -> Option<&flume::Sender<OutputChunk>> {
        self.tap.as_ref()
    }

    pub(super) const fn grace(&self) -> Duration {
        self.settle_grace
    }

    pub(super) const fn log(&self) -> &Logger {
        &self.logger
    }
}
