// gitrun: git command automation layer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Process execution.
//!
//! ```text
//! run()
//!   |
//!   v
//! build_command()   args, cwd, env overlay, stdin null, pipes
//!   |
//!   v
//! spawn()  --Err--> io::Error (missing binary, permission)
//!   |
//!   v
//! run_child()       collect chunks, reconcile exit and stream close
//!   |
//!   v
//! RawProcessResult
//! ```

use std::process::Stdio;
use tokio::process::Command;

use super::RawProcessResult;
use super::builder::{NON_INTERACTIVE_ENV, ProcessBuilder};

impl ProcessBuilder {
    /// Returns the display name for this process.
    pub(super) fn display_name(&self) -> String {
        self.name_override().map_or_else(
            || {
                self.program().file_stem().map_or_else(
                    || "process".to_string(),
                    |s| s.to_string_lossy().into_owned(),
                )
            },
            String::from,
        )
    }

    /// Returns the full command line as a string (for logging).
    fn command_line(&self) -> String {
        use std::fmt::Write as _;
        let mut cmd = format!("{}", self.program().display());
        for arg in self.args_slice() {
            if arg.contains(' ') {
                let _ = write!(cmd, " \"{arg}\"");
            } else {
                let _ = write!(cmd, " {arg}");
            }
        }
        crate::error::redact_credentials(&cmd)
    }

    /// Spawns the process and waits until it has settled.
    ///
    /// A non-zero exit is not an error here; it is reported through
    /// [`RawProcessResult::exit_code`].
    ///
    /// # Errors
    ///
    /// Returns the I/O error if the process cannot be spawned or waited on.
    pub async fn run(self) -> std::io::Result<RawProcessResult> {
        let name = self.display_name();
        let logger = self.log().clone();

        if let Some(cwd) = self.working_dir() {
            logger.debug(&format!("cd {}", cwd.display()));
        }
        logger.debug(&format!("exec {}", self.command_line()));

        let mut command = self.build_command();
        let mut child = command.spawn().inspect_err(|e| {
            logger.error(&format!("failed to spawn {name}: {e}"));
        })?;
        logger.trace(&format!("spawned pid {:?}", child.id()));

        let result = self.run_child(&name, &mut child).await?;
        logger.debug(&format!("exit {:?}", result.exit_code()));
        Ok(result)
    }

    /// Builds the tokio Command from this builder's configuration.
    fn build_command(&self) -> Command {
        let program = self.resolved_program();
        let mut command = Command::new(program);
        command.args(self.args_slice());

        if let Some(cwd) = self.working_dir() {
            command.current_dir(cwd);
        }

        for (key, value) in NON_INTERACTIVE_ENV {
            command.env(key, value);
        }
        for (key, value) in self.env_overlay() {
            command.env(key, value);
        }

        command.stdin(Stdio::null());
        command.stdout(Stdio::piped());
        command.stderr(Stdio::piped());

        // In-flight processes run to completion even if the caller goes away.
        command.kill_on_drop(false);

        command
    }

    /// Bare names go through the PATH cache; paths are used as given.
    fn resolved_program(&self) -> std::path::PathBuf {
        let program = self.program();
        if program.components().count() > 1 {
            return program.clone();
        }
        program
            .to_str()
            .and_then(Self::find)
            .unwrap_or_else(|| program.clone())
    }
}
