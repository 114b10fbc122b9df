// gitrun: git command automation layer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Global CLI options available for all commands.
//!
//! # Option Precedence
//!
//! ```text
//! --config FILE       <- Additional config files (can repeat)
//! -C, --cwd DIR       <- runner.base_dir
//! -j, --concurrency N <- runner.concurrency
//! --git PATH          <- runner.binary
//! -l, --log-level N   <- Console verbosity (0-6)
//! --file-log-level N  <- File verbosity (overrides --log-level)
//! --log-file FILE     <- log.file
//! -e, --env KEY=VAL   <- Added to the runner environment
//!
//! Precedence: CLI flags > GITRUN_* env > --config > gitrun.toml > defaults
//! ```

use clap::Args;
use std::path::PathBuf;

use crate::config::loader::ConfigLoader;
use crate::error::Result;

/// Global options available for all commands.
#[derive(Debug, Clone, Default, Args)]
pub struct GlobalOptions {
    /// Path to additional TOML configuration file(s).
    /// Can be specified multiple times.
    #[arg(long = "config", value_name = "FILE", action = clap::ArgAction::Append)]
    pub configs: Vec<PathBuf>,

    /// Skips `gitrun.toml` in the current directory, only uses --config.
    #[arg(long = "no-default-config")]
    pub no_default_config: bool,

    /// Runs git in this directory.
    #[arg(short = 'C', long = "cwd", value_name = "DIR")]
    pub cwd: Option<PathBuf>,

    /// Maximum number of git processes running at once.
    #[arg(short = 'j', long = "concurrency", value_name = "N",
        value_parser = clap::value_parser!(u32).range(1..))]
    pub concurrency: Option<u32>,

    /// Git binary to invoke.
    #[arg(long = "git", value_name = "PATH")]
    pub binary: Option<String>,

    /// Console log level (0=silent, 1=errors, 2=warnings, 3=info, 4=debug, 5=trace, 6=dump).
    #[arg(short = 'l', long = "log-level", value_name = "LEVEL",
        value_parser = clap::value_parser!(u8).range(0..=6))]
    pub log_level: Option<u8>,

    /// File log level, overrides --log-level for the log file.
    #[arg(long = "file-log-level", value_name = "LEVEL",
        value_parser = clap::value_parser!(u8).range(0..=6))]
    pub file_log_level: Option<u8>,

    /// Path to log file.
    #[arg(long = "log-file", value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Sets an environment variable for every git process.
    /// Can be specified multiple times.
    #[arg(short = 'e', long = "env", value_name = "KEY=VALUE",
        value_parser = parse_env_pair, action = clap::ArgAction::Append)]
    pub env: Vec<(String, String)>,
}

/// Splits `KEY=VALUE` at the first `=`.
fn parse_env_pair(raw: &str) -> std::result::Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got '{raw}'")),
    }
}

impl GlobalOptions {
    /// Converts command-line options to configuration overrides.
    ///
    /// Keys use the loader's dotted syntax (`runner.concurrency`).
    #[must_use]
    pub fn to_config_overrides(&self) -> Vec<(&'static str, config::Value)> {
        let mut overrides = Vec::new();

        if let Some(dir) = &self.cwd {
            overrides.push(("runner.base_dir", dir.display().to_string().into()));
        }
        if let Some(n) = self.concurrency {
            overrides.push(("runner.concurrency", u64::from(n).into()));
        }
        if let Some(binary) = &self.binary {
            overrides.push(("runner.binary", binary.clone().into()));
        }
        if let Some(level) = self.log_level {
            overrides.push(("log.level", u64::from(level).into()));
        }
        // file level falls back to the console level if not specified
        if let Some(level) = self.file_log_level.or(self.log_level) {
            overrides.push(("log.file_level", u64::from(level).into()));
        }
        if let Some(path) = &self.log_file {
            overrides.push(("log.file", path.display().to_string().into()));
        }

        overrides
    }

    /// Loader for every configuration source, CLI overrides applied last.
    ///
    /// # Errors
    ///
    /// Returns an error if an override key is rejected by the loader.
    pub fn config_loader(&self) -> Result<ConfigLoader> {
        let mut loader = ConfigLoader::new();
        if !self.no_default_config {
            loader = loader.add_toml_file_optional(crate::config::CONFIG_FILE_NAME);
        }
        for path in &self.configs {
            loader = loader.add_toml_file(path);
        }
        loader = loader.with_env_prefix("GITRUN");
        for (key, value) in self.to_config_overrides() {
            loader = loader.set(key, value)?;
        }
        Ok(loader)
    }
}
