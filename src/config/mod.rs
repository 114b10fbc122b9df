// gitrun: git command automation layer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration management for gitrun.
//!
//! # Configuration Hierarchy
//!
//! ```text
//! Priority (low → high)
//! 1. defaults
//! 2. gitrun.toml (cwd, optional)
//! 3. --config FILE (repeatable)
//! 4. GITRUN_* env vars
//! 5. CLI overrides
//! ```
//!
//! # Environment Variable Mapping
//!
//! ```text
//! GITRUN_RUNNER__CONCURRENCY=2      → runner.concurrency = 2
//! GITRUN_RUNNER__BINARY=/opt/git    → runner.binary = "/opt/git"
//! GITRUN_LOG__LEVEL=4               → log.level = 4
//! GITRUN_RUNNER__SETTLE_GRACE_MS=0  → runner.settle_grace_ms = 0
//! ```
//!
//! # Example
//!
//! ```toml
//! [runner]
//! concurrency = 3
//! settle_grace_ms = 100
//!
//! [runner.env]
//! GIT_AUTHOR_NAME = "Build Bot"
//!
//! [log]
//! level = 4
//! file = "gitrun.log"
//! ```

pub mod loader;


use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{ConfigError, Result};
use crate::logging::{LogConfig, LogLevel};
use crate::task::scheduler::DEFAULT_CONCURRENCY;

pub use loader::ConfigLoader;

/// Name of the optional configuration file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "gitrun.toml";

/// Complete application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Process runner options.
    pub runner: RunnerConfig,
    /// Logging options.
    pub log: LogSettings,
}

/// Options for the git runner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunnerConfig {
    /// Binary to invoke, a bare name resolved on `PATH` or a path.
    pub binary: String,
    /// Working directory for spawned processes; inherited when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_dir: Option<PathBuf>,
    /// Maximum number of concurrently running processes.
    pub concurrency: usize,
    /// How long to wait for output streams to close after exit.
    pub settle_grace_ms: u64,
    /// Environment overlay applied to every spawned process.
    pub env: BTreeMap<String, String>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            binary: "git".to_string(),
            base_dir: None,
            concurrency: DEFAULT_CONCURRENCY,
            settle_grace_ms: 50,
            env: BTreeMap::new(),
        }
    }
}

impl RunnerConfig {
    #[must_use]
    pub const fn settle_grace(&self) -> Duration {
        Duration::from_millis(self.settle_grace_ms)
    }

    /// Checks value ranges and that `base_dir` exists.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] naming the offending key.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        let invalid = |key: &str, message: String| ConfigError::InvalidValue {
            section: "runner".to_string(),
            key: key.to_string(),
            message,
        };

        if self.binary.trim().is_empty() {
            return Err(invalid("binary", "must not be empty".to_string()));
        }
        if self.concurrency == 0 {
            return Err(invalid("concurrency", "must be at least 1".to_string()));
        }
        if let Some(dir) = &self.base_dir
            && !dir.is_dir()
        {
            return Err(invalid(
                "base_dir",
                format!("directory does not exist: {}", dir.display()),
            ));
        }
        if let Some(key) = self.env.keys().find(|k| k.is_empty() || k.contains('=')) {
            return Err(invalid("env", format!("invalid variable name '{key}'")));
        }
        Ok(())
    }
}

/// Logging options, mapped onto [`LogConfig`] at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogSettings {
    /// Console log level (0-6).
    pub level: LogLevel,
    /// File log level (0-6).
    pub file_level: LogLevel,
    /// Optional log file path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
    /// Emit console logs as JSON lines.
    pub json: bool,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: LogLevel::INFO,
            file_level: LogLevel::TRACE,
            file: None,
            json: false,
        }
    }
}

impl LogSettings {
    #[must_use]
    pub fn to_log_config(&self) -> LogConfig {
        LogConfig::builder()
            .with_console_level(self.level)
            .with_file_level(self.file_level)
            .maybe_with_log_file(self.file.as_ref().map(|p| p.display().to_string()))
            .with_json(self.json)
            .build()
    }
}

impl Config {
    /// Create a new configuration builder.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use gitrun::config::Config;
    ///
    /// let config = Config::builder()
    ///     .add_toml_file_optional("gitrun.toml")
    ///     .with_env_prefix("GITRUN")
    ///     .build()?;
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    #[must_use]
    pub fn builder() -> ConfigLoader {
        ConfigLoader::new()
    }

    /// Load configuration from a single TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, contains invalid TOML, or
    /// does not match the `Config` structure.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::builder().add_toml_file(path).build()
    }

    /// Load configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is not valid TOML or does not match the
    /// `Config` structure.
    pub fn parse(content: &str) -> Result<Self> {
        Self::builder().add_toml_str(content).build()
    }

    /// Validates every section.
    ///
    /// # Errors
    ///
    /// Returns the first invalid value found.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        self.runner.validate()
    }

    /// Format configuration options for display, one `key = value` per line.
    ///
    /// Overlay values whose names look like secrets are hidden.
    #[must_use]
    pub fn format_options(&self) -> Vec<String> {
        let mut options = BTreeMap::new();
        options.insert("runner.binary".to_string(), self.runner.binary.clone());
        options.insert(
            "runner.base_dir".to_string(),
            self.runner
                .base_dir
                .as_ref()
                .map_or_else(String::new, |p| p.display().to_string()),
        );
        options.insert(
            "runner.concurrency".to_string(),
            self.runner.concurrency.to_string(),
        );
        options.insert(
            "runner.settle_grace_ms".to_string(),
            self.runner.settle_grace_ms.to_string(),
        );
        for (key, value) in &self.runner.env {
            let upper = key.to_ascii_uppercase();
            let shown = if ["TOKEN", "PASSWORD", "SECRET"]
                .iter()
                .any(|s| upper.contains(s))
            {
                "[hidden]".to_string()
            } else {
                value.clone()
            };
            options.insert(format!("runner.env.{key}"), shown);
        }
        options.insert("log.level".to_string(), self.log.level.as_u8().to_string());
        options.insert(
            "log.file_level".to_string(),
            self.log.file_level.as_u8().to_string(),
        );
        options.insert(
            "log.file".to_string(),
            self.log
                .file
                .as_ref()
                .map_or_else(String::new, |p| p.display().to_string()),
        );
        options.insert("log.json".to_string(), self.log.json.to_string());

        let max_key_len = options.keys().map(String::len).max().unwrap_or(0);
        options
            .into_iter()
            .map(|(key, value)| format!("{key:<max_key_len$} = {value}"))
            .collect()
    }
}
