// gitrun: git command automation layer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Logging infrastructure using the `tracing` ecosystem.
//!
//! ```text
//! init_logging(&LogConfig)          (main only)
//!        |
//!        v
//!    registry
//!    |       |
//!    v       v
//! Console   File (optional)
//! EnvFilter EnvFilter
//! text|json non_blocking
//!        |
//!        v
//!    LogGuard (flush on drop)
//!
//! Logger("gitrun")                  (injected into Scheduler, Queue, Chain)
//!   .child("commit:3")  --> channel "gitrun/commit:3"
//!   .sibling("push:4")  --> channel "gitrun/push:4"
//!   .debug("...")       --> tracing event { channel, message }
//!
//! LogLevel:  0=OFF  1=ERROR  2=WARN  3=INFO
//!            4=DEBUG  5=TRACE  6=DUMP(+libs)
//! ```

use anyhow::Context;
use bon::Builder;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::path::Path;
use std::sync::Arc;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

use crate::error::{ConfigError, Result};

/// Log level (0-6) for configuration.
///
/// - 0: Silent - no output at all
/// - 1: Error - only errors
/// - 2: Warn - errors and warnings
/// - 3: Info - default, general information
/// - 4: Debug - command lines and task lifecycle
/// - 5: Trace - slot grants, queue transitions
/// - 6: Dump - everything, including dependency crates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogLevel(u8);

impl Default for LogLevel {
    fn default() -> Self {
        Self::INFO
    }
}

impl LogLevel {
    pub const SILENT: Self = Self(0);
    pub const ERROR: Self = Self(1);
    pub const WARN: Self = Self(2);
    pub const INFO: Self = Self(3);
    pub const DEBUG: Self = Self(4);
    pub const TRACE: Self = Self(5);
    pub const DUMP: Self = Self(6);

    /// Create a new `LogLevel` from a u8 value (0-6).
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError::InvalidValue` if the level is greater than 6.
    pub fn new(level: u8) -> std::result::Result<Self, ConfigError> {
        if level <= 6 {
            Ok(Self(level))
        } else {
            Err(ConfigError::InvalidValue {
                section: "log".to_string(),
                key: "level".to_string(),
                message: format!("log level must be 0-6, got {level}"),
            })
        }
    }

    /// Get the raw u8 value.
    #[must_use]
    pub const fn as_u8(&self) -> u8 {
        self.0
    }

    /// Convert from u8 value, returning None if out of range.
    #[must_use]
    pub const fn from_u8(level: u8) -> Option<Self> {
        if level <= 6 { Some(Self(level)) } else { None }
    }

    /// Convert to `EnvFilter` directive string.
    ///
    /// Below [`LogLevel::DUMP`] dependency crates are capped at `warn`.
    #[must_use]
    pub const fn to_filter_string(self) -> &'static str {
        match self.0 {
            0 => "off",
            1 => "error",
            2 => "warn",
            3 => "warn,gitrun=info",
            4 => "warn,gitrun=debug",
            5 => "warn,gitrun=trace",
            _ => "trace",
        }
    }
}

impl Serialize for LogLevel {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u8(self.0)
    }
}

impl<'de> Deserialize<'de> for LogLevel {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = u8::deserialize(deserializer)?;
        Self::new(value).map_err(serde::de::Error::custom)
    }
}

/// Configuration for the logging system.
#[derive(Debug, Clone, Builder)]
pub struct LogConfig {
    #[builder(setters(name = with_console_level), default = LogLevel::INFO)]
    console_level: LogLevel,
    #[builder(setters(name = with_file_level), default = LogLevel::TRACE)]
    file_level: LogLevel,
    #[builder(setters(name = with_log_file))]
    log_file: Option<String>,
    #[builder(setters(name = with_show_timestamps), default = true)]
    show_timestamps: bool,
    #[builder(setters(name = with_show_target), default = false)]
    show_target: bool,
    #[builder(setters(name = with_json), default = false)]
    json: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl LogConfig {
    /// Get the console log level.
    #[must_use]
    pub const fn console_level(&self) -> LogLevel {
        self.console_level
    }

    /// Get the file log level.
    #[must_use]
    pub const fn file_level(&self) -> LogLevel {
        self.file_level
    }

    /// Get the log file path if set.
    #[must_use]
    pub fn log_file(&self) -> Option<&str> {
        self.log_file.as_deref()
    }

    /// Check if timestamps should be shown in console output.
    #[must_use]
    pub const fn show_timestamps(&self) -> bool {
        self.show_timestamps
    }

    /// Check if target (module path) should be shown in output.
    #[must_use]
    pub const fn show_target(&self) -> bool {
        self.show_target
    }

    /// Check if console output is JSON lines.
    #[must_use]
    pub const fn json(&self) -> bool {
        self.json
    }
}

/// RAII guard that keeps the logging system alive.
/// When dropped, flushes all pending log writes.
pub struct LogGuard {
    _file_guard: Option<WorkerGuard>,
}

/// Initialize the logging system with the given configuration.
///
/// Returns a guard that must be kept alive for the duration of the program.
/// When the guard is dropped, pending logs are flushed. Console output goes
/// to stderr so stdout stays machine-readable.
///
/// # Errors
///
/// Returns an error if the log directory or file cannot be created.
///
/// # Example
///
/// ```no_run
/// use gitrun::logging::{init_logging, LogConfig, LogLevel};
///
/// let config = LogConfig::builder()
///     .with_console_level(LogLevel::INFO)
///     .with_file_level(LogLevel::DEBUG)
///     .with_log_file("gitrun.log".to_string())
///     .build();
///
/// let _guard = init_logging(&config).expect("Failed to initialize logging");
/// tracing::info!("Logging initialized");
/// ```
pub fn init_logging(config: &LogConfig) -> Result<LogGuard> {
    let console_filter = EnvFilter::new(config.console_level().to_filter_string());

    let console_layer = if config.json() {
        fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(config.show_target())
            .with_filter(console_filter)
            .boxed()
    } else {
        let layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(config.show_target())
            .with_level(true)
            .with_ansi(true);
        if config.show_timestamps() {
            layer.with_filter(console_filter).boxed()
        } else {
            layer.without_time().with_filter(console_filter).boxed()
        }
    };

    let (file_layer, file_guard) = if let Some(log_path) = config.log_file() {
        let log_path = Path::new(log_path);

        if let Some(parent) = log_path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create log directory {}", parent.display()))?;
        }

        let file = std::fs::File::create(log_path)
            .with_context(|| format!("failed to create log file {}", log_path.display()))?;
        let (non_blocking, guard) = tracing_appender::non_blocking(file);

        let file_filter = EnvFilter::new(config.file_level().to_filter_string());

        let layer = fmt::layer()
            .with_writer(non_blocking)
            .with_target(true)
            .with_level(true)
            .with_ansi(false)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(file_filter);

        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .context("a global tracing subscriber is already installed")?;

    Ok(LogGuard {
        _file_guard: file_guard,
    })
}

/// Named diagnostic channel handed to the execution machinery.
///
/// Cheap to clone. Every event carries the channel name as a `channel` field
/// so a subscriber can filter one task's lifecycle out of concurrent work.
#[derive(Clone, PartialEq, Eq)]
pub struct Logger {
    channel: Arc<str>,
    enabled: bool,
}

impl Logger {
    pub fn new(channel: impl AsRef<str>) -> Self {
        Self {
            channel: Arc::from(channel.as_ref()),
            enabled: true,
        }
    }

    /// A logger that drops every event.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            channel: Arc::from(""),
            enabled: false,
        }
    }

    #[must_use]
    pub fn channel(&self) -> &str {
        &self.channel
    }

    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Nested channel: `gitrun` becomes `gitrun/name`.
    #[must_use]
    pub fn child(&self, name: &str) -> Self {
        let channel = if self.channel.is_empty() {
            name.to_string()
        } else {
            format!("{}/{name}", self.channel)
        };
        Self {
            channel: Arc::from(channel),
            enabled: self.enabled,
        }
    }

    /// Channel next to this one: `gitrun/commit:3` becomes `gitrun/name`.
    #[must_use]
    pub fn sibling(&self, name: &str) -> Self {
        match self.channel.rsplit_once('/') {
            Some((parent, _)) => Self {
                channel: Arc::from(format!("{parent}/{name}")),
                enabled: self.enabled,
            },
            None => self.child(name),
        }
    }

    pub fn error(&self, message: &str) {
        if self.enabled {
            tracing::error!(channel = %self.channel, "{message}");
        }
    }

    pub fn warn(&self, message: &str) {
        if self.enabled {
            tracing::warn!(channel = %self.channel, "{message}");
        }
    }

    pub fn info(&self, message: &str) {
        if self.enabled {
            tracing::info!(channel = %self.channel, "{message}");
        }
    }

    pub fn debug(&self, message: &str) {
        if self.enabled {
            tracing::debug!(channel = %self.channel, "{message}");
        }
    }

    pub fn trace(&self, message: &str) {
        if self.enabled {
            tracing::trace!(channel = %self.channel, "{message}");
        }
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new("gitrun")
    }
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.enabled {
            write!(f, "Logger({})", self.channel)
        } else {
            f.write_str("Logger(disabled)")
        }
    }
}

#[cfg(test)]
mod tests;
