//! Configuration schema definitions.

use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SkiffConfig {
    /// The bot's protocol identity.
    #[serde(default)]
    pub bot: BotSettings,

    /// Dispatch and serving behavior.
    #[serde(default)]
    pub dispatch: DispatchSettings,

    /// Logging setup.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// The bot's protocol identity.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BotSettings {
    /// The bot's own user id. Events it authored are suppressed before
    /// dispatch; must not be empty.
    #[serde(default)]
    pub user_id: String,

    /// Human-readable display name (presentation only).
    #[serde(default)]
    pub display_name: Option<String>,
}

/// Dispatch and serving behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchSettings {
    /// Capacity of the inbound envelope channel.
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,

    /// How long in-flight handlers may finish after shutdown before they
    /// are cancelled, in milliseconds.
    #[serde(default = "default_shutdown_grace_ms")]
    pub shutdown_grace_ms: u64,
}

impl Default for DispatchSettings {
    fn default() -> Self {
        Self {
            channel_capacity: default_channel_capacity(),
            shutdown_grace_ms: default_shutdown_grace_ms(),
        }
    }
}

fn default_channel_capacity() -> usize {
    128
}

fn default_shutdown_grace_ms() -> u64 {
    5000
}

/// Logging setup.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LoggingConfig {
    /// Base log level.
    #[serde(default)]
    pub level: LogLevel,

    /// Output format.
    #[serde(default)]
    pub format: LogFormat,

    /// Output destination.
    #[serde(default)]
    pub output: LogOutput,

    /// Log file path; only used with [`LogOutput::File`].
    #[serde(default)]
    pub file_path: Option<PathBuf>,

    /// Per-module level overrides (`"skiff_core" = "debug"`).
    #[serde(default)]
    pub filters: HashMap<String, LogLevel>,
}

/// Log level names accepted in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Converts to a `tracing` level.
    pub fn to_tracing_level(self) -> tracing::Level {
        match self {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }

    /// Returns the lowercase name used in filter directives.
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Single-line, abbreviated.
    #[default]
    Compact,
    /// Single-line with full metadata.
    Full,
    /// Multi-line, human-oriented.
    Pretty,
    /// JSON lines; requires the `json-log` feature.
    Json,
}

/// Log output destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogOutput {
    #[default]
    Stdout,
    Stderr,
    File,
}
