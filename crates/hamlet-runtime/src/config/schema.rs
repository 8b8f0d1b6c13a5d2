//! Configuration schema definitions.

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use hamlet_framework::{DuplicatePolicy, ResponderSettings};
use serde::{Deserialize, Serialize};

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HamletConfig {
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Where plugins are loaded from and how.
    #[serde(default)]
    pub plugins: PluginsConfig,

    /// Message-trigger and command-error texts.
    #[serde(default)]
    pub responder: ResponderSettings,

    /// Language-model client.
    #[serde(default)]
    pub llm: LlmConfig,

    /// Messaging platform.
    #[serde(default)]
    pub platform: PlatformConfig,
}

// =============================================================================
// Logging
// =============================================================================

/// Log verbosity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Everything.
    Trace,
    /// Diagnostics.
    Debug,
    /// Normal operation.
    #[default]
    Info,
    /// Recoverable problems.
    Warn,
    /// Failures only.
    Error,
}

impl LogLevel {
    /// Lowercase name, as accepted by `EnvFilter`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }

    /// The matching `tracing` level.
    pub fn to_tracing_level(self) -> tracing::Level {
        match self {
            Self::Trace => tracing::Level::TRACE,
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warn => tracing::Level::WARN,
            Self::Error => tracing::Level::ERROR,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Line format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// One short line per event.
    #[default]
    Compact,
    /// The default `tracing-subscriber` format.
    Full,
    /// Multi-line, human-oriented.
    Pretty,
    /// One JSON object per line (requires the `json-log` feature).
    #[cfg(feature = "json-log")]
    Json,
}

/// Where log lines go.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogOutput {
    /// Standard output.
    #[default]
    Stdout,
    /// Standard error.
    Stderr,
    /// The file at `logging.file_path`.
    File,
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Base level. `RUST_LOG` takes precedence when set.
    pub level: LogLevel,
    /// Line format.
    pub format: LogFormat,
    /// Destination.
    pub output: LogOutput,
    /// Log file, used when `output = "file"`.
    pub file_path: Option<PathBuf>,
    /// Include thread ids.
    pub thread_ids: bool,
    /// Include source file and line.
    pub file_location: bool,
    /// Log span open/close, e.g. one pair per dispatched event.
    pub span_lifecycle: bool,
    /// Per-module levels, e.g. `serenity = "warn"`.
    pub filters: HashMap<String, LogLevel>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            format: LogFormat::Compact,
            output: LogOutput::Stdout,
            file_path: None,
            thread_ids: false,
            file_location: false,
            span_lifecycle: false,
            filters: HashMap::new(),
        }
    }
}

// =============================================================================
// Plugins
// =============================================================================

/// Plugin loading settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PluginsConfig {
    /// Directory of command manifests.
    pub commands_dir: Option<PathBuf>,
    /// Directory of event manifests.
    pub events_dir: Option<PathBuf>,
    /// Manifest file extension, without the dot.
    pub extension: String,
    /// What happens when two commands share a name.
    pub duplicates: DuplicatePolicy,
    /// Upper bound on a single handler invocation.
    pub handler_timeout_secs: Option<u64>,
}

impl Default for PluginsConfig {
    fn default() -> Self {
        Self {
            commands_dir: None,
            events_dir: None,
            extension: "toml".to_string(),
            duplicates: DuplicatePolicy::Override,
            handler_timeout_secs: None,
        }
    }
}

impl PluginsConfig {
    /// The handler timeout as a [`Duration`].
    pub fn handler_timeout(&self) -> Option<Duration> {
        self.handler_timeout_secs.map(Duration::from_secs)
    }
}

// =============================================================================
// Language model
// =============================================================================

/// Language-model client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// API root, without the trailing `/chat/completions`.
    pub base_url: String,
    /// Model name.
    pub model: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Environment variable holding the API key.
    pub api_key_env: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-3.5-turbo".to_string(),
            timeout_secs: 30,
            api_key_env: "OPENAI_API_KEY".to_string(),
        }
    }
}

impl LlmConfig {
    /// The request timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

// =============================================================================
// Platform
// =============================================================================

/// Messaging-platform settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformConfig {
    /// Environment variable holding the bot token.
    pub token_env: String,
    /// Publish loaded commands as global application commands on ready.
    pub register_commands: bool,
    /// Capacity of the queue between the adapter and the dispatcher.
    pub event_queue: usize,
    /// How long in-flight handlers may run after shutdown is requested.
    pub shutdown_grace_secs: u64,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            token_env: "DISCORD_TOKEN".to_string(),
            register_commands: true,
            event_queue: 256,
            shutdown_grace_secs: 5,
        }
    }
}
