//! Configuration schema definitions.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

use braid_core::Snowflake;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BraidConfig {
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Application-command registration scoping.
    #[serde(default)]
    pub registration: RegistrationConfig,

    /// Prefix-command settings.
    #[serde(default)]
    pub prefix: PrefixConfig,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format.
    #[serde(default)]
    pub format: LogFormat,

    /// Output destination.
    #[serde(default)]
    pub output: LogOutput,

    /// Log file path, required when `output` is `file`.
    #[serde(default)]
    pub file_path: Option<PathBuf>,

    /// Per-module level overrides, e.g. `braid_framework = "debug"`.
    #[serde(default)]
    pub filters: HashMap<String, String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
            output: LogOutput::default(),
            file_path: None,
            filters: HashMap::new(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Compact single-line output.
    #[default]
    Compact,
    /// Default `tracing` formatting.
    Full,
    /// Multi-line human-oriented output.
    Pretty,
}

/// Log output destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogOutput {
    /// Standard output.
    #[default]
    Stdout,
    /// Standard error.
    Stderr,
    /// A log file; see [`LoggingConfig::file_path`].
    File,
}

/// Where built application commands are registered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrationConfig {
    /// Register commands globally.
    #[serde(default = "default_global")]
    pub global: bool,

    /// Guilds to register commands in, in addition to (or instead of) the
    /// global scope.
    #[serde(default)]
    pub guilds: Vec<Snowflake>,

    /// Remove previously registered commands in each scope before
    /// registering the new set.
    #[serde(default)]
    pub remove_before: bool,
}

impl Default for RegistrationConfig {
    fn default() -> Self {
        Self {
            global: default_global(),
            guilds: Vec::new(),
            remove_before: false,
        }
    }
}

fn default_global() -> bool {
    true
}

/// Prefix-command configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrefixConfig {
    /// Global command prefix; per-command declarations may override it.
    #[serde(default = "default_prefix")]
    pub prefix: String,
}

impl Default for PrefixConfig {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
        }
    }
}

fn default_prefix() -> String {
    "!".to_string()
}
