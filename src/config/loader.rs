//! Configuration file loading with precedence handling.

use crate::reducer::Strictness;
use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

/// Environment variable naming an explicit config file.
pub const ENV_CONFIG: &str = "SSELENS_CONFIG";
/// Environment variable overriding the report format.
pub const ENV_FORMAT: &str = "SSELENS_FORMAT";
/// Environment variable overriding strictness.
pub const ENV_STRICT: &str = "SSELENS_STRICT";

/// Errors that can occur during config loading.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Failed to read config file (permission issues, not a file).
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError {
        /// Path that failed to read.
        path: PathBuf,
        /// Reason for failure.
        reason: String,
    },

    /// Config file contains invalid TOML syntax or unknown keys.
    #[error("Invalid TOML in {path}: {reason}")]
    ParseError {
        /// Path with invalid TOML.
        path: PathBuf,
        /// Parse error details.
        reason: String,
    },

    /// An environment override holds a value that cannot be interpreted.
    #[error("Invalid value for {key}: '{value}'")]
    InvalidValue {
        /// Variable name.
        key: &'static str,
        /// The rejected value.
        value: String,
    },
}

/// Report output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable text report.
    #[default]
    Text,
    /// Machine-readable JSON report.
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("expected 'text' or 'json', got '{other}'")),
        }
    }
}

/// TOML configuration file structure.
///
/// All fields are optional - if not specified, hardcoded defaults are used.
/// Corresponds to `~/.config/sselens/config.toml`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Report format (`text` or `json`).
    #[serde(default)]
    pub format: Option<OutputFormat>,

    /// Collect diagnostics for tolerated stream irregularities.
    #[serde(default)]
    pub strict: Option<bool>,

    /// Include the decoded event list in the report.
    #[serde(default)]
    pub show_events: Option<bool>,

    /// Include thinking signatures in the text report.
    #[serde(default)]
    pub show_signature: Option<bool>,

    /// Path to log file for tracing output.
    #[serde(default)]
    pub log_file_path: Option<PathBuf>,
}

/// Resolved configuration after applying precedence rules.
///
/// Created by merging defaults, config file, env vars, and CLI args.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    /// Report format.
    pub format: OutputFormat,
    /// Reduction strictness.
    pub strictness: Strictness,
    /// Include the decoded event list in the report.
    pub show_events: bool,
    /// Include thinking signatures in the text report.
    pub show_signature: bool,
    /// Path to log file for tracing output.
    pub log_file_path: PathBuf,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Text,
            strictness: Strictness::Lenient,
            show_events: false,
            show_signature: true,
            log_file_path: default_log_path(),
        }
    }
}

/// Resolve default log file path.
///
/// Returns `~/.local/state/sselens/sselens.log` on Unix-like systems,
/// or appropriate platform path on other systems.
///
/// If state directory cannot be determined, falls back to current directory.
pub fn default_log_path() -> PathBuf {
    match dirs::state_dir() {
        Some(state_dir) => state_dir.join("sselens").join("sselens.log"),
        None => PathBuf::from("sselens.log"),
    }
}

/// Load configuration file from a specific path.
///
/// Returns `Ok(None)` if file doesn't exist (not an error - use defaults).
///
/// # Errors
///
/// Returns error if file exists but has read or parse errors.
pub fn load_config_file(path: impl Into<PathBuf>) -> Result<Option<ConfigFile>, ConfigError> {
    let path = path.into();

    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    let config: ConfigFile = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    Ok(Some(config))
}

/// Resolve default config file path.
///
/// Returns `~/.config/sselens/config.toml` on Unix, appropriate path on other platforms.
/// Returns `None` if home directory cannot be determined.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("sselens").join("config.toml"))
}

/// Load configuration with precedence handling.
///
/// Precedence (highest to lowest):
/// 1. Explicit `config_path` argument (CLI `--config`)
/// 2. `SSELENS_CONFIG` environment variable
/// 3. Default path `~/.config/sselens/config.toml`
///
/// Missing config files are NOT errors - defaults are used.
///
/// # Errors
///
/// Returns error only if a config file exists but cannot be read or parsed.
pub fn load_config_with_precedence(
    config_path: Option<PathBuf>,
) -> Result<Option<ConfigFile>, ConfigError> {
    if let Some(path) = config_path {
        return load_config_file(path);
    }

    if let Ok(env_path) = std::env::var(ENV_CONFIG) {
        return load_config_file(PathBuf::from(env_path));
    }

    match default_config_path() {
        Some(default_path) => load_config_file(default_path),
        None => Ok(None),
    }
}

/// Merge config file into defaults to create resolved config.
///
/// For each field in `ConfigFile`, if `Some(value)`, use it; otherwise use default.
pub fn merge_config(config_file: Option<ConfigFile>) -> ResolvedConfig {
    let defaults = ResolvedConfig::default();

    let Some(config) = config_file else {
        return defaults;
    };

    ResolvedConfig {
        format: config.format.unwrap_or(defaults.format),
        strictness: config
            .strict
            .map(Strictness::from_flag)
            .unwrap_or(defaults.strictness),
        show_events: config.show_events.unwrap_or(defaults.show_events),
        show_signature: config.show_signature.unwrap_or(defaults.show_signature),
        log_file_path: config.log_file_path.unwrap_or(defaults.log_file_path),
    }
}

/// Apply environment variable overrides to resolved config.
///
/// Checks for:
/// - `SSELENS_FORMAT`: `text` or `json`
/// - `SSELENS_STRICT`: `strict`/`lenient` or a boolean spelling
///
/// # Errors
///
/// Returns [`ConfigError::InvalidValue`] when a set variable cannot be parsed.
pub fn apply_env_overrides(mut config: ResolvedConfig) -> Result<ResolvedConfig, ConfigError> {
    if let Ok(format) = std::env::var(ENV_FORMAT) {
        config.format = format.parse().map_err(|_| ConfigError::InvalidValue {
            key: ENV_FORMAT,
            value: format.clone(),
        })?;
    }

    if let Ok(strict) = std::env::var(ENV_STRICT) {
        config.strictness = strict.parse().map_err(|_| ConfigError::InvalidValue {
            key: ENV_STRICT,
            value: strict.clone(),
        })?;
    }

    Ok(config)
}

/// Apply CLI argument overrides to resolved config.
///
/// CLI args have the highest precedence and override all other sources.
/// Only applies overrides for flags that were explicitly set by the user.
///
/// Precedence chain: Defaults → Config File → Env Vars → CLI Args (highest)
pub fn apply_cli_overrides(
    mut config: ResolvedConfig,
    format_override: Option<OutputFormat>,
    strict_override: Option<bool>,
    events_override: Option<bool>,
) -> ResolvedConfig {
    if let Some(format) = format_override {
        config.format = format;
    }

    if let Some(strict) = strict_override {
        config.strictness = Strictness::from_flag(strict);
    }

    if let Some(show_events) = events_override {
        config.show_events = show_events;
    }

    config
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
