//! Configuration file loading with precedence handling.

use crate::attachment::{
    AutosizeOptions, LookupRetry, DEFAULT_LOOKUP_DELAY, DEFAULT_LOOKUP_RETRIES,
};
use crate::model::{MeasureStrategy, RowConstraints};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Environment variable naming an explicit config file.
pub const CONFIG_PATH_ENV: &str = "AUTOSIZE_CONFIG";
/// Environment variable overriding `min_rows`.
pub const MIN_ROWS_ENV: &str = "AUTOSIZE_MIN_ROWS";
/// Environment variable overriding `max_rows`.
pub const MAX_ROWS_ENV: &str = "AUTOSIZE_MAX_ROWS";
/// Environment variable overriding `strategy`.
pub const STRATEGY_ENV: &str = "AUTOSIZE_STRATEGY";

/// Errors that can occur during config loading.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Failed to read config file (permission issues, not a file, ...).
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError {
        /// Path that failed to read.
        path: PathBuf,
        /// Reason for failure.
        reason: String,
    },

    /// Config file contains invalid TOML or unknown keys.
    #[error("Invalid TOML in {path}: {reason}")]
    ParseError {
        /// Path with invalid TOML.
        path: PathBuf,
        /// Parse error details.
        reason: String,
    },

    /// An environment override could not be parsed.
    #[error("Invalid value for {key}: '{value}'")]
    InvalidValue {
        /// Name of the offending variable.
        key: &'static str,
        /// Raw value found.
        value: String,
    },
}

/// TOML configuration file structure.
///
/// All fields are optional - if not specified, hardcoded defaults are used.
/// Corresponds to `~/.config/autosize/config.toml`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Minimum visible rows (0 = unset).
    #[serde(default)]
    pub min_rows: Option<u32>,

    /// Maximum visible rows before scrolling (0 = unset).
    #[serde(default)]
    pub max_rows: Option<u32>,

    /// Natural-height measurement strategy: `"clone"` or `"live"`.
    #[serde(default)]
    pub strategy: Option<MeasureStrategy>,

    /// Lookup retries after the first attempt.
    #[serde(default)]
    pub lookup_retries: Option<u32>,

    /// Delay between lookup attempts, in milliseconds.
    #[serde(default)]
    pub lookup_delay_ms: Option<u64>,

    /// Text area width in columns (defaults to the terminal width).
    #[serde(default)]
    pub width: Option<u16>,

    /// Path to log file for tracing output.
    #[serde(default)]
    pub log_file_path: Option<PathBuf>,
}

/// Resolved configuration after applying precedence rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    /// Row constraints.
    pub constraints: RowConstraints,
    /// Measurement strategy.
    pub strategy: MeasureStrategy,
    /// Lookup retries after the first attempt.
    pub lookup_retries: u32,
    /// Delay between lookup attempts.
    pub lookup_delay: Duration,
    /// Fixed text area width, `None` to follow the terminal.
    pub width: Option<u16>,
    /// Path to log file for tracing output.
    pub log_file_path: PathBuf,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            constraints: RowConstraints::UNBOUNDED,
            strategy: MeasureStrategy::default(),
            lookup_retries: DEFAULT_LOOKUP_RETRIES,
            lookup_delay: DEFAULT_LOOKUP_DELAY,
            width: None,
            log_file_path: default_log_path(),
        }
    }
}

impl ResolvedConfig {
    /// Attachment options described by this config.
    pub fn autosize_options(&self) -> AutosizeOptions {
        AutosizeOptions {
            constraints: self.constraints,
            strategy: self.strategy,
            retry: LookupRetry {
                max_retries: self.lookup_retries,
                delay: self.lookup_delay,
            },
        }
    }
}

/// Resolve default log file path.
///
/// Returns `~/.local/state/autosize/autosize.log` on Unix-like systems,
/// or the platform state directory elsewhere. Falls back to the current
/// directory if no state directory can be determined.
pub fn default_log_path() -> PathBuf {
    if let Some(state_dir) = dirs::state_dir() {
        state_dir.join("autosize").join("autosize.log")
    } else {
        PathBuf::from("autosize.log")
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

    // Missing file is not an error - use defaults
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
/// Returns `~/.config/autosize/config.toml` on Unix, the platform config
/// directory elsewhere, or `None` if it cannot be determined.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("autosize").join("config.toml"))
}

/// Load configuration with precedence handling.
///
/// Precedence (highest to lowest):
/// 1. Explicit `config_path` argument (CLI `--config`)
/// 2. `AUTOSIZE_CONFIG` environment variable
/// 3. Default path `~/.config/autosize/config.toml`
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

    if let Ok(env_path) = std::env::var(CONFIG_PATH_ENV) {
        return load_config_file(PathBuf::from(env_path));
    }

    if let Some(default_path) = default_config_path() {
        return load_config_file(default_path);
    }

    Ok(None)
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
        constraints: RowConstraints::new(config.min_rows, config.max_rows),
        strategy: config.strategy.unwrap_or(defaults.strategy),
        lookup_retries: config.lookup_retries.unwrap_or(defaults.lookup_retries),
        lookup_delay: config
            .lookup_delay_ms
            .map(Duration::from_millis)
            .unwrap_or(defaults.lookup_delay),
        width: config.width.or(defaults.width),
        log_file_path: config.log_file_path.unwrap_or(defaults.log_file_path),
    }
}

fn env_rows(key: &'static str) -> Result<Option<u32>, ConfigError> {
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<u32>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue { key, value: raw }),
        Err(_) => Ok(None),
    }
}

/// Apply environment variable overrides to resolved config.
///
/// Checks for:
/// - `AUTOSIZE_MIN_ROWS`: Override minimum rows
/// - `AUTOSIZE_MAX_ROWS`: Override maximum rows
/// - `AUTOSIZE_STRATEGY`: Override measurement strategy
///
/// # Errors
///
/// Returns [`ConfigError::InvalidValue`] if a variable is set but unparseable.
pub fn apply_env_overrides(mut config: ResolvedConfig) -> Result<ResolvedConfig, ConfigError> {
    if let Some(min_rows) = env_rows(MIN_ROWS_ENV)? {
        config.constraints = config.constraints.with_min_rows(Some(min_rows));
    }

    if let Some(max_rows) = env_rows(MAX_ROWS_ENV)? {
        config.constraints = config.constraints.with_max_rows(Some(max_rows));
    }

    if let Ok(raw) = std::env::var(STRATEGY_ENV) {
        config.strategy = raw.parse().map_err(|_| ConfigError::InvalidValue {
            key: STRATEGY_ENV,
            value: raw,
        })?;
    }

    Ok(config)
}

/// Apply CLI argument overrides to resolved config.
///
/// CLI args have the highest precedence and override all other sources.
/// Only flags the user actually passed are applied.
pub fn apply_cli_overrides(
    mut config: ResolvedConfig,
    min_rows_override: Option<u32>,
    max_rows_override: Option<u32>,
    strategy_override: Option<MeasureStrategy>,
    width_override: Option<u16>,
) -> ResolvedConfig {
    if min_rows_override.is_some() {
        config.constraints = config.constraints.with_min_rows(min_rows_override);
    }

    if max_rows_override.is_some() {
        config.constraints = config.constraints.with_max_rows(max_rows_override);
    }

    if let Some(strategy) = strategy_override {
        config.strategy = strategy;
    }

    if let Some(width) = width_override {
        config.width = Some(width);
    }

    config
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
