//! Settings file loading, merging and saving.

use crate::model::{DisplayMode, HeadingStyle, ScrollBehaviour, Settings};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "STICKY_HEADINGS_CONFIG";

/// Environment variable overriding the display mode.
pub const MODE_ENV: &str = "STICKY_HEADINGS_MODE";

/// Errors that can occur reading or writing the settings file.
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

    /// Config file contains invalid TOML or unknown keys.
    #[error("Invalid TOML in {path}: {reason}")]
    ParseError {
        /// Path with invalid TOML.
        path: PathBuf,
        /// Parse error details.
        reason: String,
    },

    /// Failed to write the settings back.
    #[error("Failed to write config file at {path}: {reason}")]
    WriteError {
        /// Path that failed to write.
        path: PathBuf,
        /// Reason for failure.
        reason: String,
    },
}

/// TOML settings file structure.
///
/// All fields are optional; missing ones fall back to defaults.
/// Corresponds to `~/.config/sticky-headings/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// `"default"` or `"concise"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<DisplayMode>,

    /// Cap on pinned headings, 0 = unlimited.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<usize>,

    /// Show level badges.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indicators: Option<bool>,

    /// `"simple"` or `"default"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<HeadingStyle>,

    /// Show the current section in the status bar.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_in_status_bar: Option<bool>,

    /// `"instant"` or `"animated"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scroll_behaviour: Option<ScrollBehaviour>,

    /// Show the file name when the title is not visible.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_show_file_name: Option<bool>,

    /// Path to log file for tracing output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_file_path: Option<PathBuf>,

    /// Scroll throttle window in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scroll_throttle_ms: Option<u64>,

    /// Give up on a height measurement after this many milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub measure_timeout_ms: Option<u64>,
}

/// Configuration after applying precedence rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    /// Persisted settings record.
    pub settings: Settings,
    /// Path to log file for tracing output.
    pub log_file_path: PathBuf,
    /// Scroll throttle window.
    pub scroll_throttle_ms: u64,
    /// Measurement timeout, `None` waits indefinitely.
    pub measure_timeout_ms: Option<u64>,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            settings: Settings::default(),
            log_file_path: default_log_path(),
            scroll_throttle_ms: 50,
            measure_timeout_ms: None,
        }
    }
}

impl ResolvedConfig {
    /// Scroll throttle window.
    pub fn scroll_window(&self) -> Duration {
        Duration::from_millis(self.scroll_throttle_ms)
    }

    /// Measurement timeout, `None` when unset.
    pub fn measure_timeout(&self) -> Option<Duration> {
        self.measure_timeout_ms.map(Duration::from_millis)
    }

    /// Every field written out, for saving wholesale.
    pub fn to_config_file(&self) -> ConfigFile {
        let s = &self.settings;
        ConfigFile {
            mode: Some(s.mode),
            max: Some(s.max),
            indicators: Some(s.indicators),
            style: Some(s.style),
            show_in_status_bar: Some(s.show_in_status_bar),
            scroll_behaviour: Some(s.scroll_behaviour),
            auto_show_file_name: Some(s.auto_show_file_name),
            log_file_path: Some(self.log_file_path.clone()),
            scroll_throttle_ms: Some(self.scroll_throttle_ms),
            measure_timeout_ms: self.measure_timeout_ms,
        }
    }
}

/// Default log file path.
///
/// `~/.local/state/sticky-headings/sticky.log` on Unix-like systems, the
/// current directory when no state directory exists.
pub fn default_log_path() -> PathBuf {
    if let Some(state_dir) = dirs::state_dir() {
        state_dir.join("sticky-headings").join("sticky.log")
    } else {
        PathBuf::from("sticky.log")
    }
}

/// Default config file path, `None` without a config directory.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("sticky-headings").join("config.toml"))
}

/// Load the settings file at `path`.
///
/// Returns `Ok(None)` if the file doesn't exist.
///
/// # Errors
///
/// Returns error if the file exists but cannot be read or parsed.
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

/// Which file the settings live in.
///
/// Precedence (highest to lowest):
/// 1. Explicit `config_path` (CLI `--config`)
/// 2. `STICKY_HEADINGS_CONFIG` environment variable
/// 3. Default path
pub fn resolve_config_path(config_path: Option<PathBuf>) -> Option<PathBuf> {
    config_path
        .or_else(|| std::env::var(CONFIG_ENV).ok().map(PathBuf::from))
        .or_else(default_config_path)
}

/// Load the settings file following [`resolve_config_path`] precedence.
///
/// Missing files are not errors.
///
/// # Errors
///
/// Returns error only if a file exists but cannot be read or parsed.
pub fn load_config_with_precedence(
    config_path: Option<PathBuf>,
) -> Result<Option<ConfigFile>, ConfigError> {
    match resolve_config_path(config_path) {
        Some(path) => load_config_file(path),
        None => Ok(None),
    }
}

/// Fill every field missing from the file with its default.
pub fn merge_config(config_file: Option<ConfigFile>) -> ResolvedConfig {
    let defaults = ResolvedConfig::default();

    let Some(config) = config_file else {
        return defaults;
    };

    let d = defaults.settings;
    ResolvedConfig {
        settings: Settings {
            mode: config.mode.unwrap_or(d.mode),
            max: config.max.unwrap_or(d.max),
            indicators: config.indicators.unwrap_or(d.indicators),
            style: config.style.unwrap_or(d.style),
            show_in_status_bar: config.show_in_status_bar.unwrap_or(d.show_in_status_bar),
            scroll_behaviour: config.scroll_behaviour.unwrap_or(d.scroll_behaviour),
            auto_show_file_name: config.auto_show_file_name.unwrap_or(d.auto_show_file_name),
        },
        log_file_path: config.log_file_path.unwrap_or(defaults.log_file_path),
        scroll_throttle_ms: config
            .scroll_throttle_ms
            .unwrap_or(defaults.scroll_throttle_ms),
        measure_timeout_ms: config.measure_timeout_ms.or(defaults.measure_timeout_ms),
    }
}

/// Apply environment variable overrides.
///
/// `STICKY_HEADINGS_MODE` accepts `default` or `concise`; other values are
/// ignored.
pub fn apply_env_overrides(mut config: ResolvedConfig) -> ResolvedConfig {
    if let Ok(mode) = std::env::var(MODE_ENV) {
        match mode.trim() {
            "default" => config.settings.mode = DisplayMode::Default,
            "concise" => config.settings.mode = DisplayMode::Concise,
            other => tracing::warn!(value = other, "ignoring unknown {MODE_ENV}"),
        }
    }
    config
}

/// Apply CLI argument overrides, the highest precedence.
pub fn apply_cli_overrides(
    mut config: ResolvedConfig,
    mode_override: Option<DisplayMode>,
    max_override: Option<usize>,
) -> ResolvedConfig {
    if let Some(mode) = mode_override {
        config.settings.mode = mode;
    }
    if let Some(max) = max_override {
        config.settings.max = max;
    }
    config
}

/// Write the whole settings record to `path`, creating parent directories.
///
/// # Errors
///
/// Returns `ConfigError::WriteError` if serialisation or any write fails.
pub fn save_config_file(path: &Path, config: &ResolvedConfig) -> Result<(), ConfigError> {
    let write_error = |reason: String| ConfigError::WriteError {
        path: path.to_path_buf(),
        reason,
    };

    let contents =
        toml::to_string_pretty(&config.to_config_file()).map_err(|e| write_error(e.to_string()))?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| write_error(e.to_string()))?;
    }
    std::fs::write(path, contents).map_err(|e| write_error(e.to_string()))
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
