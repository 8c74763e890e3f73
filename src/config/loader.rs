//! Configuration file loading with precedence handling.

use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;

use crate::layout::Pixels;
use crate::logging::DEFAULT_LOG_FILTER;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "LINES_LAYOUT_CONFIG";
/// Environment override for the default line height.
pub const LINE_HEIGHT_ENV_VAR: &str = "LINES_LAYOUT_LINE_HEIGHT";
/// Environment override for the top padding.
pub const PADDING_TOP_ENV_VAR: &str = "LINES_LAYOUT_PADDING_TOP";
/// Environment override for the bottom padding.
pub const PADDING_BOTTOM_ENV_VAR: &str = "LINES_LAYOUT_PADDING_BOTTOM";
/// Environment override for the log filter. `RUST_LOG` still wins.
pub const LOG_FILTER_ENV_VAR: &str = "LINES_LAYOUT_LOG";

/// Errors that can occur during config loading.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Config file path contains invalid UTF-8 or cannot be resolved.
    #[error("Invalid config path: {0}")]
    InvalidPath(String),

    /// Failed to read config file (file may not exist or have permission issues).
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError {
        /// Path that failed to read.
        path: PathBuf,
        /// Reason for failure.
        reason: String,
    },

    /// Config file contains invalid TOML syntax.
    #[error("Invalid TOML in {path}: {reason}")]
    ParseError {
        /// Path with invalid TOML.
        path: PathBuf,
        /// Parse error details.
        reason: String,
    },

    /// An environment override is not a valid pixel amount.
    #[error("Invalid value {value:?} for {name}: expected an integer pixel amount")]
    InvalidEnvValue {
        /// Variable name.
        name: &'static str,
        /// Raw value found in the environment.
        value: String,
    },
}

/// TOML configuration file structure.
///
/// All fields are optional - if not specified, hardcoded defaults are used.
/// Corresponds to `~/.config/lines-layout/config.toml`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Height of lines without a custom override.
    #[serde(default)]
    pub default_line_height: Option<Pixels>,

    /// Space above the first line.
    #[serde(default)]
    pub padding_top: Option<Pixels>,

    /// Space below the last line.
    #[serde(default)]
    pub padding_bottom: Option<Pixels>,

    /// Path to log file for tracing output.
    #[serde(default)]
    pub log_file_path: Option<PathBuf>,

    /// `EnvFilter` directives, e.g. `"lines_layout=debug"`.
    #[serde(default)]
    pub log_filter: Option<String>,
}

/// Resolved configuration after applying precedence rules.
///
/// Created by merging defaults, config file, env vars, and CLI args.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    /// Height of lines without a custom override.
    pub default_line_height: Pixels,
    /// Space above the first line.
    pub padding_top: Pixels,
    /// Space below the last line.
    pub padding_bottom: Pixels,
    /// Path to log file for tracing output.
    pub log_file_path: PathBuf,
    /// `EnvFilter` directives used when `RUST_LOG` is unset.
    pub log_filter: String,
}

/// Line height used when nothing else is configured.
pub const DEFAULT_LINE_HEIGHT: Pixels = 19;

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            default_line_height: DEFAULT_LINE_HEIGHT,
            padding_top: 0,
            padding_bottom: 0,
            log_file_path: default_log_path(),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

/// Resolve default log file path.
///
/// Returns `~/.local/state/lines-layout/lines-layout.log` on Unix-like
/// systems, or the platform equivalent.
///
/// If state directory cannot be determined, falls back to current directory.
pub fn default_log_path() -> PathBuf {
    if let Some(state_dir) = dirs::state_dir() {
        state_dir.join("lines-layout").join("lines-layout.log")
    } else {
        PathBuf::from("lines-layout.log")
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
/// Returns `~/.config/lines-layout/config.toml` on Unix, appropriate path on
/// other platforms. Returns `None` if home directory cannot be determined.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("lines-layout").join("config.toml"))
}

/// Load configuration with precedence handling.
///
/// Precedence (highest to lowest):
/// 1. Explicit `config_path` argument (CLI `--config`)
/// 2. `LINES_LAYOUT_CONFIG` environment variable
/// 3. Default path `~/.config/lines-layout/config.toml`
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

    if let Ok(env_path) = std::env::var(CONFIG_ENV_VAR) {
        if env_path.is_empty() {
            return Err(ConfigError::InvalidPath(format!("{CONFIG_ENV_VAR} is empty")));
        }
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
        default_line_height: config
            .default_line_height
            .unwrap_or(defaults.default_line_height),
        padding_top: config.padding_top.unwrap_or(defaults.padding_top),
        padding_bottom: config.padding_bottom.unwrap_or(defaults.padding_bottom),
        log_file_path: config.log_file_path.unwrap_or(defaults.log_file_path),
        log_filter: config.log_filter.unwrap_or(defaults.log_filter),
    }
}

fn env_pixels(name: &'static str) -> Result<Option<Pixels>, ConfigError> {
    match std::env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidEnvValue { name, value }),
        Err(_) => Ok(None),
    }
}

/// Apply environment variable overrides to resolved config.
///
/// Checks for:
/// - `LINES_LAYOUT_LINE_HEIGHT`
/// - `LINES_LAYOUT_PADDING_TOP`
/// - `LINES_LAYOUT_PADDING_BOTTOM`
/// - `LINES_LAYOUT_LOG` (ignored when blank)
///
/// # Errors
///
/// Returns [`ConfigError::InvalidEnvValue`] when a set variable does not
/// parse as an integer.
pub fn apply_env_overrides(mut config: ResolvedConfig) -> Result<ResolvedConfig, ConfigError> {
    if let Some(line_height) = env_pixels(LINE_HEIGHT_ENV_VAR)? {
        config.default_line_height = line_height;
    }
    if let Some(padding_top) = env_pixels(PADDING_TOP_ENV_VAR)? {
        config.padding_top = padding_top;
    }
    if let Some(padding_bottom) = env_pixels(PADDING_BOTTOM_ENV_VAR)? {
        config.padding_bottom = padding_bottom;
    }
    if let Ok(filter) = std::env::var(LOG_FILTER_ENV_VAR) {
        if !filter.trim().is_empty() {
            config.log_filter = filter;
        }
    }
    Ok(config)
}

/// CLI flags that override every other configuration source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CliOverrides {
    pub line_height: Option<Pixels>,
    pub padding_top: Option<Pixels>,
    pub padding_bottom: Option<Pixels>,
}

/// Apply CLI argument overrides to resolved config.
///
/// Precedence chain: Defaults → Config File → Env Vars → CLI Args (highest)
pub fn apply_cli_overrides(mut config: ResolvedConfig, overrides: CliOverrides) -> ResolvedConfig {
    if let Some(line_height) = overrides.line_height {
        config.default_line_height = line_height;
    }
    if let Some(padding_top) = overrides.padding_top {
        config.padding_top = padding_top;
    }
    if let Some(padding_bottom) = overrides.padding_bottom {
        config.padding_bottom = padding_bottom;
    }
    config
}

/// Run the whole precedence chain.
///
/// # Errors
///
/// Propagates file and environment errors.
pub fn resolve(config_path: Option<PathBuf>, overrides: CliOverrides) -> Result<ResolvedConfig, ConfigError> {
    let config_file = load_config_with_precedence(config_path)?;
    let merged = merge_config(config_file);
    let with_env = apply_env_overrides(merged)?;
    Ok(apply_cli_overrides(with_env, overrides))
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
