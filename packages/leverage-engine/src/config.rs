//! Configuration for embedding the leverage engine.
//!
//! # Usage
//!
//! ```rust,ignore
//! use leverage_engine::config::load_config;
//! use leverage_engine::LeverageCalculator;
//!
//! // Load from default path (leverage-engine.yaml)
//! let config = load_config(None)?;
//! let calculator = LeverageCalculator::from_config(&config.engine)?;
//! ```
//!
//! ```yaml
//! engine:
//!   precision: ${LEVERAGE_PRECISION:-40}
//!   display_scale: 6
//!   leverage_ceiling: "25"
//! observability:
//!   logging:
//!     level: debug
//! ```

use std::str::FromStr;

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::decimal::{DEFAULT_PRECISION, DISPLAY_SCALE, MAX_PRECISION, MIN_PRECISION};
use crate::types::LEVERAGE_CEILING;

/// Default configuration file path.
pub const DEFAULT_CONFIG_PATH: &str = "leverage-engine.yaml";

/// Largest accepted display scale.
const MAX_DISPLAY_SCALE: u32 = 18;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        /// Path to the config file.
        path: String,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// Failed to parse YAML configuration.
    #[error("Failed to parse config YAML: {0}")]
    ParseError(#[from] serde_yaml_bw::Error),

    /// Configuration validation failed.
    #[error("Config validation failed: {0}")]
    ValidationError(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Calculation engine configuration.
    #[serde(default)]
    pub engine: EngineConfig,
    /// Observability configuration.
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

/// Calculation engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Significant digits kept after every decimal operation.
    #[serde(default = "default_precision")]
    pub precision: u64,
    /// Fractional digits of formatted output amounts.
    #[serde(default = "default_display_scale")]
    pub display_scale: u32,
    /// Leverage ceiling as a decimal string; may only lower the hard cap.
    #[serde(default = "default_leverage_ceiling")]
    pub leverage_ceiling: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            precision: default_precision(),
            display_scale: default_display_scale(),
            leverage_ceiling: default_leverage_ceiling(),
        }
    }
}

const fn default_precision() -> u64 {
    DEFAULT_PRECISION
}

const fn default_display_scale() -> u32 {
    DISPLAY_SCALE
}

fn default_leverage_ceiling() -> String {
    LEVERAGE_CEILING.to_string()
}

/// Observability configuration (logging only).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration for the host's subscriber.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level for this crate's target.
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Output format.
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl LoggingConfig {
    /// Filter directive scoping the configured level to this crate.
    #[must_use]
    pub fn env_filter(&self) -> String {
        format!("leverage_engine={}", self.level)
    }

    /// Returns true when the host should emit JSON lines.
    #[must_use]
    pub fn is_json(&self) -> bool {
        self.format.trim().eq_ignore_ascii_case("json")
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

/// Load configuration from a YAML file.
///
/// # Errors
///
/// Returns a `ConfigError` if the file cannot be read, parsed, or validated.
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    let path = path.unwrap_or(DEFAULT_CONFIG_PATH);

    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_string(),
        source: e,
    })?;

    load_config_from_string(&contents)
}

/// Load configuration from a YAML string (useful for testing).
///
/// # Errors
///
/// Returns a `ConfigError` if the YAML cannot be parsed or validated.
pub fn load_config_from_string(yaml: &str) -> Result<Config, ConfigError> {
    let interpolated = interpolate_env_vars(yaml);
    let config: Config = serde_yaml_bw::from_str(&interpolated)?;
    validate_config(&config)?;
    Ok(config)
}

/// Interpolate environment variables in a string.
///
/// Supports both `${VAR}` and `${VAR:-default}` syntax.
#[allow(clippy::expect_used)] // Regex is compile-time constant; expect() is safe here
fn interpolate_env_vars(input: &str) -> String {
    use std::sync::OnceLock;

    static ENV_VAR_REGEX: OnceLock<regex::Regex> = OnceLock::new();

    let re = ENV_VAR_REGEX.get_or_init(|| {
        regex::Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}")
            .expect("env var regex is valid")
    });

    re.replace_all(input, |cap: &regex::Captures<'_>| {
        let default_value = cap.get(2).map(|m| m.as_str());
        match std::env::var(&cap[1]) {
            Ok(v) if !v.is_empty() => v,
            _ => default_value.map_or_else(String::new, str::to_string),
        }
    })
    .into_owned()
}

/// Validate configuration values.
fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let engine = &config.engine;

    if !(MIN_PRECISION..=MAX_PRECISION).contains(&engine.precision) {
        return Err(ConfigError::ValidationError(format!(
            "engine.precision must be within [{MIN_PRECISION}, {MAX_PRECISION}], got {}",
            engine.precision
        )));
    }

    if engine.display_scale > MAX_DISPLAY_SCALE {
        return Err(ConfigError::ValidationError(format!(
            "engine.display_scale must be at most {MAX_DISPLAY_SCALE}, got {}",
            engine.display_scale
        )));
    }

    let ceiling = BigDecimal::from_str(engine.leverage_ceiling.trim()).map_err(|_| {
        ConfigError::ValidationError(format!(
            "engine.leverage_ceiling is not a decimal: {:?}",
            engine.leverage_ceiling
        ))
    })?;
    if ceiling < BigDecimal::from(1) || ceiling > BigDecimal::from(LEVERAGE_CEILING) {
        return Err(ConfigError::ValidationError(format!(
            "engine.leverage_ceiling must be within [1, {LEVERAGE_CEILING}], got {ceiling}"
        )));
    }

    Ok(())
}
