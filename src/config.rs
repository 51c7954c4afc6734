//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub dataset: DatasetConfig,

    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Meal dataset location and layout
#[derive(Debug, Clone, Deserialize)]
pub struct DatasetConfig {
    #[serde(default = "default_dataset_path")]
    pub path: String,

    #[serde(default = "default_primary_encoding")]
    pub primary_encoding: String,

    #[serde(default = "default_fallback_encoding")]
    pub fallback_encoding: String,

    #[serde(default = "default_date_column")]
    pub date_column: String,

    #[serde(default = "default_dish_column")]
    pub dish_column: String,

    #[serde(default = "default_calories_column")]
    pub calories_column: String,
}

fn default_dataset_path() -> String {
    "meals_data.csv".to_string()
}

fn default_primary_encoding() -> String {
    "utf-8".to_string()
}

fn default_fallback_encoding() -> String {
    "cp949".to_string()
}

fn default_date_column() -> String {
    "급식일자".to_string()
}

fn default_dish_column() -> String {
    "요리명".to_string()
}

fn default_calories_column() -> String {
    "칼로리정보(Kcal)".to_string()
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            path: default_dataset_path(),
            primary_encoding: default_primary_encoding(),
            fallback_encoding: default_fallback_encoding(),
            date_column: default_date_column(),
            dish_column: default_dish_column(),
            calories_column: default_calories_column(),
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8501
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ApiConfig {
    /// Get the socket address string
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Per-visitor session configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,

    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,

    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,

    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_secs: u64,
}

fn default_cookie_name() -> String {
    "meal_poll_session".to_string()
}

fn default_max_sessions() -> usize {
    10_000
}

fn default_idle_timeout() -> u64 {
    3600 // 1 hour
}

fn default_sweep_interval() -> u64 {
    60
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: default_cookie_name(),
            max_sessions: default_max_sessions(),
            idle_timeout_secs: default_idle_timeout(),
            sweep_interval_secs: default_sweep_interval(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content).map_err(|error| ConfigError::Parse {
            path: path.to_path_buf(),
            error,
        })
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("meal-poll").join("config.toml")),
            Some(PathBuf::from("/etc/meal-poll/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path_opt in config_paths.iter().flatten() {
            if path_opt.exists() {
                match Self::load_with_env(path_opt) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path_opt);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path_opt, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        // Dataset overrides
        if let Ok(path) = std::env::var("MEAL_POLL_DATASET") {
            self.dataset.path = path;
        }
        if let Ok(encoding) = std::env::var("MEAL_POLL_ENCODING") {
            self.dataset.primary_encoding = encoding;
        }
        if let Ok(encoding) = std::env::var("MEAL_POLL_FALLBACK_ENCODING") {
            self.dataset.fallback_encoding = encoding;
        }

        // API overrides
        if let Ok(host) = std::env::var("MEAL_POLL_HOST") {
            self.api.host = host;
        }
        if let Ok(port) = std::env::var("MEAL_POLL_PORT") {
            if let Ok(p) = port.parse() {
                self.api.port = p;
            }
        }

        // Logging overrides
        if let Ok(level) = std::env::var("MEAL_POLL_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("MEAL_POLL_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Meal Poll Configuration
#
# Environment variables override these settings:
# - MEAL_POLL_DATASET
# - MEAL_POLL_ENCODING
# - MEAL_POLL_FALLBACK_ENCODING
# - MEAL_POLL_HOST
# - MEAL_POLL_PORT
# - MEAL_POLL_LOG_LEVEL
# - MEAL_POLL_LOG_FORMAT

[dataset]
# CSV file with the school meal records
path = "meals_data.csv"

# Encoding tried first, and the regional encoding retried on decode failure
primary_encoding = "utf-8"
fallback_encoding = "cp949"

# Column headers
date_column = "급식일자"
dish_column = "요리명"
calories_column = "칼로리정보(Kcal)"

[api]
# HTTP server host
host = "0.0.0.0"

# HTTP server port
port = 8501

[session]
# Cookie carrying the visitor's session id
cookie_name = "meal_poll_session"

# Sessions kept in memory before the least recently seen is evicted
max_sessions = 10000

# Sessions idle longer than this are dropped (seconds)
idle_timeout_secs = 3600

# How often idle sessions are swept (seconds)
sweep_interval_secs = 60

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_korean_headers() {
        let config = Config::default();
        assert_eq!(config.dataset.path, "meals_data.csv");
        assert_eq!(config.dataset.date_column, "급식일자");
        assert_eq!(config.dataset.dish_column, "요리명");
        assert_eq!(config.dataset.calories_column, "칼로리정보(Kcal)");
        assert_eq!(config.api.addr(), "0.0.0.0:8501");
    }

    #[test]
    fn test_generated_config_parses() {
        let config = Config::parse(&generate_default_config()).unwrap();
        assert_eq!(config.dataset.fallback_encoding, "cp949");
        assert_eq!(config.session.max_sessions, 10_000);
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config = Config::parse(
            r#"
[api]
port = 9000
"#,
        )
        .unwrap();

        assert_eq!(config.api.port, 9000);
        assert_eq!(config.api.host, "0.0.0.0");
        assert_eq!(config.session.cookie_name, "meal_poll_session");
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load(Path::new("/nonexistent/meal-poll.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
