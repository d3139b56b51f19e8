//! Configuration management
//!
//! Loads configuration from config.toml at startup.
//! Every value has a default, so a missing file is not an error.

use crate::core::Resolution;
use crate::field::SeriesField;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable naming the config file
pub const CONFIG_PATH_ENV: &str = "SERIES_CONFIG_PATH";

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Shape of the series managed by the embedding field
    #[serde(default)]
    pub series: SeriesSettings,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Per-field series shape
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SeriesSettings {
    /// Width of each bucket in seconds
    #[serde(default = "default_resolution_seconds")]
    pub resolution_seconds: i64,

    /// Number of buckets retained
    #[serde(default = "default_max_points")]
    pub max_points: usize,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Filter directive used when RUST_LOG is unset
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Directory for daily-rolling JSON log files; console only when unset
    #[serde(default)]
    pub directory: Option<PathBuf>,
}

impl Default for SeriesSettings {
    fn default() -> Self {
        Self {
            resolution_seconds: default_resolution_seconds(),
            max_points: default_max_points(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            directory: None,
        }
    }
}

fn default_resolution_seconds() -> i64 {
    60 // 1 minute
}

fn default_max_points() -> usize {
    60 * 24 // one day of minutes
}

fn default_log_level() -> String {
    "info".to_string()
}

impl SeriesSettings {
    /// Build the embedding field for these settings.
    ///
    /// # Errors
    /// Returns error if the resolution is not positive or capacity is zero.
    pub fn field(&self) -> crate::Result<SeriesField> {
        SeriesField::new(Resolution::from_seconds(self.resolution_seconds)?, self.max_points)
    }
}

impl Config {
    /// Load configuration from the file named by `SERIES_CONFIG_PATH`,
    /// or config.toml.
    ///
    /// If the file doesn't exist, returns default configuration.
    /// # Errors
    /// Returns error if file exists but cannot be read or parsed.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path =
            std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| "config.toml".to_string());
        Self::load_from(config_path)
    }

    /// Load configuration from an explicit path.
    pub fn load_from(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        match std::fs::read_to_string(&path) {
            Ok(contents) => Self::from_toml(&contents),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                // File not found - use defaults
                Ok(Config::default())
            }
            Err(e) => Err(ConfigError::IoError(e)),
        }
    }

    /// Parse configuration from TOML text.
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::ParseError(e.to_string()))
    }
}

/// Configuration loading errors
#[derive(Debug)]
pub enum ConfigError {
    /// IO error reading file
    IoError(std::io::Error),
    /// Parse error (invalid TOML)
    ParseError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError(e) => write!(f, "Failed to read config file: {}", e),
            ConfigError::ParseError(e) => write!(f, "Failed to parse config: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::IoError(e) => Some(e),
            ConfigError::ParseError(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.series.resolution_seconds, 60);
        assert_eq!(config.series.max_points, 1440);
        assert_eq!(config.logging.level, "info");
        assert!(config.logging.directory.is_none());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = Config::from_toml(
            r#"
            [series]
            resolution_seconds = 5
            "#,
        )
        .unwrap();
        assert_eq!(config.series.resolution_seconds, 5);
        assert_eq!(config.series.max_points, 1440);
        assert_eq!(config.logging, LoggingConfig::default());
    }

    #[test]
    fn test_full_toml() {
        let config = Config::from_toml(
            r#"
            [series]
            resolution_seconds = 300
            max_points = 480

            [logging]
            level = "debug"
            directory = "logs"
            "#,
        )
        .unwrap();
        assert_eq!(config.series.max_points, 480);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.directory, Some(PathBuf::from("logs")));
    }

    #[test]
    fn test_invalid_toml() {
        let err = Config::from_toml("[series\nmax_points = ").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
        assert!(err.to_string().starts_with("Failed to parse config"));
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = Config::load_from("does/not/exist/config.toml").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_settings_build_field() {
        let field = SeriesSettings::default().field().unwrap();
        assert_eq!(field.resolution().as_seconds(), 60);
        assert_eq!(field.max_points(), 1440);

        let bad = SeriesSettings {
            resolution_seconds: 0,
            max_points: 10,
        };
        assert!(bad.field().is_err());
    }
}
