//! Application configuration management
//!
//! This module handles loading and validating configuration from environment variables.
//! All configuration is loaded at startup and validated before the application runs.

use std::env;
use std::sync::LazyLock;

use crate::constants::{log_formats, DEFAULT_DATABASE_MAX_CONNECTIONS, DEFAULT_RUST_LOG};

/// Global application configuration (lazily initialized)
pub static CONFIG: LazyLock<Config> = LazyLock::new(|| {
    Config::from_env().expect("Failed to load configuration from environment")
});

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub telemetry: TelemetryConfig,
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub rust_log: String,
    /// Emit JSON lines instead of human-readable text
    pub json: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Ok(Self {
            database: DatabaseConfig::from_env()?,
            telemetry: TelemetryConfig::from_env()?,
        })
    }
}

impl DatabaseConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            url: env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL".to_string()))?,
            max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .unwrap_or_else(|_| DEFAULT_DATABASE_MAX_CONNECTIONS.to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("DATABASE_MAX_CONNECTIONS".to_string()))?,
        })
    }
}

impl TelemetryConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let format = env::var("LOG_FORMAT").unwrap_or_else(|_| log_formats::TEXT.to_string());

        Ok(Self {
            rust_log: env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_RUST_LOG.to_string()),
            json: parse_log_format(&format)?,
        })
    }
}

/// Returns whether the given `LOG_FORMAT` value selects JSON output
fn parse_log_format(format: &str) -> Result<bool, ConfigError> {
    let format = format.trim().to_ascii_lowercase();
    if !log_formats::ALL.contains(&format.as_str()) {
        return Err(ConfigError::InvalidValue("LOG_FORMAT".to_string()));
    }
    Ok(format == log_formats::JSON)
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(String),

    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}
