//! Configuration module
//!
//! Loads configuration from environment variables.

use std::env;
use std::str::FromStr;

use crate::query::MAX_LIMIT;

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            _ => Err(()),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host
    pub host: String,

    /// Server port
    pub port: u16,

    /// Environment (development, production)
    pub environment: String,

    /// The one API key accepted by the server
    pub api_key: String,

    /// Upper bound for the `limit` list parameter
    pub max_page_limit: u32,

    /// Seed for generated demo statistics
    pub fixture_seed: u64,

    pub log_format: LogFormat,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let host = var("HOST", "127.0.0.1");

        let port = var("PORT", "3000")
            .parse()
            .map_err(|_| ConfigError::InvalidValue("PORT"))?;

        let environment = var("ENVIRONMENT", "development");

        let api_key = var("API_KEY", "api_key_john_123456789");
        if api_key.trim().is_empty() {
            return Err(ConfigError::InvalidValue("API_KEY"));
        }

        let max_page_limit = var("MAX_PAGE_LIMIT", &MAX_LIMIT.to_string())
            .parse()
            .ok()
            .filter(|limit: &u32| *limit >= 1)
            .ok_or(ConfigError::InvalidValue("MAX_PAGE_LIMIT"))?;

        let fixture_seed = var("FIXTURE_SEED", "42")
            .parse()
            .map_err(|_| ConfigError::InvalidValue("FIXTURE_SEED"))?;

        let log_format = var("LOG_FORMAT", "pretty")
            .parse()
            .map_err(|_| ConfigError::InvalidValue("LOG_FORMAT"))?;

        Ok(Self {
            host,
            port,
            environment,
            api_key,
            max_page_limit,
            fixture_seed,
            log_format,
        })
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(&'static str),
}
