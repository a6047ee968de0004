//! services/client/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::path::PathBuf;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    /// Base URL of the remote recipe service.
    pub api_base_url: String,
    pub log_level: Level,
    /// Path of the JSON file standing in for the browser's localStorage.
    pub session_path: PathBuf,
    /// Token lifetime requested at login, in minutes.
    pub token_ttl_mins: u32,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination.
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        let api_base_url =
            std::env::var("API_BASE_URL").unwrap_or_else(|_| "https://dummyjson.com".to_string());
        reqwest::Url::parse(&api_base_url).map_err(|e| {
            ConfigError::InvalidValue("API_BASE_URL".to_string(), e.to_string())
        })?;
        // Trailing slashes would double up when endpoint paths are appended.
        let api_base_url = api_base_url.trim_end_matches('/').to_string();

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let session_path = std::env::var("SESSION_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./session.json"));

        let token_ttl_str = std::env::var("TOKEN_TTL_MINS").unwrap_or_else(|_| "60".to_string());
        let token_ttl_mins = token_ttl_str.parse::<u32>().map_err(|_| {
            ConfigError::InvalidValue(
                "TOKEN_TTL_MINS".to_string(),
                format!("'{}' is not a number of minutes", token_ttl_str),
            )
        })?;

        Ok(Self {
            api_base_url,
            log_level,
            session_path,
            token_ttl_mins,
        })
    }
}
