//! Configuration module for the TeamOrg backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::errors::AppError;

/// Storage key the document lives under unless overridden.
pub const DEFAULT_STORAGE_KEY: &str = "teamorg";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to SQLite database file
    pub db_path: PathBuf,
    /// Key of the persisted document inside the database
    pub storage_key: String,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Interval of the read-by ticker; `None` disables it
    pub tick_interval: Option<Duration>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let db_path = env::var("TEAMORG_DB_PATH")
            .unwrap_or_else(|_| "./data/teamorg.sqlite".to_string())
            .into();

        let storage_key =
            env::var("TEAMORG_STORAGE_KEY").unwrap_or_else(|_| DEFAULT_STORAGE_KEY.to_string());
        if storage_key.trim().is_empty() {
            return Err(AppError::Validation(
                "TEAMORG_STORAGE_KEY must not be empty".to_string(),
            ));
        }

        let bind_addr = env::var("TEAMORG_BIND_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8080".to_string())
            .parse()
            .map_err(|e| AppError::Validation(format!("Invalid TEAMORG_BIND_ADDR: {}", e)))?;

        let log_level = env::var("TEAMORG_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let tick_secs: u64 = env::var("TEAMORG_TICK_SECS")
            .unwrap_or_else(|_| "10".to_string())
            .parse()
            .map_err(|e| AppError::Validation(format!("Invalid TEAMORG_TICK_SECS: {}", e)))?;
        let tick_interval = (tick_secs > 0).then(|| Duration::from_secs(tick_secs));

        Ok(Self {
            db_path,
            storage_key,
            bind_addr,
            log_level,
            tick_interval,
        })
    }
}
