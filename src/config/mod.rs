//! Configuration module for the assistant console.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::errors::AppError;

/// Default deadline applied to every store call.
pub const DEFAULT_STORE_TIMEOUT_SECS: u64 = 10;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to SQLite database file holding the assistant documents
    pub db_path: PathBuf,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Upper bound on a single store call
    pub store_timeout: Duration,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let db_path = env::var("ASSISTANTS_DB_PATH")
            .unwrap_or_else(|_| "./data/assistants.sqlite".to_string())
            .into();

        let bind_addr = env::var("ASSISTANTS_BIND_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8080".to_string());
        let bind_addr = bind_addr.parse().map_err(|_| {
            AppError::Config(format!("Invalid ASSISTANTS_BIND_ADDR: {}", bind_addr))
        })?;

        let log_level = env::var("ASSISTANTS_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let store_timeout = match env::var("ASSISTANTS_STORE_TIMEOUT_SECS") {
            Ok(raw) => {
                let secs: u64 = raw.trim().parse().map_err(|_| {
                    AppError::Config(format!("Invalid ASSISTANTS_STORE_TIMEOUT_SECS: {}", raw))
                })?;
                if secs == 0 {
                    return Err(AppError::Config(
                        "ASSISTANTS_STORE_TIMEOUT_SECS must be greater than zero".to_string(),
                    ));
                }
                Duration::from_secs(secs)
            }
            Err(_) => Duration::from_secs(DEFAULT_STORE_TIMEOUT_SECS),
        };

        Ok(Self {
            db_path,
            bind_addr,
            log_level,
            store_timeout,
        })
    }
}
