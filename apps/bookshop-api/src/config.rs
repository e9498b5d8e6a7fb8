//! API server configuration.
//!
//! Configuration is loaded from environment variables with fallback to defaults.
//! A `.env` file, when present, is loaded by `main` before this runs.

use std::env;
use std::net::{IpAddr, SocketAddr};

use bookshop_core::BillingPolicy;
use serde::{Deserialize, Serialize};

/// API server configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Interface to bind
    pub host: IpAddr,

    /// HTTP port
    pub port: u16,

    /// SQLite database file
    pub db_path: String,

    /// Pool size
    pub db_max_connections: u32,

    /// Let a bill commit when a line cannot be covered by stock
    pub allow_backorder: bool,
}

impl ApiConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through `lookup` instead of the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let config = ApiConfig {
            host: var("BOOKSHOP_HOST", "0.0.0.0")
                .parse()
                .map_err(|_| ConfigError::InvalidValue("BOOKSHOP_HOST".to_string()))?,

            port: var("BOOKSHOP_PORT", "8080")
                .parse()
                .map_err(|_| ConfigError::InvalidValue("BOOKSHOP_PORT".to_string()))?,

            db_path: var("BOOKSHOP_DB_PATH", "./data/bookshop.db"),

            db_max_connections: var("BOOKSHOP_DB_MAX_CONNECTIONS", "5")
                .parse()
                .map_err(|_| ConfigError::InvalidValue("BOOKSHOP_DB_MAX_CONNECTIONS".to_string()))?,

            allow_backorder: var("BOOKSHOP_ALLOW_BACKORDER", "false")
                .parse()
                .map_err(|_| ConfigError::InvalidValue("BOOKSHOP_ALLOW_BACKORDER".to_string()))?,
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.db_path.trim().is_empty() {
            return Err(ConfigError::MissingRequired("BOOKSHOP_DB_PATH".to_string()));
        }
        if self.db_max_connections == 0 {
            return Err(ConfigError::InvalidValue(
                "BOOKSHOP_DB_MAX_CONNECTIONS".to_string(),
            ));
        }
        Ok(())
    }

    /// Address the listener binds to.
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn billing_policy(&self) -> BillingPolicy {
        BillingPolicy {
            allow_backorder: self.allow_backorder,
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}
