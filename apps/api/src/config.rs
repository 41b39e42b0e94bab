//! API configuration module.
//!
//! Configuration is loaded from environment variables with fallback to defaults.
//! `main` calls `dotenvy::dotenv()` first, so a `.env` file next to the
//! binary works too.

use std::env;
use std::net::SocketAddr;

use serde::{Deserialize, Serialize};

/// API server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// HTTP listen port
    pub port: u16,

    /// Interface to bind
    pub bind_addr: String,

    /// SQLite location (`sqlite://path` or a bare path).
    /// `None` runs the server without a store.
    pub database_url: Option<String>,

    /// Connection pool size
    pub database_max_connections: u32,

    /// Upper bound for `GET /api/sales?limit=`
    pub sales_list_max: u32,
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            port: 8000,
            bind_addr: "0.0.0.0".to_string(),
            database_url: None,
            database_max_connections: 5,
            sales_list_max: 500,
        }
    }
}

impl ApiConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let config = ApiConfig {
            port: env::var("PORT")
                .unwrap_or_else(|_| "8000".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("PORT".to_string()))?,

            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0".to_string()),

            // An empty value counts as unset
            database_url: env::var("DATABASE_URL")
                .ok()
                .filter(|url| !url.trim().is_empty()),

            database_max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("DATABASE_MAX_CONNECTIONS".to_string()))?,

            sales_list_max: env::var("SALES_LIST_MAX")
                .unwrap_or_else(|_| "500".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("SALES_LIST_MAX".to_string()))?,
        };

        if config.database_max_connections == 0 {
            return Err(ConfigError::InvalidValue(
                "DATABASE_MAX_CONNECTIONS".to_string(),
            ));
        }
        if config.sales_list_max == 0 {
            return Err(ConfigError::InvalidValue("SALES_LIST_MAX".to_string()));
        }

        Ok(config)
    }

    /// Socket address the server listens on.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.bind_addr, self.port)
            .parse()
            .map_err(|_| ConfigError::InvalidValue("BIND_ADDR".to_string()))
    }

    /// Whether a database location was supplied.
    pub fn has_database(&self) -> bool {
        self.database_url.is_some()
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ApiConfig::default();
        assert_eq!(config.port, 8000);
        assert!(!config.has_database());
        assert_eq!(config.sales_list_max, 500);
        assert_eq!(config.socket_addr().unwrap().port(), 8000);
    }

    #[test]
    fn test_bad_bind_addr() {
        let config = ApiConfig {
            bind_addr: "not an address".to_string(),
            ..ApiConfig::default()
        };
        assert!(matches!(
            config.socket_addr(),
            Err(ConfigError::InvalidValue(name)) if name == "BIND_ADDR"
        ));
    }
}
