//! Shared application state.
//!
//! Handlers receive the store through axum `State`. The store is optional:
//! a server started without `DATABASE_URL` still answers `/` and `/test`,
//! and every store-backed endpoint reports `CONFIGURATION_ERROR`.

use std::sync::Arc;

use minimart_db::{DbConfig, Store};

use crate::config::ApiConfig;
use crate::error::ApiError;

/// State cloned into every handler.
#[derive(Clone)]
pub struct AppState {
    store: Option<Arc<dyn Store>>,
    config: Arc<ApiConfig>,
}

impl AppState {
    /// State backed by a store.
    pub fn new(store: Arc<dyn Store>, config: ApiConfig) -> Self {
        AppState {
            store: Some(store),
            config: Arc::new(config),
        }
    }

    /// State without a store.
    pub fn unconfigured(config: ApiConfig) -> Self {
        AppState {
            store: None,
            config: Arc::new(config),
        }
    }

    /// The store, or `CONFIGURATION_ERROR` when none is attached.
    pub fn store(&self) -> Result<&dyn Store, ApiError> {
        self.store.as_deref().ok_or_else(ApiError::not_configured)
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// File name of the configured SQLite database, if any.
    pub fn database_name(&self) -> Option<String> {
        let url = self.config.database_url.as_deref()?;
        let db_config = DbConfig::from_url(url);
        if db_config.is_in_memory() {
            return Some("memory".to_string());
        }
        db_config
            .database_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use minimart_db::MemoryStore;

    #[test]
    fn test_unconfigured_store() {
        let state = AppState::unconfigured(ApiConfig::default());
        let err = state.store().err().unwrap();
        assert_eq!(err.code, ErrorCode::ConfigurationError);
    }

    #[test]
    fn test_database_name() {
        let config = ApiConfig {
            database_url: Some("sqlite://./data/shop.db".to_string()),
            ..ApiConfig::default()
        };
        let state = AppState::new(Arc::new(MemoryStore::new()), config);
        assert!(state.store().is_ok());
        assert_eq!(state.database_name().as_deref(), Some("shop.db"));

        let state = AppState::unconfigured(ApiConfig::default());
        assert_eq!(state.database_name(), None);
    }
}
