//! # Minimart API Server
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Startup Sequence                                 │
//! │                                                                         │
//! │  .env ──► ApiConfig::load ──► DATABASE_URL set?                         │
//! │                                   │                                     │
//! │                    ┌──── yes ─────┴───── no ─────┐                      │
//! │                    ▼                             ▼                      │
//! │        Database::new (migrations)       unconfigured state              │
//! │        failure aborts startup           (/ and /test only)              │
//! │                    │                             │                      │
//! │                    └──────────────┬──────────────┘                      │
//! │                                   ▼                                     │
//! │                axum::serve (HTTP :8000) until Ctrl+C / SIGTERM          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use tracing::{info, warn};

use minimart_api::{init_tracing, router, ApiConfig, AppState};
use minimart_db::{Database, DbConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A missing .env file is normal
    let dotenv = dotenvy::dotenv();

    init_tracing();
    info!("Starting Minimart API server...");
    if let Ok(path) = dotenv {
        info!(path = %path.display(), "Loaded .env file");
    }

    let config = ApiConfig::load()?;
    let addr = config.socket_addr()?;
    info!(
        %addr,
        database_configured = config.has_database(),
        sales_list_max = config.sales_list_max,
        "Configuration loaded"
    );

    let (state, database) = match config.database_url.clone() {
        Some(url) => {
            let db_config =
                DbConfig::from_url(&url).max_connections(config.database_max_connections);
            let db = Database::new(db_config).await?;
            info!("Connected to SQLite, migrations complete");
            (AppState::new(Arc::new(db.clone()), config), Some(db))
        }
        None => {
            warn!("DATABASE_URL not set, store-backed endpoints will report a configuration error");
            (AppState::unconfigured(config), None)
        }
    };

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "HTTP server listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(db) = database {
        db.close().await;
    }

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown...");
}
