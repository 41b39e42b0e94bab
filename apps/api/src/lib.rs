//! # Minimart API
//!
//! JSON-over-HTTP backend for the school mini-market point of sale.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Minimart API                                   │
//! │                                                                         │
//! │  ┌────────────────┐  ┌────────────────┐  ┌────────────────────────────┐│
//! │  │  Products      │  │  Students      │  │  Sales                     ││
//! │  │                │  │                │  │                            ││
//! │  │ • Create       │  │ • Create       │  │ • Checkout                 ││
//! │  │ • Search       │  │ • Search       │  │ • Recent sales             ││
//! │  │ • Adjust stock │  │                │  │                            ││
//! │  └────────────────┘  └────────────────┘  └────────────────────────────┘│
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                      Infrastructure                               │  │
//! │  │                                                                   │  │
//! │  │  ┌──────────────┐  ┌──────────────┐  ┌──────────────────────────┐│  │
//! │  │  │  Store       │  │  tower-http  │  │  tracing                 ││  │
//! │  │  │              │  │              │  │                          ││  │
//! │  │  │ SQLite or    │  │ CORS         │  │ EnvFilter                ││  │
//! │  │  │ in-memory    │  │ TraceLayer   │  │ structured fields        ││  │
//! │  │  └──────────────┘  └──────────────┘  └──────────────────────────┘│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//! Environment variables (a `.env` file is read first if present):
//! - `PORT` - HTTP port (default: 8000)
//! - `BIND_ADDR` - Interface to bind (default: 0.0.0.0)
//! - `DATABASE_URL` - SQLite location; unset runs without a store
//! - `DATABASE_MAX_CONNECTIONS` - Pool size (default: 5)
//! - `SALES_LIST_MAX` - Upper bound for `?limit=` on sales (default: 500)
//! - `RUST_LOG` - Log filter (default: `info,minimart=debug,sqlx=warn,tower_http=debug`)

pub mod config;
pub mod error;
pub mod routes;
pub mod services;
pub mod state;

use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

// Re-exports
pub use config::{ApiConfig, ConfigError};
pub use error::{ApiError, ErrorCode};
pub use state::AppState;

/// Builds the full application router (separated from `main` for testing).
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(routes::diagnostics::root))
        .route("/test", get(routes::diagnostics::test_database))
        .nest("/api", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        // The browser front end is served from a different origin
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Initializes the tracing subscriber.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=minimart=trace` - Show trace for minimart crates only
/// - Default: `info,minimart=debug,sqlx=warn,tower_http=debug`
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,minimart=debug,sqlx=warn,tower_http=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}
