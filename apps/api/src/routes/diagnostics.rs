//! Liveness and store diagnostics.
//!
//! `GET /` never touches the store. `GET /test` reports what the server
//! knows about its database without ever failing the request itself.

use axum::extract::State;
use axum::Json;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::warn;

use crate::state::AppState;

/// Collection names listed at most.
const MAX_COLLECTIONS: usize = 10;

/// Error text kept in the report.
const MAX_ERROR_CHARS: usize = 50;

/// Body of `GET /test`.
#[derive(Debug, Clone, Serialize)]
pub struct DiagnosticsReport {
    pub backend: String,
    pub database: String,
    pub database_url: Option<String>,
    pub database_name: Option<String>,
    pub connection_status: String,
    pub collections: Vec<String>,
}

pub async fn root() -> Json<Value> {
    Json(json!({ "message": "School Mini-Market POS API running" }))
}

pub async fn test_database(State(state): State<AppState>) -> Json<DiagnosticsReport> {
    let mut report = DiagnosticsReport {
        backend: "✅ Running".to_string(),
        database: "⚠️  Available but not initialized".to_string(),
        database_url: None,
        database_name: None,
        connection_status: "Not Connected".to_string(),
        collections: Vec::new(),
    };

    let Ok(store) = state.store() else {
        return Json(report);
    };

    report.database = "✅ Available".to_string();
    report.database_url = Some(
        if state.config().has_database() {
            "✅ Set"
        } else {
            "❌ Not Set"
        }
        .to_string(),
    );
    report.database_name = state.database_name();
    report.connection_status = "Connected".to_string();

    match store.collection_names().await {
        Ok(mut names) => {
            names.truncate(MAX_COLLECTIONS);
            report.collections = names;
            report.database = "✅ Connected & Working".to_string();
        }
        Err(e) => {
            warn!(error = %e, "Store diagnostics failed");
            let detail: String = e.to_string().chars().take(MAX_ERROR_CHARS).collect();
            report.database = format!("⚠️  Connected but Error: {}", detail);
        }
    }

    Json(report)
}
