//! # HTTP Routes
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  GET  /                              diagnostics::root                  │
//! │  GET  /test                          diagnostics::test_database         │
//! │                                                                         │
//! │  POST /api/products                  products::create_product           │
//! │  GET  /api/products?q=               products::list_products            │
//! │  POST /api/products/{id}/stock       products::update_stock             │
//! │                                                                         │
//! │  POST /api/students                  students::create_student           │
//! │  GET  /api/students?q=               students::list_students            │
//! │                                                                         │
//! │  POST /api/sales                     sales::create_sale                 │
//! │  GET  /api/sales?limit=              sales::list_sales                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod diagnostics;
pub mod products;
pub mod sales;
pub mod students;

use axum::routing::{get, post};
use axum::Router;
use serde::{Deserialize, Serialize};

use crate::state::AppState;

/// `{_id}` returned by create endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct CreatedResponse {
    #[serde(rename = "_id")]
    pub id: String,
}

/// `?q=` on list endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}

/// Routes under `/api`.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/products",
            post(products::create_product).get(products::list_products),
        )
        .route("/products/{id}/stock", post(products::update_stock))
        .route(
            "/students",
            post(students::create_student).get(students::list_students),
        )
        .route("/sales", post(sales::create_sale).get(sales::list_sales))
}
