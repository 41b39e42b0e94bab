//! # Sale Endpoints
//!
//! ```text
//! POST /api/sales          checkout → {_id, total, paid, change}
//! GET  /api/sales?limit=   most recent sales first (default 50)
//! ```
//!
//! Amounts cross the wire as decimal numbers and are converted to cents
//! once, here. Everything behind this module works in [`Money`].

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::debug;

use minimart_core::validation::validate_optional_label;
use minimart_core::{
    Money, Sale, SaleItem, SaleLine, SaleMetadata, ValidationError, DEFAULT_PAYMENT_METHOD,
};

use crate::error::ApiError;
use crate::services::{checkout, CheckoutRequest};
use crate::state::AppState;

/// Sales returned when `limit` is absent.
pub const DEFAULT_SALES_LIMIT: u32 = 50;

// =============================================================================
// DTOs
// =============================================================================

/// One line of `POST /api/sales`.
#[derive(Debug, Clone, Deserialize)]
pub struct SaleLineRequest {
    pub product_id: String,
    #[serde(default = "default_quantity")]
    pub quantity: i64,
}

fn default_quantity() -> i64 {
    1
}

/// Body of `POST /api/sales`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSaleRequest {
    pub items: Vec<SaleLineRequest>,
    pub paid: f64,
    pub customer_name: Option<String>,
    pub student_ref: Option<String>,
    #[serde(default = "default_payment_method")]
    pub payment_method: String,
}

fn default_payment_method() -> String {
    DEFAULT_PAYMENT_METHOD.to_string()
}

impl CreateSaleRequest {
    /// Converts wire amounts and checks the free-text fields.
    pub fn into_checkout(self) -> Result<CheckoutRequest, ValidationError> {
        let paid = Money::from_major(self.paid)?;
        validate_optional_label("customer_name", self.customer_name.as_deref())?;
        validate_optional_label("student_ref", self.student_ref.as_deref())?;
        validate_optional_label("payment_method", Some(&self.payment_method))?;

        Ok(CheckoutRequest {
            lines: self
                .items
                .into_iter()
                .map(|line| SaleLine {
                    product_id: line.product_id,
                    quantity: line.quantity,
                })
                .collect(),
            paid,
            metadata: SaleMetadata {
                customer_name: self.customer_name,
                student_ref: self.student_ref,
                payment_method: self.payment_method,
            },
        })
    }
}

/// Result of a checkout.
#[derive(Debug, Clone, Serialize)]
pub struct CreateSaleResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub total: f64,
    pub paid: f64,
    pub change: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListSalesParams {
    pub limit: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SaleItemResponse {
    pub product_id: String,
    pub name: String,
    pub sku: String,
    pub price: f64,
    pub quantity: i64,
    pub subtotal: f64,
}

impl From<SaleItem> for SaleItemResponse {
    fn from(item: SaleItem) -> Self {
        SaleItemResponse {
            price: item.price().as_major(),
            subtotal: item.subtotal().as_major(),
            product_id: item.product_id,
            name: item.name,
            sku: item.sku,
            quantity: item.quantity,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SaleResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub items: Vec<SaleItemResponse>,
    pub total: f64,
    pub paid: f64,
    pub change: f64,
    pub customer_name: Option<String>,
    pub student_ref: Option<String>,
    pub payment_method: String,
    pub created_at: String,
}

impl From<Sale> for SaleResponse {
    fn from(sale: Sale) -> Self {
        SaleResponse {
            total: sale.total().as_major(),
            paid: sale.paid().as_major(),
            change: sale.change().as_major(),
            created_at: sale.created_at.to_rfc3339(),
            id: sale.id,
            items: sale.items.into_iter().map(SaleItemResponse::from).collect(),
            customer_name: sale.customer_name,
            student_ref: sale.student_ref,
            payment_method: sale.payment_method,
        }
    }
}

/// Clamps a requested limit into `1..=max`.
fn effective_limit(requested: Option<i64>, max: u32) -> u32 {
    let max = max.max(1);
    match requested {
        None => DEFAULT_SALES_LIMIT.min(max),
        Some(n) => n.clamp(1, i64::from(max)) as u32,
    }
}

// =============================================================================
// Handlers
// =============================================================================

pub async fn create_sale(
    State(state): State<AppState>,
    payload: Result<Json<CreateSaleRequest>, JsonRejection>,
) -> Result<Json<CreateSaleResponse>, ApiError> {
    let store = state.store()?;
    let Json(request) = payload?;
    debug!(lines = request.items.len(), "create_sale");

    let sale = checkout(store, request.into_checkout()?).await?;

    Ok(Json(CreateSaleResponse {
        total: sale.total().as_major(),
        paid: sale.paid().as_major(),
        change: sale.change().as_major(),
        id: sale.id,
    }))
}

pub async fn list_sales(
    State(state): State<AppState>,
    params: Result<Query<ListSalesParams>, QueryRejection>,
) -> Result<Json<Vec<SaleResponse>>, ApiError> {
    let store = state.store()?;
    let Query(params) = params?;
    let limit = effective_limit(params.limit, state.config().sales_list_max);

    let sales = store.list_sales(limit).await?;
    debug!(limit, count = sales.len(), "list_sales");

    Ok(Json(sales.into_iter().map(SaleResponse::from).collect()))
}
