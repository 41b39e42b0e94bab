//! # Product Endpoints
//!
//! ```text
//! POST /api/products              create, SKU must be unused     → {_id}
//! GET  /api/products?q=           active products, optional search
//! POST /api/products/{id}/stock   add a (possibly negative) delta → product
//! ```
//!
//! Search is a literal, case-insensitive substring match on name, SKU and
//! barcode. Inactive products never appear in the listing.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use minimart_core::validation::{
    validate_optional_label, validate_price, validate_product_name, validate_search_query,
    validate_sku, validate_stock, validate_uuid,
};
use minimart_core::{Money, NewProduct, Product, ValidationError};

use crate::error::{ApiError, ErrorCode};
use crate::routes::{CreatedResponse, SearchParams};
use crate::state::AppState;

// =============================================================================
// DTOs
// =============================================================================

/// Body of `POST /api/products`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    pub sku: String,
    pub price: f64,
    #[serde(default)]
    pub stock: i64,
    pub category: Option<String>,
    pub barcode: Option<String>,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl CreateProductRequest {
    /// Validates the request and converts the price to cents.
    pub fn into_new_product(self) -> Result<NewProduct, ValidationError> {
        validate_product_name(&self.name)?;
        validate_sku(&self.sku)?;
        let price = Money::from_major(self.price)?;
        validate_price(price)?;
        validate_stock(self.stock)?;
        validate_optional_label("category", self.category.as_deref())?;
        validate_optional_label("barcode", self.barcode.as_deref())?;

        Ok(NewProduct {
            name: self.name.trim().to_string(),
            sku: self.sku,
            price,
            stock: self.stock,
            category: self.category,
            barcode: self.barcode,
            is_active: self.active,
        })
    }
}

/// Body of `POST /api/products/{id}/stock`.
#[derive(Debug, Clone, Deserialize)]
pub struct StockUpdateRequest {
    pub delta: i64,
}

/// Product as the browser sees it.
#[derive(Debug, Clone, Serialize)]
pub struct ProductResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub sku: String,
    pub price: f64,
    pub stock: i64,
    pub category: Option<String>,
    pub barcode: Option<String>,
    pub active: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Product> for ProductResponse {
    fn from(p: Product) -> Self {
        ProductResponse {
            price: p.price().as_major(),
            created_at: p.created_at.to_rfc3339(),
            updated_at: p.updated_at.to_rfc3339(),
            id: p.id,
            name: p.name,
            sku: p.sku,
            stock: p.stock,
            category: p.category,
            barcode: p.barcode,
            active: p.is_active,
        }
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Creates a product. A taken SKU (active or not) is `DUPLICATE_KEY`.
pub async fn create_product(
    State(state): State<AppState>,
    payload: Result<Json<CreateProductRequest>, JsonRejection>,
) -> Result<Json<CreatedResponse>, ApiError> {
    let store = state.store()?;
    let Json(request) = payload?;
    debug!(sku = %request.sku, "create_product");

    let new_product = request.into_new_product()?;

    if store.find_product_by_sku(&new_product.sku).await?.is_some() {
        return Err(ApiError::new(ErrorCode::DuplicateKey, "SKU already exists"));
    }

    let product = store.insert_product(&new_product).await?;
    info!(id = %product.id, sku = %product.sku, "Product created via API");

    Ok(Json(CreatedResponse { id: product.id }))
}

/// Lists active products, filtered by `q` when present.
pub async fn list_products(
    State(state): State<AppState>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<Vec<ProductResponse>>, ApiError> {
    let store = state.store()?;
    let Query(params) = params?;
    let query = validate_search_query(params.q.as_deref())?;

    let products = store.list_active_products(query.as_deref()).await?;
    debug!(query = ?query, count = products.len(), "list_products");

    Ok(Json(products.into_iter().map(ProductResponse::from).collect()))
}

/// Adds `delta` to a product's stock and returns the updated product.
///
/// The adjustment is unconditional: it applies to inactive products and
/// may take stock below zero. Any UUID spelling of the id is accepted.
pub async fn update_stock(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
    payload: Result<Json<StockUpdateRequest>, JsonRejection>,
) -> Result<Json<ProductResponse>, ApiError> {
    let store = state.store()?;

    let product_id = validate_uuid(&product_id)
        .map_err(|_| ApiError::new(ErrorCode::InvalidReference, "Invalid product id"))?;

    let Json(request) = payload?;
    debug!(id = %product_id, delta = request.delta, "update_stock");

    let product = store.adjust_stock(&product_id, request.delta).await?;
    Ok(Json(product.into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> CreateProductRequest {
        CreateProductRequest {
            name: "  Chocolate Milk ".to_string(),
            sku: "A1".to_string(),
            price: 2.5,
            stock: 10,
            category: Some("drinks".to_string()),
            barcode: None,
            active: true,
        }
    }

    #[test]
    fn test_into_new_product() {
        let product = request().into_new_product().unwrap();
        assert_eq!(product.name, "Chocolate Milk");
        assert_eq!(product.price, Money::from_cents(250));
        assert_eq!(product.stock, 10);
    }

    #[test]
    fn test_rejects_bad_input() {
        let mut bad = request();
        bad.price = -1.0;
        assert!(bad.into_new_product().is_err());

        let mut bad = request();
        bad.stock = -3;
        assert!(bad.into_new_product().is_err());

        let mut bad = request();
        bad.sku = "A 1".to_string();
        assert!(bad.into_new_product().is_err());

        let mut bad = request();
        bad.price = f64::NAN;
        assert!(bad.into_new_product().is_err());
    }

    #[test]
    fn test_defaults_from_json() {
        let req: CreateProductRequest =
            serde_json::from_str(r#"{"name":"Pen","sku":"P1","price":1.0}"#).unwrap();
        assert_eq!(req.stock, 0);
        assert!(req.active);
    }
}
