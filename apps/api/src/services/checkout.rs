//! # Checkout Service
//!
//! Turns a sale request into a committed sale.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Checkout Flow                                   │
//! │                                                                         │
//! │  for each line:                                                         │
//! │    product_id well-formed?  ── no ──► INVALID_REFERENCE (400)           │
//! │         │  (canonical lowercase hyphenated form from here on)           │
//! │         ▼                                                               │
//! │    find_active_product      ── none ─► NOT_FOUND (404)                  │
//! │         │                                                               │
//! │         ▼                                                               │
//! │    SaleBuilder::add_line    ── short ► INSUFFICIENT_STOCK (400)         │
//! │                                                                         │
//! │  SaleBuilder::finish(paid)  ── paid < total ► PAYMENT_INSUFFICIENT      │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Store::commit_sale         (one transaction: sale row + decrements)    │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Sale { id, total, paid, change }                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! No stock is touched until every check above has passed. The commit
//! re-checks stock inside its transaction, so a sale that raced another
//! one still fails cleanly.

use tracing::{debug, info};

use minimart_core::validation::{validate_product_reference, validate_sale_lines};
use minimart_core::{CoreError, Money, Sale, SaleBuilder, SaleLine, SaleMetadata};
use minimart_db::Store;

use crate::error::ApiError;

/// A validated checkout request.
#[derive(Debug, Clone)]
pub struct CheckoutRequest {
    pub lines: Vec<SaleLine>,
    pub paid: Money,
    pub metadata: SaleMetadata,
}

/// Prices, validates and commits a sale.
///
/// ## Returns
/// The stored sale, including its generated id.
pub async fn checkout(store: &dyn Store, request: CheckoutRequest) -> Result<Sale, ApiError> {
    debug!(
        lines = request.lines.len(),
        paid = %request.paid,
        "Checkout started"
    );

    validate_sale_lines(request.lines.len())?;

    let mut builder = SaleBuilder::new();
    for line in &request.lines {
        let product_id = validate_product_reference(&line.product_id)?;

        let product = store
            .find_active_product(&product_id)
            .await?
            .ok_or_else(|| CoreError::ProductNotFound(line.product_id.clone()))?;

        builder.add_line(&product, line.quantity)?;
    }

    let draft = builder.finish(request.paid, request.metadata)?;
    let sale = store.commit_sale(&draft).await?;

    info!(
        sale_id = %sale.id,
        total = %sale.total(),
        change = %sale.change(),
        items = sale.items.len(),
        "Checkout complete"
    );

    Ok(sale)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use minimart_core::{NewProduct, Product};
    use minimart_db::MemoryStore;

    async fn stocked(store: &MemoryStore, sku: &str, cents: i64, stock: i64) -> Product {
        store
            .insert_product(&NewProduct {
                name: format!("Item {}", sku),
                sku: sku.to_string(),
                price: Money::from_cents(cents),
                stock,
                category: None,
                barcode: None,
                is_active: true,
            })
            .await
            .unwrap()
    }

    fn request(lines: Vec<(&str, i64)>, paid_cents: i64) -> CheckoutRequest {
        CheckoutRequest {
            lines: lines
                .into_iter()
                .map(|(id, quantity)| SaleLine {
                    product_id: id.to_string(),
                    quantity,
                })
                .collect(),
            paid: Money::from_cents(paid_cents),
            metadata: SaleMetadata::default(),
        }
    }

    #[tokio::test]
    async fn test_checkout_commits_and_deducts() {
        let store = MemoryStore::new();
        let milk = stocked(&store, "A1", 250, 10).await;

        let sale = checkout(&store, request(vec![(milk.id.as_str(), 3)], 1000))
            .await
            .unwrap();

        assert_eq!(sale.total_cents, 750);
        assert_eq!(sale.change_cents, 250);
        assert_eq!(sale.payment_method, "cash");

        let after = store.find_active_product(&milk.id).await.unwrap().unwrap();
        assert_eq!(after.stock, 7);
    }

    #[tokio::test]
    async fn test_second_line_failure_leaves_stock_alone() {
        let store = MemoryStore::new();
        let milk = stocked(&store, "A1", 250, 10).await;
        let pen = stocked(&store, "B2", 100, 1).await;

        let lines = vec![(milk.id.as_str(), 2), (pen.id.as_str(), 5)];
        let err = checkout(&store, request(lines, 10_000))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InsufficientStock);

        let after = store.find_active_product(&milk.id).await.unwrap().unwrap();
        assert_eq!(after.stock, 10);
        assert!(store.list_sales(10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_any_uuid_spelling_finds_the_product() {
        let store = MemoryStore::new();
        let milk = stocked(&store, "A1", 250, 10).await;
        let upper = milk.id.to_uppercase();
        let braced = format!("{{{}}}", milk.id);

        let sale = checkout(&store, request(vec![(upper.as_str(), 1), (braced.as_str(), 2)], 1000))
            .await
            .unwrap();

        assert_eq!(sale.items.len(), 2);
        assert!(sale.items.iter().all(|item| item.product_id == milk.id));
        let after = store.find_active_product(&milk.id).await.unwrap().unwrap();
        assert_eq!(after.stock, 7);
    }

    #[tokio::test]
    async fn test_malformed_id_before_lookup() {
        let store = MemoryStore::new();
        let err = checkout(&store, request(vec![("not-an-id", 1)], 100))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidReference);
        assert_eq!(err.message, "Invalid product id: not-an-id");
    }

    #[tokio::test]
    async fn test_unknown_product_is_not_found() {
        let store = MemoryStore::new();
        let err = checkout(
            &store,
            request(vec![("7b0c7f0e-3c55-4e8a-9f55-3c1d2f9d1a11", 1)], 100),
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_empty_sale_rejected() {
        let store = MemoryStore::new();
        let err = checkout(&store, request(vec![], 100)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[tokio::test]
    async fn test_underpayment_rejected() {
        let store = MemoryStore::new();
        let milk = stocked(&store, "A1", 250, 10).await;

        let err = checkout(&store, request(vec![(milk.id.as_str(), 3)], 500))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::PaymentInsufficient);

        let after = store.find_active_product(&milk.id).await.unwrap().unwrap();
        assert_eq!(after.stock, 10);
    }
}
