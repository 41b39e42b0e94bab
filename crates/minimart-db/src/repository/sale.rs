//! # Sale Repository
//!
//! Persists validated sales and reads sale history.
//!
//! ## Commit Transaction
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    commit(SaleDraft)                                    │
//! │                                                                         │
//! │  BEGIN                                                                  │
//! │   ├── INSERT INTO sales            (sale row written first)            │
//! │   ├── INSERT INTO sale_items × N   (line_no keeps request order)       │
//! │   ├── for each product in draft:                                       │
//! │   │     UPDATE products SET stock = stock − qty                        │
//! │   │     WHERE id = ? AND is_active = 1 AND stock >= qty                │
//! │   │        │                                                            │
//! │   │        └── 0 rows? ──► ROLLBACK, DbError::StockConflict            │
//! │  COMMIT                                                                 │
//! │                                                                         │
//! │  Either the sale AND every decrement land, or nothing does.            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The conditional `WHERE stock >= qty` closes the gap between the builder's
//! read and this write: two registers selling the last unit cannot both win.

use std::collections::HashMap;

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use minimart_core::{Sale, SaleDraft, SaleItem};

/// A `sale_items` row: the item plus the sale it belongs to.
#[derive(Debug, sqlx::FromRow)]
struct SaleItemRow {
    sale_id: String,
    #[sqlx(flatten)]
    item: SaleItem,
}

/// Repository for sale database operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Writes the sale and deducts stock in one transaction.
    ///
    /// ## Returns
    /// * `Ok(Sale)` - The persisted sale with its new id
    /// * `Err(DbError::StockConflict)` - A decrement found too little stock;
    ///   nothing was written
    pub async fn commit(&self, draft: &SaleDraft) -> DbResult<Sale> {
        let id = generate_sale_id();
        let now = Utc::now();

        debug!(
            sale_id = %id,
            lines = draft.items.len(),
            total = %draft.total,
            "Committing sale"
        );

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO sales (
                id, total_cents, paid_cents, change_cents,
                customer_name, student_ref, payment_method, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&id)
        .bind(draft.total.cents())
        .bind(draft.paid.cents())
        .bind(draft.change.cents())
        .bind(&draft.metadata.customer_name)
        .bind(&draft.metadata.student_ref)
        .bind(&draft.metadata.payment_method)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        for (line_no, item) in draft.items.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO sale_items (
                    sale_id, line_no, product_id, name, sku,
                    price_cents, quantity, subtotal_cents
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                "#,
            )
            .bind(&id)
            .bind(line_no as i64)
            .bind(&item.product_id)
            .bind(&item.name)
            .bind(&item.sku)
            .bind(item.price_cents)
            .bind(item.quantity)
            .bind(item.subtotal_cents)
            .execute(&mut *tx)
            .await?;
        }

        for (product_id, quantity) in draft.quantities_by_product() {
            let result = sqlx::query(
                r#"
                UPDATE products
                SET stock = stock - ?2, updated_at = ?3
                WHERE id = ?1 AND is_active = 1 AND stock >= ?2
                "#,
            )
            .bind(&product_id)
            .bind(quantity)
            .bind(now)
            .execute(&mut *tx)
            .await?;

            if result.rows_affected() == 0 {
                warn!(
                    sale_id = %id,
                    product_id = %product_id,
                    requested = quantity,
                    "Stock changed before commit, rolling back sale"
                );
                tx.rollback()
                    .await
                    .map_err(|e| DbError::TransactionFailed(e.to_string()))?;
                return Err(DbError::StockConflict {
                    product_id,
                    requested: quantity,
                });
            }
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(sale_id = %id, total = %draft.total, "Sale committed");
        Ok(draft.clone().into_sale(id, now))
    }

    /// Returns the most recent `limit` sales, newest first, with their items.
    pub async fn list_recent(&self, limit: u32) -> DbResult<Vec<Sale>> {
        debug!(limit = limit, "Listing recent sales");

        let mut sales = sqlx::query_as::<_, Sale>(
            r#"
            SELECT id, total_cents, paid_cents, change_cents,
                   customer_name, student_ref, payment_method, created_at
            FROM sales
            ORDER BY created_at DESC, rowid DESC
            LIMIT ?1
            "#,
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        if sales.is_empty() {
            return Ok(sales);
        }

        let rows = sqlx::query_as::<_, SaleItemRow>(
            r#"
            SELECT sale_id, product_id, name, sku, price_cents, quantity, subtotal_cents
            FROM sale_items
            WHERE sale_id IN (
                SELECT id FROM sales ORDER BY created_at DESC, rowid DESC LIMIT ?1
            )
            ORDER BY sale_id, line_no
            "#,
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        let mut items_by_sale: HashMap<String, Vec<SaleItem>> = HashMap::new();
        for row in rows {
            items_by_sale.entry(row.sale_id).or_default().push(row.item);
        }

        for sale in &mut sales {
            sale.items = items_by_sale.remove(&sale.id).unwrap_or_default();
        }

        Ok(sales)
    }

    /// Counts all sales (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Generates a new sale ID.
pub fn generate_sale_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use minimart_core::{Money, NewProduct, Product, SaleBuilder, SaleMetadata};

    async fn setup(stock: i64) -> (Database, Product) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let product = db
            .products()
            .insert(&NewProduct {
                name: "Chocolate Milk".to_string(),
                sku: "A1".to_string(),
                price: Money::from_cents(250),
                stock,
                category: Some("drinks".to_string()),
                barcode: None,
                is_active: true,
            })
            .await
            .unwrap();
        (db, product)
    }

    fn draft_for(product: &Product, qty: i64, paid_cents: i64) -> SaleDraft {
        let mut builder = SaleBuilder::new();
        builder.add_line(product, qty).unwrap();
        builder
            .finish(Money::from_cents(paid_cents), SaleMetadata::default())
            .unwrap()
    }

    #[tokio::test]
    async fn test_commit_deducts_stock() {
        let (db, product) = setup(10).await;
        let draft = draft_for(&product, 3, 1000);

        let sale = db.sales().commit(&draft).await.unwrap();
        assert_eq!(sale.total_cents, 750);
        assert_eq!(sale.change_cents, 250);

        let after = db.products().get_by_id(&product.id).await.unwrap().unwrap();
        assert_eq!(after.stock, 7);
        assert_eq!(db.sales().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_commit_rolls_back_on_stock_conflict() {
        let (db, product) = setup(5).await;
        // Builder saw 5 units...
        let draft = draft_for(&product, 4, 1000);
        // ...but a manual adjustment took 3 of them before commit.
        db.products().update_stock(&product.id, -3).await.unwrap();

        let err = db.sales().commit(&draft).await.unwrap_err();
        assert!(matches!(err, DbError::StockConflict { requested: 4, .. }));

        let after = db.products().get_by_id(&product.id).await.unwrap().unwrap();
        assert_eq!(after.stock, 2);
        assert_eq!(db.sales().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_list_recent_newest_first_with_items() {
        let (db, product) = setup(20).await;
        let first = db.sales().commit(&draft_for(&product, 1, 250)).await.unwrap();
        let second = db.sales().commit(&draft_for(&product, 2, 500)).await.unwrap();

        let sales = db.sales().list_recent(50).await.unwrap();
        assert_eq!(sales.len(), 2);
        assert_eq!(sales[0].id, second.id);
        assert_eq!(sales[1].id, first.id);
        assert_eq!(sales[0].items.len(), 1);
        assert_eq!(sales[0].items[0].quantity, 2);
        assert_eq!(sales[0].items[0].sku, "A1");

        let limited = db.sales().list_recent(1).await.unwrap();
        assert_eq!(limited.len(), 1);
        assert_eq!(limited[0].id, second.id);
    }
}
