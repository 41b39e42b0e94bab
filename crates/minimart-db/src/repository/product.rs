//! # Product Repository
//!
//! Database operations for products.
//!
//! ## Key Operations
//! - Insert with SKU uniqueness
//! - Active-product lookup (what a sale may use)
//! - Case-insensitive substring search over name, SKU and barcode
//! - Atomic, overflow-checked stock adjustment
//!
//! ## Stock Adjustment
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Stock Update Strategy                                │
//! │                                                                         │
//! │  ❌ WRONG: read, compute, write back                                   │
//! │     SELECT stock ... ; UPDATE products SET stock = 7 WHERE id = ?      │
//! │                                                                         │
//! │  ✅ CORRECT: one statement, delta applied in SQL                       │
//! │     UPDATE products SET stock = stock + ?delta WHERE id = ?            │
//! │                                                                         │
//! │  Two clerks restocking (+5, +3) at once always end at +8.             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::{fold_case, like_pattern};
use crate::error::{DbError, DbResult};
use minimart_core::{NewProduct, Product};

/// Column list matching `Product`'s `FromRow` layout.
const PRODUCT_COLUMNS: &str =
    "id, name, sku, price_cents, stock, category, barcode, is_active, created_at, updated_at";

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ProductRepository::new(pool);
///
/// let results = repo.list_active(Some("milk")).await?;
/// let product = repo.find_active("uuid-here").await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Inserts a new product.
    ///
    /// ## Returns
    /// * `Ok(Product)` - Inserted product with generated id and timestamps
    /// * `Err(DbError::UniqueViolation)` - SKU already exists (active or not)
    pub async fn insert(&self, new: &NewProduct) -> DbResult<Product> {
        debug!(sku = %new.sku, "Inserting product");

        let now = Utc::now();
        let product = Product {
            id: generate_product_id(),
            name: new.name.clone(),
            sku: new.sku.clone(),
            price_cents: new.price.cents(),
            stock: new.stock,
            category: new.category.clone(),
            barcode: new.barcode.clone(),
            is_active: new.is_active,
            created_at: now,
            updated_at: now,
        };

        // UNIQUE(sku) still catches a concurrent insert below.
        if self.get_by_sku(&product.sku).await?.is_some() {
            return Err(DbError::duplicate("sku", &product.sku));
        }

        sqlx::query(
            r#"
            INSERT INTO products (
                id, name, sku, price_cents, stock,
                category, barcode, is_active, created_at, updated_at,
                name_folded, sku_folded, barcode_folded
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.sku)
        .bind(product.price_cents)
        .bind(product.stock)
        .bind(&product.category)
        .bind(&product.barcode)
        .bind(product.is_active)
        .bind(product.created_at)
        .bind(product.updated_at)
        .bind(fold_case(&product.name))
        .bind(fold_case(&product.sku))
        .bind(product.barcode.as_deref().map(fold_case))
        .execute(&self.pool)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { .. } => DbError::duplicate("sku", &product.sku),
            other => other,
        })?;

        info!(id = %product.id, sku = %product.sku, "Product created");
        Ok(product)
    }

    /// Gets a product by its ID, active or not.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1");
        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(product)
    }

    /// Gets a product by its SKU, active or not.
    pub async fn get_by_sku(&self, sku: &str) -> DbResult<Option<Product>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE sku = ?1");
        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(sku)
            .fetch_optional(&self.pool)
            .await?;

        Ok(product)
    }

    /// Gets a product only if it exists AND is active.
    ///
    /// This is the lookup a sale uses: inactive and missing look the same.
    pub async fn find_active(&self, id: &str) -> DbResult<Option<Product>> {
        debug!(id = %id, "Looking up active product");

        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1 AND is_active = 1");
        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(product)
    }

    /// Lists active products, optionally filtered by a search term.
    ///
    /// ## How It Works
    /// - `None` → every active product
    /// - `Some(q)` → products whose name, SKU or barcode contains `q`,
    ///   case-insensitively, compared on the Unicode-folded columns
    ///
    /// The term is matched literally; `%` and `_` in user input are escaped.
    /// Results are ordered by name, then SKU.
    pub async fn list_active(&self, query: Option<&str>) -> DbResult<Vec<Product>> {
        debug!(query = ?query, "Listing active products");

        let products = match query {
            None => {
                let sql = format!(
                    "SELECT {PRODUCT_COLUMNS} FROM products WHERE is_active = 1 ORDER BY name, sku"
                );
                sqlx::query_as::<_, Product>(&sql)
                    .fetch_all(&self.pool)
                    .await?
            }
            Some(q) => {
                let sql = format!(
                    r#"
                    SELECT {PRODUCT_COLUMNS} FROM products
                    WHERE is_active = 1
                      AND (name_folded LIKE ?1 ESCAPE '\'
                           OR sku_folded LIKE ?1 ESCAPE '\'
                           OR barcode_folded LIKE ?1 ESCAPE '\')
                    ORDER BY name, sku
                    "#
                );
                sqlx::query_as::<_, Product>(&sql)
                    .bind(like_pattern(q))
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        debug!(count = products.len(), "Listing returned products");
        Ok(products)
    }

    /// Applies a stock delta in one statement and returns the updated product.
    ///
    /// ## Arguments
    /// * `id` - Product ID
    /// * `delta` - Change in stock (negative to remove, positive for restocking)
    ///
    /// Non-negativity is NOT enforced here; a manual correction may take
    /// stock below zero. Sale commits use their own conditional decrement.
    ///
    /// SQLite turns an overflowing integer sum into a REAL, so the update
    /// only applies while `stock + delta` is still an integer.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - No product has this id
    /// * `Err(DbError::StockOutOfRange)` - The sum does not fit in `i64`
    pub async fn update_stock(&self, id: &str, delta: i64) -> DbResult<Product> {
        debug!(id = %id, delta = %delta, "Updating stock");

        let sql = format!(
            r#"
            UPDATE products
            SET stock = stock + ?2, updated_at = ?3
            WHERE id = ?1 AND typeof(stock + ?2) = 'integer'
            RETURNING {PRODUCT_COLUMNS}
            "#
        );
        let updated = sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .bind(delta)
            .bind(Utc::now())
            .fetch_optional(&self.pool)
            .await?;

        let Some(product) = updated else {
            // No row: either the id is unknown or the sum left the integer range
            if self.get_by_id(id).await?.is_some() {
                warn!(id = %id, delta = %delta, "Stock adjustment out of range");
                return Err(DbError::stock_out_of_range(id, delta));
            }
            return Err(DbError::not_found("Product", id));
        };

        info!(id = %id, delta = %delta, stock = product.stock, "Stock adjusted");
        Ok(product)
    }

    /// Counts active products (for diagnostics and the seed binary).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE is_active = 1")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Helper to generate a new product ID.
pub fn generate_product_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use minimart_core::Money;

    fn new_product(sku: &str, name: &str, stock: i64) -> NewProduct {
        NewProduct {
            name: name.to_string(),
            sku: sku.to_string(),
            price: Money::from_cents(250),
            stock,
            category: Some("drinks".to_string()),
            barcode: None,
            is_active: true,
        }
    }

    async fn repo() -> ProductRepository {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.products()
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let repo = repo().await;
        let inserted = repo
            .insert(&new_product("A1", "Chocolate Milk", 10))
            .await
            .unwrap();

        let fetched = repo.get_by_id(&inserted.id).await.unwrap().unwrap();
        assert_eq!(fetched.sku, "A1");
        assert_eq!(fetched.price_cents, 250);
        assert_eq!(fetched.stock, 10);
        assert!(fetched.is_active);

        let by_sku = repo.get_by_sku("A1").await.unwrap().unwrap();
        assert_eq!(by_sku.id, inserted.id);
    }

    #[tokio::test]
    async fn test_duplicate_sku_rejected_even_if_inactive() {
        let repo = repo().await;
        let mut retired = new_product("A1", "Old Milk", 0);
        retired.is_active = false;
        repo.insert(&retired).await.unwrap();

        let err = repo
            .insert(&new_product("A1", "New Milk", 5))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { ref field, .. } if field == "sku"));

        // A novel SKU still succeeds
        repo.insert(&new_product("A2", "New Milk", 5)).await.unwrap();
    }

    #[tokio::test]
    async fn test_find_active_hides_inactive() {
        let repo = repo().await;
        let mut retired = new_product("Z9", "Retired", 4);
        retired.is_active = false;
        let retired = repo.insert(&retired).await.unwrap();

        assert!(repo.find_active(&retired.id).await.unwrap().is_none());
        assert!(repo.get_by_id(&retired.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_list_active_search() {
        let repo = repo().await;
        repo.insert(&new_product("A1", "Chocolate Milk", 10)).await.unwrap();
        repo.insert(&new_product("B2", "Pencil HB", 40)).await.unwrap();
        let mut with_barcode = new_product("C3", "Eraser", 15);
        with_barcode.barcode = Some("5901234123457".to_string());
        repo.insert(&with_barcode).await.unwrap();
        let mut retired = new_product("M4", "Milk Bread", 0);
        retired.is_active = false;
        repo.insert(&retired).await.unwrap();

        assert_eq!(repo.list_active(None).await.unwrap().len(), 3);

        let milk = repo.list_active(Some("MILK")).await.unwrap();
        assert_eq!(milk.len(), 1);
        assert_eq!(milk[0].sku, "A1");

        let by_sku = repo.list_active(Some("b2")).await.unwrap();
        assert_eq!(by_sku[0].name, "Pencil HB");

        let by_barcode = repo.list_active(Some("1234")).await.unwrap();
        assert_eq!(by_barcode[0].sku, "C3");

        // Wildcards are literal
        assert!(repo.list_active(Some("%")).await.unwrap().is_empty());
        assert!(repo.list_active(Some("_")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_active_search_folds_non_ascii() {
        let repo = repo().await;
        repo.insert(&new_product("W1", "Água Mineral", 12)).await.unwrap();
        repo.insert(&new_product("ÇB", "Pão de Queijo", 6)).await.unwrap();

        for query in ["água", "ÁGUA", "mineral"] {
            let found = repo.list_active(Some(query)).await.unwrap();
            assert_eq!(found.len(), 1, "query {query:?}");
            assert_eq!(found[0].sku, "W1");
        }

        let by_sku = repo.list_active(Some("çb")).await.unwrap();
        assert_eq!(by_sku[0].name, "Pão de Queijo");
        assert_eq!(repo.list_active(Some("PÃO")).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_stock() {
        let repo = repo().await;
        let product = repo
            .insert(&new_product("A1", "Chocolate Milk", 10))
            .await
            .unwrap();

        let updated = repo.update_stock(&product.id, 5).await.unwrap();
        assert_eq!(updated.stock, 15);

        let updated = repo.update_stock(&product.id, -20).await.unwrap();
        assert_eq!(updated.stock, -5);
    }

    #[tokio::test]
    async fn test_update_stock_unknown_product() {
        let repo = repo().await;
        let err = repo
            .update_stock(&generate_product_id(), 1)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_update_stock_overflow_leaves_row_untouched() {
        let repo = repo().await;
        let product = repo
            .insert(&new_product("A1", "Chocolate Milk", 10))
            .await
            .unwrap();

        let err = repo.update_stock(&product.id, i64::MAX).await.unwrap_err();
        assert!(matches!(err, DbError::StockOutOfRange { delta, .. } if delta == i64::MAX));

        let after = repo.get_by_id(&product.id).await.unwrap().unwrap();
        assert_eq!(after.stock, 10);

        // The row still decodes and accepts in-range deltas
        let updated = repo.update_stock(&product.id, -10).await.unwrap();
        assert_eq!(updated.stock, 0);
    }
}
