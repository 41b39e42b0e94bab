//! # Store Capability
//!
//! The one seam between request handling and persistence.
//!
//! ## Why a Trait?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Arc<dyn Store>                                  │
//! │                              │                                          │
//! │              ┌───────────────┴────────────────┐                         │
//! │              ▼                                ▼                         │
//! │   impl Store for Database          impl Store for MemoryStore          │
//! │   (SQLite, production)             (HashMap + Mutex, tests)            │
//! │                                                                         │
//! │   Handlers receive the store through axum State, never a global.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Both implementations must agree on semantics: SKU uniqueness across
//! active and inactive products, inactive products hidden from lookups,
//! literal case-insensitive search, unconditional stock adjustment, and an
//! all-or-nothing sale commit.

use async_trait::async_trait;

use crate::error::DbResult;
use crate::pool::Database;
use minimart_core::{NewProduct, NewStudent, Product, Sale, SaleDraft, Student};

/// Persistence operations used by the API.
#[async_trait]
pub trait Store: Send + Sync {
    /// Inserts a product. `UniqueViolation` if the SKU is taken.
    async fn insert_product(&self, product: &NewProduct) -> DbResult<Product>;

    /// Finds a product by SKU, active or not.
    async fn find_product_by_sku(&self, sku: &str) -> DbResult<Option<Product>>;

    /// Finds a product that exists AND is active.
    async fn find_active_product(&self, id: &str) -> DbResult<Option<Product>>;

    /// Lists active products, optionally filtered by a substring of
    /// name, SKU or barcode.
    async fn list_active_products(&self, query: Option<&str>) -> DbResult<Vec<Product>>;

    /// Adds `delta` to a product's stock atomically. `NotFound` if no
    /// product has this id, `StockOutOfRange` if the result overflows `i64`.
    /// Does not clamp at zero.
    async fn adjust_stock(&self, id: &str, delta: i64) -> DbResult<Product>;

    /// Inserts a student.
    async fn insert_student(&self, student: &NewStudent) -> DbResult<Student>;

    /// Lists students, optionally filtered by a substring of the name.
    async fn list_students(&self, query: Option<&str>) -> DbResult<Vec<Student>>;

    /// Persists the sale and deducts stock for every line, all or nothing.
    /// `StockConflict` if stock no longer covers a line.
    async fn commit_sale(&self, draft: &SaleDraft) -> DbResult<Sale>;

    /// Most recent sales first, at most `limit`.
    async fn list_sales(&self, limit: u32) -> DbResult<Vec<Sale>>;

    /// Names of the backing collections, for diagnostics.
    async fn collection_names(&self) -> DbResult<Vec<String>>;
}

#[async_trait]
impl Store for Database {
    async fn insert_product(&self, product: &NewProduct) -> DbResult<Product> {
        self.products().insert(product).await
    }

    async fn find_product_by_sku(&self, sku: &str) -> DbResult<Option<Product>> {
        self.products().get_by_sku(sku).await
    }

    async fn find_active_product(&self, id: &str) -> DbResult<Option<Product>> {
        self.products().find_active(id).await
    }

    async fn list_active_products(&self, query: Option<&str>) -> DbResult<Vec<Product>> {
        self.products().list_active(query).await
    }

    async fn adjust_stock(&self, id: &str, delta: i64) -> DbResult<Product> {
        self.products().update_stock(id, delta).await
    }

    async fn insert_student(&self, student: &NewStudent) -> DbResult<Student> {
        self.students().insert(student).await
    }

    async fn list_students(&self, query: Option<&str>) -> DbResult<Vec<Student>> {
        self.students().list(query).await
    }

    async fn commit_sale(&self, draft: &SaleDraft) -> DbResult<Sale> {
        self.sales().commit(draft).await
    }

    async fn list_sales(&self, limit: u32) -> DbResult<Vec<Sale>> {
        self.sales().list_recent(limit).await
    }

    async fn collection_names(&self) -> DbResult<Vec<String>> {
        self.table_names().await
    }
}
