//! # In-Memory Store
//!
//! A [`Store`] backed by plain collections behind one `Mutex`.
//!
//! Every operation takes the lock once, so each is atomic with respect to
//! the others, mirroring what the SQLite store gets from single statements
//! and transactions. Used by the API tests and handy for demos.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use crate::repository::fold_case;
use crate::store::Store;
use minimart_core::{NewProduct, NewStudent, Product, Sale, SaleDraft, Student};

#[derive(Debug, Default)]
struct Inner {
    /// Insertion order is kept so listings have a stable tie-break.
    products: Vec<Product>,
    /// sku → index into `products`.
    sku_index: HashMap<String, usize>,
    students: Vec<Student>,
    /// Oldest first.
    sales: Vec<Sale>,
}

impl Inner {
    fn product_mut(&mut self, id: &str) -> Option<&mut Product> {
        self.products.iter_mut().find(|p| p.id == id)
    }
}

/// In-process store for tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        MemoryStore::default()
    }

    fn lock(&self) -> DbResult<MutexGuard<'_, Inner>> {
        self.inner
            .lock()
            .map_err(|_| DbError::Internal("memory store lock poisoned".to_string()))
    }
}

fn contains_ci(haystack: &str, needle_folded: &str) -> bool {
    fold_case(haystack).contains(needle_folded)
}

#[async_trait]
impl Store for MemoryStore {
    async fn insert_product(&self, new: &NewProduct) -> DbResult<Product> {
        let mut inner = self.lock()?;

        if inner.sku_index.contains_key(&new.sku) {
            return Err(DbError::duplicate("sku", &new.sku));
        }

        let now = Utc::now();
        let product = Product {
            id: Uuid::new_v4().to_string(),
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

        let index = inner.products.len();
        inner.sku_index.insert(product.sku.clone(), index);
        inner.products.push(product.clone());

        info!(id = %product.id, sku = %product.sku, "Product created");
        Ok(product)
    }

    async fn find_product_by_sku(&self, sku: &str) -> DbResult<Option<Product>> {
        let inner = self.lock()?;
        Ok(inner
            .sku_index
            .get(sku)
            .and_then(|&i| inner.products.get(i))
            .cloned())
    }

    async fn find_active_product(&self, id: &str) -> DbResult<Option<Product>> {
        let inner = self.lock()?;
        Ok(inner
            .products
            .iter()
            .find(|p| p.id == id && p.is_active)
            .cloned())
    }

    async fn list_active_products(&self, query: Option<&str>) -> DbResult<Vec<Product>> {
        debug!(query = ?query, "Listing active products");

        let inner = self.lock()?;
        let needle = query.map(fold_case);

        let mut products: Vec<Product> = inner
            .products
            .iter()
            .filter(|p| p.is_active)
            .filter(|p| match &needle {
                None => true,
                Some(q) => {
                    contains_ci(&p.name, q)
                        || contains_ci(&p.sku, q)
                        || p.barcode.as_deref().is_some_and(|b| contains_ci(b, q))
                }
            })
            .cloned()
            .collect();

        products.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.sku.cmp(&b.sku)));
        Ok(products)
    }

    async fn adjust_stock(&self, id: &str, delta: i64) -> DbResult<Product> {
        let mut inner = self.lock()?;
        let product = inner
            .product_mut(id)
            .ok_or_else(|| DbError::not_found("Product", id))?;

        product.stock = product
            .stock
            .checked_add(delta)
            .ok_or_else(|| DbError::stock_out_of_range(id, delta))?;
        product.updated_at = Utc::now();

        info!(id = %id, delta = %delta, stock = product.stock, "Stock adjusted");
        Ok(product.clone())
    }

    async fn insert_student(&self, new: &NewStudent) -> DbResult<Student> {
        let mut inner = self.lock()?;
        let student = Student {
            id: Uuid::new_v4().to_string(),
            name: new.name.clone(),
            class_name: new.class_name.clone(),
            student_id: new.student_id.clone(),
            created_at: Utc::now(),
        };
        inner.students.push(student.clone());

        info!(id = %student.id, "Student created");
        Ok(student)
    }

    async fn list_students(&self, query: Option<&str>) -> DbResult<Vec<Student>> {
        let inner = self.lock()?;
        let needle = query.map(fold_case);

        let mut students: Vec<Student> = inner
            .students
            .iter()
            .filter(|s| needle.as_deref().map_or(true, |q| contains_ci(&s.name, q)))
            .cloned()
            .collect();

        students.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        Ok(students)
    }

    async fn commit_sale(&self, draft: &SaleDraft) -> DbResult<Sale> {
        let mut inner = self.lock()?;
        let quantities = draft.quantities_by_product();

        // Check every decrement before applying any, so a failure leaves
        // nothing behind.
        for (product_id, quantity) in &quantities {
            let available = inner
                .products
                .iter()
                .find(|p| &p.id == product_id && p.is_active)
                .map(|p| p.stock);

            if available.map_or(true, |stock| stock < *quantity) {
                return Err(DbError::StockConflict {
                    product_id: product_id.clone(),
                    requested: *quantity,
                });
            }
        }

        let now = Utc::now();
        for (product_id, quantity) in &quantities {
            if let Some(product) = inner.product_mut(product_id) {
                product.stock -= quantity;
                product.updated_at = now;
            }
        }

        let sale = draft.clone().into_sale(Uuid::new_v4().to_string(), now);
        inner.sales.push(sale.clone());

        info!(sale_id = %sale.id, total = %draft.total, "Sale committed");
        Ok(sale)
    }

    async fn list_sales(&self, limit: u32) -> DbResult<Vec<Sale>> {
        let inner = self.lock()?;
        Ok(inner
            .sales
            .iter()
            .rev()
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn collection_names(&self) -> DbResult<Vec<String>> {
        Ok(vec![
            "products".to_string(),
            "sale_items".to_string(),
            "sales".to_string(),
            "students".to_string(),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use minimart_core::{Money, SaleBuilder, SaleMetadata};

    fn new_product(sku: &str, name: &str, stock: i64) -> NewProduct {
        NewProduct {
            name: name.to_string(),
            sku: sku.to_string(),
            price: Money::from_cents(250),
            stock,
            category: None,
            barcode: None,
            is_active: true,
        }
    }

    #[tokio::test]
    async fn test_duplicate_sku() {
        let store = MemoryStore::new();
        store.insert_product(&new_product("A1", "Milk", 1)).await.unwrap();

        let err = store
            .insert_product(&new_product("A1", "Other", 1))
            .await
            .unwrap_err();
        assert!(err.is_unique_violation());
    }

    #[tokio::test]
    async fn test_search_is_literal_and_case_insensitive() {
        let store = MemoryStore::new();
        store
            .insert_product(&new_product("A1", "Chocolate Milk", 1))
            .await
            .unwrap();
        store
            .insert_product(&new_product("B2", "Pencil", 1))
            .await
            .unwrap();

        let found = store.list_active_products(Some("mILk")).await.unwrap();
        assert_eq!(found.len(), 1);
        assert!(store
            .list_active_products(Some(".*"))
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_search_folds_non_ascii() {
        let store = MemoryStore::new();
        store
            .insert_product(&new_product("W1", "Água Mineral", 1))
            .await
            .unwrap();

        for query in ["água", "ÁGUA"] {
            let found = store.list_active_products(Some(query)).await.unwrap();
            assert_eq!(found.len(), 1, "query {query:?}");
        }
    }

    #[tokio::test]
    async fn test_adjust_stock_overflow_leaves_product_untouched() {
        let store = MemoryStore::new();
        let a = store.insert_product(&new_product("A1", "Milk", 10)).await.unwrap();

        let err = store.adjust_stock(&a.id, i64::MAX).await.unwrap_err();
        assert!(matches!(err, DbError::StockOutOfRange { delta, .. } if delta == i64::MAX));

        let after = store.find_active_product(&a.id).await.unwrap().unwrap();
        assert_eq!(after.stock, 10);
    }

    #[tokio::test]
    async fn test_commit_is_all_or_nothing() {
        let store = MemoryStore::new();
        let a = store.insert_product(&new_product("A1", "Milk", 5)).await.unwrap();
        let b = store.insert_product(&new_product("B2", "Pen", 5)).await.unwrap();

        let mut builder = SaleBuilder::new();
        builder.add_line(&a, 2).unwrap();
        builder.add_line(&b, 4).unwrap();
        let draft = builder
            .finish(Money::from_cents(10_000), SaleMetadata::default())
            .unwrap();

        // Someone takes pens between build and commit
        store.adjust_stock(&b.id, -3).await.unwrap();

        let err = store.commit_sale(&draft).await.unwrap_err();
        assert!(matches!(err, DbError::StockConflict { .. }));

        let a_after = store.find_active_product(&a.id).await.unwrap().unwrap();
        assert_eq!(a_after.stock, 5);
        assert!(store.list_sales(10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_sales_newest_first() {
        let store = MemoryStore::new();
        let a = store.insert_product(&new_product("A1", "Milk", 10)).await.unwrap();

        for qty in 1..=3 {
            let mut builder = SaleBuilder::new();
            builder.add_line(&a, qty).unwrap();
            let draft = builder
                .finish(Money::from_cents(1000), SaleMetadata::default())
                .unwrap();
            store.commit_sale(&draft).await.unwrap();
        }

        let sales = store.list_sales(2).await.unwrap();
        assert_eq!(sales.len(), 2);
        assert_eq!(sales[0].items[0].quantity, 3);
        assert_eq!(sales[1].items[0].quantity, 2);

        let a_after = store.find_active_product(&a.id).await.unwrap().unwrap();
        assert_eq!(a_after.stock, 4);
    }
}
