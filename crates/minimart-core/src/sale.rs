//! # Sale Builder
//!
//! Turns requested lines into a fully priced, not-yet-persisted sale.
//!
//! ## Checkout Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Checkout Pipeline                               │
//! │                                                                         │
//! │  POST /api/sales { items, paid, ... }                                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  for each line (input order):                       READ-ONLY          │
//! │    ├── product_id well-formed?     ── no ──► InvalidReference          │
//! │    ├── product exists AND active?  ── no ──► ProductNotFound           │
//! │    └── SaleBuilder::add_line()  ← THIS MODULE                          │
//! │          ├── quantity 1..=999?     ── no ──► Validation                │
//! │          ├── stock >= cumulative?  ── no ──► InsufficientStock         │
//! │          └── subtotal = price × qty, total += subtotal                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SaleBuilder::finish(paid)                                             │
//! │    ├── paid < total?               ── yes ─► PaymentInsufficient       │
//! │    └── change = paid − total                                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SaleDraft ──► Store::commit_sale()                 READ-WRITE         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The first failing line stops the build; exactly one error comes back and
//! nothing has been written.
//!
//! ## Example
//! ```rust
//! use chrono::Utc;
//! use minimart_core::{Money, Product, SaleBuilder, SaleMetadata};
//!
//! let now = Utc::now();
//! let milk = Product {
//!     id: "7f6c1d7e-5b0e-4d43-9d56-3a1e5c1c2b10".into(),
//!     name: "Chocolate Milk".into(),
//!     sku: "A1".into(),
//!     price_cents: 250,
//!     stock: 10,
//!     category: None,
//!     barcode: None,
//!     is_active: true,
//!     created_at: now,
//!     updated_at: now,
//! };
//!
//! let mut builder = SaleBuilder::new();
//! builder.add_line(&milk, 3).unwrap();
//! let draft = builder
//!     .finish(Money::from_cents(1000), SaleMetadata::default())
//!     .unwrap();
//!
//! assert_eq!(draft.total.cents(), 750);
//! assert_eq!(draft.change.cents(), 250);
//! ```

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{Product, Sale, SaleItem};
use crate::validation::{validate_paid, validate_quantity, validate_sale_lines};
use crate::DEFAULT_PAYMENT_METHOD;

// =============================================================================
// Request Types
// =============================================================================

/// One requested line: which product and how many.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaleLine {
    pub product_id: String,
    pub quantity: i64,
}

/// Optional metadata recorded with a sale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaleMetadata {
    pub customer_name: Option<String>,
    /// Student identity string; stored as given, never resolved.
    pub student_ref: Option<String>,
    pub payment_method: String,
}

impl Default for SaleMetadata {
    fn default() -> Self {
        SaleMetadata {
            customer_name: None,
            student_ref: None,
            payment_method: DEFAULT_PAYMENT_METHOD.to_string(),
        }
    }
}

// =============================================================================
// Sale Draft
// =============================================================================

/// A validated sale ready to commit.
///
/// ## Invariants
/// - `items` is non-empty
/// - `total == Σ items.subtotal`
/// - `paid >= total` and `change == paid − total`
#[derive(Debug, Clone, PartialEq)]
pub struct SaleDraft {
    pub items: Vec<SaleItem>,
    pub total: Money,
    pub paid: Money,
    pub change: Money,
    pub metadata: SaleMetadata,
}

impl SaleDraft {
    /// Requested quantity per product, summed across lines, in first-seen order.
    ///
    /// Used by commit to issue one stock decrement per product.
    pub fn quantities_by_product(&self) -> Vec<(String, i64)> {
        let mut order: Vec<String> = Vec::new();
        let mut totals: HashMap<&str, i64> = HashMap::new();

        for item in &self.items {
            let entry = totals.entry(item.product_id.as_str()).or_insert_with(|| {
                order.push(item.product_id.clone());
                0
            });
            *entry += item.quantity;
        }

        order
            .into_iter()
            .map(|id| {
                let qty = totals.get(id.as_str()).copied().unwrap_or(0);
                (id, qty)
            })
            .collect()
    }

    /// Stamps the draft with its persisted identity.
    pub fn into_sale(self, id: String, created_at: DateTime<Utc>) -> Sale {
        Sale {
            id,
            items: self.items,
            total_cents: self.total.cents(),
            paid_cents: self.paid.cents(),
            change_cents: self.change.cents(),
            customer_name: self.metadata.customer_name,
            student_ref: self.metadata.student_ref,
            payment_method: self.metadata.payment_method,
            created_at,
        }
    }
}

// =============================================================================
// Sale Builder
// =============================================================================

/// Accumulates priced lines against a snapshot of inventory.
///
/// ## Repeated Products
/// The same product may appear on several lines. Stock is checked against
/// the running total requested for that product, not each line alone, so
/// `[A1 × 2, A1 × 2]` against stock 3 fails on the second line.
#[derive(Debug, Default)]
pub struct SaleBuilder {
    items: Vec<SaleItem>,
    requested: HashMap<String, i64>,
    total: Money,
}

impl SaleBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        SaleBuilder::default()
    }

    /// Prices one line against `product` as it was just read from the store.
    ///
    /// ## Errors
    /// - `ProductNotFound` if the product is inactive
    /// - `Validation` if the quantity is outside 1..=999 or money overflows
    /// - `InsufficientStock` if stock cannot cover the cumulative quantity
    pub fn add_line(&mut self, product: &Product, quantity: i64) -> CoreResult<()> {
        validate_quantity(quantity)?;

        if !product.is_active {
            return Err(CoreError::ProductNotFound(product.id.clone()));
        }

        let already = self.requested.get(&product.id).copied().unwrap_or(0);
        let cumulative = already + quantity;
        if product.stock < cumulative {
            return Err(CoreError::InsufficientStock {
                name: product.name.clone(),
                available: product.stock,
                requested: cumulative,
            });
        }

        let subtotal = product
            .price()
            .checked_multiply_quantity(quantity)
            .ok_or_else(|| overflow("subtotal"))?;
        let total = self
            .total
            .checked_add(subtotal)
            .ok_or_else(|| overflow("total"))?;

        self.total = total;
        self.requested.insert(product.id.clone(), cumulative);
        self.items.push(SaleItem {
            product_id: product.id.clone(),
            name: product.name.clone(),
            sku: product.sku.clone(),
            price_cents: product.price_cents,
            quantity,
            subtotal_cents: subtotal.cents(),
        });

        Ok(())
    }

    /// Number of lines added so far.
    pub fn line_count(&self) -> usize {
        self.items.len()
    }

    /// Settles payment and produces the draft.
    ///
    /// ## Errors
    /// - `Validation` if no lines were added or `paid` is negative
    /// - `PaymentInsufficient` if `paid < total`
    pub fn finish(self, paid: Money, metadata: SaleMetadata) -> CoreResult<SaleDraft> {
        validate_sale_lines(self.items.len())?;
        validate_paid(paid)?;

        if paid < self.total {
            return Err(CoreError::PaymentInsufficient {
                total: self.total,
                paid,
            });
        }

        Ok(SaleDraft {
            items: self.items,
            total: self.total,
            paid,
            change: paid - self.total,
            metadata,
        })
    }
}

fn overflow(field: &str) -> CoreError {
    CoreError::Validation(ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: "amount is too large".to_string(),
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn test_product(id: &str, sku: &str, price_cents: i64, stock: i64) -> Product {
        let now = Utc::now();
        Product {
            id: id.to_string(),
            name: format!("Product {}", sku),
            sku: sku.to_string(),
            price_cents,
            stock,
            category: None,
            barcode: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_single_line_sale() {
        let milk = test_product("p1", "A1", 250, 10);
        let mut builder = SaleBuilder::new();
        builder.add_line(&milk, 3).unwrap();

        let draft = builder
            .finish(Money::from_cents(1000), SaleMetadata::default())
            .unwrap();

        assert_eq!(draft.total.cents(), 750);
        assert_eq!(draft.paid.cents(), 1000);
        assert_eq!(draft.change.cents(), 250);
        assert_eq!(draft.items.len(), 1);
        assert_eq!(draft.items[0].subtotal_cents, 750);
        assert_eq!(draft.items[0].sku, "A1");
        assert_eq!(draft.metadata.payment_method, "cash");
    }

    #[test]
    fn test_total_is_sum_of_subtotals() {
        let a = test_product("p1", "A1", 250, 10);
        let b = test_product("p2", "B7", 199, 5);
        let mut builder = SaleBuilder::new();
        builder.add_line(&a, 2).unwrap();
        builder.add_line(&b, 3).unwrap();

        let draft = builder
            .finish(Money::from_cents(1097), SaleMetadata::default())
            .unwrap();

        let sum: i64 = draft.items.iter().map(|i| i.subtotal_cents).sum();
        assert_eq!(draft.total.cents(), sum);
        assert_eq!(draft.total.cents(), 1097);
        assert!(draft.change.is_zero());
    }

    #[test]
    fn test_insufficient_stock_names_product() {
        let milk = test_product("p1", "A1", 250, 2);
        let mut builder = SaleBuilder::new();

        let err = builder.add_line(&milk, 3).unwrap_err();
        match err {
            CoreError::InsufficientStock {
                name,
                available,
                requested,
            } => {
                assert_eq!(name, "Product A1");
                assert_eq!(available, 2);
                assert_eq!(requested, 3);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(builder.line_count(), 0);
    }

    #[test]
    fn test_repeated_product_checks_cumulative_quantity() {
        let milk = test_product("p1", "A1", 250, 3);
        let mut builder = SaleBuilder::new();
        builder.add_line(&milk, 2).unwrap();

        let err = builder.add_line(&milk, 2).unwrap_err();
        assert!(matches!(
            err,
            CoreError::InsufficientStock { requested: 4, .. }
        ));
    }

    #[test]
    fn test_inactive_product_is_not_found() {
        let mut retired = test_product("p1", "A1", 250, 10);
        retired.is_active = false;

        let err = SaleBuilder::new().add_line(&retired, 1).unwrap_err();
        assert!(matches!(err, CoreError::ProductNotFound(id) if id == "p1"));
    }

    #[test]
    fn test_invalid_quantity_rejected() {
        let milk = test_product("p1", "A1", 250, 10);
        let mut builder = SaleBuilder::new();
        assert!(matches!(
            builder.add_line(&milk, 0),
            Err(CoreError::Validation(_))
        ));
        assert!(matches!(
            builder.add_line(&milk, 1000),
            Err(CoreError::Validation(_))
        ));
    }

    #[test]
    fn test_payment_insufficient() {
        let milk = test_product("p1", "A1", 250, 10);
        let mut builder = SaleBuilder::new();
        builder.add_line(&milk, 3).unwrap();

        let err = builder
            .finish(Money::from_cents(500), SaleMetadata::default())
            .unwrap_err();
        assert!(matches!(
            err,
            CoreError::PaymentInsufficient { total, paid }
                if total.cents() == 750 && paid.cents() == 500
        ));
    }

    #[test]
    fn test_empty_sale_rejected() {
        let err = SaleBuilder::new()
            .finish(Money::from_cents(100), SaleMetadata::default())
            .unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[test]
    fn test_free_items_with_zero_paid() {
        let flyer = test_product("p1", "FLYER", 0, 50);
        let mut builder = SaleBuilder::new();
        builder.add_line(&flyer, 5).unwrap();

        let draft = builder.finish(Money::zero(), SaleMetadata::default()).unwrap();
        assert!(draft.total.is_zero());
        assert!(draft.change.is_zero());
    }

    #[test]
    fn test_quantities_by_product_merges_lines() {
        let a = test_product("p1", "A1", 250, 10);
        let b = test_product("p2", "B7", 100, 10);
        let mut builder = SaleBuilder::new();
        builder.add_line(&a, 2).unwrap();
        builder.add_line(&b, 1).unwrap();
        builder.add_line(&a, 3).unwrap();

        let draft = builder
            .finish(Money::from_cents(2000), SaleMetadata::default())
            .unwrap();

        assert_eq!(
            draft.quantities_by_product(),
            vec![("p1".to_string(), 5), ("p2".to_string(), 1)]
        );
        assert_eq!(draft.items.len(), 3);
    }

    #[test]
    fn test_into_sale_keeps_metadata() {
        let milk = test_product("p1", "A1", 250, 10);
        let mut builder = SaleBuilder::new();
        builder.add_line(&milk, 1).unwrap();

        let meta = SaleMetadata {
            customer_name: Some("Ada".to_string()),
            student_ref: Some("not-checked".to_string()),
            payment_method: "card".to_string(),
        };
        let draft = builder.finish(Money::from_cents(250), meta).unwrap();
        let sale = draft.into_sale("s1".to_string(), Utc::now());

        assert_eq!(sale.id, "s1");
        assert_eq!(sale.total_cents, 250);
        assert_eq!(sale.change_cents, 0);
        assert_eq!(sale.customer_name.as_deref(), Some("Ada"));
        assert_eq!(sale.student_ref.as_deref(), Some("not-checked"));
        assert_eq!(sale.payment_method, "card");
    }
}
