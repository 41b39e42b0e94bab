//! # Domain Types
//!
//! Core domain types used throughout the mini-market POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │      Sale       │   │    Student      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  id (UUID)      │       │
//! │  │  sku (unique)   │   │  items[]  ──────┼─┐ │  name           │       │
//! │  │  price_cents    │   │  total_cents    │ │ │  class_name?    │       │
//! │  │  stock          │   │  paid/change    │ │ │  student_id?    │       │
//! │  │  is_active      │   │  student_ref? ──┼─┼─► (weak reference)│       │
//! │  └─────────────────┘   └─────────────────┘ │ └─────────────────┘       │
//! │           ▲                                │                            │
//! │           │            ┌─────────────────┐ │                            │
//! │           └────────────┤    SaleItem     │◄┘                            │
//! │          (weak ref,    │  name/sku/price │  snapshot frozen at sale     │
//! │           product_id)  │  quantity       │                              │
//! │                        │  subtotal_cents │                              │
//! │                        └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Weak References
//! `SaleItem::product_id` and `Sale::student_ref` are identity strings.
//! Nothing guarantees the referenced record still exists (or ever did, for
//! `student_ref`); readers must not assume they resolve.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Product
// =============================================================================

/// A product available for sale.
///
/// Products are never deleted. Stock moves only through the stock
/// adjustment operation and sale commits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name shown to cashier.
    pub name: String,

    /// Stock Keeping Unit, unique across all products (active or not).
    pub sku: String,

    /// Price in cents (smallest currency unit).
    pub price_cents: i64,

    /// Units on the shelf.
    pub stock: i64,

    /// Free-form category, e.g. "drinks" or "snacks".
    pub category: Option<String>,

    /// Barcode if the item carries one.
    pub barcode: Option<String>,

    /// Inactive products are hidden from listing and cannot be sold.
    pub is_active: bool,

    /// When the product was created.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    /// When the product was last updated.
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }
}

// =============================================================================
// New Product
// =============================================================================

/// Validated input for creating a product.
///
/// The repository assigns `id` and timestamps on insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    pub name: String,
    pub sku: String,
    pub price: Money,
    pub stock: i64,
    pub category: Option<String>,
    pub barcode: Option<String>,
    pub is_active: bool,
}

// =============================================================================
// Student
// =============================================================================

/// A student who buys from the shop. Immutable after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Student {
    pub id: String,
    pub name: String,
    /// Class or grade label, e.g. "7A".
    pub class_name: Option<String>,
    /// School-issued id.
    pub student_id: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

/// Validated input for creating a student.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStudent {
    pub name: String,
    pub class_name: Option<String>,
    pub student_id: Option<String>,
}

// =============================================================================
// Sale Item
// =============================================================================

/// A line item in a sale.
/// Uses snapshot pattern to freeze product data at time of sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct SaleItem {
    /// Product identity at time of sale (weak reference).
    pub product_id: String,
    /// Product name at time of sale (frozen).
    pub name: String,
    /// SKU at time of sale (frozen).
    pub sku: String,
    /// Unit price in cents at time of sale (frozen).
    pub price_cents: i64,
    /// Quantity sold (>= 1).
    pub quantity: i64,
    /// Unit price × quantity.
    pub subtotal_cents: i64,
}

impl SaleItem {
    /// Returns the unit price as Money.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Returns the line subtotal as Money.
    #[inline]
    pub fn subtotal(&self) -> Money {
        Money::from_cents(self.subtotal_cents)
    }
}

// =============================================================================
// Sale
// =============================================================================

/// A committed sale. Sales are immutable once written.
///
/// ## Invariants
/// ```text
/// total_cents  == Σ items[i].subtotal_cents
/// change_cents == paid_cents − total_cents
/// paid_cents   >= total_cents
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Sale {
    pub id: String,
    /// Lines in request order. Stored in their own table, loaded separately.
    #[cfg_attr(feature = "sqlx", sqlx(skip))]
    pub items: Vec<SaleItem>,
    pub total_cents: i64,
    pub paid_cents: i64,
    pub change_cents: i64,
    pub customer_name: Option<String>,
    /// Linked student id (weak reference).
    pub student_ref: Option<String>,
    /// Open enumeration: "cash", "card", "other", ...
    pub payment_method: String,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Sale {
    /// Returns the sale total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }

    /// Returns the amount tendered as Money.
    #[inline]
    pub fn paid(&self) -> Money {
        Money::from_cents(self.paid_cents)
    }

    /// Returns the change handed back as Money.
    #[inline]
    pub fn change(&self) -> Money {
        Money::from_cents(self.change_cents)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn product(stock: i64, is_active: bool) -> Product {
        let now = Utc::now();
        Product {
            id: "7f6c1d7e-5b0e-4d43-9d56-3a1e5c1c2b10".to_string(),
            name: "Chocolate Milk".to_string(),
            sku: "A1".to_string(),
            price_cents: 250,
            stock,
            category: Some("drinks".to_string()),
            barcode: None,
            is_active,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_money_accessors() {
        let item = SaleItem {
            product_id: "p".to_string(),
            name: "Chocolate Milk".to_string(),
            sku: "A1".to_string(),
            price_cents: 250,
            quantity: 3,
            subtotal_cents: 750,
        };
        assert_eq!(item.price(), Money::from_cents(250));
        assert_eq!(item.subtotal(), Money::from_cents(750));
        assert_eq!(product(1, true).price().cents(), 250);
    }

    #[test]
    fn test_sale_json_keeps_cents() {
        let sale = Sale {
            id: "s1".to_string(),
            items: Vec::new(),
            total_cents: 750,
            paid_cents: 1000,
            change_cents: 250,
            customer_name: None,
            student_ref: None,
            payment_method: "cash".to_string(),
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(&sale).unwrap();
        assert_eq!(json["total_cents"], 750);
        assert_eq!(json["payment_method"], "cash");
    }
}
