//! # minimart-core: Pure Business Logic for the Mini-Market POS
//!
//! This crate holds the rules of the campus shop: how money is represented,
//! what a product, student and sale look like, and how a checkout request
//! becomes a sale whose totals reconcile. It has zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Mini-Market POS Architecture                        │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    apps/api (axum)                              │   │
//! │  │    /api/products, /api/students, /api/sales                     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ minimart-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌─────────────┐ ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │    sale     │ │ validation│  │   │
//! │  │   │  Product  │  │   Money   │  │ SaleBuilder │ │   rules   │  │   │
//! │  │   │   Sale    │  │           │  │  SaleDraft  │ │           │  │   │
//! │  │   └───────────┘  └───────────┘  └─────────────┘ └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  minimart-db (Database Layer)                   │   │
//! │  │         SQLite queries, migrations, Store implementations       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Student, Sale, SaleItem)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`sale`] - Sale builder: line validation, totals and change
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Example Usage
//!
//! ```rust
//! use minimart_core::money::Money;
//!
//! let price = Money::from_cents(250); // $2.50
//! let subtotal = price.checked_multiply_quantity(3);
//! assert_eq!(subtotal.map(|m| m.cents()), Some(750));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod sale;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use sale::{SaleBuilder, SaleDraft, SaleLine, SaleMetadata};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum quantity of a single line in one sale.
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10).
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Maximum number of lines in one sale request.
pub const MAX_SALE_LINES: usize = 100;

/// Payment method recorded when the request does not name one.
pub const DEFAULT_PAYMENT_METHOD: &str = "cash";
