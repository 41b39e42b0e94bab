//! # Validation Module
//!
//! Input validation utilities for the mini-market POS.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP handler (apps/api)                                      │
//! │  ├── JSON shape and types (serde deserialization)                      │
//! │  └── Wire amount → Money conversion                                    │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE: Business rule validation                        │
//! │  ├── names, SKUs, quantities, prices                                   │
//! │  └── identity strings (malformed vs. not found)                        │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL / CHECK constraints                                      │
//! │  └── UNIQUE(sku)                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use minimart_core::validation::{validate_sku, validate_quantity};
//!
//! validate_sku("A1").unwrap();
//! validate_quantity(3).unwrap();
//! ```

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::{MAX_ITEM_QUANTITY, MAX_SALE_LINES};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

const MAX_SKU_LEN: usize = 50;
const MAX_NAME_LEN: usize = 200;
const MAX_LABEL_LEN: usize = 100;
const MAX_QUERY_LEN: usize = 100;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a SKU (Stock Keeping Unit).
///
/// ## Rules
/// - Must not be empty
/// - At most 50 characters
/// - No whitespace anywhere (scanners and humans disagree about spaces)
///
/// ## Example
/// ```rust
/// use minimart_core::validation::validate_sku;
///
/// assert!(validate_sku("A1").is_ok());
/// assert!(validate_sku("MILK.CHOC/250").is_ok());
/// assert!(validate_sku("").is_err());
/// assert!(validate_sku("has space").is_err());
/// ```
pub fn validate_sku(sku: &str) -> ValidationResult<()> {
    if sku.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "sku".to_string(),
        });
    }

    if sku.chars().count() > MAX_SKU_LEN {
        return Err(ValidationError::TooLong {
            field: "sku".to_string(),
            max: MAX_SKU_LEN,
        });
    }

    if sku.chars().any(char::is_whitespace) {
        return Err(ValidationError::InvalidFormat {
            field: "sku".to_string(),
            reason: "must not contain whitespace".to_string(),
        });
    }

    Ok(())
}

/// Validates a product name.
///
/// ## Rules
/// - Must not be empty after trimming
/// - At most 200 characters
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    validate_name("name", name)
}

/// Validates a student name. Same rules as product names.
pub fn validate_student_name(name: &str) -> ValidationResult<()> {
    validate_name("name", name)
}

fn validate_name(field: &str, name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if name.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(())
}

/// Validates an optional short label (category, barcode, class name, ...).
///
/// `None` always passes. Present values must fit in 100 characters.
pub fn validate_optional_label(field: &str, value: Option<&str>) -> ValidationResult<()> {
    match value {
        Some(v) if v.chars().count() > MAX_LABEL_LEN => Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_LABEL_LEN,
        }),
        _ => Ok(()),
    }
}

/// Validates a search query.
///
/// ## Rules
/// - Can be empty (no filtering)
/// - Maximum 100 characters
///
/// ## Returns
/// The trimmed query, or `None` when nothing is left to search for.
pub fn validate_search_query(query: Option<&str>) -> ValidationResult<Option<String>> {
    let Some(query) = query.map(str::trim) else {
        return Ok(None);
    };

    if query.chars().count() > MAX_QUERY_LEN {
        return Err(ValidationError::TooLong {
            field: "q".to_string(),
            max: MAX_QUERY_LEN,
        });
    }

    if query.is_empty() {
        Ok(None)
    } else {
        Ok(Some(query.to_string()))
    }
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a quantity value.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY (999)
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Sale request line: { product_id, quantity: 5 }                         │
/// │       │                                                                 │
/// │       ▼                                                                 │
/// │  validate_quantity(5) ← THIS FUNCTION                                  │
/// │       │                                                                 │
/// │       ├── qty <= 0? → Error: "quantity must be positive"               │
/// │       │                                                                 │
/// │       ├── qty > 999? → Error: "quantity must be between 1 and 999"     │
/// │       │                                                                 │
/// │       └── OK → Product lookup                                          │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a price.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (free items)
///
/// ## Example
/// ```rust
/// use minimart_core::money::Money;
/// use minimart_core::validation::validate_price;
///
/// assert!(validate_price(Money::from_cents(250)).is_ok());
/// assert!(validate_price(Money::zero()).is_ok());
/// assert!(validate_price(Money::from_cents(-100)).is_err());
/// ```
pub fn validate_price(price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates an initial stock level (>= 0).
pub fn validate_stock(stock: i64) -> ValidationResult<()> {
    if stock < 0 {
        return Err(ValidationError::OutOfRange {
            field: "stock".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates the amount tendered for a sale.
///
/// Zero is allowed: a basket of free items needs no cash.
pub fn validate_paid(paid: Money) -> ValidationResult<()> {
    if paid.is_negative() {
        return Err(ValidationError::OutOfRange {
            field: "paid".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

// =============================================================================
// Collection Validators
// =============================================================================

/// Validates the number of lines in a sale request.
///
/// ## Rules
/// - At least one line
/// - At most MAX_SALE_LINES (100)
pub fn validate_sale_lines(count: usize) -> ValidationResult<()> {
    if count == 0 {
        return Err(ValidationError::Required {
            field: "items".to_string(),
        });
    }

    if count > MAX_SALE_LINES {
        return Err(ValidationError::OutOfRange {
            field: "items".to_string(),
            min: 1,
            max: MAX_SALE_LINES as i64,
        });
    }

    Ok(())
}

// =============================================================================
// Identity Validators
// =============================================================================

/// Validates a UUID string and returns it in canonical form.
///
/// Stores keep ids as lowercase hyphenated UUIDs, so every accepted
/// spelling (uppercase, simple, braced, `urn:uuid:`) is rewritten to that
/// form before it is used as a lookup key.
///
/// ## Example
/// ```rust
/// use minimart_core::validation::validate_uuid;
///
/// let id = validate_uuid("{550E8400-E29B-41D4-A716-446655440000}").unwrap();
/// assert_eq!(id, "550e8400-e29b-41d4-a716-446655440000");
/// assert!(validate_uuid("not-a-uuid").is_err());
/// ```
pub fn validate_uuid(id: &str) -> ValidationResult<String> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }

    let uuid = uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: "id".to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(uuid.hyphenated().to_string())
}

/// Checks that `id` is a well-formed product identity and returns the
/// canonical id to look it up by.
///
/// A malformed id is `CoreError::InvalidReference`, which callers report
/// differently from a well-formed id that matches nothing.
pub fn validate_product_reference(id: &str) -> CoreResult<String> {
    validate_uuid(id).map_err(|_| CoreError::invalid_product_id(id))
}

// =============================================================================
// Unit Tests
// =============================================================================
