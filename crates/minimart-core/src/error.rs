//! # Error Types
//!
//! Domain-specific error types for minimart-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  minimart-core errors (this file)                                      │
//! │  ├── CoreError        - Business rule violations                       │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  minimart-db errors (separate crate)                                   │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  HTTP errors (apps/api)                                                │
//! │  └── ApiError         - What the client sees (status + code + message) │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError ← DbError                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use crate::money::Money;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// Each variant is terminal for the request that raised it; the API layer
/// maps it to exactly one status code.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Product does not exist or is inactive.
    ///
    /// An inactive product is indistinguishable from a missing one for
    /// sale purposes.
    #[error("Product not found or inactive: {0}")]
    ProductNotFound(String),

    /// An identity string is not a well-formed id.
    #[error("Invalid {entity} id: {id}")]
    InvalidReference { entity: String, id: String },

    /// Insufficient stock to complete sale.
    ///
    /// ## User Workflow
    /// ```text
    /// Sale line (qty: 3)
    ///      │
    ///      ▼
    /// Check stock: available=2
    ///      │
    ///      ▼
    /// InsufficientStock { name: "Chocolate Milk", available: 2, requested: 3 }
    /// ```
    #[error("Insufficient stock for {name}: available {available}, requested {requested}")]
    InsufficientStock {
        name: String,
        available: i64,
        requested: i64,
    },

    /// Amount tendered does not cover the sale total.
    #[error("Paid amount {paid} is less than total {total}")]
    PaymentInsufficient { total: Money, paid: Money },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Creates an InvalidReference error for a product id.
    pub fn invalid_product_id(id: impl Into<String>) -> Self {
        CoreError::InvalidReference {
            entity: "product".to_string(),
            id: id.into(),
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when request input doesn't meet requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., whitespace in a SKU, non-finite amount).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Duplicate value (e.g., duplicate SKU).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InsufficientStock {
            name: "Chocolate Milk".to_string(),
            available: 2,
            requested: 3,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for Chocolate Milk: available 2, requested 3"
        );

        let err = CoreError::PaymentInsufficient {
            total: Money::from_cents(750),
            paid: Money::from_cents(500),
        };
        assert_eq!(err.to_string(), "Paid amount $5.00 is less than total $7.50");
    }

    #[test]
    fn test_invalid_reference_message() {
        let err = CoreError::invalid_product_id("abc");
        assert_eq!(err.to_string(), "Invalid product id: abc");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "sku".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
