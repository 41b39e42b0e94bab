//! # API Error Type
//!
//! Unified error type for HTTP handlers.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Minimart API                       │
//! │                                                                         │
//! │  Browser                     Rust Backend                               │
//! │  ───────                     ────────────                               │
//! │                                                                         │
//! │  POST /api/sales                                                        │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Handler                                                         │  │
//! │  │  Result<Json<T>, ApiError>                                       │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Store Error? ──── DbError::StockConflict ─────────┐            │  │
//! │  │         │                                          │            │  │
//! │  │         ▼                                          ▼            │  │
//! │  │  Rule Error? ───── CoreError::InsufficientStock ── ApiError ───►│  │
//! │  │         │                                        (IntoResponse) │  │
//! │  │         ▼                                                        │  │
//! │  │  Success ──────────────────────────────────────────────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  ◄──── 400 {"code":"INSUFFICIENT_STOCK","detail":"Insufficient..."}     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Status Codes
//! | Code                   | Status |
//! |------------------------|--------|
//! | `VALIDATION_ERROR`     | 400    |
//! | `INVALID_REFERENCE`    | 400    |
//! | `DUPLICATE_KEY`        | 400    |
//! | `INSUFFICIENT_STOCK`   | 400    |
//! | `PAYMENT_INSUFFICIENT` | 400    |
//! | `NOT_FOUND`            | 404    |
//! | `STORAGE_ERROR`        | 500    |
//! | `CONFIGURATION_ERROR`  | 500    |

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use minimart_core::{CoreError, ValidationError};
use minimart_db::DbError;

/// API error returned from handlers.
///
/// ## Serialization
/// This is what the browser receives when a request fails:
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "detail": "Product not found or inactive"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    #[serde(rename = "detail")]
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Malformed or out-of-range input (400)
    ValidationError,

    /// Identity string is not a well-formed id (400)
    InvalidReference,

    /// Resource missing or inactive (404)
    NotFound,

    /// Unique key already taken (400)
    DuplicateKey,

    /// Requested quantity exceeds stock (400)
    InsufficientStock,

    /// Amount paid is below the total (400)
    PaymentInsufficient,

    /// Store operation failed (500)
    StorageError,

    /// No store configured (500)
    ConfigurationError,
}

impl ErrorCode {
    /// HTTP status for this code.
    pub fn status(self) -> StatusCode {
        match self {
            ErrorCode::ValidationError
            | ErrorCode::InvalidReference
            | ErrorCode::DuplicateKey
            | ErrorCode::InsufficientStock
            | ErrorCode::PaymentInsufficient => StatusCode::BAD_REQUEST,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::StorageError | ErrorCode::ConfigurationError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// The store is not configured.
    pub fn not_configured() -> Self {
        ApiError::new(ErrorCode::ConfigurationError, "Database not configured")
    }

    /// Creates a storage error.
    pub fn storage(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::StorageError, message)
    }
}

/// Converts database errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, .. } => {
                ApiError::new(ErrorCode::NotFound, format!("{} not found", entity))
            }
            DbError::UniqueViolation { field, value } => {
                tracing::debug!(field = %field, value = %value, "Unique key rejected");
                if field == "sku" {
                    ApiError::new(ErrorCode::DuplicateKey, "SKU already exists")
                } else {
                    ApiError::new(ErrorCode::DuplicateKey, format!("{} already exists", field))
                }
            }
            DbError::StockConflict {
                product_id,
                requested,
            } => {
                tracing::warn!(
                    product_id = %product_id,
                    requested,
                    "Stock changed during checkout"
                );
                ApiError::new(
                    ErrorCode::InsufficientStock,
                    format!("Insufficient stock for product {}", product_id),
                )
            }
            DbError::StockOutOfRange { product_id, delta } => {
                tracing::warn!(product_id = %product_id, delta, "Stock adjustment out of range");
                ApiError::validation("Stock adjustment out of range")
            }
            DbError::ConnectionFailed(e) => {
                tracing::error!("Database connection failed: {}", e);
                ApiError::storage("Database connection failed")
            }
            DbError::MigrationFailed(e) => {
                tracing::error!("Database migration failed: {}", e);
                ApiError::storage("Database migration failed")
            }
            DbError::QueryFailed(e) => {
                // Log the actual error but return a generic message
                tracing::error!("Database query failed: {}", e);
                ApiError::storage("Database operation failed")
            }
            DbError::TransactionFailed(e) => {
                tracing::error!("Transaction failed: {}", e);
                ApiError::storage("Database transaction failed")
            }
            DbError::PoolExhausted => ApiError::storage("Database pool exhausted"),
            DbError::Internal(e) => {
                tracing::error!("Internal database error: {}", e);
                ApiError::storage("Database operation failed")
            }
        }
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ProductNotFound(_) => {
                ApiError::new(ErrorCode::NotFound, "Product not found or inactive")
            }
            CoreError::InvalidReference { entity, id } => ApiError::new(
                ErrorCode::InvalidReference,
                format!("Invalid {} id: {}", entity, id),
            ),
            CoreError::InsufficientStock { name, .. } => ApiError::new(
                ErrorCode::InsufficientStock,
                format!("Insufficient stock for {}", name),
            ),
            CoreError::PaymentInsufficient { .. } => ApiError::new(
                ErrorCode::PaymentInsufficient,
                "Paid amount is less than total",
            ),
            CoreError::Validation(e) => e.into(),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::validation(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::validation(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.code.status(), Json(self)).into_response()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;
    use minimart_core::Money;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ErrorCode::InvalidReference.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorCode::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ErrorCode::ConfigurationError.status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_duplicate_sku_message() {
        let err: ApiError = DbError::duplicate("sku", "A1").into();
        assert_eq!(err.code, ErrorCode::DuplicateKey);
        assert_eq!(err.message, "SKU already exists");
    }

    #[test]
    fn test_stock_conflict_is_insufficient_stock() {
        let err: ApiError = DbError::StockConflict {
            product_id: "p1".to_string(),
            requested: 3,
        }
        .into();
        assert_eq!(err.code, ErrorCode::InsufficientStock);
    }

    #[test]
    fn test_stock_out_of_range_is_validation_error() {
        let err: ApiError = DbError::stock_out_of_range("p1", i64::MAX).into();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.code.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "Stock adjustment out of range");
    }

    #[test]
    fn test_core_errors() {
        let err: ApiError = CoreError::invalid_product_id("xyz").into();
        assert_eq!(err.code, ErrorCode::InvalidReference);
        assert_eq!(err.message, "Invalid product id: xyz");

        let err: ApiError = CoreError::PaymentInsufficient {
            total: Money::from_cents(750),
            paid: Money::from_cents(500),
        }
        .into();
        assert_eq!(err.code, ErrorCode::PaymentInsufficient);

        let err: ApiError = CoreError::InsufficientStock {
            name: "Milk".to_string(),
            available: 2,
            requested: 3,
        }
        .into();
        assert_eq!(err.message, "Insufficient stock for Milk");
    }

    #[test]
    fn test_internal_detail_hidden() {
        let err: ApiError = DbError::QueryFailed("no such column: secret".to_string()).into();
        assert_eq!(err.code, ErrorCode::StorageError);
        assert!(!err.message.contains("secret"));
    }

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_value(ApiError::not_configured()).unwrap();
        assert_eq!(json["code"], "CONFIGURATION_ERROR");
        assert_eq!(json["detail"], "Database not configured");
    }
}
