//! # API Error Type
//!
//! Unified error type for station commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Papucho POS                            │
//! │                                                                         │
//! │  Command Function ── Result<T, ApiError>                                │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Store Error?      ─── StoreError::NotFound { .. } ──────┐              │
//! │         │                                                │              │
//! │         ▼                                                ▼              │
//! │  Core Error?       ─── CoreError::EmptyCart ──────────► ApiError        │
//! │         │                                                ▲              │
//! │         ▼                                                │              │
//! │  Print Error?      ─── PrintError::Offline(..) ──────────┘              │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Success ──────────────────────────────────────────────► T              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Print errors rarely surface here: order confirmation reports a failed
//! print as a flag on the result instead of failing the whole order.

use papucho_core::{CoreError, ValidationError};
use papucho_printer::PrintError;
use papucho_store::StoreError;
use serde::Serialize;
use thiserror::Error;

/// API error returned from station commands.
///
/// ## Serialization
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "Product not found: 42"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Error)]
#[serde(rename_all = "camelCase")]
#[error("[{code:?}] {message}")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found
    NotFound,

    /// Input validation failed
    ValidationError,

    /// Data directory read or write failed
    StorageError,

    /// Cart operation failed
    CartError,

    /// Printer transport failed
    PrintError,

    /// Internal error
    Internal,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: impl std::fmt::Display) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }

    /// Creates a cart error.
    pub fn cart(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::CartError, message)
    }
}

/// Converts store errors to API errors.
impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { entity, id } => ApiError::not_found(&entity, id),
            StoreError::Duplicate { field, value } => ApiError::new(
                ErrorCode::ValidationError,
                format!("{} '{}' already exists", field, value),
            ),
            StoreError::Validation(e) => ApiError::validation(e.to_string()),
            e @ (StoreError::Io { .. } | StoreError::Json { .. }) => {
                // Log the path and cause, keep the message short
                tracing::error!(error = %e, "Data directory operation failed");
                ApiError::new(ErrorCode::StorageError, e.to_string())
            }
        }
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ProductNotFound(id) => ApiError::not_found("Product", id),
            CoreError::CartLineNotFound(id) => ApiError::not_found("Cart line", id),
            CoreError::EmptyCart => ApiError::cart("Cart is empty"),
            e @ CoreError::CartTooLarge { .. } => ApiError::cart(e.to_string()),
            e @ (CoreError::QuantityTooLarge { .. } | CoreError::SlotCountMismatch { .. }) => {
                ApiError::validation(e.to_string())
            }
            CoreError::Validation(e) => ApiError::validation(e.to_string()),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

impl From<PrintError> for ApiError {
    fn from(err: PrintError) -> Self {
        ApiError::new(ErrorCode::PrintError, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_not_found_maps_to_not_found() {
        let err: ApiError = StoreError::not_found("Product", 7).into();
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, "Product not found: 7");
    }

    #[test]
    fn test_empty_cart_is_cart_error() {
        let err: ApiError = CoreError::EmptyCart.into();
        assert_eq!(err.code, ErrorCode::CartError);
    }

    #[test]
    fn test_serialized_shape() {
        let err = ApiError::validation("customer name is required");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "VALIDATION_ERROR");
        assert_eq!(json["message"], "customer name is required");
    }
}
