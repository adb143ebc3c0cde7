//! # Error Types
//!
//! Domain-specific error types for papucho-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  papucho-core errors (this file)                                       │
//! │  ├── CoreError        - Cart and order rule violations                 │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  papucho-store errors (separate crate)                                 │
//! │  └── StoreError       - JSON file failures                             │
//! │                                                                         │
//! │  papucho-printer errors (separate crate)                               │
//! │  └── PrintError       - Transport failures                             │
//! │                                                                         │
//! │  station errors (in app)                                               │
//! │  └── ApiError         - What the operator sees                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Pricing and ticket rendering have no error type at all: a missing catalog
//! entry prices at zero and long text is wrapped or truncated, so both always
//! produce output.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Product cannot be found in the product repository.
    #[error("Product not found: {0}")]
    ProductNotFound(i64),

    /// A cart line id does not exist (removed or never added).
    #[error("Cart line not found: {0}")]
    CartLineNotFound(u64),

    /// Order confirmation was attempted on an empty cart.
    #[error("Cart is empty")]
    EmptyCart,

    /// Cart has exceeded maximum allowed lines.
    #[error("Cart cannot have more than {max} lines")]
    CartTooLarge { max: usize },

    /// Line quantity exceeds maximum allowed.
    #[error("Quantity {requested} exceeds maximum allowed ({max})")]
    QuantityTooLarge { requested: i64, max: i64 },

    /// Per-slot ingredient quantities do not match the product's slots.
    ///
    /// ## When This Occurs
    /// The ingredient editor sends one quantity per `ingredient_ref`; a
    /// stale editor (product edited meanwhile) can send the wrong count.
    #[error("Expected {expected} ingredient quantities, got {actual}")]
    SlotCountMismatch { expected: usize, actual: usize },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when operator input doesn't meet requirements.
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

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },
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
        let err = CoreError::QuantityTooLarge {
            requested: 1000,
            max: 999,
        };
        assert_eq!(err.to_string(), "Quantity 1000 exceeds maximum allowed (999)");
        assert_eq!(CoreError::EmptyCart.to_string(), "Cart is empty");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "customer_name".to_string(),
        };
        assert_eq!(err.to_string(), "customer_name is required");

        let err = ValidationError::MustNotBeNegative {
            field: "extra_price".to_string(),
        };
        assert_eq!(err.to_string(), "extra_price must not be negative");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "address".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
