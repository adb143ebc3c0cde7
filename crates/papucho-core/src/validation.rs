//! # Validation Module
//!
//! Input validation for the order station and the catalog editors.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Station command (Rust)                                       │
//! │  ├── Customer name, delivery address, quantities                       │
//! │  └── THIS MODULE                                                        │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Store (papucho-store)                                        │
//! │  ├── Unique ingredient names                                           │
//! │  └── Non-negative prices before writing JSON                           │
//! │                                                                         │
//! │  Pricing and ticket rendering never validate: they degrade gracefully  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use papucho_core::validation::{validate_customer_name, validate_quantity};
//!
//! assert_eq!(validate_customer_name("  Juan ").unwrap(), "Juan");
//! assert!(validate_quantity(0).is_err());
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::{MAX_CART_ITEMS, MAX_ITEM_QUANTITY};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

const MAX_NAME_CHARS: usize = 100;
const MAX_ADDRESS_CHARS: usize = 200;

// =============================================================================
// String Validators
// =============================================================================

fn required_trimmed(field: &str, value: &str, max: usize) -> ValidationResult<String> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(value.to_string())
}

/// Validates the customer name entered at confirmation.
///
/// ## Returns
/// The trimmed name.
pub fn validate_customer_name(name: &str) -> ValidationResult<String> {
    required_trimmed("customer_name", name, MAX_NAME_CHARS)
}

/// Validates a delivery address.
///
/// ## Returns
/// The trimmed address.
pub fn validate_delivery_address(address: &str) -> ValidationResult<String> {
    required_trimmed("address", address, MAX_ADDRESS_CHARS)
}

/// Validates a product name.
pub fn validate_product_name(name: &str) -> ValidationResult<String> {
    required_trimmed("product_name", name, MAX_NAME_CHARS)
}

/// Validates an ingredient name.
///
/// Ingredient names are the join key between products and the catalog, so
/// surrounding whitespace is stripped to avoid invisible mismatches.
pub fn validate_ingredient_name(name: &str) -> ValidationResult<String> {
    required_trimmed("ingredient_name", name, MAX_NAME_CHARS)
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a line quantity.
///
/// ## Rules
/// - Must be at least 1
/// - Must not exceed MAX_ITEM_QUANTITY (999)
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if !(1..=MAX_ITEM_QUANTITY).contains(&qty) {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a catalog price (base, extra or removal).
///
/// Zero is allowed: many ingredients are free to remove.
pub fn validate_price(field: &str, price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::MustNotBeNegative {
            field: field.to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Collection Validators
// =============================================================================

/// Validates that one more line fits in the cart.
pub fn validate_cart_size(current_lines: usize) -> ValidationResult<()> {
    if current_lines >= MAX_CART_ITEMS {
        return Err(ValidationError::OutOfRange {
            field: "cart lines".to_string(),
            min: 0,
            max: MAX_CART_ITEMS as i64,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_customer_name() {
        assert_eq!(validate_customer_name("Ana").unwrap(), "Ana");
        assert_eq!(validate_customer_name("  Ana López ").unwrap(), "Ana López");
        assert!(validate_customer_name("").is_err());
        assert!(validate_customer_name("   ").is_err());
        assert!(validate_customer_name(&"ñ".repeat(101)).is_err());
        assert!(validate_customer_name(&"ñ".repeat(100)).is_ok());
    }

    #[test]
    fn test_validate_delivery_address() {
        assert!(validate_delivery_address("Av. Siempre Viva 742").is_ok());
        assert!(matches!(
            validate_delivery_address(" "),
            Err(ValidationError::Required { .. })
        ));
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(999).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(validate_quantity(1000).is_err());
    }

    #[test]
    fn test_validate_price() {
        assert!(validate_price("extra_price", Money::zero()).is_ok());
        assert!(validate_price("extra_price", Money::from_major(500)).is_ok());
        assert!(validate_price("removal_price", Money::from_cents(-1)).is_err());
    }

    #[test]
    fn test_validate_cart_size() {
        assert!(validate_cart_size(0).is_ok());
        assert!(validate_cart_size(MAX_CART_ITEMS - 1).is_ok());
        assert!(validate_cart_size(MAX_CART_ITEMS).is_err());
    }
}
