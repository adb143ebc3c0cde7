//! # papucho-core: Pricing and Ticket Logic for Papucho POS
//!
//! This crate holds everything a food-truck order needs that is not I/O:
//! the customizable product model, the ingredient-based pricing engine and
//! the fixed-width ticket layouts.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Papucho POS Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 papucho-station (order station)                 │   │
//! │  │    catalog ──► cart ──► confirm order ──► print tickets         │   │
//! │  └───────────────┬─────────────────────────────────┬───────────────┘   │
//! │                  │                                 │                    │
//! │  ┌───────────────▼─────────────────┐   ┌───────────▼───────────────┐   │
//! │  │  ★ papucho-core (THIS CRATE) ★  │   │     papucho-printer       │   │
//! │  │                                 │   │  ESC/POS, cp1252, lpr/TCP │   │
//! │  │  ┌─────────┐  ┌─────────────┐   │   └───────────────────────────┘   │
//! │  │  │  types  │  │   pricing   │   │                                    │
//! │  │  │  money  │  │   catalog   │   │   ┌───────────────────────────┐   │
//! │  │  └─────────┘  └─────────────┘   │   │      papucho-store        │   │
//! │  │  ┌─────────┐  ┌─────────────┐   │   │  JSON catalog, counter,   │   │
//! │  │  │ ticket  │  │ validation  │   │   │  config, ticket backups   │   │
//! │  │  └─────────┘  └─────────────┘   │   └───────────────────────────┘   │
//! │  │                                 │                                    │
//! │  │  NO I/O • NO FILES • NO CLOCK   │                                    │
//! │  └─────────────────────────────────┘                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Ingredient, Order, etc.)
//! - [`money`] - Money type with integer arithmetic
//! - [`catalog`] - Ingredient price lookup and snapshots
//! - [`pricing`] - Unit price, ingredient deltas and totals
//! - [`ticket`] - Kitchen and customer ticket rendering
//! - [`validation`] - Input rules for the station and the catalog editors
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use papucho_core::catalog::CatalogSnapshot;
//! use papucho_core::money::Money;
//! use papucho_core::pricing::compute_unit_price;
//! use papucho_core::types::{IngredientRef, Modifications, Product};
//!
//! let burger = Product {
//!     id: 1,
//!     name: "Hamburguesa".to_string(),
//!     category: "Hamburguesas".to_string(),
//!     base_price: Money::from_major(8800),
//!     description: None,
//!     image: None,
//!     ingredient_refs: vec![IngredientRef::named("Tomáte", 1)],
//! };
//!
//! // Tomáte is not in the catalog, so removing it is free
//! let mods: Modifications = [("Tomáte", 0)].into_iter().collect();
//! let price = compute_unit_price(&burger, Some(&mods), &CatalogSnapshot::empty());
//! assert_eq!(price.to_string(), "$8800.00");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod catalog;
pub mod error;
pub mod money;
pub mod pricing;
pub mod ticket;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use catalog::{CatalogSnapshot, IngredientLookup};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use pricing::PricingOptions;
pub use ticket::{Ticket, TicketConfig, TicketFormatter};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum lines allowed in a single cart.
pub const MAX_CART_ITEMS: usize = 100;

/// Maximum quantity of a single cart line.
///
/// Catches typing 100 instead of 10 at a busy window.
pub const MAX_ITEM_QUANTITY: i64 = 999;
