//! # Cart Commands
//!
//! Commands for cart manipulation.
//!
//! ## Cart Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Lifecycle                                       │
//! │                                                                         │
//! │  ┌──────────┐     ┌──────────┐     ┌──────────┐     ┌──────────┐        │
//! │  │  Empty   │────►│ In Cart  │────►│ Customer │────►│ Confirmed│        │
//! │  │  Cart    │     │          │     │ details  │     │  Order   │        │
//! │  └──────────┘     └──────────┘     └──────────┘     └──────────┘        │
//! │                        │                                 │              │
//! │                   add_to_cart                      confirm_order        │
//! │                   update_cart_line                 (order.rs)           │
//! │                   set_line_slots                         │              │
//! │                   remove_from_cart                       ▼              │
//! │                                                   cart cleared          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every response carries engine prices computed against a fresh catalog
//! snapshot, so a price edit in the ingredient catalog shows up on the next
//! cart refresh.

use papucho_core::{CatalogSnapshot, Modifications, Money, PricingOptions};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ApiError;
use crate::state::{Cart, CartState, CartTotals, ConfigState, StoreState};

/// Cart response including lines and totals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartResponse {
    pub lines: Vec<CartLineView>,
    pub totals: CartTotals,
}

/// One priced cart line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartLineView {
    pub id: u64,
    pub product_id: i64,
    pub name: String,
    pub quantity: i64,
    pub modifications: Modifications,
    pub unit_price: Money,
    pub subtotal: Money,
}

impl CartResponse {
    fn build(cart: &Cart, catalog: &CatalogSnapshot, options: &PricingOptions) -> Self {
        let lines = cart
            .lines
            .iter()
            .map(|line| CartLineView {
                id: line.id,
                product_id: line.product.id,
                name: line.product.name.clone(),
                quantity: line.quantity,
                modifications: line.modifications.clone(),
                unit_price: line.unit_price(catalog, options),
                subtotal: line.subtotal(catalog, options),
            })
            .collect();

        CartResponse {
            lines,
            totals: cart.totals(catalog, options),
        }
    }
}

/// Gets the current cart contents.
pub async fn get_cart(
    store: &StoreState,
    cart: &CartState,
    config: &ConfigState,
) -> Result<CartResponse, ApiError> {
    debug!("get_cart command");
    let catalog = store.catalog().await?;
    let options = config.pricing_options();
    Ok(cart.with_cart(|c| CartResponse::build(c, &catalog, &options)))
}

/// Adds a product to the cart.
///
/// ## Behavior
/// - Same product with the same modifications already in cart: quantity
///   increases on that line
/// - Otherwise: added as a new line
/// - The product is "frozen" at time of adding
///
/// ## Arguments
/// * `product_id` - Product to add
/// * `quantity` - Quantity to add (default: 1)
/// * `modifications` - Desired ingredient quantities (default: none)
pub async fn add_to_cart(
    store: &StoreState,
    cart: &CartState,
    config: &ConfigState,
    product_id: i64,
    quantity: Option<i64>,
    modifications: Option<Modifications>,
) -> Result<CartResponse, ApiError> {
    let quantity = quantity.unwrap_or(1);
    debug!(product_id, quantity, "add_to_cart command");

    let product = store.product(product_id).await?;
    let catalog = store.catalog().await?;
    let options = config.pricing_options();

    cart.with_cart_mut(|c| {
        c.add_item(&product, quantity, modifications.unwrap_or_default())?;
        Ok::<_, ApiError>(CartResponse::build(c, &catalog, &options))
    })
}

/// Updates the quantity of a line. Zero or less removes it.
pub async fn update_cart_line(
    store: &StoreState,
    cart: &CartState,
    config: &ConfigState,
    line_id: u64,
    quantity: i64,
) -> Result<CartResponse, ApiError> {
    debug!(line_id, quantity, "update_cart_line command");

    let catalog = store.catalog().await?;
    let options = config.pricing_options();
    cart.with_cart_mut(|c| {
        c.update_quantity(line_id, quantity)?;
        Ok::<_, ApiError>(CartResponse::build(c, &catalog, &options))
    })
}

/// Replaces a line's modifications (name → quantity map).
pub async fn set_line_modifications(
    store: &StoreState,
    cart: &CartState,
    config: &ConfigState,
    line_id: u64,
    modifications: Modifications,
) -> Result<CartResponse, ApiError> {
    debug!(line_id, "set_line_modifications command");

    let catalog = store.catalog().await?;
    let options = config.pricing_options();
    cart.with_cart_mut(|c| {
        c.set_modifications(line_id, modifications)?;
        Ok::<_, ApiError>(CartResponse::build(c, &catalog, &options))
    })
}

/// Applies the ingredient editor's per-slot quantities to a line.
pub async fn set_line_slots(
    store: &StoreState,
    cart: &CartState,
    config: &ConfigState,
    line_id: u64,
    slots: Vec<u32>,
) -> Result<CartResponse, ApiError> {
    debug!(line_id, ?slots, "set_line_slots command");

    let catalog = store.catalog().await?;
    let options = config.pricing_options();
    cart.with_cart_mut(|c| {
        c.set_slot_quantities(line_id, &slots)?;
        Ok::<_, ApiError>(CartResponse::build(c, &catalog, &options))
    })
}

/// Removes a line from the cart.
pub async fn remove_from_cart(
    store: &StoreState,
    cart: &CartState,
    config: &ConfigState,
    line_id: u64,
) -> Result<CartResponse, ApiError> {
    debug!(line_id, "remove_from_cart command");

    let catalog = store.catalog().await?;
    let options = config.pricing_options();
    cart.with_cart_mut(|c| {
        c.remove_line(line_id)?;
        Ok::<_, ApiError>(CartResponse::build(c, &catalog, &options))
    })
}

/// Clears all lines from the cart.
///
/// ## When Used
/// - Operator cancels the order
/// - After an order is confirmed
pub fn clear_cart(cart: &CartState) {
    debug!("clear_cart command");
    cart.with_cart_mut(|c| c.clear());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::{burger_station, COMPLETA, PAPAS};

    #[tokio::test]
    async fn test_add_and_price() {
        let dir = tempfile::tempdir().unwrap();
        let (store, config) = burger_station(&dir).await;
        let cart = CartState::new();

        let mods: Modifications = [("Medallón", 2u32)].into_iter().collect();
        add_to_cart(&store, &cart, &config, COMPLETA, Some(2), Some(mods))
            .await
            .unwrap();
        let response = add_to_cart(&store, &cart, &config, PAPAS, None, None)
            .await
            .unwrap();

        assert_eq!(response.lines.len(), 2);
        assert_eq!(response.lines[0].unit_price, Money::from_major(9800));
        assert_eq!(response.lines[0].subtotal, Money::from_major(19_600));
        assert_eq!(response.totals.total, Money::from_major(23_600));
    }

    #[tokio::test]
    async fn test_slots_then_remove() {
        let dir = tempfile::tempdir().unwrap();
        let (store, config) = burger_station(&dir).await;
        let cart = CartState::new();

        let response = add_to_cart(&store, &cart, &config, COMPLETA, None, None)
            .await
            .unwrap();
        let line_id = response.lines[0].id;

        // Medallón ×1, Tomáte ×0
        let response = set_line_slots(&store, &cart, &config, line_id, vec![1, 0])
            .await
            .unwrap();
        assert_eq!(response.totals.total, Money::from_major(8300));

        let response = remove_from_cart(&store, &cart, &config, line_id)
            .await
            .unwrap();
        assert!(response.lines.is_empty());

        let err = remove_from_cart(&store, &cart, &config, line_id)
            .await
            .unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_zero_quantity_removes_line() {
        let dir = tempfile::tempdir().unwrap();
        let (store, config) = burger_station(&dir).await;
        let cart = CartState::new();

        let response = add_to_cart(&store, &cart, &config, PAPAS, Some(3), None)
            .await
            .unwrap();
        let response = update_cart_line(&store, &cart, &config, response.lines[0].id, 0)
            .await
            .unwrap();
        assert!(response.lines.is_empty());
        assert_eq!(response.totals.total, Money::zero());
    }
}
