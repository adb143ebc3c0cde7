//! # Cart State
//!
//! The order being taken at the window.
//!
//! ## Thread Safety
//! The cart is wrapped in `Arc<Mutex<T>>` because several commands touch it
//! and only one may modify it at a time.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart State Operations                                │
//! │                                                                         │
//! │  Operator Action          Command                  Cart State Change    │
//! │  ───────────────          ───────                  ─────────────────    │
//! │                                                                         │
//! │  Pick product ──────────► add_to_cart() ─────────► lines.push(line)     │
//! │                                                    (or merge, see below)│
//! │  Change quantity ───────► update_cart_line() ────► line.quantity = n    │
//! │                                                                         │
//! │  Ingredient editor ─────► set_line_slots() ──────► line.modifications   │
//! │                                                                         │
//! │  Remove ────────────────► remove_from_cart() ────► lines.remove(i)      │
//! │                                                                         │
//! │  Order confirmed ───────► clear_cart() ──────────► lines.clear()        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Lines are addressed by a cart-local id, not by product: the same burger
//! can sit in the cart twice with different customizations.

use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Local};
use papucho_core::pricing::{self, PricingOptions};
use papucho_core::validation::{validate_cart_size, validate_quantity};
use papucho_core::{
    CoreError, CoreResult, IngredientLookup, LineItem, Modifications, Money, Product,
    MAX_ITEM_QUANTITY,
};
use serde::{Deserialize, Serialize};

/// One line of the cart.
///
/// ## Design Notes
/// `product` is a snapshot taken when the line was added. Later catalog
/// edits do not change what the operator already rang up, but ingredient
/// prices are resolved at pricing time from the catalog passed in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    /// Cart-local id, unique for the lifetime of the cart.
    pub id: u64,

    /// Product at time of adding (frozen)
    pub product: Product,

    /// Units ordered
    pub quantity: i64,

    /// Desired ingredient quantities; empty means "as on the menu"
    #[serde(default)]
    pub modifications: Modifications,
}

impl CartLine {
    /// The order line this cart line becomes.
    pub fn to_line_item(&self) -> LineItem {
        LineItem::new(self.product.clone(), self.quantity)
            .with_modifications(self.modifications.clone())
    }

    /// Engine unit price.
    pub fn unit_price<L>(&self, catalog: &L, options: &PricingOptions) -> Money
    where
        L: IngredientLookup + ?Sized,
    {
        pricing::compute_unit_price_with(
            &self.product,
            self.modifications_opt(),
            catalog,
            options,
        )
    }

    /// Unit price × quantity.
    pub fn subtotal<L>(&self, catalog: &L, options: &PricingOptions) -> Money
    where
        L: IngredientLookup + ?Sized,
    {
        self.unit_price(catalog, options) * self.quantity
    }

    fn modifications_opt(&self) -> Option<&Modifications> {
        if self.modifications.is_empty() {
            None
        } else {
            Some(&self.modifications)
        }
    }
}

/// The cart.
///
/// ## Invariants
/// - Quantity of every line is in `1..=999`
/// - At most 100 lines
/// - Adding a product merges into an existing line only when the product id
///   and the ingredient quantities are both equal (entry order is ignored)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cart {
    /// Lines in the order they were added
    pub lines: Vec<CartLine>,

    next_id: u64,

    /// When the cart was created/last cleared
    pub created_at: DateTime<Local>,
}

impl Default for Cart {
    fn default() -> Self {
        Self::new()
    }
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart {
            lines: Vec::new(),
            next_id: 1,
            created_at: Local::now(),
        }
    }

    /// Adds a product, returning the id of the line that holds it.
    ///
    /// ## Behavior
    /// - Same product with equal modifications already in cart: quantity
    ///   increases on that line
    /// - Otherwise: a new line
    pub fn add_item(
        &mut self,
        product: &Product,
        quantity: i64,
        modifications: Modifications,
    ) -> CoreResult<u64> {
        validate_quantity(quantity)?;

        if let Some(line) = self.lines.iter_mut().find(|l| {
            l.product.id == product.id && l.modifications.same_quantities(&modifications)
        }) {
            let new_qty = line.quantity + quantity;
            if new_qty > MAX_ITEM_QUANTITY {
                return Err(CoreError::QuantityTooLarge {
                    requested: new_qty,
                    max: MAX_ITEM_QUANTITY,
                });
            }
            line.quantity = new_qty;
            return Ok(line.id);
        }

        validate_cart_size(self.lines.len()).map_err(|_| CoreError::CartTooLarge {
            max: papucho_core::MAX_CART_ITEMS,
        })?;

        let id = self.next_id;
        self.next_id += 1;
        self.lines.push(CartLine {
            id,
            product: product.clone(),
            quantity,
            modifications,
        });
        Ok(id)
    }

    /// Sets the quantity of a line. Zero or less removes it.
    pub fn update_quantity(&mut self, line_id: u64, quantity: i64) -> CoreResult<()> {
        if quantity <= 0 {
            return self.remove_line(line_id);
        }
        if quantity > MAX_ITEM_QUANTITY {
            return Err(CoreError::QuantityTooLarge {
                requested: quantity,
                max: MAX_ITEM_QUANTITY,
            });
        }

        self.line_mut(line_id)?.quantity = quantity;
        Ok(())
    }

    /// Replaces the modifications of a line.
    pub fn set_modifications(
        &mut self,
        line_id: u64,
        modifications: Modifications,
    ) -> CoreResult<()> {
        self.line_mut(line_id)?.modifications = modifications;
        Ok(())
    }

    /// Sets one quantity per ingredient slot of the line's product.
    ///
    /// Slots naming the same ingredient are folded together; additional
    /// ingredients already on the line are kept.
    pub fn set_slot_quantities(&mut self, line_id: u64, slots: &[u32]) -> CoreResult<()> {
        let line = self.line_mut(line_id)?;
        let mut merged =
            Modifications::from_slot_quantities(&line.product.ingredient_refs, slots)?;

        for (name, quantity) in line.modifications.iter() {
            if !line.product.has_ingredient(name) {
                merged.set(name, quantity);
            }
        }
        line.modifications = merged;
        Ok(())
    }

    /// Removes a line by id.
    pub fn remove_line(&mut self, line_id: u64) -> CoreResult<()> {
        let initial_len = self.lines.len();
        self.lines.retain(|l| l.id != line_id);

        if self.lines.len() == initial_len {
            Err(CoreError::CartLineNotFound(line_id))
        } else {
            Ok(())
        }
    }

    /// `(line id, quantity)` for every line, in cart order.
    pub fn line_quantities(&self) -> Vec<(u64, i64)> {
        self.lines.iter().map(|l| (l.id, l.quantity)).collect()
    }

    /// Takes ordered quantities out of the cart.
    ///
    /// `ordered` comes from [`Cart::line_quantities`]. A line whose quantity
    /// grew since then keeps the difference; lines added since then are
    /// untouched. Ids no longer in the cart are ignored.
    pub fn remove_ordered(&mut self, ordered: &[(u64, i64)]) {
        for &(id, quantity) in ordered {
            if let Some(line) = self.lines.iter_mut().find(|l| l.id == id) {
                line.quantity -= quantity;
            }
        }
        self.lines.retain(|l| l.quantity > 0);
        if self.lines.is_empty() {
            self.created_at = Local::now();
        }
    }

    /// Clears all lines.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.created_at = Local::now();
    }

    pub fn line(&self, line_id: u64) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.id == line_id)
    }

    fn line_mut(&mut self, line_id: u64) -> CoreResult<&mut CartLine> {
        self.lines
            .iter_mut()
            .find(|l| l.id == line_id)
            .ok_or(CoreError::CartLineNotFound(line_id))
    }

    /// Returns the number of lines in the cart.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Returns the total quantity of all lines.
    pub fn total_quantity(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Order lines in cart order.
    pub fn line_items(&self) -> Vec<LineItem> {
        self.lines.iter().map(CartLine::to_line_item).collect()
    }

    /// Sum of engine unit price × quantity over all lines.
    pub fn total<L>(&self, catalog: &L, options: &PricingOptions) -> Money
    where
        L: IngredientLookup + ?Sized,
    {
        self.lines.iter().map(|l| l.subtotal(catalog, options)).sum()
    }

    /// Totals summary for responses.
    pub fn totals<L>(&self, catalog: &L, options: &PricingOptions) -> CartTotals
    where
        L: IngredientLookup + ?Sized,
    {
        CartTotals {
            line_count: self.line_count(),
            total_quantity: self.total_quantity(),
            total: self.total(catalog, options),
        }
    }

    /// Checks if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Cart totals summary for API responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartTotals {
    pub line_count: usize,
    pub total_quantity: i64,
    pub total: Money,
}

/// Shared cart state.
///
/// ## Thread Safety
/// Uses `Arc<Mutex<Cart>>`: cart operations are short and almost all of
/// them write, so a `RwLock` buys nothing. The lock is never held across
/// an `.await`.
#[derive(Debug, Clone, Default)]
pub struct CartState {
    cart: Arc<Mutex<Cart>>,
}

impl CartState {
    /// Creates a new empty cart state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Executes a function with read access to the cart.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let count = cart_state.with_cart(|cart| cart.line_count());
    /// ```
    pub fn with_cart<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Cart) -> R,
    {
        // a panic mid-update leaves a cart that is still structurally valid
        let cart = self.cart.lock().unwrap_or_else(PoisonError::into_inner);
        f(&cart)
    }

    /// Executes a function with write access to the cart.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// cart_state.with_cart_mut(|cart| cart.add_item(&product, 1, mods))?;
    /// ```
    pub fn with_cart_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Cart) -> R,
    {
        let mut cart = self.cart.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut cart)
    }
}
