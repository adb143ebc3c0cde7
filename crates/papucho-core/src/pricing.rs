//! # Pricing Engine
//!
//! Computes the unit price of a customized product from its base price and
//! the ingredient quantities the customer asked for.
//!
//! ## The Rule
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  for each ingredient_ref (product order):                               │
//! │                                                                         │
//! │     current = modifications[name]  (absent → base_quantity)            │
//! │                                                                         │
//! │     current > base  ──►  + (current - base) × extra_price              │
//! │     current < base  ──►  - (base - current) × removal_price            │
//! │     current = base  ──►  nothing                                        │
//! │                                                                         │
//! │  unit_price = base_price + Σ adjustments                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Short-circuit: a product without ingredient refs, or a line without
//! modifications, always prices at `base_price`.
//!
//! ## Additional Ingredients
//! A name in the modification map that the product does not reference is
//! an "additional" ingredient. By default the unit price ignores it while
//! the ticket still prints it as a charged extra; the cart total and the
//! ticket then disagree. [`PricingOptions::strict_additional_pricing`]
//! charges it in the unit price too.
//!
//! ## Example
//! ```rust
//! use papucho_core::catalog::CatalogSnapshot;
//! use papucho_core::money::Money;
//! use papucho_core::pricing::compute_unit_price;
//! use papucho_core::types::{Ingredient, IngredientRef, Modifications, Product};
//!
//! let catalog = CatalogSnapshot::new(vec![Ingredient {
//!     id: 1,
//!     name: "Medallón".to_string(),
//!     categories: vec![],
//!     extra_price: Money::from_major(1000),
//!     removal_price: Money::from_major(500),
//! }]);
//! let burger = Product {
//!     id: 1,
//!     name: "Hamburguesa Completa".to_string(),
//!     category: "Hamburguesas".to_string(),
//!     base_price: Money::from_major(8800),
//!     description: None,
//!     image: None,
//!     ingredient_refs: vec![IngredientRef::named("Medallón", 1)],
//! };
//!
//! let mods: Modifications = [("Medallón", 2)].into_iter().collect();
//! assert_eq!(compute_unit_price(&burger, Some(&mods), &catalog), Money::from_major(9800));
//! ```

use serde::{Deserialize, Serialize};

use crate::catalog::IngredientLookup;
use crate::money::Money;
use crate::types::{LineItem, Modifications, Product};

// =============================================================================
// Options
// =============================================================================

/// Switches for the two behaviors product owners have not settled yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingOptions {
    /// When false, a negative adjusted unit price is clamped to zero.
    pub allow_negative_adjusted_price: bool,

    /// When true, additional ingredients are charged at their extra price in
    /// the unit price as well, matching what the ticket prints.
    pub strict_additional_pricing: bool,
}

impl Default for PricingOptions {
    fn default() -> Self {
        PricingOptions {
            allow_negative_adjusted_price: true,
            strict_additional_pricing: false,
        }
    }
}

// =============================================================================
// Unit Price
// =============================================================================

/// Computes the adjusted unit price with the default options.
pub fn compute_unit_price<L>(
    product: &Product,
    modifications: Option<&Modifications>,
    catalog: &L,
) -> Money
where
    L: IngredientLookup + ?Sized,
{
    compute_unit_price_with(product, modifications, catalog, &PricingOptions::default())
}

/// Computes the adjusted unit price.
///
/// Never fails: ingredients missing from the catalog contribute nothing.
pub fn compute_unit_price_with<L>(
    product: &Product,
    modifications: Option<&Modifications>,
    catalog: &L,
    options: &PricingOptions,
) -> Money
where
    L: IngredientLookup + ?Sized,
{
    let mods = match modifications {
        Some(m) if !m.is_empty() => m,
        _ => return product.base_price,
    };
    if product.ingredient_refs.is_empty() && !options.strict_additional_pricing {
        return product.base_price;
    }

    let mut adjustment = Money::zero();
    for ingredient_ref in &product.ingredient_refs {
        let prices = catalog.resolve(ingredient_ref);
        let base = ingredient_ref.base_quantity;
        let current = mods.quantity_or(&ingredient_ref.name, base);

        if current > base {
            adjustment += prices.extra_price * (current - base);
        } else if current < base {
            adjustment -= prices.removal_price * (base - current);
        }
    }

    if options.strict_additional_pricing {
        for (name, quantity) in additional_ingredients(product, mods) {
            adjustment += catalog.resolve_name(name).extra_price * quantity;
        }
    }

    let price = product.base_price + adjustment;
    if price.is_negative() && !options.allow_negative_adjusted_price {
        Money::zero()
    } else {
        price
    }
}

// =============================================================================
// Modification Detection
// =============================================================================

/// Returns true if the line differs from the plain product.
///
/// A referenced ingredient away from its base quantity, or any additional
/// ingredient with a positive quantity, counts. Whether the price actually
/// changed is irrelevant: swapping two equally priced ingredients is still a
/// modification the kitchen must see.
pub fn has_real_modifications(product: &Product, modifications: Option<&Modifications>) -> bool {
    let mods = match modifications {
        Some(m) if !m.is_empty() => m,
        _ => return false,
    };

    let refs_changed = product
        .ingredient_refs
        .iter()
        .any(|r| mods.quantity_or(&r.name, r.base_quantity) != r.base_quantity);

    refs_changed || additional_ingredients(product, mods).next().is_some()
}

/// Iterates the additional ingredients (not referenced by the product) with
/// a positive quantity, in map order.
pub fn additional_ingredients<'a>(
    product: &'a Product,
    modifications: &'a Modifications,
) -> impl Iterator<Item = (&'a str, u32)> + 'a {
    modifications
        .iter()
        .filter(move |(name, quantity)| *quantity > 0 && !product.has_ingredient(name))
}

// =============================================================================
// Ingredient Deltas
// =============================================================================

/// Direction of an ingredient change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeltaKind {
    /// More units than the base quantity.
    Extra,
    /// Fewer units than the base quantity.
    Removed,
}

/// One itemized ingredient change, per single unit of the product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientDelta {
    pub name: String,
    pub kind: DeltaKind,
    /// Units added or removed.
    pub count: u32,
    /// Extra price for `Extra`, removal price for `Removed`.
    pub unit_price: Money,
    /// True when the product does not reference this ingredient.
    pub additional: bool,
}

impl IngredientDelta {
    /// Signed amount for a whole line of `line_quantity` units.
    pub fn amount(&self, line_quantity: i64) -> Money {
        let magnitude = self.unit_price * self.count * line_quantity;
        match self.kind {
            DeltaKind::Extra => magnitude,
            DeltaKind::Removed => -magnitude,
        }
    }
}

/// Itemizes the changes of a line: referenced ingredients in product order,
/// then additional ingredients in map order.
///
/// Additional ingredients always use the catalog extra price here, whatever
/// the pricing options say, since this is what the ticket displays.
pub fn ingredient_deltas<L>(
    product: &Product,
    modifications: Option<&Modifications>,
    catalog: &L,
) -> Vec<IngredientDelta>
where
    L: IngredientLookup + ?Sized,
{
    let mods = match modifications {
        Some(m) if !m.is_empty() => m,
        _ => return Vec::new(),
    };

    let mut deltas = Vec::new();
    for ingredient_ref in &product.ingredient_refs {
        let base = ingredient_ref.base_quantity;
        let current = mods.quantity_or(&ingredient_ref.name, base);
        if current == base {
            continue;
        }

        let prices = catalog.resolve(ingredient_ref);
        let (kind, count, unit_price) = if current > base {
            (DeltaKind::Extra, current - base, prices.extra_price)
        } else {
            (DeltaKind::Removed, base - current, prices.removal_price)
        };
        deltas.push(IngredientDelta {
            name: ingredient_ref.name.clone(),
            kind,
            count,
            unit_price,
            additional: false,
        });
    }

    for (name, quantity) in additional_ingredients(product, mods) {
        deltas.push(IngredientDelta {
            name: name.to_string(),
            kind: DeltaKind::Extra,
            count: quantity,
            unit_price: catalog.resolve_name(name).extra_price,
            additional: true,
        });
    }

    deltas
}

// =============================================================================
// Line and Order Totals
// =============================================================================

/// Engine unit price of a line.
pub fn line_unit_price<L>(item: &LineItem, catalog: &L, options: &PricingOptions) -> Money
where
    L: IngredientLookup + ?Sized,
{
    compute_unit_price_with(&item.product, item.modifications_opt(), catalog, options)
}

/// Unit price × quantity.
pub fn line_subtotal<L>(item: &LineItem, catalog: &L, options: &PricingOptions) -> Money
where
    L: IngredientLookup + ?Sized,
{
    line_unit_price(item, catalog, options) * item.quantity
}

/// Sum of line subtotals; this is the `total` stored on an order.
pub fn order_total<L>(items: &[LineItem], catalog: &L, options: &PricingOptions) -> Money
where
    L: IngredientLookup + ?Sized,
{
    items
        .iter()
        .map(|item| line_subtotal(item, catalog, options))
        .sum()
}

// =============================================================================
// Unit Tests
// =============================================================================
