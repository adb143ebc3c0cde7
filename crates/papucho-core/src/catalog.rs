//! # Ingredient Catalog Snapshot
//!
//! The pricing engine and the ticket formatter never read ingredient prices
//! from global state. They take an [`IngredientLookup`] argument, normally a
//! [`CatalogSnapshot`] loaded right before the computation.
//!
//! ## Resolution Order
//! ```text
//! IngredientRef { ingredient_id: Some(7), name: "Tomate" }
//!      │
//!      ├── find_by_id(7) ────────► found? use it
//!      │
//!      ├── find_by_name("Tomate") ► found? use it   (legacy refs, renames)
//!      │
//!      └── IngredientPrices::default()  (both prices zero, never an error)
//! ```

use std::collections::HashMap;

use crate::types::{Ingredient, IngredientPrices, IngredientRef};

/// Read-only access to ingredient prices.
pub trait IngredientLookup {
    /// Looks an ingredient up by its catalog name.
    fn find_by_name(&self, name: &str) -> Option<IngredientPrices>;

    /// Looks an ingredient up by its stable id.
    fn find_by_id(&self, _id: i64) -> Option<IngredientPrices> {
        None
    }

    /// Resolves the prices for a product's ingredient slot.
    ///
    /// Prefers the id, falls back to the name, and prices unknown
    /// ingredients at zero.
    fn resolve(&self, ingredient_ref: &IngredientRef) -> IngredientPrices {
        ingredient_ref
            .ingredient_id
            .and_then(|id| self.find_by_id(id))
            .or_else(|| self.find_by_name(&ingredient_ref.name))
            .unwrap_or_default()
    }

    /// Resolves the prices of an ingredient known only by name.
    fn resolve_name(&self, name: &str) -> IngredientPrices {
        self.find_by_name(name).unwrap_or_default()
    }
}

/// A point-in-time copy of the ingredient catalog.
///
/// Cheap to clone and safe to share across threads; later catalog edits do
/// not affect a snapshot already taken.
#[derive(Debug, Clone, Default)]
pub struct CatalogSnapshot {
    ingredients: Vec<Ingredient>,
    by_name: HashMap<String, usize>,
    by_id: HashMap<i64, usize>,
}

impl CatalogSnapshot {
    /// Builds a snapshot. If two entries share a name, the first one wins,
    /// matching a linear search over the catalog file.
    pub fn new(ingredients: Vec<Ingredient>) -> Self {
        let mut by_name = HashMap::with_capacity(ingredients.len());
        let mut by_id = HashMap::with_capacity(ingredients.len());
        for (idx, ingredient) in ingredients.iter().enumerate() {
            by_name.entry(ingredient.name.clone()).or_insert(idx);
            by_id.entry(ingredient.id).or_insert(idx);
        }
        CatalogSnapshot {
            ingredients,
            by_name,
            by_id,
        }
    }

    /// An empty catalog: every ingredient prices at zero.
    pub fn empty() -> Self {
        CatalogSnapshot::default()
    }

    pub fn get(&self, name: &str) -> Option<&Ingredient> {
        self.by_name.get(name).map(|&idx| &self.ingredients[idx])
    }

    pub fn get_by_id(&self, id: i64) -> Option<&Ingredient> {
        self.by_id.get(&id).map(|&idx| &self.ingredients[idx])
    }

    pub fn ingredients(&self) -> &[Ingredient] {
        &self.ingredients
    }

    pub fn len(&self) -> usize {
        self.ingredients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ingredients.is_empty()
    }
}

impl IngredientLookup for CatalogSnapshot {
    fn find_by_name(&self, name: &str) -> Option<IngredientPrices> {
        self.get(name).map(Ingredient::prices)
    }

    fn find_by_id(&self, id: i64) -> Option<IngredientPrices> {
        self.get_by_id(id).map(Ingredient::prices)
    }
}

impl FromIterator<Ingredient> for CatalogSnapshot {
    fn from_iter<I: IntoIterator<Item = Ingredient>>(iter: I) -> Self {
        CatalogSnapshot::new(iter.into_iter().collect())
    }
}
