//! # Catalog Commands
//!
//! Read-only views of the menu and the ingredient catalog, plus price
//! quotes for a customization before it goes into the cart.

use papucho_core::pricing::{self, IngredientDelta};
use papucho_core::{Ingredient, IngredientRef, Modifications, Money, Product};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ApiError;
use crate::state::{ConfigState, StoreState};

/// One menu category with its products.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryView {
    pub name: String,
    pub products: Vec<ProductView>,
}

/// Product as shown on the menu screen.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductView {
    pub id: i64,
    pub name: String,
    pub base_price: Money,
    pub description: Option<String>,
    pub ingredients: Vec<IngredientRef>,
    /// False when the product has no ingredient slots (drinks, fries).
    pub customizable: bool,
}

impl From<Product> for ProductView {
    fn from(product: Product) -> Self {
        ProductView {
            id: product.id,
            customizable: !product.ingredient_refs.is_empty(),
            name: product.name,
            base_price: product.base_price,
            description: product.description,
            ingredients: product.ingredient_refs,
        }
    }
}

/// Price of one unit of a product with a given customization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteResponse {
    pub product_id: i64,
    pub name: String,
    pub base_price: Money,
    pub unit_price: Money,
    /// True when the kitchen ticket would itemize this line.
    pub modified: bool,
    /// Itemized changes, referenced ingredients first.
    pub deltas: Vec<IngredientDelta>,
}

/// Lists the menu, every fixed category included even when empty.
pub async fn list_catalog(store: &StoreState) -> Result<Vec<CategoryView>, ApiError> {
    debug!("list_catalog command");

    let products = store.inner().products();
    let mut categories = Vec::new();
    for name in products.categories().await? {
        let items = products
            .list_by_category(&name)
            .await?
            .into_iter()
            .map(ProductView::from)
            .collect();
        categories.push(CategoryView {
            name,
            products: items,
        });
    }
    Ok(categories)
}

/// Gets a product by id.
pub async fn get_product(store: &StoreState, product_id: i64) -> Result<Product, ApiError> {
    debug!(product_id, "get_product command");
    store.product(product_id).await
}

/// Lists catalog ingredients, optionally only those allowed in a category.
pub async fn list_ingredients(
    store: &StoreState,
    category: Option<&str>,
) -> Result<Vec<Ingredient>, ApiError> {
    debug!(?category, "list_ingredients command");

    let ingredients = store.inner().ingredients();
    let list = match category {
        Some(category) => ingredients.list_by_category(category).await?,
        None => ingredients.list().await?,
    };
    Ok(list)
}

/// Prices a customization without touching the cart.
///
/// ## Example
/// ```text
/// Hamburguesa Completa $8800.00, {"Tomáte": 0}
///   ──► unit_price $8300.00, deltas [Tomáte removed ×1 @ $500.00]
/// ```
pub async fn quote_product(
    store: &StoreState,
    config: &ConfigState,
    product_id: i64,
    modifications: &Modifications,
) -> Result<QuoteResponse, ApiError> {
    debug!(product_id, "quote_product command");

    let product = store.product(product_id).await?;
    let catalog = store.catalog().await?;
    let mods = Some(modifications).filter(|m| !m.is_empty());

    Ok(QuoteResponse {
        unit_price: pricing::compute_unit_price_with(
            &product,
            mods,
            &catalog,
            &config.pricing_options(),
        ),
        modified: pricing::has_real_modifications(&product, mods),
        deltas: pricing::ingredient_deltas(&product, mods, &catalog),
        product_id: product.id,
        name: product.name,
        base_price: product.base_price,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::{burger_station, COMPLETA};
    use papucho_core::pricing::DeltaKind;

    #[tokio::test]
    async fn test_list_catalog_keeps_fixed_categories() {
        let dir = tempfile::tempdir().unwrap();
        let (store, _) = burger_station(&dir).await;

        let catalog = list_catalog(&store).await.unwrap();
        let names: Vec<&str> = catalog.iter().map(|c| c.name.as_str()).collect();
        assert!(names.contains(&"Bebidas"));

        let burgers = catalog.iter().find(|c| c.name == "Hamburguesas").unwrap();
        assert_eq!(burgers.products.len(), 1);
        assert!(burgers.products[0].customizable);
    }

    #[tokio::test]
    async fn test_quote_removed_ingredient() {
        let dir = tempfile::tempdir().unwrap();
        let (store, config) = burger_station(&dir).await;
        let mods: Modifications = [("Tomáte", 0u32)].into_iter().collect();

        let quote = quote_product(&store, &config, COMPLETA, &mods).await.unwrap();
        assert_eq!(quote.base_price, Money::from_major(8800));
        assert_eq!(quote.unit_price, Money::from_major(8300));
        assert!(quote.modified);
        assert_eq!(quote.deltas.len(), 1);
        assert_eq!(quote.deltas[0].kind, DeltaKind::Removed);
    }

    #[tokio::test]
    async fn test_quote_unknown_product() {
        let dir = tempfile::tempdir().unwrap();
        let (store, config) = burger_station(&dir).await;

        let err = quote_product(&store, &config, 999, &Modifications::new())
            .await
            .unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_ingredients_by_category() {
        let dir = tempfile::tempdir().unwrap();
        let (store, _) = burger_station(&dir).await;

        assert_eq!(list_ingredients(&store, None).await.unwrap().len(), 3);
        assert!(list_ingredients(&store, Some("Bebidas"))
            .await
            .unwrap()
            .is_empty());
    }
}
