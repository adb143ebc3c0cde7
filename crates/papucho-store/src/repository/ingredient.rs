//! # Ingredient Catalog Repository
//!
//! Priced ingredients stored in `ingredientes.json`.
//!
//! ```text
//! { "ingredientes": [
//!     { "id": 1, "nombre": "Medallón", "categorias": ["Hamburguesas"],
//!       "precio_extra": 1000.0, "precio_resta": 500.0 }
//! ] }
//! ```
//!
//! Names are unique: products that predate ingredient ids join on them.
//! Renaming an ingredient therefore rewrites every matching
//! `ingredientes[].nombre` in `productos.json` under the same lock.

use std::sync::Arc;

use papucho_core::validation::{validate_ingredient_name, validate_price};
use papucho_core::{CatalogSnapshot, Ingredient, Money};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::error::{StoreError, StoreResult};
use crate::files;
use crate::repository::product::{load_products_file, save_products_file};
use crate::store::StoreConfig;

// =============================================================================
// File Records
// =============================================================================

#[derive(Debug, Default, Serialize, Deserialize)]
struct IngredientsFile {
    #[serde(default)]
    ingredientes: Vec<IngredientRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
struct IngredientRecord {
    id: i64,
    nombre: String,
    #[serde(default)]
    categorias: Vec<String>,
    #[serde(default)]
    precio_extra: f64,
    #[serde(default)]
    precio_resta: f64,
}

impl From<&IngredientRecord> for Ingredient {
    fn from(record: &IngredientRecord) -> Self {
        Ingredient {
            id: record.id,
            name: record.nombre.clone(),
            categories: record.categorias.clone(),
            extra_price: Money::from_major_f64(record.precio_extra),
            removal_price: Money::from_major_f64(record.precio_resta),
        }
    }
}

impl IngredientRecord {
    fn apply(&mut self, input: &IngredientInput) {
        self.nombre = input.name.clone();
        self.categorias = input.categories.clone();
        self.precio_extra = input.extra_price.to_major_f64();
        self.precio_resta = input.removal_price.to_major_f64();
    }
}

// =============================================================================
// Input
// =============================================================================

/// Editable fields of an ingredient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngredientInput {
    pub name: String,
    #[serde(default)]
    pub categories: Vec<String>,
    pub extra_price: Money,
    pub removal_price: Money,
}

impl IngredientInput {
    fn validated(&self) -> StoreResult<IngredientInput> {
        let name = validate_ingredient_name(&self.name)?;
        validate_price("extra_price", self.extra_price)?;
        validate_price("removal_price", self.removal_price)?;

        Ok(IngredientInput {
            name,
            categories: self
                .categories
                .iter()
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty())
                .collect(),
            extra_price: self.extra_price,
            removal_price: self.removal_price,
        })
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for the ingredient catalog.
#[derive(Debug, Clone)]
pub struct IngredientRepository {
    config: Arc<StoreConfig>,
    lock: Arc<Mutex<()>>,
}

impl IngredientRepository {
    pub(crate) fn new(config: Arc<StoreConfig>, lock: Arc<Mutex<()>>) -> Self {
        IngredientRepository { config, lock }
    }

    async fn load(&self) -> StoreResult<IngredientsFile> {
        let path = self.config.ingredients_path();
        let (file, recreate) = files::read_json_or_recreate(&path).await?;
        if recreate {
            files::write_json(&path, &file).await?;
        }
        Ok(file)
    }

    async fn save(&self, file: &IngredientsFile) -> StoreResult<()> {
        files::write_json(&self.config.ingredients_path(), file).await
    }

    /// Lists the whole catalog in file order.
    pub async fn list(&self) -> StoreResult<Vec<Ingredient>> {
        let _guard = self.lock.lock().await;
        let file = self.load().await?;
        Ok(file.ingredientes.iter().map(Ingredient::from).collect())
    }

    /// Gets an ingredient by id.
    pub async fn get(&self, id: i64) -> StoreResult<Option<Ingredient>> {
        let _guard = self.lock.lock().await;
        let file = self.load().await?;
        Ok(file
            .ingredientes
            .iter()
            .find(|i| i.id == id)
            .map(Ingredient::from))
    }

    /// Gets an ingredient by exact name.
    pub async fn get_by_name(&self, name: &str) -> StoreResult<Option<Ingredient>> {
        let _guard = self.lock.lock().await;
        let file = self.load().await?;
        Ok(file
            .ingredientes
            .iter()
            .find(|i| i.nombre == name)
            .map(Ingredient::from))
    }

    /// Lists the ingredients assignable to a product category.
    pub async fn list_by_category(&self, category: &str) -> StoreResult<Vec<Ingredient>> {
        let _guard = self.lock.lock().await;
        let file = self.load().await?;
        Ok(file
            .ingredientes
            .iter()
            .filter(|i| i.categorias.iter().any(|c| c == category))
            .map(Ingredient::from)
            .collect())
    }

    /// Adds an ingredient with the next free id.
    ///
    /// ## Errors
    /// * `Validation` - empty name or negative price
    /// * `Duplicate` - the name is already in the catalog
    pub async fn add(&self, input: &IngredientInput) -> StoreResult<Ingredient> {
        let input = input.validated()?;
        let _guard = self.lock.lock().await;
        let mut file = self.load().await?;

        if file.ingredientes.iter().any(|i| i.nombre == input.name) {
            return Err(StoreError::duplicate("ingredient name", input.name));
        }

        let id = file.ingredientes.iter().map(|i| i.id).max().unwrap_or(0) + 1;
        let mut record = IngredientRecord {
            id,
            nombre: String::new(),
            categorias: Vec::new(),
            precio_extra: 0.0,
            precio_resta: 0.0,
        };
        record.apply(&input);
        let ingredient = Ingredient::from(&record);
        file.ingredientes.push(record);
        self.save(&file).await?;

        info!(id, name = %ingredient.name, "Ingredient added");
        Ok(ingredient)
    }

    /// Updates an ingredient. A rename is applied to every product slot
    /// that referenced the old name.
    pub async fn update(&self, id: i64, input: &IngredientInput) -> StoreResult<Ingredient> {
        let input = input.validated()?;
        let _guard = self.lock.lock().await;
        let mut file = self.load().await?;

        if file
            .ingredientes
            .iter()
            .any(|i| i.id != id && i.nombre == input.name)
        {
            return Err(StoreError::duplicate("ingredient name", input.name));
        }

        let record = file
            .ingredientes
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or_else(|| StoreError::not_found("Ingredient", id))?;
        let old_name = std::mem::take(&mut record.nombre);
        record.apply(&input);
        let ingredient = Ingredient::from(&*record);

        self.save(&file).await?;

        if old_name != ingredient.name {
            let renamed = self.rename_in_products(&old_name, &ingredient.name).await?;
            info!(
                id,
                from = %old_name,
                to = %ingredient.name,
                product_slots = renamed,
                "Ingredient renamed"
            );
        } else {
            info!(id, name = %ingredient.name, "Ingredient updated");
        }
        Ok(ingredient)
    }

    /// Rewrites product slots named `from`. Caller holds the lock.
    async fn rename_in_products(&self, from: &str, to: &str) -> StoreResult<usize> {
        let path = self.config.products_path();
        let mut products = load_products_file(&path).await?;

        let mut renamed = 0;
        for category in &mut products.categorias {
            for product in &mut category.productos {
                for slot in &mut product.ingredientes {
                    if slot.nombre == from {
                        slot.nombre = to.to_string();
                        renamed += 1;
                    }
                }
            }
        }

        if renamed > 0 {
            save_products_file(&path, &products).await?;
        }
        Ok(renamed)
    }

    /// Deletes an ingredient.
    ///
    /// Products that still reference it keep their slots; those slots price
    /// at zero until the ingredient is recreated.
    pub async fn delete(&self, id: i64) -> StoreResult<()> {
        let _guard = self.lock.lock().await;
        let mut file = self.load().await?;

        let idx = file
            .ingredientes
            .iter()
            .position(|i| i.id == id)
            .ok_or_else(|| StoreError::not_found("Ingredient", id))?;
        let removed = file.ingredientes.remove(idx);
        self.save(&file).await?;

        info!(id, name = %removed.nombre, "Ingredient deleted");
        Ok(())
    }

    /// Takes a point-in-time copy of the catalog for pricing and tickets.
    pub async fn snapshot(&self) -> StoreResult<CatalogSnapshot> {
        let ingredients = self.list().await?;
        debug!(count = ingredients.len(), "Catalog snapshot taken");
        Ok(CatalogSnapshot::new(ingredients))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::product::ProductInput;
    use crate::store::DataStore;
    use papucho_core::{IngredientLookup, IngredientRef};

    async fn store() -> (tempfile::TempDir, DataStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = DataStore::open(StoreConfig::new(dir.path())).await.unwrap();
        (dir, store)
    }

    fn input(name: &str, extra: i64, removal: i64) -> IngredientInput {
        IngredientInput {
            name: name.to_string(),
            categories: vec!["Hamburguesas".to_string()],
            extra_price: Money::from_major(extra),
            removal_price: Money::from_major(removal),
        }
    }

    #[tokio::test]
    async fn test_add_and_lookup() {
        let (_dir, store) = store().await;
        let repo = store.ingredients();

        let medallon = repo.add(&input(" Medallón ", 1000, 500)).await.unwrap();
        assert_eq!(medallon.id, 1);
        assert_eq!(medallon.name, "Medallón");

        let found = repo.get_by_name("Medallón").await.unwrap().unwrap();
        assert_eq!(found.extra_price, Money::from_major(1000));
        assert_eq!(repo.get(1).await.unwrap(), Some(found));
        assert_eq!(repo.list_by_category("Hamburguesas").await.unwrap().len(), 1);
        assert!(repo.list_by_category("Bebidas").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_name_rejected() {
        let (_dir, store) = store().await;
        let repo = store.ingredients();
        repo.add(&input("Queso", 300, 100)).await.unwrap();
        let tomato = repo.add(&input("Tomáte", 500, 500)).await.unwrap();

        assert!(matches!(
            repo.add(&input("Queso", 1, 1)).await,
            Err(StoreError::Duplicate { .. })
        ));
        assert!(matches!(
            repo.update(tomato.id, &input("Queso", 1, 1)).await,
            Err(StoreError::Duplicate { .. })
        ));
    }

    #[tokio::test]
    async fn test_rejects_negative_price() {
        let (_dir, store) = store().await;
        assert!(matches!(
            store.ingredients().add(&input("Queso", -1, 0)).await,
            Err(StoreError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_rename_cascades_to_products() {
        let (_dir, store) = store().await;
        let tomato = store.ingredients().add(&input("Tomate", 500, 500)).await.unwrap();

        let product = store
            .products()
            .add(&ProductInput {
                category: "Hamburguesas".to_string(),
                name: "Completa".to_string(),
                base_price: Money::from_major(8800),
                description: None,
                image: None,
            })
            .await
            .unwrap();
        store
            .products()
            .add_ingredient_ref(product.id, IngredientRef::named("Tomate", 1))
            .await
            .unwrap();

        store
            .ingredients()
            .update(tomato.id, &input("Tomáte", 600, 500))
            .await
            .unwrap();

        let product = store.products().get(product.id).await.unwrap().unwrap();
        assert_eq!(product.ingredient_refs[0].name, "Tomáte");

        let catalog = store.catalog_snapshot().await.unwrap();
        assert_eq!(
            catalog.resolve(&product.ingredient_refs[0]).extra_price,
            Money::from_major(600)
        );
    }

    #[tokio::test]
    async fn test_delete() {
        let (_dir, store) = store().await;
        let repo = store.ingredients();
        let huevo = repo.add(&input("Huevo", 400, 0)).await.unwrap();

        repo.delete(huevo.id).await.unwrap();
        assert!(repo.get(huevo.id).await.unwrap().is_none());
        assert!(repo.delete(huevo.id).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_snapshot_is_detached() {
        let (_dir, store) = store().await;
        let repo = store.ingredients();
        let queso = repo.add(&input("Queso", 300, 100)).await.unwrap();

        let snapshot = repo.snapshot().await.unwrap();
        repo.update(queso.id, &input("Queso", 999, 100)).await.unwrap();

        assert_eq!(
            snapshot.resolve_name("Queso").extra_price,
            Money::from_major(300)
        );
    }
}
