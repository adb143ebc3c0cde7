//! # Product Repository
//!
//! Menu products stored in `productos.json`, grouped by category.
//!
//! ## File Shape
//! ```text
//! {
//!   "categorias": [
//!     {
//!       "nombre": "Hamburguesas",
//!       "productos": [
//!         {
//!           "id": 1,
//!           "nombre": "Hamburguesa Completa",
//!           "precio": 8800.0,
//!           "descripcion": "Medallón, tomate, lechuga",
//!           "ingredientes": [
//!             { "id": 1, "nombre": "Medallón", "cantidad_base": 1 },
//!             { "nombre": "Tomáte", "cantidad_base": 1 }      ← legacy, no id
//!           ]
//!         }
//!       ]
//!     }
//!   ]
//! }
//! ```
//!
//! Prices are floats in the file and [`Money`] everywhere else. Ingredient
//! entries store no price: legacy files that still carry `precio_extra` on
//! them load fine and lose the copy on the next write.

use std::path::Path;
use std::sync::Arc;

use papucho_core::validation::{validate_price, validate_product_name};
use papucho_core::{IngredientRef, Money, Product, ValidationError, FIXED_CATEGORIES};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::error::{StoreError, StoreResult};
use crate::files;
use crate::store::StoreConfig;

// =============================================================================
// File Records
// =============================================================================

#[derive(Debug, Default, Serialize, Deserialize)]
pub(crate) struct ProductsFile {
    #[serde(default)]
    pub(crate) categorias: Vec<CategoryRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct CategoryRecord {
    pub(crate) nombre: String,
    #[serde(default)]
    pub(crate) productos: Vec<ProductRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct ProductRecord {
    id: i64,
    nombre: String,
    precio: f64,
    #[serde(default)]
    descripcion: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    imagen: Option<String>,
    #[serde(default)]
    pub(crate) ingredientes: Vec<IngredientRefRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct IngredientRefRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) id: Option<i64>,
    pub(crate) nombre: String,
    #[serde(default)]
    cantidad_base: u32,
}

impl ProductRecord {
    fn to_product(&self, category: &str) -> Product {
        Product {
            id: self.id,
            name: self.nombre.clone(),
            category: category.to_string(),
            base_price: Money::from_major_f64(self.precio),
            description: Some(self.descripcion.clone()).filter(|d| !d.is_empty()),
            image: self.imagen.clone(),
            ingredient_refs: self.ingredientes.iter().map(IngredientRef::from).collect(),
        }
    }

    fn apply(&mut self, input: &ProductInput) {
        self.nombre = input.name.clone();
        self.precio = input.base_price.to_major_f64();
        self.descripcion = input.description.clone().unwrap_or_default();
        self.imagen = input.image.clone();
    }
}

impl From<&IngredientRefRecord> for IngredientRef {
    fn from(record: &IngredientRefRecord) -> Self {
        IngredientRef {
            ingredient_id: record.id,
            name: record.nombre.clone(),
            base_quantity: record.cantidad_base,
        }
    }
}

impl From<&IngredientRef> for IngredientRefRecord {
    fn from(r: &IngredientRef) -> Self {
        IngredientRefRecord {
            id: r.ingredient_id,
            nombre: r.name.clone(),
            cantidad_base: r.base_quantity,
        }
    }
}

impl ProductsFile {
    /// Appends any missing fixed category. Returns true if one was added.
    fn ensure_fixed_categories(&mut self) -> bool {
        let mut added = false;
        for name in FIXED_CATEGORIES {
            if !self.categorias.iter().any(|c| c.nombre == name) {
                self.categorias.push(CategoryRecord {
                    nombre: name.to_string(),
                    productos: Vec::new(),
                });
                added = true;
            }
        }
        added
    }

    fn products(&self) -> impl Iterator<Item = (&str, &ProductRecord)> {
        self.categorias
            .iter()
            .flat_map(|c| c.productos.iter().map(move |p| (c.nombre.as_str(), p)))
    }

    fn next_id(&self) -> i64 {
        self.products().map(|(_, p)| p.id).max().unwrap_or(0) + 1
    }

    fn find_mut(&mut self, id: i64) -> Option<(&str, &mut ProductRecord)> {
        self.categorias.iter_mut().find_map(|c| {
            let name = c.nombre.as_str();
            c.productos
                .iter_mut()
                .find(|p| p.id == id)
                .map(|p| (name, p))
        })
    }

    /// Removes a product, returning it and the category it was in.
    fn take(&mut self, id: i64) -> Option<(String, ProductRecord)> {
        for category in &mut self.categorias {
            if let Some(idx) = category.productos.iter().position(|p| p.id == id) {
                return Some((category.nombre.clone(), category.productos.remove(idx)));
            }
        }
        None
    }

    /// Returns the category, creating it at the end if missing.
    fn category_mut(&mut self, name: &str) -> &mut CategoryRecord {
        let idx = match self.categorias.iter().position(|c| c.nombre == name) {
            Some(idx) => idx,
            None => {
                self.categorias.push(CategoryRecord {
                    nombre: name.to_string(),
                    productos: Vec::new(),
                });
                self.categorias.len() - 1
            }
        };
        &mut self.categorias[idx]
    }
}

/// Loads `productos.json`, recreating it when missing or corrupt and
/// adding any missing fixed category.
pub(crate) async fn load_products_file(path: &Path) -> StoreResult<ProductsFile> {
    let (mut file, mut dirty): (ProductsFile, bool) = files::read_json_or_recreate(path).await?;
    dirty |= file.ensure_fixed_categories();
    if dirty {
        files::write_json(path, &file).await?;
    }
    Ok(file)
}

pub(crate) async fn save_products_file(path: &Path, file: &ProductsFile) -> StoreResult<()> {
    files::write_json(path, file).await
}

// =============================================================================
// Input
// =============================================================================

/// Editable fields of a product; used for both add and update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductInput {
    pub category: String,
    pub name: String,
    pub base_price: Money,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

impl ProductInput {
    fn validated(&self) -> StoreResult<ProductInput> {
        let category = self.category.trim();
        if category.is_empty() {
            return Err(ValidationError::Required {
                field: "category".to_string(),
            }
            .into());
        }
        let name = validate_product_name(&self.name)?;
        validate_price("base_price", self.base_price)?;

        Ok(ProductInput {
            category: category.to_string(),
            name,
            base_price: self.base_price,
            description: self
                .description
                .as_deref()
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(str::to_string),
            image: self.image.clone(),
        })
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for menu products.
///
/// ## Usage
/// ```rust,ignore
/// let repo = store.products();
///
/// let burgers = repo.list_by_category("Hamburguesas").await?;
/// let product = repo.get(1).await?;
/// repo.add_ingredient_ref(1, IngredientRef::with_id(5, "Huevo", 0)).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    config: Arc<StoreConfig>,
    lock: Arc<Mutex<()>>,
}

impl ProductRepository {
    pub(crate) fn new(config: Arc<StoreConfig>, lock: Arc<Mutex<()>>) -> Self {
        ProductRepository { config, lock }
    }

    async fn load(&self) -> StoreResult<ProductsFile> {
        load_products_file(&self.config.products_path()).await
    }

    async fn save(&self, file: &ProductsFile) -> StoreResult<()> {
        save_products_file(&self.config.products_path(), file).await
    }

    /// Lists category names in file order (fixed ones always present).
    pub async fn categories(&self) -> StoreResult<Vec<String>> {
        let _guard = self.lock.lock().await;
        let file = self.load().await?;
        Ok(file.categorias.into_iter().map(|c| c.nombre).collect())
    }

    /// Lists every product, category by category.
    pub async fn list(&self) -> StoreResult<Vec<Product>> {
        let _guard = self.lock.lock().await;
        let file = self.load().await?;
        let products: Vec<Product> = file
            .products()
            .map(|(category, p)| p.to_product(category))
            .collect();

        debug!(count = products.len(), "Listed products");
        Ok(products)
    }

    /// Lists the products of one category (empty for unknown categories).
    pub async fn list_by_category(&self, category: &str) -> StoreResult<Vec<Product>> {
        let _guard = self.lock.lock().await;
        let file = self.load().await?;
        let products = file
            .products()
            .filter(|(c, _)| *c == category)
            .map(|(c, p)| p.to_product(c))
            .collect();
        Ok(products)
    }

    /// Gets a product by id.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get(&self, id: i64) -> StoreResult<Option<Product>> {
        let _guard = self.lock.lock().await;
        let file = self.load().await?;
        let found = file
            .products()
            .find(|(_, p)| p.id == id)
            .map(|(c, p)| p.to_product(c));
        Ok(found)
    }

    /// Adds a product with the next free id (max + 1).
    pub async fn add(&self, input: &ProductInput) -> StoreResult<Product> {
        let input = input.validated()?;
        let _guard = self.lock.lock().await;
        let mut file = self.load().await?;

        let mut record = ProductRecord {
            id: file.next_id(),
            nombre: String::new(),
            precio: 0.0,
            descripcion: String::new(),
            imagen: None,
            ingredientes: Vec::new(),
        };
        record.apply(&input);
        let product = record.to_product(&input.category);

        file.category_mut(&input.category).productos.push(record);
        self.save(&file).await?;

        info!(id = product.id, name = %product.name, category = %product.category, "Product added");
        Ok(product)
    }

    /// Updates a product's fields, moving it if the category changed.
    ///
    /// Ingredient references are kept as they are.
    pub async fn update(&self, id: i64, input: &ProductInput) -> StoreResult<Product> {
        let input = input.validated()?;
        let _guard = self.lock.lock().await;
        let mut file = self.load().await?;

        let product = if let Some((category, record)) = file.find_mut(id) {
            if category == input.category {
                record.apply(&input);
                Some(record.to_product(category))
            } else {
                None
            }
        } else {
            return Err(StoreError::not_found("Product", id));
        };

        let product = match product {
            Some(product) => product,
            None => {
                let (from, mut record) = file
                    .take(id)
                    .ok_or_else(|| StoreError::not_found("Product", id))?;
                record.apply(&input);
                let product = record.to_product(&input.category);
                file.category_mut(&input.category).productos.push(record);
                debug!(id, from = %from, to = %input.category, "Product moved");
                product
            }
        };

        self.save(&file).await?;
        info!(id, name = %product.name, "Product updated");
        Ok(product)
    }

    /// Deletes a product.
    pub async fn delete(&self, id: i64) -> StoreResult<()> {
        let _guard = self.lock.lock().await;
        let mut file = self.load().await?;

        let (category, record) = file
            .take(id)
            .ok_or_else(|| StoreError::not_found("Product", id))?;
        self.save(&file).await?;

        info!(id, name = %record.nombre, category = %category, "Product deleted");
        Ok(())
    }

    /// Appends an ingredient slot to a product.
    pub async fn add_ingredient_ref(
        &self,
        product_id: i64,
        ingredient_ref: IngredientRef,
    ) -> StoreResult<Product> {
        self.edit_refs(product_id, |refs| {
            refs.push(IngredientRefRecord::from(&ingredient_ref));
            Ok(())
        })
        .await
    }

    /// Replaces the ingredient slot at `index`.
    pub async fn update_ingredient_ref(
        &self,
        product_id: i64,
        index: usize,
        ingredient_ref: IngredientRef,
    ) -> StoreResult<Product> {
        self.edit_refs(product_id, |refs| {
            let slot = refs
                .get_mut(index)
                .ok_or_else(|| StoreError::not_found("Ingredient slot", index))?;
            *slot = IngredientRefRecord::from(&ingredient_ref);
            Ok(())
        })
        .await
    }

    /// Removes the ingredient slot at `index`.
    pub async fn remove_ingredient_ref(
        &self,
        product_id: i64,
        index: usize,
    ) -> StoreResult<Product> {
        self.edit_refs(product_id, |refs| {
            if index >= refs.len() {
                return Err(StoreError::not_found("Ingredient slot", index));
            }
            refs.remove(index);
            Ok(())
        })
        .await
    }

    async fn edit_refs<F>(&self, product_id: i64, edit: F) -> StoreResult<Product>
    where
        F: FnOnce(&mut Vec<IngredientRefRecord>) -> StoreResult<()>,
    {
        let _guard = self.lock.lock().await;
        let mut file = self.load().await?;

        let (category, record) = file
            .find_mut(product_id)
            .ok_or_else(|| StoreError::not_found("Product", product_id))?;
        edit(&mut record.ingredientes)?;
        let product = record.to_product(category);

        self.save(&file).await?;
        debug!(
            id = product_id,
            slots = product.ingredient_refs.len(),
            "Product ingredients updated"
        );
        Ok(product)
    }

    /// Counts products (for diagnostics).
    pub async fn count(&self) -> StoreResult<usize> {
        let _guard = self.lock.lock().await;
        Ok(self.load().await?.products().count())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::DataStore;

    async fn store() -> (tempfile::TempDir, DataStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = DataStore::open(StoreConfig::new(dir.path())).await.unwrap();
        (dir, store)
    }

    fn input(category: &str, name: &str, price: i64) -> ProductInput {
        ProductInput {
            category: category.to_string(),
            name: name.to_string(),
            base_price: Money::from_major(price),
            description: None,
            image: None,
        }
    }

    #[tokio::test]
    async fn test_fixed_categories_created() {
        let (_dir, store) = store().await;
        let categories = store.products().categories().await.unwrap();
        for fixed in FIXED_CATEGORIES {
            assert!(categories.iter().any(|c| c == fixed), "missing {}", fixed);
        }
        assert!(store.config().products_path().exists());
    }

    #[tokio::test]
    async fn test_add_assigns_max_plus_one() {
        let (_dir, store) = store().await;
        let repo = store.products();

        let a = repo.add(&input("Hamburguesas", "Simple", 6000)).await.unwrap();
        let b = repo.add(&input("Bebidas", "Coca", 900)).await.unwrap();
        assert_eq!((a.id, b.id), (1, 2));

        repo.delete(1).await.unwrap();
        let c = repo.add(&input("Bebidas", "Agua", 700)).await.unwrap();
        assert_eq!(c.id, 3);

        assert_eq!(repo.count().await.unwrap(), 2);
        assert!(repo.get(1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_moves_category() {
        let (_dir, store) = store().await;
        let repo = store.products();
        let p = repo.add(&input("Lomitos", "Lomito", 9000)).await.unwrap();

        let moved = repo
            .update(p.id, &input("Especiales", "Lomito Especial", 9500))
            .await
            .unwrap();

        assert_eq!(moved.category, "Especiales");
        assert!(repo.list_by_category("Lomitos").await.unwrap().is_empty());
        let special = repo.list_by_category("Especiales").await.unwrap();
        assert_eq!(special.len(), 1);
        assert_eq!(special[0].base_price, Money::from_major(9500));
    }

    #[tokio::test]
    async fn test_update_missing_product() {
        let (_dir, store) = store().await;
        let err = store
            .products()
            .update(42, &input("Bebidas", "Agua", 700))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_rejects_invalid_input() {
        let (_dir, store) = store().await;
        let repo = store.products();

        assert!(matches!(
            repo.add(&input("Bebidas", "  ", 700)).await,
            Err(StoreError::Validation(_))
        ));
        assert!(matches!(
            repo.add(&input("Bebidas", "Agua", -1)).await,
            Err(StoreError::Validation(_))
        ));
        assert!(matches!(
            repo.add(&input("", "Agua", 700)).await,
            Err(StoreError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_ingredient_ref_editing() {
        let (_dir, store) = store().await;
        let repo = store.products();
        let p = repo.add(&input("Hamburguesas", "Completa", 8800)).await.unwrap();

        repo.add_ingredient_ref(p.id, IngredientRef::with_id(1, "Medallón", 1))
            .await
            .unwrap();
        repo.add_ingredient_ref(p.id, IngredientRef::named("Tomáte", 1))
            .await
            .unwrap();
        let updated = repo
            .update_ingredient_ref(p.id, 1, IngredientRef::named("Tomáte", 2))
            .await
            .unwrap();
        assert_eq!(updated.ingredient_refs[1].base_quantity, 2);

        let updated = repo.remove_ingredient_ref(p.id, 0).await.unwrap();
        assert_eq!(updated.ingredient_refs, vec![IngredientRef::named("Tomáte", 2)]);

        assert!(repo.remove_ingredient_ref(p.id, 5).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_reads_legacy_file() {
        let (dir, store) = store().await;
        std::fs::write(
            dir.path().join("productos.json"),
            r#"{
              "categorias": [
                {"nombre": "Hamburguesas", "productos": [
                  {"id": 7, "nombre": "Doble", "precio": 10500.5, "descripcion": "",
                   "ingredientes": [
                     {"nombre": "Medallón", "cantidad_base": 2, "precio_extra": 1000, "precio_resta": 500}
                   ]}
                ]}
              ]
            }"#,
        )
        .unwrap();

        let p = store.products().get(7).await.unwrap().unwrap();
        assert_eq!(p.base_price, Money::from_cents(1_050_050));
        assert_eq!(p.description, None);
        assert_eq!(p.ingredient_refs, vec![IngredientRef::named("Medallón", 2)]);

        // fixed categories were appended and written back
        let text = std::fs::read_to_string(dir.path().join("productos.json")).unwrap();
        assert!(text.contains("Empanadas"));
    }
}
