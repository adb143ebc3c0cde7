//! # Store State
//!
//! Wraps the `DataStore` for use in commands.
//!
//! ## Thread Safety
//! `DataStore` is a cheap handle: clones share one async mutex that
//! serializes every read-modify-write on the data files, so commands can
//! run concurrently without extra locking.
//!
//! ## Usage in Commands
//! ```rust,ignore
//! async fn list_catalog(store: &StoreState) -> Result<Vec<CategoryView>, ApiError> {
//!     let products = store.inner().products().list().await?;
//!     ...
//! }
//! ```

use papucho_core::{CatalogSnapshot, Product};
use papucho_store::{DataStore, StoreResult};

use crate::error::ApiError;

/// Wrapper around `DataStore` for station state.
#[derive(Debug, Clone)]
pub struct StoreState {
    store: DataStore,
}

impl StoreState {
    /// Creates a new StoreState wrapping the data directory.
    pub fn new(store: DataStore) -> Self {
        StoreState { store }
    }

    /// Returns a reference to the inner DataStore.
    pub fn inner(&self) -> &DataStore {
        &self.store
    }

    /// Fresh point-in-time copy of the ingredient catalog.
    pub async fn catalog(&self) -> StoreResult<CatalogSnapshot> {
        self.store.catalog_snapshot().await
    }

    /// Product by id, as a command error when missing.
    pub async fn product(&self, id: i64) -> Result<Product, ApiError> {
        self.store
            .products()
            .get(id)
            .await?
            .ok_or_else(|| ApiError::not_found("Product", id))
    }
}
