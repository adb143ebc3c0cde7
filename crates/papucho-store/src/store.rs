//! # Data Store
//!
//! Opens the data directory and hands out repositories.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Data Directory                                 │
//! │                                                                         │
//! │  Station startup                                                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StoreConfig::new(dir) ← File names, tickets directory                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DataStore::open(config).await ← Creates directories                   │
//! │       │                                                                 │
//! │       ├── products()       → productos.json                             │
//! │       ├── ingredients()    → ingredientes.json (+ productos.json)       │
//! │       ├── order_counter()  → orden_actual.txt                           │
//! │       ├── settings()       → config.json                                │
//! │       └── tickets()        → tickets/ticket_*_NNNN.txt                  │
//! │                                                                         │
//! │  All repositories share ONE async mutex: a read-modify-write cycle     │
//! │  on any file never interleaves with another one.                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use papucho_core::CatalogSnapshot;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::error::{StoreError, StoreResult};
use crate::repository::config::SettingsRepository;
use crate::repository::ingredient::IngredientRepository;
use crate::repository::order_counter::OrderCounter;
use crate::repository::product::ProductRepository;
use crate::repository::ticket::TicketArchive;

pub const PRODUCTS_FILE: &str = "productos.json";
pub const INGREDIENTS_FILE: &str = "ingredientes.json";
pub const ORDER_COUNTER_FILE: &str = "orden_actual.txt";
pub const SETTINGS_FILE: &str = "config.json";
pub const TICKETS_DIR: &str = "tickets";

// =============================================================================
// Configuration
// =============================================================================

/// Where the data files live.
///
/// ## Example
/// ```rust,ignore
/// let config = StoreConfig::new("./data").tickets_dir("/var/spool/papucho");
/// ```
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Directory holding the JSON files and the order counter.
    pub data_dir: PathBuf,

    /// Directory for ticket backups.
    /// Default: `<data_dir>/tickets`
    pub tickets_dir: PathBuf,
}

impl StoreConfig {
    /// Creates a configuration rooted at `data_dir`.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        StoreConfig {
            tickets_dir: data_dir.join(TICKETS_DIR),
            data_dir,
        }
    }

    /// Sets the ticket backup directory.
    pub fn tickets_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.tickets_dir = dir.into();
        self
    }

    pub fn products_path(&self) -> PathBuf {
        self.data_dir.join(PRODUCTS_FILE)
    }

    pub fn ingredients_path(&self) -> PathBuf {
        self.data_dir.join(INGREDIENTS_FILE)
    }

    pub fn order_counter_path(&self) -> PathBuf {
        self.data_dir.join(ORDER_COUNTER_FILE)
    }

    pub fn settings_path(&self) -> PathBuf {
        self.data_dir.join(SETTINGS_FILE)
    }
}

// =============================================================================
// Data Store
// =============================================================================

/// Handle to the data directory. Cheap to clone.
///
/// ## Usage
/// ```rust,ignore
/// let store = DataStore::open(StoreConfig::new("./data")).await?;
/// let burgers = store.products().list_by_category("Hamburguesas").await?;
/// let catalog = store.catalog_snapshot().await?;
/// ```
#[derive(Debug, Clone)]
pub struct DataStore {
    config: Arc<StoreConfig>,
    lock: Arc<Mutex<()>>,
}

impl DataStore {
    /// Opens (and creates, if needed) the data directory.
    ///
    /// Data files themselves are created lazily, on first access.
    pub async fn open(config: StoreConfig) -> StoreResult<Self> {
        info!(
            data_dir = %config.data_dir.display(),
            tickets_dir = %config.tickets_dir.display(),
            "Opening data store"
        );

        for dir in [&config.data_dir, &config.tickets_dir] {
            tokio::fs::create_dir_all(dir)
                .await
                .map_err(|e| StoreError::io(dir, e))?;
        }
        debug!("Data directories ready");

        Ok(DataStore {
            config: Arc::new(config),
            lock: Arc::new(Mutex::new(())),
        })
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn data_dir(&self) -> &Path {
        &self.config.data_dir
    }

    /// Returns the product repository.
    pub fn products(&self) -> ProductRepository {
        ProductRepository::new(self.config.clone(), self.lock.clone())
    }

    /// Returns the ingredient catalog repository.
    pub fn ingredients(&self) -> IngredientRepository {
        IngredientRepository::new(self.config.clone(), self.lock.clone())
    }

    /// Returns the persistent order counter.
    pub fn order_counter(&self) -> OrderCounter {
        OrderCounter::new(self.config.order_counter_path(), self.lock.clone())
    }

    /// Returns the station settings repository.
    pub fn settings(&self) -> SettingsRepository {
        SettingsRepository::new(self.config.settings_path(), self.lock.clone())
    }

    /// Returns the ticket backup archive.
    pub fn tickets(&self) -> TicketArchive {
        TicketArchive::new(self.config.tickets_dir.clone())
    }

    /// Shortcut for `ingredients().snapshot()`.
    pub async fn catalog_snapshot(&self) -> StoreResult<CatalogSnapshot> {
        self.ingredients().snapshot().await
    }

    /// Checks that the data directory still exists and is a directory.
    pub async fn health_check(&self) -> bool {
        tokio::fs::metadata(&self.config.data_dir)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_open_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("datos");

        let store = DataStore::open(StoreConfig::new(&root)).await.unwrap();

        assert!(store.health_check().await);
        assert!(root.join(TICKETS_DIR).is_dir());
    }

    #[test]
    fn test_config_paths() {
        let config = StoreConfig::new("/srv/papucho").tickets_dir("/tmp/tickets");

        assert_eq!(config.products_path(), PathBuf::from("/srv/papucho/productos.json"));
        assert_eq!(
            config.order_counter_path(),
            PathBuf::from("/srv/papucho/orden_actual.txt")
        );
        assert_eq!(config.tickets_dir, PathBuf::from("/tmp/tickets"));
    }
}
