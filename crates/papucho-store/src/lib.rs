//! # papucho-store: Flat-File Storage for Papucho POS
//!
//! This crate provides persistence for the order station. Everything lives
//! in one data directory as human-editable files, so the owner can fix a
//! price with a text editor when the truck is offline.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Papucho POS Data Flow                            │
//! │                                                                         │
//! │  Station command (confirm_order)                                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   papucho-store (THIS CRATE)                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   DataStore   │    │  Repositories │    │    files     │  │   │
//! │  │   │  (store.rs)   │    │               │    │              │  │   │
//! │  │   │               │    │ Products      │    │ atomic write │  │   │
//! │  │   │ StoreConfig   │◄───│ Ingredients   │───►│ tmp + rename │  │   │
//! │  │   │ write mutex   │    │ OrderCounter  │    │ recreate     │  │   │
//! │  │   │               │    │ Settings      │    │ corrupt .bak │  │   │
//! │  │   └───────────────┘    │ TicketArchive │    └──────────────┘  │   │
//! │  │                        └───────────────┘                      │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │  <data_dir>/ productos.json  ingredientes.json  config.json     │   │
//! │  │              orden_actual.txt  tickets/                         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`store`] - Data directory configuration and repository access
//! - [`repository`] - One repository per data file
//! - [`error`] - Storage error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use papucho_store::{DataStore, StoreConfig};
//!
//! let store = DataStore::open(StoreConfig::new("./data")).await?;
//!
//! let catalog = store.catalog_snapshot().await?;
//! let order_number = store.order_counter().current().await?;
//! let burgers = store.products().list_by_category("Hamburguesas").await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
mod files;
pub mod repository;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{StoreError, StoreResult};
pub use store::{DataStore, StoreConfig};

// Repository re-exports for convenience
pub use repository::config::{
    PricingSettings, PrinterSettings, SettingsRepository, StationSettings, TicketSettings,
};
pub use repository::ingredient::{IngredientInput, IngredientRepository};
pub use repository::order_counter::OrderCounter;
pub use repository::product::{ProductInput, ProductRepository};
pub use repository::ticket::TicketArchive;
