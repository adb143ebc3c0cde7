//! # Repository Module
//!
//! File-backed repositories for Papucho POS.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    One Repository per File                              │
//! │                                                                         │
//! │  Station command                                                       │
//! │       │                                                                 │
//! │       │  store.products().list_by_category("Hamburguesas")             │
//! │       ▼                                                                 │
//! │  ProductRepository                                                     │
//! │  ├── lock the store mutex                                              │
//! │  ├── read productos.json  (recreate if missing/corrupt)                │
//! │  ├── map file records ──► papucho_core::Product                        │
//! │  └── write back atomically (mutations only)                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  <data_dir>/productos.json                                             │
//! │                                                                         │
//! │  File records keep the legacy Spanish keys and float prices; the       │
//! │  rest of the system only ever sees domain types and Money.             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`ProductRepository`](product::ProductRepository) - Menu products and their ingredient slots
//! - [`IngredientRepository`](ingredient::IngredientRepository) - Priced ingredient catalog
//! - [`OrderCounter`](order_counter::OrderCounter) - Next order number
//! - [`SettingsRepository`](config::SettingsRepository) - Station configuration
//! - [`TicketArchive`](ticket::TicketArchive) - Ticket text backups

pub mod config;
pub mod ingredient;
pub mod order_counter;
pub mod product;
pub mod ticket;
