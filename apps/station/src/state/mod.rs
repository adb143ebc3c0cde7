//! # State Module
//!
//! Manages station state. Instead of a single `AppState` struct, each
//! concern gets its own type so commands take exactly what they use.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────┐  ┌──────────────┐  ┌──────────────────┐               │
//! │  │  StoreState  │  │  CartState   │  │   ConfigState    │               │
//! │  │              │  │              │  │                  │               │
//! │  │  DataStore   │  │  Arc<Mutex<  │  │  data_dir        │               │
//! │  │  (JSON files │  │    Cart      │  │  config.json     │               │
//! │  │   + mutex)   │  │  >>          │  │  + PAPUCHO_* env │               │
//! │  └──────────────┘  └──────────────┘  └──────────────────┘               │
//! │                                                                         │
//! │  THREAD SAFETY:                                                         │
//! │  • StoreState: DataStore serializes file access internally              │
//! │  • CartState: Protected by Arc<Mutex<T>> for exclusive access           │
//! │  • ConfigState: Read-only after initialization                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod cart;
mod config;
mod store;

pub use cart::{Cart, CartLine, CartState, CartTotals};
pub use config::{resolve_data_dir, ConfigState};
pub use store::StoreState;
