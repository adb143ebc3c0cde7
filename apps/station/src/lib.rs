//! # Papucho Station Library
//!
//! Core library for the order station: the state, the commands and the
//! startup sequence. The binary in `main.rs` only parses arguments and
//! prints results.
//!
//! ## Module Organization
//! ```text
//! papucho_station/
//! ├── lib.rs          ◄─── You are here (startup, logging)
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── store.rs    ◄─── Data directory wrapper
//! │   ├── cart.rs     ◄─── Cart state management
//! │   └── config.rs   ◄─── config.json + environment overrides
//! ├── commands/
//! │   ├── mod.rs      ◄─── Command exports
//! │   ├── catalog.rs  ◄─── Menu and price quotes
//! │   ├── cart.rs     ◄─── Cart manipulation commands
//! │   ├── order.rs    ◄─── Order preview and confirmation
//! │   └── config.rs   ◄─── Configuration and printer status
//! └── error.rs        ◄─── API error type for commands
//! ```

pub mod commands;
pub mod error;
pub mod state;

use std::path::Path;

use papucho_printer::AnyPrinter;
use papucho_store::{DataStore, StoreConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

use error::ApiError;
use state::{resolve_data_dir, CartState, ConfigState, StoreState};

/// Everything a running station holds.
#[derive(Debug, Clone)]
pub struct Station {
    pub store: StoreState,
    pub cart: CartState,
    pub config: ConfigState,
}

impl Station {
    /// Opens the station.
    ///
    /// ## Startup Sequence
    /// ```text
    /// ┌─────────────────────────────────────────────────────────────────────────┐
    /// │                       Station Startup                                   │
    /// │                                                                         │
    /// │  1. Determine Data Directory ─────────────────────────────────────────► │
    /// │     • --data argument, else PAPUCHO_DATA_DIR, else platform dir         │
    /// │                                                                         │
    /// │  2. Open Data Store ──────────────────────────────────────────────────► │
    /// │     • Creates the directory and tickets/ if missing                     │
    /// │                                                                         │
    /// │  3. Load Configuration ───────────────────────────────────────────────► │
    /// │     • config.json (written with defaults on first run)                  │
    /// │     • PAPUCHO_* overrides                                               │
    /// │                                                                         │
    /// │  4. Initialize State Objects ─────────────────────────────────────────► │
    /// │     • StoreState, empty CartState, ConfigState                          │
    /// └─────────────────────────────────────────────────────────────────────────┘
    /// ```
    pub async fn open(data_dir: Option<&Path>) -> Result<Self, ApiError> {
        let data_dir = resolve_data_dir(data_dir);
        info!(data_dir = %data_dir.display(), "Starting Papucho station");

        let store = DataStore::open(StoreConfig::new(&data_dir)).await?;
        let settings = store.settings().load().await?;
        let config = ConfigState::from_env(&data_dir, settings);

        info!(
            paper_mm = config.settings.printer.paper_mm,
            printing = config.settings.printer.enabled,
            "Configuration loaded"
        );

        Ok(Station {
            store: StoreState::new(store),
            cart: CartState::new(),
            config,
        })
    }

    /// Connects the configured printer; `None` when printing is disabled.
    pub fn printer(&self) -> Result<Option<AnyPrinter>, ApiError> {
        match self.config.printer_target() {
            Some(target) => Ok(Some(target.connect()?)),
            None => Ok(None),
        }
    }
}

/// Initializes the tracing subscriber for structured logging.
///
/// Logs go to stderr so command output on stdout stays clean.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=papucho_store=trace` - Trace a single crate
/// - Default: INFO, DEBUG for papucho crates
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,papucho=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
