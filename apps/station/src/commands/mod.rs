//! # Commands Module
//!
//! Everything the order screen can ask the station to do.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs      ◄─── You are here (exports)
//! ├── catalog.rs  ◄─── Menu, ingredients, price quotes
//! ├── cart.rs     ◄─── Cart manipulation
//! ├── order.rs    ◄─── Preview, confirmation, order counter
//! └── config.rs   ◄─── Configuration and printer status
//! ```
//!
//! ## State Injection
//! Each command declares only the state it needs:
//! ```rust,ignore
//! // Only needs the data directory
//! async fn list_catalog(store: &StoreState)
//!
//! // Needs the cart too, and the config for pricing options
//! async fn add_to_cart(store: &StoreState, cart: &CartState, config: &ConfigState, ...)
//!
//! // Generic over the printer so tests can swap it
//! async fn confirm_order<P: Printer>(..., printer: Option<&P>, ...)
//! ```

pub mod cart;
pub mod catalog;
pub mod config;
pub mod order;

#[cfg(test)]
pub(crate) mod testing {
    //! Shared fixtures: a data directory with two burgers' worth of catalog.

    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use chrono::{NaiveDate, NaiveDateTime};
    use papucho_core::{IngredientRef, Money};
    use papucho_printer::{PrintError, PrintResult, Printer};
    use papucho_store::{DataStore, IngredientInput, ProductInput, StationSettings, StoreConfig};

    use crate::state::{ConfigState, StoreState};

    pub const COMPLETA: i64 = 1;
    pub const PAPAS: i64 = 2;

    pub async fn burger_station(dir: &tempfile::TempDir) -> (StoreState, ConfigState) {
        let store = DataStore::open(StoreConfig::new(dir.path())).await.unwrap();

        let ingredients = store.ingredients();
        let mut ids = Vec::new();
        let catalog = [
            ("Medallón", 1000, 500),
            ("Tomáte", 500, 500),
            ("Queso", 300, 100),
        ];
        for (name, extra, removal) in catalog {
            let ingredient = ingredients
                .add(&IngredientInput {
                    name: name.to_string(),
                    categories: vec!["Hamburguesas".to_string()],
                    extra_price: Money::from_major(extra),
                    removal_price: Money::from_major(removal),
                })
                .await
                .unwrap();
            ids.push(ingredient.id);
        }

        let products = store.products();
        let completa = products
            .add(&ProductInput {
                category: "Hamburguesas".into(),
                name: "Hamburguesa Completa".into(),
                base_price: Money::from_major(8800),
                description: None,
                image: None,
            })
            .await
            .unwrap();
        assert_eq!(completa.id, COMPLETA);
        products
            .add_ingredient_ref(COMPLETA, IngredientRef::with_id(ids[0], "Medallón", 1))
            .await
            .unwrap();
        products
            .add_ingredient_ref(COMPLETA, IngredientRef::with_id(ids[1], "Tomáte", 1))
            .await
            .unwrap();

        let papas = products
            .add(&ProductInput {
                category: "Fritas".into(),
                name: "Papas Fritas".into(),
                base_price: Money::from_major(4000),
                description: None,
                image: None,
            })
            .await
            .unwrap();
        assert_eq!(papas.id, PAPAS);

        let config = ConfigState::new(dir.path(), StationSettings::default());
        (StoreState::new(store), config)
    }

    pub fn placed_at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 17)
            .and_then(|d| d.and_hms_opt(20, 45, 0))
            .unwrap()
    }

    /// Records jobs; fails every job after the first `ok_jobs`.
    #[derive(Debug, Default)]
    pub struct MockPrinter {
        jobs: Mutex<Vec<Vec<u8>>>,
        ok_jobs: Option<usize>,
        attempts: AtomicUsize,
    }

    impl MockPrinter {
        pub fn failing_after(ok_jobs: usize) -> Self {
            MockPrinter {
                ok_jobs: Some(ok_jobs),
                ..Default::default()
            }
        }

        pub fn jobs(&self) -> Vec<Vec<u8>> {
            self.jobs.lock().unwrap().clone()
        }
    }

    impl Printer for MockPrinter {
        async fn print(&self, data: &[u8]) -> PrintResult<()> {
            let attempt = self.attempts.fetch_add(1, Ordering::SeqCst);
            if self.ok_jobs.is_some_and(|ok| attempt >= ok) {
                return Err(PrintError::Offline("mock".into()));
            }
            self.jobs.lock().unwrap().push(data.to_vec());
            Ok(())
        }

        async fn is_online(&self) -> bool {
            self.ok_jobs.is_none()
        }
    }
}
