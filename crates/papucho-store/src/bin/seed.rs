//! # Seed Data Generator
//!
//! Populates a data directory with a sample food-truck menu for development.
//!
//! ## Usage
//! ```bash
//! # Seed ./data
//! cargo run -p papucho-store --bin seed
//!
//! # Specify the data directory
//! cargo run -p papucho-store --bin seed -- --data /tmp/papucho
//! ```
//!
//! ## Generated Catalog
//! - Burger ingredients with extra/removal prices (Medallón, Tomáte, Queso...)
//! - Burgers whose ingredient slots reference those ingredients by id
//! - Drinks and fries without ingredients (never customizable)
//!
//! Seeding is skipped when the data directory already has products.

use std::env;

use papucho_core::{IngredientRef, Money};
use papucho_store::{DataStore, IngredientInput, ProductInput, StoreConfig};

/// (name, categories, extra price, removal price)
const INGREDIENTS: &[(&str, &[&str], i64, i64)] = &[
    ("Medallón", &["Hamburguesas"], 1000, 500),
    ("Tomáte", &["Hamburguesas", "Lomitos", "Milanesas"], 500, 500),
    ("Queso", &["Hamburguesas", "Lomitos", "Milanesas"], 300, 100),
    ("Lechuga", &["Hamburguesas", "Lomitos", "Milanesas"], 200, 0),
    ("Huevo", &["Hamburguesas", "Lomitos"], 400, 0),
    ("Jamón", &["Hamburguesas", "Lomitos", "Milanesas"], 500, 200),
    ("Panceta", &["Hamburguesas"], 700, 300),
    ("Cebolla", &["Hamburguesas", "Lomitos"], 200, 0),
];

/// (category, name, price, description, [(ingredient, base quantity)])
type SeedProduct = (&'static str, &'static str, i64, &'static str, &'static [(&'static str, u32)]);

const PRODUCTS: &[SeedProduct] = &[
    (
        "Hamburguesas",
        "Hamburguesa Simple",
        6500,
        "Medallón, queso",
        &[("Medallón", 1), ("Queso", 1)],
    ),
    (
        "Hamburguesas",
        "Hamburguesa Completa",
        8800,
        "Medallón, tomate, lechuga, queso, jamón, huevo",
        &[
            ("Medallón", 1),
            ("Tomáte", 1),
            ("Lechuga", 1),
            ("Queso", 1),
            ("Jamón", 1),
            ("Huevo", 1),
        ],
    ),
    (
        "Hamburguesas",
        "Hamburguesa Doble Bacon",
        10500,
        "Doble medallón, panceta, cebolla, queso",
        &[("Medallón", 2), ("Panceta", 1), ("Cebolla", 1), ("Queso", 2)],
    ),
    (
        "Lomitos",
        "Lomito Completo",
        11000,
        "Lomo, jamón, queso, huevo, lechuga, tomate",
        &[
            ("Jamón", 1),
            ("Queso", 1),
            ("Huevo", 1),
            ("Lechuga", 1),
            ("Tomáte", 1),
        ],
    ),
    (
        "Milanesas",
        "Milanesa Napolitana",
        9500,
        "Jamón, queso, tomate",
        &[("Jamón", 1), ("Queso", 1), ("Tomáte", 1)],
    ),
    ("Fritas", "Papas Fritas", 4000, "Porción grande", &[]),
    ("Empanadas", "Empanada de Carne", 1200, "Cortada a cuchillo", &[]),
    ("Bebidas", "Coca-Cola 500ml", 1800, "", &[]),
    ("Bebidas", "Agua Mineral 500ml", 1200, "", &[]),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut data_dir = String::from("./data");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--data" | "-d" => {
                if i + 1 < args.len() {
                    data_dir = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Papucho POS Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --data <DIR>   Data directory (default: ./data)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("Papucho POS Seed Data Generator");
    println!("===============================");
    println!("Data directory: {}", data_dir);
    println!();

    let store = DataStore::open(StoreConfig::new(&data_dir)).await?;
    println!("✓ Data directory ready");

    // Check existing products
    let existing = store.products().count().await?;
    if existing > 0 {
        println!("⚠ Data directory already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete productos.json and ingredientes.json to regenerate.");
        return Ok(());
    }

    // Ingredients first: products reference them by id
    let ingredients = store.ingredients();
    for (name, categories, extra, removal) in INGREDIENTS {
        let input = IngredientInput {
            name: name.to_string(),
            categories: categories.iter().map(|c| c.to_string()).collect(),
            extra_price: Money::from_major(*extra),
            removal_price: Money::from_major(*removal),
        };
        if ingredients.get_by_name(name).await?.is_none() {
            ingredients.add(&input).await?;
        }
    }
    println!("✓ {} ingredients", ingredients.list().await?.len());

    let products = store.products();
    for (category, name, price, description, slots) in PRODUCTS {
        let product = products
            .add(&ProductInput {
                category: category.to_string(),
                name: name.to_string(),
                base_price: Money::from_major(*price),
                description: Some(description.to_string()),
                image: None,
            })
            .await?;

        for (ingredient_name, base_quantity) in slots.iter() {
            let ingredient_ref = match ingredients.get_by_name(ingredient_name).await? {
                Some(ingredient) => {
                    IngredientRef::with_id(ingredient.id, ingredient.name, *base_quantity)
                }
                None => IngredientRef::named(*ingredient_name, *base_quantity),
            };
            products.add_ingredient_ref(product.id, ingredient_ref).await?;
        }
    }
    println!("✓ {} products", products.count().await?);

    let next_order = store.order_counter().current().await?;
    store.settings().load().await?;
    println!("✓ Configuration ready, next order #{:04}", next_order);

    println!();
    println!("Seed complete!");

    Ok(())
}
