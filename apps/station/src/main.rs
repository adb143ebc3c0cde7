//! # Papucho Station Entry Point
//!
//! Command line front end for the order station.
//!
//! ## Usage
//! ```bash
//! # Menu with prices and ingredient slots
//! papucho-station catalog
//!
//! # Price a burger with two medallions and no tomato
//! papucho-station quote 1 --mod "Medallón=2" --mod "Tomáte=0"
//!
//! # Show both tickets for a cart without saving or printing anything
//! papucho-station preview -i "1x2:Medallón=2" -i 6 --customer Ana --payment efectivo
//!
//! # Confirm: back up, print, advance the order number
//! papucho-station confirm -i 1 --customer Juan --delivery "San Martín 123" --time "30 min"
//!
//! # Number the next order will get
//! papucho-station next-order
//! ```
//!
//! Items are `ID[xQTY][:NAME=QTY,...]`; the optional part after `:` sets
//! absolute ingredient quantities for that line.

use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use chrono::Local;
use clap::{Args, Parser, Subcommand};
use papucho_core::{Fulfillment, Modifications, PaymentMethod};
use papucho_station::commands::{cart, catalog, order};
use papucho_station::{init_tracing, Station};

#[derive(Debug, Parser)]
#[command(name = "papucho-station", version, about = "Papucho POS order station")]
struct Cli {
    /// Data directory (default: PAPUCHO_DATA_DIR or the platform data dir)
    #[arg(long, short, global = true, value_name = "DIR")]
    data: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List the menu by category
    Catalog,

    /// Price one unit of a product with modifications
    Quote {
        /// Product id
        product: i64,

        /// Ingredient quantity, repeatable
        #[arg(long = "mod", value_name = "NAME=QTY")]
        mods: Vec<String>,
    },

    /// Render both tickets for a cart without side effects
    Preview(OrderArgs),

    /// Confirm an order: back up and print tickets, advance the counter
    Confirm(OrderArgs),

    /// Show the next order number
    NextOrder,
}

#[derive(Debug, Args)]
struct OrderArgs {
    /// Cart line, repeatable: ID[xQTY][:NAME=QTY,...]
    #[arg(long = "item", short = 'i', required = true, value_name = "ITEM")]
    items: Vec<String>,

    /// Customer name
    #[arg(long)]
    customer: String,

    /// Efectivo, Transferencia, Tarjeta, anything else, or empty when undecided
    #[arg(long, default_value = "")]
    payment: String,

    /// Delivery address
    #[arg(long, conflicts_with = "table")]
    delivery: Option<String>,

    /// Served at a table
    #[arg(long)]
    table: bool,

    /// Estimated time, e.g. "20 min"
    #[arg(long)]
    time: Option<String>,
}

impl OrderArgs {
    fn request(&self) -> order::OrderRequest {
        let fulfillment = match (&self.delivery, self.table) {
            (Some(address), _) => Fulfillment::Delivery {
                address: address.clone(),
                estimated_time: self.time.clone(),
            },
            (None, true) => Fulfillment::TableService,
            (None, false) => Fulfillment::Pickup {
                estimated_time: self.time.clone(),
            },
        };

        order::OrderRequest {
            customer_name: self.customer.clone(),
            fulfillment,
            payment_method: PaymentMethod::from(self.payment.as_str()),
        }
    }
}

/// One `--item` argument.
#[derive(Debug, PartialEq)]
struct ItemSpec {
    product_id: i64,
    quantity: i64,
    modifications: Modifications,
}

fn parse_item(spec: &str) -> Result<ItemSpec> {
    let (head, mods) = match spec.split_once(':') {
        Some((head, mods)) => (head, Some(mods)),
        None => (spec, None),
    };

    let (id, quantity) = match head.split_once(['x', 'X']) {
        Some((id, qty)) => (
            id,
            qty.trim()
                .parse::<i64>()
                .with_context(|| format!("bad quantity in '{spec}'"))?,
        ),
        None => (head, 1),
    };
    let product_id = id
        .trim()
        .parse::<i64>()
        .with_context(|| format!("bad product id in '{spec}'"))?;

    let mut modifications = Modifications::new();
    let entries = mods
        .into_iter()
        .flat_map(|m| m.split(','))
        .filter(|e| !e.trim().is_empty());
    for entry in entries {
        let (name, qty) = parse_mod(entry)?;
        modifications.set(name, qty);
    }

    Ok(ItemSpec {
        product_id,
        quantity,
        modifications,
    })
}

fn parse_mod(entry: &str) -> Result<(String, u32)> {
    let (name, qty) = entry
        .split_once('=')
        .ok_or_else(|| anyhow!("expected NAME=QTY, got '{entry}'"))?;
    let name = name.trim();
    if name.is_empty() {
        bail!("missing ingredient name in '{entry}'");
    }
    let qty = qty
        .trim()
        .parse::<u32>()
        .with_context(|| format!("bad ingredient quantity in '{entry}'"))?;
    Ok((name.to_string(), qty))
}

async fn fill_cart(station: &Station, items: &[String]) -> Result<()> {
    for spec in items {
        let item = parse_item(spec)?;
        let modifications = Some(item.modifications).filter(|m| !m.is_empty());
        cart::add_to_cart(
            &station.store,
            &station.cart,
            &station.config,
            item.product_id,
            Some(item.quantity),
            modifications,
        )
        .await?;
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let station = Station::open(cli.data.as_deref()).await?;

    match cli.command {
        Command::Catalog => {
            for category in catalog::list_catalog(&station.store).await? {
                println!("{}", category.name);
                for product in category.products {
                    println!("  [{}] {}  {}", product.id, product.name, product.base_price);
                    for slot in &product.ingredients {
                        println!("        {} x{}", slot.name, slot.base_quantity);
                    }
                }
            }
        }

        Command::Quote { product, mods } => {
            let mut modifications = Modifications::new();
            for entry in &mods {
                let (name, qty) = parse_mod(entry)?;
                modifications.set(name, qty);
            }
            let quote =
                catalog::quote_product(&station.store, &station.config, product, &modifications)
                    .await?;
            println!("{}  {}", quote.name, quote.base_price);
            for delta in &quote.deltas {
                println!(
                    "  {:?} {} x{}  {}",
                    delta.kind,
                    delta.name,
                    delta.count,
                    delta.amount(1).signed()
                );
            }
            println!("Unit price: {}", quote.unit_price);
        }

        Command::Preview(args) => {
            fill_cart(&station, &args.items).await?;
            let tickets = order::preview_order(
                &station.store,
                &station.cart,
                &station.config,
                &args.request(),
                Local::now().naive_local(),
            )
            .await?;
            for ticket in &tickets {
                print!("{}", ticket.to_text());
            }
        }

        Command::Confirm(args) => {
            fill_cart(&station, &args.items).await?;
            let printer = station.printer()?;
            let confirmation = order::confirm_order(
                &station.store,
                &station.cart,
                &station.config,
                printer.as_ref(),
                &args.request(),
                Local::now().naive_local(),
            )
            .await?;

            println!(
                "Order #{:04} confirmed, total {}",
                confirmation.order_number, confirmation.total
            );
            for path in &confirmation.ticket_paths {
                println!("  saved {}", path.display());
            }
            if let Some(message) = &confirmation.message {
                eprintln!("{}", message);
            }
        }

        Command::NextOrder => {
            println!("{:04}", order::next_order_number(&station.store).await?);
        }
    }

    Ok(())
}
