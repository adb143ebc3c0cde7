//! # Order Commands
//!
//! Turning the cart into a numbered order with its two tickets.
//!
//! ## Confirmation Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    confirm_order()                                      │
//! │                                                                         │
//! │  1. Validate ───────── customer name, delivery address, cart not empty  │
//! │  2. Snapshot ───────── cart lines + ingredient catalog                  │
//! │  3. Claim ──────────── order number (read and advanced in one step)     │
//! │  4. Build Order ────── engine total, timestamp                          │
//! │  5. Render ─────────── KITCHEN + CUSTOMER tickets                       │
//! │  6. Back up ────────── tickets/ticket_{cocina,cliente}_NNNN.txt         │
//! │  7. Print ──────────── each ticket, one success flag per variant        │
//! │  8. Clear ──────────── the snapshotted cart lines                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A failed print never fails the order: the backups exist and the result
//! says which copy needs reprinting. Lines added to the cart while the
//! tickets print stay in the cart for the next order.

use std::path::PathBuf;

use chrono::NaiveDateTime;
use papucho_core::pricing;
use papucho_core::validation::{validate_customer_name, validate_delivery_address};
use papucho_core::{
    CatalogSnapshot, CoreError, Fulfillment, LineItem, Money, Order, PaymentMethod, Ticket,
    TicketFormatter, TicketVariant,
};
use papucho_printer::{ticket_job, Printer};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::ApiError;
use crate::state::{CartState, ConfigState, StoreState};

/// Customer details entered at confirmation time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderRequest {
    pub customer_name: String,
    pub fulfillment: Fulfillment,
    #[serde(default)]
    pub payment_method: PaymentMethod,
}

/// Result of a confirmed order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderConfirmation {
    pub order_number: u32,
    pub total: Money,
    pub kitchen_printed: bool,
    pub customer_printed: bool,
    /// Backup files, kitchen first.
    pub ticket_paths: Vec<PathBuf>,
    /// Set when a copy did not print.
    pub message: Option<String>,
}

impl OrderConfirmation {
    pub fn fully_printed(&self) -> bool {
        self.kitchen_printed && self.customer_printed
    }
}

/// Checks and normalizes customer details.
///
/// Names and addresses are trimmed; a delivery needs an address.
fn validate_request(request: &OrderRequest) -> Result<OrderRequest, ApiError> {
    let customer_name = validate_customer_name(&request.customer_name)?;
    let fulfillment = match &request.fulfillment {
        Fulfillment::Delivery {
            address,
            estimated_time,
        } => Fulfillment::Delivery {
            address: validate_delivery_address(address)?,
            estimated_time: estimated_time.clone(),
        },
        other => other.clone(),
    };

    Ok(OrderRequest {
        customer_name,
        fulfillment,
        payment_method: request.payment_method.clone(),
    })
}

/// A validated order that has no number yet.
struct Draft {
    request: OrderRequest,
    items: Vec<LineItem>,
    /// `(cart line id, quantity)` the items were taken from.
    ordered: Vec<(u64, i64)>,
    catalog: CatalogSnapshot,
}

impl Draft {
    /// Validates the request and snapshots the cart and the catalog.
    async fn take(
        store: &StoreState,
        cart: &CartState,
        request: &OrderRequest,
    ) -> Result<Draft, ApiError> {
        let request = validate_request(request)?;

        let (items, ordered) = cart.with_cart(|c| (c.line_items(), c.line_quantities()));
        if items.is_empty() {
            return Err(CoreError::EmptyCart.into());
        }

        let catalog = store.catalog().await?;
        Ok(Draft {
            request,
            items,
            ordered,
            catalog,
        })
    }

    /// Prices the order under `order_number` and renders both tickets.
    fn render(
        self,
        order_number: u32,
        config: &ConfigState,
        placed_at: NaiveDateTime,
    ) -> (Order, [Ticket; 2], Vec<(u64, i64)>) {
        let total = pricing::order_total(&self.items, &self.catalog, &config.pricing_options());

        let order = Order {
            order_number,
            customer_name: self.request.customer_name,
            fulfillment: self.request.fulfillment,
            payment_method: self.request.payment_method,
            items: self.items,
            total,
            placed_at,
        };

        let tickets =
            TicketFormatter::new(config.ticket_config()).render_all(&order, &self.catalog);
        (order, tickets, self.ordered)
    }
}

/// Renders the tickets the cart would produce, touching nothing.
///
/// The order number shown is the one the next confirmation will use.
pub async fn preview_order(
    store: &StoreState,
    cart: &CartState,
    config: &ConfigState,
    request: &OrderRequest,
    placed_at: NaiveDateTime,
) -> Result<[Ticket; 2], ApiError> {
    debug!("preview_order command");
    let draft = Draft::take(store, cart, request).await?;
    let order_number = store.inner().order_counter().current().await?;
    let (_, tickets, _) = draft.render(order_number, config, placed_at);
    Ok(tickets)
}

/// Confirms the cart as an order.
///
/// ## Arguments
/// * `printer` - Transport for both copies; `None` when printing is
///   disabled (tickets are still backed up)
/// * `placed_at` - Local time printed in the ticket footer
///
/// The order number is claimed once the request is valid and the cart
/// is not empty, so concurrent confirmations never share a number. Only
/// the cart quantities that went into the order are removed afterwards.
///
/// ## Errors
/// Validation failures abort before a number is claimed. A storage
/// failure after the claim leaves that number unused. Print failures
/// are reported in the result, not raised.
pub async fn confirm_order<P: Printer>(
    store: &StoreState,
    cart: &CartState,
    config: &ConfigState,
    printer: Option<&P>,
    request: &OrderRequest,
    placed_at: NaiveDateTime,
) -> Result<OrderConfirmation, ApiError> {
    debug!(customer = %request.customer_name, "confirm_order command");

    let draft = Draft::take(store, cart, request).await?;
    let order_number = store.inner().order_counter().claim().await?;
    let (order, tickets, ordered) = draft.render(order_number, config, placed_at);

    let archive = store.inner().tickets();
    let mut ticket_paths = Vec::with_capacity(tickets.len());
    for ticket in &tickets {
        ticket_paths.push(archive.save(ticket).await?);
    }

    let mut failed = Vec::new();
    let mut printed = [false; 2];
    if let Some(printer) = printer {
        for (slot, ticket) in printed.iter_mut().zip(&tickets) {
            *slot = print_ticket(printer, ticket).await;
            if !*slot {
                failed.push(ticket.variant.marker());
            }
        }
    }

    cart.with_cart_mut(|c| c.remove_ordered(&ordered));

    let [kitchen_printed, customer_printed] = printed;
    let message = if printer.is_none() {
        Some("Printing disabled; tickets saved".to_string())
    } else if failed.is_empty() {
        None
    } else {
        Some(format!(
            "Order #{:04} saved but printing failed: {}",
            order.order_number,
            failed.join(", ")
        ))
    };

    info!(
        order_number = order.order_number,
        total = %order.total,
        kitchen_printed,
        customer_printed,
        lines = ordered.len(),
        "Order confirmed"
    );

    Ok(OrderConfirmation {
        order_number: order.order_number,
        total: order.total,
        kitchen_printed,
        customer_printed,
        ticket_paths,
        message,
    })
}

/// Sends one ticket to the printer; failures are logged, not raised.
async fn print_ticket<P: Printer>(printer: &P, ticket: &Ticket) -> bool {
    let data = ticket_job(ticket.lines());
    match printer.print(&data).await {
        Ok(()) => {
            debug!(
                order_number = ticket.order_number,
                variant = ticket.variant.file_tag(),
                "Ticket printed"
            );
            true
        }
        Err(e) => {
            warn!(
                order_number = ticket.order_number,
                variant = ticket.variant.file_tag(),
                error = %e,
                "Ticket print failed"
            );
            false
        }
    }
}

/// Number the next confirmed order will get.
pub async fn next_order_number(store: &StoreState) -> Result<u32, ApiError> {
    Ok(store.inner().order_counter().current().await?)
}

/// Reads a ticket backup, e.g. for reprinting.
pub async fn read_ticket_backup(
    store: &StoreState,
    variant: TicketVariant,
    order_number: u32,
) -> Result<String, ApiError> {
    store
        .inner()
        .tickets()
        .read(variant, order_number)
        .await?
        .ok_or_else(|| ApiError::not_found("Ticket", variant.file_name(order_number)))
}
