//! # Tickets
//!
//! Plain-text rendering of confirmed orders for 58/76/80 mm thermal paper.
//!
//! - [`layout`] - column-exact text primitives (center, right-align, wrap)
//! - [`formatter`] - the kitchen and customer ticket layouts
//!
//! Output is plain text only. Turning it into printer bytes (code page,
//! cut command) is the job of `papucho-printer`.

pub mod formatter;
pub mod layout;

pub use formatter::{Ticket, TicketConfig, TicketFormatter};
