//! Papucho Printer - ESC/POS output for kitchen and customer tickets
//!
//! Pure printing infrastructure: it knows how to turn finished ticket lines
//! into printer bytes and how to deliver them, never what a ticket says.
//!
//! ```text
//! Ticket lines ──► ticket_job() ──► bytes ──► Printer::print()
//!                  ESC @ / ESC t 16           ├─ SpoolerPrinter (lpr -o raw)
//!                  cp1252 text / GS V 0       └─ NetworkPrinter (TCP 9100)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use papucho_printer::{ticket_job, NetworkPrinter, Printer};
//!
//! let data = ticket_job(ticket.lines());
//! let printer = NetworkPrinter::new("192.168.0.50", 9100)?;
//! printer.print(&data).await?;
//! ```

pub mod encoding;
pub mod error;
pub mod escpos;
pub mod printer;

pub use encoding::{decode_cp1252, encode_cp1252, is_printable};
pub use error::{PrintError, PrintResult};
pub use escpos::{ticket_job, EscPosBuilder};
pub use printer::{AnyPrinter, NetworkPrinter, Printer, PrinterTarget, SpoolerPrinter};
