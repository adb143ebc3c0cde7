//! # Ticket Archive
//!
//! Every rendered ticket is kept as plain UTF-8 text under the tickets
//! directory, one file per variant and order:
//!
//! ```text
//! tickets/
//! ├── ticket_cocina_0042.txt
//! └── ticket_cliente_0042.txt
//! ```
//!
//! Backups are written before printing, so a jammed printer never loses an
//! order. Re-rendering an order number overwrites its files.

use std::path::PathBuf;

use papucho_core::{Ticket, TicketVariant};
use tracing::debug;

use crate::error::StoreResult;
use crate::files;

/// Writes and reads ticket backups.
#[derive(Debug, Clone)]
pub struct TicketArchive {
    dir: PathBuf,
}

impl TicketArchive {
    pub(crate) fn new(dir: PathBuf) -> Self {
        TicketArchive { dir }
    }

    /// Path of the backup for one variant of an order.
    pub fn path_for(&self, variant: TicketVariant, order_number: u32) -> PathBuf {
        self.dir.join(variant.file_name(order_number))
    }

    /// Saves a ticket and returns the file it was written to.
    pub async fn save(&self, ticket: &Ticket) -> StoreResult<PathBuf> {
        let path = self.path_for(ticket.variant, ticket.order_number);
        files::write_text(&path, &ticket.to_text()).await?;

        debug!(
            order = ticket.order_number,
            variant = %ticket.variant,
            path = %path.display(),
            "Ticket backup written"
        );
        Ok(path)
    }

    /// Reads a backup back, `None` if it was never written.
    pub async fn read(
        &self,
        variant: TicketVariant,
        order_number: u32,
    ) -> StoreResult<Option<String>> {
        files::read_text(&self.path_for(variant, order_number)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use papucho_core::{
        CatalogSnapshot, Fulfillment, LineItem, Money, Order, PaymentMethod, Product,
        TicketFormatter,
    };

    fn order() -> Order {
        let agua = Product {
            id: 3,
            name: "Agua".to_string(),
            category: "Bebidas".to_string(),
            base_price: Money::from_major(700),
            description: None,
            image: None,
            ingredient_refs: vec![],
        };
        Order {
            order_number: 7,
            customer_name: "Luis".to_string(),
            fulfillment: Fulfillment::TableService,
            payment_method: PaymentMethod::Cash,
            items: vec![LineItem::new(agua, 2)],
            total: Money::from_major(1400),
            placed_at: NaiveDate::from_ymd_opt(2025, 1, 2)
                .and_then(|d| d.and_hms_opt(12, 0, 0))
                .unwrap(),
        }
    }

    #[tokio::test]
    async fn test_save_and_read_both_variants() {
        let dir = tempfile::tempdir().unwrap();
        let archive = TicketArchive::new(dir.path().join("tickets"));
        let [kitchen, customer] =
            TicketFormatter::default().render_all(&order(), &CatalogSnapshot::empty());

        let kitchen_path = archive.save(&kitchen).await.unwrap();
        let customer_path = archive.save(&customer).await.unwrap();

        assert!(kitchen_path.ends_with("ticket_cocina_0007.txt"));
        assert!(customer_path.ends_with("ticket_cliente_0007.txt"));

        let text = archive.read(TicketVariant::Kitchen, 7).await.unwrap().unwrap();
        assert_eq!(text, kitchen.to_text());
        assert!(text.contains("Tipo: Mesa"));
        assert!(archive.read(TicketVariant::Kitchen, 8).await.unwrap().is_none());
    }
}
