//! # Ticket Formatter
//!
//! Renders an [`Order`] into the kitchen and customer tickets.
//!
//! ## Layout (48 columns)
//! ```text
//!                PAPUCHO FOODTRUCK
//! ================================================
//!                   Order #0042
//! ================================================
//! Cliente: Ana
//! Tipo: Para llevar
//! PEDIDO:
//! 2 Hamburguesa Completa                 $17600.00
//! Extra Queso                             +$600.00
//! Sin Tomáte                             -$1000.00
//! ------------------------------------------------
//! TOTAL A PAGAR:                         $16600.00
//! ------------------------------------------------
//! Forma de pago: Efectivo
//!           Pagado  /  Pendiente de pago   (kitchen only)
//! ================================================
//!                  === COCINA ===
//!                 16/03/2025 21:40
//! ================================================
//! (cut_lines blank lines)
//! ```
//!
//! The item line prints `base_price × quantity`; every ingredient change
//! gets its own sub-line with its signed contribution for the whole line.
//! `TOTAL A PAGAR` is the order total as computed by the pricing engine.
//!
//! Rendering is pure: the timestamp comes from [`Order::placed_at`], so the
//! same order always renders to the same text.

use serde::{Deserialize, Serialize};

use crate::catalog::IngredientLookup;
use crate::pricing::{self, DeltaKind, IngredientDelta};
use crate::types::{Fulfillment, LineItem, Order, PaymentMethod, TicketVariant};

use super::layout::{self, center, right_align_price, rule, truncate_with_ellipsis, wrap};

const PAYMENT_OPTIONS: &str = "Efectivo   Transferencia   Tarjeta";
const PAYMENT_STATUS: &str = "Pagado  /  Pendiente de pago";
const TIMESTAMP_FORMAT: &str = "%d/%m/%Y %H:%M";

/// Continuation indent for wrapped addresses.
const WRAP_INDENT: usize = 2;

// =============================================================================
// Configuration
// =============================================================================

/// Ticket layout settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketConfig {
    /// First line of every ticket.
    pub business_name: String,
    /// Characters per line.
    pub width: usize,
    /// Print the order timestamp in the footer.
    pub include_timestamp: bool,
    /// Blank lines fed after the footer so the cutter clears the text.
    pub cut_lines: usize,
}

impl Default for TicketConfig {
    fn default() -> Self {
        TicketConfig {
            business_name: "PAPUCHO FOODTRUCK".to_string(),
            width: layout::DEFAULT_WIDTH,
            include_timestamp: true,
            cut_lines: 3,
        }
    }
}

impl TicketConfig {
    /// Characters per line for a paper roll width in millimetres.
    ///
    /// | paper  | columns |
    /// |--------|---------|
    /// | ≥80 mm | 48      |
    /// | ≥76 mm | 42      |
    /// | other  | 32      |
    pub fn width_for_paper_mm(paper_mm: u32) -> usize {
        if paper_mm >= 80 {
            48
        } else if paper_mm >= 76 {
            42
        } else {
            32
        }
    }

    /// Default settings for a given roll width.
    pub fn for_paper_mm(paper_mm: u32) -> Self {
        TicketConfig {
            width: Self::width_for_paper_mm(paper_mm),
            ..TicketConfig::default()
        }
    }
}

// =============================================================================
// Ticket
// =============================================================================

/// A rendered ticket: plain text lines, none wider than the configured width.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    pub variant: TicketVariant,
    pub order_number: u32,
    lines: Vec<String>,
}

impl Ticket {
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Lines joined with `\n`, with a trailing newline.
    pub fn to_text(&self) -> String {
        let mut text = self.lines.join("\n");
        text.push('\n');
        text
    }

    /// Backup file name for this ticket.
    pub fn file_name(&self) -> String {
        self.variant.file_name(self.order_number)
    }
}

// =============================================================================
// Formatter
// =============================================================================

/// Renders orders with a fixed [`TicketConfig`].
#[derive(Debug, Clone, Default)]
pub struct TicketFormatter {
    config: TicketConfig,
}

impl TicketFormatter {
    pub fn new(config: TicketConfig) -> Self {
        TicketFormatter { config }
    }

    pub fn config(&self) -> &TicketConfig {
        &self.config
    }

    /// Renders one variant of the order.
    pub fn render<L>(&self, order: &Order, variant: TicketVariant, catalog: &L) -> Ticket
    where
        L: IngredientLookup + ?Sized,
    {
        let mut out = Lines::new(self.config.width);

        self.header(&mut out, order);
        self.customer(&mut out, order);
        out.plain("PEDIDO:");
        for item in &order.items {
            self.line_item(&mut out, item, catalog);
        }
        out.rule('-');
        out.priced("TOTAL A PAGAR:", &order.total.to_string());
        self.payment(&mut out, &order.payment_method, variant);
        self.footer(&mut out, order, variant);

        Ticket {
            variant,
            order_number: order.order_number,
            lines: out.finish(),
        }
    }

    /// Renders both variants, kitchen first.
    pub fn render_all<L>(&self, order: &Order, catalog: &L) -> [Ticket; 2]
    where
        L: IngredientLookup + ?Sized,
    {
        TicketVariant::ALL.map(|variant| self.render(order, variant, catalog))
    }

    // ===== Sections =====

    fn header(&self, out: &mut Lines, order: &Order) {
        out.centered(&self.config.business_name);
        out.rule('=');
        out.centered(&format!("Order #{:04}", order.order_number));
        out.rule('=');
    }

    fn customer(&self, out: &mut Lines, order: &Order) {
        out.plain(&format!("Cliente: {}", order.customer_name));

        match &order.fulfillment {
            Fulfillment::Delivery {
                address,
                estimated_time,
            } => {
                out.wrapped(&format!("{}: {}", order.fulfillment.label(), address));
                if let Some(time) = estimated_time {
                    out.plain(&format!("Tiempo estimado: {}", time));
                }
            }
            Fulfillment::Pickup { estimated_time } => {
                out.plain(&format!("Tipo: {}", order.fulfillment.label()));
                if let Some(time) = estimated_time {
                    out.plain(&format!("Tiempo estimado: {}", time));
                }
            }
            Fulfillment::TableService => {
                out.plain(&format!("Tipo: {}", order.fulfillment.label()));
            }
        }
    }

    fn line_item<L>(&self, out: &mut Lines, item: &LineItem, catalog: &L)
    where
        L: IngredientLookup + ?Sized,
    {
        let product = &item.product;
        let header = format!("{} {}", item.quantity, product.name);
        out.priced(&header, &(product.base_price * item.quantity).to_string());

        if !pricing::has_real_modifications(product, item.modifications_opt()) {
            return;
        }
        for delta in pricing::ingredient_deltas(product, item.modifications_opt(), catalog) {
            out.priced(&delta_label(&delta), &delta.amount(item.quantity).signed());
        }
    }

    fn payment(&self, out: &mut Lines, method: &PaymentMethod, variant: TicketVariant) {
        let kitchen = variant == TicketVariant::Kitchen;

        match method.label() {
            Some(label) => {
                out.rule('-');
                out.plain(&format!("Forma de pago: {}", label));
            }
            None if kitchen => {
                out.rule('-');
                out.plain("Forma de pago:");
                out.centered(PAYMENT_OPTIONS);
            }
            // the customer copy has nothing to say about an undecided payment
            None => return,
        }

        if kitchen {
            out.centered(PAYMENT_STATUS);
        }
    }

    fn footer(&self, out: &mut Lines, order: &Order, variant: TicketVariant) {
        out.rule('=');
        out.centered(&format!("=== {} ===", variant.marker()));
        if self.config.include_timestamp {
            out.centered(&order.placed_at.format(TIMESTAMP_FORMAT).to_string());
        }
        out.rule('=');
        for _ in 0..self.config.cut_lines {
            out.blank();
        }
    }
}

/// `Extra Queso`, `2 Extra Queso`, `Sin Tomáte`, `2 Sin Tomáte`.
fn delta_label(delta: &IngredientDelta) -> String {
    let word = match delta.kind {
        DeltaKind::Extra => "Extra",
        DeltaKind::Removed => "Sin",
    };
    if delta.count > 1 {
        format!("{} {} {}", delta.count, word, delta.name)
    } else {
        format!("{} {}", word, delta.name)
    }
}

// ===== Line Buffer =====

/// Accumulates lines, keeping every one within `width`.
struct Lines {
    width: usize,
    lines: Vec<String>,
}

impl Lines {
    fn new(width: usize) -> Self {
        Lines {
            width,
            lines: Vec::new(),
        }
    }

    fn plain(&mut self, text: &str) {
        self.lines.push(truncate_with_ellipsis(text, self.width));
    }

    fn centered(&mut self, text: &str) {
        self.lines.push(center(text, self.width));
    }

    fn priced(&mut self, left: &str, price: &str) {
        self.lines.push(right_align_price(left, price, self.width));
    }

    fn wrapped(&mut self, text: &str) {
        self.lines.extend(wrap(text, self.width, WRAP_INDENT));
    }

    fn rule(&mut self, ch: char) {
        self.lines.push(rule(ch, self.width));
    }

    fn blank(&mut self) {
        self.lines.push(String::new());
    }

    fn finish(self) -> Vec<String> {
        self.lines
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogSnapshot;
    use crate::money::Money;
    use crate::pricing::{order_total, PricingOptions};
    use crate::ticket::layout::text_width;
    use crate::types::{Ingredient, IngredientRef, Modifications, Product};
    use chrono::NaiveDate;

    fn catalog() -> CatalogSnapshot {
        let ingredient = |id, name: &str, extra, removal| Ingredient {
            id,
            name: name.to_string(),
            categories: vec!["Hamburguesas".to_string()],
            extra_price: Money::from_major(extra),
            removal_price: Money::from_major(removal),
        };
        CatalogSnapshot::new(vec![
            ingredient(1, "Medallón", 1000, 500),
            ingredient(2, "Tomáte", 500, 500),
            ingredient(3, "Queso", 300, 100),
        ])
    }

    fn burger() -> Product {
        Product {
            id: 1,
            name: "Hamburguesa Completa".to_string(),
            category: "Hamburguesas".to_string(),
            base_price: Money::from_major(8800),
            description: None,
            image: None,
            ingredient_refs: vec![
                IngredientRef::named("Medallón", 1),
                IngredientRef::named("Tomáte", 1),
            ],
        }
    }

    fn order(items: Vec<LineItem>, payment_method: PaymentMethod) -> Order {
        let total = order_total(&items, &catalog(), &PricingOptions::default());
        Order {
            order_number: 42,
            customer_name: "Ana".to_string(),
            fulfillment: Fulfillment::Pickup {
                estimated_time: None,
            },
            payment_method,
            items,
            total,
            placed_at: NaiveDate::from_ymd_opt(2025, 3, 16)
                .and_then(|d| d.and_hms_opt(21, 40, 0))
                .unwrap(),
        }
    }

    fn mods(entries: &[(&str, u32)]) -> Modifications {
        entries.iter().map(|(n, q)| (*n, *q)).collect()
    }

    fn flush(left: &str, price: &str) -> String {
        let pad = 48 - text_width(left) - text_width(price);
        format!("{}{}{}", left, " ".repeat(pad), price)
    }

    fn kitchen(order: &Order) -> Ticket {
        TicketFormatter::default().render(order, TicketVariant::Kitchen, &catalog())
    }

    fn customer(order: &Order) -> Ticket {
        TicketFormatter::default().render(order, TicketVariant::Customer, &catalog())
    }

    #[test]
    fn test_removed_ingredient_sub_line() {
        let order = order(
            vec![LineItem::new(burger(), 1).with_modifications(mods(&[("Tomáte", 0)]))],
            PaymentMethod::Cash,
        );
        let ticket = kitchen(&order);
        let lines = ticket.lines();

        let header = lines
            .iter()
            .position(|l| l.starts_with("1 Hamburguesa Completa"))
            .unwrap();
        assert_eq!(lines[header], flush("1 Hamburguesa Completa", "$8800.00"));
        assert_eq!(lines[header + 1], flush("Sin Tomáte", "-$500.00"));
        assert!(lines.contains(&flush("TOTAL A PAGAR:", "$8300.00")));
    }

    #[test]
    fn test_additional_ingredient_sub_line() {
        let order = order(
            vec![LineItem::new(burger(), 2).with_modifications(mods(&[("Queso", 1)]))],
            PaymentMethod::Cash,
        );
        let lines = kitchen(&order).lines().to_vec();

        assert!(lines.contains(&flush("2 Hamburguesa Completa", "$17600.00")));
        assert!(lines.contains(&flush("Extra Queso", "+$600.00")));
        // additional ingredients are not part of the engine total
        assert!(lines.contains(&flush("TOTAL A PAGAR:", "$17600.00")));
    }

    #[test]
    fn test_multiple_units_prefix_count() {
        let order = order(
            vec![LineItem::new(burger(), 1).with_modifications(mods(&[("Medallón", 3)]))],
            PaymentMethod::Cash,
        );
        let lines = kitchen(&order).lines().to_vec();
        assert!(lines.contains(&flush("2 Extra Medallón", "+$2000.00")));
    }

    #[test]
    fn test_unmodified_line_has_no_sub_lines() {
        let order = order(
            vec![LineItem::new(burger(), 1).with_modifications(mods(&[
                ("Medallón", 1),
                ("Tomáte", 1),
            ]))],
            PaymentMethod::Cash,
        );
        let lines = kitchen(&order).lines().to_vec();
        let header = lines
            .iter()
            .position(|l| l.starts_with("1 Hamburguesa"))
            .unwrap();
        assert_eq!(lines[header + 1], "-".repeat(48));
    }

    #[test]
    fn test_every_line_fits_and_prices_are_flush() {
        let mut long = burger();
        long.name = "Hamburguesa Triple Especial de la Casa con Papas Fritas".to_string();
        let mut o = order(
            vec![
                LineItem::new(long, 3).with_modifications(mods(&[("Tomáte", 0), ("Queso", 2)])),
                LineItem::new(burger(), 1),
            ],
            PaymentMethod::Transfer,
        );
        o.customer_name = "Maximiliano Fernández de la Torre y Goñi del Valle Grande".to_string();

        for variant in TicketVariant::ALL {
            let ticket = TicketFormatter::default().render(&o, variant, &catalog());
            for line in ticket.lines() {
                assert!(text_width(line) <= 48, "too wide: {:?}", line);
                if line.contains('$') {
                    assert_eq!(text_width(line), 48, "not flush: {:?}", line);
                    assert!(line.ends_with(|c: char| c.is_ascii_digit()));
                }
            }
        }
    }

    #[test]
    fn test_header_and_footer() {
        let order = order(vec![LineItem::new(burger(), 1)], PaymentMethod::Cash);
        let lines = kitchen(&order).lines().to_vec();

        assert_eq!(lines[0], center("PAPUCHO FOODTRUCK", 48));
        assert_eq!(lines[1], "=".repeat(48));
        assert_eq!(lines[2], center("Order #0042", 48));
        assert_eq!(lines[3], "=".repeat(48));
        assert_eq!(lines[4], "Cliente: Ana");
        assert_eq!(lines[5], "Tipo: Para llevar");
        assert_eq!(lines[6], "PEDIDO:");

        let n = lines.len();
        assert_eq!(&lines[n - 3..], &["", "", ""]);
        assert_eq!(lines[n - 4], "=".repeat(48));
        assert_eq!(lines[n - 5], center("16/03/2025 21:40", 48));
        assert_eq!(lines[n - 6], center("=== COCINA ===", 48));
        assert_eq!(lines[n - 7], "=".repeat(48));
    }

    #[test]
    fn test_customer_marker_and_no_status_checklist() {
        let order = order(vec![LineItem::new(burger(), 1)], PaymentMethod::Card);
        let ticket = customer(&order);
        let lines = ticket.lines();

        assert!(lines.contains(&center("=== CLIENTE ===", 48)));
        assert!(lines.contains(&"Forma de pago: Tarjeta".to_string()));
        assert!(!ticket.to_text().contains("Pendiente de pago"));

        let kitchen = kitchen(&order);
        assert!(kitchen.lines().contains(&center(PAYMENT_STATUS, 48)));
    }

    #[test]
    fn test_unknown_payment_kitchen_checklist() {
        let order = order(vec![LineItem::new(burger(), 1)], PaymentMethod::Unknown);
        let lines = kitchen(&order).lines().to_vec();

        let label = lines.iter().position(|l| l == "Forma de pago:").unwrap();
        assert_eq!(lines[label + 1], center(PAYMENT_OPTIONS, 48));
        assert_eq!(lines[label + 2], center(PAYMENT_STATUS, 48));
    }

    #[test]
    fn test_unknown_payment_omitted_on_customer_copy() {
        let order = order(vec![LineItem::new(burger(), 1)], PaymentMethod::Unknown);
        let ticket = customer(&order);
        let text = ticket.to_text();

        assert!(!text.contains("Forma de pago"));
        assert!(!text.contains("Transferencia"));

        // total is followed directly by the footer rule
        let lines = ticket.lines();
        let total = lines
            .iter()
            .position(|l| l.starts_with("TOTAL A PAGAR:"))
            .unwrap();
        assert_eq!(lines[total + 1], "=".repeat(48));
    }

    #[test]
    fn test_delivery_address_wraps() {
        let mut o = order(vec![LineItem::new(burger(), 1)], PaymentMethod::Cash);
        o.fulfillment = Fulfillment::Delivery {
            address: "Avenida General San Martín 1234, departamento 5B, entre Mitre y Belgrano"
                .to_string(),
            estimated_time: Some("30 min".to_string()),
        };
        let lines = kitchen(&o).lines().to_vec();

        let start = lines
            .iter()
            .position(|l| l.starts_with("Domicilio: "))
            .unwrap();
        assert!(lines[start + 1].starts_with("  "));
        assert!(lines.iter().all(|l| text_width(l) <= 48));
        assert!(lines.contains(&"Tiempo estimado: 30 min".to_string()));
        assert!(!lines.iter().any(|l| l.starts_with("Tipo:")));
    }

    #[test]
    fn test_table_service() {
        let mut o = order(vec![LineItem::new(burger(), 1)], PaymentMethod::Cash);
        o.fulfillment = Fulfillment::TableService;
        assert!(kitchen(&o).lines().contains(&"Tipo: Mesa".to_string()));
    }

    #[test]
    fn test_config_switches() {
        let o = order(vec![LineItem::new(burger(), 1)], PaymentMethod::Cash);
        let formatter = TicketFormatter::new(TicketConfig {
            business_name: "LA ESQUINA".to_string(),
            width: 32,
            include_timestamp: false,
            cut_lines: 0,
        });
        let ticket = formatter.render(&o, TicketVariant::Kitchen, &catalog());
        let lines = ticket.lines();

        assert_eq!(lines[0], center("LA ESQUINA", 32));
        assert!(!ticket.to_text().contains("16/03/2025"));
        assert_eq!(lines.last().map(String::as_str), Some("=".repeat(32).as_str()));
        assert!(lines.iter().all(|l| text_width(l) <= 32));
    }

    #[test]
    fn test_render_is_deterministic() {
        let o = order(
            vec![LineItem::new(burger(), 2).with_modifications(mods(&[("Tomáte", 0)]))],
            PaymentMethod::Unknown,
        );
        let formatter = TicketFormatter::default();
        let [k1, c1] = formatter.render_all(&o, &catalog());
        let [k2, c2] = formatter.render_all(&o, &catalog());
        assert_eq!(k1.to_text(), k2.to_text());
        assert_eq!(c1.to_text(), c2.to_text());
        assert_eq!(k1.variant, TicketVariant::Kitchen);
        assert_eq!(c1.file_name(), "ticket_cliente_0042.txt");
        assert!(k1.to_text().ends_with('\n'));
    }

    #[test]
    fn test_width_for_paper() {
        assert_eq!(TicketConfig::width_for_paper_mm(80), 48);
        assert_eq!(TicketConfig::width_for_paper_mm(112), 48);
        assert_eq!(TicketConfig::width_for_paper_mm(76), 42);
        assert_eq!(TicketConfig::width_for_paper_mm(58), 32);
        assert_eq!(TicketConfig::for_paper_mm(58).width, 32);
    }
}
