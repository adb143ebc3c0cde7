//! # Domain Types
//!
//! Core domain types used throughout Papucho POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │  IngredientRef  │   │   Ingredient    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │──►│  ingredient_id? │┄┄►│  id, name       │       │
//! │  │  base_price     │   │  name           │   │  extra_price    │       │
//! │  │  ingredient_refs│   │  base_quantity  │   │  removal_price  │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │           │                                    (catalog, by name/id)    │
//! │           ▼                                                             │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    LineItem     │   │      Order      │   │  Fulfillment    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  product (snap) │──►│  order_number   │   │  TableService   │       │
//! │  │  quantity       │   │  items, total   │   │  Pickup         │       │
//! │  │  modifications  │   │  payment_method │   │  Delivery       │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Reference, Not Copy
//! A product's `ingredient_refs` store no price. Prices are resolved against
//! the catalog at computation time, so editing an ingredient's price changes
//! every product that uses it.

use std::fmt;

use chrono::NaiveDateTime;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{CoreError, CoreResult};
use crate::money::Money;

// =============================================================================
// Categories
// =============================================================================

/// Product categories that always exist on the menu board.
pub const FIXED_CATEGORIES: [&str; 6] = [
    "Hamburguesas",
    "Lomitos",
    "Milanesas",
    "Fritas",
    "Empanadas",
    "Bebidas",
];

// =============================================================================
// Product
// =============================================================================

/// One ingredient slot of a product: which ingredient, and how many units
/// are included in the base price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientRef {
    /// Stable catalog id. Legacy data has only the name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ingredient_id: Option<i64>,

    /// Catalog name, used as the join key when no id is present.
    pub name: String,

    /// Units included by default.
    pub base_quantity: u32,
}

impl IngredientRef {
    /// Creates a name-only reference (legacy shape).
    pub fn named(name: impl Into<String>, base_quantity: u32) -> Self {
        IngredientRef {
            ingredient_id: None,
            name: name.into(),
            base_quantity,
        }
    }

    /// Creates a reference carrying the catalog id as well.
    pub fn with_id(id: i64, name: impl Into<String>, base_quantity: u32) -> Self {
        IngredientRef {
            ingredient_id: Some(id),
            name: name.into(),
            base_quantity,
        }
    }
}

/// A product on the menu.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Unique numeric identifier.
    pub id: i64,

    /// Display name shown to the cashier and on tickets.
    pub name: String,

    /// Menu category (one of [`FIXED_CATEGORIES`] or a custom one).
    pub category: String,

    /// Price with every ingredient at its base quantity.
    pub base_price: Money,

    /// Optional description for the product card.
    #[serde(default)]
    pub description: Option<String>,

    /// Optional image path (relative to the data directory).
    #[serde(default)]
    pub image: Option<String>,

    /// Ordered ingredient slots. Empty for products that cannot be customized.
    #[serde(default)]
    pub ingredient_refs: Vec<IngredientRef>,
}

impl Product {
    /// Returns true if the product references an ingredient by this name.
    pub fn has_ingredient(&self, name: &str) -> bool {
        self.ingredient_refs.iter().any(|r| r.name == name)
    }
}

// =============================================================================
// Ingredient Catalog Entry
// =============================================================================

/// A priced entry of the ingredient catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub id: i64,
    pub name: String,
    /// Product categories this ingredient can be assigned to.
    #[serde(default)]
    pub categories: Vec<String>,
    /// Charged per unit above the base quantity.
    pub extra_price: Money,
    /// Credited per unit below the base quantity.
    pub removal_price: Money,
}

impl Ingredient {
    /// Returns just the prices.
    pub fn prices(&self) -> IngredientPrices {
        IngredientPrices {
            extra_price: self.extra_price,
            removal_price: self.removal_price,
        }
    }
}

/// The two prices the pricing engine needs from a catalog entry.
///
/// `Default` is the zero-priced fallback used for unknown ingredients.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientPrices {
    pub extra_price: Money,
    pub removal_price: Money,
}

// =============================================================================
// Modifications
// =============================================================================

/// Desired quantity per ingredient name for one cart line.
///
/// Values are absolute quantities, not deltas. Names missing from the map
/// default to the ingredient's base quantity. Insertion order is kept, and
/// decides the print order of "additional" ingredients.
///
/// Serialized as a plain JSON object: `{"Medallón": 2, "Tomáte": 0}`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Modifications {
    entries: Vec<(String, u32)>,
}

impl Modifications {
    /// Creates an empty map.
    pub fn new() -> Self {
        Modifications::default()
    }

    /// Returns the quantity recorded for `name`, if any.
    pub fn get(&self, name: &str) -> Option<u32> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, q)| *q)
    }

    /// Returns the quantity for `name`, or `default` when absent.
    pub fn quantity_or(&self, name: &str, default: u32) -> u32 {
        self.get(name).unwrap_or(default)
    }

    /// Sets the quantity for `name`, keeping its original position if it
    /// was already present.
    pub fn set(&mut self, name: impl Into<String>, quantity: u32) {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = quantity,
            None => self.entries.push((name, quantity)),
        }
    }

    /// Removes `name`, returning its quantity.
    pub fn remove(&mut self, name: &str) -> Option<u32> {
        let idx = self.entries.iter().position(|(n, _)| n == name)?;
        Some(self.entries.remove(idx).1)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when both maps hold the same quantity for every name,
    /// whatever the insertion order.
    ///
    /// `==` also compares order, which matters for printing.
    pub fn same_quantities(&self, other: &Modifications) -> bool {
        self.len() == other.len() && self.iter().all(|(name, q)| other.get(name) == Some(q))
    }

    /// Iterates entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.entries.iter().map(|(n, q)| (n.as_str(), *q))
    }

    /// Converts the ingredient editor's per-slot quantities into a per-name
    /// map.
    ///
    /// `slots[i]` is the quantity chosen for `refs[i]`. When several slots
    /// share a name, their deltas against each slot's own base are summed and
    /// applied to the base of the first slot with that name, instead of the
    /// last slot overwriting the others. A total that would go below zero is
    /// stored as zero.
    ///
    /// ## Example
    /// ```rust
    /// use papucho_core::types::{IngredientRef, Modifications};
    ///
    /// let refs = vec![
    ///     IngredientRef::named("Queso", 1),
    ///     IngredientRef::named("Tomáte", 1),
    ///     IngredientRef::named("Queso", 1),
    /// ];
    /// let mods = Modifications::from_slot_quantities(&refs, &[2, 0, 2]).unwrap();
    /// assert_eq!(mods.get("Queso"), Some(3));
    /// assert_eq!(mods.get("Tomáte"), Some(0));
    /// ```
    pub fn from_slot_quantities(refs: &[IngredientRef], slots: &[u32]) -> CoreResult<Self> {
        if refs.len() != slots.len() {
            return Err(CoreError::SlotCountMismatch {
                expected: refs.len(),
                actual: slots.len(),
            });
        }

        // (name, first base, accumulated delta), first-seen order
        let mut acc: Vec<(&str, u32, i64)> = Vec::new();
        for (r, &qty) in refs.iter().zip(slots) {
            let delta = qty as i64 - r.base_quantity as i64;
            match acc.iter_mut().find(|(n, _, _)| *n == r.name) {
                Some(entry) => entry.2 += delta,
                None => acc.push((r.name.as_str(), r.base_quantity, delta)),
            }
        }

        let mut mods = Modifications::new();
        for (name, base, delta) in acc {
            let quantity = (base as i64 + delta).max(0) as u32;
            mods.set(name, quantity);
        }
        Ok(mods)
    }
}

impl<S: Into<String>> FromIterator<(S, u32)> for Modifications {
    fn from_iter<I: IntoIterator<Item = (S, u32)>>(iter: I) -> Self {
        let mut mods = Modifications::new();
        for (name, qty) in iter {
            mods.set(name, qty);
        }
        mods
    }
}

impl Serialize for Modifications {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, qty) in &self.entries {
            map.serialize_entry(name, qty)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Modifications {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ModificationsVisitor;

        impl<'de> Visitor<'de> for ModificationsVisitor {
            type Value = Modifications;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of ingredient name to quantity")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut mods = Modifications::new();
                while let Some((name, qty)) = access.next_entry::<String, u32>()? {
                    mods.set(name, qty);
                }
                Ok(mods)
            }

            fn visit_unit<E: serde::de::Error>(self) -> Result<Self::Value, E> {
                Ok(Modifications::new())
            }
        }

        deserializer.deserialize_any(ModificationsVisitor)
    }
}

// =============================================================================
// Line Item
// =============================================================================

/// A product in a cart or order, with its quantity and customization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Snapshot taken when the line was added.
    pub product: Product,
    /// Units ordered (positive).
    pub quantity: i64,
    #[serde(default)]
    pub modifications: Modifications,
}

impl LineItem {
    pub fn new(product: Product, quantity: i64) -> Self {
        LineItem {
            product,
            quantity,
            modifications: Modifications::new(),
        }
    }

    pub fn with_modifications(mut self, modifications: Modifications) -> Self {
        self.modifications = modifications;
        self
    }

    /// Modifications as the pricing engine takes them (`None` when empty).
    pub fn modifications_opt(&self) -> Option<&Modifications> {
        if self.modifications.is_empty() {
            None
        } else {
            Some(&self.modifications)
        }
    }
}

// =============================================================================
// Fulfillment
// =============================================================================

/// How the order reaches the customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Fulfillment {
    /// Served at the truck's tables.
    TableService,
    /// Customer picks it up.
    Pickup {
        #[serde(default)]
        estimated_time: Option<String>,
    },
    /// Delivered to an address.
    Delivery {
        address: String,
        #[serde(default)]
        estimated_time: Option<String>,
    },
}

impl Fulfillment {
    /// Label printed on tickets for the non-delivery types.
    pub fn label(&self) -> &'static str {
        match self {
            Fulfillment::TableService => "Mesa",
            Fulfillment::Pickup { .. } => "Para llevar",
            Fulfillment::Delivery { .. } => "Domicilio",
        }
    }

    pub fn is_delivery(&self) -> bool {
        matches!(self, Fulfillment::Delivery { .. })
    }
}

// =============================================================================
// Payment Method
// =============================================================================

/// How the customer pays.
///
/// Serialized as a plain string. `Unknown` is the "not decided yet"
/// sentinel: the kitchen ticket then prints a checklist to circle by hand.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PaymentMethod {
    Cash,
    Transfer,
    Card,
    Other(String),
    #[default]
    Unknown,
}

impl PaymentMethod {
    /// Label printed on tickets. `None` for the unknown sentinel.
    pub fn label(&self) -> Option<&str> {
        match self {
            PaymentMethod::Cash => Some("Efectivo"),
            PaymentMethod::Transfer => Some("Transferencia"),
            PaymentMethod::Card => Some("Tarjeta"),
            PaymentMethod::Other(s) => Some(s.as_str()),
            PaymentMethod::Unknown => None,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, PaymentMethod::Unknown)
    }
}

impl From<&str> for PaymentMethod {
    fn from(value: &str) -> Self {
        let trimmed = value.trim();
        match trimmed.to_lowercase().as_str() {
            "" | "unknown" | "sin especificar" | "desconocido" => PaymentMethod::Unknown,
            "efectivo" | "cash" => PaymentMethod::Cash,
            "transferencia" | "transfer" => PaymentMethod::Transfer,
            "tarjeta" | "card" => PaymentMethod::Card,
            _ => PaymentMethod::Other(trimmed.to_string()),
        }
    }
}

impl From<String> for PaymentMethod {
    fn from(value: String) -> Self {
        PaymentMethod::from(value.as_str())
    }
}

impl From<PaymentMethod> for String {
    fn from(method: PaymentMethod) -> Self {
        method.label().unwrap_or("unknown").to_string()
    }
}

// =============================================================================
// Order
// =============================================================================

/// A confirmed cart, ready to be rendered into tickets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Allocated by the order counter; printed zero-padded to 4 digits.
    pub order_number: u32,
    pub customer_name: String,
    pub fulfillment: Fulfillment,
    pub payment_method: PaymentMethod,
    /// Snapshot of the cart lines, in cart order.
    pub items: Vec<LineItem>,
    /// Sum of engine unit price × quantity over `items`.
    pub total: Money,
    /// Local wall-clock time of confirmation.
    pub placed_at: NaiveDateTime,
}

// =============================================================================
// Ticket Variant
// =============================================================================

/// The two documents printed per order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketVariant {
    /// Internal prep copy.
    Kitchen,
    /// Receipt handed to the customer.
    Customer,
}

impl TicketVariant {
    pub const ALL: [TicketVariant; 2] = [TicketVariant::Kitchen, TicketVariant::Customer];

    /// Marker printed in the footer: `=== COCINA ===`.
    pub fn marker(&self) -> &'static str {
        match self {
            TicketVariant::Kitchen => "COCINA",
            TicketVariant::Customer => "CLIENTE",
        }
    }

    /// Tag used in backup file names.
    pub fn file_tag(&self) -> &'static str {
        match self {
            TicketVariant::Kitchen => "cocina",
            TicketVariant::Customer => "cliente",
        }
    }

    /// Backup file name: `ticket_cocina_0042.txt`.
    pub fn file_name(&self, order_number: u32) -> String {
        format!("ticket_{}_{:04}.txt", self.file_tag(), order_number)
    }
}

impl fmt::Display for TicketVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.marker())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modifications_keep_insertion_order() {
        let mut mods = Modifications::new();
        mods.set("Tomáte", 0);
        mods.set("Queso", 2);
        mods.set("Tomáte", 1);

        let names: Vec<&str> = mods.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["Tomáte", "Queso"]);
        assert_eq!(mods.get("Tomáte"), Some(1));
        assert_eq!(mods.quantity_or("Lechuga", 1), 1);
    }

    #[test]
    fn test_same_quantities_ignores_order() {
        let a: Modifications = [("Tomáte", 0), ("Queso", 1)].into_iter().collect();
        let b: Modifications = [("Queso", 1), ("Tomáte", 0)].into_iter().collect();
        let c: Modifications = [("Queso", 2), ("Tomáte", 0)].into_iter().collect();
        let d: Modifications = [("Queso", 1)].into_iter().collect();

        assert_ne!(a, b);
        assert!(a.same_quantities(&b));
        assert!(!a.same_quantities(&c));
        assert!(!a.same_quantities(&d));
        assert!(!d.same_quantities(&a));
        assert!(Modifications::new().same_quantities(&Modifications::new()));
    }

    #[test]
    fn test_modifications_json_shape() {
        let mods: Modifications = [("Medallón", 2), ("Tomáte", 0)].into_iter().collect();
        let json = serde_json::to_string(&mods).unwrap();
        assert_eq!(json, r#"{"Medallón":2,"Tomáte":0}"#);

        let back: Modifications = serde_json::from_str(r#"{"Queso":2,"Aceitunas":1}"#).unwrap();
        let names: Vec<&str> = back.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["Queso", "Aceitunas"]);

        let none: Modifications = serde_json::from_str("null").unwrap();
        assert!(none.is_empty());
    }

    #[test]
    fn test_slot_quantities_accumulate_duplicates() {
        let refs = vec![
            IngredientRef::named("Medallón", 1),
            IngredientRef::named("Medallón", 1),
        ];
        // one slot up, the other down: net zero
        let mods = Modifications::from_slot_quantities(&refs, &[2, 0]).unwrap();
        assert_eq!(mods.get("Medallón"), Some(1));

        let mods = Modifications::from_slot_quantities(&refs, &[0, 0]).unwrap();
        assert_eq!(mods.get("Medallón"), Some(0));
    }

    #[test]
    fn test_slot_quantities_count_mismatch() {
        let refs = vec![IngredientRef::named("Queso", 1)];
        let err = Modifications::from_slot_quantities(&refs, &[]).unwrap_err();
        assert!(matches!(
            err,
            CoreError::SlotCountMismatch {
                expected: 1,
                actual: 0
            }
        ));
    }

    #[test]
    fn test_payment_method_parsing() {
        assert_eq!(PaymentMethod::from("Efectivo"), PaymentMethod::Cash);
        assert_eq!(PaymentMethod::from(" tarjeta "), PaymentMethod::Card);
        assert_eq!(PaymentMethod::from(""), PaymentMethod::Unknown);
        assert_eq!(PaymentMethod::from("Sin especificar"), PaymentMethod::Unknown);
        assert_eq!(
            PaymentMethod::from("Mercado Pago"),
            PaymentMethod::Other("Mercado Pago".to_string())
        );
    }

    #[test]
    fn test_payment_method_serde_is_a_string() {
        let json = serde_json::to_string(&PaymentMethod::Transfer).unwrap();
        assert_eq!(json, r#""Transferencia""#);
        let back: PaymentMethod = serde_json::from_str(r#""unknown""#).unwrap();
        assert!(back.is_unknown());
    }

    #[test]
    fn test_fulfillment_serde() {
        let f: Fulfillment =
            serde_json::from_str(r#"{"type":"delivery","address":"San Martín 123"}"#).unwrap();
        assert_eq!(
            f,
            Fulfillment::Delivery {
                address: "San Martín 123".to_string(),
                estimated_time: None
            }
        );
        assert!(f.is_delivery());
        assert_eq!(Fulfillment::TableService.label(), "Mesa");
    }

    #[test]
    fn test_ticket_file_name() {
        assert_eq!(TicketVariant::Kitchen.file_name(7), "ticket_cocina_0007.txt");
        assert_eq!(
            TicketVariant::Customer.file_name(12345),
            "ticket_cliente_12345.txt"
        );
    }
}
