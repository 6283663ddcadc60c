//! Quote / sales order document

use chrono::{DateTime, Duration, Utc};
use rust_decimal::prelude::*;
use serde::{Deserialize, Deserializer, Serialize};
use sow_types::{Error, Result};

use super::catalog::sku_for_service;

/// Placeholder shown until an order number is allocated
pub const UNASSIGNED_ORDER_NUMBER: &str = "---/----";

/// Days between order date and expected delivery on a new quote
pub const DEFAULT_DELIVERY_DAYS: i64 = 45;

/// Monetary values are rounded to cents
const DECIMAL_PLACES: u32 = 2;

/// Deserialize null as default value
fn null_to_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::deserialize(deserializer).map(|opt| opt.unwrap_or_default())
}

/// Item ids were random numbers in older saves; accept both shapes.
fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        serde_json::Value::Null => Ok(String::new()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number id, got {}",
            other
        ))),
    }
}

/// Older saves stored prices as whatever the number input produced.
fn non_negative_price<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<f64> = Option::deserialize(deserializer)?;
    Ok(sanitize_price(value.unwrap_or_default()))
}

fn sanitize_price(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Priced service line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteItem {
    /// Opaque unique token
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: String,

    /// Service name from the catalog (may be empty or unknown in old saves)
    #[serde(default, deserialize_with = "null_to_default")]
    pub service: String,

    /// Derived from `service`, never edited directly
    #[serde(default, deserialize_with = "null_to_default")]
    pub sku: String,

    #[serde(default, deserialize_with = "null_to_default")]
    pub description: String,

    #[serde(default, deserialize_with = "null_to_default")]
    pub quantity: u32,

    #[serde(default, deserialize_with = "non_negative_price")]
    pub unit_price: f64,
}

impl QuoteItem {
    pub fn new() -> Self {
        Self {
            id: uuid::Uuid::new_v4().simple().to_string(),
            service: String::new(),
            sku: String::new(),
            description: String::new(),
            quantity: 1,
            unit_price: 0.0,
        }
    }

    /// quantity × unit price, rounded to cents
    pub fn line_total(&self) -> Decimal {
        let price = Decimal::from_f64(self.unit_price).unwrap_or(Decimal::ZERO);
        (Decimal::from(self.quantity) * price)
            .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
    }

    pub fn unit_price_decimal(&self) -> Decimal {
        Decimal::from_f64(self.unit_price)
            .unwrap_or(Decimal::ZERO)
            .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
    }

    fn apply(&mut self, edit: ItemEdit) {
        match edit {
            ItemEdit::Service(service) => {
                self.sku = sku_for_service(&service).to_string();
                self.description.clear();
                self.service = service;
            }
            ItemEdit::Description(description) => self.description = description,
            ItemEdit::Quantity(quantity) => self.quantity = quantity,
            ItemEdit::UnitPrice(price) => self.unit_price = sanitize_price(price),
        }
    }
}

impl Default for QuoteItem {
    fn default() -> Self {
        Self::new()
    }
}

/// A single field change on a quote item
#[derive(Debug, Clone, PartialEq)]
pub enum ItemEdit {
    /// Recomputes the SKU and clears the description
    Service(String),
    Description(String),
    Quantity(u32),
    /// Negative or non-finite prices are stored as zero
    UnitPrice(f64),
}

/// Commercial proposal / sales order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QuoteDocument {
    /// "NNN/YYYY"
    pub order_number: String,
    pub order_date: DateTime<Utc>,
    pub delivery_date: DateTime<Utc>,
    pub client_name: String,
    pub client_address: String,
    pub client_contact: String,
    pub items: Vec<QuoteItem>,
    pub observations: String,
}

impl QuoteDocument {
    /// Empty quote dated `now`, delivery 45 days later
    pub fn new(order_number: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            order_number: order_number.into(),
            order_date: now,
            delivery_date: now + Duration::days(DEFAULT_DELIVERY_DAYS),
            client_name: String::new(),
            client_address: String::new(),
            client_contact: String::new(),
            items: Vec::new(),
            observations: String::new(),
        }
    }

    /// Append a blank item (quantity 1, price 0) and return it
    pub fn add_item(&mut self) -> &QuoteItem {
        self.items.push(QuoteItem::new());
        &self.items[self.items.len() - 1]
    }

    /// Apply an edit to the item with `id`. Returns false if no such item.
    pub fn update_item(&mut self, id: &str, edit: ItemEdit) -> bool {
        match self.items.iter_mut().find(|item| item.id == id) {
            Some(item) => {
                item.apply(edit);
                true
            }
            None => false,
        }
    }

    /// Remove the first item with `id`, keeping the others in order
    pub fn remove_item(&mut self, id: &str) -> bool {
        match self.items.iter().position(|item| item.id == id) {
            Some(index) => {
                self.items.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn item(&self, id: &str) -> Option<&QuoteItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Sum of quantity × unit price over all items
    pub fn total(&self) -> Decimal {
        self.items.iter().map(QuoteItem::line_total).sum()
    }

    /// Required fields before the quote can be stored in the library
    pub fn validate_for_save(&self) -> Result<()> {
        if self.client_name.trim().is_empty() {
            return Err(Error::Validation("Preencha o nome do cliente.".to_string()));
        }
        Ok(())
    }

    /// Display title of a library row
    pub fn library_title(&self) -> String {
        format!("Orç. {} - {}", self.order_number, self.client_name.trim())
    }
}

impl Default for QuoteDocument {
    fn default() -> Self {
        Self::new(UNASSIGNED_ORDER_NUMBER, Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap()
    }

    fn quote_with_items(n: usize) -> QuoteDocument {
        let mut quote = QuoteDocument::new("001/2025", fixed_now());
        for _ in 0..n {
            quote.add_item();
        }
        quote
    }

    #[test]
    fn test_new_quote_delivery_is_45_days_later() {
        let quote = QuoteDocument::new("001/2025", fixed_now());
        assert_eq!(quote.delivery_date - quote.order_date, Duration::days(45));
        assert!(quote.items.is_empty());
    }

    #[test]
    fn test_new_item_defaults() {
        let mut quote = quote_with_items(0);
        let item = quote.add_item().clone();
        assert_eq!(item.quantity, 1);
        assert_eq!(item.unit_price, 0.0);
        assert!(item.sku.is_empty());
        assert!(!item.id.is_empty());
    }

    #[test]
    fn test_service_change_recomputes_sku_and_clears_description() {
        let mut quote = quote_with_items(1);
        let id = quote.items[0].id.clone();

        quote.update_item(&id, ItemEdit::Service("Consultoria".into()));
        quote.update_item(&id, ItemEdit::Description("Diagnóstico de marca".into()));
        assert_eq!(quote.items[0].sku, "CON");

        quote.update_item(&id, ItemEdit::Service("Private Label".into()));
        assert_eq!(quote.items[0].sku, "PRILAB");
        assert_eq!(quote.items[0].description, "");
    }

    #[test]
    fn test_unknown_service_yields_empty_sku() {
        let mut quote = quote_with_items(1);
        let id = quote.items[0].id.clone();
        quote.update_item(&id, ItemEdit::Service("Mentoria".into()));
        quote.update_item(&id, ItemEdit::Service("Serigrafia".into()));
        assert_eq!(quote.items[0].sku, "");
        assert_eq!(quote.items[0].service, "Serigrafia");
    }

    #[test]
    fn test_update_unknown_item_is_noop() {
        let mut quote = quote_with_items(1);
        let before = quote.clone();
        assert!(!quote.update_item("missing", ItemEdit::Quantity(3)));
        assert_eq!(quote, before);
    }

    #[test]
    fn test_total_is_sum_of_line_totals() {
        let mut quote = quote_with_items(2);
        let first = quote.items[0].id.clone();
        let second = quote.items[1].id.clone();
        quote.update_item(&first, ItemEdit::Quantity(2));
        quote.update_item(&first, ItemEdit::UnitPrice(10.0));
        quote.update_item(&second, ItemEdit::Quantity(1));
        quote.update_item(&second, ItemEdit::UnitPrice(5.0));
        assert_eq!(quote.total(), Decimal::new(2500, 2));
    }

    #[test]
    fn test_cents_do_not_drift() {
        let mut quote = quote_with_items(3);
        let ids: Vec<String> = quote.items.iter().map(|i| i.id.clone()).collect();
        for id in &ids {
            quote.update_item(id, ItemEdit::UnitPrice(0.1));
        }
        assert_eq!(quote.total(), Decimal::new(30, 2));
    }

    #[test]
    fn test_negative_price_is_clamped() {
        let mut quote = quote_with_items(1);
        let id = quote.items[0].id.clone();
        quote.update_item(&id, ItemEdit::UnitPrice(-4.0));
        assert_eq!(quote.items[0].unit_price, 0.0);
        quote.update_item(&id, ItemEdit::UnitPrice(f64::NAN));
        assert_eq!(quote.items[0].unit_price, 0.0);
    }

    #[test]
    fn test_remove_item_keeps_order() {
        let mut quote = quote_with_items(4);
        let ids: Vec<String> = quote.items.iter().map(|i| i.id.clone()).collect();

        assert!(quote.remove_item(&ids[1]));
        let remaining: Vec<&str> = quote.items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(remaining, vec![ids[0].as_str(), ids[2].as_str(), ids[3].as_str()]);

        assert!(!quote.remove_item(&ids[1]));
        assert_eq!(quote.items.len(), 3);
    }

    #[test]
    fn test_validate_requires_client_name() {
        let mut quote = quote_with_items(0);
        quote.client_name = "   ".into();
        assert!(quote.validate_for_save().unwrap_err().is_validation());
        quote.client_name = "Loja Exemplo".into();
        assert!(quote.validate_for_save().is_ok());
        assert_eq!(quote.library_title(), "Orç. 001/2025 - Loja Exemplo");
    }

    #[test]
    fn test_accepts_legacy_numeric_ids_and_nulls() {
        let json = r#"{
            "orderNumber": "004/2024",
            "orderDate": "2024-05-01T10:00:00.000Z",
            "deliveryDate": "2024-06-15T10:00:00.000Z",
            "clientName": "Cliente",
            "items": [
                {"id": 0.123456, "service": "Consultoria", "sku": "CON",
                 "description": null, "quantity": 2, "unitPrice": 150.5}
            ]
        }"#;
        let quote: QuoteDocument = serde_json::from_str(json).unwrap();
        assert_eq!(quote.items[0].id, "0.123456");
        assert_eq!(quote.items[0].description, "");
        assert_eq!(quote.total(), Decimal::new(30100, 2));
        assert_eq!(quote.observations, "");
    }
}
