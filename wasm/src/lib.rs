//! WebAssembly module for the back office
//!
//! Provides client-side computation for:
//! - Status labels and allowed transitions
//! - Order totals while the order form is being filled in
//! - Order list filtering and board partitioning
//! - Order number preview
//! - Command palette keyboard handling

use chrono::NaiveDate;
use wasm_bindgen::prelude::*;

use shared::board::Board;
use shared::order_number;
use shared::palette::{CommandPalette, PaletteKey, SearchHit};
use shared::query::OrderFilter;
use shared::validation::validate_unit_price;
use shared::{
    default_tax_rate, CustomerType, ExpenseCategory, ImportStatus, Language, LeadSource,
    LeadStatus, LocalProductionStatus, Order, OrderItem, OrderLine, OrderStatus, OrderTotals,
    PaymentMethod, PaymentStatus, ProductionType, ShippingType, StatusFlow, StatusToken,
    StockItemType, TaskPriority, TaskStatus,
};

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::types::*;

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    web_sys::console::log_1(&JsValue::from_str("backoffice wasm ready"));
}

fn js_error(context: &str, err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&format!("{}: {}", context, err))
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(|e| js_error("Serialization failed", e))
}

/// Display label for a status token of the given kind.
/// Unknown kinds and tokens come back unchanged.
#[wasm_bindgen]
pub fn label_of(kind: &str, token: &str, lang: &str) -> String {
    let lang = Language::from_code(lang).unwrap_or_default();
    match kind {
        "order_status" => shared::label_of::<OrderStatus>(token, lang),
        "payment_status" => shared::label_of::<PaymentStatus>(token, lang),
        "payment_method" => shared::label_of::<PaymentMethod>(token, lang),
        "production_type" => shared::label_of::<ProductionType>(token, lang),
        "shipping_type" => shared::label_of::<ShippingType>(token, lang),
        "local_production" => shared::label_of::<LocalProductionStatus>(token, lang),
        "import_status" => shared::label_of::<ImportStatus>(token, lang),
        "lead_status" => shared::label_of::<LeadStatus>(token, lang),
        "lead_source" => shared::label_of::<LeadSource>(token, lang),
        "customer_type" => shared::label_of::<CustomerType>(token, lang),
        "task_status" => shared::label_of::<TaskStatus>(token, lang),
        "task_priority" => shared::label_of::<TaskPriority>(token, lang),
        "expense_category" => shared::label_of::<ExpenseCategory>(token, lang),
        "stock_item_type" => shared::label_of::<StockItemType>(token, lang),
        _ => token.to_string(),
    }
}

/// Order statuses reachable from `status`, as a JSON array of tokens
#[wasm_bindgen]
pub fn allowed_next_statuses(status: &str) -> Result<String, JsValue> {
    let current = OrderStatus::parse(status)
        .ok_or_else(|| js_error("Unknown order status", status))?;
    let tokens: Vec<&str> = current.allowed_next().iter().map(|s| s.as_str()).collect();
    to_json(&tokens)
}

/// Whether the edit actions should be offered for an order in `status`
#[wasm_bindgen]
pub fn is_order_editable(status: &str) -> bool {
    OrderStatus::parse(status).map_or(false, |s| s.is_editable())
}

/// Pipeline progress for an import status token; 0 when unknown
#[wasm_bindgen]
pub fn import_progress(status: &str) -> u8 {
    ImportStatus::parse(status).map_or(0, |s| s.progress_percent())
}

/// Subtotal, VAT and total for the order form lines
#[wasm_bindgen]
pub fn compute_order_totals(lines_json: &str) -> Result<String, JsValue> {
    let lines: Vec<OrderLine> =
        serde_json::from_str(lines_json).map_err(|e| js_error("Invalid order lines JSON", e))?;
    for line in &lines {
        validate_unit_price(line.unit_price).map_err(|e| js_error("Invalid order line", e))?;
    }
    let items: Vec<OrderItem> = lines.iter().map(OrderItem::from).collect();
    to_json(&OrderTotals::from_items(&items, default_tax_rate()))
}

/// Orders grouped into one column per status
#[wasm_bindgen]
pub fn partition_orders_by_status(orders_json: &str) -> Result<String, JsValue> {
    let orders: Vec<Order> =
        serde_json::from_str(orders_json).map_err(|e| js_error("Invalid orders JSON", e))?;
    to_json(&Board::full(&orders))
}

/// Apply the order list filters; `today` is an ISO date
#[wasm_bindgen]
pub fn filter_orders(orders_json: &str, filter_json: &str, today: &str) -> Result<String, JsValue> {
    let orders: Vec<Order> =
        serde_json::from_str(orders_json).map_err(|e| js_error("Invalid orders JSON", e))?;
    let filter: OrderFilter =
        serde_json::from_str(filter_json).map_err(|e| js_error("Invalid filter JSON", e))?;
    let today = NaiveDate::parse_from_str(today, "%Y-%m-%d")
        .map_err(|e| js_error("Invalid date", e))?;
    to_json(&filter.apply(&orders, today))
}

/// Next order number for `year` given the numbers already in use
#[wasm_bindgen]
pub fn next_order_number(existing_json: &str, year: i32) -> Result<String, JsValue> {
    let existing: Vec<String> = serde_json::from_str(existing_json)
        .map_err(|e| js_error("Invalid order numbers JSON", e))?;
    order_number::next_order_number(existing.iter().map(String::as_str), year)
        .map(|n| n.to_string())
        .map_err(|e| js_error("Cannot allocate order number", e))
}

/// Same as [`next_order_number`] for the browser's current year
#[wasm_bindgen]
pub fn next_order_number_this_year(existing_json: &str) -> Result<String, JsValue> {
    let year = js_sys::Date::new_0().get_full_year() as i32;
    next_order_number(existing_json, year)
}

/// Command palette state; results are fetched from the search endpoint by the page
#[wasm_bindgen]
#[derive(Default)]
pub struct Palette {
    inner: CommandPalette,
}

#[wasm_bindgen]
impl Palette {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Palette {
        Palette::default()
    }

    /// Apply a key such as `{"key":"arrow_down"}` or `{"key":"char","char":"a"}`
    /// and return the resulting action as JSON
    pub fn handle_key(&mut self, key_json: &str) -> Result<String, JsValue> {
        let key: PaletteKey =
            serde_json::from_str(key_json).map_err(|e| js_error("Invalid palette key", e))?;
        to_json(&self.inner.handle_key(key))
    }

    pub fn set_results(&mut self, results_json: &str) -> Result<(), JsValue> {
        let results: Vec<SearchHit> = serde_json::from_str(results_json)
            .map_err(|e| js_error("Invalid search results JSON", e))?;
        self.inner.set_results(results);
        Ok(())
    }

    #[wasm_bindgen(getter)]
    pub fn query(&self) -> String {
        self.inner.query.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn selected(&self) -> usize {
        self.inner.selected
    }

    #[wasm_bindgen(getter)]
    pub fn is_open(&self) -> bool {
        self.inner.open
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_of_known_and_unknown() {
        assert_eq!(label_of("order_status", "draft", "he"), "טיוטה");
        assert_eq!(label_of("order_status", "draft", "en"), "Draft");
        assert_eq!(label_of("order_status", "bogus", "he"), "bogus");
        assert_eq!(label_of("nothing", "draft", "he"), "draft");
    }

    #[test]
    fn test_allowed_next_from_draft() {
        let json = allowed_next_statuses("draft").unwrap();
        assert_eq!(json, r#"["pending_approval","cancelled"]"#);
    }

    #[test]
    fn test_editable() {
        assert!(is_order_editable("approved"));
        assert!(!is_order_editable("shipped"));
        assert!(!is_order_editable("unknown"));
    }

    #[test]
    fn test_import_progress() {
        assert_eq!(import_progress("ready_ship"), 100);
        assert_eq!(import_progress("quote_requested"), 6);
        assert_eq!(import_progress("nope"), 0);
    }

    #[test]
    fn test_compute_order_totals() {
        let json = compute_order_totals(
            r#"[{"product_name":"חולצה","quantity":10,"unit_price":"35"},
                {"product_name":"כובע","quantity":5,"unit_price":"20"}]"#,
        )
        .unwrap();
        let totals: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(totals["subtotal"], "450");
        assert_eq!(totals["tax_amount"], "76.50");
        assert_eq!(totals["total_amount"], "526.50");
    }

    #[test]
    fn test_next_order_number() {
        let next = next_order_number(r#"["24-00003","24-00011","23-00050","junk"]"#, 2024).unwrap();
        assert_eq!(next, "24-00012");
        assert_eq!(next_order_number("[]", 2025).unwrap(), "25-00001");
    }

    #[test]
    fn test_empty_order_list_partitions_into_every_column() {
        let json = partition_orders_by_status("[]").unwrap();
        let board: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(board["columns"].as_array().unwrap().len(), 11);
    }

    #[test]
    fn test_palette_keys_and_navigation() {
        let mut palette = Palette::new();
        assert_eq!(
            palette.handle_key(r#"{"key":"open_shortcut"}"#).unwrap(),
            r#"{"action":"opened"}"#
        );
        palette.handle_key(r#"{"key":"char","char":"m"}"#).unwrap();
        assert_eq!(palette.query(), "m");

        palette
            .set_results(
                r##"[{"id":"00000000-0000-0000-0000-000000000001","kind":"product","title":"Mug"},
                    {"id":"00000000-0000-0000-0000-000000000002","kind":"order","title":"#24-00001"}]"##,
            )
            .unwrap();
        palette.handle_key(r#"{"key":"arrow_down"}"#).unwrap();
        palette.handle_key(r#"{"key":"arrow_down"}"#).unwrap();
        assert_eq!(palette.selected(), 1);

        let action: serde_json::Value =
            serde_json::from_str(&palette.handle_key(r#"{"key":"enter"}"#).unwrap()).unwrap();
        assert_eq!(action["action"], "navigate");
        assert_eq!(action["value"]["kind"], "order");
        assert!(!palette.is_open());
    }
}
