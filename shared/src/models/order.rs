//! Order models and the order status lifecycle

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::production::ProductionStage;
use crate::status::{StatusEntry, StatusFlow, StatusToken};

/// Israeli VAT applied to every order
pub fn default_tax_rate() -> Decimal {
    Decimal::new(17, 2)
}

/// A customer order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    pub id: Uuid,
    /// Human order number, `YY-NNNNN`
    pub order_number: String,
    pub customer_id: Uuid,
    /// Denormalized display name captured at creation
    pub customer_name: String,
    pub status: OrderStatus,
    pub production_type: ProductionType,
    /// Exactly one of `local_production_status` / `import_status`
    #[serde(flatten)]
    pub production_stage: ProductionStage,
    #[serde(default)]
    pub event_name: Option<String>,
    #[serde(default)]
    pub event_date: Option<NaiveDate>,
    pub subtotal: Decimal,
    pub tax_amount: Decimal,
    pub total_amount: Decimal,
    pub payment_status: PaymentStatus,
    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,
    pub shipping_type: ShippingType,
    #[serde(default)]
    pub shipping_address: Option<String>,
    #[serde(default)]
    pub deadline: Option<NaiveDate>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Edit actions are disabled once the order has left the shop
    pub fn is_editable(&self) -> bool {
        self.status.is_editable()
    }

    pub fn totals(&self) -> OrderTotals {
        OrderTotals {
            subtotal: self.subtotal,
            tax_amount: self.tax_amount,
            total_amount: self.total_amount,
        }
    }

    /// `total == subtotal + tax` and `tax == round(subtotal * rate)`
    pub fn totals_consistent(&self, tax_rate: Decimal) -> bool {
        self.total_amount == self.subtotal + self.tax_amount
            && self.tax_amount == round_money(self.subtotal * tax_rate)
    }

    /// The production sub-status belongs to the order's production type
    pub fn stage_matches_type(&self) -> bool {
        self.production_stage.production_type() == self.production_type
    }

    pub fn created_on(&self) -> NaiveDate {
        self.created_at.date_naive()
    }
}

/// A line on an order; `product_name` is a snapshot taken when the line was added
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderItem {
    pub id: Uuid,
    pub product_name: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub total: Decimal,
}

impl OrderItem {
    pub fn new(product_name: impl Into<String>, quantity: i32, unit_price: Decimal) -> Self {
        Self {
            id: Uuid::new_v4(),
            product_name: product_name.into(),
            quantity,
            unit_price,
            total: unit_price * Decimal::from(quantity),
        }
    }
}

/// A line as entered on the order form
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderLine {
    #[serde(default)]
    pub product_name: String,
    #[serde(default)]
    pub quantity: i32,
    #[serde(default)]
    pub unit_price: Decimal,
}

impl From<&OrderLine> for OrderItem {
    fn from(line: &OrderLine) -> Self {
        OrderItem::new(line.product_name.trim(), line.quantity, line.unit_price)
    }
}

/// The new-order / edit-order form
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderDraft {
    pub customer_id: Option<Uuid>,
    #[serde(default)]
    pub event_name: Option<String>,
    #[serde(default)]
    pub event_date: Option<NaiveDate>,
    #[serde(default)]
    pub deadline: Option<NaiveDate>,
    pub production_type: ProductionType,
    pub shipping_type: ShippingType,
    #[serde(default)]
    pub shipping_address: Option<String>,
    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub items: Vec<OrderLine>,
}

impl OrderDraft {
    pub fn items(&self) -> Vec<OrderItem> {
        self.items.iter().map(OrderItem::from).collect()
    }
}

/// Everything the store needs to persist a new order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewOrder {
    pub order_number: String,
    pub customer_id: Uuid,
    pub customer_name: String,
    pub status: OrderStatus,
    pub production_type: ProductionType,
    #[serde(flatten)]
    pub production_stage: ProductionStage,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_date: Option<NaiveDate>,
    pub subtotal: Decimal,
    pub tax_amount: Decimal,
    pub total_amount: Decimal,
    pub payment_status: PaymentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<PaymentMethod>,
    pub shipping_type: ShippingType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub items: Vec<OrderItem>,
}

/// Partial order update; status moves go through their own operation.
///
/// Optional order fields take `Some(None)` to clear them; `None` leaves them alone.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct OrderPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<OrderStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_production_status: Option<super::production::LocalProductionStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub import_status: Option<super::production::ImportStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_date: Option<Option<NaiveDate>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<Option<NaiveDate>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipping_type: Option<ShippingType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipping_address: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_status: Option<PaymentStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<Option<PaymentMethod>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<OrderItem>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtotal: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax_amount: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_amount: Option<Decimal>,
}

impl OrderPatch {
    pub fn status(status: OrderStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    pub fn stage(stage: ProductionStage) -> Self {
        Self {
            local_production_status: stage.local(),
            import_status: stage.import(),
            ..Default::default()
        }
    }

    pub fn with_totals(mut self, totals: OrderTotals) -> Self {
        self.subtotal = Some(totals.subtotal);
        self.tax_amount = Some(totals.tax_amount);
        self.total_amount = Some(totals.total_amount);
        self
    }
}

/// Monetary summary of an order
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrderTotals {
    pub subtotal: Decimal,
    pub tax_amount: Decimal,
    pub total_amount: Decimal,
}

impl OrderTotals {
    pub fn from_subtotal(subtotal: Decimal, tax_rate: Decimal) -> Self {
        let tax_amount = round_money(subtotal * tax_rate);
        Self {
            subtotal,
            tax_amount,
            total_amount: subtotal + tax_amount,
        }
    }

    pub fn from_items(items: &[OrderItem], tax_rate: Decimal) -> Self {
        let subtotal = items.iter().map(|i| i.total).sum();
        Self::from_subtotal(subtotal, tax_rate)
    }
}

/// Round to agorot, half away from zero
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Lifecycle stage of a customer order
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Draft,
    PendingApproval,
    Approved,
    PendingPayment,
    Paid,
    InProduction,
    Ready,
    Shipped,
    Delivered,
    Completed,
    Cancelled,
}

impl StatusToken for OrderStatus {
    const ENTRIES: &'static [StatusEntry<Self>] = &[
        StatusEntry { value: Self::Draft, token: "draft", label_he: "טיוטה", label_en: "Draft" },
        StatusEntry { value: Self::PendingApproval, token: "pending_approval", label_he: "ממתין לאישור", label_en: "Pending approval" },
        StatusEntry { value: Self::Approved, token: "approved", label_he: "אושר", label_en: "Approved" },
        StatusEntry { value: Self::PendingPayment, token: "pending_payment", label_he: "ממתין לתשלום", label_en: "Pending payment" },
        StatusEntry { value: Self::Paid, token: "paid", label_he: "שולם", label_en: "Paid" },
        StatusEntry { value: Self::InProduction, token: "in_production", label_he: "בייצור", label_en: "In production" },
        StatusEntry { value: Self::Ready, token: "ready", label_he: "מוכן", label_en: "Ready" },
        StatusEntry { value: Self::Shipped, token: "shipped", label_he: "נשלח", label_en: "Shipped" },
        StatusEntry { value: Self::Delivered, token: "delivered", label_he: "נמסר", label_en: "Delivered" },
        StatusEntry { value: Self::Completed, token: "completed", label_he: "הושלם", label_en: "Completed" },
        StatusEntry { value: Self::Cancelled, token: "cancelled", label_he: "בוטל", label_en: "Cancelled" },
    ];

    fn index(&self) -> usize {
        *self as usize
    }
}

impl OrderStatus {
    /// Display color class for badges
    pub fn color_class(&self) -> &'static str {
        match self {
            OrderStatus::Draft => "bg-gray-100 text-gray-800",
            OrderStatus::PendingApproval => "bg-yellow-100 text-yellow-800",
            OrderStatus::Approved => "bg-blue-100 text-blue-800",
            OrderStatus::PendingPayment => "bg-orange-100 text-orange-800",
            OrderStatus::Paid => "bg-green-100 text-green-800",
            OrderStatus::InProduction => "bg-purple-100 text-purple-800",
            OrderStatus::Ready => "bg-teal-100 text-teal-800",
            OrderStatus::Shipped => "bg-indigo-100 text-indigo-800",
            OrderStatus::Delivered => "bg-green-100 text-green-800",
            OrderStatus::Completed => "bg-green-200 text-green-900",
            OrderStatus::Cancelled => "bg-red-100 text-red-800",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }

    /// Open orders are everything not completed or cancelled
    pub fn is_open(&self) -> bool {
        !self.is_terminal()
    }

    pub fn is_editable(&self) -> bool {
        !matches!(
            self,
            OrderStatus::Shipped
                | OrderStatus::Delivered
                | OrderStatus::Completed
                | OrderStatus::Cancelled
        )
    }
}

impl StatusFlow for OrderStatus {
    fn allowed_next(&self) -> Vec<Self> {
        use OrderStatus::*;
        match self {
            Draft => vec![PendingApproval, Cancelled],
            PendingApproval => vec![Approved, Cancelled],
            Approved => vec![PendingPayment, Cancelled],
            PendingPayment => vec![Paid, Cancelled],
            Paid => vec![InProduction],
            InProduction => vec![Ready],
            Ready => vec![Shipped],
            Shipped => vec![Delivered],
            Delivered => vec![Completed],
            Completed | Cancelled => vec![],
        }
    }
}

/// Whether goods are made in-house or sourced from an overseas supplier
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ProductionType {
    Local,
    Import,
}

impl StatusToken for ProductionType {
    const ENTRIES: &'static [StatusEntry<Self>] = &[
        StatusEntry { value: Self::Local, token: "local", label_he: "ייצור עצמי", label_en: "Local production" },
        StatusEntry { value: Self::Import, token: "import", label_he: "יבוא", label_en: "Import" },
    ];

    fn index(&self) -> usize {
        *self as usize
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Partial,
    Paid,
    Refunded,
}

impl StatusToken for PaymentStatus {
    const ENTRIES: &'static [StatusEntry<Self>] = &[
        StatusEntry { value: Self::Pending, token: "pending", label_he: "ממתין", label_en: "Pending" },
        StatusEntry { value: Self::Partial, token: "partial", label_he: "חלקי", label_en: "Partial" },
        StatusEntry { value: Self::Paid, token: "paid", label_he: "שולם", label_en: "Paid" },
        StatusEntry { value: Self::Refunded, token: "refunded", label_he: "הוחזר", label_en: "Refunded" },
    ];

    fn index(&self) -> usize {
        *self as usize
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    CreditCard,
    BankTransfer,
    Cash,
    Check,
    Bit,
    Paypal,
}

impl StatusToken for PaymentMethod {
    const ENTRIES: &'static [StatusEntry<Self>] = &[
        StatusEntry { value: Self::CreditCard, token: "credit_card", label_he: "כרטיס אשראי", label_en: "Credit card" },
        StatusEntry { value: Self::BankTransfer, token: "bank_transfer", label_he: "העברה בנקאית", label_en: "Bank transfer" },
        StatusEntry { value: Self::Cash, token: "cash", label_he: "מזומן", label_en: "Cash" },
        StatusEntry { value: Self::Check, token: "check", label_he: "צ'ק", label_en: "Check" },
        StatusEntry { value: Self::Bit, token: "bit", label_he: "ביט", label_en: "Bit" },
        StatusEntry { value: Self::Paypal, token: "paypal", label_he: "PayPal", label_en: "PayPal" },
    ];

    fn index(&self) -> usize {
        *self as usize
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ShippingType {
    Pickup,
    Delivery,
    Express,
}

impl StatusToken for ShippingType {
    const ENTRIES: &'static [StatusEntry<Self>] = &[
        StatusEntry { value: Self::Pickup, token: "pickup", label_he: "איסוף עצמי", label_en: "Pickup" },
        StatusEntry { value: Self::Delivery, token: "delivery", label_he: "משלוח", label_en: "Delivery" },
        StatusEntry { value: Self::Express, token: "express", label_he: "משלוח מהיר", label_en: "Express delivery" },
    ];

    fn index(&self) -> usize {
        *self as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ImportStatus, LocalProductionStatus};
    use crate::status::assert_table_consistent;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_status_tables() {
        assert_table_consistent::<OrderStatus>();
        assert_table_consistent::<ProductionType>();
        assert_table_consistent::<PaymentStatus>();
        assert_table_consistent::<PaymentMethod>();
        assert_table_consistent::<ShippingType>();
        assert_eq!(OrderStatus::all().len(), 11);
    }

    #[test]
    fn test_terminal_statuses_have_no_successors() {
        assert!(OrderStatus::Completed.allowed_next().is_empty());
        assert!(OrderStatus::Cancelled.allowed_next().is_empty());
    }

    #[test]
    fn test_non_terminal_statuses_have_successors() {
        for status in OrderStatus::all() {
            if !status.is_terminal() {
                assert!(!status.allowed_next().is_empty(), "{:?}", status);
            }
        }
    }

    #[test]
    fn test_transition_table() {
        assert!(OrderStatus::Draft.can_transition_to(OrderStatus::PendingApproval));
        assert!(OrderStatus::Draft.can_transition_to(OrderStatus::Cancelled));
        assert!(!OrderStatus::Draft.can_transition_to(OrderStatus::Paid));
        assert!(!OrderStatus::Paid.can_transition_to(OrderStatus::Cancelled));
        assert!(OrderStatus::Delivered.can_transition_to(OrderStatus::Completed));
        assert!(!OrderStatus::Shipped.can_transition_to(OrderStatus::Ready));
    }

    #[test]
    fn test_editability() {
        let locked = [
            OrderStatus::Shipped,
            OrderStatus::Delivered,
            OrderStatus::Completed,
            OrderStatus::Cancelled,
        ];
        for status in OrderStatus::all() {
            assert_eq!(status.is_editable(), !locked.contains(&status));
        }
    }

    #[test]
    fn test_totals_from_items() {
        let items = vec![
            OrderItem::new("Printed mug", 100, dec("12.50")),
            OrderItem::new("Tote bag", 20, dec("30")),
        ];
        let totals = OrderTotals::from_items(&items, default_tax_rate());
        assert_eq!(totals.subtotal, dec("1850"));
        assert_eq!(totals.tax_amount, dec("314.50"));
        assert_eq!(totals.total_amount, dec("2164.50"));
    }

    #[test]
    fn test_tax_rounds_half_away_from_zero() {
        // 0.17 * 0.5 = 0.085 -> 0.09
        let totals = OrderTotals::from_subtotal(dec("0.5"), default_tax_rate());
        assert_eq!(totals.tax_amount, dec("0.09"));
    }

    #[test]
    fn test_production_stage_serializes_as_single_field() {
        let stage = ProductionStage::Local(LocalProductionStatus::Queued);
        let json = serde_json::to_value(&stage).unwrap();
        assert_eq!(json, serde_json::json!({ "local_production_status": "queued" }));

        let stage: ProductionStage =
            serde_json::from_value(serde_json::json!({ "import_status": "customs" })).unwrap();
        assert_eq!(stage, ProductionStage::Import(ImportStatus::Customs));
    }

    #[test]
    fn test_stage_patch_touches_one_field() {
        let patch = OrderPatch::stage(ProductionStage::Import(ImportStatus::InTransit));
        let json = serde_json::to_value(&patch).unwrap();
        assert_eq!(json, serde_json::json!({ "import_status": "in_transit" }));
    }

    #[test]
    fn test_patch_clears_with_null() {
        let patch = OrderPatch {
            shipping_address: Some(None),
            notes: Some(Some("gift wrap".to_string())),
            ..Default::default()
        };
        let json = serde_json::to_value(&patch).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "shipping_address": null, "notes": "gift wrap" })
        );
    }

    #[test]
    fn test_draft_lines_become_items() {
        let draft: OrderDraft = serde_json::from_value(serde_json::json!({
            "customer_id": Uuid::nil(),
            "event_name": "Bar mitzvah",
            "production_type": "local",
            "shipping_type": "pickup",
            "items": [{ "product_name": " Printed mug ", "quantity": 3, "unit_price": "20" }]
        }))
        .unwrap();
        let items = draft.items();
        assert_eq!(items[0].product_name, "Printed mug");
        assert_eq!(items[0].total, dec("60"));
    }
}
