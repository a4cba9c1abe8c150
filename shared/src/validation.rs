//! Validation utilities for the back office forms
//!
//! Every form check returns the first problem found as a [`ValidationIssue`]
//! carrying the offending field and a bilingual message.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{
    CommentInput, CustomerInput, CustomerType, ExpenseInput, ImportOrderInput, LeadInput,
    OrderDraft, ProductInput, ShippingType, StockAdjustment, StockItemInput, SupplierInput,
    TaskInput,
};
use crate::types::DateRange;

/// A rejected form field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("{field}: {message}")]
pub struct ValidationIssue {
    pub field: &'static str,
    pub message: &'static str,
    pub message_he: &'static str,
}

impl ValidationIssue {
    pub fn new(field: &'static str, message: &'static str, message_he: &'static str) -> Self {
        Self {
            field,
            message,
            message_he,
        }
    }
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn is_blank_opt(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, is_blank)
}

fn check_optional_email(email: &Option<String>) -> Result<(), ValidationIssue> {
    match email.as_deref() {
        Some(e) if !is_blank(e) => validate_email(e.trim())
            .map_err(|msg| ValidationIssue::new("email", msg, "כתובת אימייל לא תקינה")),
        _ => Ok(()),
    }
}

// ============================================================================
// Form Validations
// ============================================================================

/// Customer form: first name and phone always, company name for business customers
pub fn validate_customer(input: &CustomerInput) -> Result<(), ValidationIssue> {
    if is_blank_opt(&input.first_name) {
        return Err(ValidationIssue::new(
            "first_name",
            "First name and phone are required",
            "נא למלא שדות חובה (שם פרטי וטלפון)",
        ));
    }
    if is_blank(&input.phone) {
        return Err(ValidationIssue::new(
            "phone",
            "First name and phone are required",
            "נא למלא שדות חובה (שם פרטי וטלפון)",
        ));
    }
    if input.customer_type == CustomerType::Business && is_blank_opt(&input.company_name) {
        return Err(ValidationIssue::new(
            "company_name",
            "Company name is required for business customers",
            "נא למלא שם חברה ללקוח עסקי",
        ));
    }
    check_optional_email(&input.email)
}

/// New-order form, checked in the order the wizard steps present the fields
pub fn validate_order_draft(draft: &OrderDraft, today: NaiveDate) -> Result<(), ValidationIssue> {
    if draft.customer_id.is_none() {
        return Err(ValidationIssue::new(
            "customer_id",
            "Please select a customer",
            "נא לבחור לקוח",
        ));
    }
    if is_blank_opt(&draft.event_name) {
        return Err(ValidationIssue::new(
            "event_name",
            "Event name and deadline are required",
            "נא למלא שם אירוע ותאריך יעד",
        ));
    }
    let deadline = draft.deadline.ok_or_else(|| {
        ValidationIssue::new(
            "deadline",
            "Event name and deadline are required",
            "נא למלא שם אירוע ותאריך יעד",
        )
    })?;
    if deadline < today {
        return Err(ValidationIssue::new(
            "deadline",
            "Deadline cannot be in the past",
            "תאריך יעד לא יכול להיות בעבר",
        ));
    }
    if draft.shipping_type == ShippingType::Delivery && is_blank_opt(&draft.shipping_address) {
        return Err(ValidationIssue::new(
            "shipping_address",
            "Shipping address is required for delivery",
            "נא למלא כתובת משלוח",
        ));
    }
    if draft.items.is_empty() {
        return Err(ValidationIssue::new(
            "items",
            "Add at least one product",
            "נא להוסיף לפחות מוצר אחד",
        ));
    }
    for line in &draft.items {
        if is_blank(&line.product_name) {
            return Err(ValidationIssue::new(
                "items",
                "Every line needs a product",
                "יש לבחור מוצר בכל שורה",
            ));
        }
        if line.quantity <= 0 {
            return Err(ValidationIssue::new(
                "items",
                "Quantity must be greater than zero",
                "הכמות חייבת להיות גדולה מאפס",
            ));
        }
        validate_unit_price(line.unit_price)?;
    }
    Ok(())
}

/// Highest unit price accepted on an order line
pub fn max_unit_price() -> Decimal {
    Decimal::new(1_000_000, 0)
}

/// Keeps line totals well inside `Decimal` range for any `i32` quantity
pub fn validate_unit_price(unit_price: Decimal) -> Result<(), ValidationIssue> {
    if unit_price < Decimal::ZERO {
        return Err(ValidationIssue::new(
            "items",
            "Unit price cannot be negative",
            "מחיר ליחידה לא יכול להיות שלילי",
        ));
    }
    if unit_price > max_unit_price() {
        return Err(ValidationIssue::new(
            "items",
            "Unit price is too large",
            "מחיר ליחידה גבוה מדי",
        ));
    }
    Ok(())
}

/// Longest period a finance report may cover
pub const MAX_REPORT_DAYS: i64 = 5 * 366;

pub fn validate_report_range(range: &DateRange) -> Result<(), ValidationIssue> {
    if range.end < range.start {
        return Err(ValidationIssue::new(
            "to",
            "End date is before the start date",
            "תאריך הסיום מוקדם מתאריך ההתחלה",
        ));
    }
    if range.end.signed_duration_since(range.start).num_days() > MAX_REPORT_DAYS {
        return Err(ValidationIssue::new(
            "to",
            "Report period cannot exceed five years",
            "תקופת הדוח לא יכולה לעלות על חמש שנים",
        ));
    }
    Ok(())
}

pub fn validate_lead(input: &LeadInput) -> Result<(), ValidationIssue> {
    if is_blank(&input.contact_name) || is_blank(&input.phone) {
        let field = if is_blank(&input.contact_name) {
            "contact_name"
        } else {
            "phone"
        };
        return Err(ValidationIssue::new(
            field,
            "Name and phone are required",
            "נא למלא שדות חובה (שם וטלפון)",
        ));
    }
    if matches!(input.estimated_quantity, Some(q) if q < 0) {
        return Err(ValidationIssue::new(
            "estimated_quantity",
            "Estimated quantity cannot be negative",
            "כמות משוערת לא יכולה להיות שלילית",
        ));
    }
    check_optional_email(&input.email)
}

pub fn validate_product(input: &ProductInput) -> Result<(), ValidationIssue> {
    let field = if is_blank(&input.sku) {
        Some("sku")
    } else if is_blank(&input.name) {
        Some("name")
    } else if input.base_price <= Decimal::ZERO {
        Some("base_price")
    } else {
        None
    };
    if let Some(field) = field {
        return Err(ValidationIssue::new(
            field,
            "SKU, name and price are required",
            "נא למלא שדות חובה (מק\"ט, שם, מחיר)",
        ));
    }
    if input.base_cost < Decimal::ZERO {
        return Err(ValidationIssue::new(
            "base_cost",
            "Cost cannot be negative",
            "עלות לא יכולה להיות שלילית",
        ));
    }
    validate_stock_level(input.current_stock, "current_stock")?;
    validate_stock_level(input.min_stock_alert, "min_stock_alert")
}

pub fn validate_stock_item(input: &StockItemInput) -> Result<(), ValidationIssue> {
    if is_blank(&input.sku) || is_blank(&input.name) {
        let field = if is_blank(&input.sku) { "sku" } else { "name" };
        return Err(ValidationIssue::new(
            field,
            "SKU and name are required",
            "נא למלא שדות חובה (מק\"ט ושם)",
        ));
    }
    if input.unit_cost < Decimal::ZERO {
        return Err(ValidationIssue::new(
            "unit_cost",
            "Unit cost cannot be negative",
            "עלות ליחידה לא יכולה להיות שלילית",
        ));
    }
    validate_stock_level(input.current_quantity, "current_quantity")?;
    validate_stock_level(input.min_quantity, "min_quantity")
}

fn validate_stock_level(level: i32, field: &'static str) -> Result<(), ValidationIssue> {
    if level < 0 {
        return Err(ValidationIssue::new(
            field,
            "Stock level cannot be negative",
            "כמות במלאי לא יכולה להיות שלילית",
        ));
    }
    Ok(())
}

/// Manual stock corrections must move a positive quantity
pub fn validate_stock_quantity(adjustment: &StockAdjustment) -> Result<(), ValidationIssue> {
    if adjustment.quantity() <= 0 {
        return Err(ValidationIssue::new(
            "quantity",
            "Quantity must be greater than zero",
            "נא להזין כמות תקינה",
        ));
    }
    Ok(())
}

pub fn validate_task(input: &TaskInput) -> Result<(), ValidationIssue> {
    if is_blank(&input.title) {
        return Err(ValidationIssue::new(
            "title",
            "Task title is required",
            "נא להזין כותרת למשימה",
        ));
    }
    Ok(())
}

pub fn validate_supplier(input: &SupplierInput) -> Result<(), ValidationIssue> {
    let field = if is_blank(&input.name) {
        Some("name")
    } else if is_blank(&input.contact_name) {
        Some("contact_name")
    } else if is_blank(&input.phone) {
        Some("phone")
    } else {
        None
    };
    if let Some(field) = field {
        return Err(ValidationIssue::new(
            field,
            "Name, contact and phone are required",
            "נא למלא שדות חובה (שם, איש קשר, טלפון)",
        ));
    }
    if input.lead_time_days < 0 {
        return Err(ValidationIssue::new(
            "lead_time_days",
            "Lead time cannot be negative",
            "זמן אספקה לא יכול להיות שלילי",
        ));
    }
    check_optional_email(&input.email)
}

pub fn validate_expense(input: &ExpenseInput) -> Result<(), ValidationIssue> {
    if is_blank(&input.description) {
        return Err(ValidationIssue::new(
            "description",
            "Description and amount are required",
            "נא למלא שדות חובה",
        ));
    }
    if input.amount <= Decimal::ZERO {
        return Err(ValidationIssue::new(
            "amount",
            "Amount must be greater than zero",
            "נא למלא שדות חובה",
        ));
    }
    Ok(())
}

pub fn validate_import_order(input: &ImportOrderInput) -> Result<(), ValidationIssue> {
    if is_blank(&input.supplier_name) {
        return Err(ValidationIssue::new(
            "supplier_name",
            "Supplier and order numbers are required",
            "נא למלא שדות חובה",
        ));
    }
    if input.order_numbers.iter().all(|n| is_blank(n)) {
        return Err(ValidationIssue::new(
            "order_numbers",
            "Supplier and order numbers are required",
            "נא למלא שדות חובה",
        ));
    }
    if input.total_cost < Decimal::ZERO {
        return Err(ValidationIssue::new(
            "total_cost",
            "Total cost cannot be negative",
            "עלות כוללת לא יכולה להיות שלילית",
        ));
    }
    Ok(())
}

pub fn validate_comment(input: &CommentInput) -> Result<(), ValidationIssue> {
    if is_blank(&input.body) {
        return Err(ValidationIssue::new(
            "body",
            "Comment cannot be empty",
            "לא ניתן להוסיף הערה ריקה",
        ));
    }
    Ok(())
}

// ============================================================================
// General Validations
// ============================================================================

/// Validate email format (basic check)
pub fn validate_email(email: &str) -> Result<(), &'static str> {
    let Some((local, domain)) = email.split_once('@') else {
        return Err("Invalid email format");
    };
    if local.is_empty()
        || domain.contains('@')
        || !domain.contains('.')
        || domain.starts_with('.')
        || domain.ends_with('.')
        || email.chars().any(char::is_whitespace)
    {
        return Err("Invalid email format");
    }
    Ok(())
}

/// Validate Israeli phone number format
/// Accepts: 050-1234567, 03-1234567, 077-1234567, +972-50-1234567
pub fn validate_israeli_phone(phone: &str) -> Result<(), &'static str> {
    if !phone
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, ' ' | '-' | '+' | '(' | ')'))
    {
        return Err("Phone number contains invalid characters");
    }
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();

    // Mobile and VoIP: 10 digits, 05X / 07X
    if digits.len() == 10 && (digits.starts_with("05") || digits.starts_with("07")) {
        return Ok(());
    }
    // Landline: 9 digits, 02/03/04/08/09
    if digits.len() == 9 && ["02", "03", "04", "08", "09"].iter().any(|p| digits.starts_with(p)) {
        return Ok(());
    }
    // International: 972 followed by the number without its leading 0
    if let Some(national) = digits.strip_prefix("972") {
        if (national.len() == 8 || national.len() == 9) && !national.starts_with('0') {
            return Ok(());
        }
    }

    Err("Invalid Israeli phone number format")
}
