//! List filtering and sorting for the back office views
//!
//! Everything here is a pure function of the loaded records and "today";
//! there is no pagination.

use std::cmp::Ordering;

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::{
    Customer, CustomerType, Expense, ExpenseCategory, Lead, LeadSource, LeadStatus, Order,
    OrderStatus, Product, ProductionType, StockItem, StockItemType, Task, TaskPriority,
    TaskStatus,
};
use crate::types::{first_of_month, DateRange};

/// Case-insensitive substring match; a blank needle matches everything
pub fn contains_ci(haystack: &str, needle: &str) -> bool {
    let needle = needle.trim();
    needle.is_empty() || haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn opt_contains_ci(haystack: &Option<String>, needle: &str) -> bool {
    haystack.as_deref().map_or(false, |h| contains_ci(h, needle))
}

fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

// ============================================================================
// Date filters
// ============================================================================

/// Creation-date filter on the order list
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DateFilter {
    #[default]
    All,
    Today,
    /// The last 7 days
    Week,
    /// The last 30 days
    Month,
    /// Since the start of the calendar quarter
    Quarter,
    /// Since January 1st
    Year,
    /// Inclusive on both ends; a missing bound is open
    Custom {
        #[serde(default)]
        from: Option<NaiveDate>,
        #[serde(default)]
        to: Option<NaiveDate>,
    },
}

impl DateFilter {
    /// `None` when the filter lets every date through
    pub fn range(&self, today: NaiveDate) -> Option<DateRange> {
        let open_end = NaiveDate::MAX;
        match *self {
            DateFilter::All => None,
            DateFilter::Today => Some(DateRange::new(today, today)),
            DateFilter::Week => Some(DateRange::new(today - Duration::days(7), open_end)),
            DateFilter::Month => Some(DateRange::new(today - Duration::days(30), open_end)),
            DateFilter::Quarter => Some(DateRange::new(quarter_start(today), open_end)),
            DateFilter::Year => Some(DateRange::new(year_start(today), open_end)),
            DateFilter::Custom { from, to } => Some(DateRange::new(
                from.unwrap_or(NaiveDate::MIN),
                to.unwrap_or(open_end),
            )),
        }
    }

    pub fn matches(&self, date: NaiveDate, today: NaiveDate) -> bool {
        self.range(today).map_or(true, |r| r.contains(date))
    }
}

fn quarter_start(today: NaiveDate) -> NaiveDate {
    let month = (today.month0() / 3) * 3 + 1;
    NaiveDate::from_ymd_opt(today.year(), month, 1).unwrap_or(today)
}

fn year_start(today: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(today.year(), 1, 1).unwrap_or(today)
}

/// Reporting period on the finance page; always ends today unless custom
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FinancePeriod {
    /// The current calendar month
    #[default]
    Month,
    Quarter,
    Year,
    /// Defaults to year-to-date for missing bounds
    Custom {
        #[serde(default)]
        from: Option<NaiveDate>,
        #[serde(default)]
        to: Option<NaiveDate>,
    },
}

impl FinancePeriod {
    pub fn range(&self, today: NaiveDate) -> DateRange {
        match *self {
            FinancePeriod::Month => DateRange::new(first_of_month(today), today),
            FinancePeriod::Quarter => DateRange::new(quarter_start(today), today),
            FinancePeriod::Year => DateRange::new(year_start(today), today),
            FinancePeriod::Custom { from, to } => DateRange::new(
                from.unwrap_or_else(|| year_start(today)),
                to.unwrap_or(today),
            ),
        }
    }
}

// ============================================================================
// Orders
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct OrderFilter {
    /// Matched against order number and customer name
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub status: Option<OrderStatus>,
    #[serde(default)]
    pub production_type: Option<ProductionType>,
    #[serde(default)]
    pub date: DateFilter,
}

impl OrderFilter {
    pub fn matches(&self, order: &Order, today: NaiveDate) -> bool {
        let matches_search = contains_ci(&order.order_number, &self.search)
            || contains_ci(&order.customer_name, &self.search);
        matches_search
            && self.status.map_or(true, |s| order.status == s)
            && self
                .production_type
                .map_or(true, |t| order.production_type == t)
            && self.date.matches(order.created_on(), today)
    }

    pub fn apply(&self, orders: &[Order], today: NaiveDate) -> Vec<Order> {
        orders
            .iter()
            .filter(|o| self.matches(o, today))
            .cloned()
            .collect()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderSortField {
    OrderNumber,
    #[default]
    CreatedAt,
    Deadline,
    TotalAmount,
    CustomerName,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

/// Column-header sort: newest first by default
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct SortState {
    #[serde(default)]
    pub field: OrderSortField,
    #[serde(default)]
    pub direction: SortDirection,
}

impl SortState {
    /// Clicking the active column flips direction; a new column starts descending
    pub fn toggle(self, field: OrderSortField) -> Self {
        if self.field == field {
            Self {
                field,
                direction: self.direction.flipped(),
            }
        } else {
            Self {
                field,
                direction: SortDirection::Desc,
            }
        }
    }
}

fn compare_orders(a: &Order, b: &Order, field: OrderSortField) -> Ordering {
    match field {
        OrderSortField::OrderNumber => a.order_number.cmp(&b.order_number),
        OrderSortField::CreatedAt => a.created_at.cmp(&b.created_at),
        // Orders without a deadline sort as earliest
        OrderSortField::Deadline => a.deadline.cmp(&b.deadline),
        OrderSortField::TotalAmount => a.total_amount.cmp(&b.total_amount),
        OrderSortField::CustomerName => a
            .customer_name
            .to_lowercase()
            .cmp(&b.customer_name.to_lowercase()),
    }
}

/// Stable sort: ties keep their incoming order
pub fn sort_orders(orders: &mut [Order], sort: SortState) {
    orders.sort_by(|a, b| sort.direction.apply(compare_orders(a, b, sort.field)));
}

/// Production floor filter: search plus "deadline within N days"
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ProductionFilter {
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub urgent_only: bool,
}

impl ProductionFilter {
    pub fn matches(&self, order: &Order, today: NaiveDate, urgent_days: i64) -> bool {
        let matches_search = contains_ci(&order.order_number, &self.search)
            || contains_ci(&order.customer_name, &self.search);
        matches_search && (!self.urgent_only || deadline_within(order, today, urgent_days))
    }
}

/// Deadline falls between today and `days` from now, inclusive
pub fn deadline_within(order: &Order, today: NaiveDate, days: i64) -> bool {
    order
        .deadline
        .map_or(false, |d| d >= today && d <= today + Duration::days(days))
}

// ============================================================================
// Customers, leads, products, stock
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct CustomerFilter {
    /// Matched against names, company, phone and email
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub customer_type: Option<CustomerType>,
    #[serde(default)]
    pub active_only: bool,
}

impl CustomerFilter {
    pub fn matches(&self, customer: &Customer) -> bool {
        let s = &self.search;
        let matches_search = is_blank(s)
            || opt_contains_ci(&customer.first_name, s)
            || opt_contains_ci(&customer.last_name, s)
            || opt_contains_ci(&customer.company_name, s)
            || contains_ci(&customer.phone, s)
            || opt_contains_ci(&customer.email, s)
            || contains_ci(&customer.display_name(), s);
        matches_search
            && self
                .customer_type
                .map_or(true, |t| customer.customer_type == t)
            && (!self.active_only || customer.is_active)
    }

    pub fn apply(&self, customers: &[Customer]) -> Vec<Customer> {
        customers.iter().filter(|c| self.matches(c)).cloned().collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct LeadFilter {
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub source: Option<LeadSource>,
    #[serde(default)]
    pub status: Option<LeadStatus>,
}

impl LeadFilter {
    pub fn matches(&self, lead: &Lead) -> bool {
        let s = &self.search;
        let matches_search = is_blank(s)
            || contains_ci(&lead.contact_name, s)
            || opt_contains_ci(&lead.company_name, s)
            || contains_ci(&lead.phone, s);
        matches_search
            && self.source.map_or(true, |src| lead.source == src)
            && self.status.map_or(true, |st| lead.status == st)
    }

    pub fn apply(&self, leads: &[Lead]) -> Vec<Lead> {
        leads.iter().filter(|l| self.matches(l)).cloned().collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ProductFilter {
    /// Matched against name and SKU
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub production_type: Option<ProductionType>,
    #[serde(default)]
    pub low_stock_only: bool,
}

impl ProductFilter {
    pub fn matches(&self, product: &Product) -> bool {
        (contains_ci(&product.name, &self.search) || contains_ci(&product.sku, &self.search))
            && self
                .production_type
                .map_or(true, |t| product.production_type == t)
            && (!self.low_stock_only || product.is_low_stock())
    }

    pub fn apply(&self, products: &[Product]) -> Vec<Product> {
        products.iter().filter(|p| self.matches(p)).cloned().collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct StockItemFilter {
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub item_type: Option<StockItemType>,
    #[serde(default)]
    pub low_stock_only: bool,
}

impl StockItemFilter {
    pub fn matches(&self, item: &StockItem) -> bool {
        (contains_ci(&item.name, &self.search) || contains_ci(&item.sku, &self.search))
            && self.item_type.map_or(true, |t| item.item_type == t)
            && (!self.low_stock_only || item.is_low_stock())
    }

    pub fn apply(&self, items: &[StockItem]) -> Vec<StockItem> {
        items.iter().filter(|i| self.matches(i)).cloned().collect()
    }
}

// ============================================================================
// Tasks and expenses
// ============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct TaskFilter {
    #[serde(default)]
    pub status: Option<TaskStatus>,
    #[serde(default)]
    pub priority: Option<TaskPriority>,
}

impl TaskFilter {
    pub fn matches(&self, task: &Task) -> bool {
        self.status.map_or(true, |s| task.status == s)
            && self.priority.map_or(true, |p| task.priority == p)
    }

    /// Filtered and sorted the way the task list shows them
    pub fn apply(&self, tasks: &[Task]) -> Vec<Task> {
        let mut out: Vec<Task> = tasks.iter().filter(|t| self.matches(t)).cloned().collect();
        sort_tasks(&mut out);
        out
    }
}

/// Urgent first, then by due date
pub fn sort_tasks(tasks: &mut [Task]) {
    tasks.sort_by(|a, b| {
        a.priority
            .rank()
            .cmp(&b.priority.rank())
            .then(a.due_date.cmp(&b.due_date))
    });
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ExpenseFilter {
    #[serde(default)]
    pub period: FinancePeriod,
    #[serde(default)]
    pub category: Option<ExpenseCategory>,
}

impl ExpenseFilter {
    pub fn matches(&self, expense: &Expense, today: NaiveDate) -> bool {
        self.period.range(today).contains(expense.date)
            && self.category.map_or(true, |c| expense.category == c)
    }

    pub fn apply(&self, expenses: &[Expense], today: NaiveDate) -> Vec<Expense> {
        expenses
            .iter()
            .filter(|e| self.matches(e, today))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PaymentStatus, ProductionStage, ShippingType};
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;
    use uuid::Uuid;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn order(number: &str, customer: &str, created: NaiveDate) -> Order {
        Order {
            id: Uuid::new_v4(),
            order_number: number.to_string(),
            customer_id: Uuid::new_v4(),
            customer_name: customer.to_string(),
            status: OrderStatus::Draft,
            production_type: ProductionType::Local,
            production_stage: ProductionStage::initial(ProductionType::Local),
            event_name: None,
            event_date: None,
            subtotal: Decimal::ZERO,
            tax_amount: Decimal::ZERO,
            total_amount: Decimal::ZERO,
            payment_status: PaymentStatus::Pending,
            payment_method: None,
            shipping_type: ShippingType::Pickup,
            shipping_address: None,
            deadline: None,
            notes: None,
            items: vec![],
            created_at: Utc
                .with_ymd_and_hms(created.year(), created.month(), created.day(), 10, 0, 0)
                .unwrap(),
        }
    }

    #[test]
    fn test_contains_ci() {
        assert!(contains_ci("Acme Events", "acme"));
        assert!(contains_ci("anything", ""));
        assert!(contains_ci("anything", "   "));
        assert!(!contains_ci("Acme", "beta"));
    }

    #[test]
    fn test_order_search() {
        let today = day(2024, 5, 15);
        let orders = vec![
            order("24-00001", "Dana Cohen", today),
            order("24-00002", "Acme Ltd", today),
        ];
        let filter = OrderFilter {
            search: "ACME".to_string(),
            ..Default::default()
        };
        let found = filter.apply(&orders, today);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].order_number, "24-00002");

        let by_number = OrderFilter {
            search: "00001".to_string(),
            ..Default::default()
        };
        assert_eq!(by_number.apply(&orders, today).len(), 1);
    }

    #[test]
    fn test_order_search_by_partial_number() {
        let today = day(2024, 5, 15);
        let orders = vec![
            order("24-00150", "Dana Cohen", today),
            order("24-00200", "Acme Ltd", today),
        ];
        let filter = OrderFilter {
            search: "24-0015".to_string(),
            ..Default::default()
        };
        let found = filter.apply(&orders, today);
        let numbers: Vec<&str> = found.iter().map(|o| o.order_number.as_str()).collect();
        assert_eq!(numbers, vec!["24-00150"]);
    }

    #[test]
    fn test_custom_range_is_inclusive_by_day() {
        let today = day(2024, 5, 15);
        let filter = DateFilter::Custom {
            from: Some(day(2024, 5, 1)),
            to: Some(day(2024, 5, 10)),
        };
        assert!(filter.matches(day(2024, 5, 1), today));
        assert!(filter.matches(day(2024, 5, 10), today));
        assert!(!filter.matches(day(2024, 5, 11), today));
        assert!(!filter.matches(day(2024, 4, 30), today));
    }

    #[test]
    fn test_relative_date_filters() {
        let today = day(2024, 5, 15);
        assert!(DateFilter::Week.matches(day(2024, 5, 8), today));
        assert!(!DateFilter::Week.matches(day(2024, 5, 7), today));
        assert!(DateFilter::Month.matches(day(2024, 4, 15), today));
        assert!(!DateFilter::Month.matches(day(2024, 4, 14), today));
        assert!(DateFilter::Quarter.matches(day(2024, 4, 1), today));
        assert!(!DateFilter::Quarter.matches(day(2024, 3, 31), today));
        assert!(DateFilter::Today.matches(today, today));
        assert!(DateFilter::All.matches(day(1999, 1, 1), today));
    }

    #[test]
    fn test_finance_period() {
        let today = day(2024, 8, 20);
        assert_eq!(
            FinancePeriod::Month.range(today),
            DateRange::new(day(2024, 8, 1), today)
        );
        assert_eq!(
            FinancePeriod::Quarter.range(today),
            DateRange::new(day(2024, 7, 1), today)
        );
        assert_eq!(
            FinancePeriod::Custom { from: None, to: None }.range(today),
            DateRange::new(day(2024, 1, 1), today)
        );
    }

    #[test]
    fn test_sort_toggle() {
        let state = SortState::default();
        assert_eq!(state.field, OrderSortField::CreatedAt);
        assert_eq!(state.direction, SortDirection::Desc);

        let flipped = state.toggle(OrderSortField::CreatedAt);
        assert_eq!(flipped.direction, SortDirection::Asc);

        let other = flipped.toggle(OrderSortField::TotalAmount);
        assert_eq!(other.field, OrderSortField::TotalAmount);
        assert_eq!(other.direction, SortDirection::Desc);
    }

    #[test]
    fn test_sort_by_deadline_missing_first_ascending() {
        let today = day(2024, 5, 15);
        let mut a = order("24-00001", "A", today);
        a.deadline = Some(day(2024, 6, 1));
        let b = order("24-00002", "B", today);
        let mut orders = vec![a, b];
        sort_orders(
            &mut orders,
            SortState {
                field: OrderSortField::Deadline,
                direction: SortDirection::Asc,
            },
        );
        assert_eq!(orders[0].order_number, "24-00002");
    }

    #[test]
    fn test_sort_by_customer_name_ignores_case() {
        let today = day(2024, 5, 15);
        let mut orders = vec![
            order("1", "bravo", today),
            order("2", "Alpha", today),
            order("3", "charlie", today),
        ];
        sort_orders(
            &mut orders,
            SortState {
                field: OrderSortField::CustomerName,
                direction: SortDirection::Asc,
            },
        );
        let names: Vec<_> = orders.iter().map(|o| o.customer_name.as_str()).collect();
        assert_eq!(names, vec!["Alpha", "bravo", "charlie"]);
    }

    #[test]
    fn test_deadline_within() {
        let today = day(2024, 5, 15);
        let mut o = order("24-00001", "A", today);
        o.deadline = Some(day(2024, 5, 18));
        assert!(deadline_within(&o, today, 3));
        o.deadline = Some(day(2024, 5, 19));
        assert!(!deadline_within(&o, today, 3));
        o.deadline = Some(day(2024, 5, 14));
        assert!(!deadline_within(&o, today, 3));
    }

    #[test]
    fn test_sort_tasks() {
        let task = |title: &str, priority, due| Task {
            id: Uuid::new_v4(),
            title: title.to_string(),
            status: TaskStatus::Todo,
            priority,
            due_date: due,
            related_order: None,
            created_at: Utc::now(),
        };
        let mut tasks = vec![
            task("low", TaskPriority::Low, day(2024, 1, 1)),
            task("urgent-late", TaskPriority::Urgent, day(2024, 3, 1)),
            task("urgent-early", TaskPriority::Urgent, day(2024, 2, 1)),
            task("high", TaskPriority::High, day(2024, 1, 1)),
        ];
        sort_tasks(&mut tasks);
        let titles: Vec<_> = tasks.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["urgent-early", "urgent-late", "high", "low"]);
    }

    #[test]
    fn test_date_filter_wire_format() {
        let f: DateFilter = serde_json::from_value(serde_json::json!({
            "kind": "custom", "from": "2024-01-01"
        }))
        .unwrap();
        assert_eq!(
            f,
            DateFilter::Custom {
                from: Some(day(2024, 1, 1)),
                to: None
            }
        );
    }
}
