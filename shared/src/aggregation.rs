//! Dashboard and finance aggregations

use chrono::{Datelike, Duration, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{
    Expense, ExpenseCategory, Lead, Order, OrderStatus, PaymentStatus, Product, Task,
    TaskPriority, TaskStatus,
};
use crate::query::deadline_within;
use crate::status::StatusToken;
use crate::types::{first_of_month, last_of_month, DateRange};

/// Short Hebrew month names, January first
pub const MONTHS_HE: [&str; 12] = [
    "ינו", "פבר", "מרץ", "אפר", "מאי", "יוני", "יולי", "אוג", "ספט", "אוק", "נוב", "דצמ",
];

/// Only fully paid orders count as revenue
pub fn counts_as_revenue(order: &Order) -> bool {
    order.payment_status == PaymentStatus::Paid
}

fn revenue_between(orders: &[Order], range: DateRange) -> Decimal {
    orders
        .iter()
        .filter(|o| counts_as_revenue(o) && range.contains(o.created_on()))
        .map(|o| o.total_amount)
        .sum()
}

fn month_range(date: NaiveDate) -> DateRange {
    DateRange::new(first_of_month(date), last_of_month(date))
}

/// Whole-percent change from `previous` to `current`; 0 when there is no baseline
pub fn percent_growth(current: Decimal, previous: Decimal) -> Decimal {
    if previous <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    ((current - previous) / previous * Decimal::from(100))
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DashboardStats {
    pub open_orders: usize,
    pub new_leads: usize,
    pub in_production: usize,
    pub monthly_revenue: Decimal,
    pub revenue_growth_percent: Decimal,
}

impl DashboardStats {
    pub fn compute(orders: &[Order], leads: &[Lead], today: NaiveDate, new_lead_days: i64) -> Self {
        let lead_cutoff = today - Duration::days(new_lead_days);
        let this_month = month_range(today);
        let previous_month = month_range(first_of_month(today) - Duration::days(1));
        let monthly_revenue = revenue_between(orders, this_month);
        let previous_revenue = revenue_between(orders, previous_month);

        Self {
            open_orders: orders.iter().filter(|o| o.status.is_open()).count(),
            new_leads: leads
                .iter()
                .filter(|l| l.created_at.date_naive() >= lead_cutoff)
                .count(),
            in_production: orders
                .iter()
                .filter(|o| o.status == OrderStatus::InProduction)
                .count(),
            monthly_revenue,
            revenue_growth_percent: percent_growth(monthly_revenue, previous_revenue),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct MonthlyAmount {
    /// 1-based calendar month
    pub month: u32,
    pub label_he: &'static str,
    pub amount: Decimal,
}

/// Paid revenue per calendar month of `year`, twelve buckets
pub fn monthly_revenue(orders: &[Order], year: i32) -> Vec<MonthlyAmount> {
    let mut buckets: Vec<MonthlyAmount> = MONTHS_HE
        .iter()
        .enumerate()
        .map(|(i, label)| MonthlyAmount {
            month: i as u32 + 1,
            label_he: *label,
            amount: Decimal::ZERO,
        })
        .collect();
    for order in orders.iter().filter(|o| counts_as_revenue(o)) {
        let created = order.created_on();
        if created.year() == year {
            buckets[created.month0() as usize].amount += order.total_amount;
        }
    }
    buckets
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct StatusCount {
    pub status: OrderStatus,
    pub label_he: &'static str,
    pub color_class: &'static str,
    pub count: usize,
}

/// Orders per status, in display order, statuses with no orders omitted
pub fn orders_by_status(orders: &[Order]) -> Vec<StatusCount> {
    OrderStatus::all()
        .into_iter()
        .map(|status| StatusCount {
            status,
            label_he: status.label_he(),
            color_class: status.color_class(),
            count: orders.iter().filter(|o| o.status == status).count(),
        })
        .filter(|c| c.count > 0)
        .collect()
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CategoryAmount {
    pub category: ExpenseCategory,
    pub label_he: &'static str,
    pub amount: Decimal,
}

/// Expense totals per category, categories without spend omitted
pub fn expenses_by_category(expenses: &[Expense]) -> Vec<CategoryAmount> {
    ExpenseCategory::all()
        .into_iter()
        .filter_map(|category| {
            let matching: Vec<&Expense> =
                expenses.iter().filter(|e| e.category == category).collect();
            if matching.is_empty() {
                return None;
            }
            Some(CategoryAmount {
                category,
                label_he: category.label_he(),
                amount: matching.iter().map(|e| e.amount).sum(),
            })
        })
        .collect()
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct FinanceSummary {
    pub total_revenue: Decimal,
    pub total_expenses: Decimal,
    pub net_profit: Decimal,
}

impl FinanceSummary {
    pub fn compute(orders: &[Order], expenses: &[Expense], range: DateRange) -> Self {
        let total_revenue = revenue_between(orders, range);
        let total_expenses: Decimal = expenses
            .iter()
            .filter(|e| range.contains(e.date))
            .map(|e| e.amount)
            .sum();
        Self {
            total_revenue,
            total_expenses,
            net_profit: total_revenue - total_expenses,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct MonthBucket {
    /// First day of the month
    pub month: NaiveDate,
    pub label_he: &'static str,
    pub revenue: Decimal,
    pub expenses: Decimal,
}

/// Revenue against expenses for every month the range touches
pub fn revenue_vs_expenses(orders: &[Order], expenses: &[Expense], range: DateRange) -> Vec<MonthBucket> {
    range
        .months()
        .into_iter()
        .map(|month| {
            let bucket = DateRange::new(month.max(range.start), last_of_month(month).min(range.end));
            MonthBucket {
                month,
                label_he: MONTHS_HE[month.month0() as usize],
                revenue: revenue_between(orders, bucket),
                expenses: expenses
                    .iter()
                    .filter(|e| bucket.contains(e.date))
                    .map(|e| e.amount)
                    .sum(),
            }
        })
        .collect()
}

/// Something on the dashboard that needs attention
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Alert {
    Deadline {
        order_id: Uuid,
        order_number: String,
        deadline: NaiveDate,
    },
    Task {
        task_id: Uuid,
        title: String,
    },
    Stock {
        product_id: Uuid,
        name: String,
        current_stock: i32,
        min_stock_alert: i32,
    },
}

impl Alert {
    pub fn message_he(&self) -> String {
        match self {
            Alert::Deadline { order_number, .. } => format!("דדליין קרוב: הזמנה {}", order_number),
            Alert::Task { title, .. } => format!("משימה דחופה: {}", title),
            Alert::Stock { name, .. } => format!("מלאי נמוך: {}", name),
        }
    }

    pub fn message_en(&self) -> String {
        match self {
            Alert::Deadline { order_number, .. } => format!("Deadline approaching: order {}", order_number),
            Alert::Task { title, .. } => format!("Urgent task: {}", title),
            Alert::Stock { name, .. } => format!("Low stock: {}", name),
        }
    }
}

/// Deadline alerts first, then urgent tasks, then low stock, capped at `limit`
pub fn alerts(
    orders: &[Order],
    tasks: &[Task],
    products: &[Product],
    today: NaiveDate,
    deadline_days: i64,
    limit: usize,
) -> Vec<Alert> {
    let deadlines = orders
        .iter()
        .filter(|o| o.status.is_open() && deadline_within(o, today, deadline_days))
        .filter_map(|o| {
            o.deadline.map(|deadline| Alert::Deadline {
                order_id: o.id,
                order_number: o.order_number.clone(),
                deadline,
            })
        });
    let urgent_tasks = tasks
        .iter()
        .filter(|t| t.priority == TaskPriority::Urgent && t.status != TaskStatus::Completed)
        .map(|t| Alert::Task {
            task_id: t.id,
            title: t.title.clone(),
        });
    let low_stock = products.iter().filter(|p| p.is_low_stock()).map(|p| Alert::Stock {
        product_id: p.id,
        name: p.name.clone(),
        current_stock: p.current_stock,
        min_stock_alert: p.min_stock_alert,
    });
    deadlines.chain(urgent_tasks).chain(low_stock).take(limit).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ProductionStage, ProductionType, ShippingType};
    use chrono::{TimeZone, Utc};

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn order(created: NaiveDate, total: i64, status: OrderStatus, paid: bool) -> Order {
        Order {
            id: Uuid::new_v4(),
            order_number: "24-00001".to_string(),
            customer_id: Uuid::new_v4(),
            customer_name: "Client".to_string(),
            status,
            production_type: ProductionType::Local,
            production_stage: ProductionStage::initial(ProductionType::Local),
            event_name: None,
            event_date: None,
            subtotal: Decimal::from(total),
            tax_amount: Decimal::ZERO,
            total_amount: Decimal::from(total),
            payment_status: if paid {
                PaymentStatus::Paid
            } else {
                PaymentStatus::Pending
            },
            payment_method: None,
            shipping_type: ShippingType::Pickup,
            shipping_address: None,
            deadline: None,
            notes: None,
            items: vec![],
            created_at: Utc
                .with_ymd_and_hms(created.year(), created.month(), created.day(), 12, 0, 0)
                .unwrap(),
        }
    }

    fn expense(date: NaiveDate, amount: i64, category: ExpenseCategory) -> Expense {
        Expense {
            id: Uuid::new_v4(),
            category,
            description: "x".to_string(),
            amount: Decimal::from(amount),
            date,
            supplier_name: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_percent_growth() {
        assert_eq!(percent_growth(Decimal::from(150), Decimal::from(100)), Decimal::from(50));
        assert_eq!(percent_growth(Decimal::from(100), Decimal::ZERO), Decimal::ZERO);
        assert_eq!(percent_growth(Decimal::from(2), Decimal::from(3)), Decimal::from(-33));
    }

    #[test]
    fn test_dashboard_stats() {
        let today = day(2024, 5, 20);
        let orders = vec![
            order(day(2024, 5, 2), 1000, OrderStatus::InProduction, true),
            order(day(2024, 5, 3), 500, OrderStatus::Draft, false),
            order(day(2024, 4, 10), 800, OrderStatus::Completed, true),
            order(day(2024, 4, 11), 300, OrderStatus::Cancelled, false),
        ];
        let stats = DashboardStats::compute(&orders, &[], today, 7);
        assert_eq!(stats.open_orders, 2);
        assert_eq!(stats.in_production, 1);
        assert_eq!(stats.monthly_revenue, Decimal::from(1000));
        assert_eq!(stats.revenue_growth_percent, Decimal::from(25));
    }

    #[test]
    fn test_monthly_revenue_buckets() {
        let orders = vec![
            order(day(2024, 1, 5), 100, OrderStatus::Completed, true),
            order(day(2024, 1, 25), 50, OrderStatus::Completed, true),
            order(day(2023, 1, 5), 999, OrderStatus::Completed, true),
            order(day(2024, 3, 5), 70, OrderStatus::Draft, false),
        ];
        let buckets = monthly_revenue(&orders, 2024);
        assert_eq!(buckets.len(), 12);
        assert_eq!(buckets[0].amount, Decimal::from(150));
        assert_eq!(buckets[2].amount, Decimal::ZERO);
        assert_eq!(buckets[0].label_he, "ינו");
    }

    #[test]
    fn test_orders_by_status_omits_empty() {
        let today = day(2024, 5, 20);
        let orders = vec![
            order(today, 1, OrderStatus::Draft, false),
            order(today, 1, OrderStatus::Draft, false),
            order(today, 1, OrderStatus::Paid, true),
        ];
        let counts = orders_by_status(&orders);
        assert_eq!(counts.len(), 2);
        assert_eq!(counts[0].status, OrderStatus::Draft);
        assert_eq!(counts[0].count, 2);
    }

    #[test]
    fn test_finance_summary_and_buckets() {
        let range = DateRange::new(day(2024, 1, 1), day(2024, 2, 15));
        let orders = vec![
            order(day(2024, 1, 10), 1000, OrderStatus::Completed, true),
            order(day(2024, 2, 20), 400, OrderStatus::Completed, true),
        ];
        let expenses = vec![
            expense(day(2024, 1, 3), 300, ExpenseCategory::Rent),
            expense(day(2024, 2, 1), 200, ExpenseCategory::Marketing),
            expense(day(2024, 2, 1), 50, ExpenseCategory::Marketing),
        ];
        let summary = FinanceSummary::compute(&orders, &expenses, range);
        assert_eq!(summary.total_revenue, Decimal::from(1000));
        assert_eq!(summary.total_expenses, Decimal::from(550));
        assert_eq!(summary.net_profit, Decimal::from(450));

        let buckets = revenue_vs_expenses(&orders, &expenses, range);
        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[1].revenue, Decimal::ZERO);
        assert_eq!(buckets[1].expenses, Decimal::from(250));

        let categories = expenses_by_category(&expenses);
        assert_eq!(categories.len(), 2);
        assert_eq!(categories[1].amount, Decimal::from(250));
    }

    #[test]
    fn test_alerts_order_and_limit() {
        let today = day(2024, 5, 20);
        let mut due = order(today, 1, OrderStatus::Approved, false);
        due.deadline = Some(day(2024, 5, 22));
        let mut done = order(today, 1, OrderStatus::Completed, true);
        done.deadline = Some(day(2024, 5, 21));
        let task = Task {
            id: Uuid::new_v4(),
            title: "Call supplier".to_string(),
            status: TaskStatus::InProgress,
            priority: TaskPriority::Urgent,
            due_date: today,
            related_order: None,
            created_at: Utc::now(),
        };
        let list = alerts(&[due, done], &[task], &[], today, 3, 5);
        assert_eq!(list.len(), 2);
        assert!(matches!(list[0], Alert::Deadline { .. }));
        assert!(matches!(list[1], Alert::Task { .. }));
        assert_eq!(list[1].message_he(), "משימה דחופה: Call supplier");

        assert_eq!(alerts(&[], &[], &[], today, 3, 0).len(), 0);
    }
}
