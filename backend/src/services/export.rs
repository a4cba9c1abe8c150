//! CSV exports of the order list and the finance report
//!
//! Files start with a UTF-8 byte order mark so spreadsheet apps pick up the
//! Hebrew text correctly.

use std::sync::Arc;

use rust_decimal::Decimal;

use shared::aggregation::{counts_as_revenue, FinanceSummary};
use shared::query::{sort_orders, FinancePeriod, OrderFilter, SortState};
use shared::validation::validate_report_range;
use shared::{DateRange, Expense, Order, StatusToken};

use super::today;
use crate::error::{AppError, AppResult};
use crate::notifier::{report, Notice, Notifier};
use crate::store::Stores;

const BOM: &str = "\u{feff}";

/// A generated CSV file
#[derive(Debug, Clone)]
pub struct CsvExport {
    pub filename: String,
    pub content: String,
}

#[derive(Clone)]
pub struct ExportService {
    stores: Stores,
    notifier: Arc<dyn Notifier>,
}

impl ExportService {
    /// Create a new ExportService instance
    pub fn new(stores: Stores, notifier: Arc<dyn Notifier>) -> Self {
        Self { stores, notifier }
    }

    /// The order list as currently filtered and sorted
    pub async fn orders_csv(&self, filter: &OrderFilter, sort: SortState) -> AppResult<CsvExport> {
        let result = self.orders_inner(filter, sort).await;
        report(self.notifier.as_ref(), &result, || {
            Notice::success("הדוח יוצא בהצלחה", "Report exported")
        });
        result
    }

    async fn orders_inner(&self, filter: &OrderFilter, sort: SortState) -> AppResult<CsvExport> {
        let today = today();
        let orders = self.stores.orders.get_all().await?;
        let mut rows = filter.apply(&orders, today);
        sort_orders(&mut rows, sort);
        Ok(CsvExport {
            filename: format!("orders_{}.csv", today.format("%Y-%m-%d")),
            content: orders_csv(&rows)?,
        })
    }

    pub async fn finances_csv(&self, period: FinancePeriod) -> AppResult<CsvExport> {
        let result = self.finances_inner(period).await;
        report(self.notifier.as_ref(), &result, || {
            Notice::success("הדוח יוצא בהצלחה", "Report exported")
        });
        result
    }

    async fn finances_inner(&self, period: FinancePeriod) -> AppResult<CsvExport> {
        let today = today();
        let range = period.range(today);
        validate_report_range(&range)?;
        let orders = self.stores.orders.get_all().await?;
        let expenses = self.stores.expenses.get_all().await?;
        Ok(CsvExport {
            filename: format!("finances_{}.csv", today.format("%Y-%m-%d")),
            content: finances_csv(&orders, &expenses, range)?,
        })
    }
}

fn amount(value: Decimal) -> String {
    value.normalize().to_string()
}

fn finish(writer: csv::Writer<Vec<u8>>) -> AppResult<String> {
    let bytes = writer
        .into_inner()
        .map_err(|e| AppError::Export(format!("CSV writer error: {}", e)))?;
    let body = String::from_utf8(bytes)
        .map_err(|e| AppError::Export(format!("UTF-8 conversion error: {}", e)))?;
    Ok(format!("{}{}", BOM, body))
}

/// Order number, customer, status, production type, deadline, total
pub fn orders_csv(orders: &[Order]) -> AppResult<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["מס' הזמנה", "לקוח", "סטטוס", "סוג", "דדליין", "סכום"])?;
    for order in orders {
        let deadline = order
            .deadline
            .map(|d| d.format("%-d.%-m.%Y").to_string())
            .unwrap_or_default();
        wtr.write_record([
            order.order_number.as_str(),
            order.customer_name.as_str(),
            order.status.label_he(),
            order.production_type.label_he(),
            deadline.as_str(),
            amount(order.total_amount).as_str(),
        ])?;
    }
    finish(wtr)
}

/// Expenses, then paid orders, then the totals, in one sheet
pub fn finances_csv(orders: &[Order], expenses: &[Expense], range: DateRange) -> AppResult<String> {
    let summary = FinanceSummary::compute(orders, expenses, range);
    let spent: Vec<&Expense> = expenses.iter().filter(|e| range.contains(e.date)).collect();
    let revenue: Vec<&Order> = orders
        .iter()
        .filter(|o| counts_as_revenue(o) && range.contains(o.created_on()))
        .collect();
    let blank = ["", "", "", ""];

    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["תאריך", "סוג", "תיאור", "סכום"])?;
    for e in &spent {
        wtr.write_record([
            e.date.to_string().as_str(),
            e.category.label_he(),
            e.description.as_str(),
            amount(e.amount).as_str(),
        ])?;
    }
    wtr.write_record(blank)?;
    wtr.write_record(["סה\"כ הוצאות", "", "", amount(summary.total_expenses).as_str()])?;
    wtr.write_record(blank)?;

    wtr.write_record(["תאריך הזמנה", "מספר הזמנה", "לקוח", "סכום"])?;
    for o in &revenue {
        wtr.write_record([
            o.created_on().to_string().as_str(),
            o.order_number.as_str(),
            o.customer_name.as_str(),
            amount(o.total_amount).as_str(),
        ])?;
    }
    wtr.write_record(blank)?;
    wtr.write_record(["סה\"כ הכנסות", "", "", amount(summary.total_revenue).as_str()])?;
    wtr.write_record(blank)?;
    wtr.write_record(["רווח נקי", "", "", amount(summary.net_profit).as_str()])?;
    finish(wtr)
}
