//! Finance service: expenses and the revenue/expense report
//!
//! Revenue is derived from paid orders; only expenses are stored here.

use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;

use shared::aggregation::{
    expenses_by_category, monthly_revenue, revenue_vs_expenses, CategoryAmount, FinanceSummary,
    MonthBucket, MonthlyAmount,
};
use shared::query::{ExpenseFilter, FinancePeriod};
use shared::validation::{validate_expense, validate_report_range};
use shared::{DateRange, Expense, ExpenseInput, ExpensePatch};

use super::{patched_input, today};
use crate::error::AppResult;
use crate::notifier::{report, Notice, Notifier};
use crate::store::{require, Stores};

#[derive(Clone)]
pub struct FinanceService {
    stores: Stores,
    notifier: Arc<dyn Notifier>,
}

/// Everything the finance page shows for one period
#[derive(Debug, Clone, Serialize)]
pub struct FinanceReport {
    pub range: DateRange,
    pub summary: FinanceSummary,
    pub by_month: Vec<MonthBucket>,
    pub by_category: Vec<CategoryAmount>,
}

impl FinanceService {
    /// Create a new FinanceService instance
    pub fn new(stores: Stores, notifier: Arc<dyn Notifier>) -> Self {
        Self { stores, notifier }
    }

    pub async fn list_expenses(&self, filter: &ExpenseFilter) -> AppResult<Vec<Expense>> {
        let expenses = self.stores.expenses.get_all().await?;
        Ok(filter.apply(&expenses, today()))
    }

    pub async fn get_expense(&self, id: Uuid) -> AppResult<Expense> {
        require(self.stores.expenses.as_ref(), id).await
    }

    pub async fn create_expense(&self, input: ExpenseInput) -> AppResult<Expense> {
        let result = async {
            validate_expense(&input)?;
            self.stores.expenses.create(input).await
        }
        .await;
        report(self.notifier.as_ref(), &result, || {
            Notice::success("ההוצאה נוספה בהצלחה", "Expense added")
        });
        result
    }

    pub async fn update_expense(&self, id: Uuid, patch: ExpensePatch) -> AppResult<Expense> {
        let result = async {
            let expense = self.get_expense(id).await?;
            let preview: ExpenseInput = patched_input(&expense, &patch)?;
            validate_expense(&preview)?;
            self.stores.expenses.update(id, patch).await
        }
        .await;
        report(self.notifier.as_ref(), &result, || {
            Notice::success("ההוצאה עודכנה בהצלחה", "Expense updated")
        });
        result
    }

    pub async fn delete_expense(&self, id: Uuid) -> AppResult<()> {
        let result = self.stores.expenses.delete(id).await;
        report(self.notifier.as_ref(), &result, || {
            Notice::success("ההוצאה נמחקה בהצלחה", "Expense deleted")
        });
        result
    }

    pub async fn summary(&self, period: FinancePeriod) -> AppResult<FinanceReport> {
        let range = period.range(today());
        validate_report_range(&range)?;
        let orders = self.stores.orders.get_all().await?;
        let expenses = self.stores.expenses.get_all().await?;

        let in_range: Vec<Expense> = expenses
            .iter()
            .filter(|e| range.contains(e.date))
            .cloned()
            .collect();

        Ok(FinanceReport {
            range,
            summary: FinanceSummary::compute(&orders, &expenses, range),
            by_month: revenue_vs_expenses(&orders, &expenses, range),
            by_category: expenses_by_category(&in_range),
        })
    }

    /// Paid revenue for each month of `year`
    pub async fn monthly_revenue(&self, year: i32) -> AppResult<Vec<MonthlyAmount>> {
        let orders = self.stores.orders.get_all().await?;
        Ok(monthly_revenue(&orders, year))
    }
}
