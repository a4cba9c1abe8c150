//! Expense and finance report HTTP handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Response,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use shared::aggregation::MonthlyAmount;
use shared::query::{ExpenseFilter, FinancePeriod};
use shared::{Expense, ExpenseCategory, ExpenseInput, ExpensePatch};

use super::csv_response;
use crate::error::{AppError, AppResult};
use crate::services::finance::FinanceReport;
use crate::services::{ExportService, FinanceService};
use crate::AppState;

/// Reporting period in the query string: month, quarter, year or custom
#[derive(Debug, Default, Deserialize)]
pub struct PeriodQuery {
    pub period: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub category: Option<ExpenseCategory>,
}

impl PeriodQuery {
    pub fn period(&self) -> AppResult<FinancePeriod> {
        match self.period.as_deref() {
            None | Some("") | Some("month") => Ok(FinancePeriod::Month),
            Some("quarter") => Ok(FinancePeriod::Quarter),
            Some("year") => Ok(FinancePeriod::Year),
            Some("custom") => Ok(FinancePeriod::Custom {
                from: self.from,
                to: self.to,
            }),
            Some(other) => Err(AppError::ValidationError(format!(
                "unknown period {}",
                other
            ))),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct YearQuery {
    pub year: i32,
}

fn finance_service(state: &AppState) -> FinanceService {
    FinanceService::new(state.stores.clone(), state.notifier.clone())
}

pub async fn list_expenses(
    State(state): State<AppState>,
    Query(query): Query<PeriodQuery>,
) -> AppResult<Json<Vec<Expense>>> {
    let filter = ExpenseFilter {
        period: query.period()?,
        category: query.category,
    };
    let expenses = finance_service(&state).list_expenses(&filter).await?;
    Ok(Json(expenses))
}

pub async fn get_expense(
    State(state): State<AppState>,
    Path(expense_id): Path<Uuid>,
) -> AppResult<Json<Expense>> {
    let expense = finance_service(&state).get_expense(expense_id).await?;
    Ok(Json(expense))
}

pub async fn create_expense(
    State(state): State<AppState>,
    Json(input): Json<ExpenseInput>,
) -> AppResult<(StatusCode, Json<Expense>)> {
    let expense = finance_service(&state).create_expense(input).await?;
    Ok((StatusCode::CREATED, Json(expense)))
}

pub async fn update_expense(
    State(state): State<AppState>,
    Path(expense_id): Path<Uuid>,
    Json(patch): Json<ExpensePatch>,
) -> AppResult<Json<Expense>> {
    let expense = finance_service(&state)
        .update_expense(expense_id, patch)
        .await?;
    Ok(Json(expense))
}

pub async fn delete_expense(
    State(state): State<AppState>,
    Path(expense_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    finance_service(&state).delete_expense(expense_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Revenue, expenses and net profit for the period, with chart data
pub async fn get_finance_summary(
    State(state): State<AppState>,
    Query(query): Query<PeriodQuery>,
) -> AppResult<Json<FinanceReport>> {
    let report = finance_service(&state).summary(query.period()?).await?;
    Ok(Json(report))
}

pub async fn get_monthly_revenue(
    State(state): State<AppState>,
    Query(query): Query<YearQuery>,
) -> AppResult<Json<Vec<MonthlyAmount>>> {
    let months = finance_service(&state).monthly_revenue(query.year).await?;
    Ok(Json(months))
}

pub async fn export_finances(
    State(state): State<AppState>,
    Query(query): Query<PeriodQuery>,
) -> AppResult<Response> {
    let service = ExportService::new(state.stores.clone(), state.notifier.clone());
    let export = service.finances_csv(query.period()?).await?;
    Ok(csv_response(export))
}
