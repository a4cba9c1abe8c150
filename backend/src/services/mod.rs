//! Business logic services for the back office

use chrono::{NaiveDate, Utc};
use serde::{de::DeserializeOwned, Serialize};

use crate::error::AppResult;
use crate::store::{merge, to_object};

pub mod activity;
pub mod customer;
pub mod dashboard;
pub mod export;
pub mod finance;
pub mod import;
pub mod inventory;
pub mod lead;
pub mod order;
pub mod product;
pub mod search;
pub mod supplier;
pub mod task;

pub use activity::ActivityService;
pub use customer::CustomerService;
pub use dashboard::DashboardService;
pub use export::ExportService;
pub use finance::FinanceService;
pub use import::ImportService;
pub use inventory::InventoryService;
pub use lead::LeadService;
pub use order::OrderService;
pub use product::ProductService;
pub use search::SearchService;
pub use supplier::SupplierService;
pub use task::TaskService;

/// Calendar day used for date filters and deadline checks
pub(crate) fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// The form input a record would have after `patch`, for validating updates
pub(crate) fn patched_input<R, P, I>(record: &R, patch: &P) -> AppResult<I>
where
    R: Serialize,
    P: Serialize,
    I: DeserializeOwned,
{
    let merged = merge(to_object(record)?, to_object(patch)?);
    Ok(serde_json::from_value(serde_json::Value::Object(merged))?)
}
