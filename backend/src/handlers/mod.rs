//! HTTP handlers for the back office API

use axum::{
    http::header,
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use crate::services::export::CsvExport;

pub mod customers;
pub mod dashboard;
pub mod finances;
pub mod health;
pub mod imports;
pub mod inventory;
pub mod leads;
pub mod orders;
pub mod products;
pub mod search;
pub mod suppliers;
pub mod tasks;

pub use customers::*;
pub use dashboard::*;
pub use finances::*;
pub use health::*;
pub use imports::*;
pub use inventory::*;
pub use leads::*;
pub use orders::*;
pub use products::*;
pub use search::*;
pub use suppliers::*;
pub use tasks::*;

/// Body of a board drop: the column the card landed on
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct MoveTarget<S> {
    pub to: S,
}

/// Serve a generated CSV as a download
pub(crate) fn csv_response(export: CsvExport) -> Response {
    (
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", export.filename),
            ),
        ],
        export.content,
    )
        .into_response()
}
