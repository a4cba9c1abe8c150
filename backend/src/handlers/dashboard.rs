//! Dashboard handler

use axum::{extract::State, Json};

use crate::error::AppResult;
use crate::services::dashboard::Dashboard;
use crate::services::DashboardService;
use crate::AppState;

/// Headline stats, charts, alerts and the latest orders
pub async fn get_dashboard(State(state): State<AppState>) -> AppResult<Json<Dashboard>> {
    let service = DashboardService::new(state.stores.clone(), state.business());
    let dashboard = service.overview().await?;
    Ok(Json(dashboard))
}
