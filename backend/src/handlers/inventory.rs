//! HTTP handlers for stock items (raw materials, packaging, consumables)

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use shared::query::StockItemFilter;
use shared::{StockAdjustment, StockItem, StockItemInput, StockItemPatch};

use crate::error::AppResult;
use crate::services::inventory::InventorySummary;
use crate::services::InventoryService;
use crate::AppState;

fn inventory_service(state: &AppState) -> InventoryService {
    InventoryService::new(state.stores.clone(), state.notifier.clone(), state.business())
}

pub async fn list_stock_items(
    State(state): State<AppState>,
    Query(filter): Query<StockItemFilter>,
) -> AppResult<Json<Vec<StockItem>>> {
    let items = inventory_service(&state).list(&filter).await?;
    Ok(Json(items))
}

pub async fn list_low_stock_items(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<StockItem>>> {
    let items = inventory_service(&state).low_stock().await?;
    Ok(Json(items))
}

/// Item counts and stock value per item type
pub async fn get_inventory_summary(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<InventorySummary>>> {
    let summary = inventory_service(&state).summary().await?;
    Ok(Json(summary))
}

pub async fn get_stock_item(
    State(state): State<AppState>,
    Path(item_id): Path<Uuid>,
) -> AppResult<Json<StockItem>> {
    let item = inventory_service(&state).get(item_id).await?;
    Ok(Json(item))
}

pub async fn create_stock_item(
    State(state): State<AppState>,
    Json(input): Json<StockItemInput>,
) -> AppResult<(StatusCode, Json<StockItem>)> {
    let item = inventory_service(&state).create(input).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

pub async fn update_stock_item(
    State(state): State<AppState>,
    Path(item_id): Path<Uuid>,
    Json(patch): Json<StockItemPatch>,
) -> AppResult<Json<StockItem>> {
    let item = inventory_service(&state).update(item_id, patch).await?;
    Ok(Json(item))
}

pub async fn adjust_stock_item(
    State(state): State<AppState>,
    Path(item_id): Path<Uuid>,
    Json(adjustment): Json<StockAdjustment>,
) -> AppResult<Json<StockItem>> {
    let item = inventory_service(&state).adjust(item_id, adjustment).await?;
    Ok(Json(item))
}

pub async fn delete_stock_item(
    State(state): State<AppState>,
    Path(item_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    inventory_service(&state).delete(item_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
