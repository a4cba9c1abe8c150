//! Import shipment HTTP handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use shared::board::{Board, MoveRequest};
use shared::{ImportOrder, ImportOrderInput, ImportOrderPatch, ImportStatus};

use super::MoveTarget;
use crate::error::AppResult;
use crate::services::import::ImportOrderView;
use crate::services::ImportService;
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ImportQuery {
    pub status: Option<ImportStatus>,
}

#[derive(Debug, Deserialize)]
pub struct ArrivalQuery {
    #[serde(default = "default_arrival_days")]
    pub days: i64,
}

fn default_arrival_days() -> i64 {
    7
}

fn import_service(state: &AppState) -> ImportService {
    ImportService::new(state.stores.clone(), state.notifier.clone())
}

pub async fn list_import_orders(
    State(state): State<AppState>,
    Query(query): Query<ImportQuery>,
) -> AppResult<Json<Vec<ImportOrderView>>> {
    let shipments = import_service(&state).list(query.status).await?;
    Ok(Json(shipments))
}

pub async fn get_import_board(
    State(state): State<AppState>,
) -> AppResult<Json<Board<ImportOrder>>> {
    let board = import_service(&state).board().await?;
    Ok(Json(board))
}

/// Shipments expected within the next few days
pub async fn list_arriving_imports(
    State(state): State<AppState>,
    Query(query): Query<ArrivalQuery>,
) -> AppResult<Json<Vec<ImportOrder>>> {
    let shipments = import_service(&state).arriving_soon(query.days).await?;
    Ok(Json(shipments))
}

pub async fn get_import_order(
    State(state): State<AppState>,
    Path(import_order_id): Path<Uuid>,
) -> AppResult<Json<ImportOrderView>> {
    let shipment = import_service(&state).get(import_order_id).await?;
    Ok(Json(ImportOrderView::from(shipment)))
}

pub async fn create_import_order(
    State(state): State<AppState>,
    Json(input): Json<ImportOrderInput>,
) -> AppResult<(StatusCode, Json<ImportOrder>)> {
    let shipment = import_service(&state).create(input).await?;
    Ok((StatusCode::CREATED, Json(shipment)))
}

pub async fn update_import_order(
    State(state): State<AppState>,
    Path(import_order_id): Path<Uuid>,
    Json(patch): Json<ImportOrderPatch>,
) -> AppResult<Json<ImportOrder>> {
    let shipment = import_service(&state)
        .update(import_order_id, patch)
        .await?;
    Ok(Json(shipment))
}

pub async fn change_import_status(
    State(state): State<AppState>,
    Path(import_order_id): Path<Uuid>,
    Json(target): Json<MoveTarget<ImportStatus>>,
) -> AppResult<Json<ImportOrder>> {
    let shipment = import_service(&state)
        .move_status(MoveRequest {
            item_id: import_order_id,
            to: target.to,
        })
        .await?;
    Ok(Json(shipment))
}

pub async fn delete_import_order(
    State(state): State<AppState>,
    Path(import_order_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    import_service(&state).delete(import_order_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
