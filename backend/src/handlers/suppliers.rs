//! Supplier HTTP handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use shared::{Supplier, SupplierInput, SupplierPatch};

use crate::error::AppResult;
use crate::services::SupplierService;
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct SupplierQuery {
    #[serde(default)]
    pub search: String,
}

fn supplier_service(state: &AppState) -> SupplierService {
    SupplierService::new(state.stores.clone(), state.notifier.clone())
}

pub async fn list_suppliers(
    State(state): State<AppState>,
    Query(query): Query<SupplierQuery>,
) -> AppResult<Json<Vec<Supplier>>> {
    let suppliers = supplier_service(&state).list(&query.search).await?;
    Ok(Json(suppliers))
}

pub async fn get_supplier(
    State(state): State<AppState>,
    Path(supplier_id): Path<Uuid>,
) -> AppResult<Json<Supplier>> {
    let supplier = supplier_service(&state).get(supplier_id).await?;
    Ok(Json(supplier))
}

pub async fn create_supplier(
    State(state): State<AppState>,
    Json(input): Json<SupplierInput>,
) -> AppResult<(StatusCode, Json<Supplier>)> {
    let supplier = supplier_service(&state).create(input).await?;
    Ok((StatusCode::CREATED, Json(supplier)))
}

pub async fn update_supplier(
    State(state): State<AppState>,
    Path(supplier_id): Path<Uuid>,
    Json(patch): Json<SupplierPatch>,
) -> AppResult<Json<Supplier>> {
    let supplier = supplier_service(&state).update(supplier_id, patch).await?;
    Ok(Json(supplier))
}

pub async fn delete_supplier(
    State(state): State<AppState>,
    Path(supplier_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    supplier_service(&state).delete(supplier_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
