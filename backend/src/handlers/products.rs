//! Product catalog HTTP handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use shared::query::ProductFilter;
use shared::{Product, ProductInput, ProductPatch, StockAdjustment};

use crate::error::AppResult;
use crate::services::ProductService;
use crate::AppState;

fn product_service(state: &AppState) -> ProductService {
    ProductService::new(state.stores.clone(), state.notifier.clone())
}

pub async fn list_products(
    State(state): State<AppState>,
    Query(filter): Query<ProductFilter>,
) -> AppResult<Json<Vec<Product>>> {
    let products = product_service(&state).list(&filter).await?;
    Ok(Json(products))
}

pub async fn list_low_stock_products(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<Product>>> {
    let products = product_service(&state).low_stock().await?;
    Ok(Json(products))
}

pub async fn get_product(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
) -> AppResult<Json<Product>> {
    let product = product_service(&state).get(product_id).await?;
    Ok(Json(product))
}

pub async fn create_product(
    State(state): State<AppState>,
    Json(input): Json<ProductInput>,
) -> AppResult<(StatusCode, Json<Product>)> {
    let product = product_service(&state).create(input).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn update_product(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
    Json(patch): Json<ProductPatch>,
) -> AppResult<Json<Product>> {
    let product = product_service(&state).update(product_id, patch).await?;
    Ok(Json(product))
}

/// Add, subtract or set the stock level
pub async fn adjust_product_stock(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
    Json(adjustment): Json<StockAdjustment>,
) -> AppResult<Json<Product>> {
    let product = product_service(&state)
        .adjust_stock(product_id, adjustment)
        .await?;
    Ok(Json(product))
}

pub async fn delete_product(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    product_service(&state).delete(product_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
