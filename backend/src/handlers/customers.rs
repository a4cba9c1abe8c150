//! Customer HTTP handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use shared::query::CustomerFilter;
use shared::{Customer, CustomerInput, CustomerPatch, CustomerStats, CustomerWithStats, Order};

use crate::error::AppResult;
use crate::services::CustomerService;
use crate::AppState;

fn customer_service(state: &AppState) -> CustomerService {
    CustomerService::new(state.stores.clone(), state.notifier.clone())
}

/// List customers with their order count and total purchases
pub async fn list_customers(
    State(state): State<AppState>,
    Query(filter): Query<CustomerFilter>,
) -> AppResult<Json<Vec<CustomerWithStats>>> {
    let customers = customer_service(&state).list(&filter).await?;
    Ok(Json(customers))
}

pub async fn get_customer(
    State(state): State<AppState>,
    Path(customer_id): Path<Uuid>,
) -> AppResult<Json<CustomerWithStats>> {
    let customer = customer_service(&state).with_stats(customer_id).await?;
    Ok(Json(customer))
}

pub async fn create_customer(
    State(state): State<AppState>,
    Json(input): Json<CustomerInput>,
) -> AppResult<(StatusCode, Json<Customer>)> {
    let customer = customer_service(&state).create(input).await?;
    Ok((StatusCode::CREATED, Json(customer)))
}

pub async fn update_customer(
    State(state): State<AppState>,
    Path(customer_id): Path<Uuid>,
    Json(patch): Json<CustomerPatch>,
) -> AppResult<Json<Customer>> {
    let customer = customer_service(&state).update(customer_id, patch).await?;
    Ok(Json(customer))
}

pub async fn deactivate_customer(
    State(state): State<AppState>,
    Path(customer_id): Path<Uuid>,
) -> AppResult<Json<Customer>> {
    let customer = customer_service(&state).deactivate(customer_id).await?;
    Ok(Json(customer))
}

pub async fn delete_customer(
    State(state): State<AppState>,
    Path(customer_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    customer_service(&state).delete(customer_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_customer_stats(
    State(state): State<AppState>,
    Path(customer_id): Path<Uuid>,
) -> AppResult<Json<CustomerStats>> {
    let service = customer_service(&state);
    service.get(customer_id).await?;
    let stats = service.stats_for(customer_id).await?;
    Ok(Json(stats))
}

/// Order history for the customer page
pub async fn list_customer_orders(
    State(state): State<AppState>,
    Path(customer_id): Path<Uuid>,
) -> AppResult<Json<Vec<Order>>> {
    let orders = customer_service(&state).orders_for(customer_id).await?;
    Ok(Json(orders))
}
