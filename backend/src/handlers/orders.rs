//! HTTP handlers for orders, the order board and the production floor

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Response,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use shared::board::{Board, LocalBoardOrder, MoveRequest};
use shared::query::{
    DateFilter, OrderFilter, OrderSortField, ProductionFilter, SortDirection, SortState,
};
use shared::{
    ActivityLogEntry, Comment, CommentInput, LocalProductionStatus, Order, OrderDraft,
    OrderStatus, ProductionType, StatusToken,
};

use super::{csv_response, MoveTarget};
use crate::error::{AppError, AppResult};
use crate::services::order::{OrderDetail, PaymentInput, ProductionStatusInput, StatusInput};
use crate::services::{ExportService, OrderService};
use crate::AppState;

/// Order list query string, flattened for the URL
#[derive(Debug, Default, Deserialize)]
pub struct OrderQuery {
    #[serde(default)]
    pub search: String,
    pub status: Option<OrderStatus>,
    pub production_type: Option<ProductionType>,
    /// today, week, month, quarter, year or custom
    pub date: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub sort: Option<OrderSortField>,
    pub direction: Option<SortDirection>,
}

impl OrderQuery {
    pub fn filter(&self) -> AppResult<OrderFilter> {
        let date = match self.date.as_deref() {
            None | Some("") | Some("all") => DateFilter::All,
            Some("today") => DateFilter::Today,
            Some("week") => DateFilter::Week,
            Some("month") => DateFilter::Month,
            Some("quarter") => DateFilter::Quarter,
            Some("year") => DateFilter::Year,
            Some("custom") => DateFilter::Custom {
                from: self.from,
                to: self.to,
            },
            Some(other) => {
                return Err(AppError::ValidationError(format!(
                    "unknown date filter {}",
                    other
                )))
            }
        };
        Ok(OrderFilter {
            search: self.search.clone(),
            status: self.status,
            production_type: self.production_type,
            date,
        })
    }

    pub fn sort(&self) -> SortState {
        SortState {
            field: self.sort.unwrap_or_default(),
            direction: self.direction.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct BoardQuery {
    /// Comma separated status tokens; all statuses when absent
    pub columns: Option<String>,
}

fn order_service(state: &AppState) -> OrderService {
    OrderService::new(state.stores.clone(), state.notifier.clone(), state.business())
}

/// List orders with filters and sorting
pub async fn list_orders(
    State(state): State<AppState>,
    Query(query): Query<OrderQuery>,
) -> AppResult<Json<Vec<Order>>> {
    let orders = order_service(&state)
        .list(&query.filter()?, query.sort())
        .await?;
    Ok(Json(orders))
}

/// Order detail with editability and allowed next statuses
pub async fn get_order(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
) -> AppResult<Json<OrderDetail>> {
    let detail = order_service(&state).detail(order_id).await?;
    Ok(Json(detail))
}

pub async fn create_order(
    State(state): State<AppState>,
    Json(draft): Json<OrderDraft>,
) -> AppResult<(StatusCode, Json<Order>)> {
    let order = order_service(&state).create(draft).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

pub async fn update_order(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
    Json(draft): Json<OrderDraft>,
) -> AppResult<Json<Order>> {
    let order = order_service(&state).update(order_id, draft).await?;
    Ok(Json(order))
}

pub async fn delete_order(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    order_service(&state).delete(order_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn change_order_status(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
    Json(input): Json<StatusInput>,
) -> AppResult<Json<Order>> {
    let order = order_service(&state)
        .change_status(order_id, input.status)
        .await?;
    Ok(Json(order))
}

pub async fn change_production_status(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
    Json(input): Json<ProductionStatusInput>,
) -> AppResult<Json<Order>> {
    let order = order_service(&state)
        .change_production_stage(order_id, &input.status)
        .await?;
    Ok(Json(order))
}

pub async fn record_payment(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
    Json(input): Json<PaymentInput>,
) -> AppResult<Json<Order>> {
    let order = order_service(&state).record_payment(order_id, input).await?;
    Ok(Json(order))
}

/// Orders grouped into status columns
pub async fn get_order_board(
    State(state): State<AppState>,
    Query(query): Query<BoardQuery>,
) -> AppResult<Json<Board<Order>>> {
    let columns = match query.columns.as_deref() {
        Some(tokens) if !tokens.trim().is_empty() => Some(
            tokens
                .split(',')
                .map(|t| {
                    OrderStatus::parse(t.trim()).ok_or_else(|| {
                        AppError::ValidationError(format!("unknown order status {}", t.trim()))
                    })
                })
                .collect::<AppResult<Vec<_>>>()?,
        ),
        _ => None,
    };
    let board = order_service(&state).board(columns).await?;
    Ok(Json(board))
}

/// Drop an order card on another status column
pub async fn move_order(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
    Json(target): Json<MoveTarget<OrderStatus>>,
) -> AppResult<Json<Order>> {
    let order = order_service(&state)
        .move_on_board(MoveRequest {
            item_id: order_id,
            to: target.to,
        })
        .await?;
    Ok(Json(order))
}

pub async fn get_production_board(
    State(state): State<AppState>,
    Query(filter): Query<ProductionFilter>,
) -> AppResult<Json<Board<LocalBoardOrder>>> {
    let board = order_service(&state).production_board(&filter).await?;
    Ok(Json(board))
}

pub async fn move_production_order(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
    Json(target): Json<MoveTarget<LocalProductionStatus>>,
) -> AppResult<Json<Order>> {
    let order = order_service(&state)
        .move_on_production_board(MoveRequest {
            item_id: order_id,
            to: target.to,
        })
        .await?;
    Ok(Json(order))
}

/// Open import orders with their pipeline stage
pub async fn get_import_pipeline(State(state): State<AppState>) -> AppResult<Json<Vec<Order>>> {
    let orders = order_service(&state).import_pipeline().await?;
    Ok(Json(orders))
}

pub async fn list_order_comments(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
) -> AppResult<Json<Vec<Comment>>> {
    let comments = order_service(&state).comments(order_id).await?;
    Ok(Json(comments))
}

pub async fn add_order_comment(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
    Json(input): Json<CommentInput>,
) -> AppResult<(StatusCode, Json<Comment>)> {
    let comment = order_service(&state).add_comment(order_id, input).await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

pub async fn get_order_activity(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
) -> AppResult<Json<Vec<ActivityLogEntry>>> {
    let history = order_service(&state).history(order_id).await?;
    Ok(Json(history))
}

/// The filtered order list as a CSV download
pub async fn export_orders(
    State(state): State<AppState>,
    Query(query): Query<OrderQuery>,
) -> AppResult<Response> {
    let service = ExportService::new(state.stores.clone(), state.notifier.clone());
    let export = service.orders_csv(&query.filter()?, query.sort()).await?;
    Ok(csv_response(export))
}
