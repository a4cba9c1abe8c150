//! Lead pipeline HTTP handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use shared::board::{Board, MoveRequest};
use shared::query::LeadFilter;
use shared::{
    ActivityLogEntry, Comment, CommentInput, Customer, CustomerInput, Lead, LeadInput, LeadPatch,
    LeadStatus,
};

use super::MoveTarget;
use crate::error::AppResult;
use crate::services::LeadService;
use crate::AppState;

fn lead_service(state: &AppState) -> LeadService {
    LeadService::new(state.stores.clone(), state.notifier.clone())
}

pub async fn list_leads(
    State(state): State<AppState>,
    Query(filter): Query<LeadFilter>,
) -> AppResult<Json<Vec<Lead>>> {
    let leads = lead_service(&state).list(&filter).await?;
    Ok(Json(leads))
}

pub async fn get_lead(
    State(state): State<AppState>,
    Path(lead_id): Path<Uuid>,
) -> AppResult<Json<Lead>> {
    let lead = lead_service(&state).get(lead_id).await?;
    Ok(Json(lead))
}

pub async fn create_lead(
    State(state): State<AppState>,
    Json(input): Json<LeadInput>,
) -> AppResult<(StatusCode, Json<Lead>)> {
    let lead = lead_service(&state).create(input).await?;
    Ok((StatusCode::CREATED, Json(lead)))
}

pub async fn update_lead(
    State(state): State<AppState>,
    Path(lead_id): Path<Uuid>,
    Json(patch): Json<LeadPatch>,
) -> AppResult<Json<Lead>> {
    let lead = lead_service(&state).update(lead_id, patch).await?;
    Ok(Json(lead))
}

pub async fn delete_lead(
    State(state): State<AppState>,
    Path(lead_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    lead_service(&state).delete(lead_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_lead_board(
    State(state): State<AppState>,
    Query(filter): Query<LeadFilter>,
) -> AppResult<Json<Board<Lead>>> {
    let board = lead_service(&state).board(&filter).await?;
    Ok(Json(board))
}

/// Move a lead to another pipeline column
pub async fn change_lead_status(
    State(state): State<AppState>,
    Path(lead_id): Path<Uuid>,
    Json(target): Json<MoveTarget<LeadStatus>>,
) -> AppResult<Json<Lead>> {
    let lead = lead_service(&state)
        .move_status(MoveRequest {
            item_id: lead_id,
            to: target.to,
        })
        .await?;
    Ok(Json(lead))
}

/// Customer form values pre-filled from the lead
pub async fn get_conversion_prefill(
    State(state): State<AppState>,
    Path(lead_id): Path<Uuid>,
) -> AppResult<Json<CustomerInput>> {
    let prefill = lead_service(&state).conversion_prefill(lead_id).await?;
    Ok(Json(prefill))
}

pub async fn convert_lead(
    State(state): State<AppState>,
    Path(lead_id): Path<Uuid>,
    Json(input): Json<CustomerInput>,
) -> AppResult<(StatusCode, Json<Customer>)> {
    let customer = lead_service(&state)
        .convert_to_customer(lead_id, input)
        .await?;
    Ok((StatusCode::CREATED, Json(customer)))
}

pub async fn list_lead_comments(
    State(state): State<AppState>,
    Path(lead_id): Path<Uuid>,
) -> AppResult<Json<Vec<Comment>>> {
    let comments = lead_service(&state).comments(lead_id).await?;
    Ok(Json(comments))
}

pub async fn add_lead_comment(
    State(state): State<AppState>,
    Path(lead_id): Path<Uuid>,
    Json(input): Json<CommentInput>,
) -> AppResult<(StatusCode, Json<Comment>)> {
    let comment = lead_service(&state).add_comment(lead_id, input).await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

pub async fn get_lead_activity(
    State(state): State<AppState>,
    Path(lead_id): Path<Uuid>,
) -> AppResult<Json<Vec<ActivityLogEntry>>> {
    let history = lead_service(&state).history(lead_id).await?;
    Ok(Json(history))
}
