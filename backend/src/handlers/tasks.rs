//! Task HTTP handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use shared::board::{Board, MoveRequest};
use shared::query::TaskFilter;
use shared::{Task, TaskInput, TaskPatch, TaskStatus};

use super::MoveTarget;
use crate::error::AppResult;
use crate::services::TaskService;
use crate::AppState;

fn task_service(state: &AppState) -> TaskService {
    TaskService::new(state.stores.clone(), state.notifier.clone())
}

pub async fn list_tasks(
    State(state): State<AppState>,
    Query(filter): Query<TaskFilter>,
) -> AppResult<Json<Vec<Task>>> {
    let tasks = task_service(&state).list(&filter).await?;
    Ok(Json(tasks))
}

pub async fn get_task_board(
    State(state): State<AppState>,
    Query(filter): Query<TaskFilter>,
) -> AppResult<Json<Board<Task>>> {
    let board = task_service(&state).board(&filter).await?;
    Ok(Json(board))
}

pub async fn get_task(
    State(state): State<AppState>,
    Path(task_id): Path<Uuid>,
) -> AppResult<Json<Task>> {
    let task = task_service(&state).get(task_id).await?;
    Ok(Json(task))
}

pub async fn create_task(
    State(state): State<AppState>,
    Json(input): Json<TaskInput>,
) -> AppResult<(StatusCode, Json<Task>)> {
    let task = task_service(&state).create(input).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

pub async fn update_task(
    State(state): State<AppState>,
    Path(task_id): Path<Uuid>,
    Json(patch): Json<TaskPatch>,
) -> AppResult<Json<Task>> {
    let task = task_service(&state).update(task_id, patch).await?;
    Ok(Json(task))
}

pub async fn change_task_status(
    State(state): State<AppState>,
    Path(task_id): Path<Uuid>,
    Json(target): Json<MoveTarget<TaskStatus>>,
) -> AppResult<Json<Task>> {
    let task = task_service(&state)
        .move_status(MoveRequest {
            item_id: task_id,
            to: target.to,
        })
        .await?;
    Ok(Json(task))
}

pub async fn delete_task(
    State(state): State<AppState>,
    Path(task_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    task_service(&state).delete(task_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
