//! Command palette search handler

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use shared::palette::SearchHit;

use crate::error::AppResult;
use crate::services::SearchService;
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<Vec<SearchHit>>> {
    let service = SearchService::new(state.stores.clone(), state.business());
    let hits = service.search(&query.q).await?;
    Ok(Json(hits))
}
