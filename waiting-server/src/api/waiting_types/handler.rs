//! Waiting Type API Handlers

use axum::extract::{Path, Query, State};
use serde::{Deserialize, Serialize};
use shared::models::{
    TypeDeletion, WaitingType, WaitingTypeCreate, WaitingTypeReorder, WaitingTypeUpdate,
};

use crate::api::ApiJson;
use crate::core::ServerState;
use crate::utils::{ApiResponse, AppResult};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub include_inactive: bool,
}

#[derive(Debug, Serialize)]
pub struct DeleteResult {
    pub id: String,
    pub result: TypeDeletion,
}

/// GET /api/venues/:venue_id/waiting-types
pub async fn list(
    State(state): State<ServerState>,
    Path(venue_id): Path<String>,
    Query(query): Query<ListQuery>,
) -> AppResult<ApiResponse<Vec<WaitingType>>> {
    let types = state
        .engine
        .catalog()
        .list(&venue_id, query.include_inactive)
        .await?;
    Ok(ApiResponse::success(types))
}

/// POST /api/venues/:venue_id/waiting-types
pub async fn create(
    State(state): State<ServerState>,
    Path(venue_id): Path<String>,
    ApiJson(payload): ApiJson<WaitingTypeCreate>,
) -> AppResult<ApiResponse<WaitingType>> {
    let created = state.engine.catalog().create(&venue_id, payload).await?;
    Ok(ApiResponse::success(created))
}

/// PUT /api/venues/:venue_id/waiting-types/:id
pub async fn update(
    State(state): State<ServerState>,
    Path((venue_id, id)): Path<(String, String)>,
    ApiJson(payload): ApiJson<WaitingTypeUpdate>,
) -> AppResult<ApiResponse<WaitingType>> {
    let updated = state
        .engine
        .catalog()
        .update(&venue_id, &id, payload)
        .await?;
    Ok(ApiResponse::success(updated))
}

/// DELETE /api/venues/:venue_id/waiting-types/:id
///
/// Types with ticket history are deactivated instead of removed.
pub async fn delete(
    State(state): State<ServerState>,
    Path((venue_id, id)): Path<(String, String)>,
) -> AppResult<ApiResponse<DeleteResult>> {
    let result = state.engine.catalog().delete(&venue_id, &id).await?;
    Ok(ApiResponse::success(DeleteResult { id, result }))
}

/// PUT /api/venues/:venue_id/waiting-types/reorder
pub async fn reorder(
    State(state): State<ServerState>,
    Path(venue_id): Path<String>,
    ApiJson(payload): ApiJson<WaitingTypeReorder>,
) -> AppResult<ApiResponse<Vec<WaitingType>>> {
    let types = state
        .engine
        .catalog()
        .reorder(&venue_id, &payload.ids)
        .await?;
    Ok(ApiResponse::success(types))
}
