//! Waiting Settings API Handlers

use axum::extract::{Path, State};
use shared::models::{OperationStatusUpdate, WaitingSetting, WaitingSettingUpdate};

use crate::api::ApiJson;
use crate::core::ServerState;
use crate::utils::{ApiResponse, AppResult};

/// GET /api/venues/:venue_id/waiting-settings
pub async fn get(
    State(state): State<ServerState>,
    Path(venue_id): Path<String>,
) -> AppResult<ApiResponse<WaitingSetting>> {
    let settings = state.engine.gate().settings(&venue_id).await?;
    Ok(ApiResponse::success(settings))
}

/// PUT /api/venues/:venue_id/waiting-settings
pub async fn update(
    State(state): State<ServerState>,
    Path(venue_id): Path<String>,
    ApiJson(payload): ApiJson<WaitingSettingUpdate>,
) -> AppResult<ApiResponse<WaitingSetting>> {
    let settings = state
        .engine
        .gate()
        .update_settings(&venue_id, payload)
        .await?;
    Ok(ApiResponse::success(settings))
}

/// PUT /api/venues/:venue_id/waiting-settings/operation-status
pub async fn set_operation_status(
    State(state): State<ServerState>,
    Path(venue_id): Path<String>,
    ApiJson(payload): ApiJson<OperationStatusUpdate>,
) -> AppResult<ApiResponse<WaitingSetting>> {
    let settings = state
        .engine
        .set_operation_status(&venue_id, payload)
        .await?;
    Ok(ApiResponse::success(settings))
}
