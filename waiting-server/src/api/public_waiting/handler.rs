//! Public Waiting API Handlers

use axum::extract::{Path, Query, State};
use serde::Deserialize;
use shared::waiting::{
    PublicCancelRequest, PublicRegisterRequest, PublicTicketStatus, PublicWaitingInfo,
    TicketView, WaitingTicket,
};

use crate::api::ApiJson;
use crate::core::ServerState;
use crate::utils::{ApiResponse, AppResult};

#[derive(Debug, Deserialize)]
pub struct StatusQuery {
    pub phone: String,
}

/// GET /api/public/venues/:venue_id/waiting/info
pub async fn info(
    State(state): State<ServerState>,
    Path(venue_id): Path<String>,
) -> AppResult<ApiResponse<PublicWaitingInfo>> {
    Ok(ApiResponse::success(state.engine.public_info(&venue_id).await?))
}

/// POST /api/public/venues/:venue_id/waiting/register
pub async fn register(
    State(state): State<ServerState>,
    Path(venue_id): Path<String>,
    ApiJson(payload): ApiJson<PublicRegisterRequest>,
) -> AppResult<ApiResponse<TicketView>> {
    let view = state.engine.register_public(&venue_id, payload).await?;
    Ok(ApiResponse::success(view))
}

/// GET /api/public/venues/:venue_id/waiting/status?phone=
pub async fn status(
    State(state): State<ServerState>,
    Path(venue_id): Path<String>,
    Query(query): Query<StatusQuery>,
) -> AppResult<ApiResponse<PublicTicketStatus>> {
    let status = state.engine.public_status(&venue_id, &query.phone).await?;
    Ok(ApiResponse::success(status))
}

/// POST /api/public/venues/:venue_id/waiting/cancel
pub async fn cancel(
    State(state): State<ServerState>,
    Path(venue_id): Path<String>,
    ApiJson(payload): ApiJson<PublicCancelRequest>,
) -> AppResult<ApiResponse<WaitingTicket>> {
    let ticket = state.engine.cancel_by_customer(&venue_id, payload).await?;
    Ok(ApiResponse::success(ticket))
}
