//! Waiting API Handlers

use axum::extract::{Path, Query, State};
use serde::Deserialize;
use shared::waiting::{
    CancelTicketRequest, MemoUpdate, QueueSnapshot, RegisterTicket, TicketView, TodayStats,
    WaitingStats, WaitingTicket,
};

use crate::api::ApiJson;
use crate::core::ServerState;
use crate::queue::TicketCommand;
use crate::utils::{ApiResponse, AppResult};

#[derive(Debug, Deserialize)]
pub struct SnapshotQuery {
    pub type_id: Option<String>,
}

/// GET /api/venues/:venue_id/waiting - 队列快照
pub async fn snapshot(
    State(state): State<ServerState>,
    Path(venue_id): Path<String>,
    Query(query): Query<SnapshotQuery>,
) -> AppResult<ApiResponse<QueueSnapshot>> {
    let snapshot = state
        .engine
        .snapshot(&venue_id, query.type_id.as_deref())
        .await?;
    Ok(ApiResponse::success(snapshot))
}

/// POST /api/venues/:venue_id/waiting - 员工登记 (source 默认 MANUAL)
pub async fn register(
    State(state): State<ServerState>,
    Path(venue_id): Path<String>,
    ApiJson(payload): ApiJson<RegisterTicket>,
) -> AppResult<ApiResponse<TicketView>> {
    let view = state.engine.register(&venue_id, payload).await?;
    Ok(ApiResponse::success(view))
}

/// GET /api/venues/:venue_id/waiting/stats
pub async fn stats(
    State(state): State<ServerState>,
    Path(venue_id): Path<String>,
) -> AppResult<ApiResponse<WaitingStats>> {
    Ok(ApiResponse::success(state.engine.waiting_stats(&venue_id).await?))
}

/// GET /api/venues/:venue_id/waiting/stats/today
pub async fn today_stats(
    State(state): State<ServerState>,
    Path(venue_id): Path<String>,
) -> AppResult<ApiResponse<TodayStats>> {
    Ok(ApiResponse::success(state.engine.today_stats(&venue_id).await?))
}

pub async fn call(
    State(state): State<ServerState>,
    Path((venue_id, id)): Path<(String, String)>,
) -> AppResult<ApiResponse<WaitingTicket>> {
    transition(&state, &venue_id, &id, TicketCommand::Call).await
}

pub async fn recall(
    State(state): State<ServerState>,
    Path((venue_id, id)): Path<(String, String)>,
) -> AppResult<ApiResponse<WaitingTicket>> {
    transition(&state, &venue_id, &id, TicketCommand::Recall).await
}

pub async fn seat(
    State(state): State<ServerState>,
    Path((venue_id, id)): Path<(String, String)>,
) -> AppResult<ApiResponse<WaitingTicket>> {
    transition(&state, &venue_id, &id, TicketCommand::Seat).await
}

pub async fn cancel(
    State(state): State<ServerState>,
    Path((venue_id, id)): Path<(String, String)>,
    ApiJson(payload): ApiJson<CancelTicketRequest>,
) -> AppResult<ApiResponse<WaitingTicket>> {
    transition(&state, &venue_id, &id, TicketCommand::Cancel(payload.reason)).await
}

pub async fn restore(
    State(state): State<ServerState>,
    Path((venue_id, id)): Path<(String, String)>,
) -> AppResult<ApiResponse<WaitingTicket>> {
    transition(&state, &venue_id, &id, TicketCommand::Restore).await
}

/// PATCH /api/venues/:venue_id/waiting/:id/memo
pub async fn update_memo(
    State(state): State<ServerState>,
    Path((venue_id, id)): Path<(String, String)>,
    ApiJson(payload): ApiJson<MemoUpdate>,
) -> AppResult<ApiResponse<WaitingTicket>> {
    let ticket = state
        .engine
        .update_memo(&venue_id, &id, payload.memo)
        .await?;
    Ok(ApiResponse::success(ticket))
}

async fn transition(
    state: &ServerState,
    venue_id: &str,
    id: &str,
    command: TicketCommand,
) -> AppResult<ApiResponse<WaitingTicket>> {
    let ticket = state
        .engine
        .execute_in_venue(venue_id, id, command)
        .await?;
    Ok(ApiResponse::success(ticket))
}
