//! 健康检查路由
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /health | GET | 简单健康检查 |
//!
//! ```json
//! { "status": "ok", "version": "0.1.0", "uptime_seconds": 42, "store": "redb",
//!   "background_tasks": 1, "failed_tasks": 0 }
//! ```
//!
//! 有后台任务异常退出时 `status` 为 `degraded`，HTTP 状态仍为 200。

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;

use crate::core::{ServerState, StoreBackend};

pub fn router() -> Router<ServerState> {
    Router::new().route("/health", get(health))
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// 状态 (ok / degraded)
    status: &'static str,
    version: &'static str,
    /// 运行时间 (秒)
    uptime_seconds: i64,
    store: &'static str,
    background_tasks: usize,
    /// 已退出的后台任务
    failed_tasks: usize,
}

/// GET /health
pub async fn health(State(state): State<ServerState>) -> Json<HealthResponse> {
    let uptime_ms = (state.engine.now() - state.started_at).max(0);
    let (background_tasks, failed_tasks) = {
        let tasks = state.tasks.lock();
        (tasks.len(), tasks.check_health())
    };
    Json(HealthResponse {
        status: if failed_tasks == 0 { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        uptime_seconds: uptime_ms / 1_000,
        store: match state.config.store_backend {
            StoreBackend::Redb => "redb",
            StoreBackend::Memory => "memory",
        },
        background_tasks,
        failed_tasks,
    })
}
