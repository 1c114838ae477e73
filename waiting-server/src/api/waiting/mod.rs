//! 员工端排队 API
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /api/venues/{venue_id}/waiting | GET | 队列快照 (?type_id=) |
//! | /api/venues/{venue_id}/waiting | POST | 登记 |
//! | /api/venues/{venue_id}/waiting/stats | GET | 实时统计 |
//! | /api/venues/{venue_id}/waiting/stats/today | GET | 营业日统计 |
//! | /api/venues/{venue_id}/waiting/{id}/call | POST | 叫号 |
//! | /api/venues/{venue_id}/waiting/{id}/recall | POST | 再次叫号 |
//! | /api/venues/{venue_id}/waiting/{id}/seat | POST | 入座 |
//! | /api/venues/{venue_id}/waiting/{id}/cancel | POST | 取消 |
//! | /api/venues/{venue_id}/waiting/{id}/restore | POST | 恢复 |
//! | /api/venues/{venue_id}/waiting/{id}/memo | PATCH | 备注 |

mod handler;

use axum::{
    Router,
    routing::{get, patch, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/venues/{venue_id}/waiting", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::snapshot).post(handler::register))
        .route("/stats", get(handler::stats))
        .route("/stats/today", get(handler::today_stats))
        .route("/{id}/call", post(handler::call))
        .route("/{id}/recall", post(handler::recall))
        .route("/{id}/seat", post(handler::seat))
        .route("/{id}/cancel", post(handler::cancel))
        .route("/{id}/restore", post(handler::restore))
        .route("/{id}/memo", patch(handler::update_memo))
}
