//! 排队设置 API
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /api/venues/{venue_id}/waiting-settings | GET | 获取设置 (未保存时返回默认值) |
//! | /api/venues/{venue_id}/waiting-settings | PUT | 更新设置 |
//! | /api/venues/{venue_id}/waiting-settings/operation-status | PUT | 切换营业状态 |

mod handler;

use axum::{
    Router,
    routing::{get, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest(
        "/api/venues/{venue_id}/waiting-settings",
        Router::new()
            .route("/", get(handler::get).put(handler::update))
            .route("/operation-status", put(handler::set_operation_status)),
    )
}
