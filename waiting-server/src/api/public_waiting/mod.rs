//! 顾客端排队 API (QR 扫码页面，无需认证)
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /api/public/venues/{venue_id}/waiting/info | GET | 营业状态、类型、等待人数 |
//! | /api/public/venues/{venue_id}/waiting/register | POST | 登记 (需手机号) |
//! | /api/public/venues/{venue_id}/waiting/status | GET | 按手机号查询 (?phone=) |
//! | /api/public/venues/{venue_id}/waiting/cancel | POST | 顾客取消 |

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest(
        "/api/public/venues/{venue_id}/waiting",
        Router::new()
            .route("/info", get(handler::info))
            .route("/register", post(handler::register))
            .route("/status", get(handler::status))
            .route("/cancel", post(handler::cancel)),
    )
}
