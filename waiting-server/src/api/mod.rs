//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`waiting`] - 员工端排队操作
//! - [`waiting_settings`] - 排队设置 / 营业状态
//! - [`waiting_types`] - 排队类型管理
//! - [`public_waiting`] - 顾客端 (QR) 接口
//!
//! 所有接口返回 [`ApiResponse`] 信封，错误由 `AppError` 统一转换。
//! 请求体统一用 [`ApiJson`] 提取，JSON 解析失败同样走信封。

pub mod extract;
pub mod health;
pub mod public_waiting;
pub mod waiting;
pub mod waiting_settings;
pub mod waiting_types;

use axum::Router;

use crate::core::ServerState;

// Re-export common types for handlers
pub use crate::utils::{ApiResponse, AppResult};
pub use extract::ApiJson;

/// 所有 API 路由
pub fn router() -> Router<ServerState> {
    Router::new()
        .merge(health::router())
        .merge(waiting::router())
        .merge(waiting_settings::router())
        .merge(waiting_types::router())
        .merge(public_waiting::router())
}
