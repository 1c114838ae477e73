use thiserror::Error;

use crate::store::StoreError;

/// Startup / serve errors (request errors go through `AppError`)
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("存储初始化失败: {0}")]
    Storage(#[from] StoreError),

    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),

    #[error("内部服务器错误")]
    Internal(#[from] anyhow::Error),
}

/// 服务启动的 Result 类型别名
pub type Result<T> = std::result::Result<T, ServerError>;
