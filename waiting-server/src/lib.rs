//! Waiting Server - 餐厅现场排队 (walk-in waiting queue) 服务
//!
//! # 架构概述
//!
//! - **排队引擎** (`queue`): 登记、叫号、入座、取消、恢复，惰性超时处理
//! - **存储** (`store`): redb 嵌入式存储 / 内存存储
//! - **通知** (`notify`): 状态变更广播
//! - **HTTP API** (`api`): 员工端与顾客端 RESTful 接口
//!
//! # 模块结构
//!
//! ```text
//! waiting-server/src/
//! ├── core/          # 配置、状态、错误、后台任务
//! ├── queue/         # 排队引擎 (状态机、估时、统计)
//! ├── store/         # TicketStore / CatalogStore
//! ├── notify.rs      # 通知网关
//! ├── api/           # HTTP 路由和处理器
//! └── utils/         # 日志、营业日时间
//! ```

pub mod api;
pub mod core;
pub mod notify;
pub mod queue;
pub mod store;
pub mod utils;

// Re-export 公共类型
pub use core::{Config, Server, ServerState};
pub use queue::{QueueEngine, QueueError};
pub use utils::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

pub fn print_banner() {
    println!(
        r#"
 _      __     _ __  _
| | /| / /__ _(_) /_(_)__  ___ _
| |/ |/ / _ `/ / __/ / _ \/ _ `/
|__/|__/\_,_/_/\__/_/_//_/\_, /
                         /___/
    "#
    );
}
