use std::sync::Arc;

use parking_lot::Mutex;

use crate::core::config::StoreBackend;
use crate::core::tasks::BackgroundTasks;
use crate::core::{Config, Result};
use crate::notify::BroadcastGateway;
use crate::queue::{Clock, EngineConfig, QueueEngine, SystemClock};
use crate::store::{CatalogStore, MemoryStore, RedbStore, TicketStore};

/// 服务器状态 - 持有所有服务的共享引用
///
/// 使用 Arc 实现浅拷贝，所有权成本极低。
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | engine | Arc<QueueEngine> | 排队引擎 |
/// | notifications | BroadcastGateway | 状态变更广播 |
/// | tasks | Arc<Mutex<BackgroundTasks>> | 后台任务 (健康检查) |
/// | started_at | i64 | 启动时间 (Unix millis) |
#[derive(Clone, Debug)]
pub struct ServerState {
    pub config: Config,
    pub engine: Arc<QueueEngine>,
    pub notifications: BroadcastGateway,
    pub tasks: Arc<Mutex<BackgroundTasks>>,
    pub started_at: i64,
}

impl ServerState {
    /// 按配置打开存储并组装引擎
    pub async fn initialize(config: &Config) -> Result<Self> {
        let (tickets, catalog): (Arc<dyn TicketStore>, Arc<dyn CatalogStore>) =
            match config.store_backend {
                StoreBackend::Redb => {
                    std::fs::create_dir_all(&config.work_dir)?;
                    let path = config.database_path();
                    tracing::info!(path = %path.display(), "Opening redb store");
                    let store = Arc::new(RedbStore::open(&path)?);
                    (store.clone(), store)
                }
                StoreBackend::Memory => {
                    tracing::warn!("Using in-memory store, tickets are lost on restart");
                    let store = Arc::new(MemoryStore::new());
                    (store.clone(), store)
                }
            };

        Ok(Self::from_parts(
            config.clone(),
            tickets,
            catalog,
            Arc::new(SystemClock),
        ))
    }

    /// 由现成的存储和时钟组装 (测试用)
    pub fn from_parts(
        config: Config,
        tickets: Arc<dyn TicketStore>,
        catalog: Arc<dyn CatalogStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let notifications = BroadcastGateway::new(config.notification_channel_capacity);
        let engine = QueueEngine::new(
            tickets,
            catalog,
            Arc::new(notifications.clone()),
            clock.clone(),
            EngineConfig {
                cache_ttl: config.catalog_cache_ttl(),
                timezone: config.business_timezone,
            },
        );
        Self {
            config,
            engine: Arc::new(engine),
            notifications,
            tasks: Arc::new(Mutex::new(BackgroundTasks::new())),
            started_at: clock.now_millis(),
        }
    }

    pub fn engine(&self) -> &QueueEngine {
        &self.engine
    }
}
