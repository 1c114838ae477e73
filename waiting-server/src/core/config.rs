use std::path::PathBuf;
use std::time::Duration;

use chrono_tz::Tz;

use crate::utils::time::parse_timezone;

const DEFAULT_TIMEZONE: Tz = chrono_tz::Asia::Seoul;

/// Ticket/catalog storage backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// `{WORK_DIR}/waiting.redb`
    Redb,
    /// Process memory, lost on restart
    Memory,
}

impl StoreBackend {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "redb" => Some(Self::Redb),
            "memory" => Some(Self::Memory),
            _ => None,
        }
    }
}

/// 服务器配置 - 排队服务的所有配置项
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | ./data | 工作目录 (数据库文件) |
/// | HTTP_PORT | 3000 | HTTP 服务端口 |
/// | ENVIRONMENT | development | 运行环境 |
/// | LOG_LEVEL | info | 日志级别 (RUST_LOG 优先) |
/// | LOG_JSON | false | JSON 日志格式 |
/// | LOG_DIR | - | 日志目录 (按天滚动) |
/// | STORE_BACKEND | redb | redb \| memory |
/// | BUSINESS_TIMEZONE | Asia/Seoul | 营业日时区 |
/// | CATALOG_CACHE_TTL_SECS | 5 | 类型/设置缓存 TTL |
/// | NOTIFICATION_CHANNEL_CAPACITY | 1024 | 通知广播容量 |
/// | REQUEST_TIMEOUT_MS | 30000 | 请求超时(毫秒) |
///
/// # 示例
///
/// ```ignore
/// WORK_DIR=/data/waiting HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录，存储数据库等文件
    pub work_dir: String,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// 运行环境: development | staging | production
    pub environment: String,
    pub log_level: String,
    pub log_json: bool,
    pub log_dir: Option<String>,
    pub store_backend: StoreBackend,
    /// 营业日时区
    pub business_timezone: Tz,
    pub catalog_cache_ttl_secs: u64,
    pub notification_channel_capacity: usize,
    /// 请求超时时间 (毫秒)
    pub request_timeout_ms: u64,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置或无法解析，使用默认值
    pub fn from_env() -> Self {
        let business_timezone = match std::env::var("BUSINESS_TIMEZONE") {
            Ok(name) => parse_timezone(&name).unwrap_or_else(|| {
                tracing::warn!(timezone = %name, "Unknown BUSINESS_TIMEZONE, using Asia/Seoul");
                DEFAULT_TIMEZONE
            }),
            Err(_) => DEFAULT_TIMEZONE,
        };

        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "./data".into()),
            http_port: parse_env("HTTP_PORT").unwrap_or(3000),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_json: parse_env("LOG_JSON").unwrap_or(false),
            log_dir: std::env::var("LOG_DIR").ok().filter(|d| !d.is_empty()),
            store_backend: std::env::var("STORE_BACKEND")
                .ok()
                .and_then(|v| StoreBackend::parse(&v))
                .unwrap_or(StoreBackend::Redb),
            business_timezone,
            catalog_cache_ttl_secs: parse_env("CATALOG_CACHE_TTL_SECS").unwrap_or(5),
            notification_channel_capacity: parse_env("NOTIFICATION_CHANNEL_CAPACITY")
                .unwrap_or(1024),
            request_timeout_ms: parse_env("REQUEST_TIMEOUT_MS").unwrap_or(30000),
        }
    }

    /// 使用自定义值覆盖部分配置
    ///
    /// 常用于测试场景
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.http_port = http_port;
        config
    }

    /// redb 数据库文件路径
    pub fn database_path(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("waiting.redb")
    }

    pub fn catalog_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.catalog_cache_ttl_secs)
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// 是否开发环境
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

fn parse_env<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_backend_parse() {
        assert_eq!(StoreBackend::parse("redb"), Some(StoreBackend::Redb));
        assert_eq!(StoreBackend::parse(" Memory "), Some(StoreBackend::Memory));
        assert_eq!(StoreBackend::parse("postgres"), None);
    }

    #[test]
    fn test_with_overrides() {
        let config = Config::with_overrides("/tmp/waiting-test", 4000);
        assert_eq!(config.http_port, 4000);
        assert_eq!(
            config.database_path(),
            PathBuf::from("/tmp/waiting-test").join("waiting.redb")
        );
    }
}
