use anyhow::Context;
use waiting_server::{Config, Server, init_logger_with_file, print_banner};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. 环境变量 (.env 可选)
    dotenv::dotenv().ok();

    // 2. 加载配置
    let config = Config::from_env();

    // 3. 日志
    init_logger_with_file(
        Some(&config.log_level),
        Some(config.log_json),
        config.log_dir.as_deref(),
    );

    print_banner();
    tracing::info!(
        environment = %config.environment,
        port = config.http_port,
        timezone = %config.business_timezone,
        "Waiting server starting..."
    );

    // 4. 启动 HTTP 服务器 (Server::run 会初始化状态并启动后台任务)
    Server::new(config)
        .run()
        .await
        .context("server exited with an error")?;

    Ok(())
}
