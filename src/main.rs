use anyhow::Result;

use spyglass::config::StaticConfig;
use spyglass::runtime::run_server;
use spyglass::system::logging::init_logging;

#[actix_web::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // 配置必须先于日志系统加载（日志级别和输出目标来自配置）
    let config = StaticConfig::load();

    // guard 持有到进程结束，保证非阻塞日志全部刷出
    let _guard = init_logging(&config.logging);

    run_server(config).await
}
