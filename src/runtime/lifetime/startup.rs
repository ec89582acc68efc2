use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::config::StaticConfig;
use crate::services::geoip::GeoResolver;
use crate::storage::SeaOrmStorage;
use crate::tracking::{EventRecorder, EventSink, TrackingManager};

/// 启动完成后注入 HTTP 层的共享组件
pub struct StartupContext {
    pub storage: Arc<SeaOrmStorage>,
    pub geo: GeoResolver,
    pub tracking_manager: TrackingManager,
}

/// 准备服务器启动的上下文
///
/// 依次初始化存储（含迁移）、GeoIP resolver 和追踪事件 worker。
pub async fn prepare_server_startup(config: &StaticConfig) -> Result<StartupContext> {
    let start_time = std::time::Instant::now();
    debug!("Starting pre-startup processing...");

    let storage = Arc::new(
        SeaOrmStorage::new(&config.database)
            .await
            .context("Failed to create storage backend")?,
    );
    info!("Using storage backend: {}", storage.backend_name());

    let geo = GeoResolver::new(&config.tracking);

    // 追踪事件队列：请求线程只入队，worker 负责地理解析和落库
    let (tracking_manager, rx) = TrackingManager::new();
    let recorder: Arc<dyn EventSink> = Arc::new(EventRecorder::new(storage.clone(), geo.clone()));
    tokio::spawn(TrackingManager::run_worker(recorder, rx));
    debug!("Tracking event worker started");

    debug!(
        "Pre-startup processing completed in {} ms",
        start_time.elapsed().as_millis()
    );

    Ok(StartupContext {
        storage,
        geo,
        tracking_manager,
    })
}
