//! 事件记录器
//!
//! 追踪事件的写入路径：先完成地理解析（写入在解析尝试之后才算完成），
//! 再对事件表做一次独立插入。整个过程运行在请求关键路径之外。

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use super::sink::EventSink;
use super::{ViewDetail, ViewHit};
use crate::services::geoip::GeoResolver;
use crate::storage::SeaOrmStorage;

/// 生产事件 Sink：GeoResolver + SeaORM 存储
pub struct EventRecorder {
    storage: Arc<SeaOrmStorage>,
    geo: GeoResolver,
}

impl EventRecorder {
    pub fn new(storage: Arc<SeaOrmStorage>, geo: GeoResolver) -> Self {
        Self { storage, geo }
    }

    /// 记录一次命中并返回持久化后的行
    pub async fn record(
        &self,
        hit: ViewHit,
    ) -> crate::errors::Result<migration::entities::tracking_log::Model> {
        // 地理解析是同步等待的：resolver 自身 fail-open，最多 5 秒
        let geo = match hit.ip_address.as_deref() {
            Some(addr) => self.geo.resolve(addr).await,
            None => crate::services::geoip::GeoInfo::unknown(),
        };

        let detail = ViewDetail::from_hit(hit, geo);
        let model = self.storage.insert_tracking_event(&detail).await?;

        info!(
            "Recorded {} from {} ({}, {}) for resume {}",
            model.event_type,
            model.ip_address.as_deref().unwrap_or("unknown"),
            detail.geo.city,
            detail.geo.country,
            model.resume_id,
        );

        Ok(model)
    }
}

#[async_trait]
impl EventSink for EventRecorder {
    async fn record_hit(&self, hit: ViewHit) -> anyhow::Result<()> {
        self.record(hit).await?;
        Ok(())
    }
}
