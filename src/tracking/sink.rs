//! 事件落库接口
//!
//! TrackingManager 的后台 worker 通过这个 trait 消费命中事件；
//! 生产实现是 `EventRecorder`（地理解析 + 单条插入），测试用 mock。

use async_trait::async_trait;

use super::ViewHit;

/// 追踪事件 Sink
#[async_trait]
pub trait EventSink: Send + Sync {
    /// 记录一次命中：完成地理解析并持久化一行事件
    async fn record_hit(&self, hit: ViewHit) -> anyhow::Result<()>;
}
