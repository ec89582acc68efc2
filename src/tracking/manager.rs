//! 追踪事件管理器
//!
//! 负责 beacon 请求路径与落库路径的解耦：
//! - `dispatch` 只做一次入队，立即返回，永不阻塞响应
//! - 后台 worker 独占消费队列，地理解析和写库的延迟/失败都被
//!   隔离在 worker 内部，不会传播回请求路径

use std::sync::Arc;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, trace, warn};

use super::ViewHit;
use super::sink::EventSink;

/// 追踪管理器（队列的发送端）
///
/// 进程启动时构造一次并注入各处使用；接收端交给 `run_worker`。
/// 所有发送端释放后队列关闭，worker 清空残留事件并退出。
#[derive(Clone)]
pub struct TrackingManager {
    tx: UnboundedSender<ViewHit>,
}

impl TrackingManager {
    /// 创建管理器，返回队列接收端供 `run_worker` 消费
    pub fn new() -> (Self, UnboundedReceiver<ViewHit>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// 入队一次命中（fire-and-forget，不等待落库）
    pub fn dispatch(&self, hit: ViewHit) {
        trace!("TrackingManager: dispatching hit for resume {}", hit.resume_id);
        if self.tx.send(hit).is_err() {
            // worker 已退出（进程关闭中），事件按设计丢弃
            warn!("TrackingManager: worker is gone, dropping hit");
        }
    }

    /// 后台 worker 主循环
    ///
    /// 单条消费，逐条调用 sink；失败只记日志，没有重试——丢一条
    /// 事件是可接受的损失，不是正确性问题。
    pub async fn run_worker(sink: Arc<dyn EventSink>, mut rx: UnboundedReceiver<ViewHit>) {
        debug!("TrackingManager: worker started");
        while let Some(hit) = rx.recv().await {
            let resume_id = hit.resume_id.clone();
            if let Err(e) = sink.record_hit(hit).await {
                warn!(
                    "TrackingManager: failed to record hit for resume {}: {:#}",
                    resume_id, e
                );
            }
        }
        debug!("TrackingManager: worker stopped (queue closed)");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::time::{Duration, Instant};

    /// 人为注入延迟的 mock sink
    struct SlowSink {
        delay: Duration,
        recorded: Mutex<Vec<ViewHit>>,
    }

    impl SlowSink {
        fn new(delay: Duration) -> Arc<Self> {
            Arc::new(Self {
                delay,
                recorded: Mutex::new(Vec::new()),
            })
        }

        fn recorded_count(&self) -> usize {
            self.recorded.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl EventSink for SlowSink {
        async fn record_hit(&self, hit: ViewHit) -> anyhow::Result<()> {
            tokio::time::sleep(self.delay).await;
            self.recorded.lock().unwrap().push(hit);
            Ok(())
        }
    }

    /// 总是失败的 sink，验证失败隔离
    struct FailingSink;

    #[async_trait]
    impl EventSink for FailingSink {
        async fn record_hit(&self, _hit: ViewHit) -> anyhow::Result<()> {
            anyhow::bail!("storage unavailable")
        }
    }

    #[tokio::test]
    async fn dispatch_returns_before_sink_completes() {
        let sink = SlowSink::new(Duration::from_millis(200));
        let (manager, rx) = TrackingManager::new();
        let worker = tokio::spawn(TrackingManager::run_worker(
            sink.clone() as Arc<dyn EventSink>,
            rx,
        ));

        let start = Instant::now();
        manager.dispatch(ViewHit::new("resume-1".to_string()));
        let elapsed = start.elapsed();

        // 入队是同步且即时的，与 sink 延迟无关
        assert!(elapsed < Duration::from_millis(50), "dispatch took {:?}", elapsed);
        assert_eq!(sink.recorded_count(), 0);

        // 关闭队列并等 worker 清空
        drop(manager);
        worker.await.unwrap();
        assert_eq!(sink.recorded_count(), 1);
    }

    #[tokio::test]
    async fn hits_are_processed_in_dispatch_order() {
        let sink = SlowSink::new(Duration::ZERO);
        let (manager, rx) = TrackingManager::new();
        let worker = tokio::spawn(TrackingManager::run_worker(
            sink.clone() as Arc<dyn EventSink>,
            rx,
        ));

        for i in 0..5 {
            manager.dispatch(ViewHit::new(format!("resume-{}", i)));
        }

        drop(manager);
        worker.await.unwrap();

        let recorded = sink.recorded.lock().unwrap();
        let ids: Vec<&str> = recorded.iter().map(|h| h.resume_id.as_str()).collect();
        assert_eq!(ids, ["resume-0", "resume-1", "resume-2", "resume-3", "resume-4"]);
    }

    #[tokio::test]
    async fn sink_failure_does_not_stop_the_worker() {
        let (manager, rx) = TrackingManager::new();
        let worker = tokio::spawn(TrackingManager::run_worker(Arc::new(FailingSink), rx));

        manager.dispatch(ViewHit::new("resume-a".to_string()));
        manager.dispatch(ViewHit::new("resume-b".to_string()));

        // worker 在两次失败后仍然存活并正常退出
        drop(manager);
        worker.await.unwrap();
    }

    #[tokio::test]
    async fn dispatch_after_worker_exit_is_a_noop() {
        let (manager, rx) = TrackingManager::new();
        drop(rx);

        // 不应 panic
        manager.dispatch(ViewHit::new("resume-x".to_string()));
    }
}
