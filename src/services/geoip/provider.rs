//! GeoIP Provider 抽象层
//!
//! 统一的 GeoIP 查询接口。回环地址在这里短路，既不消耗外部查询
//! 额度，也让本地测试保持确定性；任何查询失败都降级为 "Unknown"
//! 结果而不是错误（fail-open）。

use std::net::IpAddr;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use super::ipinfo::IpinfoProvider;
use crate::config::TrackingConfig;

/// 降级结果使用的占位标签
pub const UNKNOWN: &str = "Unknown";
/// 回环地址的公司提示，统计时作为噪声排除
pub const LOCAL_DEVELOPMENT: &str = "Local Development";

/// 地理位置信息
#[derive(Debug, Clone, PartialEq)]
pub struct GeoInfo {
    pub country: String,
    pub city: String,
    pub region: String,
    /// 坐标要么成对出现，要么都为空
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// 由上游 org 字段推导的公司/ISP 提示
    pub company_hint: String,
}

impl GeoInfo {
    /// 查询失败时的降级结果
    pub fn unknown() -> Self {
        Self {
            country: UNKNOWN.to_string(),
            city: UNKNOWN.to_string(),
            region: UNKNOWN.to_string(),
            latitude: None,
            longitude: None,
            company_hint: UNKNOWN.to_string(),
        }
    }

    /// 回环地址的固定结果
    pub fn local() -> Self {
        Self {
            country: "Local".to_string(),
            city: "Localhost".to_string(),
            region: "Dev".to_string(),
            latitude: None,
            longitude: None,
            company_hint: LOCAL_DEVELOPMENT.to_string(),
        }
    }
}

/// GeoIP 查询 trait
#[async_trait]
pub trait GeoLookup: Send + Sync {
    /// 查询 IP 地址的地理位置，失败返回 None
    async fn lookup(&self, ip: &str) -> Option<GeoInfo>;

    /// 获取 provider 名称（用于日志）
    fn name(&self) -> &'static str;
}

/// 判断地址是否为回环地址（`127.0.0.1`、`::1`、`localhost` 等）
fn is_loopback_addr(addr: &str) -> bool {
    if addr.eq_ignore_ascii_case("localhost") {
        return true;
    }
    addr.parse::<IpAddr>()
        .map(|ip| ip.is_loopback())
        .unwrap_or(false)
}

/// 统一 GeoIP resolver
///
/// 回环短路 + fail-open 降级都在这一层处理，provider 只负责真正的
/// 外部查询。
pub struct GeoResolver {
    inner: Arc<dyn GeoLookup>,
}

impl GeoResolver {
    /// 根据 TrackingConfig 初始化（外部 ipinfo provider）
    pub fn new(config: &TrackingConfig) -> Self {
        let inner: Arc<dyn GeoLookup> = Arc::new(IpinfoProvider::new(config));
        info!("GeoIP: Initialized with {} provider", inner.name());
        Self { inner }
    }

    /// 注入自定义 provider（测试用）
    pub fn with_provider(inner: Arc<dyn GeoLookup>) -> Self {
        Self { inner }
    }

    /// 解析网络地址到地理/公司信息，永不失败
    pub async fn resolve(&self, addr: &str) -> GeoInfo {
        if is_loopback_addr(addr) {
            debug!("GeoIP: loopback address {}, skipping external lookup", addr);
            return GeoInfo::local();
        }

        match self.inner.lookup(addr).await {
            Some(info) => info,
            None => {
                debug!("GeoIP: lookup failed for {}, falling back to Unknown", addr);
                GeoInfo::unknown()
            }
        }
    }

    /// 获取当前使用的 provider 名称
    pub fn provider_name(&self) -> &'static str {
        self.inner.name()
    }
}

impl Clone for GeoResolver {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// 记录调用次数的 provider，用于验证回环短路
    struct CountingLookup {
        calls: AtomicUsize,
        result: Option<GeoInfo>,
    }

    impl CountingLookup {
        fn new(result: Option<GeoInfo>) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                result,
            })
        }
    }

    #[async_trait]
    impl GeoLookup for CountingLookup {
        async fn lookup(&self, _ip: &str) -> Option<GeoInfo> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.result.clone()
        }

        fn name(&self) -> &'static str {
            "Counting"
        }
    }

    #[tokio::test]
    async fn loopback_short_circuits_without_lookup() {
        let provider = CountingLookup::new(None);
        let resolver = GeoResolver::with_provider(provider.clone());

        for addr in ["127.0.0.1", "::1", "localhost", "127.0.0.53"] {
            let info = resolver.resolve(addr).await;
            assert_eq!(info.country, "Local");
            assert_eq!(info.company_hint, LOCAL_DEVELOPMENT);
            assert_eq!(info.latitude, None);
            assert_eq!(info.longitude, None);
        }

        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn failed_lookup_falls_back_to_unknown() {
        let provider = CountingLookup::new(None);
        let resolver = GeoResolver::with_provider(provider.clone());

        let info = resolver.resolve("203.0.113.99").await;
        assert_eq!(info, GeoInfo::unknown());
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn successful_lookup_passes_through() {
        let hit = GeoInfo {
            country: "US".to_string(),
            city: "San Francisco".to_string(),
            region: "California".to_string(),
            latitude: Some(37.7749),
            longitude: Some(-122.4194),
            company_hint: "Google LLC".to_string(),
        };
        let provider = CountingLookup::new(Some(hit.clone()));
        let resolver = GeoResolver::with_provider(provider);

        assert_eq!(resolver.resolve("8.8.8.8").await, hit);
    }
}
