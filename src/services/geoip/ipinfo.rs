//! 外部 GeoIP API 实现（ipinfo.io）
//!
//! 使用外部 HTTP API 进行 IP 地理位置查询
//! 内置 LRU 缓存 + Singleflight 语义，避免重复查询

use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use serde::Deserialize;
use tracing::{trace, warn};
use ureq::Agent;

use super::provider::{GeoInfo, GeoLookup, UNKNOWN};
use crate::config::TrackingConfig;

/// 外部 API GeoIP Provider
///
/// 内置 Moka 缓存：
/// - LRU 淘汰策略，容量和 TTL 由配置决定
/// - Singleflight：同一 IP 的并发请求只发一次 HTTP
pub struct IpinfoProvider {
    /// URL 模板，使用 `{ip}` 作为占位符
    url_template: String,
    /// access token（可选）
    token: Option<String>,
    agent: Agent,
    /// IP → GeoInfo 缓存（Option 用于负缓存）
    cache: Cache<String, Option<GeoInfo>>,
}

impl IpinfoProvider {
    pub fn new(config: &TrackingConfig) -> Self {
        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(config.geo_timeout_secs)))
            .build()
            .into();

        let cache = Cache::builder()
            .time_to_live(Duration::from_secs(config.geo_cache_ttl_secs))
            .max_capacity(config.geo_cache_capacity)
            .build();

        Self {
            url_template: config.geo_api_url.clone(),
            token: config.geo_api_token.clone().filter(|t| !t.is_empty()),
            agent,
            cache,
        }
    }

    fn build_url(&self, ip: &str) -> String {
        let url = self.url_template.replace("{ip}", ip);
        match &self.token {
            Some(token) => {
                let sep = if url.contains('?') { '&' } else { '?' };
                format!("{}{}token={}", url, sep, token)
            }
            None => url,
        }
    }

    /// 从外部 API 获取 GeoIP 信息（同步，在 spawn_blocking 中调用）
    fn fetch_sync(agent: &Agent, url: String) -> Option<GeoInfo> {
        let resp = match agent.get(&url).call() {
            Ok(r) => r,
            Err(e) => {
                warn!("GeoIP API request to \"{}\" failed: {}", url, e);
                return None;
            }
        };

        let payload: IpinfoPayload = match resp.into_body().read_json() {
            Ok(p) => p,
            Err(e) => {
                warn!("GeoIP API response from \"{}\" parse failed: {}", url, e);
                return None;
            }
        };

        let info = payload.into_geo_info();
        trace!(
            "GeoIP lookup: country={}, city={}, company_hint={}",
            info.country, info.city, info.company_hint
        );
        Some(info)
    }

    /// 从外部 API 获取 GeoIP 信息（异步包装）
    async fn fetch(&self, ip: &str) -> Option<GeoInfo> {
        let url = self.build_url(ip);
        let agent = self.agent.clone();

        // 使用 spawn_blocking 在线程池中执行同步 HTTP 请求
        tokio::task::spawn_blocking(move || Self::fetch_sync(&agent, url))
            .await
            .unwrap_or_else(|e| {
                warn!("GeoIP spawn_blocking failed: {}", e);
                None
            })
    }
}

#[async_trait]
impl GeoLookup for IpinfoProvider {
    /// 查询 IP 地理位置（带缓存 + Singleflight）
    async fn lookup(&self, ip: &str) -> Option<GeoInfo> {
        let ip_key = ip.to_string();

        // get_with 自带 singleflight 语义：
        // 同一 key 的并发调用只会执行一次闭包，其他等待结果
        self.cache
            .get_with(ip_key, async {
                trace!("GeoIP cache miss for {}, fetching from API", ip);
                self.fetch(ip).await
            })
            .await
    }

    fn name(&self) -> &'static str {
        "ipinfo"
    }
}

/// ipinfo.io 响应载荷
///
/// 所有字段独立可空，缺失是正常情况而不是异常。
#[derive(Debug, Default, Deserialize)]
struct IpinfoPayload {
    country: Option<String>,
    city: Option<String>,
    region: Option<String>,
    /// "lat,lon" 组合字符串，例如 "37.7749,-122.4194"
    loc: Option<String>,
    /// "ASN 名称" 组合字符串，例如 "AS15169 Google LLC"
    org: Option<String>,
}

impl IpinfoPayload {
    fn into_geo_info(self) -> GeoInfo {
        let (latitude, longitude) = match self.loc.as_deref().and_then(parse_loc) {
            Some((lat, lon)) => (Some(lat), Some(lon)),
            None => (None, None),
        };

        GeoInfo {
            country: self.country.unwrap_or_else(|| UNKNOWN.to_string()),
            city: self.city.unwrap_or_else(|| UNKNOWN.to_string()),
            region: self.region.unwrap_or_else(|| UNKNOWN.to_string()),
            latitude,
            longitude,
            company_hint: self
                .org
                .as_deref()
                .map(parse_company_hint)
                .unwrap_or_else(|| UNKNOWN.to_string()),
        }
    }
}

/// 解析 "lat,lon" 组合字符串
///
/// 必须恰好分成两段且都能解析为浮点数，否则整体放弃（坐标成对出现）。
fn parse_loc(loc: &str) -> Option<(f64, f64)> {
    let mut parts = loc.split(',');
    let lat = parts.next()?.trim().parse::<f64>().ok()?;
    let lon = parts.next()?.trim().parse::<f64>().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some((lat, lon))
}

/// 从 "AS15169 Google LLC" 形状的 org 字段提取公司名
///
/// 去掉开头的 ASN 段；没有分隔空格时原样返回。
fn parse_company_hint(org: &str) -> String {
    match org.split_once(' ') {
        Some((_asn, name)) => name.to_string(),
        None => org.to_string(),
    }
}
