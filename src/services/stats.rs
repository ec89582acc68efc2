//! 追踪统计聚合
//!
//! 对一份简历的全部事件行做纯内存聚合，产出仪表盘需要的
//! 各个视图：总量、独立访客、事件流、地域分布、公司线索、
//! 日线时间轴和地图坐标点。聚合本身不碰数据库。

use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, Utc};
use serde::Serialize;

use migration::entities::tracking_log;

use crate::services::geoip::provider::{LOCAL_DEVELOPMENT, UNKNOWN};

/// 一份简历的聚合统计
#[derive(Debug, Clone, Serialize)]
pub struct TrackingStats {
    pub total_views: usize,
    /// 按来源地址去重的访客数（地址缺失整体算一个访客）
    pub unique_viewers: usize,
    /// 事件流，按发生时间倒序
    pub events: Vec<EventView>,
    /// 国家 → 次数，国家缺失归入 "Unknown"
    pub geo_breakdown: BTreeMap<String, usize>,
    /// 去重后的公司线索，保留首次出现顺序
    pub company_hints: Vec<String>,
    /// 按天聚合的时间轴，日期升序
    pub timeline: Vec<TimelinePoint>,
    /// 两个坐标都存在的事件投影
    pub map_points: Vec<MapPoint>,
}

impl TrackingStats {
    /// 无事件时的规范空形状
    pub fn empty() -> Self {
        Self {
            total_views: 0,
            unique_viewers: 0,
            events: Vec::new(),
            geo_breakdown: BTreeMap::new(),
            company_hints: Vec::new(),
            timeline: Vec::new(),
            map_points: Vec::new(),
        }
    }
}

/// 事件流里的单条事件
#[derive(Debug, Clone, Serialize)]
pub struct EventView {
    pub id: String,
    pub event_type: String,
    pub ip_address: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
    pub company_hint: Option<String>,
    pub user_agent: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub viewed_at: DateTime<Utc>,
}

impl From<&tracking_log::Model> for EventView {
    fn from(log: &tracking_log::Model) -> Self {
        Self {
            id: log.id.clone(),
            event_type: log.event_type.clone(),
            ip_address: log.ip_address.clone(),
            country: log.country.clone(),
            city: log.city.clone(),
            company_hint: log.company_hint.clone(),
            user_agent: log.user_agent.clone(),
            latitude: log.latitude,
            longitude: log.longitude,
            viewed_at: log.viewed_at,
        }
    }
}

/// 时间轴上的一天
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TimelinePoint {
    /// "YYYY-MM-DD"
    pub date: String,
    pub views: usize,
}

/// 地图坐标点
#[derive(Debug, Clone, Serialize)]
pub struct MapPoint {
    pub lat: f64,
    pub lng: f64,
    pub city: Option<String>,
    pub company: Option<String>,
    pub time: DateTime<Utc>,
}

/// 聚合一份简历的事件行
///
/// 输入顺序不做假设；输出顺序由各字段的定义保证。
pub fn aggregate(logs: Vec<tracking_log::Model>) -> TrackingStats {
    if logs.is_empty() {
        return TrackingStats::empty();
    }

    let total_views = logs.len();

    let unique_viewers = logs
        .iter()
        .map(|log| log.ip_address.as_deref())
        .collect::<HashSet<_>>()
        .len();

    let mut geo_breakdown: BTreeMap<String, usize> = BTreeMap::new();
    let mut company_hints: Vec<String> = Vec::new();
    let mut seen_hints: HashSet<String> = HashSet::new();
    let mut timeline_days: BTreeMap<String, usize> = BTreeMap::new();

    for log in &logs {
        let country = log.country.as_deref().unwrap_or(UNKNOWN);
        *geo_breakdown.entry(country.to_string()).or_insert(0) += 1;

        if let Some(hint) = log.company_hint.as_deref() {
            if !hint.is_empty()
                && hint != UNKNOWN
                && hint != LOCAL_DEVELOPMENT
                && seen_hints.insert(hint.to_string())
            {
                company_hints.push(hint.to_string());
            }
        }

        let day = log.viewed_at.format("%Y-%m-%d").to_string();
        *timeline_days.entry(day).or_insert(0) += 1;
    }

    let timeline = timeline_days
        .into_iter()
        .map(|(date, views)| TimelinePoint { date, views })
        .collect();

    let map_points = logs
        .iter()
        .filter_map(|log| match (log.latitude, log.longitude) {
            (Some(lat), Some(lng)) => Some(MapPoint {
                lat,
                lng,
                city: log.city.clone(),
                company: log.company_hint.clone(),
                time: log.viewed_at,
            }),
            _ => None,
        })
        .collect();

    let mut events: Vec<EventView> = logs.iter().map(EventView::from).collect();
    events.sort_by(|a, b| b.viewed_at.cmp(&a.viewed_at));

    TrackingStats {
        total_views,
        unique_viewers,
        events,
        geo_breakdown,
        company_hints,
        timeline,
        map_points,
    }
}
