pub mod manager;
pub mod recorder;
pub mod sink;

pub use manager::TrackingManager;
pub use recorder::EventRecorder;
pub use sink::EventSink;

use chrono::{DateTime, Utc};

use crate::services::geoip::GeoInfo;

/// 1x1 透明 GIF —— 经典追踪像素（43 字节）
pub const TRACKING_PIXEL_GIF: &[u8] = &[
    0x47, 0x49, 0x46, 0x38, 0x39, 0x61, 0x01, 0x00, 0x01, 0x00, 0x80, 0x00, 0x00, 0xff, 0xff,
    0xff, 0x00, 0x00, 0x00, 0x21, 0xf9, 0x04, 0x00, 0x00, 0x00, 0x00, 0x00, 0x2c, 0x00, 0x00,
    0x00, 0x00, 0x01, 0x00, 0x01, 0x00, 0x00, 0x02, 0x02, 0x44, 0x01, 0x00, 0x3b,
];

/// 生成嵌入简历的追踪像素 URL
///
/// 纯拼接，不校验 base_url 格式（调用方负责）。
pub fn build_tracking_url(base_url: &str, tracking_token: &str) -> String {
    format!("{}/api/track/{}/pixel.gif", base_url, tracking_token)
}

/// 事件类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EventType {
    #[default]
    View,
    Open,
    Download,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::View => "view",
            EventType::Open => "open",
            EventType::Download => "download",
        }
    }
}

/// 一次 beacon 命中的原始数据（请求线程同步提取，入队后台处理）
#[derive(Debug, Clone)]
pub struct ViewHit {
    pub resume_id: String,
    pub event_type: EventType,
    /// 代理头解析后的有效来源地址
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub referer: Option<String>,
}

impl ViewHit {
    pub fn new(resume_id: String) -> Self {
        Self {
            resume_id,
            event_type: EventType::View,
            ip_address: None,
            user_agent: None,
            referer: None,
        }
    }
}

/// 地理解析完成后的完整事件详情，写库前的最终形态
#[derive(Debug, Clone)]
pub struct ViewDetail {
    pub resume_id: String,
    pub event_type: EventType,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub referer: Option<String>,
    pub geo: GeoInfo,
    pub viewed_at: DateTime<Utc>,
}

impl ViewDetail {
    pub fn from_hit(hit: ViewHit, geo: GeoInfo) -> Self {
        Self {
            resume_id: hit.resume_id,
            event_type: hit.event_type,
            ip_address: hit.ip_address,
            user_agent: hit.user_agent,
            referer: hit.referer,
            geo,
            viewed_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixel_is_exactly_43_bytes_of_gif() {
        assert_eq!(TRACKING_PIXEL_GIF.len(), 43);
        // GIF89a 魔数
        assert_eq!(&TRACKING_PIXEL_GIF[..6], b"GIF89a");
        // GIF trailer
        assert_eq!(TRACKING_PIXEL_GIF[42], 0x3b);
    }

    #[test]
    fn tracking_url_shape_is_stable() {
        assert_eq!(
            build_tracking_url("https://spyglass.example.com", "abc-123"),
            "https://spyglass.example.com/api/track/abc-123/pixel.gif"
        );
    }

    #[test]
    fn event_type_defaults_to_view() {
        assert_eq!(EventType::default().as_str(), "view");
    }
}
