//! 追踪统计端点
//!
//! GET /api/spyglass/{resume_id}
//!
//! 读取一份简历的全部事件行并在内存中聚合。返回体把简历标识字段
//! 和统计字段平铺在同一层，前端直接消费。

use std::sync::Arc;

use actix_web::{HttpResponse, Responder, web};
use serde::Serialize;
use serde_json::json;
use tracing::{debug, error};

use crate::config::TrackingConfig;
use crate::services::stats::{self, TrackingStats};
use crate::storage::SeaOrmStorage;
use crate::tracking::build_tracking_url;

/// 统计响应：简历标识 + 平铺的统计字段
#[derive(Debug, Serialize)]
pub struct SpyglassResponse {
    pub resume_id: String,
    pub tracking_token: String,
    pub tracking_url: String,
    #[serde(flatten)]
    pub stats: TrackingStats,
}

pub struct SpyglassService;

impl SpyglassService {
    pub async fn resume_stats(
        path: web::Path<String>,
        storage: web::Data<Arc<SeaOrmStorage>>,
        tracking_config: web::Data<TrackingConfig>,
    ) -> impl Responder {
        let resume_id = path.into_inner();

        let resume = match storage.find_resume_by_id(&resume_id).await {
            Ok(Some(resume)) => resume,
            Ok(None) => {
                debug!("Stats requested for unknown resume: {}", resume_id);
                return HttpResponse::NotFound().json(json!({
                    "error": "Resume not found"
                }));
            }
            Err(e) => {
                error!("Resume lookup failed: {}", e);
                return HttpResponse::build(e.http_status()).json(json!({
                    "error": e.message()
                }));
            }
        };

        let logs = match storage.events_for_resume(&resume.id).await {
            Ok(logs) => logs,
            Err(e) => {
                error!("Event query failed for resume {}: {}", resume.id, e);
                return HttpResponse::build(e.http_status()).json(json!({
                    "error": e.message()
                }));
            }
        };

        let response = SpyglassResponse {
            resume_id: resume.id,
            tracking_url: build_tracking_url(
                &tracking_config.public_base_url,
                &resume.tracking_token,
            ),
            tracking_token: resume.tracking_token,
            stats: stats::aggregate(logs),
        };

        HttpResponse::Ok().json(response)
    }
}

/// 统计路由配置
pub fn spyglass_routes() -> actix_web::Scope {
    web::scope("/api/spyglass").route("/{resume_id}", web::get().to(SpyglassService::resume_stats))
}
