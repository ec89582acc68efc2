//! 简历注册端点
//!
//! POST /api/resumes
//!
//! 创建一条简历记录并分配追踪 token，返回可直接嵌入的像素 URL。

use std::sync::Arc;

use actix_web::{HttpResponse, Responder, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::error;

use crate::config::TrackingConfig;
use crate::storage::SeaOrmStorage;
use crate::tracking::build_tracking_url;

#[derive(Debug, Default, Deserialize)]
pub struct CreateResumeRequest {
    pub original_filename: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreateResumeResponse {
    pub resume_id: String,
    pub tracking_token: String,
    pub tracking_url: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

pub struct ResumeService;

impl ResumeService {
    pub async fn create(
        body: Option<web::Json<CreateResumeRequest>>,
        storage: web::Data<Arc<SeaOrmStorage>>,
        tracking_config: web::Data<TrackingConfig>,
    ) -> impl Responder {
        // 请求体整体可省略
        let request = body.map(web::Json::into_inner).unwrap_or_default();

        let resume = match storage.create_resume(request.original_filename).await {
            Ok(resume) => resume,
            Err(e) => {
                error!("Resume creation failed: {}", e);
                return HttpResponse::build(e.http_status()).json(json!({
                    "error": e.message()
                }));
            }
        };

        let response = CreateResumeResponse {
            resume_id: resume.id,
            tracking_url: build_tracking_url(
                &tracking_config.public_base_url,
                &resume.tracking_token,
            ),
            tracking_token: resume.tracking_token,
            created_at: resume.created_at,
        };

        HttpResponse::Created().json(response)
    }
}

/// 简历路由配置
pub fn resume_routes() -> actix_web::Scope {
    web::scope("/api/resumes").route("", web::post().to(ResumeService::create))
}
