//! 追踪像素端点
//!
//! GET /api/track/{tracking_token}/pixel.gif
//!
//! 无论 token 是否有效都返回同一个 200 GIF：像素嵌在别人打开的
//! 简历里，响应差异会把追踪行为暴露给对方，也没有任何重试价值。
//! 事件记录走 TrackingManager 的后台队列，响应不等待它。

use std::sync::Arc;

use actix_web::http::header;
use actix_web::{HttpRequest, HttpResponse, Responder, web};
use tracing::{debug, trace, warn};

use crate::storage::SeaOrmStorage;
use crate::tracking::{TRACKING_PIXEL_GIF, TrackingManager, ViewHit};
use crate::utils::ip::effective_source_addr;

pub struct TrackService;

impl TrackService {
    pub async fn serve_pixel(
        req: HttpRequest,
        path: web::Path<String>,
        storage: web::Data<Arc<SeaOrmStorage>>,
        manager: web::Data<TrackingManager>,
    ) -> impl Responder {
        let token = path.into_inner();

        // token 校验和入队都在返回像素之前完成，但都不产生可观测的
        // 响应差异
        match storage.find_resume_by_token(&token).await {
            Ok(Some(resume)) => {
                let mut hit = ViewHit::new(resume.id);
                hit.ip_address = effective_source_addr(&req);
                hit.user_agent = header_str(&req, header::USER_AGENT.as_str());
                hit.referer = header_str(&req, header::REFERER.as_str());

                trace!("Pixel hit for token {}, queueing event", token);
                manager.dispatch(hit);
            }
            Ok(None) => {
                debug!("Pixel hit with unknown token: {}", token);
            }
            Err(e) => {
                warn!("Pixel token lookup failed: {}", e);
            }
        }

        Self::pixel_response()
    }

    /// 固定的像素响应，禁用一切缓存（每次打开都必须回源）
    fn pixel_response() -> HttpResponse {
        HttpResponse::Ok()
            .insert_header(("Content-Type", "image/gif"))
            .insert_header(("Cache-Control", "no-cache, no-store, must-revalidate"))
            .insert_header(("Pragma", "no-cache"))
            .insert_header(("Expires", "0"))
            .body(TRACKING_PIXEL_GIF)
    }
}

fn header_str(req: &HttpRequest, name: &str) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

/// 追踪路由配置
pub fn track_routes() -> actix_web::Scope {
    web::scope("/api/track").route(
        "/{tracking_token}/pixel.gif",
        web::get().to(TrackService::serve_pixel),
    )
}
