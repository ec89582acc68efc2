//! Tracking pixel endpoint tests
//!
//! Tests for the beacon path: pixel response shape, fire-and-forget
//! event recording and token handling, using temporary SQLite databases.

use std::sync::Arc;
use std::time::{Duration, Instant};

use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use actix_web::{App, web};
use async_trait::async_trait;
use tempfile::TempDir;

use spyglass::api::services::track_routes;
use spyglass::config::DatabaseConfig;
use spyglass::services::geoip::{GeoInfo, GeoLookup, GeoResolver};
use spyglass::storage::SeaOrmStorage;
use spyglass::tracking::{EventRecorder, EventSink, TrackingManager};

// =============================================================================
// Test Setup
// =============================================================================

/// 固定返回一份地理信息的 provider，可注入延迟
struct StubLookup {
    info: GeoInfo,
    delay: Duration,
}

impl StubLookup {
    fn instant() -> Arc<Self> {
        Arc::new(Self {
            info: GeoInfo {
                country: "US".to_string(),
                city: "San Francisco".to_string(),
                region: "California".to_string(),
                latitude: Some(37.7749),
                longitude: Some(-122.4194),
                company_hint: "Google LLC".to_string(),
            },
            delay: Duration::ZERO,
        })
    }

    fn slow(delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            info: GeoInfo::unknown(),
            delay,
        })
    }
}

#[async_trait]
impl GeoLookup for StubLookup {
    async fn lookup(&self, _ip: &str) -> Option<GeoInfo> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        Some(self.info.clone())
    }

    fn name(&self) -> &'static str {
        "Stub"
    }
}

async fn create_temp_storage() -> (Arc<SeaOrmStorage>, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("pixel_test.db");

    let config = DatabaseConfig {
        database_url: format!("sqlite://{}?mode=rwc", db_path.display()),
        pool_size: 5,
    };

    let storage = Arc::new(
        SeaOrmStorage::new(&config)
            .await
            .expect("Failed to create storage"),
    );
    (storage, temp_dir)
}

/// 启动追踪 worker 并返回可注入 App 的 manager
fn start_tracking(storage: Arc<SeaOrmStorage>, provider: Arc<StubLookup>) -> TrackingManager {
    let geo = GeoResolver::with_provider(provider);
    let (manager, rx) = TrackingManager::new();
    let recorder: Arc<dyn EventSink> = Arc::new(EventRecorder::new(storage, geo));
    tokio::spawn(TrackingManager::run_worker(recorder, rx));
    manager
}

/// 轮询等待事件落库（后台队列没有完成通知）
async fn wait_for_events(storage: &SeaOrmStorage, resume_id: &str, expected: u64) {
    for _ in 0..100 {
        let count = storage
            .count_events_for_resume(resume_id)
            .await
            .expect("count failed");
        if count >= expected {
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("timed out waiting for {} events", expected);
}

// =============================================================================
// Tests
// =============================================================================

#[actix_web::test]
async fn known_token_returns_pixel_and_records_event() {
    let (storage, _dir) = create_temp_storage().await;
    let manager = start_tracking(storage.clone(), StubLookup::instant());

    let resume = storage
        .create_resume(Some("cv.pdf".to_string()))
        .await
        .expect("create resume");

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(storage.clone()))
            .app_data(web::Data::new(manager))
            .service(track_routes()),
    )
    .await;

    let req = TestRequest::get()
        .uri(&format!("/api/track/{}/pixel.gif", resume.tracking_token))
        .insert_header(("X-Forwarded-For", "203.0.113.5, 10.0.0.1"))
        .insert_header(("User-Agent", "Mozilla/5.0 (test)"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get("Content-Type").unwrap(),
        "image/gif"
    );
    let body = test::read_body(resp).await;
    assert_eq!(body.len(), 43);
    assert_eq!(&body[..6], b"GIF89a");

    wait_for_events(&storage, &resume.id, 1).await;

    let events = storage.events_for_resume(&resume.id).await.unwrap();
    assert_eq!(events.len(), 1);
    let event = &events[0];
    assert_eq!(event.event_type, "view");
    // X-Forwarded-For 只取第一个条目
    assert_eq!(event.ip_address.as_deref(), Some("203.0.113.5"));
    assert_eq!(event.user_agent.as_deref(), Some("Mozilla/5.0 (test)"));
    assert_eq!(event.country.as_deref(), Some("US"));
    assert_eq!(event.city.as_deref(), Some("San Francisco"));
    assert_eq!(event.latitude, Some(37.7749));
    assert_eq!(event.company_hint.as_deref(), Some("Google LLC"));
}

#[actix_web::test]
async fn unknown_token_returns_pixel_without_recording() {
    let (storage, _dir) = create_temp_storage().await;
    let manager = start_tracking(storage.clone(), StubLookup::instant());

    let resume = storage.create_resume(None).await.expect("create resume");

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(storage.clone()))
            .app_data(web::Data::new(manager))
            .service(track_routes()),
    )
    .await;

    let req = TestRequest::get()
        .uri("/api/track/no-such-token/pixel.gif")
        .to_request();
    let resp = test::call_service(&app, req).await;

    // 响应与有效 token 不可区分
    assert_eq!(resp.status(), StatusCode::OK);
    let body = test::read_body(resp).await;
    assert_eq!(body.len(), 43);

    tokio::time::sleep(Duration::from_millis(150)).await;
    let count = storage.count_events_for_resume(&resume.id).await.unwrap();
    assert_eq!(count, 0);
}

#[actix_web::test]
async fn pixel_response_disables_caching() {
    let (storage, _dir) = create_temp_storage().await;
    let manager = start_tracking(storage.clone(), StubLookup::instant());

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(storage.clone()))
            .app_data(web::Data::new(manager))
            .service(track_routes()),
    )
    .await;

    let req = TestRequest::get()
        .uri("/api/track/whatever/pixel.gif")
        .to_request();
    let resp = test::call_service(&app, req).await;

    let headers = resp.headers();
    assert_eq!(
        headers.get("Cache-Control").unwrap(),
        "no-cache, no-store, must-revalidate"
    );
    assert_eq!(headers.get("Pragma").unwrap(), "no-cache");
    assert_eq!(headers.get("Expires").unwrap(), "0");
}

#[actix_web::test]
async fn response_does_not_wait_for_geo_resolution() {
    let (storage, _dir) = create_temp_storage().await;
    // 地理解析人为放慢 300ms，响应不应受影响
    let manager = start_tracking(storage.clone(), StubLookup::slow(Duration::from_millis(300)));

    let resume = storage.create_resume(None).await.expect("create resume");

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(storage.clone()))
            .app_data(web::Data::new(manager))
            .service(track_routes()),
    )
    .await;

    let req = TestRequest::get()
        .uri(&format!("/api/track/{}/pixel.gif", resume.tracking_token))
        .insert_header(("X-Forwarded-For", "203.0.113.9"))
        .to_request();

    let start = Instant::now();
    let resp = test::call_service(&app, req).await;
    let elapsed = start.elapsed();

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(
        elapsed < Duration::from_millis(250),
        "pixel response blocked on geo lookup: {:?}",
        elapsed
    );

    // 响应返回时事件尚未落库
    let count = storage.count_events_for_resume(&resume.id).await.unwrap();
    assert_eq!(count, 0);

    // 但最终会落库
    wait_for_events(&storage, &resume.id, 1).await;
}
