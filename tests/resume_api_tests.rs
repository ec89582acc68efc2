//! Resume registration endpoint tests
//!
//! Tests for POST /api/resumes and the health endpoints, using
//! temporary SQLite databases.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use actix_web::{App, web};
use serde_json::Value;
use tempfile::TempDir;

use spyglass::api::services::{AppStartTime, health_routes, resume_routes};
use spyglass::config::{DatabaseConfig, TrackingConfig};
use spyglass::storage::SeaOrmStorage;

async fn create_temp_storage() -> (Arc<SeaOrmStorage>, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("resume_test.db");

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

#[actix_web::test]
async fn create_resume_returns_token_and_pixel_url() {
    let (storage, _dir) = create_temp_storage().await;

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(storage.clone()))
            .app_data(web::Data::new(TrackingConfig::default()))
            .service(resume_routes()),
    )
    .await;

    let req = TestRequest::post()
        .uri("/api/resumes")
        .set_json(serde_json::json!({ "original_filename": "cv.pdf" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;

    let resume_id = body["resume_id"].as_str().unwrap();
    let token = body["tracking_token"].as_str().unwrap();
    assert!(!resume_id.is_empty());
    assert!(!token.is_empty());
    assert_ne!(resume_id, token);
    assert_eq!(
        body["tracking_url"],
        format!("http://localhost:8080/api/track/{}/pixel.gif", token)
    );

    // 落库验证
    let stored = storage
        .find_resume_by_token(token)
        .await
        .unwrap()
        .expect("resume must be stored");
    assert_eq!(stored.id, resume_id);
    assert_eq!(stored.original_filename.as_deref(), Some("cv.pdf"));
}

#[actix_web::test]
async fn create_resume_accepts_empty_body() {
    let (storage, _dir) = create_temp_storage().await;

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(storage.clone()))
            .app_data(web::Data::new(TrackingConfig::default()))
            .service(resume_routes()),
    )
    .await;

    let req = TestRequest::post().uri("/api/resumes").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert!(!body["tracking_token"].as_str().unwrap().is_empty());
}

#[actix_web::test]
async fn health_check_reports_healthy_sqlite_backend() {
    let (storage, _dir) = create_temp_storage().await;

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(storage.clone()))
            .app_data(web::Data::new(AppStartTime {
                start_datetime: chrono::Utc::now(),
            }))
            .service(health_routes()),
    )
    .await;

    let req = TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["checks"]["storage"]["backend"], "sqlite");

    let req = TestRequest::get().uri("/health/live").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
}
