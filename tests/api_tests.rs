//! HTTP API tests
//!
//! Drives the `/api/links`, `/healthz` and `/{code}` routes through
//! `actix_web::test` against a temporary SQLite database.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use actix_web::{App, web};
use async_trait::async_trait;
use serde_json::{Value, json};
use tempfile::TempDir;

use tinylink::api::middleware::RequestIdMiddleware;
use tinylink::api::services::{AppStartTime, health_routes, links_routes, redirect_routes};
use tinylink::api::types::{ErrorBody, HealthResponse};
use tinylink::api::{json_config, not_found_handler};
use tinylink::config::{DatabaseConfig, LinksConfig};
use tinylink::errors::{Result, TinylinkError};
use tinylink::runtime::modes::server::security_headers;
use tinylink::services::LinkService;
use tinylink::storage::{Link, LinkStore, SeaOrmStorage};

// =============================================================================
// Test Setup
// =============================================================================

const BASE_URL: &str = "http://sho.rt";

async fn create_service() -> (Arc<LinkService>, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config = DatabaseConfig {
        database_url: format!(
            "sqlite://{}?mode=rwc",
            temp_dir.path().join("api.db").display()
        ),
        ..DatabaseConfig::default()
    };
    let storage = SeaOrmStorage::new(&config, "sqlite")
        .await
        .expect("Failed to create storage");

    let links = LinksConfig {
        base_url: BASE_URL.to_string(),
        ..LinksConfig::default()
    };
    (Arc::new(LinkService::new(Arc::new(storage), &links)), temp_dir)
}

/// 与 server 模式相同的路由和中间件
macro_rules! test_app {
    ($service:expr) => {{
        test::init_service(
            App::new()
                .wrap(RequestIdMiddleware)
                .wrap(security_headers())
                .app_data(web::Data::new($service))
                .app_data(web::Data::new(AppStartTime::now()))
                .app_data(json_config())
                .service(links_routes())
                .service(health_routes())
                .service(redirect_routes())
                .default_service(web::to(not_found_handler)),
        )
        .await
    }};
}

macro_rules! post_link {
    ($body:expr) => {
        TestRequest::post()
            .uri("/api/links")
            .set_json($body)
            .to_request()
    };
}

// =============================================================================
// POST /api/links
// =============================================================================

#[tokio::test]
async fn test_create_link_generated_code() {
    let (service, _dir) = create_service().await;
    let app = test_app!(service);

    let resp = test::call_service(
        &app,
        post_link!(json!({ "originalUrl": "https://example.com/page" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = test::read_body_json(resp).await;
    let code = body["code"].as_str().unwrap();
    assert_eq!(code.len(), 6);
    assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
    assert_eq!(body["originalUrl"], "https://example.com/page");
    assert_eq!(body["clicks"], 0);
    assert!(body["lastClicked"].is_null());
    assert!(body["createdAt"].as_str().unwrap().ends_with('Z'));
    assert_eq!(body["shortUrl"], format!("{}/{}", BASE_URL, code));
}

#[tokio::test]
async fn test_create_link_custom_code() {
    let (service, _dir) = create_service().await;
    let app = test_app!(service);

    let resp = test::call_service(
        &app,
        post_link!(json!({ "originalUrl": "https://example.com", "customCode": "Promo2024" })),
    )
    .await;
    // 9 位超出长度限制
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = test::call_service(
        &app,
        post_link!(json!({ "originalUrl": "https://example.com", "customCode": "Promo24" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "Promo24");
    assert_eq!(body["shortUrl"], "http://sho.rt/Promo24");
}

#[tokio::test]
async fn test_create_link_empty_custom_code_rejected() {
    let (service, _dir) = create_service().await;
    let app = test_app!(service);

    let resp = test::call_service(
        &app,
        post_link!(json!({ "originalUrl": "https://example.com", "customCode": "" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["kind"], "InvalidInput");

    let req = TestRequest::get().uri("/api/links").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert!(body.as_array().unwrap().is_empty());

    // null 等同于未提供
    let resp = test::call_service(
        &app,
        post_link!(json!({ "originalUrl": "https://example.com", "customCode": null })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_create_link_reserved_code_conflicts() {
    let (service, _dir) = create_service().await;
    let app = test_app!(service);

    let resp = test::call_service(
        &app,
        post_link!(json!({ "originalUrl": "https://example.com", "customCode": "healthz" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["kind"], "CodeConflict");
}

#[tokio::test]
async fn test_create_link_conflict() {
    let (service, _dir) = create_service().await;
    let app = test_app!(service);

    let body = json!({ "originalUrl": "https://example.com", "customCode": "same01" });
    let resp = test::call_service(&app, post_link!(body.clone())).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = test::call_service(&app, post_link!(body)).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let err: ErrorBody = test::read_body_json(resp).await;
    assert_eq!(err.kind, "CodeConflict");
    assert!(err.error.contains("same01"));
}

#[tokio::test]
async fn test_create_link_invalid_input() {
    let (service, _dir) = create_service().await;
    let app = test_app!(service);

    let bodies = [
        json!({ "originalUrl": "not-a-url" }),
        json!({ "originalUrl": "https://x.com", "customCode": "abc" }),
        json!({ "originalUrl": "https://x.com", "extra": true }),
        json!({ "customCode": "abcdef" }),
        json!({ "originalUrl": 42 }),
    ];

    for body in bodies {
        let resp = test::call_service(&app, post_link!(body.clone())).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "body: {}", body);
        let err: ErrorBody = test::read_body_json(resp).await;
        assert_eq!(err.kind, "InvalidInput");
        assert_eq!(err.code, "E001");
    }
}

#[tokio::test]
async fn test_create_link_malformed_json() {
    let (service, _dir) = create_service().await;
    let app = test_app!(service);

    let req = TestRequest::post()
        .uri("/api/links")
        .insert_header(("Content-Type", "application/json"))
        .set_payload("{\"originalUrl\": ")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let err: ErrorBody = test::read_body_json(resp).await;
    assert_eq!(err.kind, "InvalidInput");
}

#[tokio::test]
async fn test_create_link_body_too_large() {
    let (service, _dir) = create_service().await;
    let app = test_app!(service);

    let long_url = format!("https://example.com/{}", "a".repeat(70 * 1024));
    let resp = test::call_service(&app, post_link!(json!({ "originalUrl": long_url }))).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// =============================================================================
// GET / DELETE /api/links
// =============================================================================

#[tokio::test]
async fn test_list_links() {
    let (service, _dir) = create_service().await;
    let app = test_app!(service);

    let req = TestRequest::get().uri("/api/links").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, json!([]));

    for code in ["list01", "list02"] {
        let resp = test::call_service(
            &app,
            post_link!(json!({ "originalUrl": "https://example.com", "customCode": code })),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }

    let req = TestRequest::get().uri("/api/links").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let links = body.as_array().unwrap();
    assert_eq!(links.len(), 2);
    assert_eq!(links[0]["code"], "list02");
    assert_eq!(links[1]["code"], "list01");
    // 列表项不包含 shortUrl
    assert!(links[0].get("shortUrl").is_none());
}

#[tokio::test]
async fn test_get_link_stats() {
    let (service, _dir) = create_service().await;
    let app = test_app!(service);

    test::call_service(
        &app,
        post_link!(json!({ "originalUrl": "https://example.com", "customCode": "stat01" })),
    )
    .await;

    let req = TestRequest::get().uri("/api/links/stat01").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "stat01");
    assert_eq!(body["clicks"], 0);

    let req = TestRequest::get().uri("/api/links/nope01").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let err: ErrorBody = test::read_body_json(resp).await;
    assert_eq!(err.kind, "NotFound");
}

#[tokio::test]
async fn test_delete_link() {
    let (service, _dir) = create_service().await;
    let app = test_app!(service);

    test::call_service(
        &app,
        post_link!(json!({ "originalUrl": "https://example.com", "customCode": "bye001" })),
    )
    .await;

    let req = TestRequest::delete().uri("/api/links/bye001").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    let body = test::read_body(resp).await;
    assert!(body.is_empty());

    let req = TestRequest::delete().uri("/api/links/bye001").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = TestRequest::get().uri("/bye001").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// =============================================================================
// GET /{code}
// =============================================================================

#[tokio::test]
async fn test_redirect_counts_clicks() {
    let (service, _dir) = create_service().await;
    let app = test_app!(service);

    test::call_service(
        &app,
        post_link!(json!({ "originalUrl": "https://example.com/landing", "customCode": "go0001" })),
    )
    .await;

    for _ in 0..3 {
        let req = TestRequest::get().uri("/go0001").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FOUND);
        let location = resp.headers().get("Location").unwrap().to_str().unwrap();
        assert_eq!(location, "https://example.com/landing");
    }

    let req = TestRequest::get().uri("/api/links/go0001").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["clicks"], 3);
    assert!(body["lastClicked"].is_string());
}

#[tokio::test]
async fn test_redirect_unknown_and_malformed_codes() {
    let (service, _dir) = create_service().await;
    let app = test_app!(service);

    for uri in ["/zzzzzz", "/ab", "/favicon.ico", "/way-too-long-code"] {
        let req = TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "uri: {}", uri);
        let err: ErrorBody = test::read_body_json(resp).await;
        assert_eq!(err.kind, "NotFound");
    }
}

#[tokio::test]
async fn test_api_routes_win_over_redirect() {
    let (service, _dir) = create_service().await;
    let app = test_app!(service);

    // "healthz" 也是合法的 7 位短码格式，但必须命中健康检查
    let req = TestRequest::get().uri("/healthz").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: HealthResponse = test::read_body_json(resp).await;
    assert!(body.ok);

    // 未注册的路径返回结构化 404
    let req = TestRequest::get().uri("/api/unknown/route").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let err: ErrorBody = test::read_body_json(resp).await;
    assert_eq!(err.kind, "NotFound");
}

// =============================================================================
// Headers
// =============================================================================

#[tokio::test]
async fn test_security_and_request_id_headers() {
    let (service, _dir) = create_service().await;
    let app = test_app!(service);

    let req = TestRequest::get().uri("/api/links").to_request();
    let resp = test::call_service(&app, req).await;

    let headers = resp.headers();
    assert_eq!(headers.get("X-Content-Type-Options").unwrap(), "nosniff");
    assert_eq!(headers.get("X-Frame-Options").unwrap(), "DENY");
    assert_eq!(headers.get("Referrer-Policy").unwrap(), "no-referrer");
    let request_id = headers.get("X-Request-ID").unwrap().to_str().unwrap();
    assert_eq!(request_id.len(), 36);

    let req = TestRequest::get()
        .uri("/api/links")
        .insert_header(("X-Request-ID", "upstream-42"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.headers().get("X-Request-ID").unwrap(), "upstream-42");
}

// =============================================================================
// GET /healthz
// =============================================================================

/// ping 总是失败的存储
struct DownStore;

#[async_trait]
impl LinkStore for DownStore {
    async fn insert(&self, _: &str, _: &str) -> Result<Link> {
        Err(TinylinkError::storage_unavailable("down"))
    }
    async fn list_all(&self) -> Result<Vec<Link>> {
        Err(TinylinkError::storage_unavailable("no such table: links"))
    }
    async fn find_by_code(&self, _: &str) -> Result<Option<Link>> {
        Err(TinylinkError::storage_unavailable("down"))
    }
    async fn delete_by_code(&self, _: &str) -> Result<Option<Link>> {
        Err(TinylinkError::storage_unavailable("down"))
    }
    async fn increment_click_and_get_target(&self, _: &str) -> Result<Option<String>> {
        Err(TinylinkError::storage_unavailable("down"))
    }
    async fn exists_by_code(&self, _: &str) -> Result<bool> {
        Err(TinylinkError::storage_unavailable("down"))
    }
    async fn count(&self) -> Result<u64> {
        Err(TinylinkError::storage_unavailable("down"))
    }
    async fn ping(&self) -> Result<()> {
        Err(TinylinkError::storage_unavailable("down"))
    }
    async fn close(&self) -> Result<()> {
        Ok(())
    }
    fn backend_name(&self) -> &str {
        "down"
    }
}

#[tokio::test]
async fn test_healthz_up() {
    let (service, _dir) = create_service().await;
    let app = test_app!(service);

    let req = TestRequest::get().uri("/healthz").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: HealthResponse = test::read_body_json(resp).await;
    assert!(body.ok);
    assert_eq!(body.database, "up");
    assert_eq!(body.version, env!("CARGO_PKG_VERSION"));
    assert!(chrono::DateTime::parse_from_rfc3339(&body.timestamp).is_ok());
}

#[tokio::test]
async fn test_healthz_down_and_storage_errors() {
    let service = Arc::new(LinkService::new(Arc::new(DownStore), &LinksConfig::default()));
    let app = test_app!(service);

    let req = TestRequest::get().uri("/healthz").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body: HealthResponse = test::read_body_json(resp).await;
    assert!(!body.ok);
    assert_eq!(body.database, "down");

    // 数据库错误细节不返回给客户端
    let req = TestRequest::get().uri("/api/links").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let err: ErrorBody = test::read_body_json(resp).await;
    assert_eq!(err.kind, "StorageUnavailable");
    assert!(!err.error.contains("no such table"));
}
