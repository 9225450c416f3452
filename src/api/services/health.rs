use std::sync::Arc;
use std::time::Duration;

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, web};
use tracing::{error, trace};

use crate::api::helpers::json_response;
use crate::api::types::HealthResponse;
use crate::services::LinkService;

/// 单次数据库探测超时
const PING_TIMEOUT: Duration = Duration::from_secs(5);

// 应用启动时间结构体
#[derive(Clone, Debug)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

impl AppStartTime {
    pub fn now() -> Self {
        Self {
            start_datetime: chrono::Utc::now(),
        }
    }
}

/// Health Service
///
/// 直接探测存储，不经过链接业务逻辑，也不会计入点击
pub struct HealthService;

impl HealthService {
    pub async fn health_check(
        service: web::Data<Arc<LinkService>>,
        app_start_time: web::Data<AppStartTime>,
    ) -> HttpResponse {
        trace!("Received health check request");

        let database_up = match tokio::time::timeout(PING_TIMEOUT, service.store().ping()).await {
            Ok(Ok(())) => true,
            Ok(Err(e)) => {
                error!("Health check: database ping failed: {}", e);
                false
            }
            Err(_) => {
                error!("Health check: database ping timed out");
                false
            }
        };

        let now = chrono::Utc::now();
        let uptime = (now - app_start_time.start_datetime).num_seconds().max(0) as u64;

        let body = HealthResponse {
            ok: database_up,
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: now.to_rfc3339(),
            uptime,
            database: if database_up { "up" } else { "down" }.to_string(),
        };

        let status = if database_up {
            StatusCode::OK
        } else {
            StatusCode::SERVICE_UNAVAILABLE
        };

        json_response(status, &body)
    }
}

pub fn health_routes() -> actix_web::Resource {
    web::resource("/healthz")
        .route(web::get().to(HealthService::health_check))
        .route(web::head().to(HealthService::health_check))
}
