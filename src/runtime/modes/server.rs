//! Server mode
//!
//! This module contains the HTTP server startup logic.
//! It configures and starts the HTTP server with all necessary routes.

use actix_cors::Cors;
use actix_web::{
    App, HttpServer,
    middleware::{Compress, DefaultHeaders},
    web,
};
use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::api::middleware::RequestIdMiddleware;
use crate::api::services::{AppStartTime, health_routes, links_routes, redirect_routes};
use crate::api::{json_config, not_found_handler};
use crate::config::{CorsConfig, StaticConfig};
use crate::runtime::lifetime;

/// 上限，避免在大核数机器上起过多 worker
const MAX_WORKERS: usize = 32;

/// Build CORS middleware from configuration
///
/// 空的 allowed_origins 表示允许任意来源
pub fn build_cors_middleware(cors_config: &CorsConfig) -> Cors {
    let mut cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "DELETE", "OPTIONS"])
        .allowed_headers(vec![
            actix_web::http::header::CONTENT_TYPE,
            actix_web::http::header::ACCEPT,
        ])
        .expose_headers(vec!["X-Request-ID"])
        .max_age(cors_config.max_age_secs);

    if cors_config.allowed_origins.is_empty() || cors_config.allowed_origins.iter().any(|o| o == "*")
    {
        cors = cors.allow_any_origin();
    } else {
        for origin in &cors_config.allowed_origins {
            cors = cors.allowed_origin(origin);
        }
    }

    cors
}

/// 安全相关的默认响应头
pub fn security_headers() -> DefaultHeaders {
    DefaultHeaders::new()
        .add(("X-Content-Type-Options", "nosniff"))
        .add(("X-Frame-Options", "DENY"))
        .add(("Referrer-Policy", "no-referrer"))
}

/// Run the HTTP server
///
/// This function:
/// 1. Records startup time
/// 2. Connects storage and runs migrations
/// 3. Configures and starts the HTTP server
/// 4. Drains requests on Ctrl+C / SIGTERM, then closes the pool
///
/// **Note**: Logging system must be initialized before calling this function
pub async fn run_server(config: &StaticConfig) -> Result<()> {
    let app_start_time = AppStartTime::now();

    let startup = lifetime::startup::prepare_server_startup(config)
        .await
        .inspect_err(|e| tracing::error!("Server startup failed: {:#}", e))?;

    let storage = startup.storage.clone();
    let link_service = startup.link_service.clone();
    let cors_config = config.cors.clone();

    if cors_config.allowed_origins.is_empty() {
        warn!("CORS: allowed_origins is empty, any origin is allowed");
    }

    let workers = config.server.workers.clamp(1, MAX_WORKERS);
    info!("Using {} workers for the server", workers);

    let bind_address = format!("{}:{}", config.server.host, config.server.port);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(RequestIdMiddleware) // 为每个请求生成 request_id
            .wrap(build_cors_middleware(&cors_config))
            .wrap(Compress::default())
            .wrap(security_headers())
            .app_data(web::Data::new(link_service.clone()))
            .app_data(web::Data::new(app_start_time.clone()))
            .app_data(json_config())
            .service(links_routes())
            .service(health_routes())
            // 跳转路由必须最后注册
            .service(redirect_routes())
            .default_service(web::to(not_found_handler))
    })
    .workers(workers)
    .keep_alive(std::time::Duration::from_secs(30))
    .shutdown_timeout(lifetime::shutdown::SHUTDOWN_TIMEOUT_SECS)
    .disable_signals()
    .bind(&bind_address)
    .with_context(|| format!("Failed to bind {}", bind_address))?
    .run();

    info!("Starting server at http://{}", bind_address);

    let handle = server.handle();
    let shutdown = tokio::spawn(lifetime::shutdown::listen_for_shutdown(handle));

    let result = server.await;
    shutdown.abort();

    lifetime::shutdown::close_storage(&storage).await;
    result.context("HTTP server error")?;

    warn!("Server stopped");
    Ok(())
}
