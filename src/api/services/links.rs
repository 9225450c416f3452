//! 链接管理 JSON API `/api/links`

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, web};
use tracing::trace;

use crate::api::helpers::{error_response, json_response};
use crate::api::types::{CreateLinkBody, CreatedLinkResponse};
use crate::services::{CreateLinkRequest, LinkService};

pub struct LinksService;

impl LinksService {
    /// POST /api/links
    pub async fn create_link(
        body: web::Json<CreateLinkBody>,
        service: web::Data<Arc<LinkService>>,
    ) -> HttpResponse {
        let body = body.into_inner();
        trace!("API: create link for {}", body.original_url);

        let request = CreateLinkRequest::new(body.original_url, body.custom_code);

        match service.create_link(request).await {
            Ok(link) => {
                let short_url = service.short_url(&link.code);
                json_response(StatusCode::CREATED, &CreatedLinkResponse { link, short_url })
            }
            Err(e) => error_response(&e),
        }
    }

    /// GET /api/links
    pub async fn list_links(service: web::Data<Arc<LinkService>>) -> HttpResponse {
        match service.get_all_links().await {
            Ok(links) => json_response(StatusCode::OK, &links),
            Err(e) => error_response(&e),
        }
    }

    /// GET /api/links/{code}
    pub async fn get_link(
        path: web::Path<String>,
        service: web::Data<Arc<LinkService>>,
    ) -> HttpResponse {
        match service.get_link_stats(&path).await {
            Ok(link) => json_response(StatusCode::OK, &link),
            Err(e) => error_response(&e),
        }
    }

    /// DELETE /api/links/{code}
    pub async fn delete_link(
        path: web::Path<String>,
        service: web::Data<Arc<LinkService>>,
    ) -> HttpResponse {
        match service.delete_link(&path).await {
            Ok(_) => HttpResponse::NoContent().finish(),
            Err(e) => error_response(&e),
        }
    }
}

/// 链接管理路由 `/api/links`
///
/// - GET /api/links - 获取所有链接
/// - POST /api/links - 创建链接
/// - GET /api/links/{code} - 获取单个链接
/// - DELETE /api/links/{code} - 删除链接
pub fn links_routes() -> actix_web::Scope {
    web::scope("/api/links")
        .route("", web::get().to(LinksService::list_links))
        .route("", web::post().to(LinksService::create_link))
        .route("/{code}", web::get().to(LinksService::get_link))
        .route("/{code}", web::delete().to(LinksService::delete_link))
}
