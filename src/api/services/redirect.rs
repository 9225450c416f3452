use std::sync::Arc;

use actix_web::http::header;
use actix_web::{HttpResponse, web};
use tracing::trace;

use crate::api::helpers::error_response;
use crate::services::LinkService;

pub struct RedirectService;

impl RedirectService {
    /// GET /{code}：计数后 302 跳转
    pub async fn handle_redirect(
        path: web::Path<String>,
        service: web::Data<Arc<LinkService>>,
    ) -> HttpResponse {
        let code = path.into_inner();

        match service.resolve_redirect(&code).await {
            Ok(target) => {
                trace!("Redirecting {} -> {}", code, target);
                HttpResponse::Found()
                    .insert_header((header::LOCATION, target))
                    // 每次访问都需要回源计数
                    .insert_header((header::CACHE_CONTROL, "no-store"))
                    .finish()
            }
            Err(e) => error_response(&e),
        }
    }
}

/// 短链接跳转路由，必须在所有 API 路由之后注册
pub fn redirect_routes() -> actix_web::Resource {
    web::resource("/{code}").route(web::get().to(RedirectService::handle_redirect))
}
