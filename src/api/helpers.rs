//! API 帮助函数

use actix_web::error::{InternalError, JsonPayloadError};
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, web};
use serde::Serialize;
use tracing::{debug, error};

use crate::errors::TinylinkError;

use super::types::ErrorBody;

/// JSON 请求体上限
pub const JSON_BODY_LIMIT: usize = 64 * 1024;

const GENERIC_STORAGE_MESSAGE: &str = "Internal server error";

/// 构建 JSON 响应
pub fn json_response<T: Serialize>(status: StatusCode, data: &T) -> HttpResponse {
    HttpResponse::build(status)
        .append_header(("Content-Type", "application/json; charset=utf-8"))
        .json(data)
}

fn expose_error_details() -> bool {
    crate::config::try_get_config().is_some_and(|c| c.server.expose_error_details)
}

/// 从 TinylinkError 构建错误响应（自动映射 HTTP 状态码）
///
/// 存储错误默认只返回通用信息，原始错误写入日志
pub fn error_response(err: &TinylinkError) -> HttpResponse {
    let status = err.http_status();
    let message = if status.is_server_error() {
        error!("Request failed: {}", err);
        if expose_error_details() {
            err.message().to_string()
        } else {
            GENERIC_STORAGE_MESSAGE.to_string()
        }
    } else {
        debug!("Request rejected: {}", err);
        err.message().to_string()
    };

    json_response(
        status,
        &ErrorBody {
            error: message,
            kind: err.kind().to_string(),
            code: err.code().to_string(),
        },
    )
}

/// 请求体解析失败统一返回 400 InvalidInput
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let message = match &err {
        JsonPayloadError::OverflowKnownLength { .. } | JsonPayloadError::Overflow { .. } => {
            format!("Request body exceeds {} bytes", JSON_BODY_LIMIT)
        }
        JsonPayloadError::ContentType => "Content-Type must be application/json".to_string(),
        other => format!("Invalid request body: {}", other),
    };
    let response = error_response(&TinylinkError::invalid_input(message));
    InternalError::from_response(err, response).into()
}

/// JSON 提取器配置
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(JSON_BODY_LIMIT)
        .error_handler(json_error_handler)
}

/// 未匹配路由
pub async fn not_found_handler(req: HttpRequest) -> HttpResponse {
    error_response(&TinylinkError::not_found(format!(
        "No route for {} {}",
        req.method(),
        req.path()
    )))
}
