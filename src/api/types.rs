//! API 请求/响应类型

use serde::{Deserialize, Serialize};

use crate::storage::Link;

/// POST /api/links 请求体
///
/// 未知字段直接拒绝
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateLinkBody {
    pub original_url: String,
    #[serde(default)]
    pub custom_code: Option<String>,
}

/// 创建成功时返回的链接，附带完整短链接地址
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedLinkResponse {
    #[serde(flatten)]
    pub link: Link,
    pub short_url: String,
}

/// 统一错误响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub kind: String,
    pub code: String,
}

/// GET /healthz 响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub ok: bool,
    pub version: String,
    pub timestamp: String,
    /// 运行秒数
    pub uptime: u64,
    pub database: String,
}
