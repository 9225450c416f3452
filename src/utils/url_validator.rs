//! 目标地址校验
//!
//! 目标地址原样存储（仅去掉首尾空白），这里只负责判定能否作为跳转目标。

use std::fmt;

use url::{ParseError, Url};

/// 允许跳转的协议
const ALLOWED_SCHEMES: &[&str] = &["http", "https"];

/// 浏览器会执行脚本或读取本地内容的协议
const BLOCKED_SCHEMES: &[&str] = &["javascript", "data", "file", "vbscript", "about", "blob"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlValidationError {
    Empty,
    /// 不是绝对地址，或无法解析
    Unparsable(ParseError),
    BlockedScheme(String),
    UnsupportedScheme(String),
    MissingHost,
}

impl fmt::Display for UrlValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("originalUrl cannot be empty"),
            Self::Unparsable(ParseError::RelativeUrlWithoutBase) => {
                f.write_str("originalUrl must be an absolute http:// or https:// URL")
            }
            Self::Unparsable(e) => write!(f, "originalUrl is not a valid URL: {}", e),
            Self::BlockedScheme(scheme) => write!(f, "'{}:' URLs are not allowed", scheme),
            Self::UnsupportedScheme(scheme) => write!(
                f,
                "Unsupported scheme '{}:'. Only http and https are allowed",
                scheme
            ),
            Self::MissingHost => f.write_str("originalUrl must include a host"),
        }
    }
}

impl std::error::Error for UrlValidationError {}

/// 校验跳转目标，返回去掉首尾空白后要存储的地址
pub fn validate_url(raw: &str) -> Result<&str, UrlValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(UrlValidationError::Empty);
    }

    let parsed = Url::parse(trimmed).map_err(UrlValidationError::Unparsable)?;

    // Url 已将协议转为小写
    let scheme = parsed.scheme();
    if BLOCKED_SCHEMES.contains(&scheme) {
        return Err(UrlValidationError::BlockedScheme(scheme.to_string()));
    }
    if !ALLOWED_SCHEMES.contains(&scheme) {
        return Err(UrlValidationError::UnsupportedScheme(scheme.to_string()));
    }

    match parsed.host_str() {
        Some(host) if !host.is_empty() => Ok(trimmed),
        _ => Err(UrlValidationError::MissingHost),
    }
}
