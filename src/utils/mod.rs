pub mod url_validator;

pub use url_validator::{UrlValidationError, validate_url};

use crate::config::{MAX_CODE_LENGTH, MIN_CODE_LENGTH};

/// 与固定路由重名的短码，注册后永远无法跳转
pub const RESERVED_CODES: &[&str] = &["healthz"];

pub fn is_reserved_code(code: &str) -> bool {
    RESERVED_CODES.contains(&code)
}

/// 短码只允许 6-8 位字母或数字
pub fn is_valid_short_code(code: &str) -> bool {
    (MIN_CODE_LENGTH..=MAX_CODE_LENGTH).contains(&code.len())
        && code.bytes().all(|b| b.is_ascii_alphanumeric())
}
