//! Short code allocation

use std::iter;

use crate::config::{MAX_CODE_LENGTH, MIN_CODE_LENGTH};
use crate::utils::is_reserved_code;

/// 62 个字母数字字符
pub const CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// 分配结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocatedCode {
    pub code: String,
    /// false 表示调用方自带的短码
    pub generated: bool,
}

/// 生成或透传短码，不检查唯一性
#[derive(Debug, Clone, Copy)]
pub struct CodeAllocator {
    length: usize,
}

impl CodeAllocator {
    pub fn new(length: usize) -> Self {
        Self {
            length: length.clamp(MIN_CODE_LENGTH, MAX_CODE_LENGTH),
        }
    }

    pub fn length(&self) -> usize {
        self.length
    }

    /// 自带短码已在上层校验过格式，这里原样透传
    pub fn allocate(&self, custom: Option<&str>) -> AllocatedCode {
        match custom {
            Some(code) => AllocatedCode {
                code: code.to_string(),
                generated: false,
            },
            None => AllocatedCode {
                code: self.generate(),
                generated: true,
            },
        }
    }

    /// 使用线程本地 CSPRNG 生成随机短码，跳过保留字
    pub fn generate(&self) -> String {
        loop {
            let code = self.random_code();
            if !is_reserved_code(&code) {
                return code;
            }
        }
    }

    fn random_code(&self) -> String {
        iter::repeat_with(|| CODE_ALPHABET[rand::random_range(0..CODE_ALPHABET.len())] as char)
            .take(self.length)
            .collect()
    }
}

impl Default for CodeAllocator {
    fn default() -> Self {
        Self::new(MIN_CODE_LENGTH)
    }
}
