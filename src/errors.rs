use std::fmt;

use actix_web::http::StatusCode;
use sea_orm::SqlErr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TinylinkError {
    InvalidInput(String),
    CodeConflict(String),
    NotFound(String),
    StorageUnavailable(String),
    /// 仅存储层使用，服务层负责转换为 CodeConflict
    DuplicateCode(String),
    DatabaseConfig(String),
    Config(String),
    FileOperation(String),
}

impl TinylinkError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            TinylinkError::InvalidInput(_) => "E001",
            TinylinkError::CodeConflict(_) => "E002",
            TinylinkError::NotFound(_) => "E003",
            TinylinkError::StorageUnavailable(_) => "E004",
            TinylinkError::DuplicateCode(_) => "E005",
            TinylinkError::DatabaseConfig(_) => "E006",
            TinylinkError::Config(_) => "E007",
            TinylinkError::FileOperation(_) => "E008",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            TinylinkError::InvalidInput(_) => "Invalid Input",
            TinylinkError::CodeConflict(_) => "Code Conflict",
            TinylinkError::NotFound(_) => "Resource Not Found",
            TinylinkError::StorageUnavailable(_) => "Storage Unavailable",
            TinylinkError::DuplicateCode(_) => "Duplicate Code",
            TinylinkError::DatabaseConfig(_) => "Database Configuration Error",
            TinylinkError::Config(_) => "Configuration Error",
            TinylinkError::FileOperation(_) => "File Operation Error",
        }
    }

    /// 机器可读的错误类别，出现在 JSON 响应的 `kind` 字段
    pub fn kind(&self) -> &'static str {
        match self {
            TinylinkError::InvalidInput(_) => "InvalidInput",
            TinylinkError::CodeConflict(_) => "CodeConflict",
            TinylinkError::NotFound(_) => "NotFound",
            TinylinkError::StorageUnavailable(_) => "StorageUnavailable",
            TinylinkError::DuplicateCode(_) => "DuplicateCode",
            TinylinkError::DatabaseConfig(_) => "DatabaseConfig",
            TinylinkError::Config(_) => "Config",
            TinylinkError::FileOperation(_) => "FileOperation",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            TinylinkError::InvalidInput(msg) => msg,
            TinylinkError::CodeConflict(msg) => msg,
            TinylinkError::NotFound(msg) => msg,
            TinylinkError::StorageUnavailable(msg) => msg,
            TinylinkError::DuplicateCode(msg) => msg,
            TinylinkError::DatabaseConfig(msg) => msg,
            TinylinkError::Config(msg) => msg,
            TinylinkError::FileOperation(msg) => msg,
        }
    }

    pub fn http_status(&self) -> StatusCode {
        match self {
            TinylinkError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            TinylinkError::CodeConflict(_) | TinylinkError::DuplicateCode(_) => {
                StatusCode::CONFLICT
            }
            TinylinkError::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 格式化为彩色输出（用于启动失败时打印）
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for TinylinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for TinylinkError {}

// 便捷的构造函数
impl TinylinkError {
    pub fn invalid_input<T: Into<String>>(msg: T) -> Self {
        TinylinkError::InvalidInput(msg.into())
    }

    pub fn code_conflict<T: Into<String>>(msg: T) -> Self {
        TinylinkError::CodeConflict(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        TinylinkError::NotFound(msg.into())
    }

    pub fn storage_unavailable<T: Into<String>>(msg: T) -> Self {
        TinylinkError::StorageUnavailable(msg.into())
    }

    pub fn duplicate_code<T: Into<String>>(msg: T) -> Self {
        TinylinkError::DuplicateCode(msg.into())
    }

    pub fn database_config<T: Into<String>>(msg: T) -> Self {
        TinylinkError::DatabaseConfig(msg.into())
    }

    pub fn config<T: Into<String>>(msg: T) -> Self {
        TinylinkError::Config(msg.into())
    }

    pub fn file_operation<T: Into<String>>(msg: T) -> Self {
        TinylinkError::FileOperation(msg.into())
    }
}

impl From<sea_orm::DbErr> for TinylinkError {
    fn from(err: sea_orm::DbErr) -> Self {
        // 唯一约束冲突由数据库报告，不依赖事先的读取
        if let Some(SqlErr::UniqueConstraintViolation(detail)) = err.sql_err() {
            return TinylinkError::DuplicateCode(detail);
        }
        TinylinkError::StorageUnavailable(err.to_string())
    }
}

impl From<std::io::Error> for TinylinkError {
    fn from(err: std::io::Error) -> Self {
        TinylinkError::FileOperation(err.to_string())
    }
}

impl From<config::ConfigError> for TinylinkError {
    fn from(err: config::ConfigError) -> Self {
        TinylinkError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, TinylinkError>;
