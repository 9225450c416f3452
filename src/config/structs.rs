use serde::{Deserialize, Serialize};

use crate::errors::{Result, TinylinkError};

/// 默认配置文件路径
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// 生成短码长度的允许范围
pub const MIN_CODE_LENGTH: usize = 6;
pub const MAX_CODE_LENGTH: usize = 8;

/// 静态配置（从 TOML 加载，启动时使用）
///
/// 包含：
/// - server: 监听地址、端口、worker 数量
/// - database: 数据库连接配置
/// - links: 短链接生成与展示
/// - cors: 跨域策略
/// - logging: 日志配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StaticConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub links: LinksConfig,
    #[serde(default)]
    pub cors: CorsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl StaticConfig {
    /// 从 TOML 文件和环境变量加载配置
    ///
    /// 优先级：旧版 ENV (PORT / DATABASE_URL / BASE_URL) > TINYLINK__* ENV
    /// > 配置文件 > 默认值
    /// 示例：TINYLINK__SERVER__PORT=9999
    pub fn load(path: Option<&str>) -> Result<Self> {
        use config::{Config, Environment, File};

        let path = path.unwrap_or(DEFAULT_CONFIG_PATH);
        let explicit = path != DEFAULT_CONFIG_PATH;

        if explicit && !std::path::Path::new(path).exists() {
            return Err(TinylinkError::config(format!(
                "Config file not found: {}",
                path
            )));
        }

        let builder = Config::builder()
            // 1. 从 TOML 文件加载（默认路径可选）
            .add_source(File::with_name(path).required(false))
            // 2. 从环境变量覆盖，前缀 TINYLINK，分隔符 __
            .add_source(
                Environment::with_prefix("TINYLINK")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            // 3. 兼容旧部署使用的环境变量
            .set_override_option("server.port", std::env::var("PORT").ok())?
            .set_override_option("database.database_url", std::env::var("DATABASE_URL").ok())?
            .set_override_option("links.base_url", std::env::var("BASE_URL").ok())?;

        let config: StaticConfig = builder.build()?.try_deserialize()?;

        if std::path::Path::new(path).exists() {
            eprintln!("[INFO] Configuration loaded from: {}", path);
        }

        Ok(config.normalized())
    }

    /// 将越界的数值收敛到允许范围
    pub fn normalized(mut self) -> Self {
        self.links.code_length = self
            .links
            .code_length
            .clamp(MIN_CODE_LENGTH, MAX_CODE_LENGTH);
        self.links.max_generate_attempts = self.links.max_generate_attempts.max(1);
        self.server.workers = self.server.workers.max(1);
        self.database.pool_size = self.database.pool_size.max(1);
        self
    }

    /// 生成示例 TOML 配置文件
    pub fn generate_sample_config() -> String {
        let sample_config = Self::default();
        toml::to_string_pretty(&sample_config)
            .unwrap_or_else(|e| format!("# Error generating sample config: {}", e))
    }

    /// 保存配置到 TOML 文件
    pub fn save_to_file<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| TinylinkError::config(format!("Failed to serialize config: {}", e)))?;

        if let Some(parent) = path.as_ref().parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }
}

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_host")]
    pub host: String,
    #[serde(default = "default_server_port")]
    pub port: u16,
    #[serde(default = "default_workers")]
    pub workers: usize,
    /// 为 true 时 500 响应携带数据库原始错误信息
    #[serde(default)]
    pub expose_error_details: bool,
}

/// 数据库连接配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_url")]
    pub database_url: String,
    #[serde(default = "default_database_pool_size")]
    pub pool_size: u32,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

/// 短链接配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinksConfig {
    /// 拼接 shortUrl 使用的对外地址
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_code_length")]
    pub code_length: usize,
    /// 随机短码撞库时的最大生成次数
    #[serde(default = "default_max_generate_attempts")]
    pub max_generate_attempts: u32,
}

/// CORS 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// 为空表示允许任意来源
    #[serde(default)]
    pub allowed_origins: Vec<String>,
    #[serde(default = "default_cors_max_age")]
    pub max_age_secs: usize,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default = "default_log_file")]
    pub file: Option<String>,
    #[serde(default = "default_max_backups")]
    pub max_backups: usize,
    #[serde(default = "default_enable_rotation")]
    pub enable_rotation: bool,
}

// ============================================================
// Default value functions
// ============================================================

fn default_server_host() -> String {
    "127.0.0.1".to_string()
}

fn default_server_port() -> u16 {
    3001
}

fn default_workers() -> usize {
    num_cpus::get()
}

fn default_database_url() -> String {
    "sqlite://tinylink.db?mode=rwc".to_string()
}

fn default_database_pool_size() -> u32 {
    10
}

fn default_connect_timeout_secs() -> u64 {
    8
}

fn default_base_url() -> String {
    "http://localhost:3001".to_string()
}

fn default_code_length() -> usize {
    MIN_CODE_LENGTH
}

fn default_max_generate_attempts() -> u32 {
    5
}

fn default_cors_max_age() -> usize {
    3600
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_log_file() -> Option<String> {
    None
}

fn default_max_backups() -> usize {
    5
}

fn default_enable_rotation() -> bool {
    true
}

// ============================================================
// Default implementations
// ============================================================

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
            workers: default_workers(),
            expose_error_details: false,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
            pool_size: default_database_pool_size(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

impl Default for LinksConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            code_length: default_code_length(),
            max_generate_attempts: default_max_generate_attempts(),
        }
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: Vec::new(),
            max_age_secs: default_cors_max_age(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: default_log_file(),
            max_backups: default_max_backups(),
            enable_rotation: default_enable_rotation(),
        }
    }
}
