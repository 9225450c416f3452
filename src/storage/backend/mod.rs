//! SeaORM storage backend
//!
//! This module provides database storage using SeaORM,
//! supporting SQLite, MySQL/MariaDB, and PostgreSQL.

mod connection;
mod converters;
mod mutations;
mod query;

use async_trait::async_trait;
use sea_orm::DatabaseConnection;
use tracing::{info, warn};

use crate::config::DatabaseConfig;
use crate::errors::{Result, TinylinkError};
use crate::storage::{Link, LinkStore};

pub use connection::{connect_generic, connect_sqlite, run_migrations};
pub use converters::{model_to_link, new_link_active_model};

/// 从数据库 URL 推断数据库类型
pub fn infer_backend_from_url(database_url: &str) -> Result<String> {
    if database_url.starts_with("sqlite:")
        || database_url.ends_with(".db")
        || database_url.ends_with(".sqlite")
        || database_url == ":memory:"
    {
        Ok("sqlite".to_string())
    } else if database_url.starts_with("mysql://") || database_url.starts_with("mariadb://") {
        Ok("mysql".to_string())
    } else if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        Ok("postgres".to_string())
    } else {
        Err(TinylinkError::database_config(format!(
            "Cannot infer database type from URL: {}. Supported: sqlite://, mysql://, mariadb://, postgres://",
            database_url
        )))
    }
}

/// 规范化 backend 名称
pub fn normalize_backend_name(backend: &str) -> String {
    match backend {
        "mariadb" => "mysql".to_string(),
        "postgresql" => "postgres".to_string(),
        other => other.to_string(),
    }
}

/// SeaORM-based storage backend
#[derive(Clone)]
pub struct SeaOrmStorage {
    db: DatabaseConnection,
    backend_name: String,
}

impl SeaOrmStorage {
    pub async fn new(config: &DatabaseConfig, backend_name: &str) -> Result<Self> {
        let database_url = config.database_url.as_str();
        if database_url.is_empty() {
            return Err(TinylinkError::database_config("database_url is not set"));
        }

        let backend_name = normalize_backend_name(backend_name);

        // 根据不同数据库类型配置连接选项
        let db = if backend_name == "sqlite" {
            connect_sqlite(database_url, config.pool_size, config.connect_timeout_secs).await?
        } else {
            connect_generic(
                database_url,
                &backend_name,
                config.pool_size,
                config.connect_timeout_secs,
            )
            .await?
        };

        // 运行迁移
        run_migrations(&db).await?;

        info!("{} storage initialized", backend_name.to_uppercase());
        Ok(SeaOrmStorage { db, backend_name })
    }

    /// 获取数据库连接
    pub fn get_db(&self) -> &DatabaseConnection {
        &self.db
    }
}

#[async_trait]
impl LinkStore for SeaOrmStorage {
    async fn insert(&self, code: &str, original_url: &str) -> Result<Link> {
        self.insert_link(code, original_url).await
    }

    async fn list_all(&self) -> Result<Vec<Link>> {
        self.load_all().await
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Link>> {
        self.get(code).await
    }

    async fn delete_by_code(&self, code: &str) -> Result<Option<Link>> {
        self.remove(code).await
    }

    async fn increment_click_and_get_target(&self, code: &str) -> Result<Option<String>> {
        self.increment_click(code).await
    }

    async fn exists_by_code(&self, code: &str) -> Result<bool> {
        self.exists(code).await
    }

    async fn count(&self) -> Result<u64> {
        self.count_links().await
    }

    async fn ping(&self) -> Result<()> {
        self.db.ping().await.map_err(TinylinkError::from)
    }

    async fn close(&self) -> Result<()> {
        if let Err(e) = self.db.clone().close().await {
            warn!("Failed to close {} pool: {}", self.backend_name, e);
            return Err(e.into());
        }
        info!("{} connection pool closed", self.backend_name.to_uppercase());
        Ok(())
    }

    fn backend_name(&self) -> &str {
        &self.backend_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_backend_from_url() {
        assert_eq!(infer_backend_from_url("sqlite://links.db").unwrap(), "sqlite");
        assert_eq!(infer_backend_from_url("sqlite::memory:").unwrap(), "sqlite");
        assert_eq!(infer_backend_from_url("data/links.db").unwrap(), "sqlite");
        assert_eq!(infer_backend_from_url("mysql://u:p@h/db").unwrap(), "mysql");
        assert_eq!(infer_backend_from_url("mariadb://u:p@h/db").unwrap(), "mysql");
        assert_eq!(
            infer_backend_from_url("postgresql://u:p@h/db").unwrap(),
            "postgres"
        );
    }

    #[test]
    fn test_infer_backend_rejects_unknown_scheme() {
        let err = infer_backend_from_url("mongodb://localhost").unwrap_err();
        assert!(matches!(err, TinylinkError::DatabaseConfig(_)));
    }

    #[test]
    fn test_normalize_backend_name() {
        assert_eq!(normalize_backend_name("mariadb"), "mysql");
        assert_eq!(normalize_backend_name("postgresql"), "postgres");
        assert_eq!(normalize_backend_name("sqlite"), "sqlite");
    }
}
