use std::sync::Arc;

use async_trait::async_trait;

use crate::config::DatabaseConfig;
use crate::errors::Result;

pub mod backend;
pub mod models;

pub use backend::SeaOrmStorage;
pub use models::Link;

/// 短链接存储接口
///
/// 唯一性由数据库约束保证：`insert` 遇到重复 code 返回
/// `TinylinkError::DuplicateCode`，其余数据库错误均为 `StorageUnavailable`。
#[async_trait]
pub trait LinkStore: Send + Sync {
    /// 单条 INSERT，不做事先查询
    async fn insert(&self, code: &str, original_url: &str) -> Result<Link>;

    /// 按创建时间倒序返回全部链接
    async fn list_all(&self) -> Result<Vec<Link>>;

    async fn find_by_code(&self, code: &str) -> Result<Option<Link>>;

    /// 删除并返回被删除的记录
    async fn delete_by_code(&self, code: &str) -> Result<Option<Link>>;

    /// 原子地 clicks + 1、更新 last_clicked，并返回目标地址
    async fn increment_click_and_get_target(&self, code: &str) -> Result<Option<String>>;

    /// 仅作提示用途，不能代替唯一约束
    async fn exists_by_code(&self, code: &str) -> Result<bool>;

    async fn count(&self) -> Result<u64>;

    async fn ping(&self) -> Result<()>;

    async fn close(&self) -> Result<()>;

    fn backend_name(&self) -> &str;
}

pub struct StorageFactory;

impl StorageFactory {
    pub async fn create(config: &DatabaseConfig) -> Result<Arc<SeaOrmStorage>> {
        // 从 URL 自动推断数据库类型
        let backend_type = backend::infer_backend_from_url(&config.database_url)?;

        let storage = SeaOrmStorage::new(config, &backend_type).await?;
        Ok(Arc::new(storage))
    }
}
