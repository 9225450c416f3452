//! Mutation operations for SeaOrmStorage
//!
//! This module contains all write database operations.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, ExprTrait, QueryFilter,
    TransactionTrait, sea_query::Expr,
};
use tracing::{error, info, trace};

use super::SeaOrmStorage;
use super::converters::{model_to_link, new_link_active_model};
use crate::errors::{Result, TinylinkError};
use crate::storage::Link;

use migration::entities::link;

/// 记录数据库错误，唯一约束冲突除外
fn log_db_error(op: &str, code: &str, err: TinylinkError) -> TinylinkError {
    if !matches!(err, TinylinkError::DuplicateCode(_)) {
        error!("{}('{}') failed: {}", op, code, err.message());
    }
    err
}

impl SeaOrmStorage {
    pub async fn insert_link(&self, code: &str, original_url: &str) -> Result<Link> {
        let model = new_link_active_model(code, original_url, Utc::now())
            .insert(&self.db)
            .await
            .map_err(|e| log_db_error("insert", code, e.into()))?;

        info!("Link inserted: {}", code);
        Ok(model_to_link(model))
    }

    /// 删除并返回被删除的行
    ///
    /// 并发删除同一 code 时只有一个调用者拿到 `Some`
    pub async fn remove(&self, code: &str) -> Result<Option<Link>> {
        let delete = link::Entity::delete_many().filter(link::Column::Code.eq(code));

        if self.db.get_database_backend().support_returning() {
            let deleted = delete
                .exec_with_returning(&self.db)
                .await
                .map_err(|e| log_db_error("remove", code, e.into()))?;
            let Some(model) = deleted.into_iter().next() else {
                return Ok(None);
            };
            info!("Link deleted: {}", code);
            return Ok(Some(model_to_link(model)));
        }

        // 不支持 RETURNING：先读出整行，再以 DELETE 的影响行数判定归属
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| log_db_error("remove", code, e.into()))?;

        let model = link::Entity::find()
            .filter(link::Column::Code.eq(code))
            .one(&txn)
            .await
            .map_err(|e| log_db_error("remove", code, e.into()))?;

        let result = delete
            .exec(&txn)
            .await
            .map_err(|e| log_db_error("remove", code, e.into()))?;

        let Some(model) = model.filter(|_| result.rows_affected > 0) else {
            txn.rollback()
                .await
                .map_err(|e| log_db_error("remove", code, e.into()))?;
            return Ok(None);
        };

        txn.commit()
            .await
            .map_err(|e| log_db_error("remove", code, e.into()))?;

        info!("Link deleted: {}", code);
        Ok(Some(model_to_link(model)))
    }

    /// 单条 UPDATE 完成计数，支持 RETURNING 的数据库一并取回目标地址
    pub async fn increment_click(&self, code: &str) -> Result<Option<String>> {
        let update = link::Entity::update_many()
            .col_expr(
                link::Column::Clicks,
                Expr::col(link::Column::Clicks).add(Expr::val(1)),
            )
            // 使用数据库时钟，保证最后提交的点击时间最新
            .col_expr(link::Column::LastClicked, Expr::current_timestamp())
            .filter(link::Column::Code.eq(code));

        if self.db.get_database_backend().support_returning() {
            let models = update
                .exec_with_returning(&self.db)
                .await
                .map_err(|e| log_db_error("increment_click", code, e.into()))?;
            trace!("Click recorded for '{}' via RETURNING", code);
            return Ok(models.into_iter().next().map(|m| m.original_url));
        }

        // 不支持 RETURNING（MySQL 等）：UPDATE 与读取放在同一事务
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| log_db_error("increment_click", code, e.into()))?;

        let result = update
            .exec(&txn)
            .await
            .map_err(|e| log_db_error("increment_click", code, e.into()))?;

        if result.rows_affected == 0 {
            txn.rollback()
                .await
                .map_err(|e| log_db_error("increment_click", code, e.into()))?;
            return Ok(None);
        }

        let target = link::Entity::find()
            .filter(link::Column::Code.eq(code))
            .one(&txn)
            .await
            .map_err(|e| log_db_error("increment_click", code, e.into()))?
            .map(|m| m.original_url);

        txn.commit()
            .await
            .map_err(|e| log_db_error("increment_click", code, e.into()))?;

        trace!("Click recorded for '{}' in transaction", code);
        Ok(target)
    }
}
