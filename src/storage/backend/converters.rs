use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::{NotSet, Set};

use crate::storage::Link;
use migration::entities::link;

/// 将 Sea-ORM Model 转换为 Link
pub fn model_to_link(model: link::Model) -> Link {
    Link {
        code: model.code,
        original_url: model.original_url,
        clicks: model.clicks.max(0) as u64,
        created_at: model.created_at,
        last_clicked: model.last_clicked,
    }
}

/// 构造新链接的 ActiveModel，id 交给数据库自增
pub fn new_link_active_model(
    code: &str,
    original_url: &str,
    created_at: DateTime<Utc>,
) -> link::ActiveModel {
    link::ActiveModel {
        id: NotSet,
        code: Set(code.to_string()),
        original_url: Set(original_url.to_string()),
        clicks: Set(0),
        created_at: Set(created_at),
        last_clicked: Set(None),
    }
}
