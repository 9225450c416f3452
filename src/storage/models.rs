use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 一条短链接记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    pub code: String,
    pub original_url: String,
    pub clicks: u64,
    pub created_at: DateTime<Utc>,
    pub last_clicked: Option<DateTime<Utc>>,
}
