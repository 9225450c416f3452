//! Query operations for SeaOrmStorage
//!
//! This module contains all read-only database operations.

use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder};
use tracing::{debug, error, trace};

use super::SeaOrmStorage;
use super::converters::model_to_link;
use crate::errors::{Result, TinylinkError};
use crate::storage::Link;

use migration::entities::link;

impl SeaOrmStorage {
    pub async fn get(&self, code: &str) -> Result<Option<Link>> {
        let model = link::Entity::find()
            .filter(link::Column::Code.eq(code))
            .one(&self.db)
            .await
            .map_err(|e| {
                error!("Failed to query link '{}': {}", code, e);
                TinylinkError::from(e)
            })?;

        trace!("Lookup '{}': found={}", code, model.is_some());
        Ok(model.map(model_to_link))
    }

    pub async fn load_all(&self) -> Result<Vec<Link>> {
        let models = link::Entity::find()
            .order_by_desc(link::Column::CreatedAt)
            .order_by_desc(link::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| {
                error!("Failed to load links: {}", e);
                TinylinkError::from(e)
            })?;

        debug!("Loaded {} links", models.len());
        Ok(models.into_iter().map(model_to_link).collect())
    }

    pub async fn exists(&self, code: &str) -> Result<bool> {
        let count = link::Entity::find()
            .filter(link::Column::Code.eq(code))
            .count(&self.db)
            .await
            .map_err(|e| {
                error!("Failed to check existence of '{}': {}", code, e);
                TinylinkError::from(e)
            })?;
        Ok(count > 0)
    }

    pub async fn count_links(&self) -> Result<u64> {
        link::Entity::find().count(&self.db).await.map_err(|e| {
            error!("Failed to count links: {}", e);
            TinylinkError::from(e)
        })
    }
}
