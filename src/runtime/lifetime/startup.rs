use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::config::StaticConfig;
use crate::services::LinkService;
use crate::storage::{LinkStore, StorageFactory};

pub struct StartupContext {
    pub storage: Arc<dyn LinkStore>,
    pub link_service: Arc<LinkService>,
}

/// 准备服务器启动的上下文：连接池、迁移、服务层
pub async fn prepare_server_startup(config: &StaticConfig) -> Result<StartupContext> {
    let start_time = std::time::Instant::now();
    debug!("Starting pre-startup processing...");

    let storage: Arc<dyn LinkStore> = StorageFactory::create(&config.database)
        .await
        .context("Failed to create storage backend")?;
    info!("Using storage backend: {}", storage.backend_name());

    let existing = storage
        .count()
        .await
        .context("Failed to read link count")?;
    info!("{} links in store", existing);

    let link_service = Arc::new(LinkService::new(storage.clone(), &config.links));
    info!(
        "Link service ready (code length {}, base url {})",
        config.links.code_length, config.links.base_url
    );

    debug!("Pre-startup processing took {:?}", start_time.elapsed());
    Ok(StartupContext {
        storage,
        link_service,
    })
}
