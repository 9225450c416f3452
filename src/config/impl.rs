use std::sync::{Arc, OnceLock};

use super::StaticConfig;
use crate::errors::Result;

static CONFIG: OnceLock<Arc<StaticConfig>> = OnceLock::new();

/// Get the global configuration instance
///
/// Panics if called before `init_config()`; startup always initializes it
/// before any component reads it.
pub fn get_config() -> Arc<StaticConfig> {
    CONFIG
        .get()
        .cloned()
        .expect("Config not initialized. Call init_config() first.")
}

/// Like `get_config`, but returns `None` before initialization.
pub fn try_get_config() -> Option<Arc<StaticConfig>> {
    CONFIG.get().cloned()
}

/// Initialize the global configuration
///
/// Loads configuration from `path` (default "config.toml"), environment
/// variables and the legacy `PORT` / `DATABASE_URL` / `BASE_URL` overrides.
/// A second call keeps the first configuration.
///
/// # Examples
/// ```no_run
/// use tinylink::config::init_config;
/// init_config(None).unwrap();
/// ```
pub fn init_config(path: Option<&str>) -> Result<Arc<StaticConfig>> {
    if let Some(existing) = CONFIG.get() {
        return Ok(existing.clone());
    }
    let loaded = Arc::new(StaticConfig::load(path)?);
    Ok(CONFIG.get_or_init(|| loaded).clone())
}
