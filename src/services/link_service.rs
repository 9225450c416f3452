//! Link management service
//!
//! Business logic for creating, reading, deleting and resolving links.
//! Uniqueness of codes is left to the store; this layer turns store-level
//! conflicts into domain errors.

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::code_allocator::CodeAllocator;
use crate::config::LinksConfig;
use crate::errors::{Result, TinylinkError};
use crate::storage::{Link, LinkStore};
use crate::utils::{is_reserved_code, is_valid_short_code, validate_url};

// ============ Request DTOs ============

/// Request to create a new link
#[derive(Debug, Clone)]
pub struct CreateLinkRequest {
    /// Destination URL
    pub original_url: String,
    /// Caller-supplied code (generated if absent)
    pub custom_code: Option<String>,
}

impl CreateLinkRequest {
    pub fn new(original_url: impl Into<String>, custom_code: Option<String>) -> Self {
        Self {
            original_url: original_url.into(),
            custom_code,
        }
    }
}

// ============ LinkService ============

pub struct LinkService {
    store: Arc<dyn LinkStore>,
    allocator: CodeAllocator,
    base_url: String,
    max_generate_attempts: u32,
}

impl LinkService {
    pub fn new(store: Arc<dyn LinkStore>, config: &LinksConfig) -> Self {
        Self {
            store,
            allocator: CodeAllocator::new(config.code_length),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            max_generate_attempts: config.max_generate_attempts.max(1),
        }
    }

    pub fn store(&self) -> &Arc<dyn LinkStore> {
        &self.store
    }

    /// Create a link, generating a code when none is supplied
    pub async fn create_link(&self, req: CreateLinkRequest) -> Result<Link> {
        let original_url = validate_url(&req.original_url)
            .map_err(|e| TinylinkError::invalid_input(e.to_string()))?;

        match req.custom_code {
            Some(code) if !is_valid_short_code(&code) => Err(TinylinkError::invalid_input(
                format!("Invalid custom code '{}'. Use 6-8 letters or digits.", code),
            )),
            Some(code) => self.create_with_custom_code(&code, original_url).await,
            None => self.create_with_generated_code(original_url).await,
        }
    }

    async fn create_with_custom_code(&self, code: &str, original_url: &str) -> Result<Link> {
        if is_reserved_code(code) {
            return Err(TinylinkError::code_conflict(format!(
                "Code '{}' is reserved by a built-in route",
                code
            )));
        }

        // 提前检查只为给出友好错误，真正的保证来自唯一约束
        if self.store.exists_by_code(code).await? {
            return Err(Self::conflict(code));
        }

        let allocated = self.allocator.allocate(Some(code));
        match self.store.insert(&allocated.code, original_url).await {
            Ok(link) => {
                info!("LinkService: created link '{}' -> '{}'", link.code, link.original_url);
                Ok(link)
            }
            Err(TinylinkError::DuplicateCode(_)) => Err(Self::conflict(code)),
            Err(e) => Err(e),
        }
    }

    async fn create_with_generated_code(&self, original_url: &str) -> Result<Link> {
        for attempt in 1..=self.max_generate_attempts {
            let allocated = self.allocator.allocate(None);
            match self.store.insert(&allocated.code, original_url).await {
                Ok(link) => {
                    info!(
                        "LinkService: created link '{}' -> '{}' (generated)",
                        link.code, link.original_url
                    );
                    return Ok(link);
                }
                Err(TinylinkError::DuplicateCode(_)) => {
                    warn!(
                        "LinkService: generated code '{}' collided (attempt {}/{})",
                        allocated.code, attempt, self.max_generate_attempts
                    );
                }
                Err(e) => return Err(e),
            }
        }

        Err(TinylinkError::code_conflict(format!(
            "Could not allocate a unique code after {} attempts",
            self.max_generate_attempts
        )))
    }

    pub async fn get_all_links(&self) -> Result<Vec<Link>> {
        let links = self.store.list_all().await?;
        debug!("LinkService: listed {} links", links.len());
        Ok(links)
    }

    pub async fn get_link_stats(&self, code: &str) -> Result<Link> {
        self.store
            .find_by_code(code)
            .await?
            .ok_or_else(|| Self::not_found(code))
    }

    pub async fn delete_link(&self, code: &str) -> Result<Link> {
        let deleted = self
            .store
            .delete_by_code(code)
            .await?
            .ok_or_else(|| Self::not_found(code))?;

        info!("LinkService: deleted link '{}'", code);
        Ok(deleted)
    }

    /// Count a click and return the destination
    pub async fn resolve_redirect(&self, code: &str) -> Result<String> {
        // 格式不合法的 code 不可能存在，直接返回 404
        if !is_valid_short_code(code) {
            debug!("LinkService: rejected malformed code '{}'", code);
            return Err(Self::not_found(code));
        }

        let target = self
            .store
            .increment_click_and_get_target(code)
            .await?
            .ok_or_else(|| Self::not_found(code))?;

        debug!("LinkService: redirect '{}' -> '{}'", code, target);
        Ok(target)
    }

    pub fn short_url(&self, code: &str) -> String {
        format!("{}/{}", self.base_url, code)
    }

    fn not_found(code: &str) -> TinylinkError {
        TinylinkError::not_found(format!("Link '{}' not found", code))
    }

    fn conflict(code: &str) -> TinylinkError {
        TinylinkError::code_conflict(format!("Code '{}' is already in use", code))
    }
}
