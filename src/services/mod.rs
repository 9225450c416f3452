//! Service layer for business logic
//!
//! Combines the code allocator with the link store; HTTP handlers only
//! talk to `LinkService`.

mod code_allocator;
mod link_service;

pub use code_allocator::*;
pub use link_service::*;
