//! HTTP layer
//!
//! Thin actix-web glue around `LinkService`: request/response types,
//! error mapping, middleware and route tables.

pub mod helpers;
pub mod middleware;
pub mod services;
pub mod types;

pub use helpers::{error_response, json_config, not_found_handler};
