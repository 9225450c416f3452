//! tinylink - A small URL shortener service
//!
//! Clients submit a long URL and get back a short code; visiting the code
//! redirects to the original URL and counts the click.
//!
//! # Architecture
//! - `services`: code allocation and the link service
//! - `storage`: `LinkStore` trait and the SeaORM backend
//! - `api`: HTTP handlers and middleware
//! - `config`: configuration loading
//! - `runtime`: application lifecycle and execution modes
//! - `system`: logging setup

pub mod api;
pub mod cli;
pub mod config;
pub mod errors;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod system;
pub mod utils;
