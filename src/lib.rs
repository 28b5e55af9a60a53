//! Biblios Library Catalog Server
//!
//! A Rust implementation of a library-catalog service managing books and
//! users, providing a REST JSON API with pagination, validation and a
//! lending workflow that issues and returns book copies against an
//! availability counter.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
