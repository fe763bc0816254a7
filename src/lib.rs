// lib.rs - Main library file that exports all modules
pub mod chat;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod repo;
pub mod services;
pub mod views;

use std::sync::Arc;

// Re-export commonly used types for convenience
pub use config::{AppConfig, ChatConfig};
pub use error::{CatalogError, ValidationErrors};
pub use models::{
    Asset, AssetInput, AssetWithDomain, ChatMessage, Domain, DomainInput, MessageRole,
};
pub use repo::CatalogRepo;
pub use services::{CatalogEvent, CatalogEvents, CatalogService, ChangeKind};
pub use views::{AssetView, CatalogResource, DomainView, ResourceView, ViewAction};

/// Shared state handed to every handler through an `Extension` layer.
pub struct AppState {
    pub db_pool: sqlx::SqlitePool,
    pub catalog: Arc<CatalogService>,
    pub config: AppConfig,
}
