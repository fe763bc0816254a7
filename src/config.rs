// src/config.rs
use std::env;

/// Server-side configuration, read once at startup. `DATACAT_API_KEY` doubles
/// as the key the query endpoint expects in `x-api-key`; when it is empty the
/// endpoint is open.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_addr: String,
    pub api_key: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:datacat.db?mode=rwc".to_string()),
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
            api_key: env::var("DATACAT_API_KEY").unwrap_or_default(),
        }
    }
}

/// Chat front-end configuration. The fallbacks are deliberate: a relative
/// `/api` base (for deployments that proxy the query API next to the UI) and
/// an empty key.
#[derive(Debug, Clone)]
pub struct ChatConfig {
    pub base_url: String,
    pub api_key: String,
}

impl ChatConfig {
    pub fn from_env() -> Self {
        Self {
            base_url: env::var("DATACAT_API_BASE_URL").unwrap_or_else(|_| "/api".to_string()),
            api_key: env::var("DATACAT_API_KEY").unwrap_or_default(),
        }
    }
}
