// src/chat/client.rs
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::config::ChatConfig;

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("Invalid API key. Please check your configuration.")]
    InvalidApiKey,
    #[error("API error: {status} {status_text}")]
    Api { status: u16, status_text: String },
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResponse {
    pub query: String,
    pub response: String,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

/// Client for the metadata-search API the chat front-end talks to.
#[derive(Debug, Clone)]
pub struct QueryApiClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl QueryApiClient {
    pub fn new(base_url: String, api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url,
        }
    }

    pub fn from_config(config: &ChatConfig) -> Self {
        Self::new(config.base_url.clone(), config.api_key.clone())
    }

    /// One probe against `GET {base}/health`; any non-2xx is a hard failure
    /// and nothing retries it.
    pub async fn health(&self) -> Result<HealthResponse, ChatError> {
        let response = self
            .client
            .get(format!("{}/health", self.base_url))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(api_error(response.status()));
        }
        Ok(response.json::<HealthResponse>().await?)
    }

    /// `GET {base}/query?q=<message>` with the `x-api-key` header.
    pub async fn query(&self, message: &str) -> Result<QueryResponse, ChatError> {
        info!("🔍 Querying catalog metadata: '{}'", message);
        let response = self
            .client
            .get(format!("{}/query", self.base_url))
            .header("x-api-key", &self.api_key)
            .query(&[("q", message)])
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => {
                let reply = response.json::<QueryResponse>().await?;
                info!("✅ Search API answered: '{}'", message);
                Ok(reply)
            }
            StatusCode::UNAUTHORIZED => Err(ChatError::InvalidApiKey),
            status => Err(api_error(status)),
        }
    }
}

fn api_error(status: StatusCode) -> ChatError {
    ChatError::Api {
        status: status.as_u16(),
        status_text: status
            .canonical_reason()
            .unwrap_or("Unknown Error")
            .to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_errors_display_the_exact_configured_text() {
        assert_eq!(
            ChatError::InvalidApiKey.to_string(),
            "Invalid API key. Please check your configuration."
        );
    }

    #[test]
    fn api_errors_display_status_and_reason() {
        assert_eq!(
            api_error(StatusCode::INTERNAL_SERVER_ERROR).to_string(),
            "API error: 500 Internal Server Error"
        );
        assert_eq!(
            api_error(StatusCode::SERVICE_UNAVAILABLE).to_string(),
            "API error: 503 Service Unavailable"
        );
    }
}
