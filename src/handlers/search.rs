// src/handlers/search.rs
//! Health probe and the metadata-search endpoint the chat front-end consumes

use axum::{
    extract::{Extension, Query},
    http::{HeaderMap, StatusCode},
    response::Json,
    routing::get,
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::chat::QueryResponse;
use crate::handlers::{catalog_error_response, ApiError};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct QueryParams {
    q: Option<String>,
}

/// GET /api/health
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// GET /api/query?q=<text> - Keyword search over asset titles and domain
/// names, guarded by `x-api-key` when a key is configured.
pub async fn query(
    Query(params): Query<QueryParams>,
    headers: HeaderMap,
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Json<QueryResponse>, (StatusCode, Json<ApiError>)> {
    let configured = state.config.api_key.as_str();
    if !configured.is_empty() {
        let presented = headers
            .get("x-api-key")
            .and_then(|value| value.to_str().ok())
            .unwrap_or("");
        if presented != configured {
            tracing::warn!("query rejected: bad or missing x-api-key");
            return Err((
                StatusCode::UNAUTHORIZED,
                Json(ApiError {
                    success: false,
                    message: "invalid API key".to_string(),
                    errors: None,
                }),
            ));
        }
    }

    let q = params.q.unwrap_or_default();
    let needle = q.to_lowercase();
    let rows = state
        .catalog
        .list_assets_with_domains()
        .await
        .map_err(catalog_error_response)?;
    let matches: Vec<_> = rows
        .into_iter()
        .filter(|row| {
            row.asset.title.to_lowercase().contains(&needle)
                || row
                    .domain
                    .as_ref()
                    .map(|domain| domain.name.to_lowercase().contains(&needle))
                    .unwrap_or(false)
        })
        .collect();

    let response = if matches.is_empty() {
        format!("No catalog entries match \"{}\".", q)
    } else {
        format!(
            "Found {} matching catalog entries for \"{}\".",
            matches.len(),
            q
        )
    };
    Ok(Json(QueryResponse {
        query: q,
        response,
        data: Some(json!(matches)),
    }))
}

/// Routes for health and search
pub fn search_routes() -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/query", get(query))
}
