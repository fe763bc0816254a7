// src/handlers/domains.rs
//! REST surface for domains

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::handlers::{catalog_error_response, ApiError};
use crate::models::{Domain, DomainInput};
use crate::AppState;

/// GET /api/domains - All domains in insertion order
pub async fn list_domains(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Json<Vec<Domain>>, (StatusCode, Json<ApiError>)> {
    let domains = state
        .catalog
        .list_domains()
        .await
        .map_err(catalog_error_response)?;
    Ok(Json(domains))
}

/// GET /api/domains/:id
pub async fn get_domain(
    Path(id): Path<i64>,
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Json<Domain>, (StatusCode, Json<ApiError>)> {
    let domain = state
        .catalog
        .get_domain(id)
        .await
        .map_err(catalog_error_response)?;
    Ok(Json(domain))
}

/// POST /api/domains - Create, 201 with the persisted record
pub async fn create_domain(
    Extension(state): Extension<Arc<AppState>>,
    Json(input): Json<DomainInput>,
) -> Result<(StatusCode, Json<Domain>), (StatusCode, Json<ApiError>)> {
    let domain = state
        .catalog
        .create_domain(&input)
        .await
        .map_err(catalog_error_response)?;
    Ok((StatusCode::CREATED, Json(domain)))
}

/// POST /api/domains/validate - Changeset preview, never persists
pub async fn validate_domain(
    Extension(state): Extension<Arc<AppState>>,
    Json(input): Json<DomainInput>,
) -> Json<Value> {
    match state.catalog.change_domain(&input) {
        Ok(_) => Json(json!({ "valid": true, "errors": {} })),
        Err(errors) => Json(json!({ "valid": false, "errors": errors })),
    }
}

/// PUT /api/domains/:id
pub async fn update_domain(
    Path(id): Path<i64>,
    Extension(state): Extension<Arc<AppState>>,
    Json(input): Json<DomainInput>,
) -> Result<Json<Domain>, (StatusCode, Json<ApiError>)> {
    let domain = state
        .catalog
        .update_domain(id, &input)
        .await
        .map_err(catalog_error_response)?;
    Ok(Json(domain))
}

/// DELETE /api/domains/:id - Returns the removed record
pub async fn delete_domain(
    Path(id): Path<i64>,
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Json<Domain>, (StatusCode, Json<ApiError>)> {
    let domain = state
        .catalog
        .delete_domain(id)
        .await
        .map_err(catalog_error_response)?;
    Ok(Json(domain))
}

/// Routes for domain management
pub fn domain_routes() -> Router {
    Router::new()
        .route("/api/domains", get(list_domains).post(create_domain))
        .route("/api/domains/validate", post(validate_domain))
        .route(
            "/api/domains/:id",
            get(get_domain).put(update_domain).delete(delete_domain),
        )
}
