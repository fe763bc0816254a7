// src/handlers/mod.rs
pub mod assets;
pub mod domains;
pub mod live;
pub mod search;

use axum::{http::StatusCode, response::Json, Router};
use serde::Serialize;

use crate::error::{CatalogError, ValidationErrors};

/// JSON error body shared by every endpoint.
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<ValidationErrors>,
}

/// Uniform mapping from catalog failures to HTTP: missing record is 404,
/// rejected input is 422 with the field-keyed error set, anything from the
/// store is a logged 500.
pub fn catalog_error_response(err: CatalogError) -> (StatusCode, Json<ApiError>) {
    match err {
        CatalogError::NotFound { .. } => (
            StatusCode::NOT_FOUND,
            Json(ApiError {
                success: false,
                message: err.to_string(),
                errors: None,
            }),
        ),
        CatalogError::Validation(errors) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ApiError {
                success: false,
                message: "validation failed".to_string(),
                errors: Some(errors),
            }),
        ),
        CatalogError::Database(err) => {
            tracing::error!("database failure: {}", err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiError {
                    success: false,
                    message: "internal server error".to_string(),
                    errors: None,
                }),
            )
        }
    }
}

/// Every route the service exposes.
pub fn routes() -> Router {
    Router::new()
        .merge(domains::domain_routes())
        .merge(assets::asset_routes())
        .merge(search::search_routes())
        .merge(live::live_routes())
}
