// src/handlers/assets.rs
//! REST surface for assets

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
use crate::models::{Asset, AssetInput, AssetWithDomain};
use crate::AppState;

/// GET /api/assets - All assets in insertion order
pub async fn list_assets(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Json<Vec<Asset>>, (StatusCode, Json<ApiError>)> {
    let assets = state
        .catalog
        .list_assets()
        .await
        .map_err(catalog_error_response)?;
    Ok(Json(assets))
}

/// GET /api/assets/with-domains - Assets joined to their domain, if any
pub async fn list_assets_with_domains(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Json<Vec<AssetWithDomain>>, (StatusCode, Json<ApiError>)> {
    let rows = state
        .catalog
        .list_assets_with_domains()
        .await
        .map_err(catalog_error_response)?;
    Ok(Json(rows))
}

/// GET /api/assets/:id
pub async fn get_asset(
    Path(id): Path<i64>,
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Json<Asset>, (StatusCode, Json<ApiError>)> {
    let asset = state
        .catalog
        .get_asset(id)
        .await
        .map_err(catalog_error_response)?;
    Ok(Json(asset))
}

/// POST /api/assets - Create, 201 with the persisted record
pub async fn create_asset(
    Extension(state): Extension<Arc<AppState>>,
    Json(input): Json<AssetInput>,
) -> Result<(StatusCode, Json<Asset>), (StatusCode, Json<ApiError>)> {
    let asset = state
        .catalog
        .create_asset(&input)
        .await
        .map_err(catalog_error_response)?;
    Ok((StatusCode::CREATED, Json(asset)))
}

/// POST /api/assets/validate - Changeset preview, never persists
pub async fn validate_asset(
    Extension(state): Extension<Arc<AppState>>,
    Json(input): Json<AssetInput>,
) -> Json<Value> {
    match state.catalog.change_asset(&input) {
        Ok(_) => Json(json!({ "valid": true, "errors": {} })),
        Err(errors) => Json(json!({ "valid": false, "errors": errors })),
    }
}

/// PUT /api/assets/:id
pub async fn update_asset(
    Path(id): Path<i64>,
    Extension(state): Extension<Arc<AppState>>,
    Json(input): Json<AssetInput>,
) -> Result<Json<Asset>, (StatusCode, Json<ApiError>)> {
    let asset = state
        .catalog
        .update_asset(id, &input)
        .await
        .map_err(catalog_error_response)?;
    Ok(Json(asset))
}

/// DELETE /api/assets/:id - Returns the removed record
pub async fn delete_asset(
    Path(id): Path<i64>,
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Json<Asset>, (StatusCode, Json<ApiError>)> {
    let asset = state
        .catalog
        .delete_asset(id)
        .await
        .map_err(catalog_error_response)?;
    Ok(Json(asset))
}

/// Routes for asset management
pub fn asset_routes() -> Router {
    Router::new()
        .route("/api/assets", get(list_assets).post(create_asset))
        .route("/api/assets/with-domains", get(list_assets_with_domains))
        .route("/api/assets/validate", post(validate_asset))
        .route(
            "/api/assets/:id",
            get(get_asset).put(update_asset).delete(delete_asset),
        )
}
