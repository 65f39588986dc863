//! Whole-catalog handlers

use axum::Json;
use axum::extract::State;
use axum::response::IntoResponse;

use crate::infra::http::api::error::ApiError;
use crate::infra::http::api::state::ApiState;

use super::catalog_to_api;

pub async fn get_tree(State(state): State<ApiState>) -> Result<impl IntoResponse, ApiError> {
    let tree = state.catalog.tree().await.map_err(catalog_to_api)?;
    Ok(Json(tree))
}

pub async fn clear_catalog(State(state): State<ApiState>) -> Result<impl IntoResponse, ApiError> {
    let outcome = state.catalog.clear().await.map_err(catalog_to_api)?;
    Ok(Json(outcome))
}
