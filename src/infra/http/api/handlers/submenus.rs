//! Submenu handlers
//!
//! Reads and writes address a submenu by its own id; the enclosing menu id only
//! scopes listing and creation.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use carta_api_types::{SubmenuCreateRequest, SubmenuPatchRequest};

use crate::application::submenus::{CreateSubmenuCommand, UpdateSubmenuCommand};
use crate::infra::http::api::error::ApiError;
use crate::infra::http::api::state::ApiState;

use super::{catalog_to_api, path_id};

pub async fn list_submenus(
    State(state): State<ApiState>,
    Path(menu_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let menu_id = path_id(&menu_id)?;
    let submenus = state
        .submenus
        .list(menu_id)
        .await
        .map_err(catalog_to_api)?;
    Ok(Json(submenus))
}

pub async fn get_submenu(
    State(state): State<ApiState>,
    Path((_menu_id, submenu_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, ApiError> {
    let id = path_id(&submenu_id)?;
    let submenu = state.submenus.get(id).await.map_err(catalog_to_api)?;
    Ok(Json(submenu))
}

pub async fn create_submenu(
    State(state): State<ApiState>,
    Path(menu_id): Path<String>,
    payload: Result<Json<SubmenuCreateRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let menu_id = path_id(&menu_id)?;
    let Json(payload) = payload?;
    let command = CreateSubmenuCommand {
        menu_id,
        title: payload.title,
        description: payload.description,
    };

    let submenu = state
        .submenus
        .create(command)
        .await
        .map_err(catalog_to_api)?;
    Ok((StatusCode::CREATED, Json(submenu)))
}

pub async fn update_submenu(
    State(state): State<ApiState>,
    Path((_menu_id, submenu_id)): Path<(String, String)>,
    payload: Result<Json<SubmenuPatchRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let id = path_id(&submenu_id)?;
    let Json(payload) = payload?;
    let command = UpdateSubmenuCommand {
        id,
        title: payload.title,
        description: payload.description,
    };

    let submenu = state
        .submenus
        .update(command)
        .await
        .map_err(catalog_to_api)?;
    Ok(Json(submenu))
}

pub async fn delete_submenu(
    State(state): State<ApiState>,
    Path((_menu_id, submenu_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, ApiError> {
    let id = path_id(&submenu_id)?;
    let outcome = state.submenus.delete(id).await.map_err(catalog_to_api)?;
    Ok(Json(outcome))
}
