//! Menu handlers

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use carta_api_types::{MenuCreateRequest, MenuPatchRequest};

use crate::application::menus::{CreateMenuCommand, UpdateMenuCommand};
use crate::infra::http::api::error::ApiError;
use crate::infra::http::api::state::ApiState;

use super::{catalog_to_api, path_id};

pub async fn list_menus(State(state): State<ApiState>) -> Result<impl IntoResponse, ApiError> {
    let menus = state.menus.list().await.map_err(catalog_to_api)?;
    Ok(Json(menus))
}

pub async fn get_menu(
    State(state): State<ApiState>,
    Path(menu_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = path_id(&menu_id)?;
    let menu = state.menus.get(id).await.map_err(catalog_to_api)?;
    Ok(Json(menu))
}

pub async fn create_menu(
    State(state): State<ApiState>,
    payload: Result<Json<MenuCreateRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(payload) = payload?;
    let command = CreateMenuCommand {
        title: payload.title,
        description: payload.description,
    };

    let menu = state.menus.create(command).await.map_err(catalog_to_api)?;
    Ok((StatusCode::CREATED, Json(menu)))
}

pub async fn update_menu(
    State(state): State<ApiState>,
    Path(menu_id): Path<String>,
    payload: Result<Json<MenuPatchRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let id = path_id(&menu_id)?;
    let Json(payload) = payload?;
    let command = UpdateMenuCommand {
        id,
        title: payload.title,
        description: payload.description,
    };

    let menu = state.menus.update(command).await.map_err(catalog_to_api)?;
    Ok(Json(menu))
}

pub async fn delete_menu(
    State(state): State<ApiState>,
    Path(menu_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = path_id(&menu_id)?;
    let outcome = state.menus.delete(id).await.map_err(catalog_to_api)?;
    Ok(Json(outcome))
}
