//! Dish handlers

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use carta_api_types::{DishCreateRequest, DishPatchRequest};

use crate::application::dishes::{CreateDishCommand, UpdateDishCommand};
use crate::infra::http::api::error::ApiError;
use crate::infra::http::api::state::ApiState;

use super::{catalog_to_api, path_id};

pub async fn list_dishes(
    State(state): State<ApiState>,
    Path((_menu_id, submenu_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, ApiError> {
    let submenu_id = path_id(&submenu_id)?;
    let dishes = state
        .dishes
        .list(submenu_id)
        .await
        .map_err(catalog_to_api)?;
    Ok(Json(dishes))
}

pub async fn get_dish(
    State(state): State<ApiState>,
    Path((_menu_id, _submenu_id, dish_id)): Path<(String, String, String)>,
) -> Result<impl IntoResponse, ApiError> {
    let id = path_id(&dish_id)?;
    let dish = state.dishes.get(id).await.map_err(catalog_to_api)?;
    Ok(Json(dish))
}

pub async fn create_dish(
    State(state): State<ApiState>,
    Path((_menu_id, submenu_id)): Path<(String, String)>,
    payload: Result<Json<DishCreateRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let submenu_id = path_id(&submenu_id)?;
    let Json(payload) = payload?;
    let command = CreateDishCommand {
        submenu_id,
        title: payload.title,
        description: payload.description,
        price: payload.price.as_text(),
    };

    let dish = state.dishes.create(command).await.map_err(catalog_to_api)?;
    Ok((StatusCode::CREATED, Json(dish)))
}

pub async fn update_dish(
    State(state): State<ApiState>,
    Path((_menu_id, _submenu_id, dish_id)): Path<(String, String, String)>,
    payload: Result<Json<DishPatchRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let id = path_id(&dish_id)?;
    let Json(payload) = payload?;
    let command = UpdateDishCommand {
        id,
        title: payload.title,
        description: payload.description,
        price: payload.price.as_ref().map(|price| price.as_text()),
    };

    let dish = state.dishes.update(command).await.map_err(catalog_to_api)?;
    Ok(Json(dish))
}

pub async fn delete_dish(
    State(state): State<ApiState>,
    Path((_menu_id, _submenu_id, dish_id)): Path<(String, String, String)>,
) -> Result<impl IntoResponse, ApiError> {
    let id = path_id(&dish_id)?;
    let outcome = state.dishes.delete(id).await.map_err(catalog_to_api)?;
    Ok(Json(outcome))
}
