use std::sync::Arc;

use carta_api_types::{DeleteResponse, DishResponse};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::application::error::{CatalogError, write_error};
use crate::application::repos::{CreateDishParams, DishesRepo, DishesWriteRepo, UpdateDishParams};
use crate::cache::{CacheKey, CacheRefresh, CatalogCache, CatalogMutation};
use crate::domain::entities::DishRecord;
use crate::domain::price::Price;
use crate::domain::title::normalize_title;
use crate::domain::types::EntityKind;

#[derive(Debug, Clone)]
pub struct CreateDishCommand {
    pub submenu_id: Uuid,
    pub title: String,
    pub description: String,
    pub price: String,
}

#[derive(Debug, Clone)]
pub struct UpdateDishCommand {
    pub id: Uuid,
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<String>,
}

pub fn dish_response(record: DishRecord) -> DishResponse {
    DishResponse {
        id: record.id,
        title: record.title,
        description: record.description,
        price: record.price.into_inner(),
    }
}

#[derive(Clone)]
pub struct DishService {
    reader: Arc<dyn DishesRepo>,
    writer: Arc<dyn DishesWriteRepo>,
    cache: CatalogCache,
}

impl DishService {
    pub fn new(
        reader: Arc<dyn DishesRepo>,
        writer: Arc<dyn DishesWriteRepo>,
        cache: CatalogCache,
    ) -> Self {
        Self {
            reader,
            writer,
            cache,
        }
    }

    #[instrument(skip(self))]
    pub async fn list(&self, submenu_id: Uuid) -> Result<Vec<DishResponse>, CatalogError> {
        let key = CacheKey::dish_list(submenu_id);
        if let Some(dishes) = self.cache.get::<Vec<DishResponse>>(&key).await {
            return Ok(dishes);
        }

        let dishes: Vec<DishResponse> = self
            .reader
            .list_dishes(submenu_id)
            .await?
            .into_iter()
            .map(dish_response)
            .collect();
        self.cache.set(&key, &dishes).await;
        Ok(dishes)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: Uuid) -> Result<DishResponse, CatalogError> {
        let key = CacheKey::dish(id);
        if let Some(dish) = self.cache.get::<DishResponse>(&key).await {
            return Ok(dish);
        }

        let record = self
            .reader
            .find_dish(id)
            .await?
            .ok_or(CatalogError::NotFound(EntityKind::Dish))?;
        let dish = dish_response(record);
        self.cache.set(&key, &dish).await;
        Ok(dish)
    }

    /// Validates and normalizes the price before anything reaches the store.
    #[instrument(skip(self, command), fields(submenu_id = %command.submenu_id))]
    pub async fn create(&self, command: CreateDishCommand) -> Result<DishResponse, CatalogError> {
        let title = normalize_title(EntityKind::Dish, &command.title)?;
        let price = Price::parse(&command.price)?;

        let record = self
            .writer
            .create_dish(CreateDishParams {
                submenu_id: command.submenu_id,
                title,
                description: command.description,
                price,
            })
            .await
            .map_err(|err| write_error(EntityKind::Dish, err))?
            .ok_or(CatalogError::NotFound(EntityKind::Submenu))?;
        let (menu_id, submenu_id) = (record.menu_id, record.submenu_id);
        let dish = dish_response(record);

        self.cache
            .apply(
                CatalogMutation::DishCreated {
                    menu_id,
                    submenu_id,
                    dish_id: dish.id,
                },
                Some(CacheRefresh::new(CacheKey::dish(dish.id), &dish)),
            )
            .await;
        info!(
            target = "carta::catalog",
            menu_id = %menu_id,
            submenu_id = %submenu_id,
            dish_id = %dish.id,
            price = %dish.price,
            "Dish created"
        );
        Ok(dish)
    }

    #[instrument(skip(self, command), fields(dish_id = %command.id))]
    pub async fn update(&self, command: UpdateDishCommand) -> Result<DishResponse, CatalogError> {
        let title = command
            .title
            .as_deref()
            .map(|title| normalize_title(EntityKind::Dish, title))
            .transpose()?;
        let price = command.price.as_deref().map(Price::parse).transpose()?;

        let record = self
            .writer
            .update_dish(UpdateDishParams {
                id: command.id,
                title,
                description: command.description,
                price,
            })
            .await
            .map_err(|err| write_error(EntityKind::Dish, err))?
            .ok_or(CatalogError::NotFound(EntityKind::Dish))?;
        let submenu_id = record.submenu_id;
        let dish = dish_response(record);

        self.cache
            .apply(
                CatalogMutation::DishUpdated {
                    submenu_id,
                    dish_id: dish.id,
                },
                Some(CacheRefresh::new(CacheKey::dish(dish.id), &dish)),
            )
            .await;
        info!(target = "carta::catalog", dish_id = %dish.id, "Dish updated");
        Ok(dish)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<DeleteResponse, CatalogError> {
        let Some(record) = self.writer.delete_dish(id).await? else {
            return Ok(DeleteResponse {
                status: false,
                message: EntityKind::Dish.not_found_message().to_string(),
            });
        };

        info!(
            target = "carta::catalog",
            menu_id = %record.menu_id,
            submenu_id = %record.submenu_id,
            dish_id = %id,
            "Dish deleted"
        );
        self.cache
            .apply(
                CatalogMutation::DishDeleted {
                    menu_id: record.menu_id,
                    submenu_id: record.submenu_id,
                    dish_id: id,
                },
                None,
            )
            .await;

        Ok(DeleteResponse {
            status: true,
            message: EntityKind::Dish.deleted_message().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;

    #[test]
    fn response_carries_formatted_price() {
        let record = DishRecord {
            id: Uuid::new_v4(),
            submenu_id: Uuid::new_v4(),
            menu_id: Uuid::new_v4(),
            title: "Soup".to_string(),
            description: "hot".to_string(),
            price: Price::parse("7.5").expect("valid price"),
            created_at: OffsetDateTime::UNIX_EPOCH,
        };
        let id = record.id;
        let response = dish_response(record);
        assert_eq!(response.id, id);
        assert_eq!(response.price, "7.50");
    }
}
