use std::sync::Arc;

use carta_api_types::{DeleteResponse, MenuResponse};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::application::aggregates::AggregationService;
use crate::application::error::{CatalogError, write_error};
use crate::application::repos::{CreateMenuParams, MenusRepo, MenusWriteRepo, UpdateMenuParams};
use crate::cache::{CacheKey, CacheRefresh, CatalogCache, CatalogMutation};
use crate::domain::title::normalize_title;
use crate::domain::types::EntityKind;

#[derive(Debug, Clone)]
pub struct CreateMenuCommand {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone)]
pub struct UpdateMenuCommand {
    pub id: Uuid,
    pub title: Option<String>,
    pub description: Option<String>,
}

#[derive(Clone)]
pub struct MenuService {
    reader: Arc<dyn MenusRepo>,
    writer: Arc<dyn MenusWriteRepo>,
    aggregates: AggregationService,
    cache: CatalogCache,
}

impl MenuService {
    pub fn new(
        reader: Arc<dyn MenusRepo>,
        writer: Arc<dyn MenusWriteRepo>,
        aggregates: AggregationService,
        cache: CatalogCache,
    ) -> Self {
        Self {
            reader,
            writer,
            aggregates,
            cache,
        }
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<MenuResponse>, CatalogError> {
        let key = CacheKey::menu_list();
        if let Some(menus) = self.cache.get::<Vec<MenuResponse>>(&key).await {
            return Ok(menus);
        }

        let records = self.reader.list_menus().await?;
        let menus = self.aggregates.menu_responses(records).await?;
        self.cache.set(&key, &menus).await;
        Ok(menus)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: Uuid) -> Result<MenuResponse, CatalogError> {
        let key = CacheKey::menu(id);
        if let Some(menu) = self.cache.get::<MenuResponse>(&key).await {
            return Ok(menu);
        }

        let record = self
            .reader
            .find_menu(id)
            .await?
            .ok_or(CatalogError::NotFound(EntityKind::Menu))?;
        let menu = self.aggregates.menu_response(record).await?;
        self.cache.set(&key, &menu).await;
        Ok(menu)
    }

    #[instrument(skip(self, command))]
    pub async fn create(&self, command: CreateMenuCommand) -> Result<MenuResponse, CatalogError> {
        let title = normalize_title(EntityKind::Menu, &command.title)?;

        let record = self
            .writer
            .create_menu(CreateMenuParams {
                title,
                description: command.description,
            })
            .await
            .map_err(|err| write_error(EntityKind::Menu, err))?;
        let menu = self.aggregates.menu_response(record).await?;

        self.cache
            .apply(
                CatalogMutation::MenuCreated { menu_id: menu.id },
                Some(CacheRefresh::new(CacheKey::menu(menu.id), &menu)),
            )
            .await;
        info!(target = "carta::catalog", menu_id = %menu.id, "Menu created");
        Ok(menu)
    }

    #[instrument(skip(self, command), fields(menu_id = %command.id))]
    pub async fn update(&self, command: UpdateMenuCommand) -> Result<MenuResponse, CatalogError> {
        let title = command
            .title
            .as_deref()
            .map(|title| normalize_title(EntityKind::Menu, title))
            .transpose()?;

        let record = self
            .writer
            .update_menu(UpdateMenuParams {
                id: command.id,
                title,
                description: command.description,
            })
            .await
            .map_err(|err| write_error(EntityKind::Menu, err))?
            .ok_or(CatalogError::NotFound(EntityKind::Menu))?;
        let menu = self.aggregates.menu_response(record).await?;

        self.cache
            .apply(
                CatalogMutation::MenuUpdated { menu_id: menu.id },
                Some(CacheRefresh::new(CacheKey::menu(menu.id), &menu)),
            )
            .await;
        info!(target = "carta::catalog", menu_id = %menu.id, "Menu updated");
        Ok(menu)
    }

    /// Delete a menu with everything under it. Deleting a missing menu is not an error.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<DeleteResponse, CatalogError> {
        let Some(cascade) = self.writer.delete_menu(id).await? else {
            return Ok(DeleteResponse {
                status: false,
                message: EntityKind::Menu.not_found_message().to_string(),
            });
        };

        info!(
            target = "carta::catalog",
            menu_id = %id,
            submenus = cascade.submenu_ids.len(),
            dishes = cascade.dish_ids.len(),
            "Menu deleted"
        );
        self.cache
            .apply(
                CatalogMutation::MenuDeleted {
                    menu_id: id,
                    submenu_ids: cascade.submenu_ids,
                    dish_ids: cascade.dish_ids,
                },
                None,
            )
            .await;

        Ok(DeleteResponse {
            status: true,
            message: EntityKind::Menu.deleted_message().to_string(),
        })
    }
}
