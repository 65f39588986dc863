use std::sync::Arc;

use carta_api_types::{DeleteResponse, SubmenuResponse};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::application::aggregates::AggregationService;
use crate::application::error::{CatalogError, write_error};
use crate::application::repos::{
    CreateSubmenuParams, SubmenusRepo, SubmenusWriteRepo, UpdateSubmenuParams,
};
use crate::cache::{CacheKey, CacheRefresh, CatalogCache, CatalogMutation};
use crate::domain::title::normalize_title;
use crate::domain::types::EntityKind;

#[derive(Debug, Clone)]
pub struct CreateSubmenuCommand {
    pub menu_id: Uuid,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone)]
pub struct UpdateSubmenuCommand {
    pub id: Uuid,
    pub title: Option<String>,
    pub description: Option<String>,
}

#[derive(Clone)]
pub struct SubmenuService {
    reader: Arc<dyn SubmenusRepo>,
    writer: Arc<dyn SubmenusWriteRepo>,
    aggregates: AggregationService,
    cache: CatalogCache,
}

impl SubmenuService {
    pub fn new(
        reader: Arc<dyn SubmenusRepo>,
        writer: Arc<dyn SubmenusWriteRepo>,
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
    pub async fn list(&self, menu_id: Uuid) -> Result<Vec<SubmenuResponse>, CatalogError> {
        let key = CacheKey::submenu_list(menu_id);
        if let Some(submenus) = self.cache.get::<Vec<SubmenuResponse>>(&key).await {
            return Ok(submenus);
        }

        let records = self.reader.list_submenus(menu_id).await?;
        let submenus = self.aggregates.submenu_responses(records).await?;
        self.cache.set(&key, &submenus).await;
        Ok(submenus)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: Uuid) -> Result<SubmenuResponse, CatalogError> {
        let key = CacheKey::submenu(id);
        if let Some(submenu) = self.cache.get::<SubmenuResponse>(&key).await {
            return Ok(submenu);
        }

        let record = self
            .reader
            .find_submenu(id)
            .await?
            .ok_or(CatalogError::NotFound(EntityKind::Submenu))?;
        let submenu = self.aggregates.submenu_response(record).await?;
        self.cache.set(&key, &submenu).await;
        Ok(submenu)
    }

    /// Fails with a conflict when the title is taken or the parent menu does not exist.
    #[instrument(skip(self, command), fields(menu_id = %command.menu_id))]
    pub async fn create(
        &self,
        command: CreateSubmenuCommand,
    ) -> Result<SubmenuResponse, CatalogError> {
        let title = normalize_title(EntityKind::Submenu, &command.title)?;

        let record = self
            .writer
            .create_submenu(CreateSubmenuParams {
                menu_id: command.menu_id,
                title,
                description: command.description,
            })
            .await
            .map_err(|err| write_error(EntityKind::Submenu, err))?;
        let menu_id = record.menu_id;
        let submenu = self.aggregates.submenu_response(record).await?;

        self.cache
            .apply(
                CatalogMutation::SubmenuCreated {
                    menu_id,
                    submenu_id: submenu.id,
                },
                Some(CacheRefresh::new(CacheKey::submenu(submenu.id), &submenu)),
            )
            .await;
        info!(
            target = "carta::catalog",
            menu_id = %menu_id,
            submenu_id = %submenu.id,
            "Submenu created"
        );
        Ok(submenu)
    }

    #[instrument(skip(self, command), fields(submenu_id = %command.id))]
    pub async fn update(
        &self,
        command: UpdateSubmenuCommand,
    ) -> Result<SubmenuResponse, CatalogError> {
        let title = command
            .title
            .as_deref()
            .map(|title| normalize_title(EntityKind::Submenu, title))
            .transpose()?;

        let record = self
            .writer
            .update_submenu(UpdateSubmenuParams {
                id: command.id,
                title,
                description: command.description,
            })
            .await
            .map_err(|err| write_error(EntityKind::Submenu, err))?
            .ok_or(CatalogError::NotFound(EntityKind::Submenu))?;
        let menu_id = record.menu_id;
        let submenu = self.aggregates.submenu_response(record).await?;

        self.cache
            .apply(
                CatalogMutation::SubmenuUpdated {
                    menu_id,
                    submenu_id: submenu.id,
                },
                Some(CacheRefresh::new(CacheKey::submenu(submenu.id), &submenu)),
            )
            .await;
        info!(target = "carta::catalog", submenu_id = %submenu.id, "Submenu updated");
        Ok(submenu)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<DeleteResponse, CatalogError> {
        let Some(cascade) = self.writer.delete_submenu(id).await? else {
            return Ok(DeleteResponse {
                status: false,
                message: EntityKind::Submenu.not_found_message().to_string(),
            });
        };

        info!(
            target = "carta::catalog",
            menu_id = %cascade.menu_id,
            submenu_id = %id,
            dishes = cascade.dish_ids.len(),
            "Submenu deleted"
        );
        self.cache
            .apply(
                CatalogMutation::SubmenuDeleted {
                    menu_id: cascade.menu_id,
                    submenu_id: id,
                    dish_ids: cascade.dish_ids,
                },
                None,
            )
            .await;

        Ok(DeleteResponse {
            status: true,
            message: EntityKind::Submenu.deleted_message().to_string(),
        })
    }
}
