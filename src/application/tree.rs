//! Whole-catalog operations: the nested tree view and clearing everything.

use std::collections::HashMap;
use std::sync::Arc;

use carta_api_types::{DeleteResponse, DishResponse, MenuTreeNode, SubmenuTreeNode};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::application::dishes::dish_response;
use crate::application::error::CatalogError;
use crate::application::repos::{CatalogRepo, CatalogSnapshot, MenusWriteRepo};
use crate::cache::{CacheKey, CatalogCache, CatalogMutation};

pub const CATALOG_CLEARED_MESSAGE: &str = "catalog has been cleared";

#[derive(Clone)]
pub struct CatalogService {
    catalog: Arc<dyn CatalogRepo>,
    writer: Arc<dyn MenusWriteRepo>,
    cache: CatalogCache,
}

impl CatalogService {
    pub fn new(
        catalog: Arc<dyn CatalogRepo>,
        writer: Arc<dyn MenusWriteRepo>,
        cache: CatalogCache,
    ) -> Self {
        Self {
            catalog,
            writer,
            cache,
        }
    }

    #[instrument(skip(self))]
    pub async fn tree(&self) -> Result<Vec<MenuTreeNode>, CatalogError> {
        let key = CacheKey::menu_tree();
        if let Some(tree) = self.cache.get::<Vec<MenuTreeNode>>(&key).await {
            return Ok(tree);
        }

        let snapshot = self.catalog.load_catalog().await?;
        let tree = assemble_tree(snapshot);
        self.cache.set(&key, &tree).await;
        Ok(tree)
    }

    /// Remove every menu (and through the cascade every submenu and dish), then flush the cache.
    #[instrument(skip(self))]
    pub async fn clear(&self) -> Result<DeleteResponse, CatalogError> {
        let removed = self.writer.delete_all_menus().await?;
        self.cache.apply(CatalogMutation::CatalogCleared, None).await;
        info!(target = "carta::catalog", menus = removed, "Catalog cleared");

        Ok(DeleteResponse {
            status: true,
            message: CATALOG_CLEARED_MESSAGE.to_string(),
        })
    }
}

/// Nest a flat snapshot. Ordering within each level follows the snapshot.
pub fn assemble_tree(snapshot: CatalogSnapshot) -> Vec<MenuTreeNode> {
    let mut dishes_by_submenu: HashMap<Uuid, Vec<DishResponse>> = HashMap::new();
    for dish in snapshot.dishes {
        dishes_by_submenu
            .entry(dish.submenu_id)
            .or_default()
            .push(dish_response(dish));
    }

    let mut submenus_by_menu: HashMap<Uuid, Vec<SubmenuTreeNode>> = HashMap::new();
    for submenu in snapshot.submenus {
        let dishes = dishes_by_submenu.remove(&submenu.id).unwrap_or_default();
        submenus_by_menu
            .entry(submenu.menu_id)
            .or_default()
            .push(SubmenuTreeNode {
                id: submenu.id,
                title: submenu.title,
                description: submenu.description,
                dishes,
            });
    }

    snapshot
        .menus
        .into_iter()
        .map(|menu| MenuTreeNode {
            submenus: submenus_by_menu.remove(&menu.id).unwrap_or_default(),
            id: menu.id,
            title: menu.title,
            description: menu.description,
        })
        .collect()
}
