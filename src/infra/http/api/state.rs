use std::sync::Arc;

use crate::application::aggregates::AggregationService;
use crate::application::dishes::DishService;
use crate::application::menus::MenuService;
use crate::application::repos::{
    CatalogRepo, CountsRepo, DishesRepo, DishesWriteRepo, HealthRepo, MenusRepo, MenusWriteRepo,
    SubmenusRepo, SubmenusWriteRepo,
};
use crate::application::submenus::SubmenuService;
use crate::application::tree::CatalogService;
use crate::cache::CatalogCache;

#[derive(Clone)]
pub struct ApiState {
    pub menus: Arc<MenuService>,
    pub submenus: Arc<SubmenuService>,
    pub dishes: Arc<DishService>,
    pub catalog: Arc<CatalogService>,
    pub health: Arc<dyn HealthRepo>,
}

impl ApiState {
    /// Wire every service to one repository implementation and a shared cache.
    pub fn new<R>(repositories: Arc<R>, cache: CatalogCache) -> Self
    where
        R: MenusRepo
            + MenusWriteRepo
            + SubmenusRepo
            + SubmenusWriteRepo
            + DishesRepo
            + DishesWriteRepo
            + CountsRepo
            + CatalogRepo
            + HealthRepo
            + 'static,
    {
        let aggregates = AggregationService::new(repositories.clone());

        let menus = MenuService::new(
            repositories.clone(),
            repositories.clone(),
            aggregates.clone(),
            cache.clone(),
        );
        let submenus = SubmenuService::new(
            repositories.clone(),
            repositories.clone(),
            aggregates,
            cache.clone(),
        );
        let dishes = DishService::new(repositories.clone(), repositories.clone(), cache.clone());
        let catalog = CatalogService::new(repositories.clone(), repositories.clone(), cache);

        Self {
            menus: Arc::new(menus),
            submenus: Arc::new(submenus),
            dishes: Arc::new(dishes),
            catalog: Arc::new(catalog),
            health: repositories,
        }
    }
}
