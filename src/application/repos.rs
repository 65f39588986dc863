//! Repository traits describing persistence adapters.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::entities::{DishRecord, MenuCascade, MenuRecord, SubmenuCascade, SubmenuRecord};
use crate::domain::price::Price;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("duplicate record violates unique constraint `{constraint}`")]
    Duplicate { constraint: String },
    #[error("referenced parent row does not exist (`{constraint}`)")]
    ForeignKey { constraint: String },
    #[error("resource not found")]
    NotFound,
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
    #[error("integrity error: {message}")]
    Integrity { message: String },
    #[error("database timeout")]
    Timeout,
}

impl RepoError {
    pub fn from_persistence(err: impl std::fmt::Display) -> Self {
        Self::Persistence(err.to_string())
    }
}

#[derive(Debug, Clone)]
pub struct CreateMenuParams {
    pub title: String,
    pub description: String,
}

/// Partial update; `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct UpdateMenuParams {
    pub id: Uuid,
    pub title: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CreateSubmenuParams {
    pub menu_id: Uuid,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateSubmenuParams {
    pub id: Uuid,
    pub title: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CreateDishParams {
    pub submenu_id: Uuid,
    pub title: String,
    pub description: String,
    pub price: Price,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateDishParams {
    pub id: Uuid,
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<Price>,
}

/// Every row of the catalog, each level ordered by creation time.
#[derive(Debug, Clone, Default)]
pub struct CatalogSnapshot {
    pub menus: Vec<MenuRecord>,
    pub submenus: Vec<SubmenuRecord>,
    pub dishes: Vec<DishRecord>,
}

#[async_trait]
pub trait MenusRepo: Send + Sync {
    async fn list_menus(&self) -> Result<Vec<MenuRecord>, RepoError>;

    async fn find_menu(&self, id: Uuid) -> Result<Option<MenuRecord>, RepoError>;
}

#[async_trait]
pub trait MenusWriteRepo: Send + Sync {
    async fn create_menu(&self, params: CreateMenuParams) -> Result<MenuRecord, RepoError>;

    /// Returns `None` when no menu has the given id.
    async fn update_menu(&self, params: UpdateMenuParams)
    -> Result<Option<MenuRecord>, RepoError>;

    /// Deletes the menu and, through the cascade, its submenus and dishes.
    /// Returns `None` when the menu did not exist.
    async fn delete_menu(&self, id: Uuid) -> Result<Option<MenuCascade>, RepoError>;

    /// Deletes every menu. Returns the number of menus removed.
    async fn delete_all_menus(&self) -> Result<u64, RepoError>;
}

#[async_trait]
pub trait SubmenusRepo: Send + Sync {
    async fn list_submenus(&self, menu_id: Uuid) -> Result<Vec<SubmenuRecord>, RepoError>;

    async fn find_submenu(&self, id: Uuid) -> Result<Option<SubmenuRecord>, RepoError>;
}

#[async_trait]
pub trait SubmenusWriteRepo: Send + Sync {
    async fn create_submenu(&self, params: CreateSubmenuParams)
    -> Result<SubmenuRecord, RepoError>;

    async fn update_submenu(
        &self,
        params: UpdateSubmenuParams,
    ) -> Result<Option<SubmenuRecord>, RepoError>;

    async fn delete_submenu(&self, id: Uuid) -> Result<Option<SubmenuCascade>, RepoError>;
}

#[async_trait]
pub trait DishesRepo: Send + Sync {
    async fn list_dishes(&self, submenu_id: Uuid) -> Result<Vec<DishRecord>, RepoError>;

    async fn find_dish(&self, id: Uuid) -> Result<Option<DishRecord>, RepoError>;
}

#[async_trait]
pub trait DishesWriteRepo: Send + Sync {
    /// Returns `None` when the parent submenu does not exist.
    async fn create_dish(&self, params: CreateDishParams) -> Result<Option<DishRecord>, RepoError>;

    async fn update_dish(&self, params: UpdateDishParams) -> Result<Option<DishRecord>, RepoError>;

    async fn delete_dish(&self, id: Uuid) -> Result<Option<DishRecord>, RepoError>;
}

/// Child-row counts scoped by foreign key.
#[async_trait]
pub trait CountsRepo: Send + Sync {
    async fn count_submenus_in_menu(&self, menu_id: Uuid) -> Result<u64, RepoError>;

    async fn count_dishes_in_menu(&self, menu_id: Uuid) -> Result<u64, RepoError>;

    async fn count_dishes_in_submenu(&self, submenu_id: Uuid) -> Result<u64, RepoError>;
}

#[async_trait]
pub trait CatalogRepo: Send + Sync {
    async fn load_catalog(&self) -> Result<CatalogSnapshot, RepoError>;
}

/// Liveness check for the backing store.
#[async_trait]
pub trait HealthRepo: Send + Sync {
    async fn ping(&self) -> Result<(), RepoError>;
}
