//! Shared fixtures for integration tests: an in-memory catalog store and HTTP helpers.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::Value;
use time::OffsetDateTime;
use tokio::sync::Mutex;
use tower::ServiceExt;
use uuid::Uuid;

use carta::application::repos::{
    CatalogRepo, CatalogSnapshot, CountsRepo, CreateDishParams, CreateMenuParams,
    CreateSubmenuParams, DishesRepo, DishesWriteRepo, HealthRepo, MenusRepo, MenusWriteRepo,
    RepoError, SubmenusRepo, SubmenusWriteRepo, UpdateDishParams, UpdateMenuParams,
    UpdateSubmenuParams,
};
use carta::cache::{CacheConfig, CatalogCache, MemoryStore};
use carta::domain::entities::{DishRecord, MenuCascade, MenuRecord, SubmenuCascade, SubmenuRecord};
use carta::infra::db::PostgresRepositories;
use carta::infra::http::{ApiState, build_router};
use sqlx::PgPool;

#[derive(Default)]
struct Tables {
    menus: Vec<MenuRecord>,
    submenus: Vec<SubmenuRecord>,
    dishes: Vec<DishRecord>,
}

/// Mirrors the Postgres schema: globally unique titles, cascading deletes.
#[derive(Default)]
pub struct InMemoryCatalog {
    tables: Mutex<Tables>,
    unhealthy: AtomicBool,
}

impl InMemoryCatalog {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set_unhealthy(&self, unhealthy: bool) {
        self.unhealthy.store(unhealthy, Ordering::SeqCst);
    }

    pub async fn row_counts(&self) -> (usize, usize, usize) {
        let tables = self.tables.lock().await;
        (
            tables.menus.len(),
            tables.submenus.len(),
            tables.dishes.len(),
        )
    }
}

fn duplicate(constraint: &str) -> RepoError {
    RepoError::Duplicate {
        constraint: constraint.to_string(),
    }
}

#[async_trait]
impl MenusRepo for InMemoryCatalog {
    async fn list_menus(&self) -> Result<Vec<MenuRecord>, RepoError> {
        Ok(self.tables.lock().await.menus.clone())
    }

    async fn find_menu(&self, id: Uuid) -> Result<Option<MenuRecord>, RepoError> {
        let tables = self.tables.lock().await;
        Ok(tables.menus.iter().find(|menu| menu.id == id).cloned())
    }
}

#[async_trait]
impl MenusWriteRepo for InMemoryCatalog {
    async fn create_menu(&self, params: CreateMenuParams) -> Result<MenuRecord, RepoError> {
        let mut tables = self.tables.lock().await;
        if tables.menus.iter().any(|menu| menu.title == params.title) {
            return Err(duplicate("menu_title_key"));
        }
        let record = MenuRecord {
            id: Uuid::new_v4(),
            title: params.title,
            description: params.description,
            created_at: OffsetDateTime::now_utc(),
        };
        tables.menus.push(record.clone());
        Ok(record)
    }

    async fn update_menu(
        &self,
        params: UpdateMenuParams,
    ) -> Result<Option<MenuRecord>, RepoError> {
        let mut tables = self.tables.lock().await;
        // An UPDATE matching no row never reaches the unique index.
        if !tables.menus.iter().any(|menu| menu.id == params.id) {
            return Ok(None);
        }
        let taken = params.title.as_ref().is_some_and(|title| {
            tables
                .menus
                .iter()
                .any(|menu| menu.id != params.id && &menu.title == title)
        });
        if taken {
            return Err(duplicate("menu_title_key"));
        }
        let Some(menu) = tables.menus.iter_mut().find(|menu| menu.id == params.id) else {
            return Ok(None);
        };
        if let Some(title) = params.title {
            menu.title = title;
        }
        if let Some(description) = params.description {
            menu.description = description;
        }
        Ok(Some(menu.clone()))
    }

    async fn delete_menu(&self, id: Uuid) -> Result<Option<MenuCascade>, RepoError> {
        let mut tables = self.tables.lock().await;
        let before = tables.menus.len();
        tables.menus.retain(|menu| menu.id != id);
        if tables.menus.len() == before {
            return Ok(None);
        }

        let submenu_ids: Vec<Uuid> = tables
            .submenus
            .iter()
            .filter(|submenu| submenu.menu_id == id)
            .map(|submenu| submenu.id)
            .collect();
        let dish_ids: Vec<Uuid> = tables
            .dishes
            .iter()
            .filter(|dish| dish.menu_id == id)
            .map(|dish| dish.id)
            .collect();
        tables.submenus.retain(|submenu| submenu.menu_id != id);
        tables.dishes.retain(|dish| dish.menu_id != id);

        Ok(Some(MenuCascade {
            submenu_ids,
            dish_ids,
        }))
    }

    async fn delete_all_menus(&self) -> Result<u64, RepoError> {
        let mut tables = self.tables.lock().await;
        let removed = tables.menus.len() as u64;
        *tables = Tables::default();
        Ok(removed)
    }
}

#[async_trait]
impl SubmenusRepo for InMemoryCatalog {
    async fn list_submenus(&self, menu_id: Uuid) -> Result<Vec<SubmenuRecord>, RepoError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .submenus
            .iter()
            .filter(|submenu| submenu.menu_id == menu_id)
            .cloned()
            .collect())
    }

    async fn find_submenu(&self, id: Uuid) -> Result<Option<SubmenuRecord>, RepoError> {
        let tables = self.tables.lock().await;
        Ok(tables.submenus.iter().find(|submenu| submenu.id == id).cloned())
    }
}

#[async_trait]
impl SubmenusWriteRepo for InMemoryCatalog {
    async fn create_submenu(
        &self,
        params: CreateSubmenuParams,
    ) -> Result<SubmenuRecord, RepoError> {
        let mut tables = self.tables.lock().await;
        if !tables.menus.iter().any(|menu| menu.id == params.menu_id) {
            return Err(RepoError::ForeignKey {
                constraint: "submenu_menu_id_fkey".to_string(),
            });
        }
        if tables
            .submenus
            .iter()
            .any(|submenu| submenu.title == params.title)
        {
            return Err(duplicate("submenu_title_key"));
        }
        let record = SubmenuRecord {
            id: Uuid::new_v4(),
            menu_id: params.menu_id,
            title: params.title,
            description: params.description,
            created_at: OffsetDateTime::now_utc(),
        };
        tables.submenus.push(record.clone());
        Ok(record)
    }

    async fn update_submenu(
        &self,
        params: UpdateSubmenuParams,
    ) -> Result<Option<SubmenuRecord>, RepoError> {
        let mut tables = self.tables.lock().await;
        // An UPDATE matching no row never reaches the unique index.
        if !tables.submenus.iter().any(|submenu| submenu.id == params.id) {
            return Ok(None);
        }
        let taken = params.title.as_ref().is_some_and(|title| {
            tables
                .submenus
                .iter()
                .any(|submenu| submenu.id != params.id && &submenu.title == title)
        });
        if taken {
            return Err(duplicate("submenu_title_key"));
        }
        let Some(submenu) = tables
            .submenus
            .iter_mut()
            .find(|submenu| submenu.id == params.id)
        else {
            return Ok(None);
        };
        if let Some(title) = params.title {
            submenu.title = title;
        }
        if let Some(description) = params.description {
            submenu.description = description;
        }
        Ok(Some(submenu.clone()))
    }

    async fn delete_submenu(&self, id: Uuid) -> Result<Option<SubmenuCascade>, RepoError> {
        let mut tables = self.tables.lock().await;
        let Some(position) = tables.submenus.iter().position(|submenu| submenu.id == id) else {
            return Ok(None);
        };
        let removed = tables.submenus.remove(position);
        let dish_ids: Vec<Uuid> = tables
            .dishes
            .iter()
            .filter(|dish| dish.submenu_id == id)
            .map(|dish| dish.id)
            .collect();
        tables.dishes.retain(|dish| dish.submenu_id != id);

        Ok(Some(SubmenuCascade {
            menu_id: removed.menu_id,
            dish_ids,
        }))
    }
}

#[async_trait]
impl DishesRepo for InMemoryCatalog {
    async fn list_dishes(&self, submenu_id: Uuid) -> Result<Vec<DishRecord>, RepoError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .dishes
            .iter()
            .filter(|dish| dish.submenu_id == submenu_id)
            .cloned()
            .collect())
    }

    async fn find_dish(&self, id: Uuid) -> Result<Option<DishRecord>, RepoError> {
        let tables = self.tables.lock().await;
        Ok(tables.dishes.iter().find(|dish| dish.id == id).cloned())
    }
}

#[async_trait]
impl DishesWriteRepo for InMemoryCatalog {
    async fn create_dish(&self, params: CreateDishParams) -> Result<Option<DishRecord>, RepoError> {
        let mut tables = self.tables.lock().await;
        let Some(menu_id) = tables
            .submenus
            .iter()
            .find(|submenu| submenu.id == params.submenu_id)
            .map(|submenu| submenu.menu_id)
        else {
            return Ok(None);
        };
        if tables.dishes.iter().any(|dish| dish.title == params.title) {
            return Err(duplicate("dish_title_key"));
        }
        let record = DishRecord {
            id: Uuid::new_v4(),
            submenu_id: params.submenu_id,
            menu_id,
            title: params.title,
            description: params.description,
            price: params.price,
            created_at: OffsetDateTime::now_utc(),
        };
        tables.dishes.push(record.clone());
        Ok(Some(record))
    }

    async fn update_dish(&self, params: UpdateDishParams) -> Result<Option<DishRecord>, RepoError> {
        let mut tables = self.tables.lock().await;
        // An UPDATE matching no row never reaches the unique index.
        if !tables.dishes.iter().any(|dish| dish.id == params.id) {
            return Ok(None);
        }
        let taken = params.title.as_ref().is_some_and(|title| {
            tables
                .dishes
                .iter()
                .any(|dish| dish.id != params.id && &dish.title == title)
        });
        if taken {
            return Err(duplicate("dish_title_key"));
        }
        let Some(dish) = tables.dishes.iter_mut().find(|dish| dish.id == params.id) else {
            return Ok(None);
        };
        if let Some(title) = params.title {
            dish.title = title;
        }
        if let Some(description) = params.description {
            dish.description = description;
        }
        if let Some(price) = params.price {
            dish.price = price;
        }
        Ok(Some(dish.clone()))
    }

    async fn delete_dish(&self, id: Uuid) -> Result<Option<DishRecord>, RepoError> {
        let mut tables = self.tables.lock().await;
        let Some(position) = tables.dishes.iter().position(|dish| dish.id == id) else {
            return Ok(None);
        };
        Ok(Some(tables.dishes.remove(position)))
    }
}

#[async_trait]
impl CountsRepo for InMemoryCatalog {
    async fn count_submenus_in_menu(&self, menu_id: Uuid) -> Result<u64, RepoError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .submenus
            .iter()
            .filter(|submenu| submenu.menu_id == menu_id)
            .count() as u64)
    }

    async fn count_dishes_in_menu(&self, menu_id: Uuid) -> Result<u64, RepoError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .dishes
            .iter()
            .filter(|dish| dish.menu_id == menu_id)
            .count() as u64)
    }

    async fn count_dishes_in_submenu(&self, submenu_id: Uuid) -> Result<u64, RepoError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .dishes
            .iter()
            .filter(|dish| dish.submenu_id == submenu_id)
            .count() as u64)
    }
}

#[async_trait]
impl CatalogRepo for InMemoryCatalog {
    async fn load_catalog(&self) -> Result<CatalogSnapshot, RepoError> {
        let tables = self.tables.lock().await;
        Ok(CatalogSnapshot {
            menus: tables.menus.clone(),
            submenus: tables.submenus.clone(),
            dishes: tables.dishes.clone(),
        })
    }
}

#[async_trait]
impl HealthRepo for InMemoryCatalog {
    async fn ping(&self) -> Result<(), RepoError> {
        if self.unhealthy.load(Ordering::SeqCst) {
            return Err(RepoError::from_persistence("connection refused"));
        }
        Ok(())
    }
}

pub fn memory_cache() -> (CatalogCache, Arc<MemoryStore>) {
    let config = CacheConfig::default();
    let store = Arc::new(MemoryStore::new(&config));
    (CatalogCache::new(store.clone(), &config), store)
}

pub fn app_with_cache(cache: CatalogCache) -> (Router, Arc<InMemoryCatalog>) {
    let catalog = InMemoryCatalog::new();
    let state = ApiState::new(catalog.clone(), cache);
    (build_router(state), catalog)
}

pub fn app_with_postgres(pool: PgPool, cache: CatalogCache) -> Router {
    let repositories = Arc::new(PostgresRepositories::new(pool));
    build_router(ApiState::new(repositories, cache))
}

pub async fn send(router: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    let request = builder.body(body).expect("request");

    let response = router.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            Value::String(String::from_utf8_lossy(&bytes).into_owned())
        })
    };
    (status, json)
}

pub async fn get(router: &Router, uri: &str) -> (StatusCode, Value) {
    send(router, Method::GET, uri, None).await
}

pub async fn post(router: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(router, Method::POST, uri, Some(body)).await
}

pub async fn patch(router: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(router, Method::PATCH, uri, Some(body)).await
}

pub async fn delete(router: &Router, uri: &str) -> (StatusCode, Value) {
    send(router, Method::DELETE, uri, None).await
}

pub fn id_of(value: &Value) -> String {
    value["id"].as_str().expect("id field").to_string()
}
