use async_trait::async_trait;

use crate::{
    application::repos::{CatalogRepo, CatalogSnapshot, RepoError},
    domain::entities::{DishRecord, MenuRecord, SubmenuRecord},
};

use super::dishes::DishRow;
use super::menus::MenuRow;
use super::submenus::SubmenuRow;
use super::{PostgresRepositories, map_sqlx_error};

#[async_trait]
impl CatalogRepo for PostgresRepositories {
    /// Reads all three tables inside one repeatable-read transaction so the levels agree.
    async fn load_catalog(&self) -> Result<CatalogSnapshot, RepoError> {
        let mut tx = self.begin().await.map_err(map_sqlx_error)?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ READ ONLY")
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;

        let menus = sqlx::query_as::<_, MenuRow>(
            r#"
            SELECT id, title, description, created_at
            FROM menu
            ORDER BY created_at, id
            "#,
        )
        .fetch_all(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;

        let submenus = sqlx::query_as::<_, SubmenuRow>(
            r#"
            SELECT id, menu_id, title, description, created_at
            FROM submenu
            ORDER BY created_at, id
            "#,
        )
        .fetch_all(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;

        let dishes = sqlx::query_as::<_, DishRow>(
            r#"
            SELECT d.id, d.submenu_id, s.menu_id, d.title, d.description, d.price, d.created_at
            FROM dish d
            INNER JOIN submenu s ON s.id = d.submenu_id
            ORDER BY d.created_at, d.id
            "#,
        )
        .fetch_all(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;

        tx.commit().await.map_err(map_sqlx_error)?;

        Ok(CatalogSnapshot {
            menus: menus.into_iter().map(MenuRecord::from).collect(),
            submenus: submenus.into_iter().map(SubmenuRecord::from).collect(),
            dishes: dishes.into_iter().map(DishRecord::from).collect(),
        })
    }
}
