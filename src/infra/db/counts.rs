use async_trait::async_trait;
use uuid::Uuid;

use crate::application::repos::{CountsRepo, RepoError};

use super::util::convert_count;
use super::{PostgresRepositories, map_sqlx_error};

#[async_trait]
impl CountsRepo for PostgresRepositories {
    async fn count_submenus_in_menu(&self, menu_id: Uuid) -> Result<u64, RepoError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM submenu WHERE menu_id = $1")
            .bind(menu_id)
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        convert_count(count)
    }

    async fn count_dishes_in_menu(&self, menu_id: Uuid) -> Result<u64, RepoError> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(d.id)
            FROM dish d
            INNER JOIN submenu s ON s.id = d.submenu_id
            WHERE s.menu_id = $1
            "#,
        )
        .bind(menu_id)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        convert_count(count)
    }

    async fn count_dishes_in_submenu(&self, submenu_id: Uuid) -> Result<u64, RepoError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM dish WHERE submenu_id = $1")
            .bind(submenu_id)
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        convert_count(count)
    }
}
