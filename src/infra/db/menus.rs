use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    application::repos::{
        CreateMenuParams, MenusRepo, MenusWriteRepo, RepoError, UpdateMenuParams,
    },
    domain::entities::{MenuCascade, MenuRecord},
};

use super::{PostgresRepositories, map_sqlx_error};

#[derive(sqlx::FromRow)]
pub(super) struct MenuRow {
    id: Uuid,
    title: String,
    description: String,
    created_at: OffsetDateTime,
}

impl From<MenuRow> for MenuRecord {
    fn from(row: MenuRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            description: row.description,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl MenusRepo for PostgresRepositories {
    async fn list_menus(&self) -> Result<Vec<MenuRecord>, RepoError> {
        let rows = sqlx::query_as::<_, MenuRow>(
            r#"
            SELECT id, title, description, created_at
            FROM menu
            ORDER BY created_at, id
            "#,
        )
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(MenuRecord::from).collect())
    }

    async fn find_menu(&self, id: Uuid) -> Result<Option<MenuRecord>, RepoError> {
        let row = sqlx::query_as::<_, MenuRow>(
            r#"
            SELECT id, title, description, created_at
            FROM menu
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(MenuRecord::from))
    }
}

#[async_trait]
impl MenusWriteRepo for PostgresRepositories {
    async fn create_menu(&self, params: CreateMenuParams) -> Result<MenuRecord, RepoError> {
        let row = sqlx::query_as::<_, MenuRow>(
            r#"
            INSERT INTO menu (id, title, description)
            VALUES ($1, $2, $3)
            RETURNING id, title, description, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(params.title)
        .bind(params.description)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.into())
    }

    async fn update_menu(
        &self,
        params: UpdateMenuParams,
    ) -> Result<Option<MenuRecord>, RepoError> {
        let row = sqlx::query_as::<_, MenuRow>(
            r#"
            UPDATE menu
            SET title = COALESCE($2, title),
                description = COALESCE($3, description)
            WHERE id = $1
            RETURNING id, title, description, created_at
            "#,
        )
        .bind(params.id)
        .bind(params.title)
        .bind(params.description)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(MenuRecord::from))
    }

    async fn delete_menu(&self, id: Uuid) -> Result<Option<MenuCascade>, RepoError> {
        let mut tx = self.begin().await.map_err(map_sqlx_error)?;

        let locked: Option<Uuid> =
            sqlx::query_scalar("SELECT id FROM menu WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(map_sqlx_error)?;
        if locked.is_none() {
            return Ok(None);
        }

        // Locking the children blocks dish inserts under them until commit, so the
        // dish ids read next are exactly the rows the cascade removes.
        let submenu_ids: Vec<Uuid> = sqlx::query_scalar(
            "SELECT id FROM submenu WHERE menu_id = $1 ORDER BY created_at, id FOR UPDATE",
        )
        .bind(id)
        .fetch_all(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;

        let dish_ids: Vec<Uuid> = sqlx::query_scalar(
            r#"
            SELECT d.id
            FROM dish d
            INNER JOIN submenu s ON s.id = d.submenu_id
            WHERE s.menu_id = $1
            ORDER BY d.created_at, d.id
            "#,
        )
        .bind(id)
        .fetch_all(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;

        sqlx::query("DELETE FROM menu WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;

        tx.commit().await.map_err(map_sqlx_error)?;

        Ok(Some(MenuCascade {
            submenu_ids,
            dish_ids,
        }))
    }

    async fn delete_all_menus(&self) -> Result<u64, RepoError> {
        let result = sqlx::query("DELETE FROM menu")
            .execute(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.rows_affected())
    }
}
