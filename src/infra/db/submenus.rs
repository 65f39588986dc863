use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    application::repos::{
        CreateSubmenuParams, RepoError, SubmenusRepo, SubmenusWriteRepo, UpdateSubmenuParams,
    },
    domain::entities::{SubmenuCascade, SubmenuRecord},
};

use super::{PostgresRepositories, map_sqlx_error};

#[derive(sqlx::FromRow)]
pub(super) struct SubmenuRow {
    id: Uuid,
    menu_id: Uuid,
    title: String,
    description: String,
    created_at: OffsetDateTime,
}

impl From<SubmenuRow> for SubmenuRecord {
    fn from(row: SubmenuRow) -> Self {
        Self {
            id: row.id,
            menu_id: row.menu_id,
            title: row.title,
            description: row.description,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl SubmenusRepo for PostgresRepositories {
    async fn list_submenus(&self, menu_id: Uuid) -> Result<Vec<SubmenuRecord>, RepoError> {
        let rows = sqlx::query_as::<_, SubmenuRow>(
            r#"
            SELECT id, menu_id, title, description, created_at
            FROM submenu
            WHERE menu_id = $1
            ORDER BY created_at, id
            "#,
        )
        .bind(menu_id)
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(SubmenuRecord::from).collect())
    }

    async fn find_submenu(&self, id: Uuid) -> Result<Option<SubmenuRecord>, RepoError> {
        let row = sqlx::query_as::<_, SubmenuRow>(
            r#"
            SELECT id, menu_id, title, description, created_at
            FROM submenu
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(SubmenuRecord::from))
    }
}

#[async_trait]
impl SubmenusWriteRepo for PostgresRepositories {
    async fn create_submenu(
        &self,
        params: CreateSubmenuParams,
    ) -> Result<SubmenuRecord, RepoError> {
        let row = sqlx::query_as::<_, SubmenuRow>(
            r#"
            INSERT INTO submenu (id, menu_id, title, description)
            VALUES ($1, $2, $3, $4)
            RETURNING id, menu_id, title, description, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(params.menu_id)
        .bind(params.title)
        .bind(params.description)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.into())
    }

    async fn update_submenu(
        &self,
        params: UpdateSubmenuParams,
    ) -> Result<Option<SubmenuRecord>, RepoError> {
        let row = sqlx::query_as::<_, SubmenuRow>(
            r#"
            UPDATE submenu
            SET title = COALESCE($2, title),
                description = COALESCE($3, description)
            WHERE id = $1
            RETURNING id, menu_id, title, description, created_at
            "#,
        )
        .bind(params.id)
        .bind(params.title)
        .bind(params.description)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(SubmenuRecord::from))
    }

    async fn delete_submenu(&self, id: Uuid) -> Result<Option<SubmenuCascade>, RepoError> {
        let mut tx = self.begin().await.map_err(map_sqlx_error)?;

        let menu_id: Option<Uuid> =
            sqlx::query_scalar("SELECT menu_id FROM submenu WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(map_sqlx_error)?;
        let Some(menu_id) = menu_id else {
            return Ok(None);
        };

        let dish_ids: Vec<Uuid> =
            sqlx::query_scalar("SELECT id FROM dish WHERE submenu_id = $1 ORDER BY created_at, id")
                .bind(id)
                .fetch_all(&mut *tx)
                .await
                .map_err(map_sqlx_error)?;

        sqlx::query("DELETE FROM submenu WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;

        tx.commit().await.map_err(map_sqlx_error)?;

        Ok(Some(SubmenuCascade { menu_id, dish_ids }))
    }
}
