use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    application::repos::{
        CreateDishParams, DishesRepo, DishesWriteRepo, RepoError, UpdateDishParams,
    },
    domain::{entities::DishRecord, price::Price},
};

use super::{PostgresRepositories, map_sqlx_error};

#[derive(sqlx::FromRow)]
pub(super) struct DishRow {
    id: Uuid,
    submenu_id: Uuid,
    menu_id: Uuid,
    title: String,
    description: String,
    price: String,
    created_at: OffsetDateTime,
}

impl From<DishRow> for DishRecord {
    fn from(row: DishRow) -> Self {
        Self {
            id: row.id,
            submenu_id: row.submenu_id,
            menu_id: row.menu_id,
            title: row.title,
            description: row.description,
            price: Price::from_stored(row.price),
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl DishesRepo for PostgresRepositories {
    async fn list_dishes(&self, submenu_id: Uuid) -> Result<Vec<DishRecord>, RepoError> {
        let rows = sqlx::query_as::<_, DishRow>(
            r#"
            SELECT d.id, d.submenu_id, s.menu_id, d.title, d.description, d.price, d.created_at
            FROM dish d
            INNER JOIN submenu s ON s.id = d.submenu_id
            WHERE d.submenu_id = $1
            ORDER BY d.created_at, d.id
            "#,
        )
        .bind(submenu_id)
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(DishRecord::from).collect())
    }

    async fn find_dish(&self, id: Uuid) -> Result<Option<DishRecord>, RepoError> {
        let row = sqlx::query_as::<_, DishRow>(
            r#"
            SELECT d.id, d.submenu_id, s.menu_id, d.title, d.description, d.price, d.created_at
            FROM dish d
            INNER JOIN submenu s ON s.id = d.submenu_id
            WHERE d.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(DishRecord::from))
    }
}

#[async_trait]
impl DishesWriteRepo for PostgresRepositories {
    async fn create_dish(&self, params: CreateDishParams) -> Result<Option<DishRecord>, RepoError> {
        // Inserts nothing when the submenu is missing, so the caller sees `None`.
        let row = sqlx::query_as::<_, DishRow>(
            r#"
            WITH parent AS (
                SELECT id, menu_id FROM submenu WHERE id = $2
            ),
            inserted AS (
                INSERT INTO dish (id, submenu_id, title, description, price)
                SELECT $1, parent.id, $3, $4, $5 FROM parent
                RETURNING id, submenu_id, title, description, price, created_at
            )
            SELECT i.id, i.submenu_id, p.menu_id, i.title, i.description, i.price, i.created_at
            FROM inserted i
            INNER JOIN parent p ON p.id = i.submenu_id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(params.submenu_id)
        .bind(params.title)
        .bind(params.description)
        .bind(params.price.into_inner())
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(DishRecord::from))
    }

    async fn update_dish(&self, params: UpdateDishParams) -> Result<Option<DishRecord>, RepoError> {
        let row = sqlx::query_as::<_, DishRow>(
            r#"
            WITH updated AS (
                UPDATE dish
                SET title = COALESCE($2, title),
                    description = COALESCE($3, description),
                    price = COALESCE($4, price)
                WHERE id = $1
                RETURNING id, submenu_id, title, description, price, created_at
            )
            SELECT u.id, u.submenu_id, s.menu_id, u.title, u.description, u.price, u.created_at
            FROM updated u
            INNER JOIN submenu s ON s.id = u.submenu_id
            "#,
        )
        .bind(params.id)
        .bind(params.title)
        .bind(params.description)
        .bind(params.price.map(Price::into_inner))
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(DishRecord::from))
    }

    async fn delete_dish(&self, id: Uuid) -> Result<Option<DishRecord>, RepoError> {
        let row = sqlx::query_as::<_, DishRow>(
            r#"
            DELETE FROM dish d
            USING submenu s
            WHERE d.id = $1 AND s.id = d.submenu_id
            RETURNING d.id, d.submenu_id, s.menu_id, d.title, d.description, d.price, d.created_at
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(DishRecord::from))
    }
}
