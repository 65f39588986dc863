//! Domain entities mirrored from persistent storage.

use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::price::Price;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MenuRecord {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmenuRecord {
    pub id: Uuid,
    pub menu_id: Uuid,
    pub title: String,
    pub description: String,
    pub created_at: OffsetDateTime,
}

/// A dish row together with the menu that owns its submenu.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DishRecord {
    pub id: Uuid,
    pub submenu_id: Uuid,
    pub menu_id: Uuid,
    pub title: String,
    pub description: String,
    pub price: Price,
    pub created_at: OffsetDateTime,
}

/// Ids removed together with a menu by the cascade.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MenuCascade {
    pub submenu_ids: Vec<Uuid>,
    pub dish_ids: Vec<Uuid>,
}

/// Ids removed together with a submenu by the cascade.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmenuCascade {
    pub menu_id: Uuid,
    pub dish_ids: Vec<Uuid>,
}
