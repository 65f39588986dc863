//! Request and response bodies for the carta catalog API.
//!
//! These types are the JSON contract shared by the server and any client. The
//! server also stores them verbatim inside cache envelopes, so every response
//! type is both `Serialize` and `Deserialize`.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuResponse {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub submenus_count: u64,
    pub dishes_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmenuResponse {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub dishes_count: u64,
}

/// A dish as returned to clients. `price` is always formatted with two decimals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DishResponse {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub price: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuCreateRequest {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MenuPatchRequest {
    pub title: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmenuCreateRequest {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubmenuPatchRequest {
    pub title: Option<String>,
    pub description: Option<String>,
}

/// Price as sent by clients: either a JSON string (`"13.5"`) or a JSON number (`13.5`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PriceInput {
    Text(String),
    Number(f64),
}

impl PriceInput {
    pub fn as_text(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Number(value) => value.to_string(),
        }
    }
}

impl From<&str> for PriceInput {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DishCreateRequest {
    pub title: String,
    pub description: String,
    pub price: PriceInput,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DishPatchRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<PriceInput>,
}

/// Outcome of a delete request. Deleting a missing entity is reported with `status: false`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub status: bool,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub detail: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmenuTreeNode {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub dishes: Vec<DishResponse>,
}

/// One menu of the whole-catalog view, with its submenus and dishes nested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuTreeNode {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub submenus: Vec<SubmenuTreeNode>,
}
