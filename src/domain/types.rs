//! Shared domain enumerations.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The three levels of the catalog hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Menu,
    Submenu,
    Dish,
}

impl EntityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::Menu => "menu",
            EntityKind::Submenu => "submenu",
            EntityKind::Dish => "dish",
        }
    }

    pub fn not_found_message(self) -> &'static str {
        match self {
            EntityKind::Menu => "menu not found",
            EntityKind::Submenu => "submenu not found",
            EntityKind::Dish => "dish not found",
        }
    }

    pub fn deleted_message(self) -> &'static str {
        match self {
            EntityKind::Menu => "menu has been deleted",
            EntityKind::Submenu => "submenu has been deleted",
            EntityKind::Dish => "dish has been deleted",
        }
    }

    /// Message reported when a create or rename collides with an existing row.
    pub fn conflict_message(self) -> &'static str {
        match self {
            EntityKind::Menu => "This menu title already exists",
            EntityKind::Submenu => "This submenu already exists or wrong menu_id",
            EntityKind::Dish => "This dish title already exists",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
