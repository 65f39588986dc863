//! Cache key definitions.
//!
//! Every key is `{category}:{identifier}`. Categories are disjoint, so a menu
//! id can never collide with a submenu list keyed by the same id.

use std::fmt;

use uuid::Uuid;

const LIST_ROOT: &str = "root";
const TREE_ALL: &str = "all";

/// Namespace of a cache entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CacheCategory {
    Menu,
    Submenu,
    Dish,
    AllMenu,
    AllSubmenu,
    AllDish,
    MenuTree,
}

impl CacheCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            CacheCategory::Menu => "menu",
            CacheCategory::Submenu => "submenu",
            CacheCategory::Dish => "dish",
            CacheCategory::AllMenu => "all_menu",
            CacheCategory::AllSubmenu => "all_submenu",
            CacheCategory::AllDish => "all_dish",
            CacheCategory::MenuTree => "menu_tree",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey {
    category: CacheCategory,
    identifier: String,
}

impl CacheKey {
    pub fn new(category: CacheCategory, identifier: impl Into<String>) -> Self {
        Self {
            category,
            identifier: identifier.into(),
        }
    }

    pub fn menu(id: Uuid) -> Self {
        Self::new(CacheCategory::Menu, id.to_string())
    }

    pub fn submenu(id: Uuid) -> Self {
        Self::new(CacheCategory::Submenu, id.to_string())
    }

    pub fn dish(id: Uuid) -> Self {
        Self::new(CacheCategory::Dish, id.to_string())
    }

    /// The list of every menu.
    pub fn menu_list() -> Self {
        Self::new(CacheCategory::AllMenu, LIST_ROOT)
    }

    /// The submenus of one menu.
    pub fn submenu_list(menu_id: Uuid) -> Self {
        Self::new(CacheCategory::AllSubmenu, menu_id.to_string())
    }

    /// The dishes of one submenu.
    pub fn dish_list(submenu_id: Uuid) -> Self {
        Self::new(CacheCategory::AllDish, submenu_id.to_string())
    }

    pub fn menu_tree() -> Self {
        Self::new(CacheCategory::MenuTree, TREE_ALL)
    }

    pub fn category(&self) -> CacheCategory {
        self.category
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.category.as_str(), self.identifier)
    }
}
