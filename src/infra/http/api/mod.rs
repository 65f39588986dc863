pub mod error;
pub mod handlers;
pub mod state;

pub use state::ApiState;

use axum::{
    Router,
    routing::{MethodRouter, get},
};

const MENUS: &str = "/api/v1/menus";
const MENU: &str = "/api/v1/menus/{menu_id}";
const SUBMENUS: &str = "/api/v1/menus/{menu_id}/submenus";
const SUBMENU: &str = "/api/v1/menus/{menu_id}/submenus/{submenu_id}";
const DISHES: &str = "/api/v1/menus/{menu_id}/submenus/{submenu_id}/dishes";
const DISH: &str = "/api/v1/menus/{menu_id}/submenus/{submenu_id}/dishes/{dish_id}";
const TREE: &str = "/api/v1/menus/tree";

pub fn build_api_router() -> Router<ApiState> {
    let routes: [(&str, MethodRouter<ApiState>); 7] = [
        (
            MENUS,
            get(handlers::list_menus)
                .post(handlers::create_menu)
                .delete(handlers::clear_catalog),
        ),
        (TREE, get(handlers::get_tree)),
        (
            MENU,
            get(handlers::get_menu)
                .patch(handlers::update_menu)
                .delete(handlers::delete_menu),
        ),
        (
            SUBMENUS,
            get(handlers::list_submenus).post(handlers::create_submenu),
        ),
        (
            SUBMENU,
            get(handlers::get_submenu)
                .patch(handlers::update_submenu)
                .delete(handlers::delete_submenu),
        ),
        (
            DISHES,
            get(handlers::list_dishes).post(handlers::create_dish),
        ),
        (
            DISH,
            get(handlers::get_dish)
                .patch(handlers::update_dish)
                .delete(handlers::delete_dish),
        ),
    ];

    // Every route also answers with a trailing slash.
    routes
        .into_iter()
        .fold(Router::new(), |router, (path, method_router)| {
            router
                .route(&format!("{path}/"), method_router.clone())
                .route(path, method_router)
        })
}
