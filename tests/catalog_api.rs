mod support;

use axum::http::StatusCode;
use carta::cache::CatalogCache;
use serde_json::{Value, json};

use support::{app_with_cache, delete, get, id_of, memory_cache, patch, post};

const MENUS: &str = "/api/v1/menus";

fn submenus_uri(menu_id: &str) -> String {
    format!("{MENUS}/{menu_id}/submenus")
}

fn dishes_uri(menu_id: &str, submenu_id: &str) -> String {
    format!("{MENUS}/{menu_id}/submenus/{submenu_id}/dishes")
}

/// Runs the full menu → submenu → dishes lifecycle and returns every observed response.
async fn run_lifecycle(cache: CatalogCache) -> Vec<(StatusCode, Value)> {
    let (router, _) = app_with_cache(cache);
    let mut seen = Vec::new();

    let (status, menu) = post(
        &router,
        MENUS,
        json!({ "title": "My menu 1", "description": "My menu description 1" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(menu["submenus_count"], 0);
    assert_eq!(menu["dishes_count"], 0);
    let menu_id = id_of(&menu);

    let (status, submenu) = post(
        &router,
        &submenus_uri(&menu_id),
        json!({ "title": "My submenu 1", "description": "My submenu description 1" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(submenu["dishes_count"], 0);
    let submenu_id = id_of(&submenu);

    let (status, first) = post(
        &router,
        &dishes_uri(&menu_id, &submenu_id),
        json!({ "title": "My dish 1", "description": "My dish description 1", "price": "13.50" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(first["price"], "13.50");

    let (status, second) = post(
        &router,
        &dishes_uri(&menu_id, &submenu_id),
        json!({ "title": "My dish 2", "description": "My dish description 2", "price": "12.5" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(second["price"], "12.50");

    let (status, menu) = get(&router, &format!("{MENUS}/{menu_id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(menu["submenus_count"], 1);
    assert_eq!(menu["dishes_count"], 2);
    seen.push((status, menu));

    let (status, submenu) = get(&router, &format!("{}/{submenu_id}", submenus_uri(&menu_id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(submenu["dishes_count"], 2);
    seen.push((status, submenu));

    let (status, outcome) = delete(&router, &format!("{}/{submenu_id}", submenus_uri(&menu_id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        outcome,
        json!({ "status": true, "message": "submenu has been deleted" })
    );

    let (status, submenus) = get(&router, &submenus_uri(&menu_id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(submenus, json!([]));
    seen.push((status, submenus));

    let (status, dishes) = get(&router, &dishes_uri(&menu_id, &submenu_id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(dishes, json!([]));
    seen.push((status, dishes));

    let (status, menu) = get(&router, &format!("{MENUS}/{menu_id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(menu["submenus_count"], 0);
    assert_eq!(menu["dishes_count"], 0);
    seen.push((status, menu));

    let (status, outcome) = delete(&router, &format!("{MENUS}/{menu_id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(outcome, json!({ "status": true, "message": "menu has been deleted" }));

    let (status, menus) = get(&router, MENUS).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(menus, json!([]));
    seen.push((status, menus));

    let (status, missing) = get(&router, &format!("{MENUS}/{menu_id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(missing, json!({ "detail": "menu not found" }));
    seen.push((status, missing));

    seen
}

fn strip_ids(observed: Vec<(StatusCode, Value)>) -> Vec<(StatusCode, Value)> {
    observed
        .into_iter()
        .map(|(status, mut value)| {
            if let Some(object) = value.as_object_mut() {
                object.remove("id");
            }
            (status, value)
        })
        .collect()
}

#[tokio::test]
async fn lifecycle_with_memory_cache() {
    let (cache, _) = memory_cache();
    run_lifecycle(cache).await;
}

#[tokio::test]
async fn disabled_cache_observes_identical_outcomes() {
    let (cache, _) = memory_cache();
    let cached = run_lifecycle(cache).await;
    let uncached = run_lifecycle(CatalogCache::disabled()).await;

    assert_eq!(strip_ids(cached), strip_ids(uncached));
}

#[tokio::test]
async fn duplicate_titles_conflict_and_keep_the_original() {
    let (cache, _) = memory_cache();
    let (router, _) = app_with_cache(cache);

    let (_, menu) = post(&router, MENUS, json!({ "title": "Lunch", "description": "" })).await;
    let (status, body) = post(&router, MENUS, json!({ "title": "Lunch", "description": "again" })).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body, json!({ "detail": "This menu title already exists" }));

    let (status, original) = get(&router, &format!("{MENUS}/{}", id_of(&menu))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(original["description"], "");

    let menu_id = id_of(&menu);
    let (_, submenu) = post(&router, &submenus_uri(&menu_id), json!({ "title": "Soups", "description": "" })).await;
    let (status, body) = post(&router, &submenus_uri(&menu_id), json!({ "title": "Soups", "description": "" })).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(
        body,
        json!({ "detail": "This submenu already exists or wrong menu_id" })
    );

    let dishes = dishes_uri(&menu_id, &id_of(&submenu));
    post(&router, &dishes, json!({ "title": "Borscht", "description": "", "price": "5" })).await;
    let (status, body) = post(&router, &dishes, json!({ "title": "Borscht", "description": "", "price": "6" })).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body, json!({ "detail": "This dish title already exists" }));
}

#[tokio::test]
async fn submenu_under_missing_menu_is_a_conflict() {
    let (router, _) = app_with_cache(CatalogCache::disabled());
    let missing = uuid::Uuid::new_v4().to_string();

    let (status, body) = post(&router, &submenus_uri(&missing), json!({ "title": "Orphan", "description": "" })).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(
        body,
        json!({ "detail": "This submenu already exists or wrong menu_id" })
    );
}

#[tokio::test]
async fn dish_under_missing_submenu_is_not_found() {
    let (router, _) = app_with_cache(CatalogCache::disabled());
    let (_, menu) = post(&router, MENUS, json!({ "title": "Dinner", "description": "" })).await;
    let missing = uuid::Uuid::new_v4().to_string();

    let (status, body) = post(
        &router,
        &dishes_uri(&id_of(&menu), &missing),
        json!({ "title": "Ghost", "description": "", "price": "1" }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "detail": "submenu not found" }));
}

#[tokio::test]
async fn prices_are_normalized_and_validated() {
    let (cache, _) = memory_cache();
    let (router, _) = app_with_cache(cache);
    let (_, menu) = post(&router, MENUS, json!({ "title": "Bar", "description": "" })).await;
    let menu_id = id_of(&menu);
    let (_, submenu) = post(&router, &submenus_uri(&menu_id), json!({ "title": "Drinks", "description": "" })).await;
    let dishes = dishes_uri(&menu_id, &id_of(&submenu));

    let (status, dish) = post(&router, &dishes, json!({ "title": "Tea", "description": "", "price": "15.25621" })).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(dish["price"], "15.26");

    let (status, dish) = post(&router, &dishes, json!({ "title": "Coffee", "description": "", "price": 4 })).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(dish["price"], "4.00");

    let (status, body) = post(&router, &dishes, json!({ "title": "Water", "description": "", "price": "free" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "detail": "price is not digits" }));

    let (status, dishes_list) = get(&router, &dishes).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(dishes_list.as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn patch_updates_only_given_fields_and_refreshes_reads() {
    let (cache, _) = memory_cache();
    let (router, _) = app_with_cache(cache);
    let (_, menu) = post(
        &router,
        MENUS,
        json!({ "title": "Breakfast", "description": "morning" }),
    )
    .await;
    let uri = format!("{MENUS}/{}", id_of(&menu));

    // Warm the cache before mutating.
    get(&router, &uri).await;
    get(&router, MENUS).await;

    let (status, updated) = patch(&router, &uri, json!({ "title": "Brunch" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["title"], "Brunch");
    assert_eq!(updated["description"], "morning");

    let (_, read_back) = get(&router, &uri).await;
    assert_eq!(read_back["title"], "Brunch");
    let (_, listed) = get(&router, MENUS).await;
    assert_eq!(listed[0]["title"], "Brunch");

    let missing = format!("{MENUS}/{}", uuid::Uuid::new_v4());
    let (status, body) = patch(&router, &missing, json!({ "title": "Nope" })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "detail": "menu not found" }));
}

#[tokio::test]
async fn patching_a_missing_entity_with_a_taken_title_is_not_found() {
    let (router, _) = app_with_cache(CatalogCache::disabled());
    let (_, menu) = post(&router, MENUS, json!({ "title": "Taken", "description": "" })).await;
    let menu_id = id_of(&menu);
    let (_, submenu) = post(
        &router,
        &submenus_uri(&menu_id),
        json!({ "title": "Taken submenu", "description": "" }),
    )
    .await;
    let submenu_id = id_of(&submenu);
    post(
        &router,
        &dishes_uri(&menu_id, &submenu_id),
        json!({ "title": "Taken dish", "description": "", "price": "1" }),
    )
    .await;
    let missing = uuid::Uuid::new_v4();

    let cases = [
        (format!("{MENUS}/{missing}"), "Taken", "menu not found"),
        (
            format!("{}/{missing}", submenus_uri(&menu_id)),
            "Taken submenu",
            "submenu not found",
        ),
        (
            format!("{}/{missing}", dishes_uri(&menu_id, &submenu_id)),
            "Taken dish",
            "dish not found",
        ),
    ];
    for (uri, title, detail) in cases {
        let (status, body) = patch(&router, &uri, json!({ "title": title })).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
        assert_eq!(body, json!({ "detail": detail }));
    }
}

#[tokio::test]
async fn dish_patch_and_delete_move_counts() {
    let (cache, _) = memory_cache();
    let (router, _) = app_with_cache(cache);
    let (_, menu) = post(&router, MENUS, json!({ "title": "Cafe", "description": "" })).await;
    let menu_id = id_of(&menu);
    let (_, submenu) = post(&router, &submenus_uri(&menu_id), json!({ "title": "Cakes", "description": "" })).await;
    let submenu_id = id_of(&submenu);
    let dishes = dishes_uri(&menu_id, &submenu_id);
    let (_, dish) = post(&router, &dishes, json!({ "title": "Napoleon", "description": "", "price": "3.1" })).await;
    let dish_uri = format!("{dishes}/{}", id_of(&dish));

    let (_, menu_before) = get(&router, &format!("{MENUS}/{menu_id}")).await;
    assert_eq!(menu_before["dishes_count"], 1);

    let (status, updated) = patch(&router, &dish_uri, json!({ "price": "3.999" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["price"], "4.00");
    assert_eq!(updated["title"], "Napoleon");
    let (_, read_back) = get(&router, &dish_uri).await;
    assert_eq!(read_back["price"], "4.00");

    let (status, outcome) = delete(&router, &dish_uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(outcome, json!({ "status": true, "message": "dish has been deleted" }));

    let (_, menu_after) = get(&router, &format!("{MENUS}/{menu_id}")).await;
    assert_eq!(menu_after["dishes_count"], 0);
    let (_, submenu_after) = get(&router, &format!("{}/{submenu_id}", submenus_uri(&menu_id))).await;
    assert_eq!(submenu_after["dishes_count"], 0);

    let (status, body) = get(&router, &dish_uri).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "detail": "dish not found" }));
}

#[tokio::test]
async fn deleting_missing_entities_reports_status_false() {
    let (router, _) = app_with_cache(CatalogCache::disabled());
    let id = uuid::Uuid::new_v4();

    let (status, body) = delete(&router, &format!("{MENUS}/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": false, "message": "menu not found" }));

    let (status, body) = delete(&router, &format!("{MENUS}/{id}/submenus/{id}/dishes/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": false, "message": "dish not found" }));
}

#[tokio::test]
async fn malformed_ids_are_not_found_with_driver_message() {
    let (router, _) = app_with_cache(CatalogCache::disabled());

    let (status, body) = get(&router, &format!("{MENUS}/not-a-uuid")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body,
        json!({ "detail": "invalid input syntax for type uuid: \"not-a-uuid\"" })
    );
}

#[tokio::test]
async fn schema_mismatch_is_unprocessable() {
    let (router, catalog) = app_with_cache(CatalogCache::disabled());

    let (status, body) = post(&router, MENUS, json!({ "description": "no title" })).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["detail"].is_string());

    let (status, _) = post(&router, MENUS, json!({ "title": "No description" })).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(catalog.row_counts().await, (0, 0, 0));
}

#[tokio::test]
async fn blank_title_is_rejected_before_the_store() {
    let (router, catalog) = app_with_cache(CatalogCache::disabled());

    let (status, _) = post(&router, MENUS, json!({ "title": "   ", "description": "" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(catalog.row_counts().await, (0, 0, 0));
}

#[tokio::test]
async fn trailing_slashes_are_accepted() {
    let (router, _) = app_with_cache(CatalogCache::disabled());

    let (status, _) = post(&router, &format!("{MENUS}/"), json!({ "title": "Slash", "description": "" })).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, menus) = get(&router, &format!("{MENUS}/")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(menus.as_array().map(Vec::len), Some(1));

    let menu_id = id_of(&menus[0]);
    let (status, submenus) = get(&router, &format!("{}/", submenus_uri(&menu_id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(submenus, json!([]));
}

#[tokio::test]
async fn tree_nests_catalog_and_tracks_mutations() {
    let (cache, _) = memory_cache();
    let (router, _) = app_with_cache(cache);
    let tree_uri = format!("{MENUS}/tree");

    let (status, tree) = get(&router, &tree_uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(tree, json!([]));

    let (_, menu) = post(&router, MENUS, json!({ "title": "Main", "description": "" })).await;
    let menu_id = id_of(&menu);
    let (_, submenu) = post(&router, &submenus_uri(&menu_id), json!({ "title": "Grill", "description": "" })).await;
    post(
        &router,
        &dishes_uri(&menu_id, &id_of(&submenu)),
        json!({ "title": "Steak", "description": "", "price": "20" }),
    )
    .await;

    let (status, tree) = get(&router, &tree_uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(tree[0]["title"], "Main");
    assert_eq!(tree[0]["submenus"][0]["title"], "Grill");
    assert_eq!(tree[0]["submenus"][0]["dishes"][0]["price"], "20.00");

    delete(&router, &format!("{MENUS}/{menu_id}")).await;
    let (_, tree) = get(&router, &tree_uri).await;
    assert_eq!(tree, json!([]));
}

#[tokio::test]
async fn clearing_removes_everything_and_flushes_cache() {
    let (cache, store) = memory_cache();
    let (router, catalog) = app_with_cache(cache);

    let (_, menu) = post(&router, MENUS, json!({ "title": "Seasonal", "description": "" })).await;
    let menu_id = id_of(&menu);
    post(&router, &submenus_uri(&menu_id), json!({ "title": "Autumn", "description": "" })).await;
    get(&router, MENUS).await;
    assert!(!store.is_empty());

    let (status, outcome) = delete(&router, MENUS).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        outcome,
        json!({ "status": true, "message": "catalog has been cleared" })
    );
    assert!(store.is_empty());
    assert_eq!(catalog.row_counts().await, (0, 0, 0));

    let (_, menus) = get(&router, MENUS).await;
    assert_eq!(menus, json!([]));
}

#[tokio::test]
async fn health_reflects_store_availability() {
    let (router, catalog) = app_with_cache(CatalogCache::disabled());

    let (status, _) = get(&router, "/health").await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    catalog.set_unhealthy(true);
    let (status, _) = get(&router, "/health").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}
