//! HTTP handlers for menu and recipe endpoints

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::AuthUser;
use crate::services::menu::{
    AddRecipeItemInput, CreateMenuItemInput, MenuItemDetail, MenuItemRecord, MenuService,
    RecipeItemView, UpdateMenuItemInput, UpdateRecipeItemInput,
};
use crate::AppState;
use shared::models::Role;

/// List the menu
pub async fn list_menu_items(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<MenuItemRecord>>> {
    let service = MenuService::new(state.db);
    let items = service.list_menu_items().await?;
    Ok(Json(items))
}

/// Get a menu item with its recipe
pub async fn get_menu_item(
    State(state): State<AppState>,
    Path(menu_item_id): Path<Uuid>,
) -> AppResult<Json<MenuItemDetail>> {
    let service = MenuService::new(state.db);
    let item = service.get_menu_item(menu_item_id).await?;
    Ok(Json(item))
}

/// Create a menu item
pub async fn create_menu_item(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(input): Json<CreateMenuItemInput>,
) -> AppResult<Json<MenuItemRecord>> {
    auth.require_role(&[Role::Admin, Role::Manager])?;
    let service = MenuService::new(state.db);
    let item = service.create_menu_item(input).await?;
    Ok(Json(item))
}

/// Update a menu item
pub async fn update_menu_item(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(menu_item_id): Path<Uuid>,
    Json(input): Json<UpdateMenuItemInput>,
) -> AppResult<Json<MenuItemRecord>> {
    auth.require_role(&[Role::Admin, Role::Manager])?;
    let service = MenuService::new(state.db);
    let item = service.update_menu_item(menu_item_id, input).await?;
    Ok(Json(item))
}

/// Delete a menu item
pub async fn delete_menu_item(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(menu_item_id): Path<Uuid>,
) -> AppResult<Json<()>> {
    auth.require_role(&[Role::Admin, Role::Manager])?;
    let service = MenuService::new(state.db);
    service.delete_menu_item(menu_item_id).await?;
    Ok(Json(()))
}

/// Attach an ingredient to a menu item's recipe
pub async fn add_recipe_item(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(menu_item_id): Path<Uuid>,
    Json(input): Json<AddRecipeItemInput>,
) -> AppResult<Json<RecipeItemView>> {
    auth.require_role(&[Role::Admin, Role::Manager])?;
    let service = MenuService::new(state.db);
    let item = service.add_recipe_item(menu_item_id, input).await?;
    Ok(Json(item))
}

/// Change the per-unit amount of a recipe edge
pub async fn update_recipe_item(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path((_menu_item_id, recipe_item_id)): Path<(Uuid, Uuid)>,
    Json(input): Json<UpdateRecipeItemInput>,
) -> AppResult<Json<RecipeItemView>> {
    auth.require_role(&[Role::Admin, Role::Manager])?;
    let service = MenuService::new(state.db);
    let item = service.update_recipe_item(recipe_item_id, input).await?;
    Ok(Json(item))
}

/// Detach an ingredient from a recipe
pub async fn delete_recipe_item(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path((_menu_item_id, recipe_item_id)): Path<(Uuid, Uuid)>,
) -> AppResult<Json<()>> {
    auth.require_role(&[Role::Admin, Role::Manager])?;
    let service = MenuService::new(state.db);
    service.delete_recipe_item(recipe_item_id).await?;
    Ok(Json(()))
}
