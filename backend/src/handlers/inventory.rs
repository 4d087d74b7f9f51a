//! HTTP handlers for inventory endpoints

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::AuthUser;
use crate::services::inventory::{
    CreateIngredientInput, IngredientRecord, InventoryService, ManualAdjustInput,
    ReconciliationRow, StockEntryView, UpdateIngredientInput,
};
use crate::AppState;
use shared::models::Role;

#[derive(Debug, Default, Deserialize)]
pub struct EntryListQuery {
    /// "csv" switches the response to a file download
    pub format: Option<String>,
}

/// List ingredients
pub async fn list_ingredients(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<IngredientRecord>>> {
    let service = InventoryService::new(state.db);
    let ingredients = service.list_ingredients().await?;
    Ok(Json(ingredients))
}

/// Get one ingredient
pub async fn get_ingredient(
    State(state): State<AppState>,
    Path(ingredient_id): Path<Uuid>,
) -> AppResult<Json<IngredientRecord>> {
    let service = InventoryService::new(state.db);
    let ingredient = service.get_ingredient(ingredient_id).await?;
    Ok(Json(ingredient))
}

/// Create an ingredient
pub async fn create_ingredient(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(input): Json<CreateIngredientInput>,
) -> AppResult<Json<IngredientRecord>> {
    auth.require_role(&[Role::Admin, Role::Manager])?;
    let service = InventoryService::new(state.db);
    let ingredient = service.create_ingredient(input).await?;
    Ok(Json(ingredient))
}

/// Update an ingredient's descriptive fields
pub async fn update_ingredient(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(ingredient_id): Path<Uuid>,
    Json(input): Json<UpdateIngredientInput>,
) -> AppResult<Json<IngredientRecord>> {
    auth.require_role(&[Role::Admin, Role::Manager])?;
    let service = InventoryService::new(state.db);
    let ingredient = service.update_ingredient(ingredient_id, input).await?;
    Ok(Json(ingredient))
}

/// Delete an ingredient
pub async fn delete_ingredient(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(ingredient_id): Path<Uuid>,
) -> AppResult<Json<()>> {
    auth.require_role(&[Role::Admin])?;
    let service = InventoryService::new(state.db);
    service.delete_ingredient(ingredient_id).await?;
    Ok(Json(()))
}

/// Record a manual stock correction
pub async fn manual_adjust(
    State(state): State<AppState>,
    Json(input): Json<ManualAdjustInput>,
) -> AppResult<Json<IngredientRecord>> {
    let service = InventoryService::new(state.db);
    let ingredient = service.manual_adjust(input).await?;
    Ok(Json(ingredient))
}

/// List ledger entries; `?format=csv` downloads them instead.
/// Cashiers see manual additions only.
pub async fn list_stock_entries(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Query(query): Query<EntryListQuery>,
) -> AppResult<Response> {
    let service = InventoryService::new(state.db);
    let entries = service.list_entries(auth.role).await?;

    if query.format.as_deref() == Some("csv") {
        let csv = InventoryService::export_entries_csv(&entries)?;
        return Ok((
            [
                (header::CONTENT_TYPE, "text/csv"),
                (
                    header::CONTENT_DISPOSITION,
                    "attachment; filename=\"stock_entries.csv\"",
                ),
            ],
            csv,
        )
            .into_response());
    }

    Ok(Json::<Vec<StockEntryView>>(entries).into_response())
}

/// Ingredients below their low-stock threshold
pub async fn low_stock(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<IngredientRecord>>> {
    let service = InventoryService::new(state.db);
    let ingredients = service.low_stock().await?;
    Ok(Json(ingredients))
}

/// Replay the ledger and report drift against stored balances
pub async fn reconcile_stock(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> AppResult<Json<Vec<ReconciliationRow>>> {
    auth.require_role(&[Role::Admin, Role::Manager])?;
    let service = InventoryService::new(state.db);
    let report = service.reconcile().await?;
    Ok(Json(report))
}
