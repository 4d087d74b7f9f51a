//! Menu service: sellable items and their recipe edges

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Menu service for menu items and recipes
#[derive(Clone)]
pub struct MenuService {
    db: PgPool,
}

/// Menu item record
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct MenuItemRecord {
    pub id: Uuid,
    pub name: String,
    pub price: i64,
    pub created_at: DateTime<Utc>,
}

/// Input for creating or renaming a menu item
#[derive(Debug, Deserialize)]
pub struct CreateMenuItemInput {
    pub name: String,
    pub price: i64,
}

#[derive(Debug, Deserialize)]
pub struct UpdateMenuItemInput {
    pub name: Option<String>,
    pub price: Option<i64>,
}

/// Recipe edge joined with ingredient metadata
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct RecipeItemView {
    pub id: Uuid,
    pub menu_item_id: Uuid,
    pub ingredient_id: Uuid,
    pub ingredient_name: String,
    pub unit: String,
    pub amount_per_unit: Decimal,
}

/// Input for attaching an ingredient to a menu item
#[derive(Debug, Deserialize)]
pub struct AddRecipeItemInput {
    pub ingredient_id: Uuid,
    pub amount_per_unit: Decimal,
}

#[derive(Debug, Deserialize)]
pub struct UpdateRecipeItemInput {
    pub amount_per_unit: Decimal,
}

/// Menu item with its full recipe
#[derive(Debug, Serialize)]
pub struct MenuItemDetail {
    #[serde(flatten)]
    pub menu_item: MenuItemRecord,
    pub recipe: Vec<RecipeItemView>,
}

impl MenuService {
    /// Create a new MenuService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// List the menu
    pub async fn list_menu_items(&self) -> AppResult<Vec<MenuItemRecord>> {
        let items = sqlx::query_as::<_, MenuItemRecord>(
            "SELECT id, name, price, created_at FROM menu_items ORDER BY name",
        )
        .fetch_all(&self.db)
        .await?;

        Ok(items)
    }

    /// Get a menu item with its recipe
    pub async fn get_menu_item(&self, menu_item_id: Uuid) -> AppResult<MenuItemDetail> {
        let menu_item = sqlx::query_as::<_, MenuItemRecord>(
            "SELECT id, name, price, created_at FROM menu_items WHERE id = $1",
        )
        .bind(menu_item_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Menu item".to_string()))?;

        let recipe = self.get_recipe(menu_item_id).await?;

        Ok(MenuItemDetail { menu_item, recipe })
    }

    /// Recipe edges for a menu item
    pub async fn get_recipe(&self, menu_item_id: Uuid) -> AppResult<Vec<RecipeItemView>> {
        let recipe = sqlx::query_as::<_, RecipeItemView>(
            r#"
            SELECT r.id, r.menu_item_id, r.ingredient_id, i.name AS ingredient_name,
                   i.unit, r.amount_per_unit
            FROM recipe_items r
            JOIN ingredients i ON i.id = r.ingredient_id
            WHERE r.menu_item_id = $1
            ORDER BY i.name
            "#,
        )
        .bind(menu_item_id)
        .fetch_all(&self.db)
        .await?;

        Ok(recipe)
    }

    /// Create a menu item
    pub async fn create_menu_item(&self, input: CreateMenuItemInput) -> AppResult<MenuItemRecord> {
        if input.price < 0 {
            return Err(AppError::Validation {
                field: "price".to_string(),
                message: "Price cannot be negative".to_string(),
            });
        }

        let item = sqlx::query_as::<_, MenuItemRecord>(
            r#"
            INSERT INTO menu_items (name, price)
            VALUES ($1, $2)
            RETURNING id, name, price, created_at
            "#,
        )
        .bind(input.name.trim())
        .bind(input.price)
        .fetch_one(&self.db)
        .await?;

        Ok(item)
    }

    /// Update a menu item
    pub async fn update_menu_item(
        &self,
        menu_item_id: Uuid,
        input: UpdateMenuItemInput,
    ) -> AppResult<MenuItemRecord> {
        let existing = self.get_menu_item(menu_item_id).await?.menu_item;

        let name = input.name.unwrap_or(existing.name);
        let price = input.price.unwrap_or(existing.price);

        if price < 0 {
            return Err(AppError::Validation {
                field: "price".to_string(),
                message: "Price cannot be negative".to_string(),
            });
        }

        let item = sqlx::query_as::<_, MenuItemRecord>(
            r#"
            UPDATE menu_items SET name = $1, price = $2 WHERE id = $3
            RETURNING id, name, price, created_at
            "#,
        )
        .bind(&name)
        .bind(price)
        .bind(menu_item_id)
        .fetch_one(&self.db)
        .await?;

        Ok(item)
    }

    /// Delete a menu item and its recipe (cascade)
    pub async fn delete_menu_item(&self, menu_item_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM menu_items WHERE id = $1")
            .bind(menu_item_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Menu item".to_string()));
        }

        Ok(())
    }

    /// Attach an ingredient to a menu item's recipe.
    /// One edge per (menu item, ingredient) pair.
    pub async fn add_recipe_item(
        &self,
        menu_item_id: Uuid,
        input: AddRecipeItemInput,
    ) -> AppResult<RecipeItemView> {
        if input.amount_per_unit <= Decimal::ZERO {
            return Err(AppError::Validation {
                field: "amount_per_unit".to_string(),
                message: "Amount per unit must be positive".to_string(),
            });
        }

        let menu_exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM menu_items WHERE id = $1)",
        )
        .bind(menu_item_id)
        .fetch_one(&self.db)
        .await?;
        if !menu_exists {
            return Err(AppError::NotFound("Menu item".to_string()));
        }

        let ingredient_exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM ingredients WHERE id = $1)",
        )
        .bind(input.ingredient_id)
        .fetch_one(&self.db)
        .await?;
        if !ingredient_exists {
            return Err(AppError::NotFound("Ingredient".to_string()));
        }

        let duplicate = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM recipe_items WHERE menu_item_id = $1 AND ingredient_id = $2)",
        )
        .bind(menu_item_id)
        .bind(input.ingredient_id)
        .fetch_one(&self.db)
        .await?;
        if duplicate {
            return Err(AppError::DuplicateEntry("recipe ingredient".to_string()));
        }

        let recipe_item_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO recipe_items (menu_item_id, ingredient_id, amount_per_unit)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(menu_item_id)
        .bind(input.ingredient_id)
        .bind(input.amount_per_unit)
        .fetch_one(&self.db)
        .await?;

        self.get_recipe_item(recipe_item_id).await
    }

    /// Change the per-unit amount of a recipe edge
    pub async fn update_recipe_item(
        &self,
        recipe_item_id: Uuid,
        input: UpdateRecipeItemInput,
    ) -> AppResult<RecipeItemView> {
        if input.amount_per_unit <= Decimal::ZERO {
            return Err(AppError::Validation {
                field: "amount_per_unit".to_string(),
                message: "Amount per unit must be positive".to_string(),
            });
        }

        let result = sqlx::query("UPDATE recipe_items SET amount_per_unit = $1 WHERE id = $2")
            .bind(input.amount_per_unit)
            .bind(recipe_item_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Recipe item".to_string()));
        }

        self.get_recipe_item(recipe_item_id).await
    }

    /// Detach an ingredient from a recipe
    pub async fn delete_recipe_item(&self, recipe_item_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM recipe_items WHERE id = $1")
            .bind(recipe_item_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Recipe item".to_string()));
        }

        Ok(())
    }

    async fn get_recipe_item(&self, recipe_item_id: Uuid) -> AppResult<RecipeItemView> {
        let item = sqlx::query_as::<_, RecipeItemView>(
            r#"
            SELECT r.id, r.menu_item_id, r.ingredient_id, i.name AS ingredient_name,
                   i.unit, r.amount_per_unit
            FROM recipe_items r
            JOIN ingredients i ON i.id = r.ingredient_id
            WHERE r.id = $1
            "#,
        )
        .bind(recipe_item_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Recipe item".to_string()))?;

        Ok(item)
    }
}
