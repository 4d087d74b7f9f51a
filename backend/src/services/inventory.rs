//! Inventory service: ingredient CRUD and the append-only stock ledger
//!
//! Every balance change goes through [`InventoryService::post_entry`],
//! the single write boundary where the sign convention is normalized:
//! ledger rows always store a positive magnitude and the reason
//! determines the direction applied to `quantity_in_stock`.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgConnection, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::models::{ledger_net, reason_direction, Role, StockReason};

/// Inventory service for ingredients and stock entries
#[derive(Clone)]
pub struct InventoryService {
    db: PgPool,
}

/// Direction of a manual stock correction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdjustDirection {
    Add,
    Deduct,
}

impl AdjustDirection {
    fn reason(&self) -> StockReason {
        match self {
            AdjustDirection::Add => StockReason::ManualAdd,
            AdjustDirection::Deduct => StockReason::ManualDeduct,
        }
    }
}

/// Ingredient record
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct IngredientRecord {
    pub id: Uuid,
    pub name: String,
    pub unit: String,
    pub quantity_in_stock: Decimal,
    pub low_stock_threshold: Decimal,
    pub created_at: DateTime<Utc>,
}

/// Input for creating an ingredient
#[derive(Debug, Deserialize)]
pub struct CreateIngredientInput {
    pub name: String,
    pub unit: Option<String>,
    /// Starting stock; posted as a manual_add entry so the ledger
    /// stays replayable from empty
    pub quantity_in_stock: Option<Decimal>,
    pub low_stock_threshold: Option<Decimal>,
}

/// Input for updating an ingredient. The balance itself is not
/// editable here; stock moves only through ledger postings.
#[derive(Debug, Deserialize)]
pub struct UpdateIngredientInput {
    pub name: Option<String>,
    pub unit: Option<String>,
    pub low_stock_threshold: Option<Decimal>,
}

/// Input for a manual stock correction
#[derive(Debug, Deserialize)]
pub struct ManualAdjustInput {
    pub ingredient_id: Uuid,
    pub quantity: Decimal,
    pub direction: AdjustDirection,
}

/// Ledger row joined with its ingredient, for listings and export
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct StockEntryView {
    pub id: Uuid,
    pub ingredient_id: Uuid,
    pub ingredient_name: String,
    pub unit: String,
    pub quantity: Decimal,
    pub reason: String,
    pub recorded_at: DateTime<Utc>,
}

/// Drift between an ingredient's stored balance and its replayed ledger
#[derive(Debug, Serialize)]
pub struct ReconciliationRow {
    pub ingredient_id: Uuid,
    pub name: String,
    pub stored_balance: Decimal,
    pub ledger_net: Decimal,
    pub drift: Decimal,
}

#[derive(Debug, FromRow)]
struct LedgerRow {
    reason: String,
    quantity: Decimal,
}

impl InventoryService {
    /// Create a new InventoryService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Append a ledger entry and apply its signed effect to the
    /// ingredient balance. Runs on the caller's connection so order
    /// creation and deletion can batch postings in one transaction.
    ///
    /// `quantity` is an unsigned magnitude; no floor check is applied,
    /// balances may go negative.
    pub async fn post_entry(
        conn: &mut PgConnection,
        ingredient_id: Uuid,
        quantity: Decimal,
        reason: StockReason,
    ) -> AppResult<()> {
        let delta = quantity * Decimal::from(reason_direction(reason.as_str()));

        sqlx::query("UPDATE ingredients SET quantity_in_stock = quantity_in_stock + $1 WHERE id = $2")
            .bind(delta)
            .bind(ingredient_id)
            .execute(&mut *conn)
            .await?;

        sqlx::query(
            "INSERT INTO stock_entries (ingredient_id, quantity, reason) VALUES ($1, $2, $3)",
        )
        .bind(ingredient_id)
        .bind(quantity)
        .bind(reason.as_str())
        .execute(&mut *conn)
        .await?;

        Ok(())
    }

    /// List all ingredients for the dashboard
    pub async fn list_ingredients(&self) -> AppResult<Vec<IngredientRecord>> {
        let ingredients = sqlx::query_as::<_, IngredientRecord>(
            "SELECT id, name, unit, quantity_in_stock, low_stock_threshold, created_at
             FROM ingredients ORDER BY name",
        )
        .fetch_all(&self.db)
        .await?;

        Ok(ingredients)
    }

    /// Get one ingredient
    pub async fn get_ingredient(&self, ingredient_id: Uuid) -> AppResult<IngredientRecord> {
        let ingredient = sqlx::query_as::<_, IngredientRecord>(
            "SELECT id, name, unit, quantity_in_stock, low_stock_threshold, created_at
             FROM ingredients WHERE id = $1",
        )
        .bind(ingredient_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Ingredient".to_string()))?;

        Ok(ingredient)
    }

    /// Create an ingredient; non-zero starting stock is posted through
    /// the ledger so the balance stays recomputable from the log
    pub async fn create_ingredient(
        &self,
        input: CreateIngredientInput,
    ) -> AppResult<IngredientRecord> {
        if input.name.trim().is_empty() {
            return Err(AppError::Validation {
                field: "name".to_string(),
                message: "Ingredient name cannot be empty".to_string(),
            });
        }

        let unit = input.unit.unwrap_or_else(|| "ml".to_string());
        let threshold = input.low_stock_threshold.unwrap_or(Decimal::from(10));
        let initial = input.quantity_in_stock.unwrap_or(Decimal::ZERO);

        let mut tx = self.db.begin().await?;

        let ingredient_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO ingredients (name, unit, quantity_in_stock, low_stock_threshold)
            VALUES ($1, $2, 0, $3)
            RETURNING id
            "#,
        )
        .bind(input.name.trim())
        .bind(&unit)
        .bind(threshold)
        .fetch_one(&mut *tx)
        .await?;

        if initial != Decimal::ZERO {
            Self::post_entry(&mut tx, ingredient_id, initial.abs(), StockReason::ManualAdd)
                .await?;
        }

        tx.commit().await?;

        self.get_ingredient(ingredient_id).await
    }

    /// Update an ingredient's descriptive fields
    pub async fn update_ingredient(
        &self,
        ingredient_id: Uuid,
        input: UpdateIngredientInput,
    ) -> AppResult<IngredientRecord> {
        let existing = self.get_ingredient(ingredient_id).await?;

        let name = input.name.unwrap_or(existing.name);
        let unit = input.unit.unwrap_or(existing.unit);
        let threshold = input.low_stock_threshold.unwrap_or(existing.low_stock_threshold);

        let ingredient = sqlx::query_as::<_, IngredientRecord>(
            r#"
            UPDATE ingredients
            SET name = $1, unit = $2, low_stock_threshold = $3
            WHERE id = $4
            RETURNING id, name, unit, quantity_in_stock, low_stock_threshold, created_at
            "#,
        )
        .bind(&name)
        .bind(&unit)
        .bind(threshold)
        .bind(ingredient_id)
        .fetch_one(&self.db)
        .await?;

        Ok(ingredient)
    }

    /// Delete an ingredient and its ledger (cascade)
    pub async fn delete_ingredient(&self, ingredient_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM ingredients WHERE id = $1")
            .bind(ingredient_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Ingredient".to_string()));
        }

        Ok(())
    }

    /// Record a manual stock correction
    pub async fn manual_adjust(&self, input: ManualAdjustInput) -> AppResult<IngredientRecord> {
        if input.quantity <= Decimal::ZERO {
            return Err(AppError::Validation {
                field: "quantity".to_string(),
                message: "Quantity must be positive".to_string(),
            });
        }

        let mut tx = self.db.begin().await?;

        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM ingredients WHERE id = $1)",
        )
        .bind(input.ingredient_id)
        .fetch_one(&mut *tx)
        .await?;
        if !exists {
            return Err(AppError::NotFound("Ingredient".to_string()));
        }

        Self::post_entry(
            &mut tx,
            input.ingredient_id,
            input.quantity,
            input.direction.reason(),
        )
        .await?;

        tx.commit().await?;

        self.get_ingredient(input.ingredient_id).await
    }

    /// List ledger entries, newest first. Cashiers only see manual
    /// additions; managers and admins see the full ledger.
    pub async fn list_entries(&self, role: Role) -> AppResult<Vec<StockEntryView>> {
        let base = r#"
            SELECT se.id, se.ingredient_id, i.name AS ingredient_name, i.unit,
                   se.quantity, se.reason, se.recorded_at
            FROM stock_entries se
            JOIN ingredients i ON i.id = se.ingredient_id
        "#;

        let entries = if role == Role::Cashier {
            sqlx::query_as::<_, StockEntryView>(&format!(
                "{} WHERE se.reason = 'manual_add' ORDER BY se.recorded_at DESC",
                base
            ))
            .fetch_all(&self.db)
            .await?
        } else {
            sqlx::query_as::<_, StockEntryView>(&format!(
                "{} ORDER BY se.recorded_at DESC",
                base
            ))
            .fetch_all(&self.db)
            .await?
        };

        Ok(entries)
    }

    /// Export ledger entries as CSV
    pub fn export_entries_csv(entries: &[StockEntryView]) -> AppResult<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());

        writer
            .write_record(["Ingredient", "Quantity", "Unit", "Timestamp", "Reason"])
            .map_err(|e| AppError::Internal(format!("CSV write failed: {}", e)))?;

        for entry in entries {
            writer
                .write_record([
                    entry.ingredient_name.as_str(),
                    &entry.quantity.to_string(),
                    entry.unit.as_str(),
                    &entry.recorded_at.format("%Y-%m-%d %H:%M:%S").to_string(),
                    entry.reason.as_str(),
                ])
                .map_err(|e| AppError::Internal(format!("CSV write failed: {}", e)))?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| AppError::Internal(format!("CSV write failed: {}", e)))?;
        String::from_utf8(bytes).map_err(|e| AppError::Internal(format!("CSV encoding: {}", e)))
    }

    /// Ingredients at or below their low-stock threshold
    pub async fn low_stock(&self) -> AppResult<Vec<IngredientRecord>> {
        let ingredients = sqlx::query_as::<_, IngredientRecord>(
            "SELECT id, name, unit, quantity_in_stock, low_stock_threshold, created_at
             FROM ingredients
             WHERE quantity_in_stock < low_stock_threshold
             ORDER BY name",
        )
        .fetch_all(&self.db)
        .await?;

        Ok(ingredients)
    }

    /// Maintenance check: replay each ingredient's full ledger and
    /// report drift against the stored balance. Drift is reported,
    /// never corrected here.
    pub async fn reconcile(&self) -> AppResult<Vec<ReconciliationRow>> {
        let ingredients = self.list_ingredients().await?;
        let mut report = Vec::with_capacity(ingredients.len());

        for ingredient in ingredients {
            let rows = sqlx::query_as::<_, LedgerRow>(
                "SELECT reason, quantity FROM stock_entries WHERE ingredient_id = $1",
            )
            .bind(ingredient.id)
            .fetch_all(&self.db)
            .await?;

            let entries: Vec<(String, Decimal)> =
                rows.into_iter().map(|r| (r.reason, r.quantity)).collect();
            let net = ledger_net(&entries);
            let drift = ingredient.quantity_in_stock - net;

            if drift != Decimal::ZERO {
                tracing::warn!(
                    ingredient = %ingredient.name,
                    %drift,
                    "stored balance does not match ledger net"
                );
            }

            report.push(ReconciliationRow {
                ingredient_id: ingredient.id,
                name: ingredient.name,
                stored_balance: ingredient.quantity_in_stock,
                ledger_net: net,
                drift,
            });
        }

        Ok(report)
    }
}
