//! Order service: intake, lifecycle transitions and deletion
//!
//! Creating an order deducts stock through the ledger, one sale_deduct
//! posting per (item, ingredient) recipe pair; deleting it posts the
//! mirror sale_cancellation entries. Both run in a single transaction
//! with the touched ingredient rows locked, so an order's stock effect
//! is all-or-nothing.
//!
//! Transitions are permissive: any target state is reachable from any
//! current state. The one invariant is that flags and timestamps move
//! together, which is why every transition funnels through the shared
//! [`Order`] mutators and lands as one UPDATE.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::services::inventory::InventoryService;
use shared::models::{consumption, order_total, sanitize_items, Order, OrderState, StockReason};
use shared::validation::validate_order_name;

/// Order service
#[derive(Clone)]
pub struct OrderService {
    db: PgPool,
}

/// One submitted order line
#[derive(Debug, Deserialize)]
pub struct OrderItemInput {
    pub menu_item_id: Uuid,
    pub quantity: i32,
}

/// Input for creating an order
#[derive(Debug, Deserialize)]
pub struct CreateOrderInput {
    pub name: String,
    pub customer_id: Option<Uuid>,
    pub payment_method_id: Option<Uuid>,
    pub items: Vec<OrderItemInput>,
}

/// Order row as stored
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct OrderRecord {
    pub id: Uuid,
    pub store_id: Option<Uuid>,
    pub name: String,
    pub customer_id: Option<Uuid>,
    pub total_price: i64,
    pub payment_method_id: Option<Uuid>,
    pub is_ready: bool,
    pub is_served: bool,
    pub created_at: DateTime<Utc>,
    pub ready_at: Option<DateTime<Utc>>,
    pub served_at: Option<DateTime<Utc>>,
}

impl OrderRecord {
    fn to_model(&self) -> Order {
        Order {
            id: self.id,
            store_id: self.store_id,
            name: self.name.clone(),
            customer_id: self.customer_id,
            total_price: self.total_price,
            payment_method_id: self.payment_method_id,
            is_ready: self.is_ready,
            is_served: self.is_served,
            created_at: self.created_at,
            ready_at: self.ready_at,
            served_at: self.served_at,
        }
    }

    pub fn state(&self) -> OrderState {
        self.to_model().state()
    }
}

/// Order line joined with its menu item
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct OrderItemView {
    pub id: Uuid,
    pub menu_item_id: Uuid,
    pub menu_name: String,
    pub quantity: i32,
    pub unit_price: i64,
}

/// Order with its lines
#[derive(Debug, Serialize)]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: OrderRecord,
    pub state: OrderState,
    pub items: Vec<OrderItemView>,
}

/// Orders grouped by fulfillment state for the board
#[derive(Debug, Serialize)]
pub struct OrderBoard {
    pub pending: Vec<OrderRecord>,
    pub ready: Vec<OrderRecord>,
    pub served: Vec<OrderRecord>,
}

/// Payment method record
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct PaymentMethodRecord {
    pub id: Uuid,
    pub name: String,
    pub is_active: bool,
}

#[derive(Debug, Deserialize)]
pub struct CreatePaymentMethodInput {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePaymentMethodInput {
    pub name: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, FromRow)]
struct RecipeEdge {
    ingredient_id: Uuid,
    amount_per_unit: rust_decimal::Decimal,
}

#[derive(Debug, FromRow)]
struct StoredItem {
    menu_item_id: Uuid,
    quantity: i32,
}

impl OrderService {
    /// Create a new OrderService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create an order: lines with non-positive quantities are skipped
    /// silently, the total is the sum of quantity x unit price, and
    /// every surviving line deducts its recipe from stock.
    pub async fn create_order(
        &self,
        store_id: Option<Uuid>,
        input: CreateOrderInput,
    ) -> AppResult<OrderDetail> {
        validate_order_name(&input.name).map_err(|message| AppError::Validation {
            field: "name".to_string(),
            message: message.to_string(),
        })?;

        let submitted: Vec<(Uuid, i32)> = input
            .items
            .iter()
            .map(|item| (item.menu_item_id, item.quantity))
            .collect();
        let items = sanitize_items(&submitted);

        let mut tx = self.db.begin().await?;

        if let Some(customer_id) = input.customer_id {
            let exists = sqlx::query_scalar::<_, bool>(
                "SELECT EXISTS(SELECT 1 FROM customers WHERE id = $1)",
            )
            .bind(customer_id)
            .fetch_one(&mut *tx)
            .await?;
            if !exists {
                return Err(AppError::NotFound("Customer".to_string()));
            }
        }

        if let Some(payment_method_id) = input.payment_method_id {
            let exists = sqlx::query_scalar::<_, bool>(
                "SELECT EXISTS(SELECT 1 FROM payment_methods WHERE id = $1)",
            )
            .bind(payment_method_id)
            .fetch_one(&mut *tx)
            .await?;
            if !exists {
                return Err(AppError::NotFound("Payment method".to_string()));
            }
        }

        let order_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO orders (store_id, name, customer_id, total_price, payment_method_id)
            VALUES ($1, $2, $3, 0, $4)
            RETURNING id
            "#,
        )
        .bind(store_id)
        .bind(input.name.trim())
        .bind(input.customer_id)
        .bind(input.payment_method_id)
        .fetch_one(&mut *tx)
        .await?;

        let mut priced_lines: Vec<(i32, i64)> = Vec::with_capacity(items.len());

        for (menu_item_id, quantity) in &items {
            let price = sqlx::query_scalar::<_, i64>(
                "SELECT price FROM menu_items WHERE id = $1",
            )
            .bind(menu_item_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound("Menu item".to_string()))?;

            sqlx::query(
                "INSERT INTO order_items (order_id, menu_item_id, quantity) VALUES ($1, $2, $3)",
            )
            .bind(order_id)
            .bind(menu_item_id)
            .bind(quantity)
            .execute(&mut *tx)
            .await?;

            priced_lines.push((*quantity, price));

            // One sale_deduct posting per (item, ingredient) recipe pair
            let recipe = sqlx::query_as::<_, RecipeEdge>(
                "SELECT ingredient_id, amount_per_unit FROM recipe_items WHERE menu_item_id = $1",
            )
            .bind(menu_item_id)
            .fetch_all(&mut *tx)
            .await?;

            for edge in recipe {
                // Serialize concurrent deductions on the same ingredient
                sqlx::query("SELECT id FROM ingredients WHERE id = $1 FOR UPDATE")
                    .bind(edge.ingredient_id)
                    .execute(&mut *tx)
                    .await?;

                InventoryService::post_entry(
                    &mut tx,
                    edge.ingredient_id,
                    consumption(*quantity, edge.amount_per_unit),
                    StockReason::SaleDeduct,
                )
                .await?;
            }
        }

        let total = order_total(&priced_lines);
        sqlx::query("UPDATE orders SET total_price = $1 WHERE id = $2")
            .bind(total)
            .bind(order_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!(%order_id, total, lines = items.len(), "order created");
        self.get_order(order_id).await
    }

    /// Get an order with its lines
    pub async fn get_order(&self, order_id: Uuid) -> AppResult<OrderDetail> {
        let order = self.fetch_order(order_id).await?;

        let items = sqlx::query_as::<_, OrderItemView>(
            r#"
            SELECT oi.id, oi.menu_item_id, m.name AS menu_name, oi.quantity,
                   m.price AS unit_price
            FROM order_items oi
            JOIN menu_items m ON m.id = oi.menu_item_id
            WHERE oi.order_id = $1
            "#,
        )
        .bind(order_id)
        .fetch_all(&self.db)
        .await?;

        let state = order.state();
        Ok(OrderDetail {
            order,
            state,
            items,
        })
    }

    /// Orders grouped by state, ordered the way the board shows them
    pub async fn list_orders(&self, store_id: Option<Uuid>) -> AppResult<OrderBoard> {
        let columns = "id, store_id, name, customer_id, total_price, payment_method_id, \
                       is_ready, is_served, created_at, ready_at, served_at";

        let pending = sqlx::query_as::<_, OrderRecord>(&format!(
            "SELECT {columns} FROM orders
             WHERE is_ready = false AND is_served = false AND ($1::uuid IS NULL OR store_id = $1)
             ORDER BY created_at",
        ))
        .bind(store_id)
        .fetch_all(&self.db)
        .await?;

        let ready = sqlx::query_as::<_, OrderRecord>(&format!(
            "SELECT {columns} FROM orders
             WHERE is_ready = true AND is_served = false AND ($1::uuid IS NULL OR store_id = $1)
             ORDER BY ready_at",
        ))
        .bind(store_id)
        .fetch_all(&self.db)
        .await?;

        let served = sqlx::query_as::<_, OrderRecord>(&format!(
            "SELECT {columns} FROM orders
             WHERE is_served = true AND ($1::uuid IS NULL OR store_id = $1)
             ORDER BY served_at",
        ))
        .bind(store_id)
        .fetch_all(&self.db)
        .await?;

        Ok(OrderBoard {
            pending,
            ready,
            served,
        })
    }

    /// Any state -> READY
    pub async fn mark_ready(&self, order_id: Uuid) -> AppResult<OrderRecord> {
        self.apply_transition(order_id, |order, now| order.mark_ready(now))
            .await
    }

    /// Any state -> SERVED, back-filling ready_at when needed
    pub async fn mark_served(&self, order_id: Uuid) -> AppResult<OrderRecord> {
        self.apply_transition(order_id, |order, now| order.mark_served(now))
            .await
    }

    /// Any state -> PENDING
    pub async fn move_to_pending(&self, order_id: Uuid) -> AppResult<OrderRecord> {
        self.apply_transition(order_id, |order, _| order.move_to_pending())
            .await
    }

    /// Clears the served mark only
    pub async fn move_to_ready(&self, order_id: Uuid) -> AppResult<OrderRecord> {
        self.apply_transition(order_id, |order, _| order.move_to_ready())
            .await
    }

    /// Delete an order, restoring every ledger deduction its items
    /// caused via sale_cancellation postings. All-or-nothing.
    pub async fn delete_order(&self, order_id: Uuid) -> AppResult<()> {
        let mut tx = self.db.begin().await?;

        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM orders WHERE id = $1)",
        )
        .bind(order_id)
        .fetch_one(&mut *tx)
        .await?;
        if !exists {
            return Err(AppError::NotFound("Order".to_string()));
        }

        let items = sqlx::query_as::<_, StoredItem>(
            "SELECT menu_item_id, quantity FROM order_items WHERE order_id = $1",
        )
        .bind(order_id)
        .fetch_all(&mut *tx)
        .await?;

        for item in &items {
            let recipe = sqlx::query_as::<_, RecipeEdge>(
                "SELECT ingredient_id, amount_per_unit FROM recipe_items WHERE menu_item_id = $1",
            )
            .bind(item.menu_item_id)
            .fetch_all(&mut *tx)
            .await?;

            for edge in recipe {
                sqlx::query("SELECT id FROM ingredients WHERE id = $1 FOR UPDATE")
                    .bind(edge.ingredient_id)
                    .execute(&mut *tx)
                    .await?;

                InventoryService::post_entry(
                    &mut tx,
                    edge.ingredient_id,
                    consumption(item.quantity, edge.amount_per_unit),
                    StockReason::SaleCancellation,
                )
                .await?;
            }
        }

        sqlx::query("DELETE FROM order_items WHERE order_id = $1")
            .bind(order_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(order_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!(%order_id, restored_items = items.len(), "order deleted");
        Ok(())
    }

    /// List payment methods
    pub async fn list_payment_methods(&self) -> AppResult<Vec<PaymentMethodRecord>> {
        let methods = sqlx::query_as::<_, PaymentMethodRecord>(
            "SELECT id, name, is_active FROM payment_methods ORDER BY name",
        )
        .fetch_all(&self.db)
        .await?;

        Ok(methods)
    }

    /// Create a payment method (unique name)
    pub async fn create_payment_method(
        &self,
        input: CreatePaymentMethodInput,
    ) -> AppResult<PaymentMethodRecord> {
        let duplicate = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM payment_methods WHERE name = $1)",
        )
        .bind(input.name.trim())
        .fetch_one(&self.db)
        .await?;
        if duplicate {
            return Err(AppError::DuplicateEntry("payment method".to_string()));
        }

        let method = sqlx::query_as::<_, PaymentMethodRecord>(
            r#"
            INSERT INTO payment_methods (name) VALUES ($1)
            RETURNING id, name, is_active
            "#,
        )
        .bind(input.name.trim())
        .fetch_one(&self.db)
        .await?;

        Ok(method)
    }

    /// Rename or (de)activate a payment method
    pub async fn update_payment_method(
        &self,
        payment_method_id: Uuid,
        input: UpdatePaymentMethodInput,
    ) -> AppResult<PaymentMethodRecord> {
        let existing = sqlx::query_as::<_, PaymentMethodRecord>(
            "SELECT id, name, is_active FROM payment_methods WHERE id = $1",
        )
        .bind(payment_method_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Payment method".to_string()))?;

        let name = input.name.unwrap_or(existing.name);
        let is_active = input.is_active.unwrap_or(existing.is_active);

        let method = sqlx::query_as::<_, PaymentMethodRecord>(
            r#"
            UPDATE payment_methods SET name = $1, is_active = $2 WHERE id = $3
            RETURNING id, name, is_active
            "#,
        )
        .bind(&name)
        .bind(is_active)
        .bind(payment_method_id)
        .fetch_one(&self.db)
        .await?;

        Ok(method)
    }

    async fn fetch_order(&self, order_id: Uuid) -> AppResult<OrderRecord> {
        let order = sqlx::query_as::<_, OrderRecord>(
            "SELECT id, store_id, name, customer_id, total_price, payment_method_id,
                    is_ready, is_served, created_at, ready_at, served_at
             FROM orders WHERE id = $1",
        )
        .bind(order_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Order".to_string()))?;

        Ok(order)
    }

    /// Apply a lifecycle mutator and persist flags and timestamps in
    /// one UPDATE so they can never drift apart.
    async fn apply_transition(
        &self,
        order_id: Uuid,
        transition: impl FnOnce(&mut Order, DateTime<Utc>),
    ) -> AppResult<OrderRecord> {
        let record = self.fetch_order(order_id).await?;
        let mut order = record.to_model();

        transition(&mut order, Utc::now());
        debug_assert!(order.flags_consistent());

        let updated = sqlx::query_as::<_, OrderRecord>(
            r#"
            UPDATE orders
            SET is_ready = $1, ready_at = $2, is_served = $3, served_at = $4
            WHERE id = $5
            RETURNING id, store_id, name, customer_id, total_price, payment_method_id,
                      is_ready, is_served, created_at, ready_at, served_at
            "#,
        )
        .bind(order.is_ready)
        .bind(order.ready_at)
        .bind(order.is_served)
        .bind(order.served_at)
        .bind(order_id)
        .fetch_one(&self.db)
        .await?;

        Ok(updated)
    }
}
