//! Customer service: membership records, phone lookup and spending
//!
//! Phone numbers are compared on digits only, so "0812-3456" and
//! "+62 812 3456" resolve to the same member. The stored phone keeps
//! the formatting the customer gave us; only lookups normalize.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::types::DateRange;
use shared::validation::normalize_phone;

/// Customer service
#[derive(Clone)]
pub struct CustomerService {
    db: PgPool,
}

/// Customer record
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CustomerRecord {
    pub id: Uuid,
    pub name: String,
    pub phone: String,
    pub joined_at: NaiveDate,
}

/// Input for registering a customer
#[derive(Debug, Deserialize)]
pub struct CreateCustomerInput {
    pub name: String,
    pub phone: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCustomerInput {
    pub name: Option<String>,
    pub phone: Option<String>,
}

/// Result of a phone lookup at the register
#[derive(Debug, Serialize)]
pub struct PhoneLookup {
    pub registered: bool,
    pub customer: Option<CustomerRecord>,
}

/// Order summary as shown on a customer's history
#[derive(Debug, Serialize, FromRow)]
pub struct CustomerOrderView {
    pub id: Uuid,
    pub name: String,
    pub total_price: i64,
    pub created_at: DateTime<Utc>,
}

/// One row of the spending report
#[derive(Debug, Serialize, FromRow)]
pub struct SpendingRow {
    pub customer_id: Uuid,
    pub customer_name: String,
    pub phone: String,
    pub order_count: i64,
    pub total_spent: i64,
}

impl CustomerService {
    /// Create a new CustomerService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// List customers
    pub async fn list_customers(&self) -> AppResult<Vec<CustomerRecord>> {
        let customers = sqlx::query_as::<_, CustomerRecord>(
            "SELECT id, name, phone, joined_at FROM customers ORDER BY name",
        )
        .fetch_all(&self.db)
        .await?;

        Ok(customers)
    }

    /// Get a customer
    pub async fn get_customer(&self, customer_id: Uuid) -> AppResult<CustomerRecord> {
        let customer = sqlx::query_as::<_, CustomerRecord>(
            "SELECT id, name, phone, joined_at FROM customers WHERE id = $1",
        )
        .bind(customer_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Customer".to_string()))?;

        Ok(customer)
    }

    /// Register a customer. Digit-matching phones are rejected as
    /// duplicates regardless of formatting.
    pub async fn create_customer(&self, input: CreateCustomerInput) -> AppResult<CustomerRecord> {
        let digits = normalize_phone(&input.phone);
        if digits.is_empty() {
            return Err(AppError::Validation {
                field: "phone".to_string(),
                message: "Phone number must contain digits".to_string(),
            });
        }

        if self.find_by_phone(&input.phone).await?.is_some() {
            return Err(AppError::DuplicateEntry("phone number".to_string()));
        }

        let customer = sqlx::query_as::<_, CustomerRecord>(
            r#"
            INSERT INTO customers (name, phone, phone_digits)
            VALUES ($1, $2, $3)
            RETURNING id, name, phone, joined_at
            "#,
        )
        .bind(input.name.trim())
        .bind(input.phone.trim())
        .bind(&digits)
        .fetch_one(&self.db)
        .await?;

        tracing::info!(customer_id = %customer.id, "customer registered");
        Ok(customer)
    }

    /// Update a customer
    pub async fn update_customer(
        &self,
        customer_id: Uuid,
        input: UpdateCustomerInput,
    ) -> AppResult<CustomerRecord> {
        let existing = self.get_customer(customer_id).await?;

        let name = input.name.unwrap_or(existing.name);
        let phone = input.phone.unwrap_or(existing.phone);
        let digits = normalize_phone(&phone);
        if digits.is_empty() {
            return Err(AppError::Validation {
                field: "phone".to_string(),
                message: "Phone number must contain digits".to_string(),
            });
        }

        if let Some(other) = self.find_by_phone(&phone).await? {
            if other.id != customer_id {
                return Err(AppError::DuplicateEntry("phone number".to_string()));
            }
        }

        let customer = sqlx::query_as::<_, CustomerRecord>(
            r#"
            UPDATE customers SET name = $1, phone = $2, phone_digits = $3 WHERE id = $4
            RETURNING id, name, phone, joined_at
            "#,
        )
        .bind(name.trim())
        .bind(phone.trim())
        .bind(&digits)
        .bind(customer_id)
        .fetch_one(&self.db)
        .await?;

        Ok(customer)
    }

    /// Delete a customer; their orders keep a dangling-free NULL link
    pub async fn delete_customer(&self, customer_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM customers WHERE id = $1")
            .bind(customer_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Customer".to_string()));
        }

        Ok(())
    }

    /// Register-side lookup: is this phone already a member?
    pub async fn check_phone(&self, phone: &str) -> AppResult<PhoneLookup> {
        let customer = self.find_by_phone(phone).await?;
        Ok(PhoneLookup {
            registered: customer.is_some(),
            customer,
        })
    }

    /// Find a customer whose phone digits match, or register them on
    /// the spot. Used by the order flow when a new member checks out.
    pub async fn find_or_create(&self, input: CreateCustomerInput) -> AppResult<CustomerRecord> {
        if let Some(customer) = self.find_by_phone(&input.phone).await? {
            return Ok(customer);
        }
        self.create_customer(input).await
    }

    /// A customer's order history, newest first
    pub async fn customer_orders(&self, customer_id: Uuid) -> AppResult<Vec<CustomerOrderView>> {
        // Existence check so an unknown id is a 404, not an empty list
        self.get_customer(customer_id).await?;

        let orders = sqlx::query_as::<_, CustomerOrderView>(
            "SELECT id, name, total_price, created_at
             FROM orders WHERE customer_id = $1
             ORDER BY created_at DESC",
        )
        .bind(customer_id)
        .fetch_all(&self.db)
        .await?;

        Ok(orders)
    }

    /// Spending per customer over an optional Jakarta civil-date
    /// range, biggest spenders first.
    pub async fn spending_report(&self, range: DateRange) -> AppResult<Vec<SpendingRow>> {
        let rows = sqlx::query_as::<_, SpendingRow>(
            r#"
            SELECT c.id AS customer_id, c.name AS customer_name, c.phone,
                   COUNT(o.id) AS order_count,
                   COALESCE(SUM(o.total_price), 0) AS total_spent
            FROM customers c
            LEFT JOIN orders o
              ON o.customer_id = c.id
             AND ($1::date IS NULL OR (o.created_at + INTERVAL '7 hours')::date >= $1)
             AND ($2::date IS NULL OR (o.created_at + INTERVAL '7 hours')::date <= $2)
            GROUP BY c.id, c.name, c.phone
            ORDER BY total_spent DESC, c.name
            "#,
        )
        .bind(range.start)
        .bind(range.end)
        .fetch_all(&self.db)
        .await?;

        Ok(rows)
    }

    async fn find_by_phone(&self, phone: &str) -> AppResult<Option<CustomerRecord>> {
        let digits = normalize_phone(phone);
        if digits.is_empty() {
            return Ok(None);
        }

        let customer = sqlx::query_as::<_, CustomerRecord>(
            "SELECT id, name, phone, joined_at FROM customers WHERE phone_digits = $1",
        )
        .bind(&digits)
        .fetch_optional(&self.db)
        .await?;

        Ok(customer)
    }
}
