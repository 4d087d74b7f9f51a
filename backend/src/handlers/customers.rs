//! HTTP handlers for customer endpoints

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::middleware::AuthUser;
use crate::services::customers::{
    CreateCustomerInput, CustomerOrderView, CustomerRecord, CustomerService, PhoneLookup,
    SpendingRow, UpdateCustomerInput,
};
use crate::AppState;
use shared::models::Role;
use shared::types::DateRange;

#[derive(Debug, Deserialize)]
pub struct PhoneQuery {
    pub phone: String,
}

/// List customers
pub async fn list_customers(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<CustomerRecord>>> {
    let service = CustomerService::new(state.db);
    let customers = service.list_customers().await?;
    Ok(Json(customers))
}

/// Get a customer
pub async fn get_customer(
    State(state): State<AppState>,
    Path(customer_id): Path<Uuid>,
) -> AppResult<Json<CustomerRecord>> {
    let service = CustomerService::new(state.db);
    let customer = service.get_customer(customer_id).await?;
    Ok(Json(customer))
}

/// Register a customer
pub async fn create_customer(
    State(state): State<AppState>,
    Json(input): Json<CreateCustomerInput>,
) -> AppResult<Json<CustomerRecord>> {
    let service = CustomerService::new(state.db);
    let customer = service.create_customer(input).await?;
    Ok(Json(customer))
}

/// Update a customer
pub async fn update_customer(
    State(state): State<AppState>,
    Path(customer_id): Path<Uuid>,
    Json(input): Json<UpdateCustomerInput>,
) -> AppResult<Json<CustomerRecord>> {
    let service = CustomerService::new(state.db);
    let customer = service.update_customer(customer_id, input).await?;
    Ok(Json(customer))
}

/// Delete a customer
pub async fn delete_customer(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(customer_id): Path<Uuid>,
) -> AppResult<Json<()>> {
    auth.require_role(&[Role::Admin, Role::Manager])?;
    let service = CustomerService::new(state.db);
    service.delete_customer(customer_id).await?;
    Ok(Json(()))
}

/// Register-side lookup by phone, digits-only matching
pub async fn check_phone(
    State(state): State<AppState>,
    Query(query): Query<PhoneQuery>,
) -> AppResult<Json<PhoneLookup>> {
    if query.phone.trim().is_empty() {
        return Err(AppError::Validation {
            field: "phone".to_string(),
            message: "Phone number is required".to_string(),
        });
    }
    let service = CustomerService::new(state.db);
    let lookup = service.check_phone(&query.phone).await?;
    Ok(Json(lookup))
}

/// A customer's order history
pub async fn customer_orders(
    State(state): State<AppState>,
    Path(customer_id): Path<Uuid>,
) -> AppResult<Json<Vec<CustomerOrderView>>> {
    let service = CustomerService::new(state.db);
    let orders = service.customer_orders(customer_id).await?;
    Ok(Json(orders))
}

/// Spending per customer, biggest spenders first
pub async fn spending_report(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Query(range): Query<DateRange>,
) -> AppResult<Json<Vec<SpendingRow>>> {
    auth.require_role(&[Role::Admin, Role::Manager])?;
    let service = CustomerService::new(state.db);
    let report = service.spending_report(range).await?;
    Ok(Json(report))
}
