//! HTTP handlers for order and payment method endpoints

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::AuthUser;
use crate::services::orders::{
    CreateOrderInput, CreatePaymentMethodInput, OrderBoard, OrderDetail, OrderRecord,
    OrderService, PaymentMethodRecord, UpdatePaymentMethodInput,
};
use crate::AppState;
use shared::models::Role;

/// The order board, grouped by state
pub async fn list_orders(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> AppResult<Json<OrderBoard>> {
    let service = OrderService::new(state.db);
    let board = service.list_orders(auth.store_id).await?;
    Ok(Json(board))
}

/// Create an order
pub async fn create_order(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(input): Json<CreateOrderInput>,
) -> AppResult<Json<OrderDetail>> {
    let service = OrderService::new(state.db);
    let order = service.create_order(auth.store_id, input).await?;
    Ok(Json(order))
}

/// Get an order with its lines
pub async fn get_order(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
) -> AppResult<Json<OrderDetail>> {
    let service = OrderService::new(state.db);
    let order = service.get_order(order_id).await?;
    Ok(Json(order))
}

/// Delete an order, restoring its stock deductions
pub async fn delete_order(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
) -> AppResult<Json<()>> {
    let service = OrderService::new(state.db);
    service.delete_order(order_id).await?;
    Ok(Json(()))
}

/// Mark an order ready
pub async fn mark_ready(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
) -> AppResult<Json<OrderRecord>> {
    let service = OrderService::new(state.db);
    let order = service.mark_ready(order_id).await?;
    Ok(Json(order))
}

/// Mark an order served
pub async fn mark_served(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
) -> AppResult<Json<OrderRecord>> {
    let service = OrderService::new(state.db);
    let order = service.mark_served(order_id).await?;
    Ok(Json(order))
}

/// Send an order back to pending
pub async fn move_to_pending(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
) -> AppResult<Json<OrderRecord>> {
    let service = OrderService::new(state.db);
    let order = service.move_to_pending(order_id).await?;
    Ok(Json(order))
}

/// Send a served order back to ready
pub async fn move_to_ready(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
) -> AppResult<Json<OrderRecord>> {
    let service = OrderService::new(state.db);
    let order = service.move_to_ready(order_id).await?;
    Ok(Json(order))
}

/// List payment methods
pub async fn list_payment_methods(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<PaymentMethodRecord>>> {
    let service = OrderService::new(state.db);
    let methods = service.list_payment_methods().await?;
    Ok(Json(methods))
}

/// Create a payment method
pub async fn create_payment_method(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(input): Json<CreatePaymentMethodInput>,
) -> AppResult<Json<PaymentMethodRecord>> {
    auth.require_role(&[Role::Admin, Role::Manager])?;
    let service = OrderService::new(state.db);
    let method = service.create_payment_method(input).await?;
    Ok(Json(method))
}

/// Rename or (de)activate a payment method
pub async fn update_payment_method(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(payment_method_id): Path<Uuid>,
    Json(input): Json<UpdatePaymentMethodInput>,
) -> AppResult<Json<PaymentMethodRecord>> {
    auth.require_role(&[Role::Admin, Role::Manager])?;
    let service = OrderService::new(state.db);
    let method = service.update_payment_method(payment_method_id, input).await?;
    Ok(Json(method))
}
