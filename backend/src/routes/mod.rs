//! Route definitions for the Shooties POS backend

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};

use crate::{handlers, middleware::auth_middleware, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check (public)
        .route("/health", get(handlers::health_check))
        // Auth routes (public login/refresh, protected user management)
        .nest("/auth", auth_routes())
        // Protected routes - inventory
        .nest("/inventory", inventory_routes())
        // Protected routes - menu and recipes
        .nest("/menu", menu_routes())
        // Protected routes - orders and payment methods
        .nest("/orders", order_routes())
        .nest("/payment-methods", payment_method_routes())
        // Protected routes - customers
        .nest("/customers", customer_routes())
        // Protected routes - employees, attendance and payroll
        .nest("/employees", employee_routes())
        // Protected routes - dashboards
        .nest("/analytics", analytics_routes())
}

/// Authentication routes
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(handlers::login))
        .route("/refresh", post(handlers::refresh))
        .nest("/users", user_routes())
}

/// Staff account management (protected)
fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_users).post(handlers::create_user))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Inventory routes (protected)
fn inventory_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/ingredients",
            get(handlers::list_ingredients).post(handlers::create_ingredient),
        )
        .route(
            "/ingredients/:ingredient_id",
            get(handlers::get_ingredient)
                .put(handlers::update_ingredient)
                .delete(handlers::delete_ingredient),
        )
        .route("/ingredients/low-stock", get(handlers::low_stock))
        .route("/adjust", post(handlers::manual_adjust))
        .route("/entries", get(handlers::list_stock_entries))
        .route("/reconcile", get(handlers::reconcile_stock))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Menu and recipe routes (protected)
fn menu_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_menu_items).post(handlers::create_menu_item),
        )
        .route(
            "/:menu_item_id",
            get(handlers::get_menu_item)
                .put(handlers::update_menu_item)
                .delete(handlers::delete_menu_item),
        )
        .route("/:menu_item_id/recipe", post(handlers::add_recipe_item))
        .route(
            "/:menu_item_id/recipe/:recipe_item_id",
            put(handlers::update_recipe_item).delete(handlers::delete_recipe_item),
        )
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Order routes (protected)
fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_orders).post(handlers::create_order))
        .route(
            "/:order_id",
            get(handlers::get_order).delete(handlers::delete_order),
        )
        .route("/:order_id/ready", post(handlers::mark_ready))
        .route("/:order_id/serve", post(handlers::mark_served))
        .route("/:order_id/pending", post(handlers::move_to_pending))
        .route("/:order_id/unserve", post(handlers::move_to_ready))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Payment method routes (protected)
fn payment_method_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_payment_methods).post(handlers::create_payment_method),
        )
        .route(
            "/:payment_method_id",
            put(handlers::update_payment_method),
        )
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Customer routes (protected)
fn customer_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_customers).post(handlers::create_customer),
        )
        .route("/check-phone", get(handlers::check_phone))
        .route("/spending", get(handlers::spending_report))
        .route(
            "/:customer_id",
            get(handlers::get_customer)
                .put(handlers::update_customer)
                .delete(handlers::delete_customer),
        )
        .route("/:customer_id/orders", get(handlers::customer_orders))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Employee, attendance and payroll routes (protected)
fn employee_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_employees).post(handlers::create_employee),
        )
        .route(
            "/:employee_id",
            get(handlers::get_employee).put(handlers::update_employee),
        )
        .route("/:employee_id/check-in", post(handlers::check_in))
        .route("/:employee_id/check-out", post(handlers::check_out))
        .route("/:employee_id/attendance", get(handlers::attendance_history))
        .route(
            "/:employee_id/payroll",
            get(handlers::payroll_history).post(handlers::create_payroll),
        )
        .route(
            "/:employee_id/payroll/summary",
            get(handlers::payroll_summary),
        )
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Dashboard routes (protected)
fn analytics_routes() -> Router<AppState> {
    Router::new()
        .route("/sales", get(handlers::sales_dashboard))
        .route("/operations", get(handlers::operations_dashboard))
        .route_layer(middleware::from_fn(auth_middleware))
}
