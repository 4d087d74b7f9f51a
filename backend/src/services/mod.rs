//! Business logic services

pub mod analytics;
pub mod auth;
pub mod customers;
pub mod employees;
pub mod inventory;
pub mod menu;
pub mod orders;

pub use analytics::AnalyticsService;
pub use auth::AuthService;
pub use customers::CustomerService;
pub use employees::EmployeeService;
pub use inventory::InventoryService;
pub use menu::MenuService;
pub use orders::OrderService;
