//! HTTP handlers

pub mod analytics;
pub mod auth;
pub mod customers;
pub mod employees;
pub mod health;
pub mod inventory;
pub mod menu;
pub mod orders;

pub use analytics::*;
pub use auth::*;
pub use customers::*;
pub use employees::*;
pub use health::*;
pub use inventory::*;
pub use menu::*;
pub use orders::*;
