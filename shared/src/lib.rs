//! Shared types and models for the Shooties POS platform
//!
//! This crate contains the domain models and pure business rules shared
//! between the backend server and its test suites.

pub mod models;
pub mod types;
pub mod validation;

pub use models::*;
pub use types::*;
pub use validation::*;
