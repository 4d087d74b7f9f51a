//! Domain models for the Shooties POS platform

mod employee;
mod inventory;
mod menu;
mod order;
mod reporting;
mod user;

pub use employee::*;
pub use inventory::*;
pub use menu::*;
pub use order::*;
pub use reporting::*;
pub use user::*;
