//! # Services Module
//!
//! Business logic between the HTTP handlers and the repositories.

pub mod auth_service;
pub mod item_service;

pub use auth_service::AuthService;
pub use item_service::{CreateItemInput, ItemService};
