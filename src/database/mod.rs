//! # Database Module
//!
//! PostgreSQL integration using tokio-postgres with deadpool pooling.
//! Includes connection management, models, migrations, and the Postgres
//! implementations of the repository traits.

pub mod connection;
pub mod items;
pub mod migrations;
pub mod models;
pub mod users;

pub use connection::{DatabaseConfig, DatabaseConnection};
