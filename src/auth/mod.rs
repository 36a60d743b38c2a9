//! # Authentication Module
//!
//! Handles password hashing, JWT token issuance and validation, and the
//! middleware securing the protected item endpoints.

pub mod jwt;
pub mod middleware;
pub mod models;
pub mod password;

pub use jwt::{IssuedToken, JwtService};
pub use middleware::AuthMiddleware;
pub use models::AuthUser;
pub use password::PasswordService;
