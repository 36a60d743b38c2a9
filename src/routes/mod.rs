// # Routes Module
//
// - HTTP route handlers for the ShopMarket server, grouped by resource.
//
//  ## Available Route Modules
// - `health`: Health check endpoint
// - `auth`: Signup and login
// - `items`: Item catalog CRUD
//
// Route groups are registered in `server.rs`.

/// Signup and login endpoints
pub mod auth;

/// Rejection-mapping extractors shared by handlers
pub mod extract;

/// Health check and monitoring endpoints
pub mod health;

/// Item catalog endpoints
pub mod items;
