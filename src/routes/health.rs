use axum::{extract::State, http::StatusCode, response::Json};
use serde_json::{Value, json};

use crate::server::AppState;

/// Health check endpoint handler.
///
/// # Route
/// - **Method**: GET
/// - **Path**: `/ping`
///
/// # Response Format
/// ```json
/// { "status": "pong", "storage": "postgres" }
/// ```
///
/// # HTTP Status Codes
/// - **200 OK**: Server is up and storage is reachable
/// - **503 Service Unavailable**: The database did not answer
///
/// # Examples
/// ```bash
/// curl http://localhost:8080/ping
/// ```
pub async fn ping(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let Some(db) = state.db.as_ref() else {
        return (StatusCode::OK, Json(json!({ "status": "pong", "storage": "memory" })));
    };

    match db.health_check().await {
        Ok(()) => (StatusCode::OK, Json(json!({ "status": "pong", "storage": "postgres" }))),
        Err(e) => {
            tracing::error!("Health check failed: {:#}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "degraded", "storage": "postgres" })),
            )
        }
    }
}
