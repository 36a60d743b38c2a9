//! Auth routes for signup and login

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::post,
};
use serde_json::{Value, json};

use crate::auth::models::{CredentialsRequest, TokenResponse, UserResponse};
use crate::error::AppError;
use crate::routes::extract::ApiJson;
use crate::server::AppState;

/// `POST /auth/signup`
pub async fn signup(
    State(app_state): State<AppState>,
    ApiJson(payload): ApiJson<CredentialsRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let user = app_state.auth.signup(&payload.email, &payload.password).await?;
    Ok((StatusCode::CREATED, Json(json!({ "data": UserResponse::from(user) }))))
}

/// `POST /auth/login`
pub async fn login(
    State(app_state): State<AppState>,
    ApiJson(payload): ApiJson<CredentialsRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    let issued = app_state.auth.login(&payload.email, &payload.password).await?;
    Ok(Json(TokenResponse::new(issued.token, issued.expires_at)))
}

pub fn create_auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/signup", post(signup))
        .route("/auth/login", post(login))
}
