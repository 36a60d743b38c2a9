//! # Item Routes
//!
//! CRUD endpoints over the item catalog. Listing is public; everything
//! else sits behind `AuthMiddleware::require_auth`.

use axum::{
    Extension, Json, Router,
    extract::State,
    http::StatusCode,
    middleware,
    routing::{get, post},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::{AuthMiddleware, AuthUser};
use crate::database::models::{Item, ItemChanges};
use crate::error::AppError;
use crate::routes::extract::{ApiJson, ApiPath};
use crate::server::AppState;
use crate::services::CreateItemInput;

/// Body of `POST /items`
#[derive(Debug, Deserialize)]
pub struct CreateItemRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: Decimal,
}

/// Body of `PUT /items/{id}`; absent fields are left unchanged
#[derive(Debug, Default, Deserialize)]
pub struct UpdateItemRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    #[serde(alias = "soldOut")]
    pub sold_out: Option<bool>,
}

/// Success envelope
#[derive(Debug, Serialize)]
pub struct DataResponse<T> {
    pub data: T,
}

#[derive(Debug, Serialize)]
pub struct DeletedItem {
    pub id: Uuid,
}

pub async fn list_items(State(state): State<AppState>) -> Result<Json<DataResponse<Vec<Item>>>, AppError> {
    let items = state.items.find_all().await?;
    Ok(Json(DataResponse { data: items }))
}

pub async fn get_item(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<DataResponse<Item>>, AppError> {
    let item = state.items.find_by_id(id).await?;
    Ok(Json(DataResponse { data: item }))
}

pub async fn create_item(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ApiJson(request): ApiJson<CreateItemRequest>,
) -> Result<(StatusCode, Json<DataResponse<Item>>), AppError> {
    let input = CreateItemInput {
        name: request.name,
        description: request.description,
        price: request.price,
    };
    let item = state.items.create(&user, input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: item })))
}

pub async fn update_item(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(request): ApiJson<UpdateItemRequest>,
) -> Result<Json<DataResponse<Item>>, AppError> {
    let changes = ItemChanges {
        name: request.name,
        description: request.description,
        price: request.price,
        sold_out: request.sold_out,
    };
    let item = state.items.update(&user, id, changes).await?;
    Ok(Json(DataResponse { data: item }))
}

pub async fn delete_item(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<DataResponse<DeletedItem>>, AppError> {
    state.items.delete(&user, id).await?;
    Ok(Json(DataResponse { data: DeletedItem { id } }))
}

/// Public and protected item routes, composed at construction time
pub fn create_item_routes(state: &AppState) -> Router<AppState> {
    let public_routes = Router::new().route("/items", get(list_items));

    let protected_routes = Router::new()
        .route("/items", post(create_item))
        .route("/items/{id}", get(get_item).put(update_item).delete(delete_item))
        .route_layer(middleware::from_fn_with_state(
            state.auth.clone(),
            AuthMiddleware::require_auth,
        ));

    public_routes.merge(protected_routes)
}
