//! Item Service
//!
//! Input validation in front of the item repository. Nothing reaches the
//! repository until validation passes.

use rust_decimal::Decimal;
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::database::models::{Item, ItemChanges, NewItem};
use crate::error::AppError;
use crate::repositories::{ItemRepository, RepositoryError};

const MAX_NAME_LEN: usize = 255;
const MAX_DESCRIPTION_LEN: usize = 2000;

/// Unvalidated fields for a new item
#[derive(Debug, Clone)]
pub struct CreateItemInput {
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
}

fn validate_name(name: &str) -> Result<String, AppError> {
    if name.trim().is_empty() {
        return Err(AppError::invalid_input("name must not be empty"));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(AppError::invalid_input(format!(
            "name must be at most {} characters",
            MAX_NAME_LEN
        )));
    }
    Ok(name.to_string())
}

fn validate_description(description: String) -> Result<String, AppError> {
    if description.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(AppError::invalid_input(format!(
            "description must be at most {} characters",
            MAX_DESCRIPTION_LEN
        )));
    }
    Ok(description)
}

fn validate_price(price: Decimal) -> Result<Decimal, AppError> {
    if price.is_sign_negative() && !price.is_zero() {
        return Err(AppError::invalid_input("price must not be negative"));
    }
    Ok(price)
}

pub struct ItemService {
    items: Arc<dyn ItemRepository>,
}

impl ItemService {
    pub fn new(items: Arc<dyn ItemRepository>) -> Self {
        Self { items }
    }

    pub async fn find_all(&self) -> Result<Vec<Item>, AppError> {
        Ok(self.items.find_all_items().await?)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Item, AppError> {
        Ok(self.items.find_item_by_id(id).await?)
    }

    /// Create an item owned by `owner`
    pub async fn create(&self, owner: &AuthUser, input: CreateItemInput) -> Result<Item, AppError> {
        let new_item = NewItem {
            name: validate_name(&input.name)?,
            description: validate_description(input.description.unwrap_or_default())?,
            price: validate_price(input.price)?,
            user_id: Some(owner.id),
        };

        // A valid token whose user no longer exists (e.g. after a database
        // reset with the same signing key) cannot own items.
        let item = self.items.create_item(new_item).await.map_err(|err| match err {
            RepositoryError::MissingReference(_) => {
                tracing::warn!("Token user id={} has no account", owner.id);
                AppError::InvalidToken
            }
            other => other.into(),
        })?;
        tracing::info!("Item {} created by user id={}", item.id, owner.id);
        Ok(item)
    }

    pub async fn update(&self, actor: &AuthUser, id: Uuid, changes: ItemChanges) -> Result<Item, AppError> {
        let changes = ItemChanges {
            name: changes.name.as_deref().map(validate_name).transpose()?,
            description: changes.description.map(validate_description).transpose()?,
            price: changes.price.map(validate_price).transpose()?,
            sold_out: changes.sold_out,
        };

        let item = self.items.update_item(id, changes).await?;
        tracing::info!("Item {} updated by user id={}", item.id, actor.id);
        Ok(item)
    }

    pub async fn delete(&self, actor: &AuthUser, id: Uuid) -> Result<(), AppError> {
        self.items.delete_item(id).await?;
        tracing::info!("Item {} deleted by user id={}", id, actor.id);
        Ok(())
    }
}
