//! In-process store used when no `DATABASE_URL` is configured, and by tests.

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use uuid::Uuid;

use super::{ItemRepository, RepositoryError, UserRepository};
use crate::database::models::{Item, ItemChanges, NewItem, NewUser, User};

#[derive(Default)]
struct StoreState {
    users: Vec<User>,
    /// Insertion order doubles as creation order.
    items: Vec<Item>,
}

/// Users and items held behind a single lock. Guards are never held across
/// an `.await`.
#[derive(Default)]
pub struct InMemoryStore {
    state: RwLock<StoreState>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn create_user(&self, user: NewUser) -> Result<User, RepositoryError> {
        let mut state = self.state.write();
        if state.users.iter().any(|u| u.email == user.email) {
            return Err(RepositoryError::Conflict("users_email_key".to_string()));
        }
        let user = User {
            id: Uuid::new_v4(),
            email: user.email,
            password_hash: user.password_hash,
            created_at: Utc::now(),
        };
        state.users.push(user.clone());
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        Ok(self.state.read().users.iter().find(|u| u.email == email).cloned())
    }
}

#[async_trait]
impl ItemRepository for InMemoryStore {
    async fn create_item(&self, item: NewItem) -> Result<Item, RepositoryError> {
        let mut state = self.state.write();
        if let Some(owner) = item.user_id {
            if !state.users.iter().any(|u| u.id == owner) {
                return Err(RepositoryError::MissingReference("items_user_id_fkey".to_string()));
            }
        }
        let item = item.into_item(Utc::now());
        state.items.push(item.clone());
        Ok(item)
    }

    async fn find_all_items(&self) -> Result<Vec<Item>, RepositoryError> {
        Ok(self.state.read().items.clone())
    }

    async fn find_item_by_id(&self, id: Uuid) -> Result<Item, RepositoryError> {
        self.state
            .read()
            .items
            .iter()
            .find(|item| item.id == id)
            .cloned()
            .ok_or_else(|| RepositoryError::item_not_found(id))
    }

    async fn update_item(&self, id: Uuid, changes: ItemChanges) -> Result<Item, RepositoryError> {
        let mut state = self.state.write();
        let item = state
            .items
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or_else(|| RepositoryError::item_not_found(id))?;
        changes.apply(item, Utc::now());
        Ok(item.clone())
    }

    async fn delete_item(&self, id: Uuid) -> Result<(), RepositoryError> {
        let mut state = self.state.write();
        let position = state
            .items
            .iter()
            .position(|item| item.id == id)
            .ok_or_else(|| RepositoryError::item_not_found(id))?;
        state.items.remove(position);
        Ok(())
    }
}
