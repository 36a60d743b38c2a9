//! # Repositories
//!
//! Persistence seams for users and items. `DatabaseConnection` implements
//! both traits over Postgres; `InMemoryStore` implements them in-process.
//! Repositories are the only writers of stored records.

pub mod memory;

use async_trait::async_trait;
use uuid::Uuid;

use crate::database::models::{Item, ItemChanges, NewItem, NewUser, User};

pub use memory::InMemoryStore;

/// Errors reported by a storage backend
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: Uuid },

    /// A uniqueness constraint rejected the write
    #[error("unique constraint violated: {0}")]
    Conflict(String),

    /// A referenced record (e.g. an item's owner) does not exist
    #[error("referenced record missing: {0}")]
    MissingReference(String),

    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

impl RepositoryError {
    pub fn item_not_found(id: Uuid) -> Self {
        Self::NotFound { entity: "item", id }
    }
}

/// Credential store
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Persist a new user. Fails with `Conflict` when the email is taken.
    async fn create_user(&self, user: NewUser) -> Result<User, RepositoryError>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError>;
}

/// Item persistence
#[async_trait]
pub trait ItemRepository: Send + Sync {
    async fn create_item(&self, item: NewItem) -> Result<Item, RepositoryError>;

    /// All items, oldest first
    async fn find_all_items(&self) -> Result<Vec<Item>, RepositoryError>;

    async fn find_item_by_id(&self, id: Uuid) -> Result<Item, RepositoryError>;

    async fn update_item(&self, id: Uuid, changes: ItemChanges) -> Result<Item, RepositoryError>;

    async fn delete_item(&self, id: Uuid) -> Result<(), RepositoryError>;
}
