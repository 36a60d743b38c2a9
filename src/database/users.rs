//! Postgres credential store

use async_trait::async_trait;
use uuid::Uuid;

use super::connection::{DatabaseConnection, map_pg_error};
use super::models::{FromRow, NewUser, User};
use crate::repositories::{RepositoryError, UserRepository};

#[async_trait]
impl UserRepository for DatabaseConnection {
    async fn create_user(&self, user: NewUser) -> Result<User, RepositoryError> {
        let client = self.client().await?;
        let row = client
            .query_one(
                "INSERT INTO users (id, email, password_hash) VALUES ($1, $2, $3) \
                 RETURNING id, email, password_hash, created_at",
                &[&Uuid::new_v4(), &user.email, &user.password_hash],
            )
            .await
            .map_err(|e| map_pg_error(e, "Failed to insert user"))?;
        User::from_row(&row).map_err(|e| map_pg_error(e, "Failed to decode user row"))
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        let client = self.client().await?;
        let row = client
            .query_opt(
                "SELECT id, email, password_hash, created_at FROM users WHERE email = $1",
                &[&email],
            )
            .await
            .map_err(|e| map_pg_error(e, "Failed to query user by email"))?;
        row.map(|r| User::from_row(&r))
            .transpose()
            .map_err(|e| map_pg_error(e, "Failed to decode user row"))
    }
}
