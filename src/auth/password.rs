//! Password Hashing
//!
//! Argon2id hashing with a random salt per password. Hashing is CPU-bound,
//! so every call runs on tokio's blocking pool.

use anyhow::{Context, Result, anyhow};
use argon2::password_hash::rand_core::OsRng;
use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use once_cell::sync::OnceCell;
use std::sync::Arc;

const DUMMY_PASSWORD: &str = "shopmarket-dummy-password";

#[derive(Clone, Default)]
pub struct PasswordService {
    /// Verified against when the user does not exist, so unknown emails
    /// cost as much as wrong passwords.
    dummy_hash: Arc<OnceCell<String>>,
}

fn hash_blocking(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| anyhow!("Failed to hash password: {}", e))
}

fn verify_blocking(password: &str, stored_hash: &str) -> Result<bool> {
    let parsed_hash = PasswordHash::new(stored_hash)
        .map_err(|e| anyhow!("Stored password hash is malformed: {}", e))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

impl PasswordService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hash a plaintext password into a PHC string
    pub async fn hash(&self, password: &str) -> Result<String> {
        let password = password.to_string();
        tokio::task::spawn_blocking(move || hash_blocking(&password))
            .await
            .context("Password hashing task failed")?
    }

    /// Check a plaintext password against a stored PHC string
    pub async fn verify(&self, password: &str, stored_hash: &str) -> Result<bool> {
        let password = password.to_string();
        let stored_hash = stored_hash.to_string();
        tokio::task::spawn_blocking(move || verify_blocking(&password, &stored_hash))
            .await
            .context("Password verification task failed")?
    }

    /// Spend one verification's worth of work without a real hash
    pub async fn verify_dummy(&self, password: &str) -> Result<()> {
        let password = password.to_string();
        let dummy_hash = self.dummy_hash.clone();
        tokio::task::spawn_blocking(move || {
            let stored_hash = dummy_hash.get_or_try_init(|| hash_blocking(DUMMY_PASSWORD))?;
            verify_blocking(&password, stored_hash).map(|_| ())
        })
        .await
        .context("Password verification task failed")?
    }
}
