//! Auth Service
//!
//! Signup, login and token verification on top of the credential store.

use std::sync::Arc;

use crate::auth::{AuthUser, IssuedToken, JwtService, PasswordService};
use crate::database::models::{NewUser, User};
use crate::error::AppError;
use crate::repositories::{RepositoryError, UserRepository};

pub const MIN_PASSWORD_LEN: usize = 8;
pub const MAX_PASSWORD_LEN: usize = 128;
const MAX_EMAIL_LEN: usize = 254;

/// Emails are compared trimmed and lower-cased
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn validate_email(email: &str) -> Result<(), AppError> {
    let well_formed = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && domain.split('.').all(|label| !label.is_empty())
        }
        None => false,
    };
    if !well_formed || email.len() > MAX_EMAIL_LEN || email.chars().any(char::is_whitespace) {
        return Err(AppError::invalid_input("email is not a valid address"));
    }
    Ok(())
}

fn validate_password(password: &str) -> Result<(), AppError> {
    let len = password.chars().count();
    if len < MIN_PASSWORD_LEN {
        return Err(AppError::invalid_input(format!(
            "password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }
    if len > MAX_PASSWORD_LEN {
        return Err(AppError::invalid_input(format!(
            "password must be at most {} characters",
            MAX_PASSWORD_LEN
        )));
    }
    Ok(())
}

pub struct AuthService {
    users: Arc<dyn UserRepository>,
    jwt: JwtService,
    passwords: PasswordService,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepository>, jwt: JwtService) -> Self {
        Self {
            users,
            jwt,
            passwords: PasswordService::new(),
        }
    }

    /// Register a new account
    pub async fn signup(&self, email: &str, password: &str) -> Result<User, AppError> {
        let email = normalize_email(email);
        validate_email(&email)?;
        validate_password(password)?;

        let password_hash = self.passwords.hash(password).await?;
        let user = self
            .users
            .create_user(NewUser { email, password_hash })
            .await
            .map_err(|err| match err {
                RepositoryError::Conflict(_) => AppError::DuplicateEmail,
                other => other.into(),
            })?;

        tracing::info!("Registered user id={}", user.id);
        Ok(user)
    }

    /// Exchange credentials for a token. Unknown email and wrong password
    /// are indistinguishable to the caller.
    pub async fn login(&self, email: &str, password: &str) -> Result<IssuedToken, AppError> {
        let email = normalize_email(email);

        let Some(user) = self.users.find_user_by_email(&email).await? else {
            self.passwords.verify_dummy(password).await?;
            tracing::info!("Login failed: unknown email");
            return Err(AppError::InvalidCredentials);
        };

        if !self.passwords.verify(password, &user.password_hash).await? {
            tracing::info!("Login failed: wrong password for user id={}", user.id);
            return Err(AppError::InvalidCredentials);
        }

        let issued = self.jwt.create_token(user.id, &user.email)?;
        tracing::info!("User id={} logged in", user.id);
        Ok(issued)
    }

    /// Resolve a token to the user it was issued for
    pub fn verify_token(&self, token: &str) -> Result<AuthUser, AppError> {
        let claims = self.jwt.decode_claims(token).map_err(|e| {
            tracing::debug!("JWT validation failed: {:#}", e);
            AppError::InvalidToken
        })?;
        Ok(AuthUser {
            id: claims.sub,
            email: claims.email,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::InMemoryStore;
    use chrono::{Duration, Utc};

    fn jwt() -> JwtService {
        JwtService::new("test_secret", "shopmarket", Duration::hours(24))
    }

    fn service() -> AuthService {
        AuthService::new(Arc::new(InMemoryStore::new()), jwt())
    }

    #[tokio::test]
    async fn test_signup_then_login_resolves_same_user() {
        let auth = service();
        let user = auth.signup("a@x.com", "secret123").await.unwrap();
        assert_eq!(user.email, "a@x.com");
        assert_ne!(user.password_hash, "secret123");

        let issued = auth.login("a@x.com", "secret123").await.unwrap();
        let resolved = auth.verify_token(&issued.token).unwrap();
        assert_eq!(resolved.id, user.id);
        assert_eq!(resolved.email, "a@x.com");
    }

    #[tokio::test]
    async fn test_signup_normalizes_email() {
        let auth = service();
        let user = auth.signup("  Alice@Example.COM ", "secret123").await.unwrap();
        assert_eq!(user.email, "alice@example.com");
        assert!(auth.login("ALICE@example.com", "secret123").await.is_ok());
    }

    #[tokio::test]
    async fn test_duplicate_email_regardless_of_password() {
        let auth = service();
        auth.signup("a@x.com", "secret123").await.unwrap();

        for password in ["secret123", "different-password"] {
            let err = auth.signup("a@x.com", password).await.unwrap_err();
            assert!(matches!(err, AppError::DuplicateEmail));
        }
        let err = auth.signup("A@X.com", "secret123").await.unwrap_err();
        assert!(matches!(err, AppError::DuplicateEmail));
    }

    #[tokio::test]
    async fn test_signup_rejects_bad_input() {
        let auth = service();
        for email in ["", "no-at-sign", "@x.com", "a@", "a@x", "a@@x.com", "a b@x.com", "a@x..com"] {
            let err = auth.signup(email, "secret123").await.unwrap_err();
            assert!(matches!(err, AppError::InvalidInput(_)), "accepted {email:?}");
        }
        let err = auth.signup("a@x.com", "short").await.unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
        let err = auth.signup("a@x.com", &"p".repeat(MAX_PASSWORD_LEN + 1)).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let auth = service();
        auth.signup("a@x.com", "secret123").await.unwrap();

        let wrong_password = auth.login("a@x.com", "secret124").await.unwrap_err();
        let unknown_email = auth.login("nobody@x.com", "secret123").await.unwrap_err();

        assert!(matches!(wrong_password, AppError::InvalidCredentials));
        assert!(matches!(unknown_email, AppError::InvalidCredentials));
        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
    }

    #[tokio::test]
    async fn test_verify_rejects_expired_and_tampered_tokens() {
        let auth = service();
        let user = auth.signup("a@x.com", "secret123").await.unwrap();

        let expired = jwt()
            .create_token_at(user.id, &user.email, Utc::now() - Duration::hours(48))
            .unwrap();
        assert!(matches!(auth.verify_token(&expired.token), Err(AppError::InvalidToken)));

        let issued = auth.login("a@x.com", "secret123").await.unwrap();
        let mut tampered = issued.token.clone();
        tampered.push('x');
        assert!(matches!(auth.verify_token(&tampered), Err(AppError::InvalidToken)));
        assert!(matches!(auth.verify_token("garbage"), Err(AppError::InvalidToken)));
    }
}
