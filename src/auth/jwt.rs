//! JWT Token Service
//!
//! Handles JWT creation, validation, and claims management for user authentication.

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, TokenData, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT Claims structure containing user information and token metadata
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// User unique identifier
    pub sub: Uuid,
    /// User email
    pub email: String,
    /// Token issued at timestamp
    pub iat: i64,
    /// Token expiration timestamp
    pub exp: i64,
    /// Token issuer
    pub iss: String,
}

/// A freshly signed token and its expiry (unix seconds)
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: i64,
}

/// JWT Service for token operations
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    issuer: String,
    ttl: Duration,
}

impl JwtService {
    /// Create a new JWT service with the provided secret, issuer and token lifetime
    pub fn new(secret: &str, issuer: &str, ttl: Duration) -> Self {
        let encoding_key = EncodingKey::from_secret(secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(secret.as_bytes());

        let mut validation = Validation::default();
        validation.set_issuer(&[issuer]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);
        validation.leeway = 0;

        Self {
            encoding_key,
            decoding_key,
            validation,
            issuer: issuer.to_string(),
            ttl,
        }
    }

    /// Generate a JWT token for a user
    pub fn create_token(&self, user_id: Uuid, email: &str) -> Result<IssuedToken> {
        self.create_token_at(user_id, email, Utc::now())
    }

    /// Generate a token as if issued at `issued_at`
    pub fn create_token_at(&self, user_id: Uuid, email: &str, issued_at: DateTime<Utc>) -> Result<IssuedToken> {
        let expiration = issued_at + self.ttl;

        let claims = Claims {
            sub: user_id,
            email: email.to_string(),
            iat: issued_at.timestamp(),
            exp: expiration.timestamp(),
            iss: self.issuer.clone(),
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key)
            .context("Failed to encode JWT token")?;
        Ok(IssuedToken {
            token,
            expires_at: claims.exp,
        })
    }

    /// Validate and decode a JWT token
    pub fn validate_token(&self, token: &str) -> Result<TokenData<Claims>> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .context("Failed to validate JWT token")
    }

    /// Claims of a token that passed validation
    pub fn decode_claims(&self, token: &str) -> Result<Claims> {
        let token_data = self.validate_token(token)?;
        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> JwtService {
        JwtService::new("test_secret", "shopmarket", Duration::hours(24))
    }

    #[test]
    fn test_jwt_roundtrip() {
        let jwt_service = service();
        let user_id = Uuid::new_v4();
        let email = "test@example.com";

        let issued = jwt_service.create_token(user_id, email).unwrap();
        let claims = jwt_service.decode_claims(&issued.token).unwrap();

        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.email, email);
        assert_eq!(claims.iss, "shopmarket");
        assert_eq!(claims.exp, issued.expires_at);
        assert_eq!(claims.exp - claims.iat, 24 * 60 * 60);
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let jwt_service = service();
        let issued = jwt_service
            .create_token_at(Uuid::new_v4(), "old@example.com", Utc::now() - Duration::hours(25))
            .unwrap();

        assert!(jwt_service.validate_token(&issued.token).is_err());
    }

    #[test]
    fn test_tampered_token_is_rejected() {
        let jwt_service = service();
        let issued = jwt_service.create_token(Uuid::new_v4(), "a@x.com").unwrap();

        // Swap the payload for one claiming a different subject
        let forged = jwt_service.create_token(Uuid::new_v4(), "b@x.com").unwrap();
        let forged_payload = forged.token.split('.').nth(1).unwrap();
        let mut parts: Vec<&str> = issued.token.split('.').collect();
        parts[1] = forged_payload;
        let tampered = parts.join(".");

        assert!(jwt_service.validate_token(&tampered).is_err());
        assert!(jwt_service.validate_token("not.a.jwt").is_err());
    }

    #[test]
    fn test_foreign_secret_and_issuer_are_rejected() {
        let jwt_service = service();
        let other_key = JwtService::new("other_secret", "shopmarket", Duration::hours(24));
        let other_issuer = JwtService::new("test_secret", "someone-else", Duration::hours(24));

        let token = other_key.create_token(Uuid::new_v4(), "a@x.com").unwrap().token;
        assert!(jwt_service.validate_token(&token).is_err());

        let token = other_issuer.create_token(Uuid::new_v4(), "a@x.com").unwrap().token;
        assert!(jwt_service.validate_token(&token).is_err());
    }
}
