//! Authentication Middleware
//!
//! Axum middleware gating protected routes behind a bearer token.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use crate::error::AppError;
use crate::services::AuthService;

/// Pull the token out of `Authorization: Bearer <token>`. The scheme name
/// is matched case-insensitively.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let (scheme, token) = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())?
        .trim_start()
        .split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    Some(token.trim()).filter(|token| !token.is_empty())
}

/// Authentication middleware that validates JWT tokens and attaches the user
pub struct AuthMiddleware;

impl AuthMiddleware {
    /// Rejects the request with 401 unless it carries a valid token. The
    /// resolved `AuthUser` is stored in this request's extensions for the
    /// handler to take as `Extension<AuthUser>`.
    pub async fn require_auth(
        State(auth): State<Arc<AuthService>>,
        mut req: Request,
        next: Next,
    ) -> Result<Response, AppError> {
        let Some(token) = bearer_token(req.headers()) else {
            tracing::warn!("[AuthMiddleware] Missing bearer token: {} {}", req.method(), req.uri().path());
            return Err(AppError::Unauthorized);
        };

        let auth_user = auth.verify_token(token).inspect_err(|_| {
            tracing::warn!("[AuthMiddleware] Rejected token: {} {}", req.method(), req.uri().path());
        })?;
        tracing::debug!("[AuthMiddleware] Authenticated user id={}", auth_user.id);

        req.extensions_mut().insert(auth_user);
        Ok(next.run(req).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_bearer_token_extraction() {
        assert_eq!(bearer_token(&headers_with("Bearer abc.def.ghi")), Some("abc.def.ghi"));
        assert_eq!(bearer_token(&headers_with("bearer abc.def.ghi")), Some("abc.def.ghi"));
        assert_eq!(bearer_token(&headers_with("BEARER abc.def.ghi")), Some("abc.def.ghi"));
        assert_eq!(bearer_token(&headers_with("Basic dXNlcjpwYXNz")), None);
        assert_eq!(bearer_token(&headers_with("Bearerabc.def.ghi")), None);
        assert_eq!(bearer_token(&headers_with("Bearer ")), None);
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }
}
