//! Bearer-token authentication.
//!
//! Verifies HS256 JWTs from the `Authorization` header and hands handlers
//! an `AuthUser` with the decoded claims. Orchestrators never see raw
//! tokens, only the acting principal derived here.

use axum::{extract::FromRequestParts, http::request::Parts};
use docgate_core::AppError;
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::HttpAppError;
use crate::state::AppState;

/// Claims carried by an access token.
#[derive(Debug, Clone, Deserialize)]
pub struct JwtClaims {
    pub sub: String,
    #[serde(default)]
    pub role: Option<String>,
    pub exp: usize,
}

/// Authenticated principal, extracted from the bearer token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub claims: JwtClaims,
}

impl AuthUser {
    /// Principal id as a UUID, when the subject claim is one. System
    /// tokens may carry a non-UUID subject; those uploads record no
    /// `uploaded_by`.
    pub fn principal_id(&self) -> Option<Uuid> {
        Uuid::parse_str(&self.claims.sub).ok()
    }
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    let header = parts.headers.get("Authorization")?.to_str().ok()?;
    let (scheme, token) = header.split_once(' ')?;
    if scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() {
        Some(token)
    } else {
        None
    }
}

impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = HttpAppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or_else(|| {
            HttpAppError(AppError::Unauthorized(
                "Missing or malformed Authorization header".to_string(),
            ))
        })?;

        let claims = decode::<JwtClaims>(
            token,
            &DecodingKey::from_secret(state.config.jwt_secret().as_bytes()),
            &Validation::default(),
        )
        .map_err(|e| {
            tracing::debug!(error = %e, "JWT verification failed");
            HttpAppError(AppError::Unauthorized(
                "Invalid or expired token".to_string(),
            ))
        })?
        .claims;

        Ok(AuthUser { claims })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_with_auth(value: &str) -> Parts {
        let (parts, _) = Request::builder()
            .header("Authorization", value)
            .body(())
            .unwrap()
            .into_parts();
        parts
    }

    #[test]
    fn test_bearer_token_extraction() {
        let parts = parts_with_auth("Bearer abc.def.ghi");
        assert_eq!(bearer_token(&parts), Some("abc.def.ghi"));

        let parts = parts_with_auth("bearer lowercase.ok");
        assert_eq!(bearer_token(&parts), Some("lowercase.ok"));

        let parts = parts_with_auth("Basic dXNlcjpwYXNz");
        assert_eq!(bearer_token(&parts), None);

        let parts = parts_with_auth("Bearer ");
        assert_eq!(bearer_token(&parts), None);
    }

    #[test]
    fn test_principal_id_parsing() {
        let user = AuthUser {
            claims: JwtClaims {
                sub: "123e4567-e89b-12d3-a456-426614174000".to_string(),
                role: Some("admin".to_string()),
                exp: 0,
            },
        };
        assert!(user.principal_id().is_some());

        let system = AuthUser {
            claims: JwtClaims {
                sub: "system".to_string(),
                role: None,
                exp: 0,
            },
        };
        assert!(system.principal_id().is_none());
    }
}
