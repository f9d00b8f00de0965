//! Minimal bearer-token authentication: a user registry plus signed tokens.
//!
//! Handlers take an [`AuthUser`] argument to require a valid
//! `Authorization: Bearer <token>` header; the extracted email is the identity
//! used to partition history.

pub mod token;
pub mod users;

use std::sync::Arc;

use axum::extract::{FromRef, FromRequestParts};
use axum::http::{header::AUTHORIZATION, request::Parts};
use metrics::counter;
use thiserror::Error;
use tracing::warn;

pub use token::{Claims, TokenIssuer};
pub use users::{UserRecord, UserStore};

use crate::error::ApiError;
use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("email and password required")]
    MissingCredentials,
    #[error("user already exists")]
    UserExists,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("missing auth token")]
    MissingToken,
    #[error("invalid token")]
    InvalidToken,
    #[error("password hashing failed: {0}")]
    Hashing(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Authenticated caller, extracted from the bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub email: String,
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    Arc<TokenIssuer>: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        let Some(token) = header.strip_prefix("Bearer ") else {
            counter!("auth_failures_total", "reason" => "missing").increment(1);
            return Err(AuthError::MissingToken.into());
        };

        let issuer = Arc::<TokenIssuer>::from_ref(state);
        match issuer.verify(token.trim()) {
            Ok(claims) => Ok(AuthUser { email: claims.sub }),
            Err(e) => {
                warn!(target: "auth", path = %parts.uri.path(), "rejected bearer token");
                counter!("auth_failures_total", "reason" => "invalid").increment(1);
                Err(e.into())
            }
        }
    }
}
