//! Bearer-token extractors for handlers.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use super::jwt::validate_session_token;
use crate::{app_module::AppState, error::AppError};

/// A caller holding a valid session token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: String,
    pub email: String,
}

/// `None` when the request carries no `Authorization` header at all.
/// A header that is present but unusable is still rejected.
#[derive(Debug, Clone)]
pub struct MaybeAuthUser(pub Option<AuthUser>);

fn authenticate(parts: &Parts, header: &str) -> Result<AuthUser, AppError> {
    let token = header.strip_prefix("Bearer ").ok_or_else(|| {
        AppError::Unauthorized("Invalid Authorization format. Expected: Bearer <token>".into())
    })?;

    let state = parts
        .extensions
        .get::<AppState>()
        .ok_or_else(|| AppError::Internal("Application state is not installed".into()))?;

    let claims = validate_session_token(token, &state.jwt)
        .map_err(|_| AppError::Unauthorized("Invalid or expired token".into()))?;

    Ok(AuthUser {
        user_id: claims.sub,
        email: claims.email,
    })
}

fn authorization_header(parts: &Parts) -> Result<Option<&str>, AppError> {
    parts
        .headers
        .get("authorization")
        .map(|value| {
            value
                .to_str()
                .map_err(|_| AppError::Unauthorized("Malformed Authorization header".into()))
        })
        .transpose()
}

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = authorization_header(parts)?
            .ok_or_else(|| AppError::Unauthorized("Missing Authorization header".into()))?;
        authenticate(parts, header)
    }
}

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for MaybeAuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match authorization_header(parts)? {
            Some(header) => authenticate(parts, header).map(|user| MaybeAuthUser(Some(user))),
            None => Ok(MaybeAuthUser(None)),
        }
    }
}
