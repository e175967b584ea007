use axum::{
    routing::{get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};

use super::{auth_middleware::AuthUser, identity_provider::Identity, jwt::generate_session_token};
use crate::{
    app_module::AppState,
    error::{AppError, AppResult},
    extract::AppJson,
};

#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub token: String,
    pub user: Identity,
}

pub fn auth_router() -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/me", get(me))
}

fn open_session(state: &AppState, user: Identity) -> AppResult<Json<SessionResponse>> {
    let token = generate_session_token(&user, &state.jwt)
        .map_err(|e| AppError::Internal(format!("Failed to sign session token: {e}")))?;
    Ok(Json(SessionResponse { token, user }))
}

pub async fn register(
    Extension(ctx): Extension<AppState>,
    AppJson(request): AppJson<CredentialsRequest>,
) -> AppResult<Json<SessionResponse>> {
    let identity = ctx
        .service
        .identity_provider
        .register(&request.email, &request.password)
        .await?;
    tracing::info!(user_id = %identity.user_id, "Registered new account");
    open_session(&ctx, identity)
}

pub async fn login(
    Extension(ctx): Extension<AppState>,
    AppJson(request): AppJson<CredentialsRequest>,
) -> AppResult<Json<SessionResponse>> {
    let identity = ctx
        .service
        .identity_provider
        .sign_in(&request.email, &request.password)
        .await?;
    tracing::info!(user_id = %identity.user_id, "User signed in");
    open_session(&ctx, identity)
}

pub async fn me(user: AuthUser) -> Json<Identity> {
    Json(Identity {
        user_id: user.user_id,
        email: user.email,
    })
}
