//! Handlers for the `/auth` resource (register, login, me).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use crate::auth::bridge::{AuthResponse, IdentityBridge, LoginRequest, RegisterRequest};
use crate::error::AppResult;
use crate::extract::AppJson;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// POST /auth/register
///
/// Create the provider account and local user. Returns 201 with the user and
/// the provider's access token.
pub async fn register(
    State(state): State<AppState>,
    AppJson(input): AppJson<RegisterRequest>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    let response = IdentityBridge::new(&state.pool, state.identity.as_ref())
        .register(&input)
        .await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    AppJson(input): AppJson<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let response = IdentityBridge::new(&state.pool, state.identity.as_ref())
        .login(&input)
        .await?;
    Ok(Json(response))
}

/// GET /auth/me
///
/// Echo the identity attached by the bearer-token guard.
pub async fn me(auth_user: AuthUser) -> Json<AuthUser> {
    Json(auth_user)
}
