//! Bearer-token authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use incidentdesk_core::error::CoreError;
use incidentdesk_core::types::DbId;
use incidentdesk_db::models::enums::UserRole;
use incidentdesk_identity::IdentityError;
use serde::Serialize;

use crate::error::AppError;
use crate::state::AppState;

/// Authenticated caller resolved from the `Authorization: Bearer <token>` header.
///
/// The token is checked with the identity provider on every request. `role`
/// is always [`UserRole::Viewer`]; the stored role is not consulted.
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = %user.id, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct AuthUser {
    /// Provider account id (same as the local `users.id`).
    pub id: DbId,
    pub email: String,
    pub role: UserRole,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or_else(|| unauthorized("No authorization header"))?;

        let token = header
            .to_str()
            .ok()
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| unauthorized("Authentication failed"))?;

        let account = match state.identity.get_user(token).await {
            Ok(Some(account)) => account,
            Ok(None) | Err(IdentityError::Rejected { .. }) => {
                return Err(unauthorized("Authentication failed"));
            }
            Err(e) => {
                return Err(AppError::InternalError(format!(
                    "Token verification failed: {e}"
                )));
            }
        };

        Ok(AuthUser {
            id: account.id,
            email: account.email.unwrap_or_default(),
            role: UserRole::Viewer,
        })
    }
}

fn unauthorized(message: &str) -> AppError {
    AppError::Core(CoreError::Unauthorized(message.into()))
}
